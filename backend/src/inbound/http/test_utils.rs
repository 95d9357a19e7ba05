//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;

use crate::domain::ports::{FixtureAccountOps, FixtureCartOps, FixtureCatalogOps, FixtureOrderOps};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Ports bundle backed entirely by fixtures; tests override the ports they
/// exercise with mocks.
pub fn fixture_ports() -> HttpStatePorts {
    HttpStatePorts {
        accounts: Arc::new(FixtureAccountOps),
        accounts_query: Arc::new(FixtureAccountOps),
        carts: Arc::new(FixtureCartOps),
        carts_query: Arc::new(FixtureCartOps),
        orders: Arc::new(FixtureOrderOps),
        orders_query: Arc::new(FixtureOrderOps),
        catalog: Arc::new(FixtureCatalogOps),
        catalog_query: Arc::new(FixtureCatalogOps),
    }
}

/// State wrapper for [`fixture_ports`].
pub fn fixture_state() -> HttpState {
    HttpState::new(fixture_ports())
}

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}
