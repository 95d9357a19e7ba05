//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use utoipa::OpenApi;

use crate::domain::account_service::AccountService;
use crate::domain::cart_service::CartService;
use crate::domain::catalog_service::CatalogService;
use crate::domain::order_service::OrderService;
use crate::domain::ports::{ConfirmationSender, Sha256PasswordHasher, UnconfiguredConfirmationSender};
use crate::inbound::http::doc::ApiDoc;
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::{admin, auth, cart, catalog, orders};
use crate::middleware::trace::Trace;
use crate::outbound::memory::MemoryStore;
use crate::outbound::whatsapp::{TwilioConfig, TwilioWhatsAppSender};

/// Wire the domain services over a shared in-memory store.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the Twilio HTTP client cannot be built.
pub fn build_state(twilio: Option<TwilioConfig>) -> std::io::Result<HttpState> {
    let store = Arc::new(MemoryStore::new());
    let hasher = Arc::new(Sha256PasswordHasher);
    let confirmations: Arc<dyn ConfirmationSender> = match twilio {
        Some(config) => Arc::new(
            TwilioWhatsAppSender::new(config)
                .map_err(|e| std::io::Error::other(format!("Twilio client build failed: {e}")))?,
        ),
        None => Arc::new(UnconfiguredConfirmationSender),
    };

    let accounts = Arc::new(AccountService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        hasher,
    ));
    let carts = Arc::new(CartService::new(store.clone(), store.clone()));
    let catalog = Arc::new(CatalogService::new(store.clone()));
    let orders = Arc::new(OrderService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store,
        confirmations,
    ));

    Ok(HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        accounts_query: accounts,
        carts: carts.clone(),
        carts_query: carts,
        orders: orders.clone(),
        orders_query: orders,
        catalog: catalog.clone(),
        catalog_query: catalog,
    }))
}

/// Register every `/api` scope on an application.
pub fn configure_api(config: &mut web::ServiceConfig) {
    config
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login)
                .service(auth::logout)
                .service(auth::get_profile)
                .service(auth::update_profile),
        )
        .service(
            web::scope("/products")
                .service(catalog::list_products)
                .service(catalog::sell_product)
                .service(catalog::seller_products)
                .service(catalog::create_product)
                .service(catalog::get_product)
                .service(catalog::update_product)
                .service(catalog::delete_product),
        )
        .service(
            web::scope("/cart")
                .service(cart::get_cart)
                .service(cart::add_item)
                .service(cart::update_item)
                .service(cart::remove_item),
        )
        .service(
            web::scope("/orders")
                .service(orders::create_order)
                .service(orders::send_whatsapp)
                .service(orders::get_order)
                .service(orders::list_orders),
        )
        .service(
            web::scope("/admin")
                .service(admin::dashboard)
                .service(admin::list_users)
                .service(admin::set_role)
                .service(admin::get_user)
                .service(admin::delete_user)
                .service(admin::list_products)
                .service(admin::approve_product)
                .service(admin::get_product)
                .service(admin::confirm_order)
                .service(admin::list_orders),
        );
}

async fn openapi_json() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Build and start the HTTP server described by `config`.
///
/// # Errors
///
/// Returns [`std::io::Error`] when state wiring or the socket bind fails.
pub fn run(config: ServerConfig) -> std::io::Result<Server> {
    let state = web::Data::new(build_state(config.twilio.clone())?);
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();
    let key = config.key.clone();
    let cookie_secure = config.cookie_secure;
    let same_site = config.same_site;

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(same_site)
            .build();

        App::new()
            .app_data(state.clone())
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .service(web::scope("/api").wrap(session).configure(configure_api))
            .route("/api-docs/openapi.json", web::get().to(openapi_json))
            .service(ready)
            .service(live)
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    Ok(server.run())
}
