//! Marketplace backend library modules.
//!
//! The crate is organised hexagonally: `domain` holds entities, services and
//! ports; `inbound` and `outbound` hold the HTTP and storage/messaging
//! adapters; `server` assembles the application.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by tooling and the docs endpoint.
pub use inbound::http::doc::ApiDoc;
/// Request-tracing middleware attaching a `Trace-Id` to every response.
pub use middleware::trace::Trace;
