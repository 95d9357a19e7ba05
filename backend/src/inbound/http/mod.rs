//! HTTP inbound adapter exposing the REST endpoints.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod doc;
pub mod error;
pub mod health;
pub mod orders;
pub mod params;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
