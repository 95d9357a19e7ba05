//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: every endpoint from the inbound layer, the domain
//! schemas they reference, and the session cookie security scheme. The
//! generated document is served at `/api-docs/openapi.json`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{
    CartLineView, CartView, CustomerRef, DashboardStats, OrderItemView, OrderView,
};
use crate::domain::{
    ErrorCode, OrderStatus, PaymentMethod, Product, ProductStatus, Profile, Role, ShippingAddress,
};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::{admin, auth, cart, catalog, health, orders};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/login or /register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace backend API",
        description = "HTTP interface for the marketplace: catalogue, carts, checkout, and administration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        auth::register,
        auth::login,
        auth::logout,
        auth::get_profile,
        auth::update_profile,
        catalog::list_products,
        catalog::sell_product,
        catalog::seller_products,
        catalog::get_product,
        catalog::create_product,
        catalog::update_product,
        catalog::delete_product,
        cart::get_cart,
        cart::add_item,
        cart::update_item,
        cart::remove_item,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::send_whatsapp,
        admin::dashboard,
        admin::list_users,
        admin::get_user,
        admin::set_role,
        admin::delete_user,
        admin::list_products,
        admin::get_product,
        admin::approve_product,
        admin::list_orders,
        admin::confirm_order,
        health::ready,
        health::live,
    ),
    components(schemas(
        ErrorEnvelope,
        ErrorCode,
        Profile,
        Role,
        Product,
        ProductStatus,
        CartView,
        CartLineView,
        OrderView,
        OrderItemView,
        CustomerRef,
        OrderStatus,
        PaymentMethod,
        ShippingAddress,
        DashboardStats,
    )),
    tags(
        (name = "auth", description = "Registration, login, and profiles"),
        (name = "products", description = "Catalogue browsing and listings"),
        (name = "cart", description = "Shopping carts"),
        (name = "orders", description = "Checkout and order history"),
        (name = "admin", description = "Administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn openapi_document_serialises() {
        let doc = ApiDoc::openapi();
        assert!(doc.to_json().is_ok());
    }

    #[test]
    fn openapi_registers_the_error_envelope() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key("ErrorEnvelope"));
        assert!(schemas.contains_key("Product"));
    }

    #[test]
    fn openapi_registers_all_endpoint_groups() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/api/auth/register",
            "/api/products",
            "/api/cart/{userId}",
            "/api/orders/{userId}/create",
            "/api/admin/dashboard",
            "/health/ready",
        ] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }
}
