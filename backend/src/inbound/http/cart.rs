//! Shopping cart endpoints.
//!
//! ```text
//! GET    /api/cart/{userId}                        Fetch the cart
//! POST   /api/cart/{userId}/add                    Add (or merge) a line
//! PUT    /api/cart/{userId}/update/{productId}     Set a line's quantity
//! DELETE /api/cart/{userId}/remove/{productId}     Remove a line
//! ```
//!
//! Every route is owner-scoped: the session user must match `{userId}`.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CartView;
use crate::domain::Error;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::params;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemBody {
    pub product_id: String,
    /// Deserialised as an option so a missing field reports the enveloped
    /// validation error instead of a bare deserialisation failure.
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuantityBody {
    pub quantity: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub ok: bool,
    pub cart: CartView,
}

/// Quantities arrive as JSON numbers; anything below one is rejected before
/// the cast to `u32`.
fn checked_quantity(raw: i64) -> ApiResult<u32> {
    u32::try_from(raw)
        .ok()
        .filter(|quantity| *quantity >= 1)
        .ok_or_else(|| Error::invalid_request("Quantity must be at least 1"))
}

/// Fetch the user's cart with product records joined in.
#[utoipa::path(
    get,
    path = "/api/cart/{userId}",
    params(("userId" = String, Path, description = "Cart owner")),
    responses(
        (status = 200, description = "The cart, empty if never touched", body = CartResponse),
        (status = 401, description = "No session", body = ErrorEnvelope),
        (status = 403, description = "Another user's cart", body = ErrorEnvelope)
    ),
    tags = ["cart"]
)]
#[get("/{userId}")]
pub async fn get_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = params::user_id(&path)?;
    session.require_same_user(&owner)?;
    let cart = state.carts_query.fetch_cart(&owner).await?;
    Ok(HttpResponse::Ok().json(CartResponse { ok: true, cart }))
}

/// Add a product to the cart, merging with an existing line.
#[utoipa::path(
    post,
    path = "/api/cart/{userId}/add",
    params(("userId" = String, Path, description = "Cart owner")),
    request_body = AddItemBody,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Invalid quantity or product id", body = ErrorEnvelope),
        (status = 404, description = "Unknown product", body = ErrorEnvelope)
    ),
    tags = ["cart"]
)]
#[post("/{userId}/add")]
pub async fn add_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Json<AddItemBody>,
) -> ApiResult<HttpResponse> {
    let owner = params::user_id(&path)?;
    session.require_same_user(&owner)?;
    let body = body.into_inner();
    let product = params::product_id(&body.product_id)?;
    let raw_quantity = body
        .quantity
        .ok_or_else(|| Error::invalid_request("productId and quantity required"))?;
    let quantity = checked_quantity(raw_quantity)?;
    let cart = state.carts.add_item(&owner, &product, quantity).await?;
    Ok(HttpResponse::Ok().json(CartResponse { ok: true, cart }))
}

/// Set the quantity of an existing cart line.
#[utoipa::path(
    put,
    path = "/api/cart/{userId}/update/{productId}",
    params(
        ("userId" = String, Path, description = "Cart owner"),
        ("productId" = String, Path, description = "Product to update")
    ),
    request_body = QuantityBody,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Invalid quantity", body = ErrorEnvelope),
        (status = 404, description = "Cart or line not found", body = ErrorEnvelope)
    ),
    tags = ["cart"]
)]
#[put("/{userId}/update/{productId}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
    body: web::Json<QuantityBody>,
) -> ApiResult<HttpResponse> {
    let (owner_raw, product_raw) = path.into_inner();
    let owner = params::user_id(&owner_raw)?;
    session.require_same_user(&owner)?;
    let product = params::product_id(&product_raw)?;
    let quantity = checked_quantity(body.quantity)?;
    let cart = state
        .carts
        .update_quantity(&owner, &product, quantity)
        .await?;
    Ok(HttpResponse::Ok().json(CartResponse { ok: true, cart }))
}

/// Remove a line from the cart. Removing an absent line is a no-op.
#[utoipa::path(
    delete,
    path = "/api/cart/{userId}/remove/{productId}",
    params(
        ("userId" = String, Path, description = "Cart owner"),
        ("productId" = String, Path, description = "Product to remove")
    ),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 403, description = "Another user's cart", body = ErrorEnvelope)
    ),
    tags = ["cart"]
)]
#[delete("/{userId}/remove/{productId}")]
pub async fn remove_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (owner_raw, product_raw) = path.into_inner();
    let owner = params::user_id(&owner_raw)?;
    session.require_same_user(&owner)?;
    let product = params::product_id(&product_raw)?;
    let cart = state.carts.remove_item(&owner, &product).await?;
    Ok(HttpResponse::Ok().json(CartResponse { ok: true, cart }))
}
