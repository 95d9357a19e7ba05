//! Order endpoints.
//!
//! ```text
//! POST /api/orders/{userId}/create              Checkout the cart
//! GET  /api/orders/{userId}                     List the user's orders
//! GET  /api/orders/{userId}/{orderId}           Fetch one order
//! POST /api/orders/{userId}/{orderId}/whatsapp  Send the confirmation message
//! ```
//!
//! Checkout accepts an optional `Idempotency-Key` header (a UUID). Repeating
//! a request with the same key and payload replays the stored response
//! instead of creating a second order.

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ConfirmationOutcome, OrderView, PlaceOrderRequest};
use crate::domain::{Error, IdempotencyKey, IdempotencyKeyValidationError, ShippingAddress};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::params;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Header carrying the client's checkout idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub shipping_address: ShippingAddress,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub ok: bool,
    pub order: OrderView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub ok: bool,
    pub order: OrderView,
    /// True when the response was replayed from an earlier request with the
    /// same idempotency key.
    pub replayed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrdersResponse {
    pub ok: bool,
    pub orders: Vec<OrderView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmationSentResponse {
    pub ok: bool,
    pub sent: bool,
    pub sid: String,
}

/// 501 body returned when no messaging provider is configured; the client
/// opens the message itself with the prepared text.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationFallbackResponse {
    pub ok: bool,
    pub message: String,
    pub whatsapp_text: String,
}

/// Parse the optional `Idempotency-Key` header.
fn idempotency_key(req: &HttpRequest) -> ApiResult<Option<IdempotencyKey>> {
    let Some(raw) = req.headers().get(IDEMPOTENCY_KEY_HEADER) else {
        return Ok(None);
    };
    let raw = raw
        .to_str()
        .map_err(|_| Error::invalid_request("Idempotency-Key header must be a valid UUID"))?;
    match IdempotencyKey::new(raw) {
        Ok(key) => Ok(Some(key)),
        Err(IdempotencyKeyValidationError::EmptyKey) => Err(Error::invalid_request(
            "Idempotency-Key header must not be empty",
        )),
        Err(IdempotencyKeyValidationError::InvalidKey) => Err(Error::invalid_request(
            "Idempotency-Key header must be a valid UUID",
        )),
    }
}

/// Place an order from the user's cart.
#[utoipa::path(
    post,
    path = "/api/orders/{userId}/create",
    params(
        ("userId" = String, Path, description = "Buyer"),
        ("Idempotency-Key" = Option<String>, Header, description = "Optional retry-safety key (UUID)")
    ),
    request_body = CheckoutBody,
    responses(
        (status = 200, description = "Order placed (or replayed)", body = CheckoutResponse),
        (status = 400, description = "Empty cart, bad address, or vanished product", body = ErrorEnvelope),
        (status = 409, description = "Key reuse with a different payload, or concurrent cart change", body = ErrorEnvelope)
    ),
    tags = ["orders"]
)]
#[post("/{userId}/create")]
pub async fn create_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<CheckoutBody>,
) -> ApiResult<HttpResponse> {
    let buyer = params::user_id(&path)?;
    session.require_same_user(&buyer)?;
    let key = idempotency_key(&req)?;
    let placed = state
        .orders
        .place_order(PlaceOrderRequest {
            user_id: buyer,
            shipping_address: body.into_inner().shipping_address,
            idempotency_key: key,
        })
        .await?;
    Ok(HttpResponse::Ok().json(CheckoutResponse {
        ok: true,
        order: placed.order,
        replayed: placed.replayed,
    }))
}

/// List the user's orders, newest first.
#[utoipa::path(
    get,
    path = "/api/orders/{userId}",
    params(("userId" = String, Path, description = "Buyer")),
    responses(
        (status = 200, description = "The user's orders", body = OrdersResponse),
        (status = 403, description = "Another user's orders", body = ErrorEnvelope)
    ),
    tags = ["orders"]
)]
#[get("/{userId}")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let buyer = params::user_id(&path)?;
    session.require_same_user(&buyer)?;
    let orders = state.orders_query.list_for_user(&buyer).await?;
    Ok(HttpResponse::Ok().json(OrdersResponse { ok: true, orders }))
}

/// Fetch one of the user's orders.
#[utoipa::path(
    get,
    path = "/api/orders/{userId}/{orderId}",
    params(
        ("userId" = String, Path, description = "Buyer"),
        ("orderId" = String, Path, description = "Order id")
    ),
    responses(
        (status = 200, description = "The order", body = OrderResponse),
        (status = 404, description = "Unknown order", body = ErrorEnvelope)
    ),
    tags = ["orders"]
)]
#[get("/{userId}/{orderId}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (buyer_raw, order_raw) = path.into_inner();
    let buyer = params::user_id(&buyer_raw)?;
    session.require_same_user(&buyer)?;
    let order_id = params::order_id(&order_raw)?;
    let order = state.orders_query.fetch(&buyer, &order_id).await?;
    Ok(HttpResponse::Ok().json(OrderResponse { ok: true, order }))
}

/// Send the order confirmation over WhatsApp.
///
/// When no provider is configured this responds 501 with the prepared
/// message text so the client can open WhatsApp itself.
#[utoipa::path(
    post,
    path = "/api/orders/{userId}/{orderId}/whatsapp",
    params(
        ("userId" = String, Path, description = "Buyer"),
        ("orderId" = String, Path, description = "Order id")
    ),
    responses(
        (status = 200, description = "Message handed to the provider", body = ConfirmationSentResponse),
        (status = 400, description = "No usable phone number", body = ErrorEnvelope),
        (status = 501, description = "No provider configured; fallback text included", body = ConfirmationFallbackResponse)
    ),
    tags = ["orders"]
)]
#[post("/{userId}/{orderId}/whatsapp")]
pub async fn send_whatsapp(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (buyer_raw, order_raw) = path.into_inner();
    let buyer = params::user_id(&buyer_raw)?;
    session.require_same_user(&buyer)?;
    let order_id = params::order_id(&order_raw)?;
    match state.orders.send_confirmation(&buyer, &order_id).await? {
        ConfirmationOutcome::Sent { sid } => {
            Ok(HttpResponse::Ok().json(ConfirmationSentResponse {
                ok: true,
                sent: true,
                sid,
            }))
        }
        ConfirmationOutcome::Fallback { text } => Ok(HttpResponse::NotImplemented().json(
            ConfirmationFallbackResponse {
                ok: false,
                message: "Server-side WhatsApp not configured".into(),
                whatsapp_text: text,
            },
        )),
    }
}
