//! Driving ports for order placement, confirmation, and notification.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ApiResult, IdempotencyKey, Order, OrderId, OrderItem, OrderStatus, PaymentMethod, Product,
    ProductId, ShippingAddress, UserId,
};

/// Checkout request assembled by the inbound adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrderRequest {
    pub user_id: UserId,
    pub shipping_address: ShippingAddress,
    /// Present when the client opted into retry-safe checkout.
    pub idempotency_key: Option<IdempotencyKey>,
}

/// One order line, with the live product record joined in when it still
/// exists. The snapshotted `price` is authoritative for money maths.
///
/// Views deserialise as well as serialise so idempotent replays can restore
/// the stored response snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// Customer identity attached to admin order listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    pub name: String,
    pub email: String,
}

/// An order as presented to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItemView>,
    pub subtotal: i64,
    pub delivery: i64,
    pub total: i64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub shipping_address: ShippingAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderView {
    /// View without joined products or customer identity.
    pub fn bare(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemView {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: item.price,
                    product: None,
                })
                .collect(),
            subtotal: order.subtotal,
            delivery: order.delivery,
            total: order.total,
            payment_method: order.payment_method,
            status: order.status,
            shipping_address: order.shipping_address,
            customer: None,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Result of placing an order.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order: OrderView,
    /// True when an idempotency key matched a previous request and the
    /// stored response was replayed without creating a new order.
    pub replayed: bool,
}

/// Outcome of requesting a confirmation message for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// The provider accepted the message.
    Sent { sid: String },
    /// No provider is configured; the client should open the message
    /// itself using this prepared text.
    Fallback { text: String },
}

/// Order mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCommand: Send + Sync {
    /// Place an order from the user's current cart, snapshotting prices and
    /// clearing the cart atomically.
    async fn place_order(&self, request: PlaceOrderRequest) -> ApiResult<PlacedOrder>;

    /// Admin confirmation of a pending order.
    async fn confirm_order(&self, order_id: &OrderId) -> ApiResult<OrderView>;

    /// Send the order confirmation to the customer's phone, or return the
    /// fallback text when no messaging provider is configured.
    async fn send_confirmation(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
    ) -> ApiResult<ConfirmationOutcome>;
}

/// Order reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// A user's orders, newest first, with product records joined in.
    async fn list_for_user(&self, user_id: &UserId) -> ApiResult<Vec<OrderView>>;

    /// One order owned by the user.
    async fn fetch(&self, user_id: &UserId, order_id: &OrderId) -> ApiResult<OrderView>;

    /// Every order with customer identity joined in (admin view).
    async fn list_all(&self) -> ApiResult<Vec<OrderView>>;
}

/// Fixture order ports: placement succeeds with a minimal pending order,
/// reads return empty data or `not_found`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderOps;

#[async_trait]
impl OrderCommand for FixtureOrderOps {
    async fn place_order(&self, request: PlaceOrderRequest) -> ApiResult<PlacedOrder> {
        let order = Order::create(
            request.user_id,
            vec![OrderItem {
                product_id: ProductId::random(),
                quantity: 1,
                price: 100,
            }],
            request.shipping_address,
        );
        Ok(PlacedOrder {
            order: OrderView::bare(order),
            replayed: false,
        })
    }

    async fn confirm_order(&self, _order_id: &OrderId) -> ApiResult<OrderView> {
        Err(crate::domain::Error::not_found("Order not found"))
    }

    async fn send_confirmation(
        &self,
        _user_id: &UserId,
        _order_id: &OrderId,
    ) -> ApiResult<ConfirmationOutcome> {
        Ok(ConfirmationOutcome::Fallback {
            text: "Order Confirmation".into(),
        })
    }
}

#[async_trait]
impl OrderQuery for FixtureOrderOps {
    async fn list_for_user(&self, _user_id: &UserId) -> ApiResult<Vec<OrderView>> {
        Ok(Vec::new())
    }

    async fn fetch(&self, _user_id: &UserId, _order_id: &OrderId) -> ApiResult<OrderView> {
        Err(crate::domain::Error::not_found("Order not found"))
    }

    async fn list_all(&self) -> ApiResult<Vec<OrderView>> {
        Ok(Vec::new())
    }
}
