//! Orders: immutable cart snapshots with a small status machine.
//!
//! Item prices are copied from the catalogue at creation time and never
//! re-derived, so historical orders are immune to later price changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Error, ProductId, UserId};

/// Flat delivery fee added to every order, in whole currency units.
pub const DELIVERY_FEE: i64 = 50;

/// Unique order identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Wrap an already-validated UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported payment methods. Cash on delivery is currently the only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery,
}

/// Order lifecycle states.
///
/// Only `pending → confirmed` has an in-repo transition (admin confirmation).
/// The remaining states are set by external fulfilment processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

/// Destination details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip: String,
}

impl ShippingAddress {
    /// Every field must be non-empty once trimmed.
    pub fn validate(&self) -> Result<(), Error> {
        let fields = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("zip", &self.zip),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::invalid_request(
                "Shipping address with all fields (name, phone, address, city, zip) is required",
            )
            .with_details(json!({ "missing": missing })))
        }
    }
}

/// One order line: quantity and the price snapshotted at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price at the time the order was placed.
    pub price: i64,
}

impl OrderItem {
    /// Line total in whole currency units.
    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

/// An immutable snapshot of a cart at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub subtotal: i64,
    pub delivery: i64,
    pub total: i64,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a pending cash-on-delivery order from snapshotted items,
    /// computing subtotal and total.
    pub fn create(user_id: UserId, items: Vec<OrderItem>, shipping_address: ShippingAddress) -> Self {
        let subtotal: i64 = items.iter().map(OrderItem::line_total).sum();
        let now = Utc::now();
        Self {
            id: OrderId::random(),
            user_id,
            items,
            subtotal,
            delivery: DELIVERY_FEE,
            total: subtotal + DELIVERY_FEE,
            payment_method: PaymentMethod::CashOnDelivery,
            status: OrderStatus::Pending,
            shipping_address,
            created_at: now,
            updated_at: now,
        }
    }

    /// Admin confirmation: only pending orders may transition.
    pub fn confirm(&mut self) -> Result<(), Error> {
        if self.status != OrderStatus::Pending {
            return Err(Error::invalid_request(
                "Only pending orders can be confirmed",
            ));
        }
        self.status = OrderStatus::Confirmed;
        self.updated_at = Utc::now();
        Ok(())
    }
}
