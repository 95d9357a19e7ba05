//! Driving ports for cart commands and queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ApiResult, Cart, Product, ProductId, UserId};

/// One cart line joined with its current product record.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product: Product,
    pub quantity: u32,
}

/// A cart as presented to clients: lines resolved against the catalogue,
/// plus the revision checkout uses for its staleness guard.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub user_id: UserId,
    pub items: Vec<CartLineView>,
    pub revision: u32,
    pub updated_at: DateTime<Utc>,
}

impl CartView {
    /// The empty view returned when a user has no cart yet. Reports the
    /// same revision a freshly created cart starts at, so clients see one
    /// consistent baseline either way.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            revision: Cart::INITIAL_REVISION,
            updated_at: Utc::now(),
        }
    }
}

/// Cart mutations. Every operation returns the resulting view.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartCommand: Send + Sync {
    /// Add `quantity` of a product, merging with an existing line.
    async fn add_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> ApiResult<CartView>;

    /// Set the quantity of an existing line.
    async fn update_quantity(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> ApiResult<CartView>;

    /// Remove a line; removing an absent line is a no-op.
    async fn remove_item(&self, user_id: &UserId, product_id: &ProductId) -> ApiResult<CartView>;
}

/// Cart reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartQuery: Send + Sync {
    /// The user's cart; an empty view when none exists.
    async fn fetch_cart(&self, user_id: &UserId) -> ApiResult<CartView>;
}

/// Fixture returning empty carts for every operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCartOps;

#[async_trait]
impl CartCommand for FixtureCartOps {
    async fn add_item(
        &self,
        user_id: &UserId,
        _product_id: &ProductId,
        _quantity: u32,
    ) -> ApiResult<CartView> {
        Ok(CartView::empty(*user_id))
    }

    async fn update_quantity(
        &self,
        user_id: &UserId,
        _product_id: &ProductId,
        _quantity: u32,
    ) -> ApiResult<CartView> {
        Ok(CartView::empty(*user_id))
    }

    async fn remove_item(&self, user_id: &UserId, _product_id: &ProductId) -> ApiResult<CartView> {
        Ok(CartView::empty(*user_id))
    }
}

#[async_trait]
impl CartQuery for FixtureCartOps {
    async fn fetch_cart(&self, user_id: &UserId) -> ApiResult<CartView> {
        Ok(CartView::empty(*user_id))
    }
}
