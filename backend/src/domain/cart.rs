//! Per-user shopping cart aggregate.
//!
//! Invariants: at most one line per distinct product (merge-on-add), every
//! quantity is at least one, and all mutations bump `updated_at` and the
//! `revision` counter used for optimistic concurrency at checkout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ProductId, UserId};

/// One (product, quantity) pair inside a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A user's cart. Created lazily on first add; cleared, not deleted, after a
/// successful checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: UserId,
    pub items: Vec<CartLine>,
    /// Incremented on every mutation; checkout commits verify the revision
    /// they computed totals against.
    pub revision: u32,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Revision of a cart that has never been mutated. The store reports a
    /// missing cart as revision 0 at commit time, so a live cart can never
    /// match a vanished one.
    pub const INITIAL_REVISION: u32 = 1;

    /// Fresh empty cart for the given user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            revision: Self::INITIAL_REVISION,
            updated_at: Utc::now(),
        }
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.updated_at = Utc::now();
    }

    /// Add `quantity` of a product, merging into an existing line when one
    /// is present. Callers validate that the quantity is positive.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) {
        match self.items.iter_mut().find(|line| line.product_id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(CartLine {
                product_id,
                quantity,
            }),
        }
        self.touch();
    }

    /// Set an absolute quantity on an existing line. Returns `false` when no
    /// line for the product exists; the cart is untouched in that case.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == product_id)
        else {
            return false;
        };
        line.quantity = quantity;
        self.touch();
        true
    }

    /// Filter out the line for a product. Removing an absent product is a
    /// no-op apart from the revision bump, keeping the operation idempotent.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|line| line.product_id != product_id);
        self.touch();
    }

    /// Empty the cart after checkout.
    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    /// Whether the cart holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
