//! Product records and the approval status model.
//!
//! Only approved products are publicly visible. A missing status is treated
//! as approved so records that predate the approval workflow stay listed;
//! see DESIGN.md for the migration note on this policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique product identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
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

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Approval state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Visible in the public catalog.
    Approved,
    /// Awaiting admin review; visible to its seller and admins only.
    Pending,
    /// Declined by an admin; visible to its seller and admins only.
    Rejected,
}

/// A catalogue product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price in whole currency units.
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub stock: u32,
    /// Absent on records that predate the approval workflow; treated as
    /// approved by [`Product::effective_status`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<super::UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    /// Set exactly once, when an admin approves the listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Status with the missing-field compatibility default applied.
    pub fn effective_status(&self) -> ProductStatus {
        self.status.unwrap_or(ProductStatus::Approved)
    }

    /// Whether the product belongs in the public catalog.
    pub fn is_publicly_visible(&self) -> bool {
        self.effective_status() == ProductStatus::Approved
    }

    /// Whether the given user owns this listing.
    pub fn is_owned_by(&self, user_id: &super::UserId) -> bool {
        self.seller_id.as_ref() == Some(user_id)
    }
}
