//! Driving ports for catalogue commands and queries.

use async_trait::async_trait;

use crate::domain::{ApiResult, Error, Product, ProductId, ProductStatus, UserId};

/// A seller's new listing, submitted for admin review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub image: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub stock: u32,
}

/// Partial update applied to an existing product. `None` leaves the field
/// untouched; `status` uses a double `Option` so it can be cleared.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub stock: Option<u32>,
}

/// Who is asking for a product, which decides what they may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// Anonymous or unrelated request: approved products only.
    Public,
    /// A signed-in user: approved products plus their own listings.
    User(UserId),
    /// Admins see everything.
    Admin,
}

/// Catalogue mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogCommand: Send + Sync {
    /// Submit a seller listing; it enters the catalogue as pending.
    async fn submit_listing(
        &self,
        seller_id: &UserId,
        seller_name: &str,
        draft: ListingDraft,
    ) -> ApiResult<Product>;

    /// Admin creation of a product, approved immediately.
    async fn create_product(&self, draft: ListingDraft) -> ApiResult<Product>;

    /// Admin update of product fields.
    async fn update_product(&self, id: &ProductId, update: ProductUpdate) -> ApiResult<Product>;

    /// Admin deletion.
    async fn delete_product(&self, id: &ProductId) -> ApiResult<()>;

    /// Approve a pending listing, stamping `approvedAt` and optionally
    /// overriding stock.
    async fn approve_product(
        &self,
        id: &ProductId,
        stock_override: Option<i64>,
    ) -> ApiResult<Product>;
}

/// Catalogue reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// The public storefront: approved products, newest first, capped.
    async fn public_catalog(&self) -> ApiResult<Vec<Product>>;

    /// One product, subject to the viewer's visibility rules.
    async fn fetch_product(&self, id: &ProductId, viewer: Viewer) -> ApiResult<Product>;

    /// A seller's own listings, newest first.
    async fn seller_listings(&self, seller_id: &UserId) -> ApiResult<Vec<Product>>;

    /// Every product regardless of status (admin view).
    async fn list_all(&self) -> ApiResult<Vec<Product>>;
}

/// Fixture catalogue ports: mutations echo a minimal product, reads return
/// empty data or `not_found`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogOps;

impl FixtureCatalogOps {
    fn product_from(draft: ListingDraft) -> Product {
        Product {
            id: ProductId::random(),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            image: draft.image,
            category: draft.category,
            condition: draft.condition,
            stock: draft.stock,
            status: Some(ProductStatus::Approved),
            seller_id: None,
            seller_name: None,
            approved_at: None,
            created_at: chrono::Utc::now(),
        }
    }
}

#[async_trait]
impl CatalogCommand for FixtureCatalogOps {
    async fn submit_listing(
        &self,
        seller_id: &UserId,
        seller_name: &str,
        draft: ListingDraft,
    ) -> ApiResult<Product> {
        let mut product = Self::product_from(draft);
        product.status = Some(ProductStatus::Pending);
        product.seller_id = Some(*seller_id);
        product.seller_name = Some(seller_name.to_owned());
        Ok(product)
    }

    async fn create_product(&self, draft: ListingDraft) -> ApiResult<Product> {
        Ok(Self::product_from(draft))
    }

    async fn update_product(
        &self,
        _id: &ProductId,
        _update: ProductUpdate,
    ) -> ApiResult<Product> {
        Err(Error::not_found("Product not found"))
    }

    async fn delete_product(&self, _id: &ProductId) -> ApiResult<()> {
        Ok(())
    }

    async fn approve_product(
        &self,
        _id: &ProductId,
        _stock_override: Option<i64>,
    ) -> ApiResult<Product> {
        Err(Error::not_found("Product not found"))
    }
}

#[async_trait]
impl CatalogQuery for FixtureCatalogOps {
    async fn public_catalog(&self) -> ApiResult<Vec<Product>> {
        Ok(Vec::new())
    }

    async fn fetch_product(&self, _id: &ProductId, _viewer: Viewer) -> ApiResult<Product> {
        Err(Error::not_found("Product not found"))
    }

    async fn seller_listings(&self, _seller_id: &UserId) -> ApiResult<Vec<Product>> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> ApiResult<Vec<Product>> {
        Ok(Vec::new())
    }
}
