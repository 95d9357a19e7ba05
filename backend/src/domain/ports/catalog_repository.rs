//! Port for product catalogue persistence.

use async_trait::async_trait;

use crate::domain::{Product, ProductId, UserId};

/// Errors raised by catalogue repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogRepositoryError {
    /// Repository connection could not be established.
    #[error("catalog repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("catalog repository query failed: {message}")]
    Query { message: String },
}

impl CatalogRepositoryError {
    /// Connection-failure constructor.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query-failure constructor.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for product storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Fetch a product by id.
    async fn find_by_id(&self, id: &ProductId)
        -> Result<Option<Product>, CatalogRepositoryError>;

    /// Publicly visible products (approved or missing status), newest first,
    /// capped at `limit`.
    async fn list_public(&self, limit: usize) -> Result<Vec<Product>, CatalogRepositoryError>;

    /// Every product regardless of status, newest first (admin view).
    async fn list_all(&self) -> Result<Vec<Product>, CatalogRepositoryError>;

    /// A seller's approved and pending listings, newest first.
    async fn list_by_seller(
        &self,
        seller_id: &UserId,
    ) -> Result<Vec<Product>, CatalogRepositoryError>;

    /// Insert a new product.
    async fn insert(&self, product: &Product) -> Result<(), CatalogRepositoryError>;

    /// Replace an existing product. Returns `false` when the id is unknown.
    async fn update(&self, product: &Product) -> Result<bool, CatalogRepositoryError>;

    /// Delete a product. Returns `false` when the id is unknown.
    async fn delete(&self, id: &ProductId) -> Result<bool, CatalogRepositoryError>;

    /// Number of products in the store (admin dashboard).
    async fn count(&self) -> Result<u64, CatalogRepositoryError>;

    /// Products with stock below `threshold`, lowest stock first, capped at
    /// `limit` (admin dashboard).
    async fn low_stock(
        &self,
        threshold: u32,
        limit: usize,
    ) -> Result<Vec<Product>, CatalogRepositoryError>;
}

/// Fixture implementation for tests that do not exercise the catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogRepository;

#[async_trait]
impl CatalogRepository for FixtureCatalogRepository {
    async fn find_by_id(
        &self,
        _id: &ProductId,
    ) -> Result<Option<Product>, CatalogRepositoryError> {
        Ok(None)
    }

    async fn list_public(&self, _limit: usize) -> Result<Vec<Product>, CatalogRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<Product>, CatalogRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_by_seller(
        &self,
        _seller_id: &UserId,
    ) -> Result<Vec<Product>, CatalogRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _product: &Product) -> Result<(), CatalogRepositoryError> {
        Ok(())
    }

    async fn update(&self, _product: &Product) -> Result<bool, CatalogRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: &ProductId) -> Result<bool, CatalogRepositoryError> {
        Ok(false)
    }

    async fn count(&self) -> Result<u64, CatalogRepositoryError> {
        Ok(0)
    }

    async fn low_stock(
        &self,
        _threshold: u32,
        _limit: usize,
    ) -> Result<Vec<Product>, CatalogRepositoryError> {
        Ok(Vec::new())
    }
}
