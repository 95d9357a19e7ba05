//! Catalogue service: the public storefront, seller submissions, and the
//! admin approval workflow.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::ports::{
    CatalogCommand, CatalogQuery, CatalogRepository, CatalogRepositoryError, ListingDraft,
    ProductUpdate, Viewer,
};
use super::{ApiResult, Error, Product, ProductId, ProductStatus, UserId};

/// Public catalogue responses are capped to keep the storefront bounded.
const PUBLIC_CATALOG_LIMIT: usize = 100;

/// Implements the catalogue driving ports over the catalogue repository.
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    fn validate_draft(draft: &ListingDraft) -> ApiResult<()> {
        if draft.name.trim().is_empty() || draft.price <= 0 {
            return Err(Error::invalid_request("Name and price required"));
        }
        if draft.stock == 0 {
            return Err(Error::invalid_request("Stock must be a positive number"));
        }
        Ok(())
    }

    fn from_draft(draft: ListingDraft) -> Product {
        Product {
            id: ProductId::random(),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            image: draft.image,
            category: draft.category,
            condition: draft.condition,
            stock: draft.stock,
            status: None,
            seller_id: None,
            seller_name: None,
            approved_at: None,
            created_at: Utc::now(),
        }
    }

    async fn require_product(&self, id: &ProductId) -> ApiResult<Product> {
        self.catalog
            .find_by_id(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| Error::not_found("Product not found"))
    }
}

fn store_error(err: CatalogRepositoryError) -> Error {
    match err {
        CatalogRepositoryError::Connection { .. } => Error::service_unavailable(
            "Database connection unavailable. Please try again later.",
        ),
        CatalogRepositoryError::Query { message } => Error::internal(message),
    }
}

#[async_trait]
impl CatalogCommand for CatalogService {
    async fn submit_listing(
        &self,
        seller_id: &UserId,
        seller_name: &str,
        draft: ListingDraft,
    ) -> ApiResult<Product> {
        Self::validate_draft(&draft)?;
        let mut product = Self::from_draft(draft);
        product.status = Some(ProductStatus::Pending);
        product.seller_id = Some(*seller_id);
        product.seller_name = Some(seller_name.to_owned());
        self.catalog.insert(&product).await.map_err(store_error)?;
        Ok(product)
    }

    async fn create_product(&self, draft: ListingDraft) -> ApiResult<Product> {
        Self::validate_draft(&draft)?;
        let mut product = Self::from_draft(draft);
        product.status = Some(ProductStatus::Approved);
        product.approved_at = Some(Utc::now());
        self.catalog.insert(&product).await.map_err(store_error)?;
        Ok(product)
    }

    async fn update_product(&self, id: &ProductId, update: ProductUpdate) -> ApiResult<Product> {
        let mut product = self.require_product(id).await?;
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(Error::invalid_request("Name must not be empty"));
            }
            product.name = name;
        }
        if let Some(price) = update.price {
            if price <= 0 {
                return Err(Error::invalid_request("Price must be positive"));
            }
            product.price = price;
        }
        if let Some(description) = update.description {
            product.description = Some(description);
        }
        if let Some(image) = update.image {
            product.image = Some(image);
        }
        if let Some(category) = update.category {
            product.category = Some(category);
        }
        if let Some(condition) = update.condition {
            product.condition = Some(condition);
        }
        if let Some(stock) = update.stock {
            product.stock = stock;
        }
        if !self.catalog.update(&product).await.map_err(store_error)? {
            return Err(Error::not_found("Product not found"));
        }
        Ok(product)
    }

    async fn delete_product(&self, id: &ProductId) -> ApiResult<()> {
        if !self.catalog.delete(id).await.map_err(store_error)? {
            return Err(Error::not_found("Product not found"));
        }
        Ok(())
    }

    async fn approve_product(
        &self,
        id: &ProductId,
        stock_override: Option<i64>,
    ) -> ApiResult<Product> {
        let mut product = self.require_product(id).await?;
        if let Some(stock) = stock_override {
            let stock = u32::try_from(stock)
                .map_err(|_| Error::invalid_request("Stock must be a non-negative number"))?;
            product.stock = stock;
        }
        product.status = Some(ProductStatus::Approved);
        product.approved_at = Some(Utc::now());
        if !self.catalog.update(&product).await.map_err(store_error)? {
            return Err(Error::not_found("Product not found"));
        }
        Ok(product)
    }
}

#[async_trait]
impl CatalogQuery for CatalogService {
    async fn public_catalog(&self) -> ApiResult<Vec<Product>> {
        self.catalog
            .list_public(PUBLIC_CATALOG_LIMIT)
            .await
            .map_err(store_error)
    }

    async fn fetch_product(&self, id: &ProductId, viewer: Viewer) -> ApiResult<Product> {
        let product = self.require_product(id).await?;
        let visible = match viewer {
            _ if product.is_publicly_visible() => true,
            Viewer::Admin => true,
            Viewer::User(user_id) => product.is_owned_by(&user_id),
            Viewer::Public => false,
        };
        if !visible {
            // Hidden products are indistinguishable from absent ones.
            return Err(Error::not_found("Product not found"));
        }
        Ok(product)
    }

    /// Rejected listings drop out of the seller feed; legacy records with no
    /// status read as approved and stay in.
    async fn seller_listings(&self, seller_id: &UserId) -> ApiResult<Vec<Product>> {
        let listings = self
            .catalog
            .list_by_seller(seller_id)
            .await
            .map_err(store_error)?;
        Ok(listings
            .into_iter()
            .filter(|product| {
                matches!(
                    product.effective_status(),
                    ProductStatus::Approved | ProductStatus::Pending
                )
            })
            .collect())
    }

    async fn list_all(&self) -> ApiResult<Vec<Product>> {
        self.catalog.list_all().await.map_err(store_error)
    }
}
