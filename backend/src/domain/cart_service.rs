//! Cart service: merge-on-add mutations and catalogue-joined reads.

use std::sync::Arc;

use async_trait::async_trait;

use super::ports::{
    CartCommand, CartLineView, CartQuery, CartRepository, CartRepositoryError, CartView,
    CatalogRepository, CatalogRepositoryError,
};
use super::{ApiResult, Cart, Error, ProductId, UserId};

/// Implements the cart driving ports over the cart and catalogue
/// repositories.
pub struct CartService {
    carts: Arc<dyn CartRepository>,
    catalog: Arc<dyn CatalogRepository>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartRepository>, catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { carts, catalog }
    }

    fn require_positive(quantity: u32) -> ApiResult<()> {
        if quantity == 0 {
            return Err(Error::invalid_request("Quantity must be at least 1"));
        }
        Ok(())
    }

    async fn load_cart(&self, user_id: &UserId) -> ApiResult<Option<Cart>> {
        self.carts
            .find_by_user(user_id)
            .await
            .map_err(cart_store_error)
    }

    async fn save_and_view(&self, cart: Cart) -> ApiResult<CartView> {
        self.carts.save(&cart).await.map_err(cart_store_error)?;
        self.view(cart).await
    }

    /// Join cart lines with their product records. Lines whose product has
    /// been deleted are omitted from the view rather than failing it.
    async fn view(&self, cart: Cart) -> ApiResult<CartView> {
        let mut items = Vec::with_capacity(cart.items.len());
        for line in &cart.items {
            let product = self
                .catalog
                .find_by_id(&line.product_id)
                .await
                .map_err(catalog_store_error)?;
            if let Some(product) = product {
                items.push(CartLineView {
                    product,
                    quantity: line.quantity,
                });
            }
        }
        Ok(CartView {
            user_id: cart.user_id,
            items,
            revision: cart.revision,
            updated_at: cart.updated_at,
        })
    }
}

fn cart_store_error(err: CartRepositoryError) -> Error {
    match err {
        CartRepositoryError::Connection { .. } => {
            Error::service_unavailable("Cart store is unavailable")
        }
        CartRepositoryError::Query { message } => Error::internal(message),
    }
}

fn catalog_store_error(err: CatalogRepositoryError) -> Error {
    match err {
        CatalogRepositoryError::Connection { .. } => {
            Error::service_unavailable("Product store is unavailable")
        }
        CatalogRepositoryError::Query { message } => Error::internal(message),
    }
}

#[async_trait]
impl CartCommand for CartService {
    async fn add_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> ApiResult<CartView> {
        Self::require_positive(quantity)?;
        let product = self
            .catalog
            .find_by_id(product_id)
            .await
            .map_err(catalog_store_error)?;
        if product.is_none() {
            return Err(Error::not_found("Product not found"));
        }
        let mut cart = self
            .load_cart(user_id)
            .await?
            .unwrap_or_else(|| Cart::new(*user_id));
        cart.add(*product_id, quantity);
        self.save_and_view(cart).await
    }

    async fn update_quantity(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> ApiResult<CartView> {
        Self::require_positive(quantity)?;
        let mut cart = self
            .load_cart(user_id)
            .await?
            .ok_or_else(|| Error::not_found("Cart not found"))?;
        if !cart.set_quantity(*product_id, quantity) {
            return Err(Error::not_found("Item not found in cart"));
        }
        self.save_and_view(cart).await
    }

    async fn remove_item(&self, user_id: &UserId, product_id: &ProductId) -> ApiResult<CartView> {
        let mut cart = self
            .load_cart(user_id)
            .await?
            .ok_or_else(|| Error::not_found("Cart not found"))?;
        cart.remove(*product_id);
        self.save_and_view(cart).await
    }
}

#[async_trait]
impl CartQuery for CartService {
    async fn fetch_cart(&self, user_id: &UserId) -> ApiResult<CartView> {
        match self.load_cart(user_id).await? {
            Some(cart) => self.view(cart).await,
            None => Ok(CartView::empty(*user_id)),
        }
    }
}
