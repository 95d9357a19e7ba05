//! In-process store implementing every repository port.
//!
//! One [`MemoryStore`] holds users, products, carts, orders, and idempotency
//! records behind a single `tokio` read-write lock. Taking one lock for the
//! whole store keeps multi-collection operations atomic, in particular
//! [`OrderRepository::commit_checkout`], which must insert the order and
//! clear the cart as one step.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    CartRepository, CartRepositoryError, CatalogRepository, CatalogRepositoryError,
    IdempotencyLookup, IdempotencyLookupResult, IdempotencyStore, IdempotencyStoreError,
    OrderRepository, OrderRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Cart, IdempotencyKey, IdempotencyRecord, Order, OrderId, Product, ProductId, User, UserId,
};

#[derive(Debug, Default)]
struct StoreInner {
    users: HashMap<UserId, User>,
    products: HashMap<ProductId, Product>,
    carts: HashMap<UserId, Cart>,
    orders: HashMap<OrderId, Order>,
    idempotency: HashMap<(UserId, IdempotencyKey), IdempotencyRecord>,
}

/// Shared in-memory store. Clone-free: callers hold it in an `Arc` and hand
/// the same instance to every port.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(mut records: Vec<T>, created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    records.sort_by_key(|record| std::cmp::Reverse(created_at(record)));
    records
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|existing| existing.email == user.email) {
            return Err(UserRepositoryError::DuplicateEmail {
                email: user.email.clone(),
            });
        }
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<bool, UserRepositoryError> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        Ok(self.inner.write().await.users.remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let users = self.inner.read().await.users.values().cloned().collect();
        Ok(newest_first(users, |user| user.created_at))
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        Ok(self.inner.read().await.users.len() as u64)
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, CatalogRepositoryError> {
        Ok(self.inner.read().await.products.get(id).cloned())
    }

    async fn list_public(&self, limit: usize) -> Result<Vec<Product>, CatalogRepositoryError> {
        let visible = self
            .inner
            .read()
            .await
            .products
            .values()
            .filter(|product| product.is_publicly_visible())
            .cloned()
            .collect();
        let mut ordered = newest_first(visible, |product| product.created_at);
        ordered.truncate(limit);
        Ok(ordered)
    }

    async fn list_all(&self) -> Result<Vec<Product>, CatalogRepositoryError> {
        let products = self.inner.read().await.products.values().cloned().collect();
        Ok(newest_first(products, |product| product.created_at))
    }

    async fn list_by_seller(
        &self,
        seller_id: &UserId,
    ) -> Result<Vec<Product>, CatalogRepositoryError> {
        let listings = self
            .inner
            .read()
            .await
            .products
            .values()
            .filter(|product| product.is_owned_by(seller_id))
            .cloned()
            .collect();
        Ok(newest_first(listings, |product| product.created_at))
    }

    async fn insert(&self, product: &Product) -> Result<(), CatalogRepositoryError> {
        self.inner
            .write()
            .await
            .products
            .insert(product.id, product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, CatalogRepositoryError> {
        let mut inner = self.inner.write().await;
        match inner.products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, CatalogRepositoryError> {
        Ok(self.inner.write().await.products.remove(id).is_some())
    }

    async fn count(&self) -> Result<u64, CatalogRepositoryError> {
        Ok(self.inner.read().await.products.len() as u64)
    }

    async fn low_stock(
        &self,
        threshold: u32,
        limit: usize,
    ) -> Result<Vec<Product>, CatalogRepositoryError> {
        let mut scarce: Vec<Product> = self
            .inner
            .read()
            .await
            .products
            .values()
            .filter(|product| product.stock < threshold)
            .cloned()
            .collect();
        scarce.sort_by_key(|product| product.stock);
        scarce.truncate(limit);
        Ok(scarce)
    }
}

#[async_trait]
impl CartRepository for MemoryStore {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, CartRepositoryError> {
        Ok(self.inner.read().await.carts.get(user_id).cloned())
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartRepositoryError> {
        self.inner
            .write()
            .await
            .carts
            .insert(cart.user_id, cart.clone());
        Ok(())
    }

    async fn count(&self) -> Result<u64, CartRepositoryError> {
        Ok(self.inner.read().await.carts.len() as u64)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn commit_checkout(
        &self,
        order: &Order,
        expected_cart_revision: u32,
    ) -> Result<(), OrderRepositoryError> {
        let mut inner = self.inner.write().await;
        let actual = inner
            .carts
            .get(&order.user_id)
            .map_or(0, |cart| cart.revision);
        if actual != expected_cart_revision {
            return Err(OrderRepositoryError::CartRevisionMismatch {
                expected: expected_cart_revision,
                actual,
            });
        }
        inner.orders.insert(order.id, order.clone());
        if let Some(cart) = inner.carts.get_mut(&order.user_id) {
            cart.clear();
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(self.inner.read().await.orders.get(id).cloned())
    }

    async fn find_for_user(
        &self,
        user_id: &UserId,
        id: &OrderId,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .orders
            .get(id)
            .filter(|order| order.user_id == *user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError> {
        let orders = self
            .inner
            .read()
            .await
            .orders
            .values()
            .filter(|order| order.user_id == *user_id)
            .cloned()
            .collect();
        Ok(newest_first(orders, |order| order.created_at))
    }

    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        let orders = self.inner.read().await.orders.values().cloned().collect();
        Ok(newest_first(orders, |order| order.created_at))
    }

    async fn save(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        self.inner
            .write()
            .await
            .orders
            .insert(order.id, order.clone());
        Ok(())
    }
}

#[async_trait]
impl IdempotencyStore for MemoryStore {
    async fn lookup(
        &self,
        lookup: &IdempotencyLookup,
    ) -> Result<IdempotencyLookupResult, IdempotencyStoreError> {
        let inner = self.inner.read().await;
        match inner.idempotency.get(&(lookup.user_id, lookup.key)) {
            None => Ok(IdempotencyLookupResult::NotFound),
            Some(record) if record.payload_hash == lookup.payload_hash => {
                Ok(IdempotencyLookupResult::MatchingPayload(record.clone()))
            }
            Some(_) => Ok(IdempotencyLookupResult::ConflictingPayload),
        }
    }

    async fn store(&self, record: &IdempotencyRecord) -> Result<(), IdempotencyStoreError> {
        let mut inner = self.inner.write().await;
        let slot = (record.user_id, record.key);
        if inner.idempotency.contains_key(&slot) {
            return Err(IdempotencyStoreError::DuplicateKey);
        }
        inner.idempotency.insert(slot, record.clone());
        Ok(())
    }
}
