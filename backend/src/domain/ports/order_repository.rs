//! Port for order persistence, including the atomic checkout commit.

use async_trait::async_trait;

use crate::domain::{Order, OrderId, UserId};

/// Errors raised by order repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderRepositoryError {
    /// Repository connection could not be established.
    #[error("order repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("order repository query failed: {message}")]
    Query { message: String },
    /// The cart changed between reading it and committing the checkout.
    #[error("cart revision mismatch: expected {expected}, found {actual}")]
    CartRevisionMismatch { expected: u32, actual: u32 },
}

impl OrderRepositoryError {
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

/// Port for order storage.
///
/// # Checkout atomicity
///
/// [`OrderRepository::commit_checkout`] persists the order and clears the
/// originating cart in one commit, guarded by the cart revision the caller
/// computed totals against. A concurrent cart mutation surfaces as
/// [`OrderRepositoryError::CartRevisionMismatch`] and writes nothing, so a
/// crash or race can never leave an order without the matching cart clear.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Atomically insert the order and clear the user's cart, provided the
    /// cart revision still matches `expected_cart_revision`.
    async fn commit_checkout(
        &self,
        order: &Order,
        expected_cart_revision: u32,
    ) -> Result<(), OrderRepositoryError>;

    /// Fetch an order by id regardless of owner (admin paths).
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError>;

    /// Fetch an order owned by the given user.
    async fn find_for_user(
        &self,
        user_id: &UserId,
        id: &OrderId,
    ) -> Result<Option<Order>, OrderRepositoryError>;

    /// A user's orders, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Every order, newest first (admin view).
    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Persist a status change on an existing order.
    async fn save(&self, order: &Order) -> Result<(), OrderRepositoryError>;
}

/// Fixture implementation for tests that do not exercise orders.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOrderRepository;

#[async_trait]
impl OrderRepository for FixtureOrderRepository {
    async fn commit_checkout(
        &self,
        _order: &Order,
        _expected_cart_revision: u32,
    ) -> Result<(), OrderRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(None)
    }

    async fn find_for_user(
        &self,
        _user_id: &UserId,
        _id: &OrderId,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(None)
    }

    async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        Ok(Vec::new())
    }

    async fn save(&self, _order: &Order) -> Result<(), OrderRepositoryError> {
        Ok(())
    }
}
