//! Port for cart persistence.

use async_trait::async_trait;

use crate::domain::{Cart, UserId};

/// Errors raised by cart repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartRepositoryError {
    /// Repository connection could not be established.
    #[error("cart repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("cart repository query failed: {message}")]
    Query { message: String },
}

impl CartRepositoryError {
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

/// Port for cart storage and retrieval.
///
/// Carts are keyed by user; a missing cart is `None`, which callers surface
/// as an empty cart rather than an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Fetch the cart for a user, if one has been created.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, CartRepositoryError>;

    /// Upsert the cart keyed by its user id.
    async fn save(&self, cart: &Cart) -> Result<(), CartRepositoryError>;

    /// Number of carts in the store (admin dashboard).
    async fn count(&self) -> Result<u64, CartRepositoryError>;
}

/// Fixture implementation for tests that do not exercise cart behaviour.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCartRepository;

#[async_trait]
impl CartRepository for FixtureCartRepository {
    async fn find_by_user(&self, _user_id: &UserId) -> Result<Option<Cart>, CartRepositoryError> {
        Ok(None)
    }

    async fn save(&self, _cart: &Cart) -> Result<(), CartRepositoryError> {
        Ok(())
    }

    async fn count(&self) -> Result<u64, CartRepositoryError> {
        Ok(0)
    }
}
