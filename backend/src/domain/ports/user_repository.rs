//! Port for account persistence.

use async_trait::async_trait;

use crate::domain::{User, UserId};

/// Errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// Another account already uses the email address.
    #[error("email already registered: {email}")]
    DuplicateEmail { email: String },
}

impl UserRepositoryError {
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

/// Port for account storage.
///
/// Email addresses are unique; [`UserRepository::insert`] enforces this and
/// reports collisions as [`UserRepositoryError::DuplicateEmail`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch an account by email (exact match).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Insert a new account, rejecting duplicate emails.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Replace an existing account. Returns `false` when the id is unknown.
    async fn update(&self, user: &User) -> Result<bool, UserRepositoryError>;

    /// Delete an account. Returns `false` when the id is unknown.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;

    /// Every account, newest first (admin view).
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Number of accounts in the store (admin dashboard).
    async fn count(&self) -> Result<u64, UserRepositoryError>;
}

/// Fixture implementation for tests that do not exercise accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _user: &User) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn update(&self, _user: &User) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: &UserId) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<u64, UserRepositoryError> {
        Ok(0)
    }
}
