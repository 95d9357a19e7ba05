//! Port for idempotency-record storage.

use async_trait::async_trait;

use crate::domain::{IdempotencyKey, IdempotencyRecord, PayloadHash, UserId};

/// Errors raised by idempotency store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdempotencyStoreError {
    /// Store connection could not be established.
    #[error("idempotency store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("idempotency store query failed: {message}")]
    Query { message: String },
    /// A record for the key already exists (concurrent first requests).
    #[error("idempotency key already recorded")]
    DuplicateKey,
}

impl IdempotencyStoreError {
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

/// Identity of a lookup: the key scoped to the requesting user, paired with
/// the hash of the canonicalised payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdempotencyLookup {
    pub key: IdempotencyKey,
    pub user_id: UserId,
    pub payload_hash: PayloadHash,
}

/// Outcome of probing the store for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum IdempotencyLookupResult {
    /// The key has not been seen for this user.
    NotFound,
    /// Key seen with an identical payload; replay the stored response.
    MatchingPayload(IdempotencyRecord),
    /// Key seen with a different payload; the request must be rejected.
    ConflictingPayload,
}

/// Port for idempotency record storage, scoped per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    /// Probe the store for a previous request with this key.
    async fn lookup(
        &self,
        lookup: &IdempotencyLookup,
    ) -> Result<IdempotencyLookupResult, IdempotencyStoreError>;

    /// Persist the outcome of a completed request.
    async fn store(&self, record: &IdempotencyRecord) -> Result<(), IdempotencyStoreError>;
}

/// Fixture implementation that never remembers a key.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdempotencyStore;

#[async_trait]
impl IdempotencyStore for FixtureIdempotencyStore {
    async fn lookup(
        &self,
        _lookup: &IdempotencyLookup,
    ) -> Result<IdempotencyLookupResult, IdempotencyStoreError> {
        Ok(IdempotencyLookupResult::NotFound)
    }

    async fn store(&self, _record: &IdempotencyRecord) -> Result<(), IdempotencyStoreError> {
        Ok(())
    }
}
