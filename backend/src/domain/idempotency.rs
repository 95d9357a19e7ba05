//! Idempotency keys and payload hashing for safe checkout retries.
//!
//! Clients send an `Idempotency-Key` header (UUID) with order creation.
//! The stored record pairs the key with a hash of the canonicalised request
//! payload so replays return the original response while key reuse with a
//! different payload is rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::UserId;

/// Validation errors for [`IdempotencyKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdempotencyKeyValidationError {
    /// The key string was empty.
    #[error("idempotency key must not be empty")]
    EmptyKey,
    /// The key string was not a valid UUID.
    #[error("idempotency key must be a valid UUID")]
    InvalidKey,
}

/// Client-provided idempotency key (UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    /// Validate and construct a key from its string form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdempotencyKeyValidationError> {
        let raw = raw.as_ref();
        if raw.is_empty() {
            return Err(IdempotencyKeyValidationError::EmptyKey);
        }
        if raw.trim() != raw {
            return Err(IdempotencyKeyValidationError::InvalidKey);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| IdempotencyKeyValidationError::InvalidKey)
    }

    /// Generate a new random key; primarily useful in tests.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hex-encoded SHA-256 of a canonicalised request payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadHash(String);

impl PayloadHash {
    /// The lowercase hex digest.
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

/// Canonicalise a JSON value (recursively sorted object keys, compact form)
/// and hash it, so semantically equal payloads produce equal hashes
/// regardless of whitespace or key order.
pub fn canonicalize_and_hash(value: &serde_json::Value) -> PayloadHash {
    let canonical = canonicalize(value);
    // Compact serialisation of an already-built Value cannot fail.
    let bytes = canonical.to_string().into_bytes();
    PayloadHash(hex::encode(Sha256::digest(bytes)))
}

fn canonicalize(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by_key(|(key, _)| key.as_str());
            serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(key, inner)| (key.clone(), canonicalize(inner)))
                    .collect(),
            )
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(canonicalize).collect())
        }
        other => other.clone(),
    }
}

/// Stored outcome of an idempotent mutation, replayed on duplicate requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    pub key: IdempotencyKey,
    pub user_id: UserId,
    pub payload_hash: PayloadHash,
    /// Serialised response returned to the original request.
    pub response_snapshot: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn key_accepts_valid_uuid() {
        let key = IdempotencyKey::new("550e8400-e29b-41d4-a716-446655440000")
            .expect("valid UUID key");
        assert_eq!(key.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("550e8400")]
    #[case(" 550e8400-e29b-41d4-a716-446655440000")]
    fn key_rejects_malformed_input(#[case] raw: &str) {
        assert_eq!(
            IdempotencyKey::new(raw),
            Err(IdempotencyKeyValidationError::InvalidKey)
        );
    }

    #[test]
    fn key_rejects_empty_input() {
        assert_eq!(
            IdempotencyKey::new(""),
            Err(IdempotencyKeyValidationError::EmptyKey)
        );
    }

    #[test]
    fn hash_is_stable_under_key_reordering() {
        let a = canonicalize_and_hash(&json!({ "b": 2, "a": { "y": 1, "x": [3, 1] } }));
        let b = canonicalize_and_hash(&json!({ "a": { "x": [3, 1], "y": 1 }, "b": 2 }));
        assert_eq!(a, b);
    }

    #[test]
    fn hash_distinguishes_array_order() {
        let a = canonicalize_and_hash(&json!([1, 2]));
        let b = canonicalize_and_hash(&json!([2, 1]));
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_hex_encoded_sha256() {
        let hash = canonicalize_and_hash(&json!({}));
        assert_eq!(hash.as_hex().len(), 64);
        assert!(hash.as_hex().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
