//! Domain entities, services, and ports.
//!
//! Types here are transport agnostic. Inbound adapters translate them to the
//! HTTP envelope; outbound adapters implement the driven ports.

pub mod account_service;
pub mod cart;
pub mod cart_service;
pub mod catalog;
pub mod catalog_service;
pub mod error;
pub mod idempotency;
pub mod order;
pub mod order_service;
pub mod phone;
pub mod ports;
pub mod user;

pub use self::cart::{Cart, CartLine};
pub use self::catalog::{Product, ProductId, ProductStatus};
pub use self::error::{Error, ErrorCode};
pub use self::idempotency::{
    canonicalize_and_hash, IdempotencyKey, IdempotencyKeyValidationError, IdempotencyRecord,
    PayloadHash,
};
pub use self::order::{
    Order, OrderId, OrderItem, OrderStatus, PaymentMethod, ShippingAddress, DELIVERY_FEE,
};
pub use self::phone::{is_valid_e164, normalize_phone};
pub use self::user::{Profile, Role, User, UserId};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
