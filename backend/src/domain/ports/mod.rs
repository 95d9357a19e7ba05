//! Ports: the trait seams between the domain and its adapters.
//!
//! Driven ports (repositories, the confirmation sender, the password
//! hasher) are implemented by outbound adapters. Driving ports (the
//! `*Command`/`*Query` traits) are implemented by domain services and
//! consumed by the HTTP layer.

pub mod account_ops;
pub mod cart_ops;
pub mod cart_repository;
pub mod catalog_ops;
pub mod catalog_repository;
pub mod confirmation_sender;
pub mod idempotency_store;
pub mod order_ops;
pub mod order_repository;
pub mod password_hasher;
pub mod user_repository;

pub use self::account_ops::{
    AccountCommand, AccountQuery, AuthenticatedUser, Credentials, DashboardStats, DashboardView,
    FixtureAccountOps, ProfileUpdate, RegisterRequest,
};
pub use self::cart_ops::{CartCommand, CartLineView, CartQuery, CartView, FixtureCartOps};
pub use self::cart_repository::{CartRepository, CartRepositoryError, FixtureCartRepository};
pub use self::catalog_ops::{
    CatalogCommand, CatalogQuery, FixtureCatalogOps, ListingDraft, ProductUpdate, Viewer,
};
pub use self::catalog_repository::{
    CatalogRepository, CatalogRepositoryError, FixtureCatalogRepository,
};
pub use self::confirmation_sender::{
    ConfirmationMessage, ConfirmationSendError, ConfirmationSender, SendReceipt,
    UnconfiguredConfirmationSender,
};
pub use self::idempotency_store::{
    FixtureIdempotencyStore, IdempotencyLookup, IdempotencyLookupResult, IdempotencyStore,
    IdempotencyStoreError,
};
pub use self::order_ops::{
    ConfirmationOutcome, CustomerRef, FixtureOrderOps, OrderCommand, OrderItemView, OrderQuery,
    OrderView, PlaceOrderRequest, PlacedOrder,
};
pub use self::order_repository::{FixtureOrderRepository, OrderRepository, OrderRepositoryError};
pub use self::password_hasher::{PasswordHasher, Sha256PasswordHasher};
pub use self::user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};

#[cfg(test)]
pub use self::account_ops::{
    MockAccountCommand, MockAccountQuery,
};
#[cfg(test)]
pub use self::cart_ops::{MockCartCommand, MockCartQuery};
#[cfg(test)]
pub use self::cart_repository::MockCartRepository;
#[cfg(test)]
pub use self::catalog_ops::{MockCatalogCommand, MockCatalogQuery};
#[cfg(test)]
pub use self::catalog_repository::MockCatalogRepository;
#[cfg(test)]
pub use self::confirmation_sender::MockConfirmationSender;
#[cfg(test)]
pub use self::idempotency_store::MockIdempotencyStore;
#[cfg(test)]
pub use self::order_ops::{MockOrderCommand, MockOrderQuery};
#[cfg(test)]
pub use self::order_repository::MockOrderRepository;
#[cfg(test)]
pub use self::password_hasher::MockPasswordHasher;
#[cfg(test)]
pub use self::user_repository::MockUserRepository;
