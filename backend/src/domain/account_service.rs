//! Account service: registration, login, profiles, and the admin dashboard.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::ports::{
    AccountCommand, AccountQuery, AuthenticatedUser, CartRepository, CartRepositoryError,
    CatalogRepository, CatalogRepositoryError, Credentials, DashboardStats, DashboardView,
    OrderRepository, OrderRepositoryError, PasswordHasher, ProfileUpdate, RegisterRequest,
    UserRepository, UserRepositoryError,
};
use super::{is_valid_e164, normalize_phone, ApiResult, Error, Profile, Role, User, UserId};

/// Dashboard recency samples are kept deliberately small.
const DASHBOARD_SAMPLE_LIMIT: usize = 2;
/// Products with stock below this threshold appear on the dashboard.
const LOW_STOCK_THRESHOLD: u32 = 10;

/// Implements the account driving ports over the user repository plus the
/// catalogue, cart, and order repositories the dashboard aggregates.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    catalog: Arc<dyn CatalogRepository>,
    carts: Arc<dyn CartRepository>,
    orders: Arc<dyn OrderRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        catalog: Arc<dyn CatalogRepository>,
        carts: Arc<dyn CartRepository>,
        orders: Arc<dyn OrderRepository>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            users,
            catalog,
            carts,
            orders,
            hasher,
        }
    }

    /// Normalise and validate an optional phone number.
    fn clean_phone(phone: Option<String>) -> ApiResult<Option<String>> {
        let Some(phone) = phone.filter(|phone| !phone.trim().is_empty()) else {
            return Ok(None);
        };
        let normalized = normalize_phone(&phone);
        if !is_valid_e164(&normalized) {
            return Err(Error::invalid_request("Invalid phone number format"));
        }
        Ok(Some(normalized))
    }

    async fn require_user(&self, user_id: &UserId) -> ApiResult<User> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(user_store_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

fn user_store_error(err: UserRepositoryError) -> Error {
    match err {
        UserRepositoryError::Connection { .. } => {
            Error::service_unavailable("User store is unavailable")
        }
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::DuplicateEmail { .. } => {
            Error::invalid_request("Email already registered")
        }
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

fn cart_store_error(err: CartRepositoryError) -> Error {
    match err {
        CartRepositoryError::Connection { .. } => {
            Error::service_unavailable("Cart store is unavailable")
        }
        CartRepositoryError::Query { message } => Error::internal(message),
    }
}

fn order_store_error(err: OrderRepositoryError) -> Error {
    match err {
        OrderRepositoryError::Connection { .. } => {
            Error::service_unavailable("Order store is unavailable")
        }
        OrderRepositoryError::Query { message } => Error::internal(message),
        OrderRepositoryError::CartRevisionMismatch { .. } => {
            Error::internal("unexpected revision conflict")
        }
    }
}

#[async_trait]
impl AccountCommand for AccountService {
    async fn register(&self, request: RegisterRequest) -> ApiResult<AuthenticatedUser> {
        if request.name.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(Error::invalid_request("Missing required fields"));
        }
        let existing = self
            .users
            .find_by_email(&request.email)
            .await
            .map_err(user_store_error)?;
        if existing.is_some() {
            return Err(Error::invalid_request("Email already registered"));
        }
        let phone = Self::clean_phone(request.phone)?;

        let user = User {
            id: UserId::random(),
            name: request.name,
            email: request.email,
            password_hash: self.hasher.hash(&request.password),
            phone,
            address: request.address,
            city: request.city,
            zip: request.zip,
            role: Role::User,
            created_at: Utc::now(),
        };
        self.users.insert(&user).await.map_err(user_store_error)?;
        Ok(AuthenticatedUser {
            user_id: user.id,
            name: user.name,
            role: user.role,
        })
    }

    async fn login(&self, credentials: Credentials) -> ApiResult<AuthenticatedUser> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(Error::invalid_request("Email and password required"));
        }
        let user = self
            .users
            .find_by_email(&credentials.email)
            .await
            .map_err(user_store_error)?;
        // One message for both failure modes, so probes cannot tell a wrong
        // password from an unknown email.
        let user = user.ok_or_else(|| Error::unauthorized("Invalid email or password"))?;
        if !self.hasher.verify(&credentials.password, &user.password_hash) {
            return Err(Error::unauthorized("Invalid email or password"));
        }
        Ok(AuthenticatedUser {
            user_id: user.id,
            name: user.name,
            role: user.role,
        })
    }

    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate) -> ApiResult<Profile> {
        let mut user = self.require_user(user_id).await?;
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(Error::invalid_request("Name must not be empty"));
            }
            user.name = name;
        }
        if update.phone.is_some() {
            user.phone = Self::clean_phone(update.phone)?;
        }
        if let Some(address) = update.address {
            user.address = Some(address);
        }
        if let Some(city) = update.city {
            user.city = Some(city);
        }
        if let Some(zip) = update.zip {
            user.zip = Some(zip);
        }
        if !self.users.update(&user).await.map_err(user_store_error)? {
            return Err(Error::not_found("User not found"));
        }
        Ok(user.into())
    }

    async fn set_role(&self, user_id: &UserId, role: Role) -> ApiResult<Profile> {
        let mut user = self.require_user(user_id).await?;
        user.role = role;
        if !self.users.update(&user).await.map_err(user_store_error)? {
            return Err(Error::not_found("User not found"));
        }
        Ok(user.into())
    }

    async fn delete_user(&self, user_id: &UserId) -> ApiResult<()> {
        if !self.users.delete(user_id).await.map_err(user_store_error)? {
            return Err(Error::not_found("User not found"));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountQuery for AccountService {
    async fn fetch_profile(&self, user_id: &UserId) -> ApiResult<Profile> {
        Ok(self.require_user(user_id).await?.into())
    }

    async fn list_users(&self) -> ApiResult<Vec<Profile>> {
        let users = self.users.list().await.map_err(user_store_error)?;
        Ok(users.into_iter().map(Profile::from).collect())
    }

    async fn ensure_admin(&self, user_id: &UserId) -> ApiResult<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(user_store_error)?
            .ok_or_else(|| Error::unauthorized("Account no longer exists"))?;
        if user.role != Role::Admin {
            return Err(Error::forbidden("Admin access required"));
        }
        Ok(())
    }

    async fn dashboard(&self) -> ApiResult<DashboardView> {
        let users = self.users.count().await.map_err(user_store_error)?;
        let products = self.catalog.count().await.map_err(catalog_store_error)?;
        let carts = self.carts.count().await.map_err(cart_store_error)?;
        let orders = self
            .orders
            .list_all()
            .await
            .map_err(order_store_error)?
            .len() as u64;

        let mut recent_users: Vec<Profile> = self
            .users
            .list()
            .await
            .map_err(user_store_error)?
            .into_iter()
            .map(Profile::from)
            .collect();
        recent_users.truncate(DASHBOARD_SAMPLE_LIMIT);

        let low_stock_products = self
            .catalog
            .low_stock(LOW_STOCK_THRESHOLD, DASHBOARD_SAMPLE_LIMIT)
            .await
            .map_err(catalog_store_error)?;

        Ok(DashboardView {
            stats: DashboardStats {
                users,
                products,
                orders,
                carts,
            },
            recent_users,
            low_stock_products,
        })
    }
}
