//! Driving ports for registration, login, profiles, and the admin dashboard.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ApiResult, Product, Profile, Role, UserId};

/// New-account request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
}

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Identity established by a successful registration or login; what the
/// session stores and what the auth responses return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
}

/// Partial profile update; `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
}

/// Headline counts for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub users: u64,
    pub products: u64,
    pub orders: u64,
    pub carts: u64,
}

/// The admin dashboard: counts plus small recency samples.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub stats: DashboardStats,
    /// Most recently registered accounts, capped at two.
    pub recent_users: Vec<Profile>,
    /// Products with stock below ten, capped at two.
    pub low_stock_products: Vec<Product>,
}

/// Account mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account and establish its identity.
    async fn register(&self, request: RegisterRequest) -> ApiResult<AuthenticatedUser>;

    /// Verify credentials and establish identity.
    async fn login(&self, credentials: Credentials) -> ApiResult<AuthenticatedUser>;

    /// Update profile fields on an existing account.
    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate) -> ApiResult<Profile>;

    /// Admin role change.
    async fn set_role(&self, user_id: &UserId, role: Role) -> ApiResult<Profile>;

    /// Admin account deletion.
    async fn delete_user(&self, user_id: &UserId) -> ApiResult<()>;
}

/// Fixture account ports: registration and login succeed with a canned
/// identity, reads return empty data, admin checks pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountOps;

impl FixtureAccountOps {
    fn identity() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: UserId::random(),
            name: "Fixture".into(),
            role: Role::User,
        }
    }

    fn profile(user_id: UserId) -> Profile {
        Profile {
            id: user_id,
            name: "Fixture".into(),
            email: "fixture@example.com".into(),
            phone: None,
            address: None,
            city: None,
            zip: None,
            role: Role::User,
            created_at: chrono::Utc::now(),
        }
    }
}

#[async_trait]
impl AccountCommand for FixtureAccountOps {
    async fn register(&self, _request: RegisterRequest) -> ApiResult<AuthenticatedUser> {
        Ok(Self::identity())
    }

    async fn login(&self, _credentials: Credentials) -> ApiResult<AuthenticatedUser> {
        Ok(Self::identity())
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        _update: ProfileUpdate,
    ) -> ApiResult<Profile> {
        Ok(Self::profile(*user_id))
    }

    async fn set_role(&self, user_id: &UserId, _role: Role) -> ApiResult<Profile> {
        Ok(Self::profile(*user_id))
    }

    async fn delete_user(&self, _user_id: &UserId) -> ApiResult<()> {
        Ok(())
    }
}

#[async_trait]
impl AccountQuery for FixtureAccountOps {
    async fn fetch_profile(&self, user_id: &UserId) -> ApiResult<Profile> {
        Ok(Self::profile(*user_id))
    }

    async fn list_users(&self) -> ApiResult<Vec<Profile>> {
        Ok(Vec::new())
    }

    async fn ensure_admin(&self, _user_id: &UserId) -> ApiResult<()> {
        Ok(())
    }

    async fn dashboard(&self) -> ApiResult<DashboardView> {
        Ok(DashboardView {
            stats: DashboardStats {
                users: 0,
                products: 0,
                orders: 0,
                carts: 0,
            },
            recent_users: Vec::new(),
            low_stock_products: Vec::new(),
        })
    }
}

/// Account reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// A user's profile.
    async fn fetch_profile(&self, user_id: &UserId) -> ApiResult<Profile>;

    /// Every account's profile, newest first (admin view).
    async fn list_users(&self) -> ApiResult<Vec<Profile>>;

    /// Verify the user exists and holds the admin role; `forbidden` when a
    /// regular user, `unauthorized` when the account no longer exists.
    async fn ensure_admin(&self, user_id: &UserId) -> ApiResult<()>;

    /// The admin dashboard summary.
    async fn dashboard(&self) -> ApiResult<DashboardView>;
}
