//! Registration, login, and profile endpoints.
//!
//! ```text
//! POST /api/auth/register       Create an account and start a session
//! POST /api/auth/login          Verify credentials and start a session
//! POST /api/auth/logout         Drop the session
//! GET  /api/auth/user/{id}      Fetch a profile (self or admin)
//! PUT  /api/auth/user/{id}      Update a profile (self only)
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{AuthenticatedUser, Credentials, ProfileUpdate, RegisterRequest};
use crate::domain::{Profile, Role, UserId};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::params;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Registration request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Profile update request body. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

/// Identity response for registration and login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub ok: bool,
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
}

impl AuthResponse {
    fn from_identity(identity: AuthenticatedUser) -> Self {
        Self {
            ok: true,
            user_id: identity.user_id,
            name: identity.name,
            role: identity.role,
        }
    }
}

/// Profile response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub ok: bool,
    pub user: Profile,
}

/// Empty acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    pub ok: bool,
    pub message: String,
}

/// Create an account; the new identity is persisted in the session cookie.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterBody,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing fields, duplicate email, or invalid phone", body = ErrorEnvelope)
    ),
    tags = ["auth"]
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<RegisterBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let identity = state
        .accounts
        .register(RegisterRequest {
            name: body.name,
            email: body.email,
            password: body.password,
            phone: body.phone,
            address: body.address,
            city: body.city,
            zip: body.zip,
        })
        .await?;
    session.persist_user(&identity.user_id)?;
    Ok(HttpResponse::Ok().json(AuthResponse::from_identity(identity)))
}

/// Verify credentials and start a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = ErrorEnvelope)
    ),
    tags = ["auth"]
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let identity = state
        .accounts
        .login(Credentials {
            email: body.email,
            password: body.password,
        })
        .await?;
    session.persist_user(&identity.user_id)?;
    Ok(HttpResponse::Ok().json(AuthResponse::from_identity(identity)))
}

/// Drop the session cookie.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Logged out", body = AckResponse)),
    tags = ["auth"]
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    Ok(HttpResponse::Ok().json(AckResponse {
        ok: true,
        message: "Logged out".into(),
    }))
}

/// Fetch a profile. Users read their own; admins read anyone's.
#[utoipa::path(
    get,
    path = "/api/auth/user/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "No session", body = ErrorEnvelope),
        (status = 403, description = "Another user's profile", body = ErrorEnvelope),
        (status = 404, description = "Unknown user", body = ErrorEnvelope)
    ),
    tags = ["auth"]
)]
#[get("/user/{id}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = params::user_id(&path)?;
    let session_user = session.require_user_id()?;
    if session_user != target {
        state.accounts_query.ensure_admin(&session_user).await?;
    }
    let profile = state.accounts_query.fetch_profile(&target).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse {
        ok: true,
        user: profile,
    }))
}

/// Update the caller's own profile.
#[utoipa::path(
    put,
    path = "/api/auth/user/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = ProfileUpdateBody,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid phone number format", body = ErrorEnvelope),
        (status = 403, description = "Another user's profile", body = ErrorEnvelope)
    ),
    tags = ["auth"]
)]
#[put("/user/{id}")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Json<ProfileUpdateBody>,
) -> ApiResult<HttpResponse> {
    let target = params::user_id(&path)?;
    session.require_same_user(&target)?;
    let body = body.into_inner();
    let profile = state
        .accounts
        .update_profile(
            &target,
            ProfileUpdate {
                name: body.name,
                phone: body.phone,
                address: body.address,
                city: body.city,
                zip: body.zip,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(ProfileResponse {
        ok: true,
        user: profile,
    }))
}
