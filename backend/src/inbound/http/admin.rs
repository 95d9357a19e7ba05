//! Administration endpoints.
//!
//! ```text
//! GET    /api/admin/dashboard            Headline counts and samples
//! GET    /api/admin/users                All users
//! GET    /api/admin/users/{id}           One user
//! PUT    /api/admin/users/{id}/role      Change a user's role
//! DELETE /api/admin/users/{id}           Delete a user
//! GET    /api/admin/products             All products (any status)
//! PUT    /api/admin/products/{id}/approve  Approve a pending listing
//! GET    /api/admin/orders               All orders with customer identity
//! PUT    /api/admin/orders/{id}/confirm  Confirm a pending order
//! ```
//!
//! Every handler re-checks the session user's role against the store before
//! doing anything, so a demoted admin loses access immediately.

use actix_web::{delete, get, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{DashboardStats, OrderView, Viewer};
use crate::domain::{Error, Product, Profile, Role, UserId};
use crate::inbound::http::auth::AckResponse;
use crate::inbound::http::catalog::ProductResponse;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::orders::OrdersResponse;
use crate::inbound::http::params;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RoleBody {
    pub role: String,
}

/// Approval body; `stock` corrects the listing's stock while approving.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ApproveBody {
    #[serde(default)]
    pub stock: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub ok: bool,
    pub stats: DashboardStats,
    pub recent_users: Vec<Profile>,
    pub low_stock_products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub ok: bool,
    pub users: Vec<Profile>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub ok: bool,
    pub user: Profile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminProductsResponse {
    pub ok: bool,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovalResponse {
    pub ok: bool,
    pub message: String,
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmResponse {
    pub ok: bool,
    pub message: String,
    pub order: OrderView,
}

async fn require_admin(state: &HttpState, session: &SessionContext) -> ApiResult<UserId> {
    let user_id = session.require_user_id()?;
    state.accounts_query.ensure_admin(&user_id).await?;
    Ok(user_id)
}

/// Headline counts plus the newest users and lowest-stock products.
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard data", body = DashboardResponse),
        (status = 401, description = "No session", body = ErrorEnvelope),
        (status = 403, description = "Not an admin", body = ErrorEnvelope)
    ),
    tags = ["admin"]
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let view = state.accounts_query.dashboard().await?;
    Ok(HttpResponse::Ok().json(DashboardResponse {
        ok: true,
        stats: view.stats,
        recent_users: view.recent_users,
        low_stock_products: view.low_stock_products,
    }))
}

/// All registered users.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users", body = UsersResponse),
        (status = 403, description = "Not an admin", body = ErrorEnvelope)
    ),
    tags = ["admin"]
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let users = state.accounts_query.list_users().await?;
    Ok(HttpResponse::Ok().json(UsersResponse { ok: true, users }))
}

/// One user's profile.
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "Unknown user", body = ErrorEnvelope)
    ),
    tags = ["admin"]
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let target = params::user_id(&path)?;
    let user = state.accounts_query.fetch_profile(&target).await?;
    Ok(HttpResponse::Ok().json(UserResponse { ok: true, user }))
}

/// Change a user's role to `user` or `admin`.
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    params(("id" = String, Path, description = "User id")),
    request_body = RoleBody,
    responses(
        (status = 200, description = "Role updated", body = UserResponse),
        (status = 400, description = "Role is neither `user` nor `admin`", body = ErrorEnvelope),
        (status = 404, description = "Unknown user", body = ErrorEnvelope)
    ),
    tags = ["admin"]
)]
#[put("/users/{id}/role")]
pub async fn set_role(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Json<RoleBody>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let target = params::user_id(&path)?;
    let role = match body.role.as_str() {
        "user" => Role::User,
        "admin" => Role::Admin,
        _ => return Err(Error::invalid_request("Invalid role")),
    };
    let user = state.accounts.set_role(&target, role).await?;
    Ok(HttpResponse::Ok().json(UserResponse { ok: true, user }))
}

/// Delete a user account.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = AckResponse),
        (status = 404, description = "Unknown user", body = ErrorEnvelope)
    ),
    tags = ["admin"]
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let target = params::user_id(&path)?;
    state.accounts.delete_user(&target).await?;
    Ok(HttpResponse::Ok().json(AckResponse {
        ok: true,
        message: "User deleted successfully".into(),
    }))
}

/// Every product regardless of approval status.
#[utoipa::path(
    get,
    path = "/api/admin/products",
    responses(
        (status = 200, description = "All products", body = AdminProductsResponse),
        (status = 403, description = "Not an admin", body = ErrorEnvelope)
    ),
    tags = ["admin"]
)]
#[get("/products")]
pub async fn list_products(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let products = state.catalog_query.list_all().await?;
    Ok(HttpResponse::Ok().json(AdminProductsResponse { ok: true, products }))
}

/// One product regardless of approval status.
#[utoipa::path(
    get,
    path = "/api/admin/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 403, description = "Not an admin", body = ErrorEnvelope),
        (status = 404, description = "Unknown product", body = ErrorEnvelope)
    ),
    tags = ["admin"]
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let id = params::product_id(&path)?;
    let product = state
        .catalog_query
        .fetch_product(&id, Viewer::Admin)
        .await?;
    Ok(HttpResponse::Ok().json(ProductResponse { ok: true, product }))
}

/// Approve a pending listing, optionally correcting its stock.
#[utoipa::path(
    put,
    path = "/api/admin/products/{id}/approve",
    params(("id" = String, Path, description = "Product id")),
    request_body = ApproveBody,
    responses(
        (status = 200, description = "Product approved", body = ApprovalResponse),
        (status = 400, description = "Negative stock override", body = ErrorEnvelope),
        (status = 404, description = "Unknown product", body = ErrorEnvelope)
    ),
    tags = ["admin"]
)]
#[put("/products/{id}/approve")]
pub async fn approve_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: Option<web::Json<ApproveBody>>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let id = params::product_id(&path)?;
    let stock = body.map(web::Json::into_inner).and_then(|body| body.stock);
    let product = state.catalog.approve_product(&id, stock).await?;
    Ok(HttpResponse::Ok().json(ApprovalResponse {
        ok: true,
        message: "Product approved".into(),
        product,
    }))
}

/// Every order with customer identity joined in.
#[utoipa::path(
    get,
    path = "/api/admin/orders",
    responses(
        (status = 200, description = "All orders", body = OrdersResponse),
        (status = 403, description = "Not an admin", body = ErrorEnvelope)
    ),
    tags = ["admin"]
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let orders = state.orders_query.list_all().await?;
    Ok(HttpResponse::Ok().json(OrdersResponse { ok: true, orders }))
}

/// Confirm a pending order.
#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}/confirm",
    params(("id" = String, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order confirmed", body = ConfirmResponse),
        (status = 400, description = "Order is not pending", body = ErrorEnvelope),
        (status = 404, description = "Unknown order", body = ErrorEnvelope)
    ),
    tags = ["admin"]
)]
#[put("/orders/{id}/confirm")]
pub async fn confirm_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let id = params::order_id(&path)?;
    let order = state.orders.confirm_order(&id).await?;
    Ok(HttpResponse::Ok().json(ConfirmResponse {
        ok: true,
        message: "Order confirmed".into(),
        order,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        DashboardView, MockAccountQuery, MockCatalogCommand,
    };
    use crate::domain::{Product, ProductId, ProductStatus};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{fixture_ports, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use chrono::Utc;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn app_with(
        ports: HttpStatePorts,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(HttpState::new(ports)))
            .wrap(test_session_middleware())
            .service(
                web::scope("/api")
                    .service(web::scope("/auth").service(crate::inbound::http::auth::register))
                    .service(
                        web::scope("/admin")
                            .service(dashboard)
                            .service(list_users)
                            .service(set_role)
                            .service(get_user)
                            .service(delete_user)
                            .service(list_products)
                            .service(approve_product)
                            .service(confirm_order)
                            .service(list_orders),
                    ),
            )
    }

    async fn registered_session(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    ) -> actix_web::cookie::Cookie<'static> {
        let res = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(json!({
                    "name": "Asha",
                    "email": "asha@example.com",
                    "password": "hunter2"
                }))
                .to_request(),
        )
        .await;
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    /// Account query mock that treats every session user as an admin.
    fn admin_accounts_query() -> MockAccountQuery {
        let mut accounts_query = MockAccountQuery::new();
        accounts_query.expect_ensure_admin().returning(|_| Ok(()));
        accounts_query
    }

    fn pending_product() -> Product {
        Product {
            id: ProductId::random(),
            name: "Saree".into(),
            description: None,
            price: 1299,
            image: None,
            category: None,
            condition: None,
            stock: 3,
            status: Some(ProductStatus::Pending),
            seller_id: Some(UserId::random()),
            seller_name: Some("Asha".into()),
            approved_at: None,
            created_at: Utc::now(),
        }
    }

    #[actix_web::test]
    async fn dashboard_rejects_non_admins() {
        let mut accounts_query = MockAccountQuery::new();
        accounts_query
            .expect_ensure_admin()
            .returning(|_| Err(Error::forbidden("Admin access required")));
        let mut ports = fixture_ports();
        ports.accounts_query = Arc::new(accounts_query);
        let app = actix_test::init_service(app_with(ports)).await;
        let cookie = registered_session(&app).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/admin/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["ok"], Value::Bool(false));
        assert_eq!(body["message"], "Admin access required");
    }

    #[actix_web::test]
    async fn dashboard_requires_a_session() {
        let app = actix_test::init_service(app_with(fixture_ports())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/admin/dashboard")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn dashboard_returns_stats_and_samples() {
        let mut accounts_query = admin_accounts_query();
        accounts_query.expect_dashboard().returning(|| {
            Ok(DashboardView {
                stats: DashboardStats {
                    users: 3,
                    products: 5,
                    orders: 2,
                    carts: 1,
                },
                recent_users: Vec::new(),
                low_stock_products: Vec::new(),
            })
        });
        let mut ports = fixture_ports();
        ports.accounts_query = Arc::new(accounts_query);
        let app = actix_test::init_service(app_with(ports)).await;
        let cookie = registered_session(&app).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/admin/dashboard")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["ok"], Value::Bool(true));
        assert_eq!(body["stats"]["users"], 3);
        assert_eq!(body["recentUsers"], json!([]));
        assert_eq!(body["lowStockProducts"], json!([]));
    }

    #[actix_web::test]
    async fn role_updates_reject_unknown_roles() {
        let mut ports = fixture_ports();
        ports.accounts_query = Arc::new(admin_accounts_query());
        let app = actix_test::init_service(app_with(ports)).await;
        let cookie = registered_session(&app).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/admin/users/{}/role", UserId::random()))
                .cookie(cookie)
                .set_json(json!({ "role": "superuser" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "Invalid role");
    }

    #[actix_web::test]
    async fn approval_forwards_the_stock_override() {
        let product = pending_product();
        let product_id = product.id;
        let mut catalog = MockCatalogCommand::new();
        catalog
            .expect_approve_product()
            .withf(move |id, stock| *id == product_id && *stock == Some(7))
            .returning(move |_, _| {
                let mut approved = product.clone();
                approved.status = Some(ProductStatus::Approved);
                approved.stock = 7;
                Ok(approved)
            });
        let mut ports = fixture_ports();
        ports.accounts_query = Arc::new(admin_accounts_query());
        ports.catalog = Arc::new(catalog);
        let app = actix_test::init_service(app_with(ports)).await;
        let cookie = registered_session(&app).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/admin/products/{product_id}/approve"))
                .cookie(cookie)
                .set_json(json!({ "stock": 7 }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "Product approved");
        assert_eq!(body["product"]["status"], "approved");
    }
}
