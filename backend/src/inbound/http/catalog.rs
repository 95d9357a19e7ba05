//! Product catalogue endpoints.
//!
//! ```text
//! GET    /api/products               Public storefront (approved products)
//! POST   /api/products/sell          Submit a listing for approval
//! GET    /api/products/user/{id}     A seller's own listings
//! GET    /api/products/{id}          Single product (visibility-checked)
//! POST   /api/products               Create product (admin)
//! PUT    /api/products/{id}          Update product (admin)
//! DELETE /api/products/{id}          Delete product (admin)
//! ```
//!
//! The storefront degrades rather than failing: when the product store is
//! unreachable the list endpoint returns 503 with an empty `products` array
//! so clients can render an empty shelf.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ListingDraft, ProductUpdate, Viewer};
use crate::domain::{Error, ErrorCode, Product, ProductId, UserId};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::params;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Listing submission and admin creation body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductBody {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    /// Defaults to one unit when omitted.
    #[serde(default)]
    pub stock: Option<i64>,
}

impl ProductBody {
    fn into_draft(self) -> ApiResult<ListingDraft> {
        let stock = match self.stock {
            None => 1,
            Some(value) => u32::try_from(value)
                .ok()
                .filter(|stock| *stock >= 1)
                .ok_or_else(|| Error::invalid_request("Stock must be a positive number"))?,
        };
        Ok(ListingDraft {
            name: self.name,
            description: self.description,
            price: self.price,
            image: self.image,
            category: self.category,
            condition: self.condition,
            stock,
        })
    }
}

/// Admin product update body. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdateBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductsResponse {
    pub ok: bool,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub ok: bool,
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellResponse {
    pub ok: bool,
    pub message: String,
    pub product_id: ProductId,
}

/// Degraded storefront payload: the error envelope plus an empty shelf.
#[derive(Debug, Serialize, ToSchema)]
pub struct DegradedProductsResponse {
    pub ok: bool,
    pub message: String,
    pub products: Vec<Product>,
}

/// Resolve the caller into a catalogue viewer.
async fn viewer_for(state: &HttpState, session: &SessionContext) -> ApiResult<Viewer> {
    match session.user_id()? {
        None => Ok(Viewer::Public),
        Some(user_id) => {
            if state.accounts_query.ensure_admin(&user_id).await.is_ok() {
                Ok(Viewer::Admin)
            } else {
                Ok(Viewer::User(user_id))
            }
        }
    }
}

async fn require_admin(state: &HttpState, session: &SessionContext) -> ApiResult<UserId> {
    let user_id = session.require_user_id()?;
    state.accounts_query.ensure_admin(&user_id).await?;
    Ok(user_id)
}

/// Public storefront listing.
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Approved products, newest first", body = ProductsResponse),
        (status = 503, description = "Product store unavailable; empty products array included", body = DegradedProductsResponse)
    ),
    tags = ["products"]
)]
#[get("")]
pub async fn list_products(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    match state.catalog_query.public_catalog().await {
        Ok(products) => Ok(HttpResponse::Ok().json(ProductsResponse { ok: true, products })),
        Err(err) if err.code() == ErrorCode::ServiceUnavailable => {
            // Degrade with an empty shelf instead of a bare error.
            Ok(HttpResponse::ServiceUnavailable().json(DegradedProductsResponse {
                ok: false,
                message: err.message,
                products: Vec::new(),
            }))
        }
        Err(err) => Err(err),
    }
}

/// Submit a listing for admin approval.
#[utoipa::path(
    post,
    path = "/api/products/sell",
    request_body = ProductBody,
    responses(
        (status = 200, description = "Listing submitted", body = SellResponse),
        (status = 400, description = "Missing name/price or invalid stock", body = ErrorEnvelope),
        (status = 401, description = "No session", body = ErrorEnvelope)
    ),
    tags = ["products"]
)]
#[post("/sell")]
pub async fn sell_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<ProductBody>,
) -> ApiResult<HttpResponse> {
    let seller_id = session.require_user_id()?;
    let seller = state.accounts_query.fetch_profile(&seller_id).await?;
    let draft = body.into_inner().into_draft()?;
    let product = state
        .catalog
        .submit_listing(&seller_id, &seller.name, draft)
        .await?;
    Ok(HttpResponse::Ok().json(SellResponse {
        ok: true,
        message: "Listing submitted for admin approval".into(),
        product_id: product.id,
    }))
}

/// A seller's own approved and pending listings.
#[utoipa::path(
    get,
    path = "/api/products/user/{userId}",
    params(("userId" = String, Path, description = "Seller user id")),
    responses(
        (status = 200, description = "Seller listings", body = ProductsResponse),
        (status = 401, description = "No session", body = ErrorEnvelope),
        (status = 403, description = "Another user's listings", body = ErrorEnvelope)
    ),
    tags = ["products"]
)]
#[get("/user/{userId}")]
pub async fn seller_products(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let seller = params::user_id(&path)?;
    session.require_same_user(&seller)?;
    let products = state.catalog_query.seller_listings(&seller).await?;
    Ok(HttpResponse::Ok().json(ProductsResponse { ok: true, products }))
}

/// Single product, subject to visibility rules.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 404, description = "Unknown or hidden product", body = ErrorEnvelope)
    ),
    tags = ["products"]
)]
#[get("/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = params::product_id(&path)?;
    let viewer = viewer_for(&state, &session).await?;
    let product = state.catalog_query.fetch_product(&id, viewer).await?;
    Ok(HttpResponse::Ok().json(ProductResponse { ok: true, product }))
}

/// Create a product directly as approved (admin).
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductBody,
    responses(
        (status = 200, description = "Product created", body = ProductResponse),
        (status = 401, description = "No session", body = ErrorEnvelope),
        (status = 403, description = "Not an admin", body = ErrorEnvelope)
    ),
    tags = ["products"]
)]
#[post("")]
pub async fn create_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Json<ProductBody>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let draft = body.into_inner().into_draft()?;
    let product = state.catalog.create_product(draft).await?;
    Ok(HttpResponse::Ok().json(ProductResponse { ok: true, product }))
}

/// Update product fields (admin).
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    request_body = ProductUpdateBody,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 403, description = "Not an admin", body = ErrorEnvelope),
        (status = 404, description = "Unknown product", body = ErrorEnvelope)
    ),
    tags = ["products"]
)]
#[put("/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Json<ProductUpdateBody>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let id = params::product_id(&path)?;
    let body = body.into_inner();
    let stock = match body.stock {
        None => None,
        Some(value) => Some(
            u32::try_from(value)
                .map_err(|_| Error::invalid_request("Stock must be a non-negative number"))?,
        ),
    };
    let product = state
        .catalog
        .update_product(
            &id,
            ProductUpdate {
                name: body.name,
                description: body.description,
                price: body.price,
                image: body.image,
                category: body.category,
                condition: body.condition,
                stock,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(ProductResponse { ok: true, product }))
}

/// Delete a product (admin).
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 403, description = "Not an admin", body = ErrorEnvelope),
        (status = 404, description = "Unknown product", body = ErrorEnvelope)
    ),
    tags = ["products"]
)]
#[delete("/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_admin(&state, &session).await?;
    let id = params::product_id(&path)?;
    state.catalog.delete_product(&id).await?;
    Ok(HttpResponse::Ok().json(super::auth::AckResponse {
        ok: true,
        message: "Product deleted successfully".into(),
    }))
}
