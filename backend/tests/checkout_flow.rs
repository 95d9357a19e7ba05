//! End-to-end tests over the HTTP surface with the real in-memory store.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::Utc;
use serde_json::{json, Value};

use backend::domain::account_service::AccountService;
use backend::domain::cart_service::CartService;
use backend::domain::catalog_service::CatalogService;
use backend::domain::order_service::OrderService;
use backend::domain::ports::{
    CatalogRepository, OrderRepository, Sha256PasswordHasher, UnconfiguredConfirmationSender,
    UserRepository,
};
use backend::domain::{
    Order, OrderItem, Product, ProductId, ProductStatus, Role, ShippingAddress, UserId,
};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::MemoryStore;
use backend::server::configure_api;

fn state_over(store: &Arc<MemoryStore>) -> HttpState {
    let hasher = Arc::new(Sha256PasswordHasher);
    let accounts = Arc::new(AccountService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        hasher,
    ));
    let carts = Arc::new(CartService::new(store.clone(), store.clone()));
    let catalog = Arc::new(CatalogService::new(store.clone()));
    let orders = Arc::new(OrderService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(UnconfiguredConfirmationSender),
    ));
    HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        accounts_query: accounts,
        carts: carts.clone(),
        carts_query: carts,
        orders: orders.clone(),
        orders_query: orders,
        catalog: catalog.clone(),
        catalog_query: catalog,
    })
}

fn app_over(
    store: &Arc<MemoryStore>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(state_over(store)))
        .service(web::scope("/api").wrap(session).configure(configure_api))
}

async fn register(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    email: &str,
) -> (UserId, Cookie<'static>) {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "name": "Asha",
                "email": email,
                "password": "hunter2",
                "phone": "9812345678"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();
    let body: Value = test::read_body_json(res).await;
    let user_id = body["userId"]
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .map(UserId::from_uuid)
        .expect("user id");
    (user_id, cookie)
}

fn approved_product(price: i64) -> Product {
    Product {
        id: ProductId::random(),
        name: "Saree".into(),
        description: None,
        price,
        image: None,
        category: Some("Women".into()),
        condition: None,
        stock: 10,
        status: Some(ProductStatus::Approved),
        seller_id: None,
        seller_name: None,
        approved_at: Some(Utc::now()),
        created_at: Utc::now(),
    }
}

fn shipping_address() -> Value {
    json!({
        "name": "Asha",
        "phone": "+9779812345678",
        "address": "12 Lakeside",
        "city": "Pokhara",
        "zip": "33700"
    })
}

async fn promote_to_admin(store: &Arc<MemoryStore>, user_id: &UserId) {
    let mut user = UserRepository::find_by_id(store.as_ref(), user_id)
        .await
        .expect("find user")
        .expect("registered user");
    user.role = Role::Admin;
    UserRepository::update(store.as_ref(), &user)
        .await
        .expect("promote user");
}

#[actix_web::test]
async fn checkout_snapshots_prices_and_clears_the_cart() {
    let store = Arc::new(MemoryStore::new());
    let app = test::init_service(app_over(&store)).await;
    let (user_id, cookie) = register(&app, "asha@example.com").await;

    let product = approved_product(100);
    CatalogRepository::insert(store.as_ref(), &product)
        .await
        .expect("seed product");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/{user_id}/add"))
            .cookie(cookie.clone())
            .set_json(json!({ "productId": product.id.to_string(), "quantity": 2 }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/orders/{user_id}/create"))
            .cookie(cookie.clone())
            .set_json(json!({ "shippingAddress": shipping_address() }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["ok"], Value::Bool(true));
    assert_eq!(body["order"]["subtotal"], 200);
    assert_eq!(body["order"]["delivery"], 50);
    assert_eq!(body["order"]["total"], 250);
    assert_eq!(body["order"]["status"], "pending");
    assert_eq!(body["order"]["paymentMethod"], "cash_on_delivery");

    // Checkout cleared the cart.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/cart/{user_id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["cart"]["items"], json!([]));
}

#[actix_web::test]
async fn checkout_with_an_empty_cart_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let app = test::init_service(app_over(&store)).await;
    let (user_id, cookie) = register(&app, "asha@example.com").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/orders/{user_id}/create"))
            .cookie(cookie)
            .set_json(json!({ "shippingAddress": shipping_address() }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Cart is empty");
}

#[actix_web::test]
async fn idempotency_key_replays_instead_of_reordering() {
    let store = Arc::new(MemoryStore::new());
    let app = test::init_service(app_over(&store)).await;
    let (user_id, cookie) = register(&app, "asha@example.com").await;

    let product = approved_product(100);
    CatalogRepository::insert(store.as_ref(), &product)
        .await
        .expect("seed product");
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/{user_id}/add"))
            .cookie(cookie.clone())
            .set_json(json!({ "productId": product.id.to_string(), "quantity": 1 }))
            .to_request(),
    )
    .await;

    let key = uuid::Uuid::new_v4().to_string();
    let checkout = || {
        test::TestRequest::post()
            .uri(&format!("/api/orders/{user_id}/create"))
            .cookie(cookie.clone())
            .insert_header(("Idempotency-Key", key.clone()))
            .set_json(json!({ "shippingAddress": shipping_address() }))
            .to_request()
    };

    let first = test::call_service(&app, checkout()).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first_body: Value = test::read_body_json(first).await;
    assert_eq!(first_body["replayed"], Value::Bool(false));

    // Same key, same payload: the stored response is replayed even though
    // the cart is now empty.
    let second = test::call_service(&app, checkout()).await;
    assert_eq!(second.status(), StatusCode::OK);
    let second_body: Value = test::read_body_json(second).await;
    assert_eq!(second_body["replayed"], Value::Bool(true));
    assert_eq!(second_body["order"]["id"], first_body["order"]["id"]);

    let orders = OrderRepository::list_all(store.as_ref())
        .await
        .expect("list orders");
    assert_eq!(orders.len(), 1);
}

#[actix_web::test]
async fn idempotency_key_reuse_with_a_different_payload_conflicts() {
    let store = Arc::new(MemoryStore::new());
    let app = test::init_service(app_over(&store)).await;
    let (user_id, cookie) = register(&app, "asha@example.com").await;

    let product = approved_product(100);
    CatalogRepository::insert(store.as_ref(), &product)
        .await
        .expect("seed product");
    test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/cart/{user_id}/add"))
            .cookie(cookie.clone())
            .set_json(json!({ "productId": product.id.to_string(), "quantity": 1 }))
            .to_request(),
    )
    .await;

    let key = uuid::Uuid::new_v4().to_string();
    let first = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/orders/{user_id}/create"))
            .cookie(cookie.clone())
            .insert_header(("Idempotency-Key", key.clone()))
            .set_json(json!({ "shippingAddress": shipping_address() }))
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let mut other_address = shipping_address();
    other_address["city"] = json!("Kathmandu");
    let second = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/orders/{user_id}/create"))
            .cookie(cookie)
            .insert_header(("Idempotency-Key", key))
            .set_json(json!({ "shippingAddress": other_address }))
            .to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["code"], "conflict");
}

#[actix_web::test]
async fn legacy_products_without_status_stay_publicly_listed() {
    let store = Arc::new(MemoryStore::new());
    let app = test::init_service(app_over(&store)).await;

    let mut legacy = approved_product(500);
    legacy.status = None;
    legacy.approved_at = None;
    CatalogRepository::insert(store.as_ref(), &legacy)
        .await
        .expect("seed product");

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/products").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["products"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["products"][0]["id"], legacy.id.to_string());
}

#[actix_web::test]
async fn listing_submission_hides_until_admin_approval() {
    let store = Arc::new(MemoryStore::new());
    let app = test::init_service(app_over(&store)).await;
    let (_, seller_cookie) = register(&app, "seller@example.com").await;
    let (admin_id, admin_cookie) = register(&app, "admin@example.com").await;
    promote_to_admin(&store, &admin_id).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/products/sell")
            .cookie(seller_cookie)
            .set_json(json!({ "name": "Saree", "price": 1299, "stock": 3 }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let product_id = body["productId"].as_str().expect("product id").to_owned();

    // Hidden from the storefront while pending.
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/products").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["products"], json!([]));

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/admin/products/{product_id}/approve"))
            .cookie(admin_cookie)
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Product approved");
    assert!(body["product"]["approvedAt"].is_string());

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/products").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["products"][0]["id"], product_id);
}

#[actix_web::test]
async fn confirming_an_order_twice_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let app = test::init_service(app_over(&store)).await;
    let (buyer_id, _) = register(&app, "asha@example.com").await;
    let (admin_id, admin_cookie) = register(&app, "admin@example.com").await;
    promote_to_admin(&store, &admin_id).await;

    let order = Order::create(
        buyer_id,
        vec![OrderItem {
            product_id: ProductId::random(),
            quantity: 1,
            price: 100,
        }],
        ShippingAddress {
            name: "Asha".into(),
            phone: "+9779812345678".into(),
            address: "12 Lakeside".into(),
            city: "Pokhara".into(),
            zip: "33700".into(),
        },
    );
    OrderRepository::save(store.as_ref(), &order)
        .await
        .expect("seed order");

    let confirm_uri = format!("/api/admin/orders/{}/confirm", order.id);
    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&confirm_uri)
            .cookie(admin_cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Order confirmed");
    assert_eq!(body["order"]["status"], "confirmed");

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&confirm_uri)
            .cookie(admin_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Only pending orders can be confirmed");
}

#[actix_web::test]
async fn admin_endpoints_reject_regular_users() {
    let store = Arc::new(MemoryStore::new());
    let app = test::init_service(app_over(&store)).await;
    let (_, cookie) = register(&app, "asha@example.com").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/admin/dashboard")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Admin access required");
}
