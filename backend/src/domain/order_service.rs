//! Order service: atomic checkout, admin confirmation, and the WhatsApp
//! confirmation flow with its client-side fallback.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use super::ports::{
    CartRepository, CartRepositoryError, CatalogRepository, CatalogRepositoryError,
    ConfirmationMessage, ConfirmationOutcome, ConfirmationSendError, ConfirmationSender,
    CustomerRef, IdempotencyLookup, IdempotencyLookupResult, IdempotencyStore,
    IdempotencyStoreError, OrderCommand, OrderQuery, OrderRepository,
    OrderRepositoryError, OrderView, PlaceOrderRequest, PlacedOrder, UserRepository,
    UserRepositoryError,
};
use super::{
    canonicalize_and_hash, is_valid_e164, normalize_phone, ApiResult, Error, IdempotencyRecord,
    Order, OrderId, OrderItem, PayloadHash, Product, ProductId, UserId,
};
use chrono::Utc;

/// Implements the order driving ports over the order, cart, catalogue, and
/// user repositories plus the idempotency store and confirmation sender.
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    carts: Arc<dyn CartRepository>,
    catalog: Arc<dyn CatalogRepository>,
    users: Arc<dyn UserRepository>,
    idempotency: Arc<dyn IdempotencyStore>,
    confirmations: Arc<dyn ConfirmationSender>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        carts: Arc<dyn CartRepository>,
        catalog: Arc<dyn CatalogRepository>,
        users: Arc<dyn UserRepository>,
        idempotency: Arc<dyn IdempotencyStore>,
        confirmations: Arc<dyn ConfirmationSender>,
    ) -> Self {
        Self {
            orders,
            carts,
            catalog,
            users,
            idempotency,
            confirmations,
        }
    }

    async fn customer_ref(&self, user_id: &UserId) -> ApiResult<Option<CustomerRef>> {
        let user = self.users.find_by_id(user_id).await.map_err(user_store_error)?;
        Ok(user.map(|user| CustomerRef {
            name: user.name,
            email: user.email,
        }))
    }

    /// Join an order's items with their live product records. Products that
    /// have since been deleted leave `product` unset; the snapshotted price
    /// keeps the money maths intact.
    async fn joined_view(&self, order: Order, customer: Option<CustomerRef>) -> ApiResult<OrderView> {
        let mut products: HashMap<ProductId, Product> = HashMap::new();
        for item in &order.items {
            if !products.contains_key(&item.product_id) {
                if let Some(product) = self
                    .catalog
                    .find_by_id(&item.product_id)
                    .await
                    .map_err(catalog_store_error)?
                {
                    products.insert(item.product_id, product);
                }
            }
        }
        let mut view = OrderView::bare(order);
        for item in &mut view.items {
            item.product = products.get(&item.product_id).cloned();
        }
        view.customer = customer;
        Ok(view)
    }

    fn payload_hash(request: &PlaceOrderRequest) -> ApiResult<PayloadHash> {
        let address = serde_json::to_value(&request.shipping_address)
            .map_err(|err| Error::internal(err.to_string()))?;
        Ok(canonicalize_and_hash(&json!({
            "userId": request.user_id,
            "shippingAddress": address,
        })))
    }

    async fn replay_if_seen(
        &self,
        lookup: &IdempotencyLookup,
    ) -> ApiResult<Option<OrderView>> {
        match self
            .idempotency
            .lookup(lookup)
            .await
            .map_err(idempotency_store_error)?
        {
            IdempotencyLookupResult::NotFound => Ok(None),
            IdempotencyLookupResult::MatchingPayload(record) => {
                let view: OrderView = serde_json::from_value(record.response_snapshot)
                    .map_err(|err| Error::internal(err.to_string()))?;
                Ok(Some(view))
            }
            IdempotencyLookupResult::ConflictingPayload => Err(Error::conflict(
                "Idempotency key was already used with a different payload",
            )),
        }
    }

    /// Recording the outcome is best effort: the order is already committed,
    /// so a store failure downgrades retry safety but must not fail the
    /// request.
    async fn record_outcome(&self, record: IdempotencyRecord) {
        if let Err(err) = self.idempotency.store(&record).await {
            warn!(key = %record.key, error = %err, "failed to record idempotency outcome");
        }
    }

    fn confirmation_text(view: &OrderView, phone: &str) -> String {
        let items_text = view
            .items
            .iter()
            .map(|item| {
                let name = item
                    .product
                    .as_ref()
                    .map_or_else(|| item.product_id.to_string(), |p| p.name.clone());
                format!("{} x {} @ \u{20b9}{}", item.quantity, name, item.price)
            })
            .collect::<Vec<_>>()
            .join("\n");
        let address = &view.shipping_address;
        format!(
            "Order Confirmation\nOrder ID: {}\nTotal: \u{20b9}{}\n\nItems:\n{}\n\n\
             Shipping to: {}, {}, {} {}\nPhone: {}\n\nThank you for your order!",
            view.id, view.total, items_text, address.name, address.address, address.city,
            address.zip, phone
        )
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

fn catalog_store_error(err: CatalogRepositoryError) -> Error {
    match err {
        CatalogRepositoryError::Connection { .. } => {
            Error::service_unavailable("Product store is unavailable")
        }
        CatalogRepositoryError::Query { message } => Error::internal(message),
    }
}

fn order_store_error(err: OrderRepositoryError) -> Error {
    match err {
        OrderRepositoryError::Connection { .. } => {
            Error::service_unavailable("Order store is unavailable")
        }
        OrderRepositoryError::Query { message } => Error::internal(message),
        OrderRepositoryError::CartRevisionMismatch { .. } => {
            Error::conflict("Cart was modified during checkout; please retry")
        }
    }
}

fn user_store_error(err: UserRepositoryError) -> Error {
    match err {
        UserRepositoryError::Connection { .. } => {
            Error::service_unavailable("User store is unavailable")
        }
        UserRepositoryError::Query { message } => Error::internal(message),
        UserRepositoryError::DuplicateEmail { .. } => {
            Error::internal("unexpected duplicate email")
        }
    }
}

fn idempotency_store_error(err: IdempotencyStoreError) -> Error {
    match err {
        IdempotencyStoreError::Connection { .. } => {
            Error::service_unavailable("Idempotency store is unavailable")
        }
        IdempotencyStoreError::Query { message } => Error::internal(message),
        IdempotencyStoreError::DuplicateKey => {
            Error::conflict("Idempotency key was already recorded")
        }
    }
}

#[async_trait]
impl OrderCommand for OrderService {
    async fn place_order(&self, request: PlaceOrderRequest) -> ApiResult<PlacedOrder> {
        request.shipping_address.validate()?;

        let lookup = match request.idempotency_key {
            Some(key) => {
                let lookup = IdempotencyLookup {
                    key,
                    user_id: request.user_id,
                    payload_hash: Self::payload_hash(&request)?,
                };
                if let Some(view) = self.replay_if_seen(&lookup).await? {
                    return Ok(PlacedOrder {
                        order: view,
                        replayed: true,
                    });
                }
                Some(lookup)
            }
            None => None,
        };

        let cart = self
            .carts
            .find_by_user(&request.user_id)
            .await
            .map_err(cart_store_error)?
            .filter(|cart| !cart.is_empty())
            .ok_or_else(|| Error::invalid_request("Cart is empty"))?;

        let mut products: HashMap<ProductId, Product> = HashMap::new();
        let mut items = Vec::with_capacity(cart.items.len());
        for line in &cart.items {
            let product = self
                .catalog
                .find_by_id(&line.product_id)
                .await
                .map_err(catalog_store_error)?
                .ok_or_else(|| {
                    Error::invalid_request(format!(
                        "Product {} is no longer available",
                        line.product_id
                    ))
                })?;
            items.push(OrderItem {
                product_id: line.product_id,
                quantity: line.quantity,
                price: product.price,
            });
            products.insert(line.product_id, product);
        }

        let order = Order::create(request.user_id, items, request.shipping_address);
        self.orders
            .commit_checkout(&order, cart.revision)
            .await
            .map_err(order_store_error)?;

        let customer = self.customer_ref(&order.user_id).await?;
        let mut view = OrderView::bare(order);
        for item in &mut view.items {
            item.product = products.get(&item.product_id).cloned();
        }
        view.customer = customer;

        if let Some(lookup) = lookup {
            let snapshot =
                serde_json::to_value(&view).map_err(|err| Error::internal(err.to_string()))?;
            self.record_outcome(IdempotencyRecord {
                key: lookup.key,
                user_id: lookup.user_id,
                payload_hash: lookup.payload_hash,
                response_snapshot: snapshot,
                created_at: Utc::now(),
            })
            .await;
        }

        Ok(PlacedOrder {
            order: view,
            replayed: false,
        })
    }

    async fn confirm_order(&self, order_id: &OrderId) -> ApiResult<OrderView> {
        let mut order = self
            .orders
            .find_by_id(order_id)
            .await
            .map_err(order_store_error)?
            .ok_or_else(|| Error::not_found("Order not found"))?;
        order.confirm()?;
        self.orders.save(&order).await.map_err(order_store_error)?;
        let customer = self.customer_ref(&order.user_id).await?;
        self.joined_view(order, customer).await
    }

    async fn send_confirmation(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
    ) -> ApiResult<ConfirmationOutcome> {
        let order = self
            .orders
            .find_for_user(user_id, order_id)
            .await
            .map_err(order_store_error)?
            .ok_or_else(|| Error::not_found("Order not found"))?;
        let user = self.users.find_by_id(user_id).await.map_err(user_store_error)?;

        // Prefer the registered phone; fall back to the shipping address.
        let raw_phone = user
            .and_then(|user| user.phone)
            .filter(|phone| !phone.trim().is_empty())
            .unwrap_or_else(|| order.shipping_address.phone.clone());
        if raw_phone.trim().is_empty() {
            return Err(Error::invalid_request(
                "No phone number available to send WhatsApp confirmation",
            ));
        }
        let phone = normalize_phone(&raw_phone);
        if !is_valid_e164(&phone) {
            return Err(Error::invalid_request(
                "Phone number is not in a valid international format (expected E.164). \
                 Please update your phone number in profile.",
            ));
        }

        let view = self.joined_view(order, None).await?;
        let text = Self::confirmation_text(&view, &phone);

        match self
            .confirmations
            .send(&ConfirmationMessage {
                to: phone,
                body: text.clone(),
            })
            .await
        {
            Ok(receipt) => Ok(ConfirmationOutcome::Sent { sid: receipt.sid }),
            Err(ConfirmationSendError::Unconfigured) => {
                Ok(ConfirmationOutcome::Fallback { text })
            }
            Err(err) => Err(Error::internal(format!(
                "Failed to send WhatsApp confirmation: {err}"
            ))),
        }
    }
}

#[async_trait]
impl OrderQuery for OrderService {
    async fn list_for_user(&self, user_id: &UserId) -> ApiResult<Vec<OrderView>> {
        let orders = self
            .orders
            .list_for_user(user_id)
            .await
            .map_err(order_store_error)?;
        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            views.push(self.joined_view(order, None).await?);
        }
        Ok(views)
    }

    async fn fetch(&self, user_id: &UserId, order_id: &OrderId) -> ApiResult<OrderView> {
        let order = self
            .orders
            .find_for_user(user_id, order_id)
            .await
            .map_err(order_store_error)?
            .ok_or_else(|| Error::not_found("Order not found"))?;
        let customer = self.customer_ref(user_id).await?;
        self.joined_view(order, customer).await
    }

    async fn list_all(&self) -> ApiResult<Vec<OrderView>> {
        let orders = self.orders.list_all().await.map_err(order_store_error)?;
        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            let customer = self.customer_ref(&order.user_id).await?;
            views.push(self.joined_view(order, customer).await?);
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockCartRepository, MockCatalogRepository, MockConfirmationSender, MockIdempotencyStore,
        MockOrderRepository, MockUserRepository, SendReceipt,
    };
    use crate::domain::{
        Cart, ErrorCode, OrderStatus, ProductStatus, Role, ShippingAddress, User, DELIVERY_FEE,
    };
    use mockall::predicate::eq;

    fn address() -> ShippingAddress {
        ShippingAddress {
            name: "Asha".into(),
            phone: "+9779812345678".into(),
            address: "Thamel".into(),
            city: "Kathmandu".into(),
            zip: "44600".into(),
        }
    }

    fn product(id: ProductId, price: i64) -> Product {
        Product {
            id,
            name: "Kurta".into(),
            description: None,
            price,
            image: None,
            category: None,
            condition: None,
            stock: 5,
            status: Some(ProductStatus::Approved),
            seller_id: None,
            seller_name: None,
            approved_at: None,
            created_at: Utc::now(),
        }
    }

    fn customer(id: UserId) -> User {
        User {
            id,
            name: "Asha".into(),
            email: "asha@example.com".into(),
            password_hash: "hash".into(),
            phone: Some("+9779812345678".into()),
            address: None,
            city: None,
            zip: None,
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    struct Mocks {
        orders: MockOrderRepository,
        carts: MockCartRepository,
        catalog: MockCatalogRepository,
        users: MockUserRepository,
        idempotency: MockIdempotencyStore,
        confirmations: MockConfirmationSender,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                orders: MockOrderRepository::new(),
                carts: MockCartRepository::new(),
                catalog: MockCatalogRepository::new(),
                users: MockUserRepository::new(),
                idempotency: MockIdempotencyStore::new(),
                confirmations: MockConfirmationSender::new(),
            }
        }

        fn into_service(self) -> OrderService {
            OrderService::new(
                Arc::new(self.orders),
                Arc::new(self.carts),
                Arc::new(self.catalog),
                Arc::new(self.users),
                Arc::new(self.idempotency),
                Arc::new(self.confirmations),
            )
        }
    }

    #[tokio::test]
    async fn place_order_snapshots_prices_and_adds_delivery() {
        let user = UserId::random();
        let item = ProductId::random();
        let mut cart = Cart::new(user);
        cart.add(item, 2);
        let revision = cart.revision;

        let mut mocks = Mocks::new();
        mocks
            .carts
            .expect_find_by_user()
            .returning(move |_| Ok(Some(cart.clone())));
        mocks
            .catalog
            .expect_find_by_id()
            .returning(move |id| Ok(Some(product(*id, 100))));
        mocks
            .orders
            .expect_commit_checkout()
            .withf(move |order, expected| {
                *expected == revision
                    && order.subtotal == 200
                    && order.delivery == DELIVERY_FEE
                    && order.total == 250
                    && order.status == OrderStatus::Pending
            })
            .returning(|_, _| Ok(()));
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(customer(*id))));

        let placed = mocks
            .into_service()
            .place_order(PlaceOrderRequest {
                user_id: user,
                shipping_address: address(),
                idempotency_key: None,
            })
            .await
            .expect("order placed");

        assert!(!placed.replayed);
        assert_eq!(placed.order.total, 250);
        assert_eq!(placed.order.items[0].price, 100);
        assert_eq!(
            placed.order.customer.as_ref().map(|c| c.email.as_str()),
            Some("asha@example.com")
        );
    }

    #[tokio::test]
    async fn place_order_rejects_an_empty_cart() {
        let user = UserId::random();
        let mut mocks = Mocks::new();
        mocks
            .carts
            .expect_find_by_user()
            .returning(move |_| Ok(Some(Cart::new(user))));

        let err = mocks
            .into_service()
            .place_order(PlaceOrderRequest {
                user_id: user,
                shipping_address: address(),
                idempotency_key: None,
            })
            .await
            .expect_err("empty cart");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message, "Cart is empty");
    }

    #[tokio::test]
    async fn place_order_rejects_incomplete_addresses_before_loading_the_cart() {
        let mut incomplete = address();
        incomplete.city = String::new();

        let err = Mocks::new()
            .into_service()
            .place_order(PlaceOrderRequest {
                user_id: UserId::random(),
                shipping_address: incomplete,
                idempotency_key: None,
            })
            .await
            .expect_err("incomplete address");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn place_order_names_a_vanished_product() {
        let user = UserId::random();
        let item = ProductId::random();
        let mut cart = Cart::new(user);
        cart.add(item, 1);

        let mut mocks = Mocks::new();
        mocks
            .carts
            .expect_find_by_user()
            .returning(move |_| Ok(Some(cart.clone())));
        mocks.catalog.expect_find_by_id().returning(|_| Ok(None));

        let err = mocks
            .into_service()
            .place_order(PlaceOrderRequest {
                user_id: user,
                shipping_address: address(),
                idempotency_key: None,
            })
            .await
            .expect_err("vanished product");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message.contains(&item.to_string()));
    }

    #[tokio::test]
    async fn place_order_maps_revision_mismatch_to_conflict() {
        let user = UserId::random();
        let item = ProductId::random();
        let mut cart = Cart::new(user);
        cart.add(item, 1);

        let mut mocks = Mocks::new();
        mocks
            .carts
            .expect_find_by_user()
            .returning(move |_| Ok(Some(cart.clone())));
        mocks
            .catalog
            .expect_find_by_id()
            .returning(move |id| Ok(Some(product(*id, 100))));
        mocks.orders.expect_commit_checkout().returning(|_, _| {
            Err(OrderRepositoryError::CartRevisionMismatch {
                expected: 2,
                actual: 3,
            })
        });

        let err = mocks
            .into_service()
            .place_order(PlaceOrderRequest {
                user_id: user,
                shipping_address: address(),
                idempotency_key: None,
            })
            .await
            .expect_err("stale revision");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn place_order_replays_a_matching_idempotency_key() {
        let user = UserId::random();
        let key = crate::domain::IdempotencyKey::random();
        let stored = OrderView::bare(Order::create(
            user,
            vec![OrderItem {
                product_id: ProductId::random(),
                quantity: 1,
                price: 100,
            }],
            address(),
        ));
        let snapshot = serde_json::to_value(&stored).expect("snapshot");

        let mut mocks = Mocks::new();
        mocks.idempotency.expect_lookup().returning(move |_| {
            Ok(IdempotencyLookupResult::MatchingPayload(IdempotencyRecord {
                key,
                user_id: user,
                payload_hash: canonicalize_and_hash(&json!({})),
                response_snapshot: snapshot.clone(),
                created_at: Utc::now(),
            }))
        });
        // No cart read, no commit: the stored response is returned as is.

        let placed = mocks
            .into_service()
            .place_order(PlaceOrderRequest {
                user_id: user,
                shipping_address: address(),
                idempotency_key: Some(key),
            })
            .await
            .expect("replayed");
        assert!(placed.replayed);
        assert_eq!(placed.order.id, stored.id);
    }

    #[tokio::test]
    async fn place_order_rejects_key_reuse_with_a_different_payload() {
        let mut mocks = Mocks::new();
        mocks
            .idempotency
            .expect_lookup()
            .returning(|_| Ok(IdempotencyLookupResult::ConflictingPayload));

        let err = mocks
            .into_service()
            .place_order(PlaceOrderRequest {
                user_id: UserId::random(),
                shipping_address: address(),
                idempotency_key: Some(crate::domain::IdempotencyKey::random()),
            })
            .await
            .expect_err("conflicting payload");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn place_order_records_the_outcome_for_fresh_keys() {
        let user = UserId::random();
        let key = crate::domain::IdempotencyKey::random();
        let item = ProductId::random();
        let mut cart = Cart::new(user);
        cart.add(item, 1);

        let mut mocks = Mocks::new();
        mocks
            .idempotency
            .expect_lookup()
            .returning(|_| Ok(IdempotencyLookupResult::NotFound));
        mocks
            .idempotency
            .expect_store()
            .withf(move |record| record.key == key && record.user_id == user)
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .carts
            .expect_find_by_user()
            .returning(move |_| Ok(Some(cart.clone())));
        mocks
            .catalog
            .expect_find_by_id()
            .returning(move |id| Ok(Some(product(*id, 100))));
        mocks.orders.expect_commit_checkout().returning(|_, _| Ok(()));
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(customer(*id))));

        let placed = mocks
            .into_service()
            .place_order(PlaceOrderRequest {
                user_id: user,
                shipping_address: address(),
                idempotency_key: Some(key),
            })
            .await
            .expect("placed");
        assert!(!placed.replayed);
    }

    #[tokio::test]
    async fn confirm_order_persists_the_transition() {
        let order = Order::create(
            UserId::random(),
            vec![OrderItem {
                product_id: ProductId::random(),
                quantity: 1,
                price: 100,
            }],
            address(),
        );
        let id = order.id;

        let mut mocks = Mocks::new();
        let seeded = order.clone();
        mocks
            .orders
            .expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(seeded.clone())));
        mocks
            .orders
            .expect_save()
            .withf(|order| order.status == OrderStatus::Confirmed)
            .times(1)
            .returning(|_| Ok(()));
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(customer(*id))));
        mocks.catalog.expect_find_by_id().returning(|_| Ok(None));

        let view = mocks
            .into_service()
            .confirm_order(&id)
            .await
            .expect("confirmed");
        assert_eq!(view.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn confirm_order_rejects_non_pending_orders() {
        let mut order = Order::create(
            UserId::random(),
            vec![OrderItem {
                product_id: ProductId::random(),
                quantity: 1,
                price: 100,
            }],
            address(),
        );
        order.confirm().expect("first confirmation");
        let id = order.id;

        let mut mocks = Mocks::new();
        let seeded = order.clone();
        mocks
            .orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(seeded.clone())));

        let err = mocks
            .into_service()
            .confirm_order(&id)
            .await
            .expect_err("already confirmed");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    fn seeded_order(user: UserId) -> Order {
        Order::create(
            user,
            vec![OrderItem {
                product_id: ProductId::random(),
                quantity: 2,
                price: 100,
            }],
            address(),
        )
    }

    #[tokio::test]
    async fn send_confirmation_uses_the_provider_when_configured() {
        let user = UserId::random();
        let order = seeded_order(user);
        let id = order.id;

        let mut mocks = Mocks::new();
        let seeded = order.clone();
        mocks
            .orders
            .expect_find_for_user()
            .returning(move |_, _| Ok(Some(seeded.clone())));
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(customer(*id))));
        mocks
            .catalog
            .expect_find_by_id()
            .returning(move |id| Ok(Some(product(*id, 100))));
        mocks
            .confirmations
            .expect_send()
            .withf(|message| {
                message.to == "+9779812345678" && message.body.starts_with("Order Confirmation")
            })
            .returning(|_| Ok(SendReceipt { sid: "SM123".into() }));

        let outcome = mocks
            .into_service()
            .send_confirmation(&user, &id)
            .await
            .expect("sent");
        assert_eq!(outcome, ConfirmationOutcome::Sent { sid: "SM123".into() });
    }

    #[tokio::test]
    async fn send_confirmation_falls_back_when_unconfigured() {
        let user = UserId::random();
        let order = seeded_order(user);
        let id = order.id;
        let total = order.total;

        let mut mocks = Mocks::new();
        let seeded = order.clone();
        mocks
            .orders
            .expect_find_for_user()
            .returning(move |_, _| Ok(Some(seeded.clone())));
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(customer(*id))));
        mocks
            .catalog
            .expect_find_by_id()
            .returning(move |id| Ok(Some(product(*id, 100))));
        mocks
            .confirmations
            .expect_send()
            .returning(|_| Err(ConfirmationSendError::Unconfigured));

        let outcome = mocks
            .into_service()
            .send_confirmation(&user, &id)
            .await
            .expect("fallback");
        let ConfirmationOutcome::Fallback { text } = outcome else {
            panic!("expected fallback text");
        };
        assert!(text.contains(&format!("Total: \u{20b9}{total}")));
        assert!(text.contains("2 x Kurta @ \u{20b9}100"));
        assert!(text.ends_with("Thank you for your order!"));
    }

    #[tokio::test]
    async fn send_confirmation_normalises_local_phone_numbers() {
        let user = UserId::random();
        let order = seeded_order(user);
        let id = order.id;

        let mut mocks = Mocks::new();
        let seeded = order.clone();
        mocks
            .orders
            .expect_find_for_user()
            .returning(move |_, _| Ok(Some(seeded.clone())));
        mocks.users.expect_find_by_id().returning(|id| {
            let mut user = customer(*id);
            user.phone = Some("98-123 45678".into());
            Ok(Some(user))
        });
        mocks
            .catalog
            .expect_find_by_id()
            .returning(move |id| Ok(Some(product(*id, 100))));
        mocks
            .confirmations
            .expect_send()
            .withf(|message| message.to == "+9779812345678")
            .returning(|_| Ok(SendReceipt { sid: "SM9".into() }));

        mocks
            .into_service()
            .send_confirmation(&user, &id)
            .await
            .expect("normalised and sent");
    }

    #[tokio::test]
    async fn send_confirmation_rejects_invalid_phone_numbers() {
        let user = UserId::random();
        let mut order = seeded_order(user);
        order.shipping_address.phone = "12345".into();
        let id = order.id;

        let mut mocks = Mocks::new();
        let seeded = order.clone();
        mocks
            .orders
            .expect_find_for_user()
            .returning(move |_, _| Ok(Some(seeded.clone())));
        mocks.users.expect_find_by_id().returning(|id| {
            let mut user = customer(*id);
            user.phone = None;
            Ok(Some(user))
        });

        let err = mocks
            .into_service()
            .send_confirmation(&user, &id)
            .await
            .expect_err("invalid phone");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message.contains("E.164"));
    }
}
