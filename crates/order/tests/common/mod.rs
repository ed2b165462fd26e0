#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use order_engine::{
    abstract_trait::{
        gateway::{PaymentGatewayTrait, PaymentIntent, RefundReceipt},
        notifier::StatusNotifierTrait,
        order::{
            repository::{AssignOutcome, DynOrderCommandRepository, OrderCommandRepositoryTrait},
            service::OrderCommandServiceTrait,
        },
        product::{DynProductCommandRepository, ProductCommandRepositoryTrait},
    },
    domain::{
        actor::Actor,
        event::OrderEvent,
        requests::{
            order::{Address, CreateOrderLineRequest, CreateOrderRequest, PaymentProof},
            payment::CreatePaymentIntentRequest,
        },
        status::PaymentMethod,
        stock::{StockDelta, StockLine, StockUpdateOutcome},
    },
    gateway::{sign_payment, verify_payment_signature},
    model::{
        order::{Order, OrderPatch, StatusHistoryEntry},
        payment::PaymentIntentRecord,
        product::Product,
    },
    repository::InMemoryStore,
    service::order::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService, OrderSettings},
};
use prometheus_client::registry::Registry;
use shared::errors::{RepositoryError, ServiceError};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

pub const GATEWAY_SECRET: &str = "test-gateway-secret";

// verifies real HMAC signatures, refunds on demand
#[derive(Default)]
pub struct ScriptedGateway {
    pub fail_refunds: AtomicBool,
    pub fail_intents: AtomicBool,
    pub refunds: Mutex<Vec<(String, i64)>>,
}

impl ScriptedGateway {
    pub fn refunds(&self) -> Vec<(String, i64)> {
        self.refunds.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGatewayTrait for ScriptedGateway {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentIntent, ServiceError> {
        if self.fail_intents.load(Ordering::SeqCst) {
            return Err(ServiceError::Gateway {
                message: "timed out".into(),
                retryable: true,
            });
        }

        Ok(PaymentIntent {
            intent_id: format!("order_{receipt}"),
            amount,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
            checkout_payload: serde_json::json!({ "amount": amount * 100 }),
        })
    }

    fn verify(&self, proof: &PaymentProof) -> Result<(), ServiceError> {
        if verify_payment_signature(
            GATEWAY_SECRET,
            &proof.intent_id,
            &proof.payment_id,
            &proof.signature,
        ) {
            Ok(())
        } else {
            Err(ServiceError::PaymentVerificationFailed)
        }
    }

    async fn refund(&self, payment_id: &str, amount: i64) -> Result<RefundReceipt, ServiceError> {
        if self.fail_refunds.load(Ordering::SeqCst) {
            return Err(ServiceError::Gateway {
                message: "refund endpoint returned 502".into(),
                retryable: false,
            });
        }

        self.refunds
            .lock()
            .unwrap()
            .push((payment_id.to_string(), amount));

        Ok(RefundReceipt {
            refund_id: format!("rfnd_{payment_id}"),
            amount,
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<OrderEvent>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<OrderEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl StatusNotifierTrait for RecordingNotifier {
    fn notify(&self, event: OrderEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Order store whose inserts always fail, everything else delegates.
pub struct BrokenInsertStore(pub InMemoryStore);

#[async_trait]
impl OrderCommandRepositoryTrait for BrokenInsertStore {
    async fn create_order(&self, _order: &Order) -> Result<Order, RepositoryError> {
        Err(RepositoryError::Custom("insert rejected".into()))
    }

    async fn record_intent(&self, intent: &PaymentIntentRecord) -> Result<(), RepositoryError> {
        self.0.record_intent(intent).await
    }

    async fn conditional_update_order(
        &self,
        id: Uuid,
        expected_version: i64,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepositoryError> {
        self.0.conditional_update_order(id, expected_version, patch).await
    }

    async fn assign_worker(
        &self,
        order_id: Uuid,
        worker_id: Uuid,
        entry: &StatusHistoryEntry,
    ) -> Result<AssignOutcome, RepositoryError> {
        self.0.assign_worker(order_id, worker_id, entry).await
    }

    async fn cancel_and_release(
        &self,
        id: Uuid,
        expected_version: i64,
        patch: &OrderPatch,
        release: &[StockLine],
    ) -> Result<Option<Order>, RepositoryError> {
        self.0.cancel_and_release(id, expected_version, patch, release).await
    }
}

/// Stock store that reserves normally but fails every release.
pub struct BrokenReleaseStore(pub InMemoryStore);

#[async_trait]
impl ProductCommandRepositoryTrait for BrokenReleaseStore {
    async fn conditional_update_product_stock(
        &self,
        deltas: &[StockDelta],
    ) -> Result<StockUpdateOutcome, RepositoryError> {
        if deltas.iter().any(|d| d.delta > 0) {
            return Err(RepositoryError::Custom("stock release rejected".into()));
        }
        self.0.conditional_update_product_stock(deltas).await
    }
}

/// Order store whose cancel write fails while `fail_cancels` is set.
pub struct FlakyCancelStore {
    pub inner: InMemoryStore,
    pub fail_cancels: AtomicBool,
}

#[async_trait]
impl OrderCommandRepositoryTrait for FlakyCancelStore {
    async fn create_order(&self, order: &Order) -> Result<Order, RepositoryError> {
        self.inner.create_order(order).await
    }

    async fn record_intent(&self, intent: &PaymentIntentRecord) -> Result<(), RepositoryError> {
        self.inner.record_intent(intent).await
    }

    async fn conditional_update_order(
        &self,
        id: Uuid,
        expected_version: i64,
        patch: &OrderPatch,
    ) -> Result<Option<Order>, RepositoryError> {
        self.inner.conditional_update_order(id, expected_version, patch).await
    }

    async fn assign_worker(
        &self,
        order_id: Uuid,
        worker_id: Uuid,
        entry: &StatusHistoryEntry,
    ) -> Result<AssignOutcome, RepositoryError> {
        self.inner.assign_worker(order_id, worker_id, entry).await
    }

    async fn cancel_and_release(
        &self,
        id: Uuid,
        expected_version: i64,
        patch: &OrderPatch,
        release: &[StockLine],
    ) -> Result<Option<Order>, RepositoryError> {
        if self.fail_cancels.load(Ordering::SeqCst) {
            return Err(RepositoryError::Custom("connection reset during cancel".into()));
        }
        self.inner.cancel_and_release(id, expected_version, patch, release).await
    }
}

pub struct Engine {
    pub store: InMemoryStore,
    pub gateway: Arc<ScriptedGateway>,
    pub notifier: Arc<RecordingNotifier>,
    pub command: OrderCommandService,
    pub query: OrderQueryService,
}

impl Engine {
    pub async fn new(shipping_fee: i64) -> Self {
        let store = InMemoryStore::new();
        Self::with_stores(
            store.clone(),
            Arc::new(store.clone()),
            Arc::new(store),
            shipping_fee,
        )
        .await
    }

    pub async fn with_broken_inserts(shipping_fee: i64) -> Self {
        let store = InMemoryStore::new();
        Self::with_stores(
            store.clone(),
            Arc::new(store.clone()),
            Arc::new(BrokenInsertStore(store)),
            shipping_fee,
        )
        .await
    }

    pub async fn with_stores(
        store: InMemoryStore,
        product_command: DynProductCommandRepository,
        order_command: DynOrderCommandRepository,
        shipping_fee: i64,
    ) -> Self {
        let gateway = Arc::new(ScriptedGateway::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let registry = Arc::new(AsyncMutex::new(Registry::default()));

        let command = OrderCommandService::new(OrderCommandServiceDeps {
            product_query: Arc::new(store.clone()),
            product_command,
            query: Arc::new(store.clone()),
            command: order_command,
            gateway: gateway.clone(),
            notifier: notifier.clone(),
            settings: OrderSettings {
                shipping_fee,
                currency: "INR".into(),
            },
            registry: registry.clone(),
        })
        .await;
        let query = OrderQueryService::new(Arc::new(store.clone()), registry).await;

        Self {
            store,
            gateway,
            notifier,
            command,
            query,
        }
    }

    pub fn add_product(&self, name: &str, price: i64, quantity: i32) -> Product {
        let product = product(name, price, quantity);
        self.store.upsert_product(product.clone()).unwrap();
        product
    }

    pub fn stock(&self, product_id: Uuid) -> (i32, i32) {
        let p = self.store.product(product_id).unwrap().unwrap();
        (p.quantity, p.sold)
    }

    pub fn order(&self, order_id: Uuid) -> Order {
        self.store.order(order_id).unwrap().unwrap()
    }

    /// Opens an intent for `lines` and signs the capture the way the
    /// provider's checkout would.
    pub async fn pay_for(
        &self,
        buyer: &Actor,
        lines: Vec<CreateOrderLineRequest>,
        payment_id: &str,
    ) -> PaymentProof {
        let intent = self
            .command
            .create_payment_intent(buyer, &CreatePaymentIntentRequest { lines })
            .await
            .unwrap()
            .data;
        signed_proof(&intent.intent_id, payment_id)
    }
}

pub fn product(name: &str, price: i64, quantity: i32) -> Product {
    Product {
        product_id: Uuid::new_v4(),
        name: name.to_string(),
        description: format!("{name} description"),
        weight: Some(0.5),
        price,
        quantity,
        sold: 0,
        category_id: Some(Uuid::new_v4()),
        category_name: Some("General".into()),
        seller_id: Some(Uuid::new_v4()),
        seller_name: Some("Acme Traders".into()),
        image_id: Some("img-1".into()),
        image_url: Some(format!("https://cdn.example/{name}.png")),
        status: "approved".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn address() -> Address {
    Address {
        full_name: "Ada Buyer".into(),
        phone: "5550100".into(),
        line1: "1 Main St".into(),
        line2: None,
        city: "Springfield".into(),
        state: "IL".into(),
        postal_code: "62701".into(),
        country: "US".into(),
    }
}

pub fn line(product_id: Uuid, qty: i32) -> CreateOrderLineRequest {
    CreateOrderLineRequest {
        product_id,
        qty,
        price: None,
    }
}

pub fn cod_request(lines: Vec<CreateOrderLineRequest>) -> CreateOrderRequest {
    CreateOrderRequest {
        lines,
        address: address(),
        payment_method: PaymentMethod::Cod,
        payment_proof: None,
    }
}

pub fn signed_proof(intent_id: &str, payment_id: &str) -> PaymentProof {
    PaymentProof {
        intent_id: intent_id.into(),
        payment_id: payment_id.into(),
        signature: sign_payment(GATEWAY_SECRET, intent_id, payment_id).unwrap(),
    }
}

pub fn online_request(
    lines: Vec<CreateOrderLineRequest>,
    proof: PaymentProof,
) -> CreateOrderRequest {
    CreateOrderRequest {
        lines,
        address: address(),
        payment_method: PaymentMethod::Online,
        payment_proof: Some(proof),
    }
}

pub fn buyer() -> Actor {
    Actor::buyer(Uuid::new_v4())
}

pub fn worker() -> Actor {
    Actor::worker(Uuid::new_v4())
}
