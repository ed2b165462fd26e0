mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use common::{RecordingNotifier, ScriptedGateway, product, signed_proof};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use order_engine::{
    di::DependenciesInjectDeps, handler::AppRouter, model::product::Product,
    repository::InMemoryStore, service::order::OrderSettings, state::AppState,
};
use serde_json::{Value, json};
use shared::config::Claims;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

const JWT_SECRET: &str = "http-test-secret";

struct TestApp {
    router: Router,
    store: InMemoryStore,
}

impl TestApp {
    async fn new() -> Self {
        let store = InMemoryStore::new();
        let deps = DependenciesInjectDeps::in_memory(
            store.clone(),
            Arc::new(ScriptedGateway::default()),
            Arc::new(RecordingNotifier::default()),
            OrderSettings {
                shipping_fee: 1,
                currency: "INR".into(),
            },
        );
        let state = AppState::from_deps(deps, JWT_SECRET).await;

        Self {
            router: AppRouter::build(state),
            store,
        }
    }

    fn add_product(&self, price: i64, quantity: i32) -> Product {
        let product = product("kettle", price, quantity);
        self.store.upsert_product(product.clone()).unwrap();
        product
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

fn token(subject: Uuid, role: &str) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: subject,
        role: role.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(10)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn order_body(product_id: Uuid, qty: i32) -> Value {
    json!({
        "lines": [{ "productId": { "_id": product_id }, "qty": qty }],
        "address": {
            "fullName": "Ada Buyer",
            "phone": "5550100",
            "line1": "1 Main St",
            "city": "Springfield",
            "state": "IL",
            "postalCode": "62701",
            "country": "US"
        },
        "paymentMethod": "COD"
    })
}

#[tokio::test]
async fn requests_without_a_token_are_rejected() {
    let app = TestApp::new().await;
    let p1 = app.add_product(100, 5);

    let (status, body) = app
        .send(post_json("/api/orders", None, order_body(p1.product_id, 1)))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn buyer_places_and_reads_an_order() {
    let app = TestApp::new().await;
    let p1 = app.add_product(100, 5);
    let buyer = token(Uuid::new_v4(), "buyer");

    let (status, body) = app
        .send(post_json("/api/orders", Some(&buyer), order_body(p1.product_id, 2)))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["total"], 201);
    assert_eq!(body["data"]["status"], "OrderPlaced");
    assert_eq!(body["data"]["lines"][0]["snapshot"]["snapshotVersion"], "2.0");

    let order_id = body["data"]["orderId"].as_str().unwrap().to_string();
    let (status, body) = app.send(get(&format!("/api/orders/{order_id}"), &buyer)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["orderId"], order_id.as_str());

    let (status, body) = app.send(get("/api/orders/mine", &buyer)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn out_of_stock_names_the_product() {
    let app = TestApp::new().await;
    let p1 = app.add_product(100, 1);
    let buyer = token(Uuid::new_v4(), "buyer");

    let (status, body) = app
        .send(post_json("/api/orders", Some(&buyer), order_body(p1.product_id, 3)))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "OUT_OF_STOCK");
    assert_eq!(body["productId"], p1.product_id.to_string());
}

#[tokio::test]
async fn invalid_bodies_fail_validation() {
    let app = TestApp::new().await;
    let p1 = app.add_product(100, 5);
    let buyer = token(Uuid::new_v4(), "buyer");

    let (status, body) = app
        .send(post_json("/api/orders", Some(&buyer), order_body(p1.product_id, 0)))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn forged_payment_is_a_bad_request() {
    let app = TestApp::new().await;
    let p1 = app.add_product(100, 5);
    let buyer = token(Uuid::new_v4(), "buyer");

    let mut proof = signed_proof("order_1", "pay_1");
    proof.signature = "00".repeat(32);
    let mut body = order_body(p1.product_id, 1);
    body["paymentMethod"] = json!("Online");
    body["paymentProof"] = serde_json::to_value(proof).unwrap();

    let (status, body) = app.send(post_json("/api/orders", Some(&buyer), body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PAYMENT_VERIFICATION_FAILED");
}

#[tokio::test]
async fn worker_flow_over_http() {
    let app = TestApp::new().await;
    let p1 = app.add_product(100, 5);
    let buyer = token(Uuid::new_v4(), "buyer");
    let worker = token(Uuid::new_v4(), "worker");

    let (_, body) = app
        .send(post_json("/api/orders", Some(&buyer), order_body(p1.product_id, 1)))
        .await;
    let order_id = body["data"]["orderId"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(post_json(&format!("/api/orders/{order_id}/assign"), Some(&worker), json!({})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Confirmed");

    let (status, body) = app
        .send(post_json(
            &format!("/api/orders/{order_id}/assign"),
            Some(&token(Uuid::new_v4(), "worker")),
            json!({}),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_ASSIGNED");

    let (status, body) = app.send(get("/api/orders/worker/active", &worker)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["orderId"], order_id.as_str());

    let (status, body) = app
        .send(post_json(
            &format!("/api/orders/{order_id}/status"),
            Some(&worker),
            json!({ "status": "Shipped" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Shipped");

    let (status, body) = app
        .send(post_json(&format!("/api/orders/{order_id}/cancel"), Some(&buyer), json!({})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Cancelled");
}

#[tokio::test]
async fn strangers_cannot_read_an_order() {
    let app = TestApp::new().await;
    let p1 = app.add_product(100, 5);
    let buyer = token(Uuid::new_v4(), "buyer");

    let (_, body) = app
        .send(post_json("/api/orders", Some(&buyer), order_body(p1.product_id, 1)))
        .await;
    let order_id = body["data"]["orderId"].as_str().unwrap().to_string();

    let stranger = token(Uuid::new_v4(), "buyer");
    let (status, body) = app.send(get(&format!("/api/orders/{order_id}"), &stranger)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn payment_intent_is_created() {
    let app = TestApp::new().await;
    let p1 = app.add_product(75, 5);
    let buyer = token(Uuid::new_v4(), "buyer");

    let (status, body) = app
        .send(post_json(
            "/api/payments/intents",
            Some(&buyer),
            json!({ "lines": [{ "productId": p1.product_id, "qty": 2 }] }),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["amount"], 151);
    assert_eq!(body["data"]["currency"], "INR");
}

#[tokio::test]
async fn metrics_are_exposed() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
