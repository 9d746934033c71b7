//! Integration tests for Tally.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tally-integration-tests
//! ```
//!
//! The router is driven in-process through `tower::ServiceExt::oneshot`, so
//! no server or network is needed.
//!
//! # Test Categories
//!
//! - `customers_api` - Customer CRUD and listing
//! - `purchases_api` - Purchase CRUD and listing under a customer

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tally_api::{config::ApiConfig, state::AppState};
use tally_core::CustomerStore;
use tower::ServiceExt;

/// A fresh API instance with an empty store.
pub struct TestContext {
    router: Router,
    pub store: CustomerStore,
}

/// Status and decoded JSON body of a response.
///
/// `body` is `Value::Null` for empty responses and `Value::String` for
/// non-JSON text.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub request_id: Option<String>,
    pub body: Value,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Build a context with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ApiConfig::default())
    }

    /// Build a context with custom configuration.
    #[must_use]
    pub fn with_config(config: ApiConfig) -> Self {
        let store = CustomerStore::new();
        let router = tally_api::app(AppState::new(config, store.clone()));
        Self { router, store }
    }

    /// Send a request with an optional JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            request_id,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Create a customer and return its id.
    ///
    /// # Panics
    ///
    /// Panics if creation does not return 201 with an id.
    pub async fn create_customer(&self, first_name: &str) -> String {
        let resp = self.post("/customers", customer_body(first_name)).await;
        assert_eq!(resp.status, StatusCode::CREATED, "{:?}", resp.body);
        resp.body["id"]
            .as_str()
            .expect("customer id missing")
            .to_string()
    }

    /// Add a purchase to a customer and return the purchase JSON.
    ///
    /// # Panics
    ///
    /// Panics if creation does not return 201.
    pub async fn create_purchase(&self, customer_id: &str) -> Value {
        let resp = self
            .post(
                &format!("/customers/{customer_id}/purchases"),
                purchase_body("Widget", 1),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "{:?}", resp.body);
        resp.body
    }
}

/// A valid `POST /customers` body.
#[must_use]
pub fn customer_body(first_name: &str) -> Value {
    json!({
        "firstName": first_name,
        "lastName": "Tester",
        "birthdate": "1990-01-31",
        "phone": "555-0100"
    })
}

/// A valid `POST /customers/{id}/purchases` body.
#[must_use]
pub fn purchase_body(item_name: &str, quantity: u32) -> Value {
    json!({
        "item": {
            "name": item_name,
            "description": "Integration test item",
            "price": "19.99"
        },
        "quantity": quantity,
        "shipTo": {
            "streetLineOne": "1 Main St",
            "streetLineTwo": "Suite 200",
            "city": "Springfield",
            "state": "IL",
            "zip": "62701"
        }
    })
}
