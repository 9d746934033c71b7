//! Integration tests for customer endpoints.

use axum::http::StatusCode;
use serde_json::json;
use tally_api::config::{ApiConfig, PaginationConfig};
use tally_integration_tests::{TestContext, customer_body};

// ============================================================================
// Create & Read
// ============================================================================

#[tokio::test]
async fn test_create_then_get_returns_same_record() {
    let ctx = TestContext::new();

    let created = ctx.post("/customers", customer_body("Ada")).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["firstName"], "Ada");
    assert_eq!(created.body["birthdate"], "1990-01-31");
    assert_eq!(created.body["createdAt"], created.body["updatedAt"]);
    assert_eq!(created.body["purchases"], json!([]));

    let id = created.body["id"].as_str().unwrap();
    let fetched = ctx.get(&format!("/customers/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created.body);
}

#[tokio::test]
async fn test_create_missing_fields_returns_field_map() {
    let ctx = TestContext::new();

    let resp = ctx
        .post("/customers", json!({ "firstName": "", "birthdate": "31/01/1990" }))
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["firstName"], "must not be blank");
    assert_eq!(resp.body["lastName"], "is required");
    assert_eq!(resp.body["phone"], "is required");
    assert_eq!(resp.body["birthdate"], "must be a date in YYYY-MM-DD format");
    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_create_malformed_json() {
    let ctx = TestContext::new();
    let resp = ctx
        .send(
            axum::http::Method::POST,
            "/customers",
            Some(json!("not an object")),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.body["error"].is_string());
}

#[tokio::test]
async fn test_get_unknown_and_malformed_ids() {
    let ctx = TestContext::new();

    let resp = ctx
        .get("/customers/00000000-0000-4000-8000-000000000000")
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert!(resp.body["error"].as_str().unwrap().starts_with("customer "));

    let resp = ctx.get("/customers/not-a-uuid").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["customerId"], "must be a valid UUID");
}

// ============================================================================
// Update & Delete
// ============================================================================

#[tokio::test]
async fn test_partial_update_only_changes_given_fields() {
    let ctx = TestContext::new();
    let id = ctx.create_customer("Ada").await;
    let before = ctx.get(&format!("/customers/{id}")).await.body;

    let resp = ctx
        .put(&format!("/customers/{id}"), json!({ "phone": "555-0199" }))
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let after = resp.body;
    assert_eq!(after["phone"], "555-0199");
    assert_eq!(after["firstName"], before["firstName"]);
    assert_eq!(after["lastName"], before["lastName"]);
    assert_eq!(after["birthdate"], before["birthdate"]);
    assert_eq!(after["createdAt"], before["createdAt"]);
    assert!(after["updatedAt"].as_i64().unwrap() >= before["updatedAt"].as_i64().unwrap());
}

#[tokio::test]
async fn test_update_unknown_customer() {
    let ctx = TestContext::new();
    let resp = ctx
        .put(
            "/customers/00000000-0000-4000-8000-000000000000",
            json!({ "phone": "1" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_blank_field() {
    let ctx = TestContext::new();
    let id = ctx.create_customer("Ada").await;

    let resp = ctx
        .put(&format!("/customers/{id}"), json!({ "lastName": "  " }))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["lastName"], "must not be blank");
}

#[tokio::test]
async fn test_delete_customer() {
    let ctx = TestContext::new();
    let id = ctx.create_customer("Ada").await;

    let resp = ctx.delete(&format!("/customers/{id}")).await;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert!(resp.body.is_null());

    assert_eq!(
        ctx.get(&format!("/customers/{id}")).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        ctx.delete(&format!("/customers/{id}")).await.status,
        StatusCode::NOT_FOUND
    );
}

// ============================================================================
// List & Pagination
// ============================================================================

#[tokio::test]
async fn test_list_second_page_of_seven() {
    let ctx = TestContext::new();
    let mut ids = Vec::new();
    for i in 0..7 {
        ids.push(ctx.create_customer(&format!("c{i}")).await);
    }

    let resp = ctx.get("/customers?page=2&limit=3").await;
    assert_eq!(resp.status, StatusCode::OK);

    let listed: Vec<&str> = resp.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    let expected: Vec<&str> = ids[3..6].iter().map(String::as_str).collect();
    assert_eq!(listed, expected);
    assert_eq!(
        resp.body["pagination"],
        json!({ "total": 7, "page": 2, "limit": 3, "totalPages": 3 })
    );
}

#[tokio::test]
async fn test_list_defaults_and_past_the_end() {
    let ctx = TestContext::new();
    for i in 0..2 {
        ctx.create_customer(&format!("c{i}")).await;
    }

    let resp = ctx.get("/customers").await;
    assert_eq!(resp.body["pagination"]["page"], 1);
    assert_eq!(resp.body["pagination"]["limit"], 10);
    assert_eq!(resp.body["data"].as_array().unwrap().len(), 2);

    let resp = ctx.get("/customers?page=9&limit=1").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["data"], json!([]));
    assert_eq!(resp.body["pagination"]["total"], 2);
    assert_eq!(resp.body["pagination"]["totalPages"], 2);
}

#[tokio::test]
async fn test_list_rejects_bad_query() {
    let ctx = TestContext::with_config(ApiConfig {
        pagination: PaginationConfig::new(5, 20).unwrap(),
        ..ApiConfig::default()
    });

    let resp = ctx.get("/customers?page=0&limit=21").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["limit"], "must not exceed 20");
    assert!(resp.body["page"].is_string());

    let resp = ctx.get("/customers?page=abc").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.body["error"].is_string());

    let resp = ctx.get("/customers").await;
    assert_eq!(resp.body["pagination"]["limit"], 5);
}

// ============================================================================
// Health & Middleware
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new();
    ctx.create_customer("Ada").await;

    let resp = ctx.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!("ok"));

    let resp = ctx.get("/health/ready").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, json!({ "status": "ok", "customers": 1 }));
}

#[tokio::test]
async fn test_every_response_has_request_id() {
    let ctx = TestContext::new();
    let ok = ctx.get("/health").await;
    let missing = ctx.get("/customers/not-a-uuid").await;

    assert!(ok.request_id.is_some());
    assert!(missing.request_id.is_some());
    assert_ne!(ok.request_id, missing.request_id);
}
