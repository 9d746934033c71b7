//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                           - Liveness check
//! GET    /health/ready                                     - Readiness check
//!
//! # Customers
//! GET    /customers?page&limit                             - Customer listing
//! POST   /customers                                        - Create customer
//! GET    /customers/{customer_id}                          - Customer detail
//! PUT    /customers/{customer_id}                          - Partial update
//! DELETE /customers/{customer_id}                          - Delete with purchases
//!
//! # Purchases
//! GET    /customers/{customer_id}/purchases?page&limit     - Purchase listing
//! POST   /customers/{customer_id}/purchases                - Add purchase
//! GET    /customers/{customer_id}/purchases/{purchase_id}  - Purchase detail
//! PUT    /customers/{customer_id}/purchases/{purchase_id}  - Partial update
//! DELETE /customers/{customer_id}/purchases/{purchase_id}  - Delete purchase
//! ```

pub mod customers;
pub mod health;
pub mod purchases;

use std::str::FromStr;

use axum::{Router, routing::get};
use serde::Deserialize;
use tally_core::PageRequest;

use crate::config::PaginationConfig;
use crate::state::AppState;
use crate::validation::FieldErrors;

/// `?page=&limit=` query for list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Apply defaults and bounds from `config`.
    ///
    /// # Errors
    ///
    /// Returns field errors if `page < 1`, `limit < 1` or
    /// `limit > max_limit`.
    pub fn validate(self, config: PaginationConfig) -> Result<PageRequest, FieldErrors> {
        let mut errors = FieldErrors::default();
        let page = errors.positive("page", self.page.unwrap_or(1));
        let limit = errors
            .positive("limit", self.limit.unwrap_or_else(|| config.default_limit.into()))
            .filter(|&limit| {
                let ok = limit <= config.max_limit;
                if !ok {
                    errors.add("limit", format!("must not exceed {}", config.max_limit));
                }
                ok
            });

        let request = page
            .zip(limit)
            .and_then(|(page, limit)| PageRequest::new(page, limit).ok());
        errors.finish(request)
    }
}

/// Parse a path segment into a typed id.
///
/// # Errors
///
/// Returns a field error naming `field` if `raw` is not a UUID.
pub fn parse_id<T: FromStr>(field: &str, raw: &str) -> Result<T, FieldErrors> {
    raw.parse().map_err(|_| {
        let mut errors = FieldErrors::default();
        errors.add(field, "must be a valid UUID");
        errors
    })
}

/// Create the customer and nested purchase routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::list).post(customers::create))
        .route(
            "/{customer_id}",
            get(customers::show)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route(
            "/{customer_id}/purchases",
            get(purchases::list).post(purchases::create),
        )
        .route(
            "/{customer_id}/purchases/{purchase_id}",
            get(purchases::show)
                .put(purchases::update)
                .delete(purchases::delete),
        )
}

/// Create the health check routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health))
        .route("/ready", get(health::readiness))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/customers", customer_routes())
}
