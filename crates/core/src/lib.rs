//! Tally Core - domain types and the in-memory store.
//!
//! This crate provides everything the HTTP layer needs to serve customers and
//! their purchases:
//! - `api` - JSON HTTP adapter (routing, validation, status mapping)
//! - `integration-tests` - end-to-end tests against the router
//!
//! # Architecture
//!
//! The core crate has no I/O, no HTTP and no logging. All state lives in a
//! [`CustomerStore`] that the caller constructs and shares.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and timestamps
//! - [`models`] - Customer, purchase, item and address records
//! - [`pagination`] - Offset pagination over ordered slices
//! - [`store`] - Concurrent customer registry and per-customer purchase lists

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod pagination;
pub mod store;
pub mod types;

pub use models::*;
pub use pagination::{Page, PageRequest, PageRequestError, PaginationInfo, paginate};
pub use store::{CustomerStore, PurchaseCollection, ResourceKind, StoreError};
pub use types::*;
