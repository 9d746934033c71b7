//! Core types for Tally.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod timestamp;

pub use id::*;
pub use price::{Price, PriceError};
pub use timestamp::{AuditStamps, Clock, SystemClock, Timestamp};
