//! Customer records and their create/patch inputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Purchase;
use crate::types::{AuditStamps, CustomerId, Timestamp};

/// A customer together with the purchases it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub phone: String,
    #[serde(flatten)]
    pub stamps: AuditStamps,
    pub purchases: Vec<Purchase>,
}

/// The scalar part of a customer, without its purchases.
///
/// The store keeps this and the purchase list behind separate locks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProfile {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub phone: String,
    pub stamps: AuditStamps,
}

impl CustomerProfile {
    /// Build a fresh profile with a newly allocated id.
    #[must_use]
    pub fn create(input: NewCustomer, now: Timestamp) -> Self {
        Self {
            id: CustomerId::generate(),
            first_name: input.first_name,
            last_name: input.last_name,
            birthdate: input.birthdate,
            phone: input.phone,
            stamps: AuditStamps::new(now),
        }
    }

    /// Apply the fields present in `patch` and refresh `updated_at`.
    pub fn apply(&mut self, patch: CustomerPatch, now: Timestamp) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(birthdate) = patch.birthdate {
            self.birthdate = birthdate;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        self.stamps.touch(now);
    }

    /// Combine with a purchase snapshot into a full [`Customer`].
    #[must_use]
    pub fn with_purchases(self, purchases: Vec<Purchase>) -> Customer {
        Customer {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            birthdate: self.birthdate,
            phone: self.phone,
            stamps: self.stamps,
            purchases,
        }
    }
}

/// Fields required to create a customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub phone: String,
}

/// Partial customer update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub phone: Option<String>,
}
