//! Concurrent in-memory customer registry.
//!
//! # Locking
//!
//! ```text
//! registry: RwLock<Registry>            create/delete take write, all else read
//!   └─ CustomerEntry
//!        ├─ profile:   RwLock<CustomerProfile>
//!        └─ purchases: RwLock<PurchaseCollection>
//! ```
//!
//! Locks are always acquired registry -> profile -> purchases. Purchase
//! operations hold the registry read lock for their whole duration, so a
//! concurrent delete either happens entirely before or entirely after them.
//! Operations on different customers only ever share read locks.

pub mod error;
pub mod purchases;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use error::{ResourceKind, Result, StoreError};
pub use purchases::PurchaseCollection;

use crate::models::{
    Customer, CustomerPatch, CustomerProfile, NewCustomer, NewPurchase, Purchase, PurchasePatch,
};
use crate::pagination::{Page, PageRequest, paginate};
use crate::types::{Clock, CustomerId, PurchaseId, SystemClock};

/// Thread-safe store of customers and their purchases.
///
/// Cheaply cloneable; clones share the same data.
#[derive(Clone)]
pub struct CustomerStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    registry: RwLock<Registry>,
    clock: Arc<dyn Clock>,
}

#[derive(Default)]
struct Registry {
    entries: HashMap<CustomerId, CustomerEntry>,
    /// Insertion counter used to give listings a stable order.
    next_seq: u64,
}

struct CustomerEntry {
    seq: u64,
    profile: RwLock<CustomerProfile>,
    purchases: RwLock<PurchaseCollection>,
}

impl CustomerEntry {
    /// Copy out the profile and purchases as one consistent record.
    fn snapshot(&self) -> Customer {
        let profile = read(&self.profile);
        let purchases = read(&self.purchases);
        profile.clone().with_purchases(purchases.to_vec())
    }
}

impl std::fmt::Debug for CustomerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerStore")
            .field("customers", &self.len())
            .finish_non_exhaustive()
    }
}

impl Default for CustomerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerStore {
    /// Create an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store that reads time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                registry: RwLock::new(Registry::default()),
                clock,
            }),
        }
    }

    /// Number of customers currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        read(&self.inner.registry).entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Store a new customer and return it.
    pub fn create(&self, input: NewCustomer) -> Customer {
        let mut registry = write(&self.inner.registry);
        let profile = CustomerProfile::create(input, self.inner.clock.now());
        let id = profile.id;

        let seq = registry.next_seq;
        registry.next_seq += 1;

        let customer = profile.clone().with_purchases(Vec::new());
        registry.entries.insert(
            id,
            CustomerEntry {
                seq,
                profile: RwLock::new(profile),
                purchases: RwLock::new(PurchaseCollection::new()),
            },
        );
        customer
    }

    /// Fetch a customer with all of its purchases.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no customer has this id.
    pub fn get(&self, id: CustomerId) -> Result<Customer> {
        let registry = read(&self.inner.registry);
        let entry = registry
            .entries
            .get(&id)
            .ok_or_else(|| StoreError::customer(id))?;
        Ok(entry.snapshot())
    }

    /// Apply the fields present in `patch` to a customer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no customer has this id.
    pub fn update(&self, id: CustomerId, patch: CustomerPatch) -> Result<Customer> {
        let registry = read(&self.inner.registry);
        let entry = registry
            .entries
            .get(&id)
            .ok_or_else(|| StoreError::customer(id))?;

        let mut profile = write(&entry.profile);
        profile.apply(patch, self.inner.clock.now());
        let purchases = read(&entry.purchases);
        Ok(profile.clone().with_purchases(purchases.to_vec()))
    }

    /// Remove a customer and every purchase it owns.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no customer has this id.
    pub fn delete(&self, id: CustomerId) -> Result<()> {
        let mut registry = write(&self.inner.registry);
        registry
            .entries
            .remove(&id)
            .map(drop)
            .ok_or_else(|| StoreError::customer(id))
    }

    /// List customers in creation order.
    ///
    /// Every customer in the window is read-locked before any is copied, so
    /// the page reflects a single point in time.
    #[must_use]
    pub fn list(&self, request: PageRequest) -> Page<Customer> {
        let registry = read(&self.inner.registry);
        let mut entries: Vec<&CustomerEntry> = registry.entries.values().collect();
        entries.sort_unstable_by_key(|entry| entry.seq);

        let window = paginate(&entries, request);
        // Writers hold at most one customer's locks, so taking them in seq
        // order cannot deadlock.
        let guards: Vec<_> = window
            .data
            .iter()
            .map(|entry| (read(&entry.profile), read(&entry.purchases)))
            .collect();
        let data = guards
            .iter()
            .map(|(profile, purchases)| {
                CustomerProfile::clone(profile).with_purchases(purchases.to_vec())
            })
            .collect();

        Page {
            data,
            pagination: window.pagination,
        }
    }

    // =========================================================================
    // Purchases
    // =========================================================================

    /// Run `f` against a customer's purchase list while holding its write lock.
    fn with_purchases_mut<T>(
        &self,
        customer_id: CustomerId,
        f: impl FnOnce(&mut PurchaseCollection, &dyn Clock) -> T,
    ) -> Result<T> {
        let registry = read(&self.inner.registry);
        let entry = registry
            .entries
            .get(&customer_id)
            .ok_or_else(|| StoreError::customer(customer_id))?;
        let mut purchases = write(&entry.purchases);
        Ok(f(&mut purchases, self.inner.clock.as_ref()))
    }

    /// Run `f` against a customer's purchase list while holding its read lock.
    fn with_purchases<T>(
        &self,
        customer_id: CustomerId,
        f: impl FnOnce(&PurchaseCollection) -> T,
    ) -> Result<T> {
        let registry = read(&self.inner.registry);
        let entry = registry
            .entries
            .get(&customer_id)
            .ok_or_else(|| StoreError::customer(customer_id))?;
        let purchases = read(&entry.purchases);
        Ok(f(&purchases))
    }

    /// Append a purchase to a customer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for the customer if it does not exist.
    pub fn add_purchase(&self, customer_id: CustomerId, input: NewPurchase) -> Result<Purchase> {
        self.with_purchases_mut(customer_id, |purchases, clock| {
            purchases.add(input, clock.now())
        })
    }

    /// Fetch one purchase of a customer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for the customer if it does not
    /// exist, or for the purchase if the customer has no such purchase.
    pub fn get_purchase(
        &self,
        customer_id: CustomerId,
        purchase_id: PurchaseId,
    ) -> Result<Purchase> {
        self.with_purchases(customer_id, |purchases| purchases.get(purchase_id).cloned())?
            .ok_or_else(|| StoreError::purchase(purchase_id))
    }

    /// Apply `patch` to one purchase of a customer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for the customer or the purchase.
    pub fn update_purchase(
        &self,
        customer_id: CustomerId,
        purchase_id: PurchaseId,
        patch: PurchasePatch,
    ) -> Result<Purchase> {
        self.with_purchases_mut(customer_id, |purchases, clock| {
            purchases.update(purchase_id, patch, clock.now())
        })?
        .ok_or_else(|| StoreError::purchase(purchase_id))
    }

    /// Remove one purchase of a customer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for the customer or the purchase.
    pub fn delete_purchase(&self, customer_id: CustomerId, purchase_id: PurchaseId) -> Result<()> {
        let removed =
            self.with_purchases_mut(customer_id, |purchases, _| purchases.remove(purchase_id))?;
        if removed {
            Ok(())
        } else {
            Err(StoreError::purchase(purchase_id))
        }
    }

    /// List a customer's purchases in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for the customer if it does not exist.
    pub fn list_purchases(
        &self,
        customer_id: CustomerId,
        request: PageRequest,
    ) -> Result<Page<Purchase>> {
        self.with_purchases(customer_id, |purchases| purchases.list(request))
    }
}

/// Acquire a read guard, recovering the data if a writer panicked.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

/// Acquire a write guard, recovering the data if a writer panicked.
fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
