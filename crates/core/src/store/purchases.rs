//! The ordered purchase list of a single customer.
//!
//! A `PurchaseCollection` has no locking of its own; the store keeps each one
//! behind its customer's lock.

use crate::models::{NewPurchase, Purchase, PurchasePatch};
use crate::pagination::{Page, PageRequest, paginate};
use crate::types::{PurchaseId, Timestamp};

/// Purchases in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseCollection {
    purchases: Vec<Purchase>,
}

impl PurchaseCollection {
    /// Create an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            purchases: Vec::new(),
        }
    }

    /// Append a new purchase built from `input` and return a copy of it.
    pub fn add(&mut self, input: NewPurchase, now: Timestamp) -> Purchase {
        let purchase = Purchase::create(input, now);
        self.purchases.push(purchase.clone());
        purchase
    }

    #[must_use]
    pub fn get(&self, id: PurchaseId) -> Option<&Purchase> {
        self.purchases.iter().find(|p| p.id == id)
    }

    /// Apply `patch` to the purchase with `id` and return the updated copy.
    pub fn update(
        &mut self,
        id: PurchaseId,
        patch: PurchasePatch,
        now: Timestamp,
    ) -> Option<Purchase> {
        let purchase = self.purchases.iter_mut().find(|p| p.id == id)?;
        purchase.apply(patch, now);
        Some(purchase.clone())
    }

    /// Remove the purchase with `id`. Returns `false` if it was not present.
    pub fn remove(&mut self, id: PurchaseId) -> bool {
        let Some(index) = self.purchases.iter().position(|p| p.id == id) else {
            return false;
        };
        self.purchases.remove(index);
        true
    }

    #[must_use]
    pub fn list(&self, request: PageRequest) -> Page<Purchase> {
        paginate(&self.purchases, request)
    }

    /// Copy out every purchase in order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Purchase> {
        self.purchases.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::purchase::tests::sample_purchase;

    fn ts(millis: i64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut collection = PurchaseCollection::new();
        let ids: Vec<_> = (0..4)
            .map(|i| collection.add(sample_purchase(), ts(i)).id)
            .collect();

        let listed: Vec<_> = collection.to_vec().iter().map(|p| p.id).collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn test_get_and_remove() {
        let mut collection = PurchaseCollection::new();
        let keep = collection.add(sample_purchase(), ts(1));
        let drop = collection.add(sample_purchase(), ts(2));

        assert!(collection.remove(drop.id));
        assert!(!collection.remove(drop.id));
        assert!(collection.get(drop.id).is_none());
        assert_eq!(collection.get(keep.id), Some(&keep));
    }

    #[test]
    fn test_update_missing_returns_none() {
        let mut collection = PurchaseCollection::new();
        let result = collection.update(PurchaseId::generate(), PurchasePatch::default(), ts(1));
        assert!(result.is_none());
    }

    #[test]
    fn test_update_returns_stored_value() {
        let mut collection = PurchaseCollection::new();
        let created = collection.add(sample_purchase(), ts(1));
        let updated = collection
            .update(
                created.id,
                PurchasePatch {
                    quantity: Some(9),
                    ..PurchasePatch::default()
                },
                ts(2),
            )
            .unwrap();

        assert_eq!(collection.get(created.id), Some(&updated));
        assert_eq!(updated.quantity, 9);
        assert_eq!(updated.stamps.created_at, ts(1));
    }

    #[test]
    fn test_list_on_empty_collection() {
        let collection = PurchaseCollection::new();
        let page = collection.list(PageRequest::new(3, 5).unwrap());
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total, 0);
        assert_eq!(page.pagination.total_pages, 0);
    }
}
