//! Purchases and the item and shipping address they embed.

use serde::{Deserialize, Serialize};

use crate::types::{AddressId, AuditStamps, ItemId, Price, PurchaseId, Timestamp};

/// A purchase owned by exactly one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: PurchaseId,
    pub item: Item,
    pub quantity: u32,
    pub ship_to: Address,
    #[serde(flatten)]
    pub stamps: AuditStamps,
}

/// The product bought in a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(flatten)]
    pub stamps: AuditStamps,
}

/// A shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub street_line_one: String,
    pub street_line_two: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(flatten)]
    pub stamps: AuditStamps,
}

/// Fields required to create a purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPurchase {
    pub item: NewItem,
    /// Must be at least 1; the HTTP layer rejects anything else.
    pub quantity: u32,
    pub ship_to: NewAddress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub street_line_one: String,
    pub street_line_two: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Partial purchase update.
///
/// Each group is applied independently; an absent group is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchasePatch {
    pub item: Option<ItemPatch>,
    pub quantity: Option<u32>,
    pub ship_to: Option<AddressPatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressPatch {
    pub street_line_one: Option<String>,
    /// `Some(None)` clears the second line.
    pub street_line_two: Option<Option<String>>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl Purchase {
    /// Build a purchase with fresh ids for itself, its item and its address,
    /// all stamped with `now`.
    #[must_use]
    pub fn create(input: NewPurchase, now: Timestamp) -> Self {
        Self {
            id: PurchaseId::generate(),
            item: Item::create(input.item, now),
            quantity: input.quantity,
            ship_to: Address::create(input.ship_to, now),
            stamps: AuditStamps::new(now),
        }
    }

    /// Apply `patch` and refresh `updated_at`.
    ///
    /// The purchase is touched even when the patch carries no groups.
    pub fn apply(&mut self, patch: PurchasePatch, now: Timestamp) {
        if let Some(item) = patch.item {
            self.item.apply(item, now);
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(ship_to) = patch.ship_to {
            self.ship_to.apply(ship_to, now);
        }
        self.stamps.touch(now);
    }
}

impl Item {
    fn create(input: NewItem, now: Timestamp) -> Self {
        Self {
            id: ItemId::generate(),
            name: input.name,
            description: input.description,
            price: input.price,
            stamps: AuditStamps::new(now),
        }
    }

    fn apply(&mut self, patch: ItemPatch, now: Timestamp) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        self.stamps.touch(now);
    }
}

impl Address {
    fn create(input: NewAddress, now: Timestamp) -> Self {
        Self {
            id: AddressId::generate(),
            street_line_one: input.street_line_one,
            street_line_two: input.street_line_two,
            city: input.city,
            state: input.state,
            zip: input.zip,
            stamps: AuditStamps::new(now),
        }
    }

    fn apply(&mut self, patch: AddressPatch, now: Timestamp) {
        if let Some(street_line_one) = patch.street_line_one {
            self.street_line_one = street_line_one;
        }
        if let Some(street_line_two) = patch.street_line_two {
            self.street_line_two = street_line_two;
        }
        if let Some(city) = patch.city {
            self.city = city;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(zip) = patch.zip {
            self.zip = zip;
        }
        self.stamps.touch(now);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use rust_decimal::Decimal;

    use super::*;

    pub(crate) fn sample_purchase() -> NewPurchase {
        NewPurchase {
            item: NewItem {
                name: "Widget".to_string(),
                description: "A small widget".to_string(),
                price: Price::new(Decimal::new(1250, 2)).unwrap(),
            },
            quantity: 2,
            ship_to: NewAddress {
                street_line_one: "1 Main St".to_string(),
                street_line_two: Some("Apt 4".to_string()),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip: "62701".to_string(),
            },
        }
    }

    #[test]
    fn test_create_stamps_all_three_records() {
        let now = Timestamp::from_millis(1_000);
        let purchase = Purchase::create(sample_purchase(), now);

        assert_eq!(purchase.stamps, AuditStamps::new(now));
        assert_eq!(purchase.item.stamps, AuditStamps::new(now));
        assert_eq!(purchase.ship_to.stamps, AuditStamps::new(now));
    }

    #[test]
    fn test_quantity_update_leaves_sub_objects_alone() {
        let mut purchase = Purchase::create(sample_purchase(), Timestamp::from_millis(1));
        purchase.apply(
            PurchasePatch {
                quantity: Some(5),
                ..PurchasePatch::default()
            },
            Timestamp::from_millis(2),
        );

        assert_eq!(purchase.quantity, 5);
        assert_eq!(purchase.stamps.updated_at.as_millis(), 2);
        assert_eq!(purchase.item.stamps.updated_at.as_millis(), 1);
        assert_eq!(purchase.ship_to.stamps.updated_at.as_millis(), 1);
    }

    #[test]
    fn test_item_update_touches_item_and_purchase() {
        let mut purchase = Purchase::create(sample_purchase(), Timestamp::from_millis(1));
        purchase.apply(
            PurchasePatch {
                item: Some(ItemPatch {
                    name: Some("Gadget".to_string()),
                    ..ItemPatch::default()
                }),
                ..PurchasePatch::default()
            },
            Timestamp::from_millis(3),
        );

        assert_eq!(purchase.item.name, "Gadget");
        assert_eq!(purchase.item.description, "A small widget");
        assert_eq!(purchase.item.stamps.updated_at.as_millis(), 3);
        assert_eq!(purchase.stamps.updated_at.as_millis(), 3);
        assert_eq!(purchase.ship_to.stamps.updated_at.as_millis(), 1);
    }

    #[test]
    fn test_address_patch_can_clear_second_line() {
        let mut purchase = Purchase::create(sample_purchase(), Timestamp::from_millis(1));
        purchase.apply(
            PurchasePatch {
                ship_to: Some(AddressPatch {
                    street_line_two: Some(None),
                    ..AddressPatch::default()
                }),
                ..PurchasePatch::default()
            },
            Timestamp::from_millis(4),
        );

        assert_eq!(purchase.ship_to.street_line_two, None);
        assert_eq!(purchase.ship_to.street_line_one, "1 Main St");
        assert_eq!(purchase.ship_to.stamps.updated_at.as_millis(), 4);
    }

    #[test]
    fn test_empty_patch_still_touches_purchase() {
        let mut purchase = Purchase::create(sample_purchase(), Timestamp::from_millis(1));
        let before = purchase.clone();
        purchase.apply(PurchasePatch::default(), Timestamp::from_millis(9));

        assert_eq!(purchase.stamps.updated_at.as_millis(), 9);
        assert_eq!(purchase.item, before.item);
        assert_eq!(purchase.ship_to, before.ship_to);
        assert_eq!(purchase.quantity, before.quantity);
    }

    #[test]
    fn test_purchase_json_shape() {
        let purchase = Purchase::create(sample_purchase(), Timestamp::from_millis(5));
        let json = serde_json::to_value(&purchase).unwrap();

        assert_eq!(json["quantity"], 2);
        assert_eq!(json["item"]["name"], "Widget");
        assert_eq!(json["item"]["price"], "12.50");
        assert_eq!(json["shipTo"]["streetLineOne"], "1 Main St");
        assert_eq!(json["shipTo"]["streetLineTwo"], "Apt 4");
        assert_eq!(json["shipTo"]["createdAt"], 5);
        assert_eq!(json["updatedAt"], 5);
    }
}
