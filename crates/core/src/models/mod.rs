//! Customer and purchase records.

pub mod customer;
pub mod purchase;

pub use customer::{Customer, CustomerPatch, CustomerProfile, NewCustomer};
pub use purchase::{
    Address, AddressPatch, Item, ItemPatch, NewAddress, NewItem, NewPurchase, Purchase,
    PurchasePatch,
};
