//! Purchase route handlers, nested under a customer.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tally_core::{
    AddressPatch, CustomerId, ItemPatch, NewAddress, NewItem, NewPurchase, Page, Price, Purchase,
    PurchaseId, PurchasePatch,
};
use tracing::instrument;

use super::{ListQuery, parse_id};
use crate::error::Result;
use crate::state::AppState;
use crate::validation::{FieldErrors, nullable};

/// Item fields of a purchase request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

/// Shipping address fields of a purchase request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBody {
    pub street_line_one: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub street_line_two: Option<Option<String>>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// Body of `POST /customers/{customer_id}/purchases`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseCreate {
    pub item: Option<ItemBody>,
    pub quantity: Option<i64>,
    pub ship_to: Option<AddressBody>,
}

/// Body of `PUT /customers/{customer_id}/purchases/{purchase_id}`.
///
/// Each group, and each field inside a group, is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseUpdate {
    pub item: Option<ItemBody>,
    pub quantity: Option<i64>,
    pub ship_to: Option<AddressBody>,
}

fn price(errors: &mut FieldErrors, field: &str, amount: Decimal) -> Option<Price> {
    Price::new(amount)
        .map_err(|e| errors.add(field, e.to_string()))
        .ok()
}

/// Treat an empty second street line as absent.
fn second_line(line: Option<String>) -> Option<String> {
    line.filter(|l| !l.trim().is_empty())
}

impl ItemBody {
    fn into_new(self, errors: &mut FieldErrors) -> Option<NewItem> {
        let name = errors.required_text("item.name", self.name);
        let description = errors.required("item.description", self.description);
        let price = errors
            .required("item.price", self.price)
            .and_then(|amount| price(errors, "item.price", amount));

        Some(NewItem {
            name: name?,
            description: description?,
            price: price?,
        })
    }

    fn into_patch(self, errors: &mut FieldErrors) -> ItemPatch {
        ItemPatch {
            name: errors.optional_text("item.name", self.name),
            description: self.description,
            price: self
                .price
                .and_then(|amount| price(errors, "item.price", amount)),
        }
    }
}

impl AddressBody {
    fn into_new(self, errors: &mut FieldErrors) -> Option<NewAddress> {
        let street_line_one = errors.required_text("shipTo.streetLineOne", self.street_line_one);
        let city = errors.required_text("shipTo.city", self.city);
        let state = errors.required_text("shipTo.state", self.state);
        let zip = errors.required_text("shipTo.zip", self.zip);

        Some(NewAddress {
            street_line_one: street_line_one?,
            street_line_two: second_line(self.street_line_two.flatten()),
            city: city?,
            state: state?,
            zip: zip?,
        })
    }

    fn into_patch(self, errors: &mut FieldErrors) -> AddressPatch {
        AddressPatch {
            street_line_one: errors.optional_text("shipTo.streetLineOne", self.street_line_one),
            street_line_two: self.street_line_two.map(second_line),
            city: errors.optional_text("shipTo.city", self.city),
            state: errors.optional_text("shipTo.state", self.state),
            zip: errors.optional_text("shipTo.zip", self.zip),
        }
    }
}

impl PurchaseCreate {
    /// Check required fields and convert to store input.
    ///
    /// # Errors
    ///
    /// Returns every missing, blank or out-of-range field.
    pub fn validate(self) -> std::result::Result<NewPurchase, FieldErrors> {
        let mut errors = FieldErrors::default();

        let item = errors
            .required("item", self.item)
            .and_then(|item| item.into_new(&mut errors));
        let quantity = errors
            .required("quantity", self.quantity)
            .and_then(|q| errors.positive("quantity", q));
        let ship_to = errors
            .required("shipTo", self.ship_to)
            .and_then(|address| address.into_new(&mut errors));

        let purchase = match (item, quantity, ship_to) {
            (Some(item), Some(quantity), Some(ship_to)) => Some(NewPurchase {
                item,
                quantity,
                ship_to,
            }),
            _ => None,
        };
        errors.finish(purchase)
    }
}

impl PurchaseUpdate {
    /// Check the supplied groups and convert to a store patch.
    ///
    /// # Errors
    ///
    /// Returns every blank or out-of-range field that was supplied.
    pub fn validate(self) -> std::result::Result<PurchasePatch, FieldErrors> {
        let mut errors = FieldErrors::default();

        let patch = PurchasePatch {
            item: self.item.map(|item| item.into_patch(&mut errors)),
            quantity: self.quantity.and_then(|q| errors.positive("quantity", q)),
            ship_to: self
                .ship_to
                .map(|address| address.into_patch(&mut errors)),
        };
        errors.finish(Some(patch))
    }
}

/// List a customer's purchases.
#[instrument(skip_all, fields(customer_id = %customer_id))]
pub async fn list(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<Purchase>>> {
    let customer: CustomerId = parse_id("customerId", &customer_id)?;
    let Query(query) = query?;
    let request = query.validate(state.config().pagination)?;
    Ok(Json(state.store().list_purchases(customer, request)?))
}

/// Add a purchase to a customer.
#[instrument(skip_all, fields(customer_id = %customer_id))]
pub async fn create(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    payload: std::result::Result<Json<PurchaseCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Purchase>)> {
    let customer: CustomerId = parse_id("customerId", &customer_id)?;
    let Json(body) = payload?;
    let input = body.validate()?;

    let purchase = state.store().add_purchase(customer, input)?;
    tracing::info!(purchase_id = %purchase.id, "Purchase created");
    Ok((StatusCode::CREATED, Json(purchase)))
}

/// Show one purchase.
#[instrument(skip_all, fields(customer_id = %customer_id, purchase_id = %purchase_id))]
pub async fn show(
    State(state): State<AppState>,
    Path((customer_id, purchase_id)): Path<(String, String)>,
) -> Result<Json<Purchase>> {
    let customer: CustomerId = parse_id("customerId", &customer_id)?;
    let purchase: PurchaseId = parse_id("purchaseId", &purchase_id)?;
    Ok(Json(state.store().get_purchase(customer, purchase)?))
}

/// Apply a partial update to a purchase.
#[instrument(skip_all, fields(customer_id = %customer_id, purchase_id = %purchase_id))]
pub async fn update(
    State(state): State<AppState>,
    Path((customer_id, purchase_id)): Path<(String, String)>,
    payload: std::result::Result<Json<PurchaseUpdate>, JsonRejection>,
) -> Result<Json<Purchase>> {
    let customer: CustomerId = parse_id("customerId", &customer_id)?;
    let purchase: PurchaseId = parse_id("purchaseId", &purchase_id)?;
    let Json(body) = payload?;
    let patch = body.validate()?;

    let purchase = state.store().update_purchase(customer, purchase, patch)?;
    tracing::info!("Purchase updated");
    Ok(Json(purchase))
}

/// Delete one purchase.
#[instrument(skip_all, fields(customer_id = %customer_id, purchase_id = %purchase_id))]
pub async fn delete(
    State(state): State<AppState>,
    Path((customer_id, purchase_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let customer: CustomerId = parse_id("customerId", &customer_id)?;
    let purchase: PurchaseId = parse_id("purchaseId", &purchase_id)?;
    state.store().delete_purchase(customer, purchase)?;
    tracing::info!("Purchase deleted");
    Ok(StatusCode::NO_CONTENT)
}
