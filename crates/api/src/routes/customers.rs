//! Customer route handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tally_core::{Customer, CustomerId, CustomerPatch, NewCustomer, Page};
use tracing::instrument;

use super::{ListQuery, parse_id};
use crate::error::Result;
use crate::state::AppState;
use crate::validation::FieldErrors;

/// Body of `POST /customers`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<String>,
    pub phone: Option<String>,
}

impl CustomerCreate {
    /// Check required fields and convert to store input.
    ///
    /// # Errors
    ///
    /// Returns every missing, blank or malformed field.
    pub fn validate(self, today: NaiveDate) -> std::result::Result<NewCustomer, FieldErrors> {
        let mut errors = FieldErrors::default();

        let first_name = errors.required_text("firstName", self.first_name);
        let last_name = errors.required_text("lastName", self.last_name);
        let birthdate = errors
            .required("birthdate", self.birthdate)
            .and_then(|raw| errors.past_date("birthdate", &raw, today));
        let phone = errors.required_text("phone", self.phone);

        let customer = match (first_name, last_name, birthdate, phone) {
            (Some(first_name), Some(last_name), Some(birthdate), Some(phone)) => {
                Some(NewCustomer {
                    first_name,
                    last_name,
                    birthdate,
                    phone,
                })
            }
            _ => None,
        };
        errors.finish(customer)
    }
}

/// Body of `PUT /customers/{customer_id}`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<String>,
    pub phone: Option<String>,
}

impl CustomerUpdate {
    /// Check the supplied fields and convert to a store patch.
    ///
    /// # Errors
    ///
    /// Returns every blank or malformed field that was supplied.
    pub fn validate(self, today: NaiveDate) -> std::result::Result<CustomerPatch, FieldErrors> {
        let mut errors = FieldErrors::default();

        let patch = CustomerPatch {
            first_name: errors.optional_text("firstName", self.first_name),
            last_name: errors.optional_text("lastName", self.last_name),
            birthdate: self
                .birthdate
                .and_then(|raw| errors.past_date("birthdate", &raw, today)),
            phone: errors.optional_text("phone", self.phone),
        };
        errors.finish(Some(patch))
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// List customers.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<Customer>>> {
    let Query(query) = query?;
    let request = query.validate(state.config().pagination)?;
    Ok(Json(state.store().list(request)))
}

/// Create a customer.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CustomerCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>)> {
    let Json(body) = payload?;
    let input = body.validate(today())?;

    let customer = state.store().create(input);
    tracing::info!(customer_id = %customer.id, "Customer created");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Show one customer with its purchases.
#[instrument(skip_all, fields(customer_id = %customer_id))]
pub async fn show(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<Customer>> {
    let id: CustomerId = parse_id("customerId", &customer_id)?;
    Ok(Json(state.store().get(id)?))
}

/// Apply a partial update to a customer.
#[instrument(skip_all, fields(customer_id = %customer_id))]
pub async fn update(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
    payload: std::result::Result<Json<CustomerUpdate>, JsonRejection>,
) -> Result<Json<Customer>> {
    let id: CustomerId = parse_id("customerId", &customer_id)?;
    let Json(body) = payload?;
    let patch = body.validate(today())?;

    let customer = state.store().update(id, patch)?;
    tracing::info!("Customer updated");
    Ok(Json(customer))
}

/// Delete a customer and all of its purchases.
#[instrument(skip_all, fields(customer_id = %customer_id))]
pub async fn delete(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<StatusCode> {
    let id: CustomerId = parse_id("customerId", &customer_id)?;
    state.store().delete(id)?;
    tracing::info!("Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}
