//! Request field validation.
//!
//! Handlers collect every problem in a [`FieldErrors`] before calling the
//! store, so a bad request reports all of its invalid fields at once.

use core::fmt;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Field name -> message map returned as the body of a 400 response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Record an error for `field`. The first message per field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// A value that must be present.
    pub fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, "is required");
        }
        value
    }

    /// Text that must be present and not blank.
    pub fn required_text(&mut self, field: &str, value: Option<String>) -> Option<String> {
        self.required(field, value)
            .and_then(|text| self.not_blank(field, text))
    }

    /// Text that may be absent but, when present, must not be blank.
    pub fn optional_text(&mut self, field: &str, value: Option<String>) -> Option<String> {
        value.and_then(|text| self.not_blank(field, text))
    }

    fn not_blank(&mut self, field: &str, text: String) -> Option<String> {
        if text.trim().is_empty() {
            self.add(field, "must not be blank");
            None
        } else {
            Some(text)
        }
    }

    /// A `YYYY-MM-DD` date that is not after `today`.
    pub fn past_date(&mut self, field: &str, value: &str, today: NaiveDate) -> Option<NaiveDate> {
        let Ok(date) = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") else {
            self.add(field, "must be a date in YYYY-MM-DD format");
            return None;
        };
        if date > today {
            self.add(field, "must not be in the future");
            return None;
        }
        Some(date)
    }

    /// A whole number of at least 1 that fits in a `u32`.
    pub fn positive(&mut self, field: &str, value: i64) -> Option<u32> {
        match u32::try_from(value) {
            Ok(n) if n >= 1 => Some(n),
            _ => {
                self.add(field, format!("must be between 1 and {}", u32::MAX));
                None
            }
        }
    }

    /// `Ok(value)` if nothing was recorded, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the collected errors if any field failed, or if `value` is
    /// `None` (a field returned nothing without recording why).
    pub fn finish<T>(self, value: Option<T>) -> Result<T, Self> {
        match value {
            Some(value) if self.is_empty() => Ok(value),
            Some(_) => Err(self),
            None if self.is_empty() => {
                let mut errors = self;
                errors.add("body", "is invalid");
                Err(errors)
            }
            None => Err(self),
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{field} {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Deserialize a field that distinguishes "absent" from "null".
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`: a missing
/// field becomes `None`, an explicit `null` becomes `Some(None)`.
///
/// # Errors
///
/// Returns the deserializer's error if the value is neither null nor a `T`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
