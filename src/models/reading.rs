//! Values that may be missing upstream
//!
//! Missing fields never fail a request; they are replaced by the `"N/A"`
//! sentinel so every output field is always present.

use serde::{Serialize, Serializer};
use serde_json::Number;

/// Placeholder written for any value the upstream did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// A numeric reading passed through verbatim, or the sentinel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Reading {
    Value(Number),
    #[default]
    NotAvailable,
}

impl Reading {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Value(_))
    }
}

impl From<Option<Number>> for Reading {
    fn from(value: Option<Number>) -> Self {
        value.map_or(Reading::NotAvailable, Reading::Value)
    }
}

impl From<i64> for Reading {
    fn from(value: i64) -> Self {
        Reading::Value(value.into())
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Value(number) => number.serialize(serializer),
            Reading::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// Text field with blank or absent values replaced by the sentinel
#[must_use]
pub fn text_or_sentinel(value: Option<String>) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => NOT_AVAILABLE.to_string(),
    }
}
