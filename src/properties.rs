//! Properties

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property identifier.
///
/// Listings arrive with either numeric or string ids. Ids of different kinds
/// never compare equal, so `1` and `"1"` are distinct properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyId {
    /// Numeric id
    Number(i64),

    /// String id
    Text(String),
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyId::Number(id) => write!(f, "{id}"),
            PropertyId::Text(id) => f.write_str(id),
        }
    }
}

impl FromStr for PropertyId {
    type Err = std::convert::Infallible;

    /// Anything that parses as an integer becomes [`PropertyId::Number`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map_or_else(|_err| PropertyId::Text(s.to_string()), PropertyId::Number))
    }
}

impl From<i64> for PropertyId {
    fn from(id: i64) -> Self {
        PropertyId::Number(id)
    }
}

impl From<i32> for PropertyId {
    fn from(id: i32) -> Self {
        PropertyId::Number(i64::from(id))
    }
}

impl From<&str> for PropertyId {
    fn from(id: &str) -> Self {
        PropertyId::Text(id.to_string())
    }
}

impl From<String> for PropertyId {
    fn from(id: String) -> Self {
        PropertyId::Text(id)
    }
}

/// Property record as handed over by the listings catalog.
///
/// Only `id`, `price` and `units` are interpreted. Every other field is kept
/// in `details` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Property id
    pub id: PropertyId,

    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Number of units available, if the listing has more than one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<u32>,

    /// Display fields (title, location, images, ...)
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Property {
    /// Create a property with no display details.
    pub fn new(id: impl Into<PropertyId>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            price,
            units: None,
            details: Map::new(),
        }
    }

    /// Set the number of available units.
    #[must_use]
    pub fn with_units(mut self, units: u32) -> Self {
        self.units = Some(units);
        self
    }

    /// Attach a display field.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Title of the listing, if one was provided.
    pub fn title(&self) -> Option<&str> {
        self.details.get("title").and_then(Value::as_str)
    }
}
