//! Product identifiers.
//!
//! Product ids arrive from several places: catalog JSON, form fields, and
//! previously persisted carts. The same product may be keyed by the number
//! `7` in one source and the text `"7"` in another, so [`ProductId`] stores a
//! normalized text form and compares on that.

use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// An opaque, type-stable product key.
///
/// Numeric and textual spellings of the same integer compare equal:
///
/// ```
/// use pocket_shop_core::ProductId;
///
/// assert_eq!(ProductId::from(7), ProductId::parse("7").unwrap());
/// assert_eq!(ProductId::parse(" sku-9 ").unwrap().as_str(), "sku-9");
/// assert!(ProductId::parse("   ").is_none());
/// ```
///
/// Canonical integer ids serialize as JSON numbers; everything else
/// serializes as a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(String);

impl ProductId {
    /// Parse an id from text, trimming surrounding whitespace.
    ///
    /// Returns `None` when nothing is left after trimming.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Extract an id from a loosely-typed JSON value.
    ///
    /// Accepts numbers and non-blank strings. `null`, booleans, arrays and
    /// objects carry no usable id.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self::from(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Self::from(u))
                } else {
                    n.as_f64().and_then(Self::from_float)
                }
            }
            _ => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)] // Guarded by the range check
    fn from_float(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        if value.fract() == 0.0 && value.abs() < 9.0e15 {
            return Some(Self((value as i64).to_string()));
        }
        Some(Self(value.to_string()))
    }

    /// Returns the normalized id text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the id as an integer when its text is a canonical integer.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        self.0
            .parse::<i64>()
            .ok()
            .filter(|n| n.to_string() == self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ProductId {
    fn from(id: i32) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(n) => serializer.serialize_i64(n),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ProductIdVisitor)
    }
}

struct ProductIdVisitor;

impl Visitor<'_> for ProductIdVisitor {
    type Value = ProductId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a product id as a number or non-empty string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ProductId::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ProductId::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        ProductId::from_float(v)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        ProductId::parse(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}
