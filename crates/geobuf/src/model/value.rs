//! Property values attached to features, geometries and collections.

use std::collections::BTreeMap;

/// Property map: key -> value. Keys are unique within one object.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// 2^64 as f64; the first float magnitude that does not fit in `u64`.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// A dynamically-typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// UTF-8 text.
    Text(String),
    /// Finite, non-integral floating-point number.
    Double(f64),
    /// Integer >= 0.
    UnsignedInteger(u64),
    /// Integer < 0, stored as its magnitude.
    NegativeInteger(u64),
    /// Boolean. Never folded into the integer variants.
    Boolean(bool),
    /// Composite JSON value (object or array), carried verbatim.
    Json(serde_json::Value),
}

impl PropertyValue {
    /// Creates the integer variant matching the sign of `value`.
    pub fn from_i64(value: i64) -> Self {
        if value >= 0 {
            PropertyValue::UnsignedInteger(value as u64)
        } else {
            PropertyValue::NegativeInteger(value.unsigned_abs())
        }
    }

    /// Creates a value from a float, folding integral values into the
    /// integer variants when their magnitude fits in `u64`.
    pub fn from_f64(value: f64) -> Self {
        integral_value(value).unwrap_or(PropertyValue::Double(value))
    }
}

/// Returns the integer variant for an integral, finite float in `u64`
/// magnitude range, or `None` if the float must stay a double.
pub(crate) fn integral_value(value: f64) -> Option<PropertyValue> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value >= 0.0 && value < U64_LIMIT {
        Some(PropertyValue::UnsignedInteger(value as u64))
    } else if value < 0.0 && -value < U64_LIMIT {
        Some(PropertyValue::NegativeInteger((-value) as u64))
    } else {
        None
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::from_i64(value)
    }
}

impl From<u64> for PropertyValue {
    fn from(value: u64) -> Self {
        PropertyValue::UnsignedInteger(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::from_f64(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_i64() {
        assert_eq!(PropertyValue::from_i64(0), PropertyValue::UnsignedInteger(0));
        assert_eq!(PropertyValue::from_i64(42), PropertyValue::UnsignedInteger(42));
        assert_eq!(PropertyValue::from_i64(-1), PropertyValue::NegativeInteger(1));
        assert_eq!(
            PropertyValue::from_i64(i64::MIN),
            PropertyValue::NegativeInteger(1 << 63)
        );
    }

    #[test]
    fn test_from_f64_folds_integral_values() {
        assert_eq!(PropertyValue::from_f64(3.0), PropertyValue::UnsignedInteger(3));
        assert_eq!(PropertyValue::from_f64(-3.0), PropertyValue::NegativeInteger(3));
        assert_eq!(PropertyValue::from_f64(-0.0), PropertyValue::UnsignedInteger(0));
        assert_eq!(PropertyValue::from_f64(1.5), PropertyValue::Double(1.5));
        // Too large for u64: stays a double.
        assert_eq!(PropertyValue::from_f64(1e20), PropertyValue::Double(1e20));
        assert!(matches!(
            PropertyValue::from_f64(f64::INFINITY),
            PropertyValue::Double(v) if v.is_infinite()
        ));
    }

    #[test]
    fn test_bool_is_not_an_integer() {
        let value: PropertyValue = true.into();
        assert_eq!(value, PropertyValue::Boolean(true));
    }
}
