//! Value message encoding/decoding.
//!
//! A `Value` is a oneof: exactly one of its fields is set on encode. On
//! decode the last occurrence of any oneof field wins, as protobuf requires.

use crate::codec::proto::{Value, ValueType};
use crate::error::{DecodeError, EncodeError};
use crate::model::value::integral_value;
use crate::model::PropertyValue;

// =============================================================================
// DECODING
// =============================================================================

/// Maps one Value message to a property value.
pub fn decode_value(message: Value) -> Result<PropertyValue, DecodeError> {
    let value = match message.value_type {
        Some(ValueType::StringValue(s)) => PropertyValue::Text(s),
        Some(ValueType::DoubleValue(v)) => {
            if !v.is_finite() {
                return Err(DecodeError::NonFiniteDouble { value: v });
            }
            PropertyValue::Double(v)
        }
        Some(ValueType::PosIntValue(v)) => PropertyValue::UnsignedInteger(v),
        Some(ValueType::NegIntValue(m)) => PropertyValue::NegativeInteger(m),
        Some(ValueType::BoolValue(b)) => PropertyValue::Boolean(b),
        Some(ValueType::JsonValue(text)) => PropertyValue::Json(
            serde_json::from_str(&text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?,
        ),
        None => return Err(DecodeError::MissingField { field: "value" }),
    };
    Ok(value)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Maps a property value to its Value message.
pub fn encode_value(value: &PropertyValue) -> Result<Value, EncodeError> {
    let value_type = match value {
        PropertyValue::Text(s) => ValueType::StringValue(s.clone()),
        PropertyValue::Double(v) => {
            if !v.is_finite() {
                return Err(EncodeError::NonFiniteDouble { value: *v });
            }
            match integral_value(*v) {
                Some(folded) => return encode_value(&folded),
                None => ValueType::DoubleValue(*v),
            }
        }
        PropertyValue::UnsignedInteger(v) => ValueType::PosIntValue(*v),
        PropertyValue::NegativeInteger(m) => ValueType::NegIntValue(*m),
        PropertyValue::Boolean(b) => ValueType::BoolValue(*b),
        PropertyValue::Json(json) => ValueType::JsonValue(json.to_string()),
    };
    Ok(Value {
        value_type: Some(value_type),
    })
}
