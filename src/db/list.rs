//! Text codec for list-valued properties and parameters.
//!
//! Lists travel as JSON text blobs. Encoding is total over scalar elements;
//! decoding needs the element type declared up front because the textual
//! form alone cannot disambiguate it.

use crate::error::{MapError, MapResult};
use crate::models::value::{ElementType, Value};
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

/// Encode a list of scalar values into its textual wire form.
pub fn encode(items: &[Value]) -> MapResult<String> {
    let encoded = items.iter().map(to_json).collect::<MapResult<Vec<_>>>()?;
    Ok(JsonValue::Array(encoded).to_string())
}

/// Decode textual wire form into a list of `element_type` values.
pub fn decode(text: &str, element_type: ElementType) -> MapResult<Vec<Value>> {
    let parsed: JsonValue = serde_json::from_str(text)?;
    let JsonValue::Array(items) = parsed else {
        return Err(MapError::list_encoding("expected a JSON array"));
    };
    items
        .iter()
        .map(|item| from_json(item, element_type))
        .collect()
}

fn to_json(value: &Value) -> MapResult<JsonValue> {
    match value {
        Value::Null => Ok(JsonValue::Null),
        Value::Bool(v) => Ok(JsonValue::Bool(*v)),
        Value::Int32(v) => Ok(JsonValue::Number((*v).into())),
        Value::Float(v) => serde_json::Number::from_f64(f64::from(*v))
            .map(JsonValue::Number)
            .ok_or_else(|| MapError::list_encoding("non-finite float cannot be encoded")),
        Value::Text(v) => Ok(JsonValue::String(v.clone())),
        Value::DateTime(v) => Ok(JsonValue::String(v.to_rfc3339())),
        Value::List(_) => Err(MapError::list_encoding("nested lists are not supported")),
    }
}

fn from_json(item: &JsonValue, element_type: ElementType) -> MapResult<Value> {
    if item.is_null() {
        return Ok(Value::Null);
    }
    match element_type {
        ElementType::Int32 => item
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::Int32)
            .ok_or_else(|| mismatch("int32", item)),
        ElementType::Bool => item
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| mismatch("bool", item)),
        ElementType::Float => item
            .as_f64()
            .map(|v| Value::Float(v as f32))
            .ok_or_else(|| mismatch("float", item)),
        ElementType::Text => item
            .as_str()
            .map(|v| Value::Text(v.to_string()))
            .ok_or_else(|| mismatch("text", item)),
        ElementType::DateTime => item
            .as_str()
            .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
            .map(|v| Value::DateTime(v.with_timezone(&Utc)))
            .ok_or_else(|| mismatch("datetime", item)),
    }
}

fn mismatch(expected: &str, item: &JsonValue) -> MapError {
    MapError::list_encoding(format!("expected {} element, got {}", expected, item))
}
