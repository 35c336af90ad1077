use serde_json::{Map, Number, Value as JsonValue};

use crate::proto::value::ValueType;
use crate::proto::{Field, Value};

// Convert a float to a JSON number; NaN and infinities become null
fn float_to_json(f: f64) -> JsonValue {
    Number::from_f64(f).map(JsonValue::Number).unwrap_or(JsonValue::Null)
}

/// Resolve the populated variant of an attribute value.
pub fn resolve_value(value: &Value) -> JsonValue {
    match &value.value_type {
        Some(ValueType::StringValue(s)) => JsonValue::String(s.clone()),
        Some(ValueType::FloatValue(f)) => float_to_json(f64::from(*f)),
        Some(ValueType::DoubleValue(d)) => float_to_json(*d),
        Some(ValueType::SintValue(i)) => JsonValue::from(*i),
        Some(ValueType::UintValue(u)) => JsonValue::from(*u),
        Some(ValueType::Int64Value(i)) => JsonValue::from(*i),
        Some(ValueType::Uint64Value(u)) => JsonValue::from(*u),
        Some(ValueType::Sint64Value(i)) => JsonValue::from(*i),
        Some(ValueType::BoolValue(b)) => JsonValue::Bool(*b),
        None => JsonValue::Null,
    }
}

/// Pair field names with a feature's attribute values by position.
///
/// Properties keep field order. A field with no value at its index maps to
/// null; surplus values are ignored.
pub fn collect_attributes(fields: &[Field], values: &[Value]) -> Map<String, JsonValue> {
    let mut properties = Map::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        let value = values.get(index).map(resolve_value).unwrap_or(JsonValue::Null);
        properties.insert(field.name.clone(), value);
    }
    properties
}

/// Look up the feature id: the value sitting at the position of `id_field`.
pub fn feature_id(fields: &[Field], values: &[Value], id_field: &str) -> Option<JsonValue> {
    let index = fields.iter().position(|field| field.name == id_field)?;
    match values.get(index).map(resolve_value) {
        Some(JsonValue::Null) | None => None,
        id => id,
    }
}
