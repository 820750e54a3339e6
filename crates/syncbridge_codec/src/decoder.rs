//! Extended-JSON decoding for partition values.

use crate::error::{CodecError, CodecResult};
use crate::value::PartitionValue;
use bson::Bson;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Decodes a partition value from the extended-JSON text the engine stores.
///
/// Accepted forms:
/// - `null`
/// - a JSON string
/// - a JSON integer
/// - `{"$numberInt": "<i32>"}` and `{"$numberLong": "<i64>"}`
/// - `{"$oid": "<24 hex digits>"}`
/// - `{"$uuid": "<uuid>"}`
///
/// Anything else is rejected; a stored value is never coerced.
pub fn decode_partition(text: &str) -> CodecResult<PartitionValue> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| CodecError::invalid_json(e.to_string()))?;
    decode_value(&value)
}

/// Decodes a partition value from an already-parsed JSON value.
pub fn decode_value(value: &Value) -> CodecResult<PartitionValue> {
    match value {
        Value::Null => Ok(PartitionValue::Null),
        Value::String(s) => Ok(PartitionValue::String(s.clone())),
        Value::Number(n) => n
            .as_i64()
            .map(PartitionValue::Int)
            .ok_or_else(|| CodecError::invalid_number(n.to_string())),
        Value::Object(map) => decode_wrapper(map),
        Value::Bool(_) => Err(CodecError::unsupported_type("bool")),
        Value::Array(_) => Err(CodecError::unsupported_type("array")),
    }
}

fn decode_wrapper(map: &Map<String, Value>) -> CodecResult<PartitionValue> {
    let mut entries = map.iter();
    let (key, inner) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => return Err(CodecError::unsupported_type("object")),
    };

    let text = inner
        .as_str()
        .ok_or_else(|| CodecError::unsupported_type(format!("{key} with non-string payload")))?;

    match key.as_str() {
        "$uuid" => Uuid::parse_str(text)
            .map(PartitionValue::Uuid)
            .map_err(|_| CodecError::InvalidUuid {
                value: text.to_string(),
            }),
        "$numberInt" | "$numberLong" | "$oid" => {
            match Bson::try_from(Value::Object(map.clone())) {
                Ok(Bson::Int32(n)) => Ok(PartitionValue::Int(i64::from(n))),
                Ok(Bson::Int64(n)) => Ok(PartitionValue::Int(n)),
                Ok(Bson::ObjectId(oid)) => Ok(PartitionValue::ObjectId(oid)),
                Ok(_) => Err(CodecError::unsupported_type(key.as_str())),
                Err(_) if key.as_str() == "$oid" => Err(CodecError::InvalidObjectId {
                    value: text.to_string(),
                }),
                Err(_) => Err(CodecError::invalid_number(text)),
            }
        }
        other => Err(CodecError::unsupported_type(other)),
    }
}
