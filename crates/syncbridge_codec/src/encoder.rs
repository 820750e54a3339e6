//! Extended-JSON encoding for partition values.

use crate::value::PartitionValue;
use serde_json::{json, Value};

/// Encodes a partition value in the canonical extended-JSON form.
///
/// Integers are always written as `$numberLong` so that the stored text
/// does not depend on the magnitude of the value.
pub fn encode_partition(value: &PartitionValue) -> String {
    to_value(value).to_string()
}

/// Converts a partition value to its extended-JSON [`Value`].
pub fn to_value(value: &PartitionValue) -> Value {
    match value {
        PartitionValue::Null => Value::Null,
        PartitionValue::String(s) => Value::String(s.clone()),
        PartitionValue::Int(n) => json!({ "$numberLong": n.to_string() }),
        PartitionValue::ObjectId(oid) => json!({ "$oid": oid.to_hex() }),
        PartitionValue::Uuid(uuid) => json!({ "$uuid": uuid.hyphenated().to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ObjectId;

    #[test]
    fn encode_canonical_forms() {
        assert_eq!(encode_partition(&PartitionValue::Null), "null");
        assert_eq!(encode_partition(&"a\"b".into()), r#""a\"b""#);
        assert_eq!(
            encode_partition(&PartitionValue::Int(7)),
            r#"{"$numberLong":"7"}"#
        );
        assert_eq!(
            encode_partition(&PartitionValue::ObjectId(ObjectId::from_bytes([0xab; 12]))),
            r#"{"$oid":"abababababababababababab"}"#
        );
    }
}
