//! Partition value types.

pub use bson::oid::ObjectId;
use uuid::Uuid;

/// The value that scopes a partition-based sync session.
///
/// The engine persists this value in extended-JSON form; see
/// [`decode_partition`](crate::decode_partition).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartitionValue {
    /// The null partition.
    Null,
    /// A string partition.
    String(String),
    /// An integer partition.
    Int(i64),
    /// An object id partition.
    ObjectId(ObjectId),
    /// A UUID partition.
    Uuid(Uuid),
}

impl PartitionValue {
    /// Returns the name of this value's type, as used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            PartitionValue::Null => "null",
            PartitionValue::String(_) => "string",
            PartitionValue::Int(_) => "int",
            PartitionValue::ObjectId(_) => "objectId",
            PartitionValue::Uuid(_) => "uuid",
        }
    }

    /// Returns the string payload, if this is a string partition.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PartitionValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PartitionValue {
    fn from(value: &str) -> Self {
        PartitionValue::String(value.to_string())
    }
}

impl From<String> for PartitionValue {
    fn from(value: String) -> Self {
        PartitionValue::String(value)
    }
}

impl From<i64> for PartitionValue {
    fn from(value: i64) -> Self {
        PartitionValue::Int(value)
    }
}

impl From<ObjectId> for PartitionValue {
    fn from(value: ObjectId) -> Self {
        PartitionValue::ObjectId(value)
    }
}

impl From<Uuid> for PartitionValue {
    fn from(value: Uuid) -> Self {
        PartitionValue::Uuid(value)
    }
}
