//! # SyncBridge Codec
//!
//! Extended-JSON codec for the partition value of a sync session.
//!
//! The sync engine persists the partition value of a partition-based
//! session as extended JSON. This crate turns that text into a typed
//! [`PartitionValue`] and back.
//!
//! ## Usage
//!
//! ```
//! use syncbridge_codec::{decode_partition, encode_partition, PartitionValue};
//!
//! let value = decode_partition(r#"{"$numberLong":"42"}"#).unwrap();
//! assert_eq!(value, PartitionValue::Int(42));
//! assert_eq!(encode_partition(&value), r#"{"$numberLong":"42"}"#);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod value;

pub use decoder::{decode_partition, decode_value};
pub use encoder::{encode_partition, to_value};
pub use error::{CodecError, CodecResult};
pub use value::{ObjectId, PartitionValue};
