//! Property-based test generators using proptest.

use proptest::prelude::*;
use syncbridge_codec::{ObjectId, PartitionValue};
use syncbridge_engine::{EngineConnectionState, EngineProgressDirection, EngineSessionState};
use uuid::Uuid;

/// Strategy for known connection state codes.
pub fn connection_state_strategy() -> impl Strategy<Value = EngineConnectionState> {
    prop::sample::select(EngineConnectionState::ALL.to_vec())
}

/// Strategy for known session state codes.
pub fn session_state_strategy() -> impl Strategy<Value = EngineSessionState> {
    prop::sample::select(EngineSessionState::ALL.to_vec())
}

/// Strategy for known progress directions.
pub fn direction_strategy() -> impl Strategy<Value = EngineProgressDirection> {
    prop::sample::select(EngineProgressDirection::ALL.to_vec())
}

/// Strategy for raw codes the engine does not define for connection states.
pub fn unknown_connection_code_strategy() -> impl Strategy<Value = u8> {
    (EngineConnectionState::ALL.len() as u8)..=u8::MAX
}

/// Strategy for raw codes the engine does not define for session states.
pub fn unknown_session_code_strategy() -> impl Strategy<Value = u8> {
    (EngineSessionState::ALL.len() as u8)..=u8::MAX
}

/// Strategy for raw codes the engine does not define for directions.
pub fn unknown_direction_code_strategy() -> impl Strategy<Value = u8> {
    (EngineProgressDirection::ALL.len() as u8)..=u8::MAX
}

/// Strategy for partition values of every supported type.
pub fn partition_value_strategy() -> impl Strategy<Value = PartitionValue> {
    prop_oneof![
        Just(PartitionValue::Null),
        "[a-zA-Z0-9_-]{0,24}".prop_map(PartitionValue::String),
        any::<i64>().prop_map(PartitionValue::Int),
        prop::array::uniform12(any::<u8>())
            .prop_map(|bytes| PartitionValue::ObjectId(ObjectId::from_bytes(bytes))),
        any::<[u8; 16]>().prop_map(|bytes| PartitionValue::Uuid(Uuid::from_bytes(bytes))),
    ]
}

/// Strategy for `(transferred, transferable)` pairs with `transferred <= transferable`.
pub fn progress_pair_strategy() -> impl Strategy<Value = (u64, u64)> {
    (0u64..1_000_000).prop_flat_map(|total| (0..=total, Just(total)))
}
