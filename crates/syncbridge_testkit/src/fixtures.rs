//! Ready-made engine sessions for common test scenarios.

use crate::mock::MockEngine;
use std::sync::Arc;
use syncbridge_codec::{encode_partition, PartitionValue};
use syncbridge_engine::{EngineConnectionState, EngineSessionState, EngineSyncConfig};

/// URL reported by [`connected_engine`].
pub const TEST_URL: &str = "wss://sync.example.com/api/client/v2.0/app/test-app/realm-sync";

/// An active, connected partition session with a resolved URL.
pub fn connected_engine() -> Arc<MockEngine> {
    let engine = MockEngine::shared();
    engine.set_state(EngineSessionState::Active);
    engine.set_connection_state_silently(EngineConnectionState::Connected);
    engine.set_url(Some(TEST_URL));
    engine
}

/// A session scoped to the given partition, stored the way the engine stores it.
pub fn partition_engine(partition: &PartitionValue) -> Arc<MockEngine> {
    let engine = MockEngine::shared();
    engine.set_config(EngineSyncConfig::partition(encode_partition(partition)));
    engine
}

/// A flexible sync session.
pub fn flexible_engine() -> Arc<MockEngine> {
    let engine = MockEngine::shared();
    engine.set_config(EngineSyncConfig::flexible());
    engine
}
