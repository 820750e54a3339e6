//! Public vocabulary of the session layer.

use std::fmt;
use std::sync::Arc;
use syncbridge_codec::PartitionValue;
use syncbridge_engine::EngineUser;

/// Direction of a progress notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressDirection {
    /// Server changes coming to the device.
    Download,
    /// Local changes going to the server.
    Upload,
}

impl ProgressDirection {
    /// All directions.
    pub const ALL: [Self; 2] = [Self::Download, Self::Upload];

    /// Stable name of the direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressDirection::Download => "download",
            ProgressDirection::Upload => "upload",
        }
    }
}

/// How long a progress notification keeps reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressMode {
    /// Report every transfer for as long as the callback is registered.
    ReportIndefinitely,
    /// Stop once the work outstanding at registration time is transferred.
    ForCurrentlyOutstandingWork,
}

impl ProgressMode {
    /// Stable name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressMode::ReportIndefinitely => "reportIndefinitely",
            ProgressMode::ForCurrentlyOutstandingWork => "forCurrentlyOutstandingWork",
        }
    }

    /// Whether the engine should keep reporting after outstanding work completes.
    pub fn reports_indefinitely(&self) -> bool {
        matches!(self, ProgressMode::ReportIndefinitely)
    }
}

/// Connection state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No connection to the server.
    Disconnected,
    /// Connection being established.
    Connecting,
    /// Connected to the server.
    Connected,
}

impl ConnectionState {
    /// All connection states.
    pub const ALL: [Self; 3] = [Self::Disconnected, Self::Connecting, Self::Connected];

    /// Stable name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        }
    }

    /// Returns true for [`ConnectionState::Connected`].
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// The session is syncing, or trying to.
    Active,
    /// The session is stopped.
    Inactive,
    /// The session can no longer be used.
    Invalid,
}

impl SessionState {
    /// Stable name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Active => "active",
            SessionState::Inactive => "inactive",
            SessionState::Invalid => "invalid",
        }
    }

    /// Returns true for [`SessionState::Active`].
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active)
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(ProgressDirection, ProgressMode, ConnectionState, SessionState);

/// Callback invoked with `(transferred, transferable)` byte counts.
pub type ProgressNotificationCallback = dyn Fn(u64, u64) + Send + Sync;

/// Callback invoked with `(new_state, old_state)`.
pub type ConnectionNotificationCallback = dyn Fn(ConnectionState, ConnectionState) + Send + Sync;

/// A shareable progress callback. Its allocation is its identity.
pub type ProgressCallback = Arc<ProgressNotificationCallback>;

/// A shareable connection callback. Its allocation is its identity.
pub type ConnectionCallback = Arc<ConnectionNotificationCallback>;

/// The user a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncUser {
    /// Server-side user id.
    pub id: String,
    /// Authentication provider of the identity.
    pub provider: String,
}

impl From<EngineUser> for SyncUser {
    fn from(user: EngineUser) -> Self {
        Self {
            id: user.id,
            provider: user.provider,
        }
    }
}

/// How a session scopes the data it synchronizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncScope {
    /// Flexible sync: subscriptions decide what is synced.
    Flexible,
    /// Partition-based sync on a single partition value.
    Partition(PartitionValue),
}

/// Resolved sync configuration of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSyncConfig {
    /// User of the session.
    pub user: SyncUser,
    /// Data scope of the session.
    pub scope: SyncScope,
}

impl SessionSyncConfig {
    /// Returns true for flexible sync sessions.
    pub fn is_flexible(&self) -> bool {
        matches!(self.scope, SyncScope::Flexible)
    }

    /// Returns the partition value of a partition-based session.
    pub fn partition(&self) -> Option<&PartitionValue> {
        match &self.scope {
            SyncScope::Partition(value) => Some(value),
            SyncScope::Flexible => None,
        }
    }
}
