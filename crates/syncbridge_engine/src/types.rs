//! Engine-native values.
//!
//! The engine reports states and directions as raw `u8` codes. The closed
//! enums here give each known code a name; decoding an unknown code fails
//! with [`EngineError::UnknownCode`].

use crate::error::EngineError;

/// Connection state of an engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EngineConnectionState {
    /// No connection.
    Disconnected = 0,
    /// Connection being established.
    Connecting = 1,
    /// Connection established.
    Connected = 2,
}

impl EngineConnectionState {
    /// All known connection states.
    pub const ALL: [Self; 3] = [Self::Disconnected, Self::Connecting, Self::Connected];

    /// Returns the raw code.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for EngineConnectionState {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Disconnected),
            1 => Ok(Self::Connecting),
            2 => Ok(Self::Connected),
            _ => Err(EngineError::UnknownCode {
                kind: "connection state",
                value,
            }),
        }
    }
}

/// Lifecycle state of an engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EngineSessionState {
    /// Session is running.
    Active = 0,
    /// Session is draining its last changes before going inactive.
    Dying = 1,
    /// Session is stopped.
    Inactive = 2,
    /// Session waits for a fresh access token.
    WaitingForAccessToken = 3,
    /// Session was paused by the application.
    Paused = 4,
}

impl EngineSessionState {
    /// All known session states.
    pub const ALL: [Self; 5] = [
        Self::Active,
        Self::Dying,
        Self::Inactive,
        Self::WaitingForAccessToken,
        Self::Paused,
    ];

    /// Returns the raw code.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for EngineSessionState {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Active),
            1 => Ok(Self::Dying),
            2 => Ok(Self::Inactive),
            3 => Ok(Self::WaitingForAccessToken),
            4 => Ok(Self::Paused),
            _ => Err(EngineError::UnknownCode {
                kind: "session state",
                value,
            }),
        }
    }
}

/// Direction of a progress notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EngineProgressDirection {
    /// Local changes going to the server.
    Upload = 0,
    /// Server changes coming to the device.
    Download = 1,
}

impl EngineProgressDirection {
    /// All known directions.
    pub const ALL: [Self; 2] = [Self::Upload, Self::Download];

    /// Returns the raw code.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for EngineProgressDirection {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Upload),
            1 => Ok(Self::Download),
            _ => Err(EngineError::UnknownCode {
                kind: "progress direction",
                value,
            }),
        }
    }
}

/// Opaque token identifying one notifier registration on an engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotifierToken(pub u64);

/// The user an engine session is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineUser {
    /// Server-side user id.
    pub id: String,
    /// Authentication provider that issued the identity.
    pub provider: String,
}

impl EngineUser {
    /// Creates a user.
    pub fn new(id: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
        }
    }
}

/// Sync configuration as the engine stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSyncConfig {
    /// Partition value in extended-JSON text. Ignored for flexible sync.
    pub partition_value: String,
    /// Whether the session uses flexible sync.
    pub flx_sync_requested: bool,
}

impl EngineSyncConfig {
    /// Creates a partition-based configuration.
    pub fn partition(partition_value: impl Into<String>) -> Self {
        Self {
            partition_value: partition_value.into(),
            flx_sync_requested: false,
        }
    }

    /// Creates a flexible sync configuration.
    pub fn flexible() -> Self {
        Self {
            partition_value: String::new(),
            flx_sync_requested: true,
        }
    }
}
