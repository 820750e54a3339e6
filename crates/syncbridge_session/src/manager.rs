//! Session manager: owner of the shared listener registries.

use crate::config::SessionManagerConfig;
use crate::notifications::{ConnectionListeners, ProgressListeners};
use crate::registry::ListenerRegistry;
use crate::session::SyncSession;
use std::fmt;
use std::sync::Arc;
use syncbridge_engine::EngineHandle;

/// State shared by a manager and every session it hands out.
pub(crate) struct ManagerShared {
    pub(crate) config: SessionManagerConfig,
    pub(crate) progress: ListenerRegistry<ProgressListeners>,
    pub(crate) connection: ListenerRegistry<ConnectionListeners>,
}

/// Hands out [`SyncSession`] facades that share one set of listener
/// registries.
///
/// Create one manager per engine (typically at startup) and obtain every
/// facade from it. A callback added through one facade can then be removed
/// through any other facade, including one created later for the same
/// engine session. Cloning a manager is cheap and shares the registries.
#[derive(Clone)]
pub struct SessionManager {
    shared: Arc<ManagerShared>,
}

impl SessionManager {
    /// Creates a manager with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SessionManagerConfig::default())
    }

    /// Creates a manager with the given configuration.
    pub fn with_config(config: SessionManagerConfig) -> Self {
        Self {
            shared: Arc::new(ManagerShared {
                config,
                progress: ListenerRegistry::new(),
                connection: ListenerRegistry::new(),
            }),
        }
    }

    /// Wraps an engine session in a facade.
    pub fn session(&self, handle: Arc<dyn EngineHandle>) -> SyncSession {
        SyncSession::new(handle, Arc::clone(&self.shared))
    }

    /// The manager's configuration.
    pub fn config(&self) -> &SessionManagerConfig {
        &self.shared.config
    }

    /// Number of live progress listeners across all sessions.
    pub fn progress_listener_count(&self) -> usize {
        self.shared.progress.len()
    }

    /// Number of live connection listeners across all sessions.
    pub fn connection_listener_count(&self) -> usize {
        self.shared.connection.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.shared.config)
            .field("progress", &self.shared.progress)
            .field("connection", &self.shared.connection)
            .finish()
    }
}
