//! The session facade.

use crate::error::{SessionError, SessionResult};
use crate::manager::ManagerShared;
use crate::translate::{
    connection_state_from_engine, counts_as_connected, session_state_from_engine,
};
use crate::types::{
    ConnectionCallback, ConnectionState, ProgressCallback, ProgressDirection, ProgressMode,
    SessionState, SessionSyncConfig, SyncScope, SyncUser,
};
use crate::waiter::DeadlineWait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use syncbridge_codec::decode_partition;
use syncbridge_engine::{EngineConnectionState, EngineHandle, EngineSessionState};
use tracing::debug;

/// A sync session as seen by the application.
///
/// Every accessor reads the engine's current state; nothing is cached.
/// Several facades may wrap the same engine session. They compare equal and
/// behave identically, because listener bookkeeping lives in the
/// [`SessionManager`](crate::SessionManager) they came from.
#[derive(Clone)]
pub struct SyncSession {
    handle: Arc<dyn EngineHandle>,
    shared: Arc<ManagerShared>,
}

impl SyncSession {
    pub(crate) fn new(handle: Arc<dyn EngineHandle>, shared: Arc<ManagerShared>) -> Self {
        Self { handle, shared }
    }

    /// The user and data scope of the session.
    ///
    /// Fails with [`SessionError::ConfigDecode`] if the stored partition
    /// value is malformed.
    pub fn config(&self) -> SessionResult<SessionSyncConfig> {
        let stored = self.handle.config();
        let scope = if stored.flx_sync_requested {
            SyncScope::Flexible
        } else {
            SyncScope::Partition(decode_partition(&stored.partition_value)?)
        };
        Ok(SessionSyncConfig {
            user: self.user(),
            scope,
        })
    }

    /// The session state.
    pub fn state(&self) -> SessionResult<SessionState> {
        session_state_from_engine(self.handle.state())
    }

    /// The connection state.
    pub fn connection_state(&self) -> SessionResult<ConnectionState> {
        connection_state_from_engine(self.handle.connection_state())
    }

    /// The fully resolved server URL.
    ///
    /// Fails with [`SessionError::UrlUnavailable`] until the engine has
    /// resolved one, typically before the first connection.
    pub fn url(&self) -> SessionResult<String> {
        self.handle
            .full_realm_url()
            .filter(|url| !url.is_empty())
            .ok_or(SessionError::UrlUnavailable)
    }

    /// The user the session belongs to.
    pub fn user(&self) -> SyncUser {
        self.handle.user().into()
    }

    /// Whether the session is connected.
    ///
    /// True when the connection is up and the session is active or still
    /// draining its last changes.
    pub fn is_connected(&self) -> SessionResult<bool> {
        let connection = EngineConnectionState::try_from(self.handle.connection_state())?;
        let state = EngineSessionState::try_from(self.handle.state())?;
        Ok(counts_as_connected(connection, state))
    }

    /// Suspends the session. The engine session itself stays alive.
    pub fn pause(&self) {
        debug!("pausing sync session");
        self.handle.log_out();
    }

    /// Restarts the session if it was suspended.
    pub fn resume(&self) {
        debug!("resuming sync session");
        self.handle.revive_if_needed();
    }

    /// Asks the engine to reconnect now rather than after its backoff delay.
    pub fn reconnect(&self) {
        debug!("requesting sync session reconnect");
        self.handle.handle_reconnect();
    }

    /// Registers a progress callback.
    ///
    /// Fails with [`SessionError::DuplicateRegistration`] if `callback` is
    /// already registered for progress.
    pub fn add_progress_notification(
        &self,
        direction: ProgressDirection,
        mode: ProgressMode,
        callback: &ProgressCallback,
    ) -> SessionResult<()> {
        self.shared
            .progress
            .add(callback, &self.handle, (direction, mode))
    }

    /// Unregisters a progress callback. Unknown callbacks are ignored.
    pub fn remove_progress_notification(&self, callback: &ProgressCallback) {
        self.shared.progress.remove(callback);
    }

    /// Registers a connection state callback.
    ///
    /// Fails with [`SessionError::DuplicateRegistration`] if `callback` is
    /// already registered for connection changes.
    pub fn add_connection_notification(&self, callback: &ConnectionCallback) -> SessionResult<()> {
        self.shared.connection.add(callback, &self.handle, ())
    }

    /// Unregisters a connection state callback. Unknown callbacks are ignored.
    pub fn remove_connection_notification(&self, callback: &ConnectionCallback) {
        self.shared.connection.remove(callback);
    }

    /// Waits until all server changes known at call time are downloaded.
    ///
    /// With no `timeout`, the manager's default applies. On timeout the
    /// download keeps going in the engine.
    pub async fn download_all_server_changes(
        &self,
        timeout: Option<Duration>,
    ) -> SessionResult<()> {
        let wait = &self.shared.config.download;
        DeadlineWait::new(self.handle.wait_for_download_completion())
            .with_timeout(wait.resolve(timeout))
            .with_message(wait.timeout_message.as_str())
            .wait()
            .await
    }

    /// Waits until all local changes made before the call are uploaded.
    ///
    /// With no `timeout`, the manager's default applies. On timeout the
    /// upload keeps going in the engine.
    pub async fn upload_all_local_changes(&self, timeout: Option<Duration>) -> SessionResult<()> {
        let wait = &self.shared.config.upload;
        DeadlineWait::new(self.handle.wait_for_upload_completion())
            .with_timeout(wait.resolve(timeout))
            .with_message(wait.timeout_message.as_str())
            .wait()
            .await
    }

    fn handle_addr(&self) -> *const () {
        Arc::as_ptr(&self.handle) as *const ()
    }
}

impl PartialEq for SyncSession {
    fn eq(&self, other: &Self) -> bool {
        self.handle_addr() == other.handle_addr()
    }
}

impl Eq for SyncSession {}

impl fmt::Debug for SyncSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSession")
            .field("state", &self.state())
            .field("connection_state", &self.connection_state())
            .field("url", &self.handle.full_realm_url())
            .field("user", &self.handle.user().id)
            .finish()
    }
}
