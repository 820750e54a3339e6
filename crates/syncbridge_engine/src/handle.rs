//! The engine handle abstraction.

use crate::completion::CompletionSignal;
use crate::types::{EngineProgressDirection, EngineSyncConfig, EngineUser, NotifierToken};

/// Progress notifier installed on the engine.
///
/// Called with `(transferred, transferable)` byte counts.
pub type ProgressNotifierFn = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Connection change callback installed on the engine.
///
/// Called with the raw `(new, old)` connection state codes.
pub type ConnectionChangeFn = Box<dyn Fn(u8, u8) + Send + Sync>;

/// A handle to one session of the sync engine.
///
/// The engine owns the session; the handle only projects its state and
/// forwards control requests. Implementations must be safe to call from
/// any thread, and may invoke installed notifiers from their own threads.
pub trait EngineHandle: Send + Sync {
    /// Installs a progress notifier and returns its token.
    ///
    /// With `report_indefinitely` false, the notifier stops reporting once
    /// the work outstanding at registration time has been transferred.
    fn register_progress_notifier(
        &self,
        notifier: ProgressNotifierFn,
        direction: EngineProgressDirection,
        report_indefinitely: bool,
    ) -> NotifierToken;

    /// Removes a progress notifier.
    fn unregister_progress_notifier(&self, token: NotifierToken);

    /// Installs a connection change callback and returns its token.
    fn register_connection_change_callback(&self, callback: ConnectionChangeFn) -> NotifierToken;

    /// Removes a connection change callback.
    fn unregister_connection_change_callback(&self, token: NotifierToken);

    /// Returns a signal settled once all server changes are downloaded.
    fn wait_for_download_completion(&self) -> CompletionSignal;

    /// Returns a signal settled once all local changes are uploaded.
    fn wait_for_upload_completion(&self) -> CompletionSignal;

    /// Suspends the session.
    fn log_out(&self);

    /// Restarts the session if it was suspended.
    fn revive_if_needed(&self);

    /// Asks the engine to reconnect now instead of waiting for its backoff.
    fn handle_reconnect(&self);

    /// The user the session belongs to.
    fn user(&self) -> EngineUser;

    /// The stored sync configuration.
    fn config(&self) -> EngineSyncConfig;

    /// Raw session state code.
    fn state(&self) -> u8;

    /// Raw connection state code.
    fn connection_state(&self) -> u8;

    /// Fully resolved server URL, if the engine has one yet.
    fn full_realm_url(&self) -> Option<String>;
}
