//! A scriptable in-memory engine.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use syncbridge_engine::{
    completion_channel, CompletionNotifier, CompletionSignal, ConnectionChangeFn,
    EngineConnectionState, EngineHandle, EngineProgressDirection, EngineResult,
    EngineSessionState, EngineSyncConfig, EngineUser, NotifierToken, ProgressNotifierFn,
};

/// A call the session layer made into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCall {
    /// `register_progress_notifier`.
    RegisterProgress {
        /// Token handed out.
        token: NotifierToken,
        /// Requested direction.
        direction: EngineProgressDirection,
        /// Requested reporting mode.
        report_indefinitely: bool,
    },
    /// `unregister_progress_notifier`.
    UnregisterProgress(NotifierToken),
    /// `register_connection_change_callback`.
    RegisterConnection(NotifierToken),
    /// `unregister_connection_change_callback`.
    UnregisterConnection(NotifierToken),
    /// `log_out`.
    LogOut,
    /// `revive_if_needed`.
    ReviveIfNeeded,
    /// `handle_reconnect`.
    HandleReconnect,
}

struct ProgressRegistration {
    notifier: Arc<ProgressNotifierFn>,
    direction: EngineProgressDirection,
    report_indefinitely: bool,
}

/// An engine handle whose state is set by the test.
///
/// Notifiers are invoked synchronously on the thread that calls
/// [`emit_progress`](Self::emit_progress) or
/// [`set_connection_state`](Self::set_connection_state), which lets tests
/// act as the engine's delivery thread.
pub struct MockEngine {
    state: AtomicU8,
    connection_state: AtomicU8,
    url: Mutex<Option<String>>,
    user: Mutex<EngineUser>,
    config: Mutex<EngineSyncConfig>,
    next_token: AtomicU64,
    progress_on_register: Mutex<Option<(u64, u64)>>,
    progress: Mutex<BTreeMap<NotifierToken, ProgressRegistration>>,
    connection: Mutex<BTreeMap<NotifierToken, Arc<ConnectionChangeFn>>>,
    download_waiters: Mutex<Vec<CompletionNotifier>>,
    upload_waiters: Mutex<Vec<CompletionNotifier>>,
    calls: Mutex<Vec<EngineCall>>,
}

impl MockEngine {
    /// Creates an active, disconnected engine session for a partition of `"default"`.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(EngineSessionState::Active.code()),
            connection_state: AtomicU8::new(EngineConnectionState::Disconnected.code()),
            url: Mutex::new(None),
            user: Mutex::new(EngineUser::new("user-1", "local-userpass")),
            config: Mutex::new(EngineSyncConfig::partition("\"default\"")),
            next_token: AtomicU64::new(1),
            progress_on_register: Mutex::new(None),
            progress: Mutex::new(BTreeMap::new()),
            connection: Mutex::new(BTreeMap::new()),
            download_waiters: Mutex::new(Vec::new()),
            upload_waiters: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a mock wrapped in an `Arc`, ready to hand to a session.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Sets the session state.
    pub fn set_state(&self, state: EngineSessionState) {
        self.set_state_code(state.code());
    }

    /// Sets a raw session state code, including unknown ones.
    pub fn set_state_code(&self, code: u8) {
        self.state.store(code, Ordering::SeqCst);
    }

    /// Sets the connection state and notifies connection callbacks.
    pub fn set_connection_state(&self, state: EngineConnectionState) {
        self.set_connection_state_code(state.code());
    }

    /// Sets a raw connection state code and notifies connection callbacks.
    ///
    /// Callbacks are not notified when the code does not change.
    pub fn set_connection_state_code(&self, code: u8) {
        let old = self.connection_state.swap(code, Ordering::SeqCst);
        if old != code {
            self.emit_connection_change(code, old);
        }
    }

    /// Sets the connection state without notifying anyone.
    pub fn set_connection_state_silently(&self, state: EngineConnectionState) {
        self.connection_state.store(state.code(), Ordering::SeqCst);
    }

    /// Invokes every connection callback with raw `(new, old)` codes.
    pub fn emit_connection_change(&self, new: u8, old: u8) {
        let callbacks: Vec<_> = self.connection.lock().values().cloned().collect();
        for callback in callbacks {
            callback(new, old);
        }
    }

    /// Sets or clears the server URL.
    pub fn set_url(&self, url: Option<&str>) {
        *self.url.lock() = url.map(str::to_string);
    }

    /// Sets the user.
    pub fn set_user(&self, user: EngineUser) {
        *self.user.lock() = user;
    }

    /// Sets the stored sync configuration.
    pub fn set_config(&self, config: EngineSyncConfig) {
        *self.config.lock() = config;
    }

    /// Makes every new progress notifier receive `progress` synchronously,
    /// from inside the registration call, as engines that report the
    /// current position on registration do. `None` turns this off.
    pub fn report_on_register(&self, progress: Option<(u64, u64)>) {
        *self.progress_on_register.lock() = progress;
    }

    /// Reports progress to every notifier of `direction`.
    ///
    /// Notifiers registered without `report_indefinitely` are dropped after
    /// reporting `transferred >= transferable`, as the engine does once the
    /// outstanding work is done.
    pub fn emit_progress(
        &self,
        direction: EngineProgressDirection,
        transferred: u64,
        transferable: u64,
    ) {
        let targets: Vec<_> = {
            let mut progress = self.progress.lock();
            let targets = progress
                .values()
                .filter(|r| r.direction == direction)
                .map(|r| Arc::clone(&r.notifier))
                .collect();
            if transferred >= transferable {
                progress.retain(|_, r| r.direction != direction || r.report_indefinitely);
            }
            targets
        };
        for notifier in targets {
            notifier(transferred, transferable);
        }
    }

    /// Settles every pending download wait. Returns how many were settled.
    pub fn complete_download(&self, result: EngineResult<()>) -> usize {
        Self::settle(&self.download_waiters, result)
    }

    /// Settles every pending upload wait. Returns how many were settled.
    pub fn complete_upload(&self, result: EngineResult<()>) -> usize {
        Self::settle(&self.upload_waiters, result)
    }

    fn settle(waiters: &Mutex<Vec<CompletionNotifier>>, result: EngineResult<()>) -> usize {
        let pending = std::mem::take(&mut *waiters.lock());
        let count = pending.len();
        for notifier in pending {
            notifier.complete(result.clone());
        }
        count
    }

    /// Number of download waits still held by the engine.
    pub fn pending_download_waits(&self) -> usize {
        self.download_waiters.lock().len()
    }

    /// Number of upload waits still held by the engine.
    pub fn pending_upload_waits(&self) -> usize {
        self.upload_waiters.lock().len()
    }

    /// Number of installed progress notifiers.
    pub fn progress_notifier_count(&self) -> usize {
        self.progress.lock().len()
    }

    /// Number of installed connection callbacks.
    pub fn connection_callback_count(&self) -> usize {
        self.connection.lock().len()
    }

    /// Tokens of the installed progress notifiers.
    pub fn progress_tokens(&self) -> Vec<NotifierToken> {
        self.progress.lock().keys().copied().collect()
    }

    /// Every call recorded so far, in order.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().push(call);
    }

    fn next_token(&self) -> NotifierToken {
        NotifierToken(self.next_token.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineHandle for MockEngine {
    fn register_progress_notifier(
        &self,
        notifier: ProgressNotifierFn,
        direction: EngineProgressDirection,
        report_indefinitely: bool,
    ) -> NotifierToken {
        let token = self.next_token();
        let notifier = Arc::new(notifier);
        self.progress.lock().insert(
            token,
            ProgressRegistration {
                notifier: Arc::clone(&notifier),
                direction,
                report_indefinitely,
            },
        );
        self.record(EngineCall::RegisterProgress {
            token,
            direction,
            report_indefinitely,
        });

        let initial = *self.progress_on_register.lock();
        if let Some((transferred, transferable)) = initial {
            notifier(transferred, transferable);
            if !report_indefinitely && transferred >= transferable {
                self.progress.lock().remove(&token);
            }
        }
        token
    }

    fn unregister_progress_notifier(&self, token: NotifierToken) {
        self.progress.lock().remove(&token);
        self.record(EngineCall::UnregisterProgress(token));
    }

    fn register_connection_change_callback(&self, callback: ConnectionChangeFn) -> NotifierToken {
        let token = self.next_token();
        self.connection.lock().insert(token, Arc::new(callback));
        self.record(EngineCall::RegisterConnection(token));
        token
    }

    fn unregister_connection_change_callback(&self, token: NotifierToken) {
        self.connection.lock().remove(&token);
        self.record(EngineCall::UnregisterConnection(token));
    }

    fn wait_for_download_completion(&self) -> CompletionSignal {
        let (notifier, signal) = completion_channel();
        self.download_waiters.lock().push(notifier);
        signal
    }

    fn wait_for_upload_completion(&self) -> CompletionSignal {
        let (notifier, signal) = completion_channel();
        self.upload_waiters.lock().push(notifier);
        signal
    }

    fn log_out(&self) {
        self.state
            .store(EngineSessionState::Inactive.code(), Ordering::SeqCst);
        self.record(EngineCall::LogOut);
    }

    fn revive_if_needed(&self) {
        let current = EngineSessionState::try_from(self.state.load(Ordering::SeqCst));
        if matches!(
            current,
            Ok(EngineSessionState::Inactive | EngineSessionState::Paused)
        ) {
            self.state
                .store(EngineSessionState::Active.code(), Ordering::SeqCst);
        }
        self.record(EngineCall::ReviveIfNeeded);
    }

    fn handle_reconnect(&self) {
        self.record(EngineCall::HandleReconnect);
    }

    fn user(&self) -> EngineUser {
        self.user.lock().clone()
    }

    fn config(&self) -> EngineSyncConfig {
        self.config.lock().clone()
    }

    fn state(&self) -> u8 {
        self.state.load(Ordering::SeqCst)
    }

    fn connection_state(&self) -> u8 {
        self.connection_state.load(Ordering::SeqCst)
    }

    fn full_realm_url(&self) -> Option<String> {
        self.url.lock().clone()
    }
}
