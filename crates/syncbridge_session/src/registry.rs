//! Listener registry.
//!
//! Maps caller callbacks to the engine registrations made on their behalf.
//! A registry is shared by every session facade created from the same
//! [`SessionManager`](crate::SessionManager), so a callback added through one
//! facade can be removed through another.
//!
//! ## Invariants
//!
//! - A callback has at most one live entry per registry
//! - Every live entry owns exactly one engine token once registration completes
//! - An engine token is released exactly once, when its entry is removed
//! - The engine is never called with the registry lock held

use crate::error::{SessionError, SessionResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use syncbridge_engine::{EngineHandle, NotifierToken};
use tracing::{debug, trace};

/// A kind of notification the engine can deliver.
///
/// Supplies the callback type, the per-registration arguments, and the
/// engine primitives that install and remove the translating adapter.
pub trait ListenerKind: Send + Sync + 'static {
    /// Callback type callers register.
    type Callback: ?Sized + Send + Sync + 'static;

    /// Extra arguments of one registration.
    type Args;

    /// Name used in errors and logs.
    const NAME: &'static str;

    /// Installs an adapter forwarding to `callback` and returns its token.
    fn register(
        handle: &dyn EngineHandle,
        callback: Arc<Self::Callback>,
        args: Self::Args,
    ) -> NotifierToken;

    /// Removes the adapter installed under `token`.
    fn unregister(handle: &dyn EngineHandle, token: NotifierToken);
}

/// Identity of a callback: the address of its shared allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CallbackKey(usize);

impl CallbackKey {
    fn of<C: ?Sized>(callback: &Arc<C>) -> Self {
        Self(Arc::as_ptr(callback) as *const () as usize)
    }
}

/// The engine session plus the token it returned for one registration.
struct ListenerToken {
    handle: Arc<dyn EngineHandle>,
    token: NotifierToken,
}

struct Entry<C: ?Sized> {
    // Keeps the allocation, and with it the key, alive while registered.
    _callback: Arc<C>,
    /// Distinguishes this entry from a later one for the same callback.
    generation: u64,
    /// `None` while the engine is still installing the adapter.
    listener: Option<ListenerToken>,
}

/// Registry of live listeners of one [`ListenerKind`].
pub struct ListenerRegistry<K: ListenerKind> {
    entries: Mutex<HashMap<CallbackKey, Entry<K::Callback>>>,
    next_generation: AtomicU64,
}

impl<K: ListenerKind> ListenerRegistry<K> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Registers `callback` with the engine session behind `handle`.
    ///
    /// Fails with [`SessionError::DuplicateRegistration`] if the callback
    /// already has a live entry; the registry is left unchanged.
    ///
    /// The engine is called without the registry lock held, so a callback
    /// the engine invokes during registration may add or remove listeners,
    /// itself included. If the callback is removed before the engine
    /// returns, the fresh registration is released at once.
    pub fn add(
        &self,
        callback: &Arc<K::Callback>,
        handle: &Arc<dyn EngineHandle>,
        args: K::Args,
    ) -> SessionResult<()> {
        let key = CallbackKey::of(callback);
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        {
            let mut entries = self.entries.lock();
            if entries.contains_key(&key) {
                debug!(kind = K::NAME, "rejecting duplicate listener registration");
                return Err(SessionError::DuplicateRegistration { kind: K::NAME });
            }
            entries.insert(
                key,
                Entry {
                    _callback: Arc::clone(callback),
                    generation,
                    listener: None,
                },
            );
        }

        let token = K::register(handle.as_ref(), Arc::clone(callback), args);

        let claimed = match self.entries.lock().get_mut(&key) {
            Some(entry) if entry.generation == generation => {
                entry.listener = Some(ListenerToken {
                    handle: Arc::clone(handle),
                    token,
                });
                true
            }
            _ => false,
        };

        if claimed {
            debug!(kind = K::NAME, token = token.0, "listener registered");
        } else {
            K::unregister(handle.as_ref(), token);
            debug!(
                kind = K::NAME,
                token = token.0,
                "listener removed during registration, released"
            );
        }
        Ok(())
    }

    /// Unregisters `callback`. A callback without a live entry is ignored.
    pub fn remove(&self, callback: &Arc<K::Callback>) {
        let key = CallbackKey::of(callback);
        // Detach first so the engine is called without the lock held.
        let removed = self.entries.lock().remove(&key);

        match removed.map(|entry| entry.listener) {
            Some(Some(ListenerToken { handle, token })) => {
                K::unregister(handle.as_ref(), token);
                debug!(kind = K::NAME, token = token.0, "listener unregistered");
            }
            // The pending `add` sees the entry gone and releases its token.
            Some(None) => debug!(kind = K::NAME, "pending listener registration cancelled"),
            None => trace!(kind = K::NAME, "remove of unregistered listener ignored"),
        }
    }

    /// Returns true if `callback` has a live entry.
    pub fn contains(&self, callback: &Arc<K::Callback>) -> bool {
        self.entries.lock().contains_key(&CallbackKey::of(callback))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if there are no live entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl<K: ListenerKind> Default for ListenerRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ListenerKind> fmt::Debug for ListenerRegistry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("kind", &K::NAME)
            .field("len", &self.len())
            .finish()
    }
}
