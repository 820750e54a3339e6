//! # SyncBridge Session
//!
//! Session notification and lifecycle-control layer for a sync engine.
//!
//! This crate provides:
//! - Translation of engine-native states into a stable public vocabulary
//! - Listener registries multiplexing progress and connection callbacks
//!   onto engine registrations
//! - Deadline-bound waits for download/upload completion
//! - The [`SyncSession`] facade and the [`SessionManager`] that hands it out
//!
//! ## Architecture
//!
//! ```text
//! caller ──► SyncSession ──► translate  (state reads)
//!                        ├─► registries (progress / connection listeners)
//!                        └─► DeadlineWait (completion waits)
//!                                 │
//!                                 ▼
//!                           EngineHandle
//! ```
//!
//! ## Key Invariants
//!
//! - A callback has at most one live registration per notification kind
//! - Engine tokens are released exactly once; removal is idempotent
//! - Unknown engine values are errors, never defaults
//! - A completion wait settles exactly once; a timeout stops the wait, not
//!   the engine operation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use syncbridge_session::{ProgressCallback, ProgressDirection, ProgressMode, SessionManager};
//!
//! let manager = SessionManager::new();
//! let session = manager.session(engine_handle);
//!
//! let on_progress: ProgressCallback = Arc::new(|done, total| println!("{done}/{total}"));
//! session.add_progress_notification(
//!     ProgressDirection::Upload,
//!     ProgressMode::ForCurrentlyOutstandingWork,
//!     &on_progress,
//! )?;
//! session.upload_all_local_changes(Some(Duration::from_secs(10))).await?;
//! session.remove_progress_notification(&on_progress);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod manager;
mod notifications;
mod registry;
mod session;
mod translate;
mod types;
mod waiter;

pub use config::{
    SessionManagerConfig, WaitConfig, DEFAULT_DOWNLOAD_TIMEOUT_MESSAGE,
    DEFAULT_UPLOAD_TIMEOUT_MESSAGE,
};
pub use error::{SessionError, SessionResult};
pub use manager::SessionManager;
pub use notifications::{ConnectionListeners, ProgressListeners};
pub use registry::{ListenerKind, ListenerRegistry};
pub use session::SyncSession;
pub use translate::{
    connection_state_from_engine, connection_state_to_engine, counts_as_connected,
    progress_direction_from_engine, progress_direction_to_engine, session_state_from_engine,
};
pub use types::{
    ConnectionCallback, ConnectionNotificationCallback, ConnectionState, ProgressCallback,
    ProgressDirection, ProgressMode, ProgressNotificationCallback, SessionState,
    SessionSyncConfig, SyncScope, SyncUser,
};
pub use waiter::{render_message, DeadlineWait, TIMEOUT_PLACEHOLDER};

pub use syncbridge_codec::{ObjectId, PartitionValue};
