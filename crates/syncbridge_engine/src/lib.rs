//! # SyncBridge Engine Interface
//!
//! The surface of the sync engine that the session layer consumes.
//!
//! This crate provides:
//! - [`EngineHandle`], the trait an engine session implements
//! - Engine-native state and direction codes
//! - One-shot completion signals for download/upload waits
//!
//! The engine itself (protocol, connection management, conflict
//! resolution) lives behind [`EngineHandle`] and is not part of this
//! workspace.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod completion;
mod error;
mod handle;
mod types;

pub use completion::{completion_channel, CompletionNotifier, CompletionSignal};
pub use error::{EngineError, EngineResult};
pub use handle::{ConnectionChangeFn, EngineHandle, ProgressNotifierFn};
pub use types::{
    EngineConnectionState, EngineProgressDirection, EngineSessionState, EngineSyncConfig,
    EngineUser, NotifierToken,
};
