//! The notification kinds a session exposes.
//!
//! Each kind installs an adapter on the engine that translates engine-native
//! values and forwards them to the caller's callback on the engine's
//! delivery thread, without buffering or reordering.

use crate::error::SessionError;
use crate::registry::ListenerKind;
use crate::translate::{connection_state_from_engine, progress_direction_to_engine};
use crate::types::{
    ConnectionNotificationCallback, ProgressDirection, ProgressMode, ProgressNotificationCallback,
};
use std::sync::Arc;
use syncbridge_engine::{EngineHandle, NotifierToken};
use tracing::{error, trace};

/// Progress notifications: `(transferred, transferable)` per direction.
#[derive(Debug)]
pub struct ProgressListeners;

impl ListenerKind for ProgressListeners {
    type Callback = ProgressNotificationCallback;
    type Args = (ProgressDirection, ProgressMode);
    const NAME: &'static str = "progress";

    fn register(
        handle: &dyn EngineHandle,
        callback: Arc<Self::Callback>,
        (direction, mode): Self::Args,
    ) -> NotifierToken {
        handle.register_progress_notifier(
            Box::new(move |transferred, transferable| {
                trace!(%direction, transferred, transferable, "progress delivered");
                callback(transferred, transferable);
            }),
            progress_direction_to_engine(direction),
            mode.reports_indefinitely(),
        )
    }

    fn unregister(handle: &dyn EngineHandle, token: NotifierToken) {
        handle.unregister_progress_notifier(token);
    }
}

/// Connection notifications: `(new_state, old_state)`.
#[derive(Debug)]
pub struct ConnectionListeners;

impl ListenerKind for ConnectionListeners {
    type Callback = ConnectionNotificationCallback;
    type Args = ();
    const NAME: &'static str = "connection";

    /// # Panics
    ///
    /// The installed adapter panics if the engine delivers a connection
    /// state code outside the known set.
    fn register(handle: &dyn EngineHandle, callback: Arc<Self::Callback>, _: ()) -> NotifierToken {
        handle.register_connection_change_callback(Box::new(move |new, old| {
            let translated = connection_state_from_engine(new)
                .and_then(|new| connection_state_from_engine(old).map(|old| (new, old)));
            match translated {
                Ok((new, old)) => {
                    trace!(%new, %old, "connection change delivered");
                    callback(new, old);
                }
                Err(err) => fatal(err),
            }
        }))
    }

    fn unregister(handle: &dyn EngineHandle, token: NotifierToken) {
        handle.unregister_connection_change_callback(token);
    }
}

fn fatal(err: SessionError) -> ! {
    error!(error = %err, "engine delivered a value this layer does not know");
    panic!("{err}");
}
