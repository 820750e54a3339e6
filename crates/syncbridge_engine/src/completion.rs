//! One-shot completion signals for long-running engine operations.

use crate::error::{EngineError, EngineResult};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Creates a connected notifier/signal pair.
///
/// The engine keeps the [`CompletionNotifier`] and settles it when the
/// operation finishes; the caller awaits the [`CompletionSignal`].
pub fn completion_channel() -> (CompletionNotifier, CompletionSignal) {
    let (tx, rx) = oneshot::channel();
    (CompletionNotifier { tx }, CompletionSignal { rx })
}

/// Engine side of a completion signal.
#[derive(Debug)]
pub struct CompletionNotifier {
    tx: oneshot::Sender<EngineResult<()>>,
}

impl CompletionNotifier {
    /// Settles the signal.
    ///
    /// Returns false if nobody is waiting anymore; the engine carries on
    /// either way.
    pub fn complete(self, result: EngineResult<()>) -> bool {
        self.tx.send(result).is_ok()
    }

    /// Returns true while the paired signal is still held by a waiter.
    pub fn is_waiting(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Caller side of a completion signal.
///
/// Resolves exactly once with the engine's outcome. If the engine drops the
/// notifier without settling it, resolves with [`EngineError::Abandoned`].
#[derive(Debug)]
pub struct CompletionSignal {
    rx: oneshot::Receiver<EngineResult<()>>,
}

impl CompletionSignal {
    /// Creates a signal that is already settled.
    pub fn ready(result: EngineResult<()>) -> Self {
        let (notifier, signal) = completion_channel();
        notifier.complete(result);
        signal
    }
}

impl Future for CompletionSignal {
    type Output = EngineResult<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(EngineError::Abandoned)))
    }
}
