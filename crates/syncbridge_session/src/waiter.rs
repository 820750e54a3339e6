//! Deadline-bound waits on engine completion signals.

use crate::error::{SessionError, SessionResult};
use std::time::Duration;
use syncbridge_engine::CompletionSignal;
use tracing::{debug, warn};

/// Placeholder replaced by the timeout in milliseconds when a timeout
/// message is rendered.
pub const TIMEOUT_PLACEHOLDER: &str = "{timeout_ms}";

const DEFAULT_MESSAGE: &str = "Operation did not complete in {timeout_ms} ms.";

/// Waits for a completion signal, optionally bounded by a timeout.
///
/// Exactly one outcome is produced. When both the signal and the timer are
/// ready at the same poll, the signal wins. On timeout the engine operation
/// keeps running; only the wait ends.
///
/// Timed waits need a Tokio runtime with the time driver enabled.
#[derive(Debug)]
pub struct DeadlineWait {
    signal: CompletionSignal,
    timeout: Option<Duration>,
    message: String,
}

impl DeadlineWait {
    /// Creates an unbounded wait on `signal`.
    pub fn new(signal: CompletionSignal) -> Self {
        Self {
            signal,
            timeout: None,
            message: DEFAULT_MESSAGE.to_string(),
        }
    }

    /// Bounds the wait. `None` waits for as long as the signal takes.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the timeout message template. See [`TIMEOUT_PLACEHOLDER`].
    pub fn with_message(mut self, template: impl Into<String>) -> Self {
        self.message = template.into();
        self
    }

    /// Waits for the outcome.
    pub async fn wait(self) -> SessionResult<()> {
        let Some(limit) = self.timeout else {
            return self.signal.await.map_err(SessionError::from);
        };

        // The losing branch is dropped here, which cancels the timer when
        // the signal settles first.
        tokio::select! {
            biased;
            outcome = self.signal => {
                debug!(ok = outcome.is_ok(), "completion signal settled before deadline");
                outcome.map_err(SessionError::from)
            }
            () = tokio::time::sleep(limit) => {
                let message = render_message(&self.message, limit);
                warn!(timeout_ms = limit.as_millis() as u64, "{message}");
                Err(SessionError::Timeout { message, timeout: limit })
            }
        }
    }
}

/// Renders a timeout message template for `timeout`.
pub fn render_message(template: &str, timeout: Duration) -> String {
    template.replace(TIMEOUT_PLACEHOLDER, &timeout.as_millis().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use syncbridge_engine::{completion_channel, EngineError};

    #[test]
    fn message_rendering() {
        assert_eq!(
            render_message("took longer than {timeout_ms} ms", Duration::from_millis(50)),
            "took longer than 50 ms"
        );
        assert_eq!(render_message("no placeholder", Duration::from_secs(1)), "no placeholder");
    }

    #[tokio::test]
    async fn timer_wins_against_slow_signal() {
        let (notifier, signal) = completion_channel();
        let started = Instant::now();

        let err = DeadlineWait::new(signal)
            .with_timeout(Some(Duration::from_millis(50)))
            .with_message("gave up after {timeout_ms} ms")
            .wait()
            .await
            .unwrap_err();

        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(
            err,
            SessionError::Timeout {
                message: "gave up after 50 ms".into(),
                timeout: Duration::from_millis(50),
            }
        );
        // The engine side is untouched and may still complete.
        assert!(!notifier.complete(Ok(())));
    }

    #[tokio::test]
    async fn signal_wins_against_long_timer() {
        let (notifier, signal) = completion_channel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            notifier.complete(Ok(()));
        });

        let started = Instant::now();
        DeadlineWait::new(signal)
            .with_timeout(Some(Duration::from_secs(5)))
            .wait()
            .await
            .unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn engine_failure_passes_through() {
        let (notifier, signal) = completion_channel();
        notifier.complete(Err(EngineError::operation("bad changeset")));

        let err = DeadlineWait::new(signal)
            .with_timeout(Some(Duration::from_secs(5)))
            .wait()
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::Engine(EngineError::operation("bad changeset")));
    }

    #[tokio::test]
    async fn unbounded_wait_follows_signal() {
        let (notifier, signal) = completion_channel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(80)).await;
            notifier.complete(Err(EngineError::operation("closed")));
        });

        let err = DeadlineWait::new(signal).wait().await.unwrap_err();
        assert_eq!(err, SessionError::Engine(EngineError::operation("closed")));
    }

    #[tokio::test]
    async fn ready_signal_beats_expired_timer() {
        let result = DeadlineWait::new(CompletionSignal::ready(Ok(())))
            .with_timeout(Some(Duration::ZERO))
            .wait()
            .await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn abandoned_signal_is_an_engine_error() {
        let (notifier, signal) = completion_channel();
        drop(notifier);
        let err = DeadlineWait::new(signal).wait().await.unwrap_err();
        assert_eq!(err, SessionError::Engine(EngineError::Abandoned));
    }
}
