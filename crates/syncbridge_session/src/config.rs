//! Configuration for the session layer.

use std::time::Duration;

/// Default timeout message for download waits.
pub const DEFAULT_DOWNLOAD_TIMEOUT_MESSAGE: &str =
    "Downloading changes did not complete in {timeout_ms} ms.";

/// Default timeout message for upload waits.
pub const DEFAULT_UPLOAD_TIMEOUT_MESSAGE: &str =
    "Uploading changes did not complete in {timeout_ms} ms.";

/// Configuration of one kind of completion wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitConfig {
    /// Timeout applied when the caller passes none. `None` waits unbounded.
    pub default_timeout: Option<Duration>,
    /// Timeout message template; `{timeout_ms}` is replaced by the duration.
    pub timeout_message: String,
}

impl WaitConfig {
    /// Creates an unbounded wait configuration with the given message.
    pub fn new(timeout_message: impl Into<String>) -> Self {
        Self {
            default_timeout: None,
            timeout_message: timeout_message.into(),
        }
    }

    /// Default configuration for download waits.
    pub fn download() -> Self {
        Self::new(DEFAULT_DOWNLOAD_TIMEOUT_MESSAGE)
    }

    /// Default configuration for upload waits.
    pub fn upload() -> Self {
        Self::new(DEFAULT_UPLOAD_TIMEOUT_MESSAGE)
    }

    /// Sets the timeout used when the caller passes none.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    /// Sets the timeout message template.
    pub fn with_timeout_message(mut self, message: impl Into<String>) -> Self {
        self.timeout_message = message.into();
        self
    }

    /// Picks the caller's timeout, falling back to the default.
    pub fn resolve(&self, timeout: Option<Duration>) -> Option<Duration> {
        timeout.or(self.default_timeout)
    }
}

/// Configuration for a [`SessionManager`](crate::SessionManager).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionManagerConfig {
    /// Download completion waits.
    pub download: WaitConfig,
    /// Upload completion waits.
    pub upload: WaitConfig,
}

impl SessionManagerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            download: WaitConfig::download(),
            upload: WaitConfig::upload(),
        }
    }

    /// Sets the download wait configuration.
    pub fn with_download(mut self, download: WaitConfig) -> Self {
        self.download = download;
        self
    }

    /// Sets the upload wait configuration.
    pub fn with_upload(mut self, upload: WaitConfig) -> Self {
        self.upload = upload;
        self
    }
}

impl Default for SessionManagerConfig {
    fn default() -> Self {
        Self::new()
    }
}
