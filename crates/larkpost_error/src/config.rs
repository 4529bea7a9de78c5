//! Configuration error types.

/// Configuration error with source location.
///
/// Configuration errors are fatal at startup: a missing credential or an empty
/// prompt set must stop the process before any publish attempt runs.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use larkpost_error::ConfigError;
    ///
    /// let err = ConfigError::new("Missing CONSUMER_KEY");
    /// assert!(err.message.contains("CONSUMER_KEY"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
