//! Content generator error types.

/// Content generator error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeneratorErrorKind {
    /// API key was empty
    #[display("GEMINI_API_KEY is not set")]
    MissingApiKey,
    /// Request could not be sent or the connection failed
    #[display("Generator request failed: {}", _0)]
    Request(String),
    /// Non-success HTTP status from the generator API
    #[display("HTTP {} error: {}", status_code, message)]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason
        message: String,
    },
    /// The prompt was blocked by the provider's safety filter
    #[display("Prompt blocked: {}", _0)]
    Blocked(String),
    /// Response could not be decoded
    #[display("Malformed generator response: {}", _0)]
    Malformed(String),
    /// Generator returned no usable text
    #[display("Generator returned empty content")]
    EmptyContent,
    /// The call did not complete within the configured timeout
    #[display("Generator call timed out after {}s", _0)]
    Timeout(u64),
}

/// Content generator error with source location tracking.
///
/// # Examples
///
/// ```
/// use larkpost_error::{GeneratorError, GeneratorErrorKind};
///
/// let err = GeneratorError::new(GeneratorErrorKind::EmptyContent);
/// assert!(format!("{}", err).contains("empty content"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generator Error: {} at line {} in {}", kind, line, file)]
pub struct GeneratorError {
    /// The kind of error that occurred
    pub kind: GeneratorErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeneratorError {
    /// Create a new GeneratorError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeneratorErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
