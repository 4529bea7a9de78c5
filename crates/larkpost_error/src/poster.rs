//! Poster (social platform) error types.

/// Poster error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PosterErrorKind {
    /// Credentials were rejected (HTTP 401)
    #[display("Authentication failed: {}", _0)]
    Unauthorized(String),
    /// The platform refused the post (HTTP 403, 400, ...)
    #[display("Post rejected with HTTP {}: {}", status_code, message)]
    Rejected {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason
        message: String,
    },
    /// Platform rate limit hit (HTTP 429)
    #[display("Rate limited: {}", _0)]
    RateLimited(String),
    /// Request could not be sent or the connection failed
    #[display("Poster request failed: {}", _0)]
    Request(String),
    /// Response could not be decoded
    #[display("Malformed poster response: {}", _0)]
    Malformed(String),
    /// Text exceeds the platform limit
    #[display("Post is {} characters, limit is {}", length, limit)]
    TooLong {
        /// Length of the rejected text in characters
        length: usize,
        /// Configured limit
        limit: usize,
    },
    /// The call did not complete within the configured timeout
    #[display("Poster call timed out after {}s", _0)]
    Timeout(u64),
}

/// Poster error with source location tracking.
///
/// # Examples
///
/// ```
/// use larkpost_error::{PosterError, PosterErrorKind};
///
/// let err = PosterError::new(PosterErrorKind::RateLimited("too many".into()));
/// assert!(format!("{}", err).contains("Rate limited"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Poster Error: {} at line {} in {}", kind, line, file)]
pub struct PosterError {
    /// The kind of error that occurred
    pub kind: PosterErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PosterError {
    /// Create a new PosterError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PosterErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
