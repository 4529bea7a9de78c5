//! Error types for the scheduler and HTTP shell.

/// Error kinds for server operations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum ServerErrorKind {
    /// Could not bind the listen address
    #[display("Failed to bind {}: {}", addr, message)]
    Bind {
        /// Address that failed to bind
        addr: String,
        /// Underlying error
        message: String,
    },

    /// The HTTP server stopped with an error
    #[display("HTTP server error: {}", _0)]
    Serve(String),

    /// Schedule has no future fire time
    #[display("Schedule exhausted: {}", _0)]
    ScheduleExhausted(String),

    /// A background task panicked or was cancelled
    #[display("Background task failed: {}", _0)]
    Task(String),
}

/// Error wrapper with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Server Error: {} at line {} in {}", kind, line, file)]
pub struct ServerError {
    /// The error kind
    pub kind: ServerErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl ServerError {
    /// Create a new ServerError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ServerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
