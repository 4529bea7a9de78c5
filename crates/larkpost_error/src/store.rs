//! History store error types.

/// History store error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// Connection or pool checkout failed
    #[display("Store connection error: {}", _0)]
    Connection(String),
    /// Query execution failed
    #[display("Store query error: {}", _0)]
    Query(String),
    /// Insert rejected because the text is already recorded
    #[display("History already contains this text")]
    Duplicate,
    /// Migration error
    #[display("Migration error: {}", _0)]
    Migration(String),
    /// The call did not complete within the configured timeout
    #[display("Store call timed out after {}s", _0)]
    Timeout(u64),
}

/// History store error with source location tracking.
///
/// # Examples
///
/// ```
/// use larkpost_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::Duplicate);
/// assert!(err.is_duplicate());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new StoreError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the store rejected an insert of already-recorded text.
    pub fn is_duplicate(&self) -> bool {
        self.kind == StoreErrorKind::Duplicate
    }
}

// Diesel error conversions (only available with database feature)
#[cfg(feature = "database")]
impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::new(StoreErrorKind::Duplicate)
            }
            _ => StoreError::new(StoreErrorKind::Query(err.to_string())),
        }
    }
}

#[cfg(feature = "database")]
impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        StoreError::new(StoreErrorKind::Connection(err.to_string()))
    }
}

#[cfg(feature = "database")]
impl From<diesel::r2d2::PoolError> for StoreError {
    #[track_caller]
    fn from(err: diesel::r2d2::PoolError) -> Self {
        StoreError::new(StoreErrorKind::Connection(err.to_string()))
    }
}
