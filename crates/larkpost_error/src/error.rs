//! Top-level error wrapper types.

use crate::{
    ConfigError, GeneratorError, HttpError, JsonError, PosterError, ServerError, StoreError,
};

/// Every error a larkpost crate can produce.
///
/// # Examples
///
/// ```
/// use larkpost_error::{HttpError, LarkpostError};
///
/// let err: LarkpostError = HttpError::new("Connection failed").into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum LarkpostErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Content generator error
    #[from(GeneratorError)]
    Generator(GeneratorError),
    /// Poster error
    #[from(PosterError)]
    Poster(PosterError),
    /// History store error
    #[from(StoreError)]
    Store(StoreError),
    /// Scheduler or HTTP shell error
    #[from(ServerError)]
    Server(ServerError),
}

/// Larkpost error with kind discrimination.
///
/// # Examples
///
/// ```
/// use larkpost_error::{ConfigError, LarkpostErrorKind, LarkpostResult};
///
/// fn might_fail() -> LarkpostResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), LarkpostErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Larkpost Error: {}", _0)]
pub struct LarkpostError(Box<LarkpostErrorKind>);

impl LarkpostError {
    /// Create a new error from a kind.
    pub fn new(kind: LarkpostErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LarkpostErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to LarkpostErrorKind
impl<T> From<T> for LarkpostError
where
    T: Into<LarkpostErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for larkpost operations.
pub type LarkpostResult<T> = std::result::Result<T, LarkpostError>;
