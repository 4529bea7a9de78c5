//! Error types for larkpost.
//!
//! This crate provides the error types shared by every larkpost crate.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use larkpost_error::{ConfigError, LarkpostResult};
//!
//! fn load() -> LarkpostResult<String> {
//!     Err(ConfigError::new("prompt set is empty"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generator;
mod http;
mod json;
mod poster;
mod server;
mod store;

pub use config::ConfigError;
pub use error::{LarkpostError, LarkpostErrorKind, LarkpostResult};
pub use generator::{GeneratorError, GeneratorErrorKind};
pub use http::HttpError;
pub use json::JsonError;
pub use poster::{PosterError, PosterErrorKind};
pub use server::{ServerError, ServerErrorKind};
pub use store::{StoreError, StoreErrorKind};
