//! Social platform integrations for larkpost.
//!
//! - [`XClient`]: posts to the X (Twitter) API v2 with OAuth 1.0a user context
//! - [`NoOpPoster`]: logs instead of posting, for dry runs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod noop;
mod x;

pub use noop::NoOpPoster;
pub use x::{
    DEFAULT_X_BASE_URL, OAuthCredentials, XClient, XConfig, XConfigBuilder, authorization_header,
};
