//! X (Twitter) API v2 poster.

mod client;
mod dto;
mod oauth;

pub use client::{DEFAULT_X_BASE_URL, XClient, XConfig, XConfigBuilder};
pub use oauth::{OAuthCredentials, authorization_header};
