//! Content generator integrations for larkpost.
//!
//! Currently provides [`GeminiClient`], a REST client for the Google Gemini
//! `generateContent` endpoint.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;

pub use gemini::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GeminiClient, GeminiConfig,
    GeminiConfigBuilder,
};
