//! Google Gemini `generateContent` client.

mod client;
mod config;
mod dto;

pub use client::GeminiClient;
pub use config::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, GeminiConfig, GeminiConfigBuilder};
