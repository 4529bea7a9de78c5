//! Core data types for larkpost.
//!
//! This crate provides the values shared by the publish workflow and its
//! collaborators: history entries, the prompt set, generation requests and
//! publish results.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod history;
mod prompt;
mod publish;
mod request;
mod text;

pub use history::{HistoryEntry, NewHistoryEntry};
pub use prompt::{PromptCategory, PromptSet};
pub use publish::{PublishResult, PublishStatus};
pub use request::GenerationRequest;
pub use text::{DEFAULT_MAX_POST_CHARS, truncate_chars};
