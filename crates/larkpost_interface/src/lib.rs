//! Trait interfaces for the collaborators of the publish workflow.
//!
//! The workflow only talks to a [`ContentGenerator`], a [`Poster`] and a
//! [`HistoryStore`]. Concrete implementations live in `larkpost_models`,
//! `larkpost_social` and `larkpost_database`; tests substitute their own.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{ContentGenerator, HistoryStore, Poster};
pub use types::PostId;
