//! The larkpost publish workflow.
//!
//! [`PublishWorkflow::publish_once`] runs one attempt: pick a prompt, load
//! recent history as context, generate, truncate, dedup, post and record.
//! Every step error is folded into a [`PublishResult`](larkpost_core::PublishResult).
//!
//! [`InMemoryHistoryStore`] is a process-local [`HistoryStore`](larkpost_interface::HistoryStore)
//! for dry runs and tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;
mod settings;
mod workflow;

pub use memory::InMemoryHistoryStore;
pub use settings::{PublishSettings, PublishSettingsBuilder};
pub use workflow::PublishWorkflow;
