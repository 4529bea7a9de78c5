//! Tunables for the publish workflow.

use derive_builder::Builder;
use derive_getters::Getters;
use larkpost_core::DEFAULT_MAX_POST_CHARS;
use serde::{Deserialize, Serialize};

/// Default number of history entries sent as generator context.
pub const DEFAULT_CONTEXT_LIMIT: usize = 20;

/// Limits and timeouts applied by [`PublishWorkflow`](crate::PublishWorkflow).
///
/// # Examples
///
/// ```
/// use larkpost_publish::PublishSettingsBuilder;
///
/// let settings = PublishSettingsBuilder::default()
///     .max_post_chars(140_usize)
///     .build()
///     .unwrap();
/// assert_eq!(*settings.max_post_chars(), 140);
/// assert_eq!(*settings.context_limit(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(default)]
pub struct PublishSettings {
    /// Maximum post length in characters
    #[builder(default = "DEFAULT_MAX_POST_CHARS")]
    max_post_chars: usize,
    /// History entries sent as context; 0 sends the full history
    #[builder(default = "DEFAULT_CONTEXT_LIMIT")]
    context_limit: usize,
    /// Generator call timeout in seconds
    #[builder(default = "60")]
    generator_timeout_secs: u64,
    /// Poster call timeout in seconds
    #[builder(default = "30")]
    poster_timeout_secs: u64,
    /// History store call timeout in seconds
    #[builder(default = "10")]
    store_timeout_secs: u64,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            max_post_chars: DEFAULT_MAX_POST_CHARS,
            context_limit: DEFAULT_CONTEXT_LIMIT,
            generator_timeout_secs: 60,
            poster_timeout_secs: 30,
            store_timeout_secs: 10,
        }
    }
}
