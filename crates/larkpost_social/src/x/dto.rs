//! Wire types for `POST /2/tweets`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateTweetRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateTweetResponse {
    pub data: CreatedTweet,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedTweet {
    pub id: String,
}
