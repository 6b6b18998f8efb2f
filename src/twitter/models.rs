//! Wire types for the v1.1 REST responses we read.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id_str: String,
    pub name: String,
    pub screen_name: String,
}

/// A status object as returned by `statuses/update` and `search/tweets`.
///
/// `full_text` is only present when `tweet_mode=extended` is requested.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub id_str: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub full_text: Option<String>,
    pub created_at: String,
    pub user: UserResponse,
}

impl StatusResponse {
    /// The untruncated text when available, otherwise the short text.
    pub fn body(&self) -> String {
        self.full_text
            .clone()
            .or_else(|| self.text.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub statuses: Vec<StatusResponse>,
}
