//! Tweet posting for the Twitter API.

use log::{debug, error, info};
use reqwest::Method;
use serde::Serialize;

use crate::errors::AppError;

use super::api::{sanitize_for_logging, TwitterClient};
use super::models::StatusResponse;

/// A status the platform accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostedTweet {
    /// Platform-assigned post id
    pub id: String,
    /// Text as stored by the platform
    pub text: String,
    /// Display name of the posting account
    pub user_name: String,
}

impl TwitterClient {
    /// Posts a status through `statuses/update.json`.
    ///
    /// # Returns
    ///
    /// - `Ok(PostedTweet)`: The created status
    /// - `Err(AppError::Publish)`: On network failure, a non-2xx status or an unreadable body
    pub async fn post_tweet(&self, text: &str) -> Result<PostedTweet, AppError> {
        info!(
            "Starting tweet post operation for text: '{}'",
            sanitize_for_logging(text, 80)
        );

        let params = vec![("status".to_string(), text.to_string())];
        let body = self
            .send_signed(Method::POST, "statuses/update.json", &params, "post_tweet")
            .await
            .map_err(|e| AppError::Publish(e.to_string()))?;

        let status: StatusResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to decode post_tweet response: {}", e);
            AppError::Publish(format!("unexpected response from Twitter API: {}", e))
        })?;

        let posted = PostedTweet {
            text: status.body(),
            id: status.id_str,
            user_name: status.user.name,
        };
        info!("Tweet {} posted by {}", posted.id, posted.user_name);
        debug!("Posted text: {}", sanitize_for_logging(&posted.text, 200));
        Ok(posted)
    }
}
