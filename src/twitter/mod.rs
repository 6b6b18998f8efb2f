//! Twitter/X API integration module.
//!
//! This module contains the [`TwitterApi`] seam used by the publisher and the
//! search relay, and [`TwitterClient`], its OAuth 1.0a signed implementation over
//! the v1.1 REST endpoints.

mod api;
mod models;
mod search;
mod tweets;

use async_trait::async_trait;

use crate::errors::AppError;

// Re-export public API
pub use api::{TwitterClient, DEFAULT_API_BASE};
pub use search::{quote_phrase, search_tweets, SearchHit};
pub use tweets::PostedTweet;

// Crate-internal re-exports (used by tests and other modules)
pub(crate) use api::sanitize_for_logging;

/// Default number of results requested per search.
pub const DEFAULT_SEARCH_COUNT: u32 = 15;

/// Operations the service needs from the Twitter/X platform.
#[async_trait]
pub trait TwitterApi: Send + Sync {
    /// Posts `text` as a new status on behalf of the authenticated user.
    ///
    /// Failures are reported as [`AppError::Publish`].
    async fn post_status(&self, text: &str) -> Result<PostedTweet, AppError>;

    /// Runs a search with an already-prepared query string.
    ///
    /// Failures are reported as [`AppError::Search`].
    async fn search(&self, query: &str, count: u32) -> Result<Vec<SearchHit>, AppError>;
}

#[async_trait]
impl TwitterApi for TwitterClient {
    async fn post_status(&self, text: &str) -> Result<PostedTweet, AppError> {
        self.post_tweet(text).await
    }

    async fn search(&self, query: &str, count: u32) -> Result<Vec<SearchHit>, AppError> {
        self.search_recent(query, count).await
    }
}
