//! Tweet search relay.
//!
//! Queries are searched as exact phrases and every returned status is mapped
//! into a display-oriented [`SearchHit`].

use log::{error, info, warn};
use reqwest::Method;
use serde::Serialize;

use crate::errors::AppError;

use super::api::{sanitize_for_logging, TwitterClient};
use super::models::{SearchResponse, StatusResponse};
use super::TwitterApi;

/// One search result, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub text: String,
    /// Author display name
    pub user: String,
    /// Author id
    pub user_id: String,
    /// Author handle, without the `@`
    pub screen_name: String,
    /// Creation date as reported by the platform
    pub date: String,
    pub tweet_id: String,
}

impl From<StatusResponse> for SearchHit {
    fn from(status: StatusResponse) -> Self {
        SearchHit {
            text: status.body(),
            user: status.user.name,
            user_id: status.user.id_str,
            screen_name: status.user.screen_name,
            date: status.created_at,
            tweet_id: status.id_str,
        }
    }
}

/// Wraps a query in double quotes so it is matched as an exact phrase.
pub fn quote_phrase(query: &str) -> String {
    format!("\"{}\"", query)
}

/// Searches for `query` as an exact phrase.
///
/// The query is quoted as given, surrounding whitespace included. A blank
/// query returns an empty result without calling the API.
///
/// # Returns
///
/// - `Ok(Vec<SearchHit>)`: Results in API order, possibly empty
/// - `Err(AppError::Search)`: If the search API failed
pub async fn search_tweets(
    api: &dyn TwitterApi,
    query: &str,
    count: u32,
) -> Result<Vec<SearchHit>, AppError> {
    if query.trim().is_empty() {
        info!("Blank search query, skipping API call");
        return Ok(Vec::new());
    }

    let quoted = quote_phrase(query);
    info!("Searching tweets for {}", sanitize_for_logging(&quoted, 80));

    match api.search(&quoted, count).await {
        Ok(hits) => {
            if hits.is_empty() {
                info!("No tweets found");
            } else {
                info!("Found {} tweets", hits.len());
            }
            Ok(hits)
        }
        Err(e) => {
            warn!("Tweet search failed: {}", e);
            Err(e)
        }
    }
}

impl TwitterClient {
    /// Calls `search/tweets.json` with extended text.
    pub async fn search_recent(&self, query: &str, count: u32) -> Result<Vec<SearchHit>, AppError> {
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("count".to_string(), count.to_string()),
            ("tweet_mode".to_string(), "extended".to_string()),
        ];

        let body = self
            .send_signed(Method::GET, "search/tweets.json", &params, "search_tweets")
            .await
            .map_err(|e| AppError::Search(e.to_string()))?;

        let response: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to decode search response: {}", e);
            AppError::Search(format!("unexpected response from Twitter API: {}", e))
        })?;

        Ok(response.statuses.into_iter().map(SearchHit::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::twitter::PostedTweet;

    struct RecordingApi {
        queries: Mutex<Vec<String>>,
        result: Result<Vec<SearchHit>, String>,
    }

    #[async_trait]
    impl TwitterApi for RecordingApi {
        async fn post_status(&self, _text: &str) -> Result<PostedTweet, AppError> {
            unreachable!("search tests never post")
        }

        async fn search(&self, query: &str, _count: u32) -> Result<Vec<SearchHit>, AppError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.result.clone().map_err(AppError::Search)
        }
    }

    fn hit(id: &str) -> SearchHit {
        SearchHit {
            text: format!("tweet {}", id),
            user: "Gopher".to_string(),
            user_id: "42".to_string(),
            screen_name: "gopher".to_string(),
            date: "Wed Oct 10 20:19:24 +0000 2018".to_string(),
            tweet_id: id.to_string(),
        }
    }

    #[test]
    fn test_quote_phrase() {
        assert_eq!(quote_phrase("foo bar"), "\"foo bar\"");
    }

    #[test]
    fn test_maps_status_fields() {
        let raw = r#"{
            "id_str": "1050118621198921728",
            "full_text": "To make room for more expression...",
            "created_at": "Wed Oct 10 20:19:24 +0000 2018",
            "user": {"id_str": "6253282", "name": "Twitter API", "screen_name": "TwitterAPI"}
        }"#;
        let status: StatusResponse = serde_json::from_str(raw).unwrap();
        let hit = SearchHit::from(status);

        assert_eq!(hit.text, "To make room for more expression...");
        assert_eq!(hit.user, "Twitter API");
        assert_eq!(hit.user_id, "6253282");
        assert_eq!(hit.screen_name, "TwitterAPI");
        assert_eq!(hit.date, "Wed Oct 10 20:19:24 +0000 2018");
        assert_eq!(hit.tweet_id, "1050118621198921728");
    }

    #[tokio::test]
    async fn test_search_quotes_query_and_keeps_order() {
        let api = RecordingApi {
            queries: Mutex::new(Vec::new()),
            result: Ok(vec![hit("2"), hit("1")]),
        };

        let hits = search_tweets(&api, "gopher", 15).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].tweet_id, "2");
        assert_eq!(hits[1].tweet_id, "1");
        assert_eq!(*api.queries.lock().unwrap(), vec!["\"gopher\"".to_string()]);
    }

    #[tokio::test]
    async fn test_search_zero_results_is_empty() {
        let api = RecordingApi {
            queries: Mutex::new(Vec::new()),
            result: Ok(Vec::new()),
        };

        let hits = search_tweets(&api, "foo", 15).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_error_is_surfaced() {
        let api = RecordingApi {
            queries: Mutex::new(Vec::new()),
            result: Err("Twitter API returned 503".to_string()),
        };

        let result = search_tweets(&api, "foo", 15).await;
        assert!(matches!(result, Err(AppError::Search(_))));
    }

    #[tokio::test]
    async fn test_query_is_quoted_verbatim() {
        let api = RecordingApi {
            queries: Mutex::new(Vec::new()),
            result: Ok(Vec::new()),
        };

        search_tweets(&api, " foo ", 15).await.unwrap();
        assert_eq!(*api.queries.lock().unwrap(), vec!["\" foo \"".to_string()]);
    }

    #[tokio::test]
    async fn test_blank_query_skips_api() {
        let api = RecordingApi {
            queries: Mutex::new(Vec::new()),
            result: Ok(vec![hit("1")]),
        };

        let hits = search_tweets(&api, "   ", 15).await.unwrap();
        assert!(hits.is_empty());
        assert!(api.queries.lock().unwrap().is_empty());
    }
}
