//! Message composition and publishing.
//!
//! A raw form message goes through these steps before it is posted:
//!
//! 1. reject input longer than [`MAX_INPUT_CHARS`] code points
//! 2. apply the keyword table
//! 3. append [`SUFFIX_DECORATION`] when the text ends with [`SUFFIX_MARKER`]
//! 4. wrap in [`MESSAGE_PREFIX`] and [`MESSAGE_HASHTAG`]
//! 5. reject results of [`MAX_MESSAGE_CHARS`] code points or more
//!
//! Both limits count Unicode scalar values, not bytes.

use log::{error, info, warn};
use serde::Serialize;

use crate::errors::AppError;
use crate::keywords::KeywordTable;
use crate::twitter::{sanitize_for_logging, TwitterApi};

/// Raw input may have at most this many code points.
pub const MAX_INPUT_CHARS: usize = 120;
/// The decorated message must stay strictly below this many code points.
pub const MAX_MESSAGE_CHARS: usize = 140;
pub const MESSAGE_PREFIX: &str = "GO!GO!GO! ";
pub const MESSAGE_HASHTAG: &str = "\n#ごーふぁったー";
pub const SUFFIX_MARKER: char = 'ご';
pub const SUFFIX_DECORATION: &str = "ﾌｧｰ";

/// Outcome of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishResult {
    /// The exact text sent to the platform
    pub message: String,
    /// Display name the platform reported for the posting account
    pub author: String,
    pub tweet_id: String,
}

/// Turns raw user text into the decorated message, enforcing both length limits.
///
/// # Returns
///
/// - `Ok(String)`: The message to post
/// - `Err(AppError::Length)`: If the input has more than 120 code points or the
///   decorated message has 140 or more
pub fn compose_message(raw: &str, keywords: &KeywordTable) -> Result<String, AppError> {
    let input_chars = raw.chars().count();
    if input_chars > MAX_INPUT_CHARS {
        warn!(
            "Rejecting input of {} characters (limit {})",
            input_chars, MAX_INPUT_CHARS
        );
        return Err(AppError::Length {
            chars: input_chars,
            limit: MAX_INPUT_CHARS,
        });
    }

    let mut body = keywords.apply(raw);
    if body.ends_with(SUFFIX_MARKER) {
        body.push_str(SUFFIX_DECORATION);
    }

    let message = format!("{}{}{}", MESSAGE_PREFIX, body, MESSAGE_HASHTAG);

    let message_chars = message.chars().count();
    if message_chars >= MAX_MESSAGE_CHARS {
        warn!(
            "Rejecting decorated message of {} characters (limit {})",
            message_chars, MAX_MESSAGE_CHARS
        );
        return Err(AppError::Length {
            chars: message_chars,
            limit: MAX_MESSAGE_CHARS,
        });
    }

    Ok(message)
}

/// Composes `raw` and posts it through `api`.
///
/// No request is made when either length check fails.
///
/// # Returns
///
/// - `Ok(PublishResult)`: The posted message and its author
/// - `Err(AppError::Length)`: If a length limit was violated
/// - `Err(AppError::Publish)`: If the platform rejected the post
pub async fn publish(
    raw: &str,
    keywords: &KeywordTable,
    api: &dyn TwitterApi,
) -> Result<PublishResult, AppError> {
    let message = compose_message(raw, keywords)?;
    info!(
        "Publishing message: '{}'",
        sanitize_for_logging(&message, 160)
    );

    match api.post_status(&message).await {
        Ok(posted) => {
            info!("Message published as tweet {} by {}", posted.id, posted.user_name);
            Ok(PublishResult {
                message,
                author: posted.user_name,
                tweet_id: posted.id,
            })
        }
        Err(e) => {
            error!("Failed to publish message: {}", e);
            Err(match e {
                AppError::Publish(_) => e,
                other => AppError::Publish(other.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitter::{PostedTweet, SearchHit};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        posted: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl TwitterApi for FakeApi {
        async fn post_status(&self, text: &str) -> Result<PostedTweet, AppError> {
            self.posted.lock().unwrap().push(text.to_string());
            if self.fail {
                return Err(AppError::Publish("Twitter API returned 403 Forbidden".into()));
            }
            Ok(PostedTweet {
                id: "1001".to_string(),
                text: text.to_string(),
                user_name: "Gopher".to_string(),
            })
        }

        async fn search(&self, _query: &str, _count: u32) -> Result<Vec<SearchHit>, AppError> {
            Ok(Vec::new())
        }
    }

    /// Overhead of prefix plus hashtag in code points.
    fn decoration_chars() -> usize {
        MESSAGE_PREFIX.chars().count() + MESSAGE_HASHTAG.chars().count()
    }

    #[test]
    fn test_compose_wraps_message() {
        let table = KeywordTable::default();
        let message = compose_message("hello", &table).unwrap();
        assert_eq!(message, "GO!GO!GO! hello\n#ごーふぁったー");
    }

    #[test]
    fn test_compose_applies_keywords() {
        let table = KeywordTable::default();
        let message = compose_message("なんて日だ", &table).unwrap();
        assert_eq!(message, "GO!GO!GO! なんてGoな日だ！！！！\n#ごーふぁったー");
    }

    #[test]
    fn test_suffix_marker_gets_decoration() {
        let table = KeywordTable::default();
        let message = compose_message("いちご", &table).unwrap();
        assert_eq!(message, "GO!GO!GO! いちごﾌｧｰ\n#ごーふぁったー");

        let message = compose_message("ごはん", &table).unwrap();
        assert!(!message.contains(SUFFIX_DECORATION));
    }

    #[test]
    fn test_input_over_120_rejected() {
        let table = KeywordTable::default();
        let result = compose_message(&"a".repeat(121), &table);
        assert!(matches!(
            result,
            Err(AppError::Length {
                chars: 121,
                limit: 120
            })
        ));
    }

    #[test]
    fn test_input_limit_counts_code_points() {
        // 120 three-byte characters are well over 140 bytes but within both limits.
        let table = KeywordTable::from_pairs(Vec::<(String, String)>::new()).unwrap();
        let message = compose_message(&"日".repeat(120), &table).unwrap();
        assert_eq!(message.chars().count(), 139);

        let result = compose_message(&"日".repeat(121), &table);
        assert!(matches!(result, Err(AppError::Length { limit: 120, .. })));
    }

    #[test]
    fn test_final_limit_is_exclusive_at_140() {
        let table = KeywordTable::from_pairs([("x", "xx")]).unwrap();
        let body_budget = 139 - decoration_chars();

        let fits = "x".repeat(body_budget / 2);
        let message = compose_message(&fits, &table).unwrap();
        assert_eq!(message.chars().count(), 139);

        let too_long = format!("{}a", fits);
        let result = compose_message(&too_long, &table);
        assert!(matches!(
            result,
            Err(AppError::Length {
                chars: 140,
                limit: 140
            })
        ));
    }

    #[test]
    fn test_keyword_expansion_can_exceed_final_limit() {
        let table = KeywordTable::default();
        // "努力" shrinks to "GO", "な" grows to "ふぁ".
        assert!(compose_message(&"努力".repeat(30), &table).is_ok());
        assert!(compose_message(&"な".repeat(60), &table).is_ok());
        assert!(matches!(
            compose_message(&"な".repeat(61), &table),
            Err(AppError::Length { limit: 140, .. })
        ));
    }

    #[tokio::test]
    async fn test_publish_returns_posted_text_and_author() {
        let api = FakeApi::default();
        let table = KeywordTable::default();

        let result = publish("はい", &table, &api).await.unwrap();
        assert_eq!(result.message, "GO!GO!GO! ふぁーい\n#ごーふぁったー");
        assert_eq!(result.author, "Gopher");
        assert_eq!(result.tweet_id, "1001");
        assert_eq!(*api.posted.lock().unwrap(), vec![result.message.clone()]);
    }

    #[tokio::test]
    async fn test_publish_length_error_makes_no_call() {
        let api = FakeApi::default();
        let table = KeywordTable::default();

        let result = publish(&"a".repeat(121), &table, &api).await;
        tokio_test::assert_err!(&result);
        assert!(matches!(result, Err(AppError::Length { .. })));
        assert!(api.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_is_returned() {
        let api = FakeApi {
            fail: true,
            ..FakeApi::default()
        };
        let table = KeywordTable::default();

        let result = publish("hello", &table, &api).await;
        assert!(matches!(result, Err(AppError::Publish(_))));
    }
}
