//! HTTP route handlers for the gotweet service.
//!
//! This module contains the shared application state, the route handlers and
//! the router that ties them together.

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::db::LogStore;
use crate::errors::AppError;
use crate::keywords::KeywordTable;
use crate::publisher::publish;
use crate::twitter::{sanitize_for_logging, search_tweets, TwitterApi};
use crate::views;

/// Body returned with 400 when a length limit is violated.
pub const LENGTH_ERROR_BODY: &str = "string length over";

/// Notice shown on the results page when the search API fails.
pub const SEARCH_UNAVAILABLE_NOTICE: &str =
    "Search is unavailable right now. Please try again later.";

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub keywords: Arc<KeywordTable>,
    pub twitter: Arc<dyn TwitterApi>,
    pub logs: Arc<dyn LogStore>,
    pub search_count: u32,
}

/// Form posted to `/gotweets`.
#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub message: String,
}

/// Form posted to `/tweets`.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub text: String,
}

/// Builds the application routes. Middleware and static files are added by the binary.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/hello", get(handle_hello))
        .route("/logs", get(handle_logs))
        .route("/gotweets", post(handle_go_tweet))
        .route("/tweets", post(handle_tweets))
        .route("/health", get(handle_health))
        .with_state(state)
}

fn error_response(e: &AppError) -> (StatusCode, String) {
    let status = e.status_code();
    let body = match e {
        AppError::Length { .. } => LENGTH_ERROR_BODY.to_string(),
        AppError::Publish(_) => "Failed to post tweet".to_string(),
        AppError::Storage(_) => "Failed to access the message log".to_string(),
        other => other.to_string(),
    };
    (status, body)
}

/// Handles GET requests to the `/hello` endpoint by rendering the empty post form.
pub async fn handle_hello() -> Html<String> {
    Html(views::hello_page(None))
}

/// Handles GET requests to the `/health` endpoint.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "gotweet"
/// }
/// ```
pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "gotweet"}))
}

/// Handles GET requests to the `/logs` endpoint.
///
/// Renders every publish record, newest first.
pub async fn handle_logs(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, String)> {
    match state.logs.list_all().await {
        Ok(entries) => Ok(Html(views::logs_page(&entries))),
        Err(e) => {
            error!("Failed to load publish log: {}", e);
            Err(error_response(&e))
        }
    }
}

/// Handles POST requests to the `/gotweets` endpoint.
///
/// Publishes the `message` form field and records it in the log.
///
/// # Responses
///
/// - `200`: The post form with the published message
/// - `400`: `string length over` when a length limit is violated
/// - `502`: The platform rejected the post
/// - `500`: The post went out but could not be recorded
pub async fn handle_go_tweet(
    State(state): State<AppState>,
    Form(form): Form<MessageForm>,
) -> Result<Html<String>, (StatusCode, String)> {
    let result = match publish(&form.message, &state.keywords, state.twitter.as_ref()).await {
        Ok(result) => result,
        Err(e @ AppError::Length { .. }) => {
            info!("Rejected message: {}", e);
            return Err(error_response(&e));
        }
        Err(e) => {
            error!("Failed to post tweet: {}", e);
            return Err(error_response(&e));
        }
    };

    if let Err(e) = state.logs.append(&result.message, &result.author).await {
        error!(
            "Tweet {} was posted but could not be logged: {} (message: '{}', author: {})",
            result.tweet_id,
            e,
            sanitize_for_logging(&result.message, 200),
            result.author
        );
        return Err(error_response(&e));
    }

    info!("Published and logged tweet {}", result.tweet_id);
    Ok(Html(views::hello_page(Some(&result.message))))
}

/// Handles POST requests to the `/tweets` endpoint.
///
/// Searches for the `text` form field as an exact phrase. A failing search API
/// renders an empty list with a notice instead of an error page.
pub async fn handle_tweets(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Html<String> {
    match search_tweets(state.twitter.as_ref(), &form.text, state.search_count).await {
        Ok(hits) => Html(views::tweets_page(&form.text, &hits, None)),
        Err(e) => {
            warn!("Rendering empty search results after failure: {}", e);
            Html(views::tweets_page(
                &form.text,
                &[],
                Some(SEARCH_UNAVAILABLE_NOTICE),
            ))
        }
    }
}
