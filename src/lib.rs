//! # Gotweet Library
//!
//! A Rust web service library that rewrites form-submitted text through a fixed
//! keyword table, posts it to Twitter/X, records every post in PostgreSQL, and
//! relays exact-phrase tweet searches.
//!
//! ## Features
//!
//! - Deterministic keyword substitution (longest match first, no rescanning)
//! - Code-point length limits on the raw input (≤ 120) and the final post (< 140)
//! - OAuth 1.0a signed requests to the Twitter/X v1.1 API
//! - Append-only publish log with newest-first listing
//! - Server-rendered HTML pages
//! - Structured logging
//!
//! ## Configuration
//!
//! - `TWITTER_CREDENTIALS_PATH`: JSON file with the four API credentials
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASS`/`DB_NAME`
//! - `PORT`: Server port (defaults to 8000)
//!
//! ## API Endpoints
//!
//! - `GET /hello`: Post form
//! - `GET /logs`: Publish log
//! - `POST /gotweets`: Publish the `message` form field
//! - `POST /tweets`: Search for the `text` form field
//! - `GET /health`: Returns service health status

pub mod config;
pub mod credentials;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod keywords;
pub mod oauth;
pub mod publisher;
pub mod twitter;
pub mod views;

// Re-export commonly used types and functions
pub use config::{get_server_port, load_env_file, AppConfig, DatabaseConfig};
pub use credentials::Credentials;
pub use db::{LogEntry, LogStore, PgLogStore};
pub use errors::AppError;
pub use handlers::{app_router, AppState};
pub use keywords::KeywordTable;
pub use publisher::{compose_message, publish, PublishResult};
pub use twitter::{search_tweets, PostedTweet, SearchHit, TwitterApi, TwitterClient};
