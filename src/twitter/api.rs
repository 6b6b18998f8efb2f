//! Core Twitter API utilities.
//!
//! This module contains the HTTP client that signs every request with the
//! loaded OAuth 1.0a credentials.

use log::{debug, error, info};
use reqwest::{Client, Method};
use std::time::Duration;
use thiserror::Error;

use crate::credentials::Credentials;
use crate::errors::AppError;
use crate::oauth::{build_oauth1_header, percent_encode, OAuthNonce};

/// Default base URL for the v1.1 REST API.
pub const DEFAULT_API_BASE: &str = "https://api.twitter.com/1.1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_chars`: Maximum number of characters before truncation
///
/// # Returns
///
/// A single-line string safe for logging
pub(crate) fn sanitize_for_logging(text: &str, max_chars: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    let total = sanitized.chars().count();
    if total > max_chars {
        let head: String = sanitized.chars().take(max_chars).collect();
        format!("{}... [truncated, {} total chars]", head, total)
    } else {
        sanitized
    }
}

/// Failure of a single signed request.
#[derive(Error, Debug)]
pub(crate) enum RequestError {
    #[error("request to Twitter API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Twitter API returned {status}")]
    Status { status: reqwest::StatusCode },

    #[error("{0}")]
    Signing(String),
}

/// OAuth 1.0a client for the Twitter/X v1.1 REST API.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    http: Client,
    credentials: Credentials,
    base_url: String,
}

impl TwitterClient {
    /// Creates a client for `base_url` (e.g. [`DEFAULT_API_BASE`]).
    ///
    /// # Returns
    ///
    /// - `Ok(TwitterClient)`: If the base URL is valid and the HTTP client could be built
    /// - `Err(AppError::Config)`: Otherwise
    pub fn new(credentials: Credentials, base_url: &str) -> Result<Self, AppError> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid Twitter API base '{}': {}", base_url, e)))?;
        if parsed.query().is_some() {
            return Err(AppError::Config(format!(
                "Twitter API base '{}' must not carry a query string",
                base_url
            )));
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Config(format!("cannot build HTTP client: {}", e)))?;

        info!("Twitter client configured for {}", base_url);
        Ok(TwitterClient {
            http,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a signed request and returns the response body on a 2xx status.
    ///
    /// For `GET` the parameters travel in the query string, for `POST` in a
    /// form-encoded body. Either way they are part of the signature.
    pub(crate) async fn send_signed(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
        operation_name: &str,
    ) -> Result<String, RequestError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        info!(
            "Making signed {} request for operation: {}",
            method, operation_name
        );
        debug!("Request URL: {}", url);

        let header = build_oauth1_header(
            method.as_str(),
            &url,
            params,
            &self.credentials,
            &OAuthNonce::generate(),
        )
        .map_err(|e| RequestError::Signing(e.to_string()))?;

        let encoded = params
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = if method == Method::GET {
            let full_url = if encoded.is_empty() {
                url
            } else {
                format!("{}?{}", url, encoded)
            };
            self.http.get(full_url)
        } else {
            self.http
                .request(method, url)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(encoded)
        };

        let response = request.header("Authorization", header).send().await?;
        let status = response.status();
        info!(
            "Received response with status: {} for operation: {}",
            status, operation_name
        );

        let body = response.text().await?;
        if status.is_success() {
            debug!(
                "Response summary for '{}': {} bytes received",
                operation_name,
                body.len()
            );
            return Ok(body);
        }

        error!("Operation '{}' failed - Status: {}", operation_name, status);
        debug!(
            "Error response for '{}': {}",
            operation_name,
            sanitize_for_logging(&body, 200)
        );
        Err(RequestError::Status { status })
    }
}
