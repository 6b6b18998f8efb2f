//! OAuth 1.0a request signing for the Twitter/X API.
//!
//! Twitter's v1.1 user-context endpoints authenticate each request with an
//! `Authorization: OAuth ...` header carrying an HMAC-SHA1 signature over the
//! HTTP method, the base URL and every request parameter.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::credentials::Credentials;
use crate::errors::AppError;

type HmacSha1 = Hmac<Sha1>;

/// Per-request OAuth values. Generated fresh for every call in production and
/// fixed in tests.
#[derive(Debug, Clone)]
pub struct OAuthNonce {
    pub nonce: String,
    pub timestamp: i64,
}

impl OAuthNonce {
    /// A random 32-character nonce stamped with the current Unix time.
    pub fn generate() -> Self {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        OAuthNonce {
            nonce,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Percent-encodes a value using the RFC 3986 unreserved set, as OAuth 1.0a requires.
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Builds the signature base string: `METHOD&encoded_url&encoded_params`.
///
/// `params` must contain both the request parameters (query or form body) and the
/// `oauth_*` protocol parameters, excluding `oauth_signature`.
pub fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url),
        percent_encode(&parameter_string)
    )
}

/// Signs a base string with `consumer_secret&token_secret` and returns it base64-encoded.
pub fn sign(
    base_string: &str,
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String, AppError> {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| AppError::Credential(format!("invalid signing key: {}", e)))?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Builds the `Authorization` header value for a signed OAuth 1.0a request.
///
/// # Parameters
///
/// - `method`: HTTP method, e.g. `"POST"`
/// - `base_url`: Request URL without query string
/// - `request_params`: Query string and form body parameters, unencoded
/// - `credentials`: Consumer and access token pairs
/// - `nonce`: Nonce and timestamp for this request
pub fn build_oauth1_header(
    method: &str,
    base_url: &str,
    request_params: &[(String, String)],
    credentials: &Credentials,
    nonce: &OAuthNonce,
) -> Result<String, AppError> {
    let mut oauth_params = vec![
        (
            "oauth_consumer_key".to_string(),
            credentials.consumer_key.clone(),
        ),
        ("oauth_nonce".to_string(), nonce.nonce.clone()),
        (
            "oauth_signature_method".to_string(),
            "HMAC-SHA1".to_string(),
        ),
        ("oauth_timestamp".to_string(), nonce.timestamp.to_string()),
        ("oauth_token".to_string(), credentials.access_token.clone()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];

    let mut all_params = oauth_params.clone();
    all_params.extend_from_slice(request_params);

    let base_string = signature_base_string(method, base_url, &all_params);
    let signature = sign(
        &base_string,
        &credentials.consumer_secret,
        &credentials.access_token_secret,
    )?;

    oauth_params.push(("oauth_signature".to_string(), signature));
    oauth_params.sort();

    let header = oauth_params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {}", header))
}
