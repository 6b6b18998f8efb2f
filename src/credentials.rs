//! Twitter/X API credential loading.
//!
//! Credentials live in a small JSON document with four string fields:
//!
//! ```json
//! {
//!   "accessToken": "...",
//!   "accessTokenSecret": "...",
//!   "consumerKey": "...",
//!   "consumerSecret": "..."
//! }
//! ```

use log::{debug, error, info};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::errors::AppError;

/// OAuth 1.0a user-context credentials for the Twitter/X API.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// User access token
    pub access_token: String,
    /// User access token secret
    pub access_token_secret: String,
    /// Application consumer (API) key
    pub consumer_key: String,
    /// Application consumer (API) secret
    pub consumer_secret: String,
}

impl Credentials {
    /// Loads credentials from a JSON file.
    ///
    /// # Returns
    ///
    /// - `Ok(Credentials)`: If the file exists and holds all four non-empty fields
    /// - `Err(AppError::Credential)`: If the file is missing, unreadable or malformed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        info!("Loading Twitter credentials from {}", path.display());

        let raw = std::fs::read_to_string(path).map_err(|e| {
            error!("Failed to read credentials file {}: {}", path.display(), e);
            AppError::Credential(format!("cannot read {}: {}", path.display(), e))
        })?;

        Self::from_json(&raw)
    }

    /// Parses credentials from a JSON string and validates that no field is empty.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let credentials: Credentials = serde_json::from_str(raw).map_err(|e| {
            error!("Credentials file is not valid JSON: {}", e);
            AppError::Credential(format!("malformed credentials: {}", e))
        })?;

        for (name, value) in [
            ("accessToken", &credentials.access_token),
            ("accessTokenSecret", &credentials.access_token_secret),
            ("consumerKey", &credentials.consumer_key),
            ("consumerSecret", &credentials.consumer_secret),
        ] {
            if value.trim().is_empty() {
                error!("Credential field {} is empty", name);
                return Err(AppError::Credential(format!("{} is empty", name)));
            }
        }

        debug!("Loaded credentials: {:?}", credentials);
        Ok(credentials)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &mask_secret(&self.access_token))
            .field("access_token_secret", &"[REDACTED]")
            .field("consumer_key", &mask_secret(&self.consumer_key))
            .field("consumer_secret", &"[REDACTED]")
            .finish()
    }
}

/// Masks a token for logging, keeping at most its first four characters.
pub(crate) fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() > 8 {
        format!("{}...", visible)
    } else {
        "...".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = r#"{
        "accessToken": "1234567890-abcdefghijklmnop",
        "accessTokenSecret": "token-secret-value",
        "consumerKey": "consumer-key-value",
        "consumerSecret": "consumer-secret-value"
    }"#;

    #[test]
    fn test_load_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let credentials = Credentials::load(file.path()).unwrap();
        assert_eq!(credentials.access_token, "1234567890-abcdefghijklmnop");
        assert_eq!(credentials.access_token_secret, "token-secret-value");
        assert_eq!(credentials.consumer_key, "consumer-key-value");
        assert_eq!(credentials.consumer_secret, "consumer-secret-value");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Credentials::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(AppError::Credential(_))));
    }

    #[test]
    fn test_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"accessToken\": ").unwrap();

        let result = Credentials::load(file.path());
        assert!(matches!(result, Err(AppError::Credential(_))));
    }

    #[test]
    fn test_missing_field() {
        let raw = r#"{"accessToken": "a", "accessTokenSecret": "b", "consumerKey": "c"}"#;
        assert!(matches!(
            Credentials::from_json(raw),
            Err(AppError::Credential(_))
        ));
    }

    #[test]
    fn test_empty_field() {
        let raw = r#"{"accessToken": "a", "accessTokenSecret": "b", "consumerKey": "c", "consumerSecret": "  "}"#;
        match Credentials::from_json(raw) {
            Err(AppError::Credential(msg)) => assert!(msg.contains("consumerSecret")),
            other => panic!("expected credential error, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_masks_secrets() {
        let credentials = Credentials::from_json(VALID).unwrap();
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("token-secret-value"));
        assert!(!debug.contains("consumer-secret-value"));
        assert!(!debug.contains("abcdefghijklmnop"));
        assert!(debug.contains("1234..."));
    }
}
