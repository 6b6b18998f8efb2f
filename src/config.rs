//! Configuration module for the gotweet service.
//!
//! All settings come from environment variables. At startup an optional
//! `<APP_ENV>.env` file is loaded first, without overriding variables that are
//! already set. `GO_ENV` names the file when `APP_ENV` is unset, and plain
//! `.env` is used when neither is.

use log::{debug, info, warn};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::AppError;
use crate::twitter::{DEFAULT_API_BASE, DEFAULT_SEARCH_COUNT};

const DEFAULT_PORT: u16 = 8000;

/// PostgreSQL connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection string; when set, the individual parts are ignored
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Reads `DATABASE_URL` or the `DB_*` variables.
    ///
    /// `ENV` and `DB` are accepted for the host and database name when
    /// `DB_HOST` and `DB_NAME` are unset.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(DatabaseConfig {
            url: env::var("DATABASE_URL").ok().filter(|u| !u.is_empty()),
            host: env_first(&["DB_HOST", "ENV"], "localhost"),
            port: env_parse("DB_PORT", 5432)?,
            user: env_or("DB_USER", "postgres"),
            password: env_or("DB_PASS", ""),
            name: env_first(&["DB_NAME", "DB"], "postgres"),
            max_connections: env_parse("DB_MAX_CONNECTIONS", 5)?,
        })
    }

    /// The connection string handed to the driver.
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        let credentials = if self.password.is_empty() {
            urlencoding::encode(&self.user).into_owned()
        } else {
            format!(
                "{}:{}",
                urlencoding::encode(&self.user),
                urlencoding::encode(&self.password)
            )
        };
        format!(
            "postgres://{}@{}:{}/{}?sslmode=disable",
            credentials, self.host, self.port, self.name
        )
    }

    /// A loggable description of the target that never includes the password.
    pub fn describe(&self) -> String {
        match &self.url {
            Some(url) => format!("{}...", url.chars().take(20).collect::<String>()),
            None => format!("{}@{}:{}/{}", self.user, self.host, self.port, self.name),
        }
    }
}

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    /// JSON file holding the four Twitter credentials
    pub credentials_path: PathBuf,
    pub twitter_api_base: String,
    pub search_count: u32,
    /// Optional keyword table override
    pub keywords_path: Option<PathBuf>,
    /// Root of the static files served at `/` and `/css`
    pub static_dir: PathBuf,
    pub port: u16,
}

impl AppConfig {
    /// Builds the configuration from environment variables.
    ///
    /// # Returns
    ///
    /// - `Ok(AppConfig)`: With defaults filled in for unset variables
    /// - `Err(AppError::Config)`: If a numeric variable cannot be parsed
    pub fn from_env() -> Result<Self, AppError> {
        info!("Loading configuration from environment variables");

        let config = AppConfig {
            database: DatabaseConfig::from_env()?,
            credentials_path: PathBuf::from(env_or(
                "TWITTER_CREDENTIALS_PATH",
                "twitterAccount.json",
            )),
            twitter_api_base: env_or("TWITTER_API_BASE", DEFAULT_API_BASE),
            search_count: env_parse("SEARCH_COUNT", DEFAULT_SEARCH_COUNT)?,
            keywords_path: env::var("KEYWORDS_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            static_dir: PathBuf::from(env_or("STATIC_DIR", "public")),
            port: get_server_port(),
        };

        debug!("Configuration: {:?}", config.redacted());
        Ok(config)
    }

    fn redacted(&self) -> AppConfig {
        let mut copy = self.clone();
        copy.database.password = "[REDACTED]".to_string();
        copy.database.url = copy.database.url.as_ref().map(|_| self.database.describe());
        copy
    }
}

/// Loads `<APP_ENV>.env` into the process environment.
///
/// `GO_ENV` is used when `APP_ENV` is unset. A missing file is not an error;
/// variables already set take precedence.
pub fn load_env_file() {
    let filename = env_file_name();
    match dotenv::from_filename(&filename) {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => warn!("Env file {} cannot be read: {}", filename, e),
    }
}

fn env_file_name() -> String {
    format!("{}.env", env_first(&["APP_ENV", "GO_ENV"], ""))
}

/// Gets the server port from the `PORT` environment variable.
///
/// Falls back to 8000 when the variable is unset or not a valid port.
///
/// # Example
///
/// ```rust
/// use gotweet::get_server_port;
///
/// std::env::remove_var("PORT");
/// assert_eq!(get_server_port(), 8000);
/// ```
pub fn get_server_port() -> u16 {
    match env::var("PORT") {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!("PORT '{}' is not a valid port, using {}", value, DEFAULT_PORT);
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// The first non-empty variable among `names`, or `default`.
fn env_first(names: &[&str], default: &str) -> String {
    names
        .iter()
        .find_map(|name| env::var(name).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) if !value.is_empty() => value
            .parse()
            .map_err(|e| AppError::Config(format!("{} must be a number: {}", name, e))),
        _ => Ok(default),
    }
}
