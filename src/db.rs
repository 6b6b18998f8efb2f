//! Database module for the publish log.
//!
//! Every successful publish is recorded as a row in the `logs` table together
//! with the display name the platform reported. Rows are only ever inserted and
//! read; `updated_at` and `deleted_at` are bookkeeping columns kept for
//! compatibility with existing databases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::errors::AppError;
use crate::twitter::sanitize_for_logging;

/// One recorded publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct LogEntry {
    pub id: i64,
    pub message: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only store of publish records.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Records a published message and its author.
    async fn append(&self, message: &str, author: &str) -> Result<LogEntry, AppError>;

    /// Returns every entry, newest first.
    async fn list_all(&self) -> Result<Vec<LogEntry>, AppError>;
}

/// Opens a connection pool to PostgreSQL.
///
/// # Returns
///
/// - `Ok(PgPool)`: A connection pool to the database
/// - `Err(AppError::Storage)`: If the database cannot be reached
pub async fn get_db_pool(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    info!("Connecting to PostgreSQL database");
    debug!("Database target: {}", config.describe());

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.connection_url())
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            AppError::Storage(format!("cannot connect to database: {}", e))
        })?;

    info!("Successfully connected to PostgreSQL database");
    Ok(pool)
}

/// Creates the `logs` table and its ordering index if they do not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    info!("Ensuring logs table exists");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS logs (
            id BIGSERIAL PRIMARY KEY,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ,
            message TEXT NOT NULL,
            author TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_logs_created_at
        ON logs (created_at DESC)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// [`LogStore`] backed by a shared PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgLogStore {
    pool: PgPool,
}

impl PgLogStore {
    pub fn new(pool: PgPool) -> Self {
        PgLogStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn append(&self, message: &str, author: &str) -> Result<LogEntry, AppError> {
        info!(
            "Storing publish log entry: '{}' by {}",
            sanitize_for_logging(message, 80),
            author
        );

        let entry = sqlx::query_as::<_, LogEntry>(
            r#"
            INSERT INTO logs (message, author, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            RETURNING id, message, author, created_at
            "#,
        )
        .bind(message)
        .bind(author)
        .fetch_one(&self.pool)
        .await?;

        info!("Stored log entry {}", entry.id);
        Ok(entry)
    }

    async fn list_all(&self) -> Result<Vec<LogEntry>, AppError> {
        info!("Querying database for publish log");

        let entries = sqlx::query_as::<_, LogEntry>(
            r#"
            SELECT id, message, author, created_at
            FROM logs
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        info!("Found {} log entries", entries.len());
        Ok(entries)
    }
}
