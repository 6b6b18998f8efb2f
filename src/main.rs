//! # Gotweet
//!
//! Web service entry point. Loads configuration and credentials, connects to
//! PostgreSQL, and serves the HTML pages and form endpoints.
//!
//! ## Environment Variables
//!
//! - `APP_ENV`: Selects the `<APP_ENV>.env` file loaded at startup
//! - `TWITTER_CREDENTIALS_PATH`: Twitter/X credentials JSON (default `twitterAccount.json`)
//! - `DATABASE_URL` or `DB_*`: PostgreSQL connection settings
//! - `STATIC_DIR`: Static files root (default `public`)
//! - `PORT`: Server port (defaults to 8000)
//! - `RUST_LOG`: Log filter

use axum::http::{header, HeaderValue};
use log::{error, info};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use gotweet::{
    app_router, db, load_env_file, AppConfig, AppState, Credentials, KeywordTable, PgLogStore,
    TwitterClient,
};

/// Main entry point for the gotweet web service.
///
/// Credential, configuration and database failures at startup are fatal and
/// reported through the exit code. Once serving, no request can stop the process.
///
/// # Example Usage
///
/// ```bash
/// # Run with default port 8000
/// cargo run
///
/// # Run with the production env file and debug logging
/// APP_ENV=production RUST_LOG=debug cargo run
/// ```
#[tokio::main]
async fn main() -> ExitCode {
    load_env_file();
    // Initialize the logging system
    env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("gotweet failed to start: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::from_env()?;

    let credentials = Credentials::load(&config.credentials_path)?;
    let twitter = TwitterClient::new(credentials, &config.twitter_api_base)?;

    let keywords = match &config.keywords_path {
        Some(path) => KeywordTable::from_file(path)?,
        None => KeywordTable::default(),
    };
    info!("Keyword table has {} entries", keywords.len());

    let pool = db::get_db_pool(&config.database).await?;
    db::ensure_schema(&pool).await?;

    let state = AppState {
        keywords: Arc::new(keywords),
        twitter: Arc::new(twitter),
        logs: Arc::new(PgLogStore::new(pool)),
        search_count: config.search_count,
    };

    // Build the HTTP application with all routes and middleware
    let app = app_router(state)
        .nest_service("/css", ServeDir::new(config.static_dir.join("css")))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        );

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Starting gotweet server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
