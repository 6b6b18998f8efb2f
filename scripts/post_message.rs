//! Message Preview and Posting Script
//!
//! Shows how a message will look after keyword substitution and decoration,
//! and optionally posts it with the configured credentials.
//!
//! ```bash
//! # Preview only
//! cargo run --bin post_message -- "なんて日だ"
//!
//! # Preview, confirm, and post
//! cargo run --bin post_message -- --post "なんて日だ"
//! ```

use std::io::{self, Write};

use gotweet::{
    compose_message, load_env_file, publish, AppConfig, Credentials, KeywordTable, TwitterClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    load_env_file();
    env_logger::init();

    println!("🐹 gotweet message tool");
    println!("=======================");

    let mut should_post = false;
    let mut words = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--post" {
            should_post = true;
        } else {
            words.push(arg);
        }
    }

    let raw = if words.is_empty() {
        print!("📝 Enter your message: ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_string()
    } else {
        words.join(" ")
    };

    let config = AppConfig::from_env()?;
    let keywords = match &config.keywords_path {
        Some(path) => KeywordTable::from_file(path)?,
        None => KeywordTable::default(),
    };

    let message = match compose_message(&raw, &keywords) {
        Ok(message) => message,
        Err(e) => {
            println!("❌ {}", e);
            return Err(e.into());
        }
    };

    println!("📏 Message length: {} characters", message.chars().count());
    println!("----------------------------------------");
    println!("{}", message);
    println!("----------------------------------------");

    if !should_post {
        println!("ℹ️  Preview only. Pass --post to publish.");
        return Ok(());
    }

    print!("🚀 Post this message? [y/N]: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    if !answer.trim().eq_ignore_ascii_case("y") {
        println!("✋ Not posted.");
        return Ok(());
    }

    let credentials = Credentials::load(&config.credentials_path)?;
    let client = TwitterClient::new(credentials, &config.twitter_api_base)?;

    match publish(&raw, &keywords, &client).await {
        Ok(result) => {
            println!("🎉 Posted as tweet {} by {}", result.tweet_id, result.author);
            Ok(())
        }
        Err(e) => {
            println!("💥 Failed to post message: {}", e);
            Err(e.into())
        }
    }
}
