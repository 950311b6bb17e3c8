//! CLI administration tool for tinylink.
//!
//! Runs the same operations as the HTTP API directly against the configured
//! store, plus database diagnostics.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL (idempotent)
//! cargo run --bin tinylink-admin -- shorten https://example.com/page
//!
//! # Resolve a token (counts a click)
//! cargo run --bin tinylink-admin -- resolve aB3xY9
//!
//! # Show statistics for a token
//! cargo run --bin tinylink-admin -- stats aB3xY9
//!
//! # Find the token of a URL
//! cargo run --bin tinylink-admin -- lookup https://example.com/page
//!
//! # Check database connection
//! cargo run --bin tinylink-admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `tinylink::config`.

use tinylink::application::services::ShortUrlService;
use tinylink::config::{self, Config};
use tinylink::server;
use tinylink::utils::url_validator::validate_url;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for managing tinylink.
#[derive(Parser)]
#[command(name = "tinylink-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Create or reuse a short token for a URL
    Shorten {
        /// URL to shorten (http or https)
        url: String,
    },

    /// Resolve a token to its original URL, counting one click
    Resolve { token: String },

    /// Show click statistics for a token
    Stats { token: String },

    /// Find the token already assigned to a URL
    Lookup { url: String },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Shorten { url } => shorten(&service(&config).await?, &url).await?,
        Commands::Resolve { token } => resolve(&service(&config).await?, &token).await?,
        Commands::Stats { token } => show_stats(&service(&config).await?, &token).await?,
        Commands::Lookup { url } => lookup(&service(&config).await?, &url).await?,
        Commands::Db { action } => handle_db_action(action, &config).await?,
    }

    Ok(())
}

async fn service(config: &Config) -> Result<ShortUrlService> {
    server::build_service(config).await
}

/// Creates or reuses a short token for a URL.
async fn shorten(service: &ShortUrlService, url: &str) -> Result<()> {
    validate_url(url)?;
    let mapping = service.create_short_url(url).await?;

    println!("{}", "✅ Short URL ready".green().bold());
    println!("  Token: {}", mapping.short_token.bright_white().bold());
    println!("  URL:   {}", mapping.original_url.cyan());

    Ok(())
}

/// Prints the original URL of a token. Counts as a click.
async fn resolve(service: &ShortUrlService, token: &str) -> Result<()> {
    let url = service.get_original_url(token).await?;
    println!("{}", url);

    Ok(())
}

/// Displays token statistics.
async fn show_stats(service: &ShortUrlService, token: &str) -> Result<()> {
    let stats = service.get_stats(token).await?;

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();
    println!("  Token:  {}", stats.short_token.bright_white());
    println!("  URL:    {}", stats.original_url.cyan());
    println!(
        "  Clicks: {}",
        stats.clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn lookup(service: &ShortUrlService, url: &str) -> Result<()> {
    let mapping = service.find_by_original_url(url).await?;

    println!("  Token:   {}", mapping.short_token.bright_white().bold());
    println!("  Clicks:  {}", mapping.clicks.to_string().bright_green());
    println!(
        "  Created: {}",
        mapping
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    let pool = server::connect_pool(config).await?;

    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(&pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(&pool)
                .await?;

            let mappings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_urls")
                .fetch_one(&pool)
                .await?;

            let clicks: i64 =
                sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM short_urls")
                    .fetch_one(&pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Mappings:   {}", mappings.to_string().bright_green().bold());
            println!("  Clicks:     {}", clicks.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
