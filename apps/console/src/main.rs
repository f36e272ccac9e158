//! # Tome Console
//!
//! Line-oriented bookstore management console.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Console Process                                  │
//! │                                                                         │
//! │  env ──► ConsoleConfig ──► Database::new ──► open_bookstore             │
//! │                                                   │                     │
//! │  stdin ──► repl::run ◄──── Dispatcher ◄───────────┘                     │
//! │               │                                                         │
//! │               ▼                                                         │
//! │  quit / exit / EOF ──► flush ──► close                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! stdout carries only command responses; diagnostics go to stderr.

mod config;
mod error;
mod lifecycle;
mod repl;

use anyhow::Context;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tome_core::Dispatcher;
use tome_db::{Database, DbConfig};

use crate::config::ConsoleConfig;
use crate::error::AppResult;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ConsoleConfig::from_env().context("Failed to load configuration")?;
    info!(
        db_path = %config.db_path.display(),
        persist_audit_log = config.persist_audit_log,
        logout_policy = ?config.logout_policy(),
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::new(config.db_path.clone()))
        .await
        .context("Failed to open the bookstore database")?;

    let outcome = serve(&db, &config).await;
    db.close().await;
    outcome.context("Console stopped with an error")
}

/// Loads the state, runs the read loop and flushes, even if reading failed.
async fn serve(db: &Database, config: &ConsoleConfig) -> AppResult<()> {
    let bookstore = lifecycle::open_bookstore(db, config).await?;
    let mut dispatcher = Dispatcher::new(bookstore);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let exit = repl::run(&mut dispatcher, stdin, &mut stdout).await;

    lifecycle::flush(db, &dispatcher, config).await?;

    let exit = exit?;
    info!(?exit, "Console finished");
    Ok(())
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - also show every rejected command and its reason
/// - Default: `warn,tome=info,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,tome=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
