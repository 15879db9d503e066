//! # Murick Shop CLI
//!
//! Command-line front end for running a battery shop: stock, sales,
//! receipts, analytics and CSV exports.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           murick <command>                              │
//! │                                                                         │
//! │  1. Initialize Logging (stderr, RUST_LOG) ─────────────────────────────►│
//! │                                                                         │
//! │  2. Parse arguments (clap) ────────────────────────────────────────────►│
//! │                                                                         │
//! │  3. Load config (murick.toml + MURICK_* env) ──────────────────────────►│
//! │                                                                         │
//! │  4. Open database & run migrations ────────────────────────────────────►│
//! │                                                                         │
//! │  5. Dispatch command ──► CommandOutput ──► Printer (text or --json)     │
//! │                                                                         │
//! │  6. Close pool, exit with the error's status code on failure            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`cli`]: clap definitions
//! - [`commands`]: one handler per command group
//! - [`state`]: configuration and database handle
//! - [`output`]: tables and JSON printing
//! - [`error`]: error codes and exit statuses

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod state;

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliResult;
use crate::output::{CommandOutput, Printer};
use crate::state::{open_database, AppConfig, AppState};

/// Parses the process arguments, runs the command and prints the result.
pub async fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let printer = Printer::new(cli.json);

    match execute(cli).await {
        Ok(output) => {
            printer.print(&output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            printer.error(&err);
            err.exit_code()
        }
    }
}

/// Loads configuration from `--config` and the environment, then executes.
pub async fn execute(cli: Cli) -> CliResult<CommandOutput> {
    let config = AppConfig::load(cli.config.clone())?;
    execute_with_config(cli, config).await
}

/// Executes `cli` with an already loaded configuration.
pub async fn execute_with_config(cli: Cli, config: AppConfig) -> CliResult<CommandOutput> {
    if let Command::Catalog = cli.command {
        return commands::catalog::run();
    }

    let db = open_database(&config).await?;
    let state = AppState::new(config, db, cli.shop);
    debug!(shop_id = %state.shop_id, command = ?cli.command, "Dispatching command");

    let result = commands::dispatch(&state, cli.command).await;

    state.db.close().await;
    info!("Database closed");
    result
}

/// Logs go to stderr so stdout stays clean for `--json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,murick=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
