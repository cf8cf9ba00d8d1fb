// SPDX-FileCopyrightText: 2026 Photel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Photel - ship screenshots to a Telegram channel.
//!
//! This is the binary entry point.

mod run;
mod setup;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use photel_config::PhotelConfig;
use photel_core::PhotelError;

/// Photel - ship screenshots to a Telegram channel.
#[derive(Parser, Debug)]
#[command(name = "photel", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Store the bot token, channel and screenshot directory under a password.
    Setup(setup::SetupArgs),
    /// Unlock the stored configuration and verify the bot token.
    Check,
    /// Deliver files to the channel. Delivered files are deleted.
    Send {
        /// Files to deliver.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Caption attached to every file.
        #[arg(long)]
        caption: Option<String>,
    },
    /// Send a text message to the channel.
    Message {
        /// Message text.
        text: String,
    },
    /// Deliver files named on stdin, one `path[<TAB>caption]` per line.
    Watch,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => photel_config::load_and_validate_path(path),
        None => photel_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            photel_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    if let Err(e) = dispatch(cli.command, &config).await {
        eprintln!("photel: {e}");
        eprintln!("  hint: {}", e.hint());
        std::process::exit(exit_code(&e));
    }
}

async fn dispatch(command: Commands, config: &PhotelConfig) -> Result<(), PhotelError> {
    match command {
        Commands::Setup(args) => setup::run_setup(config, args).await,
        Commands::Check => run::run_check(config).await,
        Commands::Send { files, caption } => run::run_send(config, files, caption).await,
        Commands::Message { text } => run::run_message(config, &text).await,
        Commands::Watch => run::run_watch(config).await,
    }
}

/// Process exit status per error kind, so scripts can tell a missing setup
/// from a wrong password.
fn exit_code(err: &PhotelError) -> i32 {
    match err {
        PhotelError::NotFound { .. } => 2,
        PhotelError::InvalidPassword => 3,
        PhotelError::CorruptConfig { .. } | PhotelError::Integrity => 4,
        PhotelError::Protocol { .. } => 5,
        _ => 1,
    }
}

/// Initialize the tracing subscriber with an env filter.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("photel={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
