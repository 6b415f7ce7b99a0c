//! CLI entry point for the Civitai toolkit.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use civitai_core::{TerminalPrompter, load_config};
use tracing::{debug, info};

mod cli;
mod commands;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = load_config(args.config.as_deref()).context("failed to load configuration")?;
    debug!(?config, "configuration loaded");

    let show_progress = !args.no_progress && !args.quiet && io::stderr().is_terminal();
    let mut prompter = TerminalPrompter;

    match &args.command {
        Command::Extract => commands::run_extract_command(&config, show_progress).await?,
        Command::Download(download) => {
            commands::run_download_command(&config, download.category, &mut prompter, show_progress)
                .await?;
        }
        Command::Organize(folder) => {
            commands::run_organize_command(
                &config,
                folder.folder.as_deref(),
                &mut prompter,
                show_progress,
            )
            .await?;
        }
        Command::Lookup(folder) => {
            commands::run_lookup_command(&config, folder.folder.as_deref(), &mut prompter).await?;
        }
        Command::Audit(audit) => commands::run_audit_command(&config, audit, &mut prompter)?,
    }

    info!("done");
    Ok(())
}
