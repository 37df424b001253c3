//! This module implements the CLI interface for sponsor-splice: command
//! parsing, the async entrypoint and user-visible status reporting.
//!
//! All pipeline logic (fetching, rendering, patching) lives in the
//! [`sponsor-splice-core`] crate. This module is strictly CLI glue.
//!
//! ## How To Use
//! - For command-line users: `sponsor-splice update --config sponsors.yaml`.
//! - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
//!
//! [`sponsor-splice-core`]: ../../sponsor-splice-core/

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sponsor_splice_core::config::ActionConfig;
use sponsor_splice_core::contract::Status;
use sponsor_splice_core::fetch::GraphqlFetcher;
use sponsor_splice_core::pipeline::run_action;

use crate::load_config::load_config;

/// Name of the step output consumed by later workflow steps.
pub const STATUS_OUTPUT: &str = "sponsorship-status";

/// CLI for sponsor-splice: keep a README's sponsor list up to date.
#[derive(Parser)]
#[clap(
    name = "sponsor-splice",
    version,
    about = "Fetch GitHub sponsors and splice them into a marked region of a file"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch sponsors and rewrite the marker region of the configured file
    Update {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<Status> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Update { config } => {
            let (config, fetcher) = match prepare(&config) {
                Ok(prepared) => prepared,
                Err(e) => {
                    tracing::error!(command = "update", error = %e, "Setup failed");
                    report_status("failed")?;
                    return Err(e);
                }
            };
            tracing::info!(command = "update", "Starting sponsorship update");

            match run_action(&fetcher, &config).await {
                Ok(status) => {
                    tracing::info!(command = "update", %status, "Update complete");
                    report_status(status.as_str())?;
                    Ok(status)
                }
                Err(e) => {
                    tracing::error!(command = "update", error = %e, "Update failed");
                    report_status("failed")?;
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}

/// Loads the config and builds the HTTP client; either failure is a failed run.
fn prepare(config_path: &Path) -> Result<(ActionConfig, GraphqlFetcher)> {
    let config = load_config(config_path)?;
    let fetcher = GraphqlFetcher::new().context("Failed to construct HTTP client")?;
    Ok((config, fetcher))
}

/// Prints the status and, inside GitHub Actions, appends it to `$GITHUB_OUTPUT`.
fn report_status(status: &str) -> Result<()> {
    println!("{STATUS_OUTPUT}={status}");

    if let Some(output) = std::env::var_os("GITHUB_OUTPUT") {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&output)
            .with_context(|| format!("Failed to open GITHUB_OUTPUT file {output:?}"))?;
        writeln!(file, "{STATUS_OUTPUT}={status}").context("Failed to write step output")?;
    }
    Ok(())
}
