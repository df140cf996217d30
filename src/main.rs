//! EdgeOne Zone Copy
//!
//! Replicates the configuration of a template EdgeOne zone onto a target
//! zone: origin groups, acceleration domains, rule engine rules and zone
//! settings.
//!
//! # Usage
//! ```bash
//! # Write an example configuration
//! zone-copy init-config --output ./config/cp.yaml
//!
//! # Copy everything
//! zone-copy import --module all
//!
//! # Copy only rules, with a different configuration file
//! zone-copy --config ./config/staging.yaml import --module rule
//! ```

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use zone_copy::config::{ZoneCopyConfig, DEFAULT_CONFIG_PATH};
use zone_copy::copy::{ImportReport, Module, ZoneCopier};
use zone_copy::teo::TeoClient;

// ============================================================
// CLI Definition
// ============================================================

#[derive(Parser)]
#[command(name = "zone-copy")]
#[command(about = "Copy EdgeOne zone configuration from a template zone", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the YAML configuration
    #[arg(long, global = true, env = "ZONE_COPY_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import template zone entities into the target zone
    Import {
        /// Entity type to import
        #[arg(long, value_enum, default_value_t = Module::All)]
        module: Module,
    },

    /// Write an example configuration file
    InitConfig {
        /// Destination; defaults to --config
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

// ============================================================
// Main Entry Point
// ============================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import { module } => {
            let config = ZoneCopyConfig::load(&cli.config)
                .with_context(|| format!("Failed to load {}", cli.config.display()))?;
            init_logging(cli.verbose, cli.json, config.log_path.as_deref())?;

            info!(
                config = %cli.config.display(),
                template_zone = %config.template_zone,
                target_zone = %config.target_zone,
                "Zone copy starting"
            );

            let client = Arc::new(
                TeoClient::new(&config.account).context("Failed to create EdgeOne client")?,
            );
            let copier = ZoneCopier::with_client(config.scope(), client);

            let mut failed = Vec::new();
            for (kind, result) in copier.run(module).await {
                match result {
                    Ok(report) => print_report(&report),
                    Err(_) => failed.push(kind.to_string()),
                }
            }

            if !failed.is_empty() {
                bail!("Import failed for: {}", failed.join(", "));
            }
        }

        Commands::InitConfig { output } => {
            init_logging(cli.verbose, cli.json, None)?;

            let path = output.unwrap_or(cli.config);
            ZoneCopyConfig::template()
                .write_to(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            println!("Wrote example configuration to {}", path.display());
        }
    }

    Ok(())
}

fn print_report(report: &ImportReport) {
    println!(
        "{:<14} created: {:<4} skipped: {:<4} applied: {}",
        report.kind.to_string(),
        report.created(),
        report.skipped(),
        report.applied()
    );
}

/// Install the global subscriber, appending to `log_path` when given
fn init_logging(verbose: bool, json: bool, log_path: Option<&Path>) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (writer, ansi) = match log_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
