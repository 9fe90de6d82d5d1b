//! CLI binary entry point for s3-lineage-sync

use anyhow::Result;
use clap::{Parser, Subcommand};
use s3_lineage_sync::cli::commands::{
    InvokeArgs, handle_invoke, handle_sample_config, handle_validate,
};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "s3-lineage-sync")]
#[command(about = "Synchronise S3 assets and their lineage into the metadata catalog")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an operation envelope against the configured catalog and bucket
    Invoke {
        /// Envelope file path or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
        /// Configuration file (defaults to .s3-lineage-sync.toml in the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Pretty-print the response
        #[arg(short, long)]
        pretty: bool,
    },
    /// Validate an operation envelope without calling any service
    Validate {
        /// Envelope file path or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
    },
    /// Print a sample configuration file
    SampleConfig,
}

/// Logs go to stderr so stdout carries only the response
fn init_logging(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json);

    match cli.command {
        Commands::Invoke {
            input,
            config,
            pretty,
        } => handle_invoke(&InvokeArgs {
            input,
            config,
            pretty,
        })?,
        Commands::Validate { input } => handle_validate(&input)?,
        Commands::SampleConfig => handle_sample_config()?,
    }

    Ok(())
}
