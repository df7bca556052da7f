#![deny(missing_docs)]

//! # Bot API Spec CLI
//!
//! Command Line Interface for the Telegram Bot API spec exporter.
//!
//! Supported Commands:
//! - `generate`: Reference page -> JSON spec + OpenAPI document.
//! - `check`: Re-imports a JSON spec and runs the consistency checks.

use crate::error::CliResult;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod check;
mod error;
mod fetch;
mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Telegram Bot API spec exporter")]
struct Cli {
    /// Log filter, e.g. `info` or `botapi_core=debug`. Falls back to `RUST_LOG`.
    #[clap(long, global = true)]
    log: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the spec from the reference page and export it.
    Generate(generate::GenerateArgs),
    /// Validate a previously exported JSON spec.
    Check(check::CheckArgs),
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
        Commands::Check(args) => check::execute(args)?,
    }

    Ok(())
}
