//! # snnc - run MDSA-on-SNN experiments from the command line
//!
//! Loads a run configuration, drives the compile / simulate / compare
//! stages and prints results or graphs.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use snnc_cli::error::CliResult;
use snnc_cli::SnncCli;

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = SnncCli::parse();

    // RUST_LOG wins unless --verbose asks for debug output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries command output; logs go to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(err) = cli.execute().await {
        error!("Command failed: {}", err);
        std::process::exit(1);
    }

    Ok(())
}
