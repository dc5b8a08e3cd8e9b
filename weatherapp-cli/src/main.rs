//! Binary crate for the `weatherapp` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Printing reports and error notices to the terminal

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod view;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cmd = cli::Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cmd.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    cmd.run().await
}
