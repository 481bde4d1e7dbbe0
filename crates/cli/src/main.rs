// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fairsem - Fair distributed semaphore CLI

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, simulate};

/// Environment variable holding the log filter directive
const LOG_ENV: &str = "FAIRSEM_LOG";

#[derive(Parser)]
#[command(
    name = "fairsem",
    version,
    about = "Fairsem - Fair distributed counting semaphore"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run workers against an in-memory store and check the concurrency limit
    Simulate(simulate::SimulateArgs),
    /// Print the resolved semaphore configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    match cli.command {
        Commands::Simulate(args) => simulate::simulate(args).await,
        Commands::Config(args) => config::show(args),
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
