// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod inspect;
pub mod predict;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Sign Gesture Node CLI
#[derive(Parser, Debug)]
#[command(name = "sign-cli")]
#[command(version = crate::version::VERSION_NUMBER)]
#[command(about = "Debugging tools for the sign gesture classifier", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a single photo without thresholding
    Predict(predict::PredictArgs),

    /// Print a photo as ASCII art
    Ascii(inspect::AsciiArgs),

    /// Print pixel statistics of a photo
    Stats(inspect::StatsArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Predict(args) => predict::run_predict(args).await,
        Commands::Ascii(args) => inspect::run_ascii(args),
        Commands::Stats(args) => inspect::run_stats(args),
    }
}
