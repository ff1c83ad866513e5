// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::vision::inspect::ASCII_SIZE;
use crate::vision::{ascii_art, load_image_file, ImageStats};

/// Arguments for ascii command
#[derive(Args, Debug)]
pub struct AsciiArgs {
    /// Image to render
    pub image: PathBuf,

    /// Output width and height in characters
    #[arg(long, default_value_t = ASCII_SIZE)]
    pub size: u32,
}

/// Arguments for stats command
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Image to analyse
    pub image: PathBuf,
}

pub fn run_ascii(args: AsciiArgs) -> Result<()> {
    if args.size == 0 {
        anyhow::bail!("--size must be greater than 0");
    }

    let (image, _) = load_image_file(&args.image)
        .with_context(|| format!("Failed to load {}", args.image.display()))?;

    print!("{}", ascii_art(&image, args.size));
    Ok(())
}

pub fn run_stats(args: StatsArgs) -> Result<()> {
    let (image, _) = load_image_file(&args.image)
        .with_context(|| format!("Failed to load {}", args.image.display()))?;

    let stats = ImageStats::from_image(&image)
        .with_context(|| format!("{} has no pixels", args.image.display()))?;

    println!("{}", stats);
    if stats.has_light_background() {
        println!("Background looks light");
    } else {
        println!("Background looks dark");
    }
    Ok(())
}
