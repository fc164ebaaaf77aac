// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Autocrop — crop photographs to their most prominent high-contrast region.
//
// Entry point. Initialises logging, resolves the crop configuration from the
// command line and an optional config file, and runs the folder batch.

use std::path::PathBuf;
use std::process::ExitCode;

use autocrop_core::human_errors::humanize_error;
use autocrop_core::{CropConfig, Result};
use clap::Parser;

/// Tool to automatically crop images based on shapes.
#[derive(Debug, Parser)]
#[command(name = "autocrop", version, about)]
struct Args {
    /// The folder with all the images.
    folder: PathBuf,

    /// The glob used to find the images [default: IMG_*.JPG].
    #[arg(long)]
    glob: Option<String>,

    /// The threshold for separating foreground from background [default: 120].
    #[arg(long)]
    thres: Option<u8>,

    /// The JPEG quality, 1-100; 0 leaves the encoder default [default: 60].
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: Option<u8>,

    /// Keep images as stored instead of rotating them by their EXIF orientation.
    #[arg(long)]
    no_orient: bool,

    /// JSON config file; flags given on the command line take precedence.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Args {
    /// Start from the config file (or defaults) and apply explicit flags.
    fn resolve_config(&self) -> Result<CropConfig> {
        let mut config = match &self.config {
            Some(path) => CropConfig::load(path)?,
            None => CropConfig::default(),
        };
        if let Some(glob) = &self.glob {
            config.glob_pattern = glob.clone();
        }
        if let Some(thres) = self.thres {
            config.threshold = thres;
        }
        if let Some(quality) = self.quality {
            config.jpeg_quality = CropConfig::quality_from_cli(quality);
        }
        if self.no_orient {
            config.auto_orient = false;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    tracing::info!(folder = %args.folder.display(), "Autocrop starting");

    let outcome = args
        .resolve_config()
        .and_then(|config| autocrop_image::batch::run(&args.folder, &config));

    match outcome {
        Ok(summary) => {
            tracing::info!(files = summary.len(), "Done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "autocrop failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}
