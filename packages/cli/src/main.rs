#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tool that turns the storms dataset into track geometry.
//!
//! `build` writes `tracks.geojson` (one polyline per storm-year) and
//! `segments.geojson` (one two-point polyline per consecutive pair of
//! fixes, tagged with the leading fix) for map renderers. `summary` prints
//! one line per track.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use storm_tracks_cli_utils::IndicatifProgress;

use crate::config::RunConfig;

#[derive(Parser)]
#[command(name = "storm_tracks", about = "Storm track geometry builder")]
struct Cli {
    /// Run configuration (TOML). Defaults to the embedded six-storm config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build tracks and segments and write them as `GeoJSON`
    Build {
        /// Storms CSV, overriding the configured input
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output directory, overriding the configured one
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print a one-line summary per track
    Summary {
        /// Storms CSV, overriding the configured input
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = storm_tracks_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = RunConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build { input, output_dir } => {
            config.input = commands::override_path(&config.input, input);
            config.output_dir = commands::override_path(&config.output_dir, output_dir);

            let progress = IndicatifProgress::groups_bar(&multi, "Building tracks");
            let outputs = commands::run_build(&config, &progress)?;

            log::info!(
                "Tracks: {}, segments: {}",
                outputs.tracks.display(),
                outputs.segments.display()
            );
        }
        Commands::Summary { input } => {
            config.input = commands::override_path(&config.input, input);

            let progress = IndicatifProgress::groups_bar(&multi, "Building tracks");
            let summaries = commands::run_summary(&config, &progress)?;

            for summary in &summaries {
                println!("{}", commands::format_summary(summary));
            }
        }
    }

    Ok(())
}
