// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # archlat
//!
//! Command-line interface for NAS topology reconstruction and block-level
//! latency prediction.
//!
//! ## Usage
//! ```bash
//! # Decode a genome into its parameter segments
//! archlat decode --family mobilenetv3 --genome ks5535..._e6664..._d22343
//!
//! # Reconstruct and inspect the block sequence
//! archlat inspect --family resnet --genome d00101_e3525..._w122210
//!
//! # Predict per-block and total latency
//! archlat predict --family mobilenetv3 --genome ks5535..._d22343 \
//!     --cost-table ./tables/cortex-a76.json
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "archlat",
    about = "Reconstruct NAS-sampled network topologies and predict their latency",
    version
)]
struct Cli {
    /// Path to a TOML configuration file (overrides CLI arguments).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a genome string into its parameter segments.
    Decode {
        /// Architecture family: mobilenetv3 or resnet.
        #[arg(short, long)]
        family: String,

        /// Genome string to decode.
        #[arg(short, long)]
        genome: String,
    },

    /// Reconstruct a block sequence and print its structure.
    Inspect {
        /// Architecture family: mobilenetv3 or resnet.
        #[arg(short, long)]
        family: String,

        /// Genome string to reconstruct.
        #[arg(short, long)]
        genome: String,

        /// Width multiplier (MobileNetV3 only).
        #[arg(long, default_value_t = 1.0)]
        width_mult: f64,

        /// Classifier output size.
        #[arg(long, default_value_t = 1000)]
        num_classes: usize,

        /// Input resolution.
        #[arg(long, default_value_t = 224)]
        resolution: usize,

        /// Emit the block sequence as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Predict per-block and total latency for a genome.
    Predict {
        /// Architecture family: mobilenetv3 or resnet.
        #[arg(short, long)]
        family: Option<String>,

        /// Genome string to reconstruct.
        #[arg(short, long)]
        genome: Option<String>,

        /// Path to a fitted cost-table JSON file.
        #[arg(long)]
        cost_table: Option<std::path::PathBuf>,

        /// Whole-model latency figure (ms) to reconcile against the block sum.
        #[arg(long)]
        expected_total: Option<f64>,

        /// Emit the report as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Decode { family, genome } => commands::decode::execute(family, genome),
        Commands::Inspect {
            family,
            genome,
            width_mult,
            num_classes,
            resolution,
            json,
        } => commands::inspect::execute(family, genome, width_mult, num_classes, resolution, json),
        Commands::Predict {
            family,
            genome,
            cost_table,
            expected_total,
            json,
        } => commands::predict::execute(
            cli.config,
            family,
            genome,
            cost_table,
            expected_total,
            json,
        ),
    }
}
