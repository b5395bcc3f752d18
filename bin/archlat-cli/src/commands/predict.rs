// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `archlat predict` command: per-block and total latency prediction with
//! whole-model reconciliation.

use anyhow::{bail, Context};
use latency::{predict_sequence, totals_agree, CostTable, PredictConfig};
use search_space::ArchSpace;
use std::path::PathBuf;

pub fn execute(
    config_path: Option<PathBuf>,
    family: Option<String>,
    genome: Option<String>,
    cost_table: Option<PathBuf>,
    expected_total: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    // A config file overrides individual CLI arguments.
    let (space, genome, table_path) = match config_path {
        Some(path) => {
            let config = PredictConfig::from_file(&path)
                .with_context(|| format!("failed to load config '{}'", path.display()))?;
            (config.space()?, config.genome.clone(), config.cost_table)
        }
        None => {
            let (Some(family), Some(genome)) = (family, genome) else {
                bail!("either --config or both --family and --genome are required");
            };
            let family = family.parse()?;
            (ArchSpace::standard(family, 1000, 224), genome, cost_table)
        }
    };

    let sequence = topology::build_blocks(&genome, &space)
        .with_context(|| format!("failed to reconstruct '{genome}'"))?
        .validate()
        .context("reconstructed sequence failed validation")?;

    let table = match &table_path {
        Some(path) => CostTable::from_file(path)
            .with_context(|| format!("failed to load cost table '{}'", path.display()))?,
        None => {
            tracing::info!("no cost table given, using the uniform default table");
            CostTable::default()
        }
    };

    let report = predict_sequence(&table, &sequence)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             archlat · Latency Prediction            ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  {}", sequence.summary());
    println!("  Predictor: {}", report.predictor_name);
    println!();

    println!(
        "  {:<4} {:<14} {:>12} {:>12}",
        "Idx", "Kind", "Latency", "Cumulative",
    );
    println!("  {}", "-".repeat(46));
    for entry in &report.per_block {
        println!(
            "  {:<4} {:<14} {:>9.3} ms {:>9.3} ms",
            entry.index,
            entry.kind.as_str(),
            entry.latency_ms,
            entry.cumulative_ms,
        );
    }
    println!();
    println!("  Total: {:.3} ms", report.total_ms);

    if let Some(whole) = expected_total {
        let agrees = totals_agree(whole, report.total_ms);
        println!(
            "  Whole-model figure {whole:.3} ms {} the block sum (integer truncation)",
            if agrees { "matches" } else { "DOES NOT match" },
        );
    }
    println!();
    Ok(())
}
