// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `archlat inspect` command: reconstruct a block sequence and print its
//! structure, shapes, and per-block parameter/MAC estimates.

use anyhow::Context;
use search_space::{ArchSpace, Family, MobileNetV3Space, ResNetSpace};

pub fn execute(
    family: String,
    genome: String,
    width_mult: f64,
    num_classes: usize,
    resolution: usize,
    json: bool,
) -> anyhow::Result<()> {
    let family: Family = family.parse()?;
    let space = match family {
        Family::MobileNetV3 => {
            ArchSpace::MobileNetV3(MobileNetV3Space::new(width_mult, num_classes, resolution))
        }
        Family::ResNet => ArchSpace::ResNet(ResNetSpace::new(num_classes, resolution)),
    };

    let sequence = topology::build_blocks(&genome, &space)
        .with_context(|| format!("failed to reconstruct '{genome}'"))?
        .validate()
        .context("reconstructed sequence failed validation")?;

    if json {
        let doc = serde_json::json!({
            "family": family.as_str(),
            "genome": genome,
            "input_shape": sequence.input_shape(),
            "blocks": sequence.blocks(),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             archlat · Topology Inspector            ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  {}", sequence.summary());
    println!();

    // ── Per-Block Detail ───────────────────────────────────────
    println!(
        "  {:<4} {:<14} {:<14} {:<14} {:>6} {:>12} {:>10}",
        "Idx", "Kind", "Input", "Output", "Stride", "Params", "MFLOPs",
    );
    println!("  {}", "-".repeat(80));

    for (i, block) in sequence.iter_blocks().enumerate() {
        let out = block
            .output_shape()
            .context("validated block must propagate")?;
        println!(
            "  {:<4} {:<14} {:<14} {:<14} {:>6} {:>12} {:>10.2}",
            i,
            block.kind().as_str(),
            format!("{}", block.input_shape()),
            format!("{out}"),
            block.stride(),
            block.param_count(),
            block.mflops(),
        );
    }
    println!();
    println!(
        "  Totals: {:.2}M params, {:.1} MFLOPs, output {}",
        sequence.total_params() as f64 / 1.0e6,
        sequence.total_mflops(),
        sequence.output_shape(),
    );
    println!();
    Ok(())
}
