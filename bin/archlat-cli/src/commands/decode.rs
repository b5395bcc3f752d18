// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `archlat decode` command: print a genome's decoded parameter segments.

use anyhow::Context;
use search_space::{Family, SampleConfig};

pub fn execute(family: String, genome: String) -> anyhow::Result<()> {
    let family: Family = family.parse()?;
    let config = SampleConfig::parse(&genome, family)
        .with_context(|| format!("failed to decode genome for family '{family}'"))?;

    println!("Family: {family}");
    println!("Genome: {genome}");
    println!();
    for segment in config.iter_segments() {
        println!(
            "  {:<3} ({} tokens): {:?}",
            segment.key,
            segment.values.len(),
            segment.values,
        );
    }
    Ok(())
}
