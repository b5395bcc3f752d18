// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # topology
//!
//! Reconstructs a layered network topology from a compact genome string
//! and a search-space descriptor:
//!
//! - [`build_blocks`] — decodes the genome and walks the family's stages,
//!   producing an ordered [`BlockSequence`] with per-block input shapes
//!   threaded forward.
//! - [`BlockSequence`] — the reconstructed topology, with a **type-state
//!   pattern** (`Built` → `Validated`) so downstream consumers only ever
//!   see sequences whose channel chain and resolutions have been checked.
//!
//! The walk is a pure function of `(genome, space)`: same inputs, same
//! sequence, every time.
//!
//! # Example
//! ```
//! use search_space::{ArchSpace, Family};
//!
//! let space = ArchSpace::standard(Family::MobileNetV3, 1000, 224);
//! let genome = "ks55355773757755735757_e66643464363346436436_d22343";
//! let sequence = topology::build_blocks(genome, &space).unwrap();
//! let validated = sequence.validate().unwrap();
//! assert_eq!(validated.num_blocks(), 19);
//! ```

mod cursor;
mod error;
pub mod sequence;
mod walk;

pub use error::BuildError;
pub use sequence::{BlockSequence, Built, Validated};

use search_space::{ArchSpace, SampleConfig};

/// Decodes a genome against the space's family and reconstructs the block
/// sequence.
///
/// The returned sequence is in the `Built` state; call
/// [`BlockSequence::validate`] before handing it to consumers that rely on
/// the channel chain.
pub fn build_blocks(
    genome: &str,
    space: &ArchSpace,
) -> Result<BlockSequence<Built>, BuildError> {
    let config = SampleConfig::parse(genome, space.family())?;
    let sequence = match space {
        ArchSpace::MobileNetV3(s) => walk::mobilenetv3::build(&config, s)?,
        ArchSpace::ResNet(s) => walk::resnet::build(&config, s)?,
    };
    tracing::debug!(
        "built {} blocks for a {} genome",
        sequence.blocks().len(),
        space.family(),
    );
    Ok(sequence)
}
