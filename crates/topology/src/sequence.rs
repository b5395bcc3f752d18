// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Block sequence: the reconstructed topology as an ordered list of blocks.
//!
//! # Type-State Pattern
//!
//! A sequence transitions through states enforced at compile time:
//!
//! ```text
//! BlockSequence<Built>      — blocks assembled, not yet checked.
//!       │  .validate()
//!       ▼
//! BlockSequence<Validated>  — channel chain and resolutions verified.
//! ```
//!
//! Downstream consumers (latency prediction, model materialisation) take
//! only the `Validated` state, so a sequence that breaks the channel chain
//! can never reach them. The transition consumes the old state; the marker
//! types are zero-sized.

use crate::BuildError;
use block_core::{BlockDef, FeatureShape};
use search_space::Family;
use std::fmt;

// ── Type-state markers ─────────────────────────────────────────────

/// Marker: sequence has been built but not validated.
#[derive(Debug, Clone)]
pub struct Built;

/// Marker: sequence invariants have been verified.
#[derive(Debug, Clone)]
pub struct Validated;

/// Sealed trait for sequence states.
pub trait SequenceState: fmt::Debug + Clone {}
impl SequenceState for Built {}
impl SequenceState for Validated {}

// ── BlockSequence ──────────────────────────────────────────────────

/// The reconstructed topology: stem first, head last.
#[derive(Debug, Clone)]
pub struct BlockSequence<S: SequenceState = Built> {
    family: Family,
    input_shape: FeatureShape,
    blocks: Vec<BlockDef>,
    _state: std::marker::PhantomData<S>,
}

impl<S: SequenceState> BlockSequence<S> {
    /// The family this topology belongs to.
    pub fn family(&self) -> Family {
        self.family
    }

    /// The shape of the network input.
    pub fn input_shape(&self) -> FeatureShape {
        self.input_shape
    }

    /// The blocks in network order.
    pub fn blocks(&self) -> &[BlockDef] {
        &self.blocks
    }
}

// ── Built state ────────────────────────────────────────────────────

impl BlockSequence<Built> {
    /// Creates a new sequence in the `Built` state.
    pub fn new(family: Family, input_shape: FeatureShape, blocks: Vec<BlockDef>) -> Self {
        Self {
            family,
            input_shape,
            blocks,
            _state: std::marker::PhantomData,
        }
    }

    /// Validates the sequence and transitions to the `Validated` state.
    ///
    /// # Checks
    /// - The sequence is non-empty.
    /// - The first block consumes the declared input shape.
    /// - Channel chain: every block's input channels equal the previous
    ///   block's output channels.
    /// - Every block's input resolution equals the previous block's output
    ///   resolution, and all resolutions are positive and non-increasing.
    pub fn validate(self) -> Result<BlockSequence<Validated>, BuildError> {
        if self.blocks.is_empty() {
            return Err(BuildError::InvalidSequence(
                "sequence contains no blocks".into(),
            ));
        }

        let first = &self.blocks[0];
        if first.input_shape() != self.input_shape {
            return Err(BuildError::InvalidBlock {
                index: 0,
                detail: format!(
                    "expected input shape {}, got {}",
                    self.input_shape,
                    first.input_shape(),
                ),
            });
        }

        let mut carried = self.input_shape;
        for (i, block) in self.blocks.iter().enumerate() {
            if block.input_channels() != carried.channels {
                return Err(BuildError::InvalidBlock {
                    index: i,
                    detail: format!(
                        "input channels {} break the chain (previous output {})",
                        block.input_channels(),
                        carried.channels,
                    ),
                });
            }
            if block.input_resolution() != carried.hw {
                return Err(BuildError::InvalidBlock {
                    index: i,
                    detail: format!(
                        "input resolution {} does not match the carried resolution {}",
                        block.input_resolution(),
                        carried.hw,
                    ),
                });
            }

            let out = block.output_shape().map_err(|e| BuildError::InvalidBlock {
                index: i,
                detail: e.to_string(),
            })?;
            if out.hw > carried.hw {
                return Err(BuildError::InvalidBlock {
                    index: i,
                    detail: format!(
                        "output resolution {} exceeds input resolution {}",
                        out.hw, carried.hw,
                    ),
                });
            }
            carried = out;
        }

        Ok(BlockSequence {
            family: self.family,
            input_shape: self.input_shape,
            blocks: self.blocks,
            _state: std::marker::PhantomData,
        })
    }
}

// ── Validated state ────────────────────────────────────────────────

impl BlockSequence<Validated> {
    /// Returns the total number of blocks.
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Returns a reference to a block by index.
    pub fn block(&self, index: usize) -> Option<&BlockDef> {
        self.blocks.get(index)
    }

    /// Returns an iterator over the blocks in network order.
    pub fn iter_blocks(&self) -> impl Iterator<Item = &BlockDef> {
        self.blocks.iter()
    }

    /// The shape produced by the last block.
    pub fn output_shape(&self) -> FeatureShape {
        // Validation proved every output shape computable.
        let mut carried = self.input_shape;
        for block in &self.blocks {
            if let Ok(out) = block.output_shape() {
                carried = out;
            }
        }
        carried
    }

    /// Total estimated trainable parameters.
    pub fn total_params(&self) -> usize {
        self.blocks.iter().map(|b| b.param_count()).sum()
    }

    /// Total estimated multiply-accumulates in millions.
    pub fn total_mflops(&self) -> f64 {
        self.blocks.iter().map(|b| b.mflops()).sum()
    }

    /// Returns a summary string describing the topology.
    pub fn summary(&self) -> String {
        format!(
            "{} topology: {} blocks, input {}, {:.1}M params, {:.1} MFLOPs",
            self.family,
            self.num_blocks(),
            self.input_shape,
            self.total_params() as f64 / 1.0e6,
            self.total_mflops(),
        )
    }
}

// ── Shared implementations ─────────────────────────────────────────

impl<S: SequenceState> fmt::Display for BlockSequence<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "BlockSequence [{}] ({} blocks):",
            self.family,
            self.blocks.len(),
        )?;
        for (i, block) in self.blocks.iter().enumerate() {
            writeln!(f, "  [{i}] {}", block.summary())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use block_core::IMAGE_CHANNELS;

    /// Helper: a minimal well-formed MobileNetV3-style prefix.
    fn chain_blocks() -> Vec<BlockDef> {
        vec![
            BlockDef::FirstConv {
                hwin: 224,
                cin: IMAGE_CHANNELS,
                cout: 16,
            },
            BlockDef::FirstMbconv {
                hwin: 112,
                cin: 16,
                cout: 16,
            },
            BlockDef::Mbconv {
                hwin: 112,
                cin: 16,
                cout: 24,
                kernel_size: 3,
                expand_ratio: 4,
                stride: 2,
                act: block_core::Activation::Relu,
                se: false,
            },
        ]
    }

    fn sequence(blocks: Vec<BlockDef>) -> BlockSequence<Built> {
        BlockSequence::new(
            Family::MobileNetV3,
            FeatureShape::new(IMAGE_CHANNELS, 224),
            blocks,
        )
    }

    #[test]
    fn test_validate_ok() {
        let validated = sequence(chain_blocks()).validate().unwrap();
        assert_eq!(validated.num_blocks(), 3);
        assert_eq!(validated.output_shape(), FeatureShape::new(24, 56));
    }

    #[test]
    fn test_validate_empty() {
        assert!(sequence(vec![]).validate().is_err());
    }

    #[test]
    fn test_validate_broken_chain() {
        let mut blocks = chain_blocks();
        if let BlockDef::Mbconv { cin, .. } = &mut blocks[2] {
            *cin = 32; // Previous block emits 16.
        }
        let err = sequence(blocks).validate().unwrap_err();
        assert!(matches!(err, BuildError::InvalidBlock { index: 2, .. }));
    }

    #[test]
    fn test_validate_wrong_resolution() {
        let mut blocks = chain_blocks();
        if let BlockDef::FirstMbconv { hwin, .. } = &mut blocks[1] {
            *hwin = 224; // First conv halves to 112.
        }
        assert!(sequence(blocks).validate().is_err());
    }

    #[test]
    fn test_validate_wrong_input_shape() {
        let blocks = chain_blocks();
        let seq = BlockSequence::new(
            Family::MobileNetV3,
            FeatureShape::new(IMAGE_CHANNELS, 192),
            blocks,
        );
        assert!(seq.validate().is_err());
    }

    #[test]
    fn test_totals_positive() {
        let validated = sequence(chain_blocks()).validate().unwrap();
        assert!(validated.total_params() > 0);
        assert!(validated.total_mflops() > 0.0);
    }

    #[test]
    fn test_display_lists_blocks() {
        let seq = sequence(chain_blocks());
        let shown = format!("{seq}");
        assert!(shown.contains("[0] first_conv"));
        assert!(shown.contains("[2] mbconv"));
    }

    #[test]
    fn test_block_access() {
        let validated = sequence(chain_blocks()).validate().unwrap();
        assert!(validated.block(0).is_some());
        assert!(validated.block(3).is_none());
    }
}
