// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for topology reconstruction.

use block_core::ShapeError;
use search_space::SpaceError;

/// Errors that can occur while reconstructing a block sequence.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Genome decoding or family resolution failed.
    #[error(transparent)]
    Space(#[from] SpaceError),

    /// Shape propagation failed (non-positive resolution).
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// A segment carries a different entry count than the walk requires.
    #[error("segment '{key}' carries {actual} entries but the walk requires {expected}")]
    SegmentLength {
        key: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The positional cursor ran past the end of a flat segment.
    #[error("cursor overran segment '{key}': position {index} of {len}")]
    IndexOutOfRange {
        key: &'static str,
        index: usize,
        len: usize,
    },

    /// A decoded depth exceeds the stage's declared maximum.
    #[error("stage {stage}: decoded depth {depth} exceeds the stage maximum {max}")]
    DepthOutOfRange {
        stage: usize,
        depth: usize,
        max: usize,
    },

    /// A decoded selector has no entry in its lookup table.
    #[error("segment '{key}': selector {value} has no entry in a table of {choices} choices")]
    SelectorOutOfRange {
        key: &'static str,
        value: usize,
        choices: usize,
    },

    /// The cursor did not finish exactly at the end of a flat segment.
    #[error("cursor finished at {actual} but segment '{key}' carries {expected} entries")]
    CursorMisaligned {
        key: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A block violates the sequence invariants.
    #[error("invalid block at index {index}: {detail}")]
    InvalidBlock { index: usize, detail: String },

    /// The sequence as a whole is malformed.
    #[error("invalid block sequence: {0}")]
    InvalidSequence(String),
}
