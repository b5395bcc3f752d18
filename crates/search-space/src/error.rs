// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for genome decoding and family resolution.

/// Errors that can occur when decoding genomes or resolving families.
#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    /// The genome string does not match the family's grammar.
    #[error("malformed genome: {reason}")]
    MalformedGenome { reason: String },

    /// The requested family has no registered grammar or walker.
    #[error("unknown architecture family '{name}'")]
    UnknownFamily { name: String },
}
