// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for latency prediction.

/// Errors that can occur when predicting latencies.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// A cost-table file could not be read.
    #[error("failed to read cost table: {0}")]
    TableRead(#[from] std::io::Error),

    /// A cost-table file is not valid JSON.
    #[error("failed to parse cost table: {0}")]
    TableParse(#[from] serde_json::Error),

    /// A cost-table entry names a block kind that does not exist.
    #[error("cost table names unknown block kind '{kind}'")]
    UnknownBlockKind { kind: String },

    /// The prediction configuration is invalid.
    #[error("invalid prediction config: {0}")]
    ConfigError(String),
}
