// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Table-lookup latency predictor.
//!
//! The table holds one affine cost entry per block kind:
//! `latency_ms = base_ms + per_mflop_ms * mflops(block)`. Fitted tables
//! are stored as JSON next to the profiling data that produced them:
//!
//! ```json
//! {
//!   "name": "cortex-a76-int8",
//!   "default": { "base_ms": 0.05, "per_mflop_ms": 0.002 },
//!   "kinds": {
//!     "mbconv": { "base_ms": 0.08, "per_mflop_ms": 0.0015 },
//!     "bconv":  { "base_ms": 0.10, "per_mflop_ms": 0.0021 }
//!   }
//! }
//! ```

use crate::{LatencyPredictor, PredictError};
use block_core::{BlockDef, BlockKind};
use std::collections::HashMap;
use std::path::Path;

/// Affine cost entry for one block kind.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KindCost {
    /// Fixed per-invocation cost in milliseconds.
    pub base_ms: f64,
    /// Cost per million multiply-accumulates in milliseconds.
    pub per_mflop_ms: f64,
}

/// Serialized form of a cost table.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct CostTableFile {
    name: String,
    default: KindCost,
    #[serde(default)]
    kinds: HashMap<String, KindCost>,
}

/// A per-block-kind affine latency model.
#[derive(Debug, Clone)]
pub struct CostTable {
    name: String,
    default: KindCost,
    kinds: HashMap<BlockKind, KindCost>,
}

impl CostTable {
    /// Loads a cost table from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, PredictError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a cost table from a JSON string.
    ///
    /// Every key under `"kinds"` must name a real block kind; a table with
    /// an unknown kind is rejected rather than silently ignored.
    pub fn from_json(json: &str) -> Result<Self, PredictError> {
        let file: CostTableFile = serde_json::from_str(json)?;
        let mut kinds = HashMap::with_capacity(file.kinds.len());
        for (name, cost) in file.kinds {
            let kind = BlockKind::from_str_loose(&name)
                .ok_or(PredictError::UnknownBlockKind { kind: name })?;
            kinds.insert(kind, cost);
        }
        Ok(Self {
            name: file.name,
            default: file.default,
            kinds,
        })
    }

    /// Serialises the table back to pretty JSON.
    pub fn to_json(&self) -> Result<String, PredictError> {
        let file = CostTableFile {
            name: self.name.clone(),
            default: self.default,
            kinds: self
                .kinds
                .iter()
                .map(|(kind, cost)| (kind.as_str().to_string(), *cost))
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Returns the cost entry for a block kind, falling back to the
    /// table's default entry.
    fn cost_for(&self, kind: BlockKind) -> KindCost {
        match self.kinds.get(&kind) {
            Some(cost) => *cost,
            None => {
                tracing::warn!(
                    "cost table '{}' has no entry for '{kind}', using the default entry",
                    self.name,
                );
                self.default
            }
        }
    }
}

impl Default for CostTable {
    /// A neutral table: every kind uses the same affine entry. Useful for
    /// ranking topologies when no fitted table is available.
    fn default() -> Self {
        let default = KindCost {
            base_ms: 0.05,
            per_mflop_ms: 0.002,
        };
        Self {
            name: "uniform".into(),
            default,
            kinds: BlockKind::ALL.iter().map(|&k| (k, default)).collect(),
        }
    }
}

impl LatencyPredictor for CostTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict_block(&self, block: &BlockDef) -> Result<f64, PredictError> {
        let cost = self.cost_for(block.kind());
        Ok(cost.base_ms + cost.per_mflop_ms * block.mflops())
    }
}
