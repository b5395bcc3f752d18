// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`LatencyPredictor`] trait and sequence-level prediction.

use crate::{BlockLatency, LatencyReport, PredictError};
use block_core::BlockDef;
use topology::{BlockSequence, Validated};

/// Trait for block-level latency predictors.
///
/// A predictor maps one block descriptor to a latency estimate in
/// milliseconds. Implementations are purely algorithmic — no I/O and no
/// device communication — so they compose freely and are trivially
/// unit-testable. Device-fitted regression predictors implement this trait
/// outside the workspace.
pub trait LatencyPredictor: Send + Sync {
    /// Human-readable name of this predictor.
    fn name(&self) -> &str;

    /// Predicts the latency of a single block in milliseconds.
    fn predict_block(&self, block: &BlockDef) -> Result<f64, PredictError>;
}

/// Runs a predictor over every block of a validated sequence.
///
/// The report lists per-block latencies in walk order together with the
/// running cumulative sum, and the total. Only validated sequences are
/// accepted: the per-block figures are meaningful as a decomposition of
/// the whole model precisely because the channel chain holds.
pub fn predict_sequence(
    predictor: &dyn LatencyPredictor,
    sequence: &BlockSequence<Validated>,
) -> Result<LatencyReport, PredictError> {
    let mut per_block = Vec::with_capacity(sequence.num_blocks());
    let mut cumulative_ms = 0.0;

    for (index, block) in sequence.iter_blocks().enumerate() {
        let latency_ms = predictor.predict_block(block)?;
        cumulative_ms += latency_ms;
        per_block.push(BlockLatency {
            index,
            kind: block.kind(),
            latency_ms,
            cumulative_ms,
        });
    }

    Ok(LatencyReport {
        predictor_name: predictor.name().to_string(),
        per_block,
        total_ms: cumulative_ms,
    })
}
