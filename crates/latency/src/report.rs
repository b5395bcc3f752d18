// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Latency reports: the output of sequence-level prediction.

use block_core::BlockKind;

/// Latency of one block, with the running total up to and including it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BlockLatency {
    /// Position of the block in the sequence.
    pub index: usize,
    /// Block kind tag.
    pub kind: BlockKind,
    /// Predicted latency of this block in milliseconds.
    pub latency_ms: f64,
    /// Sum of predicted latencies up to and including this block.
    pub cumulative_ms: f64,
}

/// The complete prediction for one block sequence.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LatencyReport {
    /// Name of the predictor that produced this report.
    pub predictor_name: String,
    /// Per-block latencies in walk order.
    pub per_block: Vec<BlockLatency>,
    /// Total predicted latency in milliseconds.
    pub total_ms: f64,
}

impl LatencyReport {
    /// Returns the number of blocks covered by the report.
    pub fn num_blocks(&self) -> usize {
        self.per_block.len()
    }

    /// Returns a human-readable summary of the report.
    pub fn summary(&self) -> String {
        let slowest = self
            .per_block
            .iter()
            .max_by(|a, b| a.latency_ms.total_cmp(&b.latency_ms));
        match slowest {
            Some(block) => format!(
                "Prediction '{}': {} blocks, {:.3} ms total, slowest block [{}] {} at {:.3} ms",
                self.predictor_name,
                self.num_blocks(),
                self.total_ms,
                block.index,
                block.kind,
                block.latency_ms,
            ),
            None => format!(
                "Prediction '{}': no blocks, {:.3} ms total",
                self.predictor_name, self.total_ms,
            ),
        }
    }
}

/// Whole-model vs. sum-of-blocks reconciliation.
///
/// A whole-model prediction and the sum of its per-block predictions are
/// expected to match after integer truncation; sub-millisecond drift is
/// accepted because the two figures come from different decompositions of
/// the same network.
pub fn totals_agree(whole_model_ms: f64, block_sum_ms: f64) -> bool {
    whole_model_ms.trunc() == block_sum_ms.trunc()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> LatencyReport {
        LatencyReport {
            predictor_name: "test".into(),
            per_block: vec![
                BlockLatency {
                    index: 0,
                    kind: BlockKind::FirstConv,
                    latency_ms: 0.4,
                    cumulative_ms: 0.4,
                },
                BlockLatency {
                    index: 1,
                    kind: BlockKind::Mbconv,
                    latency_ms: 1.1,
                    cumulative_ms: 1.5,
                },
            ],
            total_ms: 1.5,
        }
    }

    #[test]
    fn test_summary_names_slowest() {
        let s = sample_report().summary();
        assert!(s.contains("2 blocks"));
        assert!(s.contains("[1] mbconv"));
    }

    #[test]
    fn test_totals_agree_within_truncation() {
        assert!(totals_agree(12.9, 12.1));
        assert!(totals_agree(5.0, 5.999));
    }

    #[test]
    fn test_totals_disagree_across_truncation() {
        assert!(!totals_agree(12.9, 13.1));
        assert!(!totals_agree(5.0, 4.999));
    }
}
