// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # latency
//!
//! Block-level latency prediction over validated block sequences.
//!
//! The real device predictors (regression models fitted per hardware
//! backend) live outside this workspace; this crate defines the seam they
//! plug into and ships a table-lookup reference implementation:
//!
//! - [`LatencyPredictor`] — the trait every predictor implements. Purely
//!   algorithmic: no I/O, no system calls, trivially unit-testable.
//! - [`CostTable`] — per-block-kind affine cost model loaded from JSON.
//! - [`predict_sequence`] — runs a predictor over a validated sequence and
//!   assembles a [`LatencyReport`] with per-block and cumulative figures.
//! - [`totals_agree`] — the whole-model vs. sum-of-blocks reconciliation:
//!   the two figures must match after integer truncation.
//!
//! # Example
//! ```
//! use latency::{predict_sequence, CostTable};
//! use search_space::{ArchSpace, Family};
//!
//! let space = ArchSpace::standard(Family::MobileNetV3, 1000, 224);
//! let genome = "ks55355773757755735757_e66643464363346436436_d22343";
//! let seq = topology::build_blocks(genome, &space)
//!     .unwrap()
//!     .validate()
//!     .unwrap();
//!
//! let table = CostTable::default();
//! let report = predict_sequence(&table, &seq).unwrap();
//! assert_eq!(report.per_block.len(), 19);
//! ```

mod config;
mod error;
mod predictor;
mod report;
mod table;

pub use config::PredictConfig;
pub use error::PredictError;
pub use predictor::{predict_sequence, LatencyPredictor};
pub use report::{totals_agree, BlockLatency, LatencyReport};
pub use table::{CostTable, KindCost};
