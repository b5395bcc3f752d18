// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for feature-map geometry.

/// Errors that can occur when propagating feature-map shapes.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    /// Applying a stride would not leave a positive integer resolution.
    #[error("invalid stride {stride} at resolution {hw}: result is not a positive resolution")]
    InvalidStride { hw: usize, stride: usize },
}
