// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Feature-map shapes and stride propagation.

use crate::ShapeError;
use std::fmt;

/// The shape of a square feature map: `channels × hw × hw`.
///
/// Shapes are immutable; propagating through a block produces a new shape
/// via [`FeatureShape::after`].
///
/// # Examples
/// ```
/// use block_core::FeatureShape;
/// let s = FeatureShape::new(16, 112);
/// let next = s.after(24, 2).unwrap();
/// assert_eq!(next, FeatureShape::new(24, 56));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FeatureShape {
    /// Channel count.
    pub channels: usize,
    /// Spatial resolution (height == width).
    pub hw: usize,
}

impl FeatureShape {
    /// Creates a new shape.
    pub fn new(channels: usize, hw: usize) -> Self {
        Self { channels, hw }
    }

    /// Returns the total number of elements (`channels * hw * hw`).
    pub fn num_elements(&self) -> usize {
        self.channels * self.hw * self.hw
    }

    /// Propagates this shape through a block with the given output channel
    /// count and stride.
    ///
    /// Spatial resolution is reduced by integer floor division. Fails with
    /// [`ShapeError::InvalidStride`] when the stride is zero or the divided
    /// resolution would not be a positive integer.
    pub fn after(&self, out_channels: usize, stride: usize) -> Result<FeatureShape, ShapeError> {
        if stride == 0 {
            return Err(ShapeError::InvalidStride {
                hw: self.hw,
                stride,
            });
        }
        let hw = self.hw / stride;
        if hw == 0 {
            return Err(ShapeError::InvalidStride {
                hw: self.hw,
                stride,
            });
        }
        Ok(FeatureShape {
            channels: out_channels,
            hw,
        })
    }
}

impl fmt::Display for FeatureShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.channels, self.hw, self.hw)
    }
}
