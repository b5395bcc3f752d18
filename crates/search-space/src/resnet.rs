// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! ResNet search-space descriptor.
//!
//! The searched quantities are the stem width/depth selectors, per-stage
//! extra depth on top of a fixed base depth, per-stage width selected from
//! three width-multiplier candidates, and a per-block expansion ratio.

use block_core::make_divisible;

/// Base widths of the four body stages before width-multiplier scaling.
const BASE_STAGE_WIDTH: [usize; 4] = [256, 512, 1024, 2048];

/// Base width of the input stem.
const BASE_INPUT_CHANNEL: usize = 64;

const CHANNEL_DIVISOR: usize = 8;

/// Per-stage view over the body stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResStage<'a> {
    /// Candidate widths, indexed by the decoded width selector.
    pub width_choices: &'a [usize],
    /// Blocks always present in the stage.
    pub base_depth: usize,
    /// Stride of the stage's first block; later blocks use stride 1.
    pub stride: usize,
}

/// The ResNet search space for a given class count and input resolution.
#[derive(Debug, Clone)]
pub struct ResNetSpace {
    /// Classifier output size.
    pub num_classes: usize,
    /// Input resolution.
    pub hw: usize,
    /// Extra-depth choices available per stage (and for the stem selector).
    pub depth_list: Vec<usize>,
    /// Expansion-ratio choices, as ratios.
    pub expand_ratio_list: Vec<f64>,
    /// Width-multiplier candidates behind the width tables.
    pub width_mult_list: Vec<f64>,
    /// Stem output channels, indexed by the second stem width selector.
    pub input_channel: Vec<usize>,
    /// Stem middle channels, indexed by the first stem width selector.
    pub mid_input_channel: Vec<usize>,
    /// Candidate widths per body stage, indexed by the width selector.
    pub stage_width_list: Vec<Vec<usize>>,
    /// First-block stride per body stage.
    pub stride_list: Vec<usize>,
}

impl ResNetSpace {
    /// Blocks always present per body stage, before extra depth.
    pub const BASE_DEPTH_LIST: [usize; 4] = [2, 2, 4, 2];

    /// Resolution divisor of the input stem (stride-2 conv + stride-2 pool).
    pub const STEM_DIVISOR: usize = 4;

    /// Creates the space for the given configuration.
    pub fn new(num_classes: usize, hw: usize) -> Self {
        let width_mult_list = vec![0.65, 0.8, 1.0];

        let input_channel: Vec<usize> = width_mult_list
            .iter()
            .map(|&wm| make_divisible(BASE_INPUT_CHANNEL as f64 * wm, CHANNEL_DIVISOR))
            .collect();
        let mid_input_channel: Vec<usize> = input_channel
            .iter()
            .map(|&c| make_divisible(c as f64 / 2.0, CHANNEL_DIVISOR))
            .collect();
        let stage_width_list: Vec<Vec<usize>> = BASE_STAGE_WIDTH
            .iter()
            .map(|&base| {
                width_mult_list
                    .iter()
                    .map(|&wm| make_divisible(base as f64 * wm, CHANNEL_DIVISOR))
                    .collect()
            })
            .collect();

        Self {
            num_classes,
            hw,
            depth_list: vec![0, 1, 2],
            expand_ratio_list: vec![0.2, 0.25, 0.35],
            width_mult_list,
            input_channel,
            mid_input_channel,
            stage_width_list,
            stride_list: vec![1, 2, 2, 2],
        }
    }

    /// The largest extra depth any stage (or the stem selector) may take.
    pub fn max_extra_depth(&self) -> usize {
        self.depth_list.iter().copied().max().unwrap_or(0)
    }

    /// Converts a percent-encoded expansion token to a ratio.
    ///
    /// Tokens outside the space's published choices are still converted
    /// (the walker stays faithful to whatever the sampler emitted) but are
    /// logged, since they usually indicate a genome from a different space.
    pub fn expand_ratio_from_token(&self, token: u32) -> f64 {
        let ratio = f64::from(token) / 100.0;
        if !self
            .expand_ratio_list
            .iter()
            .any(|&known| (known - ratio).abs() < 1e-9)
        {
            tracing::warn!("expansion token {token} is not among the space's choices");
        }
        ratio
    }

    /// Iterates over the body stages in network order.
    pub fn body_stages(&self) -> impl Iterator<Item = ResStage<'_>> + '_ {
        self.stage_width_list
            .iter()
            .zip(Self::BASE_DEPTH_LIST)
            .zip(&self.stride_list)
            .map(|((widths, base_depth), &stride)| ResStage {
                width_choices: widths.as_slice(),
                base_depth,
                stride,
            })
    }

    /// Number of body stages.
    pub fn num_body_stages(&self) -> usize {
        self.stage_width_list.len()
    }

    /// Total block positions reserved across the body stages (the length
    /// the flat expansion sequence must have).
    pub fn total_block_positions(&self) -> usize {
        let max_extra = self.max_extra_depth();
        Self::BASE_DEPTH_LIST.iter().map(|&b| b + max_extra).sum()
    }
}

impl Default for ResNetSpace {
    fn default() -> Self {
        Self::new(1000, 224)
    }
}
