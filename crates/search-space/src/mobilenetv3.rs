// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! MobileNetV3 search-space descriptor.
//!
//! Stage lists are indexed the way the walkers consume them: entry 0 of
//! `stride_stages`/`num_block_stages`/`act_stages`/`se_stages` describes
//! the fixed first expand block, entries 1.. describe the five searched
//! body stages. `stage_width` additionally carries the stem width at
//! index 0, so body stage `i` reads `stage_width[i + 2]`.

use block_core::{make_divisible, Activation};

/// Base output widths before width-multiplier scaling: stem, first expand
/// block, then one entry per body stage.
const BASE_STAGE_WIDTH: [usize; 7] = [16, 16, 24, 40, 80, 112, 160];

/// Base widths of the head: final expand and feature mix.
const BASE_FINAL_EXPAND_WIDTH: usize = 960;
const BASE_FEATURE_MIX_WIDTH: usize = 1280;

const CHANNEL_DIVISOR: usize = 8;

/// Geometry of one fixed head block, kept as the tail of the space's
/// block-configuration list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TailBlockConfig {
    /// Input resolution.
    pub hwin: usize,
    /// Input channels.
    pub cin: usize,
    /// Output channels.
    pub cout: usize,
}

/// Per-stage view over the searched body stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MbStage {
    /// Output width of every block in the stage.
    pub width: usize,
    /// Stride of the stage's first block; later blocks use stride 1.
    pub stride: usize,
    /// Maximum number of blocks the stage may hold.
    pub max_depth: usize,
    /// Activation used throughout the stage.
    pub act: Activation,
    /// Whether squeeze-excite is enabled throughout the stage.
    pub se: bool,
}

/// The MobileNetV3 search space for a given width multiplier, class count
/// and input resolution.
///
/// Immutable once constructed; shared freely across builds.
#[derive(Debug, Clone)]
pub struct MobileNetV3Space {
    /// Width multiplier applied to all base widths.
    pub width_mult: f64,
    /// Classifier output size.
    pub num_classes: usize,
    /// Input resolution.
    pub hw: usize,
    /// Output widths: stem, first expand block, then one per body stage.
    pub stage_width: Vec<usize>,
    /// First-block strides: first expand block, then one per body stage.
    pub stride_stages: Vec<usize>,
    /// Maximum depths, indexed like `stride_stages`.
    pub num_block_stages: Vec<usize>,
    /// Activations, indexed like `stride_stages`.
    pub act_stages: Vec<Activation>,
    /// Squeeze-excite flags, indexed like `stride_stages`.
    pub se_stages: Vec<bool>,
    /// Fixed block configurations; the last three entries are the
    /// final-expand, feature-mix and logits head blocks.
    pub block_configs: Vec<TailBlockConfig>,
}

impl MobileNetV3Space {
    /// Creates the space for the given configuration.
    pub fn new(width_mult: f64, num_classes: usize, hw: usize) -> Self {
        let stage_width: Vec<usize> = BASE_STAGE_WIDTH
            .iter()
            .map(|&w| make_divisible(w as f64 * width_mult, CHANNEL_DIVISOR))
            .collect();

        let stride_stages = vec![1, 2, 2, 2, 1, 2];
        let num_block_stages = vec![1, 4, 4, 4, 4, 4];
        let act_stages = vec![
            Activation::Relu,
            Activation::Relu,
            Activation::Relu,
            Activation::HSwish,
            Activation::HSwish,
            Activation::HSwish,
        ];
        let se_stages = vec![false, false, true, false, true, true];

        // Head geometry: the stem halves the resolution, then every stage
        // stride applies once. Depths never change strides, so this is
        // fixed for the whole space.
        let mut head_hw = hw / 2;
        for s in &stride_stages {
            head_hw /= s;
        }

        let final_expand_width =
            make_divisible(BASE_FINAL_EXPAND_WIDTH as f64 * width_mult, CHANNEL_DIVISOR);
        let feature_mix_width =
            make_divisible(BASE_FEATURE_MIX_WIDTH as f64 * width_mult, CHANNEL_DIVISOR);
        let last_body_width = stage_width[stage_width.len() - 1];

        let block_configs = vec![
            TailBlockConfig {
                hwin: head_hw,
                cin: last_body_width,
                cout: final_expand_width,
            },
            TailBlockConfig {
                hwin: head_hw,
                cin: final_expand_width,
                cout: feature_mix_width,
            },
            TailBlockConfig {
                hwin: 1,
                cin: feature_mix_width,
                cout: num_classes,
            },
        ];

        Self {
            width_mult,
            num_classes,
            hw,
            stage_width,
            stride_stages,
            num_block_stages,
            act_stages,
            se_stages,
            block_configs,
        }
    }

    /// Width of the stem convolution's output.
    pub fn stem_width(&self) -> usize {
        self.stage_width[0]
    }

    /// Output width of the fixed first expand block.
    pub fn first_block_width(&self) -> usize {
        self.stage_width[1]
    }

    /// Iterates over the searched body stages in network order.
    pub fn body_stages(&self) -> impl Iterator<Item = MbStage> + '_ {
        (1..self.stride_stages.len()).map(move |i| MbStage {
            width: self.stage_width[i + 1],
            stride: self.stride_stages[i],
            max_depth: self.num_block_stages[i],
            act: self.act_stages[i],
            se: self.se_stages[i],
        })
    }

    /// Number of searched body stages.
    pub fn num_body_stages(&self) -> usize {
        self.stride_stages.len() - 1
    }

    /// Total block positions reserved across the body stages (the length
    /// the flat kernel-size/expansion sequences must have).
    pub fn total_block_positions(&self) -> usize {
        self.num_block_stages[1..].iter().sum()
    }
}

impl Default for MobileNetV3Space {
    fn default() -> Self {
        Self::new(1.0, 1000, 224)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_widths() {
        let space = MobileNetV3Space::default();
        assert_eq!(space.stage_width, vec![16, 16, 24, 40, 80, 112, 160]);
        assert_eq!(space.stem_width(), 16);
        assert_eq!(space.first_block_width(), 16);
    }

    #[test]
    fn test_body_stage_view() {
        let space = MobileNetV3Space::default();
        let stages: Vec<MbStage> = space.body_stages().collect();
        assert_eq!(stages.len(), 5);

        assert_eq!(
            stages.iter().map(|s| s.width).collect::<Vec<_>>(),
            vec![24, 40, 80, 112, 160],
        );
        assert_eq!(
            stages.iter().map(|s| s.stride).collect::<Vec<_>>(),
            vec![2, 2, 2, 1, 2],
        );
        assert!(stages.iter().all(|s| s.max_depth == 4));
        assert_eq!(
            stages.iter().map(|s| s.se).collect::<Vec<_>>(),
            vec![false, true, false, true, true],
        );
        assert_eq!(
            stages.iter().map(|s| s.act).collect::<Vec<_>>(),
            vec![
                Activation::Relu,
                Activation::Relu,
                Activation::HSwish,
                Activation::HSwish,
                Activation::HSwish,
            ],
        );
    }

    #[test]
    fn test_head_configs() {
        let space = MobileNetV3Space::default();
        let n = space.block_configs.len();
        let tail = &space.block_configs[n - 3..];
        assert_eq!(tail[0], TailBlockConfig { hwin: 7, cin: 160, cout: 960 });
        assert_eq!(tail[1], TailBlockConfig { hwin: 7, cin: 960, cout: 1280 });
        assert_eq!(tail[2], TailBlockConfig { hwin: 1, cin: 1280, cout: 1000 });
    }

    #[test]
    fn test_total_block_positions() {
        let space = MobileNetV3Space::default();
        assert_eq!(space.total_block_positions(), 20);
    }

    #[test]
    fn test_width_multiplier_scaling() {
        let space = MobileNetV3Space::new(1.2, 1000, 224);
        // 160 * 1.2 = 192, a multiple of 8 already.
        assert_eq!(space.stage_width[6], 192);
        // Widths never shrink below the base at multiplier 1.0.
        let base = MobileNetV3Space::default();
        for (scaled, original) in space.stage_width.iter().zip(&base.stage_width) {
            assert!(scaled >= original);
        }
    }
}
