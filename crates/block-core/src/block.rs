// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Block descriptors for reconstructed network topologies.
//!
//! Each [`BlockDef`] variant describes one network block's geometry and
//! hyper-parameters: input resolution, input/output channels, stride, and
//! the family-specific extras (kernel size, expansion ratio, squeeze-excite).
//! Descriptors are created once by a stage walker and immutable thereafter.
//!
//! The parameter and MAC estimates follow the usual convolution arithmetic
//! (`hw_out² · cout · cin · k² / groups` multiply-accumulates per conv) and
//! exist so downstream consumers can rank and cost blocks without
//! materialising them.

use crate::{make_divisible, Activation, FeatureShape, ShapeError};
use std::fmt;

/// Rounding granularity for hidden/expanded channel counts.
const CHANNEL_DIVISOR: usize = 8;

/// The kind of computation a block performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Full-resolution 3x3 stem convolution (MobileNetV3).
    FirstConv,
    /// First depthwise-separable block at half resolution (MobileNetV3).
    FirstMbconv,
    /// Mobile inverted bottleneck (MobileNetV3 body).
    Mbconv,
    /// 1x1 expansion before the head (MobileNetV3).
    FinalExpand,
    /// Global pool + 1x1 feature mix (MobileNetV3).
    FeatureMix,
    /// Classifier head (both families).
    Logits,
    /// Three-conv input stem with optional skipped middle conv (ResNet).
    InputStem,
    /// Bottleneck convolution block (ResNet body).
    Bconv,
}

impl BlockKind {
    /// All block kinds, in no particular order.
    pub const ALL: [BlockKind; 8] = [
        BlockKind::FirstConv,
        BlockKind::FirstMbconv,
        BlockKind::Mbconv,
        BlockKind::FinalExpand,
        BlockKind::FeatureMix,
        BlockKind::Logits,
        BlockKind::InputStem,
        BlockKind::Bconv,
    ];

    /// Parses a block kind from a descriptor string.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "first_conv" | "firstconv" => Some(Self::FirstConv),
            "first_mbconv" | "firstmbconv" => Some(Self::FirstMbconv),
            "mbconv" | "mb_conv" => Some(Self::Mbconv),
            "final_expand" | "finalexpand" => Some(Self::FinalExpand),
            "feature_mix" | "featuremix" => Some(Self::FeatureMix),
            "logits" | "classifier" | "head" => Some(Self::Logits),
            "input_stem" | "inputstem" | "stem" => Some(Self::InputStem),
            "bconv" | "b_conv" | "bottleneck" => Some(Self::Bconv),
            _ => None,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstConv => "first_conv",
            Self::FirstMbconv => "first_mbconv",
            Self::Mbconv => "mbconv",
            Self::FinalExpand => "final_expand",
            Self::FeatureMix => "feature_mix",
            Self::Logits => "logits",
            Self::InputStem => "input_stem",
            Self::Bconv => "bconv",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One network block, described by its geometry and hyper-parameters.
///
/// A `BlockDef` is a pure descriptor — it owns no weights and builds no
/// layers. Variants mirror the block vocabulary of the two supported
/// families; constructor signatures differ per kind, so the union keeps
/// one parameter record per variant instead of a shared base shape.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockDef {
    /// 3x3 stem convolution, stride 2.
    FirstConv {
        hwin: usize,
        cin: usize,
        cout: usize,
    },
    /// Depthwise 3x3 + pointwise projection, stride 1, expansion 1.
    FirstMbconv {
        hwin: usize,
        cin: usize,
        cout: usize,
    },
    /// Mobile inverted bottleneck: 1x1 expand, depthwise kxk, 1x1 project.
    Mbconv {
        hwin: usize,
        cin: usize,
        cout: usize,
        kernel_size: usize,
        expand_ratio: usize,
        stride: usize,
        act: Activation,
        se: bool,
    },
    /// 1x1 expansion ahead of the pooled head.
    FinalExpand {
        hwin: usize,
        cin: usize,
        cout: usize,
    },
    /// Global average pool followed by a 1x1 feature mix.
    FeatureMix {
        hwin: usize,
        cin: usize,
        cout: usize,
    },
    /// Classifier head: pool (if needed) + fully connected projection.
    Logits {
        hwin: usize,
        cin: usize,
        cout: usize,
    },
    /// ResNet input stem: 3x3 stride-2 conv, optional middle conv, 3x3
    /// conv, then a stride-2 max pool. Overall resolution divisor is 4.
    InputStem {
        hwin: usize,
        cin: usize,
        mid_channels: usize,
        cout: usize,
        /// When set, the middle convolution is skipped (reduced stem).
        skipping: bool,
    },
    /// ResNet bottleneck: 1x1 reduce, 3x3 (carries the stride), 1x1 expand.
    Bconv {
        hwin: usize,
        cin: usize,
        cout: usize,
        expand_ratio: f64,
        stride: usize,
    },
}

impl BlockDef {
    /// Returns the kind tag of this block.
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::FirstConv { .. } => BlockKind::FirstConv,
            Self::FirstMbconv { .. } => BlockKind::FirstMbconv,
            Self::Mbconv { .. } => BlockKind::Mbconv,
            Self::FinalExpand { .. } => BlockKind::FinalExpand,
            Self::FeatureMix { .. } => BlockKind::FeatureMix,
            Self::Logits { .. } => BlockKind::Logits,
            Self::InputStem { .. } => BlockKind::InputStem,
            Self::Bconv { .. } => BlockKind::Bconv,
        }
    }

    /// Input channel count.
    pub fn input_channels(&self) -> usize {
        match *self {
            Self::FirstConv { cin, .. }
            | Self::FirstMbconv { cin, .. }
            | Self::Mbconv { cin, .. }
            | Self::FinalExpand { cin, .. }
            | Self::FeatureMix { cin, .. }
            | Self::Logits { cin, .. }
            | Self::InputStem { cin, .. }
            | Self::Bconv { cin, .. } => cin,
        }
    }

    /// Output channel count.
    pub fn output_channels(&self) -> usize {
        match *self {
            Self::FirstConv { cout, .. }
            | Self::FirstMbconv { cout, .. }
            | Self::Mbconv { cout, .. }
            | Self::FinalExpand { cout, .. }
            | Self::FeatureMix { cout, .. }
            | Self::Logits { cout, .. }
            | Self::InputStem { cout, .. }
            | Self::Bconv { cout, .. } => cout,
        }
    }

    /// Input spatial resolution.
    pub fn input_resolution(&self) -> usize {
        match *self {
            Self::FirstConv { hwin, .. }
            | Self::FirstMbconv { hwin, .. }
            | Self::Mbconv { hwin, .. }
            | Self::FinalExpand { hwin, .. }
            | Self::FeatureMix { hwin, .. }
            | Self::Logits { hwin, .. }
            | Self::InputStem { hwin, .. }
            | Self::Bconv { hwin, .. } => hwin,
        }
    }

    /// Spatial downsampling factor applied by this block's convolutions.
    ///
    /// Global pooling (feature-mix, logits) is not a stride and is handled
    /// by [`BlockDef::output_shape`] directly.
    pub fn stride(&self) -> usize {
        match *self {
            Self::FirstConv { .. } => 2,
            Self::InputStem { .. } => 4,
            Self::Mbconv { stride, .. } | Self::Bconv { stride, .. } => stride,
            Self::FirstMbconv { .. }
            | Self::FinalExpand { .. }
            | Self::FeatureMix { .. }
            | Self::Logits { .. } => 1,
        }
    }

    /// The feature-map shape this block consumes.
    pub fn input_shape(&self) -> FeatureShape {
        FeatureShape::new(self.input_channels(), self.input_resolution())
    }

    /// The feature-map shape this block produces.
    ///
    /// Pooling blocks collapse the spatial resolution to 1; every other
    /// block divides the resolution by its stride.
    pub fn output_shape(&self) -> Result<FeatureShape, ShapeError> {
        match self {
            Self::FeatureMix { cout, .. } | Self::Logits { cout, .. } => {
                // Guard the input even though pooling discards it.
                self.input_shape().after(*cout, 1)?;
                Ok(FeatureShape::new(*cout, 1))
            }
            _ => self
                .input_shape()
                .after(self.output_channels(), self.stride()),
        }
    }

    /// Hidden channel count of the expansion/reduction layer, for the
    /// variants that have one.
    fn hidden_channels(&self) -> usize {
        match *self {
            Self::Mbconv {
                cin, expand_ratio, ..
            } => make_divisible((cin * expand_ratio) as f64, CHANNEL_DIVISOR),
            Self::Bconv {
                cout, expand_ratio, ..
            } => make_divisible(cout as f64 * expand_ratio, CHANNEL_DIVISOR),
            Self::InputStem { mid_channels, .. } => mid_channels,
            _ => 0,
        }
    }

    /// Estimates the number of trainable parameters in this block.
    ///
    /// Counts convolution and linear weights plus the per-channel scale and
    /// shift of each normalisation layer. Biases on plain convs are folded
    /// into the normalisation terms.
    pub fn param_count(&self) -> usize {
        match *self {
            Self::FirstConv { cin, cout, .. } => cin * cout * 9 + 2 * cout,
            Self::FirstMbconv { cin, cout, .. } => {
                // Depthwise 3x3 + pointwise projection.
                cin * 9 + cin * cout + 2 * (cin + cout)
            }
            Self::Mbconv {
                cin,
                cout,
                kernel_size,
                se,
                ..
            } => {
                let mid = self.hidden_channels();
                let se_params = if se {
                    let squeezed = mid / 4;
                    2 * mid * squeezed + mid + squeezed
                } else {
                    0
                };
                cin * mid + mid * kernel_size * kernel_size + mid * cout
                    + se_params
                    + 2 * (2 * mid + cout)
            }
            Self::FinalExpand { cin, cout, .. } => cin * cout + 2 * cout,
            Self::FeatureMix { cin, cout, .. } => cin * cout,
            Self::Logits { cin, cout, .. } => cin * cout + cout,
            Self::InputStem {
                cin,
                mid_channels,
                cout,
                skipping,
                ..
            } => {
                let middle = if skipping {
                    0
                } else {
                    mid_channels * mid_channels * 9 + 2 * mid_channels
                };
                cin * mid_channels * 9 + middle + mid_channels * cout * 9
                    + 2 * (mid_channels + cout)
            }
            Self::Bconv {
                cin, cout, stride, ..
            } => {
                let mid = self.hidden_channels();
                let shortcut = if stride != 1 || cin != cout {
                    cin * cout + 2 * cout
                } else {
                    0
                };
                cin * mid + mid * mid * 9 + mid * cout + shortcut + 2 * (2 * mid + cout)
            }
        }
    }

    /// Estimates the multiply-accumulate count of this block in millions.
    pub fn mflops(&self) -> f64 {
        self.macs() as f64 / 1.0e6
    }

    /// Raw multiply-accumulate estimate.
    fn macs(&self) -> usize {
        match *self {
            Self::FirstConv {
                hwin, cin, cout, ..
            } => {
                let hw_out = hwin / 2;
                hw_out * hw_out * cout * cin * 9
            }
            Self::FirstMbconv {
                hwin, cin, cout, ..
            } => hwin * hwin * (cin * 9 + cin * cout),
            Self::Mbconv {
                hwin,
                cin,
                cout,
                kernel_size,
                stride,
                se,
                ..
            } => {
                let mid = self.hidden_channels();
                let hw_out = hwin / stride;
                let expand = if mid != cin { hwin * hwin * cin * mid } else { 0 };
                let depthwise = hw_out * hw_out * mid * kernel_size * kernel_size;
                let se_macs = if se { 2 * mid * (mid / 4) } else { 0 };
                let project = hw_out * hw_out * mid * cout;
                expand + depthwise + se_macs + project
            }
            Self::FinalExpand {
                hwin, cin, cout, ..
            } => hwin * hwin * cin * cout,
            Self::FeatureMix { cin, cout, .. } => cin * cout,
            Self::Logits { cin, cout, .. } => cin * cout,
            Self::InputStem {
                hwin,
                cin,
                mid_channels,
                cout,
                skipping,
            } => {
                let hw_mid = hwin / 2;
                let middle = if skipping { 0 } else { mid_channels * mid_channels * 9 };
                hw_mid * hw_mid * (cin * mid_channels * 9 + middle + mid_channels * cout * 9)
            }
            Self::Bconv {
                hwin,
                cin,
                cout,
                stride,
                ..
            } => {
                let mid = self.hidden_channels();
                let hw_out = hwin / stride;
                let shortcut = if stride != 1 || cin != cout {
                    hw_out * hw_out * cin * cout
                } else {
                    0
                };
                hwin * hwin * cin * mid
                    + hw_out * hw_out * mid * mid * 9
                    + hw_out * hw_out * mid * cout
                    + shortcut
            }
        }
    }

    /// Returns a concise summary string for display.
    pub fn summary(&self) -> String {
        let base = format!(
            "{} {} -> {}c, stride {}",
            self.kind(),
            self.input_shape(),
            self.output_channels(),
            self.stride(),
        );
        match *self {
            Self::Mbconv {
                kernel_size,
                expand_ratio,
                act,
                se,
                ..
            } => format!(
                "{base}, k{kernel_size} e{expand_ratio} {act}{}",
                if se { " se" } else { "" },
            ),
            Self::Bconv { expand_ratio, .. } => format!("{base}, e{expand_ratio:.2}"),
            Self::InputStem { skipping, .. } => {
                format!("{base}{}", if skipping { ", reduced" } else { "" })
            }
            _ => base,
        }
    }
}

impl fmt::Display for BlockDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mbconv() -> BlockDef {
        BlockDef::Mbconv {
            hwin: 56,
            cin: 24,
            cout: 40,
            kernel_size: 5,
            expand_ratio: 6,
            stride: 2,
            act: Activation::Relu,
            se: true,
        }
    }

    #[test]
    fn test_kind_accessors() {
        let b = sample_mbconv();
        assert_eq!(b.kind(), BlockKind::Mbconv);
        assert_eq!(b.input_channels(), 24);
        assert_eq!(b.output_channels(), 40);
        assert_eq!(b.input_resolution(), 56);
        assert_eq!(b.stride(), 2);
    }

    #[test]
    fn test_output_shape_strided() {
        let b = sample_mbconv();
        assert_eq!(b.output_shape().unwrap(), FeatureShape::new(40, 28));
    }

    #[test]
    fn test_output_shape_first_conv() {
        let b = BlockDef::FirstConv {
            hwin: 224,
            cin: 3,
            cout: 16,
        };
        assert_eq!(b.output_shape().unwrap(), FeatureShape::new(16, 112));
    }

    #[test]
    fn test_output_shape_pooled() {
        let b = BlockDef::FeatureMix {
            hwin: 7,
            cin: 960,
            cout: 1280,
        };
        assert_eq!(b.output_shape().unwrap(), FeatureShape::new(1280, 1));

        let l = BlockDef::Logits {
            hwin: 7,
            cin: 1328,
            cout: 1000,
        };
        assert_eq!(l.output_shape().unwrap(), FeatureShape::new(1000, 1));
    }

    #[test]
    fn test_output_shape_input_stem() {
        let b = BlockDef::InputStem {
            hwin: 224,
            cin: 3,
            mid_channels: 24,
            cout: 64,
            skipping: true,
        };
        assert_eq!(b.output_shape().unwrap(), FeatureShape::new(64, 56));
    }

    #[test]
    fn test_output_shape_invalid_stride() {
        let b = BlockDef::Bconv {
            hwin: 1,
            cin: 64,
            cout: 256,
            expand_ratio: 0.25,
            stride: 2,
        };
        assert!(b.output_shape().is_err());
    }

    #[test]
    fn test_mbconv_hidden_channels() {
        // 24 * 6 = 144, already a multiple of 8.
        assert_eq!(sample_mbconv().hidden_channels(), 144);
    }

    #[test]
    fn test_bconv_hidden_channels() {
        let b = BlockDef::Bconv {
            hwin: 56,
            cin: 64,
            cout: 256,
            expand_ratio: 0.25,
            stride: 1,
        };
        assert_eq!(b.hidden_channels(), 64);
    }

    #[test]
    fn test_logits_param_count() {
        let b = BlockDef::Logits {
            hwin: 1,
            cin: 1280,
            cout: 1000,
        };
        assert_eq!(b.param_count(), 1280 * 1000 + 1000);
    }

    #[test]
    fn test_first_conv_macs() {
        let b = BlockDef::FirstConv {
            hwin: 224,
            cin: 3,
            cout: 16,
        };
        // 112 * 112 * 16 * 3 * 9 MACs.
        let expected = 112.0 * 112.0 * 16.0 * 3.0 * 9.0 / 1.0e6;
        assert!((b.mflops() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_skipping_stem_is_smaller() {
        let full = BlockDef::InputStem {
            hwin: 224,
            cin: 3,
            mid_channels: 32,
            cout: 64,
            skipping: false,
        };
        let reduced = BlockDef::InputStem {
            hwin: 224,
            cin: 3,
            mid_channels: 32,
            cout: 64,
            skipping: true,
        };
        assert!(reduced.param_count() < full.param_count());
        assert!(reduced.mflops() < full.mflops());
    }

    #[test]
    fn test_serde_roundtrip() {
        let b = sample_mbconv();
        let json = serde_json::to_string(&b).unwrap();
        assert!(json.contains("\"kind\":\"mbconv\""));
        let back: BlockDef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn test_block_kind_from_str() {
        assert_eq!(BlockKind::from_str_loose("mbconv"), Some(BlockKind::Mbconv));
        assert_eq!(BlockKind::from_str_loose("stem"), Some(BlockKind::InputStem));
        assert_eq!(BlockKind::from_str_loose("HEAD"), Some(BlockKind::Logits));
        assert_eq!(BlockKind::from_str_loose("unknown"), None);
    }

    #[test]
    fn test_summary() {
        let s = sample_mbconv().summary();
        assert!(s.contains("mbconv"));
        assert!(s.contains("k5"));
        assert!(s.contains("se"));
    }
}
