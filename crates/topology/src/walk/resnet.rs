// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! ResNet stage walker.

use crate::cursor::Cursor;
use crate::sequence::{BlockSequence, Built};
use crate::BuildError;
use block_core::{BlockDef, FeatureShape, IMAGE_CHANNELS};
use search_space::{Family, ResNetSpace, SampleConfig};

/// Builds the block sequence for a decoded ResNet sample.
///
/// The first two `w` tokens and the first `d` token select the stem
/// geometry; the remainder belong to the four body stages. Each stage
/// emits `base_depth + extra` bottleneck blocks, with expansion ratios
/// consumed positionally from the percent-encoded `e` segment. A final
/// classifier block closes the sequence.
pub(crate) fn build(
    config: &SampleConfig,
    space: &ResNetSpace,
) -> Result<BlockSequence<Built>, BuildError> {
    let depths = config.segment("d")?;
    let expands = config.segment("e")?;
    let widths = config.segment("w")?;

    let num_stages = space.num_body_stages();
    if depths.len() != 1 + num_stages {
        return Err(BuildError::SegmentLength {
            key: "d",
            expected: 1 + num_stages,
            actual: depths.len(),
        });
    }
    if widths.len() != 2 + num_stages {
        return Err(BuildError::SegmentLength {
            key: "w",
            expected: 2 + num_stages,
            actual: widths.len(),
        });
    }

    let stem_depth = depths[0] as usize;
    let body_depths = &depths[1..];
    let stem_w0 = widths[0] as usize;
    let stem_w1 = widths[1] as usize;
    let body_widths = &widths[2..];

    // A reduced stem drops its middle convolution; the full stem is what
    // the maximum depth selector encodes.
    let skipping = stem_depth != space.max_extra_depth();
    let mid_channels = *space.mid_input_channel.get(stem_w0).ok_or(
        BuildError::SelectorOutOfRange {
            key: "w",
            value: stem_w0,
            choices: space.mid_input_channel.len(),
        },
    )?;
    let stem_out = *space
        .input_channel
        .get(stem_w1)
        .ok_or(BuildError::SelectorOutOfRange {
            key: "w",
            value: stem_w1,
            choices: space.input_channel.len(),
        })?;

    let input = FeatureShape::new(IMAGE_CHANNELS, space.hw);
    let mut blocks = vec![BlockDef::InputStem {
        hwin: input.hw,
        cin: input.channels,
        mid_channels,
        cout: stem_out,
        skipping,
    }];
    let mut shape = input.after(stem_out, ResNetSpace::STEM_DIVISOR)?;

    let max_extra = space.max_extra_depth();
    let mut cursor = Cursor::new();
    for (stage_idx, stage) in space.body_stages().enumerate() {
        let w_idx = body_widths[stage_idx] as usize;
        let width = *stage.width_choices.get(w_idx).ok_or(
            BuildError::SelectorOutOfRange {
                key: "w",
                value: w_idx,
                choices: stage.width_choices.len(),
            },
        )?;
        let extra = body_depths[stage_idx] as usize;
        if extra > max_extra {
            return Err(BuildError::DepthOutOfRange {
                stage: stage_idx,
                depth: extra,
                max: max_extra,
            });
        }

        for i in 0..stage.base_depth + extra {
            let slot = cursor.slot(i);
            let token = *expands.get(slot).ok_or(BuildError::IndexOutOfRange {
                key: "e",
                index: slot,
                len: expands.len(),
            })?;
            let stride = if i == 0 { stage.stride } else { 1 };

            blocks.push(BlockDef::Bconv {
                hwin: shape.hw,
                cin: shape.channels,
                cout: width,
                expand_ratio: space.expand_ratio_from_token(token),
                stride,
            });
            shape = shape.after(width, stride)?;
        }

        cursor.advance(stage.base_depth + max_extra);
    }
    cursor.finish("e", expands.len())?;

    blocks.push(BlockDef::Logits {
        hwin: shape.hw,
        cin: shape.channels,
        cout: space.num_classes,
    });

    Ok(BlockSequence::new(Family::ResNet, input, blocks))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENOME: &str = "d00101_e352525352520252025202025253535353520_w122210";

    fn build_standard(genome: &str) -> Result<BlockSequence<Built>, BuildError> {
        let space = ResNetSpace::default();
        let config = SampleConfig::parse(genome, Family::ResNet)?;
        build(&config, &space)
    }

    #[test]
    fn test_block_count() {
        let seq = build_standard(GENOME).unwrap();
        // Stem + (2+0) + (2+1) + (4+0) + (2+1) + classifier.
        assert_eq!(seq.blocks().len(), 14);
    }

    #[test]
    fn test_stem_selectors() {
        let seq = build_standard(GENOME).unwrap();
        match &seq.blocks()[0] {
            BlockDef::InputStem {
                mid_channels,
                cout,
                skipping,
                ..
            } => {
                // w selectors (1, 2) index the stem channel tables.
                assert_eq!(*mid_channels, 24);
                assert_eq!(*cout, 64);
                // Stem depth selector 0 != max depth 2.
                assert!(*skipping);
            }
            other => panic!("expected input stem, got {other:?}"),
        }
    }

    #[test]
    fn test_full_stem_when_selector_is_maximum() {
        let seq =
            build_standard("d20101_e352525352520252025202025253535353520_w122210").unwrap();
        assert!(matches!(
            seq.blocks()[0],
            BlockDef::InputStem { skipping: false, .. },
        ));
    }

    #[test]
    fn test_stage_widths_follow_selectors() {
        let seq = build_standard(GENOME).unwrap();
        let widths: Vec<usize> = seq
            .blocks()
            .iter()
            .filter_map(|b| match b {
                BlockDef::Bconv { cout, .. } => Some(*cout),
                _ => None,
            })
            .collect();
        // Selectors [2, 2, 1, 0] over the stage width tables.
        assert_eq!(
            widths,
            vec![256, 256, 512, 512, 512, 816, 816, 816, 816, 1328, 1328, 1328],
        );
    }

    #[test]
    fn test_expansion_tokens_skip_reserved_slots() {
        let seq = build_standard(GENOME).unwrap();
        // Stage 1 reserves slots 4..8; its first block reads slot 4.
        let first_stage1 = &seq.blocks()[3];
        match first_stage1 {
            BlockDef::Bconv { expand_ratio, .. } => {
                // e tokens: [35, 25, 25, 35, 25, ...] — slot 4 is 25.
                assert!((expand_ratio - 0.25).abs() < 1e-9);
            }
            other => panic!("expected bconv, got {other:?}"),
        }
    }

    #[test]
    fn test_resolution_walk() {
        let seq = build_standard(GENOME).unwrap();
        let resolutions: Vec<usize> =
            seq.blocks().iter().map(|b| b.input_resolution()).collect();
        assert_eq!(
            resolutions,
            vec![224, 56, 56, 56, 28, 28, 28, 14, 14, 14, 14, 7, 7, 7],
        );
    }

    #[test]
    fn test_classifier_closes_sequence() {
        let seq = build_standard(GENOME).unwrap();
        let last = seq.blocks().last().unwrap();
        assert!(matches!(
            last,
            BlockDef::Logits { hwin: 7, cin: 1328, cout: 1000 },
        ));
    }

    #[test]
    fn test_width_selector_out_of_range() {
        let err =
            build_standard("d00101_e352525352520252025202025253535353520_w122219").unwrap_err();
        assert!(matches!(
            err,
            BuildError::SelectorOutOfRange { key: "w", value: 9, .. },
        ));
    }

    #[test]
    fn test_depth_segment_length_enforced() {
        let err =
            build_standard("d0010_e352525352520252025202025253535353520_w122210").unwrap_err();
        assert!(matches!(err, BuildError::SegmentLength { key: "d", .. }));
    }

    #[test]
    fn test_short_expansion_segment_overruns() {
        let err = build_standard("d00101_e3525253525202520252020_w122210").unwrap_err();
        assert!(matches!(
            err,
            BuildError::IndexOutOfRange { .. } | BuildError::CursorMisaligned { .. },
        ));
    }
}
