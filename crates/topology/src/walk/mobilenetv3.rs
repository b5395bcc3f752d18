// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! MobileNetV3 stage walker.

use crate::cursor::Cursor;
use crate::sequence::{BlockSequence, Built};
use crate::BuildError;
use block_core::{BlockDef, FeatureShape, IMAGE_CHANNELS};
use search_space::{Family, MobileNetV3Space, SampleConfig};

/// Builds the block sequence for a decoded MobileNetV3 sample.
///
/// Layout: stem conv, fixed first expand block at half resolution, five
/// searched body stages, then the three fixed head blocks from the tail of
/// the space's block-configuration list. Body depth comes from the `d`
/// segment; kernel sizes and expansion ratios are consumed positionally
/// from `ks`/`e`.
pub(crate) fn build(
    config: &SampleConfig,
    space: &MobileNetV3Space,
) -> Result<BlockSequence<Built>, BuildError> {
    let ks = config.segment("ks")?;
    let er = config.segment("e")?;
    let depths = config.segment("d")?;

    let num_stages = space.num_body_stages();
    if depths.len() != num_stages {
        return Err(BuildError::SegmentLength {
            key: "d",
            expected: num_stages,
            actual: depths.len(),
        });
    }

    let body_blocks: usize = depths.iter().map(|&d| d as usize).sum();
    let mut blocks = Vec::with_capacity(2 + body_blocks + 3);

    let input = FeatureShape::new(IMAGE_CHANNELS, space.hw);
    blocks.push(BlockDef::FirstConv {
        hwin: input.hw,
        cin: input.channels,
        cout: space.stem_width(),
    });
    let mut shape = input.after(space.stem_width(), 2)?;

    blocks.push(BlockDef::FirstMbconv {
        hwin: shape.hw,
        cin: shape.channels,
        cout: space.first_block_width(),
    });
    shape = shape.after(space.first_block_width(), 1)?;

    let mut cursor = Cursor::new();
    for (stage_idx, stage) in space.body_stages().enumerate() {
        let depth = depths[stage_idx] as usize;
        if depth > stage.max_depth {
            return Err(BuildError::DepthOutOfRange {
                stage: stage_idx,
                depth,
                max: stage.max_depth,
            });
        }

        for i in 0..depth {
            let slot = cursor.slot(i);
            let kernel_size = *ks.get(slot).ok_or(BuildError::IndexOutOfRange {
                key: "ks",
                index: slot,
                len: ks.len(),
            })? as usize;
            let expand_ratio = *er.get(slot).ok_or(BuildError::IndexOutOfRange {
                key: "e",
                index: slot,
                len: er.len(),
            })? as usize;
            let stride = if i == 0 { stage.stride } else { 1 };

            blocks.push(BlockDef::Mbconv {
                hwin: shape.hw,
                cin: shape.channels,
                cout: stage.width,
                kernel_size,
                expand_ratio,
                stride,
                act: stage.act,
                se: stage.se,
            });
            shape = shape.after(stage.width, stride)?;
        }

        // Slots are reserved per stage maximum, independent of the depth
        // actually sampled.
        cursor.advance(stage.max_depth);
    }
    cursor.finish("ks", ks.len())?;
    cursor.finish("e", er.len())?;

    let configs = &space.block_configs;
    if configs.len() < 3 {
        return Err(BuildError::InvalidSequence(format!(
            "space carries {} fixed block configurations, expected at least 3",
            configs.len(),
        )));
    }
    let tail = &configs[configs.len() - 3..];
    blocks.push(BlockDef::FinalExpand {
        hwin: tail[0].hwin,
        cin: tail[0].cin,
        cout: tail[0].cout,
    });
    blocks.push(BlockDef::FeatureMix {
        hwin: tail[1].hwin,
        cin: tail[1].cin,
        cout: tail[1].cout,
    });
    blocks.push(BlockDef::Logits {
        hwin: tail[2].hwin,
        cin: tail[2].cin,
        cout: tail[2].cout,
    });

    Ok(BlockSequence::new(Family::MobileNetV3, input, blocks))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENOME: &str = "ks55355773757755735757_e66643464363346436436_d22343";

    fn build_standard(genome: &str) -> Result<BlockSequence<Built>, BuildError> {
        let space = MobileNetV3Space::default();
        let config = SampleConfig::parse(genome, Family::MobileNetV3)?;
        build(&config, &space)
    }

    #[test]
    fn test_block_count() {
        let seq = build_standard(GENOME).unwrap();
        // 2 fixed + (2+2+3+4+3) body + 3 head.
        assert_eq!(seq.blocks().len(), 19);
    }

    #[test]
    fn test_stage_strides() {
        let seq = build_standard(GENOME).unwrap();
        let strides: Vec<usize> = seq.blocks().iter().map(|b| b.stride()).collect();
        // Stem, first block, then stride at each stage entry only.
        assert_eq!(
            strides,
            vec![2, 1, 2, 1, 2, 1, 2, 1, 1, 1, 1, 1, 1, 2, 1, 1, 1, 1, 1],
        );
    }

    #[test]
    fn test_positional_consumption_skips_reserved_slots() {
        let seq = build_standard(GENOME).unwrap();
        // Stage 1 (depth 2) starts at slot 4: ks digits "57", e digits "34".
        let block = &seq.blocks()[4];
        match block {
            BlockDef::Mbconv {
                kernel_size,
                expand_ratio,
                ..
            } => {
                assert_eq!(*kernel_size, 5);
                assert_eq!(*expand_ratio, 3);
            }
            other => panic!("expected mbconv, got {other:?}"),
        }
    }

    #[test]
    fn test_head_blocks() {
        let seq = build_standard(GENOME).unwrap();
        let blocks = seq.blocks();
        let n = blocks.len();
        assert!(matches!(blocks[n - 3], BlockDef::FinalExpand { cin: 160, cout: 960, .. }));
        assert!(matches!(blocks[n - 2], BlockDef::FeatureMix { cin: 960, cout: 1280, .. }));
        assert!(matches!(blocks[n - 1], BlockDef::Logits { cin: 1280, cout: 1000, .. }));
    }

    #[test]
    fn test_depth_segment_length_enforced() {
        let err = build_standard("ks55355773757755735757_e66643464363346436436_d2234")
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::SegmentLength { key: "d", expected: 5, actual: 4 },
        ));
    }

    #[test]
    fn test_depth_above_stage_maximum_rejected() {
        let err = build_standard("ks55355773757755735757_e66643464363346436436_d22345")
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::DepthOutOfRange { stage: 4, depth: 5, max: 4 },
        ));
    }

    #[test]
    fn test_short_flat_segment_overruns() {
        // 16 ks/e entries cannot cover the 20 reserved slots.
        let err = build_standard("ks5535577375775573_e6664346436334643_d22344").unwrap_err();
        assert!(matches!(
            err,
            BuildError::IndexOutOfRange { .. } | BuildError::CursorMisaligned { .. },
        ));
    }

    #[test]
    fn test_long_flat_segment_misaligns() {
        // 24 ks/e entries leave 4 unconsumed reserved slots.
        let err = build_standard(
            "ks553557737577557357573333_e666434643633464364363333_d22343",
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::CursorMisaligned { key: "ks", .. }));
    }
}
