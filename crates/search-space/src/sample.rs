// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Genome decoding.
//!
//! A genome is an ASCII string of `'_'`-separated segments, each a key
//! followed by digit characters (`"ks55355..."`). Decoding is purely
//! positional: each segment's digits become an ordered sequence of integer
//! tokens. What a token *means* (a kernel size, an expansion ratio, a width
//! index) is decided by the space descriptor that consumes it, not here.

use crate::{Family, SpaceError};

/// One decoded genome segment.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Segment {
    /// Segment key from the grammar.
    pub key: &'static str,
    /// Decoded tokens in left-to-right order.
    pub values: Vec<u32>,
}

/// A decoded genome sample: ordered token sequences per parameter segment.
///
/// Produced by [`SampleConfig::parse`]; read-only thereafter. Decoding is a
/// pure function — a malformed genome produces an error and no partial
/// output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SampleConfig {
    family: Family,
    segments: Vec<Segment>,
}

impl SampleConfig {
    /// Decodes a genome string against its family grammar.
    ///
    /// # Errors
    /// [`SpaceError::MalformedGenome`] when the segment count, segment
    /// keys, digit character set, or token widths do not match the grammar.
    pub fn parse(genome: &str, family: Family) -> Result<Self, SpaceError> {
        let grammar = family.grammar();
        let parts: Vec<&str> = genome.split('_').collect();

        if parts.len() != grammar.len() {
            return Err(SpaceError::MalformedGenome {
                reason: format!(
                    "expected {} '_'-separated segments for {family}, got {}",
                    grammar.len(),
                    parts.len(),
                ),
            });
        }

        let mut segments = Vec::with_capacity(grammar.len());
        for (part, spec) in parts.iter().zip(grammar) {
            let digits = part.strip_prefix(spec.key).ok_or_else(|| {
                SpaceError::MalformedGenome {
                    reason: format!("segment '{part}' does not start with key '{}'", spec.key),
                }
            })?;

            if digits.is_empty() {
                return Err(SpaceError::MalformedGenome {
                    reason: format!("segment '{}' carries no digits", spec.key),
                });
            }
            if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
                return Err(SpaceError::MalformedGenome {
                    reason: format!("segment '{}' contains non-digit character '{bad}'", spec.key),
                });
            }
            if digits.len() % spec.token_width != 0 {
                return Err(SpaceError::MalformedGenome {
                    reason: format!(
                        "segment '{}' has {} digits, not a multiple of the token width {}",
                        spec.key,
                        digits.len(),
                        spec.token_width,
                    ),
                });
            }

            let values = digits
                .as_bytes()
                .chunks(spec.token_width)
                .map(|chunk| {
                    chunk
                        .iter()
                        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
                })
                .collect();

            segments.push(Segment {
                key: spec.key,
                values,
            });
        }

        Ok(Self { family, segments })
    }

    /// The family this sample was decoded for.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Returns the decoded tokens of a segment.
    ///
    /// # Errors
    /// [`SpaceError::MalformedGenome`] if the segment is absent — only
    /// possible when the key is not part of this family's grammar.
    pub fn segment(&self, key: &str) -> Result<&[u32], SpaceError> {
        self.segments
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.values.as_slice())
            .ok_or_else(|| SpaceError::MalformedGenome {
                reason: format!("no segment '{key}' in a {} sample", self.family),
            })
    }

    /// Iterates over the decoded segments in grammar order.
    pub fn iter_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB_GENOME: &str = "ks55355773757755735757_e66643464363346436436_d22343";
    const RES_GENOME: &str = "d00101_e352525352520252025202025253535353520_w122210";

    #[test]
    fn test_parse_mobilenetv3() {
        let config = SampleConfig::parse(MB_GENOME, Family::MobileNetV3).unwrap();
        assert_eq!(config.segment("ks").unwrap().len(), 20);
        assert_eq!(config.segment("e").unwrap().len(), 20);
        assert_eq!(config.segment("d").unwrap(), &[2, 2, 3, 4, 3]);
        assert_eq!(config.segment("ks").unwrap()[..4], [5, 5, 3, 5]);
    }

    #[test]
    fn test_parse_resnet_percent_tokens() {
        let config = SampleConfig::parse(RES_GENOME, Family::ResNet).unwrap();
        assert_eq!(config.segment("d").unwrap(), &[0, 0, 1, 0, 1]);
        assert_eq!(config.segment("w").unwrap(), &[1, 2, 2, 2, 1, 0]);
        let e = config.segment("e").unwrap();
        assert_eq!(e.len(), 18);
        assert_eq!(e[..4], [35, 25, 25, 35]);
        assert_eq!(e[17], 20);
    }

    #[test]
    fn test_wrong_segment_count() {
        let err = SampleConfig::parse("ks553_e664", Family::MobileNetV3).unwrap_err();
        assert!(matches!(err, SpaceError::MalformedGenome { .. }));
    }

    #[test]
    fn test_wrong_segment_key() {
        let err = SampleConfig::parse("ks553_e664_x223", Family::MobileNetV3).unwrap_err();
        assert!(matches!(err, SpaceError::MalformedGenome { .. }));
    }

    #[test]
    fn test_non_digit_character() {
        let err = SampleConfig::parse("ks5x3_e664_d223", Family::MobileNetV3).unwrap_err();
        assert!(matches!(err, SpaceError::MalformedGenome { .. }));
    }

    #[test]
    fn test_empty_segment() {
        let err = SampleConfig::parse("ks_e664_d223", Family::MobileNetV3).unwrap_err();
        assert!(matches!(err, SpaceError::MalformedGenome { .. }));
    }

    #[test]
    fn test_odd_percent_segment() {
        // 3 digits cannot form two-digit expansion tokens.
        let err = SampleConfig::parse("d00101_e352_w122210", Family::ResNet).unwrap_err();
        assert!(matches!(err, SpaceError::MalformedGenome { .. }));
    }

    #[test]
    fn test_missing_segment_lookup() {
        let config = SampleConfig::parse(MB_GENOME, Family::MobileNetV3).unwrap();
        assert!(config.segment("w").is_err());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let a = SampleConfig::parse(MB_GENOME, Family::MobileNetV3).unwrap();
        let b = SampleConfig::parse(MB_GENOME, Family::MobileNetV3).unwrap();
        assert_eq!(a, b);
    }
}
