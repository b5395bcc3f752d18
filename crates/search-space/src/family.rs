// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Architecture families and their genome grammars.

use crate::SpaceError;
use std::fmt;
use std::str::FromStr;

/// One segment of a genome grammar: the segment key and the number of
/// digit characters per token.
///
/// Most segments use single-digit tokens. The ResNet expansion segment
/// uses two-digit tokens: ratios are percent-encoded (`25` for 0.25), and
/// a single-digit read would leave twice as many entries as there are
/// block positions, desynchronising the positional cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSpec {
    /// Leading key of the segment (e.g. `"ks"`).
    pub key: &'static str,
    /// Digit characters per token.
    pub token_width: usize,
}

const MOBILENETV3_GRAMMAR: [SegmentSpec; 3] = [
    SegmentSpec { key: "ks", token_width: 1 },
    SegmentSpec { key: "e", token_width: 1 },
    SegmentSpec { key: "d", token_width: 1 },
];

const RESNET_GRAMMAR: [SegmentSpec; 3] = [
    SegmentSpec { key: "d", token_width: 1 },
    SegmentSpec { key: "e", token_width: 2 },
    SegmentSpec { key: "w", token_width: 1 },
];

/// The architecture family a genome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// MobileNetV3-style: kernel size / expansion / depth segments.
    MobileNetV3,
    /// ResNet-style: depth / expansion / width segments.
    ResNet,
}

impl Family {
    /// Returns the genome grammar for this family, in segment order.
    pub fn grammar(&self) -> &'static [SegmentSpec] {
        match self {
            Self::MobileNetV3 => &MOBILENETV3_GRAMMAR,
            Self::ResNet => &RESNET_GRAMMAR,
        }
    }

    /// Parses a family from a string, accepting common aliases.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mobilenetv3" | "mobilenet_v3" | "mobilenet" | "mbv3" => Some(Self::MobileNetV3),
            "resnet" | "resnet50" | "resnet_50" => Some(Self::ResNet),
            _ => None,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MobileNetV3 => "mobilenetv3",
            Self::ResNet => "resnet",
        }
    }
}

impl FromStr for Family {
    type Err = SpaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_loose(s).ok_or_else(|| SpaceError::UnknownFamily {
            name: s.to_string(),
        })
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_segments() {
        let g = Family::MobileNetV3.grammar();
        assert_eq!(g.len(), 3);
        assert_eq!(g[0].key, "ks");
        assert_eq!(g[0].token_width, 1);

        let g = Family::ResNet.grammar();
        assert_eq!(g[1].key, "e");
        assert_eq!(g[1].token_width, 2);
    }

    #[test]
    fn test_from_str_loose() {
        assert_eq!(Family::from_str_loose("mobilenetv3"), Some(Family::MobileNetV3));
        assert_eq!(Family::from_str_loose("MBV3"), Some(Family::MobileNetV3));
        assert_eq!(Family::from_str_loose("resnet50"), Some(Family::ResNet));
        assert_eq!(Family::from_str_loose("vgg"), None);
    }

    #[test]
    fn test_from_str_unknown_family() {
        let err = "transformer".parse::<Family>().unwrap_err();
        assert!(matches!(err, SpaceError::UnknownFamily { .. }));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Family::MobileNetV3), "mobilenetv3");
        assert_eq!(format!("{}", Family::ResNet), "resnet");
    }
}
