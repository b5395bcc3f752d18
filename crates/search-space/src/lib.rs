// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # search-space
//!
//! Genome grammars and search-space descriptors for the supported
//! architecture families:
//!
//! - [`Family`] — the architecture family tag with its genome grammar.
//! - [`SampleConfig`] — a decoded genome: ordered integer token sequences
//!   per parameter segment.
//! - [`MobileNetV3Space`] / [`ResNetSpace`] — immutable per-stage
//!   enumerations of widths, strides, depths, activations and
//!   squeeze-excite flags.
//! - [`ArchSpace`] — a family-tagged space value for call sites that are
//!   generic over the family.
//!
//! A space descriptor is constructed once per family/resolution/class-count
//! configuration and passed explicitly into every build call; nothing in
//! this crate holds global state.

mod error;
mod family;
mod mobilenetv3;
mod resnet;
mod sample;

pub use error::SpaceError;
pub use family::{Family, SegmentSpec};
pub use mobilenetv3::{MbStage, MobileNetV3Space, TailBlockConfig};
pub use resnet::{ResNetSpace, ResStage};
pub use sample::SampleConfig;

/// A search-space descriptor tagged with its family.
///
/// Lets call sites carry "some space" without being generic over the
/// family; the stage walkers dispatch on the variant.
#[derive(Debug, Clone)]
pub enum ArchSpace {
    /// MobileNetV3-style space.
    MobileNetV3(MobileNetV3Space),
    /// ResNet-style space.
    ResNet(ResNetSpace),
}

impl ArchSpace {
    /// Creates the standard space for a family at the given class count and
    /// input resolution. MobileNetV3 uses width multiplier 1.0.
    pub fn standard(family: Family, num_classes: usize, hw: usize) -> Self {
        match family {
            Family::MobileNetV3 => {
                Self::MobileNetV3(MobileNetV3Space::new(1.0, num_classes, hw))
            }
            Family::ResNet => Self::ResNet(ResNetSpace::new(num_classes, hw)),
        }
    }

    /// Returns the family this space describes.
    pub fn family(&self) -> Family {
        match self {
            Self::MobileNetV3(_) => Family::MobileNetV3,
            Self::ResNet(_) => Family::ResNet,
        }
    }

    /// Input resolution of the space.
    pub fn hw(&self) -> usize {
        match self {
            Self::MobileNetV3(s) => s.hw,
            Self::ResNet(s) => s.hw,
        }
    }
}
