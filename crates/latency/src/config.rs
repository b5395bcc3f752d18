// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Prediction run configuration loaded from TOML files.
//!
//! # TOML Format
//! ```toml
//! family = "mobilenetv3"
//! genome = "ks55355773757755735757_e66643464363346436436_d22343"
//! width_mult = 1.0
//! num_classes = 1000
//! resolution = 224
//! cost_table = "./tables/cortex-a76.json"
//! ```

use crate::PredictError;
use search_space::{ArchSpace, Family, MobileNetV3Space, ResNetSpace};
use std::path::{Path, PathBuf};

fn default_width_mult() -> f64 {
    1.0
}

fn default_num_classes() -> usize {
    1000
}

fn default_resolution() -> usize {
    224
}

/// Configuration for one prediction run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PredictConfig {
    /// Architecture family name (loose aliases accepted).
    pub family: String,
    /// Genome string to reconstruct.
    pub genome: String,
    /// Width multiplier (MobileNetV3 only).
    #[serde(default = "default_width_mult")]
    pub width_mult: f64,
    /// Classifier output size.
    #[serde(default = "default_num_classes")]
    pub num_classes: usize,
    /// Input resolution.
    #[serde(default = "default_resolution")]
    pub resolution: usize,
    /// Optional path to a fitted cost-table JSON file.
    pub cost_table: Option<PathBuf>,
}

impl PredictConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, PredictError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PredictError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, PredictError> {
        toml::from_str(toml_str)
            .map_err(|e| PredictError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, PredictError> {
        toml::to_string_pretty(self)
            .map_err(|e| PredictError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Resolves the architecture family named by this config.
    pub fn resolve_family(&self) -> Result<Family, PredictError> {
        self.family
            .parse()
            .map_err(|e| PredictError::ConfigError(format!("{e}")))
    }

    /// Builds the space descriptor this config describes.
    pub fn space(&self) -> Result<ArchSpace, PredictError> {
        let space = match self.resolve_family()? {
            Family::MobileNetV3 => ArchSpace::MobileNetV3(MobileNetV3Space::new(
                self.width_mult,
                self.num_classes,
                self.resolution,
            )),
            Family::ResNet => {
                ArchSpace::ResNet(ResNetSpace::new(self.num_classes, self.resolution))
            }
        };
        Ok(space)
    }
}
