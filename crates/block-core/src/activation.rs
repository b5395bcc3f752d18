// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Activation kinds used by the supported architecture families.

use std::fmt;

/// The activation applied inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Rectified linear unit.
    Relu,
    /// Hard swish.
    HSwish,
}

impl Activation {
    /// Parses an activation from a descriptor string.
    ///
    /// Accepts common spellings (`"relu"`, `"hswish"`, `"h_swish"`).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relu" => Some(Self::Relu),
            "hswish" | "h_swish" | "hard_swish" => Some(Self::HSwish),
            _ => None,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relu => "relu",
            Self::HSwish => "hswish",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
