//! Label canvas and font configuration

use crate::{LabelError, Result, Variant};
use label_core::FontConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 900,
        }
    }
}

impl std::str::FromStr for CanvasSpec {
    type Err = LabelError;

    /// Parse `WIDTHxHEIGHT`, e.g. `1400x900`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || LabelError::MalformedInput(format!("canvas size '{s}' is not WIDTHxHEIGHT"));
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

/// Side margins per label variant, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Margins {
    pub standard: u32,
    pub hot_market: u32,
    pub alt_sku: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            standard: 80,
            hot_market: 40,
            alt_sku: 80,
        }
    }
}

/// Rendering configuration shared by every label of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelConfig {
    pub canvas: CanvasSpec,
    pub margins: Margins,
    pub font: FontConfig,
}

impl LabelConfig {
    /// Parse configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Margin for a label variant
    pub fn margin(&self, variant: Variant) -> u32 {
        match variant {
            Variant::Standard => self.margins.standard,
            Variant::HotMarket => self.margins.hot_market,
            Variant::AltSku => self.margins.alt_sku,
        }
    }
}
