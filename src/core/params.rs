use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{ResizeAlgorithm, TargetSize};

/// Enhancement parameters suitable for config files and CLI presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceParams {
    /// Output width/height every image is normalized to
    pub size: TargetSize,
    pub resize: ResizeAlgorithm,
    /// CLAHE clip limit; <= 0 disables clipping
    pub clip_limit: f64,
    /// CLAHE tile grid (columns x rows)
    pub tiles: TargetSize,
    /// Quality used when the output extension is .jpg/.jpeg
    pub jpeg_quality: u8,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            size: TargetSize::square(256),
            resize: ResizeAlgorithm::Area,
            clip_limit: 2.0,
            tiles: TargetSize::square(8),
            jpeg_quality: 95,
        }
    }
}

impl EnhanceParams {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let params: EnhanceParams = serde_json::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        self.size.validate()?;
        self.tiles.validate()?;
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(crate::Error::InvalidArgument {
                arg: "jpeg_quality",
                value: self.jpeg_quality.to_string(),
            });
        }
        if !self.clip_limit.is_finite() {
            return Err(crate::Error::InvalidArgument {
                arg: "clip_limit",
                value: self.clip_limit.to_string(),
            });
        }
        Ok(())
    }
}
