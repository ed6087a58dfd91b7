//! Shared types and enums used across XRENHANCE.
//! Includes the image aliases (`GrayImage`, `ColorImage`), dataset `Category`,
//! pipeline `Stage` labels, `TargetSize`, and `ResizeAlgorithm`.
use std::str::FromStr;

use clap::ValueEnum;
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Single-channel 8-bit image, shaped `(rows, cols)`.
pub type GrayImage = Array2<u8>;

/// Three-channel 8-bit image, shaped `(rows, cols, 3)` in RGB order.
pub type ColorImage = Array3<u8>;

/// Dataset label. Each category maps to an input subfolder and a mirrored output subfolder.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug, Serialize, Deserialize)]
pub enum Category {
    Normal,
    ViralPneumonia,
    LungOpacity,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Normal,
        Category::ViralPneumonia,
        Category::LungOpacity,
    ];

    /// Folder name used on both the input and output side.
    pub fn folder_name(&self) -> &'static str {
        match self {
            Category::Normal => "Normal",
            Category::ViralPneumonia => "Viral Pneumonia",
            Category::LungOpacity => "Lung_Opacity",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.folder_name())
    }
}

/// The five pipeline stages, in execution order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Stage {
    Original,
    Resized,
    Denoised,
    Contrast,
    Sharpened,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Original,
        Stage::Resized,
        Stage::Denoised,
        Stage::Contrast,
        Stage::Sharpened,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Original => "original",
            Stage::Resized => "resized",
            Stage::Denoised => "denoised",
            Stage::Contrast => "contrast",
            Stage::Sharpened => "sharpened",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Original => write!(f, "Original"),
            Stage::Resized => write!(f, "Grayscale + Resize"),
            Stage::Denoised => write!(f, "Denoised"),
            Stage::Contrast => write!(f, "Contrast (CLAHE)"),
            Stage::Sharpened => write!(f, "Sharpened"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum ResizeAlgorithm {
    /// Area averaging (suited to downscaling)
    Area,
    Bilinear,
    Lanczos3,
}

impl std::fmt::Display for ResizeAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResizeAlgorithm::Area => write!(f, "area"),
            ResizeAlgorithm::Bilinear => write!(f, "bilinear"),
            ResizeAlgorithm::Lanczos3 => write!(f, "lanczos3"),
        }
    }
}

/// Width/height pair, also used for the CLAHE tile grid.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TargetSize {
    pub width: usize,
    pub height: usize,
}

impl TargetSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub const fn square(side: usize) -> Self {
        Self::new(side, side)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::ZeroSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self::square(256)
    }
}

impl std::fmt::Display for TargetSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Accepts `N` (square) or `WxH`.
impl FromStr for TargetSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidArgument {
            arg: "size",
            value: s.to_string(),
        };
        let size = match s.trim().split_once(['x', 'X']) {
            Some((w, h)) => TargetSize::new(
                w.trim().parse().map_err(|_| invalid())?,
                h.trim().parse().map_err(|_| invalid())?,
            ),
            None => TargetSize::square(s.trim().parse().map_err(|_| invalid())?),
        };
        size.validate()?;
        Ok(size)
    }
}
