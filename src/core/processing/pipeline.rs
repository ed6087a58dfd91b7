use std::path::Path;

use tracing::debug;

use crate::core::params::EnhanceParams;
use crate::core::processing::clahe::clahe;
use crate::core::processing::filters::{gaussian_blur_3x3, sharpen};
use crate::core::processing::ops::to_grayscale;
use crate::core::processing::resize::resize_gray;
use crate::error::Result;
use crate::io::reader::read_color_image;
use crate::types::{ColorImage, GrayImage, Stage};

/// Every intermediate result of one pipeline run. Only `sharpened` is persisted
/// by the batch runner; the rest are kept for inspection.
#[derive(Debug, Clone)]
pub struct PipelineStages {
    pub original: ColorImage,
    pub resized: GrayImage,
    pub denoised: GrayImage,
    pub contrast: GrayImage,
    pub sharpened: GrayImage,
}

impl PipelineStages {
    /// Final output of the pipeline.
    pub fn final_image(&self) -> &GrayImage {
        &self.sharpened
    }

    /// Gray stage by label; `None` for [`Stage::Original`], which is color.
    pub fn gray(&self, stage: Stage) -> Option<&GrayImage> {
        match stage {
            Stage::Original => None,
            Stage::Resized => Some(&self.resized),
            Stage::Denoised => Some(&self.denoised),
            Stage::Contrast => Some(&self.contrast),
            Stage::Sharpened => Some(&self.sharpened),
        }
    }
}

/// Run grayscale -> resize -> denoise -> CLAHE -> sharpen on an in-memory image.
pub fn enhance(original: &ColorImage, params: &EnhanceParams) -> Result<PipelineStages> {
    let gray = to_grayscale(original);
    let resized = resize_gray(&gray, params.size, params.resize)?;
    let denoised = gaussian_blur_3x3(&resized);
    let contrast = clahe(&denoised, params.clip_limit, params.tiles)?;
    let sharpened = sharpen(&contrast);

    Ok(PipelineStages {
        original: original.clone(),
        resized,
        denoised,
        contrast,
        sharpened,
    })
}

/// Load `path` and run [`enhance`]. `Ok(None)` means the file could not be decoded
/// and should be skipped.
pub fn enhance_file(path: &Path, params: &EnhanceParams) -> Result<Option<PipelineStages>> {
    let Some(original) = read_color_image(path) else {
        return Ok(None);
    };
    let (rows, cols, _) = original.dim();
    debug!("Loaded {:?}: {}x{}", path, cols, rows);
    enhance(&original, params).map(Some)
}
