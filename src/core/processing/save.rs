use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::params::EnhanceParams;
use crate::core::processing::pipeline::PipelineStages;
use crate::error::{Error, Result};
use crate::io::writers::jpeg::write_gray_jpeg;
use crate::io::writers::png::{write_gray_png, write_rgb_png};
use crate::types::{GrayImage, Stage};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Encoding {
    Jpeg,
    Png,
}

fn encoding_for(path: &Path) -> Result<Encoding> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => Ok(Encoding::Jpeg),
        Some("png") => Ok(Encoding::Png),
        _ => Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Write a gray image, choosing the encoder from the output extension.
/// Existing files are overwritten.
pub fn save_gray_image(image: &GrayImage, output: &Path, jpeg_quality: u8) -> Result<()> {
    let encoding = encoding_for(output)?;
    let (rows, cols) = image.dim();
    let data: Vec<u8> = image.iter().copied().collect();
    debug!("Writing {}x{} {:?} to {:?}", cols, rows, encoding, output);
    match encoding {
        Encoding::Jpeg => write_gray_jpeg(output, cols, rows, &data, jpeg_quality),
        Encoding::Png => write_gray_png(output, cols, rows, &data),
    }
}

/// Persist only the final (sharpened) stage.
pub fn persist_final(stages: &PipelineStages, output: &Path, params: &EnhanceParams) -> Result<()> {
    save_gray_image(stages.final_image(), output, params.jpeg_quality)
}

/// Dump every stage as `<stem>_<index>_<label>.png` under `dir` for inspection.
pub fn save_stages(stages: &PipelineStages, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(Stage::ALL.len());
    for (index, stage) in Stage::ALL.iter().enumerate() {
        let path = dir.join(format!("{}_{}_{}.png", stem, index, stage.label()));
        match stages.gray(*stage) {
            Some(gray) => {
                let (rows, cols) = gray.dim();
                let data: Vec<u8> = gray.iter().copied().collect();
                write_gray_png(&path, cols, rows, &data)?;
            }
            None => {
                let (rows, cols, _) = stages.original.dim();
                let data: Vec<u8> = stages.original.iter().copied().collect();
                write_rgb_png(&path, cols, rows, &data)?;
            }
        }
        written.push(path);
    }
    Ok(written)
}
