use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::{Error, Result};

fn write_png(
    output: &Path,
    cols: usize,
    rows: usize,
    data: &[u8],
    color: ExtendedColorType,
) -> Result<()> {
    let file = File::create(output)?;
    let writer = BufWriter::new(file);
    PngEncoder::new(writer)
        .write_image(data, cols as u32, rows as u32, color)
        .map_err(|e| Error::Encode {
            path: output.to_path_buf(),
            detail: e.to_string(),
        })
}

pub fn write_gray_png(output: &Path, cols: usize, rows: usize, data: &[u8]) -> Result<()> {
    write_png(output, cols, rows, data, ExtendedColorType::L8)
}

pub fn write_rgb_png(output: &Path, cols: usize, rows: usize, rgb_data: &[u8]) -> Result<()> {
    write_png(output, cols, rows, rgb_data, ExtendedColorType::Rgb8)
}
