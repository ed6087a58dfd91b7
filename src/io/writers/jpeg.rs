use jpeg_encoder::{ColorType, Encoder};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{Error, Result};

fn dimension(path: &Path, v: usize) -> Result<u16> {
    u16::try_from(v).map_err(|_| Error::Encode {
        path: path.to_path_buf(),
        detail: format!("dimension {} exceeds the JPEG limit of {}", v, u16::MAX),
    })
}

pub fn write_gray_jpeg(
    output: &Path,
    cols: usize,
    rows: usize,
    data: &[u8],
    quality: u8,
) -> Result<()> {
    let (width, height) = (dimension(output, cols)?, dimension(output, rows)?);
    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    let encoder = Encoder::new(&mut writer, quality);
    encoder
        .encode(data, width, height, ColorType::Luma)
        .map_err(|e| Error::Encode {
            path: output.to_path_buf(),
            detail: e.to_string(),
        })?;
    Ok(())
}
