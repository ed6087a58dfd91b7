use std::path::Path;

use image::{DynamicImage, ImageDecoder, ImageReader, Rgb, RgbImage};
use ndarray::Array3;
use tracing::warn;

use crate::types::ColorImage;

/// Decode `path` into an 8-bit RGB array, honouring EXIF orientation.
///
/// The format is detected from the file contents. Alpha is dropped, gray inputs are
/// replicated across the three channels and 16-bit inputs keep their high byte.
/// Returns `None` (after logging a warning) when the file cannot be opened or decoded.
pub fn read_color_image(path: &Path) -> Option<ColorImage> {
    match decode(path) {
        Ok(img) => Some(img),
        Err(e) => {
            warn!("Could not read image {:?}: {}", path, e);
            None
        }
    }
}

fn decode(path: &Path) -> Result<ColorImage, Box<dyn std::error::Error>> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);

    let rgb = to_rgb8_truncating(img);
    let (width, height) = rgb.dimensions();
    let array = Array3::from_shape_vec((height as usize, width as usize, 3), rgb.into_raw())?;
    Ok(array)
}

/// 8-bit RGB view of `img`. 16-bit samples keep their high byte (`v >> 8`), the
/// same reduction libpng's strip-16 applies, instead of the rounded rescale of
/// `DynamicImage::to_rgb8`.
fn to_rgb8_truncating(img: DynamicImage) -> RgbImage {
    let high = |v: u16| (v >> 8) as u8;
    match img {
        DynamicImage::ImageLuma16(buf) => RgbImage::from_fn(buf.width(), buf.height(), |x, y| {
            let v = high(buf.get_pixel(x, y)[0]);
            Rgb([v, v, v])
        }),
        DynamicImage::ImageLumaA16(buf) => RgbImage::from_fn(buf.width(), buf.height(), |x, y| {
            let v = high(buf.get_pixel(x, y)[0]);
            Rgb([v, v, v])
        }),
        DynamicImage::ImageRgb16(buf) => RgbImage::from_fn(buf.width(), buf.height(), |x, y| {
            let [r, g, b] = buf.get_pixel(x, y).0;
            Rgb([high(r), high(g), high(b)])
        }),
        DynamicImage::ImageRgba16(buf) => RgbImage::from_fn(buf.width(), buf.height(), |x, y| {
            let [r, g, b, _] = buf.get_pixel(x, y).0;
            Rgb([high(r), high(g), high(b)])
        }),
        other => other.to_rgb8(),
    }
}
