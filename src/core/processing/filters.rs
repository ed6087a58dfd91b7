use crate::core::processing::ops::{filter_3x3, saturate_u8};
use crate::types::GrayImage;

/// 3x3 Gaussian with the sigma implied by a 3-tap kernel: [1 2 1] x [1 2 1] / 16.
const GAUSSIAN_3X3: [[i32; 3]; 3] = [[1, 2, 1], [2, 4, 2], [1, 2, 1]];

/// Unit-gain Laplacian boost.
pub const SHARPEN_3X3: [[i32; 3]; 3] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

/// Suppress high-frequency sensor noise with a 3x3 Gaussian (rounded to nearest).
pub fn gaussian_blur_3x3(src: &GrayImage) -> GrayImage {
    filter_3x3(src, &GAUSSIAN_3X3, |acc| ((acc + 8) >> 4) as u8)
}

/// Sharpen with [`SHARPEN_3X3`], saturating to the u8 range.
pub fn sharpen(src: &GrayImage) -> GrayImage {
    filter_3x3(src, &SHARPEN_3X3, saturate_u8)
}
