use ndarray::{Array2, Zip};

use crate::types::{ColorImage, GrayImage};

// BT.601 luma weights in 14-bit fixed point (0.299, 0.587, 0.114)
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Luminance-weighted RGB to gray conversion.
pub fn to_grayscale(color: &ColorImage) -> GrayImage {
    let (rows, cols, _) = color.dim();
    let mut gray = Array2::<u8>::zeros((rows, cols));
    Zip::indexed(&mut gray).for_each(|(y, x), g| {
        let r = color[[y, x, 0]] as u32;
        let gr = color[[y, x, 1]] as u32;
        let b = color[[y, x, 2]] as u32;
        let luma = (r * LUMA_R + gr * LUMA_G + b * LUMA_B + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT;
        *g = luma as u8;
    });
    gray
}

/// Mirror an out-of-range index back into `0..len` without repeating the edge
/// sample (`dcb|abcd|cba`).
#[inline]
pub fn reflect_101(index: isize, len: usize) -> usize {
    let len = len as isize;
    if len == 1 {
        return 0;
    }
    let mut i = index;
    loop {
        if i < 0 {
            i = -i;
        } else if i >= len {
            i = 2 * len - 2 - i;
        } else {
            return i as usize;
        }
    }
}

/// Correlate a 3x3 integer kernel with the image using reflect-101 borders.
/// `finish` maps the raw accumulator to the output sample.
pub fn filter_3x3<F>(src: &GrayImage, kernel: &[[i32; 3]; 3], finish: F) -> GrayImage
where
    F: Fn(i32) -> u8,
{
    let (rows, cols) = src.dim();
    let mut dst = Array2::<u8>::zeros((rows, cols));
    if rows == 0 || cols == 0 {
        return dst;
    }

    // Column lookup per output x, shared by every row
    let col_idx: Vec<[usize; 3]> = (0..cols as isize)
        .map(|x| {
            [
                reflect_101(x - 1, cols),
                x as usize,
                reflect_101(x + 1, cols),
            ]
        })
        .collect();

    for y in 0..rows {
        let yi = y as isize;
        let row_idx = [
            reflect_101(yi - 1, rows),
            y,
            reflect_101(yi + 1, rows),
        ];
        for (x, cx) in col_idx.iter().enumerate() {
            let mut acc = 0i32;
            for (ky, &sy) in row_idx.iter().enumerate() {
                for (kx, &sx) in cx.iter().enumerate() {
                    acc += kernel[ky][kx] * src[[sy, sx]] as i32;
                }
            }
            dst[[y, x]] = finish(acc);
        }
    }
    dst
}

#[inline]
pub fn saturate_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}
