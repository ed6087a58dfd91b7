//! Contrast-limited adaptive histogram equalization.
//!
//! The image is split into a grid of tiles. Each tile gets its own clipped
//! histogram and equalization LUT, and every output pixel blends the LUTs of the
//! four nearest tile centres. Clipping bounds how much any one intensity can be
//! stretched, which keeps flat regions (lung fields, background) from washing out.
use ndarray::{Array2, Array3};
use tracing::debug;

use crate::core::processing::ops::reflect_101;
use crate::error::{Error, Result};
use crate::types::{GrayImage, TargetSize};

const HIST_SIZE: usize = 256;

pub fn clahe(src: &GrayImage, clip_limit: f64, tiles: TargetSize) -> Result<GrayImage> {
    tiles.validate()?;
    let (rows, cols) = src.dim();
    if rows == 0 || cols == 0 {
        return Err(Error::ZeroSize {
            width: cols,
            height: rows,
        });
    }

    let padded;
    let lut_src = if let Some((pad_cols, pad_rows)) = lut_padding(rows, cols, tiles) {
        debug!(
            "CLAHE: padding {}x{} by {}x{} for a {} tile grid",
            cols, rows, pad_cols, pad_rows, tiles
        );
        padded = pad_reflect_101(src, pad_cols, pad_rows);
        &padded
    } else {
        src
    };

    let (lut_rows, lut_cols) = lut_src.dim();
    let tile_w = lut_cols / tiles.width;
    let tile_h = lut_rows / tiles.height;
    let tile_area = tile_w * tile_h;

    let clip = clip_count(clip_limit, tile_area);
    let luts = build_tile_luts(lut_src, tiles, tile_w, tile_h, clip);
    Ok(interpolate(src, &luts, tiles, tile_w, tile_h))
}

/// Right/bottom padding for the LUT source. Once either axis misses the grid, both
/// axes are padded by `tiles - len % tiles`, so an axis that already divides evenly
/// gains one whole extra tile.
fn lut_padding(rows: usize, cols: usize, tiles: TargetSize) -> Option<(usize, usize)> {
    if cols % tiles.width == 0 && rows % tiles.height == 0 {
        return None;
    }
    Some((
        tiles.width - cols % tiles.width,
        tiles.height - rows % tiles.height,
    ))
}

/// Per-bin clip count, `None` when clipping is disabled.
fn clip_count(clip_limit: f64, tile_area: usize) -> Option<usize> {
    if clip_limit <= 0.0 {
        return None;
    }
    let limit = clip_limit * tile_area as f64 / HIST_SIZE as f64;
    Some((limit as usize).max(1))
}

/// Extend the image right/bottom with reflect-101 samples.
fn pad_reflect_101(src: &GrayImage, pad_cols: usize, pad_rows: usize) -> GrayImage {
    let (rows, cols) = src.dim();
    Array2::from_shape_fn((rows + pad_rows, cols + pad_cols), |(y, x)| {
        src[[reflect_101(y as isize, rows), reflect_101(x as isize, cols)]]
    })
}

/// One 256-entry LUT per tile, shaped `(tiles_y, tiles_x, 256)`.
fn build_tile_luts(
    src: &GrayImage,
    tiles: TargetSize,
    tile_w: usize,
    tile_h: usize,
    clip: Option<usize>,
) -> Array3<u8> {
    let tile_area = tile_w * tile_h;
    let lut_scale = (HIST_SIZE - 1) as f32 / tile_area as f32;
    let mut luts = Array3::<u8>::zeros((tiles.height, tiles.width, HIST_SIZE));

    for ty in 0..tiles.height {
        for tx in 0..tiles.width {
            let mut hist = [0usize; HIST_SIZE];
            for y in ty * tile_h..(ty + 1) * tile_h {
                for x in tx * tile_w..(tx + 1) * tile_w {
                    hist[src[[y, x]] as usize] += 1;
                }
            }

            if let Some(limit) = clip {
                clip_histogram(&mut hist, limit);
            }

            let mut sum = 0usize;
            for (i, &h) in hist.iter().enumerate() {
                sum += h;
                luts[[ty, tx, i]] = (sum as f32 * lut_scale).round_ties_even().clamp(0.0, 255.0) as u8;
            }
        }
    }
    luts
}

/// Clip every bin at `limit` and spread the excess back over the histogram.
fn clip_histogram(hist: &mut [usize; HIST_SIZE], limit: usize) {
    let mut clipped = 0usize;
    for h in hist.iter_mut() {
        if *h > limit {
            clipped += *h - limit;
            *h = limit;
        }
    }

    let batch = clipped / HIST_SIZE;
    let mut residual = clipped - batch * HIST_SIZE;
    for h in hist.iter_mut() {
        *h += batch;
    }

    if residual != 0 {
        let step = (HIST_SIZE / residual).max(1);
        let mut i = 0;
        while i < HIST_SIZE && residual > 0 {
            hist[i] += 1;
            i += step;
            residual -= 1;
        }
    }
}

fn interpolate(
    src: &GrayImage,
    luts: &Array3<u8>,
    tiles: TargetSize,
    tile_w: usize,
    tile_h: usize,
) -> GrayImage {
    let (rows, cols) = src.dim();
    let inv_tw = 1.0f32 / tile_w as f32;
    let inv_th = 1.0f32 / tile_h as f32;

    // (tile index 1, tile index 2, weight of tile 2) along one axis
    let axis = |pos: usize, inv: f32, count: usize| -> (usize, usize, f32) {
        let f = pos as f32 * inv - 0.5;
        let t1 = f.floor() as isize;
        let t2 = t1 + 1;
        let a = f - t1 as f32;
        let t1 = t1.max(0) as usize;
        let t2 = (t2 as usize).min(count - 1);
        (t1, t2, a)
    };

    let xs: Vec<(usize, usize, f32)> = (0..cols).map(|x| axis(x, inv_tw, tiles.width)).collect();

    let mut dst = Array2::<u8>::zeros((rows, cols));
    for y in 0..rows {
        let (ty1, ty2, ya) = axis(y, inv_th, tiles.height);
        let ya1 = 1.0 - ya;
        for (x, &(tx1, tx2, xa)) in xs.iter().enumerate() {
            let xa1 = 1.0 - xa;
            let v = src[[y, x]] as usize;
            let top = luts[[ty1, tx1, v]] as f32 * xa1 + luts[[ty1, tx2, v]] as f32 * xa;
            let bottom = luts[[ty2, tx1, v]] as f32 * xa1 + luts[[ty2, tx2, v]] as f32 * xa;
            let res = top * ya1 + bottom * ya;
            dst[[y, x]] = res.round_ties_even().clamp(0.0, 255.0) as u8;
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_redistributes_excess() {
        let mut hist = [0usize; HIST_SIZE];
        hist[128] = 1024;
        clip_histogram(&mut hist, 8);
        // 1016 clipped: 3 per bin, 248 left over handed out one per bin from 0
        assert_eq!(hist.iter().sum::<usize>(), 1024);
        assert_eq!(hist[0], 4);
        assert_eq!(hist[128], 12);
        assert_eq!(hist[247], 4);
        assert_eq!(hist[248], 3);
        assert_eq!(hist[255], 3);
    }

    #[test]
    fn flat_image_maps_to_single_value() {
        let flat = Array2::<u8>::from_elem((256, 256), 128);
        let out = clahe(&flat, 2.0, TargetSize::square(8)).unwrap();
        // cumsum(128) = 129*4 + 8 = 524; 524 * 255 / 1024 = 130.49
        assert!(out.iter().all(|&v| v == 130));
    }

    #[test]
    fn unclipped_ramp_is_monotonic_within_a_tile() {
        let ramp = Array2::from_shape_fn((16, 16), |(y, x)| (y * 16 + x) as u8);
        let out = clahe(&ramp, 0.0, TargetSize::square(1)).unwrap();
        // single tile, no clipping: plain histogram equalization of a uniform ramp
        let values: Vec<u8> = out.iter().copied().collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(values[0], 1);
        assert_eq!(values[255], 255);
    }

    #[test]
    fn non_divisible_sizes_are_padded() {
        let img = Array2::from_shape_fn((61, 99), |(y, x)| ((x * 3 + y * 5) % 256) as u8);
        let out = clahe(&img, 2.0, TargetSize::square(8)).unwrap();
        assert_eq!(out.dim(), (61, 99));
    }

    #[test]
    fn one_uneven_axis_pads_both() {
        // 96 columns divide by 8 but still gain a full tile once rows miss the grid
        assert_eq!(lut_padding(61, 96, TargetSize::square(8)), Some((8, 3)));
        assert_eq!(lut_padding(64, 96, TargetSize::square(8)), None);
        assert_eq!(lut_padding(61, 99, TargetSize::square(8)), Some((5, 3)));
    }

    #[test]
    fn lut_tiles_follow_padded_geometry() {
        let img = Array2::from_shape_fn((61, 96), |(y, x)| ((x * 2 + y * 3) % 256) as u8);
        let tiles = TargetSize::square(8);
        let (pad_cols, pad_rows) = lut_padding(61, 96, tiles).unwrap();
        let padded = pad_reflect_101(&img, pad_cols, pad_rows);
        assert_eq!(padded.dim(), (64, 104));
        let (tile_w, tile_h) = (104 / 8, 64 / 8);
        assert_eq!((tile_w, tile_h), (13, 8));

        let clip = clip_count(2.0, tile_w * tile_h);
        let luts = build_tile_luts(&padded, tiles, tile_w, tile_h, clip);
        let expected = interpolate(&img, &luts, tiles, tile_w, tile_h);
        assert_eq!(clahe(&img, 2.0, tiles).unwrap(), expected);
    }

    #[test]
    fn clip_count_truncates_toward_zero() {
        assert_eq!(clip_count(2.0, 1024), Some(8));
        assert_eq!(clip_count(0.0, 1024), None);
        assert_eq!(clip_count(-1.0, 1024), None);
        assert_eq!(clip_count(0.01, 1024), Some(1));
        assert_eq!(clip_count(2.9, 1024), Some(11));
        assert_eq!(clip_count(0.3, 2560), Some(3));
        // 13x8 tiles of a padded 96x61 image
        assert_eq!(clip_count(2.0, 104), Some(1));
        assert_eq!(clip_count(40.0, 104), Some(16));
    }

    #[test]
    fn deterministic() {
        let img = Array2::from_shape_fn((64, 64), |(y, x)| ((x ^ y) * 4 % 256) as u8);
        let a = clahe(&img, 2.0, TargetSize::square(8)).unwrap();
        let b = clahe(&img, 2.0, TargetSize::square(8)).unwrap();
        assert_eq!(a, b);
    }
}
