use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use ndarray::Array2;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{GrayImage, ResizeAlgorithm, TargetSize};

// Linear interpolation weights are carried in 11-bit fixed point
const COEF_BITS: u32 = 11;
const COEF_SCALE: f32 = (1 << COEF_BITS) as f32;

/// Scale `src` to exactly `target` using the requested algorithm.
pub fn resize_gray(src: &GrayImage, target: TargetSize, alg: ResizeAlgorithm) -> Result<GrayImage> {
    target.validate()?;
    let (rows, cols) = src.dim();
    if rows == 0 || cols == 0 {
        return Err(Error::ZeroSize {
            width: cols,
            height: rows,
        });
    }

    debug!(
        "Resizing {}x{} -> {} ({})",
        cols, rows, target, alg
    );

    match alg {
        ResizeAlgorithm::Area => Ok(resize_area(src, target.width, target.height)),
        ResizeAlgorithm::Bilinear => {
            resize_u8_image(src, target, ResizeAlg::Convolution(FilterType::Bilinear))
        }
        ResizeAlgorithm::Lanczos3 => {
            resize_u8_image(src, target, ResizeAlg::Convolution(FilterType::Lanczos3))
        }
    }
}

fn resize_u8_image(src: &GrayImage, target: TargetSize, alg: ResizeAlg) -> Result<GrayImage> {
    let (rows, cols) = src.dim();
    let resize_options = ResizeOptions::new().resize_alg(alg);
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(
        cols as u32,
        rows as u32,
        src.iter().copied().collect(),
        PixelType::U8,
    )
    .map_err(Error::external)?;
    let mut dst_image = Image::new(target.width as u32, target.height as u32, PixelType::U8);
    resizer
        .resize(&src_image, &mut dst_image, &resize_options)
        .map_err(Error::external)?;

    Ok(Array2::from_shape_vec(
        (target.height, target.width),
        dst_image.into_vec(),
    )?)
}

/// Area-averaging resize. Shrinking averages the covered source pixels; enlarging
/// falls back to a linear blend with area-style weights.
pub fn resize_area(src: &GrayImage, dst_cols: usize, dst_rows: usize) -> GrayImage {
    let (rows, cols) = src.dim();
    if rows == dst_rows && cols == dst_cols {
        return src.clone();
    }

    let scale_x = 1.0 / (dst_cols as f64 / cols as f64);
    let scale_y = 1.0 / (dst_rows as f64 / rows as f64);

    if scale_x >= 1.0 && scale_y >= 1.0 {
        let iscale_x = scale_x.round() as usize;
        let iscale_y = scale_y.round() as usize;
        let is_integer = (scale_x - iscale_x as f64).abs() < f64::EPSILON
            && (scale_y - iscale_y as f64).abs() < f64::EPSILON;
        if is_integer {
            return resize_area_fast(src, iscale_x, iscale_y, dst_cols, dst_rows);
        }
        return resize_area_fractional(src, scale_x, scale_y, dst_cols, dst_rows);
    }

    resize_area_enlarge(src, scale_x, scale_y, dst_cols, dst_rows)
}

/// Integer shrink factors: plain block average.
fn resize_area_fast(
    src: &GrayImage,
    fx: usize,
    fy: usize,
    dst_cols: usize,
    dst_rows: usize,
) -> GrayImage {
    let area = (fx * fy) as u32;
    let inv_area = 1.0f32 / area as f32;
    Array2::from_shape_fn((dst_rows, dst_cols), |(dy, dx)| {
        let mut sum = 0u32;
        for sy in dy * fy..(dy + 1) * fy {
            for sx in dx * fx..(dx + 1) * fx {
                sum += src[[sy, sx]] as u32;
            }
        }
        if fx == 2 && fy == 2 {
            ((sum + 2) >> 2) as u8
        } else {
            round_to_u8(sum as f32 * inv_area)
        }
    })
}

#[derive(Debug, Clone, Copy)]
struct AreaWeight {
    dst: usize,
    src: usize,
    alpha: f32,
}

/// Source pixels (and their covered fraction) contributing to each destination index.
fn area_weights(src_len: usize, dst_len: usize, scale: f64) -> Vec<AreaWeight> {
    let mut tab = Vec::with_capacity(src_len * 2);
    for d in 0..dst_len {
        let fs1 = d as f64 * scale;
        let fs2 = fs1 + scale;
        let cell = scale.min(src_len as f64 - fs1);

        let mut s1 = fs1.ceil() as usize;
        let s2 = (fs2.floor() as usize).min(src_len - 1);
        s1 = s1.min(s2);

        if s1 as f64 - fs1 > 1e-3 {
            tab.push(AreaWeight {
                dst: d,
                src: s1 - 1,
                alpha: ((s1 as f64 - fs1) / cell) as f32,
            });
        }
        for s in s1..s2 {
            tab.push(AreaWeight {
                dst: d,
                src: s,
                alpha: (1.0 / cell) as f32,
            });
        }
        if fs2 - s2 as f64 > 1e-3 {
            tab.push(AreaWeight {
                dst: d,
                src: s2,
                alpha: ((fs2 - s2 as f64).min(1.0).min(cell) / cell) as f32,
            });
        }
    }
    tab
}

/// Non-integer shrink: fractional coverage, separable accumulation in f32.
fn resize_area_fractional(
    src: &GrayImage,
    scale_x: f64,
    scale_y: f64,
    dst_cols: usize,
    dst_rows: usize,
) -> GrayImage {
    let (rows, cols) = src.dim();
    let xtab = area_weights(cols, dst_cols, scale_x);
    let ytab = area_weights(rows, dst_rows, scale_y);

    let mut dst = Array2::<u8>::zeros((dst_rows, dst_cols));
    let mut buf = vec![0f32; dst_cols];
    let mut sum = vec![0f32; dst_cols];
    let mut current: Option<usize> = None;

    for yw in &ytab {
        buf.iter_mut().for_each(|b| *b = 0.0);
        for xw in &xtab {
            buf[xw.dst] += src[[yw.src, xw.src]] as f32 * xw.alpha;
        }

        if current != Some(yw.dst) {
            if let Some(prev) = current {
                flush_row(&mut dst, prev, &sum);
            }
            for (s, b) in sum.iter_mut().zip(&buf) {
                *s = b * yw.alpha;
            }
            current = Some(yw.dst);
        } else {
            for (s, b) in sum.iter_mut().zip(&buf) {
                *s += b * yw.alpha;
            }
        }
    }
    if let Some(prev) = current {
        flush_row(&mut dst, prev, &sum);
    }
    dst
}

fn flush_row(dst: &mut GrayImage, row: usize, sum: &[f32]) {
    for (d, &s) in dst.row_mut(row).iter_mut().zip(sum) {
        *d = round_to_u8(s);
    }
}

/// Per-axis linear taps for enlarging: (first source index, fixed-point weights).
fn enlarge_taps(src_len: usize, dst_len: usize, scale: f64) -> Vec<(usize, [i32; 2])> {
    let inv_scale = 1.0 / scale;
    (0..dst_len)
        .map(|d| {
            let mut s = (d as f64 * scale).floor() as isize;
            let mut f = ((d + 1) as f64 - (s + 1) as f64 * inv_scale) as f32;
            f = if f <= 0.0 { 0.0 } else { f - f.floor() };
            if s < 0 {
                s = 0;
                f = 0.0;
            }
            if s >= src_len as isize - 1 {
                s = src_len as isize - 1;
                f = 0.0;
            }
            let w0 = ((1.0 - f) * COEF_SCALE).round_ties_even() as i32;
            let w1 = (f * COEF_SCALE).round_ties_even() as i32;
            (s as usize, [w0, w1])
        })
        .collect()
}

fn resize_area_enlarge(
    src: &GrayImage,
    scale_x: f64,
    scale_y: f64,
    dst_cols: usize,
    dst_rows: usize,
) -> GrayImage {
    let (rows, cols) = src.dim();
    let xtaps = enlarge_taps(cols, dst_cols, scale_x);
    let ytaps = enlarge_taps(rows, dst_rows, scale_y);

    let hrow = |sy: usize| -> Vec<i64> {
        xtaps
            .iter()
            .map(|&(sx, [a0, a1])| {
                let sx1 = (sx + 1).min(cols - 1);
                src[[sy, sx]] as i64 * a0 as i64 + src[[sy, sx1]] as i64 * a1 as i64
            })
            .collect()
    };

    let shift = 2 * COEF_BITS;
    let mut dst = Array2::<u8>::zeros((dst_rows, dst_cols));
    for (dy, &(sy, [b0, b1])) in ytaps.iter().enumerate() {
        let r0 = hrow(sy);
        let r1 = hrow((sy + 1).min(rows - 1));
        for (dx, out) in dst.row_mut(dy).iter_mut().enumerate() {
            let v = (r0[dx] * b0 as i64 + r1[dx] * b1 as i64 + (1 << (shift - 1))) >> shift;
            *out = v.clamp(0, 255) as u8;
        }
    }
    dst
}

#[inline]
fn round_to_u8(v: f32) -> u8 {
    v.round_ties_even().clamp(0.0, 255.0) as u8
}
