//! Integral images (summed-area tables) over the grayscale input.
//!
//! Cell `(x, y)` of a plain table stores the sum over the inclusive
//! rectangle `[0, x] × [0, y]`, so any axis-aligned rectangle sum costs four
//! lookups. The rotated table (RSAT) follows the recurrence
//! `R[x,y] = R[x-1,y-1] + R[x+1,y-1] - R[x,y-2] + p + p_above` with every
//! out-of-range read treated as zero, and serves 45°-rotated rectangle sums.
//!
//! Cells are `i64`: squared luminance sums exceed 32 bits already around
//! VGA resolution, and plain sums near 2900×2900, so the tables are widened
//! once instead of wrapping silently on large frames.

use crate::image::gray::luma;
use crate::image::{sobel, ImageRgba8};

/// Integral tables computed for one frame.
///
/// The Sobel table is present only when edge-density pruning asked for it.
#[derive(Clone, Debug)]
pub struct IntegralImages {
    width: usize,
    height: usize,
    pub sat: Vec<i64>,
    pub squared: Vec<i64>,
    pub tilted: Vec<i64>,
    pub sobel: Option<Vec<i64>>,
}

impl IntegralImages {
    /// Build the tables the detector needs in one pass over the pixels.
    pub fn build(image: &ImageRgba8, with_sobel: bool) -> Self {
        let n = image.w * image.h;
        let mut sat = vec![0i64; n];
        let mut squared = vec![0i64; n];
        let mut tilted = vec![0i64; n];
        let mut sobel_sat = if with_sobel { Some(vec![0i64; n]) } else { None };
        compute_integral_images(
            image,
            Some(&mut sat),
            Some(&mut squared),
            Some(&mut tilted),
            sobel_sat.as_deref_mut(),
        );
        Self {
            width: image.w,
            height: image.h,
            sat,
            squared,
            tilted,
            sobel: sobel_sat,
        }
    }

    /// Table width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Table height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Luminance sum over the inclusive rectangle `[x0, x1] × [y0, y1]`.
    pub fn rect_sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> i64 {
        rect_sum(&self.sat, self.width, x0, y0, x1, y1)
    }

    /// Squared-luminance sum over the inclusive rectangle `[x0, x1] × [y0, y1]`.
    pub fn squared_rect_sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> i64 {
        rect_sum(&self.squared, self.width, x0, y0, x1, y1)
    }
}

/// Fill whichever output tables are present in one pass over the pixels.
///
/// Every table has `width * height` cells. The Sobel table integrates the
/// gradient magnitude clamped to a byte per pixel, which requires one
/// Sobel filter pass over the input up front; the other three integrate the
/// luminance directly.
pub fn compute_integral_images(
    image: &ImageRgba8,
    mut sat: Option<&mut [i64]>,
    mut squared: Option<&mut [i64]>,
    mut tilted: Option<&mut [i64]>,
    mut sobel_sat: Option<&mut [i64]>,
) {
    let (w, h) = (image.w, image.h);
    let magnitude = if sobel_sat.is_some() {
        Some(sobel(image))
    } else {
        None
    };
    for y in 0..h {
        for x in 0..w {
            let [r, g, b, _] = image.pixel(x, y);
            let p = i64::from(luma(r, g, b));
            if let Some(out) = sat.as_deref_mut() {
                sat_cell(out, w, x, y, p);
            }
            if let Some(out) = squared.as_deref_mut() {
                sat_cell(out, w, x, y, p * p);
            }
            if let Some(out) = tilted.as_deref_mut() {
                let above = if y > 0 {
                    let [r, g, b, _] = image.pixel(x, y - 1);
                    i64::from(luma(r, g, b))
                } else {
                    0
                };
                rsat_cell(out, w, x, y, p, above);
            }
            if let (Some(out), Some(mag)) = (sobel_sat.as_deref_mut(), magnitude.as_ref()) {
                // The table integrates the magnitude as a byte; raw step
                // responses exceed 255 with the unnormalized kernels, and
                // the edge-density prune divides by 255 per pixel.
                let byte = mag[(y * w + x) * 4].clamp(0.0, 255.0) as u8;
                sat_cell(out, w, x, y, i64::from(byte));
            }
        }
    }
}

#[inline]
fn sat_cell(out: &mut [i64], width: usize, x: usize, y: usize, value: i64) {
    let idx = y * width + x;
    let up = if y > 0 { out[idx - width] } else { 0 };
    let left = if x > 0 { out[idx - 1] } else { 0 };
    let up_left = if x > 0 && y > 0 {
        out[idx - width - 1]
    } else {
        0
    };
    out[idx] = up + left - up_left + value;
}

#[inline]
fn rsat_cell(out: &mut [i64], width: usize, x: usize, y: usize, value: i64, value_above: i64) {
    let idx = y * width + x;
    let up_left = if x > 0 && y > 0 {
        out[idx - width - 1]
    } else {
        0
    };
    let up_right = if x + 1 < width && y > 0 {
        out[idx - width + 1]
    } else {
        0
    };
    let two_up = if y > 1 { out[idx - 2 * width] } else { 0 };
    out[idx] = up_left + up_right - two_up + value + value_above;
}

/// Sum over the inclusive rectangle `[x0, x1] × [y0, y1]` of a SAT table.
pub fn rect_sum(table: &[i64], width: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> i64 {
    let bottom_right = table[y1 * width + x1];
    let top = if y0 > 0 {
        table[(y0 - 1) * width + x1]
    } else {
        0
    };
    let left = if x0 > 0 {
        table[y1 * width + x0 - 1]
    } else {
        0
    };
    let top_left = if x0 > 0 && y0 > 0 {
        table[(y0 - 1) * width + x0 - 1]
    } else {
        0
    };
    bottom_right - top - left + top_left
}
