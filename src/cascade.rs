//! Flat Haar-cascade data and the staged per-window evaluator.
//!
//! A cascade is a single contiguous `f64` sequence:
//!
//! ```text
//! [ base_width, base_height,
//!   stage_threshold, node_count,
//!     tilted, rect_count,
//!       x, y, w, h, weight,      (rect_count times)
//!     node_threshold, left_value, right_value,   (node_count times)
//!   ... more stages until end of array ]
//! ```
//!
//! Rectangle coordinates live in base-window units and are rescaled per
//! candidate window. The layout is kept flat for cache locality and
//! zero-copy loading; a cursor walks it instead of reifying stages into
//! heap objects.

use crate::error::{Error, Result};
use crate::integral::IntegralImages;

/// Trained Haar cascade in the flat numeric layout.
#[derive(Clone, Debug)]
pub struct Cascade {
    data: Box<[f64]>,
}

impl Cascade {
    /// Wrap a flat cascade, rejecting data without the two-value header or
    /// with a degenerate base window. The stage data itself is trusted.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.len() < 2 {
            return Err(Error::CascadeTooShort { len: values.len() });
        }
        if !values[0].is_finite() || values[0] <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "base_width",
                value: values[0],
            });
        }
        if !values[1].is_finite() || values[1] <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "base_height",
                value: values[1],
            });
        }
        Ok(Self {
            data: values.into_boxed_slice(),
        })
    }

    /// Base window width in pixels.
    pub fn base_width(&self) -> f64 {
        self.data[0]
    }

    /// Base window height in pixels.
    pub fn base_height(&self) -> f64 {
        self.data[1]
    }

    /// Raw flat values.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Whether any stage follows the base-window header. A stage-less
    /// cascade carries no evidence and accepts no window.
    pub fn has_stages(&self) -> bool {
        self.data.len() > 2
    }
}

/// Position cursor over the flat cascade values.
struct Cursor<'a> {
    data: &'a [f64],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn after_header(data: &'a [f64]) -> Self {
        Self { data, pos: 2 }
    }

    #[inline]
    fn next(&mut self) -> f64 {
        let v = self.data[self.pos];
        self.pos += 1;
        v
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }
}

/// Round half up, then truncate toward zero.
#[inline]
fn round_coord(v: f64) -> i64 {
    (v + 0.5) as i64
}

/// Evaluate every stage over the window with top-left `(i, j)` (row,
/// column), block size `(block_w, block_h)` pixels, and scale `scale`
/// relative to the cascade base window.
///
/// Each node compares its weighted rectangle sum, normalised by window area
/// and standard deviation, against its threshold; a stage whose node sum
/// falls below the stage threshold rejects the window immediately.
/// Rectangle coordinates are trusted to stay inside the window.
pub(crate) fn evaluate_window(
    cascade: &Cascade,
    integrals: &IntegralImages,
    i: usize,
    j: usize,
    block_w: usize,
    block_h: usize,
    scale: f64,
) -> bool {
    if !cascade.has_stages() {
        return false;
    }
    let width = integrals.width();
    let inverse_area = 1.0 / (block_w * block_h) as f64;
    let wb_a = i * width + j;
    let wb_b = wb_a + block_w;
    let wb_d = wb_a + block_h * width;
    let wb_c = wb_d + block_w;
    let sat = &integrals.sat;
    let squared = &integrals.squared;
    let tilted = &integrals.tilted;

    let mean = (sat[wb_a] - sat[wb_b] - sat[wb_d] + sat[wb_c]) as f64 * inverse_area;
    let variance =
        (squared[wb_a] - squared[wb_b] - squared[wb_d] + squared[wb_c]) as f64 * inverse_area
            - mean * mean;
    let std_dev = if variance > 0.0 { variance.sqrt() } else { 1.0 };

    let mut cursor = Cursor::after_header(cascade.values());
    while !cursor.at_end() {
        let stage_threshold = cursor.next();
        let mut node_count = cursor.next() as usize;
        let mut stage_sum = 0.0;
        while node_count > 0 {
            node_count -= 1;
            let tilted_node = cursor.next() != 0.0;
            let rect_count = cursor.next() as usize;
            let mut rects_sum = 0.0;
            for _ in 0..rect_count {
                let rect_left = round_coord(j as f64 + cursor.next() * scale);
                let rect_top = round_coord(i as f64 + cursor.next() * scale);
                let rect_width = round_coord(cursor.next() * scale);
                let rect_height = round_coord(cursor.next() * scale);
                let weight = cursor.next();
                let sum = if tilted_node {
                    tilted_rect_sum(tilted, width, rect_left, rect_top, rect_width, rect_height)
                } else {
                    upright_rect_sum(sat, width, rect_left, rect_top, rect_width, rect_height)
                };
                rects_sum += sum as f64 * weight;
            }
            let node_threshold = cursor.next();
            let left_value = cursor.next();
            let right_value = cursor.next();
            stage_sum += if rects_sum * inverse_area < node_threshold * std_dev {
                left_value
            } else {
                right_value
            };
        }
        if stage_sum < stage_threshold {
            return false;
        }
    }
    true
}

#[inline]
fn upright_rect_sum(sat: &[i64], width: usize, left: i64, top: i64, w: i64, h: i64) -> i64 {
    let a = (top * width as i64 + left) as usize;
    let b = a + w as usize;
    let d = a + h as usize * width;
    let c = d + w as usize;
    sat[a] - sat[b] - sat[d] + sat[c]
}

#[inline]
fn tilted_rect_sum(rsat: &[i64], width: usize, left: i64, top: i64, w: i64, h: i64) -> i64 {
    let w1 = rsat_at(rsat, width, left - h + w, top + w + h - 1);
    let w2 = rsat_at(rsat, width, left, top - 1);
    let w3 = rsat_at(rsat, width, left - h, top + h - 1);
    let w4 = rsat_at(rsat, width, left + w, top + w - 1);
    w1 + w2 - w3 - w4
}

/// Cells outside the image sum to zero by construction of the rotated
/// table. The corner formula routinely lands left of the image for rects
/// taller than wide near the window's left edge, so both axes are guarded.
#[inline]
fn rsat_at(rsat: &[i64], width: usize, x: i64, y: i64) -> i64 {
    if x < 0 || x >= width as i64 || y < 0 {
        return 0;
    }
    let idx = (y * width as i64 + x) as usize;
    if idx >= rsat.len() {
        return 0;
    }
    rsat[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageRgba8;

    fn gray_frame(v: u8, w: usize, h: usize) -> Vec<u8> {
        [v, v, v, 255].iter().copied().cycle().take(4 * w * h).collect()
    }

    /// Single stage, single node: fires when the window mean, relative to
    /// the standard deviation, reaches `threshold`.
    fn brightness_cascade(base: f64, threshold: f64) -> Cascade {
        Cascade::from_values(vec![
            base, base, // base window
            0.5, 1.0, // stage threshold, node count
            0.0, 1.0, // upright, one rect
            0.0, 0.0, base, base, 1.0, // full-window rect, weight 1
            threshold, 0.0, 1.0, // node threshold, left, right
        ])
        .unwrap()
    }

    #[test]
    fn header_is_required() {
        assert!(matches!(
            Cascade::from_values(vec![]),
            Err(Error::CascadeTooShort { len: 0 })
        ));
        assert!(matches!(
            Cascade::from_values(vec![20.0]),
            Err(Error::CascadeTooShort { len: 1 })
        ));
        let cascade = Cascade::from_values(vec![20.0, 24.0]).unwrap();
        assert_eq!(cascade.base_width(), 20.0);
        assert_eq!(cascade.base_height(), 24.0);
        assert!(!cascade.has_stages());
    }

    #[test]
    fn degenerate_base_window_is_rejected() {
        assert!(matches!(
            Cascade::from_values(vec![0.0, 24.0]),
            Err(Error::InvalidParameter {
                name: "base_width",
                ..
            })
        ));
        assert!(matches!(
            Cascade::from_values(vec![24.0, f64::NAN]),
            Err(Error::InvalidParameter {
                name: "base_height",
                ..
            })
        ));
    }

    #[test]
    fn stageless_cascade_accepts_nothing() {
        let data = gray_frame(200, 8, 8);
        let img = ImageRgba8::new(&data, 8, 8).unwrap();
        let integrals = IntegralImages::build(&img, false);
        let cascade = Cascade::from_values(vec![2.0, 2.0]).unwrap();
        assert!(!evaluate_window(&cascade, &integrals, 0, 0, 4, 4, 2.0));
    }

    #[test]
    fn brightness_node_splits_on_mean() {
        let cascade = brightness_cascade(2.0, 128.0);

        let bright = gray_frame(255, 8, 8);
        let img = ImageRgba8::new(&bright, 8, 8).unwrap();
        let integrals = IntegralImages::build(&img, false);
        assert!(evaluate_window(&cascade, &integrals, 0, 0, 4, 4, 2.0));

        let dark = gray_frame(0, 8, 8);
        let img = ImageRgba8::new(&dark, 8, 8).unwrap();
        let integrals = IntegralImages::build(&img, false);
        assert!(!evaluate_window(&cascade, &integrals, 0, 0, 4, 4, 2.0));
    }

    #[test]
    fn failed_stage_rejects_early() {
        // Stage threshold above every reachable node payoff.
        let cascade = Cascade::from_values(vec![
            2.0, 2.0, //
            10.0, 1.0, //
            0.0, 1.0, //
            0.0, 0.0, 2.0, 2.0, 0.0, //
            0.0, 0.0, 0.0, //
        ])
        .unwrap();
        let data = gray_frame(200, 8, 8);
        let img = ImageRgba8::new(&data, 8, 8).unwrap();
        let integrals = IntegralImages::build(&img, false);
        assert!(!evaluate_window(&cascade, &integrals, 0, 0, 4, 4, 2.0));
    }

    #[test]
    fn tilted_node_reads_rotated_table() {
        // One tilted rect touching the window top row: the T-1 corner read
        // falls above the image and must resolve to zero, not panic.
        let cascade = Cascade::from_values(vec![
            2.0, 2.0, //
            0.5, 1.0, //
            1.0, 1.0, //
            1.0, 0.0, 1.0, 1.0, 1.0, //
            -1.0e6, 0.0, 1.0, //
        ])
        .unwrap();
        let data = gray_frame(100, 8, 8);
        let img = ImageRgba8::new(&data, 8, 8).unwrap();
        let integrals = IntegralImages::build(&img, false);
        // Huge negative threshold: the node always takes the right branch,
        // so acceptance proves the rotated sum was computed.
        assert!(evaluate_window(&cascade, &integrals, 0, 0, 4, 4, 2.0));
    }

    #[test]
    fn tilted_rect_on_left_edge_zeroes_out_of_image_corners() {
        // A taller-than-wide tilted rect at the window origin: with
        // `left=0, top=0, w=2, h=4` three of the four corner reads land
        // left of or above the image (`w1=(-2,5)`, `w2=(0,-1)`,
        // `w3=(-4,3)`) and must contribute zero, leaving the sum at
        // `-R(2,1)`. On a uniform value-100 frame `R(2,1) = 400`, so the
        // node sees `rects_sum * inverse_area = -400 / 16 = -25`; two
        // thresholds bracketing that value pin the corner handling.
        let tilted_cascade = |threshold: f64| {
            Cascade::from_values(vec![
                2.0, 2.0, //
                0.5, 1.0, //
                1.0, 1.0, //
                0.0, 0.0, 1.0, 2.0, 1.0, //
                threshold, 1.0, 0.0, //
            ])
            .unwrap()
        };
        let data = gray_frame(100, 8, 8);
        let img = ImageRgba8::new(&data, 8, 8).unwrap();
        let integrals = IntegralImages::build(&img, false);

        // -25 < -24: the node takes the left branch and the stage passes.
        assert!(evaluate_window(
            &tilted_cascade(-24.0),
            &integrals,
            0,
            0,
            4,
            4,
            2.0
        ));
        // -25 < -26 fails: the right branch yields nothing and the stage
        // rejects.
        assert!(!evaluate_window(
            &tilted_cascade(-26.0),
            &integrals,
            0,
            0,
            4,
            4,
            2.0
        ));
    }
}
