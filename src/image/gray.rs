//! Grayscale conversion.
//!
//! Luminance is a fixed-point weighted sum of the colour channels, with
//! weights scaled by 2^16 so the shift floors the result exactly like the
//! floating-point weighted sum truncated to an integer. Alpha is ignored.

use super::rgba::ImageRgba8;

const LUMA_R: u32 = 13933;
const LUMA_G: u32 = 46871;
const LUMA_B: u32 = 4732;

/// Luminance byte of a single RGB triple.
#[inline]
pub(crate) fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((LUMA_R * u32::from(r) + LUMA_G * u32::from(g) + LUMA_B * u32::from(b)) >> 16) as u8
}

/// Convert an RGBA view to one luminance byte per pixel.
pub fn grayscale(image: &ImageRgba8) -> Vec<u8> {
    let mut out = Vec::with_capacity(image.w * image.h);
    for y in 0..image.h {
        for x in 0..image.w {
            let [r, g, b, _] = image.pixel(x, y);
            out.push(luma(r, g, b));
        }
    }
    out
}

/// Convert to an RGBA float buffer whose colour channels all hold the
/// luminance, with opaque alpha. Input format for the Sobel filter.
pub(crate) fn grayscale_rgba(image: &ImageRgba8) -> Vec<f32> {
    let mut out = vec![0.0f32; image.data.len()];
    for y in 0..image.h {
        for x in 0..image.w {
            let [r, g, b, _] = image.pixel(x, y);
            let v = f32::from(luma(r, g, b));
            let o = image.offset(x, y);
            out[o] = v;
            out[o + 1] = v;
            out[o + 2] = v;
            out[o + 3] = 255.0;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: usize, h: usize, rgba: [u8; 4]) -> Vec<u8> {
        rgba.iter().copied().cycle().take(4 * w * h).collect()
    }

    #[test]
    fn pure_gray_round_trips() {
        for v in [0u8, 1, 10, 127, 128, 200, 255] {
            assert_eq!(luma(v, v, v), v, "luminance of gray {v} should be {v}");
        }
    }

    #[test]
    fn grayscale_converts_every_pixel() {
        let data = solid(4, 3, [10, 10, 10, 255]);
        let img = ImageRgba8::new(&data, 4, 3).unwrap();
        let gray = grayscale(&img);
        assert_eq!(gray.len(), 12);
        assert!(gray.iter().all(|&v| v == 10));
    }

    #[test]
    fn weights_sum_to_one() {
        // Scaled weights must cover the full 16-bit range so that pure gray
        // inputs are preserved exactly.
        assert_eq!(LUMA_R + LUMA_G + LUMA_B, 1 << 16);
    }

    #[test]
    fn grayscale_rgba_is_opaque() {
        let data = solid(2, 2, [50, 100, 150, 0]);
        let img = ImageRgba8::new(&data, 2, 2).unwrap();
        let gray = grayscale_rgba(&img);
        for px in gray.chunks_exact(4) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[3], 255.0);
        }
    }
}
