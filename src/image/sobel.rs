//! Sobel gradient magnitude.
//!
//! Both gradients are computed separably from the sign vector `[-1, 0, 1]`
//! and the smoothing vector `[1, 2, 1]`. The output buffer keeps the RGBA
//! layout: every colour channel holds the magnitude, alpha is opaque.

use super::convolve::separable_convolve;
use super::gray::grayscale_rgba;
use super::rgba::ImageRgba8;

const SOBEL_SIGN: [f32; 3] = [-1.0, 0.0, 1.0];
const SOBEL_SMOOTH: [f32; 3] = [1.0, 2.0, 1.0];

/// Gradient magnitude `sqrt(gx^2 + gy^2)` of the grayscale image.
pub fn sobel(image: &ImageRgba8) -> Vec<f32> {
    let gray = grayscale_rgba(image);
    let gx = separable_convolve(&gray, image.w, image.h, &SOBEL_SIGN, &SOBEL_SMOOTH, false);
    let gy = separable_convolve(&gray, image.w, image.h, &SOBEL_SMOOTH, &SOBEL_SIGN, false);
    let mut output = vec![0.0f32; gray.len()];
    for i in (0..output.len()).step_by(4) {
        let p = (gx[i] * gx[i] + gy[i] * gy[i]).sqrt();
        output[i] = p;
        output[i + 1] = p;
        output[i + 2] = p;
        output[i + 3] = 255.0;
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_image_has_zero_gradient() {
        let data: Vec<u8> = [77u8, 77, 77, 255]
            .iter()
            .copied()
            .cycle()
            .take(4 * 6 * 5)
            .collect();
        let img = ImageRgba8::new(&data, 6, 5).unwrap();
        let magnitude = sobel(&img);
        for px in magnitude.chunks_exact(4) {
            assert_eq!(px[0], 0.0);
            assert_eq!(px[1], 0.0);
            assert_eq!(px[2], 0.0);
            assert_eq!(px[3], 255.0);
        }
    }

    #[test]
    fn vertical_step_has_nonzero_response() {
        // Left half black, right half white: columns around the step carry
        // the response, far columns are flat.
        let w = 8;
        let h = 4;
        let mut data = vec![0u8; 4 * w * h];
        for y in 0..h {
            for x in w / 2..w {
                let o = (y * w + x) * 4;
                data[o] = 255;
                data[o + 1] = 255;
                data[o + 2] = 255;
                data[o + 3] = 255;
            }
        }
        let img = ImageRgba8::new(&data, w, h).unwrap();
        let magnitude = sobel(&img);
        let at = |x: usize, y: usize| magnitude[(y * w + x) * 4];
        assert!(at(w / 2, h / 2) > 0.0);
        assert_eq!(at(0, h / 2), 0.0);
        assert_eq!(at(w - 1, h / 2), 0.0);
    }
}
