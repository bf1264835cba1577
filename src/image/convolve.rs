//! 1-D convolution over RGBA float channels.
//!
//! Kernels are weight vectors of odd length. Borders are handled by
//! nearest-edge replication. The separable form runs the vertical pass
//! first, then the horizontal pass.

/// Convolve each row with `weights`, replicating edge pixels.
///
/// `opaque` forces the output alpha to 255 instead of the convolved alpha.
pub fn horizontal_convolve(
    pixels: &[f32],
    width: usize,
    height: usize,
    weights: &[f32],
    opaque: bool,
) -> Vec<f32> {
    let half = weights.len() / 2;
    let mut output = vec![0.0f32; width * height * 4];
    let alpha_fac = if opaque { 1.0 } else { 0.0 };
    for y in 0..height {
        for x in 0..width {
            let offset = (y * width + x) * 4;
            let mut acc = [0.0f32; 4];
            for (c, &weight) in weights.iter().enumerate() {
                let sx = (x + c).saturating_sub(half).min(width - 1);
                let poffset = (y * width + sx) * 4;
                for ch in 0..4 {
                    acc[ch] += pixels[poffset + ch] * weight;
                }
            }
            output[offset] = acc[0];
            output[offset + 1] = acc[1];
            output[offset + 2] = acc[2];
            output[offset + 3] = acc[3] + alpha_fac * (255.0 - acc[3]);
        }
    }
    output
}

/// Convolve each column with `weights`, replicating edge pixels.
pub fn vertical_convolve(
    pixels: &[f32],
    width: usize,
    height: usize,
    weights: &[f32],
    opaque: bool,
) -> Vec<f32> {
    let half = weights.len() / 2;
    let mut output = vec![0.0f32; width * height * 4];
    let alpha_fac = if opaque { 1.0 } else { 0.0 };
    for y in 0..height {
        for x in 0..width {
            let offset = (y * width + x) * 4;
            let mut acc = [0.0f32; 4];
            for (c, &weight) in weights.iter().enumerate() {
                let sy = (y + c).saturating_sub(half).min(height - 1);
                let poffset = (sy * width + x) * 4;
                for ch in 0..4 {
                    acc[ch] += pixels[poffset + ch] * weight;
                }
            }
            output[offset] = acc[0];
            output[offset + 1] = acc[1];
            output[offset + 2] = acc[2];
            output[offset + 3] = acc[3] + alpha_fac * (255.0 - acc[3]);
        }
    }
    output
}

/// Separable convolution: vertical pass with `vert_weights`, then
/// horizontal pass with `horiz_weights`.
pub fn separable_convolve(
    pixels: &[f32],
    width: usize,
    height: usize,
    horiz_weights: &[f32],
    vert_weights: &[f32],
    opaque: bool,
) -> Vec<f32> {
    let vertical = vertical_convolve(pixels, width, height, vert_weights, opaque);
    horizontal_convolve(&vertical, width, height, horiz_weights, opaque)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; width * height * 4];
        for y in 0..height {
            for x in 0..width {
                let o = (y * width + x) * 4;
                let v = (y * width + x) as f32;
                out[o] = v;
                out[o + 1] = v;
                out[o + 2] = v;
                out[o + 3] = 255.0;
            }
        }
        out
    }

    #[test]
    fn identity_kernel_preserves_pixels() {
        let input = ramp(4, 3);
        let output = horizontal_convolve(&input, 4, 3, &[0.0, 1.0, 0.0], false);
        assert_eq!(input, output);
        let output = vertical_convolve(&input, 4, 3, &[0.0, 1.0, 0.0], false);
        assert_eq!(input, output);
    }

    #[test]
    fn borders_replicate_edge_pixels() {
        // Row [0, 1, 2] with box kernel: left border reads pixel 0 twice.
        let input = ramp(3, 1);
        let output = horizontal_convolve(&input, 3, 1, &[1.0, 1.0, 1.0], false);
        assert_eq!(output[0], 0.0 + 0.0 + 1.0);
        assert_eq!(output[4], 0.0 + 1.0 + 2.0);
        assert_eq!(output[8], 1.0 + 2.0 + 2.0);
    }

    #[test]
    fn opaque_forces_alpha() {
        let input = ramp(2, 2);
        let output = horizontal_convolve(&input, 2, 2, &[-1.0, 0.0, 1.0], true);
        for px in output.chunks_exact(4) {
            assert_eq!(px[3], 255.0);
        }
    }
}
