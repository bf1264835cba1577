/// Generates a solid RGBA frame.
pub fn solid_rgba(width: usize, height: usize, rgba: [u8; 4]) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    rgba.iter().copied().cycle().take(4 * width * height).collect()
}

/// Generates a frame that is black left of `split` and white from `split` on.
pub fn vertical_split_rgba(width: usize, height: usize, split: usize) -> Vec<u8> {
    assert!(split <= width, "split column must lie inside the image");
    let mut img = vec![0u8; 4 * width * height];
    for y in 0..height {
        for x in 0..width {
            let v = if x >= split { 255u8 } else { 0u8 };
            let o = (y * width + x) * 4;
            img[o] = v;
            img[o + 1] = v;
            img[o + 2] = v;
            img[o + 3] = 255;
        }
    }
    img
}

/// Generates deterministic gray noise from a linear congruential generator.
pub fn noise_rgba(width: usize, height: usize, mut seed: u32) -> Vec<u8> {
    let mut img = vec![0u8; 4 * width * height];
    for px in img.chunks_exact_mut(4) {
        seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
        let v = (seed >> 24) as u8;
        px[0] = v;
        px[1] = v;
        px[2] = v;
        px[3] = 255;
    }
    img
}
