//! Detector driver: multi-scale window sweep over integral images.
//!
//! Overview
//! - Builds the integral tables (plain, squared, rotated, and Sobel when
//!   edge pruning is on) in one pass over the RGBA input.
//! - Grows a scaled copy of the cascade base window by `scale_factor` per
//!   sweep and slides it across every position at the current step.
//! - Optionally skips windows whose Sobel edge density falls below
//!   `edges_density` before paying for a cascade evaluation.
//! - Hands the raw hits to the rectangle merger.
//!
//! Modules
//! - `options` – the [`DetectorParams`] knobs and their validation.
//! - `pipeline` – the main [`HaarDetector`] implementation.

pub mod options;
mod pipeline;

pub use options::DetectorParams;
pub use pipeline::HaarDetector;

use crate::cascade::Cascade;
use crate::error::Result;
use crate::image::ImageRgba8;
use crate::types::Detection;

/// Detect objects in a raw RGBA frame.
///
/// `pixels` must hold exactly `4 * width * height` bytes. This is the
/// one-call convenience wrapper around [`HaarDetector`]; parameters and the
/// buffer are validated before any work happens.
pub fn detect(
    pixels: &[u8],
    width: usize,
    height: usize,
    cascade: &Cascade,
    params: &DetectorParams,
) -> Result<Vec<Detection>> {
    let image = ImageRgba8::new(pixels, width, height)?;
    let detector = HaarDetector::new(params.clone())?;
    Ok(detector.detect(image, cascade))
}
