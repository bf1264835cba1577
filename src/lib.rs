#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod cascade;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod merge;
pub mod tracker;
pub mod types;

// “Expert” modules – still public, but considered unstable internals.
pub mod integral;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::cascade::Cascade;
pub use crate::detector::{detect, DetectorParams, HaarDetector};
pub use crate::types::{Detection, Rect};

// High-level diagnostics returned by the detector.
pub use crate::diagnostics::DetectionReport;

// Error surface shared by the whole crate.
pub use crate::error::{Error, Result};

// Frame-level façade.
pub use crate::tracker::ObjectTracker;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use haar_detector::prelude::*;
///
/// # fn main() -> haar_detector::Result<()> {
/// let (w, h) = (640usize, 480usize);
/// let pixels = vec![0u8; 4 * w * h];
/// let frame = ImageRgba8::new(&pixels, w, h)?;
///
/// let cascade = Cascade::from_values(vec![24.0, 24.0])?;
/// let detector = HaarDetector::new(DetectorParams::default())?;
///
/// for found in detector.detect(frame, &cascade) {
///     println!("{}x{} at ({}, {})", found.width, found.height, found.x, found.y);
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageRgba8;
    pub use crate::{Cascade, Detection, DetectorParams, HaarDetector};
}
