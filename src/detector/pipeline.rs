//! Detector pipeline driving the multi-scale cascade scan end-to-end.
//!
//! The [`HaarDetector`] exposes a simple API: feed an RGBA frame and a
//! cascade and get merged detections. Internally it builds the integral
//! tables, sweeps a scaled window across every position with an optional
//! edge-density prune, runs the staged cascade on each surviving window,
//! and clusters the raw hits.
//!
//! Typical usage:
//! ```no_run
//! use haar_detector::image::ImageRgba8;
//! use haar_detector::{Cascade, DetectorParams, HaarDetector};
//!
//! # fn example(frame: ImageRgba8, cascade: Cascade) {
//! let detector = HaarDetector::new(DetectorParams::default()).unwrap();
//! let report = detector.detect_with_diagnostics(frame, &cascade);
//! println!(
//!     "found={} latency_ms={:.3}",
//!     report.detections.len(),
//!     report.trace.timings.total_ms
//! );
//! # }
//! ```

use std::time::Instant;

use log::debug;

use super::options::DetectorParams;
use crate::cascade::{evaluate_window, Cascade};
use crate::diagnostics::{
    DetectionReport, InputDescriptor, PipelineTrace, ScanStats, TimingBreakdown,
};
use crate::error::Result;
use crate::image::ImageRgba8;
use crate::integral::IntegralImages;
use crate::merge::merge_rectangles;
use crate::types::{Detection, Rect};

/// Haar-cascade detector bound to a validated parameter set.
///
/// The detector keeps no per-frame state: every call allocates its integral
/// tables and candidate list on entry and releases them on return, so one
/// instance may serve any number of frames, and separate instances may run
/// on separate threads over disjoint buffers.
pub struct HaarDetector {
    params: DetectorParams,
}

impl HaarDetector {
    /// Create a detector with the supplied parameters.
    pub fn new(params: DetectorParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The validated parameters this detector scans with.
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Run the cascade over the frame and return merged detections.
    pub fn detect(&self, image: ImageRgba8, cascade: &Cascade) -> Vec<Detection> {
        self.detect_with_diagnostics(image, cascade).detections
    }

    /// Run the cascade and capture stage timings and scan statistics.
    pub fn detect_with_diagnostics(
        &self,
        image: ImageRgba8,
        cascade: &Cascade,
    ) -> DetectionReport {
        let (width, height) = (image.w, image.h);
        debug!(
            "HaarDetector::detect start w={} h={} base={}x{}",
            width,
            height,
            cascade.base_width(),
            cascade.base_height()
        );
        let total_start = Instant::now();
        let prune_edges = self.params.edges_density > 0.0;

        let integral_start = Instant::now();
        let integrals = IntegralImages::build(&image, prune_edges);
        let integral_ms = integral_start.elapsed().as_secs_f64() * 1000.0;

        let scan_start = Instant::now();
        let mut stats = ScanStats::default();
        let rects = self.scan(cascade, &integrals, &mut stats);
        let scan_ms = scan_start.elapsed().as_secs_f64() * 1000.0;

        let merge_start = Instant::now();
        let detections = merge_rectangles(&rects, self.params.regions_overlap);
        let merge_ms = merge_start.elapsed().as_secs_f64() * 1000.0;

        let total_ms = total_start.elapsed().as_secs_f64() * 1000.0;
        stats.candidates = rects.len();
        stats.groups = detections.len();
        debug!(
            "HaarDetector::detect done candidates={} detections={} latency_ms={:.3}",
            stats.candidates,
            stats.groups,
            total_ms
        );

        let mut timings = TimingBreakdown::with_total(total_ms);
        timings.push("integral", integral_ms);
        timings.push("scan", scan_ms);
        timings.push("merge", merge_ms);

        DetectionReport {
            detections,
            trace: PipelineTrace {
                input: InputDescriptor { width, height },
                timings,
                scan: stats,
            },
        }
    }

    /// Sweep every scale and position, collecting windows the cascade
    /// accepts.
    fn scan(
        &self,
        cascade: &Cascade,
        integrals: &IntegralImages,
        stats: &mut ScanStats,
    ) -> Vec<Rect> {
        let width = integrals.width();
        let height = integrals.height();
        // The prune branch stays outside the position loops when disabled:
        // the Sobel table simply is not there to test against.
        let sobel_sat = integrals.sobel.as_deref();
        let min_width = cascade.base_width();
        let min_height = cascade.base_height();

        let mut rects = Vec::new();
        let mut scale = self.params.initial_scale * self.params.scale_factor;
        let mut block_width = (scale * min_width) as usize;
        let mut block_height = (scale * min_height) as usize;
        while block_width < width && block_height < height {
            let step = ((scale * self.params.step_size + 0.5) as usize).max(1);
            let mut i = 0;
            while i < height - block_height {
                let mut j = 0;
                while j < width - block_width {
                    if let Some(sobel) = sobel_sat {
                        let density =
                            block_edge_density(sobel, width, i, j, block_width, block_height);
                        if density < self.params.edges_density {
                            stats.windows_pruned += 1;
                            j += step;
                            continue;
                        }
                    }
                    stats.windows_evaluated += 1;
                    if evaluate_window(cascade, integrals, i, j, block_width, block_height, scale) {
                        rects.push(Rect {
                            x: j as u32,
                            y: i as u32,
                            width: block_width as u32,
                            height: block_height as u32,
                        });
                    }
                    j += step;
                }
                i += step;
            }
            debug!(
                "HaarDetector::scan scale={:.3} block={}x{} step={} candidates={}",
                scale,
                block_width,
                block_height,
                step,
                rects.len()
            );
            scale *= self.params.scale_factor;
            block_width = (scale * min_width) as usize;
            block_height = (scale * min_height) as usize;
        }
        rects
    }
}

/// Fraction of the maximum possible Sobel response inside the window.
#[inline]
fn block_edge_density(
    sobel: &[i64],
    width: usize,
    i: usize,
    j: usize,
    block_w: usize,
    block_h: usize,
) -> f64 {
    let a = i * width + j;
    let b = a + block_w;
    let d = a + block_h * width;
    let c = d + block_w;
    (sobel[a] - sobel[b] - sobel[d] + sobel[c]) as f64 / (block_w as f64 * block_h as f64 * 255.0)
}
