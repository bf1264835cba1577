//! Frame-level façade bundling named cascades with shared scan parameters.
//!
//! Event delivery is a plain callback: a capture driver calls
//! [`ObjectTracker::track_with`] per frame and receives the aggregated
//! detections for that frame. No state survives between frames.

use log::debug;

use crate::cascade::Cascade;
use crate::detector::{DetectorParams, HaarDetector};
use crate::error::{Error, Result};
use crate::image::ImageRgba8;
use crate::types::Detection;

/// Object tracker running one or more named cascades over frames.
///
/// No trained cascades ship with the library; callers register their own
/// under names of their choosing.
pub struct ObjectTracker {
    detector: HaarDetector,
    cascades: Vec<(String, Cascade)>,
}

impl ObjectTracker {
    /// Create a tracker with the supplied scan parameters.
    pub fn new(params: DetectorParams) -> Result<Self> {
        Ok(Self {
            detector: HaarDetector::new(params)?,
            cascades: Vec::new(),
        })
    }

    /// Register a cascade under `name`.
    pub fn add_cascade(&mut self, name: impl Into<String>, cascade: Cascade) -> &mut Self {
        self.cascades.push((name.into(), cascade));
        self
    }

    /// Look up a registered cascade.
    pub fn cascade(&self, name: &str) -> Option<&Cascade> {
        self.cascades
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// The scan parameters shared by every cascade.
    pub fn params(&self) -> &DetectorParams {
        self.detector.params()
    }

    /// Run every registered cascade over the frame, concatenating hits in
    /// registration order.
    pub fn track(&self, image: ImageRgba8) -> Vec<Detection> {
        let mut all = Vec::new();
        for (name, cascade) in &self.cascades {
            let mut found = self.detector.detect(image, cascade);
            debug!(
                "ObjectTracker::track cascade={} detections={}",
                name,
                found.len()
            );
            all.append(&mut found);
        }
        all
    }

    /// Run a single registered cascade over the frame.
    pub fn track_named(&self, name: &str, image: ImageRgba8) -> Result<Vec<Detection>> {
        let cascade = self
            .cascade(name)
            .ok_or_else(|| Error::UnknownCascade(name.to_string()))?;
        Ok(self.detector.detect(image, cascade))
    }

    /// Drive one frame and hand the aggregated detections to `on_track`.
    pub fn track_with(&self, image: ImageRgba8, on_track: impl FnOnce(&[Detection])) {
        let detections = self.track(image);
        on_track(&detections);
    }
}
