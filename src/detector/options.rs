//! Parameter types configuring the detection scan.
//!
//! Defaults aim for robust, real-time behaviour at common resolutions. For
//! tuning, start with `step_size` (coarser steps trade recall for speed)
//! and `edges_density` (higher values prune more aggressively).

use serde::Deserialize;

use crate::error::{Error, Result};

/// Scan parameters for the multi-scale window sweep.
#[derive(Clone, Debug, Deserialize)]
pub struct DetectorParams {
    /// Scale the base window starts from (> 0).
    pub initial_scale: f64,
    /// Multiplier applied to the scale after each sweep (> 1).
    pub scale_factor: f64,
    /// Window step per position, in units of the current scale (> 0).
    pub step_size: f64,
    /// Minimum Sobel edge density required inside a window, in [0, 1].
    /// Zero disables the pruning pass entirely.
    pub edges_density: f64,
    /// Overlap ratio above which two candidate windows merge, in (0, 1].
    pub regions_overlap: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            initial_scale: 1.0,
            scale_factor: 1.25,
            step_size: 1.5,
            edges_density: 0.2,
            regions_overlap: 0.5,
        }
    }
}

impl DetectorParams {
    /// Check every scalar against its documented range.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_scale.is_finite() || self.initial_scale <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "initial_scale",
                value: self.initial_scale,
            });
        }
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(Error::InvalidParameter {
                name: "scale_factor",
                value: self.scale_factor,
            });
        }
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "step_size",
                value: self.step_size,
            });
        }
        if !self.edges_density.is_finite() || !(0.0..=1.0).contains(&self.edges_density) {
            return Err(Error::InvalidParameter {
                name: "edges_density",
                value: self.edges_density,
            });
        }
        if !self.regions_overlap.is_finite()
            || self.regions_overlap <= 0.0
            || self.regions_overlap > 1.0
        {
            return Err(Error::InvalidParameter {
                name: "regions_overlap",
                value: self.regions_overlap,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(DetectorParams::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_scalars_are_rejected() {
        let cases = [
            DetectorParams {
                initial_scale: 0.0,
                ..Default::default()
            },
            DetectorParams {
                scale_factor: 1.0,
                ..Default::default()
            },
            DetectorParams {
                step_size: -1.0,
                ..Default::default()
            },
            DetectorParams {
                edges_density: 1.5,
                ..Default::default()
            },
            DetectorParams {
                regions_overlap: 0.0,
                ..Default::default()
            },
            DetectorParams {
                regions_overlap: f64::NAN,
                ..Default::default()
            },
        ];
        for params in cases {
            assert!(
                matches!(params.validate(), Err(Error::InvalidParameter { .. })),
                "expected rejection for {params:?}"
            );
        }
    }
}
