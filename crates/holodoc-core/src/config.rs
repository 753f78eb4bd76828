// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detector configuration and the per-image screening parameters derived from it.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{HoloDocError, Result};

/// Half-width of the background colour band, per channel.
pub const COLOR_RANGE: u8 = 25;
/// Largest usable colour tolerance; anything wider would invert the band.
pub const MAX_COLOR_RANGE: u8 = 127;

/// Shortest accepted perimeter, as a fraction of the image perimeter.
pub const RATIO_LENGTH_MIN: f64 = 0.1;
/// Longest accepted perimeter, as a fraction of the image perimeter.
pub const RATIO_LENGTH_MAX: f64 = 0.7;
/// Duplicate-centroid threshold, as a fraction of the squared image diagonal.
pub const RATIO_CENTER_DIST: f64 = 0.25;
/// Allowed deviation from 1.0 of each opposite-side squared-length ratio.
pub const RATIO_SIDE: f64 = 0.25;
/// Douglas–Peucker tolerance, as a fraction of the contour perimeter.
pub const RATIO_APPROX_EPSILON: f64 = 0.02;

/// Upper bound on documents written by the primary C entry point.
pub const MAX_DOCUMENTS: usize = 16;

/// Canny edge detector settings for the polygon-approximation detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub low_threshold: f32,
    pub high_threshold: f32,
    /// Sobel kernel size. Only 3 is supported.
    pub aperture: u32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 150.0,
            aperture: 3,
        }
    }
}

/// Tunables for both detection strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Background colour tolerance (clamped to [`MAX_COLOR_RANGE`]).
    pub color_tolerance: u8,
    pub length_min_ratio: f64,
    pub length_max_ratio: f64,
    pub center_dist_ratio: f64,
    pub side_ratio_tolerance: f64,
    pub approx_epsilon_ratio: f64,
    pub edges: EdgeConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            color_tolerance: COLOR_RANGE,
            length_min_ratio: RATIO_LENGTH_MIN,
            length_max_ratio: RATIO_LENGTH_MAX,
            center_dist_ratio: RATIO_CENTER_DIST,
            side_ratio_tolerance: RATIO_SIDE,
            approx_epsilon_ratio: RATIO_APPROX_EPSILON,
            edges: EdgeConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Read a configuration from a JSON file. Missing fields take their defaults.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        debug!(?config, "Detector configuration loaded");
        Ok(config)
    }

    /// Reject settings the detectors cannot work with.
    pub fn validate(&self) -> Result<()> {
        let ratios = [
            ("length_min_ratio", self.length_min_ratio),
            ("length_max_ratio", self.length_max_ratio),
            ("center_dist_ratio", self.center_dist_ratio),
            ("side_ratio_tolerance", self.side_ratio_tolerance),
            ("approx_epsilon_ratio", self.approx_epsilon_ratio),
        ];
        for (name, value) in ratios {
            if !value.is_finite() || value < 0.0 {
                return Err(HoloDocError::InvalidArgument(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.length_min_ratio > self.length_max_ratio {
            return Err(HoloDocError::InvalidArgument(format!(
                "length_min_ratio ({}) exceeds length_max_ratio ({})",
                self.length_min_ratio, self.length_max_ratio
            )));
        }
        if self.side_ratio_tolerance >= 1.0 {
            return Err(HoloDocError::InvalidArgument(format!(
                "side_ratio_tolerance must be below 1.0, got {}",
                self.side_ratio_tolerance
            )));
        }
        if self.edges.aperture != 3 {
            return Err(HoloDocError::InvalidArgument(format!(
                "edge aperture {} is not supported (only 3)",
                self.edges.aperture
            )));
        }
        if !(self.edges.low_threshold.is_finite()
            && self.edges.high_threshold.is_finite()
            && self.edges.low_threshold <= self.edges.high_threshold)
        {
            return Err(HoloDocError::InvalidArgument(format!(
                "edge thresholds must satisfy low <= high, got {} / {}",
                self.edges.low_threshold, self.edges.high_threshold
            )));
        }
        Ok(())
    }

    /// Colour tolerance after clamping to the non-inverting maximum.
    pub fn effective_tolerance(&self) -> u8 {
        self.color_tolerance.min(MAX_COLOR_RANGE)
    }
}

/// Thresholds for contour screening, derived from the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreeningParams {
    pub length_min: f64,
    pub length_max: f64,
    /// Squared centroid distance under which two candidates are duplicates.
    pub center_dist: f64,
    pub side_tolerance: f64,
}

impl ScreeningParams {
    pub fn for_image(width: u32, height: u32, config: &DetectorConfig) -> Self {
        let perimeter = 2.0 * (width as f64 + height as f64);
        let diagonal_sq = (width as f64).powi(2) + (height as f64).powi(2);
        Self {
            length_min: config.length_min_ratio * perimeter,
            length_max: config.length_max_ratio * perimeter,
            center_dist: config.center_dist_ratio * diagonal_sq,
            side_tolerance: config.side_ratio_tolerance,
        }
    }

    /// Whether a perimeter lies inside `[length_min, length_max]`.
    pub fn accepts_length(&self, perimeter: f64) -> bool {
        self.length_min <= perimeter && perimeter <= self.length_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn params_follow_image_dimensions() {
        let params = ScreeningParams::for_image(300, 200, &DetectorConfig::default());
        assert!((params.length_min - 100.0).abs() < 1e-9);
        assert!((params.length_max - 700.0).abs() < 1e-9);
        assert!((params.center_dist - 0.25 * 130_000.0).abs() < 1e-9);
        assert!((params.side_tolerance - 0.25).abs() < 1e-12);
        assert!(params.accepts_length(100.0));
        assert!(params.accepts_length(700.0));
        assert!(!params.accepts_length(99.9));
        assert!(!params.accepts_length(700.1));
    }

    #[test]
    fn tolerance_is_clamped() {
        let config = DetectorConfig {
            color_tolerance: 200,
            ..DetectorConfig::default()
        };
        assert_eq!(config.effective_tolerance(), MAX_COLOR_RANGE);
        assert_eq!(DetectorConfig::default().effective_tolerance(), COLOR_RANGE);
    }

    #[test]
    fn validate_rejects_inverted_lengths() {
        let config = DetectorConfig {
            length_min_ratio: 0.8,
            ..DetectorConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_unsupported_aperture() {
        let mut config = DetectorConfig::default();
        config.edges.aperture = 5;
        assert!(matches!(
            config.validate(),
            Err(HoloDocError::InvalidArgument(_))
        ));
    }

    #[test]
    fn load_fills_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "color_tolerance": 40, "edges": {{ "high_threshold": 120.0 }} }}"#)
            .expect("write config");

        let config = DetectorConfig::load(file.path()).expect("config should load");
        assert_eq!(config.color_tolerance, 40);
        assert_eq!(config.edges.high_threshold, 120.0);
        assert_eq!(config.edges.low_threshold, 50.0);
        assert_eq!(config.length_max_ratio, RATIO_LENGTH_MAX);
    }

    #[test]
    fn load_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write config");
        assert!(matches!(
            DetectorConfig::load(file.path()),
            Err(HoloDocError::Serialization(_))
        ));
    }
}
