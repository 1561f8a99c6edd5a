//! Camera parameters for the viewpoint picker
//!
//! This struct is the single source of truth for the chosen viewpoint.
//! It is a plain value replaced wholesale on each edit; the sliders never
//! mutate individual fields in place.

use serde::{Deserialize, Serialize};

/// Elevation domain lower bound in degrees.
pub const ELEVATION_MIN: f32 = -30.0;
/// Elevation domain upper bound in degrees.
pub const ELEVATION_MAX: f32 = 60.0;
/// Distance (zoom scale) domain lower bound.
pub const DISTANCE_MIN: f32 = 0.6;
/// Distance (zoom scale) domain upper bound.
pub const DISTANCE_MAX: f32 = 1.4;

/// The three user-facing camera parameters
///
/// - `azimuth`: horizontal rotation around the subject in degrees, [0, 360),
///   wrapping at the seam
/// - `elevation`: vertical tilt relative to eye level in degrees, [-30, 60]
/// - `distance`: zoom scale factor controlling camera radius, [0.6, 1.4]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    pub azimuth: f32,
    pub elevation: f32,
    pub distance: f32,
}

impl Default for CameraParams {
    /// Head-on at eye level, neutral zoom
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.0,
            distance: 1.0,
        }
    }
}

impl CameraParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the azimuth, wrapping into [0, 360)
    pub fn with_azimuth(self, azimuth: f32) -> Self {
        Self {
            azimuth: azimuth.rem_euclid(360.0),
            ..self
        }
    }

    /// Replace the elevation, clamped to [-30, 60]
    pub fn with_elevation(self, elevation: f32) -> Self {
        Self {
            elevation: elevation.clamp(ELEVATION_MIN, ELEVATION_MAX),
            ..self
        }
    }

    /// Replace the distance, clamped to [0.6, 1.4]
    pub fn with_distance(self, distance: f32) -> Self {
        Self {
            distance: distance.clamp(DISTANCE_MIN, DISTANCE_MAX),
            ..self
        }
    }

    /// Check whether this is the untouched default viewpoint
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Reset to the default viewpoint
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_default() {
        let params = CameraParams::default();
        assert!(params.is_default());
        assert_eq!(params.azimuth, 0.0);
        assert_eq!(params.distance, 1.0);
    }

    #[test]
    fn test_azimuth_wraps() {
        let params = CameraParams::default().with_azimuth(370.0);
        assert_eq!(params.azimuth, 10.0);

        let params = CameraParams::default().with_azimuth(-90.0);
        assert_eq!(params.azimuth, 270.0);

        let params = CameraParams::default().with_azimuth(360.0);
        assert_eq!(params.azimuth, 0.0);
    }

    #[test]
    fn test_elevation_and_distance_clamp() {
        let params = CameraParams::default()
            .with_elevation(90.0)
            .with_distance(0.1);
        assert_eq!(params.elevation, ELEVATION_MAX);
        assert_eq!(params.distance, DISTANCE_MIN);

        let params = CameraParams::default()
            .with_elevation(-45.0)
            .with_distance(2.0);
        assert_eq!(params.elevation, ELEVATION_MIN);
        assert_eq!(params.distance, DISTANCE_MAX);
    }

    #[test]
    fn test_serialization_round_trip() {
        let params = CameraParams {
            azimuth: 90.0,
            elevation: 20.0,
            distance: 1.2,
        };

        let json = serde_json::to_string(&params).unwrap();
        let restored: CameraParams = serde_json::from_str(&json).unwrap();

        assert_eq!(params, restored);
        assert!(!restored.is_default());
    }

    #[test]
    fn test_reset() {
        let mut params = CameraParams::default().with_azimuth(180.0);
        assert!(!params.is_default());

        params.reset();
        assert!(params.is_default());
    }
}
