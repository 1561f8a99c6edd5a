//! Camera rig geometry
//!
//! Derives everything the viewport draws from the three camera parameters
//! and the reference image's aspect ratio. All functions are pure and
//! deterministic; the rig is recomputed whenever a parameter changes.

use cgmath::Point3;

use crate::state::camera::CameraParams;

/// Scene-scale factor: orbit radius = distance * ORBIT_SCALE
pub const ORBIT_SCALE: f32 = 5.0;

/// Vertical offset of the orbit center, roughly the subject's eye height
pub const RING_CENTER_HEIGHT: f32 = 1.0;

/// Base unit for the subject billboard's longer edge
pub const BILLBOARD_BASE: f32 = 2.0;

/// Horizontal guide ring segment count (65 points)
const H_RING_SEGMENTS: u32 = 64;

/// Vertical guide ring sweep in whole degrees, -60..=60 (121 points)
const V_RING_SWEEP_DEG: i32 = 60;

/// Orbit radius for the given zoom scale
pub fn orbit_radius(distance: f32) -> f32 {
    distance * ORBIT_SCALE
}

/// Camera position for the given parameters
///
/// Right-handed coordinates, y up. Azimuth 0 places the camera on +z
/// looking at the subject's front; elevation tilts it above or below the
/// ring center.
pub fn camera_position(params: &CameraParams) -> Point3<f32> {
    let r = orbit_radius(params.distance);
    let az = params.azimuth.to_radians();
    let el = params.elevation.to_radians();

    Point3::new(
        r * az.sin() * el.cos(),
        r * el.sin() + RING_CENTER_HEIGHT,
        r * az.cos() * el.cos(),
    )
}

/// Horizontal guide ring: the full azimuth circle at elevation 0
pub fn horizontal_ring(distance: f32) -> Vec<Point3<f32>> {
    let r = orbit_radius(distance);
    (0..=H_RING_SEGMENTS)
        .map(|i| {
            let a = (i as f32 / H_RING_SEGMENTS as f32) * std::f32::consts::TAU;
            Point3::new(r * a.sin(), RING_CENTER_HEIGHT, r * a.cos())
        })
        .collect()
}

/// Vertical guide ring: elevation swept -60..=60 degrees at the current azimuth
pub fn vertical_ring(azimuth: f32, distance: f32) -> Vec<Point3<f32>> {
    let r = orbit_radius(distance);
    let az = azimuth.to_radians();
    (-V_RING_SWEEP_DEG..=V_RING_SWEEP_DEG)
        .map(|deg| {
            let el = (deg as f32).to_radians();
            Point3::new(
                r * az.sin() * el.cos(),
                r * el.sin() + RING_CENTER_HEIGHT,
                r * az.cos() * el.cos(),
            )
        })
        .collect()
}

/// The flat plane the reference image is shown on
///
/// Sized so the longer edge equals `BILLBOARD_BASE`, standing in the XY
/// plane with its bottom edge on the ground (y = 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BillboardPlane {
    pub width: f32,
    pub height: f32,
}

impl BillboardPlane {
    /// Size the plane from the image's width/height ratio
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio >= 1.0 {
            Self {
                width: BILLBOARD_BASE,
                height: BILLBOARD_BASE / ratio,
            }
        } else {
            Self {
                width: BILLBOARD_BASE * ratio,
                height: BILLBOARD_BASE,
            }
        }
    }

    /// Vertical center of the plane, half its height above the ground
    pub fn center_y(&self) -> f32 {
        self.height / 2.0
    }

    /// Corners in world space, counter-clockwise from bottom-left
    pub fn corners(&self) -> [Point3<f32>; 4] {
        let hw = self.width / 2.0;
        [
            Point3::new(-hw, 0.0, 0.0),
            Point3::new(hw, 0.0, 0.0),
            Point3::new(hw, self.height, 0.0),
            Point3::new(-hw, self.height, 0.0),
        ]
    }
}

/// Everything the viewport needs for one frame
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub camera: Point3<f32>,
    pub horizontal_ring: Vec<Point3<f32>>,
    pub vertical_ring: Vec<Point3<f32>>,
    pub billboard: BillboardPlane,
}

impl CameraRig {
    pub fn from_params(params: &CameraParams, image_ratio: f32) -> Self {
        Self {
            camera: camera_position(params),
            horizontal_ring: horizontal_ring(params.distance),
            vertical_ring: vertical_ring(params.azimuth, params.distance),
            billboard: BillboardPlane::from_ratio(image_ratio),
        }
    }

    /// The point the camera looks at: the ring center
    pub fn target(&self) -> Point3<f32> {
        Point3::new(0.0, RING_CENTER_HEIGHT, 0.0)
    }
}
