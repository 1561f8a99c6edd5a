//! Prompt composition
//!
//! Translates the numeric camera parameters into the bucketed
//! natural-language camera description the generation model consumes, and
//! assembles the full instruction text around it. Pure functions only.

use crate::state::camera::CameraParams;

/// Azimuth sectors as an ordered upper-bound table.
///
/// Each entry is (exclusive upper bound in degrees, prompt text, short
/// display label). Sectors are closed-left/open-right; the front sector
/// wraps across 0, so anything at or above the last bound falls back to
/// the first entry's texts.
static AZIMUTH_SECTORS: [(f32, &str, &str); 8] = [
    (22.5, "FRONT VIEW, looking directly at the face", "Front view"),
    (67.5, "FRONT-RIGHT side view", "Front-right"),
    (112.5, "RIGHT PROFILE view", "Right profile"),
    (157.5, "BACK-RIGHT side view", "Back-right"),
    (
        202.5,
        "REAR VIEW (Directly from BEHIND). Show the back of the head, back of the body, and back of the clothes",
        "Rear view",
    ),
    (247.5, "BACK-LEFT side view", "Back-left"),
    (292.5, "LEFT PROFILE view", "Left profile"),
    (337.5, "FRONT-LEFT side view", "Front-left"),
];

fn azimuth_sector(azimuth: f32) -> &'static (f32, &'static str, &'static str) {
    let az = azimuth.rem_euclid(360.0);
    AZIMUTH_SECTORS
        .iter()
        .find(|(end, _, _)| az < *end)
        // [337.5, 360) wraps into the front sector
        .unwrap_or(&AZIMUTH_SECTORS[0])
}

/// Prompt text for the azimuth sector
pub fn azimuth_text(azimuth: f32) -> &'static str {
    azimuth_sector(azimuth).1
}

/// Short display label for the azimuth sector
pub fn azimuth_label(azimuth: f32) -> &'static str {
    azimuth_sector(azimuth).2
}

/// Prompt text for the elevation band
///
/// Bands are closed-left/open-right: -15 is eye level, 15 is high angle.
pub fn elevation_text(elevation: f32) -> &'static str {
    if elevation < -15.0 {
        "LOW ANGLE looking UP"
    } else if elevation < 15.0 {
        "Standard EYE-LEVEL shot"
    } else {
        "HIGH ANGLE looking DOWN"
    }
}

/// Short display label for the elevation band
pub fn elevation_label(elevation: f32) -> &'static str {
    if elevation < -15.0 {
        "Low angle"
    } else if elevation < 15.0 {
        "Eye level"
    } else {
        "High angle"
    }
}

/// Short display label for the zoom scale
pub fn zoom_label(distance: f32) -> &'static str {
    if distance > 1.1 {
        "Wide"
    } else {
        "Close"
    }
}

/// The discretized one-line camera description
pub fn camera_description(params: &CameraParams) -> String {
    format!(
        "{}, {}, Zoom scale {:.2}x",
        azimuth_text(params.azimuth),
        elevation_text(params.elevation),
        params.distance
    )
}

/// The full instruction text sent alongside the reference image
///
/// The constraints keep the external model honest: the subject must stay
/// frozen in its pose, must not turn toward the camera even from behind,
/// and must keep its identity while lighting rotates with the viewpoint.
pub fn build_instruction(params: &CameraParams, context: &str) -> String {
    format!(
        "[3D VIEWPORT RENDER MODE]\n\
         INPUT: A photograph of a person in a fixed pose.\n\
         TASK: Re-render this EXACT person and scene from a NEW CAMERA ANGLE.\n\
         \n\
         NEW CAMERA: {}.\n\
         \n\
         CRITICAL CONSTRAINTS:\n\
         1. POSE LOCK: The subject is a FROZEN STATUE. Do not change their arms, legs, or head orientation relative to their body.\n\
         2. NO TURNING: If the camera is at the REAR, you MUST show the BACK of the person. Do not make them turn around to face the camera.\n\
         3. IDENTITY: Maintain the same facial features, hair, and clothing texture.\n\
         4. CONSISTENCY: The background lighting and environment must rotate logically with the camera.\n\
         5. Quality: Hyper-realistic 8k photo.\n\
         \n\
         Context: {}",
        camera_description(params),
        context
    )
}
