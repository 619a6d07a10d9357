use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees (divided by the zoom level).
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Camera position at startup and after a reset.
    pub start_position: [f32; 3],
    /// Distance moved per movement key press.
    pub move_speed: f32,
    /// Radians turned per look key press.
    pub rotate_speed: f32,
    /// Radians turned per pixel of mouse drag.
    pub mouse_sensitivity: f32,
    /// Zoom change per zoom key press or scroll line.
    pub zoom_step: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
            start_position: [0.0, 0.0, 2.0],
            move_speed: 0.1,
            rotate_speed: 0.05,
            mouse_sensitivity: 0.005,
            zoom_step: 0.1,
        }
    }
}
