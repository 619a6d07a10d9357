//! Everything a key press or mouse gesture can ask the viewer to do.

use crate::camera::Camera;

/// Camera adjustment, in world units and radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    /// Move along the view direction.
    Forward(f32),
    /// Move against the view direction.
    Backward(f32),
    /// Strafe left.
    Left(f32),
    /// Strafe right.
    Right(f32),
    /// Turn about world up (`yaw`, positive turns left) and about the
    /// camera's right axis (`pitch`, positive looks down).
    Turn {
        /// Horizontal angle in radians.
        yaw: f32,
        /// Vertical angle in radians.
        pitch: f32,
    },
    /// Add to the zoom level (positive zooms in).
    Zoom(f32),
    /// Restore the starting view.
    Reset,
}

impl CameraCommand {
    /// Apply this adjustment to `camera`.
    pub fn apply(self, camera: &mut Camera) {
        match self {
            Self::Forward(amount) => camera.move_forward(amount),
            Self::Backward(amount) => camera.move_backward(amount),
            Self::Left(amount) => camera.move_left(amount),
            Self::Right(amount) => camera.move_right(amount),
            Self::Turn { yaw, pitch } => {
                if yaw != 0.0 {
                    camera.rotate_horizontal(yaw);
                }
                if pitch != 0.0 {
                    camera.rotate_vertical(pitch);
                }
            }
            Self::Zoom(delta) => camera.zoom(delta),
            Self::Reset => camera.reset(),
        }
    }
}

/// The viewer's complete interactive vocabulary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    /// Adjust the camera.
    Camera(CameraCommand),
    /// Save the next rendered frame as a PNG.
    Screenshot,
    /// Start recording, or stop and export the active recording.
    ToggleRecording,
    /// Close the window.
    Quit,
}
