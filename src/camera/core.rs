use glam::{Mat4, Quat, Vec3};

/// World up direction used for look-at, yaw and strafing.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Lower bound for [`Camera::zoom_level`].
pub const MIN_ZOOM: f32 = 0.1;

/// Free-flying perspective camera.
///
/// The view direction is stored as a unit orientation vector rather than
/// Euler angles or a quaternion. Every rotation renormalizes it so that
/// long sequences of small incremental rotations cannot drift.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    orientation: Vec3,
    zoom: f32,
    aspect: f32,
    initial_position: Vec3,
    initial_orientation: Vec3,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix.
pub struct CameraUniform {
    /// Combined view-projection matrix, column-major.
    pub view_proj: [[f32; 4]; 4],
}

impl Camera {
    /// Create a camera at `position` looking down `-Z`.
    #[must_use]
    pub fn new(aspect: f32, position: Vec3) -> Self {
        Self::with_orientation(aspect, position, Vec3::NEG_Z)
    }

    /// Create a camera with an explicit initial view direction.
    ///
    /// The direction is normalized; a zero vector falls back to `-Z`.
    #[must_use]
    pub fn with_orientation(
        aspect: f32,
        position: Vec3,
        orientation: Vec3,
    ) -> Self {
        let orientation = orientation.try_normalize().unwrap_or(Vec3::NEG_Z);
        Self {
            position,
            orientation,
            zoom: 1.0,
            aspect,
            initial_position: position,
            initial_orientation: orientation,
        }
    }

    /// Current eye position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current unit-length view direction.
    #[must_use]
    pub fn orientation(&self) -> Vec3 {
        self.orientation
    }

    /// Current zoom factor (1.0 = no magnification).
    #[must_use]
    pub fn zoom_level(&self) -> f32 {
        self.zoom
    }

    /// Viewport aspect ratio fixed at construction.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Build the combined view-projection matrix.
    ///
    /// Zoom narrows the field of view: the effective vertical FOV is
    /// `fov_deg / zoom`.
    #[must_use]
    pub fn matrix(&self, fov_deg: f32, near: f32, far: f32) -> Mat4 {
        let view = Mat4::look_at_rh(
            self.position,
            self.position + self.orientation,
            WORLD_UP,
        );
        // perspective_rh uses the [0,1] depth range (wgpu convention)
        let proj = Mat4::perspective_rh(
            (fov_deg / self.zoom).to_radians(),
            self.aspect,
            near,
            far,
        );
        proj * view
    }

    /// View-projection matrix packed for upload to a uniform buffer.
    #[must_use]
    pub fn uniform(&self, fov_deg: f32, near: f32, far: f32) -> CameraUniform {
        CameraUniform {
            view_proj: self.matrix(fov_deg, near, far).to_cols_array_2d(),
        }
    }

    /// Move along the view direction.
    pub fn move_forward(&mut self, amount: f32) {
        self.position += self.orientation * amount;
    }

    /// Move against the view direction.
    pub fn move_backward(&mut self, amount: f32) {
        self.position -= self.orientation * amount;
    }

    /// Strafe left (against `orientation × up`).
    pub fn move_left(&mut self, amount: f32) {
        self.position -= self.orientation.cross(WORLD_UP) * amount;
    }

    /// Strafe right (along `orientation × up`).
    pub fn move_right(&mut self, amount: f32) {
        self.position += self.orientation.cross(WORLD_UP) * amount;
    }

    /// Yaw about the world up axis by `angle` radians.
    pub fn rotate_horizontal(&mut self, angle: f32) {
        let rotated = Quat::from_axis_angle(WORLD_UP, angle) * self.orientation;
        self.orientation = rotated.normalize();
    }

    /// Pitch about the camera's right axis by `angle` radians.
    ///
    /// Positive angles look down. Looking straight up or down leaves the
    /// right axis undefined, in which case the orientation is unchanged.
    pub fn rotate_vertical(&mut self, angle: f32) {
        let Some(right) = self.orientation.cross(WORLD_UP).try_normalize()
        else {
            log::debug!("vertical rotation skipped: view is parallel to up");
            return;
        };
        let rotated = Quat::from_axis_angle(right, -angle) * self.orientation;
        self.orientation = rotated.normalize();
    }

    /// Adjust zoom by `delta`, clamped to a floor of [`MIN_ZOOM`].
    pub fn zoom(&mut self, delta: f32) {
        self.zoom = (self.zoom + delta).max(MIN_ZOOM);
    }

    /// Restore the construction-time position and orientation, and reset
    /// zoom to 1.0.
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.orientation = self.initial_orientation;
        self.zoom = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn origin_camera() -> Camera {
        Camera::new(1.0, Vec3::ZERO)
    }

    fn assert_vec_eq(actual: Vec3, expected: Vec3) {
        assert!(
            actual.abs_diff_eq(expected, EPS),
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn movement_from_origin() {
        let mut cam = origin_camera();
        cam.move_forward(1.0);
        assert_vec_eq(cam.position(), Vec3::new(0.0, 0.0, -1.0));

        let mut cam = origin_camera();
        cam.move_backward(1.0);
        assert_vec_eq(cam.position(), Vec3::new(0.0, 0.0, 1.0));

        let mut cam = origin_camera();
        cam.move_left(1.0);
        assert_vec_eq(cam.position(), Vec3::new(-1.0, 0.0, 0.0));

        let mut cam = origin_camera();
        cam.move_right(1.0);
        assert_vec_eq(cam.position(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn combined_movements_accumulate() {
        let mut cam = origin_camera();
        cam.move_forward(0.5);
        cam.move_right(0.5);
        cam.move_backward(0.2);
        cam.move_left(0.1);
        assert_vec_eq(cam.position(), Vec3::new(0.4, 0.0, -0.3));
    }

    #[test]
    fn zoom_is_clamped_at_floor() {
        let mut cam = origin_camera();
        cam.zoom(0.5);
        assert!((cam.zoom_level() - 1.5).abs() < EPS);
        cam.zoom(-0.7);
        assert!((cam.zoom_level() - 0.8).abs() < EPS);
        cam.zoom(-1.0);
        assert_eq!(cam.zoom_level(), MIN_ZOOM);
        cam.zoom(-1.0e6);
        assert_eq!(cam.zoom_level(), MIN_ZOOM);
    }

    #[test]
    fn zoom_never_drops_below_floor() {
        let mut cam = origin_camera();
        for delta in [-0.3, 2.0, -5.0, 0.05, -0.01, 7.5, -100.0, 0.02] {
            cam.zoom(delta);
            assert!(cam.zoom_level() >= MIN_ZOOM);
        }
    }

    #[test]
    fn positive_yaw_turns_left() {
        let mut cam = origin_camera();
        cam.rotate_horizontal(0.5);
        let o = cam.orientation();
        assert!(o.x < 0.0);
        assert!(o.y.abs() < EPS);
        assert!(o.z < 0.0);

        cam.reset();
        cam.rotate_horizontal(-0.5);
        let o = cam.orientation();
        assert!(o.x > 0.0);
        assert!(o.y.abs() < EPS);
        assert!(o.z < 0.0);
    }

    #[test]
    fn positive_pitch_looks_down() {
        let mut cam = origin_camera();
        cam.rotate_vertical(0.5);
        let o = cam.orientation();
        assert!(o.x.abs() < EPS);
        assert!(o.y < 0.0);
        assert!(o.z < 0.0);

        cam.reset();
        cam.rotate_vertical(-0.5);
        let o = cam.orientation();
        assert!(o.x.abs() < EPS);
        assert!(o.y > 0.0);
        assert!(o.z < 0.0);
    }

    #[test]
    fn orientation_stays_unit_length() {
        let mut cam = origin_camera();
        for i in 0..10_000 {
            let angle = (i as f32 * 0.37).sin() * 0.2;
            if i % 3 == 0 {
                cam.rotate_vertical(angle);
            } else {
                cam.rotate_horizontal(angle * 1.7);
            }
            assert!((cam.orientation().length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn pitch_through_pole_keeps_unit_length() {
        let mut cam =
            Camera::with_orientation(1.0, Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        cam.rotate_vertical(0.3);
        assert_vec_eq(cam.orientation(), Vec3::Y);

        let mut cam = origin_camera();
        for _ in 0..40 {
            cam.rotate_vertical(0.1);
            assert!(cam.orientation().is_normalized());
        }
    }

    #[test]
    fn reset_restores_initial_state_exactly() {
        let start = Vec3::new(0.25, -1.5, 2.0);
        let mut cam = Camera::new(16.0 / 9.0, start);
        cam.move_forward(1.0);
        cam.move_right(1.0);
        cam.rotate_horizontal(0.5);
        cam.rotate_vertical(0.3);
        cam.zoom(0.5);
        assert_ne!(cam.position(), start);
        assert_ne!(cam.orientation(), Vec3::NEG_Z);

        cam.reset();
        assert_eq!(cam.position(), start);
        assert_eq!(cam.orientation(), Vec3::NEG_Z);
        assert_eq!(cam.zoom_level(), 1.0);
    }

    #[test]
    fn zoom_narrows_field_of_view() {
        let mut cam = origin_camera();
        let base = cam.matrix(45.0, 0.1, 100.0);
        cam.zoom(1.0);
        let zoomed = cam.matrix(45.0, 0.1, 100.0);
        // x/y scale terms grow as the FOV shrinks
        assert!(zoomed.x_axis.x > base.x_axis.x);
        assert!(zoomed.y_axis.y > base.y_axis.y);
    }

    #[test]
    fn point_ahead_projects_to_center() {
        let cam = Camera::new(1.0, Vec3::new(0.0, 0.0, 2.0));
        let clip = cam.matrix(45.0, 0.1, 100.0) * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < EPS);
        assert!(ndc.y.abs() < EPS);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn uniform_matches_matrix() {
        let cam = Camera::new(1.5, Vec3::new(1.0, 2.0, 3.0));
        let uniform = cam.uniform(60.0, 0.5, 50.0);
        assert_eq!(
            uniform.view_proj,
            cam.matrix(60.0, 0.5, 50.0).to_cols_array_2d()
        );
    }
}
