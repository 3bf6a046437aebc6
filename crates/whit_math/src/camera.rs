use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Camera shared by every renderer of a scene.
///
/// `near`/`far` belong to the projection contract of raster previews; the
/// ray tracer only uses the eye frame, field of view and aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    /// Width / height. `None` means "take it from the output image".
    pub aspect: Option<f32>,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            center: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 45.0,
            aspect: None,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Create a camera looking from `eye` toward `center`.
    pub fn new(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self {
            eye,
            center,
            up,
            ..Default::default()
        }
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, fov_y: f32) -> Self {
        self.fov_y = fov_y;
        self
    }

    /// Pin the aspect ratio instead of deriving it from the image size.
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = Some(aspect);
        self
    }

    /// Set the near/far clip distances.
    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.center, self.up)
    }

    /// Aspect ratio for an image of the given size.
    pub fn aspect_for(&self, width: u32, height: u32) -> f32 {
        self.aspect
            .unwrap_or_else(|| width.max(1) as f32 / height.max(1) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let view = camera.view_matrix();
        assert!(view.transform_point3(camera.eye).length() < 1e-5);
        assert!(view.w_axis.z < 0.0);
    }

    #[test]
    fn test_aspect_derived_from_image() {
        let camera = Camera::default();
        assert_eq!(camera.aspect_for(200, 100), 2.0);
        assert_eq!(camera.with_aspect(1.5).aspect_for(200, 100), 1.5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let camera: Camera = serde_json::from_str(r#"{ "eye": [1, 2, 3], "fov_y": 30 }"#)
            .expect("camera should parse");
        assert_eq!(camera.eye, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.fov_y, 30.0);
        assert_eq!(camera.up, Vec3::Y);
        assert_eq!(camera.aspect, None);
    }
}
