//! Primary ray generation in the camera frame.

use whit_math::{Camera, Ray, Vec3};

/// The image plane at `z = -1` in front of an eye at the origin.
///
/// Row 0 is the bottom of the plane; every pixel is sampled once at its
/// center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPlane {
    pub width: u32,
    pub height: u32,
    xmin: f32,
    ymin: f32,
}

impl ViewPlane {
    /// Plane for a vertical field of view in degrees and a width/height
    /// aspect ratio.
    pub fn new(fov_y: f32, aspect: f32, width: u32, height: u32) -> Self {
        let ymin = -(fov_y.to_radians() / 2.0).tan();
        Self {
            width,
            height,
            xmin: ymin * aspect,
            ymin,
        }
    }

    /// Plane for `camera` at the given resolution.
    pub fn for_camera(camera: &Camera, width: u32, height: u32) -> Self {
        Self::new(camera.fov_y, camera.aspect_for(width, height), width, height)
    }

    /// Ray from the eye through the center of pixel (`row`, `col`).
    pub fn primary_ray(&self, row: u32, col: u32) -> Ray {
        let x = self.xmin + (col as f32 + 0.5) / self.width as f32 * (-2.0 * self.xmin);
        let y = self.ymin + (row as f32 + 0.5) / self.height as f32 * (-2.0 * self.ymin);
        Ray::new(Vec3::ZERO, Vec3::new(x, y, -1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_pixel_looks_forward() {
        let plane = ViewPlane::new(60.0, 1.0, 5, 5);
        let ray = plane.primary_ray(2, 2);
        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((ray.direction() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_row_zero_is_bottom() {
        let plane = ViewPlane::new(90.0, 2.0, 4, 2);
        let bottom_left = plane.primary_ray(0, 0).direction();
        let top_right = plane.primary_ray(1, 3).direction();

        assert!(bottom_left.x < 0.0 && bottom_left.y < 0.0);
        assert!(top_right.x > 0.0 && top_right.y > 0.0);

        // tan(45) = 1, so the plane spans [-2, 2] x [-1, 1]
        let unnormalized = bottom_left / -bottom_left.z;
        assert!((unnormalized.x - (-1.5)).abs() < 1e-5);
        assert!((unnormalized.y - (-0.5)).abs() < 1e-5);
    }

    #[test]
    fn test_for_camera_derives_aspect() {
        let camera = Camera::default().with_fov(90.0);
        let plane = ViewPlane::for_camera(&camera, 200, 100);
        assert_eq!(plane, ViewPlane::new(90.0, 2.0, 200, 100));
    }
}
