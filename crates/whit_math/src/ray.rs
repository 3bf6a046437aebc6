use crate::Vec3;

/// A ray in 3D space.
///
/// The direction is normalized on construction, so `at(t)` measures `t` in
/// scene units. A zero direction stays zero and hits nothing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the (unit) direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Mirror the ray direction about `normal`: `D - 2(D·N)N`.
    pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
        direction - 2.0 * direction.dot(normal) * normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(ray.direction(), Vec3::NEG_Z);
        assert!((ray.direction().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_direction_stays_zero() {
        let ray = Ray::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(ray.direction(), Vec3::ZERO);
        assert_eq!(ray.at(10.0), Vec3::ONE);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.at(2.0), Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::ZERO);
    }

    #[test]
    fn test_reflect_about_normal() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = Ray::reflect(d, Vec3::Y);
        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);

        // Head-on reflection reverses the ray
        assert_eq!(Ray::reflect(Vec3::NEG_Z, Vec3::Z), Vec3::Z);
    }
}
