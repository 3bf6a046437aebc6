// Matrix stack for scene-graph traversal.
//
// The base frame is always the camera look-at matrix, so every point pushed
// through the stack lands in camera space (eye at the origin, looking down -Z).

use glam::{Mat4, Vec3};

/// Stack of object-to-camera transforms.
///
/// Never empty: the look-at frame supplied at construction is the base and
/// cannot be popped.
#[derive(Debug, Clone)]
pub struct TransformStack {
    stack: Vec<Mat4>,
}

impl TransformStack {
    /// Create a stack whose base frame is a right-handed look-at transform.
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self::with_base(Mat4::look_at_rh(eye, center, up))
    }

    /// Create a stack with an arbitrary base frame.
    pub fn with_base(base: Mat4) -> Self {
        Self { stack: vec![base] }
    }

    /// Duplicate the top transform.
    pub fn push(&mut self) {
        let top = self.top();
        self.stack.push(top);
    }

    /// Restore the transform that was current before the matching `push`.
    ///
    /// # Panics
    ///
    /// Panics if only the base frame is left; an unbalanced pop is a bug in
    /// the traversal, not a recoverable condition.
    pub fn pop(&mut self) {
        assert!(
            self.stack.len() > 1,
            "transform stack underflow: pop without matching push"
        );
        self.stack.pop();
    }

    /// Right-multiply the top by a rotation of `angle` degrees about `axis`.
    pub fn rotate(&mut self, angle: f32, axis: Vec3) {
        let Some(axis) = axis.try_normalize() else {
            log::warn!("Ignoring rotation about a zero-length axis");
            return;
        };
        self.apply(Mat4::from_axis_angle(axis, angle.to_radians()));
    }

    /// Right-multiply the top by a translation.
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.apply(Mat4::from_translation(Vec3::new(dx, dy, dz)));
    }

    /// Right-multiply the top by an arbitrary matrix.
    pub fn apply(&mut self, m: Mat4) {
        if let Some(top) = self.stack.last_mut() {
            *top *= m;
        }
    }

    /// The current transform.
    pub fn top(&self) -> Mat4 {
        self.stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    /// Number of frames on the stack, including the base.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Transform a position by the current top.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.top().transform_point3(point)
    }

    /// Transform a normal by the current top, ignoring translation.
    ///
    /// The stack only composes rigid motions, so the upper 3x3 is orthonormal
    /// and no inverse-transpose is needed.
    pub fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.top().transform_vector3(normal).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_look_at_puts_eye_at_origin() {
        let stack = TransformStack::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        assert_eq!(stack.depth(), 1);
        assert!(approx(stack.transform_point(Vec3::new(0.0, 0.0, 5.0)), Vec3::ZERO));
        assert!(approx(stack.transform_point(Vec3::ZERO), Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn test_push_duplicates_and_pop_restores() {
        let mut stack = TransformStack::with_base(Mat4::IDENTITY);
        stack.push();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top(), Mat4::IDENTITY);

        stack.translate(1.0, 2.0, 3.0);
        assert!(approx(stack.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0)));

        stack.pop();
        assert_eq!(stack.top(), Mat4::IDENTITY);
    }

    #[test]
    #[should_panic(expected = "transform stack underflow")]
    fn test_pop_base_panics() {
        let mut stack = TransformStack::with_base(Mat4::IDENTITY);
        stack.pop();
    }

    #[test]
    fn test_most_recent_transform_is_innermost() {
        // translate then rotate: the vertex is rotated first, then translated
        let mut stack = TransformStack::with_base(Mat4::IDENTITY);
        stack.translate(10.0, 0.0, 0.0);
        stack.rotate(90.0, Vec3::Z);
        assert!(approx(stack.transform_point(Vec3::X), Vec3::new(10.0, 1.0, 0.0)));

        // rotate then translate: the vertex is translated first, then rotated
        let mut stack = TransformStack::with_base(Mat4::IDENTITY);
        stack.rotate(90.0, Vec3::Z);
        stack.translate(10.0, 0.0, 0.0);
        assert!(approx(stack.transform_point(Vec3::X), Vec3::new(0.0, 11.0, 0.0)));
    }

    #[test]
    fn test_normals_ignore_translation() {
        let mut stack = TransformStack::with_base(Mat4::IDENTITY);
        stack.translate(5.0, 5.0, 5.0);
        assert!(approx(stack.transform_normal(Vec3::Y), Vec3::Y));

        stack.rotate(90.0, Vec3::X);
        assert!(approx(stack.transform_normal(Vec3::Y), Vec3::Z));
    }

    #[test]
    fn test_zero_axis_rotation_is_ignored() {
        let mut stack = TransformStack::with_base(Mat4::IDENTITY);
        stack.rotate(45.0, Vec3::ZERO);
        assert_eq!(stack.top(), Mat4::IDENTITY);
    }
}
