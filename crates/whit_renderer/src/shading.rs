//! Blinn-Phong shading for a single point light.

use whit_core::{Color, Light, Material};
use whit_math::Vec3;

/// Unit direction from `point` toward `light_position` and the distance
/// between them.
///
/// A light sitting exactly on the point yields a zero direction and zero
/// distance rather than a NaN.
pub fn light_direction(light_position: Vec3, point: Vec3) -> (Vec3, f32) {
    let delta = light_position - point;
    let distance = delta.length();
    if distance > 0.0 {
        (delta / distance, distance)
    } else {
        (Vec3::ZERO, 0.0)
    }
}

/// Diffuse and specular contribution of `light` at `hit_point`.
///
/// `intensity` scales both terms. Specular uses the half vector between the
/// light and view directions, and is zero when the light is behind the
/// surface. Ambient is not included; the integrator adds it once per hit.
pub fn shade(
    light: &Light,
    hit_point: Vec3,
    normal: Vec3,
    material: &Material,
    view_point: Vec3,
    intensity: f32,
) -> Color {
    let n = normal.normalize_or_zero();
    let (l, _) = light_direction(light.position, hit_point);
    let v = (view_point - hit_point).normalize_or_zero();
    let h = (l + v).normalize_or_zero();

    let n_dot_l = n.dot(l).max(0.0);
    let diffuse = intensity * n_dot_l;
    let specular = if n_dot_l > 0.0 {
        intensity * n.dot(h).max(0.0).powf(material.shininess.max(0.0))
    } else {
        0.0
    };

    material.diffuse * light.diffuse * diffuse + material.specular * light.specular * specular
}
