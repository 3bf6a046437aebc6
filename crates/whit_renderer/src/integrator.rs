//! Recursive Whitted integrator.
//!
//! One call to [`Integrator::trace`] resolves a ray against the frozen
//! registry, picks the surface base color (texture, material ambient or
//! white), optionally replaces or blends it with a mirrored ray, and then
//! adds the direct contribution of every unshadowed light.

use whit_core::{Color, Light, Material, ReflectionPolicy, RenderConfig};
use whit_math::{Ray, Vec3};

use crate::registry::{HitRecord, SurfaceId, SurfaceRegistry};
use crate::shading::{light_direction, shade};

/// Frozen scene data plus the settings that drive recursion.
#[derive(Debug, Clone)]
pub struct Integrator {
    registry: SurfaceRegistry,
    /// Lights in the registry's frame, in submission order
    lights: Vec<Light>,
    config: RenderConfig,
}

impl Integrator {
    /// `lights` must already be expressed in the registry's frame.
    pub fn new(registry: SurfaceRegistry, lights: Vec<Light>, config: RenderConfig) -> Self {
        Self {
            registry,
            lights,
            config,
        }
    }

    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Color seen along `ray`.
    ///
    /// `depth` counts mirror bounces taken so far; reflection stops once it
    /// reaches `max_depth`. `ignore` excludes the surface the ray leaves.
    /// The result is not clamped.
    pub fn trace(&self, ray: &Ray, depth: u32, ignore: Option<SurfaceId>) -> Color {
        let Some(hit) = self.registry.nearest_hit(ray, f32::INFINITY, ignore) else {
            return self.config.background;
        };
        let record = self.registry.intersect_info(ray, &hit);
        let material = record.material.unwrap_or(&Material::FALLBACK);

        // Shade the side the ray arrived from
        let normal = if record.normal.dot(ray.direction()) > 0.0 {
            -record.normal
        } else {
            record.normal
        };
        let offset_origin = record.point + normal * self.config.epsilon;

        let mut color = Self::base_color(&record);

        if material.is_reflective(self.config.reflection_threshold) && depth < self.config.max_depth {
            let mirrored = Ray::new(offset_origin, Ray::reflect(ray.direction(), normal));
            let reflected = self.trace(&mirrored, depth + 1, Some(record.surface));
            color = match self.config.reflection {
                ReflectionPolicy::Replace => reflected,
                ReflectionPolicy::Blend { factor } => color.lerp(reflected, factor.clamp(0.0, 1.0)),
            };
        }

        for light in &self.lights {
            let (direction, distance) = light_direction(light.position, record.point);
            let shadow = Ray::new(offset_origin, direction);
            if self.registry.any_hit(&shadow, distance, Some(record.surface)) {
                continue;
            }
            color += shade(
                light,
                record.point,
                normal,
                material,
                ray.origin(),
                self.config.light_intensity,
            );
        }

        color
    }

    /// Unlit color of a hit: texture sample, else material ambient, else
    /// white.
    pub fn base_color(record: &HitRecord<'_>) -> Color {
        match (record.texture, record.tex_coord, record.material) {
            (Some(texture), Some(uv), _) => texture.sample(uv),
            (_, _, Some(material)) => material.ambient,
            _ => Vec3::ONE,
        }
    }
}
