//! Surface materials and point lights.

use serde::{Deserialize, Serialize};
use whit_math::{Mat4, Vec3};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Fixed-function style surface material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Ambient reflectance; also the unlit base color of the surface
    pub ambient: Color,

    /// Diffuse reflectance (RGB, 0-1)
    pub diffuse: Color,

    /// Specular reflectance (RGB, 0-1)
    pub specular: Color,

    /// Specular exponent; at or above the renderer's reflection threshold the
    /// surface is treated as a mirror
    pub shininess: f32,
}

impl Material {
    /// Coefficients used when a surface carries no material: the classic
    /// fixed-function defaults.
    pub const FALLBACK: Material = Material {
        ambient: Vec3::splat(0.2),
        diffuse: Vec3::splat(0.8),
        specular: Vec3::ZERO,
        shininess: 0.0,
    };

    /// Material whose ambient and diffuse reflectance are both `color`.
    pub fn ambient_and_diffuse(color: Color) -> Self {
        Self {
            ambient: color,
            diffuse: color,
            ..Self::FALLBACK
        }
    }

    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_diffuse(mut self, diffuse: Color) -> Self {
        self.diffuse = diffuse;
        self
    }

    pub fn with_specular(mut self, specular: Color) -> Self {
        self.specular = specular;
        self
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess.max(0.0);
        self
    }

    /// Whether this material mirrors incoming rays at the given threshold.
    pub fn is_reflective(&self, threshold: f32) -> bool {
        self.shininess >= threshold
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// A point light.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Light {
    pub position: Vec3,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            ambient: Color::ZERO,
            diffuse: Color::ONE,
            specular: Color::ONE,
        }
    }
}

impl Light {
    /// White light at `position`.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_colors(mut self, ambient: Color, diffuse: Color, specular: Color) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    /// The same light with its position mapped through `m`.
    pub fn transformed(&self, m: &Mat4) -> Self {
        Self {
            position: m.transform_point3(self.position),
            ..self.clone()
        }
    }
}
