//! Render configuration shared by the scene loader and the renderer.

use serde::{Deserialize, Serialize};

use crate::material::Color;

/// How a mirror's reflected color combines with its own base color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionPolicy {
    /// The reflected color replaces the base color.
    #[default]
    Replace,
    /// `base * (1 - factor) + reflected * factor`
    Blend { factor: f32 },
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum number of recursive mirror bounces
    pub max_depth: u32,
    /// Shininess at or above which a material is treated as a mirror
    pub reflection_threshold: f32,
    /// How reflected color is combined with the surface color
    pub reflection: ReflectionPolicy,
    /// Scalar applied to every light's diffuse and specular terms
    pub light_intensity: f32,
    /// Offset along the normal for shadow and reflection ray origins
    pub epsilon: f32,
    /// Color returned when a ray hits nothing
    pub background: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            reflection_threshold: 100.0,
            reflection: ReflectionPolicy::Replace,
            light_intensity: 1.0,
            epsilon: 1e-3,
            background: Color::ZERO,
        }
    }
}
