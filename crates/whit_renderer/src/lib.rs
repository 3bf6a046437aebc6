//! whit renderer - Whitted-style CPU ray tracing for polygon scenes.
//!
//! A render pass runs in three steps:
//!
//! 1. [`RaytraceRenderer::render_start`] sets up the camera frame.
//! 2. The scene graph is walked into it ([`whit_core::SceneVisitor`]),
//!    filling a [`SurfaceRegistry`] with camera-space polygons.
//! 3. [`RaytraceRenderer::render_finalize`] freezes the registry and returns a
//!    [`RenderScene`] that renders pixels, rows, whole images or buckets.
//!
//! Shading is local Blinn-Phong with hard shadows plus bounded mirror
//! recursion; there is no sampling, so every render is deterministic.

mod bucket;
mod camera;
mod integrator;
mod raytrace;
mod registry;
mod renderer;
mod shading;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::ViewPlane;
pub use integrator::Integrator;
pub use raytrace::RaytraceRenderer;
pub use registry::{
    Hit, HitRecord, RegistryLoader, Surface, SurfaceId, SurfaceRegistry, DEFAULT_MIN_DISTANCE,
};
pub use renderer::{clamp_01, color_to_rgb, ImageBuffer, RenderScene};
pub use shading::{light_direction, shade};

/// Re-export common math types from whit_math
pub use whit_math::{Camera, Ray, Vec3};
