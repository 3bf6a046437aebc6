//! Math primitives for the whit ray tracer.
//!
//! Re-exports glam and adds the handful of types every other crate shares:
//! rays, parameter intervals, bounding boxes, the matrix stack used while a
//! scene graph is walked, and the camera contract.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod camera;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use camera::Camera;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::TransformStack;
