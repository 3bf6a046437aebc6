//! whit core - scene description for the whit ray tracer.
//!
//! This crate provides:
//!
//! - **Materials and lights**: `Material`, `Light`
//! - **Scene graph**: a tagged `SceneNode` tree flattened through `SceneVisitor`
//! - **Scene files**: JSON loading with named materials and textures
//! - **Textures**: decoded images and a path-keyed cache
//! - **Render settings**: `RenderConfig`
//!
//! # Example
//!
//! ```ignore
//! use whit_core::load_scene;
//!
//! let scene = load_scene("scene.json")?;
//! println!("Loaded {} polygons, {} lights",
//!     scene.polygon_count(),
//!     scene.lights.len());
//! ```

pub mod config;
pub mod material;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use config::{ReflectionPolicy, RenderConfig};
pub use material::{Color, Light, Material};
pub use scene::{
    load_scene, load_scene_from_str, Polygon, Scene, SceneError, SceneNode, SceneResult,
    SceneVisitor, TransformOp,
};
pub use texture::{Texture, TextureCache, TextureError, TextureResult};
