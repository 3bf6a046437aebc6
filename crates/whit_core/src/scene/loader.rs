//! JSON scene description loading.
//!
//! Scene files name their materials and textures once at the top level and
//! refer to them by name from the node tree. Loading resolves every name into
//! a shared `Arc`, decodes textures through a [`TextureCache`], and validates
//! polygons before anything reaches a renderer.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use whit_math::{Camera, Vec2, Vec3};

use crate::config::RenderConfig;
use crate::material::{Light, Material};
use crate::scene::{Polygon, Scene, SceneNode, TransformOp};
use crate::texture::{TextureCache, TextureError};

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Unknown material reference: {0}")]
    UnknownMaterial(String),

    #[error("Unknown texture reference: {0}")]
    UnknownTexture(String),

    #[error("Material {name} has invalid shininess {shininess} (must be >= 0)")]
    InvalidShininess { name: String, shininess: f32 },

    #[error("Polygon needs at least 3 vertices, got {0}")]
    DegeneratePolygon(usize),
}

/// Result type for scene loading.
pub type SceneResult<T> = Result<T, SceneError>;

#[derive(Deserialize)]
struct SceneFile {
    #[serde(default)]
    camera: Camera,
    #[serde(default)]
    lights: Vec<Light>,
    #[serde(default)]
    materials: BTreeMap<String, Material>,
    /// Texture name -> image path
    #[serde(default)]
    textures: BTreeMap<String, String>,
    #[serde(default)]
    render: RenderConfig,
    root: NodeDesc,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum NodeDesc {
    Composite {
        #[serde(default)]
        children: Vec<NodeDesc>,
    },
    Material {
        material: String,
        #[serde(default)]
        children: Vec<NodeDesc>,
    },
    Transform {
        #[serde(default)]
        ops: Vec<OpDesc>,
        #[serde(default)]
        children: Vec<NodeDesc>,
    },
    Polygon {
        vertices: Vec<Vec3>,
        #[serde(default)]
        normals: Vec<Vec3>,
        #[serde(default)]
        tex_coords: Vec<Vec2>,
        #[serde(default)]
        texture: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum OpDesc {
    Rotate { angle: f32, axis: Vec3 },
    Translate(Vec3),
}

/// Load a scene file. Relative texture paths resolve against the file's
/// directory.
pub fn load_scene(path: impl AsRef<Path>) -> SceneResult<Scene> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut textures = match path.parent() {
        Some(dir) => TextureCache::with_base_dir(dir),
        None => TextureCache::new(),
    };
    let scene = load_scene_from_str(&json, &mut textures)?;

    log::info!(
        "Loaded scene {}: {} polygons, {} lights, {} textures",
        path.display(),
        scene.polygon_count(),
        scene.lights.len(),
        textures.len()
    );
    Ok(scene)
}

/// Parse a scene description, loading referenced textures through `textures`.
pub fn load_scene_from_str(json: &str, textures: &mut TextureCache) -> SceneResult<Scene> {
    let file: SceneFile = serde_json::from_str(json)?;

    let materials = file
        .materials
        .into_iter()
        .map(|(name, material)| {
            // NaN fails the comparison too
            if material.shininess >= 0.0 {
                Ok((name, Arc::new(material)))
            } else {
                Err(SceneError::InvalidShininess {
                    name,
                    shininess: material.shininess,
                })
            }
        })
        .collect::<SceneResult<BTreeMap<_, _>>>()?;

    let mut resolver = Resolver {
        materials: &materials,
        texture_paths: &file.textures,
        textures,
    };
    let root = resolver.resolve(file.root)?;

    Ok(Scene {
        camera: file.camera,
        lights: file.lights,
        render: file.render,
        root,
    })
}

struct Resolver<'a> {
    materials: &'a BTreeMap<String, Arc<Material>>,
    texture_paths: &'a BTreeMap<String, String>,
    textures: &'a mut TextureCache,
}

impl Resolver<'_> {
    fn resolve(&mut self, node: NodeDesc) -> SceneResult<SceneNode> {
        Ok(match node {
            NodeDesc::Composite { children } => SceneNode::Composite(self.resolve_all(children)?),
            NodeDesc::Material { material, children } => {
                let material = self
                    .materials
                    .get(&material)
                    .cloned()
                    .ok_or(SceneError::UnknownMaterial(material))?;
                SceneNode::Material {
                    material,
                    children: self.resolve_all(children)?,
                }
            }
            NodeDesc::Transform { ops, children } => SceneNode::Transform {
                ops: ops
                    .into_iter()
                    .map(|op| match op {
                        OpDesc::Rotate { angle, axis } => TransformOp::Rotate { angle, axis },
                        OpDesc::Translate(offset) => TransformOp::Translate(offset),
                    })
                    .collect(),
                children: self.resolve_all(children)?,
            },
            NodeDesc::Polygon {
                vertices,
                normals,
                tex_coords,
                texture,
            } => {
                if vertices.len() < 3 {
                    return Err(SceneError::DegeneratePolygon(vertices.len()));
                }
                let mut polygon = Polygon::new(vertices)
                    .with_normals(normals)
                    .with_tex_coords(tex_coords);
                if let Some(name) = texture {
                    let path = self
                        .texture_paths
                        .get(&name)
                        .ok_or(SceneError::UnknownTexture(name))?;
                    polygon = polygon.with_texture(self.textures.load(path)?);
                }
                SceneNode::Polygon(polygon)
            }
        })
    }

    fn resolve_all(&mut self, nodes: Vec<NodeDesc>) -> SceneResult<Vec<SceneNode>> {
        nodes.into_iter().map(|node| self.resolve(node)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReflectionPolicy;
    use crate::texture::Texture;

    const SCENE: &str = r#"{
        "camera": { "eye": [0, 0, 5], "center": [0, 0, 0], "fov_y": 30 },
        "lights": [ { "position": [0, 0, 5] } ],
        "materials": {
            "red": { "ambient": [0.2, 0, 0], "diffuse": [1, 0, 0], "specular": [0, 0, 0] }
        },
        "textures": { "checker": "checker.png" },
        "render": { "light_intensity": 0.5, "reflection": "replace" },
        "root": {
            "type": "material",
            "material": "red",
            "children": [
                {
                    "type": "transform",
                    "ops": [ { "translate": [0, 0, -1] }, { "rotate": { "angle": 45, "axis": [0, 1, 0] } } ],
                    "children": [
                        { "type": "polygon",
                          "vertices": [[-0.5, -0.5, 0], [0.5, -0.5, 0], [0.5, 0.5, 0], [-0.5, 0.5, 0]],
                          "tex_coords": [[0, 0], [1, 0]],
                          "texture": "checker" }
                    ]
                }
            ]
        }
    }"#;

    fn cache_with_checker() -> TextureCache {
        let mut cache = TextureCache::new();
        cache.insert("checker.png", Texture::solid_color(Vec3::ONE));
        cache
    }

    #[test]
    fn test_load_scene_from_str() {
        let _ = env_logger::builder().is_test(true).try_init();

        let scene = load_scene_from_str(SCENE, &mut cache_with_checker()).expect("scene should load");

        assert_eq!(scene.camera.fov_y, 30.0);
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.lights[0].diffuse, Vec3::ONE);
        assert_eq!(scene.render.light_intensity, 0.5);
        assert_eq!(scene.render.reflection, ReflectionPolicy::Replace);
        assert_eq!(scene.polygon_count(), 1);

        let SceneNode::Material { material, children } = &scene.root else {
            panic!("root should be a material node");
        };
        assert_eq!(material.diffuse, Vec3::X);

        let SceneNode::Transform { ops, children } = &children[0] else {
            panic!("expected a transform node");
        };
        assert_eq!(ops[0], TransformOp::Translate(Vec3::new(0.0, 0.0, -1.0)));
        assert_eq!(ops[1], TransformOp::Rotate { angle: 45.0, axis: Vec3::Y });

        let SceneNode::Polygon(polygon) = &children[0] else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.vertices.len(), 4);
        assert!(polygon.normals.is_empty());
        assert_eq!(polygon.tex_coords.len(), 2);
        assert!(polygon.texture.is_some());
    }

    #[test]
    fn test_unknown_material() {
        let json = r#"{ "root": { "type": "material", "material": "nope" } }"#;
        let err = load_scene_from_str(json, &mut TextureCache::new()).unwrap_err();
        assert!(matches!(err, SceneError::UnknownMaterial(name) if name == "nope"));
    }

    #[test]
    fn test_unknown_texture() {
        let json = r#"{ "root": { "type": "polygon",
            "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]], "texture": "wood" } }"#;
        let err = load_scene_from_str(json, &mut TextureCache::new()).unwrap_err();
        assert!(matches!(err, SceneError::UnknownTexture(name) if name == "wood"));
    }

    #[test]
    fn test_negative_shininess_rejected() {
        let json = r#"{
            "materials": { "dull": { "specular": [1, 1, 1], "shininess": -4 } },
            "root": { "type": "material", "material": "dull" }
        }"#;
        let err = load_scene_from_str(json, &mut TextureCache::new()).unwrap_err();
        assert!(matches!(
            err,
            SceneError::InvalidShininess { name, shininess } if name == "dull" && shininess == -4.0
        ));
    }

    #[test]
    fn test_degenerate_polygon_rejected() {
        let json = r#"{ "root": { "type": "polygon", "vertices": [[0, 0, 0], [1, 0, 0]] } }"#;
        let err = load_scene_from_str(json, &mut TextureCache::new()).unwrap_err();
        assert!(matches!(err, SceneError::DegeneratePolygon(2)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_scene("/nonexistent/scene.json").unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = load_scene_from_str("{ not json", &mut TextureCache::new()).unwrap_err();
        assert!(matches!(err, SceneError::Json(_)));
    }
}
