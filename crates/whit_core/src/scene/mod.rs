//! Scene graph types.
//!
//! A scene is a tree of [`SceneNode`]s. Renderers never inspect the tree
//! directly; they implement [`SceneVisitor`] and receive a flat stream of
//! transform events, material changes and polygons from [`SceneNode::walk`].

mod loader;

pub use loader::{load_scene, load_scene_from_str, SceneError, SceneResult};

use std::sync::Arc;

use whit_math::{Camera, Vec2, Vec3};

use crate::config::RenderConfig;
use crate::material::{Light, Material};
use crate::texture::Texture;

/// An elementary transform applied to the current frame.
#[derive(Clone, Debug, PartialEq)]
pub enum TransformOp {
    /// Rotation by `angle` degrees about `axis`
    Rotate { angle: f32, axis: Vec3 },
    Translate(Vec3),
}

/// A polygon in its local coordinate frame.
///
/// `normals` and `tex_coords` run parallel to `vertices` and may be shorter;
/// vertices past their end simply have no normal or coordinate.
#[derive(Clone, Debug, Default)]
pub struct Polygon {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub texture: Option<Arc<Texture>>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            ..Default::default()
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_tex_coords(mut self, tex_coords: Vec<Vec2>) -> Self {
        self.tex_coords = tex_coords;
        self
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }
}

/// A node of the scene graph.
#[derive(Clone, Debug)]
pub enum SceneNode {
    /// Plain grouping node.
    Composite(Vec<SceneNode>),
    /// Applies `material` to every polygon below it. The enclosing material
    /// is restored once the children have been visited.
    Material {
        material: Arc<Material>,
        children: Vec<SceneNode>,
    },
    /// Pushes a frame, applies `ops` in order, visits the children, pops.
    Transform {
        ops: Vec<TransformOp>,
        children: Vec<SceneNode>,
    },
    Polygon(Polygon),
}

/// Receives the flattened traversal stream of a scene graph.
pub trait SceneVisitor {
    fn push_transform(&mut self);
    fn pop_transform(&mut self);
    fn rotate(&mut self, angle: f32, axis: Vec3);
    fn translate(&mut self, offset: Vec3);
    fn set_material(&mut self, material: Option<Arc<Material>>);
    fn polygon(&mut self, polygon: &Polygon);
}

impl SceneNode {
    /// Walk the tree depth-first, in child order, feeding `visitor`.
    pub fn walk<V: SceneVisitor + ?Sized>(&self, visitor: &mut V) {
        self.walk_with(visitor, None);
    }

    fn walk_with<V: SceneVisitor + ?Sized>(&self, visitor: &mut V, current: Option<&Arc<Material>>) {
        match self {
            SceneNode::Composite(children) => {
                for child in children {
                    child.walk_with(visitor, current);
                }
            }
            SceneNode::Material { material, children } => {
                visitor.set_material(Some(material.clone()));
                for child in children {
                    child.walk_with(visitor, Some(material));
                }
                visitor.set_material(current.cloned());
            }
            SceneNode::Transform { ops, children } => {
                visitor.push_transform();
                for op in ops {
                    match op {
                        TransformOp::Rotate { angle, axis } => visitor.rotate(*angle, *axis),
                        TransformOp::Translate(offset) => visitor.translate(*offset),
                    }
                }
                for child in children {
                    child.walk_with(visitor, current);
                }
                visitor.pop_transform();
            }
            SceneNode::Polygon(polygon) => visitor.polygon(polygon),
        }
    }

    /// Number of polygons in this subtree.
    pub fn polygon_count(&self) -> usize {
        match self {
            SceneNode::Polygon(_) => 1,
            SceneNode::Composite(children)
            | SceneNode::Material { children, .. }
            | SceneNode::Transform { children, .. } => {
                children.iter().map(SceneNode::polygon_count).sum()
            }
        }
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        SceneNode::Composite(Vec::new())
    }
}

/// A complete scene: camera, lights, render settings and the node tree.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub render: RenderConfig,
    pub root: SceneNode,
}

impl Scene {
    pub fn new(camera: Camera, root: SceneNode) -> Self {
        Self {
            camera,
            root,
            ..Default::default()
        }
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    pub fn polygon_count(&self) -> usize {
        self.root.polygon_count()
    }
}
