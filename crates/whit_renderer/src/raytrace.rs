//! Scene-graph front end of the ray tracer.
//!
//! A [`RaytraceRenderer`] is created by [`RaytraceRenderer::render_start`],
//! fed through its [`SceneVisitor`] implementation and turned into a
//! [`RenderScene`] by [`RaytraceRenderer::render_finalize`]. Every polygon is
//! moved into the camera frame as it arrives, so the registry never sees
//! local coordinates.

use std::sync::Arc;

use whit_core::{Light, Material, Polygon, RenderConfig, Scene, SceneVisitor};
use whit_math::{Camera, TransformStack, Vec3};

use crate::integrator::Integrator;
use crate::registry::{RegistryLoader, SurfaceRegistry};
use crate::renderer::RenderScene;

/// Accumulates a scene into a surface registry.
#[derive(Debug)]
pub struct RaytraceRenderer {
    camera: Camera,
    config: RenderConfig,
    transforms: TransformStack,
    loader: RegistryLoader,
    lights: Vec<Light>,
    material: Option<Arc<Material>>,
}

impl RaytraceRenderer {
    /// Begin a render pass.
    ///
    /// The transform stack starts at the camera's look-at frame and `lights`
    /// are moved into that same frame.
    pub fn render_start(camera: Camera, lights: &[Light], config: RenderConfig) -> Self {
        let view = camera.view_matrix();
        let transforms = TransformStack::with_base(view);
        let lights = lights.iter().map(|light| light.transformed(&view)).collect();

        log::debug!(
            "Render start: eye {:?} looking at {:?}, fov {}",
            camera.eye,
            camera.center,
            camera.fov_y
        );

        Self {
            camera,
            config,
            transforms,
            loader: SurfaceRegistry::begin_load(),
            lights,
            material: None,
        }
    }

    /// Feed a whole scene graph and finalize.
    pub fn prepare(scene: &Scene) -> RenderScene {
        let mut renderer = Self::render_start(scene.camera, &scene.lights, scene.render.clone());
        scene.root.walk(&mut renderer);
        renderer.render_finalize()
    }

    /// Current transform stack.
    pub fn transforms(&self) -> &TransformStack {
        &self.transforms
    }

    /// Freeze the registry and hand back a renderable scene.
    pub fn render_finalize(self) -> RenderScene {
        if self.transforms.depth() != 1 {
            log::warn!(
                "Render finalized with {} unpopped transform(s)",
                self.transforms.depth() - 1
            );
        }
        let registry = self.loader.end_load();
        log::info!(
            "Scene ready: {} surfaces, {} lights",
            registry.len(),
            self.lights.len()
        );
        RenderScene::new(Integrator::new(registry, self.lights, self.config), self.camera)
    }
}

impl SceneVisitor for RaytraceRenderer {
    fn push_transform(&mut self) {
        self.transforms.push();
    }

    fn pop_transform(&mut self) {
        self.transforms.pop();
    }

    fn rotate(&mut self, angle: f32, axis: Vec3) {
        self.transforms.rotate(angle, axis);
    }

    fn translate(&mut self, offset: Vec3) {
        self.transforms.translate(offset.x, offset.y, offset.z);
    }

    fn set_material(&mut self, material: Option<Arc<Material>>) {
        self.material = material;
    }

    fn polygon(&mut self, polygon: &Polygon) {
        let loader = &mut self.loader;
        loader.begin_surface();
        loader.set_material(self.material.clone());
        loader.set_texture(polygon.texture.clone());

        for (i, vertex) in polygon.vertices.iter().enumerate() {
            if let Some(normal) = polygon.normals.get(i) {
                loader.add_normal(self.transforms.transform_normal(*normal));
            }
            if let Some(uv) = polygon.tex_coords.get(i) {
                loader.add_tex_coord(*uv);
            }
            loader.add_vertex(self.transforms.transform_point(*vertex));
        }
        loader.end_surface();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whit_core::{SceneNode, TransformOp};
    use whit_math::Ray;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
    }

    fn unit_square() -> Polygon {
        Polygon::new(vec![
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
        ])
    }

    #[test]
    fn test_surfaces_land_in_camera_space() {
        let mut renderer = RaytraceRenderer::render_start(camera(), &[], RenderConfig::default());
        renderer.polygon(&unit_square());
        let scene = renderer.render_finalize();

        let registry = scene.integrator().registry();
        assert_eq!(registry.len(), 1);
        let (_, surface) = registry.surfaces().next().expect("one surface");
        for vertex in surface.vertices() {
            assert!((vertex.z + 5.0).abs() < 1e-5);
        }
        assert!((surface.normal() - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_lights_follow_the_view_transform() {
        let light = Light::new(Vec3::new(1.0, 0.0, 5.0));
        let scene = RaytraceRenderer::render_start(camera(), &[light], RenderConfig::default()).render_finalize();
        let moved = &scene.integrator().lights()[0];
        assert!((moved.position - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_transforms_apply_to_vertices_and_normals() {
        let mut renderer = RaytraceRenderer::render_start(camera(), &[], RenderConfig::default());
        renderer.push_transform();
        renderer.translate(Vec3::new(2.0, 0.0, 0.0));
        renderer.rotate(90.0, Vec3::Y);
        renderer.polygon(&unit_square().with_normals(vec![Vec3::Z; 4]));
        renderer.pop_transform();
        assert_eq!(renderer.transforms().depth(), 1);

        // Ray from the eye toward the translated square, which now faces +X
        let scene = renderer.render_finalize();
        let registry = scene.integrator().registry();
        let ray = Ray::new(Vec3::new(10.0, 0.0, -5.0), Vec3::NEG_X);
        let hit = registry.nearest_hit(&ray, f32::INFINITY, None).expect("should hit");
        assert!((hit.point - Vec3::new(2.0, 0.0, -5.0)).length() < 1e-4);

        let record = registry.intersect_info(&ray, &hit);
        assert!((record.normal - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_material_is_attached_to_later_polygons() {
        let shiny = Arc::new(Material::default().with_shininess(7.0));
        let mut renderer = RaytraceRenderer::render_start(camera(), &[], RenderConfig::default());
        renderer.polygon(&unit_square());
        renderer.set_material(Some(shiny));
        renderer.polygon(&unit_square());
        let scene = renderer.render_finalize();

        let materials: Vec<Option<f32>> = scene
            .integrator()
            .registry()
            .surfaces()
            .map(|(_, s)| s.material().map(|m| m.shininess))
            .collect();
        assert_eq!(materials, vec![None, Some(7.0)]);
    }

    #[test]
    fn test_prepare_walks_scene_graph() {
        let _ = env_logger::builder().is_test(true).try_init();

        let red = Arc::new(Material::ambient_and_diffuse(Vec3::X).with_specular(Vec3::ZERO));
        let root = SceneNode::Material {
            material: red,
            children: vec![
                SceneNode::Polygon(unit_square()),
                SceneNode::Transform {
                    ops: vec![TransformOp::Translate(Vec3::new(0.0, 0.0, -3.0))],
                    children: vec![SceneNode::Polygon(unit_square())],
                },
            ],
        };
        let scene = Scene::new(camera(), root).with_light(Light::new(Vec3::new(0.0, 0.0, 5.0)));

        let prepared = RaytraceRenderer::prepare(&scene);
        assert_eq!(prepared.integrator().registry().len(), 2);

        // The near square hides the far one
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = prepared
            .integrator()
            .registry()
            .nearest_hit(&ray, f32::INFINITY, None)
            .expect("should hit");
        assert!((hit.t - 5.0).abs() < 1e-4);

        let [r, g, b] = prepared.render_pixel(2, 2, 5, 5).expect("center pixel");
        assert!(r > 0 && g == 0 && b == 0);
    }
}
