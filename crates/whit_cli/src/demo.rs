//! Built-in demo scene: a wooden tetrahedron, a tiled floor, a mirror-red box
//! and a white box wrapped in a world map, under two lights.

use std::sync::Arc;

use whit_core::{Color, Light, Material, Polygon, Scene, SceneNode, Texture, TextureResult};
use whit_math::{Camera, Vec2, Vec3};

/// Tiles per side of the procedural floor texture.
const FLOOR_TILES: u32 = 8;

/// Edge length of the procedural wood and world textures.
const PATTERN_SIZE: u32 = 32;

pub fn demo_scene() -> TextureResult<Scene> {
    let tiles = Arc::new(tile_texture(FLOOR_TILES)?);
    let grain = Arc::new(wood_texture(PATTERN_SIZE)?);
    let world = Arc::new(world_texture(PATTERN_SIZE)?);

    let wood = Arc::new(Material::ambient_and_diffuse(Color::new(0.55, 0.35, 0.2)));
    let red_paint = Arc::new(
        Material::ambient_and_diffuse(Color::new(0.8, 0.0, 0.0))
            .with_specular(Color::ONE)
            .with_shininess(100.0),
    );
    let white_paint = Arc::new(Material::ambient_and_diffuse(Color::splat(0.8)));

    let root = SceneNode::Composite(vec![
        SceneNode::Material {
            material: wood,
            children: tetrahedron(grain),
        },
        floor(tiles),
        SceneNode::Material {
            material: red_paint,
            children: vec![cuboid(Vec3::new(-15.0, -5.0, 2.0), Vec3::splat(5.0), None)],
        },
        SceneNode::Material {
            material: white_paint,
            children: vec![cuboid(Vec3::new(-8.0, -5.0, -8.0), Vec3::splat(5.0), Some(world))],
        },
    ]);

    let camera = Camera::new(Vec3::new(30.0, 15.0, 80.0), Vec3::ZERO, Vec3::Y)
        .with_fov(30.0)
        .with_clip(20.0, 1000.0);

    let light = |position| {
        Light::new(position).with_colors(Color::splat(0.3), Color::splat(0.6), Color::splat(0.7))
    };

    Ok(Scene::new(camera, root)
        .with_light(light(Vec3::new(20.0, 5.0, 25.0)))
        .with_light(light(Vec3::new(-20.0, 5.0, -25.0))))
}

fn tetrahedron(texture: Arc<Texture>) -> Vec<SceneNode> {
    let t0 = Vec3::new(5.0, -5.0, 10.0);
    let t1 = Vec3::new(0.0, -5.0, 5.0);
    let t2 = Vec3::new(10.0, -5.0, 5.0);
    let apex = Vec3::new(5.0, 4.0, 5.0);

    [[t0, t1, t2], [t1, t0, apex], [t2, t1, apex], [t0, t2, apex]]
        .into_iter()
        .map(|corners| {
            SceneNode::Polygon(
                Polygon::new(corners.to_vec())
                    .with_tex_coords(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.5, 1.0)])
                    .with_texture(texture.clone()),
            )
        })
        .collect()
}

fn floor(texture: Arc<Texture>) -> SceneNode {
    let vertices = vec![
        Vec3::new(-22.0, -5.0, -15.0),
        Vec3::new(-22.0, -5.0, 15.0),
        Vec3::new(15.0, -5.0, 15.0),
        Vec3::new(15.0, -5.0, -15.0),
    ];
    let tex_coords = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(1.0, 0.0),
    ];
    SceneNode::Polygon(
        Polygon::new(vertices)
            .with_tex_coords(tex_coords)
            .with_texture(texture),
    )
}

/// Axis-aligned box spanning `origin` to `origin + size`, faces wound
/// outward. Each face maps the whole of `texture`, if given.
pub fn cuboid(origin: Vec3, size: Vec3, texture: Option<Arc<Texture>>) -> SceneNode {
    let corner = |x: usize, y: usize, z: usize| {
        origin + Vec3::new(x as f32 * size.x, y as f32 * size.y, z as f32 * size.z)
    };
    let faces = [
        [(0, 0, 1), (1, 0, 1), (1, 1, 1), (0, 1, 1)], // +Z
        [(1, 0, 0), (0, 0, 0), (0, 1, 0), (1, 1, 0)], // -Z
        [(1, 0, 1), (1, 0, 0), (1, 1, 0), (1, 1, 1)], // +X
        [(0, 0, 0), (0, 0, 1), (0, 1, 1), (0, 1, 0)], // -X
        [(0, 1, 1), (1, 1, 1), (1, 1, 0), (0, 1, 0)], // +Y
        [(0, 0, 0), (1, 0, 0), (1, 0, 1), (0, 0, 1)], // -Y
    ];

    SceneNode::Composite(
        faces
            .iter()
            .map(|face| {
                let vertices = face.iter().map(|&(x, y, z)| corner(x, y, z)).collect();
                let polygon = match &texture {
                    Some(texture) => Polygon::new(vertices)
                        .with_tex_coords(vec![
                            Vec2::new(0.0, 0.0),
                            Vec2::new(1.0, 0.0),
                            Vec2::new(1.0, 1.0),
                            Vec2::new(0.0, 1.0),
                        ])
                        .with_texture(texture.clone()),
                    None => Polygon::new(vertices),
                };
                SceneNode::Polygon(polygon)
            })
            .collect(),
    )
}

/// Red and white checkerboard.
fn tile_texture(tiles: u32) -> TextureResult<Texture> {
    let red = Vec3::new(0.8, 0.05, 0.05);
    let white = Vec3::splat(0.9);
    let pixels = (0..tiles * tiles)
        .map(|i| if (i / tiles + i % tiles) % 2 == 0 { red } else { white })
        .collect();
    Texture::new(tiles, tiles, pixels, "<demo tiles>")
}

/// Brown rings around a center just off the bottom edge.
fn wood_texture(size: u32) -> TextureResult<Texture> {
    let dark = Vec3::new(0.35, 0.2, 0.08);
    let light = Vec3::new(0.7, 0.48, 0.25);
    let pixels = (0..size * size)
        .map(|i| {
            let x = (i % size) as f32 / size as f32 - 0.5;
            let y = (i / size) as f32 / size as f32 - 1.2;
            let rings = (x.hypot(y) * 40.0).sin() * 0.5 + 0.5;
            dark.lerp(light, rings)
        })
        .collect();
    Texture::new(size, size, pixels, "<demo wood>")
}

/// Green blobs on a blue ocean with white polar rows.
fn world_texture(size: u32) -> TextureResult<Texture> {
    let ocean = Vec3::new(0.1, 0.25, 0.6);
    let land = Vec3::new(0.2, 0.55, 0.2);
    let ice = Vec3::splat(0.95);
    let pixels = (0..size * size)
        .map(|i| {
            let (x, y) = (i % size, i / size);
            if y < size / 8 || y >= size - size / 8 {
                return ice;
            }
            let u = x as f32 / size as f32 * std::f32::consts::TAU;
            let v = y as f32 / size as f32 * std::f32::consts::PI;
            if (2.0 * u).sin() * (3.0 * v).sin() + (u + v).cos() * 0.5 > 0.4 {
                land
            } else {
                ocean
            }
        })
        .collect();
    Texture::new(size, size, pixels, "<demo world>")
}
