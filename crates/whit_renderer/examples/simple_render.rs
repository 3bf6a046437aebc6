//! Simple ray tracer example.
//!
//! Renders a lit floor, a red triangle and a mirror panel and saves to PPM
//! format.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use whit_core::{Color, Light, Material, Polygon, RenderConfig, Scene, SceneNode, TransformOp};
use whit_renderer::{Camera, ImageBuffer, RaytraceRenderer, Vec3};

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("whit - Simple Example");
    println!("=====================");

    let start = std::time::Instant::now();
    let scene = build_scene();
    let prepared = RaytraceRenderer::prepare(&scene);
    println!("Scene built in {:?}", start.elapsed());

    let (width, height) = (400, 300);
    println!("Rendering {}x{}...", width, height);

    let start = std::time::Instant::now();
    let image = prepared.render_image(width, height);
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    save_ppm(&image, filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}

fn quad(half_w: f32, half_h: f32) -> Polygon {
    Polygon::new(vec![
        Vec3::new(-half_w, -half_h, 0.0),
        Vec3::new(half_w, -half_h, 0.0),
        Vec3::new(half_w, half_h, 0.0),
        Vec3::new(-half_w, half_h, 0.0),
    ])
}

fn build_scene() -> Scene {
    let floor = Arc::new(Material::ambient_and_diffuse(Color::new(0.3, 0.3, 0.35)));
    let red = Arc::new(
        Material::ambient_and_diffuse(Color::new(0.6, 0.05, 0.05))
            .with_specular(Color::splat(0.5))
            .with_shininess(32.0),
    );
    let mirror = Arc::new(
        Material::ambient_and_diffuse(Color::splat(0.1))
            .with_specular(Color::ONE)
            .with_shininess(128.0),
    );

    let root = SceneNode::Composite(vec![
        SceneNode::Material {
            material: floor,
            children: vec![SceneNode::Transform {
                ops: vec![TransformOp::Rotate {
                    angle: -90.0,
                    axis: Vec3::X,
                }],
                children: vec![SceneNode::Polygon(quad(10.0, 10.0))],
            }],
        },
        SceneNode::Material {
            material: red,
            children: vec![SceneNode::Polygon(Polygon::new(vec![
                Vec3::new(-2.0, 0.0, 1.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(-1.0, 2.0, 1.0),
            ]))],
        },
        SceneNode::Material {
            material: mirror,
            children: vec![SceneNode::Transform {
                ops: vec![
                    TransformOp::Translate(Vec3::new(1.5, 1.5, -2.0)),
                    TransformOp::Rotate {
                        angle: -30.0,
                        axis: Vec3::Y,
                    },
                ],
                children: vec![SceneNode::Polygon(quad(1.5, 1.5))],
            }],
        },
    ]);

    let camera = Camera::new(Vec3::new(0.0, 3.0, 8.0), Vec3::new(0.0, 1.0, 0.0), Vec3::Y).with_fov(40.0);
    Scene {
        render: RenderConfig {
            light_intensity: 0.8,
            ..Default::default()
        },
        ..Scene::new(camera, root)
    }
    .with_light(Light::new(Vec3::new(4.0, 6.0, 6.0)))
    .with_light(Light::new(Vec3::new(-5.0, 4.0, 2.0)).with_colors(
        Color::ZERO,
        Color::splat(0.4),
        Color::splat(0.4),
    ))
}

/// Write the image top row first.
fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for row in (0..image.height).rev() {
        for rgb in image.row(row).unwrap_or_default() {
            writeln!(writer, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
        }
    }

    Ok(())
}
