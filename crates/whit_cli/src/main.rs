mod demo;
mod output;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use whit_core::{load_scene, RenderConfig, Scene};
use whit_renderer::{RaytraceRenderer, DEFAULT_BUCKET_SIZE};

/// Render a polygon scene with a Whitted-style ray tracer.
#[derive(Parser, Debug)]
#[command(name = "whit", version)]
pub struct Args {
    #[arg(short, long)]
    /// JSON scene description; the built-in demo scene when omitted
    scene: Option<PathBuf>,

    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(u32).range(1..))]
    /// Image width in pixels
    width: u32,

    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u32).range(1..))]
    /// Image height in pixels
    height: u32,

    #[arg(long)]
    /// Override the maximum number of mirror bounces
    max_depth: Option<u32>,

    #[arg(long)]
    /// Override the light intensity scale
    intensity: Option<f32>,

    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    /// Bucket edge length in pixels
    bucket_size: u32,

    #[arg(long)]
    /// Number of render threads (defaults to one per core)
    threads: Option<usize>,

    #[arg(short, long, default_value = "render.png")]
    /// Output file: .png, .ppm or .raw (bottom-up rows padded to 4 bytes)
    output: PathBuf,
}

impl Args {
    /// Apply command-line overrides on top of the scene's settings.
    fn apply_overrides(&self, config: &mut RenderConfig) {
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(intensity) = self.intensity {
            config.light_intensity = intensity;
        }
    }

    fn load_scene(&self) -> Result<Scene> {
        let mut scene = match &self.scene {
            Some(path) => load_scene(path)
                .with_context(|| format!("Failed to load scene {}", path.display()))?,
            None => {
                log::info!("No scene given, rendering the demo scene");
                demo::demo_scene().context("Failed to build the demo scene")?
            }
        };
        self.apply_overrides(&mut scene.render);
        Ok(scene)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    log::info!("Starting whit");

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the render thread pool")?;
    }

    let scene = args.load_scene()?;
    let prepared = RaytraceRenderer::prepare(&scene);
    let image = render::render_buckets(&prepared, args.width, args.height, args.bucket_size);
    output::save(&image, &args.output)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_and_override() {
        let args = Args::try_parse_from([
            "whit",
            "--width",
            "64",
            "--max-depth",
            "5",
            "--intensity",
            "0.5",
            "-o",
            "out.ppm",
        ])
        .expect("arguments should parse");

        assert_eq!((args.width, args.height), (64, 600));
        assert_eq!(args.bucket_size, DEFAULT_BUCKET_SIZE);
        assert_eq!(args.output, PathBuf::from("out.ppm"));

        let mut config = RenderConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.light_intensity, 0.5);
        assert_eq!(config.epsilon, RenderConfig::default().epsilon);
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(Args::try_parse_from(["whit", "--width", "0"]).is_err());
    }

    #[test]
    fn test_unlit_texture_renders_its_texel_bytes() {
        let dir = std::env::temp_dir().join(format!("whit_cli_texture_{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        image::RgbImage::from_pixel(2, 2, image::Rgb([128, 200, 7]))
            .save(dir.join("flat.png"))
            .expect("write png");
        let scene_path = dir.join("scene.json");
        std::fs::write(
            &scene_path,
            r#"{
                "camera": { "eye": [0, 0, 5], "center": [0, 0, 0], "fov_y": 30 },
                "textures": { "flat": "flat.png" },
                "root": { "type": "polygon",
                    "vertices": [[-1, -1, 0], [1, -1, 0], [1, 1, 0], [-1, 1, 0]],
                    "tex_coords": [[0, 0], [1, 0], [1, 1], [0, 1]],
                    "texture": "flat" }
            }"#,
        )
        .expect("write scene");

        let scene_arg = scene_path.to_string_lossy().to_string();
        let args = Args::try_parse_from(["whit", "--scene", scene_arg.as_str()]).expect("arguments should parse");
        let scene = args.load_scene().expect("scene loads");
        let prepared = RaytraceRenderer::prepare(&scene);
        assert_eq!(prepared.render_pixel(2, 2, 5, 5), Some([128, 200, 7]));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_demo_scene_used_without_file() {
        let args = Args::try_parse_from(["whit", "--max-depth", "1"]).expect("arguments should parse");
        let scene = args.load_scene().expect("demo scene loads");
        assert_eq!(scene.polygon_count(), 17);
        assert_eq!(scene.render.max_depth, 1);
    }
}
