//! Per-pixel driving and the output image.
//!
//! Implements the final stage of a render:
//! - One centered primary ray per pixel, traced with depth 0
//! - Clamp to [0, 1] and truncate to bytes (no gamma)
//! - Rows evaluated independently, in parallel with rayon

use rayon::prelude::*;
use whit_core::Color;
use whit_math::{Camera, Ray};

use crate::camera::ViewPlane;
use crate::integrator::Integrator;
use crate::registry::SurfaceId;

/// A finalized scene, ready to be sampled.
///
/// Immutable and `Sync`: any number of threads may render pixels from it at
/// once.
#[derive(Debug, Clone)]
pub struct RenderScene {
    integrator: Integrator,
    camera: Camera,
}

impl RenderScene {
    pub fn new(integrator: Integrator, camera: Camera) -> Self {
        Self { integrator, camera }
    }

    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Color seen along a camera-space ray. See [`Integrator::trace`].
    pub fn trace(&self, ray: &Ray, depth: u32, ignore: Option<SurfaceId>) -> Color {
        self.integrator.trace(ray, depth, ignore)
    }

    /// View plane for an image of the given size.
    pub fn view_plane(&self, width: u32, height: u32) -> ViewPlane {
        ViewPlane::for_camera(&self.camera, width, height)
    }

    /// Byte color of pixel (`row`, `col`) in a `width` x `height` image, or
    /// `None` outside the image. Row 0 is the bottom of the view.
    pub fn render_pixel(&self, row: u32, col: u32, width: u32, height: u32) -> Option<[u8; 3]> {
        (row < height && col < width).then(|| self.sample(&self.view_plane(width, height), row, col))
    }

    /// One full row, left to right.
    pub fn render_row(&self, row: u32, width: u32, height: u32) -> Vec<[u8; 3]> {
        let plane = self.view_plane(width, height);
        (0..width).map(|col| self.sample(&plane, row, col)).collect()
    }

    /// Render the whole image, rows in parallel.
    pub fn render_image(&self, width: u32, height: u32) -> ImageBuffer {
        let plane = self.view_plane(width, height);
        let mut image = ImageBuffer::new(width, height);
        if width == 0 {
            return image;
        }

        image
            .pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(row, pixels)| {
                for (col, pixel) in pixels.iter_mut().enumerate() {
                    *pixel = self.sample(&plane, row as u32, col as u32);
                }
            });

        image
    }

    pub(crate) fn sample(&self, plane: &ViewPlane, row: u32, col: u32) -> [u8; 3] {
        color_to_rgb(self.integrator.trace(&plane.primary_ray(row, col), 0, None))
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a color to 8-bit RGB, truncating.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let r = (255.0 * clamp_01(color.x)) as u8;
    let g = (255.0 * clamp_01(color.y)) as u8;
    let b = (255.0 * clamp_01(color.z)) as u8;
    [r, g, b]
}

/// Row-major RGB byte image. Row 0 is the bottom of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<[u8; 3]>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    fn index(&self, row: u32, col: u32) -> Option<usize> {
        (row < self.height && col < self.width)
            .then(|| row as usize * self.width as usize + col as usize)
    }

    /// Get the pixel at (`row`, `col`), or `None` out of bounds.
    pub fn get(&self, row: u32, col: u32) -> Option<[u8; 3]> {
        self.index(row, col).map(|i| self.pixels[i])
    }

    /// Set the pixel at (`row`, `col`). Returns `false` out of bounds.
    pub fn set(&mut self, row: u32, col: u32, rgb: [u8; 3]) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.pixels[i] = rgb;
                true
            }
            None => false,
        }
    }

    /// Pixels of one row, or `None` out of bounds.
    pub fn row(&self, row: u32) -> Option<&[[u8; 3]]> {
        let width = self.width as usize;
        (row < self.height).then(|| &self.pixels[row as usize * width..(row as usize + 1) * width])
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// Unpadded `width * height * 3` bytes, bottom row first.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::registry::SurfaceRegistry;
    use whit_core::{Light, Material, RenderConfig};
    use whit_math::Vec3;

    /// Unit red square at the origin, eye and light at (0, 0, 5), already in
    /// camera space.
    fn red_square_scene() -> RenderScene {
        let red = Arc::new(
            Material::default()
                .with_ambient(Color::new(0.2, 0.0, 0.0))
                .with_diffuse(Color::new(1.0, 0.0, 0.0))
                .with_specular(Color::ZERO),
        );
        let mut loader = SurfaceRegistry::begin_load();
        loader.begin_surface();
        loader.set_material(Some(red));
        for (x, y) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            loader.add_vertex(Vec3::new(x, y, -5.0));
        }
        loader.end_surface();

        let integrator = Integrator::new(loader.end_load(), vec![Light::new(Vec3::ZERO)], RenderConfig::default());
        RenderScene::new(integrator, Camera::default().with_fov(60.0))
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::new(0.0, 0.5, 1.0)), [0, 127, 255]);
        assert_eq!(color_to_rgb(Color::new(-1.0, 2.0, 0.999)), [0, 255, 254]);
    }

    #[test]
    fn test_red_square_end_to_end() {
        let scene = red_square_scene();

        let [r, g, b] = scene.render_pixel(2, 2, 5, 5).expect("center pixel");
        assert!(r > g && r > b);
        assert_eq!((g, b), (0, 0));

        assert_eq!(scene.render_pixel(0, 0, 5, 5), Some([0, 0, 0]));
        assert_eq!(scene.render_pixel(4, 4, 5, 5), Some([0, 0, 0]));
    }

    #[test]
    fn test_render_is_deterministic_and_row_independent() {
        let scene = red_square_scene();
        let first = scene.render_image(9, 7);
        let second = scene.render_image(9, 7);
        assert_eq!(first, second);

        for row in [6, 0, 3] {
            assert_eq!(first.row(row), Some(scene.render_row(row, 9, 7).as_slice()));
        }
        assert_eq!(first.get(3, 4), scene.render_pixel(3, 4, 9, 7));
    }

    #[test]
    fn test_image_buffer_bounds() {
        let mut image = ImageBuffer::new(3, 2);
        assert!(image.set(1, 2, [1, 2, 3]));
        assert!(!image.set(2, 0, [9, 9, 9]));
        assert_eq!(image.get(1, 2), Some([1, 2, 3]));
        assert_eq!(image.get(0, 3), None);
        assert!(image.row(2).is_none());

        let bytes = image.as_bytes();
        assert_eq!(bytes.len(), 3 * 2 * 3);
        assert_eq!(&bytes[15..18], &[1, 2, 3]);
    }

    #[test]
    fn test_render_pixel_outside_image() {
        let scene = red_square_scene();
        assert_eq!(scene.render_pixel(5, 0, 5, 5), None);
        assert_eq!(scene.render_pixel(0, 5, 5, 5), None);
        assert_eq!(scene.render_pixel(0, 0, 0, 0), None);
    }

    #[test]
    fn test_zero_sized_image() {
        let image = red_square_scene().render_image(0, 4);
        assert!(image.as_bytes().is_empty());
    }
}
