//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel, then written back into an
//! [`ImageBuffer`].

use crate::renderer::{ImageBuffer, RenderScene};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// First row covered (row 0 is the bottom of the view)
    pub row: u32,
    /// First column covered
    pub col: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(row: u32, col: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            row,
            col,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Buckets closer to the center come first. A bucket size of zero is
/// treated as one.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);
    let mut buckets = Vec::new();

    for row in (0..height).step_by(size as usize) {
        for col in (0..width).step_by(size as usize) {
            let bw = size.min(width - col);
            let bh = size.min(height - row);
            buckets.push(Bucket::new(row, col, bw, bh, buckets.len()));
        }
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_col = width as f32 / 2.0;
    let center_row = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let col = b.col as f32 + b.width as f32 / 2.0;
        let row = b.row as f32 + b.height as f32 / 2.0;
        (col - center_col).powi(2) + (row - center_row).powi(2)
    };

    // Stable sort keeps grid order among equidistant buckets
    buckets.sort_by(|a, b| {
        distance(a)
            .partial_cmp(&distance(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Render a single bucket of a `width` x `height` image.
pub fn render_bucket(bucket: &Bucket, scene: &RenderScene, width: u32, height: u32) -> BucketResult {
    let plane = scene.view_plane(width, height);
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_row in 0..bucket.height {
        for local_col in 0..bucket.width {
            pixels.push(scene.sample(&plane, bucket.row + local_row, bucket.col + local_col));
        }
    }

    BucketResult::new(*bucket, pixels)
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<[u8; 3]>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<[u8; 3]>) -> Self {
        Self { bucket, pixels }
    }
}

impl ImageBuffer {
    /// Copy a rendered bucket into place. Pixels falling outside the image
    /// are skipped.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        let width = bucket.width.max(1) as usize;
        for (i, rgb) in result.pixels.iter().enumerate() {
            let row = bucket.row + (i / width) as u32;
            let col = bucket.col + (i % width) as u32;
            self.set(row, col, *rgb);
        }
    }
}
