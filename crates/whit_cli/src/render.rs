//! Parallel bucket rendering with progress reporting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use whit_renderer::{generate_buckets, render_bucket, BucketResult, ImageBuffer, RenderScene};

/// Counts finished buckets across worker threads.
pub struct Progress {
    done: AtomicUsize,
    total: usize,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total,
        }
    }

    /// Record one finished bucket and return the new count.
    pub fn inc(&self) -> usize {
        self.done.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn done(&self) -> usize {
        self.done.load(Ordering::SeqCst)
    }

    /// Completion percentage after `done` buckets.
    pub fn percent(&self, done: usize) -> f32 {
        if self.total == 0 {
            100.0
        } else {
            100.0 * done as f32 / self.total as f32
        }
    }

    /// Whether `done` crosses into a new 10% band.
    fn is_milestone(&self, done: usize) -> bool {
        let band = |n: usize| n * 10 / self.total.max(1);
        done == self.total || band(done) != band(done - 1)
    }
}

/// Render `scene` bucket by bucket, center first, in parallel.
pub fn render_buckets(scene: &RenderScene, width: u32, height: u32, bucket_size: u32) -> ImageBuffer {
    let buckets = generate_buckets(width, height, bucket_size);
    let progress = Progress::new(buckets.len());
    let start = Instant::now();

    log::info!(
        "Rendering {}x{} in {} buckets of {}px",
        width,
        height,
        buckets.len(),
        bucket_size
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let result = render_bucket(bucket, scene, width, height);
            let done = progress.inc();
            log::debug!("Bucket {} done ({}/{})", bucket.index, done, buckets.len());
            if progress.is_milestone(done) {
                log::info!("Progress: {:.0}%", progress.percent(done));
            }
            result
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!(
        "Rendered {} buckets in {:.2}s",
        progress.done(),
        start.elapsed().as_secs_f32()
    );
    image
}
