// ============================================================
// Layer 2: Sample Use Case
// ============================================================
// Loads the latest checkpoint from an artifact directory,
// generates images from random latent codes, and writes them
// as one PNG grid.

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::domain::{accelerator::Accelerator, image::tile, traits::ImageGenerator};
use crate::infra::{checkpoint::CheckpointManager, visualization::save_png};
use crate::ml::sampler::Sampler;

/// Images per grid row
const GRID_COLUMNS: usize = 8;

pub struct SampleUseCase<G: ImageGenerator> {
    generator: G,
}

impl SampleUseCase<Sampler> {
    /// Build a use case backed by the checkpoint in `artifact_dir`.
    pub fn from_artifacts(artifact_dir: &str, accelerator: Accelerator) -> Result<Self> {
        let ckpt = CheckpointManager::new(artifact_dir)?;
        Ok(Self::new(Sampler::from_checkpoint(&ckpt, accelerator)?))
    }
}

impl<G: ImageGenerator> SampleUseCase<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Generate `count` images and save them to `output`.
    /// Returns the path that was written.
    pub fn execute(&self, count: usize, seed: u64, output: impl Into<PathBuf>) -> Result<PathBuf> {
        if count == 0 {
            bail!("count must be at least 1 to draw a sample grid");
        }
        let output = output.into();
        let images = self.generator.generate(count, seed)?;
        let grid   = tile(&images, self.generator.image_shape(), GRID_COLUMNS)?;
        save_png(&output, &grid)?;

        tracing::info!("Saved {} generated images to '{}'", images.len(), output.display());
        Ok(output)
    }
}
