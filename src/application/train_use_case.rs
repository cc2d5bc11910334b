// ============================================================
// Layer 2: TrainUseCase
// ============================================================
// Orchestrates a full training run in order:
//
//   Step 1: Validate the configuration
//   Step 2: Load the MNIST training split     (Layer 4 - data)
//   Step 3: Seeded train/validation split     (Layer 4 - data)
//   Step 4: Save config for later sampling    (Layer 6 - infra)
//   Step 5: Run the training loop             (Layer 5 - ml)
//   Step 6: Tile and save generated samples   (Layer 3 + 6)
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{dataset::mnist_train, splitter::{split_train_val, MNIST_TRAIN_FRACTION}};
use crate::domain::{accelerator::Accelerator, image::{tile, ImageShape}};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger, visualization::save_png};
use crate::ml::trainer::{run_training, TrainingSummary};

/// Name of the sample grid written at the end of training
pub const SAMPLES_FILE: &str = "samples.png";

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Saved as
// train_config.json so the sampler can rebuild the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub artifact_dir:      String,
    pub epochs:            usize,
    pub batch_size:        usize,
    pub learning_rate:     f64,
    pub min_learning_rate: f64,
    pub latent_dim:        usize,
    pub denoise:           bool,
    pub noise_std:         f64,
    pub accelerator:       Accelerator,
    pub num_workers:       usize,
    pub seed:              u64,
    pub train_fraction:    f64,
    pub num_samples:       usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            artifact_dir:      "artifacts".to_string(),
            epochs:            10,
            batch_size:        256,
            learning_rate:     1e-3,
            min_learning_rate: 0.0,
            latent_dim:        16,
            denoise:           false,
            noise_std:         0.3,
            accelerator:       Accelerator::Cpu,
            num_workers:       4,
            seed:              42,
            train_fraction:    MNIST_TRAIN_FRACTION,
            num_samples:       8,
        }
    }
}

impl TrainConfig {
    /// Reject settings that would make training meaningless or
    /// make Burn panic deeper in the stack.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            bail!("epochs must be at least 1");
        }
        if self.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        if self.latent_dim == 0 {
            bail!("latent_dim must be at least 1");
        }
        if self.num_workers == 0 {
            bail!("num_workers must be at least 1");
        }
        if self.num_samples == 0 {
            bail!("num_samples must be at least 1");
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            bail!("learning rate must be in (0, 1], got {}", self.learning_rate);
        }
        if !(self.min_learning_rate >= 0.0 && self.min_learning_rate <= self.learning_rate) {
            bail!(
                "minimum learning rate must be in [0, {}], got {}",
                self.learning_rate, self.min_learning_rate
            );
        }
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            bail!("noise_std must be a finite, non-negative number, got {}", self.noise_std);
        }
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            bail!("train_fraction must be in (0, 1), got {}", self.train_fraction);
        }
        Ok(())
    }

    pub fn samples_path(&self) -> PathBuf {
        PathBuf::from(&self.artifact_dir).join(SAMPLES_FILE)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingSummary> {
        let cfg = &self.config;

        // ── Step 1: Validate ──────────────────────────────────────────────────
        cfg.validate()?;
        tracing::info!(
            "Training {} autoencoder for {} epochs on {}",
            if cfg.denoise { "denoising" } else { "plain" },
            cfg.epochs,
            cfg.accelerator,
        );

        // ── Step 2 + 3: Load MNIST and split ──────────────────────────────────
        let (train_dataset, valid_dataset) =
            split_train_val(mnist_train(), cfg.train_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} validation",
            train_dataset.len(),
            valid_dataset.len(),
        );

        // ── Step 4: Save config for sampling ──────────────────────────────────
        let checkpoints = CheckpointManager::new(&cfg.artifact_dir)?;
        checkpoints.save_config(cfg)?;
        let metrics = MetricsLogger::new(&cfg.artifact_dir)?;
        tracing::info!("Logging epoch metrics to '{}'", metrics.csv_path().display());

        // ── Step 5: Train ─────────────────────────────────────────────────────
        let summary = run_training(cfg, train_dataset, valid_dataset, &checkpoints, &metrics)?;

        // ── Step 6: Generative sampling visualisation ─────────────────────────
        let grid = tile(&summary.samples, ImageShape::MNIST, cfg.num_samples)?;
        save_png(cfg.samples_path(), &grid)?;
        tracing::info!("Saved {} samples to '{}'", summary.samples.len(), cfg.samples_path().display());

        Ok(summary)
    }
}
