// ============================================================
// Layer 6: Checkpoint Manager
// ============================================================
// Saves and restores autoencoder weights using Burn's
// CompactRecorder (named MessagePack, half precision).
//
// File layout inside the artifact directory:
//   artifacts/
//     model_epoch_1.mpk   ← weights after epoch 1
//     model_epoch_2.mpk   ← weights after epoch 2
//     ...
//     latest_epoch.json   ← number of the latest saved epoch
//     train_config.json   ← hyperparameters, incl. latent_dim
//
// The config is needed to rebuild a model with the right
// latent size before its weights can be loaded.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::Autoencoder;

const LATEST_EPOCH_FILE: &str = "latest_epoch.json";
const CONFIG_FILE:       &str = "train_config.json";

/// Manages saving and loading of model checkpoints.
/// All files are stored in the artifact directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create artifact directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Recorder path for `epoch`, without extension (the recorder adds `.mpk`).
    fn weights_path(&self, epoch: usize) -> PathBuf {
        self.dir.join(format!("model_epoch_{epoch}"))
    }

    /// Write the weights of `model` as epoch `epoch`, then advance
    /// latest_epoch.json. The pointer only moves once the weights exist.
    pub fn save_model<B: Backend>(&self, model: &Autoencoder<B>, epoch: usize) -> Result<()> {
        let weights = self.weights_path(epoch);
        CompactRecorder::new()
            .record(model.clone().into_record(), weights.clone())
            .with_context(|| {
                format!("Recording autoencoder weights for epoch {epoch} into '{}' failed", weights.display())
            })?;

        let pointer = self.dir.join(LATEST_EPOCH_FILE);
        let body    = serde_json::to_string(&epoch)?;
        fs::write(&pointer, body)
            .with_context(|| format!("Could not advance epoch pointer '{}'", pointer.display()))?;

        tracing::debug!("Checkpointed epoch {} to '{}'", epoch, weights.display());
        Ok(())
    }

    /// Restore the most recent weights into `model`, which must be
    /// built with the same `latent_dim` as the saved one.
    pub fn load_model<B: Backend>(
        &self,
        model:  Autoencoder<B>,
        device: &B::Device,
    ) -> Result<Autoencoder<B>> {
        let epoch   = self.latest_epoch()?;
        let weights = self.weights_path(epoch);

        let record = CompactRecorder::new()
            .load(weights.clone(), device)
            .with_context(|| {
                format!(
                    "Autoencoder weights for epoch {epoch} at '{}' are missing or do not \
                     match the saved latent size",
                    weights.display()
                )
            })?;

        tracing::info!("Restored autoencoder weights from epoch {}", epoch);
        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration that produced the checkpoints.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);

        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. \
                     Make sure you have run 'train' before 'sample'.",
                    path.display()
                )
            })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config in '{}'", path.display()))
    }

    /// Number of the most recently saved epoch.
    pub fn latest_epoch(&self) -> Result<usize> {
        let path = self.dir.join(LATEST_EPOCH_FILE);

        let s = fs::read_to_string(&path)
            .with_context(|| {
                format!("Cannot find '{}'. Have you run 'train' first?", path.display())
            })?;

        Ok(serde_json::from_str::<usize>(&s)?)
    }
}
