// ============================================================
// Layer 5: Training Loop
// ============================================================
// Train + validation loop using Burn's DataLoader, Adam, and a
// cosine-annealed learning rate.
//
//   - Training runs on Autodiff<NdArray> (cpu) or Autodiff<Wgpu> (gpu)
//   - model.valid() returns the model on the inner backend, so the
//     validation batcher produces inner-backend tensors and no
//     autodiff graph is recorded
//   - The scheduler is stepped once per epoch:
//       lr(e) = min_lr + ½ (lr - min_lr) (1 + cos(π (e - 1) / epochs))
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam
//            Loshchilov & Hutter (2017) SGDR

use std::sync::Arc;

use anyhow::{anyhow, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu},
    data::{dataloader::{DataLoader, DataLoaderBuilder}, dataset::{vision::MnistItem, Dataset}},
    lr_scheduler::{cosine::CosineAnnealingLrSchedulerConfig, LrScheduler},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::{AutoencoderBatch, AutoencoderBatcher, NoiseConfig};
use crate::domain::accelerator::Accelerator;
use crate::infra::{checkpoint::CheckpointManager, metrics::{EpochMetrics, MetricsLogger}};
use crate::ml::model::{Autoencoder, AutoencoderConfig};
use crate::ml::sampler::generate_samples;

type CpuBackend = Autodiff<NdArray>;
type GpuBackend = Autodiff<Wgpu>;

/// What a finished training run hands back to the application layer.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub epochs:  Vec<EpochMetrics>,
    /// Decoded N(0, 1) latent samples from the final model, one flat
    /// pixel buffer per sample
    pub samples: Vec<Vec<f32>>,
}

impl TrainingSummary {
    pub fn final_metrics(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    pub fn best_epoch(&self) -> Option<&EpochMetrics> {
        self.epochs
            .iter()
            .min_by(|a, b| a.val_loss.total_cmp(&b.val_loss))
    }
}

/// Train on the backend selected by `cfg.accelerator`.
pub fn run_training<D>(
    cfg:           &TrainConfig,
    train_dataset: D,
    valid_dataset: D,
    checkpoints:   &CheckpointManager,
    metrics:       &MetricsLogger,
) -> Result<TrainingSummary>
where
    D: Dataset<MnistItem> + 'static,
{
    match cfg.accelerator {
        Accelerator::Cpu => {
            let device = NdArrayDevice::Cpu;
            tracing::info!("Using NdArray device: {:?}", device);
            train_loop::<CpuBackend, D>(cfg, train_dataset, valid_dataset, checkpoints, metrics, device)
        }
        Accelerator::Gpu => {
            let device = WgpuDevice::default();
            tracing::info!("Using WGPU device: {:?}", device);
            train_loop::<GpuBackend, D>(cfg, train_dataset, valid_dataset, checkpoints, metrics, device)
        }
    }
}

/// One optimisation step: forward, MSE, backward, Adam update.
/// Returns the updated model and the batch loss.
pub fn train_step<B, O>(
    model: Autoencoder<B>,
    optim: &mut O,
    batch: AutoencoderBatch<B>,
    lr:    f64,
) -> (Autoencoder<B>, f64)
where
    B: AutodiffBackend,
    O: Optimizer<Autoencoder<B>, B>,
{
    let (loss, _) = model.forward_loss(batch);
    let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();

    let grads = loss.backward();
    let grads = GradientsParams::from_grads(grads, &model);
    (optim.step(lr, model, grads), loss_val)
}

/// Mean reconstruction loss of `model` over every batch of `loader`.
/// NaN for an empty loader.
pub fn evaluate<B: Backend>(
    model:  &Autoencoder<B>,
    loader: &Arc<dyn DataLoader<B, AutoencoderBatch<B>>>,
) -> f64 {
    let mut loss_sum = 0.0f64;
    let mut batches  = 0usize;

    for batch in loader.iter() {
        let (loss, _) = model.forward_loss(batch);
        loss_sum += loss.into_scalar().elem::<f64>();
        batches  += 1;
    }

    if batches > 0 { loss_sum / batches as f64 } else { f64::NAN }
}

fn batcher_for(cfg: &TrainConfig) -> AutoencoderBatcher {
    if cfg.denoise {
        AutoencoderBatcher::denoising(NoiseConfig::new(cfg.noise_std))
    } else {
        AutoencoderBatcher::clean()
    }
}

fn train_loop<B, D>(
    cfg:           &TrainConfig,
    train_dataset: D,
    valid_dataset: D,
    checkpoints:   &CheckpointManager,
    metrics:       &MetricsLogger,
    device:        B::Device,
) -> Result<TrainingSummary>
where
    B: AutodiffBackend,
    D: Dataset<MnistItem> + 'static,
{
    B::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: Autoencoder<B> = AutoencoderConfig::new(cfg.latent_dim).init(&device);
    tracing::info!(
        "Model ready: latent_dim={}, denoise={}",
        cfg.latent_dim, cfg.denoise
    );

    let mut optim = AdamConfig::new().init();

    // ── Cosine-annealed learning rate, one step per epoch ─────────────────────
    let mut scheduler = CosineAnnealingLrSchedulerConfig::new(cfg.learning_rate, cfg.epochs)
        .with_min_lr(cfg.min_learning_rate)
        .init()
        .map_err(|e| anyhow!("Invalid learning-rate schedule: {e}"))?;

    // ── Data loaders ──────────────────────────────────────────────────────────
    let batcher = batcher_for(cfg);
    if let Some(noise) = batcher.noise() {
        tracing::info!("Denoising: Gaussian input noise with std={}", noise.std);
    }

    let train_loader: Arc<dyn DataLoader<B, AutoencoderBatch<B>>> =
        DataLoaderBuilder::new(batcher.clone())
            .batch_size(cfg.batch_size)
            .shuffle(cfg.seed)
            .num_workers(cfg.num_workers)
            .set_device(device.clone())
            .build(train_dataset);

    // Validation runs on the inner backend, no autodiff overhead
    let valid_loader: Arc<dyn DataLoader<B::InnerBackend, AutoencoderBatch<B::InnerBackend>>> =
        DataLoaderBuilder::new(batcher)
            .batch_size(cfg.batch_size)
            .num_workers(cfg.num_workers)
            .set_device(device.clone())
            .build(valid_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let mut history       = Vec::with_capacity(cfg.epochs);
    let mut best_val_loss = f64::INFINITY;

    for epoch in 1..=cfg.epochs {
        let lr = scheduler.step();

        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (updated, loss) = train_step(model, &mut optim, batch, lr);
            model = updated;
            train_loss_sum += loss;
            train_batches  += 1;
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        let avg_val_loss = evaluate(&model.valid(), &valid_loader);

        let m = EpochMetrics::new(epoch, avg_train_loss, avg_val_loss, lr);
        tracing::info!(
            "Epoch {:>3}/{} | train_loss={:.5} | val_loss={:.5} | lr={:.2e}",
            epoch, cfg.epochs, m.train_loss, m.val_loss, lr,
        );
        if m.is_improvement(best_val_loss) {
            best_val_loss = m.val_loss;
            tracing::debug!("New best validation loss at epoch {}", epoch);
        }

        metrics.log(&m)?;
        checkpoints.save_model(&model, epoch)?;
        history.push(m);
    }

    // ── Generative sampling with the final decoder ────────────────────────────
    let samples = generate_samples(&model.valid(), cfg.num_samples, &device)?;

    tracing::info!("Training complete!");
    Ok(TrainingSummary { epochs: history, samples })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::data::{dataloader::batcher::Batcher, dataset::InMemDataset};
    use crate::domain::image::ImageShape;

    type TestBackend = Autodiff<NdArray>;

    /// Digit-like items: a filled square whose size depends on `i`
    fn square_items(count: usize) -> Vec<MnistItem> {
        (0..count)
            .map(|i| {
                let mut image = [[0.0f32; 28]; 28];
                let half = 3 + i % 8;
                for y in (14 - half)..(14 + half) {
                    for x in (14 - half)..(14 + half) {
                        image[y][x] = 255.0;
                    }
                }
                MnistItem { image, label: (i % 10) as u8 }
            })
            .collect()
    }

    /// Four distinct patterns: horizontal bar, vertical bar, box, blank
    fn fixed_batch(device: &NdArrayDevice) -> AutoencoderBatch<TestBackend> {
        let mut items = Vec::new();
        for pattern in 0..4 {
            let mut image = [[0.0f32; 28]; 28];
            for y in 0..28 {
                for x in 0..28 {
                    let on = match pattern {
                        0 => (12..16).contains(&y),
                        1 => (12..16).contains(&x),
                        2 => (6..22).contains(&x) && (6..22).contains(&y),
                        _ => false,
                    };
                    if on { image[y][x] = 255.0; }
                }
            }
            items.push(MnistItem { image, label: pattern as u8 });
        }
        AutoencoderBatcher::clean().batch(items, device)
    }

    #[test]
    fn test_loss_decreases_on_fixed_batch() {
        let device = NdArrayDevice::Cpu;
        TestBackend::seed(0);

        let mut model: Autoencoder<TestBackend> = AutoencoderConfig::new(4).init(&device);
        let mut optim = AdamConfig::new().init();
        let batch     = fixed_batch(&device);

        let mut losses = Vec::new();
        for _ in 0..40 {
            let (updated, loss) = train_step(model, &mut optim, batch.clone(), 1e-2);
            model = updated;
            losses.push(loss);
        }

        let first = losses[0];
        let last  = *losses.last().unwrap();
        assert!(losses.iter().all(|l| l.is_finite()));
        assert!(last < first * 0.8, "loss did not decrease: first={first}, last={last}");
    }

    #[test]
    fn test_summary_best_epoch() {
        let summary = TrainingSummary {
            epochs: vec![
                EpochMetrics::new(1, 0.09, 0.08, 1e-3),
                EpochMetrics::new(2, 0.05, 0.04, 5e-4),
                EpochMetrics::new(3, 0.04, 0.05, 0.0),
            ],
            samples: vec![vec![0.0; ImageShape::MNIST.pixels()]],
        };
        assert_eq!(summary.best_epoch().map(|m| m.epoch), Some(2));
        assert_eq!(summary.final_metrics().map(|m| m.epoch), Some(3));
    }

    #[test]
    fn test_batcher_follows_denoise_flag() {
        let plain = TrainConfig::default();
        assert!(batcher_for(&plain).noise().is_none());

        let noisy = TrainConfig { denoise: true, noise_std: 0.4, ..TrainConfig::default() };
        assert_eq!(batcher_for(&noisy).noise(), Some(NoiseConfig::new(0.4)));
    }

    #[test]
    fn test_run_training_epoch_loop() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            artifact_dir: dir.path().to_string_lossy().into_owned(),
            epochs:       3,
            batch_size:   4,
            latent_dim:   4,
            denoise:      true,
            num_workers:  1,
            num_samples:  5,
            ..TrainConfig::default()
        };
        let checkpoints = CheckpointManager::new(dir.path()).unwrap();
        let metrics     = MetricsLogger::new(dir.path()).unwrap();

        let summary = run_training(
            &cfg,
            InMemDataset::new(square_items(8)),
            InMemDataset::new(square_items(4)),
            &checkpoints,
            &metrics,
        )
        .unwrap();

        // Cosine schedule stepped once per epoch, epoch 1 at the initial rate
        let lrs: Vec<f64> = summary.epochs.iter().map(|m| m.learning_rate).collect();
        let expected = [1e-3, 7.5e-4, 2.5e-4];
        assert_eq!(lrs.len(), 3);
        for (lr, want) in lrs.iter().zip(expected) {
            assert!((lr - want).abs() < 1e-9, "lr {lr} != {want}");
        }
        assert!(summary.epochs.iter().all(|m| m.train_loss.is_finite() && m.val_loss.is_finite()));

        let csv = std::fs::read_to_string(metrics.csv_path()).unwrap();
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert_eq!(rows.len(), 3);
        for (i, (row, lr)) in rows.iter().zip(["0.001000", "0.000750", "0.000250"]).enumerate() {
            assert!(row.starts_with(&format!("{},", i + 1)), "row {row}");
            assert!(row.ends_with(lr), "row {row}");
        }

        assert_eq!(checkpoints.latest_epoch().unwrap(), 3);
        assert!(dir.path().join("model_epoch_3.mpk").exists());

        assert_eq!(summary.samples.len(), cfg.num_samples);
        assert!(summary.samples.iter().all(|s| s.len() == ImageShape::MNIST.pixels()));
    }
}
