// ============================================================
// Layer 5: Sampler
// ============================================================
// Generative sampling from a trained autoencoder: draw latent
// vectors from N(0, 1) and push them through the decoder.
//
// A plain autoencoder does not shape its latent space the way a
// VAE does, so samples far from the training codes can look
// blurry. That is expected; this is a visual sanity check.
use anyhow::{anyhow, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, NdArray, Wgpu},
    prelude::*,
    tensor::Distribution,
};

use crate::domain::{accelerator::Accelerator, image::ImageShape, traits::ImageGenerator};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{Autoencoder, AutoencoderConfig};

/// Decode `count` random latent vectors with `model`.
/// Returns one flat [0, 1] pixel buffer per sample.
pub fn generate_samples<B: Backend>(
    model:  &Autoencoder<B>,
    count:  usize,
    device: &B::Device,
) -> Result<Vec<Vec<f32>>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let latent = Tensor::<B, 2>::random(
        [count, model.latent_dim()],
        Distribution::Normal(0.0, 1.0),
        device,
    );
    let images = model.decoder.forward(latent);

    let pixels = images
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("Cannot read decoded samples: {e:?}"))?;

    Ok(pixels
        .chunks_exact(ImageShape::MNIST.pixels())
        .map(|chunk| chunk.to_vec())
        .collect())
}

/// A trained model on whichever backend the user picked
enum LoadedModel {
    Cpu(Autoencoder<NdArray>, NdArrayDevice),
    Gpu(Autoencoder<Wgpu>, WgpuDevice),
}

pub struct Sampler {
    model: LoadedModel,
}

impl Sampler {
    /// Rebuild the model from the saved config and load the latest weights.
    pub fn from_checkpoint(ckpt: &CheckpointManager, accelerator: Accelerator) -> Result<Self> {
        let cfg       = ckpt.load_config()?;
        let model_cfg = AutoencoderConfig::new(cfg.latent_dim);

        let model = match accelerator {
            Accelerator::Cpu => {
                let device = NdArrayDevice::Cpu;
                let model  = ckpt.load_model(model_cfg.init::<NdArray>(&device), &device)?;
                LoadedModel::Cpu(model, device)
            }
            Accelerator::Gpu => {
                let device = WgpuDevice::default();
                let model  = ckpt.load_model(model_cfg.init::<Wgpu>(&device), &device)?;
                LoadedModel::Gpu(model, device)
            }
        };

        tracing::info!(
            "Model loaded from checkpoint (latent_dim={}, accelerator={})",
            cfg.latent_dim, accelerator
        );
        Ok(Self { model })
    }
}

impl ImageGenerator for Sampler {
    fn image_shape(&self) -> ImageShape {
        ImageShape::MNIST
    }

    fn generate(&self, count: usize, seed: u64) -> Result<Vec<Vec<f32>>> {
        match &self.model {
            LoadedModel::Cpu(model, device) => {
                <NdArray as Backend>::seed(seed);
                generate_samples(model, count, device)
            }
            LoadedModel::Gpu(model, device) => {
                <Wgpu as Backend>::seed(seed);
                generate_samples(model, count, device)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;

    #[test]
    fn test_generate_samples_count_and_range() {
        let device = NdArrayDevice::Cpu;
        let model: Autoencoder<NdArray> = AutoencoderConfig::new(6).init(&device);

        let samples = generate_samples(&model, 3, &device).unwrap();
        assert_eq!(samples.len(), 3);
        for s in &samples {
            assert_eq!(s.len(), 784);
            assert!(s.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
        assert!(generate_samples(&model, 0, &device).unwrap().is_empty());
    }

    #[test]
    fn test_sampler_from_checkpoint() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path()).unwrap();
        let device = NdArrayDevice::Cpu;

        let cfg = TrainConfig { latent_dim: 3, ..TrainConfig::default() };
        ckpt.save_config(&cfg).unwrap();
        let model: Autoencoder<NdArray> = AutoencoderConfig::new(3).init(&device);
        ckpt.save_model(&model, 1).unwrap();

        let sampler = Sampler::from_checkpoint(&ckpt, Accelerator::Cpu).unwrap();
        assert_eq!(sampler.image_shape(), ImageShape::MNIST);

        let samples = sampler.generate(2, 11).unwrap();
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.len() == ImageShape::MNIST.pixels()));
    }
}
