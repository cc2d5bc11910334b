// ============================================================
// Layer 4: Autoencoder Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<MnistItem> into
// a pair of image tensors:
//
//   targets: the clean images, scaled to [0, 1]
//   inputs:  what the encoder sees
//
// For a plain autoencoder the two are identical. For the
// denoising variant the inputs are corrupted with additive
// Gaussian noise and clamped back into [0, 1]:
//
//   inputs = clamp(targets + std * N(0, 1), 0, 1)
//
// Shapes:
//   Input:  Vec of N MnistItems, each 28 x 28
//   Output: AutoencoderBatch with tensors of shape [N, 1, 28, 28]
//
// Reference: Burn Book §4 (Batcher)
//            Vincent et al. (2008) Denoising Autoencoders

use burn::{
    data::{dataloader::batcher::Batcher, dataset::vision::MnistItem},
    prelude::*,
    tensor::Distribution,
};
use serde::{Deserialize, Serialize};

use crate::data::dataset::image_to_pixels;
use crate::domain::image::ImageShape;

// ─── NoiseConfig ──────────────────────────────────────────────────────────────
/// Corruption applied to encoder inputs in denoising mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Standard deviation of the additive Gaussian noise
    pub std: f64,
}

impl NoiseConfig {
    pub fn new(std: f64) -> Self {
        Self { std }
    }

    /// Add Gaussian noise to `clean` and clamp the result into [0, 1].
    pub fn corrupt<B: Backend>(&self, clean: Tensor<B, 4>) -> Tensor<B, 4> {
        let noise = Tensor::random(
            clean.shape(),
            Distribution::Normal(0.0, 1.0),
            &clean.device(),
        );
        (clean + noise * self.std).clamp(0.0, 1.0)
    }
}

// ─── AutoencoderBatch ─────────────────────────────────────────────────────────
/// A batch of images ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct AutoencoderBatch<B: Backend> {
    /// Encoder inputs, possibly noise-corrupted. Shape: [batch, 1, 28, 28]
    pub inputs: Tensor<B, 4>,

    /// Clean reconstruction targets. Shape: [batch, 1, 28, 28]
    pub targets: Tensor<B, 4>,
}

// ─── AutoencoderBatcher ───────────────────────────────────────────────────────
#[derive(Clone, Debug, Default)]
pub struct AutoencoderBatcher {
    noise: Option<NoiseConfig>,
}

impl AutoencoderBatcher {
    /// Batcher for the plain autoencoder: inputs equal targets
    pub fn clean() -> Self {
        Self { noise: None }
    }

    /// Batcher for the denoising autoencoder
    pub fn denoising(noise: NoiseConfig) -> Self {
        Self { noise: Some(noise) }
    }

    pub fn noise(&self) -> Option<NoiseConfig> {
        self.noise
    }

    /// Stack items into one clean [N, 1, 28, 28] tensor on `device`.
    pub fn stack<B: Backend>(&self, items: &[MnistItem], device: &B::Device) -> Tensor<B, 4> {
        let shape = ImageShape::MNIST;
        let flat: Vec<f32> = items.iter().flat_map(image_to_pixels).collect();
        let data = TensorData::new(flat, shape.batch_dims(items.len()));
        Tensor::from_data(data.convert::<B::FloatElem>(), device)
    }
}

impl<B: Backend> Batcher<B, MnistItem, AutoencoderBatch<B>> for AutoencoderBatcher {
    fn batch(&self, items: Vec<MnistItem>, device: &B::Device) -> AutoencoderBatch<B> {
        let targets: Tensor<B, 4> = self.stack(&items, device);

        let inputs = match &self.noise {
            Some(noise) => noise.corrupt(targets.clone()),
            None        => targets.clone(),
        };

        AutoencoderBatch { inputs, targets }
    }
}
