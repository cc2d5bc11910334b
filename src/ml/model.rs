use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig, ConvTranspose2d, ConvTranspose2dConfig},
        loss::{MseLoss, Reduction},
        Linear, LinearConfig, PaddingConfig2d, Relu,
    },
    prelude::*,
    tensor::activation::sigmoid,
};

use crate::data::batcher::AutoencoderBatch;
use crate::domain::image::ImageShape;

/// Channels after each encoder convolution (mirrored by the decoder)
const CHANNELS: [usize; 3] = [16, 32, 64];

/// Spatial size left after the two stride-2 convolutions (28 → 14 → 7)
const BOTTLENECK_KERNEL: usize = 7;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct AutoencoderConfig {
    pub latent_dim: usize,
}

impl AutoencoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Autoencoder<B> {
        Autoencoder {
            encoder: self.init_encoder(device),
            decoder: self.init_decoder(device),
        }
    }

    fn init_encoder<B: Backend>(&self, device: &B::Device) -> Encoder<B> {
        let [c1, c2, c3] = CHANNELS;
        let input_channels = ImageShape::MNIST.channels;
        Encoder {
            conv1: Conv2dConfig::new([input_channels, c1], [3, 3])
                .with_stride([2, 2])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .init(device),
            conv2: Conv2dConfig::new([c1, c2], [3, 3])
                .with_stride([2, 2])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .init(device),
            conv3: Conv2dConfig::new([c2, c3], [BOTTLENECK_KERNEL, BOTTLENECK_KERNEL])
                .init(device),
            fc: LinearConfig::new(c3, self.latent_dim).init(device),
            activation: Relu::new(),
        }
    }

    fn init_decoder<B: Backend>(&self, device: &B::Device) -> Decoder<B> {
        let [c1, c2, c3] = CHANNELS;
        let output_channels = ImageShape::MNIST.channels;
        Decoder {
            fc: LinearConfig::new(self.latent_dim, c3).init(device),
            deconv1: ConvTranspose2dConfig::new([c3, c2], [BOTTLENECK_KERNEL, BOTTLENECK_KERNEL])
                .init(device),
            deconv2: ConvTranspose2dConfig::new([c2, c1], [3, 3])
                .with_stride([2, 2])
                .with_padding([1, 1])
                .with_padding_out([1, 1])
                .init(device),
            deconv3: ConvTranspose2dConfig::new([c1, output_channels], [3, 3])
                .with_stride([2, 2])
                .with_padding([1, 1])
                .with_padding_out([1, 1])
                .init(device),
            activation: Relu::new(),
            latent_dim: self.latent_dim,
        }
    }
}

/// Downsampling half: [batch, 1, 28, 28] → [batch, latent_dim]
#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    pub conv1:      Conv2d<B>,
    pub conv2:      Conv2d<B>,
    pub conv3:      Conv2d<B>,
    pub fc:         Linear<B>,
    pub activation: Relu,
}

impl<B: Backend> Encoder<B> {
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.activation.forward(self.conv1.forward(images)); // [b, 16, 14, 14]
        let x = self.activation.forward(self.conv2.forward(x));      // [b, 32, 7, 7]
        let x = self.activation.forward(self.conv3.forward(x));      // [b, 64, 1, 1]
        self.fc.forward(x.flatten::<2>(1, 3))
    }
}

/// Upsampling half: [batch, latent_dim] → [batch, 1, 28, 28] in [0, 1]
#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    pub fc:         Linear<B>,
    pub deconv1:    ConvTranspose2d<B>,
    pub deconv2:    ConvTranspose2d<B>,
    pub deconv3:    ConvTranspose2d<B>,
    pub activation: Relu,
    pub latent_dim: usize,
}

impl<B: Backend> Decoder<B> {
    pub fn forward(&self, latent: Tensor<B, 2>) -> Tensor<B, 4> {
        let [batch_size, _] = latent.dims();
        let x = self.activation.forward(self.fc.forward(latent));
        let x = x.reshape([batch_size, CHANNELS[2], 1, 1]);
        let x = self.activation.forward(self.deconv1.forward(x)); // [b, 32, 7, 7]
        let x = self.activation.forward(self.deconv2.forward(x)); // [b, 16, 14, 14]
        sigmoid(self.deconv3.forward(x))                          // [b, 1, 28, 28]
    }
}

#[derive(Module, Debug)]
pub struct Autoencoder<B: Backend> {
    pub encoder: Encoder<B>,
    pub decoder: Decoder<B>,
}

impl<B: Backend> Autoencoder<B> {
    pub fn latent_dim(&self) -> usize {
        self.decoder.latent_dim
    }

    /// images: [batch, 1, 28, 28] → reconstructions of the same shape
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 4> {
        self.decoder.forward(self.encoder.forward(images))
    }

    /// Mean squared error between the reconstruction of `batch.inputs`
    /// and the clean `batch.targets`.
    pub fn forward_loss(&self, batch: AutoencoderBatch<B>) -> (Tensor<B, 1>, Tensor<B, 4>) {
        let reconstruction = self.forward(batch.inputs);
        let loss = MseLoss::new().forward(reconstruction.clone(), batch.targets, Reduction::Mean);
        (loss, reconstruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};
    use burn::tensor::Distribution;

    type TestBackend = NdArray;

    fn model(latent_dim: usize) -> Autoencoder<TestBackend> {
        AutoencoderConfig::new(latent_dim).init(&NdArrayDevice::Cpu)
    }

    #[test]
    fn test_encoder_output_has_latent_dim_columns() {
        let device = NdArrayDevice::Cpu;
        let images = Tensor::<TestBackend, 4>::zeros(ImageShape::MNIST.batch_dims(5), &device);
        let latent = model(12).encoder.forward(images);
        assert_eq!(latent.dims(), [5, 12]);
    }

    #[test]
    fn test_decoder_output_matches_image_shape() {
        let device = NdArrayDevice::Cpu;
        let latent = Tensor::<TestBackend, 2>::random([3, 4], Distribution::Normal(0.0, 1.0), &device);
        let images = model(4).decoder.forward(latent);
        assert_eq!(images.dims(), ImageShape::MNIST.batch_dims(3));

        let pixels = images.into_data().to_vec::<f32>().unwrap();
        assert!(pixels.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_round_trip_preserves_shape() {
        let device = NdArrayDevice::Cpu;
        let images = Tensor::<TestBackend, 4>::ones(ImageShape::MNIST.batch_dims(2), &device);
        let out = model(8).forward(images);
        assert_eq!(out.dims(), [2, 1, 28, 28]);
    }

    #[test]
    fn test_forward_loss_is_zero_for_perfect_targets() {
        let device  = NdArrayDevice::Cpu;
        let model   = model(2);
        let inputs  = Tensor::<TestBackend, 4>::zeros(ImageShape::MNIST.batch_dims(2), &device);
        let targets = model.forward(inputs.clone());

        let (loss, reconstruction) = model.forward_loss(AutoencoderBatch { inputs, targets });
        assert_eq!(reconstruction.dims(), [2, 1, 28, 28]);
        assert!(loss.into_scalar().elem::<f32>().abs() < 1e-6);
    }
}
