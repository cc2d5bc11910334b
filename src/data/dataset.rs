// ============================================================
// Layer 4: MNIST Dataset Access
// ============================================================
// Burn's vision feature downloads and caches MNIST on first
// use, so this module only picks the split and converts raw
// bytes to [0, 1] intensities.

use burn::data::dataset::vision::{MnistDataset, MnistItem};

use crate::domain::image::ImageShape;

/// The 60 000-image MNIST training split
pub fn mnist_train() -> MnistDataset {
    tracing::info!("Loading MNIST training split (downloaded on first use)");
    MnistDataset::train()
}

/// Flatten an item into row-major pixels scaled from [0, 255] to [0, 1].
pub fn image_to_pixels(item: &MnistItem) -> Vec<f32> {
    let mut pixels = Vec::with_capacity(ImageShape::MNIST.pixels());
    for row in item.image.iter() {
        pixels.extend(row.iter().map(|&p| p / 255.0));
    }
    pixels
}
