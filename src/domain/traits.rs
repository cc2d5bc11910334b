// ============================================================
// Layer 3: Core Traits (Abstractions)
// ============================================================
// The application layer talks to the generative model through
// this trait, so it never sees Burn backends or tensors.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::image::ImageShape;

// ─── ImageGenerator ───────────────────────────────────────────────────────────
/// Any component that can produce new images from random latent codes.
///
/// Implementations:
///   - Sampler → decodes N(0, 1) latent vectors with a trained decoder
pub trait ImageGenerator {
    /// Shape of every generated image
    fn image_shape(&self) -> ImageShape;

    /// Generate `count` images. Each is a flat pixel buffer of
    /// `image_shape().pixels()` values in [0, 1].
    /// `seed` seeds the backend RNG before the latent codes are drawn.
    fn generate(&self, count: usize, seed: u64) -> Result<Vec<Vec<f32>>>;
}
