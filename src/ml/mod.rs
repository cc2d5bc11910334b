// ============================================================
// Layer 5: ML / Model Layer (Burn)
// ============================================================
// All Burn model and training code lives here.
//
//   model.rs   : encoder (two stride-2 convolutions, one 7x7
//                convolution, a linear projection), the mirrored
//                transposed-convolution decoder with a sigmoid
//                output, and the MSE reconstruction loss
//
//   trainer.rs : backend selection, data loaders, Adam with a
//                cosine-annealed learning rate, validation pass,
//                per-epoch metrics and checkpoints
//
//   sampler.rs : loads a checkpoint and decodes random latent
//                vectors into new images
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Convolutional autoencoder architecture
pub mod model;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Generative sampling from the latent space
pub mod sampler;
