// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything between the MNIST files on disk and the image
// tensors the model consumes:
//
//   MnistDataset      → burn downloads and caches the IDX files
//       │
//       ▼
//   split_train_val   → seeded shuffle, 55 000 / 5 000 split
//       │
//       ▼
//   AutoencoderBatcher → stacks items into [N, 1, 28, 28],
//       │                adds noise in denoising mode
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// MNIST splits and pixel conversion
pub mod dataset;

/// Seeded train/validation split over any Burn dataset
pub mod splitter;

/// Implements Burn's Batcher trait, including noise injection
pub mod batcher;
