// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Everything that touches the file system:
//
//   checkpoint.rs    : model weights via Burn's CompactRecorder,
//                      plus the TrainConfig as JSON so the model
//                      can be rebuilt with the right latent size
//
//   metrics.rs       : per-epoch losses and learning rate as CSV
//
//   visualization.rs : grayscale PNG output for generated samples
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// PNG writer for sample grids
pub mod visualization;
