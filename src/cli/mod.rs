// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and delegates to Layer 2 (application).
//
//   1. `train`  : trains the autoencoder, saves checkpoints,
//                 metrics and a grid of generated samples
//   2. `sample` : loads a checkpoint and generates new images
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use commands::{Commands, SampleArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "conv-autoencoder",
    version,
    about = "Train a convolutional (denoising) autoencoder on MNIST and sample from its latent space."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)  => run_train(args),
            Commands::Sample(args) => run_sample(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};

    let config: TrainConfig = args.into();
    let samples_path = config.samples_path();
    tracing::info!("Writing artifacts to: {}", config.artifact_dir);

    let summary = TrainUseCase::new(config).execute()?;

    if let Some(m) = summary.final_metrics() {
        println!(
            "Training complete. Final train_loss={:.5}, val_loss={:.5}",
            m.train_loss, m.val_loss
        );
    }
    if let Some(best) = summary.best_epoch() {
        println!("Best validation loss {:.5} at epoch {}", best.val_loss, best.epoch);
    }
    println!("Samples saved to {}", samples_path.display());
    Ok(())
}

fn run_sample(args: SampleArgs) -> Result<()> {
    use crate::application::sample_use_case::SampleUseCase;

    let output = args
        .output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&args.artifact_dir).join("generated.png"));

    let use_case = SampleUseCase::from_artifacts(&args.artifact_dir, args.accelerator.into())?;
    let written  = use_case.execute(args.count, args.seed, output)?;

    println!("Generated {} images: {}", args.count, written.display());
    Ok(())
}
