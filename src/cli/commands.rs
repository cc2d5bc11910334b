// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `sample`, and all
// their flags. clap's derive macros generate --help text,
// error messages for bad values, and type conversion.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::train_use_case::TrainConfig;
use crate::data::splitter::MNIST_TRAIN_FRACTION;
use crate::domain::accelerator::Accelerator;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the autoencoder on MNIST, then save a grid of generated samples
    Train(TrainArgs),

    /// Generate images from random latent vectors with a trained checkpoint
    Sample(SampleArgs),
}

/// Hardware to run on
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcceleratorArg {
    /// NdArray backend on the CPU
    Cpu,
    /// Wgpu backend on the default GPU adapter
    Gpu,
}

impl From<AcceleratorArg> for Accelerator {
    fn from(a: AcceleratorArg) -> Self {
        match a {
            AcceleratorArg::Cpu => Accelerator::Cpu,
            AcceleratorArg::Gpu => Accelerator::Gpu,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory for config, checkpoints, metrics and samples
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Number of images per optimiser step
    #[arg(long, default_value_t = 256)]
    pub batch_size: usize,

    /// Initial Adam learning rate, annealed with a cosine schedule
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Learning rate the cosine schedule anneals towards
    #[arg(long, default_value_t = 0.0)]
    pub min_lr: f64,

    /// Size of the latent vector between encoder and decoder
    #[arg(long, default_value_t = 16)]
    pub latent_dim: usize,

    /// Train a denoising autoencoder: noisy inputs, clean targets
    #[arg(long)]
    pub denoise: bool,

    /// Standard deviation of the Gaussian input noise (with --denoise)
    #[arg(long, default_value_t = 0.3)]
    pub noise_std: f64,

    #[arg(long, value_enum, default_value_t = AcceleratorArg::Cpu)]
    pub accelerator: AcceleratorArg,

    /// Data loading worker threads
    #[arg(long, default_value_t = 4)]
    pub num_workers: usize,

    /// Seed for weight init, data shuffling and noise
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of the MNIST training split used for training;
    /// the rest is the validation set
    #[arg(long, default_value_t = MNIST_TRAIN_FRACTION)]
    pub train_fraction: f64,

    /// Number of generated images saved after training
    #[arg(long, default_value_t = 8)]
    pub num_samples: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            artifact_dir:      a.artifact_dir,
            epochs:            a.epochs,
            batch_size:        a.batch_size,
            learning_rate:     a.lr,
            min_learning_rate: a.min_lr,
            latent_dim:        a.latent_dim,
            denoise:           a.denoise,
            noise_std:         a.noise_std,
            accelerator:       a.accelerator.into(),
            num_workers:       a.num_workers,
            seed:              a.seed,
            train_fraction:    a.train_fraction,
            num_samples:       a.num_samples,
        }
    }
}

/// All arguments for the `sample` command
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Directory the `train` command wrote its artifacts to
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,

    /// Number of images to generate
    #[arg(long, default_value_t = 16)]
    pub count: usize,

    /// Seed for the random latent vectors
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Output PNG path [default: <artifact-dir>/generated.png]
    #[arg(long)]
    pub output: Option<String>,

    #[arg(long, value_enum, default_value_t = AcceleratorArg::Cpu)]
    pub accelerator: AcceleratorArg,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["conv-autoencoder", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };

        let cfg: TrainConfig = args.into();
        let def = TrainConfig::default();
        assert_eq!(cfg.epochs, def.epochs);
        assert_eq!(cfg.batch_size, def.batch_size);
        assert_eq!(cfg.latent_dim, def.latent_dim);
        assert_eq!(cfg.learning_rate, def.learning_rate);
        assert_eq!(cfg.accelerator, def.accelerator);
        assert_eq!(cfg.train_fraction, def.train_fraction);
        assert!(!cfg.denoise);
    }

    #[test]
    fn test_train_flags() {
        let cli = Cli::try_parse_from([
            "conv-autoencoder", "train",
            "--epochs", "3", "--batch-size", "32", "--lr", "0.01",
            "--latent-dim", "2", "--denoise", "--accelerator", "gpu",
            "--num-workers", "1",
        ]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };

        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.epochs, 3);
        assert_eq!(cfg.batch_size, 32);
        assert_eq!(cfg.learning_rate, 0.01);
        assert_eq!(cfg.latent_dim, 2);
        assert!(cfg.denoise);
        assert_eq!(cfg.accelerator, Accelerator::Gpu);
        assert_eq!(cfg.num_workers, 1);
    }

    #[test]
    fn test_sample_args() {
        let cli = Cli::try_parse_from([
            "conv-autoencoder", "sample", "--count", "4", "--output", "out.png",
        ]).unwrap();
        let Commands::Sample(args) = cli.command else { panic!("expected sample") };
        assert_eq!(args.count, 4);
        assert_eq!(args.output.as_deref(), Some("out.png"));
        assert_eq!(args.accelerator, AcceleratorArg::Cpu);
    }

    #[test]
    fn test_unknown_accelerator_rejected() {
        assert!(Cli::try_parse_from(["conv-autoencoder", "train", "--accelerator", "tpu"]).is_err());
    }
}
