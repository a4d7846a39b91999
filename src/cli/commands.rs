// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `eval`
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::eval_use_case::EvalConfig;
use crate::application::train_use_case::{DeviceKind, TrainConfig};
use crate::domain::triple::Split;
use crate::ml::loss::LossKind;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the baseline miner on a triple dataset
    Train(TrainArgs),

    /// Evaluate a saved checkpoint on one split
    Eval(EvalArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory containing train.txt, valid.txt and test.txt
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Directory for the best checkpoint, configs and metrics.csv
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Checkpoint manifest (<name>.ckpt.json) to resume from
    #[arg(long)]
    pub resume: Option<String>,

    /// Compute backend: cpu | wgpu
    #[arg(long, default_value = "cpu")]
    pub device: DeviceKind,

    /// k of the Hit@k metric
    #[arg(long, default_value_t = 10)]
    pub top_k: usize,

    /// Queries per mini-batch
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Maximum number of batches per epoch
    #[arg(long, default_value_t = 1000)]
    pub num_sample_batches: usize,

    /// Maximum number of epochs
    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// Validate every N epochs
    #[arg(long, default_value_t = 1)]
    pub valid_freq: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Embedding width of the baseline miner
    #[arg(long, default_value_t = 64)]
    pub embed_dim: usize,

    /// Seed for parameter init and batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Loss: cross-entropy | bce
    #[arg(long, default_value = "cross-entropy")]
    pub loss: LossKind,

    /// Write test-split predictions to this file
    #[arg(long)]
    pub prediction_file: Option<String>,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:           a.data_dir,
            checkpoint_dir:     a.checkpoint_dir,
            resume:             a.resume,
            device:             a.device,
            top_k:              a.top_k,
            batch_size:         a.batch_size,
            num_sample_batches: a.num_sample_batches,
            epochs:             a.epochs,
            valid_freq:         a.valid_freq,
            lr:                 a.lr,
            embed_dim:          a.embed_dim,
            seed:               a.seed,
            loss:               a.loss,
            prediction_file:    a.prediction_file,
        }
    }
}

/// All arguments for the `eval` command
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Checkpoint manifest written by `train`, e.g. checkpoints/checkpoint.ckpt.json
    #[arg(long)]
    pub checkpoint: String,

    /// Directory containing the dataset the miner was trained on
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Split to evaluate: train | valid | test
    #[arg(long, default_value = "test")]
    pub split: Split,

    /// Compute backend: cpu | wgpu
    #[arg(long, default_value = "cpu")]
    pub device: DeviceKind,

    /// k of the Hit@k metric
    #[arg(long, default_value_t = 10)]
    pub top_k: usize,

    /// Queries per batch
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Write one prediction line per example to this file
    #[arg(long)]
    pub prediction_file: Option<String>,
}

impl From<EvalArgs> for EvalConfig {
    fn from(a: EvalArgs) -> Self {
        EvalConfig {
            data_dir:        a.data_dir,
            checkpoint:      a.checkpoint,
            split:           a.split,
            device:          a.device,
            top_k:           a.top_k,
            batch_size:      a.batch_size,
            prediction_file: a.prediction_file,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    #[test]
    fn test_train_defaults() {
        let cli = Cli::try_parse_from(["rt-miner", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg, TrainConfig::default());
    }

    #[test]
    fn test_eval_flags() {
        let cli = Cli::try_parse_from([
            "rt-miner", "eval",
            "--checkpoint", "ckpt/checkpoint.ckpt.json",
            "--split", "valid",
            "--device", "wgpu",
            "--top-k", "3",
        ]).unwrap();
        let Commands::Eval(args) = cli.command else { panic!("expected eval") };
        let cfg: EvalConfig = args.into();
        assert_eq!(cfg.split, Split::Valid);
        assert_eq!(cfg.device, DeviceKind::Wgpu);
        assert_eq!(cfg.top_k, 3);
        assert!(cfg.prediction_file.is_none());
    }

    #[test]
    fn test_bad_loss_rejected() {
        assert!(Cli::try_parse_from(["rt-miner", "train", "--loss", "mse"]).is_err());
    }
}
