// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates a training run in order:
//
//   Step 1: Prepare the checkpoint directory   (Layer 6 - infra)
//   Step 2: Save the run configuration         (Layer 6 - infra)
//   Step 3: Load data, build miner, train,
//           test the best checkpoint           (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::infra::checkpoint::CheckpointManager;
use crate::ml::framework::TrainReport;
use crate::ml::loss::LossKind;
use crate::ml::trainer::run_training;

/// File the training configuration is stored in
pub const TRAIN_CONFIG: &str = "train_config.json";

// ─── Device Selection ────────────────────────────────────────────────────────
/// Compute backend a run executes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// NdArray on the CPU
    #[default]
    Cpu,
    /// WebGPU
    Wgpu,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Cpu  => f.write_str("cpu"),
            DeviceKind::Wgpu => f.write_str("wgpu"),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu"          => Ok(DeviceKind::Cpu),
            "wgpu" | "gpu" => Ok(DeviceKind::Wgpu),
            other => Err(format!("unknown device '{other}', expected cpu | wgpu")),
        }
    }
}

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings of a training run. Serialisable so it can be
// saved next to the checkpoint and inspected later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:           String,
    pub checkpoint_dir:     String,
    pub resume:             Option<String>,
    pub device:             DeviceKind,
    pub top_k:              usize,
    pub batch_size:         usize,
    pub num_sample_batches: usize,
    pub epochs:             usize,
    pub valid_freq:         usize,
    pub lr:                 f64,
    pub embed_dim:          usize,
    pub seed:               u64,
    pub loss:               LossKind,
    pub prediction_file:    Option<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:           "data".to_string(),
            checkpoint_dir:     "checkpoints".to_string(),
            resume:             None,
            device:             DeviceKind::Cpu,
            top_k:              10,
            batch_size:         64,
            num_sample_batches: 1000,
            epochs:             20,
            valid_freq:         1,
            lr:                 1e-3,
            embed_dim:          64,
            seed:               42,
            loss:               LossKind::CrossEntropy,
            prediction_file:    None,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: Checkpoint directory ──────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir)?;

        // ── Step 2: Save config for later evaluation ──────────────────────────
        ckpt_manager.save_config(TRAIN_CONFIG, cfg)?;
        tracing::info!(
            "Training on '{}' ({} device, {} loss), checkpoints in '{}'",
            cfg.data_dir,
            cfg.device,
            cfg.loss,
            cfg.checkpoint_dir,
        );

        // ── Step 3: Run training loop (Layer 5) ───────────────────────────────
        run_training(cfg, &ckpt_manager)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_device_parsing() {
        assert_eq!("CPU".parse::<DeviceKind>(), Ok(DeviceKind::Cpu));
        assert_eq!("gpu".parse::<DeviceKind>(), Ok(DeviceKind::Wgpu));
        assert!("cuda".parse::<DeviceKind>().is_err());
    }

    #[test]
    fn test_config_serialises_lowercase_enums() {
        let json = serde_json::to_string(&TrainConfig::default()).unwrap();
        assert!(json.contains("\"device\":\"cpu\""));
        assert!(json.contains("\"loss\":\"cross-entropy\""));
        let back: TrainConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TrainConfig::default());
    }

    #[test]
    fn test_end_to_end_training_run() {
        let data = tempfile::tempdir().unwrap();
        fs::write(
            data.path().join("train.txt"),
            "a\tlikes\tb\nb\tlikes\tc\nc\tlikes\ta\na\tknows\tc\n",
        ).unwrap();
        fs::write(data.path().join("valid.txt"), "b\tknows\ta\n").unwrap();
        fs::write(data.path().join("test.txt"),  "c\tknows\tb\n").unwrap();

        let ckpt = tempfile::tempdir().unwrap();
        let pred = ckpt.path().join("test_predictions.txt");
        let cfg = TrainConfig {
            data_dir:        data.path().display().to_string(),
            checkpoint_dir:  ckpt.path().display().to_string(),
            top_k:           3,
            batch_size:      2,
            epochs:          6,
            embed_dim:       4,
            prediction_file: Some(pred.display().to_string()),
            ..TrainConfig::default()
        };

        let report = TrainUseCase::new(cfg).execute().unwrap();
        // 3 entities, k = 3 → every validation round hits, so the run
        // stops after one improving and three stalled rounds
        assert_eq!(report.epochs_run(), 4);

        assert!(ckpt.path().join(TRAIN_CONFIG).is_file());
        assert!(ckpt.path().join("miner_config.json").is_file());
        assert!(ckpt.path().join("checkpoint.ckpt.json").is_file());
        assert_eq!(fs::read_to_string(&pred).unwrap().lines().count(), 1);
    }
}
