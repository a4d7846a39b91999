// ============================================================
// Layer 2 — EvalUseCase
// ============================================================
// Restores a trained miner from a checkpoint manifest and
// measures Hit@k on one split, optionally writing predictions.
//
// The miner architecture is rebuilt from miner_config.json,
// which training writes next to the checkpoint.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::DeviceKind;
use crate::domain::triple::Split;
use crate::ml::trainer::run_evaluation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    pub data_dir:        String,
    /// Path of a `<name>.ckpt.json` manifest
    pub checkpoint:      String,
    pub split:           Split,
    pub device:          DeviceKind,
    pub top_k:           usize,
    pub batch_size:      usize,
    pub prediction_file: Option<String>,
}

pub struct EvalUseCase {
    config: EvalConfig,
}

impl EvalUseCase {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    /// Returns Hit@k on the configured split
    pub fn execute(&self) -> Result<f64> {
        let cfg = &self.config;
        tracing::info!(
            "Evaluating '{}' on the {} split of '{}'",
            cfg.checkpoint,
            cfg.split,
            cfg.data_dir,
        );
        run_evaluation(cfg)
    }
}
