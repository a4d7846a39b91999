// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:        1-based epoch number
//   - train_loss:   running loss / number of training queries
//   - train_acc:    Hit@k over the training batches of the epoch
//   - train_recall: mean recall over the same batches
//   - valid_acc:    Hit@k on the validation split, empty when the
//                   epoch was not a validation epoch
//
// Output file: <checkpoint_dir>/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,train_acc,train_recall,valid_acc
//   1,4.512000,0.120000,0.080000,0.150000
//   2,3.981000,0.240000,0.170000,
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    pub train_loss: f64,

    /// Fraction in [0.0, 1.0]
    pub train_acc: f64,

    /// Fraction in [0.0, 1.0]
    pub train_recall: f64,

    /// None when validation did not run this epoch
    pub valid_acc: Option<f64>,
}

/// Appends epoch metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a logger writing to `<dir>/metrics.csv`.
    /// Writes the CSV header if the file doesn't exist yet, so
    /// resumed runs append to the same log.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "epoch,train_loss,train_acc,train_recall,valid_acc")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        let valid = m.valid_acc.map(|v| format!("{v:.6}")).unwrap_or_default();
        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{}",
            m.epoch, m.train_loss, m.train_acc, m.train_recall, valid,
        )?;

        tracing::debug!("Logged epoch {} metrics: train_loss={:.4}", m.epoch, m.train_loss);
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
