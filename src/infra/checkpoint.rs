// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the best miner together with the optimizer
// state and the epoch it was reached at.
//
// What gets written per checkpoint `<name>`:
//   1. <name>-model.mpk.gz   — miner parameters (Burn record)
//   2. <name>-optim.mpk.gz   — optimizer state  (Burn record)
//   3. <name>.ckpt.json      — manifest: start_epoch + the two
//                              record file stems above
//
// The manifest is written last and is the file callers point
// at when resuming. Saving again under the same name overwrites
// all three, so only one rolling "best" checkpoint exists.
//
// Records use NamedMpkGzFileRecorder with full precision so a
// restored miner is bit-identical to the saved one.
//
// The directory also holds the run configuration files
// (train_config.json, miner_config.json) written through
// save_config / load_config.
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Record, Recorder},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

type CheckpointRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

/// Contents of `<name>.ckpt.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointManifest {
    /// Epoch index training resumes from
    pub start_epoch: usize,
    /// Stem of the miner record, relative to the manifest
    pub model:       String,
    /// Stem of the optimizer record, relative to the manifest
    pub optimizer:   String,
}

/// A checkpoint read back from disk.
pub struct LoadedCheckpoint<MR, OR> {
    pub start_epoch: usize,
    pub model:       MR,
    pub optimizer:   OR,
}

/// Manages the files of one checkpoint directory.
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a manager for `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the manifest for checkpoint `name`
    pub fn checkpoint_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.ckpt.json"))
    }

    /// Write the miner and optimizer records, then the manifest.
    /// Returns the manifest path.
    pub fn save<B, MR, OR>(
        &self,
        name:        &str,
        start_epoch: usize,
        model:       MR,
        optimizer:   OR,
    ) -> Result<PathBuf>
    where
        B:  Backend,
        MR: Record<B>,
        OR: Record<B>,
    {
        let recorder = CheckpointRecorder::new();

        let manifest = CheckpointManifest {
            start_epoch,
            model:     format!("{name}-model"),
            optimizer: format!("{name}-optim"),
        };

        let model_path = self.dir.join(&manifest.model);
        Recorder::<B>::record(&recorder, model, model_path.clone())
            .with_context(|| format!("Failed to save miner record to '{}'", model_path.display()))?;

        let optim_path = self.dir.join(&manifest.optimizer);
        Recorder::<B>::record(&recorder, optimizer, optim_path.clone())
            .with_context(|| format!("Failed to save optimizer record to '{}'", optim_path.display()))?;

        let path = self.checkpoint_path(name);
        fs::write(&path, serde_json::to_string_pretty(&manifest)?)
            .with_context(|| format!("Failed to write checkpoint manifest '{}'", path.display()))?;

        tracing::debug!("Saved checkpoint '{}' (start_epoch={})", path.display(), start_epoch);
        Ok(path)
    }

    /// Read a checkpoint from its manifest path.
    /// Fails if `path` is not an existing file.
    pub fn load<B, MR, OR>(path: &Path, device: &B::Device) -> Result<LoadedCheckpoint<MR, OR>>
    where
        B:  Backend,
        MR: Record<B>,
        OR: Record<B>,
    {
        if !path.is_file() {
            bail!("No checkpoint found at '{}'", path.display());
        }

        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read checkpoint '{}'", path.display()))?;
        let manifest: CheckpointManifest = serde_json::from_str(&json)
            .with_context(|| format!("Malformed checkpoint manifest '{}'", path.display()))?;

        let base     = path.parent().unwrap_or_else(|| Path::new("."));
        let recorder = CheckpointRecorder::new();

        let model_path = base.join(&manifest.model);
        let model: MR = Recorder::<B>::load(&recorder, model_path.clone(), device)
            .with_context(|| format!("Cannot load miner record '{}'", model_path.display()))?;

        let optim_path = base.join(&manifest.optimizer);
        let optimizer: OR = Recorder::<B>::load(&recorder, optim_path.clone(), device)
            .with_context(|| format!("Cannot load optimizer record '{}'", optim_path.display()))?;

        Ok(LoadedCheckpoint {
            start_epoch: manifest.start_epoch,
            model,
            optimizer,
        })
    }

    /// Serialise a configuration struct to `<dir>/<file_name>` as JSON.
    pub fn save_config<C: Serialize>(&self, file_name: &str, cfg: &C) -> Result<()> {
        let path = self.dir.join(file_name);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved config to '{}'", path.display());
        Ok(())
    }

    /// Read a configuration struct from `<dir>/<file_name>`.
    pub fn load_config<C: DeserializeOwned>(&self, file_name: &str) -> Result<C> {
        let path = self.dir.join(file_name);
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read config from '{}'. Make sure you have run 'train' first.",
                    path.display()
                )
            })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config '{}'", path.display()))
    }
}
