// ============================================================
// Layer 5 — Training and Evaluation Runs
// ============================================================
// Wires the concrete pieces into an RtFramework and runs it:
//
//   TripleDataLoader + BilinearMiner + Adam + configured loss
//
// Two backends are available:
//   - cpu  → Autodiff<NdArray>
//   - wgpu → Autodiff<Wgpu>
// Evaluation uses the inner backend through miner.valid(), so no
// separate backend type is needed for it.
//
// Reference: Burn Book §5 (Training), Kingma & Ba (2015) Adam

use anyhow::{anyhow, bail, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu},
    optim::AdamConfig,
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::path::{Path, PathBuf};

use crate::application::eval_use_case::EvalConfig;
use crate::application::train_use_case::{DeviceKind, TrainConfig};
use crate::data::triple_loader::TripleDataLoader;
use crate::domain::traits::RtDataLoader;
use crate::domain::triple::Split;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::framework::{FrameworkOptions, RtFramework, TrainReport, BEST_CHECKPOINT};
use crate::ml::loss::SoftCrossEntropy;
use crate::ml::miner::{BilinearMiner, MinerConfig};

type CpuBackend  = Autodiff<NdArray>;
type WgpuBackend = Autodiff<Wgpu>;

/// File the miner architecture is stored in, next to the checkpoint
pub const MINER_CONFIG: &str = "miner_config.json";

pub fn run_training(cfg: &TrainConfig, ckpt_manager: &CheckpointManager) -> Result<TrainReport> {
    match cfg.device {
        DeviceKind::Cpu => train_loop::<CpuBackend>(cfg, ckpt_manager, NdArrayDevice::Cpu),
        DeviceKind::Wgpu => {
            let device = WgpuDevice::default();
            tracing::info!("Using WGPU device: {:?}", device);
            train_loop::<WgpuBackend>(cfg, ckpt_manager, device)
        }
    }
}

pub fn run_evaluation(cfg: &EvalConfig) -> Result<f64> {
    match cfg.device {
        DeviceKind::Cpu  => eval_loop::<CpuBackend>(cfg, NdArrayDevice::Cpu),
        DeviceKind::Wgpu => eval_loop::<WgpuBackend>(cfg, WgpuDevice::default()),
    }
}

fn train_loop<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    ckpt_manager: &CheckpointManager,
    device:       B::Device,
) -> Result<TrainReport> {
    B::seed(cfg.seed);

    // ── Data ──────────────────────────────────────────────────────────────────
    let loader = TripleDataLoader::from_dir(&cfg.data_dir, cfg.seed)?;
    if loader.train_len() == 0 {
        bail!("Training split of '{}' is empty", cfg.data_dir);
    }

    // ── Miner ─────────────────────────────────────────────────────────────────
    let miner_cfg = MinerConfig::new(loader.num_entities(), loader.num_relations())
        .with_embed_dim(cfg.embed_dim);
    let miner_cfg_path = ckpt_manager.dir().join(MINER_CONFIG);
    miner_cfg
        .save(&miner_cfg_path)
        .map_err(|e| anyhow!("Cannot write '{}': {e}", miner_cfg_path.display()))?;

    let miner: BilinearMiner<B> = miner_cfg.init(&device);
    tracing::info!(
        "Miner ready: {} entities, {} relations, embed_dim={}",
        miner_cfg.num_entities,
        miner_cfg.num_relations,
        miner_cfg.embed_dim,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let optim = AdamConfig::new()
        .with_epsilon(1e-8)
        .init::<B, BilinearMiner<B>>();

    let mut framework = RtFramework::new(
        miner,
        optim,
        loader,
        cfg.loss,
        FrameworkOptions {
            device,
            lr:            cfg.lr,
            ckpt_file:     cfg.resume.as_ref().map(PathBuf::from),
            ckpt_save_dir: Some(ckpt_manager.dir().to_path_buf()),
        },
    )?;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let report = framework.train(
        cfg.top_k,
        cfg.batch_size,
        cfg.num_sample_batches,
        cfg.epochs,
        cfg.valid_freq,
    )?;

    // ── Test with the best miner ──────────────────────────────────────────────
    let best = ckpt_manager.checkpoint_path(BEST_CHECKPOINT);
    if best.is_file() {
        framework.load_checkpoint(&best)?;
    } else {
        tracing::warn!("No best checkpoint was written; testing the last miner");
    }

    let test_acc = framework.eval(
        Split::Test,
        cfg.batch_size,
        cfg.top_k,
        cfg.prediction_file.as_deref().map(Path::new),
    )?;
    println!("[test] Hit@{}: {:.2}%", cfg.top_k, test_acc * 100.0);

    Ok(report)
}

fn eval_loop<B: AutodiffBackend>(cfg: &EvalConfig, device: B::Device) -> Result<f64> {
    let checkpoint = PathBuf::from(&cfg.checkpoint);
    let dir = checkpoint.parent().unwrap_or_else(|| Path::new("."));

    let miner_cfg_path = dir.join(MINER_CONFIG);
    let miner_cfg = MinerConfig::load(&miner_cfg_path)
        .map_err(|e| anyhow!("Cannot load miner config '{}': {e:?}", miner_cfg_path.display()))?;

    let loader = TripleDataLoader::from_dir(&cfg.data_dir, 0)?;
    if loader.num_entities() != miner_cfg.num_entities
        || loader.num_relations() != miner_cfg.num_relations
    {
        bail!(
            "Dataset '{}' has {} entities / {} relations but the miner was trained on {} / {}",
            cfg.data_dir,
            loader.num_entities(),
            loader.num_relations(),
            miner_cfg.num_entities,
            miner_cfg.num_relations,
        );
    }

    let miner: BilinearMiner<B> = miner_cfg.init(&device);
    let optim = AdamConfig::new().init::<B, BilinearMiner<B>>();

    let framework = RtFramework::new(
        miner,
        optim,
        loader,
        // eval never computes a loss
        SoftCrossEntropy,
        FrameworkOptions {
            device,
            lr:            0.0,
            ckpt_file:     Some(checkpoint),
            ckpt_save_dir: None,
        },
    )?;

    framework.eval(
        cfg.split,
        cfg.batch_size,
        cfg.top_k,
        cfg.prediction_file.as_deref().map(Path::new),
    )
}
