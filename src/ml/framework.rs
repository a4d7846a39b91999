// ============================================================
// Layer 5 — Rule Mining Framework
// ============================================================
// Drives a miner through training and evaluation:
//
//   train()  — epochs of shuffled, capped mini-batches:
//                ids → device, dense targets, forward, loss,
//                backward, one optimizer step, running metrics
//              then validation every `valid_freq` epochs with
//              best-checkpoint saving and early stopping
//
//   eval()   — one ordered pass over a split with the eval-mode
//              miner, Hit@k and an optional prediction file
//
//   save_checkpoint() / load_checkpoint()
//
// Burn specifics:
//   - Training runs the autodiff miner `M` on backend B.
//   - Evaluation runs `miner.valid()`, the same parameters on
//     B::InnerBackend, so no autodiff graph is recorded.
//   - Gradients are collected fresh from each loss with
//     GradientsParams::from_grads; nothing carries over between
//     steps, so there is nothing to zero.
//
// Reference: Burn Book §5 (Custom Training Loop)

use anyhow::{anyhow, Result};
use burn::{
    data::dataloader::batcher::Batcher,
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use crate::data::batcher::{MinerBatch, MinerBatcher};
use crate::domain::batch::Tails;
use crate::domain::traits::RtDataLoader;
use crate::domain::triple::Split;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::infra::predictions::PredictionWriter;
use crate::ml::functional::{get_prediction, get_recall, hit_rate, in_top_k, in_top_k_multi, mean};
use crate::ml::loss::TargetLoss;
use crate::ml::miner::Miner;

/// Name of the rolling best checkpoint written during training
pub const BEST_CHECKPOINT: &str = "checkpoint";

/// Validation rounds without improvement tolerated before stopping.
/// Training stops on the (PATIENCE + 1)-th consecutive one.
pub const PATIENCE: usize = 2;

/// Construction-time settings of a framework.
#[derive(Debug, Clone)]
pub struct FrameworkOptions<D> {
    /// Compute device for every tensor
    pub device: D,
    /// Learning rate passed to each optimizer step
    pub lr: f64,
    /// Checkpoint manifest to resume from
    pub ckpt_file: Option<PathBuf>,
    /// Directory for the best checkpoint and metrics.csv
    pub ckpt_save_dir: Option<PathBuf>,
}

/// What `train` hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// Training loss of every completed epoch
    pub losses: Vec<f64>,
    /// Never filled in: validation accuracy is tracked through
    /// `best_acc` and metrics.csv instead. Kept so callers written
    /// against the (losses, accuracies) pair keep working.
    pub accuracies: Vec<f64>,
    /// Best validation Hit@k seen during this call
    pub best_acc: f64,
}

impl TrainReport {
    pub fn epochs_run(&self) -> usize {
        self.losses.len()
    }
}

/// Stall counter over validation accuracies.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    best_acc: f64,
    stalled:  usize,
    patience: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self { best_acc: 0.0, stalled: 0, patience }
    }

    /// Record a validation accuracy. Returns true when it beats
    /// the best seen so far.
    pub fn update(&mut self, acc: f64) -> bool {
        if acc > self.best_acc {
            self.best_acc = acc;
            self.stalled  = 0;
            true
        } else {
            self.stalled += 1;
            false
        }
    }

    pub fn should_stop(&self) -> bool {
        self.stalled > self.patience
    }

    pub fn best_acc(&self) -> f64 {
        self.best_acc
    }
}

/// Epoch-local running sums, reset at the start of every epoch.
#[derive(Debug, Default)]
struct RunningMetrics {
    hits:     Vec<bool>,
    recalls:  Vec<f32>,
    loss_sum: f64,
    seen:     usize,
}

impl RunningMetrics {
    fn record(&mut self, hits: Vec<bool>, recalls: Vec<f32>, batch_loss: f64, batch_len: usize) {
        self.hits.extend(hits);
        self.recalls.extend(recalls);
        self.loss_sum += batch_loss * batch_len as f64;
        self.seen     += batch_len;
    }

    fn acc(&self) -> f64 {
        hit_rate(&self.hits)
    }

    fn recall(&self) -> f64 {
        mean(&self.recalls)
    }
}

pub struct RtFramework<B, M, O, L, D>
where
    B: AutodiffBackend,
{
    miner:       M,
    optimizer:   O,
    dataloader:  D,
    loss_fn:     L,
    device:      B::Device,
    lr:          f64,
    checkpoints: Option<CheckpointManager>,
    metrics:     Option<MetricsLogger>,
    start_epoch: usize,
}

impl<B, M, O, L, D> RtFramework<B, M, O, L, D>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Miner<B>,
    M::InnerModule: Miner<B::InnerBackend>,
    O: Optimizer<M, B> + Clone,
    L: TargetLoss<B>,
    D: RtDataLoader,
{
    /// Assemble a framework. When `options.ckpt_file` is set the
    /// checkpoint is restored immediately and a missing file fails
    /// construction.
    pub fn new(
        miner:      M,
        optimizer:  O,
        dataloader: D,
        loss_fn:    L,
        options:    FrameworkOptions<B::Device>,
    ) -> Result<Self> {
        let checkpoints = options.ckpt_save_dir.map(CheckpointManager::new).transpose()?;
        let metrics = checkpoints
            .as_ref()
            .map(|c| MetricsLogger::new(c.dir()))
            .transpose()?;

        let mut framework = Self {
            miner,
            optimizer,
            dataloader,
            loss_fn,
            device: options.device,
            lr: options.lr,
            checkpoints,
            metrics,
            start_epoch: 0,
        };

        if let Some(path) = options.ckpt_file {
            framework.load_checkpoint(&path)?;
        }
        Ok(framework)
    }

    pub fn miner(&self) -> &M {
        &self.miner
    }

    pub fn dataloader(&self) -> &D {
        &self.dataloader
    }

    /// Epoch index the next `train` call starts from
    pub fn start_epoch(&self) -> usize {
        self.start_epoch
    }

    /// Train for up to `epochs` epochs.
    ///
    /// * `top_k`              - k of the Hit@k metric
    /// * `batch_size`         - queries per mini-batch
    /// * `num_sample_batches` - max batches per epoch
    /// * `valid_freq`         - validate every `valid_freq` epochs
    pub fn train(
        &mut self,
        top_k:              usize,
        batch_size:         usize,
        num_sample_batches: usize,
        epochs:             usize,
        valid_freq:         usize,
    ) -> Result<TrainReport> {
        let num_train    = self.dataloader.train_len();
        let num_entities = self.dataloader.num_entities();
        let batcher      = MinerBatcher::<B>::new(self.device.clone(), num_entities);
        let valid_freq   = valid_freq.max(1);

        let mut losses  = Vec::new();
        let mut stopper = EarlyStopping::new(PATIENCE);

        for epoch in self.start_epoch..self.start_epoch + epochs {
            println!("{:=^100}", format!(" Training epoch {} ", epoch + 1));
            let mut running = RunningMetrics::default();

            let batches = self.dataloader.one_epoch(
                Split::Train,
                batch_size,
                Some(num_sample_batches),
                true,
            );
            for batch in batches {
                if batch.is_empty() {
                    continue;
                }
                let batch = batcher.batch(vec![batch]);
                let sets  = batch.input.tails.to_sets();

                let (loss_val, scores) = optimizer_step(
                    &mut self.miner,
                    &mut self.optimizer,
                    &self.loss_fn,
                    self.lr,
                    batch,
                )?;

                // ── Running metrics ───────────────────────────────────────────
                running.record(
                    in_top_k_multi(&sets, &scores, num_entities, top_k),
                    get_recall(&sets, &scores, num_entities),
                    loss_val,
                    sets.len(),
                );

                println!(
                    "loss: {:>7.6}\tacc: {:>4.2}%\trecall: {:>4.2}%  [{:>6}/{:>6}]",
                    running.loss_sum / running.seen as f64,
                    100.0 * running.acc(),
                    100.0 * running.recall(),
                    running.seen,
                    num_train,
                );
            }

            let loss = running.loss_sum / num_train.max(1) as f64;
            println!(
                "[epoch {}] loss: {:>7.6}, acc: {:>4.2}%, recall: {:>4.2}%",
                epoch + 1,
                loss,
                100.0 * running.acc(),
                100.0 * running.recall(),
            );
            losses.push(loss);

            // ── Validation + best checkpoint ─────────────────────────────────
            let mut valid_acc = None;
            if (epoch + 1) % valid_freq == 0 {
                let acc = self.eval(Split::Valid, batch_size, top_k, None)?;
                valid_acc = Some(acc);
                if stopper.update(acc) {
                    println!("Best checkpoint reached at best acc: {:.2}%", acc * 100.0);
                    self.save_checkpoint(BEST_CHECKPOINT, epoch)?;
                }
            }

            if let Some(logger) = &self.metrics {
                logger.log(&EpochMetrics {
                    epoch:        epoch + 1,
                    train_loss:   loss,
                    train_acc:    running.acc(),
                    train_recall: running.recall(),
                    valid_acc,
                })?;
            }

            if stopper.should_stop() {
                tracing::info!(
                    "Early stopping at epoch {}: no validation improvement for {} rounds",
                    epoch + 1,
                    PATIENCE + 1,
                );
                break;
            }
        }

        let report = TrainReport {
            losses,
            accuracies: Vec::new(),
            best_acc:   stopper.best_acc(),
        };
        println!(
            "\n[Training finished] epochs: {}, best_acc: {:.2}%",
            report.epochs_run(),
            report.best_acc * 100.0,
        );
        Ok(report)
    }

    /// Forward, loss, backward and one optimizer step on `batch`.
    /// Returns the batch loss and the scores computed before the step.
    pub fn step(&mut self, batch: MinerBatch<B>) -> Result<(f64, Vec<f32>)> {
        optimizer_step(&mut self.miner, &mut self.optimizer, &self.loss_fn, self.lr, batch)
    }

    /// Hit@k of the eval-mode miner on `split`.
    ///
    /// With `prediction_file`, every example is also written as
    /// `query,head,true_tail,ranked entities...` where the ranking
    /// runs down to and including the true tail.
    pub fn eval(
        &self,
        split:           Split,
        batch_size:      usize,
        top_k:           usize,
        prediction_file: Option<&Path>,
    ) -> Result<f64> {
        let mut writer = prediction_file.map(PredictionWriter::create).transpose()?;

        let miner        = self.miner.valid();
        let num_entities = self.dataloader.num_entities();
        let batcher      = MinerBatcher::<B::InnerBackend>::new(self.device.clone(), num_entities);

        let num_batches = self.dataloader.split_len(split).div_ceil(batch_size.max(1));
        let pb = progress_bar(num_batches as u64)?;

        let mut hits = Vec::new();
        for batch in self.dataloader.one_epoch(split, batch_size, None, false) {
            let input  = batcher.batch(vec![batch.clone()]).input;
            let scores = host_scores(miner.forward(&input))?;

            hits.extend(match &batch.tails {
                Tails::Single(tails) => in_top_k(tails, &scores, num_entities, top_k),
                Tails::Multi(sets)   => in_top_k_multi(sets, &scores, num_entities, top_k),
            });

            if let Some(w) = writer.as_mut() {
                for (i, row) in scores.chunks(num_entities).enumerate() {
                    // multi-label rows are written against their first tail
                    let Some(&tail) = batch.tails.row(i).first() else {
                        continue;
                    };
                    let ranking = get_prediction(tail, row, |id| self.dataloader.id2ent(id));
                    w.write_row(
                        self.dataloader.id2rel(batch.queries[i]),
                        self.dataloader.id2ent(batch.heads[i]),
                        self.dataloader.id2ent(tail),
                        &ranking,
                    )?;
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        if let Some(w) = writer {
            w.finish()?;
        }
        Ok(hit_rate(&hits))
    }

    /// Restore miner, optimizer and start epoch from a checkpoint
    /// manifest. On error nothing is changed.
    pub fn load_checkpoint(&mut self, path: &Path) -> Result<()> {
        let loaded = CheckpointManager::load::<
            B,
            <M as Module<B>>::Record,
            <O as Optimizer<M, B>>::Record,
        >(path, &self.device)?;

        self.miner       = self.miner.clone().load_record(loaded.model);
        self.optimizer   = self.optimizer.clone().load_record(loaded.optimizer);
        self.start_epoch = loaded.start_epoch;

        tracing::info!("Successfully loaded checkpoint '{}'", path.display());
        Ok(())
    }

    /// Save miner and optimizer as checkpoint `name` with
    /// `start_epoch = end_epoch`. Does nothing and returns `None`
    /// when no checkpoint directory is configured.
    pub fn save_checkpoint(&self, name: &str, end_epoch: usize) -> Result<Option<PathBuf>> {
        let Some(manager) = &self.checkpoints else {
            return Ok(None);
        };
        let path = manager.save::<B, _, _>(
            name,
            end_epoch,
            self.miner.clone().into_record(),
            self.optimizer.to_record(),
        )?;
        tracing::info!("Checkpoint saved to '{}'", path.display());
        Ok(Some(path))
    }
}

// Takes the fields separately so `train` can step while its batch
// iterator still borrows the data loader.
fn optimizer_step<B, M, O, L>(
    miner:     &mut M,
    optimizer: &mut O,
    loss_fn:   &L,
    lr:        f64,
    batch:     MinerBatch<B>,
) -> Result<(f64, Vec<f32>)>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Miner<B>,
    O: Optimizer<M, B>,
    L: TargetLoss<B>,
{
    // ── Forward + loss ────────────────────────────────────────────────────────
    let logits   = miner.forward(&batch.input);
    let loss     = loss_fn.forward(logits.clone(), batch.targets);
    let loss_val = loss.clone().into_scalar().elem::<f64>();

    // ── Backward + optimizer step ─────────────────────────────────────────────
    let grads = GradientsParams::from_grads(loss.backward(), &*miner);
    *miner    = optimizer.step(lr, miner.clone(), grads);

    Ok((loss_val, host_scores(logits)?))
}

/// Copy a score matrix back to the host as row-major f32 values
fn host_scores<BK: Backend>(logits: Tensor<BK, 2>) -> Result<Vec<f32>> {
    logits
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("Cannot read scores back from the device: {e:?}"))
}

fn progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(ProgressStyle::with_template(
        "{msg} {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]",
    )?);
    pb.set_message("Predict");
    Ok(pb)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use burn::backend::{Autodiff, NdArray};
    use burn::module::Param;
    use burn::optim::AdamConfig;

    use crate::data::batcher::MinerInput;
    use crate::data::triple_loader::{NamedTriple, TripleDataLoader};
    use crate::ml::loss::SoftCrossEntropy;
    use crate::ml::miner::{BilinearMiner, MinerConfig};

    type TestBackend = Autodiff<NdArray>;

    /// Scores come straight from a [num_heads, num_entities] table
    #[derive(Module, Debug)]
    struct TableMiner<B: Backend> {
        table: Param<Tensor<B, 2>>,
    }

    impl<B: Backend> Miner<B> for TableMiner<B> {
        fn forward(&self, input: &MinerInput<B>) -> Tensor<B, 2> {
            self.table.val().select(0, input.heads.clone())
        }
    }

    fn named(rows: &[(&str, &str, &str)]) -> Vec<NamedTriple> {
        rows.iter()
            .map(|(h, r, t)| (h.to_string(), r.to_string(), t.to_string()))
            .collect()
    }

    fn family_loader() -> TripleDataLoader {
        let train = named(&[
            ("ann", "parent", "bea"),
            ("bea", "parent", "cid"),
            ("ann", "parent", "dan"),
            ("cid", "sibling", "dan"),
        ]);
        let valid = named(&[("dan", "sibling", "cid")]);
        let test  = named(&[("bea", "sibling", "dan")]);
        TripleDataLoader::from_named(train, valid, test, 11)
    }

    fn options(ckpt_file: Option<PathBuf>, ckpt_save_dir: Option<PathBuf>) -> FrameworkOptions<<TestBackend as Backend>::Device> {
        FrameworkOptions { device: Default::default(), lr: 0.05, ckpt_file, ckpt_save_dir }
    }

    fn bilinear_framework(
        ckpt_file:     Option<PathBuf>,
        ckpt_save_dir: Option<PathBuf>,
    ) -> Result<RtFramework<
        TestBackend,
        BilinearMiner<TestBackend>,
        impl Optimizer<BilinearMiner<TestBackend>, TestBackend> + Clone,
        SoftCrossEntropy,
        TripleDataLoader,
    >> {
        let loader = family_loader();
        let miner: BilinearMiner<TestBackend> = MinerConfig::new(loader.num_entities(), loader.num_relations())
            .with_embed_dim(8)
            .init(&Default::default());
        let optim = AdamConfig::new().init::<TestBackend, BilinearMiner<TestBackend>>();
        RtFramework::new(miner, optim, loader, SoftCrossEntropy, options(ckpt_file, ckpt_save_dir))
    }

    fn weights(miner: &BilinearMiner<TestBackend>) -> Vec<f32> {
        miner.entity.weight.val().into_data().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_early_stopping_counter() {
        let mut s = EarlyStopping::new(PATIENCE);
        assert!(s.update(0.5));
        assert!(!s.update(0.4));
        assert!(!s.update(0.5));
        assert!(!s.should_stop());
        assert!(!s.update(0.3));
        assert!(s.should_stop());
        assert_eq!(s.best_acc(), 0.5);
    }

    #[test]
    fn test_improvement_resets_counter() {
        let mut s = EarlyStopping::new(PATIENCE);
        s.update(0.5);
        s.update(0.4);
        s.update(0.4);
        assert!(s.update(0.6));
        s.update(0.1);
        s.update(0.1);
        assert!(!s.should_stop());
    }

    #[test]
    fn test_train_stops_after_three_stalled_rounds() {
        // top_k covers every entity → validation accuracy is always
        // 1.0, so only the first round improves.
        let tmp = tempfile::tempdir().unwrap();
        let mut fw = bilinear_framework(None, Some(tmp.path().to_path_buf())).unwrap();
        let k = fw.dataloader().num_entities();

        let report = fw.train(k, 2, 10, 20, 1).unwrap();
        assert_eq!(report.epochs_run(), 4);
        assert_eq!(report.best_acc, 1.0);
        assert!(report.accuracies.is_empty());
        assert!(report.losses.iter().all(|l| l.is_finite()));

        let manifest = fs::read_to_string(tmp.path().join("checkpoint.ckpt.json")).unwrap();
        assert!(manifest.contains("\"start_epoch\": 0"));

        let csv = fs::read_to_string(tmp.path().join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 1 + 4);
    }

    #[test]
    fn test_train_never_stops_early_between_validations() {
        let mut fw = bilinear_framework(None, None).unwrap();
        let k = fw.dataloader().num_entities();

        // validation at epochs 2, 4, 6, 8 → stop after epoch 8
        let report = fw.train(k, 2, 10, 20, 2).unwrap();
        assert_eq!(report.epochs_run(), 8);
    }

    #[test]
    fn test_train_runs_all_epochs_without_validation() {
        let mut fw = bilinear_framework(None, None).unwrap();
        let report = fw.train(1, 2, 1, 3, 100).unwrap();
        assert_eq!(report.epochs_run(), 3);
        assert_eq!(report.best_acc, 0.0);
    }

    #[test]
    fn test_save_without_dir_writes_nothing() {
        // run from an empty directory so any relative write would land in it
        let tmp = tempfile::tempdir().unwrap();
        let cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(tmp.path()).unwrap();

        let mut fw = bilinear_framework(None, None).unwrap();
        let k = fw.dataloader().num_entities();
        // first validation round improves, which would save a checkpoint
        let report = fw.train(k, 2, 10, 1, 1).unwrap();
        let saved  = fw.save_checkpoint(BEST_CHECKPOINT, 3).unwrap();

        std::env::set_current_dir(cwd).unwrap();
        assert_eq!(report.best_acc, 1.0);
        assert!(saved.is_none());
        assert!(fw.checkpoints.is_none());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_checkpoint_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let mut fw = bilinear_framework(None, Some(tmp.path().to_path_buf())).unwrap();
        fw.train(1, 2, 10, 2, 100).unwrap();

        let path = fw.save_checkpoint("checkpoint", 5).unwrap().unwrap();
        let trained = weights(fw.miner());

        let resumed = bilinear_framework(Some(path), None).unwrap();
        assert_eq!(resumed.start_epoch(), 5);
        assert_eq!(weights(resumed.miner()), trained);
    }

    #[test]
    fn test_resumed_optimizer_state_matches_original() {
        let tmp = tempfile::tempdir().unwrap();
        let mut original = bilinear_framework(None, Some(tmp.path().to_path_buf())).unwrap();
        original.train(1, 2, 10, 3, 100).unwrap();
        let path = original.save_checkpoint("checkpoint", 3).unwrap().unwrap();

        let mut resumed = bilinear_framework(Some(path), None).unwrap();
        // same weights, but Adam starts without moment history
        let mut fresh = bilinear_framework(None, None).unwrap();
        fresh.miner = resumed.miner.clone();

        let num_entities = original.dataloader().num_entities();
        let batcher = MinerBatcher::<TestBackend>::new(Default::default(), num_entities);
        let batch = original
            .dataloader()
            .one_epoch(Split::Train, 10, None, false)
            .next()
            .unwrap();

        original.step(batcher.batch(vec![batch.clone()])).unwrap();
        resumed.step(batcher.batch(vec![batch.clone()])).unwrap();
        fresh.step(batcher.batch(vec![batch])).unwrap();

        assert_eq!(weights(resumed.miner()), weights(original.miner()));
        assert_ne!(weights(fresh.miner()), weights(original.miner()));
    }

    #[test]
    fn test_resumed_training_continues_epoch_numbering() {
        let tmp = tempfile::tempdir().unwrap();
        let fw  = bilinear_framework(None, Some(tmp.path().to_path_buf())).unwrap();
        let path = fw.save_checkpoint("checkpoint", 4).unwrap().unwrap();

        let mut resumed = bilinear_framework(Some(path), None).unwrap();
        let report = resumed.train(1, 2, 10, 2, 100).unwrap();
        assert_eq!(resumed.start_epoch(), 4);
        assert_eq!(report.epochs_run(), 2);
    }

    #[test]
    fn test_load_missing_checkpoint_leaves_state() {
        let tmp = tempfile::tempdir().unwrap();
        let mut fw = bilinear_framework(None, None).unwrap();
        let before = weights(fw.miner());

        let err = fw.load_checkpoint(&tmp.path().join("missing.ckpt.json")).unwrap_err();
        assert!(err.to_string().contains("No checkpoint found"));
        assert_eq!(fw.start_epoch(), 0);
        assert_eq!(weights(fw.miner()), before);
    }

    #[test]
    fn test_construction_fails_on_missing_checkpoint() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(bilinear_framework(Some(tmp.path().join("missing.ckpt.json")), None).is_err());
    }

    #[test]
    fn test_eval_hit_rate_and_predictions() {
        let train = named(&[("e0", "r", "e1"), ("e2", "r", "e3")]);
        let test  = named(&[
            ("e0", "r", "e0"),
            ("e1", "r", "e2"),
            ("e2", "r", "e3"),
            ("e3", "r", "e1"),
        ]);
        let loader = TripleDataLoader::from_named(train, Vec::new(), test, 0);

        let device = Default::default();
        let scores: [f32; 16] = [
            0.9, 0.1, 0.3, 0.2,
            0.5, 0.8, 0.6, 0.1,
            0.7, 0.6, 0.5, 0.1,
            0.2, 0.9, 0.4, 0.3,
        ];
        let table = Tensor::<TestBackend, 1>::from_floats(scores.as_slice(), &device).reshape([4, 4]);
        let miner = TableMiner { table: Param::from_tensor(table) };
        let optim = AdamConfig::new().init::<TestBackend, TableMiner<TestBackend>>();
        let fw = RtFramework::new(miner, optim, loader, SoftCrossEntropy, options(None, None)).unwrap();

        let tmp  = tempfile::tempdir().unwrap();
        let pred = tmp.path().join("predictions.txt");

        // tails ranked 1st, 2nd, 4th, 1st → 3 hits of 4 at k = 2
        let acc = fw.eval(Split::Test, 3, 2, Some(&pred)).unwrap();
        assert!((acc - 0.75).abs() < 1e-12);

        let text  = fs::read_to_string(&pred).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // each ranking runs down to the true tail, hit or miss
        assert_eq!(lines, vec![
            "r,e0,e0,e0",
            "r,e1,e2,e1,e2",
            "r,e2,e3,e0,e1,e2,e3",
            "r,e3,e1,e1",
        ]);

        assert_eq!(fw.eval(Split::Test, 4, 4, None).unwrap(), 1.0);
        assert_eq!(fw.eval(Split::Valid, 4, 2, None).unwrap(), 0.0);
    }
}
