// ============================================================
// Layer 5 — ML Layer (Burn)
// ============================================================
// All Burn-specific training code lives here.
//
//   miner.rs      — the Miner trait and the bundled bilinear
//                   baseline miner
//
//   loss.rs       — losses against dense target distributions
//
//   functional.rs — Hit@k, recall and ranked predictions on
//                   host-side score matrices
//
//   framework.rs  — RtFramework: train / eval / checkpoints,
//                   early stopping
//
//   trainer.rs    — builds a framework for the CLI and runs it
//                   on the selected backend
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Miner trait and baseline miner
pub mod miner;

/// Target-distribution losses
pub mod loss;

/// Ranking metrics
pub mod functional;

/// The training / evaluation framework
pub mod framework;

/// Backend selection and end-to-end runs
pub mod trainer;
