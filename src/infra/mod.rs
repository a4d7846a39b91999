// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting file concerns used by the framework and the
// application layer:
//
//   checkpoint.rs  — best-miner checkpoints (Burn records +
//                    JSON manifest) and run configuration files
//
//   metrics.rs     — per-epoch training metrics as CSV
//
//   predictions.rs — human-readable evaluation output
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Miner/optimizer checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;

/// Prediction file writer
pub mod predictions;
