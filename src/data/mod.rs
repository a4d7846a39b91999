// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer turns triple files on disk into tensor batches.
//
//   train.txt / valid.txt / test.txt
//       │
//       ▼
//   Vocab             → entity and relation names ↔ dense ids
//       │
//       ▼
//   TripleDataLoader  → groups facts into queries, shuffles,
//       │               yields RtBatch values lazily
//       ▼
//   MinerBatcher      → Burn Batcher: moves ids to the device
//                       and builds the dense target matrix
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Name ↔ id tables for entities and relations
pub mod vocab;

/// Reads tab-separated triple files and implements RtDataLoader
pub mod triple_loader;

/// Burn Batcher from RtBatch to miner input and targets
pub mod batcher;
