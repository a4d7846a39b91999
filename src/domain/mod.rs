// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing the knowledge graph
// and the batches the rule miner is trained on.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Everything here can be unit tested without a tensor backend.

// Facts (head, relation, tail) and dataset splits
pub mod triple;

// A mini-batch of queries as produced by a data loader
pub mod batch;

// Core abstractions (traits) that other layers implement
pub mod traits;
