// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The training framework never knows where its data comes from.
// It only talks to an `RtDataLoader`:
//
//   - TripleDataLoader → tab-separated triple files on disk
//   - tests use small in-memory loaders
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::domain::batch::RtBatch;
use crate::domain::triple::Split;

// ─── RtDataLoader ─────────────────────────────────────────────────────────────
/// Source of query batches plus the id → name lookup tables.
pub trait RtDataLoader {
    /// Number of queries in the given split
    fn split_len(&self, split: Split) -> usize;

    /// Number of queries in the training split
    fn train_len(&self) -> usize {
        self.split_len(Split::Train)
    }

    /// Number of entities, i.e. the width of a score matrix
    fn num_entities(&self) -> usize;

    /// Display name of a relation id
    fn id2rel(&self, id: usize) -> &str;

    /// Display name of an entity id
    fn id2ent(&self, id: usize) -> &str;

    /// One lazy pass over `split` in batches of `batch_size`.
    ///
    /// At most `max_batches` batches are produced when given.
    /// When `shuffle` is false the order is the file order.
    fn one_epoch(
        &self,
        split:       Split,
        batch_size:  usize,
        max_batches: Option<usize>,
        shuffle:     bool,
    ) -> Box<dyn Iterator<Item = RtBatch> + '_>;
}
