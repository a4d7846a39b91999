// ============================================================
// Layer 4 — Miner Batcher
// ============================================================
// Implements Burn's Batcher trait to turn loader batches into
// the tensors a miner consumes plus the dense target
// distribution used by the loss.
//
//   queries   Vec<usize>  → Tensor<B, 1, Int>  [batch]
//   heads     Vec<usize>  → Tensor<B, 1, Int>  [batch]
//   tails     Tails       → Tensor<B, 2>       [batch, num_entities]
//
// The loader already yields whole mini-batches, so `batch` is
// normally handed a single RtBatch; several are joined in order.
//
// Tails and adjacency also stay on the host inside MinerInput,
// miners that walk the graph read them directly.
//
// Reference: Burn Book §4 (Batcher)

use std::sync::Arc;

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::domain::batch::{RtBatch, Tails};
use crate::domain::triple::Triple;

/// Everything a miner needs for one forward pass.
#[derive(Debug, Clone)]
pub struct MinerInput<B: Backend> {
    /// Relation ids — shape: [batch_size]
    pub queries: Tensor<B, 1, Int>,

    /// Head entity ids — shape: [batch_size]
    pub heads: Tensor<B, 1, Int>,

    /// Host-side answers of each query
    pub tails: Tails,

    /// Known facts shared by the whole batch
    pub adjacency: Arc<[Triple]>,
}

impl<B: Backend> MinerInput<B> {
    pub fn batch_size(&self) -> usize {
        self.tails.len()
    }
}

/// Miner input together with its targets.
#[derive(Debug, Clone)]
pub struct MinerBatch<B: Backend> {
    pub input: MinerInput<B>,

    /// Dense targets — shape: [batch_size, num_entities].
    /// 1.0 at every true tail, 0.0 elsewhere.
    pub targets: Tensor<B, 2>,
}

/// Holds the target device so every tensor lands on it, and the
/// entity count that fixes the width of the target matrix.
#[derive(Clone, Debug)]
pub struct MinerBatcher<B: Backend> {
    pub device:       B::Device,
    pub num_entities: usize,
}

impl<B: Backend> MinerBatcher<B> {
    pub fn new(device: B::Device, num_entities: usize) -> Self {
        Self { device, num_entities }
    }

    /// Move the ids of `batch` onto the device
    pub fn input(&self, batch: RtBatch) -> MinerInput<B> {
        MinerInput {
            queries:   self.ids(&batch.queries),
            heads:     self.ids(&batch.heads),
            tails:     batch.tails,
            adjacency: batch.adjacency,
        }
    }

    fn targets(&self, tails: &Tails) -> Tensor<B, 2> {
        let dense = tails.dense_targets(self.num_entities);
        Tensor::<B, 1>::from_floats(dense.as_slice(), &self.device)
            .reshape([tails.len(), self.num_entities])
    }

    fn ids(&self, ids: &[usize]) -> Tensor<B, 1, Int> {
        // Burn Int tensors are created from i32 slices
        let ints: Vec<i32> = ids.iter().map(|&x| x as i32).collect();
        Tensor::<B, 1, Int>::from_ints(ints.as_slice(), &self.device)
    }
}

impl<B: Backend> Batcher<RtBatch, MinerBatch<B>> for MinerBatcher<B> {
    fn batch(&self, items: Vec<RtBatch>) -> MinerBatch<B> {
        let batch   = RtBatch::concat(items);
        let targets = self.targets(&batch.tails);
        MinerBatch {
            input: self.input(batch),
            targets,
        }
    }
}
