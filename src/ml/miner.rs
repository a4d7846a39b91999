// ============================================================
// Layer 5 — Miner Trait and Baseline Miner
// ============================================================
// A miner maps a batch of (relation, head) queries to one score
// per entity: logits of shape [batch, num_entities].
//
// The framework needs the same miner on two backends:
//   - B             (autodiff)  for training steps
//   - B::InnerBackend           for evaluation, via
//                               AutodiffModule::valid()
// so any miner plugged into it implements `Miner<B>` for both.
//
// BilinearMiner is the bundled baseline. It scores a candidate
// tail t for query (q, h) as
//
//   score(h, q, t) = Σ_d  E[h]_d · R[q]_d · E[t]_d
//
// which for the whole batch is one matmul:
//   (E[heads] ⊙ R[queries]) · Eᵀ   → [batch, num_entities]

use burn::{
    nn::{Embedding, EmbeddingConfig},
    prelude::*,
};

use crate::data::batcher::MinerInput;

/// Scores every entity as a candidate answer of each query.
pub trait Miner<B: Backend> {
    fn forward(&self, input: &MinerInput<B>) -> Tensor<B, 2>;
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
#[derive(Config, Debug)]
pub struct MinerConfig {
    pub num_entities:  usize,
    pub num_relations: usize,
    #[config(default = 64)]
    pub embed_dim:     usize,
}

impl MinerConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> BilinearMiner<B> {
        BilinearMiner {
            entity:   EmbeddingConfig::new(self.num_entities, self.embed_dim).init(device),
            relation: EmbeddingConfig::new(self.num_relations, self.embed_dim).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct BilinearMiner<B: Backend> {
    pub entity:   Embedding<B>,
    pub relation: Embedding<B>,
}

impl<B: Backend> BilinearMiner<B> {
    pub fn num_entities(&self) -> usize {
        self.entity.weight.dims()[0]
    }
}

impl<B: Backend> Miner<B> for BilinearMiner<B> {
    /// queries, heads: [batch] → logits: [batch, num_entities].
    /// The adjacency is not used by this scorer.
    fn forward(&self, input: &MinerInput<B>) -> Tensor<B, 2> {
        let entities  = self.entity.weight.val();                       // [E, d]
        let relations = self.relation.weight.val();                     // [R, d]

        let h = entities.clone().select(0, input.heads.clone());        // [batch, d]
        let r = relations.select(0, input.queries.clone());             // [batch, d]

        (h * r).matmul(entities.transpose())                            // [batch, E]
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use burn::backend::{Autodiff, NdArray};
    use burn::module::AutodiffModule;

    use crate::data::batcher::MinerBatcher;
    use crate::domain::batch::{RtBatch, Tails};

    type TestBackend = Autodiff<NdArray>;

    fn batch() -> RtBatch {
        RtBatch {
            queries:   vec![0, 1, 1],
            heads:     vec![2, 0, 4],
            tails:     Tails::Single(vec![1, 1, 3]),
            adjacency: Arc::from(Vec::new()),
        }
    }

    #[test]
    fn test_logits_shape() {
        let device = Default::default();
        let miner: BilinearMiner<TestBackend> = MinerConfig::new(5, 2)
            .with_embed_dim(8)
            .init(&device);
        assert_eq!(miner.num_entities(), 5);

        let input  = MinerBatcher::<TestBackend>::new(device.clone(), 5).input(batch());
        let logits = miner.forward(&input);
        assert_eq!(logits.dims(), [3, 5]);
    }

    #[test]
    fn test_valid_miner_matches_training_miner() {
        let device = Default::default();
        let miner: BilinearMiner<TestBackend> = MinerConfig::new(5, 2).init(&device);

        let train_logits: Vec<f32> = miner
            .forward(&MinerBatcher::<TestBackend>::new(device.clone(), 5).input(batch()))
            .into_data()
            .to_vec::<f32>()
            .unwrap();

        let valid = miner.valid();
        let valid_logits: Vec<f32> = valid
            .forward(&MinerBatcher::<NdArray>::new(device, 5).input(batch()))
            .into_data()
            .to_vec::<f32>()
            .unwrap();

        assert_eq!(train_logits, valid_logits);
    }
}
