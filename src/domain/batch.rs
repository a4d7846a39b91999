// ============================================================
// Layer 3 — RtBatch Domain Type
// ============================================================
// One mini-batch handed from the data loader to the framework.
//
//   queries[i]   — relation id of the i-th query
//   heads[i]     — head entity id of the i-th query
//   tails        — the answers, either one per query (eval splits)
//                  or a set per query (training split)
//   adjacency    — the known facts the miner may reason over
//
// A batch is consumed by exactly one training or evaluation step.

use std::sync::Arc;

use crate::domain::triple::Triple;

/// Answers attached to a batch of queries.
#[derive(Debug, Clone, PartialEq)]
pub enum Tails {
    /// Exactly one true tail per query
    Single(Vec<usize>),
    /// Every known true tail per query
    Multi(Vec<Vec<usize>>),
}

impl Tails {
    /// Number of queries these tails belong to
    pub fn len(&self) -> usize {
        match self {
            Tails::Single(t) => t.len(),
            Tails::Multi(t)  => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Answers of the i-th query as a slice
    pub fn row(&self, i: usize) -> &[usize] {
        match self {
            Tails::Single(t) => std::slice::from_ref(&t[i]),
            Tails::Multi(t)  => &t[i],
        }
    }

    /// Every row as an owned answer set
    pub fn to_sets(&self) -> Vec<Vec<usize>> {
        (0..self.len()).map(|i| self.row(i).to_vec()).collect()
    }

    /// Dense multi-hot target rows, flattened row-major into
    /// `len() * num_entities` values. Ids outside `0..num_entities`
    /// are ignored.
    pub fn dense_targets(&self, num_entities: usize) -> Vec<f32> {
        let rows = self.len();
        let mut dense = vec![0.0f32; rows * num_entities];
        for i in 0..rows {
            for &t in self.row(i) {
                if t < num_entities {
                    dense[i * num_entities + t] = 1.0;
                }
            }
        }
        dense
    }
}

/// A batch of `(relation, head) → tails` queries.
#[derive(Debug, Clone)]
pub struct RtBatch {
    pub queries:   Vec<usize>,
    pub heads:     Vec<usize>,
    pub tails:     Tails,
    pub adjacency: Arc<[Triple]>,
}

impl RtBatch {
    /// Number of queries in the batch
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Join batches in order. Tails stay `Single` only when every
    /// part has single tails; adjacency comes from the first part.
    pub fn concat(parts: Vec<RtBatch>) -> RtBatch {
        let adjacency = parts
            .first()
            .map(|b| Arc::clone(&b.adjacency))
            .unwrap_or_else(|| Arc::from(Vec::<Triple>::new()));
        let all_single = parts.iter().all(|b| matches!(b.tails, Tails::Single(_)));

        let mut queries = Vec::new();
        let mut heads   = Vec::new();
        let mut single  = Vec::new();
        let mut multi   = Vec::new();
        for part in parts {
            queries.extend(part.queries);
            heads.extend(part.heads);
            match part.tails {
                Tails::Single(t) if all_single => single.extend(t),
                Tails::Single(t) => multi.extend(t.into_iter().map(|x| vec![x])),
                Tails::Multi(t)  => multi.extend(t),
            }
        }

        let tails = if all_single { Tails::Single(single) } else { Tails::Multi(multi) };
        RtBatch { queries, heads, tails, adjacency }
    }
}
