// ============================================================
// Layer 4 — Triple Data Loader
// ============================================================
// Loads a knowledge graph dataset directory:
//
//   <data_dir>/
//     train.txt   ← required
//     valid.txt   ← optional (empty split when missing)
//     test.txt    ← optional (empty split when missing)
//
// Every non-empty line is `head<TAB>relation<TAB>tail`.
// Lines starting with '#' are comments.
//
// Training queries are grouped by (relation, head) so that a
// single query carries every known tail as a multi-label
// target. Validation and test keep one query per fact, which
// is what Hit@k is measured on.
//
// All training facts travel with every batch as the adjacency
// the miner may reason over.
//
// Reference: Rust Book §8 (Collections), §13 (Iterators)
//            rand crate documentation

use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::{cell::RefCell, collections::HashMap, fs, path::Path, sync::Arc};

use crate::data::vocab::Vocab;
use crate::domain::batch::{RtBatch, Tails};
use crate::domain::traits::RtDataLoader;
use crate::domain::triple::{Split, Triple};

/// A training query with all of its answers
#[derive(Debug, Clone, PartialEq)]
struct MultiQuery {
    relation: usize,
    head:     usize,
    tails:    Vec<usize>,
}

/// A fact spelled out with names, as read from a file
pub type NamedTriple = (String, String, String);

pub struct TripleDataLoader {
    entities:  Vocab,
    relations: Vocab,
    facts:     Arc<[Triple]>,
    train:     Vec<MultiQuery>,
    valid:     Vec<Triple>,
    test:      Vec<Triple>,
    rng:       RefCell<StdRng>,
}

impl TripleDataLoader {
    /// Read `train.txt`, `valid.txt` and `test.txt` from `dir`.
    /// `seed` drives the training-split shuffle.
    pub fn from_dir(dir: impl AsRef<Path>, seed: u64) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            bail!("Dataset directory '{}' does not exist", dir.display());
        }

        let train = read_split(dir, Split::Train, true)?;
        let valid = read_split(dir, Split::Valid, false)?;
        let test  = read_split(dir, Split::Test,  false)?;

        let loader = Self::from_named(train, valid, test, seed);
        tracing::info!(
            "Loaded dataset '{}': {} entities, {} relations, {} facts, \
             {} train / {} valid / {} test queries",
            dir.display(),
            loader.entities.len(),
            loader.relations.len(),
            loader.facts.len(),
            loader.train.len(),
            loader.valid.len(),
            loader.test.len(),
        );
        Ok(loader)
    }

    /// Build a loader from already parsed splits.
    /// Ids are assigned in first-seen order: train, then valid, then test.
    pub fn from_named(
        train: Vec<NamedTriple>,
        valid: Vec<NamedTriple>,
        test:  Vec<NamedTriple>,
        seed:  u64,
    ) -> Self {
        let mut entities  = Vocab::new();
        let mut relations = Vocab::new();

        let mut intern = |facts: &[NamedTriple]| -> Vec<Triple> {
            facts
                .iter()
                .map(|(h, r, t)| Triple::new(
                    entities.get_or_insert(h),
                    relations.get_or_insert(r),
                    entities.get_or_insert(t),
                ))
                .collect()
        };

        let train_facts = intern(&train);
        let valid       = intern(&valid);
        let test        = intern(&test);

        Self {
            train: group_queries(&train_facts),
            facts: train_facts.into(),
            entities,
            relations,
            valid,
            test,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn num_relations(&self) -> usize {
        self.relations.len()
    }

    /// Training facts, shared with every batch as adjacency
    pub fn facts(&self) -> &[Triple] {
        &self.facts
    }

    fn make_batch(&self, split: Split, indices: &[usize]) -> RtBatch {
        let mut queries = Vec::with_capacity(indices.len());
        let mut heads   = Vec::with_capacity(indices.len());

        let tails = match split {
            Split::Train => {
                let mut sets = Vec::with_capacity(indices.len());
                for &i in indices {
                    let q = &self.train[i];
                    queries.push(q.relation);
                    heads.push(q.head);
                    sets.push(q.tails.clone());
                }
                Tails::Multi(sets)
            }
            Split::Valid | Split::Test => {
                let facts = if split == Split::Valid { &self.valid } else { &self.test };
                let mut single = Vec::with_capacity(indices.len());
                for &i in indices {
                    let f = facts[i];
                    queries.push(f.relation);
                    heads.push(f.head);
                    single.push(f.tail);
                }
                Tails::Single(single)
            }
        };

        RtBatch {
            queries,
            heads,
            tails,
            adjacency: Arc::clone(&self.facts),
        }
    }
}

impl RtDataLoader for TripleDataLoader {
    fn split_len(&self, split: Split) -> usize {
        match split {
            Split::Train => self.train.len(),
            Split::Valid => self.valid.len(),
            Split::Test  => self.test.len(),
        }
    }

    fn num_entities(&self) -> usize {
        self.entities.len()
    }

    fn id2rel(&self, id: usize) -> &str {
        self.relations.name(id)
    }

    fn id2ent(&self, id: usize) -> &str {
        self.entities.name(id)
    }

    fn one_epoch(
        &self,
        split:       Split,
        batch_size:  usize,
        max_batches: Option<usize>,
        shuffle:     bool,
    ) -> Box<dyn Iterator<Item = RtBatch> + '_> {
        let batch_size = batch_size.max(1);

        let mut order: Vec<usize> = (0..self.split_len(split)).collect();
        if shuffle {
            order.shuffle(&mut *self.rng.borrow_mut());
        }

        let chunks: Vec<Vec<usize>> = order
            .chunks(batch_size)
            .take(max_batches.unwrap_or(usize::MAX))
            .map(<[usize]>::to_vec)
            .collect();

        Box::new(chunks.into_iter().map(move |idx| self.make_batch(split, &idx)))
    }
}

/// Group facts by (relation, head), keeping first-seen order
/// for both queries and tails and dropping duplicate tails.
fn group_queries(facts: &[Triple]) -> Vec<MultiQuery> {
    let mut slots: HashMap<(usize, usize), usize> = HashMap::new();
    let mut queries: Vec<MultiQuery> = Vec::new();

    for f in facts {
        let slot = *slots.entry((f.relation, f.head)).or_insert_with(|| {
            queries.push(MultiQuery { relation: f.relation, head: f.head, tails: Vec::new() });
            queries.len() - 1
        });
        let tails = &mut queries[slot].tails;
        if !tails.contains(&f.tail) {
            tails.push(f.tail);
        }
    }
    queries
}

fn read_split(dir: &Path, split: Split, required: bool) -> Result<Vec<NamedTriple>> {
    let path = dir.join(split.file_name());
    if !path.exists() {
        if required {
            bail!("Missing required split file '{}'", path.display());
        }
        tracing::warn!("Split file '{}' not found — using an empty {} split", path.display(), split);
        return Ok(Vec::new());
    }

    let text = fs::read_to_string(&path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    parse_triples(&text)
        .with_context(|| format!("Malformed triple file '{}'", path.display()))
}

/// Parse `head<TAB>relation<TAB>tail` lines.
pub fn parse_triples(text: &str) -> Result<Vec<NamedTriple>> {
    let mut out = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        match fields.as_slice() {
            [h, r, t] if !h.is_empty() && !r.is_empty() && !t.is_empty() => {
                out.push((h.to_string(), r.to_string(), t.to_string()));
            }
            _ => bail!(
                "line {}: expected 3 tab-separated fields, found {}",
                lineno + 1,
                fields.len()
            ),
        }
    }
    Ok(out)
}
