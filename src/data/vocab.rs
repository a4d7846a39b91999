// ============================================================
// Layer 4 — Vocabulary
// ============================================================
// Assigns dense ids to names in first-seen order.
// The same table answers both directions:
//   name → id  (while reading triple files)
//   id → name  (while writing prediction files)

use std::collections::HashMap;

/// Placeholder returned for ids outside the table
pub const UNKNOWN: &str = "<unk>";

#[derive(Debug, Clone, Default)]
pub struct Vocab {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of `name`, assigning the next free id if unseen
    pub fn get_or_insert(&mut self, name: &str) -> usize {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn name(&self, id: usize) -> &str {
        self.names.get(id).map(String::as_str).unwrap_or(UNKNOWN)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_stable() {
        let mut v = Vocab::new();
        assert_eq!(v.get_or_insert("paris"),  0);
        assert_eq!(v.get_or_insert("france"), 1);
        assert_eq!(v.get_or_insert("paris"),  0);
        assert_eq!(v.len(), 2);
        assert_eq!(v.get("france"), Some(1));
        assert_eq!(v.name(1), "france");
    }

    #[test]
    fn test_unknown_id() {
        let v = Vocab::new();
        assert!(v.is_empty());
        assert_eq!(v.name(3), UNKNOWN);
    }
}
