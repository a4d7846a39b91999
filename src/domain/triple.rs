// ============================================================
// Layer 3 — Triple and Split Domain Types
// ============================================================
// A knowledge graph is a set of facts `(head, relation, tail)`.
// Entities and relations are referred to by dense integer ids;
// the data loader owns the id → name tables.
//
// A query asks: "given relation q and head entity h, which
// entities t make (h, q, t) true?" The miner answers with one
// score per entity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One fact of the knowledge graph, stored as vocabulary ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub head:     usize,
    pub relation: usize,
    pub tail:     usize,
}

impl Triple {
    pub fn new(head: usize, relation: usize, tail: usize) -> Self {
        Self { head, relation, tail }
    }
}

/// Named partition of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Valid,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Valid => "valid",
            Split::Test  => "test",
        }
    }

    /// File name of this split inside a dataset directory
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.as_str())
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "train"                 => Ok(Split::Train),
            "valid" | "validation"  => Ok(Split::Valid),
            "test"                  => Ok(Split::Test),
            other => Err(format!("unknown split '{other}', expected train | valid | test")),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_parsing() {
        assert_eq!("train".parse::<Split>(), Ok(Split::Train));
        assert_eq!("VALID".parse::<Split>(), Ok(Split::Valid));
        assert_eq!("validation".parse::<Split>(), Ok(Split::Valid));
        assert_eq!("test".parse::<Split>(), Ok(Split::Test));
        assert!("dev".parse::<Split>().is_err());
    }

    #[test]
    fn test_split_file_name() {
        assert_eq!(Split::Valid.file_name(), "valid.txt");
        assert_eq!(Split::Test.to_string(), "test");
    }
}
