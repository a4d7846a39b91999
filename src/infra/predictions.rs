// ============================================================
// Layer 6 — Prediction Writer
// ============================================================
// Human-readable evaluation output, one line per example:
//
//   query,head,true_tail,candidate_1,candidate_2,...
//
// Candidates are entity names in descending score order.

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

pub struct PredictionWriter {
    path: PathBuf,
    out:  BufWriter<File>,
}

impl PredictionWriter {
    /// Create (or truncate) the prediction file
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .with_context(|| format!("Cannot create prediction file '{}'", path.display()))?;
        Ok(Self { path, out: BufWriter::new(file) })
    }

    pub fn write_row(
        &mut self,
        query:      &str,
        head:       &str,
        tail:       &str,
        candidates: &[String],
    ) -> Result<()> {
        let mut fields: Vec<&str> = Vec::with_capacity(3 + candidates.len());
        fields.extend([query, head, tail]);
        fields.extend(candidates.iter().map(String::as_str));
        writeln!(self.out, "{}", fields.join(","))
            .with_context(|| format!("Cannot write to '{}'", self.path.display()))
    }

    /// Flush buffered rows to disk
    pub fn finish(mut self) -> Result<()> {
        self.out
            .flush()
            .with_context(|| format!("Cannot flush '{}'", self.path.display()))
    }
}
