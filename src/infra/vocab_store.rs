// ============================================================
// Layer 6 — Vocabulary Store
// ============================================================
// Saves and loads the trimmed vocabulary so a later run (for
// example `inspect`) maps words to the same indices.
//
// File layout:
//   <dir>/vocab.json
//     {
//       "name": "chat",
//       "trimmed": true,
//       "words":  ["PAD", "SOS", "EOS", "UNK", "hello", ...],
//       "counts": [0, 0, 0, 0, 1, ...]
//     }
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::vocabulary::{Vocabulary, VocabularyRecord};

pub struct VocabStore {
    dir: PathBuf,
}

impl VocabStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path of the vocabulary file
    pub fn path(&self) -> PathBuf {
        self.dir.join("vocab.json")
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Write the vocabulary as pretty JSON, creating the directory.
    pub fn save(&self, vocab: &Vocabulary) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.path();
        let json = serde_json::to_string_pretty(&vocab.to_record())?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write vocabulary to '{}'", path.display()))?;

        tracing::info!(
            "Vocabulary '{}' ({} words) saved to '{}'",
            vocab.name(),
            vocab.num_words(),
            path.display()
        );
        Ok(path)
    }

    /// Read a vocabulary saved by `save`.
    pub fn load(&self) -> Result<Vocabulary> {
        load_from(&self.path())
    }
}

fn load_from(path: &Path) -> Result<Vocabulary> {
    let json = fs::read_to_string(path).with_context(|| {
        format!(
            "Cannot read vocabulary from '{}'. Have you run 'prepare' first?",
            path.display()
        )
    })?;
    let record: VocabularyRecord = serde_json::from_str(&json)
        .with_context(|| format!("Malformed vocabulary file '{}'", path.display()))?;
    Vocabulary::from_record(record)
}
