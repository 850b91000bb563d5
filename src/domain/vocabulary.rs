// ============================================================
// Layer 3 — Vocabulary
// ============================================================
// Bidirectional word <-> index mapping with frequency counts.
//
// Index layout:
//
//   0  PAD   filler for short sequences
//   1  SOS   start of sentence
//   2  EOS   end of sentence
//   3  UNK   unknown word
//   4… corpus words, in the order they were first seen
//
// The reserved tokens live only in the index -> word direction.
// A corpus word spelled "PAD" is an ordinary word with its own index.
//
// trim() is destructive: it drops rare words and reassigns indices
// contiguously from 4, keeping insertion order. It runs at most once.

use std::collections::HashMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Padding token index
pub const PAD_TOKEN: usize = 0;
/// Start-of-sentence token index
pub const SOS_TOKEN: usize = 1;
/// End-of-sentence token index
pub const EOS_TOKEN: usize = 2;
/// Unknown-word token index
pub const UNK_TOKEN: usize = 3;

/// Names of the reserved tokens, indexed by their token id
pub const RESERVED_TOKENS: [&str; 4] = ["PAD", "SOS", "EOS", "UNK"];

/// Outcome of the first `trim()` call on a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimStats {
    /// Words that met the threshold
    pub kept: usize,
    /// Corpus words before trimming (reserved tokens excluded)
    pub total: usize,
}

impl TrimStats {
    /// Fraction of words kept, 0.0 for an empty vocabulary
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.kept as f64 / self.total as f64
        }
    }
}

/// Word vocabulary built from a corpus scan.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    name:          String,
    trimmed:       bool,
    word_to_index: HashMap<String, usize>,
    /// Index -> word, reserved tokens included
    index_to_word: Vec<String>,
    /// Index -> count, parallel to `index_to_word` (0 for reserved tokens)
    counts:        Vec<usize>,
}

impl Vocabulary {
    /// Create an empty vocabulary holding only the four reserved tokens.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:          name.into(),
            trimmed:       false,
            word_to_index: HashMap::new(),
            index_to_word: RESERVED_TOKENS.iter().map(|t| t.to_string()).collect(),
            counts:        vec![0; RESERVED_TOKENS.len()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_trimmed(&self) -> bool {
        self.trimmed
    }

    /// Number of indices in use, reserved tokens included
    pub fn num_words(&self) -> usize {
        self.index_to_word.len()
    }

    /// Add every `' '`-separated word of a sentence.
    pub fn add_sentence(&mut self, sentence: &str) {
        for word in sentence.split(' ') {
            self.add_word(word);
        }
    }

    /// Insert a word at the next free index, or bump its count.
    pub fn add_word(&mut self, word: &str) {
        match self.word_to_index.get(word) {
            Some(&index) => self.counts[index] += 1,
            None => {
                let index = self.index_to_word.len();
                self.word_to_index.insert(word.to_string(), index);
                self.index_to_word.push(word.to_string());
                self.counts.push(1);
            }
        }
    }

    /// Remove words seen fewer than `min_count` times and reassign indices.
    ///
    /// Kept words keep their relative order and restart with a count of 1.
    /// Returns `None` when the vocabulary was already trimmed.
    pub fn trim(&mut self, min_count: usize) -> Option<TrimStats> {
        if self.trimmed {
            return None;
        }
        self.trimmed = true;

        let total = self.word_to_index.len();
        let keep_words: Vec<String> = self
            .index_to_word
            .iter()
            .zip(&self.counts)
            .skip(RESERVED_TOKENS.len())
            .filter(|(_, count)| **count >= min_count)
            .map(|(word, _)| word.clone())
            .collect();

        let stats = TrimStats { kept: keep_words.len(), total };
        tracing::info!(
            "keep_words {} / {} = {:.4}",
            stats.kept,
            stats.total,
            stats.ratio()
        );

        self.word_to_index.clear();
        self.index_to_word.truncate(RESERVED_TOKENS.len());
        self.counts.truncate(RESERVED_TOKENS.len());

        for word in &keep_words {
            self.add_word(word);
        }

        Some(stats)
    }

    /// Index of a corpus word (reserved token names are not looked up)
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.word_to_index.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.word_to_index.contains_key(word)
    }

    /// Word stored at `index`, reserved tokens included
    pub fn word_at(&self, index: usize) -> Option<&str> {
        self.index_to_word.get(index).map(String::as_str)
    }

    /// Frequency of a corpus word, 0 when absent
    pub fn count(&self, word: &str) -> usize {
        self.index_of(word).map_or(0, |index| self.counts[index])
    }

    /// Map each word to its index (UNK when absent) and append EOS.
    pub fn indexes_from_sentence(&self, sentence: &str) -> Vec<usize> {
        sentence
            .split(' ')
            .map(|word| self.index_of(word).unwrap_or(UNK_TOKEN))
            .chain(std::iter::once(EOS_TOKEN))
            .collect()
    }

    /// Turn indices back into words, skipping PAD and stopping at EOS.
    pub fn decode(&self, indices: &[usize]) -> Vec<&str> {
        indices
            .iter()
            .copied()
            .take_while(|&index| index != EOS_TOKEN)
            .filter(|&index| index != PAD_TOKEN)
            .map(|index| self.word_at(index).unwrap_or(RESERVED_TOKENS[UNK_TOKEN]))
            .collect()
    }

    /// Iterate `(index, word)` over every index, reserved tokens first
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.index_to_word.iter().enumerate().map(|(i, w)| (i, w.as_str()))
    }

    /// Snapshot suitable for serialisation
    pub fn to_record(&self) -> VocabularyRecord {
        VocabularyRecord {
            name:    self.name.clone(),
            trimmed: self.trimmed,
            words:   self.index_to_word.clone(),
            counts:  self.counts.clone(),
        }
    }

    /// Rebuild a vocabulary from a record, checking the reserved layout.
    pub fn from_record(record: VocabularyRecord) -> Result<Self> {
        if record.words.len() != record.counts.len() {
            bail!(
                "vocabulary '{}' has {} words but {} counts",
                record.name,
                record.words.len(),
                record.counts.len()
            );
        }
        if record.words.len() < RESERVED_TOKENS.len()
            || record.words[..RESERVED_TOKENS.len()] != RESERVED_TOKENS
        {
            bail!(
                "vocabulary '{}' does not start with the reserved tokens {:?}",
                record.name,
                RESERVED_TOKENS
            );
        }

        let mut word_to_index = HashMap::with_capacity(record.words.len());
        for (index, word) in record.words.iter().enumerate().skip(RESERVED_TOKENS.len()) {
            if word_to_index.insert(word.clone(), index).is_some() {
                bail!("vocabulary '{}' lists '{}' twice", record.name, word);
            }
        }

        Ok(Self {
            name:          record.name,
            trimmed:       record.trimmed,
            word_to_index,
            index_to_word: record.words,
            counts:        record.counts,
        })
    }
}

/// Serialisable form of a `Vocabulary`: words and counts in index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyRecord {
    pub name:    String,
    pub trimmed: bool,
    pub words:   Vec<String>,
    pub counts:  Vec<usize>,
}
