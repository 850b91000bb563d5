// ============================================================
// Layer 4 — Corpus Preparation
// ============================================================
// Reads pairs and counting sentences from a PairSource and
// returns a populated vocabulary with length-filtered pairs.
//
//   PairSource ──► (Preprocessor) ──► filter_pairs(max_length)
//        │
//        └──► sentence rows ──► Vocabulary::add_sentence
//
// The vocabulary is counted from the sentence file, not from the
// pairs, so word frequencies reflect the full corpus.
//
// Two counting modes:
//   FirstColumnTwice — only the first column of each row, added
//                      twice (every count is doubled)
//   AllColumns       — every kept column, added once

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::filter::filter_pairs;
use crate::data::preprocessor::Preprocessor;
use crate::domain::sentence_pair::SentencePair;
use crate::domain::traits::PairSource;
use crate::domain::vocabulary::Vocabulary;

/// Which sentence-file columns feed the word counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    #[default]
    FirstColumnTwice,
    AllColumns,
}

/// Load, optionally normalise, and length-filter pairs; count the corpus.
pub fn load_prepare_data(
    source:       &dyn PairSource,
    corpus_name:  &str,
    max_length:   usize,
    preprocessor: Option<&Preprocessor>,
    count_mode:   CountMode,
) -> Result<(Vocabulary, Vec<SentencePair>)> {
    tracing::info!("Start preparing training data ...");

    let mut pairs     = source.load_pairs()?;
    let mut sentences = source.load_sentences()?;

    if let Some(p) = preprocessor {
        pairs = pairs.iter().map(|pair| p.normalize_pair(pair)).collect();
        sentences = sentences
            .iter()
            .map(|row| row.iter().map(|s| p.normalize(s)).collect())
            .collect();
    }

    tracing::info!("Read {} sentence pairs", pairs.len());
    let pairs = filter_pairs(pairs, max_length);
    tracing::info!("Trimmed to {} sentence pairs", pairs.len());

    tracing::info!("Counting words...");
    let vocab = build_vocabulary(corpus_name, &sentences, count_mode);
    tracing::info!("Counted words: {}", vocab.num_words());

    Ok((vocab, pairs))
}

/// Count the sentence rows into a fresh vocabulary.
pub fn build_vocabulary(corpus_name: &str, sentences: &[Vec<String>], mode: CountMode) -> Vocabulary {
    let mut vocab = Vocabulary::new(corpus_name);
    for row in sentences {
        match mode {
            CountMode::FirstColumnTwice => {
                if let Some(first) = row.first() {
                    vocab.add_sentence(first);
                    vocab.add_sentence(first);
                }
            }
            CountMode::AllColumns => {
                for sentence in row {
                    vocab.add_sentence(sentence);
                }
            }
        }
    }
    vocab
}
