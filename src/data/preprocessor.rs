// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Normalises raw sentences before they reach the vocabulary.
//
// Steps (applied in order):
//   1. Lowercase and trim
//   2. Unicode NFD decomposition, dropping combining marks
//      ("café" → "cafe")
//   3. Put a space before each of . ! ?
//   4. Replace every run of characters that are not ASCII
//      letters or . ! ? with a single space
//   5. Collapse whitespace and trim again
//
// Example:
//   "  Où est-il?! "  →  "ou est il ? !"
//
// Normalisation is optional: the pipeline runs it only when the
// input files have not been cleaned already.
//
// Reference: Rust Book §8 (Strings in Rust)
//            regex and unicode-normalization crate docs

use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::domain::sentence_pair::SentencePair;

pub struct Preprocessor {
    /// Sentence punctuation that becomes its own word
    punctuation: Regex,
    /// Anything that is not a letter or sentence punctuation
    non_letters: Regex,
    whitespace:  Regex,
}

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self {
            punctuation: Regex::new(r"([.!?])").expect("literal regex"),
            non_letters: Regex::new(r"[^a-zA-Z.!?]+").expect("literal regex"),
            whitespace:  Regex::new(r"\s+").expect("literal regex"),
        }
    }

    /// Normalise one sentence.
    pub fn normalize(&self, text: &str) -> String {
        let ascii: String = text
            .trim()
            .to_lowercase()
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect();

        let spaced  = self.punctuation.replace_all(&ascii, " $1");
        let letters = self.non_letters.replace_all(&spaced, " ");
        self.whitespace.replace_all(&letters, " ").trim().to_string()
    }

    /// Normalise both sides of a pair, keeping its graph.
    pub fn normalize_pair(&self, pair: &SentencePair) -> SentencePair {
        SentencePair::new(
            self.normalize(&pair.input),
            self.normalize(&pair.output),
            pair.graph.clone(),
        )
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
