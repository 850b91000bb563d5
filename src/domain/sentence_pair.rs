// ============================================================
// Layer 3 — SentencePair Domain Type
// ============================================================
// One training example: an input sentence, the response it
// should produce, and the graph nodes attached to the pair.
//
// Example (one row of the pair file):
//   "where is the station"  →  "two blocks north"  +  [12, 40, 7]
//
// Sentences are kept as raw strings; words are the pieces
// between single spaces, matching how the vocabulary counts them.

use serde::{Deserialize, Serialize};

/// Identifier of a node in the external graph
pub type NodeId = u32;

/// An input/output sentence pair with its graph node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentencePair {
    /// The sentence fed to the encoder
    pub input: String,

    /// The sentence the decoder should produce
    pub output: String,

    /// Graph nodes looked up by the graph encoder; may be empty
    pub graph: Vec<NodeId>,
}

impl SentencePair {
    pub fn new(
        input:  impl Into<String>,
        output: impl Into<String>,
        graph:  Vec<NodeId>,
    ) -> Self {
        Self {
            input:  input.into(),
            output: output.into(),
            graph,
        }
    }

    /// Word count of the input sentence
    pub fn input_len(&self) -> usize {
        word_count(&self.input)
    }

    /// Word count of the output sentence
    pub fn output_len(&self) -> usize {
        word_count(&self.output)
    }
}

/// Number of `' '`-separated pieces, so "" counts as one word
pub fn word_count(sentence: &str) -> usize {
    sentence.split(' ').count()
}
