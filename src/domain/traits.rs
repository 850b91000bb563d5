// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two seams of the pipeline:
//
//   PairSource    — where sentence pairs and corpus sentences
//                   come from (TsvPairLoader reads TSV files)
//
//   GraphEncoder  — the external graph-embedding model. The
//                   pipeline only relies on its contract:
//                   given node ids, return `embedding_dim()`
//                   floats. NodeTableEncoder and NullGraphEncoder
//                   implement it in the ml layer.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::sentence_pair::{NodeId, SentencePair};

// ─── PairSource ───────────────────────────────────────────────────────────────
/// Any component that can supply training pairs and a counting corpus.
pub trait PairSource {
    /// Load every sentence pair with its graph node ids.
    fn load_pairs(&self) -> Result<Vec<SentencePair>>;

    /// Load the sentences used to count vocabulary words.
    /// Each row holds one or more sentences.
    fn load_sentences(&self) -> Result<Vec<Vec<String>>>;
}

// ─── GraphEncoder ─────────────────────────────────────────────────────────────
/// Turns a sequence of graph nodes into one fixed-size vector.
///
/// Shared read-only with batchers across data loader workers,
/// hence `Send + Sync`.
pub trait GraphEncoder: Send + Sync {
    /// Length of every vector returned by `encode`
    fn embedding_dim(&self) -> usize;

    /// Embed a node sequence. Must return exactly `embedding_dim()` values;
    /// an empty sequence yields the zero vector.
    fn encode(&self, nodes: &[NodeId]) -> Result<Vec<f32>>;
}
