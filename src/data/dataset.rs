use anyhow::{Context, Result};
use burn::data::dataset::Dataset;

use crate::data::padding::graph_embeddings;
use crate::domain::sentence_pair::SentencePair;
use crate::domain::traits::GraphEncoder;

/// Length-filtered, trimmed pairs served to burn's DataLoader.
///
/// Every graph is checked against the encoder on construction, so
/// batches built from this dataset never fail on an unknown node.
pub struct PairDataset {
    pairs: Vec<SentencePair>,
}

impl PairDataset {
    pub fn new(pairs: Vec<SentencePair>, encoder: &dyn GraphEncoder) -> Result<Self> {
        for (i, pair) in pairs.iter().enumerate() {
            graph_embeddings(encoder, &[pair.graph.as_slice()])
                .with_context(|| format!("pair {i} ('{}') has an unusable graph", pair.input))?;
        }
        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[SentencePair] {
        &self.pairs
    }
}

impl Dataset<SentencePair> for PairDataset {
    fn get(&self, index: usize) -> Option<SentencePair> {
        self.pairs.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.pairs.len()
    }
}
