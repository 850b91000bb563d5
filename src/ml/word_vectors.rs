// ============================================================
// Layer 5 — Pretrained Word Vectors
// ============================================================
// Builds an initial embedding matrix for the vocabulary from
// GloVe-style text vectors:
//
//   the 0.418 0.24968 -0.41242 ...
//   cat 0.45281 -0.50108 ...
//
// Row i of the matrix belongs to vocabulary index i, reserved
// tokens included. Words missing from the pretrained file get a
// zero row.

use anyhow::{bail, Context, Result};
use burn::{prelude::*, tensor::TensorData};
use std::{collections::HashMap, fs, path::Path};

use crate::domain::vocabulary::Vocabulary;

/// Word -> vector table read from a GloVe text file.
#[derive(Debug, Clone)]
pub struct PretrainedVectors {
    dim:     usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl PretrainedVectors {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read word vectors '{}'", path.display()))?;
        let vectors = Self::parse(&text)
            .with_context(|| format!("Malformed word vectors '{}'", path.display()))?;

        tracing::info!(
            "Loaded {} word vectors (dim={}) from '{}'",
            vectors.len(),
            vectors.dim,
            path.display()
        );
        Ok(vectors)
    }

    /// Parse `word v1 … vdim` lines; the first line fixes `dim`.
    /// A repeated word keeps its first vector.
    pub fn parse(text: &str) -> Result<Self> {
        let mut dim     = None;
        let mut vectors = HashMap::new();

        for (i, line) in text.lines().enumerate() {
            let mut fields = line.split(' ');
            let Some(word) = fields.next().filter(|w| !w.is_empty()) else {
                continue;
            };
            let row = fields
                .map(str::parse::<f32>)
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("line {}: bad value", i + 1))?;

            let expected = *dim.get_or_insert(row.len());
            if row.len() != expected || expected == 0 {
                bail!("line {}: '{}' has {} values, expected {}", i + 1, word, row.len(), expected);
            }
            vectors.entry(word.to_string()).or_insert(row);
        }

        match dim {
            Some(dim) => Ok(Self { dim, vectors }),
            None => bail!("no word vectors found"),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.vectors.get(word).map(Vec::as_slice)
    }
}

/// Embedding rows in vocabulary index order and how many were found.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    pub rows:  Vec<Vec<f32>>,
    pub found: usize,
}

impl EmbeddingMatrix {
    /// Fraction of vocabulary indices with a pretrained vector
    pub fn coverage(&self) -> f64 {
        if self.rows.is_empty() {
            0.0
        } else {
            self.found as f64 / self.rows.len() as f64
        }
    }

    /// `[num_words, dim]` float tensor
    pub fn to_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 2> {
        let dim  = self.rows.first().map_or(0, Vec::len);
        let flat: Vec<f32> = self.rows.iter().flatten().copied().collect();
        Tensor::from_data(TensorData::new(flat, [self.rows.len(), dim]), device)
    }
}

/// One row per vocabulary index: the pretrained vector, or zeros.
pub fn embedding_matrix(vocab: &Vocabulary, vectors: &PretrainedVectors) -> EmbeddingMatrix {
    let mut found = 0;
    let rows = vocab
        .iter()
        .map(|(_, word)| match vectors.get(word) {
            Some(v) => {
                found += 1;
                v.to_vec()
            }
            None => vec![0.0; vectors.dim()],
        })
        .collect();

    EmbeddingMatrix { rows, found }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    const GLOVE: &str = "the 0.1 0.2\ncat 1 2\nUNK 9 9\nthe 5 5\n";

    #[test]
    fn test_parse() {
        let v = PretrainedVectors::parse(GLOVE).unwrap();
        assert_eq!(v.dim(), 2);
        assert_eq!(v.len(), 3);
        assert_eq!(v.get("the"), Some(&[0.1, 0.2][..]));
        assert!(v.get("dog").is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(PretrainedVectors::parse("").is_err());
        assert!(PretrainedVectors::parse("a 1 2\nb 1\n").is_err());
        assert!(PretrainedVectors::parse("a 1 x\n").is_err());
        assert!(PretrainedVectors::parse("a\n").is_err());
    }

    #[test]
    fn test_matrix_follows_vocabulary_order() {
        let v = PretrainedVectors::parse(GLOVE).unwrap();
        let mut vocab = Vocabulary::new("t");
        vocab.add_sentence("cat dog the");

        let m = embedding_matrix(&vocab, &v);
        assert_eq!(m.rows.len(), 7);
        assert_eq!(m.rows[0], vec![0.0, 0.0]); // PAD
        assert_eq!(m.rows[3], vec![9.0, 9.0]); // UNK has a vector
        assert_eq!(m.rows[4], vec![1.0, 2.0]); // cat
        assert_eq!(m.rows[5], vec![0.0, 0.0]); // dog
        assert_eq!(m.rows[6], vec![0.1, 0.2]); // the
        assert_eq!(m.found, 3);
        assert!((m.coverage() - 3.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_tensor_shape() {
        let v = PretrainedVectors::parse(GLOVE).unwrap();
        let m = embedding_matrix(&Vocabulary::new("t"), &v);
        let t = m.to_tensor::<NdArray>(&Default::default());
        assert_eq!(t.dims(), [4, 2]);
    }
}
