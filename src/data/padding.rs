// ============================================================
// Layer 4 — Padding and Batch Assembly
// ============================================================
// Turns a group of sentence pairs into the plain matrices the
// batcher later copies into tensors.
//
// All matrices are TIME-MAJOR: row t holds token t of every
// sentence in the batch.
//
//   sentences (after sorting)       indexes + EOS        zero_padding
//   "the cat sat"          ──►  [4 5 6 2]      ──►   [[4 7]
//   "a dog"                     [7 8 2]               [5 8]
//                                                      [6 2]
//                                                      [2 0]]   0 = PAD
//
//   binary_matrix marks every non-PAD entry with true.
//
// Pairs are sorted by input word count, longest first, before
// anything else happens. The sort is stable so equal lengths keep
// their sampling order.
//
// Each example also gets one graph embedding from the
// GraphEncoder. An empty graph gets the zero vector.

use anyhow::{bail, ensure, Result};

use crate::domain::sentence_pair::{NodeId, SentencePair};
use crate::domain::traits::GraphEncoder;
use crate::domain::vocabulary::{Vocabulary, PAD_TOKEN};

/// Padded encoder input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputVar {
    /// `[max_input_len][batch]`
    pub padded: Vec<Vec<usize>>,
    /// Unpadded length of each input, EOS included — `[batch]`
    pub lengths: Vec<usize>,
    /// `[batch][embedding_dim]`
    pub graph_embeddings: Vec<Vec<f32>>,
}

/// Padded decoder target with its mask.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputVar {
    /// `[max_target_len][batch]`
    pub padded: Vec<Vec<usize>>,
    /// `[max_target_len][batch]`, true on real tokens
    pub mask: Vec<Vec<bool>>,
    pub max_target_len: usize,
    /// `[batch][embedding_dim]`
    pub graph_embeddings: Vec<Vec<f32>>,
}

/// Everything one training step needs, before tensor conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainBatch {
    /// The pairs in batch order (sorted by input length, descending)
    pub pairs:  Vec<SentencePair>,
    pub input:  InputVar,
    pub output: OutputVar,
}

impl TrainBatch {
    pub fn batch_size(&self) -> usize {
        self.pairs.len()
    }

    pub fn max_input_len(&self) -> usize {
        self.input.padded.len()
    }

    /// Number of real (non-PAD) target tokens
    pub fn target_tokens(&self) -> usize {
        self.output.mask.iter().flatten().filter(|&&m| m).count()
    }
}

/// Transpose variable-length sequences into a `[max_len][batch]` matrix,
/// filling the gaps with `fill`.
pub fn zero_padding(seqs: &[Vec<usize>], fill: usize) -> Vec<Vec<usize>> {
    let max_len = seqs.iter().map(Vec::len).max().unwrap_or(0);
    (0..max_len)
        .map(|t| {
            seqs.iter()
                .map(|seq| seq.get(t).copied().unwrap_or(fill))
                .collect()
        })
        .collect()
}

/// Same shape as `padded`, true wherever the entry is not `pad`.
pub fn binary_matrix(padded: &[Vec<usize>], pad: usize) -> Vec<Vec<bool>> {
    padded
        .iter()
        .map(|row| row.iter().map(|&token| token != pad).collect())
        .collect()
}

/// One embedding per graph; empty graphs give the zero vector.
pub fn graph_embeddings(
    encoder: &dyn GraphEncoder,
    graphs:  &[&[NodeId]],
) -> Result<Vec<Vec<f32>>> {
    let dim = encoder.embedding_dim();
    graphs
        .iter()
        .map(|graph| {
            if graph.is_empty() {
                return Ok(vec![0.0; dim]);
            }
            let emb = encoder.encode(graph)?;
            ensure!(
                emb.len() == dim,
                "graph encoder returned {} values, expected {}",
                emb.len(),
                dim
            );
            Ok(emb)
        })
        .collect()
}

/// Padded input indices, their lengths, and the graph embeddings.
pub fn input_var(
    vocab:     &Vocabulary,
    sentences: &[&str],
    graphs:    &[&[NodeId]],
    encoder:   &dyn GraphEncoder,
) -> Result<InputVar> {
    ensure!(
        sentences.len() == graphs.len(),
        "{} sentences but {} graphs",
        sentences.len(),
        graphs.len()
    );

    let indexes: Vec<Vec<usize>> = sentences
        .iter()
        .map(|s| vocab.indexes_from_sentence(s))
        .collect();
    let lengths = indexes.iter().map(Vec::len).collect();

    Ok(InputVar {
        padded: zero_padding(&indexes, PAD_TOKEN),
        lengths,
        graph_embeddings: graph_embeddings(encoder, graphs)?,
    })
}

/// Padded target indices, padding mask, longest target, graph embeddings.
pub fn output_var(
    vocab:     &Vocabulary,
    sentences: &[&str],
    graphs:    &[&[NodeId]],
    encoder:   &dyn GraphEncoder,
) -> Result<OutputVar> {
    ensure!(
        sentences.len() == graphs.len(),
        "{} sentences but {} graphs",
        sentences.len(),
        graphs.len()
    );

    let indexes: Vec<Vec<usize>> = sentences
        .iter()
        .map(|s| vocab.indexes_from_sentence(s))
        .collect();
    let max_target_len = indexes.iter().map(Vec::len).max().unwrap_or(0);
    let padded = zero_padding(&indexes, PAD_TOKEN);
    let mask   = binary_matrix(&padded, PAD_TOKEN);

    Ok(OutputVar {
        padded,
        mask,
        max_target_len,
        graph_embeddings: graph_embeddings(encoder, graphs)?,
    })
}

/// Sort a group of pairs by input length (descending) and build
/// both padded sides of the batch.
pub fn batch_to_train_data(
    vocab:     &Vocabulary,
    mut pairs: Vec<SentencePair>,
    encoder:   &dyn GraphEncoder,
) -> Result<TrainBatch> {
    if pairs.is_empty() {
        bail!("cannot build a batch from zero pairs");
    }

    pairs.sort_by_key(|pair| std::cmp::Reverse(pair.input_len()));

    let inputs:  Vec<&str>      = pairs.iter().map(|p| p.input.as_str()).collect();
    let outputs: Vec<&str>      = pairs.iter().map(|p| p.output.as_str()).collect();
    let graphs:  Vec<&[NodeId]> = pairs.iter().map(|p| p.graph.as_slice()).collect();

    let input  = input_var(vocab, &inputs, &graphs, encoder)?;
    let output = output_var(vocab, &outputs, &graphs, encoder)?;

    Ok(TrainBatch { pairs, input, output })
}
