// ============================================================
// Layer 4 — Pair Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<SentencePair>
// into tensors for the seq2seq model.
//
// How batching works here:
//   1. batch_to_train_data sorts the pairs (longest input first),
//      maps words to indices, pads and masks — see padding.rs
//   2. Each padded matrix is flattened row by row and reshaped:
//      [t0_b0, t0_b1, ..., t1_b0, ...] → [max_len, batch]
//   3. Graph embeddings become a [batch, embedding_dim] float tensor
//
// Output shapes:
//   input         Int   [max_input_len, batch]
//   lengths       Int   [batch]
//   target        Int   [max_target_len, batch]
//   mask          Bool  [max_target_len, batch]
//   input_graph   Float [batch, embedding_dim]
//   target_graph  Float [batch, embedding_dim]
//
// Reference: Burn Book §4 (Batcher)

use anyhow::Result;
use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};
use std::sync::Arc;

use crate::data::padding::{batch_to_train_data, TrainBatch};
use crate::domain::sentence_pair::SentencePair;
use crate::domain::traits::GraphEncoder;
use crate::domain::vocabulary::Vocabulary;

// ─── PairBatch ────────────────────────────────────────────────────────────────
/// A batch of sentence pairs ready for the encoder/decoder.
/// Token matrices are time-major; graph matrices are batch-major.
#[derive(Debug, Clone)]
pub struct PairBatch<B: Backend> {
    /// Padded input indices — shape: [max_input_len, batch_size]
    pub input: Tensor<B, 2, Int>,

    /// Unpadded input lengths (EOS included) — shape: [batch_size]
    pub lengths: Tensor<B, 1, Int>,

    /// Padded target indices — shape: [max_target_len, batch_size]
    pub target: Tensor<B, 2, Int>,

    /// true = real token, false = padding — shape: [max_target_len, batch_size]
    pub mask: Tensor<B, 2, Bool>,

    /// Longest target sequence in the batch, EOS included
    pub max_target_len: usize,

    /// Graph embeddings seen by the encoder — shape: [batch_size, embedding_dim]
    pub input_graph: Tensor<B, 2>,

    /// Graph embeddings seen by the decoder — shape: [batch_size, embedding_dim]
    pub target_graph: Tensor<B, 2>,
}

// ─── PairBatcher ──────────────────────────────────────────────────────────────
/// Holds the trimmed vocabulary, the graph encoder and the target device.
#[derive(Clone)]
pub struct PairBatcher<B: Backend> {
    vocab:   Arc<Vocabulary>,
    encoder: Arc<dyn GraphEncoder>,
    device:  B::Device,
}

impl<B: Backend> PairBatcher<B> {
    pub fn new(vocab: Arc<Vocabulary>, encoder: Arc<dyn GraphEncoder>, device: B::Device) -> Self {
        Self { vocab, encoder, device }
    }

    /// Build a batch, reporting empty input or unusable graphs as errors.
    pub fn try_batch(&self, items: Vec<SentencePair>) -> Result<PairBatch<B>> {
        let batch = batch_to_train_data(&self.vocab, items, self.encoder.as_ref())?;
        Ok(self.to_tensors(&batch))
    }

    /// Copy the plain matrices of a TrainBatch onto the device.
    pub fn to_tensors(&self, batch: &TrainBatch) -> PairBatch<B> {
        let lengths: Vec<i64> = batch.input.lengths.iter().map(|&l| l as i64).collect();
        let n   = lengths.len();
        let dim = self.encoder.embedding_dim();

        PairBatch {
            input:          int_matrix(&batch.input.padded, n, &self.device),
            lengths:        Tensor::from_data(TensorData::new(lengths, [n]), &self.device),
            target:         int_matrix(&batch.output.padded, n, &self.device),
            mask:           bool_matrix(&batch.output.mask, n, &self.device),
            max_target_len: batch.output.max_target_len,
            input_graph:    float_matrix(&batch.input.graph_embeddings, dim, &self.device),
            target_graph:   float_matrix(&batch.output.graph_embeddings, dim, &self.device),
        }
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// The DataLoader calls .batch(items) with each mini-batch of pairs.
// Pairs come from a PairDataset, whose graphs were validated against
// the same encoder, and the DataLoader never hands over an empty batch.
impl<B: Backend> Batcher<SentencePair, PairBatch<B>> for PairBatcher<B> {
    fn batch(&self, items: Vec<SentencePair>) -> PairBatch<B> {
        self.try_batch(items)
            .expect("pairs from a PairDataset always form a batch")
    }
}

fn int_matrix<B: Backend>(rows: &[Vec<usize>], cols: usize, device: &B::Device) -> Tensor<B, 2, Int> {
    let flat: Vec<i64> = rows.iter().flatten().map(|&x| x as i64).collect();
    Tensor::from_data(TensorData::new(flat, [rows.len(), cols]), device)
}

fn bool_matrix<B: Backend>(rows: &[Vec<bool>], cols: usize, device: &B::Device) -> Tensor<B, 2, Bool> {
    let flat: Vec<bool> = rows.iter().flatten().copied().collect();
    Tensor::from_data(TensorData::new(flat, [rows.len(), cols]), device)
}

fn float_matrix<B: Backend>(rows: &[Vec<f32>], cols: usize, device: &B::Device) -> Tensor<B, 2> {
    let flat: Vec<f32> = rows.iter().flatten().copied().collect();
    Tensor::from_data(TensorData::new(flat, [rows.len(), cols]), device)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::graph_encoder::{NodeTableEncoder, NullGraphEncoder};
    use burn::backend::NdArray;
    use std::collections::HashMap;

    type TestBackend = NdArray;

    fn vocab() -> Arc<Vocabulary> {
        let mut v = Vocabulary::new("t");
        // how=4 are=5 you=6 fine=7 thanks=8 bye=9
        v.add_sentence("how are you fine thanks bye");
        Arc::new(v)
    }

    fn batcher(encoder: Arc<dyn GraphEncoder>) -> PairBatcher<TestBackend> {
        PairBatcher::new(vocab(), encoder, Default::default())
    }

    fn ints<const D: usize>(t: Tensor<TestBackend, D, Int>) -> Vec<i64> {
        t.into_data().convert::<i64>().to_vec::<i64>().unwrap()
    }

    #[test]
    fn test_shapes_and_values() {
        let b = batcher(Arc::new(NullGraphEncoder::new(4)));
        let batch = b
            .try_batch(vec![
                SentencePair::new("bye", "bye", vec![]),
                SentencePair::new("how are you", "fine thanks", vec![]),
            ])
            .unwrap();

        assert_eq!(batch.input.dims(), [4, 2]);
        assert_eq!(batch.target.dims(), [3, 2]);
        assert_eq!(batch.mask.dims(), [3, 2]);
        assert_eq!(batch.input_graph.dims(), [2, 4]);
        assert_eq!(batch.max_target_len, 3);

        // longest input first, time-major
        assert_eq!(ints(batch.input), vec![4, 9, 5, 2, 6, 0, 2, 0]);
        assert_eq!(ints(batch.lengths), vec![4, 2]);
        assert_eq!(ints(batch.target), vec![7, 9, 8, 2, 2, 0]);

        let mask = batch.mask.into_data().to_vec::<bool>().unwrap();
        assert_eq!(mask, vec![true, true, true, true, true, false]);
    }

    #[test]
    fn test_graph_embeddings_follow_sort() {
        let table = HashMap::from([(1, vec![1.0, 2.0]), (2, vec![10.0, 20.0])]);
        let b = batcher(Arc::new(NodeTableEncoder::new(2, table).unwrap()));
        let batch = b
            .try_batch(vec![
                SentencePair::new("bye", "bye", vec![1]),
                SentencePair::new("how are", "fine", vec![1, 2]),
            ])
            .unwrap();

        let graph = batch.input_graph.into_data().to_vec::<f32>().unwrap();
        assert_eq!(graph, vec![11.0, 22.0, 1.0, 2.0]);
        let target_graph = batch.target_graph.into_data().to_vec::<f32>().unwrap();
        assert_eq!(target_graph, graph);
    }

    #[test]
    fn test_batcher_trait() {
        let b = batcher(Arc::new(NullGraphEncoder::new(3)));
        let batch = Batcher::batch(&b, vec![SentencePair::new("how", "fine", vec![5])]);
        assert_eq!(batch.input.dims(), [2, 1]);
        let graph = batch.input_graph.into_data().to_vec::<f32>().unwrap();
        assert_eq!(graph, vec![0.0; 3]);
    }

    #[test]
    fn test_empty_batch_is_error() {
        let b = batcher(Arc::new(NullGraphEncoder::new(3)));
        assert!(b.try_batch(Vec::new()).is_err());
    }
}
