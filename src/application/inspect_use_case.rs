// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Loads the vocabulary saved by `prepare`, samples one random
// batch from the pairs that vocabulary fully covers, and renders what the model would see:
// sorted sentences, lengths, the padded index matrices and the
// padding mask.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{bail, Result};
use std::path::Path;

use crate::application::prepare_use_case::build_encoder;
use crate::data::{
    filter::{filter_known_pairs, filter_pairs},
    loader::read_pairs,
    padding::{batch_to_train_data, TrainBatch},
    preprocessor::Preprocessor,
    sampler::sample_batches,
};
use crate::domain::vocabulary::Vocabulary;
use crate::infra::vocab_store::VocabStore;

#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub pair_file:       String,
    pub out_dir:         String,
    pub max_length:      usize,
    pub batch_size:      usize,
    pub node_embeddings: Option<String>,
    pub graph_dim:       usize,
    pub normalize:       bool,
    pub seed:            u64,
}

pub struct InspectUseCase {
    config: InspectConfig,
}

impl InspectUseCase {
    pub fn new(config: InspectConfig) -> Self {
        Self { config }
    }

    /// Sample one batch and return it with the vocabulary used.
    pub fn execute(&self) -> Result<(Vocabulary, TrainBatch)> {
        let cfg   = &self.config;
        let vocab = VocabStore::new(&cfg.out_dir).load()?;

        let mut pairs = read_pairs(Path::new(&cfg.pair_file))?;
        if cfg.normalize {
            let p = Preprocessor::new();
            pairs = pairs.iter().map(|pair| p.normalize_pair(pair)).collect();
        }
        let pairs = filter_known_pairs(&vocab, filter_pairs(pairs, cfg.max_length));

        let Some(sample) = sample_batches(&pairs, cfg.batch_size, 1, cfg.seed).pop() else {
            bail!("no pairs to sample from '{}'", cfg.pair_file);
        };

        let encoder = build_encoder(cfg.node_embeddings.as_deref(), cfg.graph_dim)?;
        let batch   = batch_to_train_data(&vocab, sample, encoder.as_ref())?;
        Ok((vocab, batch))
    }
}

/// Human-readable dump of a batch.
pub fn render_batch(vocab: &Vocabulary, batch: &TrainBatch) -> String {
    let mut out = format!("batch of {} pairs (longest input first)\n", batch.batch_size());

    for (i, pair) in batch.pairs.iter().enumerate() {
        out.push_str(&format!(
            "  [{i}] len={:<3} {} => {}  graph={:?}\n",
            batch.input.lengths[i],
            vocab.decode(&column(&batch.input.padded, i)).join(" "),
            vocab.decode(&column(&batch.output.padded, i)).join(" "),
            pair.graph,
        ));
    }

    out.push_str(&format!("input  [{} x {}]\n", batch.max_input_len(), batch.batch_size()));
    for row in &batch.input.padded {
        out.push_str(&format!("  {row:?}\n"));
    }

    out.push_str(&format!("target [{} x {}]\n", batch.output.max_target_len, batch.batch_size()));
    for (row, mask) in batch.output.padded.iter().zip(&batch.output.mask) {
        let bits: String = mask.iter().map(|&m| if m { '1' } else { '0' }).collect();
        out.push_str(&format!("  {row:?}  mask={bits}\n"));
    }

    out
}

/// Column `i` of a time-major matrix
fn column(matrix: &[Vec<usize>], i: usize) -> Vec<usize> {
    matrix.iter().map(|row| row[i]).collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::UNK_TOKEN;
    use std::fs;

    fn setup(dir: &Path) -> InspectConfig {
        let mut vocab = Vocabulary::new("chat");
        vocab.add_sentence("good morning to you");
        VocabStore::new(dir.join("out")).save(&vocab).unwrap();
        fs::write(
            dir.join("pairs.tsv"),
            "good morning\tto you\t\nmorning\tgood\t\ngood night\tto you\t\n",
        )
        .unwrap();

        InspectConfig {
            pair_file:       dir.join("pairs.tsv").display().to_string(),
            out_dir:         dir.join("out").display().to_string(),
            max_length:      10,
            batch_size:      3,
            node_embeddings: None,
            graph_dim:       4,
            normalize:       false,
            seed:            1,
        }
    }

    #[test]
    fn test_samples_one_sorted_batch() {
        let dir = tempfile::tempdir().unwrap();
        let (vocab, batch) = InspectUseCase::new(setup(dir.path())).execute().unwrap();

        assert_eq!(batch.batch_size(), 3);
        assert!(batch.input.lengths.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(batch.input.graph_embeddings[0], vec![0.0; 4]);

        let text = render_batch(&vocab, &batch);
        assert!(text.starts_with("batch of 3 pairs"));
        assert!(text.contains("mask="));
    }

    #[test]
    fn test_skips_pairs_with_unknown_words() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = setup(dir.path());
        cfg.batch_size = 20;
        let (vocab, batch) = InspectUseCase::new(cfg).execute().unwrap();

        assert!(!vocab.contains("night"));
        assert!(batch.pairs.iter().all(|p| p.input != "good night"));
        let flat: Vec<usize> = batch.input.padded.iter().flatten().copied().collect();
        assert!(!flat.contains(&UNK_TOKEN));
    }

    #[test]
    fn test_no_known_pairs_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = setup(dir.path());
        fs::write(&cfg.pair_file, "good night\tto you\t\n").unwrap();
        assert!(InspectUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_missing_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = setup(dir.path());
        cfg.out_dir = dir.path().join("elsewhere").display().to_string();
        assert!(InspectUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_render_decodes_sentences() {
        let mut vocab = Vocabulary::new("t");
        vocab.add_sentence("a b");
        let pairs = vec![crate::domain::sentence_pair::SentencePair::new("a b", "b", vec![3])];
        let encoder = crate::ml::graph_encoder::NullGraphEncoder::new(1);
        let batch = batch_to_train_data(&vocab, pairs, &encoder).unwrap();

        let text = render_batch(&vocab, &batch);
        assert!(text.contains("a b => b"), "{text}");
        assert!(text.contains("graph=[3]"));
        assert!(text.contains("mask=1"));
    }
}
