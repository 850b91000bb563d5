// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Orchestrates the full preparation pipeline in order:
//
//   Step 1: Load pairs + sentences      (Layer 4 - data)
//   Step 2: Normalise (optional)        (Layer 4 - data)
//   Step 3: Length filter + count words (Layer 4 - data)
//   Step 4: Trim rare words             (Layer 4 - data)
//   Step 5: Build graph encoder         (Layer 5 - ml)
//   Step 6: Build dataset               (Layer 4 - data)
//   Step 7: Save vocabulary + options   (Layer 6 - infra)
//   Step 8: Word vector coverage        (Layer 5 - ml)
//   Step 9: Batch every pair once       (Layer 4 - data)
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

use anyhow::{bail, Result};
use burn::data::dataloader::DataLoaderBuilder;
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::Arc};

use crate::data::{
    batcher::PairBatcher,
    corpus::{load_prepare_data, CountMode},
    dataset::PairDataset,
    filter::trim_rare_words,
    loader::TsvPairLoader,
    preprocessor::Preprocessor,
};
use crate::domain::traits::GraphEncoder;
use crate::infra::{
    metrics::{BatchMetrics, MetricsLogger},
    para_log::{timestamp, write_para_log},
    vocab_store::VocabStore,
};
use crate::ml::{
    graph_encoder::{NodeTableEncoder, NullGraphEncoder},
    word_vectors::{embedding_matrix, PretrainedVectors},
};

/// CPU backend; data preparation never needs a GPU.
pub type PrepBackend = burn::backend::NdArray;

// ─── Preparation Configuration ───────────────────────────────────────────────
// All options of a preparation run.
// Serialisable so it can be written to the run-options log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub pair_file:       String,
    pub sentence_file:   String,
    pub corpus_name:     String,
    pub max_length:      usize,
    pub min_count:       usize,
    pub batch_size:      usize,
    pub node_embeddings: Option<String>,
    pub graph_dim:       usize,
    pub word_vectors:    Option<String>,
    pub normalize:       bool,
    #[serde(default)]
    pub count_mode:      CountMode,
    pub out_dir:         String,
    pub log_dir:         String,
    pub seed:            u64,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            pair_file:       "data/pairs.tsv".to_string(),
            sentence_file:   "data/sentences.tsv".to_string(),
            corpus_name:     "corpus".to_string(),
            max_length:      10,
            min_count:       3,
            batch_size:      64,
            node_embeddings: None,
            graph_dim:       128,
            word_vectors:    None,
            normalize:       false,
            count_mode:      CountMode::FirstColumnTwice,
            out_dir:         "prepared".to_string(),
            log_dir:         "log".to_string(),
            seed:            42,
        }
    }
}

/// What a preparation run produced.
#[derive(Debug, Clone)]
pub struct PrepareReport {
    pub pairs:              usize,
    pub vocab_words:        usize,
    pub batches:            usize,
    pub mean_padding_ratio: f64,
    pub vocab_path:         PathBuf,
    pub metrics_path:       PathBuf,
    pub options_path:       PathBuf,
}

// ─── PrepareUseCase ──────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    /// Execute the full preparation pipeline end to end
    pub fn execute(&self) -> Result<PrepareReport> {
        let cfg = &self.config;
        if cfg.batch_size == 0 {
            bail!("batch size must be at least 1");
        }

        // ── Steps 1-3: Load, normalise, filter, count ────────────────────────
        let loader       = TsvPairLoader::new(&cfg.pair_file, &cfg.sentence_file);
        let preprocessor = cfg.normalize.then(Preprocessor::new);
        let (mut vocab, pairs) = load_prepare_data(
            &loader,
            &cfg.corpus_name,
            cfg.max_length,
            preprocessor.as_ref(),
            cfg.count_mode,
        )?;

        // ── Step 4: Trim rare words ───────────────────────────────────────────
        let pairs = trim_rare_words(&mut vocab, pairs, cfg.min_count);
        if pairs.is_empty() {
            bail!(
                "no pairs left after filtering (max_length={}, min_count={})",
                cfg.max_length,
                cfg.min_count
            );
        }
        let pair_count = pairs.len();

        // ── Step 5: Graph encoder ─────────────────────────────────────────────
        let encoder = build_encoder(cfg.node_embeddings.as_deref(), cfg.graph_dim)?;

        // ── Step 6: Dataset (validates every graph) ───────────────────────────
        let dataset = PairDataset::new(pairs, encoder.as_ref())?;

        // ── Step 7: Save vocabulary and run options ───────────────────────────
        let vocab_path   = VocabStore::new(&cfg.out_dir).save(&vocab)?;
        let options_path = write_para_log(&cfg.log_dir, cfg, &timestamp())?;

        // ── Step 8: Pretrained word vector coverage ───────────────────────────
        if let Some(path) = &cfg.word_vectors {
            let vectors = PretrainedVectors::from_file(path)?;
            let matrix  = embedding_matrix(&vocab, &vectors);
            tracing::info!(
                "Word vectors cover {} / {} vocabulary entries ({:.1}%)",
                matrix.found,
                matrix.rows.len(),
                matrix.coverage() * 100.0
            );
        }

        // ── Step 9: Batch every pair once ─────────────────────────────────────
        let vocab_words = vocab.num_words();
        let device      = Default::default();
        let batcher     = PairBatcher::<PrepBackend>::new(Arc::new(vocab), encoder, device);
        let loader      = DataLoaderBuilder::new(batcher)
            .batch_size(cfg.batch_size)
            .shuffle(cfg.seed)
            .num_workers(1)
            .build(dataset);

        let metrics = MetricsLogger::new(&cfg.out_dir)?;
        let mut batches     = 0usize;
        let mut padding_sum = 0.0f64;

        for batch in loader.iter() {
            batches += 1;
            let m = BatchMetrics::from_batch(batches, &batch);
            padding_sum += m.padding_ratio;
            metrics.log(&m)?;
        }

        let mean_padding_ratio = if batches > 0 { padding_sum / batches as f64 } else { 0.0 };
        tracing::info!(
            "Prepared {} batches from {} pairs (mean padding {:.1}%)",
            batches,
            pair_count,
            mean_padding_ratio * 100.0
        );

        Ok(PrepareReport {
            pairs: pair_count,
            vocab_words,
            batches,
            mean_padding_ratio,
            vocab_path,
            metrics_path: metrics.csv_path().clone(),
            options_path,
        })
    }
}

/// Node-table encoder when a table is given, zero vectors otherwise.
pub fn build_encoder(node_embeddings: Option<&str>, graph_dim: usize) -> Result<Arc<dyn GraphEncoder>> {
    match node_embeddings {
        Some(path) => Ok(Arc::new(NodeTableEncoder::from_file(path)?)),
        None => {
            tracing::warn!("No node embeddings given, graph embeddings will be zero (dim={graph_dim})");
            Ok(Arc::new(NullGraphEncoder::new(graph_dim)))
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_inputs(dir: &std::path::Path) -> PrepareConfig {
        let pairs = "hi there\thello\t1 2\n\
                     hello\thi there\t2\n\
                     how are you\tfine\t\n\
                     this sentence is much too long\thi\t1\n\
                     hi\tfriend\t1\n";
        let sentences = "hi there\thello\tx\n\
                         hello\thi there\tx\n\
                         how are you\tfine\tx\n\
                         how are you\tfine\tx\n\
                         hi\tfriend\tx\n";
        fs::write(dir.join("pairs.tsv"), pairs).unwrap();
        fs::write(dir.join("sentences.tsv"), sentences).unwrap();
        fs::write(dir.join("nodes.emb"), "2 3\n1 1 0 0\n2 0 1 0\n").unwrap();

        PrepareConfig {
            pair_file:       dir.join("pairs.tsv").display().to_string(),
            sentence_file:   dir.join("sentences.tsv").display().to_string(),
            corpus_name:     "chat".to_string(),
            max_length:      5,
            min_count:       2,
            batch_size:      2,
            node_embeddings: Some(dir.join("nodes.emb").display().to_string()),
            graph_dim:       128,
            word_vectors:    None,
            normalize:       false,
            count_mode:      CountMode::FirstColumnTwice,
            out_dir:         dir.join("out").display().to_string(),
            log_dir:         dir.join("log").display().to_string(),
            seed:            7,
        }
    }

    #[test]
    fn test_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = write_inputs(dir.path());
        let report = PrepareUseCase::new(cfg).execute().unwrap();

        // only first columns are counted (twice): "fine" and "friend" never
        // enter the vocabulary, the long pair is filtered by length
        assert_eq!(report.pairs, 2);
        // PAD SOS EOS UNK + hi there hello how are you
        assert_eq!(report.vocab_words, 10);
        assert_eq!(report.batches, 1);
        assert!(report.vocab_path.exists());
        assert!(report.options_path.exists());

        let csv = fs::read_to_string(&report.metrics_path).unwrap();
        assert_eq!(csv.lines().count(), 2);

        let vocab = VocabStore::new(dir.path().join("out")).load().unwrap();
        assert!(vocab.is_trimmed());
        assert!(!vocab.contains("fine"));
        assert!(!vocab.contains("friend"));
    }

    #[test]
    fn test_all_columns_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = write_inputs(dir.path());
        cfg.count_mode = CountMode::AllColumns;
        let report = PrepareUseCase::new(cfg).execute().unwrap();

        // second columns count too, "hi friend" loses "friend" to the trim
        assert_eq!(report.pairs, 3);
        // PAD SOS EOS UNK + hi there hello how are you fine
        assert_eq!(report.vocab_words, 11);
        assert_eq!(report.batches, 2);
    }

    #[test]
    fn test_unknown_graph_node_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = write_inputs(dir.path());
        fs::write(dir.path().join("nodes.emb"), "1 3\n1 1 0 0\n").unwrap();
        assert!(PrepareUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_everything_filtered_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = write_inputs(dir.path());
        cfg.min_count = 100;
        assert!(PrepareUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_null_encoder_when_no_table() {
        let encoder = build_encoder(None, 16).unwrap();
        assert_eq!(encoder.embedding_dim(), 16);
    }
}
