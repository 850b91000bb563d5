// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `prepare` and `inspect`
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::inspect_use_case::InspectConfig;
use crate::application::prepare_use_case::PrepareConfig;
use crate::data::corpus::CountMode;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and trim the vocabulary, then batch every pair
    Prepare(PrepareArgs),

    /// Show one sampled batch using a saved vocabulary
    Inspect(InspectArgs),
}

/// All arguments for the `prepare` command.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Pair file: input \t output \t space-separated node ids
    #[arg(long)]
    pub pair_file: String,

    /// Sentence file used to count vocabulary words
    #[arg(long)]
    pub sentence_file: String,

    /// Name stored with the vocabulary
    #[arg(long, default_value = "corpus")]
    pub corpus_name: String,

    /// Pairs with this many words or more on either side are dropped
    #[arg(long, default_value_t = 10)]
    pub max_length: usize,

    /// Words seen fewer times than this are trimmed
    #[arg(long, default_value_t = 3)]
    pub min_count: usize,

    /// Pairs per batch
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Node embedding table ("<num_nodes> <dim>" header, then "id v1 .. vdim")
    #[arg(long)]
    pub node_embeddings: Option<String>,

    /// Graph embedding width when no node table is given
    #[arg(long, default_value_t = 128)]
    pub graph_dim: usize,

    /// GloVe-format word vectors to check vocabulary coverage against
    #[arg(long)]
    pub word_vectors: Option<String>,

    /// Lowercase, strip accents and non-letters before counting
    #[arg(long)]
    pub normalize: bool,

    /// Count every sentence-file column once instead of the first column twice
    #[arg(long)]
    pub count_columns: bool,

    /// Directory for vocab.json and batch_metrics.csv
    #[arg(long, default_value = "prepared")]
    pub out_dir: String,

    /// Directory for the run-options log (written under para/)
    #[arg(long, default_value = "log")]
    pub log_dir: String,

    /// Shuffle seed for batch order
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI PrepareArgs into the application-layer PrepareConfig.
impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            pair_file:       a.pair_file,
            sentence_file:   a.sentence_file,
            corpus_name:     a.corpus_name,
            max_length:      a.max_length,
            min_count:       a.min_count,
            batch_size:      a.batch_size,
            node_embeddings: a.node_embeddings,
            graph_dim:       a.graph_dim,
            word_vectors:    a.word_vectors,
            normalize:       a.normalize,
            count_mode:      if a.count_columns { CountMode::AllColumns } else { CountMode::FirstColumnTwice },
            out_dir:         a.out_dir,
            log_dir:         a.log_dir,
            seed:            a.seed,
        }
    }
}

/// All arguments for the `inspect` command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Pair file to sample from
    #[arg(long)]
    pub pair_file: String,

    /// Directory where `prepare` saved vocab.json
    #[arg(long, default_value = "prepared")]
    pub out_dir: String,

    /// Pairs with this many words or more on either side are skipped
    #[arg(long, default_value_t = 10)]
    pub max_length: usize,

    /// Pairs in the sampled batch
    #[arg(long, default_value_t = 5)]
    pub batch_size: usize,

    /// Node embedding table
    #[arg(long)]
    pub node_embeddings: Option<String>,

    /// Graph embedding width when no node table is given
    #[arg(long, default_value_t = 128)]
    pub graph_dim: usize,

    /// Normalise sentences the same way `prepare --normalize` does
    #[arg(long)]
    pub normalize: bool,

    /// Sampling seed
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl From<InspectArgs> for InspectConfig {
    fn from(a: InspectArgs) -> Self {
        InspectConfig {
            pair_file:       a.pair_file,
            out_dir:         a.out_dir,
            max_length:      a.max_length,
            batch_size:      a.batch_size,
            node_embeddings: a.node_embeddings,
            graph_dim:       a.graph_dim,
            normalize:       a.normalize,
            seed:            a.seed,
        }
    }
}
