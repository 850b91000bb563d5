// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, built on clap.
// All pipeline logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `prepare` — vocabulary, trimming, batching, logs
//   2. `inspect` — print one sampled batch
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs, PrepareArgs};

/// The main CLI struct
#[derive(Parser, Debug)]
#[command(
    name = "graph-pair-prep",
    version,
    about = "Prepare padded sentence-pair batches with graph embeddings for seq2seq training."
)]
pub struct Cli {
    /// The subcommand to run (prepare or inspect)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => run_prepare(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    tracing::info!("Preparing pairs from: {}", args.pair_file);
    let report = PrepareUseCase::new(args.into()).execute()?;

    println!(
        "Prepared {} pairs into {} batches ({} vocabulary entries, mean padding {:.1}%).",
        report.pairs,
        report.batches,
        report.vocab_words,
        report.mean_padding_ratio * 100.0,
    );
    println!("Vocabulary:    {}", report.vocab_path.display());
    println!("Batch metrics: {}", report.metrics_path.display());
    println!("Run options:   {}", report.options_path.display());
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::{render_batch, InspectUseCase};

    let (vocab, batch) = InspectUseCase::new(args.into()).execute()?;
    print!("{}", render_batch(&vocab, &batch));
    Ok(())
}
