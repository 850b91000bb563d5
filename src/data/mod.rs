// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw TSV files to tensor batches.
//
// The pipeline flows in this order:
//
//   pair file + sentence file
//       │
//       ▼
//   TsvPairLoader     → reads rows into SentencePairs / sentences
//       │
//       ▼
//   Preprocessor      → optional ASCII normalisation
//       │
//       ▼
//   corpus            → length filter + vocabulary counting
//       │
//       ▼
//   filter            → vocabulary trim + rare-word pair removal
//       │
//       ▼
//   PairDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   padding           → sort, index, pad, mask, graph-embed
//       │
//       ▼
//   PairBatcher       → implements Burn's Batcher trait
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the TSV pair and sentence files
pub mod loader;

/// Optional sentence normalisation
pub mod preprocessor;

/// Length filter and rare-word trimming
pub mod filter;

/// Loads, filters and counts the corpus
pub mod corpus;

/// Index conversion, padding, masks and batch assembly
pub mod padding;

/// Implements Burn's Dataset trait for sentence pairs
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded random batch sampling with replacement
pub mod sampler;
