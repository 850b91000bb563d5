// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting file output used by the application layer:
//
//   vocab_store.rs — Vocabulary persistence
//                    Saves the trimmed vocabulary as JSON and
//                    loads it back so later runs share the same
//                    word indices.
//
//   para_log.rs    — Run options log
//                    Writes the options of each run to
//                    log/para/<time>.json.
//
//   metrics.rs     — Batch metrics logging
//                    Writes per-batch sizes, token counts and
//                    padding ratio to a CSV file.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Vocabulary saving and loading
pub mod vocab_store;

/// JSON log of run options
pub mod para_log;

/// Batch metrics CSV logger
pub mod metrics;
