// ============================================================
// Layer 5 — ML Layer
// ============================================================
// The pieces that touch model-side numbers but not the model
// itself:
//
//   graph_encoder.rs — GraphEncoder implementations backed by a
//                      node-embedding table exported by the
//                      graph-representation model
//
//   loss.rs          — masked negative log-likelihood for one
//                      decoder step over a padded batch
//
//   word_vectors.rs  — GloVe vectors arranged in vocabulary
//                      index order as an initial embedding matrix
//
// Reference: Burn Book §3 (Building Blocks)

/// Node-table and null graph encoders
pub mod graph_encoder;

/// Masked NLL loss over padded targets
pub mod loss;

/// Pretrained word vectors for the vocabulary
pub mod word_vectors;
