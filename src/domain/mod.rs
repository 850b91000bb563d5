// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust types that define what the pipeline works on.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Word <-> index mapping with reserved tokens and trimming
pub mod vocabulary;

// An input/output sentence pair with its graph node ids
pub mod sentence_pair;

// Core abstractions (traits) that other layers implement
pub mod traits;
