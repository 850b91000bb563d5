// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers; no padding or tensor logic
// lives here.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The full preparation workflow
pub mod prepare_use_case;

// Sample and display a single batch
pub mod inspect_use_case;
