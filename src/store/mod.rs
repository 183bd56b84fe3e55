// src/store/mod.rs
// =============================================================================
// This module owns the durable visited record.
//
// Submodules:
// - visited: in-memory HashSet mirrored to an append-only log file
//
// The record is what makes repeated runs cheap (nothing is fetched twice)
// and what makes cyclic link graphs safe (every cycle is broken the
// second time around).
// =============================================================================

mod visited;

// Re-export the store, its error type and the on-disk file name
pub use visited::{StoreError, VisitedStore, RECORD_FILE};
