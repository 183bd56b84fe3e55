// src/engine/mod.rs
// =============================================================================
// This module runs the crawl itself.
//
// Features:
// - Depth-first traversal from a seed URL via an explicit stack
// - Dedup-before-fetch against the durable visited store
// - Allow-list scope filtering of every candidate URL
// - Branch-local recovery from fetch failures, fatal on store failures
// - Cooperative cancellation between pages
// =============================================================================

mod crawler;

// Re-export the engine and its config/summary types
pub use crawler::{CrawlConfig, CrawlEngine, CrawlSummary};
