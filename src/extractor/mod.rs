// src/extractor/mod.rs
// =============================================================================
// This module turns raw page bodies into candidate URLs.
//
// Features:
// - One regex pass over the whole body, no HTML parsing
// - Order preserving, so the crawl walks links as they appear on the page
// - No dedup here - that's the visited store's job
// =============================================================================

mod links;

// Re-export the extraction function
pub use links::extract_links;
