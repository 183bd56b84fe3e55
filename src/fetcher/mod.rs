// src/fetcher/mod.rs
// =============================================================================
// This module defines how page bodies are fetched.
//
// The Fetcher trait is the seam between the crawl engine and the network:
// the engine only ever talks to `dyn Fetcher`, so tests can drive a whole
// crawl against an in-memory map of canned pages and count exactly how
// many fetches happened. HttpFetcher in http.rs is the real thing.
//
// Fetch errors are deliberately non-fatal: a dead link costs us one
// branch of the crawl, never the run.
//
// Rust concepts:
// - Trait objects: dyn Fetcher lets the engine accept any implementation
// - async-trait: async functions in traits need this crate (for now)
// =============================================================================

mod http;

pub use http::HttpFetcher;

use async_trait::async_trait;
use thiserror::Error;

// What can go wrong fetching one URL. Both variants abort only the
// branch of the crawl that hit them.
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS failure, connection refused, timeout, or a response stream
    /// that was cut off mid-read
    #[error("fetch failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The extractor produced a string that isn't a fetchable URL
    /// (e.g. a bare "www.host/path" with no scheme)
    #[error("not a fetchable URL: {url}")]
    BadUrl { url: String },
}

/// Fetches the raw body of a URL.
///
/// Contract: any HTTP status code is a success and yields the full body;
/// only transport-level failures (or unfetchable URL strings) are errors.
/// Implementations must not touch persisted state.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}
