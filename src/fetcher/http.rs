// src/fetcher/http.rs
// =============================================================================
// This module fetches page bodies over HTTP using reqwest.
//
// Key behavior:
// - A plain GET with no custom headers
// - ANY status code counts as success: a 404 page still has a body, and
//   that body may still contain links worth following, so we read it and
//   hand it to the extractor like any other page
// - Only transport-level problems are errors: DNS failure, connection
//   refused, timeout, a stream cut off mid-read, or a string that isn't
//   a fetchable URL at all
//
// Rust concepts:
// - async/await: Network I/O without blocking the runtime
// - Trait implementations: HttpFetcher is the production Fetcher
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::{FetchError, Fetcher};

/// The production fetcher: a thin wrapper around a shared reqwest client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the fetcher with a per-request timeout.
    //
    // The reference behavior has no timeout at all, which means one dead
    // host can hang the whole crawl forever. The timeout is a hardening
    // addition, not a behavior change for responsive hosts.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        // The extractor can hand us strings like "www.b.org/x" that have
        // no scheme; reqwest can't fetch those. Reject them up front so
        // the engine skips the branch instead of panicking later.
        if reqwest::Url::parse(url).is_err() {
            return Err(FetchError::BadUrl {
                url: url.to_string(),
            });
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        // No status branching: read the body to completion whatever the
        // code was. Failures here are mid-stream interruptions.
        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}
