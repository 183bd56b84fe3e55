// src/engine/crawler.rs
// =============================================================================
// This module orchestrates the crawl.
//
// How it works:
// 1. Start with the seed URL on a stack (the "frontier")
// 2. Pop a URL; skip it if already visited or out of scope
// 3. Mark it visited (durably!) BEFORE fetching, so even a fetch that
//    fails is never attempted again
// 4. Fetch the body, extract links, push them onto the stack
// 5. Repeat until the stack is empty
//
// Why a stack instead of recursion?
// - Recursing per link means call depth grows with the link graph, and a
//   big site will blow the stack long before it runs out of pages
// - An explicit stack walks the graph in the same depth-first order with
//   constant call depth
//
// Why mark before fetching?
// - Marking must happen exactly once per URL, success or failure
// - If we marked only after a successful fetch, a permanently-broken
//   in-scope link would be retried on every page that mentions it
//
// Failure policy:
// - Fetch errors are logged and cost one branch; siblings continue
// - Store errors abort the whole run - without the visited record a
//   cyclic link graph would crawl forever
//
// Rust concepts:
// - while let: Loop as long as the stack yields URLs
// - Arc<dyn Trait>: Share the fetcher without caring which one it is
// - AtomicBool: A thread-safe flag for cooperative cancellation
// =============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::extractor::extract_links;
use crate::fetcher::{FetchError, Fetcher};
use crate::filter::AllowList;
use crate::store::VisitedStore;

// How long to wait before retrying a failed fetch (when retries are on)
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Everything the engine needs to know, fixed at construction.
///
/// There is no global state: two engines with different configs could
/// run side by side against different storage directories.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Where the crawl starts
    pub seed_url: String,
    /// Substrings a URL must contain to be fetched
    pub allow_list: AllowList,
    /// Extra attempts after a failed fetch (0 = reference behavior)
    pub max_retries: u32,
}

// Counters for the final report. Serialize lets --json print this as-is.
#[derive(Debug, Default, Serialize)]
pub struct CrawlSummary {
    /// Pages whose body we fetched and scanned
    pub pages_fetched: usize,
    /// Fetch attempts that failed even after retries
    pub fetch_failures: usize,
    /// URLs skipped because a fetch was already attempted for them
    pub skipped_visited: usize,
    /// URLs skipped because no allow-list entry matched
    pub skipped_out_of_scope: usize,
    /// Total links seen across all fetched pages (before any skipping)
    pub links_discovered: usize,
    /// True if the run was stopped by Ctrl-C rather than an empty frontier
    pub cancelled: bool,
}

impl CrawlSummary {
    /// True when every fetch attempt succeeded
    pub fn is_clean(&self) -> bool {
        self.fetch_failures == 0
    }
}

/// Walks the link graph depth-first from the seed, never fetching the
/// same URL twice across runs that share a storage directory.
pub struct CrawlEngine {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    store: VisitedStore,
    cancel: Arc<AtomicBool>,
}

impl CrawlEngine {
    pub fn new(config: CrawlConfig, fetcher: Arc<dyn Fetcher>, store: VisitedStore) -> Self {
        Self {
            config,
            fetcher,
            store,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    // A clone of the cancellation flag. Setting it to true (from a
    // signal handler, another task, anywhere) makes the engine stop
    // cleanly before the next URL. The visited record stays intact, so
    // the next run resumes where this one stopped.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    // Runs the crawl to completion (or cancellation).
    //
    // Per URL, in this exact order:
    //   visited-check -> scope-check -> mark visited -> fetch -> extract
    //
    // The visited-check guards every entry to the loop, so even a cyclic
    // link graph is traversed once per node and the crawl terminates as
    // long as the reachable in-scope set is finite.
    pub async fn run(&mut self) -> Result<CrawlSummary> {
        let mut summary = CrawlSummary::default();

        // The frontier: discovered but not yet processed URLs.
        // pop() takes from the end, so this behaves as a stack and the
        // traversal is depth-first, like the original recursive version.
        let mut frontier = vec![self.config.seed_url.clone()];

        while let Some(url) = frontier.pop() {
            if self.cancel.load(Ordering::SeqCst) {
                println!("🛑 Cancelled - stopping before the next page");
                summary.cancelled = true;
                break;
            }

            if self.store.is_visited(&url) {
                summary.skipped_visited += 1;
                continue;
            }

            if !self.config.allow_list.is_in_scope(&url) {
                summary.skipped_out_of_scope += 1;
                continue;
            }

            // Durable before the fetch: a URL gets exactly one attempt,
            // ever. A store failure here aborts the run via `?`.
            self.store.mark_visited(&url)?;

            println!("🌐 Fetching: {}", url);

            match self.fetch_with_retries(&url).await {
                Ok(body) => {
                    let links = extract_links(&body);
                    println!("   📄 {} link(s) found", links.len());
                    summary.pages_fetched += 1;
                    summary.links_discovered += links.len();

                    // Push in reverse so the FIRST link on the page is
                    // on TOP of the stack - depth-first in page order
                    for link in links.into_iter().rev() {
                        frontier.push(link);
                    }
                }
                Err(e) => {
                    // One dead branch; siblings stay on the frontier
                    eprintln!("   ⚠️  {}", e);
                    summary.fetch_failures += 1;
                }
            }
        }

        Ok(summary)
    }

    // One fetch, plus up to max_retries extra attempts with a short
    // pause in between. max_retries = 0 keeps the reference behavior
    // of exactly one attempt.
    async fn fetch_with_retries(&self, url: &str) -> Result<String, FetchError> {
        let mut attempts_left = self.config.max_retries;
        loop {
            match self.fetcher.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempts_left > 0 => {
                    attempts_left -= 1;
                    eprintln!("   🔁 Retrying after: {}", e);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<dyn Fetcher> and not a generic parameter?
//    - dyn keeps the engine non-generic, so there's one compiled copy
//    - Arc lets a test hold on to the same fetcher the engine uses and
//      inspect what it recorded after the run
//
// 2. Why Ordering::SeqCst on the atomic?
//    - The strictest memory ordering; for a once-per-URL flag check the
//      cost is irrelevant and there's nothing subtle to reason about
//
// 3. Where did the recursion go?
//    - The original processes each link by calling itself; here the
//      "call stack" is a Vec<String> we control
//    - Same visit order, no stack-overflow risk on deep link chains
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // A fetcher over canned pages. Records every call so tests can
    // assert exactly which fetches happened and in what order.
    struct MockFetcher {
        pages: HashMap<String, String>,
        calls: Mutex<Vec<String>>,
    }

    impl MockFetcher {
        fn new(pages: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                pages: pages
                    .iter()
                    .map(|(u, b)| (u.to_string(), b.to_string()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::BadUrl {
                url: url.to_string(),
            })
        }
    }

    fn engine(
        seed: &str,
        allow: &[&str],
        fetcher: Arc<MockFetcher>,
        dir: &TempDir,
    ) -> CrawlEngine {
        let config = CrawlConfig {
            seed_url: seed.to_string(),
            allow_list: AllowList::new(allow.iter().map(|s| s.to_string()).collect()),
            max_retries: 0,
        };
        let store = VisitedStore::open(dir.path()).unwrap();
        CrawlEngine::new(config, fetcher, store)
    }

    #[tokio::test]
    async fn test_crawl_stays_in_scope() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new(&[
            (
                "https://facebook.com/",
                "links: https://facebook.com/a and https://evil.com/b",
            ),
            ("https://facebook.com/a", "no links here"),
        ]);

        let mut engine = engine(
            "https://facebook.com/",
            &["facebook", "cdn"],
            fetcher.clone(),
            &dir,
        );
        let summary = engine.run().await.unwrap();

        // Exactly two fetches: the seed and the in-scope link
        assert_eq!(
            fetcher.calls(),
            vec!["https://facebook.com/", "https://facebook.com/a"]
        );
        assert_eq!(summary.pages_fetched, 2);
        assert_eq!(summary.skipped_out_of_scope, 1);

        // The record holds both fetched URLs and nothing else
        let store = VisitedStore::open(dir.path()).unwrap();
        assert!(store.is_visited("https://facebook.com/"));
        assert!(store.is_visited("https://facebook.com/a"));
        assert!(!store.is_visited("https://evil.com/b"));
    }

    #[tokio::test]
    async fn test_cyclic_graph_terminates() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new(&[
            ("https://site.com/A", "go to https://site.com/B"),
            ("https://site.com/B", "back to https://site.com/A"),
        ]);

        let mut engine = engine("https://site.com/A", &["site"], fetcher.clone(), &dir);
        let summary = engine.run().await.unwrap();

        // A and B each fetched exactly once despite linking to each other
        assert_eq!(
            fetcher.calls(),
            vec!["https://site.com/A", "https://site.com/B"]
        );
        assert_eq!(summary.pages_fetched, 2);
        assert_eq!(summary.skipped_visited, 1);
    }

    #[tokio::test]
    async fn test_previously_visited_urls_are_never_refetched() {
        let dir = TempDir::new().unwrap();

        // A prior run already fetched /a
        {
            let mut store = VisitedStore::open(dir.path()).unwrap();
            store.mark_visited("https://site.com/a").unwrap();
        }

        let fetcher = MockFetcher::new(&[
            ("https://site.com/", "see https://site.com/a here"),
            ("https://site.com/a", "should never be requested"),
        ]);

        let mut engine = engine("https://site.com/", &["site"], fetcher.clone(), &dir);
        let summary = engine.run().await.unwrap();

        assert_eq!(fetcher.calls(), vec!["https://site.com/"]);
        assert_eq!(summary.skipped_visited, 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_branch_local() {
        let dir = TempDir::new().unwrap();
        // /broken is in scope but has no canned page, so fetching it fails
        let fetcher = MockFetcher::new(&[
            (
                "https://site.com/",
                "first https://site.com/broken then https://site.com/ok",
            ),
            ("https://site.com/ok", "fin"),
        ]);

        let mut engine = engine("https://site.com/", &["site"], fetcher.clone(), &dir);
        let summary = engine.run().await.unwrap();

        // The sibling after the broken link was still crawled
        assert_eq!(
            fetcher.calls(),
            vec![
                "https://site.com/",
                "https://site.com/broken",
                "https://site.com/ok"
            ]
        );
        assert_eq!(summary.pages_fetched, 2);
        assert_eq!(summary.fetch_failures, 1);
        assert!(!summary.is_clean());

        // The failed URL is marked visited: one attempt, ever
        let store = VisitedStore::open(dir.path()).unwrap();
        assert!(store.is_visited("https://site.com/broken"));
    }

    #[tokio::test]
    async fn test_traversal_is_depth_first_in_page_order() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new(&[
            (
                "https://site.com/",
                "https://site.com/a then https://site.com/b",
            ),
            ("https://site.com/a", "deeper: https://site.com/a1"),
            ("https://site.com/a1", "leaf"),
            ("https://site.com/b", "leaf"),
        ]);

        let mut engine = engine("https://site.com/", &["site"], fetcher.clone(), &dir);
        engine.run().await.unwrap();

        // a's subtree is exhausted before b starts
        assert_eq!(
            fetcher.calls(),
            vec![
                "https://site.com/",
                "https://site.com/a",
                "https://site.com/a1",
                "https://site.com/b"
            ]
        );
    }

    #[tokio::test]
    async fn test_repeated_links_on_one_page_fetch_once() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new(&[
            (
                "https://site.com/",
                "https://site.com/x and https://site.com/x and https://site.com/x",
            ),
            ("https://site.com/x", "leaf"),
        ]);

        let mut engine = engine("https://site.com/", &["site"], fetcher.clone(), &dir);
        let summary = engine.run().await.unwrap();

        assert_eq!(
            fetcher.calls(),
            vec!["https://site.com/", "https://site.com/x"]
        );
        // The extractor reported all three mentions...
        assert_eq!(summary.links_discovered, 3);
        // ...but two were skipped as already visited
        assert_eq!(summary.skipped_visited, 2);
    }

    #[tokio::test]
    async fn test_cancellation_stops_before_any_fetch() {
        let dir = TempDir::new().unwrap();
        let fetcher = MockFetcher::new(&[("https://site.com/", "whatever")]);

        let mut engine = engine("https://site.com/", &["site"], fetcher.clone(), &dir);
        engine.cancel_flag().store(true, Ordering::SeqCst);
        let summary = engine.run().await.unwrap();

        assert!(summary.cancelled);
        assert!(fetcher.calls().is_empty());
    }

    // A fetcher that fails a fixed number of times before succeeding,
    // for exercising the bounded retry path.
    struct FlakyFetcher {
        failures_left: Mutex<u32>,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl Fetcher for FlakyFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            *self.calls.lock().unwrap() += 1;
            let mut left = self.failures_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                Err(FetchError::BadUrl {
                    url: url.to_string(),
                })
            } else {
                Ok("no links".to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_bounded_retry_recovers_from_one_failure() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(FlakyFetcher {
            failures_left: Mutex::new(1),
            calls: Mutex::new(0),
        });

        let config = CrawlConfig {
            seed_url: "https://site.com/".to_string(),
            allow_list: AllowList::new(vec!["site".to_string()]),
            max_retries: 1,
        };
        let store = VisitedStore::open(dir.path()).unwrap();
        let mut engine = CrawlEngine::new(config, fetcher.clone(), store);

        let summary = engine.run().await.unwrap();

        assert_eq!(*fetcher.calls.lock().unwrap(), 2);
        assert_eq!(summary.pages_fetched, 1);
        assert!(summary.is_clean());
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(FlakyFetcher {
            failures_left: Mutex::new(100),
            calls: Mutex::new(0),
        });

        let config = CrawlConfig {
            seed_url: "https://site.com/".to_string(),
            allow_list: AllowList::new(vec!["site".to_string()]),
            max_retries: 2,
        };
        let store = VisitedStore::open(dir.path()).unwrap();
        let mut engine = CrawlEngine::new(config, fetcher.clone(), store);

        let summary = engine.run().await.unwrap();

        // 1 attempt + 2 retries, then the branch is abandoned
        assert_eq!(*fetcher.calls.lock().unwrap(), 3);
        assert_eq!(summary.fetch_failures, 1);
    }
}
