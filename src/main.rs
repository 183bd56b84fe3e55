// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Dispatch to the appropriate subcommand handler
// 3. Wire Ctrl-C to the engine's cancellation flag
// 4. Print the summary and exit with proper code
//    (0 = clean run, 1 = some fetches failed, 2 = fatal error)
//
// Rust concepts used:
// - async/await: Because crawling is network-bound
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod engine; // src/engine/ - the crawl loop itself
mod extractor; // src/extractor/ - regex link extraction
mod fetcher; // src/fetcher/ - the Fetcher trait + HTTP implementation
mod filter; // src/filter.rs - allow-list scope filtering
mod store; // src/store/ - the durable visited record

use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use url::Url;

use cli::{Cli, Commands};
use engine::{CrawlConfig, CrawlEngine, CrawlSummary};
use fetcher::HttpFetcher;
use filter::AllowList;
use store::VisitedStore;

// The #[tokio::main] attribute transforms our async main into a real main
// function. It creates a tokio runtime and runs our async code inside it.
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // A fatal error: print the whole chain (context + cause)
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = clean run
//   Ok(1) = run finished but some fetches failed
//   Err   = fatal error (bad seed, unusable storage), exit code 2
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            seed_url,
            allow,
            storage,
            timeout_secs,
            max_retries,
            json,
        } => {
            handle_crawl(seed_url, allow, &storage, timeout_secs, max_retries, json).await
        }
        Commands::Visited { storage, json } => handle_visited(&storage, json),
    }
}

// Handles the 'crawl' subcommand: builds the pieces, wires cancellation,
// runs the engine to completion and reports.
async fn handle_crawl(
    seed_url: String,
    allow: Vec<String>,
    storage: &Path,
    timeout_secs: u64,
    max_retries: u32,
    json: bool,
) -> Result<i32> {
    // Sanity-check the seed before doing any I/O. Discovered links may be
    // all sorts of garbage (the fetcher deals with that branch by branch),
    // but a seed that can't be fetched means the whole run is pointless.
    Url::parse(&seed_url).with_context(|| format!("invalid seed URL '{}'", seed_url))?;

    println!("🔍 Crawling from: {}", seed_url);
    println!("🧭 Allow-list: {}", allow.join(", "));
    println!("💾 Storage: {}", storage.display());

    // The visited store is load-bearing: if it can't be opened we must
    // not crawl at all, or a cyclic site would loop forever
    let store = VisitedStore::open(storage).context("cannot use the storage directory")?;
    if !store.is_empty() {
        println!("📒 Visited record: {} URL(s) from earlier runs", store.len());
    }

    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(timeout_secs))?);

    let config = CrawlConfig {
        seed_url,
        allow_list: AllowList::new(allow),
        max_retries,
    };

    let mut engine = CrawlEngine::new(config, fetcher, store);

    // Ctrl-C flips the cancellation flag; the engine notices it between
    // pages and winds down cleanly with the record intact
    let cancel = engine.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n🛑 Ctrl-C received, finishing the current page...");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let summary = engine.run().await?;

    print_summary(&summary, json)?;

    if summary.is_clean() {
        Ok(0) // Exit code 0 = every fetch succeeded
    } else {
        Ok(1) // Exit code 1 = finished, but some branches failed
    }
}

// Handles the 'visited' subcommand: loads the record and lists it.
fn handle_visited(storage: &Path, json: bool) -> Result<i32> {
    let store = VisitedStore::open(storage).context("cannot use the storage directory")?;

    if json {
        let json_output = serde_json::to_string_pretty(store.urls())?;
        println!("{}", json_output);
    } else if store.is_empty() {
        println!("📒 Visited record is empty");
    } else {
        for url in store.urls() {
            println!("{}", url);
        }
        println!();
        println!("📋 Total: {}", store.len());
    }

    Ok(0)
}

// Prints the crawl summary either as text or JSON
fn print_summary(summary: &CrawlSummary, json: bool) -> Result<()> {
    if json {
        // Serialize the summary to JSON and print
        let json_output = serde_json::to_string_pretty(summary)?;
        println!("{}", json_output);
        return Ok(());
    }

    println!();
    println!("📊 Summary:");
    println!("   📄 Pages fetched: {}", summary.pages_fetched);
    println!("   🔗 Links discovered: {}", summary.links_discovered);
    println!("   ⏭️  Skipped (already visited): {}", summary.skipped_visited);
    println!("   🚧 Skipped (out of scope): {}", summary.skipped_out_of_scope);
    println!("   ❌ Fetch failures: {}", summary.fetch_failures);
    if summary.cancelled {
        println!("   🛑 Run was cancelled - rerun to resume");
    }

    Ok(())
}
