// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "crawlscope",
    version = "0.1.0",
    about = "A web crawler that stays inside an allow-list and never fetches the same URL twice",
    long_about = "crawlscope recursively crawls from a seed URL, following only links that match \
                  an allow-list of path substrings. Every fetched URL is recorded in a durable \
                  visited file, so stopping and restarting never re-fetches a page."
)]
pub struct Cli {
    // The #[command(subcommand)] attribute tells clap that this field
    // will hold one of the subcommands defined in the Commands enum
    #[command(subcommand)]
    pub command: Commands,
}

// This enum defines our subcommands (crawl, visited)
//
// Each variant represents a different subcommand the user can run
// The fields inside each variant become the arguments for that subcommand
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl recursively from a seed URL
    ///
    /// Example: crawlscope crawl https://example.com/ --allow example --storage ./data
    Crawl {
        /// The URL the crawl starts from (must include a scheme)
        seed_url: String,

        /// Allow-list entry: a URL is crawled only if it contains at
        /// least one of these substrings. Repeat the flag for more
        /// entries: --allow cdn --allow example
        #[arg(long = "allow", required = true)]
        allow: Vec<String>,

        /// Directory holding the visited record (created if missing)
        #[arg(long)]
        storage: PathBuf,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,

        /// Extra attempts after a failed fetch (0 = give up immediately)
        #[arg(long, default_value_t = 0)]
        max_retries: u32,

        /// Output the final summary in JSON format instead of text
        #[arg(long)]
        json: bool,
    },

    /// List every URL in the visited record
    ///
    /// Example: crawlscope visited --storage ./data
    Visited {
        /// Directory holding the visited record
        #[arg(long)]
        storage: PathBuf,

        /// Output the list in JSON format instead of plain lines
        #[arg(long)]
        json: bool,
    },
}
