// src/store/visited.rs
// =============================================================================
// This module persists the set of URLs we have already fetched.
//
// Design:
// - An in-memory HashSet answers "have we seen this URL?" in O(1)
// - An append-only log file ("alreadydone.txt") mirrors the set on disk,
//   one record per line, so a later run picks up where this one stopped
// - On startup we rebuild the set from the log; on every mark we append
//   one record and flush before returning
//
// Why not just scan the file on every check?
// - A substring scan over the whole file gives false positives: once
//   "https://a.com/page" is recorded, "https://a.com/pag" would look
//   visited too. Exact set membership has no such overlap problem.
//
// The record format is `URL + "!" + newline`. URLs never contain a bare
// "!" followed by end-of-line in practice, and the trailing marker lets
// us detect (and skip) a record that was cut short by a crash mid-write.
//
// Rust concepts:
// - HashSet: O(1) membership for exact strings
// - OpenOptions: Fine-grained control over how a file is opened
// - sync_data: Forces the OS to put bytes on disk, not just in cache
// =============================================================================

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Name of the on-disk visited record inside the storage directory.
pub const RECORD_FILE: &str = "alreadydone.txt";

// Storage problems are fatal to the whole crawl: without a working
// visited record we can't guarantee termination on cyclic link graphs.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not create storage directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not open visited record {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not append to visited record {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The durable set of URLs a fetch has already been attempted for.
///
/// Entries are only ever added, never removed. A URL present here is
/// never fetched again, in this run or any later one against the same
/// storage directory.
pub struct VisitedStore {
    // Exact membership checks
    seen: HashSet<String>,
    // Insertion order, kept for listing the record back to the user
    order: Vec<String>,
    // Open handle in append mode; every mark writes one record here
    log: File,
    // Path to the record, kept for error messages
    path: PathBuf,
}

impl VisitedStore {
    // Opens (or creates) the visited record inside `storage_dir` and
    // rebuilds the in-memory set from it.
    pub fn open(storage_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(storage_dir).map_err(|source| StoreError::CreateDir {
            path: storage_dir.to_path_buf(),
            source,
        })?;

        let path = storage_dir.join(RECORD_FILE);

        // Open for reading AND appending, creating the file if this is
        // the first run against this storage directory
        let mut log = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|source| StoreError::Open {
                path: path.clone(),
                source,
            })?;

        let mut contents = String::new();
        log.read_to_string(&mut contents)
            .map_err(|source| StoreError::Open {
                path: path.clone(),
                source,
            })?;

        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for line in contents.lines() {
            // A complete record ends with the "!" marker; anything else
            // is a torn write from a crashed run and gets skipped
            let Some(url) = line.strip_suffix('!') else {
                continue;
            };
            if url.is_empty() {
                continue;
            }
            if seen.insert(url.to_string()) {
                order.push(url.to_string());
            }
        }

        Ok(Self {
            seen,
            order,
            log,
            path,
        })
    }

    // True iff a fetch was already attempted for this exact URL.
    pub fn is_visited(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    // Records the URL durably. When this returns Ok, the record is on
    // disk - a crash immediately afterwards loses nothing.
    pub fn mark_visited(&mut self, url: &str) -> Result<(), StoreError> {
        if self.seen.contains(url) {
            return Ok(());
        }

        let record = format!("{url}!\n");
        self.log
            .write_all(record.as_bytes())
            .and_then(|_| self.log.sync_data())
            .map_err(|source| StoreError::Append {
                path: self.path.clone(),
                source,
            })?;

        self.seen.insert(url.to_string());
        self.order.push(url.to_string());
        Ok(())
    }

    // URLs in the order they were first recorded.
    pub fn urls(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why both a HashSet and a Vec?
//    - HashSet gives O(1) "have we seen it?" but has no stable order
//    - The Vec remembers first-recorded order for the `visited` command
//    - Both hold the same strings; the memory cost is two small Strings
//      per URL, which is what the dedup guarantee costs
//
// 2. What does sync_data() do?
//    - write_all() hands bytes to the OS, which may keep them in RAM
//    - sync_data() blocks until the bytes are physically on disk
//    - Slower per write, but the whole point of this store is surviving
//      a crash, so we pay it on every mark
//
// 3. What is let-else?
//    - `let Some(url) = ... else { continue; }` binds on success and
//      runs the else block (which must diverge) on failure
//    - Cleaner than match when the failure path just skips
// -----------------------------------------------------------------------------
