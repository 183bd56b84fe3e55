// src/filter.rs
// =============================================================================
// This module decides whether a URL is "in scope" for the crawl.
//
// The rule is deliberately simple: a URL is in scope if it contains at
// least one entry of the allow-list as a plain substring. No URL parsing,
// no host comparison - "cdn" matches "https://cdn.example.com/x" just as
// well as "https://example.com/cdn/asset.js".
//
// Matching is case-sensitive. The link extractor is case-insensitive, but
// scope entries are compared exactly as the user typed them.
//
// Rust concepts:
// - Newtype structs: Wrapping Vec<String> gives the list a name and an API
// - Borrowing: is_in_scope takes &self and &str, no ownership needed
// =============================================================================

/// The configured set of acceptable path substrings.
///
/// Built once at startup and never modified during a run.
#[derive(Debug, Clone)]
pub struct AllowList {
    entries: Vec<String>,
}

impl AllowList {
    // Creates an allow-list from the entries given on the command line.
    // Order is kept but doesn't affect the outcome - any entry matching
    // is enough.
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    // Returns true if the URL contains at least one allow-list entry.
    //
    // An empty allow-list matches nothing, which makes every URL out of
    // scope and the crawl a no-op. The CLI requires at least one entry,
    // so this only matters for programmatic use.
    pub fn is_in_scope(&self, url: &str) -> bool {
        self.entries.iter().any(|entry| url.contains(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow(entries: &[&str]) -> AllowList {
        AllowList::new(entries.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_single_entry_match() {
        let list = allow(&["cdn"]);
        assert!(list.is_in_scope("https://cdn.example.com/x"));
    }

    #[test]
    fn test_no_entry_matches() {
        let list = allow(&["cdn", "facebook"]);
        assert!(!list.is_in_scope("https://other.example.com/x"));
    }

    #[test]
    fn test_any_entry_is_enough() {
        let list = allow(&["cdn", "facebook"]);
        assert!(list.is_in_scope("https://facebook.com/profile"));
        assert!(list.is_in_scope("https://static.cdn.net/img.png"));
    }

    #[test]
    fn test_substring_can_match_path_not_just_host() {
        let list = allow(&["cdn"]);
        assert!(list.is_in_scope("https://example.com/cdn/asset.js"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let list = allow(&["facebook"]);
        assert!(!list.is_in_scope("https://FACEBOOK.com/"));
    }

    #[test]
    fn test_empty_allow_list_matches_nothing() {
        let list = allow(&[]);
        assert!(!list.is_in_scope("https://anything.example.com/"));
    }
}
