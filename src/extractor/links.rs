// src/extractor/links.rs
// =============================================================================
// This module extracts URLs from raw page text using a regular expression.
//
// Why regex instead of an HTML parser?
// - We scan the raw body as one big string, so links hiding in JavaScript,
//   JSON blobs or plain text are found too, not just <a href> tags
// - No DOM building means less memory and fewer moving parts
// - The tradeoff: we may pick up strings that only look like URLs; the
//   fetcher rejects those later and the crawl just skips that branch
//
// Rust concepts:
// - Statics with Lazy: Compile the regex once, reuse it everywhere
// - Iterators: captures_iter() walks all matches lazily
// - Raw strings (r"..."): No double-escaping of backslashes
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;

// The URL grammar, compiled once on first use.
//
// Reading the pattern left to right:
//   (?ims)          - case-insensitive, multi-line, '.' matches newlines
//   (?:^|\W)        - a URL starts at the beginning of text or after a
//                     non-word character (so "xhttp://..." is not a match)
//   (?:ht|f)tps?:// - the schemes http, https, ftp, ftps
//   |www\.          - ...or a bare "www." with no scheme at all
//   (?:[\w-]+\.)+?  - one or more dot-terminated host labels (lazy, so the
//                     path part below gets its fair share)
//   (?:[\w\-.~]+/?)* - more host/path segments, optionally slash-separated
//   [...]*          - the extended tail set: query strings, fragments,
//                     parentheses, brackets and other characters that
//                     legitimately appear in URLs
//
// The outer capture group spans from the scheme (or "www.") to the end of
// the match, which is exactly the substring we want to crawl next.
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ims)(?:^|\W)((?:(?:ht|f)tps?://|www\.)(?:[\w-]+\.)+?(?:[\w\-.~]+/?)*[0-9a-z.,%_=?&#\-+()\[\]*$~@!:/{};']*)",
    )
    .expect("URL pattern is a valid regex")
});

// Extracts every URL-shaped substring from a page body.
//
// Guarantees:
// - Order preserving: the first match in the text is first in the output
// - NOT deduplicating: a page that links to the same URL three times
//   produces three entries; the visited store is the single place where
//   dedup happens
// - Pure: same input always produces the same output, no side effects
//
// Example:
//   extract_links("visit http://a.com/page1 and www.b.org/x?y=1 now")
//   => ["http://a.com/page1", "www.b.org/x?y=1"]
pub fn extract_links(body: &str) -> Vec<String> {
    URL_REGEX
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is Lazy?
//    - A static that is initialized the first time it's accessed
//    - Compiling a regex is expensive; doing it once per process is free
//      after that
//    - From the once_cell crate (std has OnceLock, but Lazy reads nicer)
//
// 2. What is captures_iter?
//    - Returns an iterator over every non-overlapping match in the text
//    - Each item gives access to the capture groups of that match
//    - caps.get(1) is our outer group; get(0) would be the whole match
//      including the leading non-word character we don't want
//
// 3. Why filter_map?
//    - get(1) returns Option<Match> (a group can fail to participate)
//    - filter_map keeps the Some values and unwraps them in one step
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_scheme_and_www_links_in_order() {
        let body = "visit http://a.com/page1 and www.b.org/x?y=1 now";
        let links = extract_links(body);
        assert_eq!(links, vec!["http://a.com/page1", "www.b.org/x?y=1"]);
    }

    #[test]
    fn test_extraction_is_pure_and_restartable() {
        let body = "see https://example.com/a and https://example.com/b";
        let first = extract_links(body);
        let second = extract_links(body);
        assert_eq!(first, second);
    }

    #[test]
    fn test_match_at_start_of_text() {
        let links = extract_links("https://start.example.com/here trailing words");
        assert_eq!(links, vec!["https://start.example.com/here"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let body = "http://a.com/x then http://a.com/x again http://a.com/x";
        let links = extract_links(body);
        assert_eq!(links.len(), 3);
    }

    #[test]
    fn test_case_insensitive_schemes() {
        let links = extract_links("go to HTTPS://Example.COM/Path now");
        assert_eq!(links, vec!["HTTPS://Example.COM/Path"]);
    }

    #[test]
    fn test_ftp_schemes_recognized() {
        let body = "mirror at ftp://files.example.org/pub and ftps://secure.example.org/";
        let links = extract_links(body);
        assert_eq!(
            links,
            vec!["ftp://files.example.org/pub", "ftps://secure.example.org/"]
        );
    }

    #[test]
    fn test_no_match_inside_a_word() {
        // "xhttp" is not preceded by a non-word character, so no match
        let links = extract_links("xhttp://not-a-link.com");
        assert!(links.is_empty());
    }

    #[test]
    fn test_query_and_fragment_characters() {
        let body = r#"<a href="https://shop.example.com/item?id=42&ref=home#top">"#;
        let links = extract_links(body);
        assert_eq!(links, vec!["https://shop.example.com/item?id=42&ref=home#top"]);
    }

    #[test]
    fn test_scans_across_newlines() {
        let body = "first line\nhttp://multi.example.com/a\nlast line";
        let links = extract_links(body);
        assert_eq!(links, vec!["http://multi.example.com/a"]);
    }

    #[test]
    fn test_empty_body_yields_nothing() {
        assert!(extract_links("").is_empty());
        assert!(extract_links("no links in here at all").is_empty());
    }
}
