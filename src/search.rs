//! Substring search over the document store.
//!
//! The engine performs a case-insensitive, literal scan of every stored
//! document — no tokenization, stemming, or relevance ranking. Results are
//! ordered by discovery, with a single `max_results` value capping both the
//! matches collected per document and the number of matching documents.
//!
//! # Algorithm
//!
//! 1. Fold content and query to lowercase, one character at a time, so match
//!    positions are zero-based **character** offsets into the original text.
//! 2. Scan left to right for non-overlapping occurrences: after a match at
//!    `p`, the scan resumes at `p + query_len`.
//! 3. For each occurrence, slice a context window of `context_length`
//!    characters on each side, trim surrounding whitespace, and build a
//!    preview with every occurrence of the query wrapped in `**…**`.
//! 4. Stop collecting per document at `max_results` matches; stop collecting
//!    documents at `max_results` results.
//!
//! `total_matches` reports the capped count, not the true occurrence count
//! beyond the cap — counts always describe the returned set.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::config::SearchConfig;
use crate::store::DocumentStore;

/// Marker wrapped around query occurrences in previews.
const HIGHLIGHT_OPEN: &str = "**";
const HIGHLIGHT_CLOSE: &str = "**";

/// One located occurrence of the query within a document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    /// Zero-based character offset of the match start within the content.
    pub position: usize,
    /// Bounded text surrounding the match, whitespace-trimmed.
    pub context: String,
    /// `context` with every query occurrence highlighted.
    pub preview: String,
}

/// All matches found in a single document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub doc_id: String,
    pub filename: String,
    /// Count of the returned matches (capped by `max_results`).
    pub total_matches: usize,
    pub matches: Vec<SearchMatch>,
    /// Document metadata: pages, sizeBytes, createdAt, info.
    pub metadata: serde_json::Value,
}

/// Response for a single query, matching the `search` tool payload shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    /// Documents in the store at query time.
    pub total_documents: usize,
    /// Documents with at least one match (capped by `max_results`).
    pub results_found: usize,
    pub results: Vec<SearchResult>,
}

/// Run a query against every document in the store.
///
/// `max_results` and `context_length` fall back to the configured defaults
/// when absent. Empty queries and non-positive limits are rejected; scanning
/// itself never fails on any text content.
pub fn search_documents(
    store: &DocumentStore,
    query: &str,
    max_results: Option<i64>,
    context_length: Option<i64>,
    defaults: &SearchConfig,
) -> Result<SearchResponse> {
    if query.trim().is_empty() {
        bail!("query must not be empty");
    }

    let max_results = max_results.unwrap_or(defaults.max_results);
    if max_results < 1 {
        bail!("invalid maxResults: {} (must be a positive integer)", max_results);
    }
    let max_results = max_results as usize;

    let context_length = context_length.unwrap_or(defaults.context_length);
    if context_length < 0 {
        bail!("invalid contextLength: {} (must not be negative)", context_length);
    }
    let context_length = context_length as usize;

    let docs = store.list();
    let total_documents = docs.len();
    let query_chars: Vec<char> = query.chars().map(fold_char).collect();

    let mut results: Vec<SearchResult> = Vec::new();
    for doc in &docs {
        if results.len() == max_results {
            break;
        }

        let content: Vec<char> = doc.content.chars().collect();
        let folded: Vec<char> = content.iter().map(|&c| fold_char(c)).collect();
        let matches = scan_content(&content, &folded, &query_chars, context_length, max_results);
        if matches.is_empty() {
            continue;
        }

        results.push(SearchResult {
            doc_id: doc.id.clone(),
            filename: doc.filename.clone(),
            total_matches: matches.len(),
            matches,
            metadata: doc.metadata_value(),
        });
    }

    Ok(SearchResponse {
        query: query.to_string(),
        total_documents,
        results_found: results.len(),
        results,
    })
}

/// Per-character lowercase fold.
///
/// Takes only the first character of a multi-char lowering so the folded
/// text stays position-aligned with the original.
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Collect up to `cap` non-overlapping matches in one document.
fn scan_content(
    content: &[char],
    folded: &[char],
    query: &[char],
    context_length: usize,
    cap: usize,
) -> Vec<SearchMatch> {
    let qlen = query.len();
    let mut matches = Vec::new();
    if qlen == 0 || qlen > folded.len() {
        return matches;
    }

    let mut pos = 0;
    while pos + qlen <= folded.len() && matches.len() < cap {
        if folded[pos..pos + qlen] == *query {
            matches.push(build_match(content, folded, query, pos, context_length));
            pos += qlen;
        } else {
            pos += 1;
        }
    }
    matches
}

/// Build the context window and highlighted preview for one occurrence.
fn build_match(
    content: &[char],
    folded: &[char],
    query: &[char],
    pos: usize,
    context_length: usize,
) -> SearchMatch {
    let qlen = query.len();
    let start = pos.saturating_sub(context_length);
    let end = (pos + qlen + context_length).min(content.len());

    // Trim surrounding whitespace off the window, keeping the folded slice
    // aligned for the highlight pass.
    let window = &content[start..end];
    let lead = window.iter().take_while(|c| c.is_whitespace()).count();
    let trail = window[lead..]
        .iter()
        .rev()
        .take_while(|c| c.is_whitespace())
        .count();
    let trimmed = &content[start + lead..end - trail];
    let trimmed_folded = &folded[start + lead..end - trail];

    SearchMatch {
        position: pos,
        context: trimmed.iter().collect(),
        preview: highlight(trimmed, trimmed_folded, query),
    }
}

/// Wrap every occurrence of the query in the highlight marker.
///
/// Re-runs the same literal matcher used for position finding over the
/// folded slice, so highlighting can never disagree with the located
/// matches regardless of what characters the query contains.
fn highlight(original: &[char], folded: &[char], query: &[char]) -> String {
    let qlen = query.len();
    let mut out = String::with_capacity(original.len() + 2 * (HIGHLIGHT_OPEN.len() + HIGHLIGHT_CLOSE.len()));
    let mut i = 0;
    while i < original.len() {
        if i + qlen <= folded.len() && folded[i..i + qlen] == *query {
            out.push_str(HIGHLIGHT_OPEN);
            out.extend(&original[i..i + qlen]);
            out.push_str(HIGHLIGHT_CLOSE);
            i += qlen;
        } else {
            out.push(original[i]);
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentStore;
    use serde_json::Value;

    fn store_with(contents: &[&str]) -> DocumentStore {
        let store = DocumentStore::new();
        for (i, content) in contents.iter().enumerate() {
            store.register(
                &format!("doc{}.txt", i),
                content.to_string(),
                0,
                content.len() as u64,
                Value::Null,
            );
        }
        store
    }

    fn search(
        store: &DocumentStore,
        query: &str,
        max_results: Option<i64>,
        context_length: Option<i64>,
    ) -> Result<SearchResponse> {
        search_documents(store, query, max_results, context_length, &SearchConfig::default())
    }

    #[test]
    fn test_match_positions_and_context() {
        let store = store_with(&["the quick brown fox the quick fox"]);
        let response = search(&store, "quick", Some(10), Some(5)).unwrap();

        assert_eq!(response.total_documents, 1);
        assert_eq!(response.results_found, 1);
        let result = &response.results[0];
        assert_eq!(result.total_matches, 2);
        assert_eq!(result.matches[0].position, 4);
        assert_eq!(result.matches[1].position, 24);
        assert_eq!(result.matches[0].context, "the quick brow");
        assert_eq!(result.matches[0].preview, "the **quick** brow");
        // The trailing window is clipped at the end of the content and the
        // leading space is trimmed off.
        assert_eq!(result.matches[1].context, "the quick fox");
        assert_eq!(result.matches[1].preview, "the **quick** fox");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let store = store_with(&["Quick brown QUICK qUiCk"]);
        let response = search(&store, "quick", None, None).unwrap();
        let result = &response.results[0];
        assert_eq!(result.total_matches, 3);
        let positions: Vec<usize> = result.matches.iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![0, 12, 18]);
        // Previews keep the original casing of the matched text.
        assert!(result.matches[1].preview.contains("**QUICK**"));
    }

    #[test]
    fn test_occurrences_do_not_overlap() {
        let store = store_with(&["aaaa"]);
        let response = search(&store, "aa", None, None).unwrap();
        let positions: Vec<usize> = response.results[0]
            .matches
            .iter()
            .map(|m| m.position)
            .collect();
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn test_per_document_match_cap() {
        let content = "hit ".repeat(20);
        let store = store_with(&[&content]);
        let response = search(&store, "hit", Some(3), Some(4)).unwrap();
        let result = &response.results[0];
        assert_eq!(result.matches.len(), 3);
        // The reported count mirrors the capped list, not the 20 true
        // occurrences.
        assert_eq!(result.total_matches, 3);
    }

    #[test]
    fn test_result_document_cap() {
        let contents: Vec<String> = (0..15).map(|i| format!("error in run {}", i)).collect();
        let refs: Vec<&str> = contents.iter().map(|s| s.as_str()).collect();
        let store = store_with(&refs);

        let response = search(&store, "error", Some(10), None).unwrap();
        assert_eq!(response.total_documents, 15);
        assert_eq!(response.results_found, 10);
        assert_eq!(response.results.len(), 10);
    }

    #[test]
    fn test_empty_store() {
        let store = DocumentStore::new();
        let response = search(&store, "anything", None, None).unwrap();
        assert_eq!(response.total_documents, 0);
        assert_eq!(response.results_found, 0);
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_document_without_match_is_omitted() {
        let store = store_with(&["alpha beta", "gamma delta"]);
        let response = search(&store, "beta", None, None).unwrap();
        assert_eq!(response.total_documents, 2);
        assert_eq!(response.results_found, 1);
        assert_eq!(response.results[0].matches[0].position, 6);
    }

    #[test]
    fn test_context_contains_query_at_expected_offset() {
        let content = "x".repeat(300) + "needle" + &"y".repeat(300);
        let store = store_with(&[&content]);
        let response = search(&store, "needle", None, Some(200)).unwrap();
        let m = &response.results[0].matches[0];
        assert_eq!(m.position, 300);
        // 200 chars of context on each side of the 6-char match.
        assert_eq!(m.context.chars().count(), 406);
        let offset_chars: String = m.context.chars().skip(200).take(6).collect();
        assert_eq!(offset_chars, "needle");
    }

    #[test]
    fn test_positions_are_character_offsets() {
        let store = store_with(&["Ärger im Büro: Ärger"]);
        let response = search(&store, "ärger", None, None).unwrap();
        let positions: Vec<usize> = response.results[0]
            .matches
            .iter()
            .map(|m| m.position)
            .collect();
        assert_eq!(positions, vec![0, 15]);
    }

    #[test]
    fn test_query_with_marker_characters_matches_literally() {
        let store = store_with(&["weights are **bold** here: a*b"]);
        let response = search(&store, "a*b", None, Some(3)).unwrap();
        let result = &response.results[0];
        assert_eq!(result.total_matches, 1);
        assert!(result.matches[0].preview.contains("**a*b**"));

        // Regex-special characters carry no meaning for the matcher.
        let none = search(&store, "a.b", None, None).unwrap();
        assert_eq!(none.results_found, 0);
    }

    #[test]
    fn test_repeated_search_is_idempotent() {
        let store = store_with(&["one two three two one"]);
        let a = search(&store, "two", None, None).unwrap();
        let b = search(&store, "two", None, None).unwrap();
        assert_eq!(serde_json::to_value(&a).unwrap(), serde_json::to_value(&b).unwrap());
    }

    #[test]
    fn test_invalid_arguments_are_rejected() {
        let store = store_with(&["content"]);
        assert!(search(&store, "", None, None).is_err());
        assert!(search(&store, "   ", None, None).is_err());
        assert!(search(&store, "content", Some(0), None).is_err());
        assert!(search(&store, "content", Some(-1), None).is_err());
        assert!(search(&store, "content", None, Some(-1)).is_err());
        // Zero context is valid: the window is exactly the match.
        let response = search(&store, "content", None, Some(0)).unwrap();
        assert_eq!(response.results[0].matches[0].context, "content");
    }
}
