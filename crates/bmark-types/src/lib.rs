//! Shared types for bmark components.
//!
//! This crate provides the data types exchanged between the bmark daemon and
//! its clients. All types are serializable for RPC transport.

use serde::{Deserialize, Serialize};

/// Maximum number of entries in any result sequence the query service emits.
pub const MAX_RESULTS: usize = 10;

/// A single URL-bearing bookmark from the host browser store.
///
/// Entries are produced only by the store backend and never constructed by
/// the UI. A node without a URL is a folder and never reaches a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkEntry {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// Parameters for the `search_bookmarks` method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchBookmarksParams {
    pub query: String,
}

/// Result payload for `get_bookmarks` and `search_bookmarks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookmarksResult {
    pub bookmarks: Vec<BookmarkEntry>,
}

/// Apply the service contract to a raw host-store result: keep only
/// URL-bearing entries, preserve host order, truncate to [`MAX_RESULTS`].
#[must_use]
pub fn cap_results(raw: Vec<BookmarkEntry>) -> Vec<BookmarkEntry> {
    raw.into_iter()
        .filter(|entry| !entry.url.is_empty())
        .take(MAX_RESULTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(id: &str, title: &str, url: &str) -> BookmarkEntry {
        BookmarkEntry {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_bookmark_entry_serde_shape() {
        let e = entry("42", "Rust Book", "https://doc.rust-lang.org/book/");
        let json = serde_json::to_value(&e).unwrap();

        assert_eq!(json["id"], "42");
        assert_eq!(json["title"], "Rust Book");
        assert_eq!(json["url"], "https://doc.rust-lang.org/book/");

        let back: BookmarkEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn test_search_params_deserialize() {
        let params: SearchBookmarksParams =
            serde_json::from_str(r#"{"query": "rust"}"#).unwrap();
        assert_eq!(params.query, "rust");
    }

    #[test]
    fn test_bookmarks_result_default_is_empty() {
        let result = BookmarksResult::default();
        assert!(result.bookmarks.is_empty());
    }

    #[test]
    fn test_cap_results_drops_folders() {
        let raw = vec![
            entry("1", "a", "https://a.example"),
            entry("2", "folder", ""),
            entry("3", "b", "https://b.example"),
        ];

        let capped = cap_results(raw);
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[0].id, "1");
        assert_eq!(capped[1].id, "3");
    }

    #[test]
    fn test_cap_results_truncates_in_host_order() {
        let raw: Vec<_> = (0..25)
            .map(|i| entry(&i.to_string(), &format!("b{i}"), &format!("https://{i}.example")))
            .collect();

        let capped = cap_results(raw);
        assert_eq!(capped.len(), MAX_RESULTS);
        assert_eq!(capped[0].id, "0");
        assert_eq!(capped[9].id, "9");
    }

    proptest! {
        #[test]
        fn prop_cap_results_invariants(
            urls in proptest::collection::vec(proptest::option::of("[a-z]{1,12}"), 0..40)
        ) {
            let raw: Vec<_> = urls
                .iter()
                .enumerate()
                .map(|(i, url)| BookmarkEntry {
                    id: i.to_string(),
                    title: format!("entry {i}"),
                    url: url.clone().map_or(String::new(), |u| format!("https://{u}")),
                })
                .collect();

            let capped = cap_results(raw.clone());

            // Never more than the cap, never an empty url.
            prop_assert!(capped.len() <= MAX_RESULTS);
            prop_assert!(capped.iter().all(|e| !e.url.is_empty()));

            // Host order preserved: ids appear in the same relative order.
            let expected: Vec<_> = raw
                .iter()
                .filter(|e| !e.url.is_empty())
                .take(MAX_RESULTS)
                .map(|e| e.id.clone())
                .collect();
            let got: Vec<_> = capped.iter().map(|e| e.id.clone()).collect();
            prop_assert_eq!(got, expected);
        }
    }
}
