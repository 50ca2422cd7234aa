//! Host bookmark store access.
//!
//! The daemon never owns bookmark data. It reaches the browser's store
//! through the [`BookmarkSearch`] primitive and trusts whatever comes back;
//! filtering and capping happen in the request handlers.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use bmark_types::BookmarkEntry;

/// Search primitive over the host bookmark store.
///
/// An empty query returns the full store contents. Entries come back in host
/// order; implementations do no ranking of their own.
pub trait BookmarkSearch: Send + Sync {
    fn search(&self, query: &str) -> Vec<BookmarkEntry>;
}

/// Chromium-family profile directories, relative to `~/.config`, that may
/// hold a `Default/Bookmarks` file. First existing file wins.
const CHROMIUM_CONFIG_DIRS: &[&str] = &[
    "google-chrome",
    "chromium",
    "BraveSoftware/Brave-Browser",
    "microsoft-edge",
];

/// Store backed by a Chromium-family `Bookmarks` JSON file.
///
/// The file is re-read on every call; the daemon keeps no copy of its own, so
/// edits made in the browser are visible on the next query.
pub struct ChromiumStore {
    path: Option<PathBuf>,
}

impl ChromiumStore {
    /// Create a store reading from an explicit file, or discovering one from
    /// the known Chromium profile locations when `path` is `None`.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// The bookmarks file this store would read right now, if any.
    #[must_use]
    pub fn bookmarks_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            return Some(path.clone());
        }

        let home = dirs::home_dir()?;
        CHROMIUM_CONFIG_DIRS
            .iter()
            .map(|dir| home.join(format!(".config/{dir}/Default/Bookmarks")))
            .find(|candidate| candidate.exists())
    }

    fn load(&self) -> Vec<BookmarkEntry> {
        let Some(path) = self.bookmarks_path() else {
            debug!("No Chromium bookmarks file found");
            return Vec::new();
        };

        match read_bookmarks_file(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read bookmarks file {:?}: {}", path, e);
                Vec::new()
            }
        }
    }
}

impl BookmarkSearch for ChromiumStore {
    fn search(&self, query: &str) -> Vec<BookmarkEntry> {
        let entries = self.load();
        if query.is_empty() {
            return entries;
        }
        entries
            .into_iter()
            .filter(|entry| matches_query(entry, query))
            .collect()
    }
}

/// Parse a Chromium `Bookmarks` file into entries, in traversal order.
fn read_bookmarks_file(path: &Path) -> std::io::Result<Vec<BookmarkEntry>> {
    let contents = std::fs::read_to_string(path)?;
    let json: serde_json::Value = serde_json::from_str(&contents)?;

    let mut entries = Vec::new();
    collect_url_nodes(&json["roots"], &mut entries);

    debug!("Loaded {} bookmarks from {:?}", entries.len(), path);
    Ok(entries)
}

/// Walk a Chromium bookmark tree, collecting URL-bearing nodes. Nodes without
/// a `url` field are folders and contribute only their children.
fn collect_url_nodes(node: &serde_json::Value, entries: &mut Vec<BookmarkEntry>) {
    let Some(obj) = node.as_object() else {
        return;
    };

    if let Some(url) = obj.get("url").and_then(|u| u.as_str()) {
        let id = obj
            .get("id")
            .and_then(|i| i.as_str())
            .map_or_else(|| entries.len().to_string(), String::from);
        let title = obj
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or(url)
            .to_string();

        entries.push(BookmarkEntry {
            id,
            title,
            url: url.to_string(),
        });
    }

    if let Some(children) = obj.get("children").and_then(|c| c.as_array()) {
        for child in children {
            collect_url_nodes(child, entries);
        }
    }

    // The top-level "roots" object keys its folders by name.
    for key in ["bookmark_bar", "other", "synced"] {
        if let Some(child) = obj.get(key) {
            collect_url_nodes(child, entries);
        }
    }
}

/// Free-text match: every whitespace-separated term must occur in the title
/// or the URL, case-insensitively.
fn matches_query(entry: &BookmarkEntry, query: &str) -> bool {
    let title = entry.title.to_lowercase();
    let url = entry.url.to_lowercase();
    query
        .split_whitespace()
        .all(|term| {
            let term = term.to_lowercase();
            title.contains(&term) || url.contains(&term)
        })
}

/// In-memory store used by tests and demos.
pub struct StaticStore {
    entries: Vec<BookmarkEntry>,
}

impl StaticStore {
    #[must_use]
    pub fn new(entries: Vec<BookmarkEntry>) -> Self {
        Self { entries }
    }
}

impl BookmarkSearch for StaticStore {
    fn search(&self, query: &str) -> Vec<BookmarkEntry> {
        if query.is_empty() {
            return self.entries.clone();
        }
        self.entries
            .iter()
            .filter(|entry| matches_query(entry, query))
            .cloned()
            .collect()
    }
}
