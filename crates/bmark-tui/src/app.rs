//! Palette state and transitions.
//!
//! [`App`] owns everything the palette displays: open/closed state, the query
//! text, the current result set, and the selection. State methods return a
//! [`FetchSpec`] when a transition requires a round trip to the daemon; the
//! event loop performs the dispatch so the state stays testable.

use bmark_types::BookmarkEntry;

/// A fetch the palette wants dispatched. `query: None` is the unfiltered
/// fetch-all issued when the palette opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSpec {
    pub seq: u64,
    pub query: Option<String>,
}

/// One selectable row of the palette list.
#[derive(Debug, PartialEq, Eq)]
pub enum Row<'a> {
    Bookmark(&'a BookmarkEntry),
    /// Synthetic trailing entry offering a web search for the literal query.
    WebSearch(&'a str),
}

/// Palette state. Re-initialized per process run; nothing persists.
#[derive(Default)]
pub struct App {
    pub open: bool,
    pub input: String,
    pub results: Vec<BookmarkEntry>,
    pub selected: usize,
    /// One informational channel notice per open event.
    pub notice_logged: bool,
    pub should_quit: bool,
    /// Sequence of the latest dispatched (or invalidated) fetch. Outcomes
    /// carrying an older sequence are discarded, which orders overlapping
    /// requests without cancelling them.
    seq: u64,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Flip open/closed. Opening requests the unfiltered bookmark list so the
    /// palette has content before any typing; closing never requests.
    pub fn toggle(&mut self) -> Option<FetchSpec> {
        if self.open {
            self.close();
            return None;
        }

        self.open = true;
        self.notice_logged = false;
        Some(FetchSpec {
            seq: self.next_seq(),
            query: None,
        })
    }

    /// Close the palette, clearing query and results. In-flight responses are
    /// invalidated so they cannot repopulate a reopened palette.
    pub fn close(&mut self) {
        self.open = false;
        self.input.clear();
        self.results.clear();
        self.selected = 0;
        self.seq += 1;
    }

    pub fn push_char(&mut self, c: char) -> Option<FetchSpec> {
        if !self.open {
            return None;
        }
        self.input.push(c);
        self.query_changed()
    }

    pub fn pop_char(&mut self) -> Option<FetchSpec> {
        if !self.open || self.input.pop().is_none() {
            return None;
        }
        self.query_changed()
    }

    /// An empty query clears results locally with no round trip; a non-empty
    /// query asks for a fresh search carrying exactly the typed text.
    fn query_changed(&mut self) -> Option<FetchSpec> {
        self.selected = 0;
        if self.input.is_empty() {
            self.results.clear();
            self.seq += 1;
            return None;
        }

        Some(FetchSpec {
            seq: self.next_seq(),
            query: Some(self.input.clone()),
        })
    }

    /// Accept a fetch outcome if it is still current. Returns false for
    /// superseded sequences and for outcomes arriving after close.
    pub fn apply_outcome(&mut self, seq: u64, entries: Vec<BookmarkEntry>) -> bool {
        if !self.open || seq != self.seq {
            return false;
        }

        self.results = entries;
        let rows = self.row_count();
        if self.selected >= rows {
            self.selected = rows.saturating_sub(1);
        }
        true
    }

    /// Total selectable rows: bookmarks plus the web-search entry whenever the
    /// query is non-empty.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.results.len() + usize::from(!self.input.is_empty())
    }

    #[must_use]
    pub fn rows(&self) -> Vec<Row<'_>> {
        let mut rows: Vec<Row<'_>> = self.results.iter().map(Row::Bookmark).collect();
        if !self.input.is_empty() {
            rows.push(Row::WebSearch(&self.input));
        }
        rows
    }

    #[must_use]
    pub fn selected_row(&self) -> Option<Row<'_>> {
        let mut rows = self.rows();
        if self.selected < rows.len() {
            Some(rows.swap_remove(self.selected))
        } else {
            None
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.row_count() {
            self.selected += 1;
        }
    }
}
