//! History mirroring: keeping the browser address bar consistent with
//! in-memory widget state without triggering feedback loops.
//!
//! State flows both ways through [`HistorySync`]:
//! - widget mutation → [`HistorySync::publish_index`] /
//!   [`HistorySync::publish_step`] write the new state into the current
//!   history entry;
//! - browser navigation (back/forward) → the host dispatches a popstate to
//!   the owning widget, which reads the now-current location back through
//!   [`HistorySync::read_location`] while echo suppression is on.
//!
//! The echo-suppression flag is what breaks the loop: while a popstate is
//! being applied, index publishes become no-ops and step publishes replace
//! the current entry instead of pushing a fresh one, so responding to a
//! browser-initiated navigation never creates duplicate entries.
//!
//! ## URL shape
//!
//! Index state lives in the query string (`sort`, `filter`, `tags`, `cat`),
//! step selection in the fragment (`#<stepIndex>`). Default values are
//! removed rather than written empty, keeping shared URLs minimal.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::SortKey;
use crate::normalize::{normalize, split_list};

/// The pieces of widget state representable in a URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlState {
    pub sort: Option<SortKey>,
    pub filter: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub step: Option<usize>,
}

impl UrlState {
    /// Encodes the index portion as a query string. Fields holding their
    /// default value (alpha sort, empty filter/tags/categories) are omitted
    /// entirely.
    pub fn encode_query(&self) -> String {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(key) = self.sort {
            if key != SortKey::default() {
                params.push(("sort", key.as_str().to_string()));
            }
        }
        if !self.filter.is_empty() {
            params.push(("filter", self.filter.clone()));
        }
        if !self.tags.is_empty() {
            params.push(("tags", self.tags.join(",")));
        }
        if !self.categories.is_empty() {
            params.push(("cat", self.categories.join(",")));
        }
        params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Encodes the step portion as a fragment, without the leading `#`.
    pub fn encode_fragment(&self) -> String {
        self.step.map(|s| s.to_string()).unwrap_or_default()
    }

    /// Decodes a query string and fragment back into state. Unknown
    /// parameters are ignored; malformed values degrade the same way the
    /// attribute boundary degrades them (unknown sort → default, bad step →
    /// none), so a hand-edited URL can never fail to load.
    pub fn decode(query: &str, fragment: &str) -> Self {
        let mut state = UrlState::default();
        for pair in query
            .trim_start_matches('?')
            .split('&')
            .filter(|p| !p.is_empty())
        {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            match key {
                "sort" => state.sort = Some(value.parse().unwrap_or_default()),
                "filter" => state.filter = normalize(&value),
                "tags" => state.tags = split_list(&value),
                "cat" => state.categories = split_list(&value),
                _ => {}
            }
        }

        let fragment = fragment.trim_start_matches('#');
        if !fragment.is_empty() {
            state.step = fragment
                .parse::<i64>()
                .ok()
                .map(|n| n.max(0) as usize);
        }
        state
    }
}

/// Abstract handle on the browser's single current URL/history entry.
///
/// A path is the part after the document: `?query#fragment`, either piece
/// optional. Production hosts bridge this to the real history API;
/// [`NoopHistory`] is the no-op-history mode and [`RecordingHistory`] is the
/// test double, mirroring how storage backends split in this crate.
pub trait HistoryHandle {
    /// Replaces the current history entry.
    fn replace(&mut self, path: &str);

    /// Pushes a new history entry and makes it current.
    fn push(&mut self, path: &str);

    /// The current entry's path.
    fn location(&self) -> String;
}

/// Lets several widgets share one history in a single-threaded host.
impl<H: HistoryHandle> HistoryHandle for Rc<RefCell<H>> {
    fn replace(&mut self, path: &str) {
        self.borrow_mut().replace(path);
    }

    fn push(&mut self, path: &str) {
        self.borrow_mut().push(path);
    }

    fn location(&self) -> String {
        self.borrow().location()
    }
}

/// History handle that goes nowhere: publishes are dropped and the location
/// is always empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHistory;

impl HistoryHandle for NoopHistory {
    fn replace(&mut self, _path: &str) {}
    fn push(&mut self, _path: &str) {}
    fn location(&self) -> String {
        String::new()
    }
}

/// In-memory history with a back/forward cursor, for tests and headless
/// hosts. `back`/`forward` move the cursor the way browser navigation does;
/// the host is expected to dispatch a popstate to its widgets afterwards.
#[derive(Debug, Clone)]
pub struct RecordingHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl RecordingHistory {
    pub fn new() -> Self {
        Self {
            entries: vec![String::new()],
            cursor: 0,
        }
    }

    pub fn back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn forward(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }
}

impl Default for RecordingHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryHandle for RecordingHistory {
    fn replace(&mut self, path: &str) {
        self.entries[self.cursor] = path.to_string();
    }

    fn push(&mut self, path: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(path.to_string());
        self.cursor += 1;
    }

    fn location(&self) -> String {
        self.entries[self.cursor].clone()
    }
}

/// Bidirectional bridge between one widget's state and the address bar.
///
/// Each widget owns its own `HistorySync` (and thereby its own suppression
/// flag); widgets on the same page share the underlying handle through
/// `Rc<RefCell<_>>`. Publishing preserves the half of the path the widget
/// does not own: index publishes keep the current fragment, step publishes
/// keep the current query.
#[derive(Debug)]
pub struct HistorySync<H: HistoryHandle> {
    history: H,
    suppress_echo: bool,
}

impl<H: HistoryHandle> HistorySync<H> {
    pub fn new(history: H) -> Self {
        Self {
            history,
            suppress_echo: false,
        }
    }

    /// Mirrors index state into the query string of the current entry
    /// (replace, never push). A no-op while a popstate is being applied.
    pub fn publish_index(&mut self, state: &UrlState) {
        if self.suppress_echo {
            return;
        }
        let (_, fragment) = split_path(&self.history.location());
        let path = compose_path(&state.encode_query(), &fragment);
        self.history.replace(&path);
    }

    /// Mirrors the selected step into the fragment. Pushes a fresh entry so
    /// back/forward traverse step history — except while a popstate is being
    /// applied, when the current entry is replaced instead.
    pub fn publish_step(&mut self, step: usize) {
        let (query, _) = split_path(&self.history.location());
        let path = compose_path(&query, &step.to_string());
        if self.suppress_echo {
            self.history.replace(&path);
        } else {
            self.history.push(&path);
        }
    }

    /// Decodes the now-current location, for replaying browser-initiated
    /// navigation back into widget state.
    pub fn read_location(&self) -> UrlState {
        let (query, fragment) = split_path(&self.history.location());
        UrlState::decode(&query, &fragment)
    }

    /// Turns echo suppression on or off. The owning widget sets it
    /// immediately before re-applying popstate state and clears it
    /// immediately after, guaranteeing at most one re-entrant state
    /// application per popstate event.
    pub fn set_suppress_echo(&mut self, on: bool) {
        self.suppress_echo = on;
    }

    pub fn suppressed(&self) -> bool {
        self.suppress_echo
    }

    pub fn handle(&self) -> &H {
        &self.history
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.history
    }
}

/// Splits a `?query#fragment` path into its two pieces, both without their
/// leading marker.
fn split_path(path: &str) -> (String, String) {
    let (rest, fragment) = path.split_once('#').unwrap_or((path, ""));
    let query = rest.trim_start_matches('?');
    (query.to_string(), fragment.to_string())
}

fn compose_path(query: &str, fragment: &str) -> String {
    let mut path = String::new();
    if !query.is_empty() {
        path.push('?');
        path.push_str(query);
    }
    if !fragment.is_empty() {
        path.push('#');
        path.push_str(fragment);
    }
    path
}
