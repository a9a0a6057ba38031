//! Core data types shared by the widgets: cards, sort keys, filter specs,
//! steps, and the navigation cursor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::normalize::{normalize, slugify, split_list};

/// The active ordering criterion for a card index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Alpha,
    Recent,
    Duration,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Alpha => "alpha",
            SortKey::Recent => "recent",
            SortKey::Duration => "duration",
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = std::convert::Infallible;

    /// Unknown values degrade to the default order rather than failing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "recent" => SortKey::Recent,
            "duration" => SortKey::Duration,
            _ => SortKey::Alpha,
        })
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tutorial entry in a card index.
///
/// Identity is the card's position in the owning [`CardCollection`]; cards
/// are never merged or deduplicated. The `tags` and `categories` fields hold
/// normalized entries (see [`crate::normalize`]), while `title` keeps the raw
/// attribute value for display and case-sensitive alphabetical ordering.
///
/// [`CardCollection`]: crate::cards::CardCollection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub duration_minutes: u32,
    pub updated: Option<DateTime<Utc>>,
    pub visible: bool,
}

impl Card {
    /// The card's canonical category slug: the first category entry,
    /// slugified. Hosts that render a single category badge use this;
    /// filtering matches against all entries.
    pub fn primary_category(&self) -> Option<String> {
        self.categories.first().map(|c| slugify(c))
    }
}

/// The combined text/tag/category predicate restricting visible cards.
///
/// The three groups combine with AND; within the tag and category groups a
/// card matches if its set intersects the spec's set (OR across selected
/// values). An empty spec matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub text: String,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

impl FilterSpec {
    /// Builds a spec from raw attribute values (`filter`, `tags`,
    /// `category`), normalizing each at the boundary.
    pub fn from_attrs(filter: &str, tags: &str, category: &str) -> Self {
        Self {
            text: normalize(filter),
            tags: split_list(tags),
            categories: split_list(category),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.tags.is_empty() && self.categories.is_empty()
    }

    /// Pure visibility predicate for a card against this spec.
    pub fn matches(&self, card: &Card) -> bool {
        let matches_text =
            self.text.is_empty() || normalize(&card.title).contains(self.text.as_str());
        let matches_tags = self.tags.is_empty() || intersects(&card.tags, &self.tags);
        let matches_categories =
            self.categories.is_empty() || intersects(&card.categories, &self.categories);
        matches_text && matches_tags && matches_categories
    }
}

/// True if at least one element of `a` appears in `b`.
fn intersects(a: &[String], b: &[String]) -> bool {
    a.iter().any(|v| b.contains(v))
}

/// One page of a multi-step walkthrough. Steps are created once at setup
/// and never added or removed at runtime; `index` is 1-based and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub index: usize,
    pub label: String,
    pub duration_minutes: u32,
}

/// The step cursor. Holds the invariant `current < total` (for non-empty
/// sequences) through every transition; out-of-range jumps clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub current: usize,
    pub total: usize,
}

impl NavigationState {
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    #[must_use]
    pub fn next(self) -> Self {
        self.jump(self.current as i64 + 1)
    }

    #[must_use]
    pub fn prev(self) -> Self {
        self.jump(self.current as i64 - 1)
    }

    /// Clamps `n` into `[0, total - 1]`. A no-op for an empty sequence.
    #[must_use]
    pub fn jump(self, n: i64) -> Self {
        if self.total == 0 {
            return self;
        }
        let current = n.clamp(0, self.total as i64 - 1) as usize;
        Self { current, ..self }
    }
}
