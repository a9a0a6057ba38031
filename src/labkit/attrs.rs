//! Typed parsing of the component attribute surface.
//!
//! Widgets are configured through string attributes (`sort`, `filter`,
//! `tags`, `category`, `title`, `duration`, `updated`, `selected`,
//! `survey-id`). This module is the single boundary where those strings
//! become typed values; past it, the rest of the crate works with the types
//! in [`crate::model`]. Malformed values never fail — each parser degrades
//! to a documented default (duration 0, no date, default sort order).

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{Card, SortKey, Step};
use crate::normalize::split_list;

/// The attribute-shaped input for one card, as ingested from a raw link or
/// record. All fields are raw attribute strings.
#[derive(Debug, Clone, Default)]
pub struct RawCard {
    pub title: String,
    pub category: String,
    pub tags: String,
    pub duration: String,
    pub updated: String,
}

impl RawCard {
    /// Normalizes the raw record into a [`Card`]. The title is kept verbatim
    /// for display and alphabetical ordering; tags and categories are
    /// comma-split and normalized; duration and date degrade to `0` and
    /// `None` on malformed input.
    pub fn into_card(self) -> Card {
        Card {
            categories: split_list(&self.category),
            tags: split_list(&self.tags),
            duration_minutes: parse_duration(&self.duration),
            updated: parse_updated(&self.updated),
            title: self.title,
            visible: true,
        }
    }
}

/// The attribute-shaped input for one walkthrough step.
#[derive(Debug, Clone, Default)]
pub struct RawStep {
    pub label: String,
    pub duration: String,
}

impl RawStep {
    pub fn into_step(self, index: usize) -> Step {
        Step {
            index,
            label: self.label,
            duration_minutes: parse_duration(&self.duration),
        }
    }
}

/// Parses a duration attribute as whole minutes. Like the lenient integer
/// parsing the attribute surface has always had, a numeric prefix counts
/// (`"10 min"` is 10) and anything else is 0.
pub fn parse_duration(raw: &str) -> u32 {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Parses an `updated` date attribute. Accepts RFC 3339 timestamps and bare
/// `YYYY-MM-DD` dates (taken as midnight UTC); anything else is `None`.
pub fn parse_updated(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    tracing::debug!(value = raw, "unparseable updated date, treating as unset");
    None
}

/// Parses a `selected` step attribute or URL fragment. Out-of-range values
/// are fine (the sequencer clamps); non-numeric values are `None`.
pub fn parse_selected(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Parses a `sort` attribute, degrading unknown values to the default.
pub fn parse_sort(raw: &str) -> SortKey {
    raw.trim().parse().unwrap_or_default()
}
