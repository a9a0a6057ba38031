//! The card index: an ordered set of tutorial cards with sort and filter.
//!
//! The collection owns its cards outright. Filtering hides, never removes:
//! the displayed order is always a permutation of the full set, with a
//! `visible` flag per card. Sorting and filtering mirror their state into
//! the address bar through the widget's [`HistorySync`], and browser
//! back/forward replays URL state back in through [`CardCollection::handle_popstate`].

use crate::analytics::{ActionEvent, AnalyticsSink, NullSink};
use crate::attrs::RawCard;
use crate::history::{HistoryHandle, HistorySync, UrlState};
use crate::model::{Card, FilterSpec, SortKey};

/// Analytics category the card index reports under.
const INDEX_CATEGORY: &str = "codelab-index";

pub struct CardCollection<H: HistoryHandle> {
    cards: Vec<Card>,
    /// Display order as indices into `cards`; always a permutation.
    order: Vec<usize>,
    sort_key: SortKey,
    filter: FilterSpec,
    sync: HistorySync<H>,
    analytics: Box<dyn AnalyticsSink>,
}

impl<H: HistoryHandle> CardCollection<H> {
    pub fn new(history: H) -> Self {
        Self {
            cards: Vec::new(),
            order: Vec::new(),
            sort_key: SortKey::default(),
            filter: FilterSpec::default(),
            sync: HistorySync::new(history),
            analytics: Box::new(NullSink),
        }
    }

    pub fn with_analytics(mut self, sink: Box<dyn AnalyticsSink>) -> Self {
        self.analytics = sink;
        self
    }

    /// Ingests one raw record: normalizes its fields, marks it visible, and
    /// appends it to the display order.
    pub fn add_card(&mut self, raw: RawCard) -> &Card {
        let mut card = raw.into_card();
        card.visible = self.filter.matches(&card);
        self.cards.push(card);
        self.order.push(self.cards.len() - 1);
        &self.cards[self.cards.len() - 1]
    }

    /// Re-sorts the display order by `key` and mirrors the key into the URL
    /// (the parameter is removed when the key is the default).
    ///
    /// All three comparators are stable with ties broken by original
    /// insertion order, so sorting is idempotent.
    pub fn set_sort(&mut self, key: SortKey) {
        self.sort_key = key;
        let cards = &self.cards;
        let mut order: Vec<usize> = (0..cards.len()).collect();
        match key {
            SortKey::Alpha => order.sort_by(|&a, &b| cards[a].title.cmp(&cards[b].title)),
            SortKey::Duration => order.sort_by_key(|&i| cards[i].duration_minutes),
            SortKey::Recent => order.sort_by_key(|&i| {
                // Missing timestamps read as the epoch, sorting last.
                std::cmp::Reverse(
                    cards[i]
                        .updated
                        .unwrap_or(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH),
                )
            }),
        }
        self.order = order;

        self.sync.publish_index(&self.url_state());
        if !self.sync.suppressed() {
            self.analytics.action(ActionEvent {
                category: INDEX_CATEGORY.into(),
                action: "sort".into(),
                label: Some(key.as_str().into()),
                value: None,
            });
        }
    }

    /// Recomputes every card's visibility against `spec` and mirrors the
    /// text/tags/categories parameters independently, removing any that are
    /// empty.
    pub fn set_filter(&mut self, spec: FilterSpec) {
        for card in &mut self.cards {
            card.visible = spec.matches(card);
        }
        self.filter = spec;

        self.sync.publish_index(&self.url_state());
        if !self.sync.suppressed() {
            self.analytics.action(ActionEvent {
                category: INDEX_CATEGORY.into(),
                action: "filter".into(),
                label: (!self.filter.text.is_empty()).then(|| self.filter.text.clone()),
                value: None,
            });
        }
    }

    /// Replays the now-current URL state after a browser back/forward, with
    /// echo suppression on so nothing is re-published and no interaction
    /// events are emitted.
    pub fn handle_popstate(&mut self) {
        let state = self.sync.read_location();
        self.sync.set_suppress_echo(true);
        self.apply_url_state(&state);
        self.sync.set_suppress_echo(false);
    }

    fn apply_url_state(&mut self, state: &UrlState) {
        self.set_sort(state.sort.unwrap_or_default());
        self.set_filter(FilterSpec {
            text: state.filter.clone(),
            tags: state.tags.clone(),
            categories: state.categories.clone(),
        });
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Cards in display order, hidden ones included.
    pub fn ordered(&self) -> impl Iterator<Item = &Card> {
        self.order.iter().map(|&i| &self.cards[i])
    }

    /// Cards in display order that pass the current filter.
    pub fn visible(&self) -> impl Iterator<Item = &Card> {
        self.ordered().filter(|card| card.visible)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Distinct category entries across all cards, sorted, for the host's
    /// category select.
    pub fn categories(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .cards
            .iter()
            .flat_map(|card| card.categories.iter().cloned())
            .collect();
        all.sort();
        all.dedup();
        all
    }

    fn url_state(&self) -> UrlState {
        UrlState {
            sort: Some(self.sort_key),
            filter: self.filter.text.clone(),
            tags: self.filter.tags.clone(),
            categories: self.filter.categories.clone(),
            step: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::RecordingHistory;
    use crate::model::FilterSpec;

    fn raw(title: &str, duration: &str, updated: &str) -> RawCard {
        RawCard {
            title: title.into(),
            duration: duration.into(),
            updated: updated.into(),
            ..RawCard::default()
        }
    }

    fn titles<H: HistoryHandle>(collection: &CardCollection<H>) -> Vec<&str> {
        collection.ordered().map(|c| c.title.as_str()).collect()
    }

    fn sample() -> CardCollection<RecordingHistory> {
        let mut collection = CardCollection::new(RecordingHistory::new());
        collection.add_card(raw("Beta", "10", "2020-01-01"));
        collection.add_card(raw("Alpha", "5", "2021-01-01"));
        collection
    }

    #[test]
    fn sorts_by_each_key() {
        let mut collection = sample();

        collection.set_sort(SortKey::Alpha);
        assert_eq!(titles(&collection), vec!["Alpha", "Beta"]);

        collection.set_sort(SortKey::Duration);
        assert_eq!(titles(&collection), vec!["Alpha", "Beta"]);

        collection.set_sort(SortKey::Recent);
        assert_eq!(titles(&collection), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn sorting_is_idempotent_with_insertion_order_ties() {
        let mut collection = CardCollection::new(RecordingHistory::new());
        collection.add_card(raw("B", "5", ""));
        collection.add_card(raw("A", "5", ""));
        collection.add_card(raw("C", "5", ""));

        collection.set_sort(SortKey::Duration);
        let once = titles(&collection)
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();
        collection.set_sort(SortKey::Duration);
        assert_eq!(titles(&collection), once);
        // All durations tie, so insertion order holds even after an
        // intervening alpha sort.
        collection.set_sort(SortKey::Alpha);
        collection.set_sort(SortKey::Duration);
        assert_eq!(titles(&collection), vec!["B", "A", "C"]);
    }

    #[test]
    fn missing_timestamps_sort_last_under_recent() {
        let mut collection = CardCollection::new(RecordingHistory::new());
        collection.add_card(raw("Undated", "0", ""));
        collection.add_card(raw("Dated", "0", "2021-06-01"));

        collection.set_sort(SortKey::Recent);
        assert_eq!(titles(&collection), vec!["Dated", "Undated"]);
    }

    #[test]
    fn filtering_hides_without_removing() {
        let mut collection = sample();
        collection.set_filter(FilterSpec::from_attrs("alpha", "", ""));

        assert_eq!(collection.len(), 2);
        let visible: Vec<_> = collection.visible().map(|c| c.title.as_str()).collect();
        assert_eq!(visible, vec!["Alpha"]);

        collection.set_filter(FilterSpec::default());
        assert_eq!(collection.visible().count(), 2);
    }

    #[test]
    fn filter_applies_to_cards_added_later() {
        let mut collection = CardCollection::new(RecordingHistory::new());
        collection.set_filter(FilterSpec::from_attrs("css", "", ""));
        collection.add_card(raw("CSS Basics", "", ""));
        collection.add_card(raw("Rust Basics", "", ""));

        let visible: Vec<_> = collection.visible().map(|c| c.title.as_str()).collect();
        assert_eq!(visible, vec!["CSS Basics"]);
    }

    #[test]
    fn default_sort_removes_url_param() {
        let mut collection = sample();
        collection.set_sort(SortKey::Recent);
        collection.set_sort(SortKey::Alpha);
        assert_eq!(collection.sync.read_location(), UrlState::default());
    }

    #[test]
    fn sort_and_filter_mirror_into_url() {
        let mut collection = sample();
        collection.set_sort(SortKey::Duration);
        collection.set_filter(FilterSpec::from_attrs("alpha", "css,html", "web"));

        let state = collection.sync.read_location();
        assert_eq!(state.sort, Some(SortKey::Duration));
        assert_eq!(state.filter, "alpha");
        assert_eq!(state.tags, vec!["css", "html"]);
        assert_eq!(state.categories, vec!["web"]);
    }

    #[test]
    fn popstate_replays_without_republishing() {
        let mut collection = sample();
        collection.set_sort(SortKey::Duration);

        // Simulate an external navigation landing on a different state.
        collection.sync = HistorySync::new({
            let mut history = RecordingHistory::new();
            history.replace("?sort=recent&filter=beta");
            history
        });
        collection.handle_popstate();

        assert_eq!(collection.sort_key(), SortKey::Recent);
        assert_eq!(collection.filter().text, "beta");
        assert!(!collection.sync.suppressed());
    }

    #[test]
    fn popstate_replays_without_analytics_events() {
        use crate::analytics::RecordingSink;
        use std::cell::RefCell;
        use std::rc::Rc;

        let sink = Rc::new(RefCell::new(RecordingSink::default()));
        let mut collection = CardCollection::new({
            let mut history = RecordingHistory::new();
            history.replace("?sort=recent&filter=beta");
            history
        })
        .with_analytics(Box::new(Rc::clone(&sink)));
        collection.add_card(raw("Beta", "", ""));

        collection.handle_popstate();

        assert_eq!(collection.sort_key(), SortKey::Recent);
        assert!(sink.borrow().actions.is_empty());
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let mut collection = CardCollection::new(RecordingHistory::new());
        collection.add_card(RawCard {
            title: "A".into(),
            category: "Web, Cloud".into(),
            ..RawCard::default()
        });
        collection.add_card(RawCard {
            title: "B".into(),
            category: "cloud".into(),
            ..RawCard::default()
        });

        assert_eq!(collection.categories(), vec!["cloud", "web"]);
    }

    #[test]
    fn sort_emits_analytics_action() {
        use crate::analytics::RecordingSink;
        use std::cell::RefCell;
        use std::rc::Rc;

        let sink = Rc::new(RefCell::new(RecordingSink::default()));
        let mut collection = CardCollection::new(RecordingHistory::new())
            .with_analytics(Box::new(Rc::clone(&sink)));
        collection.add_card(raw("A", "", ""));
        collection.set_sort(SortKey::Recent);

        let sink = sink.borrow();
        assert_eq!(sink.actions.len(), 1);
        assert_eq!(sink.actions[0].label.as_deref(), Some("recent"));
    }
}
