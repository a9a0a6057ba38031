//! Cross-widget scenarios: one shared browser history, debounced search
//! feeding the card index, and survey answers persisted across "sessions".

use std::cell::RefCell;
use std::rc::Rc;

use labkit::attrs::{RawCard, RawStep};
use labkit::cards::CardCollection;
use labkit::debounce::{DebouncedSearch, DEFAULT_QUIET_TICKS};
use labkit::history::RecordingHistory;
use labkit::model::{FilterSpec, SortKey};
use labkit::steps::StepSequencer;
use labkit::survey::{AnswerStore, FileStore};

fn raw_card(title: &str, tags: &str, duration: &str, updated: &str) -> RawCard {
    RawCard {
        title: title.into(),
        tags: tags.into(),
        duration: duration.into(),
        updated: updated.into(),
        ..RawCard::default()
    }
}

#[test]
fn url_round_trip_reproduces_index_state() {
    let history = Rc::new(RefCell::new(RecordingHistory::new()));

    let mut index = CardCollection::new(Rc::clone(&history));
    index.add_card(raw_card("Alpha", "css", "5", "2021-01-01"));
    index.add_card(raw_card("Beta", "html", "10", "2020-01-01"));

    index.set_sort(SortKey::Duration);
    index.set_filter(FilterSpec::from_attrs("al", "css,html", ""));

    // A fresh collection against the same history (a page reload, or a
    // popstate) reconstructs the same state from the URL alone.
    let mut reloaded = CardCollection::new(Rc::clone(&history));
    reloaded.add_card(raw_card("Alpha", "css", "5", "2021-01-01"));
    reloaded.add_card(raw_card("Beta", "html", "10", "2020-01-01"));
    reloaded.handle_popstate();

    assert_eq!(reloaded.sort_key(), SortKey::Duration);
    assert_eq!(reloaded.filter().text, "al");
    assert_eq!(reloaded.filter().tags, vec!["css", "html"]);
    let titles: Vec<_> = reloaded.visible().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha"]);
}

#[test]
fn step_navigation_and_index_state_share_one_url() {
    let history = Rc::new(RefCell::new(RecordingHistory::new()));

    let mut index = CardCollection::new(Rc::clone(&history));
    index.add_card(raw_card("Alpha", "", "", ""));
    index.set_sort(SortKey::Recent);

    let steps = vec![
        RawStep {
            label: "Intro".into(),
            duration: "2".into(),
        },
        RawStep {
            label: "Build".into(),
            duration: "8".into(),
        },
    ];
    let mut walkthrough = StepSequencer::new(steps, None, Rc::clone(&history));
    walkthrough.next();

    // Each widget preserved the other's half of the path.
    assert_eq!(history.borrow().current(), "?sort=recent#1");
}

#[test]
fn browser_back_traverses_step_history() {
    let history = Rc::new(RefCell::new(RecordingHistory::new()));
    let steps = (1..=3)
        .map(|i| RawStep {
            label: format!("Step {i}"),
            duration: "1".into(),
        })
        .collect();
    let mut walkthrough = StepSequencer::new(steps, None, Rc::clone(&history));

    walkthrough.next();
    walkthrough.next();
    assert_eq!(walkthrough.nav().current, 2);

    history.borrow_mut().back();
    walkthrough.handle_popstate();
    assert_eq!(walkthrough.nav().current, 1);

    history.borrow_mut().back();
    walkthrough.handle_popstate();
    assert_eq!(walkthrough.nav().current, 0);

    // Replaying never minted extra entries.
    assert_eq!(history.borrow().entries().len(), 3);

    history.borrow_mut().forward();
    walkthrough.handle_popstate();
    assert_eq!(walkthrough.nav().current, 1);
}

#[test]
fn debounced_keystrokes_apply_one_filter() {
    let mut index = CardCollection::new(RecordingHistory::new());
    index.add_card(raw_card("CSS Grid", "", "", ""));
    index.add_card(raw_card("Rust CLI", "", "", ""));

    let mut search = DebouncedSearch::new(DEFAULT_QUIET_TICKS);
    let mut applications = 0u32;

    // Simulated event loop: a keystroke per tick while typing "css", then
    // quiet until the timer fires.
    for tick in 0..60u64 {
        match tick {
            0 => search.submit("c".into(), tick),
            1 => search.submit("cs".into(), tick),
            2 => search.submit("css".into(), tick),
            _ => {}
        }
        if let Some(text) = search.poll(tick) {
            index.set_filter(FilterSpec::from_attrs(&text, "", ""));
            applications += 1;
        }
    }

    assert_eq!(applications, 1);
    let visible: Vec<_> = index.visible().map(|c| c.title.as_str()).collect();
    assert_eq!(visible, vec!["CSS Grid"]);
}

#[test]
fn survey_answers_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("storage");

    {
        let mut answers = AnswerStore::new(FileStore::new(root.clone()));
        answers
            .record("intro-lab", "How helpful?", "Very helpful")
            .unwrap();
    }

    // A second session over the same storage root sees the answers and
    // re-selects the matching option.
    let answers = AnswerStore::new(FileStore::new(root.clone()));
    let mut selected = Vec::new();
    answers.apply("intro-lab", |_, option_id| {
        selected.push(option_id.to_string());
        true
    });
    assert_eq!(selected, vec!["very-helpful"]);

    // Corrupting the stored file degrades to an empty mapping.
    let key_file = root.join("codelab-survey-intro-lab.json");
    std::fs::write(&key_file, "{truncated").unwrap();
    assert!(answers.load("intro-lab").is_empty());
}
