//! The step sequencer: an ordered walkthrough with a clamped cursor.
//!
//! The step list is fixed at construction; only the cursor moves. Every
//! transition recomputes the selection flags, the navigation affordances,
//! and the remaining time, then pushes a fresh history entry so browser
//! back/forward traverse step history. While a popstate is being applied
//! the entry is replaced instead, so browser-initiated navigation never
//! piles up duplicates.

use crate::analytics::{AnalyticsSink, NullSink, Pageview};
use crate::attrs::RawStep;
use crate::history::{HistoryHandle, HistorySync};
use crate::model::{NavigationState, Step};

/// Which navigation controls the host should show for the current step.
/// The sequencer still clamps independently; the affordances only encode
/// the guard in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavAffordances {
    pub prev_visible: bool,
    pub next_visible: bool,
    pub done_visible: bool,
}

/// One row of the step drawer: the data record the host renders per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawerRow<'a> {
    pub label: &'a str,
    pub selected: bool,
    pub completed: bool,
}

pub struct StepSequencer<H: HistoryHandle> {
    steps: Vec<Step>,
    nav: NavigationState,
    sync: HistorySync<H>,
    analytics: Box<dyn AnalyticsSink>,
}

impl<H: HistoryHandle> StepSequencer<H> {
    /// Builds the sequencer from the initial child list, assigning 1-based
    /// step indexes. The starting cursor comes from the explicit `selected`
    /// attribute if given, else the URL fragment, else 0 — clamped either
    /// way. The starting position replaces the current history entry rather
    /// than pushing one; only transitions push.
    pub fn new(raw_steps: Vec<RawStep>, selected: Option<i64>, history: H) -> Self {
        let steps: Vec<Step> = raw_steps
            .into_iter()
            .enumerate()
            .map(|(i, raw)| raw.into_step(i + 1))
            .collect();
        let sync = HistorySync::new(history);

        let initial = selected.or_else(|| sync.read_location().step.map(|s| s as i64));
        let nav = NavigationState::new(steps.len()).jump(initial.unwrap_or(0));

        let mut sequencer = Self {
            steps,
            nav,
            sync,
            analytics: Box::new(NullSink),
        };
        if !sequencer.steps.is_empty() {
            sequencer.sync.set_suppress_echo(true);
            sequencer.sync.publish_step(sequencer.nav.current);
            sequencer.sync.set_suppress_echo(false);
        }
        sequencer
    }

    pub fn with_analytics(mut self, sink: Box<dyn AnalyticsSink>) -> Self {
        self.analytics = sink;
        self
    }

    /// Advances one step; a no-op at the last step.
    pub fn next(&mut self) {
        self.transition(self.nav.next());
    }

    /// Goes back one step; a no-op at the first step.
    pub fn prev(&mut self) {
        self.transition(self.nav.prev());
    }

    /// Jumps to step `n`, clamped into range. Drawer clicks and popstate
    /// navigation both resolve to this.
    pub fn jump(&mut self, n: i64) {
        self.transition(self.nav.jump(n));
    }

    /// Replays a browser back/forward: re-applies the fragment with echo
    /// suppression on, so the history entry is replaced, not re-pushed.
    pub fn handle_popstate(&mut self) {
        let Some(step) = self.sync.read_location().step else {
            return;
        };
        self.sync.set_suppress_echo(true);
        self.jump(step as i64);
        self.sync.set_suppress_echo(false);
    }

    fn transition(&mut self, nav: NavigationState) {
        // A clamped move that lands where it started is a true no-op:
        // no history entry, no pageview.
        if self.steps.is_empty() || nav.current == self.nav.current {
            return;
        }
        self.nav = nav;
        self.sync.publish_step(self.nav.current);
        self.analytics.pageview(Pageview {
            page: Some(format!("#{}", self.nav.current)),
            title: self.current_step().map(|step| step.label.clone()),
        });
    }

    pub fn nav(&self) -> NavigationState {
        self.nav
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.nav.current)
    }

    /// Sum of the current step's duration and every step after it.
    pub fn time_remaining(&self) -> u32 {
        self.steps[self.nav.current..]
            .iter()
            .map(|step| step.duration_minutes)
            .sum()
    }

    pub fn affordances(&self) -> NavAffordances {
        if self.steps.is_empty() {
            return NavAffordances {
                prev_visible: false,
                next_visible: false,
                done_visible: false,
            };
        }
        let last = self.steps.len() - 1;
        NavAffordances {
            prev_visible: self.nav.current > 0,
            next_visible: self.nav.current < last,
            done_visible: self.nav.current == last,
        }
    }

    /// Drawer rows for the host to render: the current step selected, it and
    /// everything before it marked completed.
    pub fn drawer_rows(&self) -> Vec<DrawerRow<'_>> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| DrawerRow {
                label: &step.label,
                selected: i == self.nav.current,
                completed: i <= self.nav.current,
            })
            .collect()
    }
}
