//! Debouncing for free-text search input.
//!
//! Rapid keystrokes each reschedule a single pending filter application;
//! the filter runs once, after a quiet interval with no further input. The
//! timer is explicit and cancellable, and time is a plain tick counter the
//! host advances, so tests drive it with a virtual clock instead of
//! wall-clock waits. This is the only source of deferred execution in the
//! crate.

/// Quiet interval between the last keystroke and the filter application,
/// in host ticks.
pub const DEFAULT_QUIET_TICKS: u64 = 20;

/// Coalesces rapid submissions into a single delivery after a quiet
/// interval. Latest submission wins; at most one value fires per quiet
/// period regardless of the submission rate.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: u64,
    pending: Option<(T, u64)>,
}

/// The card-index search box debouncer: coalesced free-text filter values.
pub type DebouncedSearch = Debouncer<String>;

impl<T> Debouncer<T> {
    pub fn new(quiet: u64) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Schedules `value` for delivery at `now + quiet`, superseding any
    /// pending value and its deadline.
    pub fn submit(&mut self, value: T, now: u64) {
        self.pending = Some((value, now + self.quiet));
    }

    /// Delivers the pending value once its deadline has passed. Returns
    /// `None` while the quiet interval is still running or nothing is
    /// pending.
    pub fn poll(&mut self, now: u64) -> Option<T> {
        match self.pending {
            Some((_, deadline)) if now >= deadline => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Cancels the pending delivery, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
