//! # Labkit Architecture
//!
//! Labkit is a **UI-agnostic state engine** for codelab-style tutorial
//! viewers. The host shell owns rendering, element registration, and event
//! plumbing; this crate owns the state the viewer's widgets must keep
//! consistent across several observers at once — the visible card list and
//! step, the browser address bar, and persisted survey answers.
//!
//! ## The Shape of the Engine
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Host shell (DOM/templating, event dispatch, transports)     │
//! │  - Feeds attribute strings in, renders data records out      │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Widgets (cards.rs, steps.rs)                                │
//! │  - CardCollection: sort/filter over an owned card set        │
//! │  - StepSequencer: clamped cursor over a fixed step list      │
//! │  - Mutations run to completion within one event turn         │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Sync & persistence seams (history.rs, survey.rs,            │
//! │  analytics.rs)                                               │
//! │  - HistoryHandle / KeyValueStore / AnalyticsSink traits      │
//! │  - Production bridges and in-memory fakes for tests          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No Globals, No I/O Assumptions
//!
//! Nothing in this crate reaches for process-wide state. The history
//! handle, storage handle, analytics sink, and the debounce clock are all
//! passed in by the host, so tests substitute fakes without touching
//! anything global. Core state operations never fail: malformed input
//! degrades to documented defaults at the [`attrs`] boundary, and only
//! storage/config I/O returns [`error::Result`].
//!
//! ## History Mirroring Without Feedback Loops
//!
//! Widget state flows INTO the address bar on every mutation and BACK OUT
//! on browser back/forward. The echo-suppression flag in
//! [`history::HistorySync`] guarantees a popstate replay is applied at most
//! once and never re-published; see that module's docs for the URL shape.
//!
//! ## Module Overview
//!
//! - [`model`]: core data types (`Card`, `SortKey`, `FilterSpec`, `Step`,
//!   `NavigationState`)
//! - [`normalize`]: string canonicalization every comparison goes through
//! - [`attrs`]: the typed boundary over the string attribute surface
//! - [`cards`]: the card index widget state
//! - [`steps`]: the walkthrough widget state
//! - [`history`]: URL state codec and the bidirectional history bridge
//! - [`survey`]: persisted survey answers over a storage trait
//! - [`debounce`]: the cancellable search timer (the only deferred work)
//! - [`analytics`]: structured event records and the sink seam
//! - [`config`]: viewer configuration
//! - [`error`]: error types

pub mod analytics;
pub mod attrs;
pub mod cards;
pub mod config;
pub mod debounce;
pub mod error;
pub mod history;
pub mod model;
pub mod normalize;
pub mod steps;
pub mod survey;
