//! Collaborator contract for analytics.
//!
//! The widgets emit structured events for trackable interactions and view
//! changes; delivery is entirely the host's concern. Hosts plug a sink in
//! through [`AnalyticsSink`]; the default [`NullSink`] drops everything, and
//! [`RecordingSink`] captures events for assertions in tests.

/// A trackable interaction (a sort change, a filter change).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEvent {
    pub category: String,
    pub action: String,
    pub label: Option<String>,
    pub value: Option<i64>,
}

/// A view change (a step becoming the current page).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pageview {
    pub page: Option<String>,
    pub title: Option<String>,
}

pub trait AnalyticsSink {
    fn action(&mut self, event: ActionEvent);
    fn pageview(&mut self, view: Pageview);
}

/// Sink that drops every event. The default when a host wires no analytics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn action(&mut self, _event: ActionEvent) {}
    fn pageview(&mut self, _view: Pageview) {}
}

/// Sink that records every event, for test assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub actions: Vec<ActionEvent>,
    pub pageviews: Vec<Pageview>,
}

impl AnalyticsSink for RecordingSink {
    fn action(&mut self, event: ActionEvent) {
        self.actions.push(event);
    }

    fn pageview(&mut self, view: Pageview) {
        self.pageviews.push(view);
    }
}

/// Lets several widgets share one sink in a single-threaded host.
impl<S: AnalyticsSink> AnalyticsSink for std::rc::Rc<std::cell::RefCell<S>> {
    fn action(&mut self, event: ActionEvent) {
        self.borrow_mut().action(event);
    }

    fn pageview(&mut self, view: Pageview) {
        self.borrow_mut().pageview(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_captures_in_order() {
        let mut sink = RecordingSink::default();
        sink.action(ActionEvent {
            category: "index".into(),
            action: "sort".into(),
            label: Some("recent".into()),
            value: None,
        });
        sink.pageview(Pageview {
            page: Some("#2".into()),
            title: None,
        });

        assert_eq!(sink.actions.len(), 1);
        assert_eq!(sink.actions[0].action, "sort");
        assert_eq!(sink.pageviews[0].page.as_deref(), Some("#2"));
    }
}
