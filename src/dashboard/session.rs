//! Per-client session

use uuid::Uuid;

use super::state::{FilterEvent, FilterState};
use super::Dashboard;
use crate::present::{DashboardView, PanelView};

/// One client's filter state; never shared between clients
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    state: FilterState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: FilterState::default(),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Full page for the current state
    pub fn render(&self, dashboard: &Dashboard) -> DashboardView {
        dashboard.recompute(&self.state)
    }

    /// Apply an event and re-render the panels it touched
    pub fn dispatch(&mut self, dashboard: &Dashboard, event: FilterEvent) -> Vec<PanelView> {
        let changed = self.state.apply(&event);
        tracing::debug!(session = %self.id, ?event, panels = changed.len(), "Filter event");

        changed
            .into_iter()
            .map(|kind| dashboard.render_panel(kind, &self.state))
            .collect()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dashboard::fixtures;
    use crate::data::DatasetKind;
    use std::sync::Arc;

    fn dashboard() -> Dashboard {
        Dashboard::new(Arc::new(fixtures::datasets()), DashboardConfig::default())
    }

    #[test]
    fn test_dispatch_renders_changed_panel() {
        let dashboard = dashboard();
        let mut session = Session::new();

        let panels = session.dispatch(
            &dashboard,
            FilterEvent::SelectStages {
                values: vec!["Completed".to_string()],
            },
        );
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].panel, DatasetKind::Construction);
        assert_eq!(panels[0].controls[0].selected, vec!["Completed"]);

        let total_jobs = panels[0].kpis.iter().find(|k| k.label == "Total Jobs").unwrap();
        assert_eq!(total_jobs.display, "1");
    }

    #[test]
    fn test_sessions_are_independent() {
        let dashboard = dashboard();
        let mut first = Session::new();
        let second = Session::new();
        assert_ne!(first.id, second.id);

        first.dispatch(
            &dashboard,
            FilterEvent::SelectLocation {
                value: "Uptown".to_string(),
            },
        );
        assert!(!first.state().location.is_all());
        assert!(second.state().location.is_all());
    }

    #[test]
    fn test_unchanged_event_renders_nothing() {
        let dashboard = dashboard();
        let mut session = Session::new();
        assert!(session.dispatch(&dashboard, FilterEvent::Reset).is_empty());
        assert_eq!(session.render(&dashboard).panels.len(), 3);
    }
}
