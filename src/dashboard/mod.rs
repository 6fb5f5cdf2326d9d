//! Dashboard
//!
//! Ties the pipeline together. `Dashboard` owns the immutable datasets and
//! turns a `FilterState` into a `DashboardView`; a `Session` holds one
//! client's filter state and re-renders panels as events arrive.
//!
//! ```text
//! FilterEvent → Session::dispatch → FilterState → Dashboard::render_panel → PanelView
//! ```

pub mod session;
pub mod state;

pub use session::Session;
pub use state::{FilterEvent, FilterState};

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;

use crate::analytics::aggregate::unique_values;
use crate::analytics::{ConstructionReport, RealEstateReport, RestaurantReport, ALL_CHOICE};
use crate::config::DashboardConfig;
use crate::data::{DatasetKind, Datasets};
use crate::present::{
    construction_panel, real_estate_panel, restaurant_panel, Control, ControlKind, DashboardView,
    PanelView,
};

/// Filter options for one dataset
#[derive(Debug, Clone, serde::Serialize, PartialEq)]
pub struct FilterOptions {
    pub param: &'static str,
    pub options: Vec<String>,
}

/// Recomputes panels over shared, read-only datasets
#[derive(Debug, Clone)]
pub struct Dashboard {
    datasets: Arc<Datasets>,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(datasets: Arc<Datasets>, config: DashboardConfig) -> Self {
        Self { datasets, config }
    }

    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Date active jobs are aged against
    pub fn reference_date(&self) -> NaiveDate {
        self.config
            .as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Restaurant locations in first-seen order
    pub fn location_options(&self) -> Vec<String> {
        unique_values(&self.datasets.restaurant, |r| r.location.as_str())
    }

    /// Construction stages in first-seen order
    pub fn stage_options(&self) -> Vec<String> {
        unique_values(&self.datasets.construction, |r| r.stage.as_str())
    }

    /// Listing stages in first-seen order
    pub fn listing_stage_options(&self) -> Vec<String> {
        unique_values(&self.datasets.real_estate, |r| r.stage.as_str())
    }

    /// Query parameter and choices of a panel's filter control
    pub fn filter_options(&self, kind: DatasetKind) -> FilterOptions {
        match kind {
            DatasetKind::Restaurant => FilterOptions {
                param: "location",
                options: self.location_options(),
            },
            DatasetKind::Construction => FilterOptions {
                param: "stage",
                options: self.stage_options(),
            },
            DatasetKind::RealEstate => FilterOptions {
                param: "listing_stage",
                options: self.listing_stage_options(),
            },
        }
    }

    /// Render every panel for a filter state
    pub fn recompute(&self, state: &FilterState) -> DashboardView {
        self.recompute_at(state, self.reference_date())
    }

    /// Render every panel against a fixed reference date
    pub fn recompute_at(&self, state: &FilterState, today: NaiveDate) -> DashboardView {
        let panels = DatasetKind::all()
            .iter()
            .map(|kind| self.render_panel_at(*kind, state, today))
            .collect();

        DashboardView {
            title: self.config.title.clone(),
            as_of: today,
            panels,
        }
    }

    /// Render a single panel
    pub fn render_panel(&self, kind: DatasetKind, state: &FilterState) -> PanelView {
        self.render_panel_at(kind, state, self.reference_date())
    }

    /// Render a single panel against a fixed reference date
    pub fn render_panel_at(
        &self,
        kind: DatasetKind,
        state: &FilterState,
        today: NaiveDate,
    ) -> PanelView {
        let start = Instant::now();
        let selection = state.selection(kind);

        let view = match kind {
            DatasetKind::Restaurant => {
                let report = RestaurantReport::compute(&self.datasets.restaurant, selection);
                let control = Control::new(
                    "location",
                    "Select Location",
                    ControlKind::Select,
                    self.location_options(),
                    selection,
                );
                restaurant_panel(&report, vec![control])
            }
            DatasetKind::Construction => {
                let report = ConstructionReport::compute(
                    &self.datasets.construction,
                    selection,
                    &self.config.completed_stage,
                    today,
                );
                let control = Control::new(
                    "stage",
                    "Filter by Stage",
                    ControlKind::MultiSelect,
                    self.stage_options(),
                    selection,
                );
                construction_panel(&report, vec![control])
            }
            DatasetKind::RealEstate => {
                let report = RealEstateReport::compute(
                    &self.datasets.real_estate,
                    selection,
                    self.config.real_estate_charts_follow_filter,
                );
                let control = Control::new(
                    "listing_stage",
                    "Filter by Stage",
                    ControlKind::Radio,
                    self.listing_stage_options(),
                    selection,
                );
                real_estate_panel(&report, vec![control])
            }
        };

        tracing::debug!(
            panel = %kind,
            filter = %selection,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Panel recomputed"
        );

        view
    }

    /// Whether a single-select value names a known option (or "All")
    pub fn is_known_choice(&self, kind: DatasetKind, value: &str) -> bool {
        let value = value.trim();
        value.is_empty()
            || value == ALL_CHOICE
            || self.filter_options(kind).options.iter().any(|o| o == value)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Selection;

    fn dashboard() -> Dashboard {
        let config = DashboardConfig {
            as_of: NaiveDate::from_ymd_opt(2024, 3, 31),
            ..Default::default()
        };
        Dashboard::new(Arc::new(fixtures::datasets()), config)
    }

    fn kpi<'a>(panel: &'a PanelView, label: &str) -> &'a str {
        &panel
            .kpis
            .iter()
            .find(|k| k.label == label)
            .unwrap()
            .display
    }

    #[test]
    fn test_options_first_seen_order() {
        let dashboard = dashboard();
        assert_eq!(dashboard.location_options(), vec!["Downtown", "Uptown"]);
        assert_eq!(
            dashboard.stage_options(),
            vec!["Completed", "In Progress", "Bidding"]
        );
        assert_eq!(dashboard.listing_stage_options(), vec!["Active", "Sold"]);
    }

    #[test]
    fn test_recompute_default_state() {
        let dashboard = dashboard();
        let view = dashboard.recompute(&FilterState::default());

        assert_eq!(view.title, "SMB Analytics Demo");
        assert_eq!(view.as_of, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(view.panels.len(), 3);

        let restaurant = view.panel(DatasetKind::Restaurant).unwrap();
        assert_eq!(restaurant.controls[0].selected, vec!["All"]);

        // Multi-select defaults to every stage selected
        let construction = view.panel(DatasetKind::Construction).unwrap();
        assert_eq!(
            construction.controls[0].selected,
            vec!["Completed", "In Progress", "Bidding"]
        );
    }

    #[test]
    fn test_location_filter_scenario() {
        let dashboard = dashboard();
        let mut state = FilterState::default();

        state.location = Selection::choice("Downtown");
        let panel = dashboard.render_panel(DatasetKind::Restaurant, &state);
        assert_eq!(kpi(&panel, "Total Sales"), "$300");
        assert_eq!(kpi(&panel, "Avg Labor %"), "35.0%");

        // Zero sales with labor clamps to 100%
        state.location = Selection::choice("Uptown");
        let panel = dashboard.render_panel(DatasetKind::Restaurant, &state);
        assert_eq!(kpi(&panel, "Avg Labor %"), "100.0%");

        // Unknown location yields an empty, finite panel
        state.location = Selection::choice("Airport");
        let panel = dashboard.render_panel(DatasetKind::Restaurant, &state);
        assert_eq!(kpi(&panel, "Total Orders"), "0");
        assert_eq!(kpi(&panel, "Avg Order Value"), "$0.00");
    }

    #[test]
    fn test_empty_stage_selection() {
        let dashboard = dashboard();
        let state = FilterState {
            stages: Selection::many(Vec::<String>::new()),
            ..Default::default()
        };
        let panel = dashboard.render_panel(DatasetKind::Construction, &state);
        assert_eq!(kpi(&panel, "Total Jobs"), "0");
        assert!(panel.controls[0].selected.is_empty());
    }

    #[test]
    fn test_real_estate_charts_ignore_filter_by_default() {
        let dashboard = dashboard();
        let state = FilterState {
            listing_stage: Selection::choice("Sold"),
            ..Default::default()
        };
        let panel = dashboard.render_panel(DatasetKind::RealEstate, &state);
        assert_eq!(kpi(&panel, "Total Listings"), "1");
        let stages = panel.charts.iter().find(|c| c.id == "stage_breakdown").unwrap();
        assert_eq!(stages.rows.len(), 2);
        assert!(!panel.notes.is_empty());

        let config = DashboardConfig {
            real_estate_charts_follow_filter: true,
            ..dashboard.config().clone()
        };
        let following = Dashboard::new(Arc::new(fixtures::datasets()), config);
        let panel = following.render_panel(DatasetKind::RealEstate, &state);
        let stages = panel.charts.iter().find(|c| c.id == "stage_breakdown").unwrap();
        assert_eq!(stages.rows.len(), 1);
        assert!(panel.notes.is_empty());
    }

    #[test]
    fn test_known_choice() {
        let dashboard = dashboard();
        assert!(dashboard.is_known_choice(DatasetKind::Restaurant, "All"));
        assert!(dashboard.is_known_choice(DatasetKind::Restaurant, "Uptown"));
        assert!(!dashboard.is_known_choice(DatasetKind::RealEstate, "Withdrawn"));
    }
}
