//! Filter state and the events that change it

use serde::{Deserialize, Serialize};

use crate::analytics::Selection;
use crate::data::DatasetKind;

/// Current value of every filter control on the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Restaurant location
    #[serde(default)]
    pub location: Selection,

    /// Construction stages
    #[serde(default)]
    pub stages: Selection,

    /// Real-estate listing stage
    #[serde(default)]
    pub listing_stage: Selection,
}

impl FilterState {
    /// Selection that drives a panel's filter
    pub fn selection(&self, kind: DatasetKind) -> &Selection {
        match kind {
            DatasetKind::Restaurant => &self.location,
            DatasetKind::Construction => &self.stages,
            DatasetKind::RealEstate => &self.listing_stage,
        }
    }

    /// Apply an event, returning the panels whose output changed
    pub fn apply(&mut self, event: &FilterEvent) -> Vec<DatasetKind> {
        let (slot, kind, next) = match event {
            FilterEvent::SelectLocation { value } => (
                &mut self.location,
                DatasetKind::Restaurant,
                Selection::choice(value.as_str()),
            ),
            FilterEvent::SelectStages { values } => (
                &mut self.stages,
                DatasetKind::Construction,
                Selection::many(values.iter().map(String::as_str)),
            ),
            FilterEvent::SelectListingStage { value } => (
                &mut self.listing_stage,
                DatasetKind::RealEstate,
                Selection::choice(value.as_str()),
            ),
            FilterEvent::Reset => {
                let changed = DatasetKind::all()
                    .iter()
                    .copied()
                    .filter(|kind| !self.selection(*kind).is_all())
                    .collect();
                *self = FilterState::default();
                return changed;
            }
        };

        if *slot == next {
            return Vec::new();
        }
        *slot = next;
        vec![kind]
    }
}

/// A user interaction with one of the filter controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterEvent {
    SelectLocation { value: String },
    SelectStages { values: Vec<String> },
    SelectListingStage { value: String },
    Reset,
}
