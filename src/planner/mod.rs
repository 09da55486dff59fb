pub mod filter;
pub mod ranking;
pub mod usage;
pub mod view;

use serde::Serialize;

use crate::data::catalog::Catalog;
use crate::data::state::{FilterState, PlannerState, Selection};
use crate::planner::filter::filter_teams;
use crate::planner::ranking::{rank_teams, RankedTeam};
use crate::planner::usage::{used_resources, UsedResources};
use crate::planner::view::TeamView;

pub use filter::matches;
pub use ranking::ranking_order;

/// What a toggle on a catalog team did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Shares a hero, pet or badge with the current selection; selection unchanged.
    Blocked,
    OutOfRange,
}

/// Filtered catalog ranked for the recommendation list.
pub fn recommended_teams<'a>(
    catalog: &'a Catalog,
    selection: &Selection,
    filters: &FilterState,
    used: &UsedResources,
) -> Vec<RankedTeam<'a>> {
    let filtered = filter_teams(catalog.iter(), filters);
    rank_teams(filtered, selection, used)
}

/// Only the selected teams, in catalog order.
pub fn selected_teams<'a>(
    catalog: &'a Catalog,
    selection: &Selection,
    used: &UsedResources,
) -> Vec<RankedTeam<'a>> {
    let chosen = catalog
        .iter()
        .filter(|(index, _)| selection.contains(*index));
    rank_teams(chosen, selection, used)
}

/// Read-only engine over one catalog. Every call recomputes from the state snapshot it is given.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    catalog: &'a Catalog,
}

impl<'a> Planner<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn used(&self, selection: &Selection) -> UsedResources {
        used_resources(self.catalog, selection)
    }

    pub fn recommended(&self, state: &PlannerState) -> Vec<TeamView> {
        let used = self.used(&state.selection);
        let ranked = recommended_teams(self.catalog, &state.selection, &state.filters, &used);
        tracing::debug!(
            candidates = ranked.len(),
            selected = state.selection.len(),
            "recomputed recommended view"
        );
        ranked.iter().map(|entry| TeamView::build(entry, &used)).collect()
    }

    pub fn selected(&self, state: &PlannerState) -> Vec<TeamView> {
        let used = self.used(&state.selection);
        selected_teams(self.catalog, &state.selection, &used)
            .iter()
            .map(|entry| TeamView::build(entry, &used))
            .collect()
    }

    /// Select or deselect `index`. Conflicting and out-of-range teams leave the state untouched.
    pub fn toggle_team(&self, state: &mut PlannerState, index: usize) -> ToggleOutcome {
        if state.selection.remove(index) {
            return ToggleOutcome::Removed;
        }
        let Some(team) = self.catalog.get(index) else {
            return ToggleOutcome::OutOfRange;
        };
        if self.used(&state.selection).conflict_score(team) > 0 {
            return ToggleOutcome::Blocked;
        }
        state.selection.insert(index);
        ToggleOutcome::Added
    }
}
