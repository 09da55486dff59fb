use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::catalog::{Catalog, Vocabulary};
use crate::data::state::{FilterKind, FilterState, PlannerState, StateError, StateStore};
use crate::data::team::RawTeam;
use crate::planner::usage::UsedResources;
use crate::planner::view::TeamView;
use crate::planner::{Planner, ToggleOutcome};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("{0}")]
    Store(#[from] StateError),
    #[error("failed to serialize response: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToggleTeamRequest {
    pub index: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToggleFilterRequest {
    pub kind: FilterKind,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateResponse<'a> {
    pub selected: &'a [usize],
    pub filters: &'a FilterState,
}

impl<'a> From<&'a PlannerState> for StateResponse<'a> {
    fn from(state: &'a PlannerState) -> Self {
        Self {
            selected: state.selection.as_slice(),
            filters: &state.filters,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogTeam<'a> {
    pub index: usize,
    pub raw: &'a RawTeam,
    pub heroes: &'a [String],
    pub special: &'a [bool],
    pub pet: &'a str,
    pub badge: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse<'a> {
    pub teams: Vec<CatalogTeam<'a>>,
    pub vocabulary: Vocabulary,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewResponse<'a> {
    pub teams: Vec<TeamView>,
    pub state: StateResponse<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleTeamResponse<'a> {
    pub index: usize,
    pub outcome: ToggleOutcome,
    pub state: StateResponse<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleFilterResponse<'a> {
    pub kind: FilterKind,
    pub value: &'a str,
    pub active: bool,
    pub state: StateResponse<'a>,
}

/// Catalog plus the injected state store; one per running server.
pub struct App {
    catalog: Catalog,
    store: Box<dyn StateStore + Send>,
}

impl App {
    pub fn new(catalog: Catalog, store: Box<dyn StateStore + Send>) -> Self {
        Self { catalog, store }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn planner(&self) -> Planner<'_> {
        Planner::new(&self.catalog)
    }

    fn state(&self) -> Result<PlannerState, ApiError> {
        Ok(self.store.load()?)
    }

    fn commit(&mut self, state: &PlannerState) -> Result<(), ApiError> {
        Ok(self.store.save(state)?)
    }

    pub fn health_payload(&self) -> Result<String, ApiError> {
        to_json(&serde_json::json!({
            "status": "ok",
            "service": "riftteams-api",
            "version": env!("CARGO_PKG_VERSION"),
            "teams": self.catalog.len(),
        }))
    }

    pub fn catalog_payload(&self) -> Result<String, ApiError> {
        let teams = self
            .catalog
            .raw_teams()
            .iter()
            .zip(self.catalog.teams())
            .enumerate()
            .map(|(index, (raw, team))| CatalogTeam {
                index,
                raw,
                heroes: &team.heroes,
                special: &team.special,
                pet: &team.pet,
                badge: &team.badge,
            })
            .collect();
        to_json(&CatalogResponse {
            teams,
            vocabulary: self.catalog.vocabulary(),
        })
    }

    pub fn state_payload(&self) -> Result<String, ApiError> {
        let state = self.state()?;
        to_json(&StateResponse::from(&state))
    }

    pub fn usage_payload(&self) -> Result<String, ApiError> {
        let state = self.state()?;
        let used: UsedResources = self.planner().used(&state.selection);
        to_json(&used)
    }

    pub fn recommended_payload(&self) -> Result<String, ApiError> {
        let state = self.state()?;
        let teams = self.planner().recommended(&state);
        to_json(&ViewResponse {
            teams,
            state: StateResponse::from(&state),
        })
    }

    pub fn selected_payload(&self) -> Result<String, ApiError> {
        let state = self.state()?;
        let teams = self.planner().selected(&state);
        to_json(&ViewResponse {
            teams,
            state: StateResponse::from(&state),
        })
    }

    pub fn toggle_team_payload(&mut self, body: &str) -> Result<String, ApiError> {
        let request: ToggleTeamRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
        let mut state = self.state()?;
        let outcome = self.planner().toggle_team(&mut state, request.index);
        if matches!(outcome, ToggleOutcome::Added | ToggleOutcome::Removed) {
            self.commit(&state)?;
        }
        tracing::info!(index = request.index, ?outcome, "team toggled");
        to_json(&ToggleTeamResponse {
            index: request.index,
            outcome,
            state: StateResponse::from(&state),
        })
    }

    pub fn toggle_filter_payload(&mut self, body: &str) -> Result<String, ApiError> {
        let request: ToggleFilterRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
        let mut state = self.state()?;
        let active = state.filters.toggle(request.kind, &request.value);
        self.commit(&state)?;
        tracing::info!(kind = ?request.kind, value = %request.value, active, "filter toggled");
        to_json(&ToggleFilterResponse {
            kind: request.kind,
            value: request.kind.canonical_value(&request.value),
            active,
            state: StateResponse::from(&state),
        })
    }

    pub fn toggle_mode_payload(&mut self) -> Result<String, ApiError> {
        let mut state = self.state()?;
        let mode = state.filters.toggle_mode();
        self.commit(&state)?;
        tracing::info!(%mode, "hero match mode toggled");
        to_json(&StateResponse::from(&state))
    }

    pub fn clear_filters_payload(&mut self) -> Result<String, ApiError> {
        let mut state = self.state()?;
        state.filters.clear();
        self.commit(&state)?;
        to_json(&StateResponse::from(&state))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(ApiError::Serialize)
}
