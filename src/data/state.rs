//! Caller-owned planner state (selection + filters) and the persistence capability behind it.
//! The engine only ever reads snapshots of this state; mutations happen here, on explicit user actions.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::team::clean_hero;

pub const DEFAULT_STATE_PATH: &str = "data/state.json";

/// Teams the user has committed to: catalog indices in insertion order, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct Selection {
    indices: Vec<usize>,
    members: HashSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list, keeping the first occurrence of any repeated index.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut selection = Self::new();
        for index in indices {
            selection.insert(index);
        }
        selection
    }

    pub fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    /// Appends `index`; returns false when it was already selected.
    pub fn insert(&mut self, index: usize) -> bool {
        if !self.members.insert(index) {
            return false;
        }
        self.indices.push(index);
        true
    }

    /// Removes `index`; returns false when it was not selected.
    pub fn remove(&mut self, index: usize) -> bool {
        if !self.members.remove(&index) {
            return false;
        }
        self.indices.retain(|&selected| selected != index);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl From<Vec<usize>> for Selection {
    fn from(indices: Vec<usize>) -> Self {
        Self::from_indices(indices)
    }
}

impl From<Selection> for Vec<usize> {
    fn from(selection: Selection) -> Self {
        selection.indices
    }
}

/// How a non-empty hero filter is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroMatchMode {
    /// Every filtered hero must be on the team.
    #[default]
    #[serde(rename = "ALL", alias = "AND")]
    All,
    /// At least one filtered hero must be on the team.
    #[serde(rename = "ANY", alias = "OR")]
    Any,
}

impl HeroMatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Any => "ANY",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::All => Self::Any,
            Self::Any => Self::All,
        }
    }
}

impl fmt::Display for HeroMatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HeroMatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" | "AND" => Ok(Self::All),
            "ANY" | "OR" => Ok(Self::Any),
            other => Err(format!("unknown hero match mode '{other}' (expected ALL or ANY)")),
        }
    }
}

/// Which constraint set a filter value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Hero,
    Pet,
    Badge,
}

impl FilterKind {
    /// The form a value is stored and compared in. Hero values lose their display marker.
    pub fn canonical_value(self, value: &str) -> &str {
        match self {
            Self::Hero => clean_hero(value).name,
            Self::Pet | Self::Badge => value,
        }
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hero" => Ok(Self::Hero),
            "pet" => Ok(Self::Pet),
            "badge" => Ok(Self::Badge),
            other => Err(format!("unknown filter kind '{other}' (expected hero, pet or badge)")),
        }
    }
}

/// Hero/pet/badge constraints. Empty sets impose no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub heroes: BTreeSet<String>,
    #[serde(default)]
    pub pets: BTreeSet<String>,
    #[serde(default)]
    pub badges: BTreeSet<String>,
    #[serde(default)]
    pub hero_mode: HeroMatchMode,
}

impl FilterState {
    pub fn with_mode(hero_mode: HeroMatchMode) -> Self {
        Self {
            hero_mode,
            ..Self::default()
        }
    }

    pub fn set(&self, kind: FilterKind) -> &BTreeSet<String> {
        match kind {
            FilterKind::Hero => &self.heroes,
            FilterKind::Pet => &self.pets,
            FilterKind::Badge => &self.badges,
        }
    }

    fn set_mut(&mut self, kind: FilterKind) -> &mut BTreeSet<String> {
        match kind {
            FilterKind::Hero => &mut self.heroes,
            FilterKind::Pet => &mut self.pets,
            FilterKind::Badge => &mut self.badges,
        }
    }

    /// Add `value` if absent, remove it if present. Returns whether it is now in the set.
    /// Hero values are cleaned first, so `"Astar [sp]"` and `"Astar"` toggle the same entry.
    pub fn toggle(&mut self, kind: FilterKind, value: &str) -> bool {
        let value = kind.canonical_value(value);
        let set = self.set_mut(kind);
        if set.remove(value) {
            false
        } else {
            set.insert(value.to_string());
            true
        }
    }

    pub fn toggle_mode(&mut self) -> HeroMatchMode {
        self.hero_mode = self.hero_mode.toggled();
        self.hero_mode
    }

    /// Drop every constraint value; the match mode is kept.
    pub fn clear(&mut self) {
        self.heroes.clear();
        self.pets.clear();
        self.badges.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty() && self.pets.is_empty() && self.badges.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlannerState {
    pub selection: Selection,
    pub filters: FilterState,
}

impl PlannerState {
    pub fn with_mode(hero_mode: HeroMatchMode) -> Self {
        Self {
            selection: Selection::new(),
            filters: FilterState::with_mode(hero_mode),
        }
    }
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read state file: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to parse state JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write state file: {0}")]
    Write(#[source] std::io::Error),
}

/// Where planner state lives between sessions.
pub trait StateStore {
    fn load(&self) -> Result<PlannerState, StateError>;
    fn save(&mut self, state: &PlannerState) -> Result<(), StateError>;
}

/// Keeps state for the lifetime of the process only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: PlannerState,
}

impl MemoryStore {
    pub fn new(state: PlannerState) -> Self {
        Self { state }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<PlannerState, StateError> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &PlannerState) -> Result<(), StateError> {
        self.state = state.clone();
        Ok(())
    }
}

/// On-disk document. Keys follow the storage keys the web page used.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateDocument {
    #[serde(default)]
    selected: Selection,
    #[serde(default)]
    hero_filter: BTreeSet<String>,
    #[serde(default)]
    pet_filter: BTreeSet<String>,
    #[serde(default)]
    badge_filter: BTreeSet<String>,
    #[serde(default)]
    hero_select_mode: Option<HeroMatchMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<String>,
}

/// JSON file persistence. A missing file loads as fresh state with the configured default mode.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    default_mode: HeroMatchMode,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, default_mode: HeroMatchMode) -> Self {
        Self {
            path: path.into(),
            default_mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<PlannerState, StateError> {
        if !self.path.exists() {
            return Ok(PlannerState::with_mode(self.default_mode));
        }
        let raw = fs::read_to_string(&self.path).map_err(StateError::Read)?;
        let doc: StateDocument = serde_json::from_str(&raw).map_err(StateError::Parse)?;
        Ok(PlannerState {
            selection: doc.selected,
            filters: FilterState {
                heroes: doc
                    .hero_filter
                    .iter()
                    .map(|hero| FilterKind::Hero.canonical_value(hero).to_string())
                    .collect(),
                pets: doc.pet_filter,
                badges: doc.badge_filter,
                hero_mode: doc.hero_select_mode.unwrap_or(self.default_mode),
            },
        })
    }

    fn save(&mut self, state: &PlannerState) -> Result<(), StateError> {
        let doc = StateDocument {
            selected: state.selection.clone(),
            hero_filter: state.filters.heroes.clone(),
            pet_filter: state.filters.pets.clone(),
            badge_filter: state.filters.badges.clone(),
            hero_select_mode: Some(state.filters.hero_mode),
            saved_at: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        };
        let payload = serde_json::to_string_pretty(&doc).map_err(StateError::Serialize)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(StateError::Write)?;
        }
        fs::write(&self.path, payload).map_err(StateError::Write)?;
        tracing::debug!(path = %self.path.display(), selected = state.selection.len(), "saved planner state");
        Ok(())
    }
}
