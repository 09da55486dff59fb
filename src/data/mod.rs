pub mod catalog;
pub mod state;
pub mod team;
pub mod validate;

pub use catalog::{load_catalog, Catalog, CatalogError, Vocabulary, DEFAULT_CATALOG_PATH};
pub use state::{
    FilterKind, FilterState, HeroMatchMode, JsonFileStore, MemoryStore, PlannerState, Selection,
    StateError, StateStore, DEFAULT_STATE_PATH,
};
pub use team::{normalize, RawTeam, Team, HERO_SLOTS};
