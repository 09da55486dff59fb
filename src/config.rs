//! Runtime configuration from environment variables. Bad values fall back to defaults with a warning.

use std::env;
use std::path::PathBuf;

use crate::data::catalog::DEFAULT_CATALOG_PATH;
use crate::data::state::{HeroMatchMode, DEFAULT_STATE_PATH};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub catalog_path: PathBuf,
    pub state_path: PathBuf,
    /// Match mode for state that has never been saved.
    pub default_hero_mode: HeroMatchMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            default_hero_mode: HeroMatchMode::All,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a closure over a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let default_hero_mode = match non_empty("RIFT_HERO_MODE") {
            Some(raw) => raw.parse::<HeroMatchMode>().unwrap_or_else(|err: String| {
                tracing::warn!("{err}; defaulting to {}", defaults.default_hero_mode);
                defaults.default_hero_mode
            }),
            None => defaults.default_hero_mode,
        };

        Self {
            bind_addr: non_empty("RIFT_BIND").unwrap_or(defaults.bind_addr),
            catalog_path: non_empty("RIFT_CATALOG")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            state_path: non_empty("RIFT_STATE")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_path),
            default_hero_mode,
        }
    }
}
