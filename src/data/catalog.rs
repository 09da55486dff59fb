//! The team catalog: loaded once, normalized once, read-only afterwards.
//! Accepts the JSON array shape of the rift data file or a CSV export of the team spreadsheet.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::data::team::{normalize, RawTeam, Team};

pub const DEFAULT_CATALOG_PATH: &str = "data/temporal_rift.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to parse catalog CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Every distinct cleaned hero, pet and badge, in first-seen catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    pub heroes: Vec<String>,
    pub pets: Vec<String>,
    pub badges: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    raw: Vec<RawTeam>,
    teams: Vec<Team>,
}

impl Catalog {
    pub fn from_raw(raw: Vec<RawTeam>) -> Self {
        let teams = raw.iter().map(normalize).collect();
        Self { raw, teams }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Normalized team at `index`; `None` when out of bounds.
    pub fn get(&self, index: usize) -> Option<&Team> {
        self.teams.get(index)
    }

    /// The record as supplied, for consumers that need to re-inspect display markers.
    pub fn raw(&self, index: usize) -> Option<&RawTeam> {
        self.raw.get(index)
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn raw_teams(&self) -> &[RawTeam] {
        &self.raw
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Team)> {
        self.teams.iter().enumerate()
    }

    pub fn vocabulary(&self) -> Vocabulary {
        let mut vocabulary = Vocabulary::default();
        let mut seen_heroes = HashSet::new();
        let mut seen_pets = HashSet::new();
        let mut seen_badges = HashSet::new();
        for team in &self.teams {
            for hero in &team.heroes {
                if seen_heroes.insert(hero.as_str()) {
                    vocabulary.heroes.push(hero.clone());
                }
            }
            if seen_pets.insert(team.pet.as_str()) {
                vocabulary.pets.push(team.pet.clone());
            }
            if seen_badges.insert(team.badge.as_str()) {
                vocabulary.badges.push(team.badge.clone());
            }
        }
        vocabulary
    }
}

/// Parse raw records from a JSON array.
pub fn parse_catalog_json(raw: &str) -> Result<Vec<RawTeam>, CatalogError> {
    Ok(serde_json::from_str(raw)?)
}

/// Parse raw records from CSV with a `pos1..pos5,pet,badge` header row.
pub fn parse_catalog_csv(raw: &str) -> Result<Vec<RawTeam>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());
    let mut teams = Vec::new();
    for record in reader.deserialize::<RawTeam>() {
        teams.push(record?);
    }
    Ok(teams)
}

/// Load raw records from disk; `.csv` files go through the CSV reader, anything else is JSON.
pub fn load_raw_teams(path: impl AsRef<Path>) -> Result<Vec<RawTeam>, CatalogError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        parse_catalog_csv(&raw)
    } else {
        parse_catalog_json(&raw)
    }
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let raw = load_raw_teams(path)?;
    tracing::info!(path = %path.display(), teams = raw.len(), "loaded team catalog");
    Ok(Catalog::from_raw(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_JSON: &str = r#"[
        {"pos1":"Astar [sp]","pos2":"Rem","pos3":"Mulan","pos4":"Kren","pos5":"Oden","pet":"Bellbellow","badge":"Axe of Fury"},
        {"pos1":"Astar","pos2":"Silas","pos3":"Scarlet","pos4":"Rem","pos5":"Lyca","pet":"Talismane","badge":"Axe of Fury"}
    ]"#;

    #[test]
    fn json_catalog_normalizes_every_team() {
        let catalog = Catalog::from_raw(parse_catalog_json(SAMPLE_JSON).expect("sample parses"));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).map(|t| t.heroes[0].as_str()), Some("Astar"));
        assert_eq!(catalog.raw(0).map(|t| t.pos1.as_str()), Some("Astar [sp]"));
        assert!(catalog.get(2).is_none());
    }

    #[test]
    fn csv_catalog_matches_json_shape() {
        let csv = "pos1,pos2,pos3,pos4,pos5,pet,badge\n\
                   Astar [sp], Rem,Mulan,Kren,Oden,Bellbellow,Axe of Fury\n";
        let teams = parse_catalog_csv(csv).expect("csv parses");
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].pos1, "Astar [sp]");
        assert_eq!(teams[0].pos2, "Rem");
        assert_eq!(teams[0].badge, "Axe of Fury");
    }

    #[test]
    fn vocabulary_is_distinct_in_first_seen_order() {
        let catalog = Catalog::from_raw(parse_catalog_json(SAMPLE_JSON).expect("sample parses"));
        let vocabulary = catalog.vocabulary();
        assert_eq!(
            vocabulary.heroes,
            ["Astar", "Rem", "Mulan", "Kren", "Oden", "Silas", "Scarlet", "Lyca"]
                .map(String::from)
                .to_vec()
        );
        assert_eq!(vocabulary.pets, vec!["Bellbellow".to_string(), "Talismane".to_string()]);
        assert_eq!(vocabulary.badges, vec!["Axe of Fury".to_string()]);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(parse_catalog_json("{not json"), Err(CatalogError::Parse(_))));
    }
}
