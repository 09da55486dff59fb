use std::collections::BTreeSet;

use serde::Serialize;

use crate::data::catalog::Catalog;
use crate::data::state::Selection;
use crate::data::team::Team;

/// Resources already committed by the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsedResources {
    pub heroes: BTreeSet<String>,
    pub pets: BTreeSet<String>,
    pub badges: BTreeSet<String>,
}

impl UsedResources {
    /// Number of the team's resources already in use, 0..=7.
    pub fn conflict_score(&self, team: &Team) -> u8 {
        let heroes = team
            .heroes
            .iter()
            .filter(|hero| self.heroes.contains(hero.as_str()))
            .count() as u8;
        heroes + u8::from(self.pets.contains(&team.pet)) + u8::from(self.badges.contains(&team.badge))
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty() && self.pets.is_empty() && self.badges.is_empty()
    }

    fn add_team(&mut self, team: &Team) {
        self.heroes.extend(team.heroes.iter().cloned());
        self.pets.insert(team.pet.clone());
        self.badges.insert(team.badge.clone());
    }
}

/// Union of every selected team's cleaned heroes, pet and badge.
/// Indices past the end of the catalog are skipped.
pub fn used_resources(catalog: &Catalog, selection: &Selection) -> UsedResources {
    let mut used = UsedResources::default();
    for index in selection.iter() {
        match catalog.get(index) {
            Some(team) => used.add_team(team),
            None => tracing::debug!(index, "selection index outside catalog; skipped"),
        }
    }
    used
}
