//! Display-ready projections of ranked teams: per-slot "already used" flags and the
//! marker flag a renderer needs, so no consumer has to thread usage state itself.

use serde::Serialize;

use crate::planner::ranking::RankedTeam;
use crate::planner::usage::UsedResources;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroSlotView {
    pub name: String,
    pub special: bool,
    pub used: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceView {
    pub name: String,
    pub used: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamView {
    pub index: usize,
    pub heroes: Vec<HeroSlotView>,
    pub pet: ResourceView,
    pub badge: ResourceView,
    pub selected: bool,
    pub conflict_score: u8,
    /// Unselected and sharing at least one resource with the selection.
    pub blocked: bool,
}

impl TeamView {
    /// Selected teams are never checked against usage (they are the usage).
    pub fn build(entry: &RankedTeam<'_>, used: &UsedResources) -> Self {
        let check = !entry.selected;
        let team = entry.team;
        let heroes = team
            .heroes
            .iter()
            .zip(team.special)
            .map(|(name, special)| HeroSlotView {
                name: name.clone(),
                special,
                used: check && used.heroes.contains(name),
            })
            .collect();
        Self {
            index: entry.index,
            heroes,
            pet: ResourceView {
                name: team.pet.clone(),
                used: check && used.pets.contains(&team.pet),
            },
            badge: ResourceView {
                name: team.badge.clone(),
                used: check && used.badges.contains(&team.badge),
            },
            selected: entry.selected,
            conflict_score: entry.conflict_score,
            blocked: check && entry.conflict_score > 0,
        }
    }
}
