use crate::data::state::{FilterKind, FilterState, HeroMatchMode};
use crate::data::team::Team;

/// Does `team` satisfy every non-empty constraint in `filters`?
pub fn matches(team: &Team, filters: &FilterState) -> bool {
    if !filters.badges.is_empty() && !filters.badges.contains(&team.badge) {
        return false;
    }
    if !filters.pets.is_empty() && !filters.pets.contains(&team.pet) {
        return false;
    }
    if filters.heroes.is_empty() {
        return true;
    }
    let mut wanted = filters
        .heroes
        .iter()
        .map(|hero| FilterKind::Hero.canonical_value(hero));
    match filters.hero_mode {
        HeroMatchMode::All => wanted.all(|hero| team.has_hero(hero)),
        HeroMatchMode::Any => wanted.any(|hero| team.has_hero(hero)),
    }
}

/// Catalog entries that pass `filters`, paired with their catalog index, in catalog order.
pub fn filter_teams<'a, I>(teams: I, filters: &FilterState) -> Vec<(usize, &'a Team)>
where
    I: IntoIterator<Item = (usize, &'a Team)>,
{
    teams
        .into_iter()
        .filter(|(_, team)| matches(team, filters))
        .collect()
}
