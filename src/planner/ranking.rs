use std::cmp::Ordering;

use serde::Serialize;

use crate::data::state::Selection;
use crate::data::team::Team;
use crate::planner::usage::UsedResources;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankedTeam<'a> {
    pub index: usize,
    #[serde(skip)]
    pub team: &'a Team,
    pub selected: bool,
    /// Resources shared with the selection; always 0 for selected teams.
    pub conflict_score: u8,
}

/// Display order: selected teams first by catalog index, then the rest by
/// ascending conflict score with catalog index as the tie-break.
pub fn ranking_order(left: &RankedTeam<'_>, right: &RankedTeam<'_>) -> Ordering {
    match (left.selected, right.selected) {
        (true, true) => left.index.cmp(&right.index),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => left
            .conflict_score
            .cmp(&right.conflict_score)
            .then_with(|| left.index.cmp(&right.index)),
    }
}

pub fn rank_teams<'a, I>(teams: I, selection: &Selection, used: &UsedResources) -> Vec<RankedTeam<'a>>
where
    I: IntoIterator<Item = (usize, &'a Team)>,
{
    let mut ranked: Vec<RankedTeam<'a>> = teams
        .into_iter()
        .map(|(index, team)| {
            let selected = selection.contains(index);
            RankedTeam {
                index,
                team,
                selected,
                conflict_score: if selected { 0 } else { used.conflict_score(team) },
            }
        })
        .collect();

    ranked.sort_by(ranking_order);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::Catalog;
    use crate::data::team::RawTeam;
    use crate::planner::usage::used_resources;

    fn raw(heroes: [&str; 5], pet: &str, badge: &str) -> RawTeam {
        RawTeam {
            pos1: heroes[0].to_string(),
            pos2: heroes[1].to_string(),
            pos3: heroes[2].to_string(),
            pos4: heroes[3].to_string(),
            pos5: heroes[4].to_string(),
            pet: pet.to_string(),
            badge: badge.to_string(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_raw(vec![
            raw(["A", "B", "C", "D", "E"], "P1", "G1"),
            raw(["A", "B", "X", "Y", "Z"], "P3", "G3"),
            raw(["A", "F", "G", "H", "I"], "P2", "G2"),
            raw(["J", "K", "L", "M", "N"], "P4", "G4"),
            raw(["O", "Q", "R", "S", "T"], "P1", "G5"),
        ])
    }

    fn order(ranked: &[RankedTeam<'_>]) -> Vec<usize> {
        ranked.iter().map(|entry| entry.index).collect()
    }

    #[test]
    fn selected_first_then_ascending_conflicts() {
        let catalog = catalog();
        let selection = Selection::from_indices([0]);
        let used = used_resources(&catalog, &selection);
        let ranked = rank_teams(catalog.iter(), &selection, &used);
        // scores: 1 -> 2, 2 -> 1, 3 -> 0, 4 -> 1
        assert_eq!(order(&ranked), vec![0, 3, 2, 4, 1]);
        assert_eq!(ranked[1].conflict_score, 0);
        assert_eq!(ranked[4].conflict_score, 2);
    }

    #[test]
    fn selected_entries_use_catalog_order_not_pick_order() {
        let catalog = catalog();
        let selection = Selection::from_indices([3, 1]);
        let used = used_resources(&catalog, &selection);
        let ranked = rank_teams(catalog.iter(), &selection, &used);
        assert_eq!(&order(&ranked)[..2], &[1, 3]);
        assert!(ranked[0].selected && ranked[1].selected);
    }

    #[test]
    fn no_selection_keeps_catalog_order() {
        let catalog = catalog();
        let selection = Selection::new();
        let used = used_resources(&catalog, &selection);
        let ranked = rank_teams(catalog.iter(), &selection, &used);
        assert_eq!(order(&ranked), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn reranking_is_a_no_op() {
        let catalog = catalog();
        let selection = Selection::from_indices([2]);
        let used = used_resources(&catalog, &selection);
        let first = rank_teams(catalog.iter(), &selection, &used);
        let again = rank_teams(first.iter().map(|entry| (entry.index, entry.team)), &selection, &used);
        assert_eq!(first, again);
    }
}
