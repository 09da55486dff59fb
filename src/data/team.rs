//! Team records: the raw catalog shape and the normalized form used for identity comparisons.
//! Hero slots may carry a display-only `[sp]` marker; it never takes part in equality.

use serde::{Deserialize, Serialize};

/// Number of hero slots in every team.
pub const HERO_SLOTS: usize = 5;

/// Display-only annotation on a hero identifier (matched case-insensitively).
pub const SPECIAL_MARKER: &str = "[sp]";

/// A team exactly as the catalog source supplies it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawTeam {
    pub pos1: String,
    pub pos2: String,
    pub pos3: String,
    pub pos4: String,
    pub pos5: String,
    pub pet: String,
    pub badge: String,
}

impl RawTeam {
    pub fn hero_slots(&self) -> [&str; HERO_SLOTS] {
        [
            self.pos1.as_str(),
            self.pos2.as_str(),
            self.pos3.as_str(),
            self.pos4.as_str(),
            self.pos5.as_str(),
        ]
    }
}

/// A normalized team: cleaned hero identifiers plus per-slot marker flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub heroes: [String; HERO_SLOTS],
    pub special: [bool; HERO_SLOTS],
    pub pet: String,
    pub badge: String,
}

impl Team {
    /// True when `hero` (a cleaned identifier) fills one of the five slots.
    pub fn has_hero(&self, hero: &str) -> bool {
        self.heroes.iter().any(|slot| slot == hero)
    }

    /// Back to the raw shape, re-emitting the marker on special slots in canonical form.
    pub fn to_raw(&self) -> RawTeam {
        let slot = |i: usize| {
            if self.special[i] {
                format!("{} {}", self.heroes[i], SPECIAL_MARKER)
            } else {
                self.heroes[i].clone()
            }
        };
        RawTeam {
            pos1: slot(0),
            pos2: slot(1),
            pos3: slot(2),
            pos4: slot(3),
            pos5: slot(4),
            pet: self.pet.clone(),
            badge: self.badge.clone(),
        }
    }
}

/// Result of inspecting one hero string for the special marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanHero<'a> {
    pub name: &'a str,
    pub special: bool,
}

/// Strip trailing `[sp]` markers (each optionally preceded by whitespace).
///
/// Strings that are only a marker, or that contain the token anywhere except the end,
/// are treated as malformed and returned whole with `special == false`.
pub fn clean_hero(raw: &str) -> CleanHero<'_> {
    let mut rest = raw.trim_end();
    let mut special = false;
    while let Some(stripped) = strip_marker_suffix(rest) {
        rest = stripped.trim_end();
        special = true;
    }
    if !special {
        return CleanHero { name: raw, special: false };
    }
    if rest.is_empty() || contains_marker(rest) {
        return CleanHero { name: raw, special: false };
    }
    CleanHero { name: rest, special }
}

/// True when the raw hero string carries a well-formed special marker.
pub fn is_special(raw: &str) -> bool {
    clean_hero(raw).special
}

/// True when the marker token appears somewhere that `clean_hero` will not strip.
pub fn has_malformed_marker(raw: &str) -> bool {
    contains_marker(raw) && !is_special(raw)
}

fn strip_marker_suffix(value: &str) -> Option<&str> {
    let split = value.len().checked_sub(SPECIAL_MARKER.len())?;
    if !value.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = value.split_at(split);
    tail.eq_ignore_ascii_case(SPECIAL_MARKER).then_some(head)
}

fn contains_marker(value: &str) -> bool {
    value.to_ascii_lowercase().contains(SPECIAL_MARKER)
}

/// Canonicalize a raw record. Pet and badge pass through unchanged.
pub fn normalize(raw: &RawTeam) -> Team {
    let slots = raw.hero_slots().map(clean_hero);
    Team {
        heroes: slots.map(|slot| slot.name.to_string()),
        special: slots.map(|slot| slot.special),
        pet: raw.pet.clone(),
        badge: raw.badge.clone(),
    }
}
