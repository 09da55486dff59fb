use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::data::team::{clean_hero, has_malformed_marker, RawTeam};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Check raw records for problems the engine tolerates but a data maintainer should fix.
pub fn validate_catalog(teams: &[RawTeam]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut first_seen: HashMap<&RawTeam, usize> = HashMap::new();

    for (index, team) in teams.iter().enumerate() {
        let context = format!("team[{index}]");

        for (slot, hero) in team.hero_slots().iter().enumerate() {
            let field = format!("pos{}", slot + 1);
            if hero.trim().is_empty() {
                report.push(ValidationSeverity::Error, &context, format!("{field} is empty"));
            } else if has_malformed_marker(hero) {
                report.push(
                    ValidationSeverity::Info,
                    &context,
                    format!("{field} '{hero}' has a marker that is not a trailing annotation; kept as-is"),
                );
            }
        }
        if team.pet.trim().is_empty() {
            report.push(ValidationSeverity::Error, &context, "pet is empty");
        }
        if team.badge.trim().is_empty() {
            report.push(ValidationSeverity::Error, &context, "badge is empty");
        }

        let cleaned = team.hero_slots().map(|hero| clean_hero(hero).name);
        for (slot, hero) in cleaned.iter().enumerate() {
            if hero.trim().is_empty() {
                continue;
            }
            if cleaned[..slot].contains(hero) {
                report.push(
                    ValidationSeverity::Warning,
                    &context,
                    format!("hero '{hero}' appears more than once"),
                );
            }
        }

        if let Some(first) = first_seen.get(team) {
            report.push(
                ValidationSeverity::Warning,
                &context,
                format!("duplicate of team[{first}]"),
            );
        } else {
            first_seen.insert(team, index);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(heroes: [&str; 5], pet: &str, badge: &str) -> RawTeam {
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

    #[test]
    fn clean_catalog_has_no_diagnostics() {
        let report = validate_catalog(&[team(["A [sp]", "B", "C", "D", "E"], "P", "G")]);
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    }

    #[test]
    fn reports_each_problem_with_its_severity() {
        let teams = vec![
            team(["A", "", "C", "D", "E"], "P", "G"),
            team(["A", "B", "A [sp]", "D", "E"], "P", " "),
            team(["A", "B", "A [sp]", "D", "E"], "P", " "),
            team(["X[sp]Y", "B", "C", "D", "E"], "P", "G"),
        ];
        let report = validate_catalog(&teams);
        assert!(report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Error), 3);
        assert_eq!(report.count(ValidationSeverity::Warning), 3);
        assert_eq!(report.count(ValidationSeverity::Info), 1);
        assert!(report
            .diagnostics
            .iter()
            .any(|diag| diag.context == "team[2]" && diag.message == "duplicate of team[1]"));
    }
}
