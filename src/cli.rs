use crate::config::AppConfig;
use crate::data::catalog::{load_catalog, load_raw_teams, Catalog};
use crate::data::state::{FilterKind, JsonFileStore, PlannerState, StateStore};
use crate::data::validate::validate_catalog;
use crate::planner::view::TeamView;
use crate::planner::{Planner, ToggleOutcome};
use crate::server;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Recommend,
    Selected,
    Toggle,
    Filter,
    Mode,
    Validate,
}

const USAGE: &str = "usage: riftteams <serve|recommend|selected|toggle|filter|mode|validate>";

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("recommend") => Some(Command::Recommend),
        Some("selected") => Some(Command::Selected),
        Some("toggle") => Some(Command::Toggle),
        Some("filter") => Some(Command::Filter),
        Some("mode") => Some(Command::Mode),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = AppConfig::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(&config),
        Some(Command::Recommend) => handle_view(&config, args, ViewKind::Recommended),
        Some(Command::Selected) => handle_view(&config, args, ViewKind::Selected),
        Some(Command::Toggle) => handle_toggle(&config, args),
        Some(Command::Filter) => handle_filter(&config, args),
        Some(Command::Mode) => handle_mode(&config),
        Some(Command::Validate) => handle_validate(&config, args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ViewKind {
    Recommended,
    Selected,
}

fn handle_serve(config: &AppConfig) -> i32 {
    match server::run_server(config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_view(config: &AppConfig, args: &[String], kind: ViewKind) -> i32 {
    let as_table = args.iter().any(|arg| arg == "--table");
    let Some(catalog) = open_catalog(config) else {
        return 1;
    };
    let state = load_state_or_default(&store_for(config), config);
    let planner = Planner::new(&catalog);
    let views = match kind {
        ViewKind::Recommended => planner.recommended(&state),
        ViewKind::Selected => planner.selected(&state),
    };

    if as_table {
        print_table(&views);
        return 0;
    }
    print_json(&views)
}

fn handle_toggle(config: &AppConfig, args: &[String]) -> i32 {
    let Some(index) = args.get(2).and_then(|raw| raw.parse::<usize>().ok()) else {
        eprintln!("usage: riftteams toggle <team-index>");
        return 2;
    };
    let Some(catalog) = open_catalog(config) else {
        return 1;
    };
    let mut store = store_for(config);
    let Some(mut state) = load_state_for_update(&store) else {
        return 1;
    };

    let outcome = Planner::new(&catalog).toggle_team(&mut state, index);
    match outcome {
        ToggleOutcome::Added | ToggleOutcome::Removed => {
            if let Err(err) = store.save(&state) {
                eprintln!("failed to save state: {err}");
                return 1;
            }
            tracing::info!(index, ?outcome, "selection updated");
            print_state(&state)
        }
        ToggleOutcome::Blocked => {
            eprintln!("team {index} shares a hero, pet or badge with the current selection");
            1
        }
        ToggleOutcome::OutOfRange => {
            eprintln!("team {index} is not in the catalog ({} teams)", catalog.len());
            1
        }
    }
}

fn handle_filter(config: &AppConfig, args: &[String]) -> i32 {
    let (Some(kind), Some(value)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: riftteams filter <hero|pet|badge> <value>");
        return 2;
    };
    let kind: FilterKind = match kind.parse() {
        Ok(kind) => kind,
        Err(err) => {
            eprintln!("{err}");
            return 2;
        }
    };
    let mut store = store_for(config);
    let Some(mut state) = load_state_for_update(&store) else {
        return 1;
    };
    let active = state.filters.toggle(kind, value);
    if let Err(err) = store.save(&state) {
        eprintln!("failed to save state: {err}");
        return 1;
    }
    tracing::info!(?kind, value = %value, active, "filter updated");
    print_state(&state)
}

fn handle_mode(config: &AppConfig) -> i32 {
    let mut store = store_for(config);
    let Some(mut state) = load_state_for_update(&store) else {
        return 1;
    };
    let mode = state.filters.toggle_mode();
    if let Err(err) = store.save(&state) {
        eprintln!("failed to save state: {err}");
        return 1;
    }
    tracing::info!(%mode, "hero match mode updated");
    print_state(&state)
}

fn handle_validate(config: &AppConfig, args: &[String]) -> i32 {
    let path = args
        .get(2)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| config.catalog_path.clone());

    let teams = match load_raw_teams(&path) {
        Ok(teams) => teams,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };
    let report = validate_catalog(&teams);
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
    if report.has_errors() {
        eprintln!("validation failed: {} issue(s)", report.diagnostics.len());
        1
    } else {
        println!(
            "validation passed: {} ({} teams, {} note(s))",
            path.display(),
            teams.len(),
            report.diagnostics.len()
        );
        0
    }
}

fn open_catalog(config: &AppConfig) -> Option<Catalog> {
    match load_catalog(&config.catalog_path) {
        Ok(catalog) => Some(catalog),
        Err(err) => {
            eprintln!("failed to load catalog '{}': {err}", config.catalog_path.display());
            None
        }
    }
}

fn store_for(config: &AppConfig) -> JsonFileStore {
    JsonFileStore::new(&config.state_path, config.default_hero_mode)
}

/// Read-only views degrade to fresh state when the file cannot be read.
fn load_state_or_default(store: &JsonFileStore, config: &AppConfig) -> PlannerState {
    store.load().unwrap_or_else(|err| {
        tracing::warn!(path = %store.path().display(), "{err}; starting from empty state");
        PlannerState::with_mode(config.default_hero_mode)
    })
}

/// Commands that save must start from what is on disk; an unreadable file is left alone.
fn load_state_for_update(store: &JsonFileStore) -> Option<PlannerState> {
    match store.load() {
        Ok(state) => Some(state),
        Err(err) => {
            eprintln!("{err} ('{}'); state left unchanged", store.path().display());
            None
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}

fn print_state(state: &PlannerState) -> i32 {
    print_json(&serde_json::json!({
        "selected": state.selection.as_slice(),
        "filters": &state.filters,
    }))
}

fn print_table(views: &[TeamView]) {
    println!("index\tselected\tconflicts\theroes\tpet\tbadge");
    for view in views {
        let heroes = view
            .heroes
            .iter()
            .map(|slot| {
                if slot.special {
                    format!("{}*", slot.name)
                } else {
                    slot.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            view.index, view.selected, view.conflict_score, heroes, view.pet.name, view.badge.name
        );
    }
}
