use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_riftteams")
}

fn unique_temp_path(name: &str, ext: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("riftteams-{name}-{stamp}.{ext}"))
}

fn run(state: &PathBuf, args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .env("RIFT_STATE", state)
        .env("RIFT_CATALOG", "data/temporal_rift.json")
        .env_remove("RIFT_HERO_MODE")
        .output()
        .expect("riftteams should run")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("command should emit json")
}

#[test]
fn recommend_command_emits_catalog_order_without_selection() {
    let state = unique_temp_path("recommend", "json");
    let output = run(&state, &["recommend"]);
    assert_eq!(output.status.code(), Some(0));
    let payload = stdout_json(&output);
    let indices: Vec<u64> = payload
        .as_array()
        .expect("recommend should emit an array")
        .iter()
        .filter_map(|team| team["index"].as_u64())
        .collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    assert!(!state.exists(), "read-only commands should not write state");
}

#[test]
fn toggle_persists_selection_and_blocks_conflicts() {
    let state = unique_temp_path("toggle", "json");

    let output = run(&state, &["toggle", "0"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["selected"], serde_json::json!([0]));

    let output = run(&state, &["toggle", "1"]);
    assert_eq!(output.status.code(), Some(1));

    let output = run(&state, &["selected"]);
    assert_eq!(output.status.code(), Some(0));
    let payload = stdout_json(&output);
    assert_eq!(payload.as_array().map(Vec::len), Some(1));
    assert_eq!(payload[0]["index"], 0);

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&state).expect("state written")).expect("valid json");
    assert_eq!(saved["selected"], serde_json::json!([0]));
    assert_eq!(saved["heroSelectMode"], "ALL");
    let _ = fs::remove_file(state);
}

#[test]
fn filter_and_mode_commands_update_state() {
    let state = unique_temp_path("filter", "json");

    let output = run(&state, &["filter", "pet", "Bellbellow"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["filters"]["pets"], serde_json::json!(["Bellbellow"]));

    let output = run(&state, &["mode"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["filters"]["hero_mode"], "ANY");

    let output = run(&state, &["recommend", "--table"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let rows: Vec<&str> = stdout.lines().collect();
    assert_eq!(rows.len(), 3, "header plus the two Bellbellow teams");
    assert!(rows[0].starts_with("index\t"));
    assert!(rows[1].starts_with("0\t"));
    assert!(rows[1].contains("Astar*"));
    assert!(rows[2].starts_with("5\t"));
    let _ = fs::remove_file(state);
}

#[test]
fn mutating_commands_leave_unreadable_state_untouched() {
    let state = unique_temp_path("corrupt", "json");
    let original = r#"{"selected":[0,2,3],"heroFilter":["Rem"],"heroSelectMode":"ANY",}"#;
    fs::write(&state, original).expect("fixture written");

    let commands: [&[&str]; 3] = [&["filter", "pet", "Bellbellow"], &["toggle", "4"], &["mode"]];
    for args in commands {
        let output = run(&state, args);
        assert_eq!(output.status.code(), Some(1), "{args:?} should fail");
        assert!(String::from_utf8_lossy(&output.stderr).contains("state left unchanged"));
        assert_eq!(fs::read_to_string(&state).expect("state still present"), original);
    }

    let output = run(&state, &["recommend"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read_to_string(&state).expect("state still present"), original);
    let _ = fs::remove_file(state);
}

#[test]
fn filter_command_rejects_unknown_kind() {
    let state = unique_temp_path("badkind", "json");
    let output = run(&state, &["filter", "weapon", "Sword"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!state.exists());
}

#[test]
fn toggle_command_returns_usage_without_index() {
    let state = unique_temp_path("noindex", "json");
    let output = run(&state, &["toggle"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: riftteams toggle"));
}

#[test]
fn validate_command_passes_bundled_catalog_and_fails_broken_one() {
    let state = unique_temp_path("validate", "json");
    let output = run(&state, &["validate"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("validation passed"));

    let broken = unique_temp_path("broken", "csv");
    fs::write(&broken, "pos1,pos2,pos3,pos4,pos5,pet,badge\nA,,C,D,E,P,G\n").expect("fixture written");
    let output = run(&state, &["validate", broken.to_str().expect("utf-8 temp path")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("pos2 is empty"));
    let _ = fs::remove_file(broken);
}

#[test]
fn unknown_command_prints_usage() {
    let state = unique_temp_path("unknown", "json");
    let output = run(&state, &["launch"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage: riftteams"));
}
