//! File-level tests for the load, apply and write pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use mixtape::pipeline::{check_inputs, load_json, run};
use mixtape::{Config, LoadError, MixtapeError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;

const MIXTAPE: &str = r#"{
  "users": [
    { "id": "1", "name": "Albin Jaye" },
    { "id": "2", "name": "Dipika Crescentia" }
  ],
  "playlists": [
    { "id": "1", "user_id": "2", "song_ids": ["1", "2"] }
  ],
  "songs": [
    { "id": "1", "artist": "Camila Cabello", "title": "Never Be the Same" },
    { "id": "2", "artist": "Zedd", "title": "The Middle" }
  ]
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn config(dir: &TempDir, changes: Value) -> Config {
    let mixtape = write(dir, "mixtape.json", MIXTAPE);
    let changes = write(dir, "changes.json", &changes.to_string());
    Config::new(mixtape, changes).with_output(dir.path().join("output.json"))
}

fn read(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_load_json() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "mixtape.json", MIXTAPE);

    let value = load_json(&path).unwrap();
    assert_eq!(value["songs"][1]["artist"], json!("Zedd"));
}

#[test]
fn test_load_json_reports_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.json", "{ \"songs\": [");

    let err = load_json(&path).unwrap_err();
    assert!(matches!(err, LoadError::Json { .. }));
    assert!(err
        .to_string()
        .starts_with(&format!("The file {} is not proper json.\n", path.display())));
}

#[test]
fn test_check_inputs_lists_every_missing_file() {
    let dir = TempDir::new().unwrap();
    let present = write(&dir, "mixtape.json", MIXTAPE);
    let first = dir.path().join("nope.json");
    let second = dir.path().join("also-nope.json");

    assert!(check_inputs([present.as_path()]).is_ok());

    let err = check_inputs([first.as_path(), present.as_path(), second.as_path()]).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "No such file : {}\nNo such file : {}",
            first.display(),
            second.display()
        )
    );
}

#[test]
fn test_run_writes_pretty_output() {
    let dir = TempDir::new().unwrap();
    let config = config(
        &dir,
        json!({
            "changes": [
                { "type": "add_song_to_playlist", "payload": { "playlist_id": "1", "song_id": "2" } },
                { "type": "create_playlist", "payload": { "user_id": "1", "song_ids": ["2"] } }
            ]
        }),
    );

    let summary = run(&config).unwrap();
    assert_eq!(summary.created, vec!["2"]);
    assert_eq!(summary.duplicate_adds, 1);

    let text = fs::read_to_string(&config.output_path).unwrap();
    assert!(text.starts_with("{\n  \""));
    assert_eq!(
        read(&config.output_path)["playlists"],
        json!([
            { "id": "1", "user_id": "2", "song_ids": ["1", "2"] },
            { "id": "2", "user_id": "1", "song_ids": ["2"] }
        ])
    );
}

#[test]
fn test_run_keeps_input_untouched() {
    let dir = TempDir::new().unwrap();
    let config = config(
        &dir,
        json!({ "changes": [{ "type": "delete_playlist", "payload": { "playlist_id": "1" } }] }),
    );

    run(&config).unwrap();

    assert_eq!(fs::read_to_string(&config.mixtape_path).unwrap(), MIXTAPE);
    assert_eq!(read(&config.output_path)["playlists"], json!([]));
}

#[test]
fn test_failed_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config(
        &dir,
        json!({
            "changes": [
                { "type": "create_playlist", "payload": { "user_id": "1", "song_ids": ["1"] } },
                { "type": "delete_playlist", "payload": { "playlist_id": "7" } }
            ]
        }),
    );

    let err = run(&config).unwrap_err();
    assert!(matches!(err, MixtapeError::Apply(_)));
    assert!(!config.output_path.exists());
}

#[test]
fn test_missing_input_aborts() {
    let dir = TempDir::new().unwrap();
    let mixtape = write(&dir, "mixtape.json", MIXTAPE);
    let config = Config::new(mixtape, dir.path().join("changes.json"))
        .with_output(dir.path().join("output.json"));

    let err = run(&config).unwrap_err();
    assert!(matches!(err, MixtapeError::Load(LoadError::Missing(ref paths)) if paths.len() == 1));
    assert!(err.to_string().starts_with("No such file : "));
    assert!(!config.output_path.exists());
}

#[test]
fn test_invalid_mixtape_aborts() {
    let dir = TempDir::new().unwrap();
    let mixtape = write(&dir, "mixtape.json", r#"{ "songs": [], "users": [] }"#);
    let changes = write(&dir, "changes.json", r#"{ "changes": [] }"#);
    let config = Config::new(mixtape, changes).with_output(dir.path().join("output.json"));

    let err = run(&config).unwrap_err();
    assert!(matches!(err, MixtapeError::Schema(_)));
    assert!(err.to_string().contains("playlists"));
    assert!(!config.output_path.exists());
}
