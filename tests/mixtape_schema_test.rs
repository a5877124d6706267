//! Integration tests for mixtape document validation.

use mixtape::{Library, SchemaErrors};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn sample() -> Value {
    json!({
        "users": [
            { "id": "1", "name": "Albin Jaye" },
            { "id": "2", "name": "Dipika Crescentia" }
        ],
        "playlists": [
            { "id": "1", "user_id": "1", "song_ids": ["1", "2"] },
            { "id": "2", "user_id": "2", "song_ids": ["1", "2"] }
        ],
        "songs": [
            { "id": "1", "artist": "Camila Cabello", "title": "Never Be the Same" },
            { "id": "2", "artist": "Zedd", "title": "The Middle" }
        ]
    })
}

fn failure(doc: &Value) -> SchemaErrors {
    Library::from_value(doc).unwrap_err()
}

#[test]
fn test_valid_mixtape_round_trips() {
    let doc = sample();
    let mixtape = Library::from_value(&doc).unwrap().into_mixtape();

    assert_eq!(serde_json::to_value(&mixtape).unwrap(), doc);
}

#[test]
fn test_indexes_map_ids_to_entities() {
    let library = Library::from_value(&sample()).unwrap();

    let song_ids: Vec<&String> = library.song_index().keys().collect();
    assert_eq!(song_ids, vec!["1", "2"]);
    assert_eq!(library.song("1").unwrap().title, "Never Be the Same");
    assert_eq!(library.user("2").unwrap().name, "Dipika Crescentia");
    assert_eq!(library.playlist("1").unwrap().song_ids, vec!["1", "2"]);
}

#[test]
fn test_duplicate_playlist_songs_are_allowed() {
    let mut doc = sample();
    doc["playlists"][0]["song_ids"] = json!(["1", "1", "2"]);

    let library = Library::from_value(&doc).unwrap();
    assert_eq!(library.playlist("1").unwrap().song_ids.len(), 3);
}

#[test]
fn test_root_must_be_object_with_exact_keys() {
    let errors = failure(&json!([]));
    assert_eq!(errors.first().code, "invalid_type");

    let mut doc = sample();
    doc["albums"] = json!([]);
    let errors = failure(&doc);
    assert_eq!(errors.first().code, "additional_property");
    assert_eq!(errors.first().path.to_string(), "albums");

    let errors = failure(&json!({ "songs": [], "users": [] }));
    assert_eq!(errors.first().code, "required");
    assert_eq!(errors.first().path.to_string(), "playlists");

    let errors = failure(&json!({ "songs": {}, "users": [], "playlists": [] }));
    assert_eq!(errors.first().path.to_string(), "songs");
}

#[test]
fn test_entity_keys_must_match_exactly() {
    let mut doc = sample();
    doc["songs"][1] = json!({ "id": "2", "artist": "Zedd" });
    doc["users"][0]["email"] = json!("albin@example.com");

    let errors = failure(&doc);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.with_code("required")[0].path.to_string(), "songs[1].title");
    assert_eq!(
        errors.with_code("additional_property")[0].path.to_string(),
        "users[0].email"
    );
}

#[test]
fn test_duplicate_song_id_fails() {
    let mut doc = sample();
    doc["songs"][1]["id"] = json!("1");
    doc["playlists"] = json!([]);

    let errors = failure(&doc);
    let duplicate = errors.with_code("duplicate_id");
    assert_eq!(duplicate.len(), 1);
    assert_eq!(duplicate[0].path.to_string(), "songs[1].id");
    assert_eq!(duplicate[0].message, "duplicate song id");
}

#[test]
fn test_duplicate_user_id_fails() {
    let mut doc = sample();
    doc["users"][1]["id"] = json!("1");

    let errors = failure(&doc);
    assert_eq!(errors.first().code, "duplicate_id");
    assert_eq!(errors.first().path.to_string(), "users[1].id");
}

#[test]
fn test_duplicate_playlist_id_fails() {
    let mut doc = sample();
    doc["playlists"][1]["id"] = json!("1");

    let errors = failure(&doc);
    assert_eq!(errors.first().code, "duplicate_id");
    assert_eq!(errors.first().path.to_string(), "playlists[1].id");
}

#[test]
fn test_unknown_references_fail() {
    let mut doc = sample();
    doc["playlists"][0]["song_ids"] = json!(["1", "3"]);
    doc["playlists"][1]["user_id"] = json!("5");

    let errors = failure(&doc);
    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors.with_code("unknown_song")[0].path.to_string(),
        "playlists[0].song_ids[1]"
    );
    assert_eq!(
        errors.with_code("unknown_user")[0].path.to_string(),
        "playlists[1].user_id"
    );
}

#[test]
fn test_empty_song_ids_fail() {
    let mut doc = sample();
    doc["playlists"][0]["song_ids"] = json!([]);

    let errors = failure(&doc);
    assert_eq!(errors.first().code, "min_length");
    assert_eq!(errors.first().path.to_string(), "playlists[0].song_ids");
}

#[test]
fn test_playlist_ids_must_be_numeric() {
    let mut doc = sample();
    doc["playlists"][0]["id"] = json!("road-trip");
    doc["playlists"][1]["id"] = json!(2);

    let errors = failure(&doc);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.with_code("pattern")[0].path.to_string(), "playlists[0].id");
    assert_eq!(errors.with_code("invalid_type")[0].path.to_string(), "playlists[1].id");
}

#[test]
fn test_playlists_not_checked_when_entities_are_broken() {
    let mut doc = sample();
    doc["songs"][0] = json!("not a song");

    let errors = failure(&doc);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path.to_string(), "songs[0]");
}

#[test]
fn test_error_message_lists_every_violation() {
    let mut doc = sample();
    doc["songs"][0]["title"] = json!(7);
    doc["users"][1]["id"] = json!("1");

    let message = failure(&doc).to_string();
    assert!(message.starts_with("Validation failed with 2 error(s):"));
    assert!(message.contains("songs[0].title: expected string"));
    assert!(message.contains("users[1].id: duplicate user id"));
}
