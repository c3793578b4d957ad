//! CLI Tests
//!
//! Runs the command implementations against files in temporary directories.

use std::fs;

use dawproject::cli::commands::{self, ProjectSummary};
use dawproject::cli::example::example_project;
use dawproject::model::{METADATA_FILE, PROJECT_FILE};
use dawproject::serialize::{read_metadata, read_project, DecodeOptions};
use tempfile::TempDir;

const SESSION: &str = include_str!("fixtures/session.xml");

fn example_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    commands::write_example(dir.path()).unwrap();
    dir
}

#[test]
fn test_write_example_files() {
    let dir = example_dir();
    let project_text = fs::read_to_string(dir.path().join(PROJECT_FILE)).unwrap();
    let metadata_text = fs::read_to_string(dir.path().join(METADATA_FILE)).unwrap();

    assert!(project_text.starts_with("<?xml"));
    let decoded = read_project(&project_text, &DecodeOptions::default()).unwrap();
    assert_eq!(decoded.value, example_project());

    let metadata = read_metadata(&metadata_text).unwrap();
    assert_eq!(metadata.title.as_deref(), Some("Night Drive"));
    assert!(metadata.comment.is_some());
}

#[test]
fn test_inspect_and_metadata_commands() {
    let dir = example_dir();
    let options = DecodeOptions::default();
    commands::inspect(&dir.path().join(PROJECT_FILE), false, &options).unwrap();
    commands::inspect(&dir.path().join(PROJECT_FILE), true, &options).unwrap();
    commands::show_metadata(&dir.path().join(METADATA_FILE), &options).unwrap();
}

#[test]
fn test_inspect_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = commands::inspect(&dir.path().join(PROJECT_FILE), false, &DecodeOptions::default())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read"));
}

#[test]
fn test_roundtrip_command() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.xml");
    let output = dir.path().join("out.xml");
    fs::write(&input, SESSION).unwrap();

    commands::roundtrip(&input, &output, 4, &DecodeOptions::default()).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("\n    <Application"));
    let before = read_project(SESSION, &DecodeOptions::default()).unwrap();
    let after = read_project(&written, &DecodeOptions::default()).unwrap();
    assert_eq!(before.value, after.value);
}

#[test]
fn test_roundtrip_lenient_drops_unknown() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.xml");
    let output = dir.path().join("out.xml");
    fs::write(&input, SESSION.replace("<Devices>", r#"<Devices><Theremin id="id41"/>"#)).unwrap();

    assert!(commands::roundtrip(&input, &output, 2, &DecodeOptions::strict()).is_err());
    commands::roundtrip(&input, &output, 2, &DecodeOptions::lenient()).unwrap();
    assert!(!fs::read_to_string(&output).unwrap().contains("Theremin"));
}

#[test]
fn test_check_directory() {
    let dir = example_dir();
    let nested = dir.path().join("songs").join("b");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join(PROJECT_FILE), SESSION).unwrap();
    fs::write(nested.join("notes.txt"), "not a document").unwrap();

    commands::check(dir.path(), &DecodeOptions::default()).unwrap();

    fs::write(
        nested.join(PROJECT_FILE),
        SESSION.replace(r#"reference="id12""#, r#"reference="id404""#),
    )
    .unwrap();
    let err = commands::check(dir.path(), &DecodeOptions::default()).unwrap_err();
    assert!(err.to_string().contains("1 of 3"));
}

#[test]
fn test_summary_counts() {
    let decoded = read_project(SESSION, &DecodeOptions::default()).unwrap();
    let summary = ProjectSummary::from_decoded(&decoded);
    assert_eq!(summary.application, "Test Host 3.2");
    assert_eq!(summary.tempo, Some(120.0));
    assert_eq!(summary.time_signature.as_deref(), Some("7/8"));
    assert_eq!(summary.tracks, 2);
    assert_eq!(summary.channels, 2);
    assert_eq!(summary.devices, 1);
    assert_eq!(summary.clips, 2);
    assert_eq!(summary.timelines, 5);
    assert_eq!(summary.identities, 16);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["tracks"], 2);
    assert_eq!(json["time_signature"], "7/8");
    assert!(json["skipped"].as_array().unwrap().is_empty());
}

#[test]
fn test_example_summary_counts_scene_clips() {
    let dir = example_dir();
    let text = fs::read_to_string(dir.path().join(PROJECT_FILE)).unwrap();
    let decoded = read_project(&text, &DecodeOptions::default()).unwrap();
    let summary = ProjectSummary::from_decoded(&decoded);
    assert_eq!(summary.tracks, 4);
    assert_eq!(summary.clips, 4);
    assert_eq!(summary.scenes, 1);
    assert_eq!(summary.devices, 4);
}
