use std::fs;
use std::path::PathBuf;

use streamtree::config::AppConfig;
use streamtree::error::ApiError;
use streamtree::tooling::cli::{CliContext, Commands};
use tempfile::TempDir;

fn cli() -> CliContext {
    CliContext::with_config(AppConfig::default())
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn replay_json_contract_has_required_fields() {
    let dir = TempDir::new().unwrap();
    let log = write(
        &dir,
        "stream.jsonl",
        concat!(
            r#"{"files": {"a.ts": "x"}, "is_loading": true, "thread_id": "t"}"#,
            "\n",
            r#"{"files": {"a.ts": "y", "b.ts": "z"}, "is_loading": true}"#,
            "\n\n",
            r#"{"select": "a.ts"}"#,
            "\n",
            r#"{"files": {"a.ts": "y", "b.ts": "z"}, "is_loading": false}"#,
            "\n",
        ),
    );

    let output = cli()
        .execute(&Commands::Replay {
            path: log,
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let ticks = parsed.get("ticks").and_then(|v| v.as_array()).unwrap();
    assert_eq!(ticks.len(), 4);
    assert_eq!(ticks[2]["phase"], "streaming_manual_override");
    assert_eq!(ticks[3]["phase"], "idle");
    assert_eq!(parsed["selected"], "a.ts");
    assert!(parsed.get("tree").and_then(|v| v.as_array()).is_some());
}

#[test]
fn replay_reports_bad_line_number() {
    let dir = TempDir::new().unwrap();
    let log = write(&dir, "bad.jsonl", "{\"files\": {}}\nnot json\n");

    let err = cli()
        .execute(&Commands::Replay {
            path: log,
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidSnapshot { line: 2, .. }));
}

#[test]
fn tree_text_output_lists_folders_first() {
    let dir = TempDir::new().unwrap();
    let map = write(
        &dir,
        "files.json",
        r#"{"README.md": "hi", "src/main.ts": "x", "memory/notes.md": "n"}"#,
    );

    let output = cli()
        .execute(&Commands::Tree {
            path: map,
            format: "text".to_string(),
        })
        .unwrap();
    let src = output.find("src/").unwrap();
    let readme = output.find("README.md").unwrap();
    assert!(src < readme);
    assert!(!output.contains("memory"));
    assert!(output.contains("1 folders, 2 files"));
}

#[test]
fn diff_flag_enables_deletions() {
    let dir = TempDir::new().unwrap();
    let before = write(&dir, "before.json", r#"{"a.ts": "1", "gone.ts": "2"}"#);
    let after = write(&dir, "after.json", r#"{"a.ts": "changed"}"#);

    let run = |deletions: bool| {
        let output = cli()
            .execute(&Commands::Diff {
                before: before.clone(),
                after: after.clone(),
                deletions,
                format: "json".to_string(),
            })
            .unwrap();
        serde_json::from_str::<serde_json::Value>(&output).unwrap()
    };

    assert_eq!(run(false)["count"], 1);
    let with_deletions = run(true);
    assert_eq!(with_deletions["count"], 2);
    assert_eq!(with_deletions["changes"][1]["kind"], "deleted");
    assert_eq!(with_deletions["changes"][1]["previous_content"], "2");
}

#[test]
fn preview_detects_react_typescript() {
    let dir = TempDir::new().unwrap();
    let map = write(
        &dir,
        "files.json",
        r#"{"src/App.tsx": "import React from 'react';", "memory/plan.md": "p"}"#,
    );

    let output = cli()
        .execute(&Commands::Preview {
            path: map,
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["template"], "react-ts");
    assert_eq!(parsed["has_minimum_files"], true);
    assert_eq!(parsed["files"], serde_json::json!(["/src/App.tsx"]));
}

#[test]
fn non_object_file_map_is_rejected() {
    let dir = TempDir::new().unwrap();
    let map = write(&dir, "files.json", "[1, 2, 3]");
    let err = cli()
        .execute(&Commands::Tree {
            path: map,
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidFileMap(_)));
}

#[test]
fn unknown_format_is_rejected() {
    let dir = TempDir::new().unwrap();
    let map = write(&dir, "files.json", "{}");
    let err = cli()
        .execute(&Commands::Tree {
            path: map,
            format: "yaml".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[test]
fn config_command_renders_toml_and_json() {
    let mut config = AppConfig::default();
    config.tree.reserved_segments = vec!["memory".to_string(), "scratch".to_string()];
    let cli = CliContext::with_config(config);

    let text = cli
        .execute(&Commands::Config {
            format: "text".to_string(),
        })
        .unwrap();
    assert!(text.contains("[tree]"));
    assert!(text.contains("scratch"));

    let json = cli
        .execute(&Commands::Config {
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["detection"]["deletions"], "ignore");
    assert_eq!(parsed["selection"]["fallback_to_first_file"], true);
}
