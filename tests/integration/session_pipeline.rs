use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use streamtree::config::AppConfig;
use streamtree::detect::DeletionPolicy;
use streamtree::observer::SharedSession;
use streamtree::session::{StreamSnapshot, TickReport, WorkspaceSession};
use streamtree::sync::{Phase, TreeUpdate};

fn streaming(files: serde_json::Value) -> StreamSnapshot {
    StreamSnapshot {
        files,
        is_loading: true,
        thread_id: Some("thread-1".to_string()),
        ..StreamSnapshot::default()
    }
}

#[test]
fn agent_writes_a_project_line_by_line() {
    let mut session = WorkspaceSession::new(&AppConfig::default());

    session.ingest(streaming(json!({
        "/src/App.tsx": {"content": ["export default function App() {"], "created_at": "t0"}
    })));
    assert_eq!(session.selected_node().map(|n| n.path.as_str()), Some("src/App.tsx"));

    let report = session.ingest(streaming(json!({
        "/src/App.tsx": {"content": ["export default function App() {", "  return null;", "}"]}
    })));
    assert_eq!(report.tree_update, TreeUpdate::Patched { nodes: 1 });
    assert_eq!(report.animating_path.as_deref(), Some("src/App.tsx"));
    assert_eq!(
        session.animating_previous_content(),
        "export default function App() {"
    );
    assert_eq!(
        session.files().get("src/App.tsx"),
        Some("export default function App() {\n  return null;\n}")
    );

    let report = session.ingest(streaming(json!({
        "/src/App.tsx": {"content": ["done"]},
        "/src/styles.css": "body {}",
        "/memory/plan.md": "- build app"
    })));
    assert_eq!(report.tree_update, TreeUpdate::Rebuilt);
    assert_eq!(report.phase, Phase::StreamingAutoSelect);
    // The reserved file is the newest write but never visible.
    assert_eq!(report.selected_path.as_deref(), Some("src/styles.css"));
    assert_eq!(session.file_tree().len(), 1);
    assert!(session.files().contains("memory/plan.md"));

    let report = session.ingest(StreamSnapshot {
        is_loading: false,
        ..streaming(json!({
            "/src/App.tsx": {"content": ["done"]},
            "/src/styles.css": "body {}",
            "/memory/plan.md": "- build app"
        }))
    });
    assert_eq!(report.phase, Phase::Idle);
    assert_eq!(report.tree_update, TreeUpdate::Unchanged);
    assert_eq!(report.animating_path, None);
    assert_eq!(report.selected_path.as_deref(), Some("src/styles.css"));
    assert_eq!(session.writing_status(), None);
}

#[test]
fn emitted_deletions_are_reported_last() {
    let mut config = AppConfig::default();
    config.detection.deletions = DeletionPolicy::Emit;
    let mut session = WorkspaceSession::new(&config);

    session.ingest(streaming(json!({"a.ts": "1", "b.ts": "2"})));
    let report = session.ingest(streaming(json!({"a.ts": "1", "c.ts": "3"})));

    assert_eq!(report.changed_paths, vec!["c.ts".to_string(), "b.ts".to_string()]);
    assert_eq!(report.selected_path.as_deref(), Some("c.ts"));
}

#[test]
fn shared_session_notifies_every_tick() {
    let shared = SharedSession::new(WorkspaceSession::new(&AppConfig::default()));
    let phases = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&phases);
    shared.subscribe(Arc::new(move |report: &TickReport| {
        sink.lock().push(report.phase);
    }));

    shared.ingest(streaming(json!({"a.ts": "x", "b.ts": "y"})));
    shared.select("a.ts");
    shared.ingest(StreamSnapshot {
        is_loading: false,
        ..streaming(json!({"a.ts": "x", "b.ts": "y"}))
    });

    assert_eq!(
        *phases.lock(),
        vec![
            Phase::StreamingAutoSelect,
            Phase::StreamingManualOverride,
            Phase::Idle
        ]
    );
}
