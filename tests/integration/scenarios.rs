use streamtree::detect::{ChangeDetector, ChangeKind, DeletionPolicy};
use streamtree::sync::{Phase, TreeSynchronizer, TreeUpdate};
use streamtree::tree::{NodeKind, TreeBuilder};
use streamtree::types::FlatFileMap;

fn map(pairs: &[(&str, &str)]) -> FlatFileMap {
    FlatFileMap::from_pairs(pairs.iter().copied())
}

struct Harness {
    detector: ChangeDetector,
    sync: TreeSynchronizer,
}

impl Harness {
    fn new() -> Self {
        Self {
            detector: ChangeDetector::new(DeletionPolicy::Ignore),
            sync: TreeSynchronizer::default(),
        }
    }

    fn tick(&mut self, files: FlatFileMap, is_loading: bool) {
        let changes = self.detector.detect(&files);
        self.sync.tick(files, changes, is_loading);
    }

    fn selected(&self) -> Option<String> {
        self.sync.state().selected_node().map(|n| n.path.clone())
    }
}

#[test]
fn single_folder_with_sorted_file_children() {
    let tree = TreeBuilder::new().build(&map(&[("src/App.tsx", "a"), ("src/util.ts", "b")]));

    assert_eq!(tree.len(), 1);
    let src = &tree[0];
    assert_eq!(src.name, "src");
    assert_eq!(src.kind, NodeKind::Folder);

    let names: Vec<&str> = src.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["App.tsx", "util.ts"]);
    assert!(src.children.iter().all(|c| c.kind == NodeKind::File));
}

#[test]
fn content_edit_while_loading_auto_selects_and_animates() {
    let mut h = Harness::new();
    h.tick(map(&[("a.ts", "x")]), true);
    h.tick(map(&[("a.ts", "y")]), true);

    let state = h.sync.state();
    assert_eq!(state.changes().count, 1);
    let record = &state.changes().changes[0];
    assert_eq!(record.path, "a.ts");
    assert_eq!(record.previous_content, "x");
    assert_eq!(record.kind, ChangeKind::Modified);

    assert_eq!(h.selected().as_deref(), Some("a.ts"));
    assert_eq!(state.phase(), Phase::StreamingAutoSelect);
    assert_eq!(state.animating_path(), Some("a.ts"));
    assert_eq!(state.animating_previous_content(), "x");
    assert_eq!(state.last_update(), TreeUpdate::Patched { nodes: 1 });
}

#[test]
fn new_path_triggers_rebuild_with_empty_previous_content() {
    let mut h = Harness::new();
    h.tick(map(&[("a.ts", "x")]), true);
    h.tick(map(&[("a.ts", "x"), ("b.ts", "z")]), true);

    let state = h.sync.state();
    assert_eq!(state.last_update(), TreeUpdate::Rebuilt);
    assert_eq!(state.changes().count, 1);
    assert_eq!(state.changes().changes[0].path, "b.ts");
    assert_eq!(state.changes().changes[0].previous_content, "");
    assert_eq!(state.file_tree().len(), 2);
}

#[test]
fn loading_end_stops_animation_but_keeps_selection() {
    let mut h = Harness::new();
    h.tick(map(&[("a.ts", "x")]), true);
    h.tick(map(&[("a.ts", "y")]), true);
    h.tick(map(&[("a.ts", "y")]), false);

    let state = h.sync.state();
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.animating_path(), None);
    assert_eq!(state.animating_previous_content(), "");
    assert_eq!(h.selected().as_deref(), Some("a.ts"));
}

#[test]
fn manual_selection_pins_until_loading_ends() {
    let mut h = Harness::new();
    h.tick(map(&[("a.ts", "x"), ("b.ts", "z")]), true);
    h.tick(map(&[("a.ts", "y"), ("b.ts", "z")]), true);
    assert_eq!(h.selected().as_deref(), Some("a.ts"));

    assert!(h.sync.select("b.ts").is_some());
    assert_eq!(h.sync.state().phase(), Phase::StreamingManualOverride);

    h.tick(map(&[("a.ts", "yy"), ("b.ts", "z"), ("c.ts", "new")]), true);
    assert_eq!(h.selected().as_deref(), Some("b.ts"));
    assert_eq!(h.sync.state().phase(), Phase::StreamingManualOverride);
    assert_eq!(h.sync.state().animating_path(), None);

    h.tick(map(&[("a.ts", "yy"), ("b.ts", "z"), ("c.ts", "new")]), false);
    assert_eq!(h.sync.state().phase(), Phase::Idle);
    assert_eq!(h.selected().as_deref(), Some("b.ts"));

    // A new cycle follows writes again.
    h.tick(map(&[("a.ts", "final"), ("b.ts", "z"), ("c.ts", "new")]), true);
    assert_eq!(h.selected().as_deref(), Some("a.ts"));
    assert_eq!(h.sync.state().phase(), Phase::StreamingAutoSelect);
}

#[test]
fn deleted_selection_falls_back_to_first_file() {
    let mut h = Harness::new();
    h.tick(map(&[("b.ts", "1"), ("z.ts", "2")]), false);
    h.sync.select("z.ts");
    h.tick(map(&[("b.ts", "1")]), false);

    assert_eq!(h.selected().as_deref(), Some("b.ts"));
    assert_eq!(h.sync.state().last_update(), TreeUpdate::Rebuilt);
}

#[test]
fn rooted_keys_from_a_direct_caller_still_patch() {
    let mut h = Harness::new();
    h.tick(map(&[("/src/a.ts", "old")]), true);
    h.tick(map(&[("/src/a.ts", "new")]), true);

    let state = h.sync.state();
    assert_eq!(state.last_update(), TreeUpdate::Patched { nodes: 1 });
    let shown = state.selected_node().unwrap();
    assert_eq!(shown.path, "src/a.ts");
    assert_eq!(shown.content.as_deref(), Some("new"));
    assert_eq!(state.files().get("src/a.ts"), Some("new"));
    assert_eq!(state.animating_path(), Some("src/a.ts"));
    assert_eq!(state.animating_previous_content(), "old");
}
