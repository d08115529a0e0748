use proptest::prelude::*;
use std::sync::Arc;
use streamtree::detect::{ChangeDetector, DeletionPolicy};
use streamtree::sync::{Phase, TreeSynchronizer};
use streamtree::tree::{replace_file_content, walk, FileNode, NodeKind, SortOrder, TreeBuilder};
use streamtree::types::FlatFileMap;

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z]{1,4}", 1..4).prop_map(|segments| segments.join("/"))
}

fn entries_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((path_strategy(), "[a-z0-9 ]{0,8}"), 0..24)
}

/// Deduplicate by path so reordering cannot change which content wins.
fn unique(entries: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut seen = std::collections::HashSet::new();
    entries
        .into_iter()
        .filter(|(path, _)| seen.insert(path.clone()))
        .collect()
}

fn assert_level_ordered(nodes: &[Arc<FileNode>]) {
    for pair in nodes.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.kind <= b.kind, "{} ({:?}) before {} ({:?})", a.name, a.kind, b.name, b.kind);
        if a.kind == b.kind {
            assert_ne!(
                SortOrder::CaseInsensitive.compare(&a.name, &b.name),
                std::cmp::Ordering::Greater,
                "{} sorted before {}",
                a.name,
                b.name
            );
        }
    }
    for node in nodes {
        assert_level_ordered(&node.children);
    }
}

proptest! {
    #[test]
    fn build_ignores_enumeration_order(entries in entries_strategy()) {
        let entries = unique(entries);
        let forward = FlatFileMap::from_pairs(entries.clone());
        let backward = FlatFileMap::from_pairs(entries.into_iter().rev());

        let builder = TreeBuilder::new();
        prop_assert_eq!(builder.build(&forward), builder.build(&backward));
    }

    #[test]
    fn folders_precede_files_and_names_are_sorted(entries in entries_strategy()) {
        let tree = TreeBuilder::new().build(&FlatFileMap::from_pairs(entries));
        assert_level_ordered(&tree);
    }

    #[test]
    fn reserved_paths_never_reach_the_tree(
        entries in entries_strategy(),
        hidden in prop::collection::vec(path_strategy(), 1..6),
    ) {
        let mut files = FlatFileMap::from_pairs(entries);
        for path in &hidden {
            files.insert(format!("memory/{}", path), "notes");
        }
        let tree = TreeBuilder::new().build(&files);

        let mut leaked = Vec::new();
        walk(&tree, &mut |node: &FileNode, _depth: usize| {
            if node.path.split('/').any(|s| s == "memory") {
                leaked.push(node.path.clone());
            }
        });
        prop_assert!(leaked.is_empty(), "leaked: {:?}", leaked);
        for path in &hidden {
            let memory_path = format!("memory/{}", path);
            prop_assert!(files.contains(&memory_path));
        }
    }

    #[test]
    fn second_detect_of_same_map_is_empty(entries in entries_strategy()) {
        let files = FlatFileMap::from_pairs(entries);
        let mut detector = ChangeDetector::new(DeletionPolicy::Emit);
        detector.detect(&files);
        prop_assert!(detector.detect(&files).is_empty());
    }

    #[test]
    fn patch_matches_full_rebuild(entries in entries_strategy(), content in "[a-z]{0,6}") {
        let mut files = FlatFileMap::from_pairs(entries);
        let builder = TreeBuilder::new();
        let tree = builder.build(&files);

        let mut target = None;
        walk(&tree, &mut |node: &FileNode, _depth: usize| {
            if target.is_none() && node.kind == NodeKind::File {
                target = Some(node.path.clone());
            }
        });

        if let Some(path) = target {
            files.insert(path.clone(), content.clone());
            let patched = replace_file_content(&tree, &path, &content).unwrap_or(tree);
            prop_assert_eq!(patched, builder.build(&files));
        }
    }

    #[test]
    fn manual_selection_survives_stream_writes(
        writes in prop::collection::vec(("[a-d]\\.ts", "[a-z]{1,4}"), 1..12),
    ) {
        let mut files = FlatFileMap::from_pairs([("pinned.ts", "p"), ("a.ts", "")]);
        let mut detector = ChangeDetector::new(DeletionPolicy::Ignore);
        let mut sync = TreeSynchronizer::default();
        sync.tick(files.clone(), detector.detect(&files), true);
        prop_assert!(sync.select("pinned.ts").is_some());

        for (path, content) in writes {
            files.insert(path, content);
            let changes = detector.detect(&files);
            sync.tick(files.clone(), changes, true);
            prop_assert_eq!(sync.state().phase(), Phase::StreamingManualOverride);
            prop_assert_eq!(
                sync.state().selected_node().map(|n| n.path.as_str()),
                Some("pinned.ts")
            );
        }
    }
}
