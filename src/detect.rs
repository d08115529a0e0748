//! Change Detection
//!
//! Compares each streamed file map against the one seen on the previous tick
//! and reports which paths changed, keeping the prior content of each so the
//! UI can animate the edit as a diff.

use crate::types::FlatFileMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// What to do with paths that disappear between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionPolicy {
    /// Removals produce no record (the UI never animates them)
    #[default]
    Ignore,
    /// Removals produce `ChangeKind::Deleted` records after all other changes
    Emit,
}

/// Kind of per-path change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

/// One detected modification between two successive snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub path: String,
    /// Content before this tick; empty for created files
    pub previous_content: String,
    pub kind: ChangeKind,
}

/// All changes detected on one tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub changes: Vec<ChangeRecord>,
    pub count: usize,
}

impl ChangeSet {
    pub fn new(changes: Vec<ChangeRecord>) -> Self {
        let count = changes.len();
        Self { changes, count }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Most recent change (last in order)
    pub fn latest(&self) -> Option<&ChangeRecord> {
        self.changes.last()
    }

    /// Creations and modifications, newest first; deletions are skipped.
    pub fn writes_newest_first(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.changes
            .iter()
            .rev()
            .filter(|c| c.kind != ChangeKind::Deleted)
    }

    /// Most recent creation or modification.
    pub fn latest_write(&self) -> Option<&ChangeRecord> {
        self.writes_newest_first().next()
    }

    pub fn get(&self, path: &str) -> Option<&ChangeRecord> {
        self.changes.iter().find(|c| c.path == path)
    }

    /// Previous content recorded for `path`, or `""` when it did not change.
    pub fn previous_content_for(&self, path: &str) -> &str {
        self.get(path)
            .map(|c| c.previous_content.as_str())
            .unwrap_or("")
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(|c| c.path.as_str())
    }
}

/// Stateful detector holding the previously seen snapshot
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    previous: FlatFileMap,
    policy: DeletionPolicy,
}

impl ChangeDetector {
    pub fn new(policy: DeletionPolicy) -> Self {
        Self {
            previous: FlatFileMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> DeletionPolicy {
        self.policy
    }

    /// Snapshot the next call will diff against.
    pub fn previous(&self) -> &FlatFileMap {
        &self.previous
    }

    /// Diff `current` against the retained snapshot, then retain `current`.
    pub fn detect(&mut self, current: &FlatFileMap) -> ChangeSet {
        let changes = diff_maps(&self.previous, current, self.policy);
        if !changes.is_empty() {
            trace!(count = changes.len(), "Detected file changes");
        }
        self.previous = current.clone();
        ChangeSet::new(changes)
    }

    /// Forget the retained snapshot; the next tick reports every path as created.
    pub fn reset(&mut self) {
        self.previous = FlatFileMap::new();
    }
}

/// Pure diff of two snapshots.
pub fn diff_maps(
    previous: &FlatFileMap,
    current: &FlatFileMap,
    policy: DeletionPolicy,
) -> Vec<ChangeRecord> {
    let mut changes: Vec<ChangeRecord> = current
        .iter()
        .filter_map(|(path, content)| match previous.get(path) {
            None => Some(ChangeRecord {
                path: path.to_string(),
                previous_content: String::new(),
                kind: ChangeKind::Created,
            }),
            Some(before) if before != content => Some(ChangeRecord {
                path: path.to_string(),
                previous_content: before.to_string(),
                kind: ChangeKind::Modified,
            }),
            Some(_) => None,
        })
        .collect();

    if policy == DeletionPolicy::Emit {
        changes.extend(
            previous
                .iter()
                .filter(|(path, _)| !current.contains(path))
                .map(|(path, content)| ChangeRecord {
                    path: path.to_string(),
                    previous_content: content.to_string(),
                    kind: ChangeKind::Deleted,
                }),
        );
    }

    changes
}
