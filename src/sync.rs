//! Tree Synchronizer
//!
//! Reducer that folds each tick's file map and change set into the visible
//! tree plus the selection/animation state. The tree is rebuilt only when the
//! set of paths changes; content-only ticks patch the affected leaves and keep
//! every other branch shared with the previous tree.
//!
//! Selection arbitration during a stream:
//! - the system follows the most recent write (auto-selection) unless
//! - the user picked a node during the current loading cycle, which pins the
//!   selection until loading ends.

use crate::detect::ChangeSet;
use crate::tree::{find_node_by_path, first_file, replace_file_content, FileNode, TreeBuilder};
use crate::types::FlatFileMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Streaming/selection state derived from a [`SyncState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No active stream
    Idle,
    /// Stream active and the displayed node was chosen by the system
    StreamingAutoSelect,
    /// Stream active and the user picked the displayed node
    StreamingManualOverride,
    /// Stream active and nothing has been auto-selected yet in this cycle
    StreamingNoSelection,
}

/// How the last tick changed the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeUpdate {
    #[default]
    Unchanged,
    Patched {
        nodes: usize,
    },
    Rebuilt,
}

/// Selection behavior configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Show the first file in tree order when nothing is selected
    #[serde(default = "default_true")]
    pub fallback_to_first_file: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            fallback_to_first_file: default_true(),
        }
    }
}

/// Inputs to the reducer
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A new snapshot from the stream, already diffed
    Tick {
        files: FlatFileMap,
        changes: ChangeSet,
        is_loading: bool,
    },
    /// User-initiated selection of the node at `path`
    Select { path: String },
}

/// Synchronizer state; advanced only through [`SyncState::reduce`].
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    builder: TreeBuilder,
    selection_config: SelectionConfig,
    files: FlatFileMap,
    tree: Vec<Arc<FileNode>>,
    changes: ChangeSet,
    selected: Option<Arc<FileNode>>,
    auto_selected_path: Option<String>,
    manual_override: bool,
    is_loading: bool,
    last_update: TreeUpdate,
}

impl SyncState {
    pub fn new(builder: TreeBuilder, selection_config: SelectionConfig) -> Self {
        Self {
            builder,
            selection_config,
            ..Self::default()
        }
    }

    /// Apply one event, producing the next state.
    pub fn reduce(self, event: SyncEvent) -> Self {
        match event {
            SyncEvent::Tick {
                files,
                changes,
                is_loading,
            } => self.on_tick(files, changes, is_loading),
            SyncEvent::Select { path } => self.on_select(&path),
        }
    }

    fn on_tick(mut self, files: FlatFileMap, changes: ChangeSet, is_loading: bool) -> Self {
        if self.is_loading != is_loading {
            // Either edge starts from a clean slate: a new cycle has no
            // override yet, and a finished one no longer drives the selection.
            self.auto_selected_path = None;
            self.manual_override = false;
            debug!(is_loading, "Loading state changed");
        }
        self.is_loading = is_loading;

        self.last_update = self.update_tree(&files);
        self.files = files;
        self.changes = changes;

        self.refresh_selection();

        if self.is_loading && !self.manual_override {
            if let Some(node) = self.latest_written_node() {
                debug!(path = %node.path, "Auto-selecting changed file");
                self.auto_selected_path = Some(node.path.clone());
                self.selected = Some(node);
            }
        }

        if self.selected.is_none() && self.selection_config.fallback_to_first_file {
            self.selected = first_file(&self.tree);
        }

        self
    }

    fn on_select(mut self, path: &str) -> Self {
        match find_node_by_path(&self.tree, path) {
            Some(node) => {
                self.selected = Some(node);
                self.auto_selected_path = None;
                if self.is_loading {
                    self.manual_override = true;
                }
                debug!(path = %path, is_loading = self.is_loading, "User selected node");
            }
            None => debug!(path = %path, "Ignoring selection of unknown path"),
        }
        self
    }

    fn update_tree(&mut self, files: &FlatFileMap) -> TreeUpdate {
        if !files.same_paths(&self.files) {
            self.tree = self.builder.build(files);
            info!(paths = files.len(), "Rebuilt file tree");
            return TreeUpdate::Rebuilt;
        }

        let mut patched = 0usize;
        for (path, content) in files.iter() {
            if self.files.get(path) == Some(content) || self.builder.is_hidden(path) {
                continue;
            }
            if let Some(tree) = replace_file_content(&self.tree, path, content) {
                self.tree = tree;
                patched += 1;
            }
        }

        if patched == 0 {
            TreeUpdate::Unchanged
        } else {
            TreeUpdate::Patched { nodes: patched }
        }
    }

    fn refresh_selection(&mut self) {
        let Some(previous) = self.selected.take() else {
            return;
        };
        self.selected = find_node_by_path(&self.tree, &previous.path);
        if self.selected.is_none() {
            debug!(path = %previous.path, "Selected node no longer exists");
            if self.auto_selected_path.as_deref() == Some(previous.path.as_str()) {
                self.auto_selected_path = None;
            }
        }
    }

    /// Newest created/modified path that is a visible file.
    fn latest_written_node(&self) -> Option<Arc<FileNode>> {
        self.changes
            .writes_newest_first()
            .find_map(|c| find_node_by_path(&self.tree, &c.path).filter(|n| n.is_file()))
    }

    pub fn phase(&self) -> Phase {
        if !self.is_loading {
            Phase::Idle
        } else if self.manual_override {
            Phase::StreamingManualOverride
        } else if self.auto_selected_path.is_some() {
            Phase::StreamingAutoSelect
        } else {
            Phase::StreamingNoSelection
        }
    }

    pub fn file_tree(&self) -> &[Arc<FileNode>] {
        &self.tree
    }

    pub fn files(&self) -> &FlatFileMap {
        &self.files
    }

    pub fn selected_node(&self) -> Option<&Arc<FileNode>> {
        self.selected.as_ref()
    }

    pub fn auto_selected_path(&self) -> Option<&str> {
        self.auto_selected_path.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_update(&self) -> TreeUpdate {
        self.last_update
    }

    /// Changes from the latest tick
    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Path being animated: set only while loading and the system-chosen
    /// path is the one on screen.
    pub fn animating_path(&self) -> Option<&str> {
        if !self.is_loading {
            return None;
        }
        let auto = self.auto_selected_path.as_deref()?;
        let selected = self.selected.as_ref()?;
        (selected.path == auto).then_some(auto)
    }

    pub fn animating_previous_content(&self) -> &str {
        self.animating_path()
            .map(|path| self.changes.previous_content_for(path))
            .unwrap_or("")
    }

    pub fn builder(&self) -> &TreeBuilder {
        &self.builder
    }

    pub fn selection_config(&self) -> &SelectionConfig {
        &self.selection_config
    }
}

/// Owns a [`SyncState`] and feeds it events in place.
#[derive(Debug, Clone, Default)]
pub struct TreeSynchronizer {
    state: SyncState,
}

impl TreeSynchronizer {
    pub fn new(builder: TreeBuilder, selection_config: SelectionConfig) -> Self {
        Self {
            state: SyncState::new(builder, selection_config),
        }
    }

    pub fn dispatch(&mut self, event: SyncEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(event);
    }

    pub fn tick(&mut self, files: FlatFileMap, changes: ChangeSet, is_loading: bool) {
        self.dispatch(SyncEvent::Tick {
            files,
            changes,
            is_loading,
        });
    }

    /// User selection; returns the selected node when `path` exists.
    pub fn select(&mut self, path: &str) -> Option<Arc<FileNode>> {
        self.dispatch(SyncEvent::Select {
            path: path.to_string(),
        });
        self.state
            .selected_node()
            .filter(|n| n.path == path)
            .cloned()
    }

    /// Drop all tree and selection state, keeping configuration.
    pub fn reset(&mut self) {
        self.state = SyncState::new(
            self.state.builder().clone(),
            self.state.selection_config().clone(),
        );
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }
}
