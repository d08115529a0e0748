//! Workspace Session
//!
//! One synchronous pass per streamed snapshot:
//! normalize → detect → reduce. The session exposes everything the chat,
//! file and preview panes read.

use crate::chat::{
    normalize_messages, normalize_todos, open_todo_count, show_thinking_indicator,
    writing_status, ChatMessage, TodoItem,
};
use crate::config::AppConfig;
use crate::detect::{ChangeDetector, ChangeRecord};
use crate::files::normalize_files;
use crate::sync::{Phase, TreeSynchronizer, TreeUpdate};
use crate::tree::{FileNode, TreeBuilder};
use crate::types::FlatFileMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// One update delivered by the chat driver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamSnapshot {
    #[serde(default)]
    pub messages: Vec<Value>,
    #[serde(default)]
    pub files: Value,
    #[serde(default)]
    pub todos: Vec<Value>,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default)]
    pub thread_id: Option<String>,
}

/// Summary of one processed tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub phase: Phase,
    pub tree_update: TreeUpdate,
    pub changes_count: usize,
    pub changed_paths: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animating_path: Option<String>,
    pub thread_reset: bool,
}

/// Streaming workspace view model
pub struct WorkspaceSession {
    detector: ChangeDetector,
    sync: TreeSynchronizer,
    messages: Vec<ChatMessage>,
    todos: Vec<TodoItem>,
    thread_id: Option<String>,
    ticks: u64,
}

impl WorkspaceSession {
    pub fn new(config: &AppConfig) -> Self {
        let builder = TreeBuilder::new().with_config(config.tree.clone());
        Self {
            detector: ChangeDetector::new(config.detection.deletions),
            sync: TreeSynchronizer::new(builder, config.selection.clone()),
            messages: Vec::new(),
            todos: Vec::new(),
            thread_id: None,
            ticks: 0,
        }
    }

    /// Process one snapshot.
    pub fn ingest(&mut self, snapshot: StreamSnapshot) -> TickReport {
        self.ticks += 1;
        let thread_reset = self.switch_thread(snapshot.thread_id);

        let files = normalize_files(&snapshot.files);
        let changes = self.detector.detect(&files);
        self.messages = normalize_messages(&snapshot.messages);
        self.todos = normalize_todos(&snapshot.todos);
        self.sync.tick(files, changes, snapshot.is_loading);

        let report = self.report(thread_reset);
        debug!(
            tick = report.tick,
            phase = ?report.phase,
            update = ?report.tree_update,
            changes = report.changes_count,
            "Processed snapshot"
        );
        report
    }

    fn switch_thread(&mut self, thread_id: Option<String>) -> bool {
        let reset = matches!(
            (&self.thread_id, &thread_id),
            (Some(current), Some(next)) if current != next
        );
        if reset {
            info!(from = ?self.thread_id, to = ?thread_id, "Thread changed; resetting workspace state");
            self.detector.reset();
            self.sync.reset();
        }
        if thread_id.is_some() {
            self.thread_id = thread_id;
        }
        reset
    }

    fn report(&self, thread_reset: bool) -> TickReport {
        let state = self.sync.state();
        TickReport {
            tick: self.ticks,
            phase: state.phase(),
            tree_update: state.last_update(),
            changes_count: state.changes().count,
            changed_paths: state.changes().paths().map(str::to_string).collect(),
            selected_path: state.selected_node().map(|n| n.path.clone()),
            animating_path: state.animating_path().map(str::to_string),
            thread_reset,
        }
    }

    /// User selection; unknown paths are ignored.
    pub fn set_selected_node(&mut self, path: &str) -> Option<Arc<FileNode>> {
        self.sync.select(path)
    }

    /// Report reflecting the current state without counting a new tick.
    pub fn current_report(&self) -> TickReport {
        self.report(false)
    }

    pub fn file_tree(&self) -> &[Arc<FileNode>] {
        self.sync.state().file_tree()
    }

    pub fn files(&self) -> &FlatFileMap {
        self.sync.state().files()
    }

    pub fn selected_node(&self) -> Option<&Arc<FileNode>> {
        self.sync.state().selected_node()
    }

    pub fn animating_file_path(&self) -> Option<&str> {
        self.sync.state().animating_path()
    }

    pub fn animating_previous_content(&self) -> &str {
        self.sync.state().animating_previous_content()
    }

    pub fn all_changes(&self) -> &[ChangeRecord] {
        &self.sync.state().changes().changes
    }

    pub fn changes_count(&self) -> usize {
        self.sync.state().changes().count
    }

    pub fn phase(&self) -> Phase {
        self.sync.state().phase()
    }

    pub fn is_loading(&self) -> bool {
        self.sync.state().is_loading()
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn todos(&self) -> &[TodoItem] {
        &self.todos
    }

    pub fn open_todo_count(&self) -> usize {
        open_todo_count(&self.todos)
    }

    pub fn writing_status(&self) -> Option<String> {
        writing_status(self.is_loading(), self.changes_count())
    }

    pub fn show_thinking_indicator(&self) -> bool {
        show_thinking_indicator(&self.messages, self.is_loading())
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
