//! CLI Tooling
//!
//! Command-line interface for inspecting recorded agent streams: replay a
//! snapshot log through the synchronizer, build a tree from a file map, diff
//! two file maps, check what the sandbox preview would receive, and print
//! the effective configuration.

use crate::config::{AppConfig, ConfigLoader};
use crate::detect::{diff_maps, ChangeSet, DeletionPolicy};
use crate::error::ApiError;
use crate::files::normalize_files;
use crate::preview::{detect_template, has_minimum_files, sandbox_files};
use crate::session::{StreamSnapshot, TickReport, WorkspaceSession};
use crate::sync::TreeUpdate;
use crate::tree::{count_nodes, render_tree, TreeBuilder};
use crate::types::FlatFileMap;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::info;

/// Streamtree CLI - Deterministic file-tree synchronization for agent streams
#[derive(Parser)]
#[command(name = "streamtree")]
#[command(about = "Deterministic file-tree synchronization for streaming coding-agent workspaces")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold logging flags into the loaded configuration.
    pub fn apply_log_overrides(&self, config: &mut AppConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Replay a JSONL snapshot log through the synchronizer
    Replay {
        /// One snapshot (or {"select": "<path>"}) per line
        path: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Build and print the tree for a file map
    Tree {
        /// JSON file map as sent by the backend
        path: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List changes between two file maps
    Diff {
        before: PathBuf,
        after: PathBuf,
        /// Also report removed paths
        #[arg(long)]
        deletions: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the sandbox template and files for a file map
    Preview {
        path: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the effective configuration after merging all sources
    Config {
        /// Output format (text renders TOML, or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// One line of a replay log
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayLine {
    Select { select: String },
    Snapshot(StreamSnapshot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(format: &str) -> Result<Self, ApiError> {
        match format {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ApiError::InvalidArgument(format!(
                "Unknown format '{}' (must be 'text' or 'json')",
                other
            ))),
        }
    }
}

/// CLI context
pub struct CliContext {
    config: AppConfig,
}

impl CliContext {
    /// Create a context, loading configuration from `config_path` or the standard sources.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Replay { path, format } => self.replay(path, OutputFormat::parse(format)?),
            Commands::Tree { path, format } => self.tree(path, OutputFormat::parse(format)?),
            Commands::Diff {
                before,
                after,
                deletions,
                format,
            } => self.diff(before, after, *deletions, OutputFormat::parse(format)?),
            Commands::Preview { path, format } => self.preview(path, OutputFormat::parse(format)?),
            Commands::Config { format } => self.show_config(OutputFormat::parse(format)?),
        }
    }

    fn replay(&self, path: &Path, format: OutputFormat) -> Result<String, ApiError> {
        let text = std::fs::read_to_string(path)?;
        let mut session = WorkspaceSession::new(&self.config);
        let mut reports: Vec<TickReport> = Vec::new();

        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let parsed: ReplayLine =
                serde_json::from_str(line).map_err(|source| ApiError::InvalidSnapshot {
                    line: index + 1,
                    source,
                })?;
            match parsed {
                ReplayLine::Select { select } => {
                    if session.set_selected_node(&select).is_some() {
                        reports.push(session.current_report());
                    }
                }
                ReplayLine::Snapshot(snapshot) => reports.push(session.ingest(snapshot)),
            }
        }
        info!(ticks = session.ticks(), "Replay finished");

        let selected = session.selected_node().map(|n| n.path.clone());
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "ticks": reports,
                "tree": session.file_tree(),
                "selected": selected,
                "writing_status": session.writing_status(),
                "open_todos": session.open_todo_count(),
            }))?),
            OutputFormat::Text => {
                let mut table = Table::new();
                table.load_preset(comfy_table::presets::UTF8_FULL);
                table.set_header(vec![
                    "Tick", "Phase", "Tree", "Changes", "Selected", "Animating",
                ]);
                for report in &reports {
                    table.add_row(vec![
                        report.tick.to_string(),
                        format!("{:?}", report.phase),
                        describe_update(report.tree_update),
                        report.changes_count.to_string(),
                        report.selected_path.clone().unwrap_or_else(|| "-".to_string()),
                        report.animating_path.clone().unwrap_or_else(|| "-".to_string()),
                    ]);
                }
                Ok(format!(
                    "{}\n\nFinal tree:\n{}",
                    table,
                    render_tree(session.file_tree(), selected.as_deref())
                ))
            }
        }
    }

    fn tree(&self, path: &Path, format: OutputFormat) -> Result<String, ApiError> {
        let files = read_file_map(path)?;
        let tree = TreeBuilder::new()
            .with_config(self.config.tree.clone())
            .build(&files);
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&tree)?),
            OutputFormat::Text => {
                let (folders, file_count) = count_nodes(&tree);
                Ok(format!(
                    "{}\n{} folders, {} files",
                    render_tree(&tree, None),
                    folders,
                    file_count
                ))
            }
        }
    }

    fn diff(
        &self,
        before: &Path,
        after: &Path,
        deletions: bool,
        format: OutputFormat,
    ) -> Result<String, ApiError> {
        let policy = if deletions {
            DeletionPolicy::Emit
        } else {
            self.config.detection.deletions
        };
        let changes = ChangeSet::new(diff_maps(
            &read_file_map(before)?,
            &read_file_map(after)?,
            policy,
        ));
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&changes)?),
            OutputFormat::Text => {
                if changes.is_empty() {
                    return Ok("No changes".to_string());
                }
                let mut table = Table::new();
                table.load_preset(comfy_table::presets::UTF8_FULL);
                table.set_header(vec!["Path", "Kind", "Previous bytes"]);
                for change in &changes.changes {
                    table.add_row(vec![
                        change.path.clone(),
                        format!("{:?}", change.kind).to_lowercase(),
                        change.previous_content.len().to_string(),
                    ]);
                }
                Ok(format!("{}\n{} change(s)", table, changes.count))
            }
        }
    }

    fn preview(&self, path: &Path, format: OutputFormat) -> Result<String, ApiError> {
        let files = read_file_map(path)?;
        let sandbox = sandbox_files(&files, &self.config.tree.reserved_segments);
        let template = detect_template(&files);
        let ready = has_minimum_files(&files);
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "template": template,
                "has_minimum_files": ready,
                "files": sandbox.keys().collect::<Vec<_>>(),
            }))?),
            OutputFormat::Text => {
                let mut output = format!(
                    "Template: {}\nReady: {}\n",
                    serde_json::to_value(template)?
                        .as_str()
                        .unwrap_or_default(),
                    if ready { "yes" } else { "no (no script files yet)" }
                );
                for sandbox_path in sandbox.keys() {
                    output.push_str(&format!("  {}\n", sandbox_path));
                }
                Ok(output)
            }
        }
    }

    fn show_config(&self, format: OutputFormat) -> Result<String, ApiError> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&self.config)?),
            OutputFormat::Text => toml::to_string_pretty(&self.config).map_err(|e| {
                ApiError::ConfigError(format!("Failed to serialize configuration: {}", e))
            }),
        }
    }
}

fn describe_update(update: TreeUpdate) -> String {
    match update {
        TreeUpdate::Unchanged => "unchanged".to_string(),
        TreeUpdate::Patched { nodes } => format!("patched ({})", nodes),
        TreeUpdate::Rebuilt => "rebuilt".to_string(),
    }
}

fn read_file_map(path: &Path) -> Result<FlatFileMap, ApiError> {
    let text = std::fs::read_to_string(path)?;
    let raw: Value = serde_json::from_str(&text)?;
    if !raw.is_object() {
        return Err(ApiError::InvalidFileMap(format!(
            "{} does not contain a JSON object",
            path.display()
        )));
    }
    Ok(normalize_files(&raw))
}
