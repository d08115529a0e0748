//! File normalizer
//!
//! The agent backend reports files as a JSON object keyed by path. Values are
//! either the content itself, a file record (`{"content": [...lines], "modified_at": ..}`),
//! or, for nested payloads, an object of children keyed by segment name.
//! Whatever arrives is folded into a [`FlatFileMap`]; malformed entries become
//! empty files rather than errors.

use crate::types::FlatFileMap;
use serde_json::{Map, Value};
use tracing::trace;

/// Segments whose subtrees hold agent bookkeeping rather than workspace files.
pub const DEFAULT_RESERVED_SEGMENTS: &[&str] = &["memory"];

/// Keys that mark an object as a file record instead of a nested directory.
const FILE_RECORD_KEYS: &[&str] = &["content", "created_at", "modified_at"];

/// Normalize a backend file payload into a canonical flat map.
///
/// Non-object payloads (null, arrays, scalars) yield an empty map.
pub fn normalize_files(raw: &Value) -> FlatFileMap {
    let mut map = FlatFileMap::new();
    if let Value::Object(entries) = raw {
        collect_entries(entries, "", &mut map);
    }
    map
}

fn collect_entries(entries: &Map<String, Value>, prefix: &str, out: &mut FlatFileMap) {
    for (raw_path, value) in entries {
        let joined = if prefix.is_empty() {
            raw_path.clone()
        } else {
            format!("{}/{}", prefix, raw_path)
        };
        let Some(path) = canonical_path(&joined) else {
            trace!(raw_path = %raw_path, "Skipping file entry with empty path");
            continue;
        };

        match value {
            Value::Object(children) if is_nested_directory(children) => {
                collect_entries(children, &path, out);
            }
            other => {
                out.insert(path, content_of(other));
            }
        }
    }
}

fn is_nested_directory(obj: &Map<String, Value>) -> bool {
    !obj.is_empty() && !FILE_RECORD_KEYS.iter().any(|k| obj.contains_key(*k))
}

fn content_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(record) => match record.get("content") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(lines)) => lines
                .iter()
                .map(|line| line.as_str().unwrap_or(""))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        },
        _ => String::new(),
    }
}

/// Canonicalize a backend path: no leading `/` or `./`, no empty or `.` segments.
///
/// Returns `None` when nothing remains.
pub fn canonical_path(raw: &str) -> Option<String> {
    let segments: Vec<&str> = raw
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// True when any directory segment of `path` is reserved.
///
/// Only directory segments count: `memory/notes.md` is reserved, a file that
/// is itself named `memory` is not.
pub fn is_reserved_path<S: AsRef<str>>(path: &str, reserved: &[S]) -> bool {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    segments.pop();
    segments
        .iter()
        .any(|segment| reserved.iter().any(|r| r.as_ref() == *segment))
}
