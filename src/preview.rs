//! Sandbox preview input
//!
//! Prepares the file set handed to the in-browser bundler: reserved paths are
//! dropped, paths become absolute, and the bundler template is inferred from
//! the file names and imports.

use crate::files::is_reserved_path;
use crate::types::FlatFileMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Bundler template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    React,
    ReactTs,
    Vanilla,
    VanillaTs,
}

const SCRIPT_EXTENSIONS: &[&str] = &[".js", ".jsx", ".ts", ".tsx"];
const REACT_ENTRY_NAMES: &[&str] = &["App.tsx", "App.jsx", "App.js"];
const REACT_IMPORT_MARKERS: &[&str] = &["import React", "from \"react\"", "from 'react'"];

/// Files for the sandbox, keyed by absolute path, reserved paths excluded.
pub fn sandbox_files<S: AsRef<str>>(files: &FlatFileMap, reserved: &[S]) -> IndexMap<String, String> {
    files
        .iter()
        .filter(|(path, _)| !is_reserved_path(path, reserved))
        .map(|(path, content)| {
            let absolute = if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{}", path)
            };
            (absolute, content.to_string())
        })
        .collect()
}

/// Pick the bundler template for `files`.
pub fn detect_template(files: &FlatFileMap) -> Template {
    let has_typescript = files
        .paths()
        .any(|p| p.ends_with(".ts") || p.ends_with(".tsx"));
    let has_react = files
        .paths()
        .any(|p| REACT_ENTRY_NAMES.iter().any(|name| p.contains(name)))
        || files
            .iter()
            .any(|(_, content)| REACT_IMPORT_MARKERS.iter().any(|m| content.contains(m)));

    match (has_react, has_typescript) {
        (true, true) => Template::ReactTs,
        (true, false) => Template::React,
        (false, true) => Template::VanillaTs,
        (false, false) => Template::Vanilla,
    }
}

/// True once at least one script file exists to bundle.
pub fn has_minimum_files(files: &FlatFileMap) -> bool {
    files
        .paths()
        .any(|p| SCRIPT_EXTENSIONS.iter().any(|ext| p.ends_with(ext)))
}
