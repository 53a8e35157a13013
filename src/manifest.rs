//! Version field of the package build manifest.
//!
//! The release version lives in `pyproject.toml` (`[project] version`, or
//! `[tool.poetry] version` for Poetry projects). `[package] version` is
//! also understood so the same flow works on a `Cargo.toml`. Edits go
//! through `toml_edit` so comments and layout survive the rewrite.

use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use std::fs;
use std::path::Path;
use toml_edit::{DocumentMut, Item, Value};
use tracing::{debug, info};

/// Table paths checked for a `version` key, in priority order
const VERSION_TABLES: &[&[&str]] = &[&["project"], &["tool", "poetry"], &["package"]];

fn parse_document(text: &str) -> Result<DocumentMut> {
    text.parse::<DocumentMut>()
        .map_err(|e| ReleaseError::manifest(format!("invalid TOML: {}", e)))
}

fn table_item<'d>(doc: &'d DocumentMut, path: &[&str]) -> Option<&'d Item> {
    let mut item = doc.as_item();
    for key in path {
        item = item.get(key)?;
    }
    Some(item)
}

/// Dotted name of the first table that defines `version`
fn version_table(doc: &DocumentMut) -> Option<&'static [&'static str]> {
    VERSION_TABLES
        .iter()
        .copied()
        .find(|path| table_item(doc, path).and_then(|t| t.get("version")).is_some())
}

/// Read the package version from manifest text
pub fn read_version(text: &str) -> Result<Version> {
    let doc = parse_document(text)?;
    let path = version_table(&doc)
        .ok_or_else(|| ReleaseError::manifest("no version field found"))?;

    let field = format!("{}.version", path.join("."));
    let raw = table_item(&doc, path)
        .and_then(|t| t.get("version"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| ReleaseError::manifest(format!("{} is not a string", field)))?;

    debug!(field = %field, raw, "read manifest version");
    Version::parse(raw).map_err(|e| ReleaseError::manifest(format!("{}: {}", field, e)))
}

/// Return `text` with its version field replaced by `version`.
///
/// Only the value changes; surrounding whitespace and comments are kept.
pub fn set_version(text: &str, version: &Version) -> Result<String> {
    let mut doc = parse_document(text)?;
    let path = version_table(&doc)
        .ok_or_else(|| ReleaseError::manifest("no version field found"))?;

    let mut item = doc.as_item_mut();
    for key in path {
        item = item
            .get_mut(key)
            .ok_or_else(|| ReleaseError::manifest(format!("missing table {}", key)))?;
    }
    let value = item
        .get_mut("version")
        .and_then(Item::as_value_mut)
        .ok_or_else(|| ReleaseError::manifest("version is not a value"))?;

    let decor = value.decor().clone();
    *value = Value::from(version.to_string());
    *value.decor_mut() = decor;

    Ok(doc.to_string())
}

/// Read the version from the manifest file at `path`
pub fn load_version(path: &Path) -> Result<Version> {
    let text = fs::read_to_string(path).map_err(|e| {
        ReleaseError::manifest(format!("cannot read '{}': {}", path.display(), e))
    })?;
    read_version(&text)
}

/// Rewrite the version in the manifest file at `path`
pub fn write_version(path: &Path, version: &Version) -> Result<()> {
    let text = fs::read_to_string(path)?;
    let updated = set_version(&text, version)?;
    fs::write(path, updated)?;

    info!(path = %path.display(), %version, "manifest version updated");
    Ok(())
}
