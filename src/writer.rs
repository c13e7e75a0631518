//! # Destination Writer
//!
//! This module persists compiled documents to their destination files and
//! keeps the project's `.gitignore` aware of hidden destinations.
//!
//! The default write mode reconciles against whatever is already on disk,
//! so regenerating a project never clobbers values a person has filled in.
//! An existing file that fails to parse is warned about and treated as
//! absent, which degrades to a fresh write for that destination.

use std::path::{Path, PathBuf};

use log::warn;
use serde_yaml::Value as YamlValue;

use crate::compiler::Document;
use crate::error::Result;
use crate::merge;

/// How [`write_document`] treats existing destination files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Merge the fresh document over the existing file, keeping edits.
    Reconcile,
    /// Replace the existing file with the fresh document.
    Overwrite,
}

/// Writes every destination of a compiled document into `dir`.
///
/// The directory is created when missing. Returns the written paths in
/// emission order.
///
/// # Errors
///
/// Propagates I/O failures and YAML serialization failures.
pub fn write_document(dir: &Path, document: &Document, mode: WriteMode) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(document.entries().len());
    for (destination, fresh) in document.entries() {
        let path = dir.join(destination.file_name());

        let value = match mode {
            WriteMode::Overwrite => fresh.clone(),
            WriteMode::Reconcile => match read_existing(&path) {
                Some(existing) => merge::reconcile(&existing, fresh),
                None => fresh.clone(),
            },
        };

        let mut content = serde_yaml::to_string(&value)?;
        ensure_trailing_newline(&mut content);
        std::fs::write(&path, content)?;
        written.push(path);
    }

    Ok(written)
}

/// The `.gitignore` patterns covering a document's hidden destinations.
///
/// A hidden destination `.secrets.yml` yields the pattern `.secrets.*`,
/// shielding the file and any editor backups of it.
pub fn hidden_destination_patterns(document: &Document) -> Vec<String> {
    document
        .entries()
        .iter()
        .filter(|(destination, _)| destination.is_hidden())
        .map(|(destination, _)| {
            let file_name = destination.file_name();
            let stem = file_name.strip_suffix(".yml").unwrap_or(&file_name);
            format!("{}.*", stem)
        })
        .collect()
}

/// Appends a pattern to the project's `.gitignore` under a marker comment.
///
/// Creates the file when missing. A line already containing the pattern
/// suppresses the append, so repeated generation never piles up duplicates.
pub fn append_gitignore_entry(root: &Path, pattern: &str) -> Result<()> {
    let path = root.join(".gitignore");

    let existing = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            std::fs::write(&path, format!("# Added by confgen\n{}\n", pattern))?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if existing.lines().any(|line| line.contains(pattern)) {
        return Ok(());
    }

    let mut content = existing;
    ensure_trailing_newline(&mut content);
    content.push_str(&format!("\n# Added by confgen\n{}\n", pattern));
    std::fs::write(&path, content)?;
    Ok(())
}

fn read_existing(path: &Path) -> Option<YamlValue> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not read existing '{}': {}", path.display(), err);
            }
            return None;
        }
    };

    match serde_yaml::from_str::<YamlValue>(&content) {
        Ok(YamlValue::Null) => None,
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                "Existing '{}' is not valid YAML, regenerating it: {}",
                path.display(),
                err
            );
            None
        }
    }
}

/// Ensure content ends with exactly one newline character
fn ensure_trailing_newline(content: &mut String) {
    if !content.ends_with('\n') {
        content.push('\n');
    }
}
