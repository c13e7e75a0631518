//! # Document Compiler
//!
//! This module walks a schema tree and builds one nested YAML mapping per
//! destination file. Fields are routed by a fixed precedence (secret, then
//! filename, then the general settings document), nested blocks compose
//! under their field name, and list-of-block fields emit a single-element
//! template sequence (a "stamp") the user duplicates when filling in real
//! entries.
//!
//! ## Features
//!
//! - Depth-first traversal with path accumulation
//! - Routing precedence: `secret` > `filename` > settings
//! - Packed default encoding through the value codec
//! - Template stamps for list-of-block fields
//! - Recursive pruning of empty containers and destinations
//!
//! ## Example
//!
//! ```
//! use confgen::compiler::{compile, Destination};
//! use confgen::schema::{Block, Field};
//!
//! let postgresql = Block::builder("postgresql")
//!     .field(Field::text("host").with_default("127.0.0.1"))
//!     .field(Field::int("port").secret().with_default(5432))
//!     .build()
//!     .unwrap();
//!
//! let document = compile(&[postgresql]).unwrap();
//! assert!(document.get(&Destination::Settings).is_some());
//! assert!(document.get(&Destination::Secrets).is_some());
//! ```

use serde_yaml::{Mapping, Value as YamlValue};

use crate::codec;
use crate::error::{Error, Result};
use crate::schema::{Block, Field, FieldKind};

/// The named output document a field's value is routed into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    Settings,
    Secrets,
    Custom(String),
}

impl Destination {
    /// The on-disk file name for this destination.
    pub fn file_name(&self) -> String {
        match self {
            Destination::Settings => "settings.yml".to_string(),
            Destination::Secrets => ".secrets.yml".to_string(),
            Destination::Custom(name) => format!("{}.yml", name),
        }
    }

    /// Whether the destination file is conventionally hidden.
    ///
    /// Hidden destinations get a `.gitignore` entry when written.
    pub fn is_hidden(&self) -> bool {
        self.file_name().starts_with('.')
    }
}

/// The compiled per-destination documents, in stable first-use order.
///
/// The settings and secrets destinations are always seeded first; custom
/// destinations are appended when a field first routes into them. Empty
/// destinations are dropped by the final pruning pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    entries: Vec<(Destination, YamlValue)>,
}

impl Document {
    fn new() -> Self {
        Document {
            entries: vec![
                (Destination::Settings, YamlValue::Mapping(Mapping::new())),
                (Destination::Secrets, YamlValue::Mapping(Mapping::new())),
            ],
        }
    }

    /// The document compiled for a destination, if it survived pruning.
    pub fn get(&self, destination: &Destination) -> Option<&YamlValue> {
        self.entries
            .iter()
            .find(|(d, _)| d == destination)
            .map(|(_, value)| value)
    }

    /// All destination documents, in emission order.
    pub fn entries(&self) -> &[(Destination, YamlValue)] {
        &self.entries
    }

    /// True when every destination pruned away.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&mut self, destination: Destination) -> &mut YamlValue {
        let index = match self.entries.iter().position(|(d, _)| *d == destination) {
            Some(index) => index,
            None => {
                self.entries
                    .push((destination, YamlValue::Mapping(Mapping::new())));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    fn prune(&mut self) {
        let mut pruned = Vec::new();
        for (destination, value) in std::mem::take(&mut self.entries) {
            if let Some(kept) = prune_value(value) {
                pruned.push((destination, kept));
            }
        }
        self.entries = pruned;
    }
}

/// Compiles schema roots into per-destination documents.
///
/// Top-level roots marked `exclude` are skipped; blocks reached through
/// composition are always processed. The result is pruned of empty
/// containers so value-free branches leave no scaffolding behind.
///
/// # Errors
///
/// Returns [`Error::Schema`] when any processed block declares no fields —
/// a broken schema must not silently produce a partial file set.
pub fn compile(roots: &[Block]) -> Result<Document> {
    let mut document = Document::new();

    for root in roots {
        if root.exclude() {
            continue;
        }
        let path = vec![root.id().to_string()];
        compile_block(root, &path, &mut document, false)?;
    }

    document.prune();
    Ok(document)
}

/// Registers one block's fields at `path`.
///
/// With `routed_only` set, only fields carrying explicit routing (secret or
/// filename) are emitted; the rest already live inside an enclosing stamp.
fn compile_block(
    block: &Block,
    path: &[String],
    document: &mut Document,
    routed_only: bool,
) -> Result<()> {
    if block.fields().is_empty() {
        return Err(Error::Schema {
            block: block.id().to_string(),
            message: "block declares no fields".to_string(),
        });
    }

    for field in block.fields() {
        match field.kind() {
            FieldKind::Block(nested) => {
                let mut nested_path = path.to_vec();
                nested_path.push(field.name().to_string());

                if field.is_list() {
                    if !routed_only {
                        let stamp = template_value(nested)?;
                        let target = document.entry(route(field));
                        insert_value(
                            target,
                            path,
                            field.name(),
                            YamlValue::Sequence(vec![stamp]),
                        )?;
                    }
                    // Routed fields are never part of the stamp; register
                    // them at their own destinations.
                    compile_block(nested, &nested_path, document, true)?;
                } else {
                    compile_block(nested, &nested_path, document, routed_only)?;
                }
            }
            FieldKind::Scalar(kind) => {
                if routed_only && !field.is_secret() && field.filename().is_none() {
                    continue;
                }

                let packed = codec::encode(*kind, field.default(), field.development());
                let value = if field.is_list() {
                    YamlValue::Sequence(vec![YamlValue::String(packed)])
                } else {
                    YamlValue::String(packed)
                };

                let target = document.entry(route(field));
                insert_value(target, path, field.name(), value)?;
            }
        }
    }

    Ok(())
}

/// Routing precedence: secret beats filename beats settings.
fn route(field: &Field) -> Destination {
    if field.is_secret() {
        Destination::Secrets
    } else if let Some(filename) = field.filename() {
        Destination::Custom(filename.to_string())
    } else {
        Destination::Settings
    }
}

/// Fully-expanded default shape of a block, restricted to fields without
/// explicit routing. Used as the template element for list-of-block fields.
fn template_value(block: &Block) -> Result<YamlValue> {
    if block.fields().is_empty() {
        return Err(Error::Schema {
            block: block.id().to_string(),
            message: "block declares no fields".to_string(),
        });
    }

    let mut mapping = Mapping::new();
    for field in block.fields() {
        if field.is_secret() || field.filename().is_some() {
            continue;
        }

        let value = match field.kind() {
            FieldKind::Scalar(kind) => {
                let packed = codec::encode(*kind, field.default(), field.development());
                YamlValue::String(packed)
            }
            FieldKind::Block(nested) => template_value(nested)?,
        };

        let value = if field.is_list() {
            YamlValue::Sequence(vec![value])
        } else {
            value
        };

        mapping.insert(YamlValue::String(field.name().to_string()), value);
    }

    Ok(YamlValue::Mapping(mapping))
}

/// Inserts `value` under `key` at the mapping reached by walking `path`,
/// creating intermediate mappings as needed.
fn insert_value(
    target: &mut YamlValue,
    path: &[String],
    key: &str,
    value: YamlValue,
) -> Result<()> {
    let mut current = target;
    for segment in path {
        let map = match current {
            YamlValue::Mapping(map) => map,
            _ => {
                return Err(Error::Schema {
                    block: segment.clone(),
                    message: format!(
                        "path segment '{}' collides with an existing value",
                        segment
                    ),
                });
            }
        };
        current = map
            .entry(YamlValue::String(segment.clone()))
            .or_insert(YamlValue::Mapping(Mapping::new()));
    }

    match current {
        YamlValue::Mapping(map) => {
            map.insert(YamlValue::String(key.to_string()), value);
            Ok(())
        }
        _ => Err(Error::Schema {
            block: path.join("."),
            message: format!("field '{}' collides with an existing value", key),
        }),
    }
}

/// Drops empty containers recursively; returns `None` when nothing is left.
fn prune_value(value: YamlValue) -> Option<YamlValue> {
    match value {
        YamlValue::Mapping(map) => {
            let mut pruned = Mapping::new();
            for (key, nested) in map {
                if let Some(kept) = prune_value(nested) {
                    pruned.insert(key, kept);
                }
            }
            if pruned.is_empty() {
                None
            } else {
                Some(YamlValue::Mapping(pruned))
            }
        }
        YamlValue::Sequence(items) => {
            let kept: Vec<YamlValue> = items.into_iter().filter_map(prune_value).collect();
            if kept.is_empty() {
                None
            } else {
                Some(YamlValue::Sequence(kept))
            }
        }
        other => Some(other),
    }
}
