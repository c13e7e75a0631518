//! # Instance Loader
//!
//! This module turns a merged configuration document back into a typed tree.
//! Where the compiler walks the schema to *produce* YAML, the loader walks
//! the same schema to *consume* it: every scalar field is decoded through
//! the value codec, nested blocks recurse, and the result is a read-only
//! [`Instance`] per configured root.
//!
//! A root absent from the document is simply unconfigured (`Ok(None)`); a
//! missing scalar leaf inside a configured root is fatal and names the full
//! dotted path, so the person fixing the file knows exactly which key to
//! restore.
//!
//! ## Example
//!
//! ```
//! use confgen::loader::load;
//! use confgen::schema::{Block, Field};
//!
//! let postgresql = Block::builder("postgresql")
//!     .field(Field::text("host"))
//!     .field(Field::int("port"))
//!     .build()
//!     .unwrap();
//!
//! let document = serde_yaml::from_str(
//!     "postgresql:\n  host: text;127.0.0.1\n  port: int;5432\n",
//! )
//! .unwrap();
//!
//! let instance = load(&postgresql, &document, false).unwrap().unwrap();
//! assert_eq!(instance.text("host"), Some("127.0.0.1"));
//! assert_eq!(instance.int("port"), Some(5432));
//! ```

use serde_yaml::Value as YamlValue;

use crate::codec::{self, TypedValue};
use crate::error::{Error, Result};
use crate::schema::{Block, Field, FieldKind};

/// A loaded, typed view of one configured block.
#[derive(Debug, Clone)]
pub struct Instance {
    id: String,
    entries: Vec<(String, Entry)>,
}

#[derive(Debug, Clone)]
enum Entry {
    Value(TypedValue),
    Nested(Option<Instance>),
    NestedList(Vec<Instance>),
}

impl Instance {
    /// The id of the block this instance was loaded for.
    pub fn id(&self) -> &str {
        &self.id
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, entry)| entry)
    }

    /// The decoded value of a scalar field, regardless of kind.
    pub fn value(&self, name: &str) -> Option<&TypedValue> {
        match self.entry(name)? {
            Entry::Value(value) => Some(value),
            _ => None,
        }
    }

    /// The text content of a field, or `None` for any other kind.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.value(name)?.as_text()
    }

    /// The integer content of a field, or `None` for any other kind.
    pub fn int(&self, name: &str) -> Option<i64> {
        self.value(name)?.as_int()
    }

    /// The float content of a field, or `None` for any other kind.
    pub fn float(&self, name: &str) -> Option<f64> {
        self.value(name)?.as_float()
    }

    /// The boolean content of a field, or `None` for any other kind.
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.value(name)?.as_bool()
    }

    /// The elements of a list field, or `None` for any other kind.
    pub fn list(&self, name: &str) -> Option<&[TypedValue]> {
        self.value(name)?.as_list()
    }

    /// A configured nested block, or `None` when absent or not a block.
    pub fn nested(&self, name: &str) -> Option<&Instance> {
        match self.entry(name)? {
            Entry::Nested(instance) => instance.as_ref(),
            _ => None,
        }
    }

    /// The loaded elements of a list-of-block field.
    pub fn nested_list(&self, name: &str) -> Option<&[Instance]> {
        match self.entry(name)? {
            Entry::NestedList(instances) => Some(instances),
            _ => None,
        }
    }
}

/// Loads one schema root from a merged document.
///
/// Returns `Ok(None)` when the root's key is absent or null — the root is
/// simply not configured in this project. Otherwise every scalar field must
/// be present and decodable.
///
/// # Arguments
///
/// * `root` - The schema block to load
/// * `document` - The merged document (see `merge::load_sources`)
/// * `development` - Whether packed values select their development segment
///
/// # Errors
///
/// Returns [`Error::MissingValue`] naming the dotted path of the first
/// scalar field without a value, and codec errors for values that fail to
/// decode.
pub fn load(root: &Block, document: &YamlValue, development: bool) -> Result<Option<Instance>> {
    match document.get(root.id()) {
        None | Some(YamlValue::Null) => Ok(None),
        Some(value) => load_block(root, value, root.id(), development).map(Some),
    }
}

fn load_block(
    block: &Block,
    value: &YamlValue,
    path: &str,
    development: bool,
) -> Result<Instance> {
    let mut entries = Vec::with_capacity(block.fields().len());

    for field in block.fields() {
        let entry = match field.kind() {
            FieldKind::Scalar(_) => load_scalar(field, value, path, development)?,
            FieldKind::Block(nested) => {
                let child_path = format!("{}.{}", path, field.name());
                load_nested(field, nested, value, &child_path, development)?
            }
        };
        entries.push((field.name().to_string(), entry));
    }

    Ok(Instance {
        id: block.id().to_string(),
        entries,
    })
}

fn load_scalar(
    field: &Field,
    value: &YamlValue,
    path: &str,
    development: bool,
) -> Result<Entry> {
    match value.get(field.name()) {
        None | Some(YamlValue::Null) => Err(Error::MissingValue {
            path: format!("{}.{}", path, field.name()),
        }),
        Some(stored) => Ok(Entry::Value(codec::decode(stored, development)?)),
    }
}

/// Loads a nested-block field.
///
/// A singular nested block that is absent loads as unconfigured. A
/// list-of-block field loads each sequence element as an instance; absent or
/// wrongly-shaped values load as an empty list. Lookups into a non-mapping
/// element behave as absent keys, so a required leaf inside it is fatal.
fn load_nested(
    field: &Field,
    nested: &Block,
    value: &YamlValue,
    path: &str,
    development: bool,
) -> Result<Entry> {
    if field.is_list() {
        let instances = match value.get(field.name()) {
            Some(YamlValue::Sequence(items)) => items
                .iter()
                .map(|item| load_block(nested, item, path, development))
                .collect::<Result<Vec<Instance>>>()?,
            _ => Vec::new(),
        };
        Ok(Entry::NestedList(instances))
    } else {
        match value.get(field.name()) {
            None | Some(YamlValue::Null) => Ok(Entry::Nested(None)),
            Some(sub) => Ok(Entry::Nested(Some(load_block(
                nested,
                sub,
                path,
                development,
            )?))),
        }
    }
}
