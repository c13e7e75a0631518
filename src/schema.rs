//! # Schema Model
//!
//! This module defines the static description of a configuration schema: named
//! **blocks** containing typed **fields**, where a field is either a scalar
//! leaf or a reference to a nested block. The schema drives both document
//! generation (see `compiler`) and typed loading (see `loader`).
//!
//! ## Key Components
//!
//! - **`Block`**: a named schema node with an ordered field list, constructed
//!   through [`Block::builder`].
//!
//! - **`Field`**: a leaf declaration (`text` / `int` / `float` / `bool`) or a
//!   nested-block reference, carrying routing metadata (`secret`, `filename`,
//!   `list`) and optional default / development values.
//!
//! ## Parsing
//!
//! Schemas can also be declared in a YAML file and parsed with [`parse`] or
//! [`from_file`]:
//!
//! ```yaml
//! blocks:
//!   - id: postgresql
//!     fields:
//!       - name: host
//!         type: text
//!         default: 127.0.0.1
//!       - name: port
//!         type: int
//!         secret: true
//!         default: 5432
//! ```
//!
//! Nested blocks are referenced by id (`block: <id>`) and resolved within the
//! file; unresolved references and reference cycles are parsing errors.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value as YamlValue;

use crate::codec::{ScalarKind, TypedValue};
use crate::error::{Error, Result};

/// Pattern every block id and field name must match.
const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// A named schema node grouping typed fields, possibly nesting other blocks.
#[derive(Debug, Clone)]
pub struct Block {
    id: String,
    exclude: bool,
    fields: Vec<Field>,
}

impl Block {
    /// Starts building a block with the given id.
    pub fn builder(id: impl Into<String>) -> BlockBuilder {
        BlockBuilder {
            id: id.into(),
            exclude: false,
            fields: Vec::new(),
        }
    }

    /// The stable identifier used as the document key for this block.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this block is skipped when processed as a top-level root.
    ///
    /// An excluded block is still processed when reached through composition
    /// from a parent block.
    pub fn exclude(&self) -> bool {
        self.exclude
    }

    /// The block's fields, in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Builder for [`Block`] values.
#[derive(Debug)]
pub struct BlockBuilder {
    id: String,
    exclude: bool,
    fields: Vec<Field>,
}

impl BlockBuilder {
    /// Marks the block as excluded from top-level compilation.
    pub fn exclude(mut self) -> Self {
        self.exclude = true;
        self
    }

    /// Appends a field. Declaration order is preserved.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates and finishes the block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] when the id or a field name is not a valid
    /// identifier, when two fields share a name, when a default or
    /// development value does not match its field's declared kind, or when a
    /// nested-block field carries a default.
    pub fn build(self) -> Result<Block> {
        let identifier = Regex::new(IDENTIFIER_PATTERN)?;

        if !identifier.is_match(&self.id) {
            return Err(Error::Schema {
                block: self.id.clone(),
                message: format!("'{}' is not a valid block id", self.id),
            });
        }

        let mut seen = Vec::new();
        for field in &self.fields {
            if !identifier.is_match(&field.name) {
                return Err(Error::Schema {
                    block: self.id.clone(),
                    message: format!("'{}' is not a valid field name", field.name),
                });
            }
            if seen.contains(&field.name.as_str()) {
                return Err(Error::Schema {
                    block: self.id.clone(),
                    message: format!("duplicate field name '{}'", field.name),
                });
            }
            seen.push(field.name.as_str());

            if let Some(filename) = &field.filename {
                if filename.contains('/') || filename.contains('\\') {
                    return Err(Error::Schema {
                        block: self.id.clone(),
                        message: format!(
                            "filename '{}' for field '{}' must not contain path separators",
                            filename, field.name
                        ),
                    });
                }
            }

            match &field.kind {
                FieldKind::Scalar(kind) => {
                    for (label, value) in [
                        ("default", field.default.as_ref()),
                        ("development", field.development.as_ref()),
                    ] {
                        if let Some(value) = value {
                            if value.kind() != Some(*kind) {
                                return Err(Error::Schema {
                                    block: self.id.clone(),
                                    message: format!(
                                        "{} value '{}' for field '{}' does not match declared type '{}'",
                                        label, value, field.name, kind
                                    ),
                                });
                            }
                        }
                    }
                }
                FieldKind::Block(_) => {
                    if field.default.is_some() || field.development.is_some() {
                        return Err(Error::Schema {
                            block: self.id.clone(),
                            message: format!(
                                "nested-block field '{}' cannot carry a default value",
                                field.name
                            ),
                        });
                    }
                }
            }
        }

        Ok(Block {
            id: self.id,
            exclude: self.exclude,
            fields: self.fields,
        })
    }
}

/// What a field declares: a scalar leaf or a nested block.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Block(Box<Block>),
}

/// A typed leaf declaration or a nested-block reference.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    kind: FieldKind,
    is_list: bool,
    secret: bool,
    filename: Option<String>,
    default: Option<TypedValue>,
    development: Option<TypedValue>,
}

impl Field {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Field {
            name: name.into(),
            kind,
            is_list: false,
            secret: false,
            filename: None,
            default: None,
            development: None,
        }
    }

    /// A text field.
    pub fn text(name: impl Into<String>) -> Self {
        Field::new(name, FieldKind::Scalar(ScalarKind::Text))
    }

    /// An integer field.
    pub fn int(name: impl Into<String>) -> Self {
        Field::new(name, FieldKind::Scalar(ScalarKind::Int))
    }

    /// A floating-point field.
    pub fn float(name: impl Into<String>) -> Self {
        Field::new(name, FieldKind::Scalar(ScalarKind::Float))
    }

    /// A boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Field::new(name, FieldKind::Scalar(ScalarKind::Bool))
    }

    /// A nested-block field composing `block` under this field's name.
    pub fn block(name: impl Into<String>, block: Block) -> Self {
        Field::new(name, FieldKind::Block(Box::new(block)))
    }

    /// Marks the field as a list of its declared type.
    pub fn list(mut self) -> Self {
        self.is_list = true;
        self
    }

    /// Routes the field's value into the secrets destination.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Routes the field's value into a custom destination file.
    ///
    /// Ignored when the field is also marked secret: secret takes precedence
    /// over filename routing.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Sets the production default written on generation.
    pub fn with_default(mut self, value: impl Into<TypedValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the development-mode override written on generation.
    pub fn with_development(mut self, value: impl Into<TypedValue>) -> Self {
        self.development = Some(value.into());
        self
    }

    /// The field's name, used as the document key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's declared kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether the field holds a list of its declared type.
    pub fn is_list(&self) -> bool {
        self.is_list
    }

    /// Whether the field routes into the secrets destination.
    pub fn is_secret(&self) -> bool {
        self.secret
    }

    /// The custom destination filename, if any.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// The production default, if declared.
    pub fn default(&self) -> Option<&TypedValue> {
        self.default.as_ref()
    }

    /// The development-mode override, if declared.
    pub fn development(&self) -> Option<&TypedValue> {
        self.development.as_ref()
    }
}

////// YAML SCHEMA FILE PARSING //////

#[derive(Debug, Deserialize)]
struct RawSchemaFile {
    blocks: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    id: String,
    #[serde(default)]
    exclude: bool,
    #[serde(default)]
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(rename = "type", default)]
    type_name: Option<String>,
    #[serde(default)]
    block: Option<String>,
    #[serde(default)]
    list: bool,
    #[serde(default)]
    secret: bool,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    default: Option<YamlValue>,
    #[serde(default)]
    development: Option<YamlValue>,
}

/// Parses a YAML schema definition into resolved blocks.
///
/// Every block declared in the file becomes a root, in file order; blocks
/// referenced by other blocks are embedded as nested copies. Mark a
/// blocks-only-used-nested entry with `exclude: true` to keep it out of
/// top-level compilation.
///
/// # Errors
///
/// Returns [`Error::Yaml`] for content that does not parse as YAML;
/// [`Error::SchemaParse`] for duplicate block ids, unknown field types,
/// fields declaring both or neither of `type` and `block`, unresolved block
/// references and reference cycles; and [`Error::Schema`] when a resolved
/// block fails structural validation.
pub fn parse(yaml_content: &str) -> Result<Vec<Block>> {
    let raw: RawSchemaFile = serde_yaml::from_str(yaml_content)?;

    let mut by_id: HashMap<&str, &RawBlock> = HashMap::new();
    for block in &raw.blocks {
        if by_id.insert(block.id.as_str(), block).is_some() {
            return Err(Error::SchemaParse {
                message: format!("duplicate block id '{}'", block.id),
                hint: None,
            });
        }
    }

    let mut resolved = Vec::new();
    for block in &raw.blocks {
        let mut stack = Vec::new();
        resolved.push(resolve_block(block, &by_id, &mut stack)?);
    }

    Ok(resolved)
}

/// Reads and parses a YAML schema definition file.
pub fn from_file(path: impl AsRef<Path>) -> Result<Vec<Block>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse(&content)
}

fn resolve_block(
    raw: &RawBlock,
    by_id: &HashMap<&str, &RawBlock>,
    stack: &mut Vec<String>,
) -> Result<Block> {
    if stack.iter().any(|id| id == &raw.id) {
        return Err(Error::SchemaParse {
            message: format!(
                "block reference cycle: {} -> {}",
                stack.join(" -> "),
                raw.id
            ),
            hint: Some("nested blocks must not reference their ancestors".to_string()),
        });
    }
    stack.push(raw.id.clone());

    let mut builder = Block::builder(&raw.id);
    if raw.exclude {
        builder = builder.exclude();
    }

    for raw_field in &raw.fields {
        builder = builder.field(resolve_field(&raw.id, raw_field, by_id, stack)?);
    }

    stack.pop();
    builder.build()
}

fn resolve_field(
    block_id: &str,
    raw: &RawField,
    by_id: &HashMap<&str, &RawBlock>,
    stack: &mut Vec<String>,
) -> Result<Field> {
    let mut field = match (&raw.type_name, &raw.block) {
        (Some(_), Some(_)) => {
            return Err(Error::SchemaParse {
                message: format!(
                    "field '{}.{}' declares both 'type' and 'block'",
                    block_id, raw.name
                ),
                hint: Some("a field is either a scalar leaf or a nested block".to_string()),
            });
        }
        (Some(type_name), None) => {
            let kind =
                ScalarKind::from_wire_name(type_name).ok_or_else(|| Error::SchemaParse {
                    message: format!(
                        "unknown type '{}' for field '{}.{}'",
                        type_name, block_id, raw.name
                    ),
                    hint: Some("expected one of: text, int, float, bool".to_string()),
                })?;

            let mut field = Field::new(raw.name.clone(), FieldKind::Scalar(kind));
            if let Some(value) = &raw.default {
                field = field.with_default(typed_value_from_yaml(block_id, raw, kind, value)?);
            }
            if let Some(value) = &raw.development {
                field = field.with_development(typed_value_from_yaml(block_id, raw, kind, value)?);
            }
            field
        }
        (None, Some(reference)) => {
            let target = by_id.get(reference.as_str()).ok_or_else(|| Error::SchemaParse {
                message: format!(
                    "field '{}.{}' references undefined block '{}'",
                    block_id, raw.name, reference
                ),
                hint: Some(format!("add a '{}' entry to the blocks list", reference)),
            })?;
            Field::block(raw.name.clone(), resolve_block(target, by_id, stack)?)
        }
        (None, None) => {
            return Err(Error::SchemaParse {
                message: format!(
                    "field '{}.{}' declares neither 'type' nor 'block'",
                    block_id, raw.name
                ),
                hint: None,
            });
        }
    };

    if raw.list {
        field = field.list();
    }
    if raw.secret {
        field = field.secret();
    }
    if let Some(filename) = &raw.filename {
        field = field.with_filename(filename.clone());
    }

    Ok(field)
}

/// Converts a raw YAML default into a typed value for the declared kind.
///
/// Native scalars of the matching kind are taken as-is; strings are
/// converted through the codec so `default: "5432"` works for an int field.
fn typed_value_from_yaml(
    block_id: &str,
    raw: &RawField,
    kind: ScalarKind,
    value: &YamlValue,
) -> Result<TypedValue> {
    let converted = match (kind, value) {
        (ScalarKind::Text, YamlValue::String(s)) => Some(TypedValue::Text(s.clone())),
        (ScalarKind::Int, YamlValue::Number(n)) => n.as_i64().map(TypedValue::Int),
        (ScalarKind::Float, YamlValue::Number(n)) => n.as_f64().map(TypedValue::Float),
        (ScalarKind::Bool, YamlValue::Bool(b)) => Some(TypedValue::Bool(*b)),
        (_, YamlValue::String(s)) => Some(kind.convert(s).map_err(|err| Error::SchemaParse {
            message: format!(
                "invalid default for field '{}.{}': {}",
                block_id, raw.name, err
            ),
            hint: None,
        })?),
        _ => None,
    };

    converted.ok_or_else(|| Error::SchemaParse {
        message: format!(
            "default for field '{}.{}' does not match declared type '{}'",
            block_id, raw.name, kind
        ),
        hint: None,
    })
}
