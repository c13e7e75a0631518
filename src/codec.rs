//! # Value Codec
//!
//! This module implements the packed scalar representation used inside
//! generated configuration files. A machine-generated default is stored as a
//! semicolon-delimited string of the form `"<type>;<value>[;<dev_value>]"`,
//! which keeps the file self-describing: a person editing `settings.yml` can
//! see the expected type next to the value.
//!
//! ## Features
//!
//! - Encoding of field defaults into packed strings
//! - Decoding of packed strings back into typed values
//! - Development-mode selection between the production and development segment
//! - Pass-through decoding of native YAML scalars (a person may replace the
//!   packed string with a plain value)
//! - Elementwise decoding of sequences
//!
//! ## Example
//!
//! ```
//! use confgen::codec::{self, ScalarKind, TypedValue};
//! use serde_yaml::Value as YamlValue;
//!
//! let packed = codec::encode(ScalarKind::Int, Some(&TypedValue::Int(5432)), None);
//! assert_eq!(packed, "int;5432");
//!
//! let stored = YamlValue::String(packed);
//! let decoded = codec::decode(&stored, false).unwrap();
//! assert_eq!(decoded, TypedValue::Int(5432));
//! ```

use std::fmt;

use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};

/// The four scalar kinds a field can declare.
///
/// The wire names (`text`, `int`, `float`, `bool`) appear both in packed
/// values and in YAML schema definition files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Text,
    Int,
    Float,
    Bool,
}

impl ScalarKind {
    /// The name used for this kind inside packed values and schema files.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ScalarKind::Text => "text",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Bool => "bool",
        }
    }

    /// Resolves a wire name back to a kind.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(ScalarKind::Text),
            "int" => Some(ScalarKind::Int),
            "float" => Some(ScalarKind::Float),
            "bool" => Some(ScalarKind::Bool),
            _ => None,
        }
    }

    /// The placeholder written for a field that declares no default.
    ///
    /// Placeholders make a freshly generated file obviously unfinished while
    /// still parsing cleanly for every kind except `text`.
    pub fn placeholder(&self) -> &'static str {
        match self {
            ScalarKind::Text => "VALUE",
            ScalarKind::Int => "1234",
            ScalarKind::Float => "1234.101",
            ScalarKind::Bool => "true",
        }
    }

    /// Converts raw text into a typed value according to this kind.
    ///
    /// Boolean conversion accepts only the case-insensitive literals `true`
    /// and `false`. Numeric conversion uses the standard parsers and wraps
    /// their failures. Text passes through unchanged.
    pub fn convert(&self, raw: &str) -> Result<TypedValue> {
        match self {
            ScalarKind::Text => Ok(TypedValue::Text(raw.to_string())),
            ScalarKind::Int => raw
                .parse::<i64>()
                .map(TypedValue::Int)
                .map_err(|_| Error::ValueConversion {
                    value: raw.to_string(),
                    target: self.wire_name().to_string(),
                }),
            ScalarKind::Float => raw
                .parse::<f64>()
                .map(TypedValue::Float)
                .map_err(|_| Error::ValueConversion {
                    value: raw.to_string(),
                    target: self.wire_name().to_string(),
                }),
            ScalarKind::Bool => match raw.to_lowercase().as_str() {
                "true" => Ok(TypedValue::Bool(true)),
                "false" => Ok(TypedValue::Bool(false)),
                _ => Err(Error::ValueConversion {
                    value: raw.to_string(),
                    target: self.wire_name().to_string(),
                }),
            },
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A decoded, typed configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<TypedValue>),
}

impl TypedValue {
    /// Returns the scalar kind of this value, or `None` for lists.
    pub fn kind(&self) -> Option<ScalarKind> {
        match self {
            TypedValue::Text(_) => Some(ScalarKind::Text),
            TypedValue::Int(_) => Some(ScalarKind::Int),
            TypedValue::Float(_) => Some(ScalarKind::Float),
            TypedValue::Bool(_) => Some(ScalarKind::Bool),
            TypedValue::List(_) => None,
        }
    }

    /// Returns the text content if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TypedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content if this is an `Int` value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float content if this is a `Float` value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            TypedValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean content if this is a `Bool` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the elements if this is a `List` value.
    pub fn as_list(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Text(s) => f.write_str(s),
            TypedValue::Int(i) => write!(f, "{}", i),
            TypedValue::Float(x) => write!(f, "{}", x),
            TypedValue::Bool(b) => write!(f, "{}", b),
            TypedValue::List(items) => {
                let rendered: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::Text(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::Text(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        TypedValue::Int(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::Float(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Bool(value)
    }
}

/// Encodes a field default as a packed string.
///
/// Produces `"<type>;<value>"`, or `"<type>;<value>;<dev_value>"` when a
/// development override is present. A field without an explicit default gets
/// the kind's placeholder.
///
/// # Arguments
///
/// * `kind` - The declared scalar kind of the field
/// * `default` - The field's default value, if declared
/// * `development` - The field's development-mode override, if declared
pub fn encode(
    kind: ScalarKind,
    default: Option<&TypedValue>,
    development: Option<&TypedValue>,
) -> String {
    let production = match default {
        Some(value) => value.to_string(),
        None => kind.placeholder().to_string(),
    };

    match development {
        Some(dev) => format!("{};{};{}", kind.wire_name(), production, dev),
        None => format!("{};{}", kind.wire_name(), production),
    }
}

/// Decodes a stored YAML value into a typed value.
///
/// Sequences decode elementwise. Native booleans and numbers pass straight
/// through (a person may have replaced the packed string with a plain
/// scalar). Strings are interpreted as packed values: split on `;`, the
/// first segment names the type, the second carries the production value and
/// the optional third a development override. The development segment is
/// used only when `development` is true; segments beyond the third are
/// dropped, so payloads containing `;` are not protected.
///
/// # Errors
///
/// Returns [`Error::MalformedValue`] for strings with fewer than two
/// segments and for nulls or mappings at a scalar position, and
/// [`Error::ValueConversion`] when a segment cannot be converted to its
/// declared type.
pub fn decode(value: &YamlValue, development: bool) -> Result<TypedValue> {
    match value {
        YamlValue::Sequence(items) => {
            let decoded: Result<Vec<TypedValue>> =
                items.iter().map(|item| decode(item, development)).collect();
            Ok(TypedValue::List(decoded?))
        }
        YamlValue::Bool(b) => Ok(TypedValue::Bool(*b)),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(TypedValue::Int(i))
            } else if let Some(x) = n.as_f64() {
                Ok(TypedValue::Float(x))
            } else {
                Err(Error::MalformedValue {
                    value: n.to_string(),
                })
            }
        }
        YamlValue::String(raw) => decode_packed(raw, development),
        other => Err(Error::MalformedValue {
            value: yaml_type_name(other).to_string(),
        }),
    }
}

/// Decodes a packed string of the form `"<type>;<value>[;<dev_value>]"`.
fn decode_packed(raw: &str, development: bool) -> Result<TypedValue> {
    let segments: Vec<&str> = raw.split(';').map(str::trim).collect();

    if segments.len() < 2 {
        return Err(Error::MalformedValue {
            value: raw.to_string(),
        });
    }

    let type_name = segments[0];
    let production = segments[1];
    let dev_value = segments.get(2).filter(|s| !s.is_empty());

    let kind = ScalarKind::from_wire_name(type_name).ok_or_else(|| Error::ValueConversion {
        value: production.to_string(),
        target: type_name.to_string(),
    })?;

    let selected = match dev_value {
        Some(dev) if development => dev,
        _ => production,
    };

    kind.convert(selected)
}

/// Get a human-readable type name for a YAML value
///
/// Used for logging and error messages to describe the type of a value.
pub fn yaml_type_name(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "Null",
        YamlValue::Bool(_) => "Bool",
        YamlValue::Number(_) => "Number",
        YamlValue::String(_) => "String",
        YamlValue::Sequence(_) => "Sequence",
        YamlValue::Mapping(_) => "Mapping",
        YamlValue::Tagged(_) => "Tagged",
    }
}
