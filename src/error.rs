//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `confgen` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the application. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the application to simplify function signatures and ensure
//!   type safety.
//!
//! The `Error` enum is designed to be exhaustive and cover all possible
//! failure scenarios, including:
//!
//! - Schema construction errors (empty blocks, duplicate field names).
//! - Schema file parsing errors.
//! - Malformed packed configuration values.
//! - Value conversion failures.
//! - Missing required values at load time.
//! - Service URL assembly errors.
//! - I/O errors.
//! - YAML parsing errors.
//! - Regex errors.
//! - Glob pattern errors.
//! - URL parsing errors.
//!
//! Each error variant includes a `message` field and potentially other
//! contextual information (e.g., `block`, `value`, `target`, `path`).
//!
//! The `Result` type alias is used to return `Result<T, Error>` from
//! functions, making it easy to handle errors and propagate them up the
//! call stack.

use thiserror::Error;

/// Main error type for confgen operations
#[derive(Error, Debug)]
pub enum Error {
    /// A schema definition is structurally invalid.
    ///
    /// Raised for blocks without fields, empty or malformed identifiers,
    /// and duplicate field names within a block.
    #[error("Schema error in block '{block}': {message}")]
    Schema { block: String, message: String },

    /// An error occurred while parsing a YAML schema definition file.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Schema file parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    SchemaParse {
        message: String,
        /// Optional hint for how to fix the schema file
        hint: Option<String>,
    },

    /// A packed configuration value does not carry enough metadata.
    ///
    /// Packed values use the form `<type>;<value>[;<dev_value>]`; anything
    /// with fewer than two segments cannot be interpreted.
    #[error("Malformed configuration value '{value}': expected '<type>;<value>' metadata")]
    MalformedValue { value: String },

    /// A value segment could not be converted to its declared type.
    #[error("Cannot convert value '{value}' to type '{target}'")]
    ValueConversion { value: String, target: String },

    /// A required configuration value was absent at load time.
    ///
    /// Carries the fully-qualified dot-joined path of the missing field,
    /// for example `postgresql.port`.
    #[error("The value for '{path}' could not be found, perhaps the file was not generated or transferred")]
    MissingValue { path: String },

    /// A service URL could not be assembled from a configuration block.
    #[error("Service URL error for block '{block}': {message}")]
    ServiceUrl { block: String, message: String },

    /// The project service file is missing or unusable.
    #[error("Service file error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ServiceFile {
        message: String,
        /// Optional hint for how to fix the service file
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
