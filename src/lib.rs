//! # Confgen Library
//!
//! This library provides the core functionality for schema-driven YAML
//! configuration management. It is designed to be used by the `confgen`
//! command-line tool but can also be embedded in services that want to
//! read their configuration through a typed schema.
//!
//! ## Quick Example
//!
//! ```
//! use confgen::compiler::{compile, Destination};
//! use confgen::loader;
//! use confgen::schema::{Block, Field};
//!
//! // Describe the configuration a service needs
//! let postgresql = Block::builder("postgresql")
//!     .field(Field::text("host").with_default("127.0.0.1"))
//!     .field(Field::int("port").secret().with_default(5432))
//!     .build()
//!     .unwrap();
//!
//! // Compile it into per-destination documents
//! let document = compile(&[postgresql.clone()]).unwrap();
//! assert!(document.get(&Destination::Settings).is_some());
//! assert!(document.get(&Destination::Secrets).is_some());
//!
//! // A merged document loads back into a typed instance
//! let merged: serde_yaml::Value =
//!     serde_yaml::from_str("postgresql:\n  host: text;127.0.0.1\n  port: int;5432\n").unwrap();
//! let instance = loader::load(&postgresql, &merged, false).unwrap().unwrap();
//! assert_eq!(instance.int("port"), Some(5432));
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Schema (`schema`)**: Blocks of typed fields describing what a project
//!   needs configured, built in code or parsed from a schema file.
//! - **Compiler (`compiler`)**: Turns the schema into per-destination YAML
//!   documents, routing secret and filename-tagged fields away from the
//!   general settings file.
//! - **Codec (`codec`)**: The packed `type;value;dev_value` encoding that
//!   carries a field's declared type and its development override inside a
//!   single YAML scalar.
//! - **Merge Engine (`merge`)**: Combines the generated files into one
//!   document and reconciles fresh output with files people have edited, so
//!   regeneration never destroys filled-in values.
//! - **Loader (`loader`) and Reader (`reader`)**: Parse the merged document
//!   back into typed instances and expose them to the application, including
//!   ready-made service connection URLs (`urls`).
//!
//! ## Lifecycle
//!
//! A project flows through three stages:
//!
//! 1.  **Generate**: Compile the schema and write `settings.yml`,
//!     `.secrets.yml` and any custom destinations.
//! 2.  **Fill In**: People replace placeholder values in the generated
//!     files; regeneration reconciles instead of overwriting.
//! 3.  **Read**: The application merges the files and loads typed values
//!     through a [`reader::ConfigReader`].

pub mod codec;
pub mod compiler;
pub mod error;
pub mod loader;
pub mod merge;
pub mod reader;
pub mod schema;
pub mod service;
pub mod urls;
pub mod writer;

#[cfg(test)]
mod merge_proptest;
