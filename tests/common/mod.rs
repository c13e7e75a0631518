//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures, helper functions, and schema
//! snippets to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_project(schemas::POSTGRESQL);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::schemas;
    pub use super::TestFixture;
}

/// Common schema YAML snippets for testing.
#[allow(dead_code)]
pub mod schemas {
    /// Minimal valid schema with a single settings-only block.
    pub const MINIMAL: &str = r#"
blocks:
  - id: app
    fields:
      - name: title
        type: text
        default: confgen
"#;

    /// A postgresql block routing fields across settings and secrets,
    /// with a development override on the host.
    pub const POSTGRESQL: &str = r#"
blocks:
  - id: postgresql
    fields:
      - name: host
        type: text
        default: 127.0.0.1
        development: localhost
      - name: port
        type: int
        secret: true
        default: 5432
      - name: user
        type: text
        secret: true
        default: ghost
      - name: password
        type: text
        secret: true
        default: qwerty
      - name: path
        type: text
        secret: true
        default: database
"#;

    /// Schema routing a field into a custom destination file.
    pub const WITH_FILENAME: &str = r#"
blocks:
  - id: exchange
    fields:
      - name: api_key
        type: text
        filename: exchange_keys
        default: demo
      - name: endpoint
        type: text
        default: https://api.example.com
"#;

    /// Schema with a nested block reference.
    pub const NESTED: &str = r#"
blocks:
  - id: pool
    exclude: true
    fields:
      - name: size
        type: int
        default: 10
  - id: postgresql
    fields:
      - name: host
        type: text
        default: 127.0.0.1
      - name: connection_pool
        block: pool
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "blocks: [unclosed";
}

/// A test fixture that provides a temporary directory with an optional
/// confgen project inside.
///
/// This struct simplifies the common pattern of creating a temp directory
/// and populating it with a `.confgen.yml` service file plus a schema.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new().with_project(schemas::MINIMAL);
///
/// fixture.command().arg("generate").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.confgen.yml` service file with the given content.
    pub fn with_service_file(self, content: &str) -> Self {
        self.temp_dir
            .child(".confgen.yml")
            .write_str(content)
            .expect("Failed to write service file");
        self
    }

    /// Add a schema file with the given content at `schema.yml`.
    pub fn with_schema(self, content: &str) -> Self {
        self.temp_dir
            .child("schema.yml")
            .write_str(content)
            .expect("Failed to write schema file");
        self
    }

    /// Add a complete project: the given schema plus a service file
    /// pointing at it, with `config/` as the configs directory.
    pub fn with_project(self, schema: &str) -> Self {
        self.with_schema(schema)
            .with_service_file("schema_path: schema.yml\nconfigs_path: config\n")
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the service file.
    pub fn service_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join(".confgen.yml")
    }

    /// Get access to the underlying TempDir for advanced usage.
    #[allow(dead_code)]
    pub fn temp_dir(&self) -> &assert_fs::TempDir {
        &self.temp_dir
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("confgen");
        cmd.current_dir(self.path());
        // Keep commands hermetic regardless of the caller's shell.
        cmd.env_remove("CONFGEN_CONFIG").env_remove("DEV");
        cmd
    }

    /// Create a command with the service file path argument.
    #[allow(dead_code)]
    pub fn command_with_config(&self) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("--config").arg(self.service_path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_project() {
        let fixture = TestFixture::new().with_project(schemas::MINIMAL);
        assert!(fixture.service_path().exists());
        assert!(fixture.path().join("schema.yml").exists());
    }

    #[test]
    fn test_fixture_with_file() {
        let fixture = TestFixture::new().with_file("test.txt", "hello");
        assert!(fixture.path().join("test.txt").exists());
    }

    #[test]
    fn test_schemas_are_valid_yaml() {
        // Verify that our schema constants are valid YAML
        let all = [
            schemas::MINIMAL,
            schemas::POSTGRESQL,
            schemas::WITH_FILENAME,
            schemas::NESTED,
        ];

        for schema in all {
            serde_yaml::from_str::<serde_yaml::Value>(schema).expect("Schema should be valid YAML");
        }
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        let result = serde_yaml::from_str::<serde_yaml::Value>(schemas::INVALID_YAML);
        assert!(result.is_err(), "INVALID_YAML should not parse");
    }
}
