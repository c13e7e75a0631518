//! # Project Service File
//!
//! A project using this tool carries a `.confgen.yml` at its root pointing
//! at the schema definition and the generated-configs directory:
//!
//! ```yaml
//! schema_path: configuration/schema.yml
//! configs_path: configuration/config
//! developer_mode: false
//! ```
//!
//! `developer_mode` is optional; when absent, the runtime falls back to the
//! `DEV` environment variable (see `reader`).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// The well-known service file name, looked up in the project root.
pub const SERVICE_FILE_NAME: &str = ".confgen.yml";

/// Parsed contents of a project's `.confgen.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceFile {
    pub schema_path: PathBuf,
    pub configs_path: PathBuf,
    #[serde(default)]
    pub developer_mode: Option<bool>,
}

impl ServiceFile {
    /// Parses service file content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceFile`] for YAML that does not parse into the
    /// expected keys or for empty paths.
    pub fn parse(content: &str) -> Result<Self> {
        let service: ServiceFile =
            serde_yaml::from_str(content).map_err(|err| Error::ServiceFile {
                message: format!("invalid service file: {}", err),
                hint: Some(
                    "expected 'schema_path', 'configs_path' and an optional 'developer_mode'"
                        .to_string(),
                ),
            })?;

        if service.schema_path.as_os_str().is_empty() {
            return Err(Error::ServiceFile {
                message: "'schema_path' is not defined".to_string(),
                hint: Some("point schema_path at the YAML schema definition".to_string()),
            });
        }
        if service.configs_path.as_os_str().is_empty() {
            return Err(Error::ServiceFile {
                message: "'configs_path' is not defined".to_string(),
                hint: Some(
                    "point configs_path at the directory generated files live in".to_string(),
                ),
            });
        }

        Ok(service)
    }

    /// Reads and parses the service file at `path`.
    ///
    /// # Errors
    ///
    /// A missing file is reported as [`Error::ServiceFile`] with a pointer
    /// at `confgen init`; other I/O failures propagate as [`Error::Io`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ServiceFile {
                    message: format!("service file '{}' not found", path.display()),
                    hint: Some("run `confgen init` to scaffold a project".to_string()),
                });
            }
            Err(err) => return Err(err.into()),
        };
        Self::parse(&content)
    }

    /// Renders service file content for the given paths.
    ///
    /// Used by `confgen init` when scaffolding a project.
    pub fn render(schema_path: &Path, configs_path: &Path) -> String {
        format!(
            "# confgen project service file\nschema_path: {}\nconfigs_path: {}\ndeveloper_mode: false\n",
            schema_path.display(),
            configs_path.display(),
        )
    }
}
