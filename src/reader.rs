//! # Runtime Reader
//!
//! This module is the application-facing entry point: it discovers the
//! generated configuration files, merges them through the merge engine and
//! loads every schema root into a typed [`Configuration`].
//!
//! Development mode is resolved from the highest-priority source available:
//! an explicit [`ConfigReader::with_development`] call, then the service
//! file's `developer_mode`, then the `DEV` environment variable.
//!
//! ## Example
//!
//! ```no_run
//! use confgen::reader::ConfigReader;
//! use confgen::urls::ServiceKind;
//!
//! # fn main() -> confgen::error::Result<()> {
//! let configuration = ConfigReader::from_service_file(".confgen.yml")?.read()?;
//!
//! if let Some(postgresql) = configuration.get("postgresql") {
//!     println!("host = {:?}", postgresql.text("host"));
//! }
//! let url = configuration.service_url(ServiceKind::Postgresql, "postgresql")?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use glob::glob;
use log::warn;

use crate::error::{Error, Result};
use crate::loader::{self, Instance};
use crate::merge;
use crate::schema::{self, Block};
use crate::service::ServiceFile;
use crate::urls::{self, ServiceKind};

/// Discovers, merges and loads generated configuration files.
#[derive(Debug)]
pub struct ConfigReader {
    blocks: Vec<Block>,
    paths: Vec<PathBuf>,
    development: Option<bool>,
    service_development: Option<bool>,
}

impl ConfigReader {
    /// A reader over the given schema roots, with no sources yet.
    pub fn new(blocks: Vec<Block>) -> Self {
        ConfigReader {
            blocks,
            paths: Vec::new(),
            development: None,
            service_development: None,
        }
    }

    /// Builds a reader from a project's service file.
    ///
    /// The schema file and configs directory named by the service file are
    /// resolved relative to the service file's own directory, so the reader
    /// works from any working directory.
    pub fn from_service_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let service = ServiceFile::from_file(path)?;
        let base = path.parent().unwrap_or(Path::new("."));

        let blocks = schema::from_file(base.join(&service.schema_path))?;
        let mut reader = ConfigReader::new(blocks).with_configs_dir(&base.join(&service.configs_path))?;
        reader.service_development = service.developer_mode;
        Ok(reader)
    }

    /// Sets explicit source paths, replacing any discovered set.
    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    /// Discovers `*.yml` sources in a configs directory.
    ///
    /// Hidden files are included, so `.secrets.yml` is picked up alongside
    /// `settings.yml`. Entries that cannot be read are warned about and
    /// skipped.
    pub fn with_configs_dir(mut self, dir: &Path) -> Result<Self> {
        let pattern = dir.join("*.yml");
        let mut paths = Vec::new();
        for entry in glob(&pattern.to_string_lossy())? {
            match entry {
                Ok(path) => paths.push(path),
                Err(err) => warn!("Skipping unreadable configs entry: {}", err),
            }
        }
        self.paths = paths;
        Ok(self)
    }

    /// Forces development mode on or off, overriding every other source.
    pub fn with_development(mut self, enabled: bool) -> Self {
        self.development = Some(enabled);
        self
    }

    /// The source files this reader will merge, in merge order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// The schema roots this reader loads.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The development mode the next [`read`](Self::read) will use.
    pub fn development(&self) -> bool {
        self.development
            .or(self.service_development)
            .unwrap_or_else(development_from_env)
    }

    /// Merges all sources and loads every schema root.
    ///
    /// Roots marked `exclude` and roots absent from the merged document are
    /// simply not configured; everything else must load completely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingValue`] or a codec error when a configured
    /// root fails to load.
    pub fn read(&self) -> Result<Configuration> {
        let development = self.development();
        let document = merge::load_sources(&self.paths);

        let mut instances = Vec::new();
        for block in &self.blocks {
            if block.exclude() {
                continue;
            }
            if let Some(instance) = loader::load(block, &document, development)? {
                instances.push(instance);
            }
        }

        Ok(Configuration {
            development,
            instances,
        })
    }
}

/// The loaded configuration of a project: one instance per configured root.
#[derive(Debug, Clone)]
pub struct Configuration {
    development: bool,
    instances: Vec<Instance>,
}

impl Configuration {
    /// The instance loaded for a root block, or `None` when unconfigured.
    pub fn get(&self, block_id: &str) -> Option<&Instance> {
        self.instances
            .iter()
            .find(|instance| instance.id() == block_id)
    }

    /// All configured instances, in schema order.
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Whether this configuration was loaded in development mode.
    pub fn development(&self) -> bool {
        self.development
    }

    /// Builds the connection URL for a configured service block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceUrl`] when the block is not configured or
    /// lacks the fields a URL needs.
    pub fn service_url(&self, kind: ServiceKind, block_id: &str) -> Result<String> {
        let instance = self.get(block_id).ok_or_else(|| Error::ServiceUrl {
            block: block_id.to_string(),
            message: "block is not configured".to_string(),
        })?;
        urls::service_url(kind, instance)
    }
}

fn development_from_env() -> bool {
    match std::env::var("DEV") {
        Ok(value) => !matches!(value.to_lowercase().as_str(), "" | "0" | "false"),
        Err(_) => false,
    }
}
