//! # Init Command Implementation
//!
//! This module implements the `init` subcommand, which scaffolds a confgen
//! project in the current directory.
//!
//! ## Functionality
//!
//! - **Project Folder**: Creates the schema folder and the configs directory
//! - **Sample Schema**: Writes a starter schema file when none exists
//! - **Service File**: Writes `.confgen.yml` pointing at both paths
//! - **Gitignore**: Registers the service file pattern in `.gitignore`
//! - **Force Mode**: Overwrites an existing service file when specified

use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use confgen::service::{ServiceFile, SERVICE_FILE_NAME};
use confgen::writer;

/// Scaffold a confgen project in the current directory
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project folder for the schema file and the configs directory
    #[arg(short, long, value_name = "DIR", default_value = "configuration")]
    pub folder: PathBuf,

    /// Overwrite an existing service file
    #[arg(long)]
    pub force: bool,
}

/// Execute the `init` command.
///
/// Creates the project folder, a sample schema (when absent), the service
/// file and a `.gitignore` entry covering it.
pub fn execute(args: InitArgs) -> Result<()> {
    let root = std::env::current_dir()?;
    let service_path = root.join(SERVICE_FILE_NAME);

    if service_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Service file '{}' already exists. Use --force to overwrite.",
            SERVICE_FILE_NAME
        ));
    }

    println!("🎯 Initializing confgen project...");

    let folder = root.join(&args.folder);
    let configs_dir = folder.join("config");
    fs::create_dir_all(&configs_dir)?;

    let schema_path = folder.join("schema.yml");
    if schema_path.exists() {
        println!("💡 Keeping existing {}", display_relative(&schema_path, &root));
    } else {
        fs::write(&schema_path, sample_schema())?;
        println!("✅ Created {}", display_relative(&schema_path, &root));
    }

    let content = ServiceFile::render(
        &args.folder.join("schema.yml"),
        &args.folder.join("config"),
    );
    fs::write(&service_path, content)?;
    println!("✅ Created {}", SERVICE_FILE_NAME);

    writer::append_gitignore_entry(&root, ".confgen.*")?;

    println!("💡 Run `confgen generate` to compile the schema into config files");

    Ok(())
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

/// The starter schema written for a fresh project.
fn sample_schema() -> String {
    r#"# confgen schema definition
#
# Each block becomes a top-level key in the generated files. Fields carry a
# type (text, int, float, bool), an optional default and an optional
# development-mode override; `secret: true` routes a field into
# .secrets.yml and `filename:` into a custom file.

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
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    fn default_args() -> InitArgs {
        InitArgs {
            folder: PathBuf::from("configuration"),
            force: false,
        }
    }

    #[test]
    fn test_sample_schema_parses_and_compiles() {
        let blocks = confgen::schema::parse(&sample_schema()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id(), "postgresql");

        let document = confgen::compiler::compile(&blocks).unwrap();
        assert!(!document.is_empty());
    }

    #[test]
    #[serial]
    fn test_execute_scaffolds_project() {
        let original_dir = env::current_dir().unwrap();
        let temp_dir = TempDir::new().unwrap();
        env::set_current_dir(&temp_dir).unwrap();

        let result = execute(default_args());
        assert!(result.is_ok());

        assert!(Path::new("configuration/schema.yml").is_file());
        assert!(Path::new("configuration/config").is_dir());

        let service = ServiceFile::from_file(SERVICE_FILE_NAME).unwrap();
        assert_eq!(service.schema_path, PathBuf::from("configuration/schema.yml"));
        assert_eq!(service.configs_path, PathBuf::from("configuration/config"));

        let gitignore = fs::read_to_string(".gitignore").unwrap();
        assert!(gitignore.contains(".confgen.*"));

        env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_execute_refuses_existing_service_file() {
        let original_dir = env::current_dir().unwrap();
        let temp_dir = TempDir::new().unwrap();
        env::set_current_dir(&temp_dir).unwrap();

        fs::write(SERVICE_FILE_NAME, "schema_path: s\nconfigs_path: c\n").unwrap();

        let result = execute(default_args());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));

        env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_execute_force_overwrites_service_file() {
        let original_dir = env::current_dir().unwrap();
        let temp_dir = TempDir::new().unwrap();
        env::set_current_dir(&temp_dir).unwrap();

        fs::write(SERVICE_FILE_NAME, "schema_path: old\nconfigs_path: old\n").unwrap();

        let args = InitArgs {
            folder: PathBuf::from("configuration"),
            force: true,
        };
        assert!(execute(args).is_ok());

        let service = ServiceFile::from_file(SERVICE_FILE_NAME).unwrap();
        assert_eq!(service.schema_path, PathBuf::from("configuration/schema.yml"));

        env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_execute_keeps_existing_schema_file() {
        let original_dir = env::current_dir().unwrap();
        let temp_dir = TempDir::new().unwrap();
        env::set_current_dir(&temp_dir).unwrap();

        fs::create_dir_all("configuration").unwrap();
        fs::write("configuration/schema.yml", "blocks: []\n").unwrap();

        assert!(execute(default_args()).is_ok());

        let schema = fs::read_to_string("configuration/schema.yml").unwrap();
        assert_eq!(schema, "blocks: []\n");

        env::set_current_dir(original_dir).unwrap();
    }
}
