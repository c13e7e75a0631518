//! # Generate Command Implementation
//!
//! This module implements the `generate` subcommand: compile the project's
//! schema into destination files inside the configured configs directory.
//!
//! ## Functionality
//!
//! - **Reconcile Mode** (default): merges the fresh compile over existing
//!   files so values people have filled in survive regeneration
//! - **Force Mode**: overwrites destinations from scratch, with a
//!   confirmation prompt when existing files would be discarded
//! - **Gitignore**: registers a pattern for every hidden destination

use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::path::{Path, PathBuf};

use confgen::compiler;
use confgen::schema;
use confgen::service::ServiceFile;
use confgen::writer::{self, WriteMode};

/// Compile the schema and write the destination files
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the project service file.
    ///
    /// Can also be set with the `CONFGEN_CONFIG` environment variable.
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = ".confgen.yml",
        env = "CONFGEN_CONFIG"
    )]
    pub config: PathBuf,

    /// Overwrite destination files instead of reconciling with them
    #[arg(short, long)]
    pub force: bool,

    /// Skip the confirmation prompt when --force discards existing files
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Execute the `generate` command.
///
/// Loads the service file, parses the schema, compiles it and writes every
/// destination, then appends `.gitignore` entries for hidden destinations.
pub fn execute(args: GenerateArgs) -> Result<()> {
    let service = ServiceFile::from_file(&args.config)?;
    let root = args.config.parent().unwrap_or(Path::new("."));

    let blocks = schema::from_file(root.join(&service.schema_path))?;
    let document = compiler::compile(&blocks)?;
    let configs_dir = root.join(&service.configs_path);

    let mode = if args.force {
        confirm_overwrite(&args, &configs_dir, &document)?;
        WriteMode::Overwrite
    } else {
        WriteMode::Reconcile
    };

    let written = writer::write_document(&configs_dir, &document, mode)?;
    for path in &written {
        println!("✅ Wrote {}", path.display());
    }

    for pattern in writer::hidden_destination_patterns(&document) {
        writer::append_gitignore_entry(root, &pattern)?;
    }

    println!("🎯 Configuration successfully generated");

    Ok(())
}

/// Asks for confirmation before `--force` discards existing files.
fn confirm_overwrite(
    args: &GenerateArgs,
    configs_dir: &Path,
    document: &compiler::Document,
) -> Result<()> {
    if args.yes {
        return Ok(());
    }

    let existing: Vec<String> = document
        .entries()
        .iter()
        .map(|(destination, _)| destination.file_name())
        .filter(|name| configs_dir.join(name).exists())
        .collect();

    if existing.is_empty() {
        return Ok(());
    }

    println!(
        "⚠️  --force will discard any manual edits in: {}",
        existing.join(", ")
    );
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Overwrite these files?")
        .default(false)
        .interact()?;

    if !confirmed {
        return Err(anyhow::anyhow!("Aborted by user"));
    }
    Ok(())
}
