//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which checks the
//! generated configuration files against the project schema without
//! modifying anything.
//!
//! ## Functionality
//!
//! - **Schema Parsing**: Loads the service file and parses the schema it
//!   points at.
//! - **Per-Root Checking**: Merges the generated files and loads every
//!   schema root independently, so one broken block does not hide
//!   problems in the others.
//! - **Strict Mode**: Optionally fails on warnings such as unconfigured
//!   blocks.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use confgen::loader;
use confgen::merge;
use confgen::reader::ConfigReader;

/// Validate the generated configuration files against the schema
#[derive(Args, Debug)]
pub struct ValidateArgs {
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

    /// Resolve values as development mode would.
    #[arg(long)]
    pub dev: bool,

    /// Use strict validation (fail on warnings).
    #[arg(long)]
    pub strict: bool,
}

/// Execute the `validate` command.
///
/// This function handles the logic for the `validate` subcommand. It merges
/// the project's generated files and checks every schema root against them,
/// reporting per-root status.
pub fn execute(args: ValidateArgs) -> Result<()> {
    println!("🔍 Validating configuration: {}", args.config.display());

    let mut reader = match ConfigReader::from_service_file(&args.config) {
        Ok(reader) => {
            println!("✅ Service file and schema parsed successfully");
            reader
        }
        Err(e) => {
            println!("❌ Project loading failed: {}", e);
            return Err(anyhow::anyhow!("Project loading failed: {}", e));
        }
    };
    if args.dev {
        reader = reader.with_development(true);
    }

    let mut has_warnings = false;
    let mut has_errors = false;

    // Basic configuration statistics
    println!("\n📊 Configuration Summary:");
    println!("   Schema roots: {}", reader.blocks().len());
    println!("   Source files: {}", reader.paths().len());
    println!(
        "   Mode: {}",
        if reader.development() {
            "development"
        } else {
            "production"
        }
    );

    // Check every root against the merged document
    println!("\n🔍 Checking schema roots...");

    let document = merge::load_sources(reader.paths());
    let development = reader.development();

    for block in reader.blocks() {
        if block.exclude() {
            println!("   {}: excluded from output", block.id());
            continue;
        }
        match loader::load(block, &document, development) {
            Ok(Some(_)) => println!("✅ {}: configured", block.id()),
            Ok(None) => {
                println!("⚠️  {}: not configured", block.id());
                has_warnings = true;
            }
            Err(e) => {
                println!("❌ {}: {}", block.id(), e);
                has_errors = true;
            }
        }
    }

    // Final result
    println!("\n🎯 Validation Result:");

    if has_errors {
        println!("❌ Configuration has errors that must be fixed");
        return Err(anyhow::anyhow!("Configuration validation failed"));
    }

    if has_warnings && args.strict {
        println!("❌ Configuration has warnings (strict mode enabled)");
        return Err(anyhow::anyhow!(
            "Configuration validation failed in strict mode"
        ));
    }

    if has_warnings {
        println!("⚠️ Configuration is valid but has warnings");
        println!("\n💡 Tip: Run `confgen generate` to materialize missing blocks");
    } else {
        println!("✅ Configuration is valid");
    }

    Ok(())
}
