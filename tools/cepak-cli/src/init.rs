//! Init command - create a new cepak.toml manifest
//!
//! Writes a manifest listing every setting at its default, with comments.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use cepak_export::MANIFEST_NAME;
use cepak_shared::CE_BUNDLE_FORMAT;

/// Arguments for the init command
#[derive(Args)]
pub struct InitArgs {
    /// Path to project directory (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Project name (defaults to ti84_full_game)
    #[arg(long)]
    pub name: Option<String>,

    /// Overwrite existing cepak.toml
    #[arg(long)]
    pub force: bool,
}

/// Execute the init command
pub fn execute(args: InitArgs) -> Result<()> {
    let project_dir = match args.path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };

    let manifest_path = project_dir.join(MANIFEST_NAME);

    if manifest_path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists at {}\nUse --force to overwrite",
            MANIFEST_NAME,
            manifest_path.display()
        );
    }

    let name = args
        .name
        .unwrap_or_else(|| CE_BUNDLE_FORMAT.default_project.to_string());
    if name.trim().is_empty() || name.contains(['/', '\\', '"']) {
        anyhow::bail!("Invalid project name '{}'", name);
    }

    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("Failed to create directory: {}", project_dir.display()))?;
    std::fs::write(&manifest_path, generate_manifest(&name))
        .with_context(|| format!("Failed to write manifest: {}", manifest_path.display()))?;

    println!("Created {}", MANIFEST_NAME);
    println!("  Bundle: {}", CE_BUNDLE_FORMAT.download_name(&name));
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize the generated project", MANIFEST_NAME);
    println!("  2. Run 'cepak convert <files..>' to build the bundle");

    Ok(())
}

/// Generate manifest content with helpful comments
fn generate_manifest(name: &str) -> String {
    let mut content = String::new();

    content.push_str("# cepak project manifest\n");
    content.push_str("# Every setting is optional; the values below are the defaults.\n");
    content.push('\n');

    content.push_str("[project]\n");
    content.push_str(&format!("name = \"{}\"\n", name));
    content.push_str("# asset_dir = \"assets\"      # place asset files under this directory\n");
    content.push_str("# map = \"level\"             # input image used as the collision map\n");
    content.push('\n');

    content.push_str("[encode]\n");
    content.push_str("quantization = \"average48\"  # or \"luma\"\n");
    content.push_str("layout = \"raw\"              # or \"tiles\" (8x8 tile set + tile map)\n");
    content.push_str("values_per_line = 0          # 0 = all values on one line\n");
    content.push_str("emit_length = false          # add `const uint32_t <symbol>_len`\n");
    content.push('\n');

    content.push_str("[decode]\n");
    content.push_str("jobs = 1                     # decodes in flight; 1 = sequential\n");
    content.push_str("timeout_ms = 0               # per-file timeout; 0 = none\n");
    content.push('\n');

    content.push_str("[skeleton]\n");
    content.push_str("start = [50, 50]\n");
    content.push_str("step = 1\n");
    content.push_str("size = 8\n");
    content.push_str("collectibles = []            # e.g. [[120, 80], [200, 40]]\n");

    content
}
