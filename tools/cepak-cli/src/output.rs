use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

use cepak_export::{BundleLayout, CatalogOrigin, Conversion, ConversionReport};

pub fn default_output_path(
    project_dir: &Path,
    file_name: &str,
    override_path: Option<PathBuf>,
) -> PathBuf {
    override_path.unwrap_or_else(|| project_dir.join(file_name))
}

pub fn write_bundle(output_path: &Path, bundle: &[u8]) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(output_path, bundle)
        .with_context(|| format!("Failed to write bundle: {}", output_path.display()))?;
    Ok(())
}

pub fn write_report(path: &Path, report: &ConversionReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

pub fn print_summary(output_path: &Path, conversion: &Conversion, layout: &BundleLayout) {
    let catalog = &conversion.catalog;

    println!();
    println!(
        "Created: {} ({} bytes)",
        output_path.display(),
        conversion.archive.len()
    );
    println!("  Bundle hash: {:016x}", xxh3_64(&conversion.archive));
    if catalog.origin() == CatalogOrigin::Demo {
        println!("  Assets: demo set");
    }
    println!(
        "  Sprites: {}, Sounds: {}",
        catalog.sprites().len(),
        catalog.sounds().len()
    );
    for asset in catalog.assets() {
        match asset.size {
            Some(size) => println!(
                "    {} ({}x{}, {} values)",
                layout.asset_path(asset),
                size.width,
                size.height,
                asset.values.len()
            ),
            None => println!("    {} ({} bytes)", layout.asset_path(asset), asset.values.len()),
        }
    }
    if let Some(map) = catalog.collision_map() {
        println!("  Collision map: {} ({}x{})", map.symbol, map.width, map.height);
    }
    if !conversion.diagnostics.is_empty() {
        println!("  Warnings: {}", conversion.diagnostics.len());
        for diagnostic in &conversion.diagnostics {
            println!("    {}", diagnostic);
        }
    }
}
