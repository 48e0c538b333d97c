//! Export command - encode a single file and print its C source

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use cepak_export::{ImageLayout, InputFile, MANIFEST_NAME, ProjectManifest, Quantization};

/// Arguments for the export command
#[derive(Args)]
pub struct ExportArgs {
    /// Input PNG or WAV file
    pub input: PathBuf,

    /// Output .c file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to cepak.toml manifest file (optional)
    #[arg(short, long, default_value = MANIFEST_NAME)]
    pub manifest: PathBuf,

    /// Pixel quantization: average48 or luma
    #[arg(short, long)]
    pub quantization: Option<Quantization>,

    /// Image layout: raw or tiles
    #[arg(long)]
    pub layout: Option<ImageLayout>,

    /// Values per line (0 = one line)
    #[arg(long)]
    pub values_per_line: Option<usize>,
}

/// Execute the export command
pub fn execute(args: ExportArgs) -> Result<()> {
    let manifest = ProjectManifest::load_or_default(&args.manifest)?;
    manifest.validate()?;

    let mut options = manifest.convert_options();
    if let Some(quantization) = args.quantization {
        options.decode.quantization = quantization;
    }
    if let Some(layout) = args.layout {
        options.encode.layout = layout;
    }
    if let Some(n) = args.values_per_line {
        options.encode.style.values_per_line = n;
    }

    let runtime = crate::build_runtime(1)?;
    let text = runtime
        .block_on(cepak_export::encode_file(
            InputFile::from(args.input.clone()),
            &options,
        ))
        .with_context(|| format!("Failed to export {}", args.input.display()))?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
