//! Convert command - encode assets and pack a project bundle

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use cepak_export::archive::write_unpacked;
use cepak_export::{
    ConversionRequest, ConvertOptions, ImageLayout, InputFile, MANIFEST_NAME, ProjectManifest,
    Quantization, ZipArchiver,
};

use crate::output;

/// Arguments for the convert command
#[derive(Args)]
pub struct ConvertArgs {
    /// PNG and WAV files to convert (none = demo project)
    pub files: Vec<PathBuf>,

    /// Path to cepak.toml manifest file (optional)
    #[arg(short, long, default_value = MANIFEST_NAME)]
    pub manifest: PathBuf,

    /// Output .8pk file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Project name (bundle is <name>.8pk)
    #[arg(long)]
    pub name: Option<String>,

    /// Decodes in flight (1 = sequential)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Pixel quantization: average48 or luma
    #[arg(short, long)]
    pub quantization: Option<Quantization>,

    /// Image layout: raw or tiles
    #[arg(long)]
    pub layout: Option<ImageLayout>,

    /// Also write the generated files unpacked into this directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Write a JSON conversion report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Execute the convert command
pub fn execute(args: ConvertArgs) -> Result<()> {
    let manifest = ProjectManifest::load_or_default(&args.manifest)?;
    manifest.validate()?;
    let options = resolve_options(&manifest, &args)?;

    let project_dir = args
        .manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    if args.files.is_empty() {
        println!("Converting: demo project");
    } else {
        println!("Converting: {} file(s)", args.files.len());
    }

    let inputs: Vec<InputFile> = args.files.iter().cloned().map(InputFile::from).collect();
    let request = ConversionRequest::new(inputs);

    let runtime = crate::build_runtime(options.decode.jobs)?;
    let conversion = runtime
        .block_on(cepak_export::convert(request, &options, &ZipArchiver::new()))
        .context("Conversion failed")?;

    let output_path = output::default_output_path(&project_dir, &conversion.file_name, args.output);
    output::write_bundle(&output_path, &conversion.archive)?;

    if let Some(dir) = &args.out_dir {
        write_unpacked(dir, &conversion.bundle.entries())
            .with_context(|| format!("Failed to write project files to {}", dir.display()))?;
        println!("  Unpacked: {}", dir.display());
    }

    if let Some(path) = &args.report {
        output::write_report(path, &conversion.report(&options.layout))?;
        println!("  Report: {}", path.display());
    }

    output::print_summary(&output_path, &conversion, &options.layout);
    Ok(())
}

/// Manifest settings with command-line overrides applied.
fn resolve_options(manifest: &ProjectManifest, args: &ConvertArgs) -> Result<ConvertOptions> {
    let mut options = manifest.convert_options();

    if let Some(name) = &args.name {
        if name.trim().is_empty() || name.contains(['/', '\\']) {
            anyhow::bail!("Invalid project name '{}'", name);
        }
        options.project_name = name.clone();
    }
    if let Some(jobs) = args.jobs {
        if jobs == 0 {
            anyhow::bail!("--jobs must be at least 1");
        }
        options.decode.jobs = jobs;
    }
    if let Some(quantization) = args.quantization {
        options.decode.quantization = quantization;
    }
    if let Some(layout) = args.layout {
        options.encode.layout = layout;
    }

    Ok(options)
}
