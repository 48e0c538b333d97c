//! cepak CLI - bundle tool for TI-84 Plus CE game projects
//!
//! # Commands
//!
//! - `cepak convert [FILES..]` - Encode PNG/WAV files and pack a `.8pk` project bundle
//! - `cepak export <FILE>` - Print the C source for a single asset
//! - `cepak init` - Create a new cepak.toml manifest
//!
//! # Usage
//!
//! ```bash
//! # Bundle the demo project (no inputs)
//! cepak convert
//!
//! # Bundle real assets
//! cepak convert player.png level.png jump.wav
//!
//! # Inspect one asset's encoding
//! cepak export player.png
//! ```
//!
//! # Manifest (cepak.toml)
//!
//! ```toml
//! [project]
//! name = "maze"
//! map = "level"
//!
//! [encode]
//! quantization = "luma"
//! ```

mod convert;
mod export;
mod init;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

/// cepak - bundle tool for TI-84 Plus CE game projects
#[derive(Parser)]
#[command(name = "cepak")]
#[command(about = "Bundle tool for TI-84 Plus CE game projects")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode assets and pack them with a generated project into a .8pk bundle
    Convert(convert::ConvertArgs),

    /// Print the encoded C source for a single file
    Export(export::ExportArgs),

    /// Create a new cepak.toml manifest
    Init(init::InitArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout is reserved for command output (`export` prints C source)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(cli.verbose))
        .init();

    match cli.command {
        Commands::Convert(args) => convert::execute(args),
        Commands::Export(args) => export::execute(args),
        Commands::Init(args) => init::execute(args),
    }
}

/// `RUST_LOG` when set, otherwise `info` (`debug` with `--verbose`).
fn log_filter(verbose: bool) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if verbose { "debug" } else { "info" })
    })
}

/// Runtime for one command. `jobs == 1` keeps everything on the calling thread.
pub(crate) fn build_runtime(jobs: usize) -> Result<tokio::runtime::Runtime> {
    let mut builder = if jobs <= 1 {
        tokio::runtime::Builder::new_current_thread()
    } else {
        let mut builder = tokio::runtime::Builder::new_multi_thread();
        builder.worker_threads(jobs);
        builder
    };
    builder.enable_all().build().context("Failed to create runtime")
}
