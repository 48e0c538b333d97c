//! cepak asset export library
//!
//! Turns PNG and WAV files into C byte arrays for the TI-84 Plus CE
//! toolchain, generates an `assets.h` aggregator and a `main.c` program
//! skeleton, and packages everything into a `.8pk` bundle.
//!
//! The entry point is [`pipeline::convert`]; the modules below it can be
//! used on their own (e.g. [`codegen::render_array`] for a single array).

pub mod archive;
pub mod audio;
pub mod catalog;
pub mod codegen;
pub mod decode;
pub mod demo;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod project;
pub mod source;
pub mod texture;
pub mod tiles;

pub use archive::{Archiver, BundleEntry, ZipArchiver};
pub use catalog::{AssetCatalog, AssetRole, CatalogOrigin, EncodeOptions, EncodedAsset, ImageLayout};
pub use codegen::ArrayStyle;
pub use decode::DecodeOptions;
pub use error::{ArchiveError, BundleError, DecodeError, Diagnostic};
pub use manifest::{MANIFEST_NAME, ManifestError, ProjectManifest};
pub use pipeline::{
    Conversion, ConversionReport, ConversionRequest, ConvertOptions, convert, encode_file,
};
pub use project::{BundleLayout, ProjectBundle, SkeletonOptions};
pub use source::{InputFile, SourceFile, SourceKind};
pub use texture::Quantization;
