//! Shared constants for the cepak toolchain.
//!
//! Everything that names a file, an extension or a limit lives here so the
//! exporter and the CLI agree on the shape of a bundle.

pub mod bundle_format;
pub mod limits;

pub use bundle_format::{BundleFormat, CE_BUNDLE_FORMAT};
pub use limits::{MAX_ASSET_BYTES, check_size};
