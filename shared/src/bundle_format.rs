//! Bundle format constants for TI-84 Plus CE game projects.
//!
//! `BundleFormat` is the single source of truth for the names used inside a
//! generated bundle and for the extensions recognised on input.
//!
//! # Example
//!
//! ```
//! use cepak_shared::CE_BUNDLE_FORMAT;
//!
//! assert_eq!(CE_BUNDLE_FORMAT.extension, "8pk");
//! assert_eq!(CE_BUNDLE_FORMAT.download_name("ti84_full_game"), "ti84_full_game.8pk");
//! ```

/// Naming constants for one bundle flavour.
#[derive(Debug, Clone, Copy)]
pub struct BundleFormat {
    /// Bundle file extension without dot (e.g., "8pk")
    pub extension: &'static str,

    /// Project name used when none is configured
    pub default_project: &'static str,

    /// Aggregator header file name
    pub header_name: &'static str,

    /// Include guard macro of the aggregator header
    pub header_guard: &'static str,

    /// Program skeleton file name
    pub main_name: &'static str,

    /// Extension of generated asset source files
    pub source_ext: &'static str,

    /// Input extension routed through the image decoder
    pub image_ext: &'static str,

    /// Input extension routed through the audio pass-through
    pub audio_ext: &'static str,
}

impl BundleFormat {
    /// Create a new bundle format.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        extension: &'static str,
        default_project: &'static str,
        header_name: &'static str,
        header_guard: &'static str,
        main_name: &'static str,
        source_ext: &'static str,
        image_ext: &'static str,
        audio_ext: &'static str,
    ) -> Self {
        Self {
            extension,
            default_project,
            header_name,
            header_guard,
            main_name,
            source_ext,
            image_ext,
            audio_ext,
        }
    }

    /// File name offered for download, e.g. `ti84_full_game.8pk`.
    pub fn download_name(&self, project: &str) -> String {
        format!("{}.{}", project, self.extension)
    }

    /// Generated source file name for an asset symbol, e.g. `player_sprite.c`.
    pub fn source_name(&self, symbol: &str) -> String {
        format!("{}.{}", symbol, self.source_ext)
    }
}

/// TI-84 Plus CE bundle format (CE C toolchain sources).
pub const CE_BUNDLE_FORMAT: BundleFormat = BundleFormat::new(
    "8pk",
    "ti84_full_game",
    "assets.h",
    "ASSETS_H",
    "main.c",
    "c",
    "png",
    "wav",
);
