//! cepak.toml project manifest.
//!
//! Every section and field is optional; an empty manifest describes the
//! default conversion.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cepak_shared::CE_BUNDLE_FORMAT;
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::{EncodeOptions, ImageLayout};
use crate::codegen::ArrayStyle;
use crate::decode::DecodeOptions;
use crate::pipeline::ConvertOptions;
use crate::project::{BundleLayout, SkeletonOptions};
use crate::source::is_valid_symbol;
use crate::texture::Quantization;

/// Default manifest file name.
pub const MANIFEST_NAME: &str = "cepak.toml";

const MAX_VALUES_PER_LINE: usize = 4096;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse cepak.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid cepak.toml: {0}")]
    Invalid(String),
}

/// cepak.toml manifest structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectManifest {
    pub project: ProjectSection,
    pub encode: EncodeSection,
    pub decode: DecodeSection,
    pub skeleton: SkeletonOptions,
}

/// Project naming and bundle layout
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
    /// Download name stem; the bundle is `<name>.8pk`
    pub name: String,
    /// Directory for asset files inside the bundle
    pub asset_dir: Option<String>,
    /// Symbol of an input image used as the collision map
    pub map: Option<String>,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            name: CE_BUNDLE_FORMAT.default_project.to_string(),
            asset_dir: None,
            map: None,
        }
    }
}

/// Encoder settings
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EncodeSection {
    pub quantization: Quantization,
    pub layout: ImageLayout,
    pub values_per_line: usize,
    pub emit_length: bool,
}

/// Decoder scheduling
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DecodeSection {
    /// Decodes in flight; 1 keeps files strictly sequential
    pub jobs: usize,
    /// Per-file timeout in milliseconds; 0 disables it
    pub timeout_ms: u64,
}

impl Default for DecodeSection {
    fn default() -> Self {
        Self {
            jobs: 1,
            timeout_ms: 0,
        }
    }
}

impl ProjectManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ManifestError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate manifest fields
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.project.name.trim().is_empty() {
            return Err(ManifestError::Invalid("project.name must not be empty".into()));
        }
        if self.project.name.contains(['/', '\\']) {
            return Err(ManifestError::Invalid(format!(
                "project.name '{}' must not contain path separators",
                self.project.name
            )));
        }
        if let Some(map) = &self.project.map {
            if !is_valid_symbol(map) {
                return Err(ManifestError::Invalid(format!(
                    "project.map '{}' is not a valid C identifier",
                    map
                )));
            }
        }
        if self.decode.jobs == 0 {
            return Err(ManifestError::Invalid("decode.jobs must be at least 1".into()));
        }
        if self.encode.values_per_line > MAX_VALUES_PER_LINE {
            return Err(ManifestError::Invalid(format!(
                "encode.values_per_line {} exceeds {}",
                self.encode.values_per_line, MAX_VALUES_PER_LINE
            )));
        }
        if self.skeleton.step == 0 {
            return Err(ManifestError::Invalid("skeleton.step must be at least 1".into()));
        }
        if self.skeleton.size == 0 {
            return Err(ManifestError::Invalid("skeleton.size must be at least 1".into()));
        }
        Ok(())
    }

    /// Settings for one conversion request.
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            project_name: self.project.name.clone(),
            decode: DecodeOptions {
                quantization: self.encode.quantization,
                jobs: self.decode.jobs,
                timeout: (self.decode.timeout_ms > 0)
                    .then(|| Duration::from_millis(self.decode.timeout_ms)),
            },
            encode: EncodeOptions {
                style: ArrayStyle {
                    values_per_line: self.encode.values_per_line,
                    emit_length: self.encode.emit_length,
                },
                layout: self.encode.layout,
                map: self.project.map.clone(),
            },
            skeleton: self.skeleton.clone(),
            layout: BundleLayout {
                asset_dir: self.project.asset_dir.clone(),
            },
        }
    }
}
