//! Bundle packaging.
//!
//! An [`Archiver`] turns named blobs into one downloadable artifact. The
//! pipeline only relies on contents being preserved byte for byte.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;

/// One named file in a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    /// Bundle-relative path using `/` separators.
    pub name: String,
    pub contents: Vec<u8>,
}

impl BundleEntry {
    pub fn text(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            contents: text.as_bytes().to_vec(),
        }
    }
}

/// Packages bundle entries into a single binary artifact.
pub trait Archiver {
    fn package(&self, entries: &[BundleEntry]) -> Result<Vec<u8>, ArchiveError>;
}

/// Zip packaging (deflate by default). Entries keep their given order and
/// carry the fixed zip epoch timestamp, so equal input gives equal bytes.
#[derive(Debug, Clone, Copy)]
pub struct ZipArchiver {
    method: CompressionMethod,
}

impl ZipArchiver {
    pub fn new() -> Self {
        Self {
            method: CompressionMethod::Deflated,
        }
    }

    pub fn stored() -> Self {
        Self {
            method: CompressionMethod::Stored,
        }
    }
}

impl Default for ZipArchiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Archiver for ZipArchiver {
    fn package(&self, entries: &[BundleEntry]) -> Result<Vec<u8>, ArchiveError> {
        ensure_unique(entries)?;

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(self.method);

        for entry in entries {
            writer.start_file(entry.name.as_str(), options)?;
            writer.write_all(&entry.contents)?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

fn ensure_unique(entries: &[BundleEntry]) -> Result<(), ArchiveError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.name.as_str()) {
            return Err(ArchiveError::DuplicateEntry(entry.name.clone()));
        }
    }
    Ok(())
}

/// Write entries as plain files under `dir`, creating subdirectories.
pub fn write_unpacked(dir: &Path, entries: &[BundleEntry]) -> Result<(), ArchiveError> {
    ensure_unique(entries)?;
    for entry in entries {
        let path = dir.join(&entry.name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &entry.contents)?;
    }
    Ok(())
}
