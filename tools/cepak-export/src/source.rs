//! Input files, their classification and symbol derivation.

use std::path::{Path, PathBuf};

use cepak_shared::{CE_BUNDLE_FORMAT, MAX_ASSET_BYTES, check_size};
use serde::Serialize;

use crate::error::DecodeError;

/// What kind of asset a file is, judged by its extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Image,
    Audio,
    Unknown,
}

impl SourceKind {
    /// Classify by the final extension, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();

        if ext == CE_BUNDLE_FORMAT.image_ext {
            SourceKind::Image
        } else if ext == CE_BUNDLE_FORMAT.audio_ext {
            SourceKind::Audio
        } else {
            SourceKind::Unknown
        }
    }

    pub fn is_recognized(self) -> bool {
        self != SourceKind::Unknown
    }
}

/// One input file with its bytes in memory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    name: String,
    bytes: Vec<u8>,
    kind: SourceKind,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let kind = SourceKind::from_name(&name);
        Self { name, bytes, kind }
    }

    /// Read a file from disk, refusing anything over [`MAX_ASSET_BYTES`].
    pub async fn load(path: &Path) -> Result<Self, DecodeError> {
        Self::load_with_limit(path, MAX_ASSET_BYTES).await
    }

    pub(crate) async fn load_with_limit(path: &Path, max: u64) -> Result<Self, DecodeError> {
        let name = file_name(path);

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| DecodeError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        check_size(metadata.len(), max).map_err(|len| DecodeError::TooLarge {
            name: name.clone(),
            len,
            max,
        })?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| DecodeError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn symbol(&self) -> String {
        symbol_name(&self.name)
    }
}

/// An entry of a conversion request: either a path still to be read or a
/// file already in memory.
#[derive(Debug, Clone)]
pub enum InputFile {
    OnDisk(PathBuf),
    InMemory(SourceFile),
}

impl InputFile {
    /// Display name (file name without directories).
    pub fn name(&self) -> String {
        match self {
            InputFile::OnDisk(path) => file_name(path),
            InputFile::InMemory(file) => file.name().to_string(),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            InputFile::OnDisk(path) => SourceKind::from_name(&file_name(path)),
            InputFile::InMemory(file) => file.kind(),
        }
    }

    /// Resolve to an in-memory file, reading from disk if needed.
    pub async fn load(self) -> Result<SourceFile, DecodeError> {
        match self {
            InputFile::OnDisk(path) => SourceFile::load(&path).await,
            InputFile::InMemory(file) => Ok(file),
        }
    }
}

impl From<SourceFile> for InputFile {
    fn from(file: SourceFile) -> Self {
        InputFile::InMemory(file)
    }
}

impl From<PathBuf> for InputFile {
    fn from(path: PathBuf) -> Self {
        InputFile::OnDisk(path)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Identifiers a generated array may not use: C keywords plus the names
/// `main.c` defines itself.
const RESERVED: &[&str] = &[
    "auto", "bool", "break", "case", "char", "const", "continue", "default", "do", "double",
    "else", "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "main",
    "register", "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch",
    "typedef", "union", "unsigned", "void", "volatile", "while",
    // <stdbool.h>, <stdint.h>
    "false", "int16_t", "int32_t", "int8_t", "true", "uint16_t", "uint32_t", "uint8_t",
    // skeleton
    "CELL", "ITEM_COUNT", "MAP_H", "MAP_W", "SIZE", "STEP", "can_move", "col", "collect",
    "draw_items", "item_taken", "item_x", "item_y", "px", "py", "row", "walkable",
];

/// Derive the C symbol for a file name.
///
/// Takes the name minus its last extension and maps it onto a C identifier:
/// `"My Kick!.wav"` becomes `My_Kick_`, `"8bit.png"` becomes `_8bit`.
/// Keywords, `main` and the skeleton's own names get a trailing underscore.
pub fn symbol_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut symbol: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if symbol.is_empty() || symbol.starts_with(|c: char| c.is_ascii_digit()) {
        symbol.insert(0, '_');
    }
    if RESERVED.contains(&symbol.as_str()) {
        symbol.push('_');
    }

    symbol
}

/// Whether `symbol` could have come out of [`symbol_name`].
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && !symbol.starts_with(|c: char| c.is_ascii_digit())
        && symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED.contains(&symbol)
}
