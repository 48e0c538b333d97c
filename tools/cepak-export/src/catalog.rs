//! The set of encoded assets for one conversion request.
//!
//! A catalog is either the fixed demo set or the result of converting the
//! request's inputs. Consumers never need to know which: both expose the
//! same sprite and sound groups.

use std::collections::HashMap;

use cepak_shared::CE_BUNDLE_FORMAT;
use serde::{Deserialize, Serialize};

use crate::codegen::{self, ArrayStyle};
use crate::decode::{DecodeOutcome, Decoded};
use crate::error::Diagnostic;
use crate::source::symbol_name;
use crate::texture::DecodedImage;
use crate::tiles;

/// Which group an asset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetRole {
    Sprite,
    Sound,
}

/// How the catalog was populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogOrigin {
    Demo,
    FromInputs,
}

/// How images are laid out in their asset file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageLayout {
    /// One value per pixel.
    #[default]
    Raw,
    /// De-duplicated 8x8 tiles plus a tile map.
    Tiles,
}

impl std::str::FromStr for ImageLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(ImageLayout::Raw),
            "tiles" => Ok(ImageLayout::Tiles),
            other => Err(format!("unknown layout '{}' (use raw or tiles)", other)),
        }
    }
}

/// Encoder settings applied while building a catalog.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    pub style: ArrayStyle,
    pub layout: ImageLayout,
    /// Symbol of the input image to use as the collision map.
    pub map: Option<String>,
}

/// Width and height of an image-derived asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// One asset ready to be written as C source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAsset {
    pub symbol: String,
    pub role: AssetRole,
    pub values: Vec<u8>,
    pub size: Option<Dimensions>,
    /// Input file the asset came from; `None` for demo assets.
    pub origin_file: Option<String>,
    /// Generated C source.
    pub text: String,
}

impl EncodedAsset {
    /// Name of the generated source file, e.g. `player_sprite.c`.
    pub fn file_name(&self) -> String {
        CE_BUNDLE_FORMAT.source_name(&self.symbol)
    }
}

/// Grid the program skeleton checks movement against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollisionMap {
    pub symbol: String,
    pub width: u32,
    pub height: u32,
}

/// Encoded assets partitioned into sprites and sounds, each in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCatalog {
    origin: CatalogOrigin,
    sprites: Vec<EncodedAsset>,
    sounds: Vec<EncodedAsset>,
    collision_map: Option<CollisionMap>,
}

impl AssetCatalog {
    pub fn new(origin: CatalogOrigin) -> Self {
        Self {
            origin,
            sprites: Vec::new(),
            sounds: Vec::new(),
            collision_map: None,
        }
    }

    pub fn origin(&self) -> CatalogOrigin {
        self.origin
    }

    pub fn sprites(&self) -> &[EncodedAsset] {
        &self.sprites
    }

    pub fn sounds(&self) -> &[EncodedAsset] {
        &self.sounds
    }

    /// Every asset: sprites first, then sounds.
    pub fn assets(&self) -> impl Iterator<Item = &EncodedAsset> {
        self.sprites.iter().chain(self.sounds.iter())
    }

    pub fn len(&self) -> usize {
        self.sprites.len() + self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, symbol: &str) -> Option<&EncodedAsset> {
        self.assets().find(|a| a.symbol == symbol)
    }

    pub fn collision_map(&self) -> Option<&CollisionMap> {
        self.collision_map.as_ref()
    }

    pub(crate) fn push(&mut self, asset: EncodedAsset) {
        match asset.role {
            AssetRole::Sprite => self.sprites.push(asset),
            AssetRole::Sound => self.sounds.push(asset),
        }
    }

    pub(crate) fn set_collision_map(&mut self, map: CollisionMap) {
        self.collision_map = Some(map);
    }

    /// Build a catalog from decode outcomes, in order.
    pub fn from_outcomes(
        outcomes: Vec<DecodeOutcome>,
        options: &EncodeOptions,
    ) -> (Self, Vec<Diagnostic>) {
        let mut builder = CatalogBuilder::new(options);
        for outcome in outcomes {
            builder.push(outcome);
        }
        builder.finish()
    }
}

/// Incrementally assembles a catalog from decoded inputs.
///
/// The first file to claim a symbol keeps it; later claimants are dropped
/// and reported.
pub struct CatalogBuilder<'a> {
    options: &'a EncodeOptions,
    catalog: AssetCatalog,
    owners: HashMap<String, String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(options: &'a EncodeOptions) -> Self {
        Self {
            options,
            catalog: AssetCatalog::new(CatalogOrigin::FromInputs),
            owners: HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Record a file that was skipped for its extension.
    pub fn skip_unrecognized(&mut self, file: &str) {
        self.report(Diagnostic::UnrecognizedExtension {
            file: file.to_string(),
        });
    }

    pub fn push(&mut self, outcome: DecodeOutcome) {
        let DecodeOutcome { name, result, .. } = outcome;

        let decoded = match result {
            Ok(decoded) => decoded,
            Err(e) => {
                self.report(Diagnostic::decode_failed(&name, &e));
                return;
            }
        };

        let symbol = symbol_name(&name);
        let declared = self.declared_names(&symbol, &decoded);
        if let Some((taken, kept)) = declared
            .iter()
            .find_map(|id| self.owners.get(id).map(|kept| (id.clone(), kept.clone())))
        {
            self.report(Diagnostic::SymbolCollision {
                symbol: taken,
                kept,
                dropped: name,
            });
            return;
        }

        let asset = match decoded {
            Decoded::Image(image) => match self.encode_image(&name, &symbol, image) {
                Ok(asset) => asset,
                Err(diagnostic) => {
                    self.report(diagnostic);
                    return;
                }
            },
            Decoded::Audio(bytes) => EncodedAsset {
                text: codegen::render_array(&symbol, &bytes, &self.options.style),
                symbol: symbol.clone(),
                role: AssetRole::Sound,
                values: bytes,
                size: None,
                origin_file: Some(name.clone()),
            },
        };

        tracing::debug!("Cataloged {} as {:?} '{}'", name, asset.role, asset.symbol);
        for id in declared {
            self.owners.insert(id, name.clone());
        }
        self.catalog.push(asset);
    }

    /// Every C identifier the asset file for `symbol` will declare. The bare
    /// symbol is always included since it also names the file.
    fn declared_names(&self, symbol: &str, decoded: &Decoded) -> Vec<String> {
        let is_map = self.options.map.as_deref() == Some(symbol);
        let tiled = matches!(decoded, Decoded::Image(_))
            && !is_map
            && self.options.layout == ImageLayout::Tiles;

        let mut names = codegen::array_names(symbol, &self.options.style);
        if tiled {
            names.truncate(1);
            names.extend(tiles::tileset_names(symbol));
        }
        names
    }

    fn encode_image(
        &mut self,
        name: &str,
        symbol: &str,
        image: DecodedImage,
    ) -> Result<EncodedAsset, Diagnostic> {
        let is_map = self.options.map.as_deref() == Some(symbol);
        let size = Dimensions {
            width: image.width,
            height: image.height,
        };

        // The skeleton indexes the map array directly, so it always stays raw
        let text = if is_map || self.options.layout == ImageLayout::Raw {
            codegen::render_array(symbol, &image.values, &self.options.style)
        } else {
            let set = tiles::build_tileset(name, &image)
                .map_err(|e| Diagnostic::decode_failed(name, &e))?;
            tiles::render_tileset(symbol, &set, &self.options.style)
        };

        if is_map {
            self.catalog.set_collision_map(CollisionMap {
                symbol: symbol.to_string(),
                width: image.width,
                height: image.height,
            });
        }

        Ok(EncodedAsset {
            symbol: symbol.to_string(),
            role: AssetRole::Sprite,
            values: image.values,
            size: Some(size),
            origin_file: Some(name.to_string()),
            text,
        })
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn finish(mut self) -> (AssetCatalog, Vec<Diagnostic>) {
        if let Some(symbol) = &self.options.map {
            if self.catalog.collision_map().is_none() {
                let diagnostic = Diagnostic::MissingMap {
                    symbol: symbol.clone(),
                };
                self.report(diagnostic);
            }
        }
        (self.catalog, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::source::SourceKind;

    fn image_outcome(name: &str, width: u32, height: u32, value: u8) -> DecodeOutcome {
        DecodeOutcome {
            name: name.to_string(),
            kind: SourceKind::Image,
            result: Ok(Decoded::Image(DecodedImage {
                width,
                height,
                values: vec![value; (width * height) as usize],
            })),
        }
    }

    fn from_defaults(outcomes: Vec<DecodeOutcome>) -> (AssetCatalog, Vec<Diagnostic>) {
        AssetCatalog::from_outcomes(outcomes, &EncodeOptions::default())
    }

    fn audio_outcome(name: &str, bytes: &[u8]) -> DecodeOutcome {
        DecodeOutcome {
            name: name.to_string(),
            kind: SourceKind::Audio,
            result: Ok(Decoded::Audio(bytes.to_vec())),
        }
    }

    #[test]
    fn test_partition_preserves_order_within_role() {
        let outcomes = vec![
            audio_outcome("z.wav", &[1]),
            image_outcome("b.png", 1, 1, 3),
            audio_outcome("y.wav", &[2]),
            image_outcome("a.png", 1, 1, 4),
        ];
        let (catalog, diagnostics) = from_defaults(outcomes);

        assert!(diagnostics.is_empty());
        assert_eq!(catalog.origin(), CatalogOrigin::FromInputs);
        let sprites: Vec<_> = catalog.sprites().iter().map(|a| a.symbol.as_str()).collect();
        let sounds: Vec<_> = catalog.sounds().iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(sprites, ["b", "a"]);
        assert_eq!(sounds, ["z", "y"]);
        let all: Vec<_> = catalog.assets().map(|a| a.symbol.as_str()).collect();
        assert_eq!(all, ["b", "a", "z", "y"]);
    }

    #[test]
    fn test_collision_first_wins() {
        let outcomes = vec![image_outcome("a.png", 1, 1, 9), audio_outcome("a.wav", &[1, 2])];
        let (catalog, diagnostics) = from_defaults(outcomes);

        assert_eq!(catalog.len(), 1);
        let kept = catalog.get("a").unwrap();
        assert_eq!(kept.role, AssetRole::Sprite);
        assert_eq!(kept.origin_file.as_deref(), Some("a.png"));
        assert_eq!(
            diagnostics,
            vec![Diagnostic::SymbolCollision {
                symbol: "a".to_string(),
                kept: "a.png".to_string(),
                dropped: "a.wav".to_string(),
            }]
        );
    }

    #[test]
    fn test_length_constant_claims_its_name() {
        let options = EncodeOptions {
            style: ArrayStyle {
                emit_length: true,
                ..ArrayStyle::default()
            },
            ..EncodeOptions::default()
        };
        let outcomes = vec![audio_outcome("sfx.wav", &[1]), audio_outcome("sfx_len.wav", &[2])];
        let (catalog, diagnostics) = AssetCatalog::from_outcomes(outcomes, &options);

        let symbols: Vec<_> = catalog.assets().map(|a| a.symbol.as_str()).collect();
        assert_eq!(symbols, ["sfx"]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::SymbolCollision {
                symbol: "sfx_len".to_string(),
                kept: "sfx.wav".to_string(),
                dropped: "sfx_len.wav".to_string(),
            }]
        );
    }

    #[test]
    fn test_tile_names_collide_with_later_files() {
        let options = EncodeOptions {
            layout: ImageLayout::Tiles,
            ..EncodeOptions::default()
        };
        let outcomes = vec![
            image_outcome("bg_map.png", 8, 8, 1),
            image_outcome("bg.png", 8, 8, 2),
            audio_outcome("bg_tiles_x.wav", &[3]),
        ];
        let (catalog, diagnostics) = AssetCatalog::from_outcomes(outcomes, &options);

        // bg.png would declare bg_map, already claimed by bg_map.png
        let symbols: Vec<_> = catalog.assets().map(|a| a.symbol.as_str()).collect();
        assert_eq!(symbols, ["bg_map", "bg_tiles_x"]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::SymbolCollision {
                symbol: "bg_map".to_string(),
                kept: "bg_map.png".to_string(),
                dropped: "bg.png".to_string(),
            }]
        );
    }

    #[test]
    fn test_declared_names_never_repeat_across_assets() {
        let options = EncodeOptions {
            style: ArrayStyle {
                emit_length: true,
                ..ArrayStyle::default()
            },
            layout: ImageLayout::Tiles,
            map: None,
        };
        let outcomes = vec![
            image_outcome("bg.png", 8, 8, 1),
            image_outcome("bg_map.png", 8, 8, 1),
            audio_outcome("sfx.wav", &[1]),
            audio_outcome("sfx_len.wav", &[1]),
        ];
        let (catalog, diagnostics) = AssetCatalog::from_outcomes(outcomes, &options);

        assert_eq!(catalog.len(), 2);
        assert_eq!(diagnostics.len(), 2);
        let mut seen = std::collections::HashSet::new();
        for asset in catalog.assets() {
            for line in asset.text.lines().filter(|l| l.starts_with("const ")) {
                let decl = line.split(" = ").next().unwrap_or_default();
                assert!(seen.insert(decl.to_string()), "{} declared twice", decl);
            }
        }
    }

    #[test]
    fn test_failed_file_does_not_claim_symbol() {
        let outcomes = vec![
            DecodeOutcome {
                name: "hero.png".to_string(),
                kind: SourceKind::Image,
                result: Err(DecodeError::Unsupported {
                    name: "hero.png".to_string(),
                }),
            },
            audio_outcome("hero.wav", &[5]),
        ];
        let (catalog, diagnostics) = from_defaults(outcomes);

        assert_eq!(catalog.sounds().len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_failure());
    }

    #[test]
    fn test_audio_text_matches_bytes() {
        let (catalog, _) = from_defaults(vec![audio_outcome("beep.wav", &[0, 128, 255])]);
        let beep = catalog.get("beep").unwrap();
        assert_eq!(beep.values, vec![0, 128, 255]);
        assert_eq!(beep.text, "const uint8_t beep[] = {\n0,128,255,\n};\n");
        assert_eq!(beep.file_name(), "beep.c");
    }

    #[test]
    fn test_tiles_layout() {
        let options = EncodeOptions {
            layout: ImageLayout::Tiles,
            ..EncodeOptions::default()
        };
        let outcomes = vec![image_outcome("bg.png", 16, 8, 2)];
        let (catalog, _) = AssetCatalog::from_outcomes(outcomes, &options);
        let bg = catalog.get("bg").unwrap();
        assert!(bg.text.contains("bg_tiles[]"));
        assert!(bg.text.contains("const uint16_t bg_tile_count = 1;"));
        assert_eq!(bg.values.len(), 16 * 8);
    }

    #[test]
    fn test_map_from_inputs() {
        let options = EncodeOptions {
            layout: ImageLayout::Tiles,
            map: Some("level".to_string()),
            ..EncodeOptions::default()
        };
        let (catalog, diagnostics) =
            AssetCatalog::from_outcomes(vec![image_outcome("level.png", 4, 3, 1)], &options);

        assert!(diagnostics.is_empty());
        assert_eq!(
            catalog.collision_map(),
            Some(&CollisionMap {
                symbol: "level".to_string(),
                width: 4,
                height: 3,
            })
        );
        // Maps stay raw even in tile layout
        assert!(catalog.get("level").unwrap().text.starts_with("const uint8_t level[] = {"));
    }

    #[test]
    fn test_missing_map_reported() {
        let options = EncodeOptions {
            map: Some("level".to_string()),
            ..EncodeOptions::default()
        };
        let (catalog, diagnostics) =
            AssetCatalog::from_outcomes(vec![audio_outcome("level.wav", &[1])], &options);

        assert!(catalog.collision_map().is_none());
        assert_eq!(
            diagnostics,
            vec![Diagnostic::MissingMap {
                symbol: "level".to_string()
            }]
        );
    }

    #[test]
    fn test_unrecognized_reported() {
        let options = EncodeOptions::default();
        let mut builder = CatalogBuilder::new(&options);
        builder.skip_unrecognized("notes.txt");
        let (catalog, diagnostics) = builder.finish();

        assert!(catalog.is_empty());
        assert_eq!(
            diagnostics,
            vec![Diagnostic::UnrecognizedExtension {
                file: "notes.txt".to_string()
            }]
        );
    }

    #[test]
    fn test_parse_layout() {
        assert_eq!("tiles".parse::<ImageLayout>(), Ok(ImageLayout::Tiles));
        assert_eq!("RAW".parse::<ImageLayout>(), Ok(ImageLayout::Raw));
        assert!("sheet".parse::<ImageLayout>().is_err());
    }
}
