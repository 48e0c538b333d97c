//! 8x8 tile layout for quantized images.
//!
//! The image is cut into tiles in row-major tile order. Pixels beyond the
//! image edge pad with 0. Identical tiles share one index, assigned in order
//! of first appearance.

use std::collections::HashMap;

use crate::codegen::{self, ArrayStyle};
use crate::error::DecodeError;
use crate::texture::DecodedImage;

pub const TILE_W: u32 = 8;
pub const TILE_H: u32 = 8;
const TILE_LEN: usize = (TILE_W * TILE_H) as usize;

/// Highest tile count a `uint16_t` map can index.
pub const MAX_TILES: usize = u16::MAX as usize + 1;

/// Suffixes of the identifiers [`render_tileset`] declares.
const DECLARED_SUFFIXES: [&str; 7] = [
    "_tile_count",
    "_tile_w",
    "_tile_h",
    "_tiles",
    "_map_w",
    "_map_h",
    "_map",
];

/// De-duplicated tiles plus the map that places them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSet {
    /// Tile pixel data, `TILE_W * TILE_H` values per tile.
    pub tiles: Vec<Vec<u8>>,
    pub map_w: u32,
    pub map_h: u32,
    /// `map_w * map_h` tile indices, row-major.
    pub map: Vec<u16>,
}

impl TileSet {
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

/// Split an image into de-duplicated tiles.
pub fn build_tileset(name: &str, image: &DecodedImage) -> Result<TileSet, DecodeError> {
    let map_w = image.width.div_ceil(TILE_W);
    let map_h = image.height.div_ceil(TILE_H);

    let mut tiles: Vec<Vec<u8>> = Vec::new();
    let mut index_of: HashMap<Vec<u8>, u16> = HashMap::new();
    let mut map = Vec::with_capacity((map_w * map_h) as usize);

    for ty in 0..map_h {
        for tx in 0..map_w {
            let tile = cut_tile(image, tx, ty);
            let index = match index_of.get(&tile) {
                Some(&index) => index,
                None => {
                    let index = u16::try_from(tiles.len()).map_err(|_| DecodeError::TooManyTiles {
                        name: name.to_string(),
                        count: tiles.len() + 1,
                        max: MAX_TILES,
                    })?;
                    index_of.insert(tile.clone(), index);
                    tiles.push(tile);
                    index
                }
            };
            map.push(index);
        }
    }

    Ok(TileSet {
        tiles,
        map_w,
        map_h,
        map,
    })
}

fn cut_tile(image: &DecodedImage, tx: u32, ty: u32) -> Vec<u8> {
    let mut tile = Vec::with_capacity(TILE_LEN);
    for y in ty * TILE_H..(ty + 1) * TILE_H {
        for x in tx * TILE_W..(tx + 1) * TILE_W {
            let value = if x < image.width && y < image.height {
                image.values[(y * image.width + x) as usize]
            } else {
                0
            };
            tile.push(value);
        }
    }
    tile
}

/// Identifiers [`render_tileset`] declares for `symbol`.
pub fn tileset_names(symbol: &str) -> Vec<String> {
    DECLARED_SUFFIXES
        .iter()
        .map(|suffix| format!("{}{}", symbol, suffix))
        .collect()
}

/// Emit the tile set and tile map for `symbol`.
///
/// Declares `<symbol>_tile_count`, `<symbol>_tile_w`, `<symbol>_tile_h`,
/// `<symbol>_tiles[]`, `<symbol>_map_w`, `<symbol>_map_h` and `<symbol>_map[]`.
pub fn render_tileset(symbol: &str, set: &TileSet, style: &ArrayStyle) -> String {
    let mut out = String::new();

    out.push_str(&codegen::render_scalar(
        "uint16_t",
        &format!("{}_tile_count", symbol),
        set.tile_count(),
    ));
    out.push_str(&codegen::render_scalar("uint8_t", &format!("{}_tile_w", symbol), TILE_W));
    out.push_str(&codegen::render_scalar("uint8_t", &format!("{}_tile_h", symbol), TILE_H));

    let tile_style = ArrayStyle {
        values_per_line: if style.values_per_line == 0 {
            TILE_LEN
        } else {
            style.values_per_line
        },
        emit_length: false,
    };
    let pixels: Vec<u8> = set.tiles.iter().flatten().copied().collect();
    out.push_str(&codegen::render_array(
        &format!("{}_tiles", symbol),
        &pixels,
        &tile_style,
    ));

    out.push_str(&codegen::render_scalar("uint16_t", &format!("{}_map_w", symbol), set.map_w));
    out.push_str(&codegen::render_scalar("uint16_t", &format!("{}_map_h", symbol), set.map_h));
    let map_style = ArrayStyle {
        values_per_line: (set.map_w as usize).max(1),
        emit_length: false,
    };
    out.push_str(&codegen::render_typed_array(
        "uint16_t",
        &format!("{}_map", symbol),
        &set.map,
        &map_style,
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> DecodedImage {
        let mut values = Vec::new();
        for y in 0..height {
            for x in 0..width {
                values.push(f(x, y));
            }
        }
        DecodedImage {
            width,
            height,
            values,
        }
    }

    #[test]
    fn test_uniform_image_is_one_tile() {
        let set = build_tileset("flat", &image(16, 16, |_, _| 5)).unwrap();
        assert_eq!(set.tile_count(), 1);
        assert_eq!((set.map_w, set.map_h), (2, 2));
        assert_eq!(set.map, vec![0, 0, 0, 0]);
        assert!(set.tiles[0].iter().all(|&v| v == 5));
    }

    #[test]
    fn test_first_appearance_order() {
        // Left half 0, right half 9
        let set = build_tileset("split", &image(16, 8, |x, _| if x < 8 { 0 } else { 9 })).unwrap();
        assert_eq!(set.tile_count(), 2);
        assert_eq!(set.map, vec![0, 1]);
        assert_eq!(set.tiles[1][0], 9);
    }

    #[test]
    fn test_partial_tiles_pad_with_zero() {
        let set = build_tileset("odd", &image(10, 3, |_, _| 15)).unwrap();
        assert_eq!((set.map_w, set.map_h), (2, 1));
        let first = &set.tiles[0];
        assert_eq!(first[0], 15);
        // Row 3 is outside the 3-pixel-high image
        assert_eq!(first[3 * TILE_W as usize], 0);
        let second = &set.tiles[1];
        assert_eq!(second[1], 15);
        assert_eq!(second[2], 0);
    }

    #[test]
    fn test_render_declares_all_symbols() {
        let set = build_tileset("bg", &image(8, 8, |x, y| ((x + y) % 2) as u8)).unwrap();
        let text = render_tileset("bg", &set, &ArrayStyle::default());
        assert!(text.contains("const uint16_t bg_tile_count = 1;\n"));
        assert!(text.contains("const uint8_t bg_tile_w = 8;\n"));
        assert!(text.contains("const uint8_t bg_tiles[] = {\n"));
        assert!(text.contains("const uint16_t bg_map_w = 1;\n"));
        assert!(text.contains("const uint16_t bg_map_h = 1;\n"));
        assert!(text.contains("const uint16_t bg_map[] = {\n  0,\n};\n"));
    }

    #[test]
    fn test_tileset_names_match_render() {
        let set = build_tileset("bg", &image(8, 8, |_, _| 1)).unwrap();
        let text = render_tileset("bg", &set, &ArrayStyle::default());
        let names = tileset_names("bg");
        assert_eq!(names.len(), 7);
        for name in names {
            let scalar = format!(" {} = ", name);
            let array = format!(" {}[] = ", name);
            assert!(
                text.contains(&scalar) || text.contains(&array),
                "{} not declared",
                name
            );
        }
    }
}
