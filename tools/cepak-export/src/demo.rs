//! Fixed demo assets used when a request has no input files.

use crate::catalog::{
    AssetCatalog, AssetRole, CatalogOrigin, CollisionMap, Dimensions, EncodedAsset,
};
use crate::codegen::{self, ArrayStyle};

pub const DEMO_SPRITE_SYMBOL: &str = "player_sprite";
pub const DEMO_MAP_SYMBOL: &str = "demo_map";

pub const DEMO_SPRITE_SIZE: Dimensions = Dimensions {
    width: 8,
    height: 8,
};
pub const DEMO_MAP_SIZE: Dimensions = Dimensions {
    width: 10,
    height: 6,
};

/// 8x8 diamond at full intensity.
#[rustfmt::skip]
pub const DEMO_SPRITE: [u8; 64] = [
    0, 0, 0, 15, 15, 0, 0, 0,
    0, 0, 15, 15, 15, 15, 0, 0,
    0, 15, 15, 15, 15, 15, 15, 0,
    15, 15, 15, 15, 15, 15, 15, 15,
    15, 15, 15, 15, 15, 15, 15, 15,
    0, 15, 15, 15, 15, 15, 15, 0,
    0, 0, 15, 15, 15, 15, 0, 0,
    0, 0, 0, 15, 15, 0, 0, 0,
];

/// 10x6 grid: 1 = floor, 0 = wall. A rectangular corridor.
#[rustfmt::skip]
pub const DEMO_MAP: [u8; 60] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 1, 1, 1, 1, 1, 1, 1, 1, 0,
    0, 1, 0, 0, 0, 0, 0, 0, 1, 0,
    0, 1, 0, 0, 0, 0, 0, 0, 1, 0,
    0, 1, 1, 1, 1, 1, 1, 1, 1, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

fn demo_asset(symbol: &str, values: &[u8], size: Dimensions) -> EncodedAsset {
    EncodedAsset {
        symbol: symbol.to_string(),
        role: AssetRole::Sprite,
        values: values.to_vec(),
        size: Some(size),
        origin_file: None,
        text: codegen::render_array(symbol, values, &ArrayStyle::wrapped(size.width as usize)),
    }
}

impl AssetCatalog {
    /// The demo catalog: a player sprite and a collision map, both sprites.
    ///
    /// Independent of any encoder settings, so it is identical on every call.
    pub fn demo() -> Self {
        let mut catalog = AssetCatalog::new(CatalogOrigin::Demo);
        catalog.push(demo_asset(DEMO_SPRITE_SYMBOL, &DEMO_SPRITE, DEMO_SPRITE_SIZE));
        catalog.push(demo_asset(DEMO_MAP_SYMBOL, &DEMO_MAP, DEMO_MAP_SIZE));
        catalog.set_collision_map(CollisionMap {
            symbol: DEMO_MAP_SYMBOL.to_string(),
            width: DEMO_MAP_SIZE.width,
            height: DEMO_MAP_SIZE.height,
        });
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_is_reproducible() {
        assert_eq!(AssetCatalog::demo(), AssetCatalog::demo());
    }

    #[test]
    fn test_demo_contents() {
        let catalog = AssetCatalog::demo();
        assert_eq!(catalog.origin(), CatalogOrigin::Demo);
        let files: Vec<_> = catalog.assets().map(|a| a.file_name()).collect();
        assert_eq!(files, ["player_sprite.c", "demo_map.c"]);
        assert!(catalog.sounds().is_empty());
    }

    #[test]
    fn test_demo_sprite_range() {
        assert!(DEMO_SPRITE.iter().all(|&v| v <= 15));
        assert_eq!(DEMO_SPRITE.len() as u32, DEMO_SPRITE_SIZE.width * DEMO_SPRITE_SIZE.height);
    }

    #[test]
    fn test_demo_map_is_binary() {
        assert!(DEMO_MAP.iter().all(|&v| v <= 1));
        assert_eq!(DEMO_MAP.len() as u32, DEMO_MAP_SIZE.width * DEMO_MAP_SIZE.height);
    }

    #[test]
    fn test_demo_map_flagged_for_collision() {
        let catalog = AssetCatalog::demo();
        let map = catalog.collision_map().unwrap();
        assert_eq!(map.symbol, DEMO_MAP_SYMBOL);
        assert_eq!((map.width, map.height), (10, 6));
    }

    #[test]
    fn test_demo_sprite_text() {
        let catalog = AssetCatalog::demo();
        let sprite = catalog.get(DEMO_SPRITE_SYMBOL).unwrap();
        assert!(
            sprite
                .text
                .starts_with("const uint8_t player_sprite[] = {\n  0,0,0,15,15,0,0,0,\n")
        );
        assert_eq!(sprite.text.lines().count(), 10);
    }
}
