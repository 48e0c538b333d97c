//! Project generation: aggregator header and program skeleton.
//!
//! Both are pure functions of the catalog. Nothing here checks that the
//! symbols referenced by `main.c` exist; that surfaces when the project is
//! compiled with the CE toolchain.

use cepak_shared::CE_BUNDLE_FORMAT;
use serde::Deserialize;

use crate::archive::BundleEntry;
use crate::catalog::{AssetCatalog, CollisionMap, EncodedAsset};

/// CE LCD resolution.
pub const SCREEN_W: u32 = 320;
pub const SCREEN_H: u32 = 240;

/// Where asset files live inside the bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleLayout {
    /// Directory prefix for asset files, e.g. `assets`.
    pub asset_dir: Option<String>,
}

impl BundleLayout {
    /// Bundle-relative path of an asset file; also used in include directives.
    pub fn asset_path(&self, asset: &EncodedAsset) -> String {
        match self.asset_dir.as_deref().map(|d| d.trim_matches('/')) {
            Some(dir) if !dir.is_empty() => format!("{}/{}", dir, asset.file_name()),
            _ => asset.file_name(),
        }
    }
}

/// Parameters of the generated control loop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SkeletonOptions {
    /// Player start position in pixels.
    pub start: [i32; 2],
    /// Pixels moved per frame per held direction.
    pub step: u8,
    /// Side of the square drawn for the player and collectibles.
    pub size: u8,
    /// Collectible positions; empty for the plain skeleton.
    pub collectibles: Vec<[i32; 2]>,
}

impl Default for SkeletonOptions {
    fn default() -> Self {
        Self {
            start: [50, 50],
            step: 1,
            size: 8,
            collectibles: Vec::new(),
        }
    }
}

/// Generated text for one request, prior to archiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectBundle {
    pub header: String,
    pub main: String,
    /// Asset files in catalog order: (bundle path, C source).
    pub asset_files: Vec<(String, String)>,
}

impl ProjectBundle {
    pub fn generate(
        catalog: &AssetCatalog,
        skeleton: &SkeletonOptions,
        layout: &BundleLayout,
    ) -> Self {
        Self {
            header: generate_assets_header(catalog, layout),
            main: generate_main(catalog, skeleton, layout),
            asset_files: catalog
                .assets()
                .map(|asset| (layout.asset_path(asset), asset.text.clone()))
                .collect(),
        }
    }

    /// Archive entries: asset files, then `assets.h`, then `main.c`.
    pub fn entries(&self) -> Vec<BundleEntry> {
        let mut entries: Vec<BundleEntry> = self
            .asset_files
            .iter()
            .map(|(path, text)| BundleEntry::text(path, text))
            .collect();
        entries.push(BundleEntry::text(CE_BUNDLE_FORMAT.header_name, &self.header));
        entries.push(BundleEntry::text(CE_BUNDLE_FORMAT.main_name, &self.main));
        entries
    }
}

/// `assets.h`: one include per cataloged asset inside an include guard.
pub fn generate_assets_header(catalog: &AssetCatalog, layout: &BundleLayout) -> String {
    let guard = CE_BUNDLE_FORMAT.header_guard;
    let mut out = String::new();

    out.push_str(&format!("#ifndef {}\n", guard));
    out.push_str(&format!("#define {}\n", guard));
    out.push_str("#include <stdint.h>\n");
    for asset in catalog.assets() {
        out.push_str(&format!("#include \"{}\"\n", layout.asset_path(asset)));
    }
    out.push_str(&format!("#endif /* {} */\n", guard));

    out
}

/// `main.c`: a double-buffered input/redraw loop moving one square.
///
/// Sprite files are included so their arrays are linked in, but drawing is a
/// placeholder rectangle; per-tile rendering is left to the game author.
pub fn generate_main(
    catalog: &AssetCatalog,
    skeleton: &SkeletonOptions,
    layout: &BundleLayout,
) -> String {
    let mut out = String::new();

    out.push_str("#include <tice.h>\n");
    out.push_str("#include <graphx.h>\n");
    out.push_str("#include <keypadc.h>\n");
    out.push_str("#include <stdbool.h>\n");
    out.push_str("#include <stdint.h>\n");
    for sprite in catalog.sprites() {
        out.push_str(&format!("#include \"{}\"\n", layout.asset_path(sprite)));
    }
    out.push('\n');

    out.push_str(&format!("#define STEP {}\n", skeleton.step));
    out.push_str(&format!("#define SIZE {}\n", skeleton.size));

    if let Some(map) = catalog.collision_map() {
        push_collision(&mut out, map);
    }
    if !skeleton.collectibles.is_empty() {
        push_collectibles(&mut out, &skeleton.collectibles);
    }
    out.push('\n');

    let [start_x, start_y] = skeleton.start;
    out.push_str("int main(void)\n{\n");
    out.push_str(&format!("    int x = {}, y = {};\n", start_x, start_y));
    out.push('\n');
    out.push_str("    gfx_Begin();\n");
    out.push_str("    gfx_SetDrawBuffer();\n");
    out.push('\n');
    out.push_str("    do {\n");
    out.push_str("        kb_Scan();\n");
    out.push_str("        int nx = x, ny = y;\n");
    out.push_str("        if (kb_Data[7] & kb_Left) nx -= STEP;\n");
    out.push_str("        if (kb_Data[7] & kb_Right) nx += STEP;\n");
    out.push_str("        if (kb_Data[7] & kb_Up) ny -= STEP;\n");
    out.push_str("        if (kb_Data[7] & kb_Down) ny += STEP;\n");
    if catalog.collision_map().is_some() {
        out.push_str("        if (can_move(nx, ny)) {\n");
        out.push_str("            x = nx;\n");
        out.push_str("            y = ny;\n");
        out.push_str("        }\n");
    } else {
        out.push_str("        x = nx;\n");
        out.push_str("        y = ny;\n");
    }
    if !skeleton.collectibles.is_empty() {
        out.push_str("        collect(x, y);\n");
    }
    out.push('\n');
    out.push_str("        gfx_FillScreen(0);\n");
    if !skeleton.collectibles.is_empty() {
        out.push_str("        draw_items();\n");
    }
    out.push_str("        // placeholder: sprite data is included above, drawn as a rectangle\n");
    out.push_str("        gfx_SetColor(255);\n");
    out.push_str("        gfx_FillRectangle(x, y, SIZE, SIZE);\n");
    out.push_str("        gfx_SwapDraw();\n");
    out.push_str("    } while (!(kb_Data[6] & kb_Clear));\n");
    out.push('\n');
    out.push_str("    gfx_End();\n");
    out.push_str("    return 0;\n");
    out.push_str("}\n");

    out
}

/// Pixel size of one map cell so the whole grid fits on screen.
pub fn cell_size(map: &CollisionMap) -> u32 {
    let by_width = SCREEN_W / map.width.max(1);
    let by_height = SCREEN_H / map.height.max(1);
    by_width.min(by_height).max(1)
}

fn push_collision(out: &mut String, map: &CollisionMap) {
    out.push_str(&format!("#define CELL {}\n", cell_size(map)));
    out.push_str(&format!("#define MAP_W {}\n", map.width));
    out.push_str(&format!("#define MAP_H {}\n", map.height));
    out.push('\n');
    out.push_str("static bool walkable(int px, int py)\n{\n");
    out.push_str("    if (px < 0 || py < 0) return false;\n");
    out.push_str("    int col = px / CELL;\n");
    out.push_str("    int row = py / CELL;\n");
    out.push_str("    if (col >= MAP_W || row >= MAP_H) return false;\n");
    out.push_str(&format!("    return {}[row * MAP_W + col] != 0;\n", map.symbol));
    out.push_str("}\n");
    out.push('\n');
    out.push_str("static bool can_move(int nx, int ny)\n{\n");
    out.push_str("    return walkable(nx, ny) && walkable(nx + SIZE - 1, ny)\n");
    out.push_str("        && walkable(nx, ny + SIZE - 1)\n");
    out.push_str("        && walkable(nx + SIZE - 1, ny + SIZE - 1);\n");
    out.push_str("}\n");
}

fn push_collectibles(out: &mut String, items: &[[i32; 2]]) {
    let xs: Vec<String> = items.iter().map(|[x, _]| x.to_string()).collect();
    let ys: Vec<String> = items.iter().map(|[_, y]| y.to_string()).collect();

    out.push_str(&format!("#define ITEM_COUNT {}\n", items.len()));
    out.push('\n');
    out.push_str(&format!("static const int item_x[ITEM_COUNT] = {{{}}};\n", xs.join(", ")));
    out.push_str(&format!("static const int item_y[ITEM_COUNT] = {{{}}};\n", ys.join(", ")));
    out.push_str("static bool item_taken[ITEM_COUNT];\n");
    out.push('\n');
    out.push_str("static void collect(int x, int y)\n{\n");
    out.push_str("    for (int i = 0; i < ITEM_COUNT; i++) {\n");
    out.push_str("        if (!item_taken[i] && x < item_x[i] + SIZE && item_x[i] < x + SIZE\n");
    out.push_str("            && y < item_y[i] + SIZE && item_y[i] < y + SIZE) {\n");
    out.push_str("            item_taken[i] = true;\n");
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n");
    out.push('\n');
    out.push_str("static void draw_items(void)\n{\n");
    out.push_str("    gfx_SetColor(224);\n");
    out.push_str("    for (int i = 0; i < ITEM_COUNT; i++) {\n");
    out.push_str("        if (!item_taken[i])\n");
    out.push_str("            gfx_FillRectangle(item_x[i], item_y[i], SIZE, SIZE);\n");
    out.push_str("    }\n");
    out.push_str("}\n");
}
