//! Image decoding and intensity quantization.
//!
//! Each pixel becomes a single intensity in raster order. Two formulas
//! exist and are not numerically equivalent; [`Quantization::Average48`] is
//! the default.

use serde::{Deserialize, Serialize};

/// Pixel-to-intensity formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantization {
    /// `round((r + g + b) / 48)`, rounding halves up. Spans 0..=16: pure
    /// white lands one past the nominal 4-bit maximum and is not clamped.
    #[default]
    Average48,
    /// Integer Rec. 601 luma shifted down to 4 bits. Spans 0..=15.
    Luma,
}

impl Quantization {
    /// Largest value the formula can produce.
    pub const fn max_value(self) -> u8 {
        match self {
            Quantization::Average48 => 16,
            Quantization::Luma => 15,
        }
    }

    /// Intensity of one RGBA pixel.
    ///
    /// Fully transparent pixels read as black, matching a canvas readback.
    pub fn intensity(self, [r, g, b, a]: [u8; 4]) -> u8 {
        if a == 0 {
            return 0;
        }
        let (r, g, b) = (r as u32, g as u32, b as u32);
        let value = match self {
            Quantization::Average48 => (r + g + b + 24) / 48,
            Quantization::Luma => ((299 * r + 587 * g + 114 * b) / 1000) >> 4,
        };
        value as u8
    }
}

impl std::str::FromStr for Quantization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "average48" | "average" => Ok(Quantization::Average48),
            "luma" => Ok(Quantization::Luma),
            other => Err(format!(
                "unknown quantization '{}' (use average48 or luma)",
                other
            )),
        }
    }
}

/// Per-pixel intensities of one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// `width * height` values, row-major.
    pub values: Vec<u8>,
}

/// Decode image bytes (PNG, JPG) and quantize every pixel.
pub fn decode_intensities(
    bytes: &[u8],
    quantization: Quantization,
) -> Result<DecodedImage, image::ImageError> {
    let img = image::load_from_memory(bytes)?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let values = rgba
        .pixels()
        .map(|pixel| quantization.intensity(pixel.0))
        .collect();

    Ok(DecodedImage {
        width,
        height,
        values,
    })
}
