//! Font resolution and text rasterization
//!
//! Renderers never reach for a font on their own. A [`FontResolver`] is built
//! once from a [`FontConfig`] and handed to every render call as a
//! [`TextRasterizer`].

use crate::raster::fill_rect;
use crate::{CoreError, Result};
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Capability to measure and draw single-line text at a pixel size
pub trait TextRasterizer {
    /// Width in pixels of `text` set at `size`
    fn measure(&self, text: &str, size: f32) -> u32;

    /// Draw `text` with its top-left corner at (`x`, `y`)
    fn draw(&self, canvas: &mut RgbImage, text: &str, x: i32, y: i32, size: f32, color: Rgb<u8>);
}

/// Font selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontConfig {
    /// Explicit font file, tried before any candidate
    pub path: Option<PathBuf>,
    /// Ordered system font locations tried after `path`
    pub candidates: Vec<PathBuf>,
    /// Multiplier applied to every requested size
    pub scale: f32,
    /// Lower bound for scaled sizes
    pub min_size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            candidates: default_candidates(),
            scale: 1.0,
            min_size: 10.0,
        }
    }
}

fn default_candidates() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/google-droid-sans-fonts/DroidSans.ttf",
        "/usr/share/fonts/google-droid-sans-fonts/DroidSans-Regular.ttf",
        "/usr/share/fonts/google-noto-vf/NotoSans-VF.ttf",
        "/usr/share/fonts/google-noto-vf/NotoSans-Regular.ttf",
        "/usr/share/fonts/nimbus-sans/NimbusSans-Regular.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
        "/System/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Helvetica.ttc",
        "/Library/Fonts/Arial.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

/// Rasterizer backed by a TrueType/OpenType face
pub struct GlyphRasterizer {
    font: FontVec,
}

impl GlyphRasterizer {
    /// Parse a font from raw file bytes
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font =
            FontVec::try_from_vec(data).map_err(|e| CoreError::FontUnavailable(e.to_string()))?;
        Ok(Self { font })
    }

    /// Load a font file from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }
}

impl TextRasterizer for GlyphRasterizer {
    fn measure(&self, text: &str, size: f32) -> u32 {
        imageproc::drawing::text_size(PxScale::from(size), &self.font, text).0
    }

    fn draw(&self, canvas: &mut RgbImage, text: &str, x: i32, y: i32, size: f32, color: Rgb<u8>) {
        imageproc::drawing::draw_text_mut(canvas, color, x, y, PxScale::from(size), &self.font, text);
    }
}

/// Built-in block face with fixed advances
///
/// Every character advances by `0.6 * size`; printable characters are drawn
/// as solid cells. Metrics depend on nothing but the text, which keeps
/// layout reproducible on hosts without any installed font.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceRasterizer;

impl MonospaceRasterizer {
    pub fn advance(size: f32) -> u32 {
        (size * 0.6).round().max(1.0) as u32
    }
}

impl TextRasterizer for MonospaceRasterizer {
    fn measure(&self, text: &str, size: f32) -> u32 {
        text.chars().count() as u32 * Self::advance(size)
    }

    fn draw(&self, canvas: &mut RgbImage, text: &str, x: i32, y: i32, size: f32, color: Rgb<u8>) {
        let advance = Self::advance(size) as i32;
        let cell_w = (advance * 3 / 4).max(1) as u32;
        let cell_h = (size * 0.7).round().max(1.0) as u32;
        let top = y + (size * 0.2).round() as i32;

        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                continue;
            }
            let left = x + i as i32 * advance + advance / 8;
            fill_rect(canvas, left, top, cell_w, cell_h, color);
        }
    }
}

/// Resolved text rasterizer plus size policy
pub struct FontResolver {
    inner: Box<dyn TextRasterizer>,
    scale: f32,
    min_size: f32,
    source: Option<PathBuf>,
}

impl FontResolver {
    /// Resolve fonts, falling back to the built-in block face
    ///
    /// The explicit `path` is tried first, then each candidate in order.
    pub fn from_config(config: &FontConfig) -> Self {
        match Self::strict(config) {
            Ok(resolver) => resolver,
            Err(e) => {
                log::warn!("{e}; using built-in block face");
                Self::with_rasterizer(Box::new(MonospaceRasterizer), config)
            }
        }
    }

    /// Resolve fonts, failing when no configured face can be loaded
    pub fn strict(config: &FontConfig) -> Result<Self> {
        let candidates = config.path.iter().chain(config.candidates.iter());

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match GlyphRasterizer::from_file(path) {
                Ok(rasterizer) => {
                    log::debug!("using font {}", path.display());
                    let mut resolver = Self::with_rasterizer(Box::new(rasterizer), config);
                    resolver.source = Some(path.clone());
                    return Ok(resolver);
                }
                Err(e) => log::debug!("skipping font {}: {e}", path.display()),
            }
        }

        Err(CoreError::FontUnavailable(
            "no configured font could be loaded".to_string(),
        ))
    }

    /// Wrap an existing rasterizer with the size policy of `config`
    pub fn with_rasterizer(inner: Box<dyn TextRasterizer>, config: &FontConfig) -> Self {
        Self {
            inner,
            scale: config.scale,
            min_size: config.min_size,
            source: None,
        }
    }

    /// Font file in use, `None` for the built-in face
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Size actually handed to the rasterizer for a requested size
    pub fn effective_size(&self, size: f32) -> f32 {
        (size * self.scale).max(self.min_size)
    }
}

impl TextRasterizer for FontResolver {
    fn measure(&self, text: &str, size: f32) -> u32 {
        self.inner.measure(text, self.effective_size(size))
    }

    fn draw(&self, canvas: &mut RgbImage, text: &str, x: i32, y: i32, size: f32, color: Rgb<u8>) {
        self.inner
            .draw(canvas, text, x, y, self.effective_size(size), color);
    }
}
