//! Label Core - barcode encoding and raster primitives
//!
//! This crate provides functionality for:
//! - UPC-A check digits, normalization and 95-module bar patterns
//! - Code 128 (set B) encoding and raster rendering with a placeholder fallback
//! - Measuring and drawing text through an explicit rasterizer capability
//! - Greedy word wrapping with a deterministic rebalancing fallback
//! - Bar geometry for fixed-size label canvases
//! - Writing rendered labels into a single multi-page PDF
//!
//! # Example
//!
//! ```ignore
//! use label_core::{upc, FontConfig, FontResolver};
//!
//! let code = upc::normalize("03600029145")?;
//! let pattern = upc::encode(&code);
//! assert_eq!(pattern.len(), 95);
//!
//! let fonts = FontResolver::from_config(&FontConfig::default());
//! let width = fonts.measure(code.as_str(), 75.0);
//! ```

pub mod code128;
mod document;
mod font;
pub mod geometry;
mod raster;
pub mod text;
pub mod upc;

pub use document::{write_bundle, LabelDocument, PLACEHOLDER_TEXT};
pub use font::{FontConfig, FontResolver, GlyphRasterizer, MonospaceRasterizer, TextRasterizer};
pub use geometry::BarGeometry;
pub use raster::{
    blank_canvas, encode_png, fill_rect, scale_to_width, ImageXObject, BLACK, RED, WHITE,
};
pub use text::{draw_aligned, wrap_greedy};
pub use upc::{BarPattern, UpcCode};

use thiserror::Error;

/// Errors that can occur while encoding or rendering labels
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid barcode input: {0}")]
    InvalidBarcodeInput(String),

    #[error("Code 128 encoding failed: {0}")]
    Code128(String),

    #[error("Font unavailable: {0}")]
    FontUnavailable(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF error: {0}")]
    PdfError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for label core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Horizontal text alignment inside a bounding box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}
