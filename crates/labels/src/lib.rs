//! Labels - product records to printable labels
//!
//! This crate provides:
//! - Named column schemas for each supported source layout
//! - Record extraction from spreadsheets (CSV, XLSX, XLS, ODS) and PDF tables
//! - Label rendering for the standard, hot-market and alt-SKU variants
//! - Bundle assembly: PNG files, one multi-page PDF and a ZIP archive
//!
//! # Example
//!
//! ```ignore
//! use label_core::FontResolver;
//! use labels::{generate_labels_bundle, LabelConfig, LabelOptions, SourceFormat};
//!
//! let config = LabelConfig::default();
//! let fonts = FontResolver::from_config(&config.font);
//! let options = LabelOptions { include_price: true, hot_market: false };
//! let output = generate_labels_bundle(
//!     "order.xlsx",
//!     SourceFormat::Round21,
//!     &options,
//!     "out",
//!     &config,
//!     &fonts,
//! )?;
//! println!("{} labels in {}", output.record_count, output.pdf_path.display());
//! ```

mod bundle;
mod config;
pub mod extract;
pub mod renderer;
mod schema;

pub use bundle::{
    assemble_bundle, bundle_records, file_stem, generate_labels_bundle, BundleOutput, PDF_NAME,
    PNG_DIR, ZIP_NAME,
};
pub use config::{CanvasSpec, LabelConfig, Margins};
pub use extract::{extract_records, extract_records_from_bytes};
pub use renderer::render;
pub use schema::*;

use label_core::CoreError;
use thiserror::Error;

/// Errors that can occur while extracting, rendering or bundling labels
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid barcode input: {0}")]
    InvalidBarcodeInput(String),

    #[error(transparent)]
    Core(CoreError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    ArchiveError(String),
}

impl From<CoreError> for LabelError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidBarcodeInput(msg) => LabelError::InvalidBarcodeInput(msg),
            CoreError::IoError(e) => LabelError::IoError(e),
            other => LabelError::Core(other),
        }
    }
}

impl From<zip::result::ZipError> for LabelError {
    fn from(err: zip::result::ZipError) -> Self {
        LabelError::ArchiveError(err.to_string())
    }
}

/// Result type for label operations
pub type Result<T> = std::result::Result<T, LabelError>;
