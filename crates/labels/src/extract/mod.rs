//! Record extraction
//!
//! Each source format reads its input into rows of optional cells and then
//! applies its [`ColumnSchema`](crate::ColumnSchema) to produce
//! [`LabelRecord`]s.

mod pdf_table;
mod spreadsheet;

pub use pdf_table::{parse_hunter_harms, RuledTableExtractor, Table, TableExtractor};
pub use spreadsheet::{parse_round21, read_grid};

use crate::{LabelError, LabelRecord, Result, SourceFormat};
use std::path::Path;

/// Rows of optional cell text; a missing or blank cell is `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellGrid {
    rows: Vec<Vec<Option<String>>>,
}

impl CellGrid {
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Trimmed text of a cell, `None` when missing or blank
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)?
            .get(col)?
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Trimmed text of a cell, empty when missing
    pub fn text(&self, row: usize, col: usize) -> String {
        self.get(row, col).unwrap_or_default().to_string()
    }
}

impl From<Vec<Vec<Option<String>>>> for CellGrid {
    fn from(rows: Vec<Vec<Option<String>>>) -> Self {
        Self::new(rows)
    }
}

/// Read records from a file, picking the reader from the file extension
pub fn extract_records<P: AsRef<Path>>(path: P, format: SourceFormat) -> Result<Vec<LabelRecord>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        LabelError::MalformedInput(format!("cannot read {}: {e}", path.display()))
    })?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    extract_records_from_bytes(&bytes, extension, format)
}

/// Read records from in-memory input
///
/// `extension` selects the spreadsheet reader (`csv`, `xlsx`, `xlsm`, `xls`,
/// `xlsb`, `ods`) and is ignored for PDF input.
pub fn extract_records_from_bytes(
    bytes: &[u8],
    extension: &str,
    format: SourceFormat,
) -> Result<Vec<LabelRecord>> {
    let records = match format {
        SourceFormat::Round21 => parse_round21(&read_grid(bytes, extension)?),
        SourceFormat::HunterHarms => parse_hunter_harms(bytes, &RuledTableExtractor::default())?,
    };
    log::info!(
        "extracted {} records with the {} schema",
        records.len(),
        format.schema().name
    );
    Ok(records)
}
