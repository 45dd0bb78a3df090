//! Spreadsheet reading and the Round21 row rules

use super::CellGrid;
use crate::schema::{title_from_sku, Field, HotMarketFields, ROUND21, ROUND21_SENTINEL};
use crate::{LabelError, LabelRecord, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

/// Read the first sheet of a spreadsheet into a cell grid
///
/// CSV input has no header row and may be ragged. Workbooks are read at
/// absolute cell coordinates, so leading empty rows and columns are kept.
pub fn read_grid(bytes: &[u8], extension: &str) -> Result<CellGrid> {
    match extension.to_ascii_lowercase().as_str() {
        "csv" => read_csv(bytes),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(bytes),
        other => Err(LabelError::MalformedInput(format!(
            "unsupported spreadsheet type '{other}'"
        ))),
    }
}

fn read_csv(bytes: &[u8]) -> Result<CellGrid> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(bytes);

    let rows = reader
        .records()
        .map(|result| {
            result
                .map(|record| {
                    record
                        .iter()
                        .map(|cell| Some(cell.to_string()).filter(|c| !c.trim().is_empty()))
                        .collect()
                })
                .map_err(|e| LabelError::MalformedInput(format!("failed to read CSV record: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CellGrid::new(rows))
}

fn read_workbook(bytes: &[u8]) -> Result<CellGrid> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| LabelError::MalformedInput(format!("failed to open workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LabelError::MalformedInput("no sheets found in workbook".to_string()))?
        .map_err(|e| LabelError::MalformedInput(format!("failed to read first sheet: {e}")))?;

    let Some((last_row, last_col)) = range.end() else {
        return Ok(CellGrid::default());
    };

    let rows = (0..=last_row)
        .map(|r| {
            (0..=last_col)
                .map(|c| range.get_value((r, c)).and_then(cell_text))
                .collect()
        })
        .collect();

    Ok(CellGrid::new(rows))
}

/// Cell text as it should appear on a label
///
/// Integral floats lose their fractional part so numeric UPC cells keep
/// exactly their digits.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some(format!("{f:.0}")),
        other => Some(other.to_string()),
    }
}

/// Apply the Round21 rules to a grid
///
/// Rows before the first data row are ignored. Extraction stops at the
/// first row whose column A reads `Customer PO`. Rows without a SKU or UPC
/// are skipped; a missing title is built from the SKU.
pub fn parse_round21(grid: &CellGrid) -> Vec<LabelRecord> {
    let schema = &ROUND21;
    let cell = |row: usize, field: Field| -> String {
        schema
            .column(field)
            .map(|col| grid.text(row, col))
            .unwrap_or_default()
    };

    let mut records = Vec::new();
    for r in schema.first_data_row..grid.row_count() {
        let sku = cell(r, Field::Sku);
        if sku.eq_ignore_ascii_case(ROUND21_SENTINEL) {
            log::debug!("row {}: end-of-data sentinel", r + 1);
            break;
        }

        let upc = cell(r, Field::Upc);
        if sku.is_empty() || upc.is_empty() {
            log::debug!("row {}: skipped, missing SKU or UPC", r + 1);
            continue;
        }

        let mut title = cell(r, Field::Title);
        if title.is_empty() {
            title = cell(r, Field::TitleFallback);
        }
        if title.is_empty() {
            title = title_from_sku(&sku);
        }

        let price = Some(cell(r, Field::Price)).filter(|p| !p.is_empty());

        records.push(LabelRecord {
            row: r + 1,
            payload: upc,
            title,
            color: cell(r, Field::Color),
            price,
            hot_market: Some(HotMarketFields {
                j: cell(r, Field::HotMarketJ),
                c: cell(r, Field::HotMarketC),
                b: cell(r, Field::HotMarketB),
                a: cell(r, Field::HotMarketA),
                e: cell(r, Field::HotMarketE),
            }),
            sku,
            ..LabelRecord::default()
        });
    }

    records
}
