//! PDF table extraction and the Hunter Harms row rules

use crate::schema::{size_from_sku, SizeQuantity, HUNTER_HARMS, HUNTER_HARMS_SIZES};
use crate::{Field, LabelError, LabelRecord, Result};
use bolivar_core::document::PDFDocument;
use bolivar_core::high_level::{extract_tables_with_document, ExtractOptions};
use bolivar_core::table::TableSettings;

/// Rows of optional cell text
pub type Table = Vec<Vec<Option<String>>>;

/// Capability to find tables in a PDF
pub trait TableExtractor {
    /// Tables of every page, in page order
    fn page_tables(&self, pdf: &[u8]) -> Result<Vec<Vec<Table>>>;
}

/// Table extractor for ruled tables
///
/// Cells are bounded by the drawn table lines. Text inside a cell keeps its
/// line breaks, so a cell listing several SKUs yields one SKU per line.
#[derive(Debug, Clone, Default)]
pub struct RuledTableExtractor {
    pub settings: TableSettings,
}

impl TableExtractor for RuledTableExtractor {
    fn page_tables(&self, pdf: &[u8]) -> Result<Vec<Vec<Table>>> {
        let doc = PDFDocument::new(pdf, "")
            .map_err(|e| LabelError::MalformedInput(format!("failed to open PDF: {e}")))?;

        let pages = extract_tables_with_document(&doc, ExtractOptions::default(), &self.settings)
            .map_err(|e| LabelError::MalformedInput(format!("failed to read PDF tables: {e}")))?;

        for (page_no, tables) in pages.iter().enumerate() {
            log::debug!("page {}: {} table(s)", page_no + 1, tables.len());
        }
        Ok(pages)
    }
}

/// Apply the Hunter Harms rules to the first table of every page
///
/// The header row is skipped and rows with fewer than 13 cells are ignored.
/// An empty title ends the page's table; a row without SKUs is skipped.
/// Every SKU of a multi-SKU cell becomes its own record. Title and color
/// cells that wrap inside their cell are joined into one line.
pub fn parse_hunter_harms(pdf: &[u8], extractor: &dyn TableExtractor) -> Result<Vec<LabelRecord>> {
    let schema = &HUNTER_HARMS;
    let column = |field: Field| schema.column(field).unwrap_or(usize::MAX);
    let (title_col, sku_col, color_col) = (
        column(Field::Title),
        column(Field::Sku),
        column(Field::Color),
    );

    let mut records = Vec::new();
    for (page, tables) in extractor.page_tables(pdf)?.into_iter().enumerate() {
        let Some(table) = tables.into_iter().next() else {
            continue;
        };

        for (row_no, row) in table.iter().enumerate().skip(schema.first_data_row) {
            if row.len() < schema.min_columns {
                continue;
            }
            let cell = |col: usize| -> String {
                row.get(col)
                    .and_then(|c| c.as_deref())
                    .map(str::trim)
                    .unwrap_or_default()
                    .to_string()
            };

            let title = single_line(&cell(title_col));
            if title.is_empty() {
                log::debug!("page {}: table ends at row {}", page + 1, row_no + 1);
                break;
            }
            let skus_text = cell(sku_col);
            if skus_text.is_empty() {
                continue;
            }
            let color = single_line(&cell(color_col));

            let size_quantities: Vec<SizeQuantity> = HUNTER_HARMS_SIZES
                .iter()
                .map(|(label, col)| SizeQuantity {
                    label: label.to_string(),
                    quantity: cell(*col).parse().ok(),
                })
                .collect();

            for sku in skus_text.lines().map(str::trim).filter(|s| !s.is_empty()) {
                records.push(LabelRecord {
                    row: row_no + 1,
                    sku: sku.to_string(),
                    payload: sku.to_string(),
                    title: format!("{title} - {color}"),
                    color: color.clone(),
                    size: Some(size_from_sku(sku)),
                    size_quantities: size_quantities.clone(),
                    ..LabelRecord::default()
                });
            }
        }
    }

    Ok(records)
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FixedTables(Vec<Vec<Table>>);

    impl TableExtractor for FixedTables {
        fn page_tables(&self, _pdf: &[u8]) -> Result<Vec<Vec<Table>>> {
            Ok(self.0.clone())
        }
    }

    fn row(cells: &[&str]) -> Vec<Option<String>> {
        cells
            .iter()
            .map(|c| Some(c.to_string()).filter(|c| !c.is_empty()))
            .collect()
    }

    fn data_row(title: &str, skus: &str, color: &str) -> Vec<Option<String>> {
        row(&[
            title, "", "", skus, "", color, "2", "", "1", "", "", "", "",
        ])
    }

    fn header() -> Vec<Option<String>> {
        row(&[
            "Title", "Style", "Desc", "SKU", "Ref", "Color", "S", "M", "L", "XL", "2XL", "3XL",
            "Total",
        ])
    }

    #[test]
    fn test_multi_sku_fan_out() {
        let extractor = FixedTables(vec![vec![vec![
            header(),
            data_row("Club Tee", "CLUB-TS-BN-S-11\nCLUB-TS-BN-M-11\n", "Brown"),
        ]]]);

        let records = parse_hunter_harms(b"", &extractor).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sku, "CLUB-TS-BN-S-11");
        assert_eq!(records[0].payload, "CLUB-TS-BN-S-11");
        assert_eq!(records[0].title, "Club Tee - Brown");
        assert_eq!(records[0].size.as_deref(), Some("S"));
        assert_eq!(records[1].size.as_deref(), Some("M"));
        assert_eq!(records[0].row, 2);
        assert_eq!(records[0].size_quantities[0].quantity, Some(2));
        assert_eq!(records[0].size_quantities[1].quantity, None);
        assert_eq!(records[0].size_quantities[2].label, "L");
    }

    #[test]
    fn test_empty_title_halts_page() {
        let extractor = FixedTables(vec![
            vec![vec![
                header(),
                data_row("A", "A-B-C-S-1", "Red"),
                data_row("", "IGNORED-1", "Red"),
                data_row("B", "A-B-C-M-1", "Red"),
            ]],
            vec![vec![header(), data_row("C", "X-Y", "Blue")]],
        ]);

        let records = parse_hunter_harms(b"", &extractor).unwrap();
        let skus: Vec<&str> = records.iter().map(|r| r.sku.as_str()).collect();
        assert_eq!(skus, vec!["A-B-C-S-1", "X-Y"]);
        assert_eq!(records[1].size.as_deref(), Some("UNKNOWN"));
    }

    #[test]
    fn test_short_rows_and_missing_skus_skipped() {
        let extractor = FixedTables(vec![vec![
            vec![
                header(),
                row(&["Short", "", "", "S-1"]),
                data_row("No SKU", "", "Red"),
                data_row("Kept", "K-1", "Red"),
            ],
            vec![header(), data_row("Second table", "IGNORED", "Red")],
        ]]);

        let records = parse_hunter_harms(b"", &extractor).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sku, "K-1");
        assert_eq!(records[0].row, 4);
    }

    #[test]
    fn test_wrapped_title_stays_with_its_row() {
        let extractor = FixedTables(vec![vec![vec![
            header(),
            data_row("Club Tee\nHeavyweight", "CLUB-TS-BN-S-11\nCLUB-TS-BN-M-11", "Dark\nBrown"),
        ]]]);

        let records = parse_hunter_harms(b"", &extractor).unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.title, "Club Tee Heavyweight - Dark Brown");
            assert_eq!(record.color, "Dark Brown");
            assert_eq!(record.row, 2);
        }
        assert_eq!(records[1].sku, "CLUB-TS-BN-M-11");
    }

    #[test]
    fn test_unparsable_pdf() {
        let err = RuledTableExtractor::default()
            .page_tables(b"not a pdf")
            .unwrap_err();
        assert!(matches!(err, LabelError::MalformedInput(_)));
    }
}
