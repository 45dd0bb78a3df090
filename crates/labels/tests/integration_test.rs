//! End-to-end tests: input files to label bundles

use label_core::MonospaceRasterizer;
use labels::{
    extract_records_from_bytes, generate_labels_bundle, LabelConfig, LabelError, LabelOptions,
    SizeQuantity, SourceFormat,
};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pretty_assertions::assert_eq;
use std::path::Path;

/// Eleven header lines followed by `data` lines
fn round21_csv(data: &[&str]) -> String {
    let mut lines: Vec<String> = (1..=11).map(|i| format!("Order header {i},,,,,,,,,,")).collect();
    lines.extend(data.iter().map(|s| s.to_string()));
    lines.join("\n")
}

fn write_input(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

const PAGE_WIDTH: f32 = 1100.0;

/// Single-page PDF stroking each ruling line, then showing each
/// `(x, y, text)` with its own text matrix
fn pdf_with_table(rules: &[(f32, f32, f32, f32)], fragments: &[(f32, f32, &str)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = vec![Operation::new("w", vec![0.5_f32.into()])];
    for (x0, y0, x1, y1) in rules {
        operations.push(Operation::new("m", vec![(*x0).into(), (*y0).into()]));
        operations.push(Operation::new("l", vec![(*x1).into(), (*y1).into()]));
        operations.push(Operation::new("S", vec![]));
    }

    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new("Tf", vec!["F1".into(), 6.into()]));
    for (x, y, text) in fragments {
        operations.push(Operation::new(
            "Tm",
            vec![1.into(), 0.into(), 0.into(), 1.into(), (*x).into(), (*y).into()],
        ));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), 792.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn col(i: usize) -> f32 {
    20.0 + 80.0 * i as f32
}

/// Ruling lines of a 13-column grid with rows between the given edges
fn grid(row_edges: &[f32]) -> Vec<(f32, f32, f32, f32)> {
    let left = col(0) - 5.0;
    let right = col(13) - 5.0;
    let (top, bottom) = (row_edges[0], row_edges[row_edges.len() - 1]);

    let mut rules: Vec<_> = (0..=13)
        .map(|i| (col(i) - 5.0, top, col(i) - 5.0, bottom))
        .collect();
    rules.extend(row_edges.iter().map(|y| (left, *y, right, *y)));
    rules
}

/// A Hunter Harms order: header, one row with two SKUs, then a row with no title
fn hunter_harms_pdf() -> Vec<u8> {
    let header = [
        "Style", "Desc", "Line", "SKU", "Fit", "Color", "S", "M", "L", "XL", "2XL", "3XL", "Total",
    ];
    let mut fragments: Vec<(f32, f32, &str)> = header
        .iter()
        .enumerate()
        .map(|(i, h)| (col(i), 700.0, *h))
        .collect();

    fragments.extend([
        (col(0), 670.0, "Club Tee"),
        (col(3), 670.0, "CLUB-TS-BN-S-11"),
        (col(3), 658.0, "CLUB-TS-BN-M-11"),
        (col(5), 670.0, "Brown"),
        (col(6), 670.0, "4"),
        (col(7), 670.0, "2"),
        (col(12), 670.0, "6"),
    ]);

    // No title: the table ends here
    fragments.extend([
        (col(3), 638.0, "CLUB-TS-RD-L-11"),
        (col(5), 638.0, "Red"),
    ]);

    pdf_with_table(&grid(&[712.0, 692.0, 650.0, 628.0]), &fragments)
}

/// Spreadsheet `(column letter, text)` cell; digit-only text is stored as a number
type XlsxCell<'a> = (&'a str, &'a str);

/// Minimal one-sheet workbook with cells at their 1-based rows
fn xlsx_workbook(rows: &[(usize, Vec<XlsxCell>)]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let mut sheet_rows = String::new();
    for (row, cells) in rows {
        sheet_rows.push_str(&format!("<row r=\"{row}\">"));
        for (column, text) in cells {
            if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit() || c == '.') {
                sheet_rows.push_str(&format!("<c r=\"{column}{row}\"><v>{text}</v></c>"));
            } else {
                sheet_rows.push_str(&format!(
                    "<c r=\"{column}{row}\" t=\"inlineStr\"><is><t>{text}</t></is></c>"
                ));
            }
        }
        sheet_rows.push_str("</row>");
    }

    let parts = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#
                .to_string(),
        ),
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
                .to_string(),
        ),
        (
            "xl/workbook.xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Order" sheetId="1" r:id="rId1"/></sheets></workbook>"#
                .to_string(),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#
                .to_string(),
        ),
        (
            "xl/worksheets/sheet1.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{sheet_rows}</sheetData></worksheet>"#
            ),
        ),
    ];

    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, body) in parts {
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(body.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

#[test]
fn test_round21_standard_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let csv = round21_csv(&[
        "RD-TEE-BLK-M,Tee,Classic Tee,,Navy,,,,03600029145,Hot,$19.99",
        "RD-TEE-BLK-L,Tee,Classic Tee,,Navy,,,,036000291452,Hot,$21.99",
        "Customer PO,,,,,,,,",
        "RD-IGNORED,Tee,Ignored,,,,,,12345678901",
    ]);
    let input = write_input(dir.path(), "order.csv", csv.as_bytes());
    let out = dir.path().join("out");

    let options = LabelOptions {
        include_price: true,
        hot_market: false,
    };
    let output = generate_labels_bundle(
        &input,
        SourceFormat::Round21,
        &options,
        &out,
        &LabelConfig::default(),
        &MonospaceRasterizer,
    )
    .unwrap();

    assert_eq!(output.record_count, 2);
    assert_eq!(
        output.png_paths,
        vec![
            out.join("png/RD-TEE-BLK-M.png"),
            out.join("png/RD-TEE-BLK-L.png")
        ]
    );
    for path in &output.png_paths {
        let img = image::open(path).unwrap();
        assert_eq!((img.width(), img.height()), (1400, 900));
    }

    let pdf = Document::load(&output.pdf_path).unwrap();
    assert_eq!(pdf.get_pages().len(), 2);
    assert!(output.zip_path.exists());
}

#[test]
fn test_round21_workbook_records() {
    let mut rows: Vec<(usize, Vec<XlsxCell>)> = (4..=11)
        .map(|r| (r, vec![("A", "Order header")]))
        .collect();
    rows.extend([
        (
            12,
            vec![
                ("A", "RD-TEE-NVY-M"),
                ("B", "Tee"),
                ("C", "Classic Tee"),
                ("I", "36000291452"),
                ("K", "$19.99"),
            ],
        ),
        (13, vec![("A", "RD-TEE-NVY-L"), ("B", "Tee"), ("I", "360002914520.0")]),
        (14, vec![("A", "Customer PO")]),
        (15, vec![("A", "RD-AFTER"), ("I", "12345678901")]),
    ]);

    let records =
        extract_records_from_bytes(&xlsx_workbook(&rows), "xlsx", SourceFormat::Round21).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].row, 12);
    assert_eq!(records[0].sku, "RD-TEE-NVY-M");
    assert_eq!(records[0].payload, "36000291452");
    assert_eq!(records[0].title, "Classic Tee");
    assert_eq!(records[0].color, "36000291452");
    assert_eq!(records[0].price.as_deref(), Some("$19.99"));

    assert_eq!(records[1].row, 13);
    assert_eq!(records[1].payload, "360002914520");
    assert_eq!(records[1].title, "Tee");
    assert_eq!(records[1].price, None);
}

#[test]
fn test_round21_hot_market_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let csv = round21_csv(&[
        "RD-HOT-1,Super long hot market description that needs wrapping onto several lines,Title,,Red,,,,03600029145,Deal",
    ]);
    let input = write_input(dir.path(), "hot.csv", csv.as_bytes());

    let options = LabelOptions {
        include_price: false,
        hot_market: true,
    };
    let output = generate_labels_bundle(
        &input,
        SourceFormat::Round21,
        &options,
        dir.path().join("out"),
        &LabelConfig::default(),
        &MonospaceRasterizer,
    )
    .unwrap();

    assert_eq!(output.record_count, 1);
    assert_eq!(output.png_paths.len(), 1);
    assert!(output.png_paths[0].ends_with("RD-HOT-1.png"));
}

#[test]
fn test_round21_invalid_upc_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let csv = round21_csv(&["RD-1,,Title,,,,,,0360002914"]);
    let input = write_input(dir.path(), "bad.csv", csv.as_bytes());
    let out = dir.path().join("out");

    let err = generate_labels_bundle(
        &input,
        SourceFormat::Round21,
        &LabelOptions::default(),
        &out,
        &LabelConfig::default(),
        &MonospaceRasterizer,
    )
    .unwrap_err();

    assert!(matches!(err, LabelError::InvalidBarcodeInput(_)));
    assert!(!out.join("labels_bundle.pdf").exists());
}

#[test]
fn test_empty_input_gives_placeholder_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "empty.csv", round21_csv(&[]).as_bytes());

    let output = generate_labels_bundle(
        &input,
        SourceFormat::Round21,
        &LabelOptions::default(),
        dir.path().join("out"),
        &LabelConfig::default(),
        &MonospaceRasterizer,
    )
    .unwrap();

    assert_eq!(output.record_count, 0);
    assert!(output.png_paths.is_empty());
    let pdf = Document::load(&output.pdf_path).unwrap();
    assert_eq!(pdf.get_pages().len(), 1);
}

#[test]
fn test_hunter_harms_pdf_records() {
    let records =
        extract_records_from_bytes(&hunter_harms_pdf(), "pdf", SourceFormat::HunterHarms).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].sku, "CLUB-TS-BN-S-11");
    assert_eq!(records[0].payload, "CLUB-TS-BN-S-11");
    assert_eq!(records[0].title, "Club Tee - Brown");
    assert_eq!(records[0].size.as_deref(), Some("S"));
    assert_eq!(records[0].row, 2);
    assert_eq!(records[1].sku, "CLUB-TS-BN-M-11");
    assert_eq!(records[1].size.as_deref(), Some("M"));

    assert_eq!(
        records[0].size_quantities[..2],
        [
            SizeQuantity {
                label: "S".to_string(),
                quantity: Some(4)
            },
            SizeQuantity {
                label: "M".to_string(),
                quantity: Some(2)
            },
        ]
    );
    assert_eq!(records[0].size_quantities[2].quantity, None);
}

#[test]
fn test_hunter_harms_alt_sku_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "order.pdf", &hunter_harms_pdf());
    let out = dir.path().join("out");

    let output = generate_labels_bundle(
        &input,
        SourceFormat::HunterHarms,
        &LabelOptions::default(),
        &out,
        &LabelConfig::default(),
        &MonospaceRasterizer,
    )
    .unwrap();

    assert_eq!(
        output.png_paths,
        vec![
            out.join("png/CLUB-TS-BN-S-11_S.png"),
            out.join("png/CLUB-TS-BN-M-11_M.png")
        ]
    );
    let pdf = Document::load(&output.pdf_path).unwrap();
    assert_eq!(pdf.get_pages().len(), 2);
}

#[test]
fn test_malformed_pdf() {
    let err = extract_records_from_bytes(b"%PDF-garbage", "pdf", SourceFormat::HunterHarms)
        .unwrap_err();
    assert!(matches!(err, LabelError::MalformedInput(_)));
}

#[test]
fn test_unsupported_format_tag() {
    let err = "acme".parse::<SourceFormat>().unwrap_err();
    assert!(matches!(err, LabelError::UnsupportedFormat(_)));
    assert_eq!(
        " Hunter_Harms ".parse::<SourceFormat>().unwrap(),
        SourceFormat::HunterHarms
    );
}
