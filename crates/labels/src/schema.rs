//! Record model, column schemas and format/variant tags

use crate::{LabelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic field read from a source column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Sku,
    Title,
    /// Read when `Title` is blank
    TitleFallback,
    Color,
    Upc,
    Price,
    HotMarketJ,
    HotMarketC,
    HotMarketB,
    HotMarketA,
    HotMarketE,
}

/// Named mapping from semantic fields to 0-indexed source columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: &'static str,
    pub columns: &'static [(Field, usize)],
    /// 0-indexed row of the first data row
    pub first_data_row: usize,
    /// Rows shorter than this are skipped
    pub min_columns: usize,
}

impl ColumnSchema {
    /// Column a field is read from
    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, col)| *col)
    }

    /// Pairs of distinct fields that read the same column
    pub fn aliased_fields(&self) -> Vec<(Field, Field)> {
        let mut pairs = Vec::new();
        for (i, (a, col_a)) in self.columns.iter().enumerate() {
            for (b, col_b) in &self.columns[i + 1..] {
                if col_a == col_b {
                    pairs.push((*a, *b));
                }
            }
        }
        pairs
    }
}

/// Round21 order sheet
///
/// Color and UPC both read column I. The hot-market fields deliberately
/// reuse columns A, B and C.
pub const ROUND21: ColumnSchema = ColumnSchema {
    name: "round21",
    columns: &[
        (Field::Sku, 0),
        (Field::Title, 2),
        (Field::TitleFallback, 1),
        (Field::Color, 8),
        (Field::Upc, 8),
        (Field::Price, 10),
        (Field::HotMarketJ, 9),
        (Field::HotMarketC, 2),
        (Field::HotMarketB, 1),
        (Field::HotMarketA, 0),
        (Field::HotMarketE, 4),
    ],
    first_data_row: 11,
    min_columns: 0,
};

/// Column-A value that ends a Round21 sheet, compared case-insensitively
pub const ROUND21_SENTINEL: &str = "CUSTOMER PO";

/// Hunter Harms PDF order table
///
/// The SKU cell may hold several SKUs separated by line breaks.
pub const HUNTER_HARMS: ColumnSchema = ColumnSchema {
    name: "hunter_harms",
    columns: &[(Field::Title, 0), (Field::Sku, 3), (Field::Color, 5)],
    first_data_row: 1,
    min_columns: 13,
};

/// Size-quantity columns of the Hunter Harms table
pub const HUNTER_HARMS_SIZES: [(&str, usize); 6] = [
    ("S", 6),
    ("M", 7),
    ("L", 8),
    ("XL", 9),
    ("2XL", 10),
    ("3XL", 11),
];

/// Size used when it cannot be derived from the SKU
pub const UNKNOWN_SIZE: &str = "UNKNOWN";

/// Supported input layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Spreadsheet with UPC-A codes
    Round21,
    /// PDF order table with Code 128 SKUs
    HunterHarms,
}

impl SourceFormat {
    pub fn tag(&self) -> &'static str {
        match self {
            SourceFormat::Round21 => "round21",
            SourceFormat::HunterHarms => "hunter_harms",
        }
    }

    pub fn schema(&self) -> &'static ColumnSchema {
        match self {
            SourceFormat::Round21 => &ROUND21,
            SourceFormat::HunterHarms => &HUNTER_HARMS,
        }
    }
}

impl FromStr for SourceFormat {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "round21" => Ok(SourceFormat::Round21),
            "hunter_harms" => Ok(SourceFormat::HunterHarms),
            _ => Err(LabelError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Label layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Title, SKU and color, UPC-A, digits, optional price
    Standard,
    /// Three text rows, UPC-A, digits
    HotMarket,
    /// Title, Code 128, SKU, size
    AltSku,
}

impl Variant {
    /// Layout used for records of `format`
    pub fn select(format: SourceFormat, hot_market: bool) -> Self {
        match (format, hot_market) {
            (SourceFormat::HunterHarms, _) => Variant::AltSku,
            (SourceFormat::Round21, true) => Variant::HotMarket,
            (SourceFormat::Round21, false) => Variant::Standard,
        }
    }
}

/// Per-run rendering switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelOptions {
    /// Draw the price row on standard labels when the record has a price
    pub include_price: bool,
    /// Render spreadsheet records with the hot-market layout
    pub hot_market: bool,
}

/// Text fields shown on hot-market labels, named after their source columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotMarketFields {
    pub j: String,
    pub c: String,
    pub b: String,
    pub a: String,
    pub e: String,
}

impl HotMarketFields {
    /// Third row text: `A-E` when both are present, otherwise whichever is
    pub fn row3(&self) -> String {
        let a = self.a.trim().to_uppercase();
        let e = self.e.trim().to_uppercase();
        match (a.is_empty(), e.is_empty()) {
            (false, false) => format!("{a}-{e}"),
            (false, true) => a,
            _ => e,
        }
    }
}

/// Ordered quantity for one size column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeQuantity {
    pub label: String,
    pub quantity: Option<u32>,
}

/// One label's worth of data, independent of the source layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    /// 1-indexed source row
    pub row: usize,
    pub sku: String,
    /// Encoded by the barcode: UPC digits or the SKU itself
    pub payload: String,
    pub title: String,
    pub color: String,
    pub price: Option<String>,
    pub size: Option<String>,
    pub hot_market: Option<HotMarketFields>,
    pub size_quantities: Vec<SizeQuantity>,
}

/// Size token of a SKU: second-to-last hyphen part when there are at least four
pub fn size_from_sku(sku: &str) -> String {
    let parts: Vec<&str> = sku.split('-').collect();
    if parts.len() >= 4 {
        parts[parts.len() - 2].to_string()
    } else {
        UNKNOWN_SIZE.to_string()
    }
}

/// Title built from the first three hyphen parts of a SKU, upper-cased
pub fn title_from_sku(sku: &str) -> String {
    sku.split('-')
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
