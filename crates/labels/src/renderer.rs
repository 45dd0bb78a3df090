//! Label rendering
//!
//! Every variant draws onto a white canvas of the configured size. Rows are
//! placed top to bottom, each offset from the one above it.

use crate::{LabelConfig, LabelOptions, LabelRecord, Result, Variant};
use image::RgbImage;
use label_core::geometry::draw_bar_pattern;
use label_core::{
    blank_canvas, code128, draw_aligned, upc, wrap_greedy, Align, BarGeometry, TextRasterizer,
    BLACK,
};

/// Font sizes and offsets of the standard layout
mod standard {
    pub const TITLE_SIZE: f32 = 100.0;
    pub const LINE2_SIZE: f32 = 85.0;
    pub const DIGITS_SIZE: f32 = 75.0;
    pub const LINE2_OFFSET: i64 = 110;
    pub const BARS_OFFSET: i64 = 100;
    pub const BOTTOM_RESERVE: i64 = 220;
    pub const PRICE_OFFSET: i64 = 80;
}

/// Font sizes and offsets of the hot-market layout
mod hot_market {
    pub const ROW1_SIZE: f32 = 100.0;
    pub const ROW2_SIZE: f32 = 60.0;
    pub const ROW3_SIZE: f32 = 90.0;
    pub const DIGITS_SIZE: f32 = 80.0;
    pub const ROW2_OFFSET: i64 = 120;
    pub const ROW2_LINE_HEIGHT: i64 = 60;
    pub const ROW2_MAX_LINES: usize = 3;
    pub const ROW2_SIDE_MARGIN: u32 = 20;
    pub const ROW3_GAP: i64 = 20;
    pub const BARS_OFFSET: i64 = 120;
    pub const BOTTOM_RESERVE: i64 = 150;
}

/// Font sizes and offsets of the alt-SKU layout
mod alt_sku {
    pub const TITLE_SIZE: f32 = 100.0;
    pub const SKU_SIZE: f32 = 85.0;
    pub const SIZE_SIZE: f32 = 95.0;
    pub const BARCODE_WIDTH: u32 = 1200;
    pub const BARCODE_HEIGHT: u32 = 80;
    pub const BARCODE_OFFSET: i64 = 120;
    pub const SKU_GAP: i64 = 15;
    pub const SIZE_OFFSET: i64 = 90;
}

/// Space between the lowest bar and the digit line
const DIGITS_GAP: i64 = 10;

/// Render one record with the given layout
///
/// # Errors
/// `LabelError::InvalidBarcodeInput` when a UPC layout gets a payload that
/// is not 11 or 12 digits. Code 128 problems never fail a label.
pub fn render(
    record: &LabelRecord,
    variant: Variant,
    options: &LabelOptions,
    config: &LabelConfig,
    rasterizer: &dyn TextRasterizer,
) -> Result<RgbImage> {
    log::debug!("rendering {:?} label for {}", variant, record.sku);
    match variant {
        Variant::Standard => render_standard(record, options, config, rasterizer),
        Variant::HotMarket => render_hot_market(record, config, rasterizer),
        Variant::AltSku => Ok(render_alt_sku(record, config, rasterizer)),
    }
}

/// Canvas with its geometry, used by the row helpers below
struct Layout<'a> {
    canvas: RgbImage,
    width: i64,
    height: i64,
    margin: i64,
    fonts: &'a dyn TextRasterizer,
}

impl<'a> Layout<'a> {
    fn new(config: &LabelConfig, variant: Variant, fonts: &'a dyn TextRasterizer) -> Self {
        Self {
            canvas: blank_canvas(config.canvas.width, config.canvas.height),
            width: i64::from(config.canvas.width),
            height: i64::from(config.canvas.height),
            margin: i64::from(config.margin(variant)),
            fonts,
        }
    }

    fn centered(&mut self, text: &str, size: f32, y: i64) {
        draw_aligned(&mut self.canvas, self.fonts, text, size, Align::Center, 0, self.width, y, BLACK);
    }

    fn left(&mut self, text: &str, size: f32, y: i64) {
        let margin = self.margin;
        draw_aligned(&mut self.canvas, self.fonts, text, size, Align::Left, margin, 0, y, BLACK);
    }

    fn right(&mut self, text: &str, size: f32, y: i64) {
        let span = self.width - self.margin;
        draw_aligned(&mut self.canvas, self.fonts, text, size, Align::Right, 0, span, y, BLACK);
    }

    /// Draw UPC bars and the digit line below them
    fn upc_block(&mut self, code: &upc::UpcCode, top: i64, bottom: i64, digits_size: f32) -> i64 {
        let pattern = upc::encode(code);
        let geometry = BarGeometry::compute(pattern.len(), self.width as u32, self.margin as u32);
        let extra = draw_bar_pattern(&mut self.canvas, &pattern, &geometry, top, bottom);

        let digits_y = bottom.max(top) + extra + DIGITS_GAP;
        self.centered(&code.human_readable(), digits_size, digits_y);
        digits_y
    }
}

fn render_standard(
    record: &LabelRecord,
    options: &LabelOptions,
    config: &LabelConfig,
    fonts: &dyn TextRasterizer,
) -> Result<RgbImage> {
    use standard::*;

    let code = upc::normalize(&record.payload)?;
    let mut layout = Layout::new(config, Variant::Standard, fonts);

    let title_y = layout.margin;
    layout.centered(&record.title.trim().to_uppercase(), TITLE_SIZE, title_y);

    let line2_y = title_y + LINE2_OFFSET;
    layout.left(record.sku.trim(), LINE2_SIZE, line2_y);
    layout.right(&record.color.trim().to_uppercase(), LINE2_SIZE, line2_y);

    let bar_top = line2_y + BARS_OFFSET;
    let bar_bottom = layout.height - BOTTOM_RESERVE;
    let digits_y = layout.upc_block(&code, bar_top, bar_bottom, DIGITS_SIZE);

    let price = record.price.as_deref().map(str::trim).unwrap_or_default();
    if options.include_price && !price.is_empty() {
        layout.centered(price, DIGITS_SIZE, digits_y + PRICE_OFFSET);
    }

    Ok(layout.canvas)
}

fn render_hot_market(
    record: &LabelRecord,
    config: &LabelConfig,
    fonts: &dyn TextRasterizer,
) -> Result<RgbImage> {
    use hot_market::*;

    let code = upc::normalize(&record.payload)?;
    let fields = record.hot_market.clone().unwrap_or_default();
    let mut layout = Layout::new(config, Variant::HotMarket, fonts);

    let row1_y = layout.margin;
    layout.left(&fields.j.trim().to_uppercase(), ROW1_SIZE, row1_y);
    layout.right(&fields.c.trim().to_uppercase(), ROW1_SIZE, row1_y);

    let row2_y = row1_y + ROW2_OFFSET;
    let max_width = config.canvas.width.saturating_sub(2 * ROW2_SIDE_MARGIN);
    let lines = wrap_greedy(
        &fields.b.trim().to_uppercase(),
        fonts,
        ROW2_SIZE,
        max_width,
        ROW2_MAX_LINES,
    );
    for (i, line) in lines.iter().enumerate() {
        layout.centered(line, ROW2_SIZE, row2_y + i as i64 * ROW2_LINE_HEIGHT);
    }
    let row2_height = lines.len() as i64 * ROW2_LINE_HEIGHT;

    let row3_y = row2_y + row2_height + ROW3_GAP;
    layout.centered(&fields.row3(), ROW3_SIZE, row3_y);

    let bar_top = row3_y + BARS_OFFSET;
    let bar_bottom = layout.height - BOTTOM_RESERVE;
    layout.upc_block(&code, bar_top, bar_bottom, DIGITS_SIZE);

    Ok(layout.canvas)
}

fn render_alt_sku(record: &LabelRecord, config: &LabelConfig, fonts: &dyn TextRasterizer) -> RgbImage {
    use alt_sku::*;

    let mut layout = Layout::new(config, Variant::AltSku, fonts);

    let title_y = layout.margin;
    layout.centered(&record.title.trim().to_uppercase(), TITLE_SIZE, title_y);

    let usable = (layout.width - 2 * layout.margin).max(1) as u32;
    let barcode = code128::render_barcode(
        record.payload.trim(),
        BARCODE_WIDTH.min(usable),
        BARCODE_HEIGHT,
        fonts,
    );
    let barcode_y = title_y + BARCODE_OFFSET;
    let barcode_x = (layout.width - i64::from(barcode.width())).div_euclid(2);
    image::imageops::replace(&mut layout.canvas, &barcode, barcode_x, barcode_y);

    let sku_y = barcode_y + i64::from(barcode.height()) + SKU_GAP;
    layout.centered(record.sku.trim(), SKU_SIZE, sku_y);

    let size_y = sku_y + SIZE_OFFSET;
    layout.centered(record.size.as_deref().unwrap_or_default().trim(), SIZE_SIZE, size_y);

    layout.canvas
}
