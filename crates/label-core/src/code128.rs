//! Code 128 rendering over `barcoders`
//!
//! Payloads are annotated with code set switches first: runs of digits go
//! to set C (two digits per symbol), everything else to set B.

use crate::raster::{blank_canvas, fill_rect, scale_to_width, BLACK, RED};
use crate::{CoreError, Result, TextRasterizer};
use barcoders::sym::code128::Code128;
use image::RgbImage;

/// `barcoders` marker selecting code set B
pub const SET_B: char = '\u{0181}';

/// `barcoders` marker selecting code set C
pub const SET_C: char = '\u{0106}';

/// Pixels per module when rendering before the final resize
pub const UNIT_PX: u32 = 10;

/// Quiet zone on each side, in modules
pub const QUIET_ZONE: f32 = 2.5;

const PLACEHOLDER_TEXT_SIZE: f32 = 20.0;
const PLACEHOLDER_MAX_CHARS: usize = 50;

/// Annotate `payload` with the code set markers `barcoders` expects
///
/// A digit run moves to set C when it is the whole payload and has 2 or at
/// least 4 digits, when it starts or ends the payload with at least 4 digits,
/// or when it sits in the middle with at least 6. An odd run keeps one digit
/// in set B: the last one at the start of the payload, the first one elsewhere.
///
/// # Errors
/// `CoreError::Code128` when the payload is empty or holds a character
/// outside ASCII 32..=127.
pub fn plan(payload: &str) -> Result<String> {
    if payload.is_empty() {
        return Err(CoreError::Code128("empty payload".to_string()));
    }
    if let Some(c) = payload.chars().find(|c| !matches!(u32::from(*c), 32..=127)) {
        return Err(CoreError::Code128(format!(
            "character {c:?} is not encodable in Code 128"
        )));
    }

    let chars: Vec<char> = payload.chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);
    let mut set = None;
    let mut i = 0;

    while i < chars.len() {
        let run = chars[i..].iter().take_while(|c| c.is_ascii_digit()).count();
        let at_start = i == 0;
        let at_end = i + run == chars.len();
        let use_c = match (at_start, at_end) {
            (true, true) => run == 2 || run >= 4,
            (true, false) | (false, true) => run >= 4,
            (false, false) => run >= 6,
        };

        if use_c {
            if run % 2 == 1 && !at_start {
                switch(&mut out, &mut set, SET_B);
                out.push(chars[i]);
                i += 1;
            }
            let paired = run - run % 2;
            switch(&mut out, &mut set, SET_C);
            out.extend(&chars[i..i + paired]);
            i += paired;
        } else {
            let take = run.max(1);
            switch(&mut out, &mut set, SET_B);
            out.extend(&chars[i..i + take]);
            i += take;
        }
    }

    Ok(out)
}

fn switch(out: &mut String, set: &mut Option<char>, to: char) {
    if *set != Some(to) {
        out.push(to);
        *set = Some(to);
    }
}

/// Encode `payload` into modules (`true` = bar): start, data, checksum, stop
///
/// # Errors
/// `CoreError::Code128` for payloads [`plan`] rejects or `barcoders` fails on.
pub fn modules(payload: &str) -> Result<Vec<bool>> {
    let annotated = plan(payload)?;
    let symbol = Code128::new(&annotated).map_err(|e| CoreError::Code128(e.to_string()))?;
    Ok(symbol.encode().into_iter().map(|m| m == 1).collect())
}

/// Render `payload` with `module_px` pixels per module and bars `height_px` tall
///
/// The image carries a quiet zone of [`QUIET_ZONE`] modules on both sides.
pub fn render(payload: &str, module_px: u32, height_px: u32) -> Result<RgbImage> {
    let modules = modules(payload)?;
    let module_px = module_px.max(1);
    let quiet = (QUIET_ZONE * module_px as f32).round() as u32;
    let width = modules.len() as u32 * module_px + 2 * quiet;

    let mut canvas = blank_canvas(width, height_px.max(1));
    for (i, bar) in modules.iter().enumerate() {
        if *bar {
            let x = quiet + i as u32 * module_px;
            fill_rect(&mut canvas, x as i32, 0, module_px, height_px.max(1), BLACK);
        }
    }
    Ok(canvas)
}

/// Produce a Code 128 image for a label
///
/// The symbol is rendered at [`UNIT_PX`] pixels per module with bars
/// `height * UNIT_PX` tall, then resized to `width` keeping its aspect ratio.
/// Encoding never fails the label: on error a white `width` x `height`
/// placeholder carrying the error message in red is returned instead.
pub fn render_barcode(
    payload: &str,
    width: u32,
    height: u32,
    rasterizer: &dyn TextRasterizer,
) -> RgbImage {
    match render(payload, UNIT_PX, height.saturating_mul(UNIT_PX)) {
        Ok(raw) => scale_to_width(raw, width),
        Err(e) => {
            log::warn!("Code 128 fallback for {payload:?}: {e}");
            placeholder(&e.to_string(), width, height, rasterizer)
        }
    }
}

fn placeholder(message: &str, width: u32, height: u32, rasterizer: &dyn TextRasterizer) -> RgbImage {
    let mut canvas = blank_canvas(width.max(1), height.max(1));
    let short: String = message.chars().take(PLACEHOLDER_MAX_CHARS).collect();
    rasterizer.draw(
        &mut canvas,
        &format!("Error: {short}"),
        10,
        height as i32 / 2 - 10,
        PLACEHOLDER_TEXT_SIZE,
        RED,
    );
    canvas
}
