//! Bar geometry for label canvases

use crate::raster::{fill_rect, BLACK};
use crate::BarPattern;
use image::RgbImage;

/// Fraction of the nominal bar height that guard bars extend below the data bars
pub const GUARD_EXTENSION: f64 = 0.12;

/// Horizontal placement of a bar pattern on a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarGeometry {
    /// Width of one module in pixels, at least 1
    pub module_width: u32,
    /// `module_width * pattern_len`
    pub total_width: u32,
    /// Left edge of the first module
    pub x_start: i64,
}

impl BarGeometry {
    /// Fit `pattern_len` modules between the side margins of a canvas
    ///
    /// The module width is the largest whole pixel count that fits inside
    /// `canvas_width - 2 * margin`, never less than 1. The pattern is then
    /// centered on the full canvas width.
    pub fn compute(pattern_len: usize, canvas_width: u32, margin: u32) -> Self {
        let len = pattern_len.max(1) as i64;
        let usable = i64::from(canvas_width) - 2 * i64::from(margin);
        let module_width = usable.div_euclid(len).max(1);
        let total_width = module_width * pattern_len as i64;
        let x_start = (i64::from(canvas_width) - total_width).div_euclid(2);

        Self {
            module_width: module_width as u32,
            total_width: total_width as u32,
            x_start,
        }
    }

    /// Left edge of module `index`
    pub fn module_x(&self, index: usize) -> i64 {
        self.x_start + index as i64 * i64::from(self.module_width)
    }
}

/// Extra pixels guard bars reach below the data bars for a given bar height
pub fn guard_extension(bar_height: i64) -> i64 {
    (bar_height.max(0) as f64 * GUARD_EXTENSION) as i64
}

/// Draw a UPC bar pattern between `top` and `bottom` (both inclusive)
///
/// Guard modules extend [`guard_extension`] pixels further down. A bottom
/// edge above `top` is clamped to a one pixel bar. Returns the guard
/// extension that was applied so callers can place text below it.
pub fn draw_bar_pattern(
    canvas: &mut RgbImage,
    pattern: &BarPattern,
    geometry: &BarGeometry,
    top: i64,
    bottom: i64,
) -> i64 {
    let bottom = if bottom < top {
        log::warn!("bar area collapsed (top {top}, bottom {bottom}); clamping to one pixel");
        top
    } else {
        bottom
    };
    let extra = guard_extension(bottom - top);

    for (i, bar) in pattern.modules().enumerate() {
        if !bar {
            continue;
        }
        let y_end = if pattern.is_guard(i) { bottom + extra } else { bottom };
        fill_rect(
            canvas,
            geometry.module_x(i) as i32,
            top as i32,
            geometry.module_width,
            (y_end - top + 1) as u32,
            BLACK,
        );
    }

    extra
}
