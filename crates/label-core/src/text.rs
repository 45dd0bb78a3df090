//! Text placement and wrapping

use crate::{Align, TextRasterizer};
use image::{Rgb, RgbImage};

/// Characters kept when an over-wide word is truncated
pub const TRUNCATE_CHARS: usize = 40;

/// Marker appended to truncated words
pub const ELLIPSIS: &str = "...";

/// Calculate X offset for text alignment
///
/// # Arguments
/// * `text_width` - Width of text in pixels
/// * `container_width` - Available width for alignment
/// * `align` - Desired alignment
pub fn calculate_x_offset(text_width: i64, container_width: i64, align: Align) -> i64 {
    match align {
        Align::Left => 0,
        Align::Center => (container_width - text_width).div_euclid(2),
        Align::Right => container_width - text_width,
    }
}

/// Draw a single line aligned inside the horizontal span `[left, left + width)`
///
/// Returns the x coordinate the text was drawn at.
#[allow(clippy::too_many_arguments)]
pub fn draw_aligned(
    canvas: &mut RgbImage,
    rasterizer: &dyn TextRasterizer,
    text: &str,
    size: f32,
    align: Align,
    left: i64,
    width: i64,
    y: i64,
    color: Rgb<u8>,
) -> i64 {
    let text_width = i64::from(rasterizer.measure(text, size));
    let x = left + calculate_x_offset(text_width, width, align);
    rasterizer.draw(canvas, text, x as i32, y as i32, size, color);
    x
}

/// Truncate an over-wide word to its first 40 characters plus an ellipsis
///
/// Words of 40 characters or fewer are returned unchanged.
pub fn truncate_word(word: &str) -> String {
    if word.chars().count() > TRUNCATE_CHARS {
        let head: String = word.chars().take(TRUNCATE_CHARS).collect();
        format!("{head}{ELLIPSIS}")
    } else {
        word.to_string()
    }
}

/// Greedy word wrap against a pixel width
///
/// Words are appended to the current line while the measured width of
/// `line + " " + word` stays within `max_width`. When the greedy pass yields
/// more than `max_lines` lines, the input words are instead split into
/// exactly `max_lines` near-equal buckets; the first `count % max_lines`
/// buckets take one extra word.
///
/// A word that alone is wider than `max_width` is truncated with
/// [`truncate_word`] and placed on its own line.
///
/// Empty or whitespace-only text yields a single empty line.
pub fn wrap_greedy(
    text: &str,
    rasterizer: &dyn TextRasterizer,
    size: f32,
    max_width: u32,
    max_lines: usize,
) -> Vec<String> {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| {
            if rasterizer.measure(word, size) > max_width {
                truncate_word(word)
            } else {
                word.to_string()
            }
        })
        .collect();

    if words.is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in &words {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if rasterizer.measure(&candidate, size) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.clone()));
        }
    }
    lines.push(current);

    if max_lines > 0 && lines.len() > max_lines {
        log::debug!(
            "greedy wrap produced {} lines, rebalancing into {max_lines}",
            lines.len()
        );
        return rebalance(&words, max_lines);
    }

    lines
}

/// Split `words` into `buckets` near-equal runs joined by spaces
fn rebalance(words: &[String], buckets: usize) -> Vec<String> {
    let per_bucket = words.len() / buckets;
    let remainder = words.len() % buckets;

    let mut lines = Vec::with_capacity(buckets);
    let mut start = 0;
    for i in 0..buckets {
        let take = per_bucket + usize::from(i < remainder);
        let end = (start + take).min(words.len());
        lines.push(words[start..end].join(" "));
        start = end;
    }
    lines
}
