//! Text extent helpers.
//!
//! Leaf widgets and the axis label density heuristic only need an estimate of
//! how much room a string occupies, so widths are derived from the Unicode
//! display width scaled by a nominal glyph size instead of real font metrics.

use unicode_width::UnicodeWidthStr;

use crate::geometry::Size;

/// Nominal advance of a single-width glyph, in pixels.
pub const GLYPH_WIDTH_PX: i32 = 8;
/// Nominal line height, in pixels.
pub const LINE_HEIGHT_PX: i32 = 16;

/// Compute the display width of a string in terminal-style columns.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Estimated pixel box of a (possibly multi-line) label.
pub fn text_extent(text: &str) -> Size {
    let mut widest = 0usize;
    let mut lines = 0i32;
    for line in text.split('\n') {
        widest = widest.max(display_width(line));
        lines += 1;
    }
    Size::new(widest as i32 * GLYPH_WIDTH_PX, lines * LINE_HEIGHT_PX)
}

/// Length of `text` expressed in `em` units converted to pixels.
pub fn em_length_px(text: &str, em_px: f64) -> f64 {
    text.chars().count() as f64 * em_px
}
