//! Visual-column arithmetic for tab-expanded terminal lines.
//!
//! Cursor motion and rendering both address lines by byte offset but agree
//! on screen placement through visual columns. `Metrics` is the single place
//! that conversion lives; it is built once from config and threaded to every
//! caller so the two sides can never disagree on tab width.

use unicode_width::UnicodeWidthChar;

/// Tab stop used when no configuration overrides it.
pub const DEFAULT_TAB_STOP: usize = 4;

/// Tab-stop-aware width and column conversions.
///
/// Byte offsets handed to these methods are assumed to lie on `char`
/// boundaries of the given line; the document layer maintains that
/// invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    tab_stop: usize,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_STOP)
    }
}

impl Metrics {
    /// A zero tab stop would make tab width undefined, so it clamps to 1.
    pub fn new(tab_stop: usize) -> Self {
        Self {
            tab_stop: tab_stop.max(1),
        }
    }

    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    /// Width in screen cells of `ch` when it starts at visual column `col`.
    ///
    /// Tabs advance to the next tab stop, wide glyphs report their Unicode
    /// width, and zero-width reports clamp to 1 so every char boundary owns
    /// a distinct column (`byte_at_visual_col` inverts `visual_col` only
    /// under strictly positive widths).
    pub fn visual_width(&self, ch: char, col: usize) -> usize {
        if ch == '\t' {
            self.tab_stop - col % self.tab_stop
        } else {
            UnicodeWidthChar::width(ch).unwrap_or(1).max(1)
        }
    }

    /// Visual column of the char boundary at `byte` (0 at start of line).
    pub fn visual_col(&self, line: &str, byte: usize) -> usize {
        let mut col = 0;
        for (idx, ch) in line.char_indices() {
            if idx >= byte {
                break;
            }
            col += self.visual_width(ch, col);
        }
        col
    }

    /// Byte offset of the first char whose cell span would pass `target`.
    ///
    /// A target landing inside a tab or wide glyph resolves to that char's
    /// start; a target past the end of the line clamps to `line.len()`.
    pub fn byte_at_visual_col(&self, line: &str, target: usize) -> usize {
        let mut col = 0;
        for (idx, ch) in line.char_indices() {
            let w = self.visual_width(ch, col);
            if col + w > target {
                return idx;
            }
            col += w;
        }
        line.len()
    }

    /// Total visual width of a line.
    pub fn line_width(&self, line: &str) -> usize {
        self.visual_col(line, line.len())
    }
}

/// Char-boundary stepping. Tab-stop independent, so these live outside
/// `Metrics`.
pub mod boundary {
    /// Byte offset of the char boundary before `byte` (0 when already at or
    /// before the first).
    pub fn prev(line: &str, byte: usize) -> usize {
        if byte == 0 || byte > line.len() {
            return 0;
        }
        let mut i = byte - 1;
        while i > 0 && !line.is_char_boundary(i) {
            i -= 1;
        }
        i
    }

    /// Byte offset of the char boundary after `byte` (`line.len()` when at
    /// or beyond the end).
    pub fn next(line: &str, byte: usize) -> usize {
        if byte >= line.len() {
            return line.len();
        }
        let mut i = byte + 1;
        while i < line.len() && !line.is_char_boundary(i) {
            i += 1;
        }
        i
    }
}

/// Longest whitespace prefix, as carried onto auto-indented lines.
pub fn leading_indent(line: &str) -> &str {
    let end = line
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(line.len());
    &line[..end]
}
