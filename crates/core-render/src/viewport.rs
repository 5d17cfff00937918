//! Scroll window arithmetic: which slice of the document is visible and
//! where the gutter ends.

use core_state::Document;

/// Rows reserved for chrome: title, two help rows, the notice row.
pub const CHROME_ROWS: usize = 4;

/// Narrowest gutter, line count notwithstanding.
const MIN_GUTTER: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewPort {
    offset_y: usize,
    offset_x: usize, // visual columns
    width: usize,
    height: usize, // total terminal rows, chrome included
    gutter_width: usize,
}

impl ViewPort {
    pub fn new(width: usize, height: usize, line_count: usize) -> Self {
        let mut vp = Self {
            offset_y: 0,
            offset_x: 0,
            width,
            height,
            gutter_width: MIN_GUTTER,
        };
        vp.update_gutter(line_count);
        vp
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Rows available for document text.
    pub fn text_height(&self) -> usize {
        self.height.saturating_sub(CHROME_ROWS)
    }

    /// Columns available for document text, past the gutter and its
    /// separator space.
    pub fn text_width(&self) -> usize {
        self.width.saturating_sub(self.gutter_width + 1)
    }

    pub fn offset_y(&self) -> usize {
        self.offset_y
    }

    pub fn offset_x(&self) -> usize {
        self.offset_x
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn gutter_width(&self) -> usize {
        self.gutter_width
    }

    fn update_gutter(&mut self, line_count: usize) {
        self.gutter_width = (digit_count(line_count) + 1).max(MIN_GUTTER);
    }

    /// Drag the window so the cursor stays inside it. Clamps, never centers.
    /// Runs after every dispatched event; the gutter width refreshes here
    /// too so line-count changes take effect in the same frame.
    pub fn reconcile(&mut self, doc: &Document) {
        self.update_gutter(doc.line_count());
        let cursor = doc.cursor();

        let text_height = self.text_height();
        if cursor.line < self.offset_y {
            self.offset_y = cursor.line;
        }
        if text_height > 0 && cursor.line >= self.offset_y + text_height {
            self.offset_y = cursor.line - text_height + 1;
        }

        let text_width = self.text_width();
        let line = doc.line(cursor.line).unwrap_or("");
        let cursor_col = doc.metrics().visual_col(line, cursor.byte);
        if cursor_col < self.offset_x {
            self.offset_x = cursor_col;
        }
        if text_width > 0 && cursor_col >= self.offset_x + text_width {
            self.offset_x = cursor_col - text_width + 1;
        }
    }
}

fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}
