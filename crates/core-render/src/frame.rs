//! Full-frame composition: gutter, clipped text rows, cursor overlay,
//! chrome.
//!
//! Clipping works in visual columns. Characters wholly left of the
//! horizontal offset are skipped; a tab straddling the left edge
//! contributes only its remaining width; emission stops at the window's
//! right edge. A glyph cannot be drawn in part, so any clipped character
//! (and every tab) is emitted as spaces of its clipped width. The cursor
//! cell is overlaid in reverse video, with a synthetic one-column cell
//! when the cursor rests at end-of-line.

use core_state::Document;
use core_syntax::{Token, Tokenize};

use crate::chrome::{self, ChromeContext};
use crate::highlight::HighlightCache;
use crate::style::{SpanStyle, UiStyles};
use crate::viewport::{CHROME_ROWS, ViewPort};

/// One styled run of text within a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: SpanStyle,
}

/// A terminal row as adjacent styled runs; composed rows are exactly the
/// viewport width in visual columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    spans: Vec<StyledSpan>,
}

impl Row {
    /// Append text, merging into the previous span when the style matches.
    pub fn push(&mut self, text: &str, style: SpanStyle) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.spans.last_mut()
            && last.style == style
        {
            last.text.push_str(text);
            return;
        }
        self.spans.push(StyledSpan {
            text: text.to_string(),
            style,
        });
    }

    pub fn spans(&self) -> &[StyledSpan] {
        &self.spans
    }

    /// Concatenated row text, styling erased.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A fully composed screen: title, text body, help footer, notice row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub rows: Vec<Row>,
}

/// Everything the compositor reads. The highlight cache and tokenizer stay
/// outside so the document and viewport can be borrowed immutably.
pub struct FrameInputs<'a> {
    pub doc: &'a Document,
    pub viewport: &'a ViewPort,
    pub theme: &'a core_syntax::Theme,
    pub styles: &'a UiStyles,
    pub chrome: ChromeContext<'a>,
}

pub fn compose_frame(
    inputs: &FrameInputs<'_>,
    cache: &mut HighlightCache,
    tokenizer: &dyn Tokenize,
) -> Frame {
    let vp = inputs.viewport;
    let mut rows = Vec::with_capacity(vp.text_height() + CHROME_ROWS);
    rows.push(chrome::title_row(&inputs.chrome, vp.width(), inputs.styles));
    for screen_row in 0..vp.text_height() {
        let y = vp.offset_y() + screen_row;
        match inputs.doc.line(y) {
            Some(line) => {
                let tokens = cache.tokens_for(y, line, tokenizer);
                rows.push(text_row(line, y, tokens, inputs));
            }
            None => rows.push(filler_row(vp, inputs.styles)),
        }
    }
    let [help_1, help_2] = chrome::footer_rows(vp.width(), inputs.styles);
    rows.push(help_1);
    rows.push(help_2);
    rows.push(chrome::notice_row(
        &inputs.chrome.notice,
        vp.width(),
        inputs.styles,
    ));
    Frame { rows }
}

fn text_row(line: &str, y: usize, tokens: &[Token], inputs: &FrameInputs<'_>) -> Row {
    let vp = inputs.viewport;
    let metrics = inputs.doc.metrics();
    let offset_x = vp.offset_x();
    let text_width = vp.text_width();
    let window_end = offset_x + text_width;
    let cursor = inputs.doc.cursor();
    let cursor_here = cursor.line == y;
    let cursor_col = if cursor_here {
        metrics.visual_col(line, cursor.byte)
    } else {
        usize::MAX
    };

    let mut row = gutter_cell(y + 1, vp.gutter_width(), inputs.styles);
    let mut pos = 0usize; // absolute visual column within the line
    let mut emitted = 0usize; // columns emitted into the window

    'tokens: for token in tokens {
        let style = SpanStyle::from_token(inputs.theme.style(token.category));
        for ch in token.text.chars() {
            let start = pos;
            let mut w = metrics.visual_width(ch, pos);
            let mut broken = ch == '\t';
            if pos < offset_x {
                let skip = offset_x - pos;
                if skip >= w {
                    pos += w;
                    continue;
                }
                pos += skip;
                w -= skip;
                broken = true;
            }
            let over = (pos + w).saturating_sub(window_end);
            if over > 0 {
                if over >= w {
                    break 'tokens;
                }
                w -= over;
                broken = true;
            }
            let cell = if broken {
                " ".repeat(w)
            } else {
                ch.to_string()
            };
            let cell_style = if cursor_here && start == cursor_col {
                style.reversed()
            } else {
                style
            };
            row.push(&cell, cell_style);
            pos += w;
            emitted += w;
            if pos >= window_end {
                break 'tokens;
            }
        }
    }

    // Cursor resting at end-of-line gets a synthetic one-column cell.
    if cursor_here && cursor.byte == line.len() {
        let eol_col = metrics.line_width(line);
        if eol_col >= offset_x && eol_col < window_end {
            row.push(" ", inputs.styles.text.reversed());
            emitted += 1;
        }
    }
    pad(&mut row, text_width.saturating_sub(emitted), inputs.styles.text);
    row
}

fn gutter_cell(number: usize, gutter_width: usize, styles: &UiStyles) -> Row {
    let mut row = Row::default();
    row.push(&format!("{number:>gutter_width$} "), styles.gutter);
    row
}

/// A row past the end of the document: blank gutter and a `~` marker.
fn filler_row(vp: &ViewPort, styles: &UiStyles) -> Row {
    let mut row = Row::default();
    row.push(&" ".repeat(vp.gutter_width()), styles.gutter);
    row.push(" ~", styles.gutter);
    pad(&mut row, vp.text_width().saturating_sub(1), styles.text);
    row
}

fn pad(row: &mut Row, cols: usize, style: SpanStyle) {
    if cols > 0 {
        row.push(&" ".repeat(cols), style);
    }
}
