//! Chrome rows: title bar, key-help footer, and the notice line.

use core_text::Metrics;

use crate::frame::Row;
use crate::style::{SpanStyle, UiStyles};

pub const FOOTER_LINE_1: &str = "^O Save   ^W Search   ^K Cut   ^P Copy   ^U Paste   ^C Position";
pub const FOOTER_LINE_2: &str = "^X Quit   ^Z Undo     ^Y Redo  ^A Home   ^E End";

/// What the chrome needs to know about the application, per frame.
pub struct ChromeContext<'a> {
    pub file_name: &'a str,
    pub modified: bool,
    pub notice: Notice<'a>,
}

/// Content of the bottom row, picked by the application in priority order:
/// an active prompt beats a transient status beats the persistent error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    None,
    Status(&'a str),
    Error(&'a str),
    Prompt(&'a str),
}

pub fn title_row(ctx: &ChromeContext<'_>, width: usize, styles: &UiStyles) -> Row {
    let marker = if ctx.modified { " *" } else { "" };
    fitted_row(
        &format!(" patina - {}{marker}", ctx.file_name),
        width,
        styles.title,
    )
}

pub fn footer_rows(width: usize, styles: &UiStyles) -> [Row; 2] {
    [
        fitted_row(FOOTER_LINE_1, width, styles.footer),
        fitted_row(FOOTER_LINE_2, width, styles.footer),
    ]
}

pub fn notice_row(notice: &Notice<'_>, width: usize, styles: &UiStyles) -> Row {
    match notice {
        Notice::None => fitted_row("", width, styles.status),
        Notice::Status(text) => fitted_row(text, width, styles.status),
        Notice::Error(text) => fitted_row(text, width, styles.error),
        Notice::Prompt(text) => fitted_row(text, width, styles.prompt),
    }
}

/// Single-style row clipped and padded to exactly `width` columns. Tabs
/// expand; a wide glyph that would straddle the right edge is dropped.
fn fitted_row(text: &str, width: usize, style: SpanStyle) -> Row {
    let metrics = Metrics::default();
    let mut row = Row::default();
    let mut used = 0usize;
    let mut kept = String::new();
    for ch in text.chars() {
        let w = metrics.visual_width(ch, used);
        if used + w > width {
            break;
        }
        if ch == '\t' {
            kept.push_str(&" ".repeat(w));
        } else {
            kept.push(ch);
        }
        used += w;
    }
    row.push(&kept, style);
    if used < width {
        row.push(&" ".repeat(width - used), style);
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styles() -> UiStyles {
        UiStyles::default()
    }

    #[test]
    fn title_names_the_file_and_flags_modification() {
        let clean = ChromeContext {
            file_name: "notes.txt",
            modified: false,
            notice: Notice::None,
        };
        let row = title_row(&clean, 40, &styles());
        assert_eq!(row.text().trim_end(), " patina - notes.txt");

        let dirty = ChromeContext {
            file_name: "notes.txt",
            modified: true,
            notice: Notice::None,
        };
        let row = title_row(&dirty, 40, &styles());
        assert!(row.text().contains("notes.txt *"));
    }

    #[test]
    fn title_fills_the_whole_width_for_the_background() {
        let ctx = ChromeContext {
            file_name: "a.rs",
            modified: false,
            notice: Notice::None,
        };
        let row = title_row(&ctx, 30, &styles());
        assert_eq!(row.text().chars().count(), 30);
        for span in row.spans() {
            assert_eq!(span.style, styles().title);
        }
    }

    #[test]
    fn footer_lists_the_live_bindings() {
        let [one, two] = footer_rows(120, &styles());
        let text = format!("{} {}", one.text(), two.text());
        for binding in ["^O", "^W", "^K", "^P", "^U", "^C", "^X", "^Z", "^Y"] {
            assert!(text.contains(binding), "footer should mention {binding}");
        }
    }

    #[test]
    fn notice_variants_pick_their_styles() {
        let s = styles();
        let status = notice_row(&Notice::Status("File saved"), 20, &s);
        assert_eq!(status.spans()[0].style, s.status);
        let error = notice_row(&Notice::Error("write failed"), 20, &s);
        assert_eq!(error.spans()[0].style, s.error);
        let prompt = notice_row(&Notice::Prompt("Search: foo"), 20, &s);
        assert_eq!(prompt.spans()[0].style, s.prompt);
        assert!(prompt.text().starts_with("Search: foo"));
    }

    #[test]
    fn overlong_text_is_clipped_to_the_width() {
        let row = notice_row(&Notice::Status("0123456789"), 4, &styles());
        assert_eq!(row.text(), "0123");
    }

    #[test]
    fn wide_glyphs_never_straddle_the_right_edge() {
        // each CJK glyph is two columns; width 5 fits two plus one space
        let row = notice_row(&Notice::Status("日本語"), 5, &styles());
        assert_eq!(row.text(), "日本 ");
    }
}
