//! Queued crossterm emission.
//!
//! One `draw` queues every command for a composed frame and flushes once,
//! so a slow terminal never shows a half-drawn row. The real cursor stays
//! hidden; the frame carries its own reverse-video cursor cell.

use std::io::Write;

use anyhow::{Context, Result};
use core_syntax::Rgb;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{
        Attribute, Attributes, Color, Print, ResetColor, SetAttributes, SetBackgroundColor,
        SetForegroundColor,
    },
    terminal::{Clear, ClearType},
};

use crate::frame::Frame;
use crate::style::CellAttrs;

pub struct Painter<W: Write> {
    out: W,
}

impl<W: Write> Painter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        for (idx, row) in frame.rows.iter().enumerate() {
            let y = u16::try_from(idx).unwrap_or(u16::MAX);
            queue!(self.out, MoveTo(0, y), Clear(ClearType::UntilNewLine))
                .context("queue row preamble")?;
            for span in row.spans() {
                if let Some(Rgb { r, g, b }) = span.style.fg {
                    queue!(self.out, SetForegroundColor(Color::Rgb { r, g, b }))
                        .context("queue foreground")?;
                }
                if let Some(Rgb { r, g, b }) = span.style.bg {
                    queue!(self.out, SetBackgroundColor(Color::Rgb { r, g, b }))
                        .context("queue background")?;
                }
                let attrs = terminal_attrs(span.style.attrs);
                if attrs != Attributes::default() {
                    queue!(self.out, SetAttributes(attrs)).context("queue attributes")?;
                }
                queue!(
                    self.out,
                    Print(span.text.as_str()),
                    ResetColor,
                    SetAttributes(Attribute::Reset.into())
                )
                .context("queue span")?;
            }
        }
        self.out.flush().context("flush frame")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn terminal_attrs(attrs: CellAttrs) -> Attributes {
    let mut out = Attributes::default();
    if attrs.contains(CellAttrs::BOLD) {
        out.set(Attribute::Bold);
    }
    if attrs.contains(CellAttrs::ITALIC) {
        out.set(Attribute::Italic);
    }
    if attrs.contains(CellAttrs::UNDERLINE) {
        out.set(Attribute::Underlined);
    }
    if attrs.contains(CellAttrs::REVERSE) {
        out.set(Attribute::Reverse);
    }
    out
}
