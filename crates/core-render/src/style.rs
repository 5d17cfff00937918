//! Painter-facing style model.
//!
//! `SpanStyle` is the concrete attribute set the painter can emit; `UiStyles`
//! fixes the chrome palette once at startup. Token styles arrive from
//! `core-syntax` as plain RGB values and convert here, keeping terminal-crate
//! types out of the tokenizer.

use bitflags::bitflags;
use core_syntax::{Rgb, StyleAttrs};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellAttrs: u8 {
        const BOLD      = 0b0000_0001;
        const ITALIC    = 0b0000_0010;
        const UNDERLINE = 0b0000_0100;
        const REVERSE   = 0b0000_1000; // software cursor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanStyle {
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub attrs: CellAttrs,
}

impl Default for SpanStyle {
    fn default() -> Self {
        Self::plain()
    }
}

impl SpanStyle {
    pub const fn plain() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: CellAttrs::empty(),
        }
    }

    pub fn fg(r: u8, g: u8, b: u8) -> Self {
        Self {
            fg: Some(Rgb { r, g, b }),
            ..Self::plain()
        }
    }

    pub fn with_bg(mut self, r: u8, g: u8, b: u8) -> Self {
        self.bg = Some(Rgb { r, g, b });
        self
    }

    /// The same style with the reverse-video bit set; how the software
    /// cursor is drawn over any underlying token style.
    pub fn reversed(mut self) -> Self {
        self.attrs |= CellAttrs::REVERSE;
        self
    }

    /// Convert a resolved theme style into painter attributes.
    pub fn from_token(attrs: StyleAttrs) -> Self {
        let mut flags = CellAttrs::empty();
        if attrs.bold {
            flags |= CellAttrs::BOLD;
        }
        if attrs.italic {
            flags |= CellAttrs::ITALIC;
        }
        if attrs.underline {
            flags |= CellAttrs::UNDERLINE;
        }
        Self {
            fg: attrs.fg,
            bg: None,
            attrs: flags,
        }
    }
}

/// Fixed chrome palette, built once at startup.
#[derive(Debug, Clone)]
pub struct UiStyles {
    pub text: SpanStyle,
    pub title: SpanStyle,
    pub gutter: SpanStyle,
    pub footer: SpanStyle,
    pub status: SpanStyle,
    pub error: SpanStyle,
    pub prompt: SpanStyle,
}

impl Default for UiStyles {
    fn default() -> Self {
        Self {
            text: SpanStyle::plain(),
            title: SpanStyle::fg(0xFA, 0xFA, 0xFA).with_bg(0x7D, 0x56, 0xF4),
            gutter: SpanStyle::fg(0x88, 0x88, 0x88),
            footer: SpanStyle::fg(0x62, 0x62, 0x62),
            status: SpanStyle::fg(0x62, 0x62, 0x62),
            error: SpanStyle::fg(0xFF, 0x00, 0x00),
            prompt: SpanStyle::fg(0xFF, 0xFF, 0x00).with_bg(0x00, 0x00, 0x00),
        }
    }
}
