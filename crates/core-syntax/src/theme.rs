//! Theme resolution: collapse a syntect color theme into one terminal
//! style per [`StyleCategory`], resolved once at startup.

use syntect::highlighting::{FontStyle, Highlighter, Style, ThemeSet};
use syntect::parsing::Scope;
use tracing::warn;

use crate::{CATEGORY_COUNT, StyleCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Terminal-expressible attributes for one style bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleAttrs {
    pub fg: Option<Rgb>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl StyleAttrs {
    fn from_syntect(style: Style) -> Self {
        let c = style.foreground;
        Self {
            fg: Some(Rgb {
                r: c.r,
                g: c.g,
                b: c.b,
            }),
            bold: style.font_style.contains(FontStyle::BOLD),
            italic: style.font_style.contains(FontStyle::ITALIC),
            underline: style.font_style.contains(FontStyle::UNDERLINE),
        }
    }
}

/// A named theme flattened to a per-category style table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    name: String,
    styles: [StyleAttrs; CATEGORY_COUNT],
}

impl Theme {
    pub const DEFAULT_NAME: &'static str = "base16-ocean.dark";

    /// Resolve a theme by name from the built-in set. An unknown name logs
    /// and falls back to [`Self::DEFAULT_NAME`].
    pub fn from_named(requested: Option<&str>) -> Self {
        let set = ThemeSet::load_defaults();
        let name = match requested {
            Some(n) if set.themes.contains_key(n) => n.to_string(),
            Some(n) => {
                warn!(target: "syntax", theme = n, fallback = Self::DEFAULT_NAME, "unknown_theme");
                Self::DEFAULT_NAME.to_string()
            }
            None => Self::DEFAULT_NAME.to_string(),
        };
        match set.themes.get(&name) {
            Some(theme) => Self::from_syntect(&name, theme),
            None => Self::monochrome(),
        }
    }

    fn from_syntect(name: &str, theme: &syntect::highlighting::Theme) -> Self {
        let highlighter = Highlighter::new(theme);
        let mut styles = [StyleAttrs::default(); CATEGORY_COUNT];
        for category in StyleCategory::ALL {
            let style = match category
                .representative_scope()
                .and_then(|path| Scope::new(path).ok())
            {
                Some(scope) => highlighter.style_for_stack(&[scope]),
                None => highlighter.style_for_stack(&[]),
            };
            styles[category.index()] = StyleAttrs::from_syntect(style);
        }
        Self {
            name: name.to_string(),
            styles,
        }
    }

    /// Attribute-free table, used only if the built-in set is somehow empty.
    fn monochrome() -> Self {
        Self {
            name: "monochrome".to_string(),
            styles: [StyleAttrs::default(); CATEGORY_COUNT],
        }
    }

    pub fn style(&self, category: StyleCategory) -> StyleAttrs {
        self.styles[category.index()]
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
