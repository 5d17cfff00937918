//! Per-line token cache between the tokenizer and the frame compositor.

use ahash::AHashMap;
use core_state::Damage;
use core_syntax::{Token, Tokenize};
use tracing::debug;

/// Lazily populated line → token-row map. A miss calls the tokenizer; a
/// tokenizer failure degrades to one plain token covering the whole line
/// and never propagates past the cache.
#[derive(Default)]
pub struct HighlightCache {
    rows: AHashMap<usize, Vec<Token>>,
}

impl HighlightCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens_for(&mut self, y: usize, line: &str, tokenizer: &dyn Tokenize) -> &[Token] {
        self.rows.entry(y).or_insert_with(|| {
            match tokenizer.tokenize(line) {
                Ok(tokens) => tokens,
                Err(e) => {
                    debug!(target: "render.highlight", line = y, error = %e, "tokenize_fallback");
                    vec![Token::plain(line)]
                }
            }
        })
    }

    /// One line's text changed in place.
    pub fn invalidate_line(&mut self, y: usize) {
        self.rows.remove(&y);
    }

    /// Line identities at and below `y` shifted; their cached rows would
    /// otherwise attach to content that moved out from under them.
    pub fn invalidate_from(&mut self, y: usize) {
        self.rows.retain(|&line, _| line < y);
    }

    pub fn apply(&mut self, damage: Damage) {
        match damage {
            Damage::None => {}
            Damage::Line(y) => self.invalidate_line(y),
            Damage::FromLine(y) => self.invalidate_from(y),
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn cached_rows(&self) -> usize {
        self.rows.len()
    }
}
