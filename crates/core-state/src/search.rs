//! Wraparound phrase search.
//!
//! Plain substring match walking lines from the cursor: the rest of the
//! cursor line first, then every following line, then — wrapping — the
//! lines above the cursor. The cursor line is never scanned twice, so the
//! walk visits each line at most once.

use crate::{Document, Position};

/// Byte position of the next occurrence of `phrase` at or after the cursor,
/// wrapping past the document end. `None` for an absent phrase or an empty
/// one.
pub fn find_from(doc: &Document, phrase: &str) -> Option<Position> {
    if phrase.is_empty() {
        return None;
    }
    let Position { line: y0, byte: x0 } = doc.cursor();
    let lines = doc.lines();
    if let Some(idx) = lines[y0][x0..].find(phrase) {
        return Some(Position::new(y0, x0 + idx));
    }
    for (y, line) in lines.iter().enumerate().skip(y0 + 1) {
        if let Some(idx) = line.find(phrase) {
            return Some(Position::new(y, idx));
        }
    }
    for (y, line) in lines.iter().enumerate().take(y0) {
        if let Some(idx) = line.find(phrase) {
            return Some(Position::new(y, idx));
        }
    }
    None
}
