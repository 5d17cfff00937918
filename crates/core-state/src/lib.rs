//! Document state: the line store, cursor, and reversible edit operations.
//!
//! A document is a plain vector of lines (no trailing newlines) plus a
//! cursor addressed as (line index, byte offset). Every primitive edit goes
//! through one `apply` routine: high-level operations build a forward
//! `Action`, apply it, and record its inverse onto the `ActionLog`. Undo and
//! redo replay entries through the same routine without re-recording, so
//! the recorded history is closed over exactly four action shapes and the
//! cursor lands wherever the applied primitive's own rule puts it.
//!
//! Vertical motion stickiness: horizontal moves and edits remember the
//! cursor's visual column; up/down resolve that remembered column against
//! the target line through `core_text::Metrics`, so the cursor slides along
//! short lines and snaps back out on long ones.
//!
//! Invariants:
//! - the document always holds at least one line (possibly empty);
//! - `cursor.line` indexes a real line and `cursor.byte` lies on a char
//!   boundary of it (or equals its length);
//! - every mutation reports a `Damage` so highlight caches keyed by line
//!   index can drop exactly the entries that went stale.

use core_text::{Metrics, boundary, leading_indent};
use tracing::trace;

pub mod search;
pub mod undo;

pub use undo::{Action, ActionLog, UNDO_HISTORY_MAX};

/// A position inside the document as (line index, byte offset within that
/// line). Byte offsets always sit on UTF-8 char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub byte: usize,
}

impl Position {
    pub fn new(line: usize, byte: usize) -> Self {
        Self { line, byte }
    }
    pub fn origin() -> Self {
        Self { line: 0, byte: 0 }
    }
}

/// Lines whose cached derivations (highlight rows) went stale under a
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Damage {
    /// Nothing changed (edit at a document edge).
    None,
    /// One line's text changed in place.
    Line(usize),
    /// Line identities at and below this index shifted (split, join, cut,
    /// paste).
    FromLine(usize),
}

/// The editable line store.
pub struct Document {
    lines: Vec<String>,
    cursor: Position,
    modified: bool,
    target_visual_col: usize,
    metrics: Metrics,
    log: ActionLog,
}

impl Document {
    /// Empty document: one empty line, clean.
    pub fn new(metrics: Metrics) -> Self {
        Self::from_lines(Vec::new(), metrics)
    }

    /// Adopt loaded lines. An empty vector still yields one empty line.
    pub fn from_lines(mut lines: Vec<String>, metrics: Metrics) -> Self {
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            cursor: Position::origin(),
            modified: false,
            target_visual_col: 0,
            metrics,
            log: ActionLog::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Called after a successful save.
    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn undo_depth(&self) -> usize {
        self.log.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.log.redo_depth()
    }

    fn current_line(&self) -> &str {
        &self.lines[self.cursor.line]
    }

    fn sync_target_col(&mut self) {
        self.target_visual_col = self
            .metrics
            .visual_col(&self.lines[self.cursor.line], self.cursor.byte);
    }

    // ------------------------------------------------------------------
    // Primitive application
    // ------------------------------------------------------------------

    /// Apply one primitive to the line store. Shared by forward edits and
    /// undo/redo replay; never records.
    fn apply(&mut self, action: &Action) -> Damage {
        let damage = match action {
            Action::Insert { line, byte, text } => {
                self.lines[*line].insert_str(*byte, text);
                self.cursor = Position::new(*line, byte + text.len());
                Damage::Line(*line)
            }
            Action::Delete { line, byte, text } => {
                debug_assert_eq!(&self.lines[*line][*byte..byte + text.len()], text);
                self.lines[*line].replace_range(*byte..byte + text.len(), "");
                self.cursor = Position::new(*line, *byte);
                Damage::Line(*line)
            }
            Action::Split { line, byte } => {
                let rest = self.lines[*line].split_off(*byte);
                self.lines.insert(line + 1, rest);
                self.cursor = Position::new(line + 1, 0);
                Damage::FromLine(*line)
            }
            Action::Join { line, byte } => {
                debug_assert_eq!(self.lines[line - 1].len(), *byte);
                let removed = self.lines.remove(*line);
                self.lines[line - 1].push_str(&removed);
                self.cursor = Position::new(line - 1, *byte);
                Damage::FromLine(line - 1)
            }
        };
        self.modified = true;
        self.sync_target_col();
        damage
    }

    /// Forward edit: apply `forward` and record its inverse.
    fn edit(&mut self, forward: Action) -> Damage {
        let undoer = forward.inverse();
        let damage = self.apply(&forward);
        trace!(
            target: "state.edit",
            cursor_line = self.cursor.line,
            cursor_byte = self.cursor.byte,
            undo_depth = self.log.undo_depth() + 1,
            "edit_applied"
        );
        self.log.record(undoer);
        damage
    }

    // ------------------------------------------------------------------
    // Editing operations
    // ------------------------------------------------------------------

    /// Insert `text` (no newlines) at the cursor; the cursor advances past
    /// it.
    pub fn insert_text(&mut self, text: &str) -> Damage {
        debug_assert!(!text.contains('\n'), "newlines go through split_line");
        if text.is_empty() {
            return Damage::None;
        }
        self.edit(Action::Insert {
            line: self.cursor.line,
            byte: self.cursor.byte,
            text: text.to_string(),
        })
    }

    /// Remove the char before the cursor; at the start of a line, join it
    /// onto the previous one with the cursor left at the seam. No-op at the
    /// document start.
    pub fn delete_backward(&mut self) -> Damage {
        let Position { line, byte } = self.cursor;
        if byte > 0 {
            let prev = boundary::prev(self.current_line(), byte);
            let removed = self.lines[line][prev..byte].to_string();
            self.edit(Action::Delete {
                line,
                byte: prev,
                text: removed,
            })
        } else if line > 0 {
            let seam = self.lines[line - 1].len();
            self.edit(Action::Join { line, byte: seam })
        } else {
            Damage::None
        }
    }

    /// Remove the char under the cursor; at end of line, join the next line
    /// up with the cursor staying put. No-op at the document end.
    pub fn delete_forward(&mut self) -> Damage {
        let Position { line, byte } = self.cursor;
        if byte < self.lines[line].len() {
            let next = boundary::next(self.current_line(), byte);
            let removed = self.lines[line][byte..next].to_string();
            self.edit(Action::Delete {
                line,
                byte,
                text: removed,
            })
        } else if line + 1 < self.lines.len() {
            let seam = self.lines[line].len();
            self.edit(Action::Join {
                line: line + 1,
                byte: seam,
            })
        } else {
            Damage::None
        }
    }

    /// Split the cursor line in two and carry the left part's leading
    /// whitespace onto the new line, cursor landing past that indent.
    ///
    /// The split and the indent are recorded as separate entries (a plain
    /// split is one undo step, an indented one is two), which keeps undo
    /// replay byte-exact.
    pub fn split_line(&mut self) -> Damage {
        let Position { line, byte } = self.cursor;
        let damage = self.edit(Action::Split { line, byte });
        let indent = leading_indent(&self.lines[line]).to_string();
        if !indent.is_empty() {
            self.edit(Action::Insert {
                line: line + 1,
                byte: 0,
                text: indent,
            });
        }
        damage
    }

    // ------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------

    /// Walk one entry off the undo stack. Returns `None` when empty.
    pub fn undo(&mut self) -> Option<Damage> {
        let action = self.log.pop_undo()?;
        trace!(
            target: "state.undo",
            undo_depth = self.log.undo_depth(),
            redo_depth = self.log.redo_depth() + 1,
            "undo_pop"
        );
        let redoer = action.inverse();
        let damage = self.apply(&action);
        self.log.push_redo(redoer);
        Some(damage)
    }

    /// Walk one entry off the redo stack. Returns `None` when empty.
    pub fn redo(&mut self) -> Option<Damage> {
        let action = self.log.pop_redo()?;
        trace!(
            target: "state.undo",
            undo_depth = self.log.undo_depth() + 1,
            redo_depth = self.log.redo_depth(),
            "redo_pop"
        );
        let undoer = action.inverse();
        let damage = self.apply(&action);
        self.log.push_undo(undoer);
        Some(damage)
    }

    // ------------------------------------------------------------------
    // Cursor motion
    // ------------------------------------------------------------------

    /// One char left, wrapping to the previous line end.
    pub fn move_left(&mut self) {
        if self.cursor.byte > 0 {
            self.cursor.byte = boundary::prev(self.current_line(), self.cursor.byte);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.byte = self.current_line().len();
        }
        self.sync_target_col();
    }

    /// One char right, wrapping to the next line start.
    pub fn move_right(&mut self) {
        if self.cursor.byte < self.current_line().len() {
            self.cursor.byte = boundary::next(self.current_line(), self.cursor.byte);
        } else if self.cursor.line + 1 < self.lines.len() {
            self.cursor.line += 1;
            self.cursor.byte = 0;
        }
        self.sync_target_col();
    }

    /// Up one line, holding the remembered visual column.
    pub fn move_up(&mut self) {
        if self.cursor.line == 0 {
            return;
        }
        self.cursor.line -= 1;
        self.cursor.byte = self
            .metrics
            .byte_at_visual_col(self.current_line(), self.target_visual_col);
    }

    /// Down one line, holding the remembered visual column.
    pub fn move_down(&mut self) {
        if self.cursor.line + 1 >= self.lines.len() {
            return;
        }
        self.cursor.line += 1;
        self.cursor.byte = self
            .metrics
            .byte_at_visual_col(self.current_line(), self.target_visual_col);
    }

    pub fn move_home(&mut self) {
        self.cursor.byte = 0;
        self.sync_target_col();
    }

    pub fn move_end(&mut self) {
        self.cursor.byte = self.current_line().len();
        self.sync_target_col();
    }

    /// Jump to a known-valid position (search results). Clamps defensively
    /// and refreshes the remembered column.
    pub fn set_cursor(&mut self, pos: Position) {
        let line = pos.line.min(self.lines.len() - 1);
        let byte = pos.byte.min(self.lines[line].len());
        self.cursor = Position::new(line, byte);
        self.sync_target_col();
    }

    // ------------------------------------------------------------------
    // Line-level operations (clipboard). Not recorded on the action log;
    // they cannot be undone.
    // ------------------------------------------------------------------

    /// Remove the cursor line and return it. Removing the only line leaves
    /// a single empty line in its place.
    pub fn remove_current_line(&mut self) -> (String, Damage) {
        let line = self.cursor.line;
        let removed = if self.lines.len() == 1 {
            std::mem::take(&mut self.lines[0])
        } else {
            self.lines.remove(line)
        };
        self.cursor.line = self.cursor.line.min(self.lines.len() - 1);
        self.cursor.byte = 0;
        self.modified = true;
        self.sync_target_col();
        trace!(target: "state.edit", line, "line_removed");
        (removed, Damage::FromLine(line))
    }

    /// Insert whole lines above the cursor line; the cursor keeps its line
    /// (now below the inserted block) at column 0.
    pub fn insert_lines_above(&mut self, new_lines: Vec<String>) -> Damage {
        if new_lines.is_empty() {
            return Damage::None;
        }
        let at = self.cursor.line;
        let count = new_lines.len();
        self.lines.splice(at..at, new_lines);
        self.cursor.line += count;
        self.cursor.byte = 0;
        self.modified = true;
        self.sync_target_col();
        trace!(target: "state.edit", at, count, "lines_inserted");
        Damage::FromLine(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(
            lines.iter().map(|s| s.to_string()).collect(),
            Metrics::default(),
        )
    }

    fn text(d: &Document) -> Vec<String> {
        d.lines().to_vec()
    }

    #[test]
    fn insert_advances_cursor_and_records() {
        let mut d = doc(&["hello"]);
        d.set_cursor(Position::new(0, 5));
        let damage = d.insert_text("!!");
        assert_eq!(text(&d), vec!["hello!!"]);
        assert_eq!(d.cursor(), Position::new(0, 7));
        assert_eq!(damage, Damage::Line(0));
        assert!(d.is_modified());
        assert_eq!(d.undo_depth(), 1);
    }

    #[test]
    fn backspace_removes_exactly_one_multibyte_char() {
        let mut d = doc(&["né"]);
        d.set_cursor(Position::new(0, 3));
        d.delete_backward();
        assert_eq!(text(&d), vec!["n"]);
        assert_eq!(d.cursor(), Position::new(0, 1));
    }

    #[test]
    fn backspace_at_line_start_joins_onto_previous() {
        let mut d = doc(&["hello", "world"]);
        d.set_cursor(Position::new(1, 0));
        let damage = d.delete_backward();
        assert_eq!(text(&d), vec!["helloworld"]);
        assert_eq!(d.cursor(), Position::new(0, 5));
        assert_eq!(damage, Damage::FromLine(0));
    }

    #[test]
    fn backspace_at_document_start_is_noop() {
        let mut d = doc(&["hello"]);
        let damage = d.delete_backward();
        assert_eq!(damage, Damage::None);
        assert_eq!(d.undo_depth(), 0);
        assert!(!d.is_modified());
    }

    #[test]
    fn delete_forward_at_eol_joins_next_line_up() {
        let mut d = doc(&["ab", "cd"]);
        d.set_cursor(Position::new(0, 2));
        d.delete_forward();
        assert_eq!(text(&d), vec!["abcd"]);
        assert_eq!(d.cursor(), Position::new(0, 2));
    }

    #[test]
    fn delete_forward_at_document_end_is_noop() {
        let mut d = doc(&["ab"]);
        d.set_cursor(Position::new(0, 2));
        assert_eq!(d.delete_forward(), Damage::None);
        assert_eq!(d.undo_depth(), 0);
    }

    #[test]
    fn split_line_carries_indent_past_cursor() {
        let mut d = doc(&["    value = 1"]);
        d.set_cursor(Position::new(0, 12));
        d.split_line();
        assert_eq!(text(&d), vec!["    value = ", "    1"]);
        assert_eq!(d.cursor(), Position::new(1, 4));
        // split plus indent insert
        assert_eq!(d.undo_depth(), 2);
    }

    #[test]
    fn split_at_eol_leaves_indent_only_line() {
        let mut d = doc(&["  foo"]);
        d.set_cursor(Position::new(0, 5));
        d.split_line();
        assert_eq!(text(&d), vec!["  foo", "  "]);
        assert_eq!(d.cursor(), Position::new(1, 2));
    }

    #[test]
    fn split_then_backspace_restores_single_line() {
        let mut d = doc(&["hello"]);
        d.set_cursor(Position::new(0, 5));
        d.split_line();
        assert_eq!(text(&d), vec!["hello", ""]);
        assert_eq!(d.cursor(), Position::new(1, 0));
        assert_eq!(d.undo_depth(), 1);
        d.delete_backward();
        assert_eq!(text(&d), vec!["hello"]);
        assert_eq!(d.cursor(), Position::new(0, 5));
    }

    #[test]
    fn unwinding_the_undo_stack_restores_bytes_exactly() {
        let original = ["    fn main() {", "    }"];
        let mut d = doc(&original);
        d.set_cursor(Position::new(0, 15));
        d.split_line(); // indented: two entries
        d.insert_text("let x = 1;");
        d.set_cursor(Position::new(1, 4));
        d.delete_backward();
        d.delete_forward();
        d.set_cursor(Position::new(0, 15));
        d.split_line();
        while d.undo().is_some() {}
        assert_eq!(text(&d), original.to_vec());
        assert_eq!(d.undo_depth(), 0);
    }

    #[test]
    fn redo_restores_pre_undo_state_and_cursor() {
        let mut d = doc(&["hello"]);
        d.set_cursor(Position::new(0, 5));
        d.insert_text(" world");
        let after = text(&d);
        let cursor_after = d.cursor();
        assert!(d.undo().is_some());
        assert_eq!(text(&d), vec!["hello"]);
        assert!(d.redo().is_some());
        assert_eq!(text(&d), after);
        assert_eq!(d.cursor(), cursor_after);
        assert_eq!(d.undo_depth(), 1);
        assert_eq!(d.redo_depth(), 0);
    }

    #[test]
    fn undo_cursor_follows_the_applied_primitive() {
        let mut d = doc(&[""]);
        d.insert_text("ab");
        // undo applies Delete(0, 0, "ab"): cursor at the deletion point
        d.undo();
        assert_eq!(d.cursor(), Position::new(0, 0));
        // redo applies Insert(0, 0, "ab"): cursor past the text
        d.redo();
        assert_eq!(d.cursor(), Position::new(0, 2));
    }

    #[test]
    fn fresh_edit_clears_redo() {
        let mut d = doc(&["abc"]);
        d.set_cursor(Position::new(0, 3));
        d.insert_text("d");
        d.undo();
        assert_eq!(d.redo_depth(), 1);
        d.insert_text("x");
        assert_eq!(d.redo_depth(), 0);
        assert!(d.redo().is_none());
    }

    #[test]
    fn undo_on_empty_stack_is_none() {
        let mut d = doc(&["abc"]);
        assert!(d.undo().is_none());
        assert!(d.redo().is_none());
    }

    #[test]
    fn vertical_motion_keeps_target_column() {
        let mut d = doc(&["abcdef", "ab", "abcdef"]);
        d.move_end();
        assert_eq!(d.cursor(), Position::new(0, 6));
        d.move_down();
        assert_eq!(d.cursor(), Position::new(1, 2));
        d.move_down();
        // snaps back out on the long line
        assert_eq!(d.cursor(), Position::new(2, 6));
    }

    #[test]
    fn vertical_motion_resolves_columns_through_tabs() {
        let mut d = doc(&["xxxxx", "a\tb"]);
        d.set_cursor(Position::new(0, 5)); // visual col 5
        d.move_down();
        // "a\tb": col 5 is past 'b' (cols 0,1-3,4); byte of col 5 clamps to 3
        assert_eq!(d.cursor(), Position::new(1, 3));
    }

    #[test]
    fn horizontal_motion_wraps_across_lines() {
        let mut d = doc(&["ab", "cd"]);
        d.set_cursor(Position::new(0, 2));
        d.move_right();
        assert_eq!(d.cursor(), Position::new(1, 0));
        d.move_left();
        assert_eq!(d.cursor(), Position::new(0, 2));
    }

    #[test]
    fn motion_stops_at_document_edges() {
        let mut d = doc(&["ab"]);
        d.move_left();
        assert_eq!(d.cursor(), Position::origin());
        d.move_up();
        assert_eq!(d.cursor(), Position::origin());
        d.set_cursor(Position::new(0, 2));
        d.move_right();
        d.move_down();
        assert_eq!(d.cursor(), Position::new(0, 2));
    }

    #[test]
    fn remove_line_keeps_document_nonempty() {
        let mut d = doc(&["only"]);
        let (removed, damage) = d.remove_current_line();
        assert_eq!(removed, "only");
        assert_eq!(damage, Damage::FromLine(0));
        assert_eq!(text(&d), vec![""]);
        assert_eq!(d.cursor(), Position::origin());
        assert!(d.is_modified());
        // and it is not undoable
        assert!(d.undo().is_none());
    }

    #[test]
    fn remove_last_line_clamps_cursor() {
        let mut d = doc(&["a", "b"]);
        d.set_cursor(Position::new(1, 1));
        let (removed, _) = d.remove_current_line();
        assert_eq!(removed, "b");
        assert_eq!(d.cursor(), Position::new(0, 0));
    }

    #[test]
    fn insert_lines_above_moves_cursor_below_block() {
        let mut d = doc(&["x", "y"]);
        d.set_cursor(Position::new(1, 1));
        let damage = d.insert_lines_above(vec!["one".into(), "two".into()]);
        assert_eq!(text(&d), vec!["x", "one", "two", "y"]);
        assert_eq!(d.cursor(), Position::new(3, 0));
        assert_eq!(damage, Damage::FromLine(1));
        assert!(d.undo().is_none());
    }

    #[test]
    fn modified_flag_lifecycle() {
        let mut d = doc(&["a"]);
        assert!(!d.is_modified());
        d.set_cursor(Position::new(0, 1));
        d.insert_text("b");
        assert!(d.is_modified());
        d.clear_modified();
        assert!(!d.is_modified());
        // undo mutates content, so it re-marks
        d.undo();
        assert!(d.is_modified());
    }

    #[test]
    fn empty_load_yields_one_empty_line() {
        let d = Document::from_lines(Vec::new(), Metrics::default());
        assert_eq!(d.line_count(), 1);
        assert_eq!(d.line(0), Some(""));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(String),
            Back,
            Fwd,
            Split,
            Move(usize, usize),
        }

        // ASCII-only scripts: Move picks raw byte offsets, and set_cursor
        // clamps to the line length, not to a char boundary.
        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                "[a-z ]{1,5}".prop_map(Op::Insert),
                Just(Op::Back),
                Just(Op::Fwd),
                Just(Op::Split),
                (0usize..8, 0usize..16).prop_map(|(line, byte)| Op::Move(line, byte)),
            ]
        }

        proptest! {
            /// Unwinding the whole undo stack after any edit script restores
            /// the original lines byte for byte.
            #[test]
            fn unwinding_any_edit_script_restores_the_original(
                ops in prop::collection::vec(op(), 0..40),
            ) {
                let original = vec![
                    "fn main() {".to_string(),
                    "    body();".to_string(),
                    "}".to_string(),
                ];
                let mut d = Document::from_lines(original.clone(), Metrics::default());
                for op in ops {
                    match op {
                        Op::Insert(s) => {
                            d.insert_text(&s);
                        }
                        Op::Back => {
                            d.delete_backward();
                        }
                        Op::Fwd => {
                            d.delete_forward();
                        }
                        Op::Split => {
                            d.split_line();
                        }
                        Op::Move(line, byte) => d.set_cursor(Position::new(line, byte)),
                    }
                }
                while d.undo().is_some() {}
                prop_assert_eq!(d.lines(), &original[..]);
                prop_assert_eq!(d.undo_depth(), 0);
            }

            /// An undo/redo pair after any script leaves the content exactly
            /// as it was.
            #[test]
            fn redo_after_undo_is_identity(
                ops in prop::collection::vec(op(), 1..20),
            ) {
                let mut d = Document::from_lines(
                    vec!["seed line".to_string()],
                    Metrics::default(),
                );
                for op in ops {
                    match op {
                        Op::Insert(s) => {
                            d.insert_text(&s);
                        }
                        Op::Back => {
                            d.delete_backward();
                        }
                        Op::Fwd => {
                            d.delete_forward();
                        }
                        Op::Split => {
                            d.split_line();
                        }
                        Op::Move(line, byte) => d.set_cursor(Position::new(line, byte)),
                    }
                }
                let lines_before = d.lines().to_vec();
                if d.undo().is_some() {
                    d.redo().expect("redo after undo");
                    prop_assert_eq!(d.lines(), &lines_before[..]);
                }
            }
        }
    }
}
