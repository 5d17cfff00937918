//! Reversible edit log: four primitive actions and the two stacks that
//! replay them.
//!
//! Every editing operation reduces to a sequence of `Action`s, and every
//! `Action` has a total inverse, so the stacks never need to understand the
//! operations that produced them. Entries on both stacks are *undoing*
//! actions: popping a stack and applying the entry reverses the most recent
//! step in that direction, and the entry's inverse lands on the opposite
//! stack so the step can be walked back again.

use tracing::trace;

/// Maximum number of entries retained on the undo stack. The oldest entry
/// drops first once the cap is reached.
pub const UNDO_HISTORY_MAX: usize = 200;

/// A reversible primitive mutation of the line store.
///
/// `Insert` and `Delete` carry the affected text; `Split` and `Join` carry
/// the seam position. Line-level operations (whole-line cut/paste) sit
/// outside this union and are not replayable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Splice `text` into line `line` at byte offset `byte`. Applying leaves
    /// the cursor just past the inserted text.
    Insert {
        line: usize,
        byte: usize,
        text: String,
    },
    /// Remove `text.len()` bytes (which must equal `text`) from line `line`
    /// at `byte`. Applying leaves the cursor at the deletion point.
    Delete {
        line: usize,
        byte: usize,
        text: String,
    },
    /// Cut line `line` at `byte`; the right part becomes line `line + 1`.
    /// Applying leaves the cursor at the start of the new line.
    Split { line: usize, byte: usize },
    /// Merge line `line` onto the end of line `line - 1`. `byte` is the seam
    /// offset — the length of line `line - 1` before the merge — which is
    /// exactly where a reversing `Split` must cut. Applying leaves the
    /// cursor at the seam.
    Join { line: usize, byte: usize },
}

impl Action {
    /// The action that exactly reverses this one.
    ///
    /// A `Join` at line 0 has no line above it and is never constructed by
    /// the editor; its inverse saturates at line 0 rather than wrapping.
    pub fn inverse(&self) -> Action {
        match self {
            Action::Insert { line, byte, text } => Action::Delete {
                line: *line,
                byte: *byte,
                text: text.clone(),
            },
            Action::Delete { line, byte, text } => Action::Insert {
                line: *line,
                byte: *byte,
                text: text.clone(),
            },
            Action::Split { line, byte } => Action::Join {
                line: line + 1,
                byte: *byte,
            },
            Action::Join { line, byte } => Action::Split {
                line: line.saturating_sub(1),
                byte: *byte,
            },
        }
    }

    /// Short label for trace output.
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Action::Insert { .. } => "insert",
            Action::Delete { .. } => "delete",
            Action::Split { .. } => "split",
            Action::Join { .. } => "join",
        }
    }
}

/// The undo and redo stacks.
///
/// `record` is the only entry point for new edits; it clears the redo stack
/// so a fresh edit always invalidates the redone future. The raw push/pop
/// accessors exist for the document's undo/redo walk, which moves entries
/// between stacks without re-recording.
#[derive(Debug, Default)]
pub struct ActionLog {
    undo: Vec<Action>,
    redo: Vec<Action>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Record the undoing action for a fresh edit.
    pub fn record(&mut self, undoer: Action) {
        trace!(
            target: "state.undo",
            kind = undoer.label(),
            undo_depth = self.undo.len() + 1,
            "record"
        );
        self.undo.push(undoer);
        if self.undo.len() > UNDO_HISTORY_MAX {
            self.undo.remove(0);
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
        if !self.redo.is_empty() {
            self.redo.clear();
            trace!(target: "state.undo", "redo_cleared_on_new_edit");
        }
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Action> {
        self.undo.pop()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Action> {
        self.redo.pop()
    }

    /// Push onto the undo stack without disturbing the redo stack (the redo
    /// walk's half of the exchange).
    pub(crate) fn push_undo(&mut self, action: Action) {
        self.undo.push(action);
    }

    pub(crate) fn push_redo(&mut self, action: Action) {
        self.redo.push(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_delete_invert_each_other() {
        let a = Action::Insert {
            line: 2,
            byte: 5,
            text: "abc".into(),
        };
        let inv = a.inverse();
        assert_eq!(
            inv,
            Action::Delete {
                line: 2,
                byte: 5,
                text: "abc".into()
            }
        );
        assert_eq!(inv.inverse(), a);
    }

    #[test]
    fn split_inverse_joins_the_new_line() {
        let a = Action::Split { line: 4, byte: 7 };
        assert_eq!(a.inverse(), Action::Join { line: 5, byte: 7 });
        assert_eq!(a.inverse().inverse(), a);
    }

    #[test]
    fn join_at_line_zero_saturates() {
        // never constructed by edits, but inverse stays total
        let a = Action::Join { line: 0, byte: 3 };
        assert_eq!(a.inverse(), Action::Split { line: 0, byte: 3 });
    }

    #[test]
    fn record_clears_redo() {
        let mut log = ActionLog::new();
        log.push_redo(Action::Split { line: 0, byte: 0 });
        assert_eq!(log.redo_depth(), 1);
        log.record(Action::Join { line: 1, byte: 0 });
        assert_eq!(log.undo_depth(), 1);
        assert_eq!(log.redo_depth(), 0);
    }

    #[test]
    fn history_cap_drops_oldest_entry() {
        let mut log = ActionLog::new();
        for i in 0..UNDO_HISTORY_MAX + 5 {
            log.record(Action::Insert {
                line: 0,
                byte: i,
                text: "x".into(),
            });
        }
        assert_eq!(log.undo_depth(), UNDO_HISTORY_MAX);
        // the oldest surviving entry is the sixth one recorded
        let oldest = log.undo.first().cloned();
        assert_eq!(
            oldest,
            Some(Action::Insert {
                line: 0,
                byte: 5,
                text: "x".into()
            })
        );
    }
}
