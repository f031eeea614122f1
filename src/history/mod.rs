//! Grouped undo/redo journal
//!
//! The journal is a flat record list with group markers:
//! - every mutation appends an `Insert` or `Delete` record with owned text
//! - `begin_group`/`end_group` nest; only the outermost pair emits markers
//! - a cursor snapshot is taken on both sides of a group
//! - groups that end up empty are popped so undo never replays a no-op
//!
//! Replay itself is driven by the buffer (it owns the line store); the
//! journal owns the records, the replay cursor, and the clean index that
//! backs the `modified` flag.

use crate::position::Range;
use crate::view::Cursor;

/// One journal record
#[derive(Debug, Clone, PartialEq)]
pub enum UndoAction {
    /// Text was inserted producing `range`; `range.a` is the insertion point
    Insert {
        range: Range,
        text: String,
        cursor_hint: Option<usize>,
    },
    /// `text` was removed from `range`
    Delete {
        range: Range,
        text: String,
        cursor_hint: Option<usize>,
    },
    /// The cursor array at this point
    CursorSnapshot { cursors: Vec<Cursor> },
    GroupBegin,
    GroupEnd,
}

/// Undo journal for one buffer
#[derive(Debug, Default)]
pub struct Journal {
    actions: Vec<UndoAction>,
    /// Index just past the last applied action
    next: usize,
    /// Nesting depth of begin_group/end_group
    group_depth: usize,
    /// Journal suppression depth; nonzero while undo/redo replays
    disabled: usize,
    /// Value of `next` when the buffer was last written out
    clean: Option<usize>,
}

impl Journal {
    #[must_use]
    pub fn new() -> Self {
        Journal {
            actions: Vec::new(),
            next: 0,
            group_depth: 0,
            disabled: 0,
            clean: Some(0),
        }
    }

    #[must_use]
    pub fn actions(&self) -> &[UndoAction] {
        &self.actions
    }

    #[must_use]
    pub fn next_index(&self) -> usize {
        self.next
    }

    pub(crate) fn set_next_index(&mut self, next: usize) {
        self.next = next;
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled > 0
    }

    /// Suppress journaling while replaying
    pub fn disable(&mut self) {
        self.disabled += 1;
    }

    pub fn enable(&mut self) {
        debug_assert!(self.disabled > 0);
        self.disabled = self.disabled.saturating_sub(1);
    }

    #[must_use]
    pub fn in_group(&self) -> bool {
        self.group_depth > 0
    }

    /// Append a record, truncating any redo tail first
    pub fn push(&mut self, action: UndoAction) {
        if self.disabled > 0 {
            return;
        }

        if self.next < self.actions.len() {
            // dropping the redo tail invalidates a clean index inside it
            if let Some(clean) = self.clean {
                if clean > self.next {
                    self.clean = None;
                }
            }
            self.actions.truncate(self.next);
        }
        self.actions.push(action);
        self.next += 1;
    }

    /// Open a group. Only the outermost call emits markers.
    pub fn begin_group(&mut self, cursors: &[Cursor]) {
        if self.disabled > 0 {
            return;
        }
        if self.group_depth == 0 {
            self.push(UndoAction::GroupBegin);
            self.push(UndoAction::CursorSnapshot {
                cursors: cursors.to_vec(),
            });
        }
        self.group_depth += 1;
    }

    /// Close a group. On the outermost close, either pops the group if
    /// nothing happened, or seals it and returns the clipboard payload for
    /// delete-only groups (see `clipboard_of_group`).
    pub fn end_group(&mut self, cursors: &[Cursor]) -> Option<String> {
        if self.disabled > 0 {
            return None;
        }
        debug_assert!(self.group_depth > 0);
        if self.group_depth == 0 {
            return None;
        }
        self.group_depth -= 1;
        if self.group_depth > 0 {
            return None;
        }

        // check whether anything actually happened since the opening pair
        let unchanged = match (
            self.actions.get(self.next.wrapping_sub(1)),
            self.actions.get(self.next.wrapping_sub(2)),
        ) {
            (Some(UndoAction::CursorSnapshot { cursors: snap }), Some(UndoAction::GroupBegin)) => {
                snap.as_slice() == cursors
            }
            _ => false,
        };
        if unchanged {
            self.actions.truncate(self.next - 2);
            self.next -= 2;
            return None;
        }

        self.push(UndoAction::CursorSnapshot {
            cursors: cursors.to_vec(),
        });
        self.push(UndoAction::GroupEnd);
        self.clipboard_of_group()
    }

    /// Clipboard payload of the group that just closed: if the group holds
    /// no inserts, the delete records with a cursor hint are concatenated
    /// per cursor and the per-cursor strings joined with newlines. Deleting
    /// and yanking share this one mechanism.
    fn clipboard_of_group(&self) -> Option<String> {
        debug_assert!(matches!(self.actions.get(self.next - 1), Some(UndoAction::GroupEnd)));

        // find the opening marker
        let mut begin = self.next - 1;
        while !matches!(self.actions[begin - 1], UndoAction::GroupBegin) {
            begin -= 1;
        }

        let entering = match &self.actions[begin] {
            UndoAction::CursorSnapshot { cursors } => cursors.len(),
            _ => return None,
        };

        let mut clips: Vec<String> = vec![String::new(); entering];
        let mut filled = false;
        for action in &self.actions[begin..self.next - 1] {
            match action {
                UndoAction::Insert { .. } => return None,
                UndoAction::Delete {
                    text,
                    cursor_hint: Some(idx),
                    ..
                } => {
                    if let Some(clip) = clips.get_mut(*idx) {
                        clip.push_str(text);
                        filled = true;
                    }
                }
                _ => {}
            }
        }

        if filled {
            Some(clips.join("\n"))
        } else {
            None
        }
    }

    /// Record the current position as the on-disk state
    pub fn mark_clean(&mut self) {
        self.clean = Some(self.next);
    }

    /// True when the buffer diverges from its on-disk state
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.clean != Some(self.next)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.next > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.next < self.actions.len()
    }
}
