//! Buffer views
//! A view is a cursor set over one buffer plus the jumplist that records
//! where the user came from.
//!
//! ## view/ Invariants
//!
//! - A view always has at least one cursor.
//! - Cursors are deduplicated; two cursors on one position collapse.
//! - Vertical motion resolves the ghost column; horizontal motion sets it.
//! - Every cursor satisfies the buffer position invariant after any motion.

use crate::buffer::{Buffer, BufferId};
use crate::position::{from_visual_x, visual_x, Pos};

/// The column a cursor wants on vertical motion: the visual column last set
/// by horizontal movement, or a snap-to-edge sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ghost {
    /// Visual column
    Col(usize),
    /// Snap to end of line on every vertical move
    Eol,
    /// Snap to the first non-blank column on every vertical move
    Bol,
}

/// A caret in a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub pos: Pos,
    pub ghost: Ghost,
}

impl Cursor {
    #[must_use]
    pub fn new(x: usize, y: usize) -> Self {
        Cursor {
            pos: Pos::new(x, y),
            ghost: Ghost::Col(x),
        }
    }

    #[must_use]
    pub fn at(pos: Pos) -> Self {
        Cursor {
            pos,
            ghost: Ghost::Col(pos.x),
        }
    }
}

/// First non-whitespace column of line `y`
#[must_use]
pub fn begin_of_line(buffer: &Buffer, y: usize) -> usize {
    let line = buffer.line(y);
    let mut x = 0;
    while let Some(c) = line.char_at(x) {
        if !c.is_whitespace() {
            break;
        }
        x += 1;
    }
    x
}

/// A cursor set over one buffer, with jumplist
#[derive(Debug, Clone)]
pub struct BufferView {
    pub buffer: BufferId,
    pub cursors: Vec<Cursor>,
    pub jumplist: Vec<Pos>,
    /// Index into the jumplist for forward/backward traversal
    pub jumplist_pos: usize,
    /// Length of the buffer's edit log this view has replayed
    pub synced_edits: usize,
}

impl BufferView {
    #[must_use]
    pub fn new(buffer: BufferId) -> Self {
        BufferView {
            buffer,
            cursors: vec![Cursor::new(0, 0)],
            jumplist: Vec::new(),
            jumplist_pos: 0,
            synced_edits: 0,
        }
    }

    #[must_use]
    pub fn primary(&self) -> Cursor {
        self.cursors[0]
    }

    // =========================================================================
    // Cursor maintenance
    // =========================================================================

    /// Drop every cursor but the first
    pub fn collapse_cursors(&mut self) {
        self.cursors.truncate(1);
    }

    /// Remove cursors that share a position
    pub fn deduplicate_cursors(&mut self) {
        let mut i = 0;
        while i < self.cursors.len() {
            let mut j = i + 1;
            while j < self.cursors.len() {
                if self.cursors[i].pos == self.cursors[j].pos {
                    self.cursors.swap_remove(j);
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
    }

    /// Replay buffer edits applied through other views
    pub fn sync(&mut self, buffer: &Buffer) {
        self.sync_with(buffer, false);
    }

    /// Replay pending edits. The acting view's cursors were repaired by
    /// the mutation primitives themselves and must not shift twice; it
    /// passes `skip_cursors` and only its jumplist catches up.
    pub fn sync_with(&mut self, buffer: &Buffer, skip_cursors: bool) {
        let log = buffer.edit_log();
        for span in &log[self.synced_edits.min(log.len())..] {
            if !skip_cursors {
                for c in &mut self.cursors {
                    buffer.apply_span_to_cursor(*span, c);
                }
            }
            for p in &mut self.jumplist {
                Buffer::apply_span_to_pos(*span, p);
            }
        }
        self.synced_edits = log.len();
        self.deduplicate_cursors();
    }

    // =========================================================================
    // Motions
    // =========================================================================

    pub fn move_to_y(&mut self, buffer: &Buffer, idx: usize, y: usize) {
        let y = y.min(buffer.num_lines() - 1);
        let line = buffer.line(y).as_str();
        let x = match self.cursors[idx].ghost {
            Ghost::Eol => buffer.line(y).len(),
            Ghost::Bol => begin_of_line(buffer, y),
            Ghost::Col(vx) => from_visual_x(line, vx, buffer.tab_width),
        };
        self.cursors[idx].pos = Pos::new(x.min(buffer.line(y).len()), y);
    }

    pub fn move_to_x(&mut self, buffer: &Buffer, idx: usize, x: usize) {
        let y = self.cursors[idx].pos.y;
        let x = x.min(buffer.line(y).len());
        self.cursors[idx].pos.x = x;
        self.cursors[idx].ghost = Ghost::Col(visual_x(buffer.line(y).as_str(), x, buffer.tab_width));
    }

    /// Collapse to one cursor and place it
    pub fn move_to(&mut self, buffer: &Buffer, p: Pos) {
        self.collapse_cursors();
        self.move_cursor_to(buffer, 0, p);
    }

    /// Place one cursor. Call `deduplicate_cursors` after a batch.
    pub fn move_cursor_to(&mut self, buffer: &Buffer, idx: usize, p: Pos) {
        self.move_to_y(buffer, idx, p.y);
        self.move_to_x(buffer, idx, p.x);
    }

    pub fn move_y_cursor(&mut self, buffer: &Buffer, idx: usize, dy: i64) {
        if dy == 0 {
            return;
        }
        let pos = self.cursors[idx].pos;
        let y = (pos.y as i64 + dy).clamp(0, buffer.num_lines() as i64 - 1) as usize;
        let line = buffer.line(y).as_str();
        let x = match self.cursors[idx].ghost {
            Ghost::Eol => buffer.line(y).len(),
            Ghost::Bol => begin_of_line(buffer, y),
            Ghost::Col(vx) => from_visual_x(line, vx, buffer.tab_width),
        };
        self.cursors[idx].pos = Pos::new(x, y);
    }

    pub fn move_x_cursor(&mut self, buffer: &Buffer, idx: usize, dx: i64) {
        if dx == 0 {
            return;
        }
        let y = self.cursors[idx].pos.y;
        let len = buffer.line(y).len();
        let x = (self.cursors[idx].pos.x as i64 + dx).clamp(0, len as i64) as usize;
        self.cursors[idx].pos.x = x;
        self.cursors[idx].ghost = Ghost::Col(visual_x(buffer.line(y).as_str(), x, buffer.tab_width));
    }

    pub fn move_y(&mut self, buffer: &Buffer, dy: i64) {
        for i in 0..self.cursors.len() {
            self.move_y_cursor(buffer, i, dy);
        }
        self.deduplicate_cursors();
    }

    pub fn move_x(&mut self, buffer: &Buffer, dx: i64) {
        for i in 0..self.cursors.len() {
            self.move_x_cursor(buffer, i, dx);
        }
        self.deduplicate_cursors();
    }

    /// Step every cursor forward one position, crossing line ends
    pub fn advance(&mut self, buffer: &Buffer) {
        for i in 0..self.cursors.len() {
            let mut p = self.cursors[i].pos;
            buffer.advance(&mut p);
            self.move_cursor_to(buffer, i, p);
        }
        self.deduplicate_cursors();
    }

    pub fn advance_r(&mut self, buffer: &Buffer) {
        for i in 0..self.cursors.len() {
            let mut p = self.cursors[i].pos;
            buffer.advance_r(&mut p);
            self.move_cursor_to(buffer, i, p);
        }
        self.deduplicate_cursors();
    }

    /// To the first non-blank column; ghost snaps to BOL
    pub fn goto_beginline(&mut self, buffer: &Buffer) {
        for i in 0..self.cursors.len() {
            let x = begin_of_line(buffer, self.cursors[i].pos.y);
            self.move_to_x(buffer, i, x);
            self.cursors[i].ghost = Ghost::Bol;
        }
        self.deduplicate_cursors();
    }

    /// To end of line; ghost snaps to EOL
    pub fn goto_endline(&mut self, buffer: &Buffer) {
        for i in 0..self.cursors.len() {
            let y = self.cursors[i].pos.y;
            self.move_to_x(buffer, i, buffer.line(y).len());
            self.cursors[i].ghost = Ghost::Eol;
        }
        self.deduplicate_cursors();
    }

    /// Word motion forward, vi-style `w`
    pub fn move_word(&mut self, buffer: &Buffer) {
        for i in 0..self.cursors.len() {
            let mut p = self.cursors[i].pos;
            let class = |c: char| {
                if c.is_whitespace() {
                    0
                } else if c.is_alphanumeric() || c == '_' {
                    1
                } else {
                    2
                }
            };
            let start = buffer.char_at(p).map(class).unwrap_or(0);
            if start != 0 {
                while buffer.char_at(p).map(class) == Some(start) {
                    if !buffer.advance(&mut p) {
                        break;
                    }
                }
            }
            while buffer.char_at(p).map(class) == Some(0) {
                if !buffer.advance(&mut p) {
                    break;
                }
            }
            self.move_cursor_to(buffer, i, p);
        }
        self.deduplicate_cursors();
    }

    /// Word motion backward, vi-style `b`
    pub fn move_word_r(&mut self, buffer: &Buffer) {
        for i in 0..self.cursors.len() {
            let mut p = self.cursors[i].pos;
            if !buffer.advance_r(&mut p) {
                self.move_cursor_to(buffer, i, p);
                continue;
            }
            let class = |c: char| {
                if c.is_whitespace() {
                    0
                } else if c.is_alphanumeric() || c == '_' {
                    1
                } else {
                    2
                }
            };
            while buffer.char_at(p).map(class) == Some(0) {
                if !buffer.advance_r(&mut p) {
                    break;
                }
            }
            let target = buffer.char_at(p).map(class);
            if target.is_some() && target != Some(0) {
                loop {
                    let mut prev = p;
                    if !buffer.advance_r(&mut prev) {
                        break;
                    }
                    if buffer.char_at(prev).map(class) != target {
                        break;
                    }
                    p = prev;
                }
            }
            self.move_cursor_to(buffer, i, p);
        }
        self.deduplicate_cursors();
    }

    // =========================================================================
    // Find
    // =========================================================================

    /// Forward find with the primary cursor only
    pub fn find_and_move(&mut self, buffer: &Buffer, needle: &str, stay: bool) -> bool {
        self.collapse_cursors();
        let mut p = self.cursors[0].pos;
        if !buffer.find(needle, stay, &mut p) {
            return false;
        }
        self.move_to(buffer, p);
        true
    }

    pub fn find_and_move_r(&mut self, buffer: &Buffer, needle: &str, stay: bool) -> bool {
        self.collapse_cursors();
        let mut p = self.cursors[0].pos;
        if !buffer.find_r(needle, stay, &mut p) {
            return false;
        }
        self.move_to(buffer, p);
        true
    }

    // =========================================================================
    // Jumplist
    // =========================================================================

    /// Record the primary cursor; consecutive duplicates are dropped
    pub fn jumplist_push(&mut self) {
        let pos = self.cursors[0].pos;
        if self.jumplist_pos > 0 && self.jumplist[self.jumplist_pos - 1] == pos {
            return;
        }
        self.jumplist.truncate(self.jumplist_pos);
        self.jumplist.push(pos);
        self.jumplist_pos += 1;
    }

    /// Walk back in the jumplist, skipping entries equal to the cursor
    pub fn jumplist_prev(&mut self, buffer: &Buffer) {
        if self.jumplist.is_empty() || self.jumplist_pos == 0 {
            return;
        }
        self.collapse_cursors();
        self.jumplist_pos -= 1;
        let mut p = self.jumplist[self.jumplist_pos];
        while p == self.cursors[0].pos && self.jumplist_pos > 0 {
            self.jumplist_pos -= 1;
            p = self.jumplist[self.jumplist_pos];
        }
        self.move_to(buffer, p);
    }

    /// Walk forward in the jumplist
    pub fn jumplist_next(&mut self, buffer: &Buffer) {
        if self.jumplist_pos >= self.jumplist.len() {
            return;
        }
        self.collapse_cursors();
        let mut p = self.jumplist[self.jumplist_pos];
        self.jumplist_pos += 1;
        while p == self.cursors[0].pos && self.jumplist_pos < self.jumplist.len() {
            p = self.jumplist[self.jumplist_pos];
            self.jumplist_pos += 1;
        }
        self.move_to(buffer, p);
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
