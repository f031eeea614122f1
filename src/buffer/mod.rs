//! Buffer core
//! Line-oriented text storage with mutation primitives, cursor repair,
//! grouped undo/redo, and language-aware auto-indent.
//!
//! ## buffer/ Invariants
//!
//! - `lines` is never empty; the minimum state is one empty line.
//! - Every anchored position satisfies `y < lines.len()` and
//!   `x <= lines[y].len()` after any mutation.
//! - Endline bytes are never stored in lines; they are re-emitted on save.
//! - Mutations never fail: no-op inputs return silently, invalid positions
//!   are clamped (and logged as invariant events).

pub mod line;

use crate::constants::editing::{DEFAULT_TAB_TYPE, DEFAULT_TAB_WIDTH};
use crate::constants::ui::HIGHLIGHT_FADE_STEP;
use crate::history::{Journal, UndoAction};
use crate::parse::{self, Language, ParseResult, TokenKind};
use crate::position::{visual_x, Pos, Range};
use crate::view::{Cursor, Ghost};
use line::Line;
use std::path::{Path, PathBuf};

/// Index of a buffer in the editor's buffer table
pub type BufferId = usize;

/// Endline convention re-emitted on save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endline {
    Lf,
    Crlf,
}

impl Endline {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Endline::Lf => "\n",
            Endline::Crlf => "\r\n",
        }
    }
}

/// Transient visual range used for paste and yank flashes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub range: Range,
    pub fade: f32,
}

/// One applied mutation span, kept until every view has replayed it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSpan {
    Insert { a: Pos, b: Pos },
    Delete { a: Pos, b: Pos },
}

/// A text buffer: the line store plus everything anchored in it
pub struct Buffer {
    pub lines: Vec<Line>,
    /// Path the buffer is bound to; anonymous buffers carry only a name
    pub filename: Option<PathBuf>,
    /// Display name for anonymous buffers
    pub name: String,
    pub language: Language,
    pub endline: Endline,
    /// 0 = hard tabs, N > 0 = N spaces per indent unit
    pub tab_type: usize,
    /// Visual width of a tab character
    pub tab_width: usize,
    pub parser: ParseResult,
    pub highlights: Vec<Highlight>,
    pub journal: Journal,
    /// Mutation spans not yet replayed onto non-acting views
    edit_log: Vec<EditSpan>,
    /// Clipboard payload produced by the last delete-only group
    pending_clipboard: Option<String>,
    pub read_only: bool,
}

impl Buffer {
    /// Create an anonymous scratch buffer with a single empty line
    #[must_use]
    pub fn scratch(name: &str) -> Self {
        Buffer {
            lines: vec![Line::new()],
            filename: None,
            name: name.to_string(),
            language: Language::Text,
            endline: Endline::Lf,
            tab_type: DEFAULT_TAB_TYPE,
            tab_width: DEFAULT_TAB_WIDTH,
            parser: ParseResult::default(),
            highlights: Vec::new(),
            journal: Journal::new(),
            edit_log: Vec::new(),
            pending_clipboard: None,
            read_only: false,
        }
    }

    /// Build a buffer from loaded content. Used by file loading and tests.
    #[must_use]
    pub fn from_lines(lines: Vec<String>, language: Language, endline: Endline) -> Self {
        let mut lines: Vec<Line> = lines.iter().map(|s| Line::from_str(s)).collect();
        if lines.is_empty() {
            lines.push(Line::new());
        }
        let mut buffer = Buffer {
            lines,
            filename: None,
            name: String::new(),
            language,
            endline,
            tab_type: DEFAULT_TAB_TYPE,
            tab_width: DEFAULT_TAB_WIDTH,
            parser: ParseResult::default(),
            highlights: Vec::new(),
            journal: Journal::new(),
            edit_log: Vec::new(),
            pending_clipboard: None,
            read_only: false,
        };
        buffer.guess_tab_type();
        buffer.parse();
        buffer
    }

    #[must_use]
    pub fn is_bound_to_file(&self) -> bool {
        self.filename.is_some()
    }

    /// Display name: file name or the anonymous name
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.filename {
            Some(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
            None => self.name.clone(),
        }
    }

    #[must_use]
    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn line(&self, y: usize) -> &Line {
        &self.lines[y]
    }

    /// True when the buffer is the minimum single empty line
    #[must_use]
    pub fn is_empty_text(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    #[must_use]
    pub fn modified(&self) -> bool {
        self.journal.is_modified()
    }

    // =========================================================================
    // Position helpers
    // =========================================================================

    /// Clamp a position to the buffer. Out-of-bounds input is a bug in the
    /// caller; the clamp keeps release builds consistent and logs the event.
    #[must_use]
    pub fn clamp_pos(&self, p: Pos) -> Pos {
        if p.y >= self.lines.len() {
            log::warn!("position {} beyond last line {}", p, self.lines.len() - 1);
            let y = self.lines.len() - 1;
            return Pos::new(self.lines[y].len(), y);
        }
        let len = self.lines[p.y].len();
        if p.x > len {
            log::warn!("column {} beyond line {} length {}", p.x, p.y, len);
            return Pos::new(len, p.y);
        }
        p
    }

    /// Clamp a mutation endpoint. `(0, lines.len())` is allowed as the
    /// exclusive end of a whole-line range.
    fn clamp_end(&self, p: Pos) -> Pos {
        if p.y >= self.lines.len() {
            return Pos::new(0, self.lines.len());
        }
        let len = self.lines[p.y].len();
        if p.x > len {
            return Pos::new(len, p.y);
        }
        p
    }

    /// Step to the next legal position, crossing line ends. Returns false
    /// when already at the very end.
    pub fn advance(&self, p: &mut Pos) -> bool {
        if p.x < self.lines[p.y].len() {
            p.x += 1;
            return true;
        }
        if p.y + 1 < self.lines.len() {
            *p = Pos::new(0, p.y + 1);
            return true;
        }
        false
    }

    /// Step to the previous legal position. Returns false at `(0, 0)`.
    pub fn advance_r(&self, p: &mut Pos) -> bool {
        if p.x > 0 {
            p.x -= 1;
            return true;
        }
        if p.y > 0 {
            *p = Pos::new(self.lines[p.y - 1].len(), p.y - 1);
            return true;
        }
        false
    }

    /// Character at a position; the virtual newline at end of line reads
    /// as '\n'
    #[must_use]
    pub fn char_at(&self, p: Pos) -> Option<char> {
        if p.y >= self.lines.len() {
            return None;
        }
        match self.lines[p.y].char_at(p.x) {
            Some(c) => Some(c),
            None if p.x == self.lines[p.y].len() => Some('\n'),
            None => None,
        }
    }

    /// Text of `[r.a, r.b)` with newlines between rows
    #[must_use]
    pub fn range_to_string(&self, r: Range) -> String {
        let r = Range::new(self.clamp_pos(r.a), self.clamp_end(r.b)).normalized();
        let (a, b) = (r.a, r.b);
        if a.y == b.y {
            return self.lines[a.y].slice(a.x, b.x).to_string();
        }
        let mut s = String::new();
        s.push_str(self.lines[a.y].slice(a.x, self.lines[a.y].len()));
        s.push('\n');
        for y in a.y + 1..b.y.min(self.lines.len()) {
            s.push_str(self.lines[y].as_str());
            s.push('\n');
        }
        if b.x > 0 && b.y < self.lines.len() {
            s.push_str(self.lines[b.y].slice(0, b.x));
        }
        s
    }

    /// Index of the token containing `p` (or the next one after it)
    #[must_use]
    pub fn token_at(&self, p: Pos) -> Option<usize> {
        let tokens = &self.parser.tokens;
        let mut lo = 0;
        let mut hi = tokens.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            if tokens[mid].b <= p {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        if lo < tokens.len() {
            Some(lo)
        } else {
            None
        }
    }

    /// Definition range whose name equals `name`
    #[must_use]
    pub fn definition_of(&self, name: &str) -> Option<Range> {
        self.parser
            .definitions
            .iter()
            .copied()
            .find(|r| self.range_to_string(*r) == name)
    }

    // =========================================================================
    // Find
    // =========================================================================

    /// Forward literal find from `*p`. With `stay` the match may begin at
    /// the current position, otherwise the scan starts one column later.
    pub fn find(&self, needle: &str, stay: bool, p: &mut Pos) -> bool {
        if needle.is_empty() {
            return false;
        }
        let mut x = p.x;
        if !stay {
            x += 1;
        }
        for y in p.y..self.lines.len() {
            if let Some(hit) = self.lines[y].find(needle, x) {
                *p = Pos::new(hit, y);
                return true;
            }
            x = 0;
        }
        false
    }

    /// Backward literal find from `*p`
    pub fn find_r(&self, needle: &str, stay: bool, p: &mut Pos) -> bool {
        if needle.is_empty() {
            return false;
        }
        // upto is exclusive: a match must begin before it
        let mut upto = if stay { p.x + 1 } else { p.x };
        let mut y = p.y;
        loop {
            if let Some(hit) = self.lines[y].rfind(needle, upto) {
                *p = Pos::new(hit, y);
                return true;
            }
            if y == 0 {
                return false;
            }
            y -= 1;
            upto = self.lines[y].len() + 1;
        }
    }

    // =========================================================================
    // Parse / highlights / edit log
    // =========================================================================

    /// Re-run the tokenizer over the whole buffer
    pub fn parse(&mut self) {
        self.parser = parse::parse(&self.lines, self.language);
    }

    pub fn highlight_range(&mut self, a: Pos, b: Pos) {
        let r = Range::new(a, b).normalized();
        self.highlights.push(Highlight { range: r, fade: 0.0 });
    }

    /// Advance highlight fades, dropping finished entries
    pub fn tick_highlights(&mut self) {
        for h in &mut self.highlights {
            h.fade += HIGHLIGHT_FADE_STEP;
        }
        self.highlights.retain(|h| h.fade < 1.0);
    }

    /// Spans applied since the last `clear_edit_log`
    #[must_use]
    pub fn edit_log(&self) -> &[EditSpan] {
        &self.edit_log
    }

    pub fn clear_edit_log(&mut self) {
        self.edit_log.clear();
    }

    /// Clipboard payload emitted by the last closed delete-only group
    pub fn take_clipboard(&mut self) -> Option<String> {
        self.pending_clipboard.take()
    }

    // =========================================================================
    // Cursor repair
    // =========================================================================

    pub(crate) fn move_pos_on_insert(p: &mut Pos, a: Pos, b: Pos) {
        if p.y == a.y && p.x >= a.x {
            p.y += b.y - a.y;
            p.x = b.x + (p.x - a.x);
        } else if p.y > a.y {
            p.y += b.y - a.y;
        }
    }

    pub(crate) fn move_pos_on_delete(p: &mut Pos, a: Pos, b: Pos) {
        if b <= a {
            return;
        }
        if a <= *p && *p <= b {
            // positions inside the range collapse to its start
            *p = a;
        } else if b.y > a.y && p.y > b.y {
            p.y -= b.y - a.y;
        } else if p.y == b.y && p.x + 1 >= b.x {
            // tail of the last deleted row migrates onto line a.y
            p.y = a.y;
            p.x = a.x + (p.x - b.x);
        }
    }

    /// Apply one logged span to a free position (jumplist entries, visual
    /// anchors, highlight endpoints)
    pub(crate) fn apply_span_to_pos(span: EditSpan, p: &mut Pos) {
        match span {
            EditSpan::Insert { a, b } => Self::move_pos_on_insert(p, a, b),
            EditSpan::Delete { a, b } => Self::move_pos_on_delete(p, a, b),
        }
    }

    /// Apply one logged span to a cursor, refreshing its ghost
    pub fn apply_span_to_cursor(&self, span: EditSpan, c: &mut Cursor) {
        Self::apply_span_to_pos(span, &mut c.pos);
        c.ghost = Ghost::Col(visual_x(
            self.lines[c.pos.y.min(self.lines.len() - 1)].as_str(),
            c.pos.x,
            self.tab_width,
        ));
    }

    /// Repair the acting cursor set and buffer-owned anchors after a span
    fn repair_after(&mut self, span: EditSpan, cursors: &mut [Cursor]) {
        for c in cursors.iter_mut() {
            Self::apply_span_to_pos(span, &mut c.pos);
            let y = c.pos.y.min(self.lines.len() - 1);
            c.ghost = Ghost::Col(visual_x(self.lines[y].as_str(), c.pos.x, self.tab_width));
        }
        let mut highlights = std::mem::take(&mut self.highlights);
        for h in &mut highlights {
            Self::apply_span_to_pos(span, &mut h.range.a);
            Self::apply_span_to_pos(span, &mut h.range.b);
        }
        self.highlights = highlights;
        self.edit_log.push(span);
    }

    // =========================================================================
    // Action grouping
    // =========================================================================

    pub fn action_begin(&mut self, cursors: &[Cursor]) {
        self.journal.begin_group(cursors);
    }

    pub fn action_end(&mut self, cursors: &[Cursor]) {
        if let Some(clip) = self.journal.end_group(cursors) {
            self.pending_clipboard = Some(clip);
        }
    }

    // =========================================================================
    // Mutation primitives
    // =========================================================================

    /// Insert `text` (may contain newlines) at `at`. Journals the span,
    /// repairs anchors, re-parses unless suppressed, and pushes a
    /// paste-flash highlight.
    pub fn insert(
        &mut self,
        cursors: &mut Vec<Cursor>,
        at: Pos,
        text: &str,
        cursor_hint: Option<usize>,
        re_parse: bool,
    ) {
        if text.is_empty() {
            return;
        }
        let a = self.clamp_pos(at);

        self.action_begin(cursors);

        let segments: Vec<&str> = text.split('\n').collect();
        let b = if segments.len() == 1 {
            Pos::new(a.x + segments[0].chars().count(), a.y)
        } else {
            Pos::new(
                segments[segments.len() - 1].chars().count(),
                a.y + segments.len() - 1,
            )
        };

        self.journal.push(UndoAction::Insert {
            range: Range::new(a, b),
            text: text.to_string(),
            cursor_hint,
        });

        if segments.len() == 1 {
            self.lines[a.y].insert_str(a.x, segments[0]);
        } else {
            let tail = self.lines[a.y].split_off(a.x);
            self.lines[a.y].push_str(segments[0]);
            for (i, segment) in segments[1..].iter().enumerate() {
                self.lines.insert(a.y + 1 + i, Line::from_str(segment));
            }
            self.lines[b.y].push_str(tail.as_str());
        }

        if re_parse {
            self.parse();
        }
        self.repair_after(EditSpan::Insert { a, b }, cursors);
        self.highlight_range(a, b);

        self.action_end(cursors);
    }

    /// Remove `[a, b)`. The range is normalized first; the removed text is
    /// journaled with the cursor hint for clipboard splitting.
    pub fn remove_range(
        &mut self,
        cursors: &mut Vec<Cursor>,
        a: Pos,
        b: Pos,
        cursor_hint: Option<usize>,
        re_parse: bool,
    ) {
        let r = Range::new(self.clamp_pos(a), self.clamp_end(b)).normalized();
        let (a, b) = (r.a, r.b);
        if a == b {
            return;
        }

        self.action_begin(cursors);

        let removed = self.range_to_string(Range::new(a, b));
        self.journal.push(UndoAction::Delete {
            range: Range::new(a, b),
            text: removed,
            cursor_hint,
        });

        if a.y == b.y {
            self.lines[a.y].remove_range(a.x, b.x);
        } else {
            self.lines[a.y].truncate(a.x);
            if b.y < self.lines.len() {
                let tail = self.lines[b.y].slice(b.x, self.lines[b.y].len()).to_string();
                self.lines[a.y].push_str(&tail);
            }
            let count = (b.y - a.y).min(self.lines.len() - a.y - 1);
            self.lines.drain(a.y + 1..a.y + 1 + count);
        }

        if re_parse {
            self.parse();
        }
        self.repair_after(EditSpan::Delete { a, b }, cursors);

        self.action_end(cursors);
    }

    /// Remove `[r.a, r.b)` then insert `text` at `r.a`
    pub fn replace(&mut self, cursors: &mut Vec<Cursor>, r: Range, text: &str) {
        self.action_begin(cursors);
        self.remove_range(cursors, r.a, r.b, None, false);
        let at = r.normalized().a;
        self.insert(cursors, at, text, None, true);
        self.action_end(cursors);
    }

    /// Insert at one cursor's position
    pub fn insert_at_cursor(&mut self, cursors: &mut Vec<Cursor>, idx: usize, text: &str) {
        let at = cursors[idx].pos;
        self.insert(cursors, at, text, Some(idx), true);
    }

    /// Insert at every cursor
    pub fn insert_at_cursors(&mut self, cursors: &mut Vec<Cursor>, text: &str) {
        self.action_begin(cursors);
        for i in 0..cursors.len() {
            self.insert_at_cursor(cursors, i, text);
        }
        self.action_end(cursors);
    }

    /// Insert a character at every cursor; closing braces re-indent their line
    pub fn insert_char_at_cursors(&mut self, cursors: &mut Vec<Cursor>, c: char) {
        self.action_begin(cursors);
        for i in 0..cursors.len() {
            self.insert_at_cursor(cursors, i, &c.to_string());
            if matches!(c, '}' | ')' | ']' | '>') {
                let y = cursors[i].pos.y;
                self.auto_indent_line(cursors, y);
            }
        }
        self.action_end(cursors);
    }

    /// One tab at one cursor: a hard tab or `tab_type` spaces
    pub fn insert_tab(&mut self, cursors: &mut Vec<Cursor>, idx: usize) {
        if self.tab_type == 0 {
            self.insert_at_cursor(cursors, idx, "\t");
        } else {
            let spaces = " ".repeat(self.tab_type);
            self.insert_at_cursor(cursors, idx, &spaces);
        }
    }

    pub fn insert_tab_at_cursors(&mut self, cursors: &mut Vec<Cursor>) {
        self.action_begin(cursors);
        for i in 0..cursors.len() {
            self.insert_tab(cursors, i);
        }
        self.action_end(cursors);
    }

    /// Newline at every cursor: strip whitespace-only current line, break,
    /// then auto-indent the new line
    pub fn insert_newline(&mut self, cursors: &mut Vec<Cursor>) {
        self.action_begin(cursors);
        for i in 0..cursors.len() {
            self.remove_trailing_whitespace(cursors, i);
            let at = cursors[i].pos;
            self.insert(cursors, at, "\n", Some(i), true);
            let y = cursors[i].pos.y;
            self.auto_indent_line(cursors, y);
        }
        self.action_end(cursors);
    }

    /// Newline after the current line for every cursor
    pub fn insert_newline_below(&mut self, cursors: &mut Vec<Cursor>) {
        self.action_begin(cursors);
        for i in 0..cursors.len() {
            let y = cursors[i].pos.y;
            cursors[i].pos.x = self.lines[y].len();
            let at = cursors[i].pos;
            self.insert(cursors, at, "\n", Some(i), true);
        }
        self.action_end(cursors);
    }

    /// Trailing-whitespace trim: clears the cursor's line when it consists
    /// only of whitespace (indent left behind by auto-indent)
    pub fn remove_trailing_whitespace(&mut self, cursors: &mut Vec<Cursor>, idx: usize) {
        let y = cursors[idx].pos.y;
        let line = &self.lines[y];
        if line.is_empty() || line.trailing_whitespace_start() > 0 {
            return;
        }
        let len = line.len();
        self.remove_range(cursors, Pos::new(0, y), Pos::new(len, y), Some(idx), true);
    }

    /// Delete the whole of line `y`, including its newline. A single-line
    /// buffer is truncated instead so `lines` never empties.
    pub fn delete_line_at(&mut self, cursors: &mut Vec<Cursor>, y: usize, hint: Option<usize>) {
        self.remove_range(cursors, Pos::new(0, y), Pos::new(0, y + 1), hint, true);
    }

    /// Delete each cursor's line
    pub fn delete_lines_at_cursors(&mut self, cursors: &mut Vec<Cursor>) {
        self.action_begin(cursors);
        for i in 0..cursors.len() {
            let y = cursors[i].pos.y;
            self.delete_line_at(cursors, y, Some(i));
        }
        self.action_end(cursors);
    }

    /// Backspace semantics for one cursor: join with the line above at
    /// column 0, otherwise remove one code point to the left
    pub fn delete_char(&mut self, cursors: &mut Vec<Cursor>, idx: usize) {
        self.action_begin(cursors);
        let pos = cursors[idx].pos;
        if pos.x == 0 {
            if pos.y > 0 {
                let above_len = self.lines[pos.y - 1].len();
                self.remove_range(
                    cursors,
                    Pos::new(above_len, pos.y - 1),
                    Pos::new(0, pos.y),
                    Some(idx),
                    true,
                );
            }
        } else {
            let mut p = pos;
            self.advance_r(&mut p);
            self.remove_range(cursors, p, pos, Some(idx), true);
        }
        self.action_end(cursors);
    }

    pub fn delete_char_at_cursors(&mut self, cursors: &mut Vec<Cursor>) {
        self.action_begin(cursors);
        for i in 0..cursors.len() {
            self.delete_char(cursors, i);
        }
        self.action_end(cursors);
    }

    // =========================================================================
    // Undo / redo
    // =========================================================================

    /// Replay the group before the journal cursor in reverse
    pub fn undo(&mut self, cursors: &mut Vec<Cursor>) {
        if self.journal.is_disabled() || !self.journal.can_undo() {
            return;
        }
        self.journal.disable();

        let mut i = self.journal.next_index();
        debug_assert!(matches!(
            self.journal.actions()[i - 1],
            UndoAction::GroupEnd
        ));
        i -= 1;
        loop {
            i -= 1;
            let action = self.journal.actions()[i].clone();
            match action {
                UndoAction::Insert { range, .. } => {
                    self.remove_range(cursors, range.a, range.b, None, false);
                }
                UndoAction::Delete { range, text, .. } => {
                    self.insert(cursors, range.a, &text, None, false);
                }
                UndoAction::CursorSnapshot { cursors: snap } => {
                    *cursors = snap;
                }
                UndoAction::GroupBegin => break,
                UndoAction::GroupEnd => {}
            }
        }
        self.journal.set_next_index(i);

        self.journal.enable();
        self.parse();
    }

    /// Replay the group after the journal cursor forward
    pub fn redo(&mut self, cursors: &mut Vec<Cursor>) {
        if self.journal.is_disabled() || !self.journal.can_redo() {
            return;
        }
        self.journal.disable();

        let mut i = self.journal.next_index();
        debug_assert!(matches!(self.journal.actions()[i], UndoAction::GroupBegin));
        i += 1;
        loop {
            let action = self.journal.actions()[i].clone();
            match action {
                UndoAction::Insert { range, text, .. } => {
                    self.insert(cursors, range.a, &text, None, false);
                }
                UndoAction::Delete { range, .. } => {
                    self.remove_range(cursors, range.a, range.b, None, false);
                }
                UndoAction::CursorSnapshot { cursors: snap } => {
                    *cursors = snap;
                }
                UndoAction::GroupEnd => break,
                UndoAction::GroupBegin => {}
            }
            i += 1;
        }
        self.journal.set_next_index(i + 1);

        self.journal.enable();
        self.parse();
    }

    // =========================================================================
    // Indentation
    // =========================================================================

    /// Leading indent of line `y` in indent units
    #[must_use]
    pub fn indent_of(&self, y: usize) -> usize {
        if y >= self.lines.len() {
            return 0;
        }
        let tab_size = self.tab_type.max(1);
        let tab_char = if self.tab_type > 0 { ' ' } else { '\t' };
        let mut n = 0;
        for c in self.lines[y].as_str().chars() {
            if c != tab_char {
                break;
            }
            n += 1;
        }
        n / tab_size
    }

    /// Net brace depth of line `y` from tokens starting on it, plus whether
    /// the line's first token is a statement head (`if`/`else`/`for`/`while`)
    #[must_use]
    pub fn indent_depth(&self, y: usize) -> (i32, bool) {
        let mut depth = 0;
        let mut has_statement = false;
        let mut first = true;
        for t in &self.parser.tokens {
            if t.a.y < y {
                continue;
            }
            if t.a.y > y {
                break;
            }
            match t.kind {
                TokenKind::Single(c) => match c {
                    '{' | '[' | '(' => depth += 1,
                    '}' | ']' | ')' => depth -= 1,
                    _ => {}
                },
                TokenKind::Identifier => {
                    if first && matches!(t.text.as_str(), "if" | "else" | "for" | "while") {
                        has_statement = true;
                    }
                }
                _ => {}
            }
            first = false;
        }
        (depth, has_statement)
    }

    /// Compute and apply the target indent for line `y` from the line above
    pub fn auto_indent_line(&mut self, cursors: &mut Vec<Cursor>, y: usize) {
        self.action_begin(cursors);

        // skip empty lines upward
        let mut y_above = y.saturating_sub(1) as i64;
        while y_above >= 0 && self.lines[y_above as usize].is_empty() {
            y_above -= 1;
        }

        let (above_depth, above_is_statement) = if y_above >= 0 {
            self.indent_depth(y_above as usize)
        } else {
            (0, false)
        };
        let above_is_indenting = above_depth > 0 || above_is_statement;
        let above_indent = if y_above >= 0 {
            self.indent_of(y_above as usize) as i64
        } else {
            0
        };

        let mut target = above_indent;
        if above_is_indenting {
            target += 1;
        }

        let (this_depth, this_is_statement) = self.indent_depth(y);
        if this_depth < 0 && !this_is_statement {
            target -= 1;
        }

        // a run of single-statement heads above unwinds one level each:
        //   if (...)
        //     if (...)
        //       stmt
        //   here
        if !above_is_indenting && above_depth == 0 {
            let mut yy = y_above - 1;
            while yy >= 0 {
                let (depth, is_statement) = self.indent_depth(yy as usize);
                if is_statement && depth == 0 {
                    target -= 1;
                } else {
                    break;
                }
                yy -= 1;
            }
        }

        self.set_indent(cursors, y, target.max(0) as usize);
        self.action_end(cursors);
    }

    /// Auto-indent every cursor's line
    pub fn auto_indent_cursors(&mut self, cursors: &mut Vec<Cursor>) {
        self.action_begin(cursors);
        for i in 0..cursors.len() {
            let y = cursors[i].pos.y;
            self.auto_indent_line(cursors, y);
        }
        self.action_end(cursors);
    }

    /// Shift line `y` by `diff` indent units
    pub fn add_indent(&mut self, cursors: &mut Vec<Cursor>, y: usize, diff: i64) {
        self.action_begin(cursors);
        let tab_size = self.tab_type.max(1) as i64;
        let tab_char = if self.tab_type > 0 { ' ' } else { '\t' };
        let current = self.indent_of(y) as i64;

        let mut chars = diff * tab_size;
        if chars < -current * tab_size {
            chars = -current * tab_size;
        }

        if chars < 0 {
            self.remove_range(
                cursors,
                Pos::new(0, y),
                Pos::new((-chars) as usize, y),
                None,
                true,
            );
        } else if chars > 0 {
            let unit = tab_char.to_string().repeat(chars as usize);
            self.insert(cursors, Pos::new(0, y), &unit, None, true);
        }
        self.action_end(cursors);
    }

    pub fn set_indent(&mut self, cursors: &mut Vec<Cursor>, y: usize, target: usize) {
        let diff = target as i64 - self.indent_of(y) as i64;
        self.add_indent(cursors, y, diff);
    }

    /// Infer the tab policy from file contents: the indent of the first
    /// indented line wins. Comment bodies are skipped.
    pub fn guess_tab_type(&mut self) {
        let leader = self.language.line_comment();
        for line in &self.lines {
            let s = line.as_str();
            if s.is_empty() {
                continue;
            }
            if let Some(leader) = leader {
                if s.trim_start().starts_with(leader) {
                    continue;
                }
            }
            if s.starts_with('\t') {
                self.tab_type = 0;
                return;
            }
            if s.starts_with(' ') {
                let n = s.chars().take_while(|&c| c == ' ').count();
                if n > 0 && n <= 8 {
                    self.tab_type = n;
                    return;
                }
            }
        }
        self.tab_type = DEFAULT_TAB_TYPE;
    }

    // =========================================================================
    // Save support
    // =========================================================================

    /// Content joined with the buffer's endline; the last line carries no
    /// trailing newline
    #[must_use]
    pub fn to_contents(&self) -> String {
        let sep = self.endline.as_str();
        self.lines
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(sep)
    }

    /// Called after a successful write
    pub fn mark_saved(&mut self) {
        self.journal.mark_clean();
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.filename.as_deref()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
