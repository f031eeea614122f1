//! Normal-mode actions
//! Motions shared by Normal/Delete/Yank/Replace, selection specifiers,
//! visual-mode operations, paste, comment toggle, autocomplete, and pane
//! handling.

use super::{Editor, VisualStart};
use crate::buffer::{Buffer, BufferId};
use crate::error::ErrorSeverity;
use crate::key::Key;
use crate::pane::{Pane, PaneId, PaneKind};
use crate::parse::TokenKind;
use crate::position::{Pos, Range};
use crate::view::Cursor;
use std::path::PathBuf;

/// Walk the token stream left to the matching opening brace. Sitting on a
/// closing brace counts it, so the walk lands on its partner; sitting on
/// the target character starts one token past it.
pub fn move_to_left_brace(buffer: &Buffer, open: char, close: char, pos: &mut Pos) {
    let tokens = &buffer.parser.tokens;
    let Some(mut i) = buffer.token_at(*pos) else {
        return;
    };
    if tokens[i].kind == TokenKind::Eof {
        return;
    }

    let allow_inner = tokens[i].kind != TokenKind::Single(open);
    if tokens[i].kind == TokenKind::Single(open) {
        if tokens[i].a < *pos {
            *pos = tokens[i].a;
            return;
        }
        if i == 0 {
            return;
        }
        i -= 1;
    }

    let mut depth = 0;
    loop {
        match tokens[i].kind {
            TokenKind::Single(c) if c == close => depth += 1,
            TokenKind::Single(c) if c == open => {
                depth -= 1;
                if depth < 0 || (allow_inner && depth == 0) {
                    *pos = tokens[i].a;
                    return;
                }
            }
            _ => {}
        }
        if i == 0 {
            return;
        }
        i -= 1;
    }
}

/// Walk the token stream right to the matching closing brace. Sitting on
/// an opening brace counts it, so the walk lands on its partner.
pub fn move_to_right_brace(buffer: &Buffer, open: char, close: char, pos: &mut Pos) {
    let tokens = &buffer.parser.tokens;
    let Some(mut i) = buffer.token_at(*pos) else {
        return;
    };
    if tokens[i].kind == TokenKind::Eof {
        return;
    }

    let allow_inner = tokens[i].kind != TokenKind::Single(close);
    if tokens[i].kind == TokenKind::Single(close) {
        if *pos < tokens[i].a {
            *pos = tokens[i].a;
            return;
        }
        i += 1;
    }

    let mut depth = 0;
    while i < tokens.len() {
        match tokens[i].kind {
            TokenKind::Single(c) if c == open => depth += 1,
            TokenKind::Single(c) if c == close => {
                depth -= 1;
                if depth < 0 || (allow_inner && depth == 0) {
                    *pos = tokens[i].a;
                    return;
                }
            }
            _ => {}
        }
        i += 1;
    }
}

impl Editor {
    // =========================================================================
    // Motions
    // =========================================================================

    /// The motion keys shared by Normal mode and the operator modes.
    /// Returns false when `key` is not a motion.
    pub fn movement_default(&mut self, key: Key) -> bool {
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = &self.buffers[&view.buffer];
        match key {
            Key::Char('h') | Key::ArrowLeft => view.advance_r(buffer),
            Key::Char('l') | Key::ArrowRight => view.advance(buffer),
            Key::Char('j') | Key::ArrowDown => view.move_y(buffer, 1),
            Key::Char('k') | Key::ArrowUp => view.move_y(buffer, -1),
            Key::Char('w') => view.move_word(buffer),
            Key::Char('b') => view.move_word_r(buffer),
            Key::Char('H') | Key::Home => view.goto_beginline(buffer),
            Key::Char('L') | Key::End => view.goto_endline(buffer),

            Key::Char('{') => self.brace_motion_left('{', '}'),
            Key::Char('}') => self.brace_motion_right('{', '}'),
            Key::Char('(') => self.brace_motion_left('(', ')'),
            Key::Char(')') => self.brace_motion_right('(', ')'),
            Key::Char('[') => self.brace_motion_left('[', ']'),
            Key::Char(']') => self.brace_motion_right('[', ']'),

            Key::Char('n') => self.search_next(false),
            Key::Char('N') => self.search_next(true),
            Key::Char('*') => self.search_identifier_under_cursor(false),
            Key::Char('#') => self.search_identifier_under_cursor(true),

            Key::Char('J') => self.indent_jump(1),
            Key::Char('K') => self.indent_jump(-1),

            _ => return false,
        }
        true
    }

    fn brace_motion_left(&mut self, open: char, close: char) {
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = &self.buffers[&view.buffer];
        for i in 0..view.cursors.len() {
            let mut p = view.cursors[i].pos;
            move_to_left_brace(buffer, open, close, &mut p);
            view.move_cursor_to(buffer, i, p);
        }
        view.deduplicate_cursors();
    }

    fn brace_motion_right(&mut self, open: char, close: char) {
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = &self.buffers[&view.buffer];
        for i in 0..view.cursors.len() {
            let mut p = view.cursors[i].pos;
            move_to_right_brace(buffer, open, close, &mut p);
            view.move_cursor_to(buffer, i, p);
        }
        view.deduplicate_cursors();
    }

    /// `n`/`N`: jump to the next/previous occurrence of the committed
    /// search term
    fn search_next(&mut self, reverse: bool) {
        if self.search_term.is_empty() {
            return;
        }
        let term = self.search_term.clone();
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = &self.buffers[&view.buffer];
        view.jumplist_push();
        let found = if reverse {
            view.find_and_move_r(buffer, &term, false)
        } else {
            view.find_and_move(buffer, &term, false)
        };
        if found {
            let view = &mut self.panes.get_mut(self.editing_pane).view;
            view.jumplist_push();
        } else {
            let message = format!("'{}' not found", term);
            self.status_message_set(ErrorSeverity::Warning, message);
        }
    }

    /// `*`/`#`: search for the identifier under the primary cursor
    fn search_identifier_under_cursor(&mut self, reverse: bool) {
        let view = &self.panes.get(self.editing_pane).view;
        let buffer = &self.buffers[&view.buffer];
        let Some(idx) = buffer.token_at(view.primary().pos) else {
            return;
        };
        let token = &buffer.parser.tokens[idx];
        if token.kind != TokenKind::Identifier {
            return;
        }
        self.search_term = token.text.clone();
        self.search_next(reverse);
    }

    /// `J`/`K`: jump to the next run of lines at the same indent
    fn indent_jump(&mut self, dir: i64) {
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = &self.buffers[&view.buffer];
        for i in 0..view.cursors.len() {
            let start_y = view.cursors[i].pos.y;
            let want = buffer.indent_of(start_y);
            let mut seen_break = false;
            let mut y = start_y as i64 + dir;
            while y >= 0 && (y as usize) < buffer.num_lines() {
                let line_y = y as usize;
                if buffer.line(line_y).is_empty() || buffer.indent_of(line_y) != want {
                    seen_break = true;
                } else if seen_break {
                    view.move_to_y(buffer, i, line_y);
                    break;
                }
                y += dir;
            }
        }
        view.deduplicate_cursors();
    }

    // =========================================================================
    // Selection specifiers
    // =========================================================================

    /// Interpret `key` as a selection specifier for Delete/Yank/Replace:
    /// whole line, parameter, brace/paren/bracket block, or string literal.
    pub fn get_action_selection(&self, key: Key) -> Option<Vec<Range>> {
        let view = &self.panes.get(self.editing_pane).view;
        let buffer = &self.buffers[&view.buffer];
        let mut selections = Vec::new();

        match key {
            Key::Char(' ') => {
                for c in &view.cursors {
                    selections.push(Range::new(
                        Pos::new(0, c.pos.y),
                        Pos::new(0, c.pos.y + 1),
                    ));
                }
            }

            // one parameter of a call: walk to the enclosing comma/paren on
            // both sides
            Key::Char('p') => {
                for c in &view.cursors {
                    selections.push(parameter_selection(buffer, c.pos));
                }
            }

            Key::Char('}') => {
                for c in &view.cursors {
                    let mut b = c.pos;
                    move_to_right_brace(buffer, '{', '}', &mut b);
                    buffer.advance(&mut b);
                    selections.push(Range::new(c.pos, b));
                }
            }
            Key::Char(')') => {
                for c in &view.cursors {
                    let mut b = c.pos;
                    move_to_right_brace(buffer, '(', ')', &mut b);
                    buffer.advance(&mut b);
                    selections.push(Range::new(c.pos, b));
                }
            }
            Key::Char(']') => {
                for c in &view.cursors {
                    let mut b = c.pos;
                    move_to_right_brace(buffer, '[', ']', &mut b);
                    buffer.advance(&mut b);
                    selections.push(Range::new(c.pos, b));
                }
            }

            Key::Char('"') => {
                for c in &view.cursors {
                    if let Some(i) = buffer.token_at(c.pos) {
                        let t = &buffer.parser.tokens[i];
                        if matches!(t.kind, TokenKind::Str | TokenKind::StrUnterminated)
                            && t.range().contains(c.pos)
                        {
                            selections.push(t.range());
                        }
                    }
                }
            }

            _ => return None,
        }
        Some(selections)
    }

    /// Delete either a selection specifier's ranges or the span each
    /// cursor covers under a motion. Returns false when `key` is neither.
    pub fn do_delete_movement(&mut self, key: Key) -> bool {
        {
            let view = &mut self.panes.get_mut(self.editing_pane).view;
            let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
            buffer.action_begin(&view.cursors);
        }

        let ok = if let Some(selections) = self.get_action_selection(key) {
            let view = &mut self.panes.get_mut(self.editing_pane).view;
            let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
            for (i, r) in selections.iter().enumerate() {
                buffer.remove_range(&mut view.cursors, r.a, r.b, Some(i), true);
            }
            true
        } else {
            let prev: Vec<Cursor> = self.active_cursors().to_vec();
            if self.movement_default(key) && prev.len() == self.active_cursors().len() {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
                for i in 0..prev.len() {
                    let a = prev[i].pos;
                    let b = view.cursors[i].pos;
                    buffer.remove_range(&mut view.cursors, a, b, Some(i), true);
                }
                true
            } else {
                false
            }
        };

        {
            let view = &mut self.panes.get_mut(self.editing_pane).view;
            let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
            buffer.action_end(&view.cursors);
        }
        ok
    }

    /// Yank: the same spans as delete, copied instead of removed
    pub fn do_yank_movement(&mut self, key: Key) -> bool {
        if let Some(selections) = self.get_action_selection(key) {
            self.ranges_to_clipboard(&selections);
            let view_buffer = self.active_buffer_id();
            let buffer = self.buffers.get_mut(&view_buffer).expect("buffer");
            for r in &selections {
                buffer.highlight_range(r.a, r.b);
            }
            return true;
        }

        let prev: Vec<Cursor> = self.active_cursors().to_vec();
        if !self.movement_default(key) || prev.len() != self.active_cursors().len() {
            return false;
        }
        let spans: Vec<Range> = prev
            .iter()
            .zip(self.active_cursors())
            .map(|(a, b)| Range::new(a.pos, b.pos))
            .collect();
        self.ranges_to_clipboard(&spans);

        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
        for r in &spans {
            buffer.highlight_range(r.a, r.b);
        }
        // a yank leaves the cursors where they started
        view.cursors = prev;
        true
    }

    /// Join each range's text with newlines and push to the OS clipboard
    fn ranges_to_clipboard(&mut self, ranges: &[Range]) {
        let buffer = self.active_buffer();
        let text = ranges
            .iter()
            .map(|r| buffer.range_to_string(*r))
            .collect::<Vec<_>>()
            .join("\n");
        if let Err(err) = self.clipboard.set(&text) {
            self.report_error(&err);
        }
    }

    // =========================================================================
    // Visual selection
    // =========================================================================

    /// `s`/`S`: snapshot the cursor set as visual anchors
    pub fn begin_visual(&mut self, entire_line: bool) {
        let view = &self.panes.get(self.editing_pane).view;
        let cursors = view
            .cursors
            .iter()
            .map(|c| {
                if entire_line {
                    Pos::new(0, c.pos.y)
                } else {
                    c.pos
                }
            })
            .collect();
        self.visual_start = Some(VisualStart {
            buffer: view.buffer,
            cursors,
            entire_line,
            synced_edits: 0,
        });
    }

    /// Is there a visual selection usable with the current cursor set?
    #[must_use]
    pub fn has_matching_visual(&self) -> bool {
        match &self.visual_start {
            Some(vs) => {
                vs.buffer == self.active_buffer_id()
                    && vs.cursors.len() == self.active_cursors().len()
            }
            None => false,
        }
    }

    fn take_visual(&mut self) -> Option<VisualStart> {
        if self.has_matching_visual() {
            self.visual_start.take()
        } else {
            None
        }
    }

    /// Delete every visual-start..cursor span (whole lines in line mode)
    pub fn do_delete_visual(&mut self) {
        let Some(vs) = self.take_visual() else {
            return;
        };
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
        // motions are not journaled, so the group's begin snapshot must
        // capture the selection origin for undo to restore it
        let anchors: Vec<Cursor> = vs.cursors.iter().map(|&p| Cursor::at(p)).collect();
        buffer.action_begin(&anchors);
        for i in 0..vs.cursors.len() {
            let pa = vs.cursors[i].min(view.cursors[i].pos);
            let mut pb = vs.cursors[i].max(view.cursors[i].pos);
            if vs.entire_line {
                buffer.remove_range(
                    &mut view.cursors,
                    Pos::new(0, pa.y),
                    Pos::new(0, pb.y + 1),
                    Some(i),
                    true,
                );
            } else {
                buffer.advance(&mut pb);
                buffer.remove_range(&mut view.cursors, pa, pb, Some(i), true);
            }
        }
        buffer.action_end(&view.cursors);
    }

    /// Copy every visual-start..cursor span to the clipboard
    pub fn do_yank_visual(&mut self) {
        let Some(vs) = self.take_visual() else {
            return;
        };
        let spans: Vec<Range> = {
            let view = &self.panes.get(self.editing_pane).view;
            let buffer = &self.buffers[&view.buffer];
            vs.cursors
                .iter()
                .zip(&view.cursors)
                .map(|(&anchor, c)| {
                    let a = anchor.min(c.pos);
                    let mut b = anchor.max(c.pos);
                    if vs.entire_line {
                        Range::new(Pos::new(0, a.y), Pos::new(0, b.y + 1))
                    } else {
                        buffer.advance(&mut b);
                        Range::new(a, b)
                    }
                })
                .collect()
        };
        self.ranges_to_clipboard(&spans);
        let id = self.active_buffer_id();
        let buffer = self.buffers.get_mut(&id).expect("buffer");
        for r in &spans {
            buffer.highlight_range(r.a, r.b);
        }
    }

    /// Lines covered by the visual selection per cursor, or each cursor's
    /// own line
    fn selection_line_spans(&self) -> Vec<(usize, usize)> {
        let view = &self.panes.get(self.editing_pane).view;
        match &self.visual_start {
            Some(vs) if self.has_matching_visual() => vs
                .cursors
                .iter()
                .zip(&view.cursors)
                .map(|(&anchor, c)| {
                    (anchor.y.min(c.pos.y), anchor.y.max(c.pos.y))
                })
                .collect(),
            _ => view.cursors.iter().map(|c| (c.pos.y, c.pos.y)).collect(),
        }
    }

    /// `=`: re-indent the selected lines
    pub fn auto_indent_selection(&mut self) {
        let spans = self.selection_line_spans();
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
        buffer.action_begin(&view.cursors);
        for (y0, y1) in spans {
            for y in y0..=y1 {
                buffer.auto_indent_line(&mut view.cursors, y);
            }
        }
        buffer.action_end(&view.cursors);
    }

    /// `<` / `>`: shift the selected lines by one indent unit
    pub fn shift_selection(&mut self, diff: i64) {
        let spans = self.selection_line_spans();
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
        buffer.action_begin(&view.cursors);
        for (y0, y1) in spans {
            for y in y0..=y1 {
                buffer.add_indent(&mut view.cursors, y, diff);
            }
        }
        buffer.action_end(&view.cursors);
    }

    /// `/`: toggle the language's line comment on the selected lines
    pub fn toggle_comment_selection(&mut self) {
        let spans = self.selection_line_spans();
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
        let Some(leader) = buffer.language.line_comment() else {
            return;
        };

        buffer.action_begin(&view.cursors);
        for (i, (y0, y1)) in spans.iter().enumerate() {
            // uncomment only when every non-empty line is commented
            let all_commented = (*y0..=*y1)
                .filter(|&y| !buffer.line(y).is_empty())
                .all(|y| buffer.line(y).as_str().trim_start().starts_with(leader));

            for y in *y0..=*y1 {
                if buffer.line(y).is_empty() {
                    continue;
                }
                let indent_end = crate::view::begin_of_line(buffer, y);
                if all_commented {
                    let mut len = leader.chars().count();
                    let after = buffer.line(y).char_at(indent_end + len);
                    if after == Some(' ') {
                        len += 1;
                    }
                    buffer.remove_range(
                        &mut view.cursors,
                        Pos::new(indent_end, y),
                        Pos::new(indent_end + len, y),
                        Some(i),
                        true,
                    );
                } else {
                    let text = format!("{} ", leader);
                    buffer.insert(&mut view.cursors, Pos::new(indent_end, y), &text, Some(i), true);
                }
            }
        }
        buffer.action_end(&view.cursors);
    }

    /// `m`: add a cursor on the line below, or one per selected line
    pub fn add_cursor_below(&mut self) {
        if self.has_matching_visual() {
            let vs = self.visual_start.take().expect("visual start");
            let view = &mut self.panes.get_mut(self.editing_pane).view;
            view.collapse_cursors();
            let y0 = vs.cursors[0].y.min(view.cursors[0].pos.y);
            let y1 = vs.cursors[0].y.max(view.cursors[0].pos.y);
            view.cursors[0] = Cursor::new(0, y0);
            for y in y0 + 1..=y1 {
                view.cursors.push(Cursor::new(0, y));
            }
            return;
        }
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = &self.buffers[&view.buffer];
        let last = *view.cursors.last().expect("cursor");
        view.cursors.push(last);
        let idx = view.cursors.len() - 1;
        view.move_y_cursor(buffer, idx, 1);
        view.deduplicate_cursors();
    }

    // =========================================================================
    // Paste
    // =========================================================================

    /// Paste the clipboard: split across cursors when the text has exactly
    /// one line per cursor, otherwise insert the whole text at each cursor
    pub fn do_paste(&mut self) {
        let text = match self.clipboard.get() {
            Ok(text) if !text.is_empty() => text.replace('\r', ""),
            Ok(_) => return,
            Err(err) => {
                self.report_error(&err);
                return;
            }
        };

        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
        buffer.action_begin(&view.cursors);

        let newlines = text.matches('\n').count();
        if newlines == view.cursors.len() - 1 && newlines > 0 {
            for (i, part) in text.split('\n').enumerate() {
                let at = view.cursors[i].pos;
                buffer.insert(&mut view.cursors, at, part, Some(i), true);
            }
        } else {
            let mut slice = text.as_str();
            if let Some(stripped) = slice.strip_suffix('\n') {
                // a trailing newline means line-wise paste: open a line below
                buffer.insert_newline_below(&mut view.cursors);
                slice = stripped;
            }
            for i in 0..view.cursors.len() {
                let at = view.cursors[i].pos;
                buffer.insert(&mut view.cursors, at, slice, Some(i), true);
            }
        }

        buffer.action_end(&view.cursors);
    }

    // =========================================================================
    // Autocomplete
    // =========================================================================

    /// Identifier prefix ending at `pos`, with its start column
    fn identifier_prefix(buffer: &Buffer, pos: Pos) -> Option<(usize, String)> {
        let line = buffer.line(pos.y);
        let mut start = pos.x;
        while start > 0 {
            let c = line.char_at(start - 1)?;
            if c.is_alphanumeric() || c == '_' {
                start -= 1;
            } else {
                break;
            }
        }
        if start == pos.x {
            return None;
        }
        Some((start, line.slice(start, pos.x).to_string()))
    }

    /// Refill the dropdown with identifiers matching the word being typed
    pub fn update_dropdown(&mut self) {
        let suggestions: Vec<String> = {
            let view = &self.panes.get(self.editing_pane).view;
            let buffer = &self.buffers[&view.buffer];
            match Self::identifier_prefix(buffer, view.primary().pos) {
                Some((_, prefix)) => buffer
                    .parser
                    .identifiers
                    .iter()
                    .filter(|ident| ident.starts_with(&prefix) && **ident != prefix)
                    .take(10)
                    .cloned()
                    .collect(),
                None => Vec::new(),
            }
        };
        let pane = self.panes.get_mut(self.dropdown_pane);
        pane.selection = if suggestions.is_empty() { None } else { Some(0) };
        pane.suggestions = suggestions;
    }

    pub fn move_dropdown_selection(&mut self, delta: i64) {
        let pane = self.panes.get_mut(self.dropdown_pane);
        if pane.suggestions.is_empty() {
            return;
        }
        let max = pane.suggestions.len() as i64 - 1;
        let current = pane.selection.unwrap_or(0) as i64;
        pane.selection = Some((current + delta).clamp(0, max) as usize);
    }

    /// Replace each cursor's pending word with the selected suggestion.
    /// Returns false when there is nothing to complete.
    pub fn autocomplete(&mut self) -> bool {
        let chosen = {
            let pane = self.panes.get(self.dropdown_pane);
            match pane.selection.and_then(|i| pane.suggestions.get(i)) {
                Some(word) => word.clone(),
                None => return false,
            }
        };

        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
        buffer.action_begin(&view.cursors);
        for i in 0..view.cursors.len() {
            let pos = view.cursors[i].pos;
            if let Some((start, _)) = Self::identifier_prefix(buffer, pos) {
                buffer.remove_range(&mut view.cursors, Pos::new(start, pos.y), pos, Some(i), true);
                let at = view.cursors[i].pos;
                buffer.insert(&mut view.cursors, at, &chosen, Some(i), true);
            }
        }
        buffer.action_end(&view.cursors);
        self.clear_dropdown_suggestions();
        true
    }

    fn clear_dropdown_suggestions(&mut self) {
        let pane = self.panes.get_mut(self.dropdown_pane);
        pane.suggestions.clear();
        pane.selection = None;
    }

    // =========================================================================
    // Build-output navigation
    // =========================================================================

    /// Enter on a `file:line[:col]` line of a read-only output buffer jumps
    /// to that location in a fresh edit view
    pub fn jump_to_output_location(&mut self) -> bool {
        let (line, read_only) = {
            let view = &self.panes.get(self.editing_pane).view;
            let buffer = &self.buffers[&view.buffer];
            (
                buffer.line(view.primary().pos.y).as_str().to_string(),
                buffer.read_only,
            )
        };
        if !read_only {
            return false;
        }
        let Some((path, y, x)) = parse_location(&line) else {
            return false;
        };
        self.open_file(&path);
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = &self.buffers[&view.buffer];
        view.jumplist_push();
        view.move_to(
            buffer,
            Pos::new(x.saturating_sub(1), y.saturating_sub(1)),
        );
        view.jumplist_push();
        true
    }

    // =========================================================================
    // Pane handling
    // =========================================================================

    /// `Ctrl-w`: open a subpane showing the same buffer and cursors
    pub fn split_pane(&mut self) {
        let current = self.editing_pane;
        let view = self.panes.get(current).view.clone();
        let buffer: BufferId = view.buffer;
        let mut pane = Pane::new(PaneKind::Edit, buffer);
        pane.view = view;
        let id = self.panes.insert(pane);
        self.panes.add_subpane(current, id);
        self.editing_panes.push(id);
        self.editing_pane = id;
    }

    /// `Ctrl-q`: queue the focused pane for removal at frame end
    pub fn close_pane(&mut self) {
        if self.editing_panes.len() <= 1 {
            return;
        }
        self.panes.queue_remove(self.editing_pane);
    }

    /// `Ctrl-l`: descend into the first subpane, or cycle to the next root
    pub fn pane_next(&mut self) {
        let current = self.editing_pane;
        if let Some(&child) = self.panes.get(current).subpanes.first() {
            if self.panes.is_alive(child) {
                self.editing_pane = child;
                return;
            }
        }
        self.focus_root_offset(1);
    }

    /// `Ctrl-h`: ascend to the parent, or cycle to the previous root
    pub fn pane_prev(&mut self) {
        let current = self.editing_pane;
        if let Some(parent) = self.panes.get(current).parent {
            if self.panes.is_alive(parent) {
                self.editing_pane = parent;
                return;
            }
        }
        self.focus_root_offset(-1);
    }

    fn focus_root_offset(&mut self, delta: i64) {
        let roots: Vec<PaneId> = self
            .editing_panes
            .iter()
            .copied()
            .filter(|&id| self.panes.is_alive(id) && self.panes.get(id).parent.is_none())
            .collect();
        if roots.is_empty() {
            return;
        }
        let mut root = self.editing_pane;
        while let Some(parent) = self.panes.get(root).parent {
            root = parent;
        }
        let i = roots.iter().position(|&r| r == root).unwrap_or(0) as i64;
        let next = (i + delta).rem_euclid(roots.len() as i64) as usize;
        self.editing_pane = roots[next];
    }

    /// `Ctrl-j`/`Ctrl-k`: move between siblings under the nearest ancestor
    /// with more than one child
    pub fn pane_sibling(&mut self, delta: i64) {
        let mut p = self.editing_pane;
        while let Some(parent) = self.panes.get(p).parent {
            let siblings = &self.panes.get(parent).subpanes;
            if let Some(i) = siblings.iter().position(|&s| s == p) {
                let next = i as i64 + delta;
                if next >= 0 && (next as usize) < siblings.len() {
                    self.editing_pane = siblings[next as usize];
                    return;
                }
            }
            p = parent;
        }
    }

    pub fn resize_pane_width(&mut self, factor: f32) {
        let target = self
            .panes
            .get(self.editing_pane)
            .parent
            .unwrap_or(self.editing_pane);
        let pane = self.panes.get_mut(target);
        pane.width_weight = (pane.width_weight + 1.0) * factor - 1.0;
    }

    pub fn resize_pane_height(&mut self, factor: f32) {
        // the nearest ancestor that actually shares height with siblings
        let mut p = self.editing_pane;
        loop {
            let parent = self.panes.get(p).parent;
            match parent {
                Some(parent_id) if self.panes.get(parent_id).subpanes.len() > 1 => {
                    let pane = self.panes.get_mut(p);
                    pane.height_weight = (pane.height_weight + 1.0) * factor - 1.0;
                    return;
                }
                Some(parent_id) => p = parent_id,
                None => return,
            }
        }
    }
}

/// One call parameter around `pos`: scan left and right to the enclosing
/// comma or bracket at depth zero
fn parameter_selection(buffer: &Buffer, pos: Pos) -> Range {
    let is_open = |c: char| matches!(c, '(' | '[' | '{');
    let is_close = |c: char| matches!(c, ')' | ']' | '}');

    // find beginning
    let mut a = pos;
    let mut left_was_brace = false;
    match buffer.char_at(a) {
        Some(c) if is_open(c) => {
            buffer.advance(&mut a);
            left_was_brace = true;
        }
        Some(',') => {}
        _ => {
            let mut depth = 0;
            while buffer.advance_r(&mut a) {
                let c = buffer.char_at(a).unwrap_or('\n');
                if is_close(c) {
                    depth -= 1;
                } else if is_open(c) {
                    depth += 1;
                } else if c == ',' && depth == 0 {
                    break;
                }
                if depth > 0 {
                    left_was_brace = true;
                    buffer.advance(&mut a);
                    break;
                }
            }
        }
    }

    // find end
    let mut b = pos;
    let mut depth = 0;
    if !buffer.char_at(b).map(is_close).unwrap_or(false) {
        while buffer.advance(&mut b) {
            let c = buffer.char_at(b).unwrap_or('\n');
            if is_close(c) {
                depth -= 1;
            } else if is_open(c) {
                depth += 1;
            } else if c == ',' && depth == 0 {
                // a leading brace means the comma belongs to this parameter
                if left_was_brace {
                    buffer.advance(&mut b);
                    while buffer.char_at(b).map(char::is_whitespace).unwrap_or(false) {
                        if !buffer.advance(&mut b) {
                            break;
                        }
                    }
                }
                break;
            }
            if depth < 0 {
                break;
            }
        }
    }

    Range::new(a, b)
}

/// Parse `path:line[:col]` from a compiler diagnostic line
fn parse_location(line: &str) -> Option<(PathBuf, usize, usize)> {
    let mut parts = line.splitn(4, ':');
    let path = parts.next()?.trim();
    if path.is_empty() {
        return None;
    }
    let y: usize = parts.next()?.trim().parse().ok()?;
    let x: usize = parts
        .next()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(1);
    Some((PathBuf::from(path), y, x))
}
