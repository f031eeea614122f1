use super::*;
use crate::view::Cursor;

fn text_buffer(lines: &[&str]) -> Buffer {
    Buffer::from_lines(
        lines.iter().map(|s| s.to_string()).collect(),
        Language::Text,
        Endline::Lf,
    )
}

fn c_buffer(lines: &[&str]) -> Buffer {
    let mut buffer = Buffer::from_lines(
        lines.iter().map(|s| s.to_string()).collect(),
        Language::CFamily,
        Endline::Lf,
    );
    buffer.tab_type = 4;
    buffer
}

fn contents(buffer: &Buffer) -> Vec<String> {
    buffer.lines.iter().map(|l| l.as_str().to_string()).collect()
}

fn assert_invariants(buffer: &Buffer, cursors: &[Cursor]) {
    assert!(!buffer.lines.is_empty());
    for c in cursors {
        assert!(c.pos.y < buffer.num_lines(), "cursor line out of range");
        assert!(
            c.pos.x <= buffer.line(c.pos.y).len(),
            "cursor column out of range"
        );
    }
}

// =============================================================================
// Insert Tests
// =============================================================================

#[test]
fn test_insert_single_line() {
    let mut buffer = text_buffer(&["hello world"]);
    let mut cursors = vec![Cursor::new(5, 0)];
    buffer.insert(&mut cursors, Pos::new(5, 0), ",", Some(0), true);
    assert_eq!(contents(&buffer), vec!["hello, world"]);
    assert_eq!(cursors[0].pos, Pos::new(6, 0));
}

#[test]
fn test_insert_multi_line() {
    let mut buffer = text_buffer(&["ab"]);
    let mut cursors = vec![Cursor::new(1, 0)];
    buffer.insert(&mut cursors, Pos::new(1, 0), "x\ny\nz", Some(0), true);
    assert_eq!(contents(&buffer), vec!["ax", "y", "zb"]);
    assert_eq!(cursors[0].pos, Pos::new(1, 2));
    assert_invariants(&buffer, &cursors);
}

#[test]
fn test_insert_empty_is_a_noop() {
    let mut buffer = text_buffer(&["ab"]);
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.insert(&mut cursors, Pos::new(0, 0), "", Some(0), true);
    assert_eq!(contents(&buffer), vec!["ab"]);
    assert!(!buffer.modified());
    assert!(buffer.journal.actions().is_empty());
}

#[test]
fn test_insert_pushes_highlight() {
    let mut buffer = text_buffer(&[""]);
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.insert(&mut cursors, Pos::new(0, 0), "flash", Some(0), true);
    assert_eq!(buffer.highlights.len(), 1);
    assert_eq!(buffer.highlights[0].range.a, Pos::new(0, 0));
    assert_eq!(buffer.highlights[0].range.b, Pos::new(5, 0));
}

#[test]
fn test_multi_cursor_insert_keeps_all_cursors_right() {
    // two cursors typing X on separate lines
    let mut buffer = text_buffer(&["abc", "def"]);
    let mut cursors = vec![Cursor::new(3, 0), Cursor::new(3, 1)];
    buffer.insert_at_cursors(&mut cursors, "X");
    assert_eq!(contents(&buffer), vec!["abcX", "defX"]);
    assert_eq!(cursors[0].pos, Pos::new(4, 0));
    assert_eq!(cursors[1].pos, Pos::new(4, 1));
}

#[test]
fn test_multi_cursor_insert_same_line() {
    let mut buffer = text_buffer(&["ab"]);
    let mut cursors = vec![Cursor::new(1, 0), Cursor::new(2, 0)];
    buffer.insert_at_cursors(&mut cursors, "-");
    assert_eq!(contents(&buffer), vec!["a-b-"]);
    assert_eq!(cursors[0].pos, Pos::new(2, 0));
    assert_eq!(cursors[1].pos, Pos::new(4, 0));
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove_within_line() {
    let mut buffer = text_buffer(&["hello world"]);
    let mut cursors = vec![Cursor::new(11, 0)];
    buffer.remove_range(&mut cursors, Pos::new(5, 0), Pos::new(11, 0), Some(0), true);
    assert_eq!(contents(&buffer), vec!["hello"]);
    assert_eq!(cursors[0].pos, Pos::new(5, 0));
}

#[test]
fn test_remove_across_lines() {
    let mut buffer = text_buffer(&["one", "two", "three"]);
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.remove_range(&mut cursors, Pos::new(1, 0), Pos::new(3, 2), Some(0), true);
    assert_eq!(contents(&buffer), vec!["oee"]);
}

#[test]
fn test_remove_normalizes_reversed_range() {
    let mut buffer = text_buffer(&["abcdef"]);
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.remove_range(&mut cursors, Pos::new(4, 0), Pos::new(1, 0), Some(0), true);
    assert_eq!(contents(&buffer), vec!["aef"]);
}

#[test]
fn test_remove_zero_length_is_a_noop() {
    let mut buffer = text_buffer(&["ab"]);
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.remove_range(&mut cursors, Pos::new(1, 0), Pos::new(1, 0), Some(0), true);
    assert_eq!(contents(&buffer), vec!["ab"]);
    assert!(!buffer.modified());
}

#[test]
fn test_insert_then_remove_is_identity() {
    // property: remove(insert span) restores buffer and cursors bit-equal
    let cases: &[(&[&str], Pos, &str)] = &[
        (&["hello"], Pos::new(2, 0), "XY"),
        (&["hello", "world"], Pos::new(5, 0), "\n"),
        (&["a"], Pos::new(1, 0), "x\nyy\nzzz"),
        (&[""], Pos::new(0, 0), "multi\nline"),
    ];
    for (lines, at, text) in cases {
        let mut buffer = text_buffer(lines);
        let mut cursors = vec![Cursor::new(0, 0), Cursor::at(*at)];
        let before_lines = contents(&buffer);
        let before_cursors = cursors.clone();

        buffer.insert(&mut cursors, *at, text, Some(1), true);
        let end = match &buffer.journal.actions()[buffer.journal.next_index() - 3] {
            UndoAction::Insert { range, .. } => range.b,
            other => panic!("expected insert record, got {:?}", other),
        };
        buffer.remove_range(&mut cursors, *at, end, Some(1), true);

        assert_eq!(contents(&buffer), before_lines);
        assert_eq!(
            cursors.iter().map(|c| c.pos).collect::<Vec<_>>(),
            before_cursors.iter().map(|c| c.pos).collect::<Vec<_>>()
        );
    }
}

// =============================================================================
// Cursor Repair Tests
// =============================================================================

#[test]
fn test_repair_insert_same_line_shifts_right() {
    let mut p = Pos::new(5, 2);
    Buffer::move_pos_on_insert(&mut p, Pos::new(2, 2), Pos::new(4, 2));
    assert_eq!(p, Pos::new(7, 2));
}

#[test]
fn test_repair_insert_before_position_lines() {
    let mut p = Pos::new(3, 5);
    Buffer::move_pos_on_insert(&mut p, Pos::new(0, 1), Pos::new(0, 3));
    assert_eq!(p, Pos::new(3, 7));
}

#[test]
fn test_repair_insert_multiline_on_own_line() {
    // inserting "x\nyy" at (2,0): a position at (4,0) lands after the
    // inserted tail on the new line
    let mut p = Pos::new(4, 0);
    Buffer::move_pos_on_insert(&mut p, Pos::new(2, 0), Pos::new(2, 1));
    assert_eq!(p, Pos::new(4, 1));
}

#[test]
fn test_repair_insert_leaves_earlier_positions() {
    let mut p = Pos::new(1, 2);
    Buffer::move_pos_on_insert(&mut p, Pos::new(2, 2), Pos::new(6, 2));
    assert_eq!(p, Pos::new(1, 2));
}

#[test]
fn test_repair_delete_collapses_interior() {
    let mut p = Pos::new(1, 1);
    Buffer::move_pos_on_delete(&mut p, Pos::new(2, 0), Pos::new(3, 2));
    assert_eq!(p, Pos::new(2, 0));
}

#[test]
fn test_repair_delete_shifts_lines_up() {
    let mut p = Pos::new(4, 6);
    Buffer::move_pos_on_delete(&mut p, Pos::new(0, 1), Pos::new(0, 3));
    assert_eq!(p, Pos::new(4, 4));
}

#[test]
fn test_repair_delete_migrates_tail_of_last_row() {
    let mut p = Pos::new(5, 2);
    Buffer::move_pos_on_delete(&mut p, Pos::new(1, 1), Pos::new(3, 2));
    assert_eq!(p, Pos::new(3, 1));
}

#[test]
fn test_repair_ghost_refreshes_to_visual_column() {
    let mut buffer = text_buffer(&["\tab"]);
    buffer.tab_width = 4;
    let mut cursors = vec![Cursor {
        pos: Pos::new(2, 0),
        ghost: Ghost::Eol,
    }];
    buffer.insert(&mut cursors, Pos::new(1, 0), "x", Some(0), true);
    assert_eq!(cursors[0].pos, Pos::new(3, 0));
    // tab(4) + 'x' + 'a' = visual column 6
    assert_eq!(cursors[0].ghost, Ghost::Col(6));
}

#[test]
fn test_highlights_are_repaired() {
    let mut buffer = text_buffer(&["abc", "def"]);
    buffer.highlight_range(Pos::new(0, 1), Pos::new(3, 1));
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.insert(&mut cursors, Pos::new(0, 0), "x\n", Some(0), true);
    // original highlight shifted down one line (a fresh one was pushed by
    // the insert itself)
    assert!(buffer
        .highlights
        .iter()
        .any(|h| h.range.a == Pos::new(0, 2) && h.range.b == Pos::new(3, 2)));
}

// =============================================================================
// Line-Level Operations
// =============================================================================

#[test]
fn test_delete_line_middle() {
    let mut buffer = text_buffer(&["a", "b", "c"]);
    let mut cursors = vec![Cursor::new(0, 1)];
    buffer.delete_line_at(&mut cursors, 1, Some(0));
    assert_eq!(contents(&buffer), vec!["a", "c"]);
    assert_eq!(cursors[0].pos, Pos::new(0, 1));
}

#[test]
fn test_delete_line_on_single_line_truncates() {
    let mut buffer = text_buffer(&["only"]);
    let mut cursors = vec![Cursor::new(2, 0)];
    buffer.delete_line_at(&mut cursors, 0, Some(0));
    assert_eq!(contents(&buffer), vec![""]);
    assert_eq!(cursors[0].pos, Pos::new(0, 0));
}

#[test]
fn test_delete_char_mid_line() {
    let mut buffer = text_buffer(&["abc"]);
    let mut cursors = vec![Cursor::new(2, 0)];
    buffer.delete_char(&mut cursors, 0);
    assert_eq!(contents(&buffer), vec!["ac"]);
    assert_eq!(cursors[0].pos, Pos::new(1, 0));
}

#[test]
fn test_delete_char_at_column_zero_joins_lines() {
    let mut buffer = text_buffer(&["ab", "cd"]);
    let mut cursors = vec![Cursor::new(0, 1)];
    buffer.delete_char(&mut cursors, 0);
    assert_eq!(contents(&buffer), vec!["abcd"]);
    assert_eq!(cursors[0].pos, Pos::new(2, 0));
}

#[test]
fn test_delete_char_at_origin_is_a_noop() {
    let mut buffer = text_buffer(&["ab"]);
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.delete_char(&mut cursors, 0);
    assert_eq!(contents(&buffer), vec!["ab"]);
}

#[test]
fn test_delete_char_multibyte() {
    let mut buffer = text_buffer(&["aé日"]);
    let mut cursors = vec![Cursor::new(3, 0)];
    buffer.delete_char(&mut cursors, 0);
    assert_eq!(contents(&buffer), vec!["aé"]);
    buffer.delete_char(&mut cursors, 0);
    assert_eq!(contents(&buffer), vec!["a"]);
}

#[test]
fn test_insert_tab_spaces_policy() {
    let mut buffer = text_buffer(&["x"]);
    buffer.tab_type = 2;
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.insert_tab_at_cursors(&mut cursors);
    assert_eq!(contents(&buffer), vec!["  x"]);
}

#[test]
fn test_insert_tab_hard_policy() {
    let mut buffer = text_buffer(&["x"]);
    buffer.tab_type = 0;
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.insert_tab_at_cursors(&mut cursors);
    assert_eq!(contents(&buffer), vec!["\tx"]);
}

// =============================================================================
// Newline and Auto-Indent
// =============================================================================

#[test]
fn test_insert_newline_splits_line() {
    let mut buffer = text_buffer(&["abcd"]);
    let mut cursors = vec![Cursor::new(2, 0)];
    buffer.insert_newline(&mut cursors);
    assert_eq!(contents(&buffer), vec!["ab", "cd"]);
    assert_eq!(cursors[0].pos, Pos::new(0, 1));
}

#[test]
fn test_insert_newline_trims_whitespace_only_line() {
    let mut buffer = c_buffer(&["if (x) {", "    "]);
    let mut cursors = vec![Cursor::new(4, 1)];
    buffer.insert_newline(&mut cursors);
    // the whitespace-only line is cleared, then the new line is indented
    // one unit under the opening brace
    assert_eq!(contents(&buffer), vec!["if (x) {", "", "    "]);
    assert_eq!(cursors[0].pos, Pos::new(4, 2));
}

#[test]
fn test_insert_newline_after_open_brace_indents() {
    let mut buffer = c_buffer(&["if (x) {"]);
    let mut cursors = vec![Cursor::new(8, 0)];
    buffer.insert_newline(&mut cursors);
    assert_eq!(contents(&buffer), vec!["if (x) {", "    "]);
    assert_eq!(cursors[0].pos, Pos::new(4, 1));
}

#[test]
fn test_auto_indent_close_brace_dedents() {
    let mut buffer = c_buffer(&["if (x) {", "    body;", "    }"]);
    let mut cursors = vec![Cursor::new(0, 2)];
    buffer.auto_indent_line(&mut cursors, 2);
    assert_eq!(contents(&buffer), vec!["if (x) {", "    body;", "}"]);
}

#[test]
fn test_auto_indent_statement_head_indents_next_line() {
    let mut buffer = c_buffer(&["if (x)", "y;"]);
    let mut cursors = vec![Cursor::new(0, 1)];
    buffer.auto_indent_line(&mut cursors, 1);
    assert_eq!(contents(&buffer), vec!["if (x)", "    y;"]);
}

#[test]
fn test_auto_indent_unwinds_statement_chain() {
    // if (...) / if (...) / stmt: the next line dedents past both heads
    let mut buffer = c_buffer(&["if (a)", "    if (b)", "        stmt();", "next();"]);
    let mut cursors = vec![Cursor::new(0, 3)];
    buffer.auto_indent_line(&mut cursors, 3);
    assert_eq!(
        contents(&buffer),
        vec!["if (a)", "    if (b)", "        stmt();", "next();"]
    );
}

#[test]
fn test_auto_indent_is_idempotent() {
    let mut buffer = c_buffer(&["while (1) {", "  x;"]);
    let mut cursors = vec![Cursor::new(0, 1)];
    buffer.auto_indent_line(&mut cursors, 1);
    let once = contents(&buffer);
    buffer.auto_indent_line(&mut cursors, 1);
    assert_eq!(contents(&buffer), once);
}

#[test]
fn test_auto_indent_ignores_braces_in_strings_and_comments() {
    let mut buffer = c_buffer(&["s = \"{{{\"; // {", "x;"]);
    let mut cursors = vec![Cursor::new(0, 1)];
    buffer.auto_indent_line(&mut cursors, 1);
    assert_eq!(contents(&buffer), vec!["s = \"{{{\"; // {", "x;"]);
}

#[test]
fn test_add_indent_clamps_at_zero() {
    let mut buffer = c_buffer(&["    x;"]);
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.add_indent(&mut cursors, 0, -3);
    assert_eq!(contents(&buffer), vec!["x;"]);
}

#[test]
fn test_set_indent_reaches_target() {
    let mut buffer = c_buffer(&["x;"]);
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.set_indent(&mut cursors, 0, 2);
    assert_eq!(contents(&buffer), vec!["        x;"]);
    assert_eq!(buffer.indent_of(0), 2);
}

// =============================================================================
// Undo / Redo
// =============================================================================

#[test]
fn test_undo_restores_buffer_and_cursors() {
    let mut buffer = text_buffer(&["start"]);
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.insert_at_cursors(&mut cursors, "abc");
    assert_eq!(contents(&buffer), vec!["abcstart"]);

    buffer.undo(&mut cursors);
    assert_eq!(contents(&buffer), vec!["start"]);
    assert_eq!(cursors[0].pos, Pos::new(0, 0));
}

#[test]
fn test_undo_redo_round_trip() {
    // property: undo to exhaustion restores the origin, redo to exhaustion
    // restores the final state
    let mut buffer = text_buffer(&["one", "two"]);
    let mut cursors = vec![Cursor::new(0, 0)];
    let origin = contents(&buffer);

    buffer.insert_at_cursors(&mut cursors, "A\nB");
    buffer.delete_lines_at_cursors(&mut cursors);
    buffer.insert_at_cursors(&mut cursors, "tail");
    let end_state = contents(&buffer);
    let end_cursors: Vec<Pos> = cursors.iter().map(|c| c.pos).collect();

    while buffer.journal.can_undo() {
        buffer.undo(&mut cursors);
    }
    assert_eq!(contents(&buffer), origin);
    assert_eq!(cursors[0].pos, Pos::new(0, 0));

    while buffer.journal.can_redo() {
        buffer.redo(&mut cursors);
    }
    assert_eq!(contents(&buffer), end_state);
    assert_eq!(cursors.iter().map(|c| c.pos).collect::<Vec<_>>(), end_cursors);
}

#[test]
fn test_undo_of_grouped_multi_cursor_edit() {
    let mut buffer = text_buffer(&["abc", "def"]);
    let mut cursors = vec![Cursor::new(3, 0), Cursor::new(3, 1)];
    buffer.insert_at_cursors(&mut cursors, "X");
    buffer.undo(&mut cursors);
    assert_eq!(contents(&buffer), vec!["abc", "def"]);
    assert_eq!(cursors.len(), 2);
    assert_eq!(cursors[0].pos, Pos::new(3, 0));
    assert_eq!(cursors[1].pos, Pos::new(3, 1));
}

#[test]
fn test_new_edit_after_undo_drops_redo() {
    let mut buffer = text_buffer(&[""]);
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.insert_at_cursors(&mut cursors, "first");
    buffer.undo(&mut cursors);
    buffer.insert_at_cursors(&mut cursors, "second");
    assert!(!buffer.journal.can_redo());
    buffer.redo(&mut cursors);
    assert_eq!(contents(&buffer), vec!["second"]);
}

#[test]
fn test_modified_flag_tracks_save_and_undo() {
    // scenario: save after one edit, edit again, then undo back to the
    // saved state
    let mut buffer = text_buffer(&[""]);
    let mut cursors = vec![Cursor::new(0, 0)];
    assert!(!buffer.modified());

    buffer.insert_at_cursors(&mut cursors, "one");
    assert!(buffer.modified());
    buffer.mark_saved();
    assert!(!buffer.modified());

    buffer.insert_at_cursors(&mut cursors, "two");
    assert!(buffer.modified());

    buffer.undo(&mut cursors);
    assert!(!buffer.modified());
}

#[test]
fn test_delete_only_group_fills_clipboard() {
    let mut buffer = text_buffer(&["a", "b", "c"]);
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.remove_range(&mut cursors, Pos::new(0, 0), Pos::new(1, 2), Some(0), true);
    assert_eq!(buffer.take_clipboard().as_deref(), Some("a\nb\nc"));
    assert_eq!(contents(&buffer), vec![""]);
}

#[test]
fn test_insert_group_does_not_fill_clipboard() {
    let mut buffer = text_buffer(&[""]);
    let mut cursors = vec![Cursor::new(0, 0)];
    buffer.insert_at_cursors(&mut cursors, "x");
    assert!(buffer.take_clipboard().is_none());
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_range_to_string_multi_line() {
    let buffer = text_buffer(&["one", "two", "three"]);
    assert_eq!(
        buffer.range_to_string(Range::new(Pos::new(1, 0), Pos::new(2, 2))),
        "ne\ntwo\nth"
    );
    assert_eq!(
        buffer.range_to_string(Range::new(Pos::new(0, 1), Pos::new(3, 1))),
        "two"
    );
}

#[test]
fn test_advance_and_advance_r_cross_lines() {
    let buffer = text_buffer(&["ab", "c"]);
    let mut p = Pos::new(2, 0);
    assert!(buffer.advance(&mut p));
    assert_eq!(p, Pos::new(0, 1));
    assert!(buffer.advance_r(&mut p));
    assert_eq!(p, Pos::new(2, 0));

    let mut end = Pos::new(1, 1);
    assert!(!buffer.advance(&mut end));
    let mut start = Pos::new(0, 0);
    assert!(!buffer.advance_r(&mut start));
}

#[test]
fn test_find_forward_and_backward() {
    let buffer = text_buffer(&["abc abc", "abc"]);
    let mut p = Pos::new(0, 0);
    assert!(buffer.find("abc", false, &mut p));
    assert_eq!(p, Pos::new(4, 0));
    assert!(buffer.find("abc", false, &mut p));
    assert_eq!(p, Pos::new(0, 1));
    assert!(!buffer.find("abc", false, &mut p));

    let mut q = Pos::new(0, 1);
    assert!(buffer.find_r("abc", false, &mut q));
    assert_eq!(q, Pos::new(4, 0));
}

#[test]
fn test_find_stay_matches_in_place() {
    let buffer = text_buffer(&["abc"]);
    let mut p = Pos::new(0, 0);
    assert!(buffer.find("abc", true, &mut p));
    assert_eq!(p, Pos::new(0, 0));
}

#[test]
fn test_token_at_and_definition_of() {
    let buffer = c_buffer(&["int main() { return 0; }"]);
    let idx = buffer.token_at(Pos::new(5, 0)).unwrap();
    assert_eq!(buffer.parser.tokens[idx].text, "main");
    let def = buffer.definition_of("main").unwrap();
    assert_eq!(def.a, Pos::new(4, 0));
}

#[test]
fn test_guess_tab_type() {
    let mut spaces = text_buffer(&["top", "  indented"]);
    spaces.guess_tab_type();
    assert_eq!(spaces.tab_type, 2);

    let mut tabs = text_buffer(&["top", "\tindented"]);
    tabs.guess_tab_type();
    assert_eq!(tabs.tab_type, 0);
}

#[test]
fn test_to_contents_joins_with_endline() {
    let mut buffer = text_buffer(&["a", "b"]);
    assert_eq!(buffer.to_contents(), "a\nb");
    buffer.endline = Endline::Crlf;
    assert_eq!(buffer.to_contents(), "a\r\nb");
}

#[test]
fn test_tick_highlights_fades_and_drops() {
    let mut buffer = text_buffer(&["x"]);
    buffer.highlight_range(Pos::new(0, 0), Pos::new(1, 0));
    let ticks_to_drop = (1.0 / HIGHLIGHT_FADE_STEP).ceil() as usize;
    for _ in 0..ticks_to_drop {
        buffer.tick_highlights();
    }
    assert!(buffer.highlights.is_empty());
}
