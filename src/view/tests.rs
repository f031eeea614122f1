use super::*;
use crate::buffer::{Buffer, Endline};
use crate::parse::Language;

fn text_buffer(lines: &[&str]) -> Buffer {
    Buffer::from_lines(
        lines.iter().map(|s| s.to_string()).collect(),
        Language::Text,
        Endline::Lf,
    )
}

// =============================================================================
// Ghost Column Tests
// =============================================================================

#[test]
fn test_ghost_preserved_across_short_line() {
    let buffer = text_buffer(&["long line here", "ab", "another long line"]);
    let mut view = BufferView::new(0);
    view.move_to_x(&buffer, 0, 10);
    view.move_y(&buffer, 1);
    // clamped by the short line
    assert_eq!(view.primary().pos, Pos::new(2, 1));
    view.move_y(&buffer, 1);
    // ghost restores the wanted column
    assert_eq!(view.primary().pos, Pos::new(10, 2));
}

#[test]
fn test_ghost_is_visual_across_tabs() {
    let buffer = text_buffer(&["abcdefgh", "\tx"]);
    let mut view = BufferView::new(0);
    view.move_to_x(&buffer, 0, 4);
    view.move_y(&buffer, 1);
    // visual column 4 lands on 'x'; the tab covers visual columns 0-3
    assert_eq!(view.primary().pos, Pos::new(1, 1));
}

#[test]
fn test_eol_ghost_snaps_to_line_ends() {
    let buffer = text_buffer(&["short", "much longer line", "mid"]);
    let mut view = BufferView::new(0);
    view.goto_endline(&buffer);
    assert_eq!(view.primary().pos, Pos::new(5, 0));
    view.move_y(&buffer, 1);
    assert_eq!(view.primary().pos, Pos::new(16, 1));
    view.move_y(&buffer, 1);
    assert_eq!(view.primary().pos, Pos::new(3, 2));
}

#[test]
fn test_bol_ghost_snaps_to_first_nonblank() {
    let buffer = text_buffer(&["  a", "    b", "c"]);
    let mut view = BufferView::new(0);
    view.goto_beginline(&buffer);
    assert_eq!(view.primary().pos, Pos::new(2, 0));
    view.move_y(&buffer, 1);
    assert_eq!(view.primary().pos, Pos::new(4, 1));
    view.move_y(&buffer, 1);
    assert_eq!(view.primary().pos, Pos::new(0, 2));
}

#[test]
fn test_move_zero_is_stable() {
    // repairing then moving by zero must equal moving by zero then repairing
    let buffer = text_buffer(&["\tabc"]);
    let mut view = BufferView::new(0);
    view.move_to_x(&buffer, 0, 2);
    let before = view.primary();
    view.move_y(&buffer, 0);
    view.move_x(&buffer, 0);
    assert_eq!(view.primary(), before);
}

// =============================================================================
// Cursor Set Tests
// =============================================================================

#[test]
fn test_deduplicate_collapses_same_position() {
    let buffer = text_buffer(&["abc"]);
    let mut view = BufferView::new(0);
    view.cursors.push(Cursor::new(3, 0));
    view.cursors.push(Cursor::new(3, 0));
    view.deduplicate_cursors();
    assert_eq!(view.cursors.len(), 2);
    let _ = &buffer;
}

#[test]
fn test_motion_deduplicates() {
    let buffer = text_buffer(&["ab"]);
    let mut view = BufferView::new(0);
    view.cursors = vec![Cursor::new(1, 0), Cursor::new(2, 0)];
    // both clamp to end of line
    view.move_x(&buffer, 5);
    assert_eq!(view.cursors.len(), 1);
    assert_eq!(view.primary().pos, Pos::new(2, 0));
}

#[test]
fn test_collapse_cursors_keeps_primary() {
    let buffer = text_buffer(&["ab", "cd"]);
    let mut view = BufferView::new(0);
    view.cursors.push(Cursor::new(1, 1));
    view.collapse_cursors();
    assert_eq!(view.cursors.len(), 1);
    assert_eq!(view.primary().pos, Pos::new(0, 0));
    let _ = &buffer;
}

// =============================================================================
// Word Motion Tests
// =============================================================================

#[test]
fn test_move_word_hops_identifiers() {
    let buffer = text_buffer(&["foo bar+baz"]);
    let mut view = BufferView::new(0);
    view.move_word(&buffer);
    assert_eq!(view.primary().pos, Pos::new(4, 0));
    view.move_word(&buffer);
    assert_eq!(view.primary().pos, Pos::new(7, 0));
}

#[test]
fn test_move_word_r_returns_to_word_start() {
    let buffer = text_buffer(&["foo bar"]);
    let mut view = BufferView::new(0);
    view.move_to_x(&buffer, 0, 6);
    view.move_word_r(&buffer);
    assert_eq!(view.primary().pos, Pos::new(4, 0));
    view.move_word_r(&buffer);
    assert_eq!(view.primary().pos, Pos::new(0, 0));
}

#[test]
fn test_move_word_crosses_lines() {
    let buffer = text_buffer(&["end", "next"]);
    let mut view = BufferView::new(0);
    view.move_word(&buffer);
    assert_eq!(view.primary().pos, Pos::new(0, 1));
}

// =============================================================================
// Find Tests
// =============================================================================

#[test]
fn test_find_and_move_collapses_and_moves() {
    let buffer = text_buffer(&["a needle here"]);
    let mut view = BufferView::new(0);
    view.cursors.push(Cursor::new(0, 0));
    assert!(view.find_and_move(&buffer, "needle", false));
    assert_eq!(view.cursors.len(), 1);
    assert_eq!(view.primary().pos, Pos::new(2, 0));
}

#[test]
fn test_find_and_move_failure_leaves_cursor() {
    let buffer = text_buffer(&["nothing to see"]);
    let mut view = BufferView::new(0);
    view.move_to_x(&buffer, 0, 3);
    assert!(!view.find_and_move(&buffer, "absent", false));
    assert_eq!(view.primary().pos, Pos::new(3, 0));
}

// =============================================================================
// Jumplist Tests
// =============================================================================

#[test]
fn test_jumplist_push_dedups_consecutive() {
    let buffer = text_buffer(&["abcdef"]);
    let mut view = BufferView::new(0);
    view.jumplist_push();
    view.jumplist_push();
    assert_eq!(view.jumplist.len(), 1);
    let _ = &buffer;
}

#[test]
fn test_jumplist_prev_and_next_walk_history() {
    let buffer = text_buffer(&["one", "two", "three", "four"]);
    let mut view = BufferView::new(0);
    view.jumplist_push(); // (0,0)
    view.move_to(&buffer, Pos::new(0, 2));
    view.jumplist_push(); // (0,2)
    view.move_to(&buffer, Pos::new(0, 3));

    view.jumplist_prev(&buffer);
    assert_eq!(view.primary().pos, Pos::new(0, 2));
    view.jumplist_prev(&buffer);
    assert_eq!(view.primary().pos, Pos::new(0, 0));
    view.jumplist_next(&buffer);
    assert_eq!(view.primary().pos, Pos::new(0, 2));
}

#[test]
fn test_jumplist_skips_entries_equal_to_cursor() {
    let buffer = text_buffer(&["one", "two"]);
    let mut view = BufferView::new(0);
    view.jumplist_push(); // (0,0)
    view.move_to(&buffer, Pos::new(0, 1));
    view.jumplist_push(); // (0,1)
    view.move_to(&buffer, Pos::new(0, 1));

    // top entry equals the cursor; prev should skip past it
    view.jumplist_prev(&buffer);
    assert_eq!(view.primary().pos, Pos::new(0, 0));
}

// =============================================================================
// Sync Tests
// =============================================================================

#[test]
fn test_sync_replays_edits_from_other_views() {
    let mut buffer = text_buffer(&["abc", "def"]);
    let mut other = BufferView::new(0);
    other.move_to(&buffer, Pos::new(0, 1));
    other.jumplist_push();

    // another view inserts a line above
    let mut acting = vec![Cursor::new(0, 0)];
    buffer.insert(&mut acting, Pos::new(0, 0), "new\n", Some(0), true);

    other.sync(&buffer);
    assert_eq!(other.primary().pos, Pos::new(0, 2));
    assert_eq!(other.jumplist, vec![Pos::new(0, 2)]);
    assert_eq!(other.synced_edits, buffer.edit_log().len());
}

#[test]
fn test_sync_is_idempotent() {
    let mut buffer = text_buffer(&["abc"]);
    let mut view = BufferView::new(0);
    let mut acting = vec![Cursor::new(0, 0)];
    buffer.insert(&mut acting, Pos::new(0, 0), "xy", Some(0), true);

    view.sync(&buffer);
    let pos = view.primary().pos;
    view.sync(&buffer);
    assert_eq!(view.primary().pos, pos);
}
