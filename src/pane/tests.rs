use super::*;

fn edit_pane(arena: &mut PaneArena) -> PaneId {
    arena.insert(Pane::new(PaneKind::Edit, 0))
}

// =============================================================================
// Arena Tests
// =============================================================================

#[test]
fn test_insert_reuses_free_slots() {
    let mut arena = PaneArena::new();
    let a = edit_pane(&mut arena);
    let b = edit_pane(&mut arena);
    arena.queue_remove(a);
    arena.process_removals();
    assert!(!arena.is_alive(a));
    assert!(arena.is_alive(b));

    let c = edit_pane(&mut arena);
    assert_eq!(c, a);
    assert!(arena.is_alive(c));
}

#[test]
fn test_removal_is_deferred_until_processed() {
    let mut arena = PaneArena::new();
    let a = edit_pane(&mut arena);
    arena.queue_remove(a);
    // still visible while the frame is in flight
    assert!(arena.is_alive(a));
    assert!(arena.has_pending_removals());
    let removed = arena.process_removals();
    assert_eq!(removed, vec![a]);
    assert!(!arena.is_alive(a));
}

#[test]
fn test_removal_cascades_to_subpanes() {
    let mut arena = PaneArena::new();
    let root = edit_pane(&mut arena);
    let child = edit_pane(&mut arena);
    let grandchild = edit_pane(&mut arena);
    arena.add_subpane(root, child);
    arena.add_subpane(child, grandchild);

    arena.queue_remove(child);
    arena.process_removals();
    assert!(arena.is_alive(root));
    assert!(!arena.is_alive(child));
    assert!(!arena.is_alive(grandchild));
    assert!(arena.get(root).subpanes.is_empty());
}

#[test]
fn test_double_queue_is_harmless() {
    let mut arena = PaneArena::new();
    let a = edit_pane(&mut arena);
    arena.queue_remove(a);
    arena.queue_remove(a);
    assert_eq!(arena.process_removals(), vec![a]);
}

// =============================================================================
// Reflow Tests
// =============================================================================

#[test]
fn test_equal_weights_split_evenly() {
    let mut arena = PaneArena::new();
    let a = edit_pane(&mut arena);
    let b = edit_pane(&mut arena);
    arena.reflow(&[a, b], Rect::new(0, 0, 100, 50));
    assert_eq!(arena.get(a).rect, Rect::new(0, 0, 50, 50));
    assert_eq!(arena.get(b).rect, Rect::new(50, 0, 50, 50));
}

#[test]
fn test_weights_shift_the_split() {
    let mut arena = PaneArena::new();
    let a = edit_pane(&mut arena);
    let b = edit_pane(&mut arena);
    arena.get_mut(a).width_weight = 1.0; // share 2 against 1
    arena.reflow(&[a, b], Rect::new(0, 0, 90, 30));
    assert_eq!(arena.get(a).rect.w, 60);
    assert_eq!(arena.get(b).rect.w, 30);
}

#[test]
fn test_last_sibling_absorbs_rounding() {
    let mut arena = PaneArena::new();
    let a = edit_pane(&mut arena);
    let b = edit_pane(&mut arena);
    let c = edit_pane(&mut arena);
    arena.reflow(&[a, b, c], Rect::new(0, 0, 100, 10));
    let total: i32 = [a, b, c].iter().map(|&p| arena.get(p).rect.w).sum();
    assert_eq!(total, 100);
}

#[test]
fn test_subpanes_stack_in_right_column() {
    let mut arena = PaneArena::new();
    let root = edit_pane(&mut arena);
    let upper = edit_pane(&mut arena);
    let lower = edit_pane(&mut arena);
    arena.add_subpane(root, upper);
    arena.add_subpane(root, lower);
    arena.reflow(&[root], Rect::new(0, 0, 100, 40));

    let root_rect = arena.get(root).rect;
    let upper_rect = arena.get(upper).rect;
    let lower_rect = arena.get(lower).rect;
    assert_eq!(root_rect.w, 50);
    assert_eq!(upper_rect.x, 50);
    assert_eq!(upper_rect.h + lower_rect.h, 40);
    assert_eq!(lower_rect.y, upper_rect.y + upper_rect.h);
}

#[test]
fn test_dead_roots_are_skipped() {
    let mut arena = PaneArena::new();
    let a = edit_pane(&mut arena);
    let b = edit_pane(&mut arena);
    arena.queue_remove(a);
    arena.process_removals();
    arena.reflow(&[a, b], Rect::new(0, 0, 80, 20));
    assert_eq!(arena.get(b).rect, Rect::new(0, 0, 80, 20));
}
