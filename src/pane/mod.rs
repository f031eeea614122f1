//! Pane tree
//! Panes live in an arena and reference each other by index; `parent` and
//! `subpanes` hold ids, never pointers. Removal is deferred through a
//! per-frame queue so no iteration in flight ever sees a dead pane.

use crate::buffer::BufferId;
use crate::render::Rect;
use crate::view::BufferView;

pub type PaneId = usize;

/// What a pane shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    /// A buffer view with gutter and highlights
    Edit,
    /// Single editable line plus a suggestion list
    Menu,
    /// Single read-only line
    Status,
    /// Floating suggestion list
    Dropdown,
}

/// One pane bound to a buffer view
#[derive(Debug, Clone)]
pub struct Pane {
    pub kind: PaneKind,
    pub view: BufferView,
    pub parent: Option<PaneId>,
    pub subpanes: Vec<PaneId>,
    /// Share factors; siblings split space proportionally to `1 + weight`
    pub width_weight: f32,
    pub height_weight: f32,
    pub rect: Rect,
    /// First visible buffer line
    pub scroll: usize,
    /// Tombstone; set by deferred removal
    pub dead: bool,
    /// Suggestion list of menu/dropdown panes
    pub suggestions: Vec<String>,
    /// Selected suggestion index
    pub selection: Option<usize>,
}

impl Pane {
    #[must_use]
    pub fn new(kind: PaneKind, buffer: BufferId) -> Self {
        Pane {
            kind,
            view: BufferView::new(buffer),
            parent: None,
            subpanes: Vec::new(),
            width_weight: 0.0,
            height_weight: 0.0,
            rect: Rect::default(),
            scroll: 0,
            dead: false,
            suggestions: Vec::new(),
            selection: None,
        }
    }
}

/// Arena of panes with deferred removal
#[derive(Debug, Default)]
pub struct PaneArena {
    panes: Vec<Pane>,
    free: Vec<PaneId>,
    to_remove: Vec<PaneId>,
}

impl PaneArena {
    #[must_use]
    pub fn new() -> Self {
        PaneArena::default()
    }

    pub fn insert(&mut self, pane: Pane) -> PaneId {
        match self.free.pop() {
            Some(id) => {
                self.panes[id] = pane;
                id
            }
            None => {
                self.panes.push(pane);
                self.panes.len() - 1
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: PaneId) -> &Pane {
        &self.panes[id]
    }

    pub fn get_mut(&mut self, id: PaneId) -> &mut Pane {
        &mut self.panes[id]
    }

    #[must_use]
    pub fn is_alive(&self, id: PaneId) -> bool {
        id < self.panes.len() && !self.panes[id].dead
    }

    /// Ids of all live panes
    pub fn ids(&self) -> impl Iterator<Item = PaneId> + '_ {
        (0..self.panes.len()).filter(|&id| !self.panes[id].dead)
    }

    /// Attach `child` under `parent`
    pub fn add_subpane(&mut self, parent: PaneId, child: PaneId) {
        self.panes[child].parent = Some(parent);
        self.panes[parent].subpanes.push(child);
    }

    /// Queue a pane (and transitively its subpanes) for removal after the
    /// current frame
    pub fn queue_remove(&mut self, id: PaneId) {
        if !self.to_remove.contains(&id) {
            self.to_remove.push(id);
        }
    }

    #[must_use]
    pub fn has_pending_removals(&self) -> bool {
        !self.to_remove.is_empty()
    }

    /// Apply queued removals. Returns the ids actually removed.
    pub fn process_removals(&mut self) -> Vec<PaneId> {
        let mut removed = Vec::new();
        let mut queue = std::mem::take(&mut self.to_remove);
        while let Some(id) = queue.pop() {
            if !self.is_alive(id) {
                continue;
            }
            // children go too
            queue.extend(self.panes[id].subpanes.clone());

            if let Some(parent) = self.panes[id].parent {
                if self.is_alive(parent) {
                    self.panes[parent].subpanes.retain(|&c| c != id);
                }
            }
            self.panes[id].dead = true;
            self.panes[id].subpanes.clear();
            self.panes[id].parent = None;
            self.free.push(id);
            removed.push(id);
        }
        removed
    }

    // =========================================================================
    // Reflow
    // =========================================================================

    /// Lay out the root panes side by side over `area`, then recurse.
    /// Sibling widths are proportional to `1 + width_weight`.
    pub fn reflow(&mut self, roots: &[PaneId], area: Rect) {
        let roots: Vec<PaneId> = roots.iter().copied().filter(|&r| self.is_alive(r)).collect();
        if roots.is_empty() {
            return;
        }
        let total: f32 = roots
            .iter()
            .map(|&r| 1.0 + self.panes[r].width_weight.max(-0.9))
            .sum();
        let mut x = area.x;
        for (i, &root) in roots.iter().enumerate() {
            let share = (1.0 + self.panes[root].width_weight.max(-0.9)) / total;
            let mut w = (area.w as f32 * share) as i32;
            if i == roots.len() - 1 {
                w = area.x + area.w - x;
            }
            self.layout_pane(root, Rect::new(x, area.y, w, area.h));
            x += w;
        }
    }

    /// A pane with subpanes keeps a content column on the left and stacks
    /// its children in a column on the right; both splits are weighted.
    fn layout_pane(&mut self, id: PaneId, rect: Rect) {
        let children: Vec<PaneId> = self.panes[id]
            .subpanes
            .iter()
            .copied()
            .filter(|&c| self.is_alive(c))
            .collect();
        if children.is_empty() {
            self.panes[id].rect = rect;
            return;
        }

        let own = 1.0 + self.panes[id].width_weight.max(-0.9);
        let content_w = (rect.w as f32 * own / (own + 1.0)) as i32;
        self.panes[id].rect = Rect::new(rect.x, rect.y, content_w, rect.h);

        let column = Rect::new(
            rect.x + content_w,
            rect.y,
            rect.w - content_w,
            rect.h,
        );
        let total: f32 = children
            .iter()
            .map(|&c| 1.0 + self.panes[c].height_weight.max(-0.9))
            .sum();
        let mut y = column.y;
        for (i, &child) in children.iter().enumerate() {
            let share = (1.0 + self.panes[child].height_weight.max(-0.9)) / total;
            let mut h = (column.h as f32 * share) as i32;
            if i == children.len() - 1 {
                h = column.y + column.h - y;
            }
            self.layout_pane(child, Rect::new(column.x, y, column.w, h));
            y += h;
        }
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
