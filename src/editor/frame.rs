//! Frame assembly
//! Turns editor state into the renderer's three lists each tick: pane
//! backgrounds and cursors as quads, buffer content as text runs, and the
//! menu/dropdown/status overlays.

use super::Editor;
use crate::constants::ui;
use crate::mode::Mode;
use crate::pane::PaneId;
use crate::position::visual_x;
use crate::render::{Frame, Rect, Renderer};

/// Font size the editor lays out with
pub const FONT_PX: u32 = 15;

impl Editor {
    /// Lay out panes against the current window and build the frame
    pub fn build_frame(&mut self, renderer: &dyn Renderer) -> Frame {
        let (win_w, win_h) = renderer.window_size();
        let advance = renderer.glyph_advance(FONT_PX).max(1) as i32;
        let line_h = renderer.line_height(FONT_PX).max(1) as i32;
        let status_h = line_h * ui::STATUS_ROWS as i32;

        let roots: Vec<PaneId> = self
            .editing_panes
            .iter()
            .copied()
            .filter(|&id| self.panes.is_alive(id) && self.panes.get(id).parent.is_none())
            .collect();
        self.panes.reflow(
            &roots,
            Rect::new(0, 0, win_w as i32, win_h as i32 - status_h),
        );

        let mut frame = Frame::new();
        frame.push_quad(
            Rect::new(0, 0, win_w as i32, win_h as i32),
            self.scheme.get("background"),
        );

        let edit_panes: Vec<PaneId> = self
            .editing_panes
            .iter()
            .copied()
            .filter(|&id| self.panes.is_alive(id))
            .collect();
        for id in edit_panes {
            self.scroll_to_cursor(id, line_h);
            self.draw_edit_pane(&mut frame, id, advance, line_h);
        }

        self.draw_status(&mut frame, win_w as i32, win_h as i32, line_h);
        if self.mode_uses_menu() {
            self.draw_menu(&mut frame, win_w as i32, win_h as i32, advance, line_h);
        }
        self.draw_dropdown(&mut frame, advance, line_h);
        frame
    }

    fn mode_uses_menu(&self) -> bool {
        matches!(
            self.mode,
            Mode::Menu
                | Mode::Search
                | Mode::FileSearch
                | Mode::GotoDefinition
                | Mode::Cwd
                | Mode::Prompt
        )
    }

    /// Keep the primary cursor inside the pane
    fn scroll_to_cursor(&mut self, id: PaneId, line_h: i32) {
        let rows = (self.panes.get(id).rect.h / line_h).max(1) as usize;
        let pane = self.panes.get_mut(id);
        let y = pane.view.primary().pos.y;
        if y < pane.scroll {
            pane.scroll = y;
        }
        if y >= pane.scroll + rows {
            pane.scroll = y + 1 - rows;
        }
    }

    fn draw_edit_pane(&self, frame: &mut Frame, id: PaneId, advance: i32, line_h: i32) {
        let pane = self.panes.get(id);
        let buffer = &self.buffers[&pane.view.buffer];
        let rect = pane.rect;
        let focused = id == self.editing_pane;

        let gutter_cols = buffer.num_lines().to_string().len() + ui::GUTTER_PAD;
        let gutter_w = gutter_cols as i32 * advance;
        frame.push_quad(
            Rect::new(rect.x, rect.y, gutter_w, rect.h),
            self.scheme.get("gutter_background"),
        );

        let rows = (rect.h / line_h).max(1) as usize;
        let top = pane.scroll;
        let text_x = rect.x + gutter_w;

        // current-line backdrop
        let primary = pane.view.primary().pos;
        if primary.y >= top && primary.y < top + rows {
            let key = if focused {
                "line_highlight"
            } else {
                "line_highlight_inactive"
            };
            frame.push_quad(
                Rect::new(
                    rect.x,
                    rect.y + (primary.y - top) as i32 * line_h,
                    rect.w,
                    line_h,
                ),
                self.scheme.get(key),
            );
        }

        // fading paste/yank flashes
        for h in &buffer.highlights {
            let r = h.range;
            for y in r.a.y..=r.b.y.min(buffer.num_lines() - 1) {
                if y < top || y >= top + rows {
                    continue;
                }
                let line = buffer.line(y).as_str();
                let x0 = if y == r.a.y { r.a.x } else { 0 };
                let x1 = if y == r.b.y { r.b.x } else { buffer.line(y).len() };
                let vx0 = visual_x(line, x0, buffer.tab_width) as i32;
                let vx1 = visual_x(line, x1.max(x0), buffer.tab_width) as i32;
                let flash = self
                    .scheme
                    .get("search_term_background")
                    .blend(self.scheme.get("background"), h.fade);
                frame.push_quad(
                    Rect::new(
                        text_x + vx0 * advance,
                        rect.y + (y - top) as i32 * line_h,
                        ((vx1 - vx0).max(1)) * advance,
                        line_h,
                    ),
                    flash,
                );
            }
        }

        // cursors
        for c in &pane.view.cursors {
            if c.pos.y < top || c.pos.y >= top + rows {
                continue;
            }
            let vx = visual_x(buffer.line(c.pos.y).as_str(), c.pos.x, buffer.tab_width) as i32;
            let key = if focused { "syntax_text" } else { "marker_inactive" };
            frame.push_quad(
                Rect::new(
                    text_x + vx * advance,
                    rect.y + (c.pos.y - top) as i32 * line_h,
                    advance,
                    line_h,
                ),
                self.scheme.get(key),
            );
        }

        // gutter numbers and buffer text
        for row in 0..rows {
            let y = top + row;
            if y >= buffer.num_lines() {
                break;
            }
            let py = rect.y + row as i32 * line_h;
            frame.push_text(
                format!("{:>width$}", y + 1, width = gutter_cols - ui::GUTTER_PAD),
                rect.x,
                py,
                self.scheme.get("gutter_text"),
                FONT_PX,
            );

            let line = buffer.line(y);
            if !line.is_empty() {
                frame.push_text(
                    line.as_str(),
                    text_x,
                    py,
                    self.scheme.get("syntax_text"),
                    FONT_PX,
                );
            }

            // overdraw classified tokens in their category colour
            for t in &buffer.parser.tokens {
                if t.a.y > y {
                    break;
                }
                if t.a.y != y || t.b.y != y || t.text.is_empty() {
                    continue;
                }
                let keyword = buffer.language.keyword_kind(&t.text);
                let color = self.scheme.token_color(t.kind, keyword);
                if color == self.scheme.get("syntax_text") {
                    continue;
                }
                let vx = visual_x(line.as_str(), t.a.x, buffer.tab_width) as i32;
                frame.push_text(t.text.clone(), text_x + vx * advance, py, color, FONT_PX);
            }
        }
    }

    fn draw_status(&self, frame: &mut Frame, win_w: i32, win_h: i32, line_h: i32) {
        let y = win_h - line_h;
        frame.push_quad(
            Rect::new(0, y, win_w, line_h),
            self.scheme.get("menu_background"),
        );
        let buffer = self.active_buffer();
        let marker = if buffer.modified() { " [+]" } else { "" };
        let left = format!(
            "{}  {}{}  {}",
            self.mode.name(),
            buffer.display_name(),
            marker,
            self.status_message
        );
        frame.push_text(left, 0, y, self.scheme.get("syntax_text"), FONT_PX);
    }

    fn draw_menu(&self, frame: &mut Frame, win_w: i32, win_h: i32, advance: i32, line_h: i32) {
        let pane = self.panes.get(self.menu_pane);
        let rows = 1 + pane.suggestions.len() as i32;
        let h = rows * line_h;
        let y = win_h - line_h - h;
        frame.push_quad(Rect::new(0, y, win_w, h), self.scheme.get("menu_background"));

        let prefix = match self.mode {
            Mode::Search => "search: ",
            Mode::FileSearch => "open: ",
            Mode::Cwd => "cd: ",
            Mode::GotoDefinition => "def: ",
            Mode::Prompt => "> ",
            _ => ": ",
        };
        let typed = self.menu_line();
        frame.push_text(
            format!("{}{}", prefix, typed),
            0,
            y,
            self.scheme.get("syntax_text"),
            FONT_PX,
        );

        // caret of the menu line
        let caret_x = (prefix.chars().count() + pane.view.primary().pos.x) as i32 * advance;
        frame.push_quad(
            Rect::new(caret_x, y, advance, line_h),
            self.scheme.get("syntax_text"),
        );

        for (i, suggestion) in pane.suggestions.iter().enumerate() {
            let sy = y + (1 + i as i32) * line_h;
            if pane.selection == Some(i) {
                frame.push_quad(
                    Rect::new(0, sy, win_w, line_h),
                    self.scheme.get("menu_highlight"),
                );
            }
            frame.push_text(
                suggestion.clone(),
                advance,
                sy,
                self.scheme.get("syntax_text"),
                FONT_PX,
            );
        }
    }

    fn draw_dropdown(&self, frame: &mut Frame, advance: i32, line_h: i32) {
        let dropdown = self.panes.get(self.dropdown_pane);
        if dropdown.suggestions.is_empty() || self.mode != Mode::Insert {
            return;
        }
        let pane = self.panes.get(self.editing_pane);
        let buffer = &self.buffers[&pane.view.buffer];
        let primary = pane.view.primary().pos;
        let vx = visual_x(buffer.line(primary.y).as_str(), primary.x, buffer.tab_width) as i32;
        let x = pane.rect.x + vx * advance;
        let y = pane.rect.y + (primary.y.saturating_sub(pane.scroll) + 1) as i32 * line_h;

        let w = dropdown
            .suggestions
            .iter()
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0) as i32
            * advance
            + advance;
        let h = dropdown.suggestions.len() as i32 * line_h;

        // drop shadow behind the suggestion box
        frame.push_quad(
            Rect::new(x + advance / 2, y + line_h / 4, w, h),
            self.scheme.get("shadow"),
        );
        frame.push_quad(
            Rect::new(x, y, w, h),
            self.scheme.get("autocomplete_background"),
        );
        for (i, suggestion) in dropdown.suggestions.iter().enumerate() {
            let sy = y + i as i32 * line_h;
            if dropdown.selection == Some(i) {
                frame.push_quad(
                    Rect::new(x, sy, w, line_h),
                    self.scheme.get("autocomplete_highlight"),
                );
            }
            frame.push_text(suggestion.clone(), x, sy, self.scheme.get("syntax_text"), FONT_PX);
        }
    }
}
