//! Crossterm backend
//! Implements the renderer boundary on a terminal: one cell is one pixel
//! (glyph advance and line height are both 1), frames are composed into a
//! cell grid and flushed with explicit cursor moves.

use crate::constants::errors;
use crate::error::{EditorError, ErrorKind, Result};
use crate::key::Key;
use crate::render::{Color, Frame, Renderer};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::{Colors, Print, SetColors};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{BufWriter, Stdout, Write};
use std::time::Duration;

fn to_crossterm(color: Color) -> crossterm::style::Color {
    crossterm::style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// One composed screen cell
#[derive(Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

/// Terminal renderer plus raw-mode lifecycle
pub struct Term {
    out: BufWriter<Stdout>,
}

impl Term {
    /// Enter raw mode and the alternate screen
    pub fn new() -> Result<Self> {
        let mut out = BufWriter::new(std::io::stdout());
        terminal::enable_raw_mode().map_err(|e| {
            EditorError::critical(ErrorKind::Io, errors::RENDER_FAILED, e.to_string())
        })?;
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide).map_err(|e| {
            EditorError::critical(ErrorKind::Io, errors::RENDER_FAILED, e.to_string())
        })?;
        Ok(Term { out })
    }

    /// Poll for the next key, translating crossterm events
    pub fn poll_key(&mut self, timeout: Duration) -> Result<Option<Key>> {
        let ready = crossterm::event::poll(timeout)
            .map_err(|e| EditorError::new(ErrorKind::Io, errors::POLL_FAILED, e.to_string()))?;
        if !ready {
            return Ok(None);
        }
        let event = crossterm::event::read()
            .map_err(|e| EditorError::new(ErrorKind::Io, errors::POLL_FAILED, e.to_string()))?;
        Ok(translate_event(event))
    }
}

impl Drop for Term {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

impl Renderer for Term {
    fn window_size(&self) -> (u32, u32) {
        terminal::size()
            .map(|(w, h)| (w as u32, h as u32))
            .unwrap_or((80, 24))
    }

    fn glyph_advance(&self, _font_px: u32) -> u32 {
        1
    }

    fn line_height(&self, _font_px: u32) -> u32 {
        1
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let (w, h) = self.window_size();
        let (w, h) = (w as usize, h as usize);
        let default = Cell {
            ch: ' ',
            fg: Color::rgb(212, 212, 212),
            bg: Color::rgb(0, 0, 0),
        };
        let mut grid = vec![default; w * h];

        for quad in &frame.quads {
            let r = quad.rect;
            for y in r.y.max(0)..(r.y + r.h).min(h as i32) {
                for x in r.x.max(0)..(r.x + r.w).min(w as i32) {
                    let cell = &mut grid[y as usize * w + x as usize];
                    cell.bg = if quad.color.a == 255 {
                        quad.color
                    } else {
                        cell.bg.blend(quad.color, quad.color.a as f32 / 255.0)
                    };
                    cell.ch = ' ';
                }
            }
        }
        // textured quads have no terminal representation

        for run in &frame.text {
            if run.y < 0 || run.y >= h as i32 {
                continue;
            }
            let mut x = if run.centered {
                run.x - run.text.chars().count() as i32 / 2
            } else {
                run.x
            };
            for ch in run.text.chars() {
                if ch == '\t' {
                    x += 1;
                    continue;
                }
                if x >= 0 && x < w as i32 {
                    let cell = &mut grid[run.y as usize * w + x as usize];
                    cell.ch = ch;
                    cell.fg = run.color;
                }
                x += 1;
            }
        }

        let map_err =
            |e: std::io::Error| EditorError::new(ErrorKind::Io, errors::RENDER_FAILED, e.to_string());
        queue!(self.out, cursor::MoveTo(0, 0)).map_err(map_err)?;
        for y in 0..h {
            queue!(self.out, cursor::MoveTo(0, y as u16)).map_err(map_err)?;
            let mut current: Option<(Color, Color)> = None;
            let mut run = String::new();
            for x in 0..w {
                let cell = grid[y * w + x];
                let colors = (cell.fg, cell.bg);
                if current != Some(colors) {
                    if !run.is_empty() {
                        queue!(self.out, Print(std::mem::take(&mut run))).map_err(map_err)?;
                    }
                    queue!(
                        self.out,
                        SetColors(Colors::new(to_crossterm(cell.fg), to_crossterm(cell.bg)))
                    )
                    .map_err(map_err)?;
                    current = Some(colors);
                }
                run.push(cell.ch);
            }
            if !run.is_empty() {
                queue!(self.out, Print(run)).map_err(map_err)?;
            }
        }
        self.out.flush().map_err(map_err)?;
        Ok(())
    }
}

/// Map a crossterm event to a logical key
fn translate_event(event: Event) -> Option<Key> {
    match event {
        Event::Key(KeyEvent {
            code, modifiers, ..
        }) => translate_key(code, modifiers),
        Event::Resize(w, h) => Some(Key::Resize(w, h)),
        _ => None,
    }
}

fn translate_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    match code {
        KeyCode::Char(c) if ctrl => {
            let c = if shift { c.to_ascii_uppercase() } else { c };
            Some(Key::Ctrl(c))
        }
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::BackTab => Some(Key::Tab),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Delete => Some(Key::Delete),
        KeyCode::Home => Some(Key::Home),
        KeyCode::End => Some(Key::End),
        KeyCode::Up if ctrl => Some(Key::CtrlArrowUp),
        KeyCode::Down if ctrl => Some(Key::CtrlArrowDown),
        KeyCode::Left if ctrl => Some(Key::CtrlArrowLeft),
        KeyCode::Right if ctrl => Some(Key::CtrlArrowRight),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
