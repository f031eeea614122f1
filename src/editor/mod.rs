//! Editor core
//! The modal state machine that ties buffers, views, panes, and the
//! external interfaces together. All state lives in this value; handlers
//! receive `&mut Editor` and there are no globals.

pub mod actions;
pub mod frame;

use crate::buffer::{Buffer, BufferId};
use crate::clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
use crate::colorscheme::ColorScheme;
use crate::constants::{errors, prompts, ui};
use crate::error::{EditorError, ErrorKind, ErrorSeverity};
use crate::io;
use crate::key::Key;
use crate::mode::Mode;
use crate::pane::{Pane, PaneArena, PaneId, PaneKind};
use crate::parse::{Language, TokenKind};
use crate::position::Pos;
use crate::subprocess::{Poll, Subprocess};
use crate::view::Cursor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Anchors captured when visual selection starts
#[derive(Debug, Clone)]
pub struct VisualStart {
    pub buffer: BufferId,
    pub cursors: Vec<Pos>,
    pub entire_line: bool,
    /// Edit-log position this snapshot has replayed
    synced_edits: usize,
}

/// Type a prompt answer must parse as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Str,
    Int,
    Float,
    Bool,
    Key,
}

/// Parsed prompt answer
#[derive(Debug, Clone, PartialEq)]
pub enum PromptResult {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Key(Key),
}

/// Continuation invoked when a prompt resolves. Pressing Esc resolves the
/// pending prompt with `result = None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    SetBuildCommand,
    ConfirmRebuild,
    SetIndent,
}

#[derive(Debug, Clone)]
struct PromptState {
    message: String,
    kind: PromptKind,
    action: PromptAction,
}

/// A running build and the buffer its output streams into
struct BuildState {
    process: Subprocess,
    buffer: BufferId,
}

/// Options reachable from `:`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Save,
    Quit,
    ForceQuit,
    Build,
    SetBuildCommand,
    SetIndent,
    ChangeDirectory,
}

const MENU_OPTIONS: &[(&str, MenuAction)] = &[
    ("save", MenuAction::Save),
    ("quit", MenuAction::Quit),
    ("force-quit", MenuAction::ForceQuit),
    ("build", MenuAction::Build),
    ("set build command", MenuAction::SetBuildCommand),
    ("set indentation", MenuAction::SetIndent),
    ("change directory", MenuAction::ChangeDirectory),
];

/// The whole editor
pub struct Editor {
    pub buffers: HashMap<BufferId, Buffer>,
    next_buffer_id: BufferId,
    pub panes: PaneArena,
    /// Edit panes in creation order
    pub editing_panes: Vec<PaneId>,
    /// The focused edit pane
    pub editing_pane: PaneId,
    pub menu_pane: PaneId,
    pub status_pane: PaneId,
    pub dropdown_pane: PaneId,
    menu_buffer: BufferId,

    pub mode: Mode,
    pub should_quit: bool,
    pub exit_code: i32,

    pub clipboard: Box<dyn Clipboard>,
    pub scheme: ColorScheme,
    pub cwd: PathBuf,

    pub visual_start: Option<VisualStart>,
    goto_line_number: usize,
    pub search_term: String,
    search_begin_pos: Pos,
    goto_definition_begin: Pos,
    definition_positions: Vec<Pos>,
    prompt: Option<PromptState>,
    /// Files listed for FileSearch mode
    file_list: Vec<io::DirEntry>,

    pub status_message: String,
    pub status_severity: ErrorSeverity,

    build: Option<BuildState>,
    build_command: Vec<String>,

    buffers_to_remove: Vec<BufferId>,
}

impl Editor {
    /// Construct with the OS clipboard; the binary entry point uses this
    pub fn new(file: Option<&Path>) -> crate::error::Result<Self> {
        Self::with_clipboard(file, Box::new(SystemClipboard::new()))
    }

    /// Construct with an injected clipboard; tests use `MemoryClipboard`
    pub fn with_clipboard(
        file: Option<&Path>,
        clipboard: Box<dyn Clipboard>,
    ) -> crate::error::Result<Self> {
        let mut buffers = HashMap::new();
        let mut next_buffer_id = 0;
        let mut alloc = |buffer: Buffer, buffers: &mut HashMap<BufferId, Buffer>| {
            let id = next_buffer_id;
            next_buffer_id += 1;
            buffers.insert(id, buffer);
            id
        };

        let main_buffer = match file {
            Some(path) => {
                let path = io::absolute(path);
                let loaded = io::load_file(&path)?;
                let mut buffer =
                    Buffer::from_lines(loaded.lines, loaded.language, loaded.endline);
                buffer.filename = Some(path);
                buffer
            }
            None => Buffer::scratch(ui::NO_NAME),
        };
        let main_id = alloc(main_buffer, &mut buffers);

        let mut menu = Buffer::scratch("*menu*");
        menu.journal.disable();
        let menu_buffer = alloc(menu, &mut buffers);
        let mut status = Buffer::scratch("*status*");
        status.journal.disable();
        let status_buffer = alloc(status, &mut buffers);
        let mut dropdown = Buffer::scratch("*dropdown*");
        dropdown.journal.disable();
        let dropdown_buffer = alloc(dropdown, &mut buffers);

        let mut panes = PaneArena::new();
        let root = panes.insert(Pane::new(PaneKind::Edit, main_id));
        let menu_pane = panes.insert(Pane::new(PaneKind::Menu, menu_buffer));
        let status_pane = panes.insert(Pane::new(PaneKind::Status, status_buffer));
        let dropdown_pane = panes.insert(Pane::new(PaneKind::Dropdown, dropdown_buffer));

        Ok(Editor {
            buffers,
            next_buffer_id,
            panes,
            editing_panes: vec![root],
            editing_pane: root,
            menu_pane,
            status_pane,
            dropdown_pane,
            menu_buffer,
            mode: Mode::Normal,
            should_quit: false,
            exit_code: 0,
            clipboard,
            scheme: ColorScheme::default(),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            visual_start: None,
            goto_line_number: 0,
            search_term: String::new(),
            search_begin_pos: Pos::default(),
            goto_definition_begin: Pos::default(),
            definition_positions: Vec::new(),
            prompt: None,
            file_list: Vec::new(),
            status_message: String::new(),
            status_severity: ErrorSeverity::Info,
            build: None,
            build_command: Vec::new(),
            buffers_to_remove: Vec::new(),
        })
    }

    /// Load a colorscheme file next to the working directory when present;
    /// it is then watched for hot reload
    pub fn load_default_colorscheme(&mut self) {
        let path = self.cwd.join("colorscheme.cmantic-colorscheme");
        if path.exists() {
            self.load_colorscheme(&path);
        }
    }

    /// Headless construction for tests
    #[must_use]
    pub fn headless(lines: &[&str], language: Language) -> Self {
        let mut editor =
            Self::with_clipboard(None, Box::new(MemoryClipboard::new())).expect("headless editor");
        let buffer = Buffer::from_lines(
            lines.iter().map(|s| s.to_string()).collect(),
            language,
            crate::buffer::Endline::Lf,
        );
        let id = editor.active_buffer_id();
        editor.buffers.insert(id, buffer);
        editor
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn active_buffer_id(&self) -> BufferId {
        self.panes.get(self.editing_pane).view.buffer
    }

    #[must_use]
    pub fn active_buffer(&self) -> &Buffer {
        &self.buffers[&self.active_buffer_id()]
    }

    pub fn active_buffer_mut(&mut self) -> &mut Buffer {
        let id = self.active_buffer_id();
        self.buffers.get_mut(&id).expect("active buffer")
    }

    #[must_use]
    pub fn active_cursors(&self) -> &[Cursor] {
        &self.panes.get(self.editing_pane).view.cursors
    }

    #[must_use]
    pub fn primary_cursor(&self) -> Cursor {
        self.panes.get(self.editing_pane).view.primary()
    }

    #[must_use]
    pub fn menu_line(&self) -> String {
        self.buffers[&self.menu_buffer].line(0).as_str().to_string()
    }

    pub fn status_message_set(&mut self, severity: ErrorSeverity, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_severity = severity;
    }

    pub fn report_error(&mut self, err: &EditorError) {
        if err.severity >= ErrorSeverity::Error {
            log::error!("{}", err);
        } else {
            log::warn!("{}", err);
        }
        self.status_message_set(err.severity, err.message.clone());
    }

    // =========================================================================
    // Mode transitions
    // =========================================================================

    /// Close per-mode side state when leaving any mode
    fn mode_cleanup(&mut self) {
        if self.mode == Mode::Insert {
            let view = &mut self.panes.get_mut(self.editing_pane).view;
            let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
            for i in 0..view.cursors.len() {
                buffer.remove_trailing_whitespace(&mut view.cursors, i);
            }
            // the insert-mode undo group closes here
            buffer.action_end(&view.cursors);
        }
        self.clear_menu();
        self.clear_dropdown();
        self.prompt = None;
        self.goto_line_number = 0;
    }

    pub fn mode_normal(&mut self) {
        self.mode_cleanup();
        self.mode = Mode::Normal;
    }

    pub fn mode_insert(&mut self) {
        self.mode_cleanup();
        // the whole insert session is one undo group
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
        buffer.action_begin(&view.cursors);
        self.mode = Mode::Insert;
    }

    pub fn mode_delete(&mut self) {
        self.mode_cleanup();
        self.mode = Mode::Delete;
    }

    pub fn mode_yank(&mut self) {
        self.mode_cleanup();
        self.mode = Mode::Yank;
    }

    pub fn mode_replace(&mut self) {
        self.mode_cleanup();
        self.mode = Mode::Replace;
    }

    pub fn mode_goto(&mut self) {
        self.mode_cleanup();
        self.goto_line_number = 0;
        self.mode = Mode::Goto;
    }

    pub fn mode_menu(&mut self) {
        self.mode_cleanup();
        self.update_menu_suggestions();
        self.mode = Mode::Menu;
    }

    pub fn mode_search(&mut self) {
        self.mode_cleanup();
        self.search_begin_pos = self.primary_cursor().pos;
        self.search_term.clear();
        self.mode = Mode::Search;
    }

    pub fn mode_filesearch(&mut self) {
        self.mode_cleanup();
        match io::list_directory(&self.cwd) {
            Ok(entries) => {
                self.file_list = entries;
                self.update_menu_suggestions();
                self.mode = Mode::FileSearch;
            }
            Err(err) => {
                self.report_error(&err);
            }
        }
    }

    pub fn mode_cwd(&mut self) {
        self.mode_cleanup();
        match io::list_directory(&self.cwd) {
            Ok(entries) => {
                self.file_list = entries;
                self.update_menu_suggestions();
                self.mode = Mode::Cwd;
            }
            Err(err) => {
                self.report_error(&err);
            }
        }
    }

    pub fn mode_goto_definition(&mut self) {
        self.mode_cleanup();
        self.goto_definition_begin = self.primary_cursor().pos;
        self.definition_positions.clear();
        self.update_menu_suggestions();
        self.mode = Mode::GotoDefinition;
    }

    pub fn mode_prompt(&mut self, message: &str, kind: PromptKind, action: PromptAction) {
        self.mode_cleanup();
        self.prompt = Some(PromptState {
            message: message.to_string(),
            kind,
            action,
        });
        self.mode = Mode::Prompt;
    }

    fn clear_menu(&mut self) {
        let buffer = self.buffers.get_mut(&self.menu_buffer).expect("menu buffer");
        buffer.lines.truncate(1);
        buffer.lines[0].truncate(0);
        buffer.parse();
        let pane = self.panes.get_mut(self.menu_pane);
        pane.view.cursors = vec![Cursor::new(0, 0)];
        pane.suggestions.clear();
        pane.selection = None;
    }

    fn clear_dropdown(&mut self) {
        let pane = self.panes.get_mut(self.dropdown_pane);
        pane.suggestions.clear();
        pane.selection = None;
    }

    // =========================================================================
    // Key dispatch
    // =========================================================================

    /// Feed one logical key through the state machine
    pub fn handle_key(&mut self, key: Key) {
        if let Key::Resize(..) = key {
            return;
        }
        match self.mode {
            Mode::Normal => self.handle_normal(key),
            Mode::Insert => self.handle_insert(key),
            Mode::Menu => self.handle_menu(key),
            Mode::Delete => self.handle_delete(key),
            Mode::Goto => self.handle_goto(key),
            Mode::Search => self.handle_search(key),
            Mode::Yank => self.handle_yank(key),
            Mode::FileSearch => self.handle_filesearch(key),
            Mode::GotoDefinition => self.handle_goto_definition(key),
            Mode::Cwd => self.handle_cwd(key),
            Mode::Prompt => self.handle_prompt(key),
            Mode::Replace => self.handle_replace(key),
        }
        self.after_dispatch();
    }

    /// Frame-independent bookkeeping after every key
    fn after_dispatch(&mut self) {
        // delete-only groups push their text to the clipboard
        let ids: Vec<BufferId> = self.buffers.keys().copied().collect();
        for id in ids {
            if let Some(clip) = self.buffers.get_mut(&id).and_then(|b| b.take_clipboard()) {
                if let Err(err) = self.clipboard.set(&clip) {
                    self.report_error(&err);
                }
            }
        }
        self.sync_anchors();
    }

    /// Replay pending buffer edits onto every non-acting anchor
    pub fn sync_anchors(&mut self) {
        let pane_ids: Vec<PaneId> = self.panes.ids().collect();
        for (&buffer_id, buffer) in &self.buffers {
            if buffer.edit_log().is_empty() {
                continue;
            }
            // edits went through the acting pane's own cursor set
            let acting = if buffer_id == self.menu_buffer {
                self.menu_pane
            } else {
                self.editing_pane
            };
            for &pane_id in &pane_ids {
                let pane = self.panes.get_mut(pane_id);
                if pane.view.buffer == buffer_id {
                    pane.view.sync_with(buffer, pane_id == acting);
                }
            }
            if let Some(vs) = &mut self.visual_start {
                if vs.buffer == buffer_id {
                    let log = buffer.edit_log();
                    for span in &log[vs.synced_edits.min(log.len())..] {
                        for p in &mut vs.cursors {
                            Buffer::apply_span_to_pos(*span, p);
                        }
                    }
                    vs.synced_edits = 0;
                }
            }
        }
        for buffer in self.buffers.values_mut() {
            buffer.clear_edit_log();
        }
        for &pane_id in &pane_ids {
            self.panes.get_mut(pane_id).view.synced_edits = 0;
        }
    }

    // =========================================================================
    // Normal mode
    // =========================================================================

    fn handle_normal(&mut self, key: Key) {
        if self.movement_default(key) {
            return;
        }
        match key {
            Key::Escape => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                view.collapse_cursors();
                self.visual_start = None;
            }

            Key::Ctrl('z') => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
                buffer.undo(&mut view.cursors);
            }
            Key::Ctrl('Z') => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
                buffer.redo(&mut view.cursors);
            }

            Key::Ctrl('s') => self.save_active_buffer(),
            Key::Ctrl('b') => self.request_build(),
            Key::Ctrl('g') => {
                self.mode_goto_definition();
            }

            Key::Char('x') => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
                buffer.action_begin(&view.cursors);
                view.advance(buffer);
                buffer.delete_char_at_cursors(&mut view.cursors);
                buffer.action_end(&view.cursors);
            }
            Key::Char('D') => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
                buffer.delete_lines_at_cursors(&mut view.cursors);
            }

            Key::Char('i') => self.mode_insert(),
            Key::Char('o') => {
                {
                    let view = &mut self.panes.get_mut(self.editing_pane).view;
                    let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
                    buffer.action_begin(&view.cursors);
                    buffer.insert_newline_below(&mut view.cursors);
                    buffer.auto_indent_cursors(&mut view.cursors);
                }
                // the insert session's group opens inside this one, so the
                // newline and the typed text undo together
                self.mode_insert();
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
                buffer.action_end(&view.cursors);
            }

            Key::Char('d') => {
                if self.has_matching_visual() {
                    self.do_delete_visual();
                } else {
                    self.mode_delete();
                }
            }
            Key::Char('y') | Key::Char('c') => {
                if self.has_matching_visual() {
                    self.do_yank_visual();
                } else {
                    self.mode_yank();
                }
            }
            Key::Char('r') => {
                if self.has_matching_visual() {
                    self.do_delete_visual();
                    self.do_paste();
                }
                self.mode_replace();
            }
            Key::Char('p') => {
                if self.has_matching_visual() {
                    self.do_delete_visual();
                }
                self.do_paste();
            }

            Key::Enter => {
                self.jump_to_output_location();
            }

            Key::Char('s') => self.begin_visual(false),
            Key::Char('S') => self.begin_visual(true),
            Key::Char('m') => self.add_cursor_below(),

            Key::Char('=') => self.auto_indent_selection(),
            Key::Char('>') => self.shift_selection(1),
            Key::Char('<') => self.shift_selection(-1),
            Key::Char('/') => self.toggle_comment_selection(),

            Key::Char(' ') => self.mode_search(),
            Key::Char('g') => self.mode_goto(),
            Key::Char(':') => self.mode_menu(),
            Key::Ctrl('p') => self.mode_filesearch(),

            Key::Ctrl('o') => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = &self.buffers[&view.buffer];
                view.jumplist_prev(buffer);
            }
            Key::Ctrl('i') => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = &self.buffers[&view.buffer];
                view.jumplist_next(buffer);
            }

            Key::Ctrl('w') => self.split_pane(),
            Key::Ctrl('q') => self.close_pane(),
            Key::Ctrl('l') => self.pane_next(),
            Key::Ctrl('h') => self.pane_prev(),
            Key::Ctrl('j') => self.pane_sibling(1),
            Key::Ctrl('k') => self.pane_sibling(-1),
            Key::CtrlArrowLeft => self.resize_pane_width(1.0 / 1.3),
            Key::CtrlArrowRight => self.resize_pane_width(1.3),
            Key::CtrlArrowDown => self.resize_pane_height(1.0 / 1.3),
            Key::CtrlArrowUp => self.resize_pane_height(1.3),

            Key::Char('q') => self.request_quit(),

            _ => {}
        }
    }

    // =========================================================================
    // Insert mode
    // =========================================================================

    fn handle_insert(&mut self, key: Key) {
        match key {
            Key::Escape => {
                self.mode_normal();
            }
            Key::Enter => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
                buffer.insert_newline(&mut view.cursors);
                self.clear_dropdown();
            }
            Key::Tab => {
                if !self.autocomplete() {
                    let view = &mut self.panes.get_mut(self.editing_pane).view;
                    let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
                    buffer.insert_tab_at_cursors(&mut view.cursors);
                }
            }
            Key::Backspace => {
                self.insert_mode_backspace();
                self.update_dropdown();
            }
            Key::Ctrl('j') => self.move_dropdown_selection(1),
            Key::Ctrl('k') => self.move_dropdown_selection(-1),
            Key::Char(c) => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
                buffer.insert_char_at_cursors(&mut view.cursors, c);
                self.update_dropdown();
            }
            Key::ArrowLeft => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = &self.buffers[&view.buffer];
                view.move_x(buffer, -1);
            }
            Key::ArrowRight => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = &self.buffers[&view.buffer];
                view.move_x(buffer, 1);
            }
            Key::ArrowUp => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = &self.buffers[&view.buffer];
                view.move_y(buffer, -1);
            }
            Key::ArrowDown => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = &self.buffers[&view.buffer];
                view.move_y(buffer, 1);
            }
            _ => {}
        }
    }

    /// Backspace deletes one column, or a whole indent unit when
    /// everything left of the cursor is whitespace
    fn insert_mode_backspace(&mut self) {
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
        buffer.action_begin(&view.cursors);
        for i in 0..view.cursors.len() {
            let pos = view.cursors[i].pos;
            let tab = buffer.tab_type;
            if tab > 0 && pos.x >= tab && buffer.line(pos.y).is_blank_before(pos.x) {
                buffer.remove_range(
                    &mut view.cursors,
                    Pos::new(pos.x - tab, pos.y),
                    pos,
                    Some(i),
                    true,
                );
            } else {
                buffer.delete_char(&mut view.cursors, i);
            }
        }
        buffer.action_end(&view.cursors);
    }

    // =========================================================================
    // Delete / Yank / Replace modes
    // =========================================================================

    fn handle_delete(&mut self, key: Key) {
        self.do_delete_movement(key);
        self.mode_normal();
    }

    fn handle_yank(&mut self, key: Key) {
        self.do_yank_movement(key);
        self.mode_normal();
    }

    fn handle_replace(&mut self, key: Key) {
        {
            let view = &mut self.panes.get_mut(self.editing_pane).view;
            let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
            buffer.action_begin(&view.cursors);
        }
        if self.do_delete_movement(key) {
            self.do_paste();
        }
        {
            let view = &mut self.panes.get_mut(self.editing_pane).view;
            let buffer = self.buffers.get_mut(&view.buffer).expect("buffer");
            buffer.action_end(&view.cursors);
        }
        self.mode_normal();
    }

    // =========================================================================
    // Goto mode
    // =========================================================================

    fn handle_goto(&mut self, key: Key) {
        {
            let view = &mut self.panes.get_mut(self.editing_pane).view;
            view.collapse_cursors();
        }

        if let Some(digit) = key.as_digit() {
            self.goto_line_number = self.goto_line_number * 10 + digit as usize;
            let target = self.goto_line_number.saturating_sub(1);
            let view = &mut self.panes.get_mut(self.editing_pane).view;
            let buffer = &self.buffers[&view.buffer];
            view.jumplist_push();
            view.move_to_y(buffer, 0, target);
            view.jumplist_push();
            let message = format!("goto {}", self.goto_line_number);
            self.status_message_set(ErrorSeverity::Info, message);
            // stay in Goto so further digits accumulate
            return;
        }

        match key {
            Key::Char('t') => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = &self.buffers[&view.buffer];
                view.jumplist_push();
                view.move_to(buffer, Pos::new(0, 0));
                view.jumplist_push();
            }
            Key::Char('b') => {
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = &self.buffers[&view.buffer];
                let last = buffer.num_lines() - 1;
                view.jumplist_push();
                view.move_to(buffer, Pos::new(0, last));
                view.jumplist_push();
            }
            Key::Char('d') => self.goto_definition_under_cursor(),
            _ => {}
        }
        self.mode_normal();
    }

    /// Jump to the definition of the identifier under the primary cursor
    fn goto_definition_under_cursor(&mut self) {
        let view = &mut self.panes.get_mut(self.editing_pane).view;
        let buffer = &self.buffers[&view.buffer];
        let pos = view.primary().pos;
        let Some(idx) = buffer.token_at(pos) else {
            return;
        };
        let token = &buffer.parser.tokens[idx];
        if token.kind != TokenKind::Identifier {
            return;
        }
        let Some(def) = buffer.definition_of(&token.text) else {
            return;
        };
        view.jumplist_push();
        view.move_to(buffer, def.a);
        view.jumplist_push();
    }

    // =========================================================================
    // Search mode
    // =========================================================================

    fn handle_search(&mut self, key: Key) {
        match key {
            Key::Enter => {
                // the typed text becomes the committed search term
                self.search_term = self.menu_line();
                if self.search_term.is_empty() {
                    self.mode_normal();
                    return;
                }
                let begin = self.search_begin_pos;
                let term = self.search_term.clone();
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = &self.buffers[&view.buffer];
                // both the pre-jump and post-jump positions go on the
                // jumplist
                view.move_to(buffer, begin);
                view.jumplist_push();
                if view.find_and_move(buffer, &term, true) {
                    view.jumplist_push();
                    self.mode_normal();
                } else {
                    let view = &mut self.panes.get_mut(self.editing_pane).view;
                    let buffer = &self.buffers[&view.buffer];
                    view.move_to(buffer, begin);
                    let message = format!("'{}' not found", term);
                    self.status_message_set(ErrorSeverity::Warning, message);
                    self.mode_normal();
                }
            }
            Key::Escape => {
                let begin = self.search_begin_pos;
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = &self.buffers[&view.buffer];
                view.move_to(buffer, begin);
                self.mode_normal();
            }
            other => {
                self.menu_insert(other);
                // canonical live state is the menu text; re-run the find
                // from where the search began
                self.search_term = self.menu_line();
                let begin = self.search_begin_pos;
                let term = self.search_term.clone();
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = &self.buffers[&view.buffer];
                view.move_to(buffer, begin);
                if !term.is_empty() {
                    view.find_and_move(buffer, &term, true);
                }
            }
        }
    }

    // =========================================================================
    // Menu mode
    // =========================================================================

    fn handle_menu(&mut self, key: Key) {
        match key {
            Key::Enter => {
                let line = self.menu_line();
                if line.is_empty() {
                    self.mode_normal();
                    return;
                }
                let chosen = self
                    .menu_selection()
                    .unwrap_or(line);
                let action = MENU_OPTIONS
                    .iter()
                    .find(|(name, _)| *name == chosen)
                    .map(|(_, action)| *action);
                match action {
                    Some(action) => {
                        // leave menu state before running the option; the
                        // option may itself switch modes
                        self.mode_normal();
                        self.run_menu_option(action);
                    }
                    None => {
                        let err = EditorError::new(
                            ErrorKind::UserInput,
                            errors::UNKNOWN_OPTION,
                            format!("Unknown option '{}'", chosen),
                        );
                        self.report_error(&err);
                        self.mode_normal();
                    }
                }
            }
            Key::Escape => self.mode_normal(),
            Key::Backspace if self.menu_line().is_empty() => self.mode_normal(),
            other => {
                self.menu_insert(other);
                self.update_menu_suggestions();
            }
        }
    }

    fn run_menu_option(&mut self, action: MenuAction) {
        match action {
            MenuAction::Save => self.save_active_buffer(),
            MenuAction::Quit => self.request_quit(),
            MenuAction::ForceQuit => {
                self.should_quit = true;
            }
            MenuAction::Build => self.request_build(),
            MenuAction::SetBuildCommand => {
                self.mode_prompt(
                    prompts::BUILD_COMMAND,
                    PromptKind::Str,
                    PromptAction::SetBuildCommand,
                );
            }
            MenuAction::SetIndent => {
                self.mode_prompt(prompts::SET_INDENT, PromptKind::Int, PromptAction::SetIndent);
            }
            MenuAction::ChangeDirectory => self.mode_cwd(),
        }
    }

    // =========================================================================
    // Prompt mode
    // =========================================================================

    fn handle_prompt(&mut self, key: Key) {
        let Some(state) = self.prompt.clone() else {
            self.mode_normal();
            return;
        };

        // bool and key prompts resolve on a single keypress
        match state.kind {
            PromptKind::Bool => {
                if let Key::Char(c @ ('y' | 'n' | 'Y' | 'N')) = key {
                    let value = matches!(c, 'y' | 'Y');
                    self.resolve_prompt(state.action, Some(PromptResult::Bool(value)));
                    return;
                }
            }
            PromptKind::Key => {
                if key != Key::Escape {
                    self.resolve_prompt(state.action, Some(PromptResult::Key(key)));
                    return;
                }
            }
            _ => {}
        }

        match key {
            Key::Escape => self.resolve_prompt(state.action, None),
            Key::Enter => {
                let line = self.menu_line();
                let parsed = match state.kind {
                    PromptKind::Str => Some(PromptResult::Str(line.clone())),
                    PromptKind::Int => line.trim().parse::<i64>().ok().map(PromptResult::Int),
                    PromptKind::Float => line.trim().parse::<f64>().ok().map(PromptResult::Float),
                    PromptKind::Bool => match line.trim() {
                        "y" | "Y" => Some(PromptResult::Bool(true)),
                        "n" | "N" => Some(PromptResult::Bool(false)),
                        _ => None,
                    },
                    PromptKind::Key => None,
                };
                match parsed {
                    Some(result) => self.resolve_prompt(state.action, Some(result)),
                    None => {
                        // bad value: re-prompt
                        let message = match state.kind {
                            PromptKind::Bool => prompts::INVALID_BOOL,
                            PromptKind::Int => prompts::INVALID_INT,
                            _ => prompts::INVALID_FLOAT,
                        };
                        self.status_message_set(ErrorSeverity::Warning, message);
                        self.clear_menu();
                    }
                }
            }
            other => self.menu_insert(other),
        }
    }

    /// Run the stored continuation. `result = None` means cancelled.
    fn resolve_prompt(&mut self, action: PromptAction, result: Option<PromptResult>) {
        self.mode_normal();
        match (action, result) {
            (PromptAction::SetBuildCommand, Some(PromptResult::Str(cmd))) => {
                self.build_command = cmd.split_whitespace().map(|s| s.to_string()).collect();
                let message = format!("build command: {}", cmd);
                self.status_message_set(ErrorSeverity::Info, message);
            }
            (PromptAction::ConfirmRebuild, Some(PromptResult::Bool(true))) => {
                if let Some(build) = &mut self.build {
                    build.process.kill();
                }
                self.build = None;
                self.start_build();
            }
            (PromptAction::SetIndent, Some(PromptResult::Int(n))) => {
                let buffer = self.active_buffer_mut();
                buffer.tab_type = n.max(0) as usize;
            }
            _ => {
                self.status_message_set(ErrorSeverity::Info, "cancelled");
            }
        }
    }

    // =========================================================================
    // FileSearch / Cwd / GotoDefinition modes
    // =========================================================================

    fn handle_filesearch(&mut self, key: Key) {
        match key {
            Key::Enter => {
                let Some(name) = self.menu_selection() else {
                    let message = format!("\"{}\": No such file", self.menu_line());
                    self.status_message_set(ErrorSeverity::Warning, message);
                    self.mode_normal();
                    return;
                };
                let path = self.cwd.join(&name);
                self.mode_normal();
                self.open_file(&path);
            }
            Key::Escape => self.mode_normal(),
            other => {
                self.menu_insert(other);
                self.update_menu_suggestions();
            }
        }
    }

    fn handle_cwd(&mut self, key: Key) {
        match key {
            Key::Enter => {
                let Some(name) = self.menu_selection() else {
                    self.mode_normal();
                    return;
                };
                let target = self.cwd.join(&name);
                if target.is_dir() {
                    self.cwd = target;
                    let message = format!("cwd: {}", self.cwd.display());
                    self.status_message_set(ErrorSeverity::Info, message);
                }
                self.mode_normal();
            }
            Key::Escape => self.mode_normal(),
            other => {
                self.menu_insert(other);
                self.update_menu_suggestions();
            }
        }
    }

    fn handle_goto_definition(&mut self, key: Key) {
        match key {
            Key::Escape => {
                let begin = self.goto_definition_begin;
                let view = &mut self.panes.get_mut(self.editing_pane).view;
                let buffer = &self.buffers[&view.buffer];
                view.move_to(buffer, begin);
                self.mode_normal();
            }
            Key::Enter => {
                let selection = self.panes.get(self.menu_pane).selection;
                match selection.and_then(|i| self.definition_positions.get(i).copied()) {
                    Some(pos) => {
                        let view = &mut self.panes.get_mut(self.editing_pane).view;
                        let buffer = &self.buffers[&view.buffer];
                        view.jumplist_push();
                        view.move_to(buffer, pos);
                        view.jumplist_push();
                    }
                    None => {
                        let message = format!("\"{}\": No such definition", self.menu_line());
                        self.status_message_set(ErrorSeverity::Warning, message);
                    }
                }
                self.mode_normal();
            }
            other => {
                self.menu_insert(other);
                self.update_menu_suggestions();
                // preview: follow the selected definition as the list narrows
                let selection = self.panes.get(self.menu_pane).selection;
                if let Some(pos) = selection.and_then(|i| self.definition_positions.get(i).copied())
                {
                    let view = &mut self.panes.get_mut(self.editing_pane).view;
                    let buffer = &self.buffers[&view.buffer];
                    view.move_to(buffer, pos);
                }
            }
        }
    }

    // =========================================================================
    // Menu plumbing
    // =========================================================================

    /// Insert/suggestion keys shared by every menu-driven mode
    fn menu_insert(&mut self, key: Key) {
        match key {
            Key::ArrowDown | Key::Ctrl('j') => self.move_menu_selection(1),
            Key::ArrowUp | Key::Ctrl('k') => self.move_menu_selection(-1),
            Key::Tab => {
                if let Some(chosen) = self.menu_selection() {
                    self.clear_menu();
                    let view = &mut self.panes.get_mut(self.menu_pane).view;
                    let buffer = self.buffers.get_mut(&view.buffer).expect("menu buffer");
                    buffer.insert_at_cursors(&mut view.cursors, &chosen);
                }
            }
            Key::Backspace => {
                let view = &mut self.panes.get_mut(self.menu_pane).view;
                let buffer = self.buffers.get_mut(&view.buffer).expect("menu buffer");
                buffer.delete_char_at_cursors(&mut view.cursors);
            }
            Key::Char(c) => {
                let view = &mut self.panes.get_mut(self.menu_pane).view;
                let buffer = self.buffers.get_mut(&view.buffer).expect("menu buffer");
                buffer.insert_char_at_cursors(&mut view.cursors, c);
            }
            _ => {}
        }
    }

    /// Currently selected suggestion of the menu pane
    #[must_use]
    pub fn menu_selection(&self) -> Option<String> {
        let pane = self.panes.get(self.menu_pane);
        pane.selection
            .and_then(|i| pane.suggestions.get(i).cloned())
    }

    fn move_menu_selection(&mut self, delta: i64) {
        let pane = self.panes.get_mut(self.menu_pane);
        if pane.suggestions.is_empty() {
            pane.selection = None;
            return;
        }
        let max = pane.suggestions.len() as i64 - 1;
        let current = pane.selection.unwrap_or(0) as i64;
        pane.selection = Some((current + delta).clamp(0, max) as usize);
    }

    /// Refill the menu suggestion list for the active mode
    fn update_menu_suggestions(&mut self) {
        let typed = self.menu_line();
        let suggestions: Vec<String> = match self.mode {
            Mode::Menu => MENU_OPTIONS
                .iter()
                .map(|(name, _)| name.to_string())
                .filter(|name| name.starts_with(&typed))
                .collect(),
            Mode::FileSearch => self
                .file_list
                .iter()
                .filter(|e| !e.is_dir && e.name.contains(&typed))
                .map(|e| e.name.clone())
                .collect(),
            Mode::Cwd => self
                .file_list
                .iter()
                .filter(|e| e.is_dir && e.name.contains(&typed))
                .map(|e| e.name.clone())
                .collect(),
            Mode::GotoDefinition => {
                let buffer = self.active_buffer();
                let mut names = Vec::new();
                let mut positions = Vec::new();
                for def in &buffer.parser.definitions {
                    let name = buffer.range_to_string(*def);
                    if name.contains(&typed) {
                        positions.push(def.a);
                        names.push(name);
                    }
                }
                self.definition_positions = positions;
                names
            }
            _ => Vec::new(),
        };
        let pane = self.panes.get_mut(self.menu_pane);
        pane.selection = if suggestions.is_empty() { None } else { Some(0) };
        pane.suggestions = suggestions;
    }

    // =========================================================================
    // Files, saving, quitting
    // =========================================================================

    /// Open `path` in the focused pane, reusing an already open buffer
    pub fn open_file(&mut self, path: &Path) {
        let path = io::absolute(path);
        let already_open = self
            .buffers
            .iter()
            .find(|(_, b)| b.path() == Some(path.as_path()))
            .map(|(&id, b)| (id, b.display_name()));
        if let Some((id, name)) = already_open {
            self.panes.get_mut(self.editing_pane).view = crate::view::BufferView::new(id);
            let message = format!("Switched to {}", name);
            self.status_message_set(ErrorSeverity::Info, message);
            return;
        }

        match io::load_file(&path) {
            Ok(loaded) => {
                let language = loaded.language;
                let mut buffer = Buffer::from_lines(loaded.lines, language, loaded.endline);
                buffer.filename = Some(path.clone());
                let id = self.alloc_buffer(buffer);
                self.panes.get_mut(self.editing_pane).view = crate::view::BufferView::new(id);
                let message = format!(
                    "Loaded file {} ({})",
                    path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
                    language.name()
                );
                self.status_message_set(ErrorSeverity::Info, message);
            }
            Err(err) => self.report_error(&err),
        }
    }

    pub fn alloc_buffer(&mut self, buffer: Buffer) -> BufferId {
        let id = self.next_buffer_id;
        self.next_buffer_id += 1;
        self.buffers.insert(id, buffer);
        id
    }

    /// Write the active buffer back to its file; anonymous buffers report
    /// an error and keep their clean index untouched
    pub fn save_active_buffer(&mut self) {
        let id = self.active_buffer_id();
        let buffer = self.buffers.get_mut(&id).expect("buffer");
        let Some(path) = buffer.path().map(|p| p.to_path_buf()) else {
            let err = EditorError::new(ErrorKind::Io, errors::NO_PATH, errors::MSG_NO_FILE_NAME);
            self.report_error(&err);
            return;
        };
        let contents = buffer.to_contents();
        match io::save_file(&path, &contents) {
            Ok(()) => {
                buffer.mark_saved();
                let message = format!("Saved {}", path.display());
                self.status_message_set(ErrorSeverity::Info, message);
            }
            Err(err) => self.report_error(&err),
        }
    }

    /// Quit unless a file-bound buffer is modified
    pub fn request_quit(&mut self) {
        let dirty = self
            .buffers
            .values()
            .find(|b| b.is_bound_to_file() && b.modified())
            .map(|b| b.display_name());
        if let Some(name) = dirty {
            let message = format!("{} {}", name, errors::MSG_UNSAVED_CHANGES);
            self.status_message_set(ErrorSeverity::Warning, message);
            return;
        }
        self.should_quit = true;
    }

    /// Queue a buffer for removal after the frame
    pub fn queue_buffer_removal(&mut self, id: BufferId) {
        if !self.buffers_to_remove.contains(&id) {
            self.buffers_to_remove.push(id);
        }
    }

    // =========================================================================
    // Build flow
    // =========================================================================

    /// Kick off a build, prompting if one is already running
    pub fn request_build(&mut self) {
        if self.build.is_some() {
            self.mode_prompt(
                prompts::BUILD_RUNNING,
                PromptKind::Bool,
                PromptAction::ConfirmRebuild,
            );
            return;
        }
        if self.build_command.is_empty() {
            self.mode_prompt(
                prompts::BUILD_COMMAND,
                PromptKind::Str,
                PromptAction::SetBuildCommand,
            );
            return;
        }
        self.start_build();
    }

    fn start_build(&mut self) {
        if self.build_command.is_empty() {
            return;
        }
        match Subprocess::spawn(&self.build_command) {
            Ok(process) => {
                // fresh output buffer each run
                let mut buffer = Buffer::scratch(ui::BUILD_BUFFER);
                buffer.read_only = true;
                buffer.journal.disable();
                let id = self.alloc_buffer(buffer);
                self.build = Some(BuildState { process, buffer: id });
                self.status_message_set(ErrorSeverity::Info, "build started");
            }
            Err(err) => self.report_error(&err),
        }
    }

    /// Poll the running build; append output, notice completion
    fn poll_build(&mut self) {
        let Some(build) = &mut self.build else {
            return;
        };
        let buffer_id = build.buffer;
        let mut finished = None;
        let mut chunks: Vec<Vec<u8>> = Vec::new();
        loop {
            match build.process.poll() {
                Poll::Data(chunk) => chunks.push(chunk),
                Poll::Pending => break,
                Poll::Closed(code) => {
                    finished = Some(code);
                    break;
                }
            }
        }

        if !chunks.is_empty() {
            if let Some(buffer) = self.buffers.get_mut(&buffer_id) {
                for chunk in chunks {
                    append_output(buffer, &chunk);
                }
            }
        }
        if let Some(code) = finished {
            self.build = None;
            let message = match code {
                Some(0) => "build finished".to_string(),
                Some(code) => format!("build exited with {}", code),
                None => "build terminated".to_string(),
            };
            self.status_message_set(ErrorSeverity::Info, message);
        }
    }

    /// The most recent build output buffer, if any
    #[must_use]
    pub fn build_buffer(&self) -> Option<BufferId> {
        self.build.as_ref().map(|b| b.buffer)
    }

    // =========================================================================
    // Per-frame tick
    // =========================================================================

    /// Everything that advances without a key: build output, colorscheme
    /// hot reload, highlight fades, deferred removals
    pub fn tick(&mut self) {
        self.poll_build();
        self.reload_colorscheme_if_changed();

        for buffer in self.buffers.values_mut() {
            buffer.tick_highlights();
        }

        self.process_removals();
        self.sync_anchors();
    }

    fn reload_colorscheme_if_changed(&mut self) {
        let Some((path, stored)) = self.scheme.source.clone() else {
            return;
        };
        if !io::was_modified_since(&path, stored) {
            return;
        }
        self.load_colorscheme(&path);
    }

    /// Read a colorscheme file, reporting parse warnings
    pub fn load_colorscheme(&mut self, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let warnings = self.scheme.apply_file(&contents);
                self.scheme.source =
                    io::modification_time(path).map(|mtime| (path.to_path_buf(), mtime));
                for warning in &warnings {
                    self.report_error(warning);
                }
            }
            Err(e) => {
                let err = EditorError::warning(
                    ErrorKind::Io,
                    errors::LOAD_FAILED,
                    format!("{}: {}", path.display(), e),
                );
                self.report_error(&err);
            }
        }
    }

    /// Apply deferred pane and buffer removals
    fn process_removals(&mut self) {
        let removed = self.panes.process_removals();
        if !removed.is_empty() {
            self.editing_panes.retain(|id| !removed.contains(id));
            if removed.contains(&self.editing_pane) {
                self.editing_pane = self
                    .editing_panes
                    .first()
                    .copied()
                    .unwrap_or(self.editing_pane);
            }
        }

        let to_remove = std::mem::take(&mut self.buffers_to_remove);
        for id in to_remove {
            // a buffer shown by a live pane stays
            let in_use = self
                .panes
                .ids()
                .any(|pane| self.panes.get(pane).view.buffer == id);
            if !in_use {
                self.buffers.remove(&id);
            }
        }
    }
}

/// Append subprocess output to the build buffer, splitting on newlines
fn append_output(buffer: &mut Buffer, chunk: &[u8]) {
    let text = String::from_utf8_lossy(chunk);
    for (i, part) in text.split('\n').enumerate() {
        if i > 0 {
            buffer.lines.push(crate::buffer::line::Line::new());
        }
        let y = buffer.lines.len() - 1;
        buffer.lines[y].push_str(part);
    }
    buffer.parse();
}
