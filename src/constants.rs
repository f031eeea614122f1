//! Global constants for the cmantic editor

pub mod ui {
    /// Display name for buffers with no file path
    pub const NO_NAME: &str = "[No Name]";

    /// Name of the build output buffer
    pub const BUILD_BUFFER: &str = "*build*";

    /// Gutter padding between line numbers and text, in glyph advances
    pub const GUTTER_PAD: usize = 2;

    /// Height of the status strip in text rows
    pub const STATUS_ROWS: usize = 1;

    /// Per-tick increment for highlight fade; an entry is dropped at 1.0
    pub const HIGHLIGHT_FADE_STEP: f32 = 0.03;
}

pub mod editing {
    /// Tab policy used for new buffers when guessing fails. >0 means spaces.
    pub const DEFAULT_TAB_TYPE: usize = 4;

    /// Tab width used for visual column math
    pub const DEFAULT_TAB_WIDTH: usize = 4;
}

pub mod errors {
    // Error codes
    pub const LOAD_FAILED: &str = "LOAD_FAILED";
    pub const SAVE_FAILED: &str = "SAVE_FAILED";
    pub const LIST_DIR_FAILED: &str = "LIST_DIR_FAILED";
    pub const NO_PATH: &str = "NO_PATH";
    pub const UNSAVED_CHANGES: &str = "UNSAVED_CHANGES";
    pub const SEARCH_NOT_FOUND: &str = "SEARCH_NOT_FOUND";
    pub const UNKNOWN_OPTION: &str = "UNKNOWN_OPTION";
    pub const BAD_PROMPT_VALUE: &str = "BAD_PROMPT_VALUE";
    pub const SPAWN_FAILED: &str = "SPAWN_FAILED";
    pub const CLIPBOARD_FAILED: &str = "CLIPBOARD_FAILED";
    pub const COLORSCHEME_PARSE: &str = "COLORSCHEME_PARSE";
    pub const RENDER_FAILED: &str = "RENDER_FAILED";
    pub const POLL_FAILED: &str = "POLL_FAILED";
    pub const INVARIANT: &str = "INVARIANT";

    // Messages
    pub const MSG_UNSAVED_CHANGES: &str =
        "has unsaved changes. If you really want to exit, use :quit";
    pub const MSG_NO_FILE_NAME: &str = "No file name";
}

pub mod prompts {
    pub const BUILD_COMMAND: &str = "Build command";
    pub const BUILD_RUNNING: &str = "Build is already running, are you sure? [y/n]";
    pub const SET_INDENT: &str = "Set indent. > 0 for spaces, 0 for tabs";
    pub const INVALID_BOOL: &str = "Invalid bool. Please enter y or n";
    pub const INVALID_INT: &str = "Invalid integer";
    pub const INVALID_FLOAT: &str = "Invalid number";
}
