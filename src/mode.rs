//! Editor mode definitions

/// Editor operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal mode (motions and action entry)
    Normal,
    /// Insert mode (text editing)
    Insert,
    /// Menu mode (option list, entered with :)
    Menu,
    /// Delete mode (next key selects what to delete)
    Delete,
    /// Goto mode (line number / top / bottom / definition)
    Goto,
    /// Incremental search over a menu buffer
    Search,
    /// Yank mode (next key selects what to copy)
    Yank,
    /// Fuzzy-free file list of the working directory
    FileSearch,
    /// Definition list of the current buffer
    GotoDefinition,
    /// Change working directory
    Cwd,
    /// Modal prompt with a typed continuation
    Prompt,
    /// Replace mode (delete selection, then paste clipboard)
    Replace,
}

impl Mode {
    /// Name shown in the status strip
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Menu => "MENU",
            Mode::Delete => "DELETE",
            Mode::Goto => "GOTO",
            Mode::Search => "SEARCH",
            Mode::Yank => "YANK",
            Mode::FileSearch => "FILES",
            Mode::GotoDefinition => "DEF",
            Mode::Cwd => "CWD",
            Mode::Prompt => "PROMPT",
            Mode::Replace => "REPLACE",
        }
    }
}
