//! Clipboard access behind a trait so the core can be tested headless

use crate::constants::errors;
use crate::error::{EditorError, ErrorKind, Result};

/// Set/get one UTF-8 string
pub trait Clipboard {
    fn set(&mut self, text: &str) -> Result<()>;
    fn get(&mut self) -> Result<String>;
}

/// OS clipboard via arboard
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    /// Construction failure (e.g. no display server) degrades to a dummy
    /// that reports errors on use.
    #[must_use]
    pub fn new() -> Self {
        SystemClipboard {
            inner: arboard::Clipboard::new().ok(),
        }
    }

    fn unavailable() -> EditorError {
        EditorError::warning(
            ErrorKind::Io,
            errors::CLIPBOARD_FAILED,
            "system clipboard unavailable",
        )
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn set(&mut self, text: &str) -> Result<()> {
        match &mut self.inner {
            Some(clipboard) => clipboard.set_text(text.to_string()).map_err(|e| {
                EditorError::warning(ErrorKind::Io, errors::CLIPBOARD_FAILED, e.to_string())
            }),
            None => Err(Self::unavailable()),
        }
    }

    fn get(&mut self) -> Result<String> {
        match &mut self.inner {
            Some(clipboard) => clipboard.get_text().map_err(|e| {
                EditorError::warning(ErrorKind::Io, errors::CLIPBOARD_FAILED, e.to_string())
            }),
            None => Err(Self::unavailable()),
        }
    }
}

/// In-process clipboard for tests
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: String,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        MemoryClipboard::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn set(&mut self, text: &str) -> Result<()> {
        self.contents = text.to_string();
        Ok(())
    }

    fn get(&mut self) -> Result<String> {
        Ok(self.contents.clone())
    }
}
