//! Thin OS wrappers for file access
//! Loading detects the endline convention and infers the language tag;
//! saving re-emits the buffer's endline with no trailing newline.

use crate::buffer::Endline;
use crate::constants::errors;
use crate::error::{EditorError, ErrorKind, Result};
use crate::parse::Language;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A loaded file, split into lines
#[derive(Debug)]
pub struct LoadedFile {
    pub lines: Vec<String>,
    pub endline: Endline,
    pub language: Language,
}

/// Read a file into lines. CRLF is detected by the presence of `\r\n`;
/// the language comes from the file extension.
pub fn load_file(path: &Path) -> Result<LoadedFile> {
    let bytes = fs::read(path).map_err(|e| {
        EditorError::new(
            ErrorKind::Io,
            errors::LOAD_FAILED,
            format!("{}: {}", path.display(), e),
        )
    })?;
    let text = String::from_utf8_lossy(&bytes);

    let endline = if text.contains("\r\n") {
        Endline::Crlf
    } else {
        Endline::Lf
    };

    let lines: Vec<String> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect();

    Ok(LoadedFile {
        lines,
        endline,
        language: Language::from_path(path),
    })
}

/// Write `contents` (already joined with the buffer's endline) to `path`
pub fn save_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| {
        EditorError::new(
            ErrorKind::Io,
            errors::SAVE_FAILED,
            format!("{}: {}", path.display(), e),
        )
    })
}

/// One directory child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Children of `path`, sorted by name
pub fn list_directory(path: &Path) -> Result<Vec<DirEntry>> {
    let read = fs::read_dir(path).map_err(|e| {
        EditorError::new(
            ErrorKind::Io,
            errors::LIST_DIR_FAILED,
            format!("{}: {}", path.display(), e),
        )
    })?;
    let mut entries: Vec<DirEntry> = read
        .filter_map(|entry| entry.ok())
        .map(|entry| DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: entry.file_type().map(|t| t.is_dir()).unwrap_or(false),
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Has `path` been written since `stored`? Used for colorscheme hot-reload.
#[must_use]
pub fn was_modified_since(path: &Path, stored: SystemTime) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|mtime| mtime > stored)
        .unwrap_or(false)
}

#[must_use]
pub fn modification_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Absolute form of a possibly relative path
#[must_use]
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
