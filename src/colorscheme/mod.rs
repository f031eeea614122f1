//! Colour scheme files
//! Line-oriented format: `name r g b [a]` or `name #RRGGBB`. Unknown names
//! produce warnings; the rest of the file still applies. The active scheme
//! file is re-read when its mtime changes.

use crate::constants::errors;
use crate::error::{EditorError, ErrorKind};
use crate::parse::KeywordKind;
use crate::parse::TokenKind;
use crate::render::Color;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;

/// Every name a scheme file may set
pub const KNOWN_NAMES: &[&str] = &[
    "syntax_control",
    "syntax_type",
    "syntax_specifier",
    "syntax_definition_keyword",
    "syntax_definition",
    "syntax_function",
    "syntax_macro",
    "syntax_constant",
    "syntax_number",
    "syntax_string",
    "syntax_comment",
    "syntax_operator",
    "syntax_text",
    "background",
    "gutter_text",
    "gutter_background",
    "line_highlight",
    "line_highlight_inactive",
    "marker_inactive",
    "search_term_text",
    "search_term_background",
    "autocomplete_background",
    "autocomplete_highlight",
    "menu_background",
    "menu_highlight",
    "git_blame",
    "shadow",
];

/// Resolved colours, defaulting to a dark scheme
#[derive(Debug, Clone)]
pub struct ColorScheme {
    colors: HashMap<&'static str, Color>,
    /// File the scheme came from, for hot reload
    pub source: Option<(PathBuf, SystemTime)>,
}

impl Default for ColorScheme {
    fn default() -> Self {
        let mut colors = HashMap::new();
        colors.insert("syntax_control", Color::rgb(206, 145, 120));
        colors.insert("syntax_type", Color::rgb(86, 156, 214));
        colors.insert("syntax_specifier", Color::rgb(86, 156, 214));
        colors.insert("syntax_definition_keyword", Color::rgb(197, 134, 192));
        colors.insert("syntax_definition", Color::rgb(220, 220, 170));
        colors.insert("syntax_function", Color::rgb(220, 220, 170));
        colors.insert("syntax_macro", Color::rgb(190, 183, 255));
        colors.insert("syntax_constant", Color::rgb(100, 151, 177));
        colors.insert("syntax_number", Color::rgb(181, 206, 168));
        colors.insert("syntax_string", Color::rgb(206, 145, 120));
        colors.insert("syntax_comment", Color::rgb(106, 153, 85));
        colors.insert("syntax_operator", Color::rgb(212, 212, 212));
        colors.insert("syntax_text", Color::rgb(212, 212, 212));
        colors.insert("background", Color::rgb(30, 30, 30));
        colors.insert("gutter_text", Color::rgb(133, 133, 133));
        colors.insert("gutter_background", Color::rgb(30, 30, 30));
        colors.insert("line_highlight", Color::rgb(40, 40, 46));
        colors.insert("line_highlight_inactive", Color::rgb(34, 34, 38));
        colors.insert("marker_inactive", Color::rgb(90, 90, 90));
        colors.insert("search_term_text", Color::rgb(30, 30, 30));
        colors.insert("search_term_background", Color::rgb(215, 186, 125));
        colors.insert("autocomplete_background", Color::rgb(37, 37, 38));
        colors.insert("autocomplete_highlight", Color::rgb(9, 71, 113));
        colors.insert("menu_background", Color::rgb(37, 37, 38));
        colors.insert("menu_highlight", Color::rgb(9, 71, 113));
        colors.insert("git_blame", Color::rgb(106, 106, 106));
        colors.insert("shadow", Color::rgba(0, 0, 0, 120));
        ColorScheme {
            colors,
            source: None,
        }
    }
}

impl ColorScheme {
    #[must_use]
    pub fn get(&self, name: &str) -> Color {
        self.colors
            .get(name)
            .copied()
            .unwrap_or(Color::rgb(212, 212, 212))
    }

    /// Colour for a token, given the buffer language's keyword table
    #[must_use]
    pub fn token_color(&self, kind: TokenKind, keyword: Option<KeywordKind>) -> Color {
        match kind {
            TokenKind::Identifier => match keyword {
                Some(KeywordKind::Control) => self.get("syntax_control"),
                Some(KeywordKind::Type) => self.get("syntax_type"),
                Some(KeywordKind::Specifier) => self.get("syntax_specifier"),
                Some(KeywordKind::Definition) => self.get("syntax_definition_keyword"),
                Some(KeywordKind::Function) => self.get("syntax_function"),
                Some(KeywordKind::Macro) => self.get("syntax_macro"),
                Some(KeywordKind::Constant) => self.get("syntax_constant"),
                None => self.get("syntax_text"),
            },
            TokenKind::Number => self.get("syntax_number"),
            TokenKind::Str | TokenKind::StrUnterminated => self.get("syntax_string"),
            TokenKind::BlockComment | TokenKind::LineComment => self.get("syntax_comment"),
            TokenKind::Operator => self.get("syntax_operator"),
            _ => self.get("syntax_text"),
        }
    }

    /// Apply one scheme file's contents over the current scheme. Bad lines
    /// and unknown names are reported as warnings; everything else sticks.
    pub fn apply_file(&mut self, contents: &str) -> Vec<EditorError> {
        let mut warnings = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(name) = fields.next() else {
                continue;
            };

            let Some(known) = KNOWN_NAMES.iter().copied().find(|k| *k == name) else {
                warnings.push(EditorError::warning(
                    ErrorKind::ColorschemeParse,
                    errors::COLORSCHEME_PARSE,
                    format!("line {}: unknown name '{}'", line_no + 1, name),
                ));
                continue;
            };

            let rest: Vec<&str> = fields.collect();
            match parse_color(&rest) {
                Some(color) => {
                    self.colors.insert(known, color);
                }
                None => warnings.push(EditorError::warning(
                    ErrorKind::ColorschemeParse,
                    errors::COLORSCHEME_PARSE,
                    format!("line {}: bad color for '{}'", line_no + 1, name),
                )),
            }
        }
        warnings
    }
}

/// `r g b [a]` as 0-255 integers, or a single `#RRGGBB` field
fn parse_color(fields: &[&str]) -> Option<Color> {
    match fields {
        [hex] if hex.starts_with('#') => Color::from_hex(hex),
        [r, g, b] => Some(Color::rgb(
            r.parse().ok()?,
            g.parse().ok()?,
            b.parse().ok()?,
        )),
        [r, g, b, a] => Some(Color::rgba(
            r.parse().ok()?,
            g.parse().ok()?,
            b.parse().ok()?,
            a.parse().ok()?,
        )),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
