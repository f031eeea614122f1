//! Tokenizer dispatcher and definition extraction
//! One linear scan per buffer produces the token stream, the definition
//! ranges, and the first-seen identifier set used for completion.
//!
//! Each dialect is a data table: identifier extras, operators tested
//! longest-first, comment syntaxes, string forms, keywords, and which
//! definition pass runs over the finished token stream.

mod keywords;

use crate::buffer::line::Line;
use crate::position::{Pos, Range};
pub use keywords::KeywordKind;
use keywords::{
    BASH_KEYWORDS, CPP_KEYWORDS, CSHARP_KEYWORDS, GO_KEYWORDS, JULIA_KEYWORDS, MAKEFILE_KEYWORDS,
    PYTHON_KEYWORDS, TERRAFORM_KEYWORDS,
};
use std::path::Path;

/// Language tag attached to a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    CFamily,
    CSharp,
    Python,
    Julia,
    Go,
    Bash,
    Makefile,
    Terraform,
    Colorscheme,
    Text,
}

impl Language {
    /// Infer the language from a file path
    #[must_use]
    pub fn from_path(path: &Path) -> Language {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if file_name == "Makefile" || file_name == "makefile" {
            return Language::Makefile;
        }
        if file_name.ends_with(".cmantic-colorscheme") {
            return Language::Colorscheme;
        }
        match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "c" | "h" | "cpp" | "hpp" | "cc" | "cxx" | "hxx" => Language::CFamily,
            "cs" => Language::CSharp,
            "py" => Language::Python,
            "jl" => Language::Julia,
            "go" => Language::Go,
            "sh" | "bash" => Language::Bash,
            "mk" => Language::Makefile,
            "tf" => Language::Terraform,
            _ => Language::Text,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Language::CFamily => "c/c++",
            Language::CSharp => "c#",
            Language::Python => "python",
            Language::Julia => "julia",
            Language::Go => "go",
            Language::Bash => "shell",
            Language::Makefile => "makefile",
            Language::Terraform => "terraform",
            Language::Colorscheme => "colorscheme",
            Language::Text => "text",
        }
    }

    /// Leader used by the comment-toggle action
    #[must_use]
    pub fn line_comment(&self) -> Option<&'static str> {
        self.spec().line_comment
    }

    /// Keyword classification for an identifier spelling
    #[must_use]
    pub fn keyword_kind(&self, ident: &str) -> Option<KeywordKind> {
        self.spec()
            .keywords
            .iter()
            .find(|(name, _)| *name == ident)
            .map(|(_, kind)| *kind)
    }

    /// True for keywords that abort a definition match (types do not)
    fn is_non_type_keyword(&self, ident: &str) -> bool {
        matches!(self.keyword_kind(ident), Some(kind) if kind != KeywordKind::Type)
    }

    fn spec(&self) -> &'static LangSpec {
        match self {
            Language::CFamily => &CFAMILY_SPEC,
            Language::CSharp => &CSHARP_SPEC,
            Language::Python => &PYTHON_SPEC,
            Language::Julia => &JULIA_SPEC,
            Language::Go => &GO_SPEC,
            Language::Bash => &BASH_SPEC,
            Language::Makefile => &MAKEFILE_SPEC,
            Language::Terraform => &TERRAFORM_SPEC,
            Language::Colorscheme => &COLORSCHEME_SPEC,
            Language::Text => &TEXT_SPEC,
        }
    }
}

/// Token classification. `Single` carries the literal character so callers
/// can match brace balance generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Nil,
    Identifier,
    Number,
    Str,
    StrUnterminated,
    BlockComment,
    LineComment,
    Operator,
    Single(char),
    Eof,
}

/// One token with its source span. `text` is filled for single-line tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub a: Pos,
    pub b: Pos,
    pub text: String,
}

impl TokenInfo {
    #[must_use]
    pub fn range(&self) -> Range {
        Range::new(self.a, self.b)
    }
}

/// Output of one parse: tokens ordered by start position followed by the
/// `Eof` sentinel, top-level definition ranges, and the deduplicated
/// identifier set in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub tokens: Vec<TokenInfo>,
    pub definitions: Vec<Range>,
    pub identifiers: Vec<String>,
}

/// Which definition pass runs after tokenization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefinitionStyle {
    CFamily,
    CSharp,
    Python,
    Julia,
    Go,
    Bash,
    Makefile,
    Terraform,
    None,
}

/// Static description of one dialect
struct LangSpec {
    /// Extra identifier-head characters beyond letters, '_', '#', '$'
    extra_ident_heads: &'static [char],
    /// Multi-character operators, longest first
    operators: &'static [&'static str],
    line_comment: Option<&'static str>,
    block_comment: Option<(&'static str, &'static str)>,
    /// Single-line string delimiters
    string_chars: &'static [char],
    /// Multi-line string openers (closed by the same sequence)
    multiline_strings: &'static [&'static str],
    /// C++11 `R"delim(...)delim"` raw strings
    raw_strings: bool,
    keywords: &'static [(&'static str, KeywordKind)],
    definitions: DefinitionStyle,
}

const C_OPERATORS: &[&str] = &[
    "===", "!==", "<<=", ">>=", "||", "&&", "==", "!=", "<<", ">>", "++", "::", "--", "+", "-",
    "*", "/", "&", "%", "=", ":", "<", ">",
];

const MAKEFILE_OPERATORS: &[&str] = &[
    "||", "&&", "==", "!=", "<<", ">>", "++", "::", ":=", "?=", "--", "+", "-", "*", "/", "@",
    "&", "%", "=", ":", "<", ">",
];

const BASH_OPERATORS: &[&str] = &[
    "||", "&&", "==", "!=", "<<", ">>", "++", "::", "--", "+", "-", "*", "/", "&", "%", "=", ":",
    "<", ">",
];

static CFAMILY_SPEC: LangSpec = LangSpec {
    extra_ident_heads: &[],
    operators: C_OPERATORS,
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    string_chars: &['"', '\''],
    multiline_strings: &[],
    raw_strings: true,
    keywords: CPP_KEYWORDS,
    definitions: DefinitionStyle::CFamily,
};

static CSHARP_SPEC: LangSpec = LangSpec {
    extra_ident_heads: &[],
    operators: C_OPERATORS,
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    string_chars: &['"', '\''],
    multiline_strings: &[],
    raw_strings: false,
    keywords: CSHARP_KEYWORDS,
    definitions: DefinitionStyle::CSharp,
};

static PYTHON_SPEC: LangSpec = LangSpec {
    extra_ident_heads: &['@'],
    operators: C_OPERATORS,
    line_comment: Some("#"),
    block_comment: None,
    string_chars: &['"', '\''],
    multiline_strings: &["\"\"\"", "'''"],
    raw_strings: false,
    keywords: PYTHON_KEYWORDS,
    definitions: DefinitionStyle::Python,
};

static JULIA_SPEC: LangSpec = LangSpec {
    extra_ident_heads: &['@'],
    operators: C_OPERATORS,
    line_comment: Some("#"),
    block_comment: Some(("#=", "=#")),
    string_chars: &['"', '\''],
    multiline_strings: &["\"\"\""],
    raw_strings: false,
    keywords: JULIA_KEYWORDS,
    definitions: DefinitionStyle::Julia,
};

static GO_SPEC: LangSpec = LangSpec {
    extra_ident_heads: &[],
    operators: C_OPERATORS,
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    string_chars: &['"', '\''],
    multiline_strings: &["`"],
    raw_strings: false,
    keywords: GO_KEYWORDS,
    definitions: DefinitionStyle::Go,
};

static BASH_SPEC: LangSpec = LangSpec {
    extra_ident_heads: &[],
    operators: BASH_OPERATORS,
    line_comment: Some("#"),
    block_comment: None,
    string_chars: &['"', '\''],
    multiline_strings: &[],
    raw_strings: false,
    keywords: BASH_KEYWORDS,
    definitions: DefinitionStyle::Bash,
};

static MAKEFILE_SPEC: LangSpec = LangSpec {
    extra_ident_heads: &['.'],
    operators: MAKEFILE_OPERATORS,
    line_comment: Some("#"),
    block_comment: None,
    string_chars: &['"', '\''],
    multiline_strings: &[],
    raw_strings: false,
    keywords: MAKEFILE_KEYWORDS,
    definitions: DefinitionStyle::Makefile,
};

static TERRAFORM_SPEC: LangSpec = LangSpec {
    extra_ident_heads: &[],
    operators: C_OPERATORS,
    line_comment: Some("#"),
    block_comment: Some(("/*", "*/")),
    string_chars: &['"', '\''],
    multiline_strings: &[],
    raw_strings: false,
    keywords: TERRAFORM_KEYWORDS,
    definitions: DefinitionStyle::Terraform,
};

static COLORSCHEME_SPEC: LangSpec = LangSpec {
    extra_ident_heads: &[],
    operators: &[],
    line_comment: None,
    block_comment: None,
    string_chars: &[],
    multiline_strings: &[],
    raw_strings: false,
    keywords: &[],
    definitions: DefinitionStyle::None,
};

static TEXT_SPEC: LangSpec = LangSpec {
    extra_ident_heads: &[],
    operators: C_OPERATORS,
    line_comment: None,
    block_comment: None,
    string_chars: &['"', '\''],
    multiline_strings: &[],
    raw_strings: false,
    keywords: &[],
    definitions: DefinitionStyle::None,
};

fn is_identifier_head(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '#' || c == '$'
}

fn is_identifier_tail(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_number_tail(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_hexdigit() || c == 'x'
}

fn is_number_modifier(c: char) -> bool {
    matches!(c, 'u' | 'l' | 'L' | 'f')
}

// =============================================================================
// Scanner
// =============================================================================

struct Scanner {
    lines: Vec<Vec<char>>,
    x: usize,
    y: usize,
}

impl Scanner {
    fn new(lines: &[Line]) -> Self {
        Scanner {
            lines: lines.iter().map(|l| l.as_str().chars().collect()).collect(),
            x: 0,
            y: 0,
        }
    }

    fn at_eof(&self) -> bool {
        self.y >= self.lines.len()
    }

    fn line(&self) -> &[char] {
        &self.lines[self.y]
    }

    fn cur(&self) -> Option<char> {
        self.lines.get(self.y).and_then(|l| l.get(self.x)).copied()
    }

    /// Does the current line continue with `s` at column `x`?
    fn begins_with(&self, s: &str) -> bool {
        let line = self.line();
        let mut i = self.x;
        for c in s.chars() {
            if line.get(i).copied() != Some(c) {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Step forward one column, wrapping to the next line. Returns false at
    /// end of input.
    fn step_wrapping(&mut self) -> bool {
        if self.x < self.line().len() {
            self.x += 1;
            return true;
        }
        self.y += 1;
        self.x = 0;
        self.y < self.lines.len()
    }

    /// Consume until `close` appears (inclusive), crossing lines
    fn consume_until(&mut self, close: &str) {
        loop {
            if self.y >= self.lines.len() {
                return;
            }
            if self.x >= self.line().len() {
                self.y += 1;
                self.x = 0;
                continue;
            }
            if self.begins_with(close) {
                self.x += close.chars().count();
                return;
            }
            self.x += 1;
        }
    }

    fn text_of(&self, a: Pos, b: Pos) -> String {
        if a.y != b.y {
            return String::new();
        }
        self.lines[a.y][a.x..b.x].iter().collect()
    }
}

// =============================================================================
// Tokenization
// =============================================================================

/// Tokenize `lines` and extract definitions and identifiers
#[must_use]
pub fn parse(lines: &[Line], language: Language) -> ParseResult {
    let spec = language.spec();
    let mut scanner = Scanner::new(lines);
    let mut tokens: Vec<TokenInfo> = Vec::new();
    let mut identifiers: Vec<String> = Vec::new();

    'scan: loop {
        if scanner.at_eof() {
            break;
        }
        if scanner.x >= scanner.line().len() {
            scanner.y += 1;
            scanner.x = 0;
            continue;
        }
        let c = scanner.line()[scanner.x];
        if c.is_whitespace() {
            scanner.x += 1;
            continue;
        }

        let a = Pos::new(scanner.x, scanner.y);
        let mut kind = TokenKind::Nil;

        // C++11 raw string R"DELIM(...)DELIM"
        if spec.raw_strings && scanner.begins_with("R\"") {
            scanner.x += 2;
            let delim_start = scanner.x;
            while scanner
                .cur()
                .map(is_identifier_tail)
                .unwrap_or(false)
            {
                scanner.x += 1;
            }
            let delim: String = scanner.line()[delim_start..scanner.x].iter().collect();
            let close = format!("){}\"", delim);
            scanner.consume_until(&close);
            kind = TokenKind::Str;
        }
        // multi-line strings (triple quotes, Go backtick strings)
        else if let Some(open) = spec
            .multiline_strings
            .iter()
            .find(|q| scanner.begins_with(q))
        {
            scanner.x += open.chars().count();
            scanner.consume_until(open);
            kind = TokenKind::Str;
        }
        // block comment
        else if let Some((open, close)) = spec.block_comment {
            if scanner.begins_with(open) {
                scanner.x += open.chars().count();
                scanner.consume_until(close);
                kind = TokenKind::BlockComment;
            }
        }

        if kind == TokenKind::Nil {
            // line comment
            if let Some(leader) = spec.line_comment {
                if scanner.begins_with(leader) {
                    scanner.x = scanner.line().len();
                    kind = TokenKind::LineComment;
                }
            }
        }

        if kind == TokenKind::Nil {
            // identifier
            if is_identifier_head(c) || spec.extra_ident_heads.contains(&c) {
                scanner.x += 1;
                while scanner.cur().map(is_identifier_tail).unwrap_or(false) {
                    scanner.x += 1;
                }
                kind = TokenKind::Identifier;
            }
            // number
            else if c.is_ascii_digit() {
                scanner.x += 1;
                while scanner.cur().map(is_number_tail).unwrap_or(false) {
                    scanner.x += 1;
                }
                if scanner.cur() == Some('.')
                    && scanner
                        .line()
                        .get(scanner.x + 1)
                        .map(|c| c.is_ascii_digit())
                        .unwrap_or(false)
                {
                    scanner.x += 2;
                    while scanner.cur().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                        scanner.x += 1;
                    }
                }
                while scanner.cur().map(is_number_modifier).unwrap_or(false) {
                    scanner.x += 1;
                }
                kind = TokenKind::Number;
            }
            // string; one that does not close by end of line is unterminated
            else if spec.string_chars.contains(&c) {
                let quote = c;
                scanner.x += 1;
                let mut closed = false;
                while let Some(cc) = scanner.cur() {
                    if cc == quote && !is_escaped(scanner.line(), scanner.x) {
                        scanner.x += 1;
                        closed = true;
                        break;
                    }
                    scanner.x += 1;
                }
                kind = if closed {
                    TokenKind::Str
                } else {
                    TokenKind::StrUnterminated
                };
            }
            // operators, longest first
            else {
                for op in spec.operators {
                    if scanner.begins_with(op) {
                        scanner.x += op.chars().count();
                        kind = TokenKind::Operator;
                        break;
                    }
                }
                // single character
                if kind == TokenKind::Nil {
                    scanner.x += 1;
                    kind = TokenKind::Single(c);
                }
            }
        }

        if kind == TokenKind::Nil {
            // a recognizer fired but consumed nothing; avoid an infinite loop
            if !scanner.step_wrapping() {
                break 'scan;
            }
            continue;
        }

        let b = Pos::new(scanner.x, scanner.y);
        let text = scanner.text_of(a, b);
        if kind == TokenKind::Identifier && !identifiers.iter().any(|i| i == &text) {
            identifiers.push(text.clone());
        }
        tokens.push(TokenInfo { kind, a, b, text });
    }

    tokens.push(TokenInfo {
        kind: TokenKind::Eof,
        a: Pos::new(0, lines.len()),
        b: Pos::new(0, lines.len()),
        text: String::new(),
    });

    let definitions = match spec.definitions {
        DefinitionStyle::CFamily => find_definitions_cfamily(&mut tokens, language, true),
        DefinitionStyle::CSharp => find_definitions_cfamily(&mut tokens, language, false),
        DefinitionStyle::Python => find_definitions_keyword_pairs(&tokens, &["def", "class"]),
        DefinitionStyle::Julia => {
            find_definitions_keyword_pairs(&tokens, &["function", "struct", "const", "immutable"])
        }
        DefinitionStyle::Go => find_definitions_go(&tokens),
        DefinitionStyle::Bash => find_definitions_bash(&tokens),
        DefinitionStyle::Makefile => find_definitions_makefile(&tokens),
        DefinitionStyle::Terraform => find_definitions_terraform(&tokens),
        DefinitionStyle::None => Vec::new(),
    };

    ParseResult {
        tokens,
        definitions,
        identifiers,
    }
}

/// Is the character at `x` escaped by a backslash that is itself unescaped?
fn is_escaped(line: &[char], x: usize) -> bool {
    let mut backslashes = 0;
    let mut i = x;
    while i > 0 && line[i - 1] == '\\' {
        backslashes += 1;
        i -= 1;
    }
    backslashes % 2 == 1
}

// =============================================================================
// Definition passes
// =============================================================================

fn is_single(t: &TokenInfo, c: char) -> bool {
    t.kind == TokenKind::Single(c)
}

/// `KEYWORD IDENT` pairs (Python def/class, Julia function/struct/...)
fn find_definitions_keyword_pairs(tokens: &[TokenInfo], heads: &[&str]) -> Vec<Range> {
    let mut definitions = Vec::new();
    for i in 0..tokens.len().saturating_sub(1) {
        if tokens[i].kind == TokenKind::Identifier
            && heads.contains(&tokens[i].text.as_str())
            && tokens[i + 1].kind == TokenKind::Identifier
        {
            definitions.push(tokens[i + 1].range());
        }
    }
    definitions
}

/// Skip a balanced `<...>` generic argument list made of identifiers and
/// commas only. Returns `None` when the angle expression cannot be a
/// generic arglist (so `x < 3` does not swallow the rest of the file).
fn skip_generics(tokens: &[TokenInfo], mut j: usize) -> Option<usize> {
    if j < tokens.len() && tokens[j].kind == TokenKind::Operator && tokens[j].text == "<" {
        j += 1;
        let mut depth = 1;
        while j < tokens.len() && depth > 0 {
            let t = &tokens[j];
            let is_angle = t.kind == TokenKind::Operator && (t.text == "<" || t.text == ">");
            let is_comma = is_single(t, ',');
            if t.kind != TokenKind::Identifier && !is_comma && !is_angle {
                return None;
            }
            if t.text == "<" {
                depth += 1;
            }
            if t.text == ">" {
                depth -= 1;
            }
            j += 1;
        }
        if depth > 0 {
            return None;
        }
    }
    Some(j)
}

/// Walk past a balanced `(...)` starting at the opening paren index.
/// Returns the index one past the closing paren, or `None` if unbalanced.
fn skip_parens(tokens: &[TokenInfo], open: usize) -> Option<usize> {
    debug_assert!(is_single(&tokens[open], '('));
    let mut depth = 0;
    let mut k = open;
    while k < tokens.len() {
        if is_single(&tokens[k], '(') {
            depth += 1;
        }
        if is_single(&tokens[k], ')') {
            depth -= 1;
            if depth == 0 {
                return Some(k + 1);
            }
        }
        k += 1;
    }
    None
}

/// C/C++ and C# definitions: aggregate heads, `#define`, and function
/// headers of the form `[type tokens] IDENT ( params ) [specifiers] {`
/// or `IDENT :: IDENT (`. Also collapses `#if 0` regions into one block
/// comment token (C only).
fn find_definitions_cfamily(
    tokens: &mut Vec<TokenInfo>,
    language: Language,
    preprocessor: bool,
) -> Vec<Range> {
    let mut definitions = Vec::new();
    let aggregates: &[&str] = if preprocessor {
        &["struct", "enum", "class", "union", "namespace"]
    } else {
        &["struct", "enum", "class", "union", "interface", "namespace"]
    };

    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].kind != TokenKind::Identifier {
            i += 1;
            continue;
        }

        'matched: {
            // #define NAME
            if preprocessor
                && tokens[i].text == "#define"
                && i + 1 < tokens.len()
                && tokens[i + 1].kind == TokenKind::Identifier
            {
                definitions.push(tokens[i + 1].range());
                break 'matched;
            }

            // struct/class/... NAME { or NAME :
            if aggregates.contains(&tokens[i].text.as_str())
                && i + 2 < tokens.len()
                && tokens[i + 1].kind == TokenKind::Identifier
                && (is_single(&tokens[i + 2], '{')
                    || (tokens[i + 2].kind == TokenKind::Operator && tokens[i + 2].text == ":"))
            {
                definitions.push(tokens[i + 1].range());
                break 'matched;
            }

            // function header; a non-type keyword cannot begin one
            if language.is_non_type_keyword(&tokens[i].text) {
                break 'matched;
            }

            let Some(mut j) = skip_generics(tokens, i + 1) else {
                break 'matched;
            };

            // skip pointers and references after the type
            while j < tokens.len() && tokens[j].kind == TokenKind::Operator {
                if tokens[j].text == "*" || tokens[j].text == "&" {
                    j += 1;
                } else {
                    break 'matched;
                }
            }

            if j + 1 < tokens.len()
                && tokens[j].kind == TokenKind::Identifier
                && is_single(&tokens[j + 1], '(')
            {
                if let Some(mut k) = skip_parens(tokens, j + 1) {
                    // trailing specifiers like `override`, `const`
                    while k < tokens.len()
                        && tokens[k].kind == TokenKind::Identifier
                        && language.keyword_kind(&tokens[k].text).is_some()
                    {
                        k += 1;
                    }
                    if k < tokens.len() && is_single(&tokens[k], '{') {
                        definitions.push(tokens[j].range());
                    }
                }
            } else if j + 3 < tokens.len()
                && tokens[j].kind == TokenKind::Identifier
                && tokens[j + 1].kind == TokenKind::Operator
                && tokens[j + 1].text == "::"
                && tokens[j + 2].kind == TokenKind::Identifier
                && is_single(&tokens[j + 3], '(')
            {
                // qualified method: the definition names the whole path
                definitions.push(Range::new(tokens[j].a, tokens[j + 2].b));
            }
        }

        // preprocessor lines: collapse `#if 0` regions, skip the rest
        if preprocessor && tokens[i].text.starts_with('#') {
            if tokens[i].text == "#if"
                && i + 1 < tokens.len()
                && (tokens[i + 1].text == "0" || tokens[i + 1].text == "false")
            {
                let mut depth = 1;
                let mut j = i + 2;
                while j < tokens.len() && depth > 0 {
                    if tokens[j].text.starts_with("#if") {
                        depth += 1;
                    } else if tokens[j].text == "#endif" {
                        depth -= 1;
                    }
                    j += 1;
                }
                let last = j - 1;
                if last > i {
                    let collapsed = TokenInfo {
                        kind: TokenKind::BlockComment,
                        a: tokens[i].a,
                        b: tokens[last].b,
                        text: String::new(),
                    };
                    tokens.splice(i..=last, [collapsed]);
                }
            } else {
                // skip the remaining tokens of the directive's line
                let line = tokens[i].a.y;
                while i + 1 < tokens.len() && tokens[i + 1].a.y == line {
                    i += 1;
                }
            }
        }

        i += 1;
    }
    definitions
}

/// Go: `func NAME`, `func (recv) NAME`, `type NAME`, `const NAME`,
/// `const ( NAME = ... )`
fn find_definitions_go(tokens: &[TokenInfo]) -> Vec<Range> {
    let mut definitions = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let t = &tokens[i];
        if t.kind == TokenKind::Identifier && i + 1 < tokens.len() {
            if t.text == "func" {
                if tokens[i + 1].kind == TokenKind::Identifier {
                    definitions.push(tokens[i + 1].range());
                } else if is_single(&tokens[i + 1], '(') {
                    if let Some(j) = skip_parens(tokens, i + 1) {
                        if j + 1 < tokens.len()
                            && tokens[j].kind == TokenKind::Identifier
                            && is_single(&tokens[j + 1], '(')
                        {
                            definitions.push(tokens[j].range());
                        }
                        i = j;
                    }
                }
            } else if t.text == "type" && tokens[i + 1].kind == TokenKind::Identifier {
                definitions.push(tokens[i + 1].range());
            } else if t.text == "const" && tokens[i + 1].kind == TokenKind::Identifier {
                definitions.push(tokens[i + 1].range());
            } else if t.text == "const" && is_single(&tokens[i + 1], '(') {
                let mut j = i + 2;
                while j < tokens.len() && !is_single(&tokens[j], ')') {
                    if j + 1 < tokens.len()
                        && tokens[j].kind == TokenKind::Identifier
                        && tokens[j + 1].kind == TokenKind::Operator
                        && tokens[j + 1].text == "="
                    {
                        definitions.push(tokens[j].range());
                    }
                    j += 1;
                }
                i = j;
            }
        }
        i += 1;
    }
    definitions
}

/// Shell: `function NAME`, `export NAME`, and line-leading `NAME=` / `NAME (`
fn find_definitions_bash(tokens: &[TokenInfo]) -> Vec<Range> {
    let mut definitions = Vec::new();
    let mut i = 0;
    while i + 1 < tokens.len() {
        let t = &tokens[i];
        if t.kind == TokenKind::Identifier {
            if t.text == "function" || t.text == "export" {
                definitions.push(tokens[i + 1].range());
                i += 1;
            } else {
                let at_line_start = i == 0 || tokens[i - 1].a.y < t.a.y;
                let next = &tokens[i + 1];
                let is_assign = next.kind == TokenKind::Operator && next.text == "=";
                if at_line_start && (is_assign || is_single(next, '(')) {
                    definitions.push(t.range());
                    i += 1;
                }
            }
        }
        i += 1;
    }
    definitions
}

/// Makefile: `export NAME`, variable assignments, and `target: ...` rules
fn find_definitions_makefile(tokens: &[TokenInfo]) -> Vec<Range> {
    let mut definitions = Vec::new();
    let mut i = 0;
    while i + 1 < tokens.len() {
        let t = &tokens[i];
        if t.kind == TokenKind::Identifier {
            if t.text == "function" || t.text == "export" {
                definitions.push(tokens[i + 1].range());
                i += 1;
            } else {
                let at_line_start = i == 0 || tokens[i - 1].a.y < t.a.y;
                let next = &tokens[i + 1];
                let is_assign = next.kind == TokenKind::Operator
                    && matches!(next.text.as_str(), ":" | ":=" | "=" | "?=");
                if at_line_start && is_assign {
                    definitions.push(t.range());
                    i += 1;
                }
            }
        }
        i += 1;
    }
    definitions
}

/// Terraform: `resource "type" "name"`, `variable "name"`, ...
fn find_definitions_terraform(tokens: &[TokenInfo]) -> Vec<Range> {
    let mut definitions = Vec::new();
    for i in 0..tokens.len() {
        let t = &tokens[i];
        if t.kind == TokenKind::Identifier
            && matches!(t.text.as_str(), "resource" | "data" | "variable" | "output")
            && i + 1 < tokens.len()
        {
            if i + 2 < tokens.len()
                && tokens[i + 1].kind == TokenKind::Str
                && tokens[i + 2].kind == TokenKind::Str
            {
                definitions.push(tokens[i + 2].range());
            } else {
                definitions.push(tokens[i + 1].range());
            }
        }
    }
    definitions
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
