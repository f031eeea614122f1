use super::*;

fn lines_of(src: &[&str]) -> Vec<Line> {
    src.iter().map(|s| Line::from_str(s)).collect()
}

fn parse_src(src: &[&str], language: Language) -> ParseResult {
    parse(&lines_of(src), language)
}

// =============================================================================
// Tokenizer Tests
// =============================================================================

#[test]
fn test_simple_c_tokens() {
    let result = parse_src(&["int x = 42;"], Language::CFamily);
    let kinds: Vec<TokenKind> = result.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Operator,
            TokenKind::Number,
            TokenKind::Single(';'),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_eof_sentinel_position() {
    let result = parse_src(&["a", "b"], Language::CFamily);
    let eof = result.tokens.last().unwrap();
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!(eof.a, Pos::new(0, 2));
}

#[test]
fn test_operators_longest_first() {
    let result = parse_src(&["a <<= b << c < d"], Language::CFamily);
    let ops: Vec<String> = result
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Operator)
        .map(|t| t.text.clone())
        .collect();
    assert_eq!(ops, vec!["<<=", "<<", "<"]);
}

#[test]
fn test_token_spans_do_not_overlap() {
    let result = parse_src(
        &["int main() { return \"s\"; } // done"],
        Language::CFamily,
    );
    for pair in result.tokens.windows(2) {
        assert!(pair[0].b <= pair[1].a, "{:?} overlaps {:?}", pair[0], pair[1]);
    }
}

#[test]
fn test_string_and_unterminated_string() {
    let result = parse_src(&["\"done\" \"open"], Language::CFamily);
    let kinds: Vec<TokenKind> = result.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Str, TokenKind::StrUnterminated, TokenKind::Eof]
    );
}

#[test]
fn test_escaped_quote_does_not_close() {
    let result = parse_src(&[r#""a\"b" x"#], Language::CFamily);
    assert_eq!(result.tokens[0].kind, TokenKind::Str);
    assert_eq!(result.tokens[0].text, r#""a\"b""#);
    // but an escaped backslash before the quote does close it
    let result = parse_src(&[r#""a\\" x"#], Language::CFamily);
    assert_eq!(result.tokens[0].kind, TokenKind::Str);
    assert_eq!(result.tokens[0].text, r#""a\\""#);
}

#[test]
fn test_block_comment_spans_lines() {
    let result = parse_src(&["a /* one", "two", "three */ b"], Language::CFamily);
    let comment = &result.tokens[1];
    assert_eq!(comment.kind, TokenKind::BlockComment);
    assert_eq!(comment.a, Pos::new(2, 0));
    assert_eq!(comment.b, Pos::new(8, 2));
    assert_eq!(result.tokens[2].text, "b");
}

#[test]
fn test_line_comment_runs_to_eol() {
    let result = parse_src(&["x // rest of line", "y"], Language::CFamily);
    assert_eq!(result.tokens[1].kind, TokenKind::LineComment);
    assert_eq!(result.tokens[2].text, "y");
}

#[test]
fn test_preprocessor_identifier_is_one_token() {
    let result = parse_src(&["#define FOO 1"], Language::CFamily);
    assert_eq!(result.tokens[0].kind, TokenKind::Identifier);
    assert_eq!(result.tokens[0].text, "#define");
}

#[test]
fn test_if_zero_collapses_to_block_comment() {
    let result = parse_src(
        &["#if 0", "int hidden() { return 1; }", "#endif", "int x;"],
        Language::CFamily,
    );
    let comment = result
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::BlockComment)
        .expect("collapsed block comment");
    assert_eq!(comment.a.y, 0);
    assert_eq!(comment.b.y, 2);
    // tokens after the #endif survive
    assert!(result.tokens.iter().any(|t| t.text == "x"));
    // the hidden tokens are gone
    assert!(!result.tokens.iter().any(|t| t.text == "hidden"));
}

#[test]
fn test_cpp_raw_string() {
    let result = parse_src(
        &["auto s = R\"EOS(line one", "line two)EOS\";"],
        Language::CFamily,
    );
    let raw = result
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::Str)
        .expect("raw string token");
    assert_eq!(raw.a, Pos::new(9, 0));
    assert_eq!(raw.b.y, 1);
}

#[test]
fn test_python_triple_quoted_string() {
    let result = parse_src(&["x = \"\"\"doc", "body", "\"\"\" + y"], Language::Python);
    let s = result
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::Str)
        .unwrap();
    assert_eq!(s.a, Pos::new(4, 0));
    assert_eq!(s.b, Pos::new(3, 2));
    assert!(result.tokens.iter().any(|t| t.text == "y"));
}

#[test]
fn test_python_hash_is_comment_not_identifier() {
    let result = parse_src(&["x = 1  # note"], Language::Python);
    assert!(result
        .tokens
        .iter()
        .any(|t| t.kind == TokenKind::LineComment));
}

#[test]
fn test_number_forms() {
    let result = parse_src(&["12 3.5 0xff 10ul"], Language::CFamily);
    let nums: Vec<String> = result
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Number)
        .map(|t| t.text.clone())
        .collect();
    assert_eq!(nums, vec!["12", "3.5", "0xff", "10ul"]);
}

// =============================================================================
// Identifier Set Tests
// =============================================================================

#[test]
fn test_identifiers_first_seen_no_duplicates() {
    let result = parse_src(&["foo bar foo baz bar"], Language::Text);
    assert_eq!(result.identifiers, vec!["foo", "bar", "baz"]);
}

#[test]
fn test_identifiers_unique_across_lines() {
    let result = parse_src(&["alpha beta", "beta gamma", "alpha"], Language::Text);
    assert_eq!(result.identifiers, vec!["alpha", "beta", "gamma"]);
}

// =============================================================================
// Definition Tests
// =============================================================================

#[test]
fn test_c_function_definition() {
    let result = parse_src(&["int main() { return 0; }"], Language::CFamily);
    assert_eq!(result.definitions.len(), 1);
    let def = result.definitions[0];
    assert_eq!(def.a, Pos::new(4, 0));
    assert_eq!(def.b, Pos::new(8, 0));
}

#[test]
fn test_c_function_with_pointer_return() {
    let result = parse_src(&["char *strdupe(const char *s) {", "}"], Language::CFamily);
    assert_eq!(result.definitions.len(), 1);
    assert_eq!(result.definitions[0].a, Pos::new(6, 0));
}

#[test]
fn test_c_struct_definition() {
    let result = parse_src(&["struct Point {", "  int x;", "};"], Language::CFamily);
    assert_eq!(result.definitions.len(), 1);
    assert_eq!(result.definitions[0].a, Pos::new(7, 0));
}

#[test]
fn test_c_define_definition() {
    let result = parse_src(&["#define MAX_LINES 4096"], Language::CFamily);
    assert_eq!(result.definitions.len(), 1);
    assert_eq!(result.definitions[0].a, Pos::new(8, 0));
}

#[test]
fn test_c_qualified_method_definition() {
    let result = parse_src(&["void Editor::run() {", "}"], Language::CFamily);
    assert_eq!(result.definitions.len(), 1);
    // the definition names the whole qualified path
    assert_eq!(result.definitions[0].a, Pos::new(5, 0));
    assert_eq!(result.definitions[0].b, Pos::new(16, 0));
}

#[test]
fn test_c_control_keyword_is_not_a_definition() {
    let result = parse_src(&["else if (x) {", "}"], Language::CFamily);
    assert!(result.definitions.is_empty());
}

#[test]
fn test_c_generic_return_type() {
    let result = parse_src(&["Array<Token, int> scan() {", "}"], Language::CFamily);
    assert_eq!(result.definitions.len(), 1);
    let name = &result.tokens[6];
    assert_eq!(name.text, "scan");
    assert_eq!(result.definitions[0].a, name.a);
}

#[test]
fn test_c_comparison_is_not_a_generic() {
    // `x < 3` must not be treated as an opening generic arglist
    let result = parse_src(&["int y = x < 3 ? a() : b;"], Language::CFamily);
    assert!(result.definitions.is_empty());
}

#[test]
fn test_c_trailing_specifier_keywords() {
    let result = parse_src(&["int get() const {", "}"], Language::CFamily);
    assert_eq!(result.definitions.len(), 1);
}

#[test]
fn test_python_definitions() {
    let result = parse_src(
        &["class Editor:", "    def run(self):", "        pass"],
        Language::Python,
    );
    assert_eq!(result.definitions.len(), 2);
}

#[test]
fn test_go_definitions() {
    let result = parse_src(
        &[
            "func open(path string) {}",
            "func (e *Editor) run() {}",
            "type Pane struct {}",
            "const limit = 8",
            "const (",
            "  a = 1",
            "  b = 2",
            ")",
        ],
        Language::Go,
    );
    let names: Vec<String> = result
        .definitions
        .iter()
        .map(|d| {
            result
                .tokens
                .iter()
                .find(|t| t.a == d.a)
                .map(|t| t.text.clone())
                .unwrap_or_default()
        })
        .collect();
    assert_eq!(names, vec!["open", "run", "Pane", "limit", "a", "b"]);
}

#[test]
fn test_bash_definitions() {
    let result = parse_src(
        &["function deploy() {", "}", "TARGET=prod"],
        Language::Bash,
    );
    assert!(result.definitions.len() >= 2);
}

#[test]
fn test_terraform_definitions() {
    let result = parse_src(
        &["resource \"aws_s3_bucket\" \"logs\" {", "}"],
        Language::Terraform,
    );
    assert_eq!(result.definitions.len(), 1);
    // names the second string
    assert_eq!(result.definitions[0].a.x, 25);
}

// =============================================================================
// Language Inference Tests
// =============================================================================

#[test]
fn test_language_from_path() {
    use std::path::Path;
    assert_eq!(Language::from_path(Path::new("a.c")), Language::CFamily);
    assert_eq!(Language::from_path(Path::new("a.hpp")), Language::CFamily);
    assert_eq!(Language::from_path(Path::new("a.cs")), Language::CSharp);
    assert_eq!(Language::from_path(Path::new("a.py")), Language::Python);
    assert_eq!(Language::from_path(Path::new("a.jl")), Language::Julia);
    assert_eq!(Language::from_path(Path::new("a.go")), Language::Go);
    assert_eq!(Language::from_path(Path::new("a.sh")), Language::Bash);
    assert_eq!(Language::from_path(Path::new("Makefile")), Language::Makefile);
    assert_eq!(Language::from_path(Path::new("a.tf")), Language::Terraform);
    assert_eq!(
        Language::from_path(Path::new("dark.cmantic-colorscheme")),
        Language::Colorscheme
    );
    assert_eq!(Language::from_path(Path::new("notes.txt")), Language::Text);
    assert_eq!(Language::from_path(Path::new("README")), Language::Text);
}
