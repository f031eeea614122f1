use super::*;

#[test]
fn test_rgb_line_applies() {
    let mut scheme = ColorScheme::default();
    let warnings = scheme.apply_file("syntax_string 10 20 30\n");
    assert!(warnings.is_empty());
    assert_eq!(scheme.get("syntax_string"), Color::rgb(10, 20, 30));
}

#[test]
fn test_rgba_line_applies() {
    let mut scheme = ColorScheme::default();
    let warnings = scheme.apply_file("shadow 1 2 3 99\n");
    assert!(warnings.is_empty());
    assert_eq!(scheme.get("shadow"), Color::rgba(1, 2, 3, 99));
}

#[test]
fn test_hex_line_applies() {
    let mut scheme = ColorScheme::default();
    let warnings = scheme.apply_file("background #102030\n");
    assert!(warnings.is_empty());
    assert_eq!(scheme.get("background"), Color::rgb(16, 32, 48));
}

#[test]
fn test_unknown_name_warns_but_rest_applies() {
    let mut scheme = ColorScheme::default();
    let warnings = scheme.apply_file("no_such_name 1 2 3\nsyntax_number 7 8 9\n");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains_msg("no_such_name"));
    assert_eq!(scheme.get("syntax_number"), Color::rgb(7, 8, 9));
}

#[test]
fn test_bad_value_warns_but_rest_applies() {
    let mut scheme = ColorScheme::default();
    let warnings = scheme.apply_file("syntax_type 300 0 0\nsyntax_text 1 1 1\n");
    assert_eq!(warnings.len(), 1);
    assert_eq!(scheme.get("syntax_text"), Color::rgb(1, 1, 1));
}

#[test]
fn test_blank_lines_skipped() {
    let mut scheme = ColorScheme::default();
    let warnings = scheme.apply_file("\n\nsyntax_text 5 5 5\n\n");
    assert!(warnings.is_empty());
    assert_eq!(scheme.get("syntax_text"), Color::rgb(5, 5, 5));
}

#[test]
fn test_token_color_categories() {
    let scheme = ColorScheme::default();
    assert_eq!(
        scheme.token_color(TokenKind::Number, None),
        scheme.get("syntax_number")
    );
    assert_eq!(
        scheme.token_color(TokenKind::Identifier, Some(KeywordKind::Control)),
        scheme.get("syntax_control")
    );
    assert_eq!(
        scheme.token_color(TokenKind::LineComment, None),
        scheme.get("syntax_comment")
    );
}
