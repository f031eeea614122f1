use super::*;

#[test]
fn test_translate_printable() {
    assert_eq!(
        translate_key(KeyCode::Char('a'), KeyModifiers::NONE),
        Some(Key::Char('a'))
    );
    assert_eq!(
        translate_key(KeyCode::Char('A'), KeyModifiers::SHIFT),
        Some(Key::Char('A'))
    );
}

#[test]
fn test_translate_control_combinations() {
    assert_eq!(
        translate_key(KeyCode::Char('s'), KeyModifiers::CONTROL),
        Some(Key::Ctrl('s'))
    );
    assert_eq!(
        translate_key(
            KeyCode::Char('z'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        ),
        Some(Key::Ctrl('Z'))
    );
}

#[test]
fn test_translate_editing_keys() {
    assert_eq!(
        translate_key(KeyCode::Esc, KeyModifiers::NONE),
        Some(Key::Escape)
    );
    assert_eq!(
        translate_key(KeyCode::Left, KeyModifiers::CONTROL),
        Some(Key::CtrlArrowLeft)
    );
}
