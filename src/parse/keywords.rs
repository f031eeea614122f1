//! Per-language keyword tables
//! Classification feeds definition matching (type keywords may begin a
//! function header, other keywords abort one) and syntax colouring.

/// Keyword classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    Control,
    Type,
    Specifier,
    Definition,
    Function,
    Macro,
    Constant,
}

use KeywordKind::*;

pub(crate) static CPP_KEYWORDS: &[(&str, KeywordKind)] = &[
    // constants
    ("true", Constant),
    ("false", Constant),
    ("NULL", Constant),
    ("nullptr", Constant),
    ("this", Constant),
    // types
    ("char", Type),
    ("short", Type),
    ("int", Type),
    ("long", Type),
    ("float", Type),
    ("double", Type),
    ("unsigned", Type),
    ("signed", Type),
    ("void", Type),
    ("bool", Type),
    ("size_t", Type),
    ("uint64_t", Type),
    ("uint32_t", Type),
    ("uint16_t", Type),
    ("uint8_t", Type),
    ("int64_t", Type),
    ("int32_t", Type),
    ("int16_t", Type),
    ("int8_t", Type),
    // specifiers
    ("static", Specifier),
    ("const", Specifier),
    ("constexpr", Specifier),
    ("extern", Specifier),
    ("inline", Specifier),
    ("noexcept", Specifier),
    ("public", Specifier),
    ("private", Specifier),
    ("protected", Specifier),
    ("override", Specifier),
    ("virtual", Specifier),
    ("auto", Specifier),
    ("sizeof", Specifier),
    ("alignof", Specifier),
    ("new", Specifier),
    ("delete", Specifier),
    ("operator", Specifier),
    ("template", Specifier),
    ("typename", Specifier),
    ("using", Specifier),
    ("friend", Specifier),
    ("mutable", Specifier),
    // declarations
    ("struct", Definition),
    ("class", Definition),
    ("enum", Definition),
    ("union", Definition),
    ("namespace", Definition),
    ("typedef", Definition),
    // preprocessor
    ("#include", Macro),
    ("#define", Macro),
    ("#undef", Macro),
    ("#ifdef", Macro),
    ("#ifndef", Macro),
    ("#if", Macro),
    ("#elif", Macro),
    ("#else", Macro),
    ("#endif", Macro),
    ("#pragma", Macro),
    ("#error", Macro),
    // flow control
    ("switch", Control),
    ("case", Control),
    ("default", Control),
    ("if", Control),
    ("else", Control),
    ("for", Control),
    ("while", Control),
    ("do", Control),
    ("return", Control),
    ("continue", Control),
    ("break", Control),
    ("goto", Control),
    ("try", Control),
    ("catch", Control),
    ("throw", Control),
];

pub(crate) static CSHARP_KEYWORDS: &[(&str, KeywordKind)] = &[
    // constants
    ("true", Constant),
    ("false", Constant),
    ("null", Constant),
    ("this", Constant),
    ("base", Constant),
    // types
    ("char", Type),
    ("short", Type),
    ("int", Type),
    ("long", Type),
    ("float", Type),
    ("double", Type),
    ("decimal", Type),
    ("uint", Type),
    ("ulong", Type),
    ("ushort", Type),
    ("byte", Type),
    ("sbyte", Type),
    ("void", Type),
    ("bool", Type),
    ("string", Type),
    ("object", Type),
    ("var", Type),
    // specifiers
    ("static", Specifier),
    ("const", Specifier),
    ("readonly", Specifier),
    ("extern", Specifier),
    ("public", Specifier),
    ("private", Specifier),
    ("protected", Specifier),
    ("internal", Specifier),
    ("override", Specifier),
    ("virtual", Specifier),
    ("abstract", Specifier),
    ("sealed", Specifier),
    ("async", Specifier),
    ("new", Specifier),
    ("sizeof", Specifier),
    ("using", Specifier),
    ("partial", Specifier),
    // declarations
    ("struct", Definition),
    ("class", Definition),
    ("enum", Definition),
    ("interface", Definition),
    ("namespace", Definition),
    ("delegate", Definition),
    ("event", Definition),
    // flow control
    ("switch", Control),
    ("case", Control),
    ("default", Control),
    ("if", Control),
    ("else", Control),
    ("for", Control),
    ("foreach", Control),
    ("in", Control),
    ("while", Control),
    ("do", Control),
    ("return", Control),
    ("continue", Control),
    ("break", Control),
    ("goto", Control),
    ("try", Control),
    ("catch", Control),
    ("finally", Control),
    ("throw", Control),
    ("yield", Control),
    ("await", Control),
];

pub(crate) static PYTHON_KEYWORDS: &[(&str, KeywordKind)] = &[
    // constants
    ("True", Constant),
    ("False", Constant),
    ("None", Constant),
    ("self", Constant),
    // specifiers
    ("global", Specifier),
    ("nonlocal", Specifier),
    ("lambda", Specifier),
    // declarations
    ("def", Definition),
    ("class", Definition),
    ("import", Definition),
    ("from", Definition),
    ("as", Definition),
    // flow control
    ("if", Control),
    ("elif", Control),
    ("else", Control),
    ("for", Control),
    ("while", Control),
    ("in", Control),
    ("return", Control),
    ("continue", Control),
    ("break", Control),
    ("yield", Control),
    ("pass", Control),
    ("raise", Control),
    ("and", Control),
    ("not", Control),
    ("or", Control),
    ("is", Control),
    ("with", Control),
    ("try", Control),
    ("except", Control),
    ("finally", Control),
    ("del", Control),
    ("assert", Control),
];

pub(crate) static JULIA_KEYWORDS: &[(&str, KeywordKind)] = &[
    // constants
    ("true", Constant),
    ("false", Constant),
    ("nothing", Constant),
    // types
    ("Int", Type),
    ("Int32", Type),
    ("Int64", Type),
    ("Float32", Type),
    ("Float64", Type),
    ("Bool", Type),
    ("String", Type),
    ("Vector", Type),
    ("Array", Type),
    ("Dict", Type),
    // specifiers
    ("const", Specifier),
    ("global", Specifier),
    ("local", Specifier),
    ("mutable", Specifier),
    // declarations
    ("function", Definition),
    ("struct", Definition),
    ("immutable", Definition),
    ("macro", Definition),
    ("module", Definition),
    ("using", Definition),
    ("import", Definition),
    ("export", Definition),
    // flow control
    ("if", Control),
    ("elseif", Control),
    ("else", Control),
    ("for", Control),
    ("while", Control),
    ("in", Control),
    ("return", Control),
    ("continue", Control),
    ("break", Control),
    ("do", Control),
    ("begin", Control),
    ("end", Control),
    ("try", Control),
    ("catch", Control),
    ("finally", Control),
];

pub(crate) static GO_KEYWORDS: &[(&str, KeywordKind)] = &[
    // constants
    ("true", Constant),
    ("false", Constant),
    ("nil", Constant),
    ("iota", Constant),
    // types
    ("int", Type),
    ("int8", Type),
    ("int16", Type),
    ("int32", Type),
    ("int64", Type),
    ("uint", Type),
    ("uint8", Type),
    ("uint16", Type),
    ("uint32", Type),
    ("uint64", Type),
    ("byte", Type),
    ("rune", Type),
    ("float32", Type),
    ("float64", Type),
    ("complex64", Type),
    ("complex128", Type),
    ("error", Type),
    ("string", Type),
    ("bool", Type),
    // declarations
    ("func", Definition),
    ("type", Definition),
    ("struct", Definition),
    ("interface", Definition),
    ("map", Definition),
    ("chan", Definition),
    ("const", Definition),
    ("var", Definition),
    ("package", Definition),
    ("import", Definition),
    // flow control
    ("if", Control),
    ("else", Control),
    ("for", Control),
    ("range", Control),
    ("switch", Control),
    ("case", Control),
    ("default", Control),
    ("fallthrough", Control),
    ("return", Control),
    ("continue", Control),
    ("break", Control),
    ("goto", Control),
    ("defer", Control),
    ("go", Control),
    ("select", Control),
];

pub(crate) static BASH_KEYWORDS: &[(&str, KeywordKind)] = &[
    // constants
    ("true", Constant),
    ("false", Constant),
    ("unset", Constant),
    // specifiers
    ("local", Specifier),
    ("readonly", Specifier),
    // declarations
    ("export", Definition),
    ("set", Definition),
    ("function", Definition),
    // flow control
    ("case", Control),
    ("in", Control),
    ("esac", Control),
    ("if", Control),
    ("elif", Control),
    ("else", Control),
    ("fi", Control),
    ("for", Control),
    ("then", Control),
    ("while", Control),
    ("do", Control),
    ("done", Control),
    ("return", Control),
    ("continue", Control),
    ("break", Control),
];

pub(crate) static MAKEFILE_KEYWORDS: &[(&str, KeywordKind)] = &[
    // constants
    ("true", Constant),
    ("false", Constant),
    // declarations
    ("export", Definition),
    ("include", Definition),
    // flow control
    ("ifeq", Control),
    ("ifneq", Control),
    ("ifdef", Control),
    ("ifndef", Control),
    ("else", Control),
    ("endif", Control),
    ("shell", Control),
    ("foreach", Control),
];

pub(crate) static TERRAFORM_KEYWORDS: &[(&str, KeywordKind)] = &[
    // constants
    ("true", Constant),
    ("false", Constant),
    ("null", Constant),
    // types
    ("string", Type),
    ("number", Type),
    ("bool", Type),
    ("list", Type),
    ("map", Type),
    ("set", Type),
    ("object", Type),
    // declarations
    ("resource", Definition),
    ("data", Definition),
    ("variable", Definition),
    ("output", Definition),
    ("module", Definition),
    ("provider", Definition),
    ("locals", Definition),
    // flow control
    ("for", Control),
    ("in", Control),
    ("if", Control),
];
