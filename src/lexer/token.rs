//! Lexeme tables for the diagram notation
//!
//! The notation is free-form text, so lexemes stay plain strings. This module
//! holds the fixed tables the scanner and the highlighter consult.

/// Single characters that always form a lexeme of their own.
pub const DELIMITERS: &[char] = &[
    ' ', '\t', '\n', '\r', '.', ',', ';', '(', ')', '[', ']', '-', '+', '/', '*', '>', '<',
    '=', ':', '!', '\'', '"', '\\', '%', '&', '|',
];

/// Adjacent delimiter pairs fused into one operator lexeme, in match order.
///
/// `<` followed by `-` is listed first so that `<-` wins over `<` + `-`;
/// a third `-` after a fused `<-` is absorbed separately by the scanner.
pub const COMPOUND_OPERATORS: &[(&str, &str, &str)] = &[
    ("<", "-", "<-"),
    (":", "=", ":="),
    ("!", "=", "!="),
    ("=", "=", "=="),
    ("<", ">", "<>"),
    ("<", "=", "<="),
    ("<", "<", "<<"),
    (">", "=", ">="),
    (">", ">", ">>"),
    ("&", "&", "&&"),
    ("|", "|", "||"),
    ("\\", "\"", "\\\""),
    ("\\", "\\", "\\\\"),
];

/// Quote characters delimiting string and character literals, restored in this order.
pub const QUOTES: &[&str] = &["\"", "'"];

/// Operators and keywords shown as "special signs" when highlighting a line.
pub const SPECIAL_SIGNS: &[&str] = &[
    ".", "[", "]", "\u{2190}", ":=", "+", "/", "%", "*", "-", "var", "mod", "div", "<=", ">=",
    "<>", "<<", ">>", "<", ">", "==", "!=", "=", "!", "&&", "||", "and", "or", "xor", "not",
    "'", "\"",
];

/// Whether `c` may appear inside an identifier.
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Whether `lexeme` is a complete string or character literal.
pub fn is_literal(lexeme: &str) -> bool {
    QUOTES.iter().any(|q| {
        lexeme.len() >= 2 * q.len() && lexeme.starts_with(q) && lexeme.ends_with(q)
    })
}

/// Whether `lexeme` consists of whitespace only.
pub fn is_blank(lexeme: &str) -> bool {
    !lexeme.is_empty() && lexeme.chars().all(char::is_whitespace)
}
