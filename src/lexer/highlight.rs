//! Lexeme classification for syntax highlighting
//!
//! A line is split with literal restoration and each lexeme is assigned the
//! class a diagram view would colour it with.

use std::fmt;

use super::scanner::split_lexically;
use super::token::{is_literal, SPECIAL_SIGNS};

/// Highlighting class of one lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeClass {
    /// A known variable of the routine
    Variable,
    /// An operator or operator keyword
    Operator,
    /// The configured input or output keyword
    InputOutput,
    /// A string or character literal
    Literal,
    /// Anything else
    Plain,
}

impl fmt::Display for LexemeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LexemeClass::Variable => "variable",
            LexemeClass::Operator => "operator",
            LexemeClass::InputOutput => "io",
            LexemeClass::Literal => "literal",
            LexemeClass::Plain => "plain",
        };
        f.pad(s)
    }
}

/// Classify a single lexeme
pub fn classify_lexeme(lexeme: &str, variables: &[String], io_markers: &[&str]) -> LexemeClass {
    if variables.iter().any(|v| v == lexeme) {
        LexemeClass::Variable
    } else if SPECIAL_SIGNS.contains(&lexeme) || lexeme == "<-" {
        LexemeClass::Operator
    } else if io_markers
        .iter()
        .any(|m| !m.trim().is_empty() && m.trim() == lexeme)
    {
        LexemeClass::InputOutput
    } else if is_literal(lexeme) {
        LexemeClass::Literal
    } else {
        LexemeClass::Plain
    }
}

/// Split `text` and classify every lexeme, keeping document order
pub fn classify(text: &str, variables: &[String], io_markers: &[&str]) -> Vec<(String, LexemeClass)> {
    split_lexically(text, true)
        .into_iter()
        .map(|lexeme| {
            let class = classify_lexeme(&lexeme, variables, io_markers);
            (lexeme, class)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_line() {
        let vars = vec!["total".to_string()];
        let classes: Vec<_> = classify("OUTPUT total, \"sum\" mod 2", &vars, &["INPUT", "OUTPUT"])
            .into_iter()
            .filter(|(lexeme, _)| !lexeme.trim().is_empty())
            .collect();

        assert_eq!(
            classes,
            vec![
                ("OUTPUT".to_string(), LexemeClass::InputOutput),
                ("total".to_string(), LexemeClass::Variable),
                (",".to_string(), LexemeClass::Plain),
                ("\"sum\"".to_string(), LexemeClass::Literal),
                ("mod".to_string(), LexemeClass::Operator),
                ("2".to_string(), LexemeClass::Plain),
            ]
        );
    }

    #[test]
    fn test_assignment_arrow_is_operator() {
        assert_eq!(classify_lexeme("<-", &[], &[]), LexemeClass::Operator);
        assert_eq!(classify_lexeme(":=", &[], &[]), LexemeClass::Operator);
    }

    #[test]
    fn test_empty_io_marker_ignored() {
        assert_eq!(classify_lexeme("", &[], &[""]), LexemeClass::Plain);
    }
}
