//! Operator unification
//!
//! Every accepted operator spelling (Pascal, C and keyword style) is mapped to
//! one padded canonical token. Canonical forms:
//!
//! - Assignment: `<-`
//! - Comparison: `==`, `!=`, `<`, `>`, `<=`, `>=`
//! - Shift: `<<`, `>>`
//! - Logic: `&&`, `||`, `!`, `^`
//! - Arithmetic: `%`, `div`
//!
//! Rules are looked up by whole lexeme, after the lexer has already fused
//! multi-character operators. Longest match therefore always wins: `<=` is one
//! lexeme by the time the `<` rule is consulted, and word operators never
//! match inside an identifier. String and character literals are single
//! lexemes and are never rewritten.

use crate::lexer::{is_literal, split_lexically};

/// Family an operator rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorFamily {
    Assignment,
    Comparison,
    Shift,
    Logic,
    Arithmetic,
}

/// One canonicalization rule
#[derive(Debug, Clone, Copy)]
pub struct OperatorRule {
    pub family: OperatorFamily,
    /// Accepted symbolic spellings, matched exactly
    pub symbols: &'static [&'static str],
    /// Accepted keyword spellings, matched case-insensitively as whole lexemes
    pub words: &'static [&'static str],
    /// Canonical spelling (emitted padded with one blank on each side)
    pub canonical: &'static str,
}

/// The canonicalization table
pub const OPERATOR_RULES: &[OperatorRule] = &[
    OperatorRule {
        family: OperatorFamily::Assignment,
        symbols: &["<-", "<--", ":="],
        words: &[],
        canonical: "<-",
    },
    OperatorRule {
        family: OperatorFamily::Comparison,
        symbols: &["==", "="],
        words: &[],
        canonical: "==",
    },
    OperatorRule {
        family: OperatorFamily::Comparison,
        symbols: &["!=", "<>"],
        words: &[],
        canonical: "!=",
    },
    OperatorRule {
        family: OperatorFamily::Comparison,
        symbols: &["<="],
        words: &[],
        canonical: "<=",
    },
    OperatorRule {
        family: OperatorFamily::Comparison,
        symbols: &[">="],
        words: &[],
        canonical: ">=",
    },
    OperatorRule {
        family: OperatorFamily::Comparison,
        symbols: &["<"],
        words: &[],
        canonical: "<",
    },
    OperatorRule {
        family: OperatorFamily::Comparison,
        symbols: &[">"],
        words: &[],
        canonical: ">",
    },
    OperatorRule {
        family: OperatorFamily::Shift,
        symbols: &["<<"],
        words: &["shl"],
        canonical: "<<",
    },
    OperatorRule {
        family: OperatorFamily::Shift,
        symbols: &[">>"],
        words: &["shr"],
        canonical: ">>",
    },
    OperatorRule {
        family: OperatorFamily::Logic,
        symbols: &["&&"],
        words: &["and"],
        canonical: "&&",
    },
    OperatorRule {
        family: OperatorFamily::Logic,
        symbols: &["||"],
        words: &["or"],
        canonical: "||",
    },
    OperatorRule {
        family: OperatorFamily::Logic,
        symbols: &["!"],
        words: &["not"],
        canonical: "!",
    },
    OperatorRule {
        family: OperatorFamily::Logic,
        symbols: &[],
        words: &["xor"],
        canonical: "^",
    },
    OperatorRule {
        family: OperatorFamily::Arithmetic,
        symbols: &["%"],
        words: &["mod"],
        canonical: "%",
    },
    OperatorRule {
        family: OperatorFamily::Arithmetic,
        symbols: &[],
        words: &["div"],
        canonical: "div",
    },
];

/// Find the rule matching `lexeme`, if any
pub fn find_rule(lexeme: &str, assignment_only: bool) -> Option<&'static OperatorRule> {
    OPERATOR_RULES
        .iter()
        .filter(|rule| !assignment_only || rule.family == OperatorFamily::Assignment)
        .find(|rule| {
            rule.symbols.contains(&lexeme)
                || rule.words.iter().any(|w| lexeme.eq_ignore_ascii_case(w))
        })
}

/// Replace operator lexemes by their padded canonical form.
///
/// Returns the number of lexemes replaced.
pub fn unify_operator_tokens(tokens: &mut [String], assignment_only: bool) -> usize {
    let mut count = 0;
    for token in tokens.iter_mut() {
        if let Some(rule) = find_rule(token, assignment_only) {
            *token = format!(" {} ", rule.canonical);
            count += 1;
        }
    }
    count
}

/// Unify the operators of a text line.
///
/// The result has single blanks between lexemes that were separated and no
/// outer blanks. Applying it twice gives the same result as applying it once.
pub fn unify_operators(text: &str, assignment_only: bool) -> String {
    let mut tokens = split_lexically(text, true);
    unify_operator_tokens(&mut tokens, assignment_only);
    collapse_blanks(&tokens).trim_matches(' ').to_string()
}

/// Concatenate lexemes, shrinking runs of blanks outside literals to one
pub fn collapse_blanks<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::new();
    for token in tokens {
        let token = token.as_ref();
        if is_literal(token) {
            out.push_str(token);
            continue;
        }
        for c in token.chars() {
            if c == ' ' && out.ends_with(' ') {
                continue;
            }
            out.push(c);
        }
    }
    out
}
