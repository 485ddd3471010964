//! Splitting of expression lists
//!
//! Breaks `a, f(b, c), "x,y"` into its top-level expressions without cutting
//! through argument lists or literals.

use crate::lexer::split_lexically;

/// Split `text` at every `separator` lexeme outside parentheses.
///
/// Expressions keep their surrounding blanks; a trailing expression that is
/// blank is dropped. Excess closing parentheses are tolerated.
pub fn split_expression_list(text: &str, separator: &str) -> Vec<String> {
    let mut expressions = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    for token in split_lexically(text, true) {
        if token == separator && depth == 0 {
            expressions.push(std::mem::take(&mut current));
            continue;
        }
        match token.as_str() {
            "(" => depth += 1,
            ")" => depth = depth.saturating_sub(1),
            _ => {}
        }
        current.push_str(&token);
    }

    if !current.trim().is_empty() {
        expressions.push(current);
    }
    expressions
}
