//! Intermediate-language builder
//!
//! Turns one line of diagram text into a backend-independent line: control
//! markers wiped off, operators unified, `inc`/`dec` calls rewritten as
//! assignments. The result keeps one blank of padding on each side.

use std::ops::Range;

use super::exprlist::split_expression_list;
use super::markers::{MarkerConfig, MarkerPosition};
use super::unify::{collapse_blanks, unify_operators};
use crate::lexer::{is_blank, is_identifier_char, is_literal, split_lexically};

/// Build the intermediate line for `text`
pub fn to_intermediate(text: &str, markers: &MarkerConfig) -> String {
    let stripped = strip_markers(text, markers);
    let unified = unify_operators(&stripped, false);
    let rewritten = rewrite_inc_dec(&unified);
    pad(rewritten.trim_matches(' '))
}

/// Wipe the configured branch/loop markers off `text`.
///
/// Markers containing a word are removed wherever they occur outside
/// literals. An identifier character at a marker edge must border a
/// non-identifier character, so `while` is not stripped from `while_count`;
/// pre-padded markers are removed as they are. Markers made of punctuation
/// only are removed just where they lead (prefix) or trail (postfix) the
/// line, since `)` also closes calls inside it.
pub fn strip_markers(text: &str, markers: &MarkerConfig) -> String {
    let mut interm = pad(text);

    for (marker, position) in markers.redundant_markers() {
        let stripped = if marker.chars().any(is_identifier_char) {
            excise(&interm, marker, marker.trim() == marker)
        } else {
            match position {
                MarkerPosition::Prefix => strip_prefix(&interm, marker.trim_start()),
                MarkerPosition::Postfix => strip_postfix(&interm, marker.trim_end()),
            }
        };
        if let Some(rest) = stripped {
            log::debug!("stripped marker {:?} from {:?}", marker, text);
            interm = pad(&rest);
        }
    }

    interm
}

/// Blank out every occurrence of `marker` outside literals; `None` if there was none.
///
/// With `bounded`, identifier characters at the marker edges must not touch
/// identifier characters of the line.
fn excise(line: &str, marker: &str, bounded: bool) -> Option<String> {
    let literals = literal_ranges(line);
    let mut result = String::with_capacity(line.len());
    let mut copied = 0;
    let mut from = 0;

    while let Some(found) = line[from..].find(marker) {
        let pos = from + found;
        let end = pos + marker.len();
        let in_literal = literals.iter().any(|r| pos < r.end && end > r.start);
        if !in_literal && (!bounded || is_bounded(line, pos, end)) {
            result.push_str(&line[copied..pos]);
            result.push(' ');
            copied = end;
            from = end;
        } else {
            from = pos + line[pos..].chars().next().map_or(1, char::len_utf8);
        }
    }

    if copied == 0 {
        return None;
    }
    result.push_str(&line[copied..]);
    Some(result)
}

fn is_bounded(line: &str, start: usize, end: usize) -> bool {
    let marker = &line[start..end];
    let head_ok = match (line[..start].chars().next_back(), marker.chars().next()) {
        (Some(prev), Some(edge)) => !(is_identifier_char(prev) && is_identifier_char(edge)),
        _ => true,
    };
    let tail_ok = match (marker.chars().next_back(), line[end..].chars().next()) {
        (Some(edge), Some(next)) => !(is_identifier_char(edge) && is_identifier_char(next)),
        _ => true,
    };
    head_ok && tail_ok
}

/// Byte ranges of the string and character literals in `line`
fn literal_ranges(line: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut offset = 0;
    for lexeme in split_lexically(line, true) {
        if is_literal(&lexeme) {
            ranges.push(offset..offset + lexeme.len());
        }
        offset += lexeme.len();
    }
    ranges
}

fn strip_prefix(line: &str, marker: &str) -> Option<String> {
    if marker.is_empty() {
        return None;
    }
    line.trim_start().strip_prefix(marker).map(str::to_string)
}

fn strip_postfix(line: &str, marker: &str) -> Option<String> {
    if marker.is_empty() {
        return None;
    }
    line.trim_end().strip_suffix(marker).map(str::to_string)
}

/// Pad with one blank on each side and shrink inner blank runs
fn pad(text: &str) -> String {
    let body = collapse_blanks(&split_lexically(text.trim_matches(' '), true));
    if body.is_empty() {
        " ".to_string()
    } else {
        format!(" {} ", body)
    }
}

/// Rewrite `inc(x)`, `inc(x, k)`, `dec(x)` and `dec(x, k)` as assignments
pub fn rewrite_inc_dec(text: &str) -> String {
    let mut tokens = split_lexically(text, true);
    let mut i = 0;

    while i < tokens.len() {
        if let Some((end, replacement)) = inc_dec_call(&tokens, i) {
            tokens.splice(i..=end, std::iter::once(replacement));
        }
        i += 1;
    }

    collapse_blanks(&tokens)
}

/// Recognize an `inc`/`dec` call starting at `start`; returns its last token
/// index and the assignment replacing it.
fn inc_dec_call(tokens: &[String], start: usize) -> Option<(usize, String)> {
    let op = if tokens[start].eq_ignore_ascii_case("inc") {
        "+"
    } else if tokens[start].eq_ignore_ascii_case("dec") {
        "-"
    } else {
        return None;
    };

    // A member access like `list.inc(2)` is an ordinary call
    let previous = tokens[..start].iter().rev().find(|t| !is_blank(t));
    if previous.is_some_and(|t| t == ".") {
        return None;
    }

    let open = (start + 1..tokens.len()).find(|&j| !is_blank(&tokens[j]))?;
    if tokens[open] != "(" {
        return None;
    }

    let mut depth = 0usize;
    let mut close = None;
    for (j, token) in tokens.iter().enumerate().skip(open) {
        match token.as_str() {
            "(" => depth += 1,
            ")" => {
                depth -= 1;
                if depth == 0 {
                    close = Some(j);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close?;

    let args = split_expression_list(&tokens[open + 1..close].concat(), ",");
    let (target, amount) = match args.as_slice() {
        [target] => (target.trim().to_string(), "1".to_string()),
        [target, amount] => (target.trim().to_string(), amount.trim().to_string()),
        _ => return None,
    };
    if target.is_empty() || amount.is_empty() {
        return None;
    }

    Some((close, format!("{} <- {} {} {}", target, target, op, amount)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracketed_while() -> MarkerConfig {
        MarkerConfig {
            pre_while: "while (".to_string(),
            post_while: ")".to_string(),
            ..MarkerConfig::default()
        }
    }

    #[test]
    fn test_strip_bracketed_while() {
        let line = to_intermediate("while (x < 3)", &bracketed_while());
        assert_eq!(line, " x < 3 ");
        assert!(!line.contains("while"));
    }

    #[test]
    fn test_strip_keeps_inner_parentheses() {
        let line = to_intermediate("while (f(x) < 3)", &bracketed_while());
        assert_eq!(line, " f(x) < 3 ");
    }

    #[test]
    fn test_strip_default_markers() {
        let markers = MarkerConfig::default();
        assert_eq!(to_intermediate("while a <> b", &markers), " a != b ");
        assert_eq!(to_intermediate("until done", &markers), " done ");
    }

    #[test]
    fn test_marker_inside_identifier_kept() {
        let markers = MarkerConfig::default();
        assert_eq!(to_intermediate("while_count <- 0", &markers), " while_count <- 0 ");
        assert_eq!(to_intermediate("untilx := 1", &markers), " untilx <- 1 ");
    }

    #[test]
    fn test_postfix_marker() {
        let markers = MarkerConfig {
            post_alt: "then".to_string(),
            ..MarkerConfig::default()
        };
        assert_eq!(to_intermediate("a > b then", &markers), " a > b ");
        assert_eq!(to_intermediate("a > lengthen", &markers), " a > lengthen ");
    }

    #[test]
    fn test_every_word_marker_occurrence_stripped() {
        let markers = MarkerConfig {
            pre_alt: "if".to_string(),
            post_alt: "then".to_string(),
            ..MarkerConfig::default()
        };
        assert_eq!(to_intermediate("(if a) > b", &markers), " ( a) > b ");
        assert_eq!(to_intermediate("while while x", &markers), " x ");
        assert_eq!(to_intermediate("x <- 1 while y", &markers), " x <- 1 y ");
        assert_eq!(to_intermediate("if a then b then", &markers), " a b ");
        assert_eq!(to_intermediate("iff <- thenceforth", &markers), " iff <- thenceforth ");
    }

    #[test]
    fn test_padded_marker_removed_everywhere() {
        let markers = MarkerConfig {
            post_while: " do ".to_string(),
            ..MarkerConfig::default()
        };
        assert_eq!(to_intermediate("while x do y do ", &markers), " x y ");
    }

    #[test]
    fn test_marker_in_literal_kept() {
        let markers = MarkerConfig::default();
        assert_eq!(
            to_intermediate("while s = \"until\"", &markers),
            " s == \"until\" "
        );
    }

    #[test]
    fn test_inc_dec() {
        let markers = MarkerConfig::default();
        assert_eq!(to_intermediate("inc(x,5)", &markers), " x <- x + 5 ");
        assert_eq!(to_intermediate("inc(x)", &markers), " x <- x + 1 ");
        assert_eq!(to_intermediate("DEC ( count , 2 )", &markers), " count <- count - 2 ");
        assert_eq!(to_intermediate("dec(a[i])", &markers), " a[i] <- a[i] - 1 ");
        assert_eq!(to_intermediate("Inc(x, f(1, 2))", &markers), " x <- x + f(1, 2) ");
    }

    #[test]
    fn test_inc_lookalikes_untouched() {
        let markers = MarkerConfig::default();
        assert_eq!(to_intermediate("since(x)", &markers), " since(x) ");
        assert_eq!(to_intermediate("list.inc(2)", &markers), " list.inc(2) ");
        assert_eq!(to_intermediate("inc(a, b, c)", &markers), " inc(a, b, c) ");
    }

    #[test]
    fn test_literal_preserved() {
        let markers = MarkerConfig::default();
        assert_eq!(
            to_intermediate("OUTPUT \"while  x\"", &markers),
            " OUTPUT \"while  x\" "
        );
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(to_intermediate("", &MarkerConfig::default()), " ");
    }
}
