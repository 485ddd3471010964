//! Lexical splitter for diagram text
//!
//! Splits one line of loosely typed diagram text into lexemes. Nothing is ever
//! dropped: concatenating the lexemes gives back the input line.

use super::token::{COMPOUND_OPERATORS, DELIMITERS, QUOTES};

/// Splits text lines into lexemes
pub struct Lexer<'src> {
    /// The text being split
    source: &'src str,
    /// Current byte position in the source
    pos: usize,
    /// Start position of the current run of non-delimiter text
    start: usize,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given text
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            start: 0,
        }
    }

    /// Peek at the current character without consuming it
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// Advance to the next character and return it
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Push the pending run of non-delimiter text, if any
    fn flush_run(&mut self, parts: &mut Vec<String>) {
        if self.start < self.pos {
            parts.push(self.source[self.start..self.pos].to_string());
        }
        self.start = self.pos;
    }

    /// Split into maximal non-delimiter runs and isolated delimiters
    fn explode(&mut self) -> Vec<String> {
        let mut parts = Vec::new();
        while let Some(c) = self.peek() {
            if DELIMITERS.contains(&c) {
                self.flush_run(&mut parts);
                self.advance();
                parts.push(c.to_string());
                self.start = self.pos;
            } else {
                self.advance();
            }
        }
        self.flush_run(&mut parts);
        parts
    }

    /// Split the text into lexemes.
    ///
    /// With `restore_literals` set, every string or character literal comes
    /// back as a single lexeme including its quotes.
    pub fn split(mut self, restore_literals: bool) -> Vec<String> {
        let mut parts = self.explode();
        fuse_operators(&mut parts);
        if restore_literals {
            for quote in QUOTES {
                restore_quoted(&mut parts, quote);
            }
        }
        parts
    }
}

/// Split `text` into lexemes (see [`Lexer::split`]).
pub fn split_lexically(text: &str, restore_literals: bool) -> Vec<String> {
    Lexer::new(text).split(restore_literals)
}

/// Merge adjacent delimiter lexemes into multi-character operators
fn fuse_operators(parts: &mut Vec<String>) {
    let mut i = 0;
    while i + 1 < parts.len() {
        let fused = COMPOUND_OPERATORS
            .iter()
            .find(|(first, second, _)| parts[i] == *first && parts[i + 1] == *second)
            .map(|(_, _, fused)| *fused);

        if let Some(fused) = fused {
            parts[i] = fused.to_string();
            parts.remove(i + 1);
            // `<--` is an accepted spelling of `<-`
            if fused == "<-" && parts.get(i + 1).is_some_and(|p| p == "-") {
                parts[i].push('-');
                parts.remove(i + 1);
            }
        }
        i += 1;
    }
}

/// Re-accumulate everything between a pair of `quote` lexemes into one lexeme
fn restore_quoted(parts: &mut Vec<String>, quote: &str) {
    let mut restored = Vec::with_capacity(parts.len());
    let mut composed: Option<String> = None;

    for lexeme in parts.drain(..) {
        match composed.as_mut() {
            Some(literal) => {
                literal.push_str(&lexeme);
                if lexeme == quote {
                    restored.extend(composed.take());
                }
            }
            None if lexeme == quote => composed = Some(lexeme),
            None => restored.push(lexeme),
        }
    }

    if let Some(fragment) = composed {
        log::warn!("unterminated {} literal kept as plain text: {}", quote, fragment);
        restored.push(fragment);
    }

    *parts = restored;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str) -> Vec<String> {
        split_lexically(text, true)
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(lex("a+b"), vec!["a", "+", "b"]);
        assert_eq!(lex("x[i]"), vec!["x", "[", "i", "]"]);
        assert_eq!(lex("foo bar"), vec!["foo", " ", "bar"]);
    }

    #[test]
    fn test_compound_operators() {
        assert_eq!(lex("x<-1"), vec!["x", "<-", "1"]);
        assert_eq!(lex("x:=1"), vec!["x", ":=", "1"]);
        assert_eq!(
            lex("a<=b>=c<>d!=e==f"),
            vec!["a", "<=", "b", ">=", "c", "<>", "d", "!=", "e", "==", "f"]
        );
        assert_eq!(lex("a<<2>>1"), vec!["a", "<<", "2", ">>", "1"]);
        assert_eq!(lex("a&&b||c"), vec!["a", "&&", "b", "||", "c"]);
    }

    #[test]
    fn test_long_assignment_arrow() {
        assert_eq!(lex("x <-- 5"), vec!["x", " ", "<--", " ", "5"]);
    }

    #[test]
    fn test_string_literal_restored() {
        assert_eq!(
            lex("a := \"x,y\" + 1"),
            vec!["a", " ", ":=", " ", "\"x,y\"", " ", "+", " ", "1"]
        );
        assert_eq!(lex("c <- 'a'"), vec!["c", " ", "<-", " ", "'a'"]);
    }

    #[test]
    fn test_literals_not_restored_on_request() {
        assert_eq!(lex_raw("\"a b\""), vec!["\"", "a", " ", "b", "\""]);
    }

    fn lex_raw(text: &str) -> Vec<String> {
        split_lexically(text, false)
    }

    #[test]
    fn test_escaped_quote_inside_literal() {
        assert_eq!(
            lex(r#"s <- "say \"hi\"""#),
            vec!["s", " ", "<-", " ", r#""say \"hi\"""#]
        );
    }

    #[test]
    fn test_backslash_character_literal() {
        assert_eq!(lex(r"c <- '\'"), vec!["c", " ", "<-", " ", r"'\'"]);
    }

    #[test]
    fn test_apostrophe_inside_string() {
        assert_eq!(lex("\"don't\""), vec!["\"don't\""]);
    }

    #[test]
    fn test_unterminated_literal() {
        let parts = lex("x <- \"open, end");
        assert_eq!(parts, vec!["x", " ", "<-", " ", "\"open, end"]);
    }

    #[test]
    fn test_round_trip() {
        for text in [
            "a := \"x,y\" + 1",
            "while (x < 3)",
            "OUTPUT 'c', f(a, b), \"s t\"",
            "x <- y div 2 mod 3",
            "  spaced\tout  ",
            "inc(i, 5)",
            "a[i] <- b.c + 1.5 * -d",
            "",
        ] {
            assert_eq!(lex(text).concat(), text, "round trip of {:?}", text);
        }
    }

    #[test]
    fn test_non_ascii_text() {
        assert_eq!(lex("größe←1"), vec!["größe←1"]);
        assert_eq!(lex("ä + ö").concat(), "ä + ö");
    }
}
