//! Append-only line buffer

use super::syntax::Syntax;

/// Output buffer of one generation run
///
/// Lines are only ever appended, so document order equals emission order.
#[derive(Debug, Clone)]
pub struct Emitter {
    lines: Vec<String>,
    comment_left: &'static str,
    comment_right: &'static str,
}

impl Emitter {
    pub fn new(syntax: &Syntax) -> Self {
        Self {
            lines: Vec::new(),
            comment_left: syntax.comment_left,
            comment_right: syntax.comment_right,
        }
    }

    /// Append one indented line
    pub fn line(&mut self, indent: &str, text: &str) {
        self.lines.push(format!("{}{}", indent, text));
    }

    /// Append an empty line
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Append one comment line
    pub fn comment(&mut self, indent: &str, text: &str) {
        let text = text.trim_end();
        let mut line = format!("{}{}", indent, self.comment_left);
        if !text.is_empty() {
            line.push(' ');
            line.push_str(text);
        }
        if !self.comment_right.is_empty() {
            line.push(' ');
            line.push_str(self.comment_right);
        }
        self.lines.push(line);
    }

    /// Append every line as a comment
    pub fn comments<S: AsRef<str>>(&mut self, indent: &str, lines: &[S]) {
        for text in lines {
            self.comment(indent, text.as_ref());
        }
    }

    /// Append a comment spanning several lines, opened and closed once.
    ///
    /// Notations with line comments get one comment per line instead.
    pub fn block_comment<S: AsRef<str>>(&mut self, indent: &str, lines: &[S]) {
        if lines.is_empty() {
            return;
        }
        if self.comment_right.is_empty() {
            self.comments(indent, lines);
            return;
        }
        self.line(indent, self.comment_left);
        for text in lines {
            let text = text.as_ref().trim_end();
            if text.is_empty() {
                self.line(indent, " *");
            } else {
                self.line(indent, &format!(" * {}", text));
            }
        }
        self.line(indent, &format!(" {}", self.comment_right));
    }

    /// Move all lines of `other` to the end of this buffer
    pub fn append(&mut self, other: Emitter) {
        self.lines.extend(other.lines);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// All lines joined by newlines, with a final newline
    pub fn finish(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}
