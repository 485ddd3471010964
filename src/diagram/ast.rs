//! Structured-diagram tree
//!
//! The element tree a diagram editor or importer builds. Parents own their
//! children through [`Block`]s; generation only ever reads the tree.

use serde::Deserialize;

use crate::intermediate::{unify_operators, MarkerConfig};
use crate::lexer::is_identifier_char;

/// Which field an accessor reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Text is text and comment is comment
    #[default]
    Code,
    /// Text and comment are exchanged, as a diagram view may show them
    Swapped,
}

/// An ordered sequence of sibling elements
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Block {
    pub elements: Vec<Element>,
}

impl Block {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    pub fn last(&self) -> Option<&Element> {
        self.elements.last()
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// A diagram element
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Element {
    /// Source text lines, in order
    #[serde(default)]
    pub text: Vec<String>,
    /// Comment lines, in order
    #[serde(default)]
    pub comment: Vec<String>,
    /// Emit the text only as a comment, never as code
    #[serde(default)]
    pub render_as_comment: bool,
    #[serde(flatten)]
    pub kind: ElementKind,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementKind {
    /// Assignments, calls, input and output statements
    Instruction,
    /// Condition in `text[0]`
    Alternative {
        #[serde(default)]
        then_block: Block,
        #[serde(default)]
        else_block: Block,
    },
    /// Selector in `text[0]`, one label line per branch after it
    Case { branches: Vec<Block> },
    /// Counting loop
    For(ForLoop),
    /// Pre-condition loop
    While {
        #[serde(default)]
        body: Block,
    },
    /// Post-condition loop
    Repeat {
        #[serde(default)]
        body: Block,
    },
    /// Endless loop
    Forever {
        #[serde(default)]
        body: Block,
    },
    /// Routine invocations
    Call,
    /// Leave, return or exit statements
    Jump,
    /// Concurrent threads
    Parallel {
        #[serde(default)]
        threads: Vec<Block>,
    },
}

impl Element {
    pub fn new(kind: ElementKind, text: &[&str]) -> Self {
        Self {
            text: text.iter().map(|s| s.to_string()).collect(),
            comment: Vec::new(),
            render_as_comment: false,
            kind,
        }
    }

    pub fn instruction(text: &[&str]) -> Self {
        Self::new(ElementKind::Instruction, text)
    }

    pub fn with_comment(mut self, comment: &[&str]) -> Self {
        self.comment = comment.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn as_comment(mut self) -> Self {
        self.render_as_comment = true;
        self
    }

    /// Text lines as seen in `mode`
    pub fn lines(&self, mode: DisplayMode) -> &[String] {
        match mode {
            DisplayMode::Code => &self.text,
            DisplayMode::Swapped => &self.comment,
        }
    }

    /// Comment lines as seen in `mode`
    pub fn comments(&self, mode: DisplayMode) -> &[String] {
        match mode {
            DisplayMode::Code => &self.comment,
            DisplayMode::Swapped => &self.text,
        }
    }

    /// All text lines joined into one condition
    pub fn condition(&self) -> String {
        self.text
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Case selector (first text line)
    pub fn selector(&self) -> &str {
        self.text.first().map(String::as_str).unwrap_or("")
    }

    /// Case labels (all text lines after the selector)
    pub fn labels(&self) -> &[String] {
        self.text.get(1..).unwrap_or(&[])
    }

    /// Name of the element kind
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ElementKind::Instruction => "instruction",
            ElementKind::Alternative { .. } => "alternative",
            ElementKind::Case { .. } => "case",
            ElementKind::For(_) => "for",
            ElementKind::While { .. } => "while",
            ElementKind::Repeat { .. } => "repeat",
            ElementKind::Forever { .. } => "forever",
            ElementKind::Call => "call",
            ElementKind::Jump => "jump",
            ElementKind::Parallel { .. } => "parallel",
        }
    }

    /// Whether the element is a loop a leave statement can exit
    pub fn is_loop(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::For(_)
                | ElementKind::While { .. }
                | ElementKind::Repeat { .. }
                | ElementKind::Forever { .. }
        )
    }

    /// Child blocks in document order
    pub fn children(&self) -> Vec<&Block> {
        match &self.kind {
            ElementKind::Alternative {
                then_block,
                else_block,
            } => vec![then_block, else_block],
            ElementKind::Case { branches } => branches.iter().collect(),
            ElementKind::For(for_loop) => vec![&for_loop.body],
            ElementKind::While { body }
            | ElementKind::Repeat { body }
            | ElementKind::Forever { body } => vec![body],
            ElementKind::Parallel { threads } => threads.iter().collect(),
            ElementKind::Instruction | ElementKind::Call | ElementKind::Jump => Vec::new(),
        }
    }
}

/// Counting loop parameters
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForLoop {
    pub counter: String,
    pub start: String,
    pub end: String,
    /// Signed integer constant; `None` means 1
    pub step: Option<String>,
    pub body: Block,
}

impl ForLoop {
    pub fn new(counter: &str, start: &str, end: &str, step: Option<&str>, body: Block) -> Self {
        Self {
            counter: counter.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            step: step.map(str::to_string),
            body,
        }
    }

    /// Split a counting-loop line like `for i <- 1 to 10 by 2` into its facets.
    ///
    /// Parts that cannot be found come back empty; the body is left empty.
    pub fn from_text(line: &str, markers: &MarkerConfig) -> Self {
        let mut rest = unify_operators(line, true);

        let pre = markers.pre_for.trim();
        if !pre.is_empty() {
            if let Some(pos) = find_word(&rest, pre) {
                rest = rest[pos + pre.len()..].to_string();
            }
        }

        let (counter, rest) = match rest.split_once(" <- ") {
            Some((counter, rest)) => (counter.trim().to_string(), rest.to_string()),
            None => (String::new(), rest),
        };

        let (start, rest) = split_at_word(&rest, markers.post_for.trim());
        let (end, step) = split_at_word(&rest, markers.step_for.trim());

        Self {
            counter,
            start,
            end,
            step: (!step.is_empty()).then_some(step),
            body: Block::default(),
        }
    }

    /// Step as an integer constant; unparseable or zero steps count as 1
    pub fn step_const(&self) -> i64 {
        let Some(step) = self.step.as_deref().map(str::trim) else {
            return 1;
        };
        match step.replace(' ', "").parse::<i64>() {
            Ok(0) => {
                log::warn!("zero loop step in loop over {}, using 1", self.counter);
                1
            }
            Ok(value) => value,
            Err(_) => {
                log::warn!("unparseable loop step {:?}, using 1", step);
                1
            }
        }
    }
}

/// Split `text` around the first whole-word occurrence of `word`
fn split_at_word(text: &str, word: &str) -> (String, String) {
    if word.is_empty() {
        return (text.trim().to_string(), String::new());
    }
    match find_word(text, word) {
        Some(pos) => (
            text[..pos].trim().to_string(),
            text[pos + word.len()..].trim().to_string(),
        ),
        None => (text.trim().to_string(), String::new()),
    }
}

/// Byte position of the first occurrence of `word` not embedded in an identifier
fn find_word(text: &str, word: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = text[from..].find(word) {
        let pos = from + found;
        let end = pos + word.len();
        let before_ok = text[..pos]
            .chars()
            .next_back()
            .map_or(true, |c| !is_identifier_char(c));
        let after_ok = text[end..].chars().next().map_or(true, |c| !is_identifier_char(c));
        if before_ok && after_ok {
            return Some(pos);
        }
        from = pos + word.chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// A routine parameter
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
}

impl Parameter {
    pub fn new(name: &str, ty: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.map(str::to_string),
        }
    }
}

fn default_true() -> bool {
    true
}

/// The diagram root: one program or subroutine
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Root {
    #[serde(default = "default_true")]
    pub is_program: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub result_type: Option<String>,
    /// Variable names known in advance (merged with detected ones)
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub comment: Vec<String>,
    /// Whether diagram views show comments in place of texts
    #[serde(default)]
    pub switch_text_and_comments: bool,
    #[serde(default)]
    pub children: Block,
}

impl Root {
    pub fn program(name: &str, children: Block) -> Self {
        Self {
            is_program: true,
            name: name.to_string(),
            parameters: Vec::new(),
            result_type: None,
            variables: Vec::new(),
            comment: Vec::new(),
            switch_text_and_comments: false,
            children,
        }
    }

    pub fn subroutine(
        name: &str,
        parameters: Vec<Parameter>,
        result_type: Option<&str>,
        children: Block,
    ) -> Self {
        Self {
            is_program: false,
            parameters,
            result_type: result_type.map(str::to_string),
            ..Self::program(name, children)
        }
    }

    /// Routine name without any parameter list
    pub fn method_name(&self) -> &str {
        let name = self.name.trim();
        match name.find('(') {
            Some(pos) => name[..pos].trim(),
            None => name,
        }
    }
}
