//! Backend syntax records
//!
//! Everything a backend spells differently is data in a [`Syntax`]. Templates
//! carry named placeholders (`{cond}`, `{selector}`, `{patterns}`, `{expr}`,
//! `{levels}`, `{flag}`) and `$1` for the operand of input and output
//! statements.

/// How a post-condition loop is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatStyle {
    /// The language tests after the body: `repeat_head`, body, `repeat_tail`
    Native,
    /// Body once unconditionally, then a pre-condition loop over the body
    DuplicateBody,
}

/// Templates of one target notation
#[derive(Debug, Clone)]
pub struct Syntax {
    pub title: &'static str,
    pub description: &'static str,
    pub extension: &'static str,

    pub indent_unit: &'static str,
    pub comment_left: &'static str,
    pub comment_right: &'static str,

    /// Input statement, `$1` is the target
    pub input: &'static str,
    /// Output statement, `$1` is the value
    pub output: &'static str,
    /// Spelling of the canonical `<-`; unpadded spellings hug their operands
    pub assignment: &'static str,
    /// Appended to every simple statement
    pub terminator: &'static str,

    pub if_head: &'static [&'static str],
    pub else_line: &'static str,
    pub if_tail: &'static str,

    pub case_head: &'static str,
    pub case_label: &'static str,
    /// Joins the patterns of one label line
    pub case_pattern_separator: &'static str,
    /// Emitted between two branches
    pub case_branch_separator: Option<&'static str>,
    /// Closes each branch
    pub case_branch_tail: Option<&'static str>,
    pub case_default: &'static str,
    pub case_tail: &'static str,

    pub while_head: &'static [&'static str],
    pub forever_head: &'static [&'static str],
    /// Closes counting, pre-condition and endless loops
    pub loop_tail: &'static str,
    pub repeat: RepeatStyle,
    pub repeat_head: &'static [&'static str],
    pub repeat_tail: &'static str,

    pub break_line: &'static str,
    /// Whether `break_levels` can leave several loops at once
    pub supports_simple_break: bool,
    pub break_levels: &'static str,
    pub return_line: &'static str,
    pub exit_line: &'static str,
    /// Used for `{expr}` of an exit without status
    pub exit_default: &'static str,

    pub flag_init: &'static str,
    pub flag_raise: &'static str,
    pub flag_check: &'static str,
    /// Condition true while `{flag}` is not raised
    pub flag_unset: &'static str,

    pub parallel_open: Option<&'static str>,
    pub parallel_close: Option<&'static str>,
    pub thread_open: Option<&'static str>,
    pub thread_close: Option<&'static str>,
}

/// Substitute `{key}` in `template`
pub fn fill(template: &str, key: &str, value: &str) -> String {
    template.replace(&format!("{{{}}}", key), value)
}

/// Substitute the `$1` operand in `template`
pub fn fill_operand(template: &str, operand: &str) -> String {
    template.replace("$1", operand)
}
