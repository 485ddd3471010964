//! BASH code generator
//!
//! Shell scripts: `if`/`case`/arithmetic `for` loops, positional
//! parameters for subroutines. `until` tests before the body, so
//! post-condition loops get their body duplicated in front of the loop.

use super::emitter::Emitter;
use super::framework::{map_operators, Backend, ForFacets, RoutineContext};
use super::syntax::{fill_operand, RepeatStyle, Syntax};

pub static BASH_SYNTAX: Syntax = Syntax {
    title: "BASH",
    description: "BASH Source Code",
    extension: "sh",

    indent_unit: " ",
    comment_left: "#",
    comment_right: "",

    input: "read $1",
    output: "echo $1",
    assignment: "=",
    terminator: "",

    if_head: &["if {cond}", "then"],
    else_line: "else",
    if_tail: "fi",

    case_head: "case {selector} in",
    case_label: "{patterns})",
    case_pattern_separator: "|",
    case_branch_separator: None,
    case_branch_tail: Some(";;"),
    case_default: "*)",
    case_tail: "esac",

    while_head: &["while {cond}", "do"],
    forever_head: &["while true", "do"],
    loop_tail: "done",
    repeat: RepeatStyle::DuplicateBody,
    repeat_head: &["until {cond}", "do"],
    repeat_tail: "done",

    break_line: "break",
    supports_simple_break: true,
    break_levels: "break {levels}",
    return_line: "return {expr}",
    exit_line: "exit {expr}",
    exit_default: "",

    flag_init: "{flag}=0",
    flag_raise: "{flag}=1",
    flag_check: "if (( {flag} )); then break; fi",
    flag_unset: "(( ! {flag} ))",

    parallel_open: None,
    parallel_close: None,
    thread_open: None,
    thread_close: None,
};

/// BASH backend
#[derive(Debug, Clone, Copy, Default)]
pub struct Bash;

impl Backend for Bash {
    fn syntax(&self) -> &Syntax {
        &BASH_SYNTAX
    }

    fn transform_line(&self, line: String) -> String {
        map_operators(&line, &[("div", "/")])
    }

    fn for_head(&self, facets: &ForFacets) -> Vec<String> {
        let ForFacets {
            counter,
            start,
            end,
            step,
        } = facets;
        let increment = match step {
            1 => format!("{}++", counter),
            -1 => format!("{}--", counter),
            _ => format!("(( {}={}+({}) ))", counter, counter, step),
        };
        let comparison = if *step > 0 { "<=" } else { ">=" };
        vec![
            format!(
                "for (({}={}; {}{}{}; {} ))",
                counter, start, counter, comparison, end, increment
            ),
            "do".to_string(),
        ]
    }

    /// All values go to one `echo`
    fn emit_output(&self, out: &mut Emitter, indent: &str, values: &[String]) {
        let code = fill_operand(BASH_SYNTAX.output, &values.join(" "));
        out.line(indent, code.trim_end());
    }

    fn header(&self, out: &mut Emitter, routine: &RoutineContext) -> String {
        let root = routine.root;
        out.line("", "#!/bin/bash");
        out.blank();
        if routine.options.export_comments {
            out.comments("", &root.comment);
        }
        out.comment("", "(generated by nsdgen)");

        let mut indent = String::new();
        if root.is_program {
            out.blank();
        } else {
            out.line("", &format!("{}() {{", root.method_name()));
            indent.push_str(BASH_SYNTAX.indent_unit);
            for (i, parameter) in root.parameters.iter().enumerate() {
                out.line(&indent, &format!("{}=${}", parameter.name.trim(), i + 1));
            }
        }
        out.blank();
        indent
    }

    fn footer(&self, out: &mut Emitter, routine: &RoutineContext) {
        if !routine.root.is_program {
            out.line("", "}");
        }
    }
}
