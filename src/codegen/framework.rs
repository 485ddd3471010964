//! Retargetable generator framework
//!
//! One traversal over the diagram renders every element kind; backends only
//! supply a [`Syntax`] record and a few hooks. Routine output is assembled in
//! five steps: header, preamble, body, result, footer.

use std::collections::BTreeSet;

use crate::analysis::{analyze, JumpKind, RoutineInfo};
use crate::config::{ExportOptions, GeneratorConfig};
use crate::diagram::{Block, DisplayMode, Element, ElementKind, ForLoop, Root};
use crate::errors::NsdResult;
use crate::intermediate::{
    split_expression_list, strip_keyword, to_intermediate, MarkerConfig,
};
use crate::lexer::{is_blank, split_lexically};

use super::emitter::Emitter;
use super::syntax::{fill, fill_operand, RepeatStyle, Syntax};
use super::CodeGenerator;

/// The four facets of a counting loop, ready for a loop header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForFacets {
    pub counter: String,
    pub start: String,
    pub end: String,
    pub step: i64,
}

/// What the routine-bracketing hooks see
pub struct RoutineContext<'a> {
    pub root: &'a Root,
    pub info: &'a RoutineInfo,
    pub options: &'a ExportOptions,
    /// Names of the synthesized multi-level leave flags
    pub flags: &'a [String],
}

/// A target notation
pub trait Backend {
    fn syntax(&self) -> &Syntax;

    /// Target spelling of a source type name; `None` means no type was given
    fn map_type(&self, ty: Option<&str>) -> String {
        ty.map(|t| t.trim().to_string()).unwrap_or_default()
    }

    /// Post-process a line after the shared pipeline has run
    fn transform_line(&self, line: String) -> String {
        line
    }

    /// Head lines of a counting loop
    fn for_head(&self, facets: &ForFacets) -> Vec<String>;

    fn emit_input(&self, out: &mut Emitter, indent: &str, target: &str) {
        let syntax = self.syntax();
        let code = fill_operand(syntax.input, target);
        out.line(indent, &format!("{}{}", code.trim_end(), syntax.terminator));
    }

    /// One output statement per value
    fn emit_output(&self, out: &mut Emitter, indent: &str, values: &[String]) {
        let syntax = self.syntax();
        if values.is_empty() {
            let code = fill_operand(syntax.output, "");
            out.line(indent, &format!("{}{}", code.trim_end(), syntax.terminator));
        }
        for value in values {
            let code = fill_operand(syntax.output, value);
            out.line(indent, &format!("{}{}", code, syntax.terminator));
        }
    }

    /// Opens the routine; returns the indentation of what follows
    fn header(&self, out: &mut Emitter, routine: &RoutineContext) -> String;

    /// Declarations before the body; returns the body indentation
    fn preamble(&self, _out: &mut Emitter, _routine: &RoutineContext, indent: &str) -> String {
        indent.to_string()
    }

    /// Hands back the routine value after the body
    fn result(&self, _out: &mut Emitter, _routine: &RoutineContext, _indent: &str) {}

    /// Closes the routine
    fn footer(&self, out: &mut Emitter, routine: &RoutineContext);
}

/// A code generator for one backend
pub struct Generator<B: Backend> {
    backend: B,
    config: GeneratorConfig,
}

impl<B: Backend> Generator<B> {
    pub fn new(backend: B, config: GeneratorConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run one line through the shared pipeline and the backend's rewrites
    pub fn transform(&self, line: &str) -> String {
        transform(&self.backend, &self.config, line)
    }

    /// Render the elements of `block` at `indent`, without routine brackets
    pub fn render_block(&self, block: &Block, indent: &str) -> Vec<String> {
        let mut traversal = Traversal::new(&self.backend, &self.config);
        traversal.block(block, indent);
        traversal.out.into_lines()
    }

    /// Render a whole routine
    pub fn render(&self, root: &Root) -> NsdResult<String> {
        let syntax = self.backend.syntax();
        let info = analyze(root, &self.config.markers)?;
        log::debug!("generating {} code for {:?}", syntax.title, root.method_name());

        let mut depths = BTreeSet::new();
        if !syntax.supports_simple_break {
            collect_flag_depths(&root.children, 0, &self.config.markers, &mut depths);
        }
        let flags: Vec<String> = depths.into_iter().map(flag_name).collect();

        let routine = RoutineContext {
            root,
            info: &info,
            options: &self.config.options,
            flags: &flags,
        };

        let mut out = Emitter::new(syntax);
        let indent = self.backend.header(&mut out, &routine);
        let indent = self.backend.preamble(&mut out, &routine, &indent);

        let mut traversal = Traversal::new(&self.backend, &self.config);
        traversal.block(&root.children, &indent);
        out.append(traversal.out);

        self.backend.result(&mut out, &routine, &indent);
        self.backend.footer(&mut out, &routine);

        log::debug!("generated {} lines", out.lines().len());
        Ok(out.finish())
    }
}

impl<B: Backend> CodeGenerator for Generator<B> {
    fn generate(&mut self, root: &Root) -> NsdResult<String> {
        self.render(root)
    }

    fn file_extension(&self) -> &'static str {
        self.backend.syntax().extension
    }

    fn language_name(&self) -> &'static str {
        self.backend.syntax().title
    }

    fn description(&self) -> &'static str {
        self.backend.syntax().description
    }
}

/// Intermediate line, assignment spelling, backend rewrites, trimmed
fn transform<B: Backend>(backend: &B, config: &GeneratorConfig, line: &str) -> String {
    if config.options.no_conversion {
        return line.trim().to_string();
    }
    let interm = to_intermediate(line, &config.markers);
    let assigned = apply_assignment(&interm, backend.syntax().assignment);
    backend.transform_line(assigned).trim().to_string()
}

/// Replace the canonical `<-` by `assignment`.
///
/// An unpadded spelling swallows the blanks around it.
fn apply_assignment(line: &str, assignment: &str) -> String {
    let tight = assignment.trim() == assignment;
    let mut result = String::with_capacity(line.len());
    let mut skip_blanks = false;

    for token in split_lexically(line, true) {
        if token == "<-" {
            if tight {
                result.truncate(result.trim_end_matches(' ').len());
                skip_blanks = true;
                result.push_str(assignment);
            } else {
                result.push_str(assignment.trim());
            }
            continue;
        }
        if skip_blanks && is_blank(&token) {
            continue;
        }
        skip_blanks = false;
        result.push_str(&token);
    }

    result
}

/// Replace whole operator lexemes by table lookup; literals are left alone
pub fn map_operators(line: &str, table: &[(&str, &str)]) -> String {
    split_lexically(line, true)
        .into_iter()
        .map(|token| {
            table
                .iter()
                .find(|(from, _)| *from == token)
                .map_or(token, |(_, to)| to.to_string())
        })
        .collect()
}

fn flag_name(depth: usize) -> String {
    format!("leaveFlag{}", depth + 1)
}

fn loop_body(element: &Element) -> Option<&Block> {
    match &element.kind {
        ElementKind::For(for_loop) => Some(&for_loop.body),
        ElementKind::While { body }
        | ElementKind::Repeat { body }
        | ElementKind::Forever { body } => Some(body),
        _ => None,
    }
}

/// Whether a leave inside `block` targets the enclosing loop across at
/// least one inner loop. `inner` counts the loops crossed so far.
fn leaves_across_loops(block: &Block, inner: usize, markers: &MarkerConfig) -> bool {
    block.iter().any(|element| match &element.kind {
        ElementKind::Jump => {
            inner > 0
                && element
                    .text
                    .iter()
                    .any(|line| JumpKind::classify(line, markers).levels() == inner + 1)
        }
        ElementKind::Parallel { .. } => false,
        _ => {
            let inner = if element.is_loop() { inner + 1 } else { inner };
            element
                .children()
                .into_iter()
                .any(|child| leaves_across_loops(child, inner, markers))
        }
    })
}

/// How far each leave inside `block` reaches past it; 1 is the loop owning
/// `block`. `inner` counts the loops entered below `block` so far.
fn escaping_leaves(block: &Block, inner: usize, markers: &MarkerConfig) -> Vec<usize> {
    let mut reach = Vec::new();
    for element in block {
        match &element.kind {
            ElementKind::Jump => {
                for line in &element.text {
                    let levels = JumpKind::classify(line, markers).levels();
                    if levels > inner {
                        reach.push(levels - inner);
                    }
                }
            }
            ElementKind::Parallel { .. } => {}
            _ => {
                let inner = if element.is_loop() { inner + 1 } else { inner };
                for child in element.children() {
                    reach.extend(escaping_leaves(child, inner, markers));
                }
            }
        }
    }
    reach
}

/// Nesting depths of the loops that need a synthesized leave flag
fn collect_flag_depths(
    block: &Block,
    depth: usize,
    markers: &MarkerConfig,
    depths: &mut BTreeSet<usize>,
) {
    for element in block {
        let inner = match loop_body(element) {
            Some(body) => {
                if leaves_across_loops(body, 0, markers) {
                    depths.insert(depth);
                }
                depth + 1
            }
            None => depth,
        };
        for child in element.children() {
            collect_flag_depths(child, inner, markers, depths);
        }
    }
}

/// A loop being rendered
struct LoopFrame {
    /// Flag raised by leaves targeting this loop
    flag: Option<String>,
    /// Flags to test right after this loop closes
    checks: Vec<String>,
    /// Raised by leaves targeting this loop, before the jump
    skip: Option<String>,
}

/// State of one rendering pass
struct Traversal<'g, B: Backend> {
    backend: &'g B,
    config: &'g GeneratorConfig,
    out: Emitter,
    /// Loops a leave can currently exit, innermost last
    loops: Vec<LoopFrame>,
    /// Loop nesting depth, not reset by parallel sections
    depth: usize,
}

impl<'g, B: Backend> Traversal<'g, B> {
    fn new(backend: &'g B, config: &'g GeneratorConfig) -> Self {
        Self {
            backend,
            config,
            out: Emitter::new(backend.syntax()),
            loops: Vec::new(),
            depth: 0,
        }
    }

    fn syntax(&self) -> &'g Syntax {
        let backend: &'g B = self.backend;
        backend.syntax()
    }

    fn transform(&self, line: &str) -> String {
        transform(self.backend, self.config, line)
    }

    fn indented(&self, indent: &str) -> String {
        format!("{}{}", indent, self.syntax().indent_unit)
    }

    /// Append a simple statement with the backend's terminator
    fn statement(&mut self, indent: &str, code: &str) {
        let terminator = self.syntax().terminator;
        self.out.line(indent, &format!("{}{}", code, terminator));
    }

    fn block(&mut self, block: &Block, indent: &str) {
        for element in block {
            self.element(element, indent);
        }
    }

    fn comments(&mut self, element: &Element, indent: &str) {
        if self.config.options.export_comments {
            self.out
                .comments(indent, element.comments(DisplayMode::Code));
        }
    }

    fn element(&mut self, element: &Element, indent: &str) {
        let as_comment =
            element.render_as_comment || self.config.options.instructions_as_comments;

        match &element.kind {
            ElementKind::Instruction | ElementKind::Call | ElementKind::Jump if as_comment => {
                self.out.comments(indent, element.lines(DisplayMode::Code));
            }
            ElementKind::Instruction => {
                self.comments(element, indent);
                for line in element.lines(DisplayMode::Code) {
                    self.instruction_line(line, indent);
                }
            }
            ElementKind::Call => {
                self.comments(element, indent);
                for line in element.lines(DisplayMode::Code) {
                    let code = self.transform(line);
                    if !code.is_empty() {
                        self.statement(indent, &code);
                    }
                }
            }
            ElementKind::Jump => {
                self.comments(element, indent);
                for line in element.lines(DisplayMode::Code) {
                    self.jump_line(line, indent);
                }
            }
            ElementKind::Alternative {
                then_block,
                else_block,
            } => {
                self.comments(element, indent);
                self.alternative(element, then_block, else_block, indent);
            }
            ElementKind::Case { branches } => {
                self.comments(element, indent);
                self.case(element, branches, indent);
            }
            ElementKind::For(for_loop) => {
                self.comments(element, indent);
                let facets = self.for_facets(element, for_loop);
                let head = self.backend.for_head(&facets);
                let tail = vec![self.syntax().loop_tail.to_string()];
                self.looped(&for_loop.body, indent, head, tail);
            }
            ElementKind::While { body } => {
                self.comments(element, indent);
                let cond = self.condition(element);
                let head = fill_all(self.syntax().while_head, "cond", &cond);
                let tail = vec![self.syntax().loop_tail.to_string()];
                self.looped(body, indent, head, tail);
            }
            ElementKind::Repeat { body } => {
                self.comments(element, indent);
                self.repeat(element, body, indent);
            }
            ElementKind::Forever { body } => {
                self.comments(element, indent);
                let head = fill_all(self.syntax().forever_head, "cond", "");
                let tail = vec![self.syntax().loop_tail.to_string()];
                self.looped(body, indent, head, tail);
            }
            ElementKind::Parallel { threads } => {
                self.comments(element, indent);
                self.parallel(threads, indent);
            }
        }
    }

    fn condition(&self, element: &Element) -> String {
        self.transform(&element.condition())
    }

    fn instruction_line(&mut self, line: &str, indent: &str) {
        if self.config.options.no_conversion {
            let code = line.trim();
            if !code.is_empty() {
                self.statement(indent, code);
            }
            return;
        }

        let backend = self.backend;
        let config = self.config;
        let markers = &config.markers;
        if let Some(rest) = strip_keyword(line, &markers.input) {
            let target = self.transform(rest);
            backend.emit_input(&mut self.out, indent, &target);
        } else if let Some(rest) = strip_keyword(line, &markers.output) {
            let values: Vec<String> = split_expression_list(rest, ",")
                .iter()
                .map(|value| self.transform(value))
                .collect();
            backend.emit_output(&mut self.out, indent, &values);
        } else {
            let code = self.transform(line);
            if !code.is_empty() {
                self.statement(indent, &code);
            }
        }
    }

    fn jump_line(&mut self, line: &str, indent: &str) {
        if self.config.options.no_conversion {
            let code = line.trim();
            if !code.is_empty() {
                self.statement(indent, code);
            }
            return;
        }

        let syntax = self.syntax();
        match JumpKind::classify(line, &self.config.markers) {
            JumpKind::Leave(levels) => self.leave(levels, indent),
            JumpKind::Return(expr) => {
                let expr = self.transform(&expr);
                let code = fill(syntax.return_line, "expr", &expr);
                self.statement(indent, code.trim_end());
            }
            JumpKind::Exit(expr) => {
                let expr = match self.transform(&expr) {
                    expr if expr.is_empty() => syntax.exit_default.to_string(),
                    expr => expr,
                };
                let code = fill(syntax.exit_line, "expr", &expr);
                self.statement(indent, code.trim_end());
            }
            JumpKind::Plain(line) => {
                let code = self.transform(&line);
                if !code.is_empty() {
                    self.statement(indent, &code);
                }
            }
        }
    }

    fn leave(&mut self, levels: usize, indent: &str) {
        let syntax = self.syntax();
        let skip = self
            .loops
            .len()
            .checked_sub(levels.max(1))
            .and_then(|target| self.loops[target].skip.clone());
        if let Some(flag) = skip {
            self.out.line(indent, &fill(syntax.flag_raise, "flag", &flag));
        }

        if levels <= 1 {
            self.statement(indent, syntax.break_line);
            return;
        }
        if syntax.supports_simple_break {
            let code = fill(syntax.break_levels, "levels", &levels.to_string());
            self.statement(indent, &code);
            return;
        }
        if levels > self.loops.len() {
            log::warn!(
                "leaving {} loops but only {} enclose the jump, leaving one",
                levels,
                self.loops.len()
            );
            self.statement(indent, syntax.break_line);
            return;
        }

        let target = self.loops.len() - levels;
        match self.loops[target].flag.clone() {
            Some(flag) => {
                self.out.line(indent, &fill(syntax.flag_raise, "flag", &flag));
                for frame in &mut self.loops[target + 1..] {
                    if !frame.checks.contains(&flag) {
                        frame.checks.push(flag.clone());
                    }
                }
            }
            None => log::warn!("no leave flag for a {}-level leave", levels),
        }
        self.statement(indent, syntax.break_line);
    }

    fn alternative(
        &mut self,
        element: &Element,
        then_block: &Block,
        else_block: &Block,
        indent: &str,
    ) {
        let syntax = self.syntax();
        let cond = self.condition(element);
        let inner = self.indented(indent);

        for head in fill_all(syntax.if_head, "cond", &cond) {
            self.out.line(indent, &head);
        }
        self.block(then_block, &inner);
        if !else_block.is_empty() {
            self.out.line(indent, syntax.else_line);
            self.block(else_block, &inner);
        }
        self.out.line(indent, syntax.if_tail);
    }

    fn case_patterns(&self, label: &str) -> String {
        if self.config.options.no_conversion {
            return label.trim().to_string();
        }
        split_expression_list(label, ",")
            .iter()
            .map(|pattern| self.transform(pattern))
            .collect::<Vec<_>>()
            .join(self.syntax().case_pattern_separator)
    }

    fn case(&mut self, element: &Element, branches: &[Block], indent: &str) {
        let syntax = self.syntax();
        let inner = self.indented(indent);
        let body_indent = self.indented(&inner);
        let selector = self.transform(element.selector());
        let labels = element.labels();

        self.out.line(indent, &fill(syntax.case_head, "selector", &selector));

        let Some((default, labelled)) = branches.split_last() else {
            self.out.line(indent, syntax.case_tail);
            return;
        };

        for (i, branch) in labelled.iter().enumerate() {
            if i > 0 {
                if let Some(separator) = syntax.case_branch_separator {
                    self.out.line(indent, separator);
                }
            }
            let label = labels.get(i).map(String::as_str).unwrap_or("");
            let patterns = self.case_patterns(label);
            self.out
                .line(&inner, &fill(syntax.case_label, "patterns", &patterns));
            self.block(branch, &body_indent);
            if let Some(tail) = syntax.case_branch_tail {
                self.out.line(&inner, tail);
            }
        }

        let wildcard = labels
            .get(labelled.len())
            .is_some_and(|label| label.trim() == "%");
        if !wildcard {
            self.out.line(&inner, syntax.case_default);
            self.block(default, &body_indent);
            if let Some(tail) = syntax.case_branch_tail {
                self.out.line(&inner, tail);
            }
        }

        self.out.line(indent, syntax.case_tail);
    }

    fn for_facets(&self, element: &Element, for_loop: &ForLoop) -> ForFacets {
        let parsed;
        let for_loop = if for_loop.counter.trim().is_empty() {
            parsed = ForLoop::from_text(
                &element.lines(DisplayMode::Code).join(" "),
                &self.config.markers,
            );
            &parsed
        } else {
            for_loop
        };

        let expression = |facet: &str, text: &str| {
            if text.trim().is_empty() {
                log::warn!("counting loop over {:?} has no {}", for_loop.counter, facet);
                text.to_string()
            } else {
                self.transform(text)
            }
        };
        let start = expression("start value", &for_loop.start);
        let end = expression("end value", &for_loop.end);

        ForFacets {
            counter: for_loop.counter.trim().to_string(),
            start,
            end,
            step: for_loop.step_const(),
        }
    }

    /// Allocate the leave flag of a loop entered at the current depth
    fn enter_loop(&mut self, body: &Block, indent: &str) {
        let syntax = self.syntax();
        let flag = (!syntax.supports_simple_break
            && leaves_across_loops(body, 0, &self.config.markers))
        .then(|| flag_name(self.depth));

        if let Some(flag) = &flag {
            self.out.line(indent, &fill(syntax.flag_init, "flag", flag));
        }
        self.loops.push(LoopFrame {
            flag,
            checks: Vec::new(),
            skip: None,
        });
        self.depth += 1;
    }

    fn exit_loop(&mut self, indent: &str, tail: Vec<String>) {
        let syntax = self.syntax();
        self.depth -= 1;
        let frame = self.loops.pop();
        for line in tail {
            self.out.line(indent, &line);
        }
        for flag in frame.map(|frame| frame.checks).unwrap_or_default() {
            self.out.line(indent, &fill(syntax.flag_check, "flag", &flag));
        }
    }

    fn looped(&mut self, body: &Block, indent: &str, head: Vec<String>, tail: Vec<String>) {
        let inner = self.indented(indent);
        self.enter_loop(body, indent);
        for line in head {
            self.out.line(indent, &line);
        }
        self.block(body, &inner);
        self.exit_loop(indent, tail);
    }

    fn repeat(&mut self, element: &Element, body: &Block, indent: &str) {
        let syntax = self.syntax();
        let cond = self.condition(element);
        if syntax.repeat == RepeatStyle::DuplicateBody {
            self.repeat_duplicated(body, indent, &cond);
            return;
        }

        let inner = self.indented(indent);
        self.enter_loop(body, indent);
        for line in fill_all(syntax.repeat_head, "cond", &cond) {
            self.out.line(indent, &line);
        }
        self.block(body, &inner);
        self.exit_loop(indent, vec![fill(syntax.repeat_tail, "cond", &cond)]);
    }

    /// Body copy, then a pre-condition loop over the body.
    ///
    /// A copy that can leave the loop runs inside a one-shot endless loop
    /// standing in for the repeat. Leaving the repeat from the copy raises a
    /// skip flag guarding the pre-condition loop.
    fn repeat_duplicated(&mut self, body: &Block, indent: &str, cond: &str) {
        let syntax = self.syntax();
        let reach = escaping_leaves(body, 0, &self.config.markers);
        let skip = reach
            .contains(&1)
            .then(|| format!("skipFlag{}", self.depth + 1));

        if let Some(flag) = &skip {
            self.out.line(indent, &fill(syntax.flag_init, "flag", flag));
        }
        self.out.comment(
            indent,
            "NOTE: This is an automatically inserted copy of the loop body below.",
        );
        if reach.is_empty() {
            self.block(body, indent);
        } else {
            let inner = self.indented(indent);
            self.enter_loop(body, indent);
            if let Some(frame) = self.loops.last_mut() {
                frame.skip = skip.clone();
            }
            for line in fill_all(syntax.forever_head, "cond", "") {
                self.out.line(indent, &line);
            }
            self.block(body, &inner);
            self.statement(&inner, syntax.break_line);
            self.exit_loop(indent, vec![syntax.loop_tail.to_string()]);
        }

        let loop_indent = match &skip {
            Some(flag) => {
                let guard = fill(syntax.flag_unset, "flag", flag);
                for line in fill_all(syntax.if_head, "cond", &guard) {
                    self.out.line(indent, &line);
                }
                self.indented(indent)
            }
            None => indent.to_string(),
        };
        let inner = self.indented(&loop_indent);
        self.enter_loop(body, &loop_indent);
        for line in fill_all(syntax.repeat_head, "cond", cond) {
            self.out.line(&loop_indent, &line);
        }
        self.block(body, &inner);
        self.exit_loop(&loop_indent, vec![fill(syntax.repeat_tail, "cond", cond)]);
        if skip.is_some() {
            self.out.line(indent, syntax.if_tail);
        }
    }

    fn parallel(&mut self, threads: &[Block], indent: &str) {
        let syntax = self.syntax();
        let rule = "==========================================================";
        let thread_indent = self.indented(indent);
        let body_indent = match syntax.thread_open {
            Some(_) => self.indented(&thread_indent),
            None => thread_indent.clone(),
        };

        self.out.comment(indent, rule);
        self.out.comment(indent, "================= START PARALLEL SECTION =================");
        self.out.comment(indent, rule);
        self.out
            .comment(indent, "TODO: add the necessary code to run the threads concurrently");
        if let Some(open) = syntax.parallel_open {
            self.out.line(indent, open);
        }

        // Threads cannot leave loops outside of them
        let outer_loops = std::mem::take(&mut self.loops);
        for (i, thread) in threads.iter().enumerate() {
            self.out.comment(
                &thread_indent,
                &format!("----------------- START THREAD {} -----------------", i),
            );
            if let Some(open) = syntax.thread_open {
                self.out.line(&thread_indent, open);
            }
            self.block(thread, &body_indent);
            if let Some(close) = syntax.thread_close {
                self.out.line(&thread_indent, close);
            }
            self.out.comment(
                &thread_indent,
                &format!("------------------ END THREAD {} ------------------", i),
            );
        }
        self.loops = outer_loops;

        if let Some(close) = syntax.parallel_close {
            self.out.line(indent, close);
        }
        self.out.comment(indent, rule);
        self.out.comment(indent, "================== END PARALLEL SECTION ==================");
        self.out.comment(indent, rule);
    }
}

fn fill_all(templates: &[&str], key: &str, value: &str) -> Vec<String> {
    templates
        .iter()
        .map(|template| fill(template, key, value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::bash::{Bash, BASH_SYNTAX};
    use crate::codegen::oberon::Oberon;

    /// Bash spelling without native multi-level break
    struct FlaggedBash(Syntax);

    impl Backend for FlaggedBash {
        fn syntax(&self) -> &Syntax {
            &self.0
        }

        fn for_head(&self, facets: &ForFacets) -> Vec<String> {
            Bash.for_head(facets)
        }

        fn header(&self, _out: &mut Emitter, _routine: &RoutineContext) -> String {
            String::new()
        }

        fn footer(&self, _out: &mut Emitter, _routine: &RoutineContext) {}
    }

    fn flagged_bash() -> Generator<FlaggedBash> {
        let syntax = Syntax {
            supports_simple_break: false,
            ..BASH_SYNTAX.clone()
        };
        Generator::new(FlaggedBash(syntax), GeneratorConfig::default())
    }

    fn forever(body: Vec<Element>) -> Element {
        Element::new(
            ElementKind::Forever {
                body: Block::new(body),
            },
            &[],
        )
    }

    fn jump(line: &str) -> Element {
        Element::new(ElementKind::Jump, &[line])
    }

    #[test]
    fn test_apply_assignment() {
        assert_eq!(apply_assignment(" y <- 1 ", "="), " y=1 ");
        assert_eq!(apply_assignment(" y <- 1 ", " := "), " y := 1 ");
        assert_eq!(apply_assignment(" s <- \"a <- b\" ", "="), " s=\"a <- b\" ");
    }

    #[test]
    fn test_map_operators_skips_literals() {
        let table = [("==", "="), ("!", "~")];
        assert_eq!(
            map_operators(" a == \"==\" && ! b ", &table),
            " a = \"==\" && ~ b "
        );
    }

    #[test]
    fn test_transform_no_conversion() {
        let config = GeneratorConfig {
            options: ExportOptions {
                no_conversion: true,
                ..ExportOptions::default()
            },
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(Bash, config);
        assert_eq!(generator.transform("  x <- 1 "), "x <- 1");
    }

    #[test]
    fn test_render_as_comment() {
        let generator = Generator::new(Bash, GeneratorConfig::default());
        let block = Block::new(vec![
            Element::instruction(&["x <- 1"]).with_comment(&["ignored"]).as_comment(),
            Element::new(ElementKind::Call, &["f(x)"]).with_comment(&["call f"]),
        ]);
        assert_eq!(
            generator.render_block(&block, ""),
            ["# x <- 1", "# call f", "f(x)"]
        );
    }

    #[test]
    fn test_comments_can_be_suppressed() {
        let config = GeneratorConfig {
            options: ExportOptions {
                export_comments: false,
                ..ExportOptions::default()
            },
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(Bash, config);
        let block = Block::new(vec![Element::instruction(&["x <- 1"]).with_comment(&["set"])]);
        assert_eq!(generator.render_block(&block, ""), ["x=1"]);
    }

    #[test]
    fn test_leave_flag_synthesis() {
        let generator = flagged_bash();
        let block = Block::new(vec![forever(vec![
            forever(vec![jump("leave 2")]),
            Element::instruction(&["x <- 1"]),
        ])]);
        assert_eq!(
            generator.render_block(&block, ""),
            [
                "leaveFlag1=0",
                "while true",
                "do",
                " while true",
                " do",
                "  leaveFlag1=1",
                "  break",
                " done",
                " if (( leaveFlag1 )); then break; fi",
                " x=1",
                "done",
            ]
        );
    }

    #[test]
    fn test_no_flag_for_single_level_leave() {
        let generator = flagged_bash();
        let block = Block::new(vec![forever(vec![forever(vec![jump("leave")])])]);
        let lines = generator.render_block(&block, "");
        assert!(lines.iter().all(|line| !line.contains("leaveFlag")));
    }

    #[test]
    fn test_native_multi_level_break() {
        let generator = Generator::new(Bash, GeneratorConfig::default());
        let block = Block::new(vec![forever(vec![forever(vec![jump("leave 2")])])]);
        let lines = generator.render_block(&block, "");
        assert!(lines.contains(&"  break 2".to_string()));
        assert!(lines.iter().all(|line| !line.contains("leaveFlag")));
    }

    #[test]
    fn test_flag_depths_collected() {
        let markers = MarkerConfig::default();
        let block = Block::new(vec![forever(vec![forever(vec![forever(vec![
            jump("leave 2"),
        ])])])]);
        let mut depths = BTreeSet::new();
        collect_flag_depths(&block, 0, &markers, &mut depths);
        assert_eq!(depths.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_leave_inside_parallel_stays_local() {
        let markers = MarkerConfig::default();
        let body = Block::new(vec![Element::new(
            ElementKind::Parallel {
                threads: vec![Block::new(vec![forever(vec![jump("leave 2")])])],
            },
            &[],
        )]);
        assert!(!leaves_across_loops(&body, 0, &markers));
    }

    #[test]
    fn test_for_facets_from_text() {
        let generator = Generator::new(Oberon, GeneratorConfig::default());
        let block = Block::new(vec![Element::new(
            ElementKind::For(ForLoop::default()),
            &["for i <- 1 to n by 2"],
        )]);
        assert_eq!(
            generator.render_block(&block, ""),
            ["FOR i := 1 TO n BY 2 DO", "END;"]
        );
    }
}
