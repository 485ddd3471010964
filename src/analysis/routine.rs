//! Routine analysis
//!
//! Collects what the routine-bracketing hooks need to know about a whole
//! diagram: which names are variables and how the routine produces a result.

use crate::diagram::{Block, ElementKind, ForLoop, Root};
use crate::intermediate::{
    split_expression_list, strip_keyword, to_intermediate, MarkerConfig,
};
use crate::lexer::is_identifier_char;

use super::jump::JumpKind;

/// Facts about one routine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutineInfo {
    /// Variable names in order of first appearance
    pub variables: Vec<String>,
    /// Some jump returns from the routine
    pub returns: bool,
    /// Some assignment targets the routine name
    pub function_name_set: bool,
    /// Some assignment targets `result`
    pub result_set: bool,
    /// The last element of the body is a return
    pub always_returns: bool,
}

impl RoutineInfo {
    pub fn analyze(root: &Root, markers: &MarkerConfig) -> Self {
        let mut info = Self::default();

        for name in &root.variables {
            info.add_variable(name);
        }
        for parameter in &root.parameters {
            info.add_variable(&parameter.name);
        }

        let mut collector = Collector {
            info: &mut info,
            markers,
            method_name: root.method_name(),
        };
        collector.visit_block(&root.children);

        info.always_returns = root.children.last().is_some_and(|last| {
            matches!(last.kind, ElementKind::Jump)
                && last
                    .text
                    .last()
                    .is_some_and(|line| JumpKind::classify(line, markers).is_return())
        });

        info
    }

    /// Whether the routine hands back a value
    pub fn yields_value(&self, root: &Root) -> bool {
        root.result_type.is_some() || self.returns || self.function_name_set || self.result_set
    }

    fn add_variable(&mut self, name: &str) {
        let name = name.trim();
        if is_identifier(name) && !self.variables.iter().any(|v| v == name) {
            self.variables.push(name.to_string());
        }
    }
}

struct Collector<'a> {
    info: &'a mut RoutineInfo,
    markers: &'a MarkerConfig,
    method_name: &'a str,
}

impl Collector<'_> {
    fn visit_block(&mut self, block: &Block) {
        for element in block {
            match &element.kind {
                ElementKind::Instruction => {
                    for line in &element.text {
                        self.visit_instruction(line);
                    }
                }
                ElementKind::Jump => {
                    for line in &element.text {
                        if JumpKind::classify(line, self.markers).is_return() {
                            self.info.returns = true;
                        }
                    }
                }
                ElementKind::For(for_loop) => {
                    let counter = if for_loop.counter.trim().is_empty() {
                        element
                            .text
                            .first()
                            .map(|line| ForLoop::from_text(line, self.markers).counter)
                            .unwrap_or_default()
                    } else {
                        for_loop.counter.clone()
                    };
                    self.info.add_variable(&counter);
                }
                _ => {}
            }
            for child in element.children() {
                self.visit_block(child);
            }
        }
    }

    fn visit_instruction(&mut self, line: &str) {
        if let Some(rest) = strip_keyword(line, &self.markers.input) {
            for target in split_expression_list(rest, ",") {
                self.info.add_variable(&base_name(&target));
            }
            return;
        }

        let interm = to_intermediate(line, self.markers);
        if let Some((target, _)) = interm.split_once(" <- ") {
            let target = base_name(target);
            if target == self.method_name {
                self.info.function_name_set = true;
            }
            if target.eq_ignore_ascii_case("result") {
                self.info.result_set = true;
            }
            self.info.add_variable(&target);
        }
    }
}

/// Leading identifier of an assignment target (`a[i]` gives `a`)
fn base_name(target: &str) -> String {
    target
        .trim()
        .chars()
        .take_while(|&c| is_identifier_char(c))
        .collect()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(is_identifier_char)
}
