//! Structural validation pass
//!
//! Checks the contract a diagram builder must honor before generation
//! starts. Violations are fatal; suspicious but recoverable shapes are
//! only logged.

use crate::diagram::{Block, Element, ElementKind, Root};
use crate::errors::{NsdError, NsdResult};
use crate::intermediate::MarkerConfig;

use super::jump::JumpKind;

/// Structural validator
pub struct Validator {
    markers: MarkerConfig,
    /// Current loop nesting depth
    loop_depth: usize,
    /// Path segments of the element being visited
    path: Vec<String>,
    /// Collected errors
    errors: Vec<NsdError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::with_markers(&MarkerConfig::default())
    }

    /// Validator recognizing leave statements by the given markers
    pub fn with_markers(markers: &MarkerConfig) -> Self {
        Self {
            markers: markers.clone(),
            loop_depth: 0,
            path: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Validate the tree below `root`
    pub fn validate(mut self, root: &Root) -> NsdResult<()> {
        self.validate_block(&root.children, "children");

        if !self.errors.is_empty() {
            return Err(self.errors.remove(0));
        }

        Ok(())
    }

    fn error(&mut self, message: impl Into<String>, field: &str) {
        let path = format!("{}.{}", self.path.join(""), field);
        self.errors.push(NsdError::invalid_diagram(message, path));
    }

    fn validate_block(&mut self, block: &Block, field: &str) {
        for (i, element) in block.iter().enumerate() {
            let segment = if self.path.is_empty() {
                format!("{}[{}]", field, i)
            } else {
                format!(".{}[{}]", field, i)
            };
            self.path.push(segment);
            self.validate_element(element);
            self.path.pop();
        }
    }

    fn validate_element(&mut self, element: &Element) {
        match &element.kind {
            ElementKind::Case { branches } => {
                if branches.is_empty() {
                    self.error("case without branches", "branches");
                } else if element.labels().len() != branches.len() {
                    self.error(
                        format!(
                            "case has {} branches but {} label lines",
                            branches.len(),
                            element.labels().len()
                        ),
                        "branches",
                    );
                }
                for (i, branch) in branches.iter().enumerate() {
                    self.validate_block(branch, &format!("branches[{}]", i));
                }
            }
            ElementKind::Alternative {
                then_block,
                else_block,
            } => {
                self.validate_block(then_block, "then_block");
                self.validate_block(else_block, "else_block");
            }
            ElementKind::For(for_loop) => {
                self.loop_depth += 1;
                self.validate_block(&for_loop.body, "body");
                self.loop_depth -= 1;
            }
            ElementKind::While { body }
            | ElementKind::Repeat { body }
            | ElementKind::Forever { body } => {
                self.loop_depth += 1;
                self.validate_block(body, "body");
                self.loop_depth -= 1;
            }
            ElementKind::Parallel { threads } => {
                // A thread cannot leave loops outside of it
                let outer_depth = std::mem::replace(&mut self.loop_depth, 0);
                for (i, thread) in threads.iter().enumerate() {
                    self.validate_block(thread, &format!("threads[{}]", i));
                }
                self.loop_depth = outer_depth;
            }
            ElementKind::Jump => {
                for line in &element.text {
                    let levels = JumpKind::classify(line, &self.markers).levels();
                    if levels > self.loop_depth {
                        log::warn!(
                            "{}: leaving {} loops but only {} enclose it",
                            self.path.join(""),
                            levels,
                            self.loop_depth
                        );
                    }
                }
            }
            ElementKind::Instruction | ElementKind::Call => {}
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
