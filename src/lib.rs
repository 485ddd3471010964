//! nsdgen - Structured-diagram to source code generator
//!
//! This crate turns structured diagrams (nested sequence, branch, loop,
//! parallel, call and jump blocks with free-form text) into source code for
//! several target notations, through one backend-independent intermediate
//! language.

pub mod analysis;
pub mod codegen;
pub mod config;
pub mod diagram;
pub mod errors;
pub mod intermediate;
pub mod lexer;

// Re-export commonly used types
pub use analysis::{analyze, JumpKind, RoutineInfo, Validator};
pub use codegen::{generator_for, Bash, CodeGenerator, Generator, Oberon, Target};
pub use config::{ExportOptions, GeneratorConfig};
pub use diagram::{load_diagram, Block, Element, ElementKind, ForLoop, Root};
pub use errors::{NsdError, NsdResult, SourceSpan};
pub use intermediate::{split_expression_list, to_intermediate, unify_operators, MarkerConfig};
pub use lexer::split_lexically;
