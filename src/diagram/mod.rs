//! Structured diagrams
//!
//! The element tree consumed by the generators and its JSON form.

mod ast;
mod loader;

pub use ast::{Block, DisplayMode, Element, ElementKind, ForLoop, Parameter, Root};
pub use loader::load_diagram;
