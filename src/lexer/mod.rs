//! Lexer module for nsdgen
//!
//! Hand-written lexical splitter for the loosely typed diagram notation.

pub mod highlight;
mod scanner;
mod token;

pub use highlight::{classify, classify_lexeme, LexemeClass};
pub use scanner::{split_lexically, Lexer};
pub use token::{is_blank, is_identifier_char, is_literal, SPECIAL_SIGNS};
