//! Error handling for nsdgen
//!
//! Loading and validation failures carry a byte span into the diagram file
//! where one is known, so they can be reported with source context.

mod diagnostic;

use std::ops::Range;
use thiserror::Error;

pub use diagnostic::{format_error, line_col_to_offset, offset_to_line_col, print_error};

/// A span in the source code, represented as a byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl SourceSpan {
    /// Create a new source span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A span covering exactly one byte
    pub fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset + 1,
        }
    }

    /// Get the length of this span
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl From<Range<usize>> for SourceSpan {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<SourceSpan> for Range<usize> {
    fn from(span: SourceSpan) -> Self {
        span.start..span.end
    }
}

/// The main error type for nsdgen operations
#[derive(Error, Debug)]
pub enum NsdError {
    #[error("JSON error: {message}")]
    Json {
        message: String,
        span: Option<SourceSpan>,
    },

    #[error("Invalid diagram at {path}: {message}")]
    InvalidDiagram { message: String, path: String },

    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NsdError {
    /// Get the source span associated with this error, if any
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            NsdError::Json { span, .. } => *span,
            _ => None,
        }
    }

    /// Create an error for a structurally invalid diagram
    pub fn invalid_diagram(message: impl Into<String>, path: impl Into<String>) -> Self {
        NsdError::InvalidDiagram {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        NsdError::Config {
            message: message.into(),
        }
    }

    /// Convert a `serde_json` error, locating it inside `source`
    pub fn from_json(error: &serde_json::Error, source: &str) -> Self {
        let span = if error.line() == 0 {
            None
        } else {
            let offset = line_col_to_offset(source, error.line(), error.column());
            Some(SourceSpan::point(offset.min(source.len().saturating_sub(1))))
        };
        NsdError::Json {
            message: error.to_string(),
            span,
        }
    }
}

/// Result type alias for nsdgen operations
pub type NsdResult<T> = Result<T, NsdError>;
