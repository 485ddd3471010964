//! Pretty error reporting using ariadne
//!
//! Provides colorful, user-friendly error messages with source context.

use ariadne::{Color, Label, Report, ReportKind, Source};
use crate::errors::NsdError;

fn describe(error: &NsdError) -> (&'static str, String) {
    match error {
        NsdError::Json { message, .. } => ("Malformed diagram file", message.clone()),
        NsdError::InvalidDiagram { message, path } => {
            ("Invalid diagram", format!("{} (at {})", message, path))
        }
        NsdError::UnknownTarget(target) => ("Unknown target", target.clone()),
        NsdError::Config { message } => ("Configuration error", message.clone()),
        NsdError::Io(e) => ("IO error", e.to_string()),
    }
}

fn build_report(error: &NsdError) -> Report<'static, std::ops::Range<usize>> {
    let (kind, message) = describe(error);
    let span_range = error.span().map(|s| s.start..s.end).unwrap_or(0..0);

    let mut report = Report::build(ReportKind::Error, span_range).with_message(kind);

    match error.span() {
        Some(s) => {
            report = report.with_label(
                Label::new(s.start..s.end)
                    .with_message(message)
                    .with_color(Color::Red),
            );
        }
        None => {
            report = report.with_note(message);
        }
    }

    report.finish()
}

/// Print an error with source context
pub fn print_error(source: &str, filename: &str, error: &NsdError) {
    if let NsdError::Io(e) = error {
        eprintln!("Error reading '{}': {}", filename, e);
        return;
    }

    if let Err(e) = build_report(error).eprint(Source::from(source)) {
        eprintln!("{}: {} ({})", filename, error, e);
    }
}

/// Format an error as a string (for testing)
pub fn format_error(source: &str, error: &NsdError) -> String {
    let mut output = Vec::new();
    if build_report(error)
        .write(Source::from(source), &mut output)
        .is_err()
    {
        return error.to_string();
    }
    String::from_utf8_lossy(&output).into_owned()
}

/// Get the line and column for a byte offset (both 1-based)
pub fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Get the byte offset of a 1-based line and column, clamped to the source
pub fn line_col_to_offset(source: &str, line: usize, col: usize) -> usize {
    let mut current_line = 1;
    let mut line_start = 0;

    for (i, c) in source.char_indices() {
        if current_line == line {
            break;
        }
        if c == '\n' {
            current_line += 1;
            line_start = i + 1;
        }
    }

    if current_line < line {
        return source.len();
    }

    let line_text = &source[line_start..];
    let line_len = line_text.find('\n').unwrap_or(line_text.len());
    line_start + col.saturating_sub(1).min(line_len)
}
