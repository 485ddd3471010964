//! Control-flow marker configuration
//!
//! The diagram notation is user-customizable: the keywords that decorate
//! branch and loop texts are configured here rather than hard-wired.

use serde::Deserialize;

use crate::lexer::is_identifier_char;

/// Where a marker sits within its line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPosition {
    /// Leads the line (e.g. `while`)
    Prefix,
    /// Trails the line (e.g. `do`)
    Postfix,
}

/// Keyword strings recognized in diagram texts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub pre_alt: String,
    pub post_alt: String,
    pub pre_case: String,
    pub post_case: String,
    pub pre_for: String,
    pub post_for: String,
    pub step_for: String,
    pub pre_while: String,
    pub post_while: String,
    pub pre_repeat: String,
    pub post_repeat: String,
    pub pre_leave: String,
    pub pre_return: String,
    pub pre_exit: String,
    pub input: String,
    pub output: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            pre_alt: String::new(),
            post_alt: String::new(),
            pre_case: String::new(),
            post_case: String::new(),
            pre_for: "for".to_string(),
            post_for: "to".to_string(),
            step_for: "by".to_string(),
            pre_while: "while".to_string(),
            post_while: String::new(),
            pre_repeat: "until".to_string(),
            post_repeat: String::new(),
            pre_leave: "leave".to_string(),
            pre_return: "return".to_string(),
            pre_exit: "exit".to_string(),
            input: "INPUT".to_string(),
            output: "OUTPUT".to_string(),
        }
    }
}

impl MarkerConfig {
    /// Markers wiped off every line before operator unification, longest first.
    ///
    /// Counting-loop markers are not included: `For` elements carry their
    /// facets separately.
    pub fn redundant_markers(&self) -> Vec<(&str, MarkerPosition)> {
        let mut markers: Vec<(&str, MarkerPosition)> = [
            (self.pre_alt.as_str(), MarkerPosition::Prefix),
            (self.pre_case.as_str(), MarkerPosition::Prefix),
            (self.pre_while.as_str(), MarkerPosition::Prefix),
            (self.pre_repeat.as_str(), MarkerPosition::Prefix),
            (self.post_alt.as_str(), MarkerPosition::Postfix),
            (self.post_case.as_str(), MarkerPosition::Postfix),
            (self.post_while.as_str(), MarkerPosition::Postfix),
            (self.post_repeat.as_str(), MarkerPosition::Postfix),
        ]
        .into_iter()
        .filter(|(marker, _)| !marker.is_empty())
        .collect();
        markers.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        markers
    }

    /// Input and output keywords, trimmed
    pub fn io_markers(&self) -> [&str; 2] {
        [self.input.trim(), self.output.trim()]
    }
}

/// Remainder of `line` after a leading `keyword`.
///
/// The line is trimmed first; the keyword must not run on into an
/// identifier, so `INPUT` does not match `INPUTS`.
pub fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return None;
    }
    let rest = line.trim().strip_prefix(keyword)?;
    match rest.chars().next() {
        Some(c) if is_identifier_char(c) => None,
        _ => Some(rest),
    }
}
