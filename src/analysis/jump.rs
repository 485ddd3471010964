//! Jump statement classification

use crate::intermediate::{strip_keyword, MarkerConfig};

/// What a `Jump` line does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JumpKind {
    /// Leave this many enclosing loops (at least 1)
    Leave(usize),
    /// Return from the routine, with an optional value expression
    Return(String),
    /// Terminate the process, with an optional status expression
    Exit(String),
    /// No recognized keyword: emitted as an ordinary statement
    Plain(String),
}

impl JumpKind {
    /// Classify `line` against the configured leave/return/exit keywords
    pub fn classify(line: &str, markers: &MarkerConfig) -> Self {
        let line = line.trim();

        if let Some(rest) = strip_keyword(line, &markers.pre_leave) {
            return JumpKind::Leave(leave_levels(rest));
        }
        if let Some(rest) = strip_keyword(line, &markers.pre_return) {
            return JumpKind::Return(rest.trim().to_string());
        }
        if let Some(rest) = strip_keyword(line, &markers.pre_exit) {
            return JumpKind::Exit(rest.trim().to_string());
        }

        if !line.is_empty() {
            log::warn!("unrecognized jump statement {:?}, emitted as is", line);
        }
        JumpKind::Plain(line.to_string())
    }

    /// Number of loops a leave exits; 0 for the other kinds
    pub fn levels(&self) -> usize {
        match self {
            JumpKind::Leave(levels) => *levels,
            _ => 0,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, JumpKind::Return(_))
    }
}

fn leave_levels(rest: &str) -> usize {
    let rest = rest.trim();
    if rest.is_empty() {
        return 1;
    }
    match rest.parse::<usize>() {
        Ok(levels) => levels.max(1),
        Err(_) => {
            log::warn!("unparseable leave depth {:?}, leaving one loop", rest);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_keywords() {
        let markers = MarkerConfig::default();
        assert_eq!(JumpKind::classify("leave", &markers), JumpKind::Leave(1));
        assert_eq!(JumpKind::classify("leave 3", &markers), JumpKind::Leave(3));
        assert_eq!(
            JumpKind::classify("return x + 1", &markers),
            JumpKind::Return("x + 1".to_string())
        );
        assert_eq!(JumpKind::classify("exit", &markers), JumpKind::Exit(String::new()));
        assert_eq!(
            JumpKind::classify("exit(2)", &markers),
            JumpKind::Exit("(2)".to_string())
        );
    }

    #[test]
    fn test_keyword_must_be_whole_word() {
        let markers = MarkerConfig::default();
        assert_eq!(
            JumpKind::classify("returned <- 1", &markers),
            JumpKind::Plain("returned <- 1".to_string())
        );
        assert_eq!(
            JumpKind::classify("leaves", &markers),
            JumpKind::Plain("leaves".to_string())
        );
    }

    #[test]
    fn test_leave_depth_recovery() {
        let markers = MarkerConfig::default();
        assert_eq!(JumpKind::classify("leave 0", &markers), JumpKind::Leave(1));
        assert_eq!(JumpKind::classify("leave all", &markers), JumpKind::Leave(1));
        assert_eq!(JumpKind::classify("leave 2", &markers).levels(), 2);
    }

    #[test]
    fn test_custom_keywords() {
        let markers = MarkerConfig {
            pre_leave: "break".to_string(),
            pre_return: "result".to_string(),
            ..MarkerConfig::default()
        };
        assert_eq!(JumpKind::classify("break", &markers), JumpKind::Leave(1));
        assert!(JumpKind::classify("result 4", &markers).is_return());
        assert_eq!(
            JumpKind::classify("leave", &markers),
            JumpKind::Plain("leave".to_string())
        );
    }
}
