//! Intent model: one structured, line-addressed edit request.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Edit command (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Modify,
    Insert,
    Delete,
    Append,
    Replace,
}

impl Command {
    /// Insert and Delete move every line below their own position.
    pub fn is_shifting(self) -> bool {
        matches!(self, Command::Insert | Command::Delete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Modify => "modify",
            Command::Insert => "insert",
            Command::Delete => "delete",
            Command::Append => "append",
            Command::Replace => "replace",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replacement content carried by an intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Modify / Insert / Append
    Line(String),
    /// Replace
    Lines(Vec<String>),
    /// Replace whose list literal holds something other than strings
    Values(Vec<Literal>),
}

/// One element of a replacement list literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Str(String),
    /// Numeric literal, kept as written
    Number(String),
    Bool(bool),
    None,
    List(Vec<Literal>),
}

impl Literal {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A parsed edit request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Intent {
    pub command: Command,
    pub target: PathBuf,
    pub line_start: Option<usize>, // 1-based; None for Append
    pub line_end: Option<usize>,   // 1-based inclusive; Delete/Replace only
    pub payload: Option<Payload>,  // None for Delete
}

impl Intent {
    pub fn modify(target: impl Into<PathBuf>, line: usize, text: impl Into<String>) -> Self {
        Self {
            command: Command::Modify,
            target: target.into(),
            line_start: Some(line),
            line_end: None,
            payload: Some(Payload::Line(text.into())),
        }
    }

    pub fn insert(target: impl Into<PathBuf>, line: usize, text: impl Into<String>) -> Self {
        Self {
            command: Command::Insert,
            target: target.into(),
            line_start: Some(line),
            line_end: None,
            payload: Some(Payload::Line(text.into())),
        }
    }

    pub fn delete(target: impl Into<PathBuf>, start: usize, end: usize) -> Self {
        Self {
            command: Command::Delete,
            target: target.into(),
            line_start: Some(start),
            line_end: Some(end),
            payload: None,
        }
    }

    pub fn append(target: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            command: Command::Append,
            target: target.into(),
            line_start: None,
            line_end: None,
            payload: Some(Payload::Line(text.into())),
        }
    }

    pub fn replace(target: impl Into<PathBuf>, start: usize, end: usize, lines: Vec<String>) -> Self {
        Self {
            command: Command::Replace,
            target: target.into(),
            line_start: Some(start),
            line_end: Some(end),
            payload: Some(Payload::Lines(lines)),
        }
    }

    /// Human-readable range, e.g. `3`, `4-6`, or `end` for Append.
    pub fn range_label(&self) -> String {
        match (self.line_start, self.line_end) {
            (Some(s), Some(e)) => format!("{s}-{e}"),
            (Some(s), None) => s.to_string(),
            _ => "end".to_string(),
        }
    }
}

/// An intent plus its 1-based line in the intent source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcedIntent {
    pub line_no: usize,
    #[serde(flatten)]
    pub intent: Intent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifting_classes() {
        assert!(Command::Insert.is_shifting());
        assert!(Command::Delete.is_shifting());
        assert!(!Command::Modify.is_shifting());
        assert!(!Command::Append.is_shifting());
        assert!(!Command::Replace.is_shifting());
    }

    #[test]
    fn range_labels() {
        assert_eq!(Intent::modify("a", 3, "x").range_label(), "3");
        assert_eq!(Intent::delete("a", 4, 6).range_label(), "4-6");
        assert_eq!(Intent::append("a", "x").range_label(), "end");
    }
}
