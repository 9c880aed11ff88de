//! Error taxonomy for parsing and executing intents.

use std::path::PathBuf;

use crate::core::intent::Command;

/// Coarse classification used in reports and the batch summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedIntent,
    OutOfRange,
    TypeMismatch,
    SourceUnavailable,
    PersistFailed,
}

/// Intent line could not be turned into an `Intent`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("intent line format invalid or unsupported: {0}")]
    Malformed(String),

    #[error("invalid replacement list in `{line}`: {reason}")]
    ListLiteral { line: String, reason: String },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedIntent
    }

    /// The offending intent text
    pub fn line(&self) -> &str {
        match self {
            ParseError::Malformed(line) => line,
            ParseError::ListLiteral { line, .. } => line,
        }
    }
}

/// Intent could not be applied to its target
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error(
        "line range {range} out of bounds for {command} in {} ({len} lines)",
        file.display()
    )]
    OutOfRange {
        file: PathBuf,
        command: Command,
        range: String,
        len: usize,
    },

    #[error("payload for {command} in {} must be {expected}", file.display())]
    TypeMismatch {
        file: PathBuf,
        command: Command,
        expected: &'static str,
    },

    #[error("cannot read {}: {source}", file.display())]
    SourceUnavailable {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", file.display())]
    Persist {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecError::OutOfRange { .. } => ErrorKind::OutOfRange,
            ExecError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ExecError::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            ExecError::Persist { .. } => ErrorKind::PersistFailed,
        }
    }
}
