use std::{fmt::Display, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Run log not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Run log {} is empty, expected at least a header line", .0.display())]
    EmptyLog(PathBuf),

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: MalformedReason },

    #[error("Failed to read run log {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write report {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("Invalid column schema: {0}")]
    InvalidSchema(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MalformedReason {
    FieldCount { expected: usize, found: usize },
    NotNumeric { column: usize, value: String },
}

impl Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::FieldCount { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            MalformedReason::NotNumeric { column, value } => {
                write!(f, "field {column} is not a finite number: {value:?}")
            }
        }
    }
}

impl ReportError {
    /// The 1-based log line of a malformed record, if this is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ReportError::MalformedRecord { line, .. } => Some(*line),
            _ => None,
        }
    }
}
