use crate::core::models::coordinates::RaggedCoordinatesError;
use crate::core::models::topology::TopologyError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },
    #[error("Missing required section: {0}")]
    MissingSection(String),
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Invalid topology: {0}")]
    Topology(#[from] TopologyError),
    #[error("Invalid coordinates: {0}")]
    Coordinates(#[from] RaggedCoordinatesError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("Invalid integer value '{0}'")]
    InvalidInt(String),
    #[error("Invalid float value '{0}'")]
    InvalidFloat(String),
    #[error("Unsupported %FORMAT specification '{0}'")]
    InvalidFormat(String),
    #[error("Data line appears before any %FLAG/%FORMAT header")]
    DataOutsideSection,
    #[error("Expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("Line contains non-ASCII characters in a fixed-width record")]
    NonAscii,
}

impl FormatError {
    pub(crate) fn parse(line: usize, kind: ParseErrorKind) -> Self {
        Self::Parse { line, kind }
    }
}
