//! Error types for schema compilation

use crate::model::Representation;
use std::fmt;
use thiserror::Error;

/// Result type alias for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A file and 1-based line number inside a schema document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// The namespace a duplicated name collided in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Message,
    Field,
    Interface,
    Address,
    Domain,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Message => write!(f, "message"),
            NameKind::Field => write!(f, "field"),
            NameKind::Interface => write!(f, "interface"),
            NameKind::Address => write!(f, "address"),
            NameKind::Domain => write!(f, "domain"),
        }
    }
}

/// Error type for schema compilation.
///
/// Every variant is fatal for the run: a single malformed line invalidates the
/// whole schema so the host and embedded trees never drift apart.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Malformed declaration or marker
    #[error("{location}: syntax error: {message}")]
    Syntax {
        location: SourceLocation,
        message: String,
    },

    /// Message, field, interface or address name collision
    #[error("{location}: duplicate {kind} name '{name}' (first declared at {first})")]
    DuplicateName {
        location: SourceLocation,
        kind: NameKind,
        name: String,
        first: SourceLocation,
    },

    /// Region or index does not fit its 8-bit slot
    #[error("{location}: address overflow: {part} {value} does not fit in 8 bits")]
    AddressOverflow {
        location: SourceLocation,
        part: &'static str,
        value: usize,
    },

    /// A wire-carrying message has no (or several) dispatcher entries
    #[error(
        "dispatch table for {representation} has {entries} entries for message '{name}' (id {type_id}), expected exactly one"
    )]
    Dispatch {
        representation: Representation,
        name: String,
        type_id: u32,
        entries: usize,
    },

    /// Schema or template file could not be read
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SchemaError {
    /// Create a syntax error at the given location.
    pub fn syntax(location: SourceLocation, message: impl Into<String>) -> Self {
        SchemaError::Syntax {
            location,
            message: message.into(),
        }
    }

    /// Returns an error code suitable for a process exit status
    pub fn error_code(&self) -> u8 {
        match self {
            SchemaError::Syntax { .. } => 2,
            SchemaError::DuplicateName { .. } => 3,
            SchemaError::AddressOverflow { .. } => 4,
            SchemaError::Dispatch { .. } => 5,
            SchemaError::Io { .. } => 6,
            SchemaError::Config(_) => 7,
        }
    }

    /// The schema line the error points at, if any.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            SchemaError::Syntax { location, .. }
            | SchemaError::DuplicateName { location, .. }
            | SchemaError::AddressOverflow { location, .. } => Some(location),
            _ => None,
        }
    }
}

/// Errors loading or validating `msggen.toml`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
