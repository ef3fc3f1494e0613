//! Error types for the documentation runner
//!
//! Every user-visible failure renders as plain text suitable for a terminal.
//! Errors that abort a run before any action executes (configuration,
//! formatter lookup, discovery) live here alongside the per-action errors
//! that get captured into outcomes instead of propagating.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the documentation runner
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Configuration file not found: '{path}'")]
    ConfigurationNotFound { path: String },

    #[error("Cannot parse configuration file '{path}': {message}")]
    ConfigurationParse { path: String, message: String },

    // === Formatter Errors ===
    // The message layout is part of the CLI contract and is matched
    // verbatim by the tests.
    #[error("Unknown formatter: '{name}'\n\nAvailable formatters are {available}")]
    UnknownFormatter { name: String, available: String },

    // === Discovery Errors ===
    #[error("No documents found matching '{0}'")]
    Discovery(String),

    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Cannot read document '{path}': {message}")]
    DocumentRead { path: String, message: String },

    #[error("Malformed action directive in '{file}' line {line}: {message}")]
    MalformedDirective {
        file: String,
        line: u32,
        message: String,
    },

    // === Action Errors (captured into outcomes, not fatal) ===
    #[error("Unknown action type: '{0}'")]
    UnknownActionType(String),

    #[error("{message}")]
    ActionAssertion {
        message: String,
        detail: Option<String>,
    },

    #[error("Action failed: {0}")]
    ActionExecution(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a formatter lookup error listing the valid names
    pub fn unknown_formatter<S: AsRef<str>>(name: &str, available: &[S]) -> Self {
        Self::UnknownFormatter {
            name: name.to_string(),
            available: available
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create an assertion failure without extra diagnostics
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::ActionAssertion {
            message: message.into(),
            detail: None,
        }
    }

    /// Create an assertion failure carrying captured output or similar detail
    pub fn assertion_with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ActionAssertion {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }

    /// Create a document read error
    pub fn document_read(path: &std::path::Path, error: &io::Error) -> Self {
        Self::DocumentRead {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }
}
