//! docrun - runs the example code embedded in your documentation
//!
//! Scans Markdown documents for embedded action directives, executes each
//! action against the live environment, and reports the results through a
//! pluggable formatter.

pub mod cli;
pub mod common;
pub mod document;
pub mod formatters;
pub mod runner;

// Re-export commonly used types for tests
pub use common::{Configuration, Error, Result};
pub use runner::{ActionOutcome, ActionRunner, OutcomeStatus};
