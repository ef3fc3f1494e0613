//! Document discovery and action extraction
//!
//! Documents are plain Markdown files carrying embedded action directives.
//! Discovery turns the configured glob or path into an ordered document
//! list; extraction turns each document into its ordered actions.

mod discover;
mod parse;

pub use discover::discover;
pub use parse::extract;

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Where an action was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: PathBuf,
    /// 1-based line of the directive
    pub line: u32,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// One directive extracted from a document. Ordering is significant:
/// execution order == document order == report order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    /// Action type tag, e.g. "run-command"
    pub action_type: String,

    pub location: Location,

    /// Typed parameters; a trailing fenced block lands under "content"
    pub parameters: BTreeMap<String, String>,
}
