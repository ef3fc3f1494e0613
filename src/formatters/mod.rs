//! Formatter registry and outcome-consumption contract
//!
//! A formatter is a named rendering strategy for the stream of action
//! outcomes one run produces. The registry is populated once at process
//! start with the built-in set and is read-only afterwards; each lookup
//! hands out a fresh instance so runs never share formatter state.

mod detailed;
mod dot;

pub use detailed::Detailed;
pub use dot::Dot;

use std::time::{Duration, Instant};

use crate::common::{Error, Result};
use crate::runner::{ActionOutcome, OutcomeStatus};

/// Aggregate result of one run, produced by the formatter's `finish`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration: Duration,
}

impl Summary {
    /// A run succeeds iff nothing failed; skipped outcomes do not count
    /// against it.
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

/// Outcome-consumption contract every formatter implements.
///
/// `consume` is called once per action, in report order; `finish` is
/// called exactly once after the last outcome.
pub trait Formatter: Send {
    fn consume(&mut self, outcome: &ActionOutcome);
    fn finish(&mut self) -> Summary;
}

/// Shared bookkeeping for the built-in formatters.
#[derive(Debug)]
pub(crate) struct Tally {
    passed: usize,
    failed: usize,
    skipped: usize,
    started: Instant,
}

impl Tally {
    pub(crate) fn new() -> Self {
        Self {
            passed: 0,
            failed: 0,
            skipped: 0,
            started: Instant::now(),
        }
    }

    pub(crate) fn record(&mut self, status: OutcomeStatus) {
        match status {
            OutcomeStatus::Passed => self.passed += 1,
            OutcomeStatus::Failed => self.failed += 1,
            OutcomeStatus::Skipped => self.skipped += 1,
        }
    }

    pub(crate) fn summary(&self) -> Summary {
        Summary {
            passed: self.passed,
            failed: self.failed,
            skipped: self.skipped,
            duration: self.started.elapsed(),
        }
    }
}

/// Render the trailing summary line both built-ins print.
pub(crate) fn render_summary(summary: &Summary) -> String {
    use colored::Colorize;

    let mut parts = vec![format!("{} passed", summary.passed).green().to_string()];
    if summary.failed > 0 {
        parts.push(format!("{} failed", summary.failed).red().to_string());
    }
    if summary.skipped > 0 {
        parts.push(format!("{} skipped", summary.skipped).yellow().to_string());
    }
    format!(
        "{} ({:.1}s)",
        parts.join(", "),
        summary.duration.as_secs_f64()
    )
}

type FormatterFactory = fn() -> Box<dyn Formatter>;

/// Named formatter lookup. Names are matched exactly and case-sensitively.
pub struct FormatterRegistry {
    entries: Vec<(String, FormatterFactory)>,
}

impl FormatterRegistry {
    /// Registry holding the built-in set.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::new(),
        };
        registry.register("detailed", || Box::new(Detailed::new()));
        registry.register("dot", || Box::new(Dot::new()));
        registry
    }

    /// Extension point for additional formatters. Later registrations of
    /// the same name shadow earlier ones.
    pub fn register(&mut self, name: &str, factory: FormatterFactory) {
        self.entries.retain(|(n, _)| n != name);
        self.entries.push((name.to_string(), factory));
    }

    /// Names in registration order. Stable across calls.
    pub fn available_formatter_names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Look up a formatter by name, handing out a fresh instance.
    pub fn get_formatter(&self, name: &str) -> Result<Box<dyn Formatter>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, factory)| factory())
            .ok_or_else(|| Error::unknown_formatter(name, &self.available_formatter_names()))
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
