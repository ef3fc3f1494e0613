//! Compact progress formatter: one character per outcome

use std::io::Write;

use colored::Colorize;

use crate::runner::{ActionOutcome, OutcomeStatus};

use super::{render_summary, Formatter, Summary, Tally};

pub struct Dot {
    tally: Tally,
}

impl Dot {
    pub fn new() -> Self {
        Self {
            tally: Tally::new(),
        }
    }
}

impl Default for Dot {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for Dot {
    fn consume(&mut self, outcome: &ActionOutcome) {
        self.tally.record(outcome.status);

        match outcome.status {
            OutcomeStatus::Passed => print!("."),
            OutcomeStatus::Failed => print!("{}", "F".red()),
            OutcomeStatus::Skipped => print!("{}", "S".yellow()),
        }
        // Progress must show up action by action
        let _ = std::io::stdout().flush();
    }

    fn finish(&mut self) -> Summary {
        let summary = self.tally.summary();
        println!("\n\n{}", render_summary(&summary));
        summary
    }
}
