//! Default formatter: one line per outcome

use colored::Colorize;

use crate::runner::{ActionOutcome, OutcomeStatus};

use super::{render_summary, Formatter, Summary, Tally};

pub struct Detailed {
    tally: Tally,
}

impl Detailed {
    pub fn new() -> Self {
        Self {
            tally: Tally::new(),
        }
    }
}

impl Default for Detailed {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for Detailed {
    fn consume(&mut self, outcome: &ActionOutcome) {
        self.tally.record(outcome.status);

        let location = outcome.descriptor.location.to_string();
        let action = &outcome.descriptor.action_type;

        match outcome.status {
            OutcomeStatus::Passed => {
                println!("{} {} {}", "✓".green(), location.dimmed(), action);
            }
            OutcomeStatus::Failed => {
                println!("{} {} {}", "✗".red(), location, action.red());
                if let Some(error) = &outcome.error {
                    println!("    {}", error.message.red());
                    if let Some(detail) = &error.detail {
                        for line in detail.lines() {
                            println!("    {}", line.dimmed());
                        }
                    }
                }
            }
            OutcomeStatus::Skipped => {
                println!(
                    "{} {} {} {}",
                    "-".yellow(),
                    location.dimmed(),
                    action,
                    "(skipped)".yellow()
                );
            }
        }
    }

    fn finish(&mut self) -> Summary {
        let summary = self.tally.summary();
        println!("\n{}", render_summary(&summary));
        summary
    }
}
