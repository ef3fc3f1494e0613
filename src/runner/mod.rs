//! Run orchestration
//!
//! A run moves through discovery (resolve the configured pattern, extract
//! actions per document), execution (dispatch each action to its executor,
//! strictly sequential and in document order), and reporting (stream every
//! outcome to the active formatter, then ask it for the summary). Fatal
//! errors before execution abort the run; a failing action does not — all
//! actions are executed so the report covers the whole document set.

pub mod executors;

use std::time::{Duration, Instant};

use crate::common::{Configuration, Error, Result};
use crate::document::{self, ActionDescriptor};
use crate::formatters::{Formatter, Summary};

use executors::{ActionContext, Execution, ExecutorRegistry};

/// Result status of one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Passed,
    Failed,
    Skipped,
}

/// Diagnostics captured from a failed action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeError {
    pub message: String,
    pub detail: Option<String>,
}

/// The recorded result of executing one action. Produced exactly once per
/// descriptor, in document order.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub descriptor: ActionDescriptor,
    pub status: OutcomeStatus,
    pub error: Option<OutcomeError>,
    pub duration: Duration,
}

/// What a finished run reports back to the caller
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub summary: Summary,
}

/// The composition root: drives one run end to end.
pub struct ActionRunner {
    config: Configuration,
    executors: ExecutorRegistry,
    formatter: Box<dyn Formatter>,
}

impl ActionRunner {
    /// Runner with the built-in executor set.
    pub fn new(config: Configuration, formatter: Box<dyn Formatter>) -> Self {
        Self {
            config,
            executors: ExecutorRegistry::new(),
            formatter,
        }
    }

    /// Register an extension executor for an action type.
    pub fn register_executor(
        &mut self,
        action_type: &str,
        executor: Box<dyn executors::ActionExecutor>,
    ) {
        self.executors.register(action_type, executor);
    }

    /// Execute all discovered actions and report through the formatter.
    pub async fn run(&mut self) -> Result<RunReport> {
        let actions = self.discover()?;
        tracing::info!(count = actions.len(), "executing actions");

        for descriptor in actions {
            let outcome = self.execute(descriptor).await;
            self.formatter.consume(&outcome);
        }

        let summary = self.formatter.finish();
        Ok(RunReport { summary })
    }

    /// Resolve documents and extract their actions, in document order.
    fn discover(&self) -> Result<Vec<ActionDescriptor>> {
        let documents = document::discover(&self.config.files)?;
        tracing::debug!(count = documents.len(), "discovered documents");

        let mut actions = Vec::new();
        for path in documents {
            let text =
                std::fs::read_to_string(&path).map_err(|e| Error::document_read(&path, &e))?;
            actions.extend(document::extract(&path, &text)?);
        }
        Ok(actions)
    }

    /// Dispatch one action. Never fails: action-level errors are captured
    /// into the outcome so the run continues.
    async fn execute(&self, descriptor: ActionDescriptor) -> ActionOutcome {
        let context = ActionContext::new(&descriptor, self.config.offline);
        let started = Instant::now();

        let result = match self.executors.get(&descriptor.action_type) {
            Some(executor) => executor.execute(&context).await,
            None => Err(Error::UnknownActionType(descriptor.action_type.clone())),
        };
        let duration = started.elapsed();

        let (status, error) = match result {
            Ok(Execution::Passed) => (OutcomeStatus::Passed, None),
            Ok(Execution::Skipped(reason)) => {
                tracing::debug!(action = %descriptor.action_type, reason, "action skipped");
                (OutcomeStatus::Skipped, None)
            }
            Err(Error::ActionAssertion { message, detail }) => {
                (OutcomeStatus::Failed, Some(OutcomeError { message, detail }))
            }
            Err(e) => (
                OutcomeStatus::Failed,
                Some(OutcomeError {
                    message: e.to_string(),
                    detail: None,
                }),
            ),
        };

        ActionOutcome {
            descriptor,
            status,
            error,
            duration,
        }
    }
}
