//! Action executors
//!
//! Each action type maps to an executor implementing a uniform capability:
//! given the action's parameters and surroundings, either the documented
//! claim holds (`Passed`), the action is deliberately not run (`Skipped`),
//! or the mismatch is reported as an assertion error. The registry ships
//! with reference executors; extensions register their own types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command as TokioCommand;

use crate::common::{Error, Result};
use crate::document::ActionDescriptor;

/// Successful ways an action execution can end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Execution {
    Passed,
    /// Not run, with the reason (e.g. offline mode)
    Skipped(String),
}

/// Everything an executor may look at for one action
pub struct ActionContext<'a> {
    descriptor: &'a ActionDescriptor,
    /// Directory of the containing document; relative paths and commands
    /// resolve against it
    dir: PathBuf,
    offline: bool,
}

impl<'a> ActionContext<'a> {
    pub fn new(descriptor: &'a ActionDescriptor, offline: bool) -> Self {
        // parent() of a bare file name is Some(""), which is unusable as a
        // working directory
        let dir = descriptor
            .location
            .file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            descriptor,
            dir,
            offline,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn offline(&self) -> bool {
        self.offline
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.descriptor.parameters.get(name).map(String::as_str)
    }

    pub fn required_param(&self, name: &str) -> Result<&str> {
        self.param(name).ok_or_else(|| {
            Error::ActionExecution(format!(
                "'{}' action requires a '{}' parameter",
                self.descriptor.action_type, name
            ))
        })
    }
}

/// Uniform execution capability, keyed by action-type string.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, ctx: &ActionContext<'_>) -> Result<Execution>;
}

/// Maps action-type tags to their executors.
pub struct ExecutorRegistry {
    entries: BTreeMap<String, Box<dyn ActionExecutor>>,
}

impl ExecutorRegistry {
    /// Registry with the built-in executor set.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: BTreeMap::new(),
        };
        registry.register("run-command", Box::new(RunCommand));
        registry.register("verify-file", Box::new(VerifyFile));
        registry.register("check-url", Box::new(CheckUrl));
        registry
    }

    pub fn register(&mut self, action_type: &str, executor: Box<dyn ActionExecutor>) {
        self.entries.insert(action_type.to_string(), executor);
    }

    pub fn get(&self, action_type: &str) -> Option<&dyn ActionExecutor> {
        self.entries.get(action_type).map(Box::as_ref)
    }
}

impl Default for ExecutorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate(text: &str) -> String {
    // Cut on a char boundary; a byte index would panic on multi-byte output
    match text.char_indices().nth(200) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}

/// Runs the content block (or `command` parameter) through `sh -c` in the
/// document's directory. Asserts a zero exit status, and optionally that
/// stdout contains the `output` parameter.
struct RunCommand;

#[async_trait]
impl ActionExecutor for RunCommand {
    async fn execute(&self, ctx: &ActionContext<'_>) -> Result<Execution> {
        let command = ctx
            .param("content")
            .or_else(|| ctx.param("command"))
            .ok_or_else(|| {
                Error::ActionExecution(
                    "'run-command' action requires a code block or 'command' parameter"
                        .to_string(),
                )
            })?;

        let output = TokioCommand::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(ctx.dir())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::ActionExecution(format!("failed to run '{command}': {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            let message = match output.status.code() {
                Some(code) => format!("command exited with status {code}"),
                None => "command was terminated by a signal".to_string(),
            };
            return Err(Error::assertion_with_detail(message, truncate(&stderr)));
        }

        if let Some(expected) = ctx.param("output") {
            if !stdout.contains(expected) {
                return Err(Error::assertion_with_detail(
                    format!("output does not contain '{expected}'"),
                    truncate(&stdout),
                ));
            }
        }

        Ok(Execution::Passed)
    }
}

/// Reads the file named by the `file` parameter, relative to the document,
/// and asserts that it contains the content block (or `contains` parameter).
struct VerifyFile;

#[async_trait]
impl ActionExecutor for VerifyFile {
    async fn execute(&self, ctx: &ActionContext<'_>) -> Result<Execution> {
        let file = ctx.required_param("file")?;
        let expected = ctx
            .param("content")
            .or_else(|| ctx.param("contains"))
            .ok_or_else(|| {
                Error::ActionExecution(
                    "'verify-file' action requires a code block or 'contains' parameter"
                        .to_string(),
                )
            })?;

        let path = ctx.dir().join(file);
        let actual = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::assertion(format!("cannot read '{}': {e}", path.display())))?;

        if !actual.contains(expected) {
            return Err(Error::assertion_with_detail(
                format!("'{file}' does not contain the documented content"),
                truncate(&actual),
            ));
        }

        Ok(Execution::Passed)
    }
}

/// Issues a GET to the `url` parameter and asserts a success status.
/// Skipped in offline runs.
struct CheckUrl;

#[async_trait]
impl ActionExecutor for CheckUrl {
    async fn execute(&self, ctx: &ActionContext<'_>) -> Result<Execution> {
        let url = ctx.required_param("url")?;

        if ctx.offline() {
            return Ok(Execution::Skipped("offline run".to_string()));
        }

        let response = reqwest::get(url)
            .await
            .map_err(|e| Error::assertion(format!("GET {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::assertion(format!(
                "GET {url} returned {}",
                response.status()
            )));
        }

        Ok(Execution::Passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Location;

    fn descriptor(
        action_type: &str,
        params: &[(&str, &str)],
        file: &Path,
    ) -> ActionDescriptor {
        ActionDescriptor {
            action_type: action_type.to_string(),
            location: Location {
                file: file.to_path_buf(),
                line: 1,
            },
            parameters: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn registry_knows_the_builtins() {
        let registry = ExecutorRegistry::new();
        for ty in ["run-command", "verify-file", "check-url"] {
            assert!(registry.get(ty).is_some(), "missing builtin '{ty}'");
        }
        assert!(registry.get("click").is_none());
    }

    #[tokio::test]
    async fn run_command_passes_on_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.md");
        let desc = descriptor("run-command", &[("content", "true")], &doc);
        let ctx = ActionContext::new(&desc, false);

        let result = RunCommand.execute(&ctx).await.unwrap();
        assert_eq!(result, Execution::Passed);
    }

    #[tokio::test]
    async fn run_command_fails_on_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.md");
        let desc = descriptor("run-command", &[("content", "exit 3")], &doc);
        let ctx = ActionContext::new(&desc, false);

        let err = RunCommand.execute(&ctx).await.unwrap_err();
        match err {
            Error::ActionAssertion { message, .. } => {
                assert!(message.contains("status 3"), "got: {message}");
            }
            other => panic!("expected assertion error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn run_command_asserts_output_substring() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.md");
        let desc = descriptor(
            "run-command",
            &[("content", "echo hello world"), ("output", "hello")],
            &doc,
        );
        let ctx = ActionContext::new(&desc, false);
        assert_eq!(RunCommand.execute(&ctx).await.unwrap(), Execution::Passed);

        let desc = descriptor(
            "run-command",
            &[("content", "echo hello"), ("output", "goodbye")],
            &doc,
        );
        let ctx = ActionContext::new(&desc, false);
        assert!(RunCommand.execute(&ctx).await.is_err());
    }

    #[test]
    fn truncate_cuts_on_char_boundaries() {
        let ascii = "a".repeat(300);
        assert_eq!(truncate(&ascii), format!("{}...", "a".repeat(200)));

        // 3-byte chars put every 200th byte mid-character
        let wide = "€".repeat(201);
        let truncated = truncate(&wide);
        assert_eq!(truncated, format!("{}...", "€".repeat(200)));

        assert_eq!(truncate("short"), "short");
    }

    #[tokio::test]
    async fn multibyte_output_in_failure_detail_does_not_crash_the_action() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.md");
        let command = format!("echo {}", "€".repeat(250));
        let desc = descriptor(
            "run-command",
            &[("content", command.as_str()), ("output", "zzz")],
            &doc,
        );
        let ctx = ActionContext::new(&desc, false);

        let err = RunCommand.execute(&ctx).await.unwrap_err();
        match err {
            Error::ActionAssertion { detail, .. } => {
                let detail = detail.unwrap();
                assert!(detail.ends_with("..."), "got: {detail}");
            }
            other => panic!("expected assertion error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn bare_relative_document_path_resolves_to_the_current_directory() {
        let desc = descriptor("run-command", &[("content", "true")], Path::new("doc.md"));
        let ctx = ActionContext::new(&desc, false);
        assert_eq!(ctx.dir(), Path::new("."));

        let result = RunCommand.execute(&ctx).await.unwrap();
        assert_eq!(result, Execution::Passed);
    }

    #[tokio::test]
    async fn verify_file_matches_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("out.txt"), "alpha beta gamma\n").unwrap();
        let doc = dir.path().join("doc.md");

        let desc = descriptor(
            "verify-file",
            &[("file", "out.txt"), ("contains", "beta")],
            &doc,
        );
        let ctx = ActionContext::new(&desc, false);
        assert_eq!(VerifyFile.execute(&ctx).await.unwrap(), Execution::Passed);

        let desc = descriptor(
            "verify-file",
            &[("file", "out.txt"), ("contains", "delta")],
            &doc,
        );
        let ctx = ActionContext::new(&desc, false);
        assert!(VerifyFile.execute(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn verify_file_missing_file_is_an_assertion_failure() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.md");
        let desc = descriptor(
            "verify-file",
            &[("file", "nope.txt"), ("contains", "x")],
            &doc,
        );
        let ctx = ActionContext::new(&desc, false);

        assert!(matches!(
            VerifyFile.execute(&ctx).await.unwrap_err(),
            Error::ActionAssertion { .. }
        ));
    }

    #[tokio::test]
    async fn check_url_is_skipped_offline() {
        let doc = PathBuf::from("doc.md");
        let desc = descriptor("check-url", &[("url", "https://example.com")], &doc);
        let ctx = ActionContext::new(&desc, true);

        match CheckUrl.execute(&ctx).await.unwrap() {
            Execution::Skipped(reason) => assert_eq!(reason, "offline run"),
            other => panic!("expected skip, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_required_parameter_is_reported() {
        let doc = PathBuf::from("doc.md");
        let desc = descriptor("check-url", &[], &doc);
        let ctx = ActionContext::new(&desc, true);

        let err = CheckUrl.execute(&ctx).await.unwrap_err();
        assert!(err.to_string().contains("'url' parameter"));
    }
}
