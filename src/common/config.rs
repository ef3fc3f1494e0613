//! Configuration file handling
//!
//! A run's configuration is layered from three sources, last writer wins
//! per key: built-in defaults, then an optional YAML configuration file,
//! then CLI overrides. The result is immutable for the duration of one run.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cli::CliInvocation;

use super::{Error, Result};

/// Name of the configuration file picked up from the working directory
/// when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "docrun.yml";

/// Resolved run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Glob pattern or path of the documents to scan
    pub files: String,

    /// Name of the formatter rendering the run
    pub format: String,

    /// Suppress network-dependent actions
    pub offline: bool,

    /// Keys from the configuration file we do not recognize.
    /// Preserved so newer config files keep working with older binaries.
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            files: default_files(),
            format: default_format(),
            offline: false,
            extra: BTreeMap::new(),
        }
    }
}

fn default_files() -> String {
    "**/*.md".to_string()
}

fn default_format() -> String {
    "detailed".to_string()
}

/// On-disk shape of the configuration file. All keys optional; unknown
/// keys are collected rather than rejected.
#[derive(Debug, Deserialize, Default)]
struct ConfigurationFile {
    files: Option<String>,
    format: Option<String>,
    offline: Option<bool>,

    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

impl Configuration {
    /// Resolve the configuration for one run.
    ///
    /// With no file path, returns the schema defaults. With a path, the
    /// file must exist and parse; its keys override the defaults.
    pub fn resolve(file_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = file_path {
            let content = std::fs::read_to_string(path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::ConfigurationNotFound {
                        path: path.display().to_string(),
                    }
                } else {
                    Error::Io(e)
                }
            })?;

            let file: ConfigurationFile =
                serde_yaml::from_str(&content).map_err(|e| Error::ConfigurationParse {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;

            if let Some(files) = file.files {
                config.files = files;
            }
            if let Some(format) = file.format {
                config.format = format;
            }
            if let Some(offline) = file.offline {
                config.offline = offline;
            }
            config.extra = file.extra;
        }

        Ok(config)
    }

    /// Layer CLI values on top. CLI wins over both defaults and file.
    pub fn apply(mut self, invocation: &CliInvocation) -> Self {
        if let Some(file) = &invocation.file {
            self.files = file.clone();
        }
        if let Some(format) = &invocation.format {
            self.format = format.clone();
        }
        if invocation.offline {
            self.offline = true;
        }
        self
    }
}

/// Find the configuration file for the current working directory, if any.
pub fn default_config_path() -> Option<PathBuf> {
    let path = PathBuf::from(DEFAULT_CONFIG_FILE);
    path.exists().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli;
    use std::fs;

    #[test]
    fn defaults_without_file() {
        let config = Configuration::resolve(None).unwrap();
        assert_eq!(config.files, "**/*.md");
        assert_eq!(config.format, "detailed");
        assert!(!config.offline);
        assert!(config.extra.is_empty());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docrun.yml");
        fs::write(&path, "files: '*.md'\n").unwrap();

        let config = Configuration::resolve(Some(&path)).unwrap();
        assert_eq!(config.files, "*.md");
        // Untouched keys keep their defaults
        assert_eq!(config.format, "detailed");
    }

    #[test]
    fn unknown_keys_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docrun.yml");
        fs::write(&path, "files: '*.md'\nfancy-future-option: 7\n").unwrap();

        let config = Configuration::resolve(Some(&path)).unwrap();
        assert!(config.extra.contains_key("fancy-future-option"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Configuration::resolve(Some(Path::new("does/not/exist.yml"))).unwrap_err();
        match err {
            Error::ConfigurationNotFound { path } => {
                assert_eq!(path, "does/not/exist.yml");
            }
            other => panic!("expected ConfigurationNotFound, got {other:?}"),
        }
    }

    #[test]
    fn malformed_file_reports_parser_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docrun.yml");
        fs::write(&path, "files: [unclosed\n").unwrap();

        let err = Configuration::resolve(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::ConfigurationParse { .. }));
    }

    #[test]
    fn resolution_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docrun.yml");
        fs::write(&path, "files: 'docs/**/*.md'\noffline: true\n").unwrap();

        let first = Configuration::resolve(Some(&path)).unwrap();
        let second = Configuration::resolve(Some(&path)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn cli_values_win_over_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docrun.yml");
        fs::write(&path, "files: '*.md'\nformat: dot\n").unwrap();

        let invocation = cli::parse(vec![
            "--format".to_string(),
            "detailed".to_string(),
            "README.md".to_string(),
        ]);
        let config = Configuration::resolve(Some(&path))
            .unwrap()
            .apply(&invocation);

        assert_eq!(config.files, "README.md");
        assert_eq!(config.format, "detailed");
    }
}
