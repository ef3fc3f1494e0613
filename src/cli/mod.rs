//! Command-line argument resolution
//!
//! Parsing is total: any argument vector resolves to a [`CliInvocation`],
//! and the only supported command (`run`) is also the default. The vector
//! may still carry the host executable and launcher-script paths that
//! spawned us, so up to two leading tokens are stripped when they point at
//! the runner itself, on both Unix and Windows path conventions.

/// Commands the runner understands. `run` is the default and currently
/// the only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    #[default]
    Run,
}

/// Structured form of one process invocation. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliInvocation {
    pub command: Command,

    /// Target file or glob; absent means "use the configured default"
    pub file: Option<String>,

    /// Actions should avoid live network calls
    pub offline: bool,

    /// Formatter name; validity is the registry's concern, not ours
    pub format: Option<String>,

    /// Explicit configuration file path
    pub config: Option<String>,
}

/// Parse a raw argument vector into a [`CliInvocation`]. Never fails.
pub fn parse(argv: Vec<String>) -> CliInvocation {
    let args = strip_launcher_tokens(&argv);

    let mut invocation = CliInvocation::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "run" => {
                invocation.command = Command::Run;
            }
            "--offline" => {
                invocation.offline = true;
                if let Some(next) = args.get(i + 1) {
                    if !next.starts_with("--") {
                        invocation.file = Some(next.clone());
                        i += 1;
                    }
                }
            }
            "--format" => {
                if let Some(next) = args.get(i + 1) {
                    invocation.format = Some(next.clone());
                    i += 1;
                }
            }
            "--config" => {
                if let Some(next) = args.get(i + 1) {
                    invocation.config = Some(next.clone());
                    i += 1;
                }
            }
            flag if flag.starts_with("--") => {
                // Unknown flags are ignored rather than fatal
            }
            file => {
                invocation.file = Some(file.to_string());
            }
        }
        i += 1;
    }

    invocation
}

/// Drop the leading host-executable and launcher-script tokens, if present.
///
/// A token counts as a launcher when its basename (minus a Windows
/// `.exe`/`.cmd` extension) names this binary. At most two tokens are
/// stripped, matching `<host> <script> args...` invocation shapes. Only the
/// host token may be a bare name (a PATH lookup leaves argv[0] that way);
/// a launcher script is always path-shaped, so a bare second token stays a
/// positional argument.
fn strip_launcher_tokens(argv: &[String]) -> &[String] {
    let mut rest = argv;
    if matches!(rest.first(), Some(token) if is_launcher_path(token, true)) {
        rest = &rest[1..];
        if matches!(rest.first(), Some(token) if is_launcher_path(token, false)) {
            rest = &rest[1..];
        }
    }
    rest
}

fn is_launcher_path(token: &str, allow_bare: bool) -> bool {
    if !allow_bare && !token.contains(['/', '\\']) {
        return false;
    }
    let basename = token
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(token);
    let name = basename
        .strip_suffix(".exe")
        .or_else(|| basename.strip_suffix(".cmd"))
        .unwrap_or(basename);
    name == env!("CARGO_PKG_NAME")
}
