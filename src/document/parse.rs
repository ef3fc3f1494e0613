//! Action directive extraction (syntax v1)
//!
//! An action is an HTML comment on its own line:
//!
//! ```text
//! <!-- action:run-command output="hello" -->
//! ```
//!
//! When the next non-blank line opens a fenced code block, the fence body
//! is captured as the `content` parameter. The directive's own line number
//! becomes the action's reported location.

use std::collections::BTreeMap;
use std::path::Path;

use crate::common::{Error, Result};

use super::{ActionDescriptor, Location};

const DIRECTIVE_PREFIX: &str = "<!-- action:";
const DIRECTIVE_SUFFIX: &str = "-->";

/// Extract all actions from one document, in document order.
pub fn extract(file: &Path, text: &str) -> Result<Vec<ActionDescriptor>> {
    let lines: Vec<&str> = text.lines().collect();
    let mut actions = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        let Some(rest) = line.strip_prefix(DIRECTIVE_PREFIX) else {
            i += 1;
            continue;
        };

        let directive_line = (i + 1) as u32;
        let body = rest
            .strip_suffix(DIRECTIVE_SUFFIX)
            .ok_or_else(|| malformed(file, directive_line, "directive is not closed with '-->'"))?
            .trim();

        let (action_type, params) = match body.split_once(char::is_whitespace) {
            Some((ty, rest)) => (ty, rest.trim()),
            None => (body, ""),
        };
        if action_type.is_empty() {
            return Err(malformed(file, directive_line, "missing action type"));
        }

        let mut parameters = parse_parameters(params)
            .map_err(|message| malformed(file, directive_line, &message))?;

        // Attach the fenced block immediately below, if there is one
        let mut next = i + 1;
        while next < lines.len() && lines[next].trim().is_empty() {
            next += 1;
        }
        if next < lines.len() && lines[next].trim_start().starts_with("```") {
            let mut end = next + 1;
            let mut body_lines = Vec::new();
            while end < lines.len() && !lines[end].trim_start().starts_with("```") {
                body_lines.push(lines[end]);
                end += 1;
            }
            if end >= lines.len() {
                return Err(malformed(
                    file,
                    (next + 1) as u32,
                    "fenced block is never closed",
                ));
            }
            parameters.insert("content".to_string(), body_lines.join("\n"));
            i = end;
        }

        actions.push(ActionDescriptor {
            action_type: action_type.to_string(),
            location: Location {
                file: file.to_path_buf(),
                line: directive_line,
            },
            parameters,
        });
        i += 1;
    }

    Ok(actions)
}

fn malformed(file: &Path, line: u32, message: &str) -> Error {
    Error::MalformedDirective {
        file: file.display().to_string(),
        line,
        message: message.to_string(),
    }
}

/// Parse `key="value"` pairs. Values are double-quoted; keys are bare.
fn parse_parameters(input: &str) -> std::result::Result<BTreeMap<String, String>, String> {
    let mut parameters = BTreeMap::new();
    let mut chars = input.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(&c) = chars.peek() {
            if c == '=' || c.is_whitespace() {
                break;
            }
            key.push(c);
            chars.next();
        }
        if chars.next() != Some('=') {
            return Err(format!("parameter '{key}' is missing '='"));
        }
        if chars.next() != Some('"') {
            return Err(format!("parameter '{key}' value must be double-quoted"));
        }

        let mut value = String::new();
        loop {
            match chars.next() {
                Some('"') => break,
                Some(c) => value.push(c),
                None => return Err(format!("parameter '{key}' has an unterminated value")),
            }
        }

        parameters.insert(key, value);
    }

    Ok(parameters)
}
