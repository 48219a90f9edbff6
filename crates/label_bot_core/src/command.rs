//! Extraction of label commands from comment text.
//!
//! A comment line starting with `/label` adds the labels that follow it; a line starting
//! with `/remove-label` removes them:
//!
//! ```text
//! /label kind/bug priority/high
//! /remove-label needs-triage
//! ```

use std::sync::LazyLock;

use regex::Regex;

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;

static COMMAND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*/(label|remove-label)(?:[ \t]+([^\r\n]*?))?[ \t]*\r?$").unwrap()
});

/// Labels requested by the commands in a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelCommand {
    pub add: Vec<String>,
    pub remove: Vec<String>,
}

impl LabelCommand {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Collects the label commands of a comment body.
///
/// Commands are matched case-insensitively and label names are separated by whitespace.
///
/// # Examples
///
/// ```
/// use label_bot_core::parse_label_command;
///
/// let command = parse_label_command("LGTM\n/label kind/bug\n/remove-label needs-triage");
/// assert_eq!(command.add, vec!["kind/bug"]);
/// assert_eq!(command.remove, vec!["needs-triage"]);
/// ```
pub fn parse_label_command(body: &str) -> LabelCommand {
    let mut command = LabelCommand::default();

    for captures in COMMAND_PATTERN.captures_iter(body) {
        let names: Vec<String> = captures
            .get(2)
            .map(|m| m.as_str().split_whitespace().map(str::to_string).collect())
            .unwrap_or_else(Vec::new);

        if captures[1].eq_ignore_ascii_case("label") {
            command.add.extend(names);
        } else {
            command.remove.extend(names);
        }
    }

    command
}
