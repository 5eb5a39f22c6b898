// Command Line Domain Model

use std::fmt;

/// Argument string handed to the external program, without the
/// launcher/package prefix (e.g. `email send --to "a@b.c" --body "hi"`).
///
/// Free-form values only enter through [`CommandLine::push_quoted`], which
/// escapes embedded `"` and `\` so a value can never close its own quoted
/// segment. Other shell metacharacters (`$`, backticks, `;`) are passed
/// through as-is: quote balance is the only guarantee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(String);

impl CommandLine {
    pub fn new(subcommand: &str) -> Self {
        Self(subcommand.to_string())
    }

    /// Append a trusted token (subcommand word, flag, number, enum variant)
    pub fn push_bare(&mut self, token: &str) {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        self.0.push_str(token);
    }

    /// Append a free-form value as a double-quoted segment
    pub fn push_quoted(&mut self, value: &str) {
        let quoted = format!("\"{}\"", escape_for_double_quotes(value));
        self.push_bare(&quoted);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape a value for use inside a POSIX double-quoted shell word.
///
/// Every `\` becomes `\\` and every `"` becomes `\"`, backslashes first.
/// A value ending in `\` (or containing `\"`) would otherwise turn the
/// inserted escape back into a closing quote. The shell decodes both
/// escapes back to the original text. Nothing else is touched.
pub fn escape_for_double_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
