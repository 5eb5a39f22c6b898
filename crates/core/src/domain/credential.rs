// Credential Domain Model

use std::fmt;

/// Environment variable carrying the connection string, both for lookup
/// and for the child process overlay.
pub const CONNECTION_ENV_VAR: &str = "ATXP_CONNECTION";

/// Opaque connection token identifying the authenticated account.
///
/// `Debug` is redacted so the token never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Raw token, for the child environment only
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Extract the credential from config file contents.
    ///
    /// The first line starting with `ATXP_CONNECTION=` and carrying a value
    /// wins. The value is trimmed, then one leading and one trailing quote
    /// (`"` or `'`) are removed. An empty result counts as absent.
    pub fn from_config_contents(contents: &str) -> Option<Self> {
        let raw = contents.lines().find_map(|line| {
            line.strip_prefix(CONNECTION_ENV_VAR)
                .and_then(|rest| rest.strip_prefix('='))
                .filter(|value| !value.is_empty())
        })?;

        let value = strip_one_quote_layer(raw.trim());
        if value.is_empty() {
            None
        } else {
            Some(Self::new(value))
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

fn strip_one_quote_layer(value: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let value = value.strip_prefix(is_quote).unwrap_or(value);
    value.strip_suffix(is_quote).unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_quoted_value_is_stripped() {
        let cred = Credential::from_config_contents("ATXP_CONNECTION=\"abc123\"\n").unwrap();
        assert_eq!(cred.expose(), "abc123");
    }

    #[test]
    fn test_single_quoted_value_and_whitespace() {
        let cred = Credential::from_config_contents("ATXP_CONNECTION=  'abc123'  \r\n").unwrap();
        assert_eq!(cred.expose(), "abc123");
    }

    #[test]
    fn test_unquoted_value_kept_verbatim() {
        let contents = "# atxp\nOTHER=1\nATXP_CONNECTION=https://accounts.atxp.ai?token=x\n";
        let cred = Credential::from_config_contents(contents).unwrap();
        assert_eq!(cred.expose(), "https://accounts.atxp.ai?token=x");
    }

    #[test]
    fn test_first_match_wins() {
        let contents = "ATXP_CONNECTION=first\nATXP_CONNECTION=second\n";
        assert_eq!(
            Credential::from_config_contents(contents).unwrap().expose(),
            "first"
        );
    }

    #[test]
    fn test_key_must_start_the_line() {
        assert!(Credential::from_config_contents("export ATXP_CONNECTION=abc").is_none());
        assert!(Credential::from_config_contents(" ATXP_CONNECTION=abc").is_none());
    }

    #[test]
    fn test_empty_assignment_is_skipped() {
        let contents = "ATXP_CONNECTION=\nATXP_CONNECTION=later\n";
        assert_eq!(
            Credential::from_config_contents(contents).unwrap().expose(),
            "later"
        );
    }

    #[test]
    fn test_only_quotes_is_absent() {
        assert!(Credential::from_config_contents("ATXP_CONNECTION=\"\"").is_none());
    }

    #[test]
    fn test_only_one_quote_layer_removed() {
        let cred = Credential::from_config_contents("ATXP_CONNECTION=\"'abc'\"").unwrap();
        assert_eq!(cred.expose(), "'abc'");
    }

    #[test]
    fn test_debug_is_redacted() {
        let cred = Credential::new("secret-token");
        assert!(!format!("{:?}", cred).contains("secret-token"));
    }
}
