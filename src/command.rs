//! Parsed command lines.
//!
//! [`tokenize`] turns one raw input line into a [`Command`]: a name, an
//! argument vector (name included at index 0), and a background flag. There
//! is no quoting, escaping, or multi-line support - whitespace is the only
//! delimiter.

/// A parsed, immutable representation of one input line.
///
/// Constructed fresh from each line by [`tokenize`]; never mutated, only
/// superseded by the next read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// First token; empty string for a blank line.
    pub name: String,

    /// All tokens, with `name` at index 0. The background marker is
    /// stripped before storage.
    pub arguments: Vec<String>,

    /// True if a `&` was found (and removed) while tokenizing.
    pub background: bool,
}

impl Command {
    /// Whether this line was blank (or all whitespace).
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// Split a raw line into a [`Command`].
///
/// Splits on spaces, tabs and newlines, collapsing runs of delimiters so no
/// empty tokens are produced. An all-whitespace line yields the empty
/// command - never an error.
///
/// The first token containing a `&` is truncated at it and sets the
/// background flag; scanning stops there, so a second `&` later in the line
/// is left alone. A token truncated to nothing is dropped entirely.
pub fn tokenize(raw_line: &str) -> Command {
    let mut arguments: Vec<String> = Vec::new();
    let mut background = false;

    for token in raw_line.split_whitespace() {
        if !background {
            if let Some(pos) = token.find('&') {
                background = true;
                let truncated = &token[..pos];
                if !truncated.is_empty() {
                    arguments.push(truncated.to_string());
                }
                continue;
            }
        }
        arguments.push(token.to_string());
    }

    let name = arguments.first().cloned().unwrap_or_default();

    Command {
        name,
        arguments,
        background,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line() {
        let cmd = tokenize("");
        assert_eq!(cmd.name, "");
        assert!(cmd.arguments.is_empty());
        assert!(!cmd.background);
        assert!(cmd.is_empty());
    }

    #[test]
    fn test_whitespace_only_line() {
        let cmd = tokenize("   \t  ");
        assert!(cmd.is_empty());
        assert!(cmd.arguments.is_empty());
        assert!(!cmd.background);
    }

    #[test]
    fn test_simple_command() {
        let cmd = tokenize("ls -la");
        assert_eq!(cmd.name, "ls");
        assert_eq!(cmd.arguments, vec!["ls", "-la"]);
        assert!(!cmd.background);
    }

    #[test]
    fn test_delimiters_collapse() {
        let cmd = tokenize("  ls \t  -l   /tmp ");
        assert_eq!(cmd.arguments, vec!["ls", "-l", "/tmp"]);
    }

    #[test]
    fn test_name_is_first_argument() {
        let cmd = tokenize("cat file.txt");
        assert_eq!(cmd.arguments[0], cmd.name);
    }

    #[test]
    fn test_bare_ampersand_sets_background() {
        let cmd = tokenize("sleep 10 &");
        assert_eq!(cmd.name, "sleep");
        assert_eq!(cmd.arguments, vec!["sleep", "10"]);
        assert!(cmd.background);
    }

    #[test]
    fn test_ampersand_truncates_token() {
        // '&' is a hard terminator within its token, not just standalone
        let cmd = tokenize("sleep 10&whatever");
        assert_eq!(cmd.arguments, vec!["sleep", "10"]);
        assert!(cmd.background);
    }

    #[test]
    fn test_only_first_ampersand_is_consumed() {
        let cmd = tokenize("echo a& b&c");
        assert_eq!(cmd.arguments, vec!["echo", "a", "b&c"]);
        assert!(cmd.background);
    }

    #[test]
    fn test_ampersand_in_name_token() {
        let cmd = tokenize("ls&");
        assert_eq!(cmd.name, "ls");
        assert_eq!(cmd.arguments, vec!["ls"]);
        assert!(cmd.background);
    }

    #[test]
    fn test_lone_ampersand_line() {
        // The token truncates to nothing and is dropped
        let cmd = tokenize("&");
        assert!(cmd.is_empty());
        assert!(cmd.arguments.is_empty());
        assert!(cmd.background);
    }
}
