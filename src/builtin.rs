//! Built-in command classification.
//!
//! Maps a command name to one of the fixed built-in actions or `External`.
//! Matching is exact and case-sensitive; glob handling belongs to the
//! allow-list in the policy engine, never here.

/// Symbolic action for a command name.
///
/// Everything that is not a built-in classifies as [`Action::External`] and
/// must pass the policy gate before execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Blank line, nothing to do
    Empty,
    /// `cd [path]`
    ChangeDirectory,
    /// `help` or `?`
    Help,
    /// `env [name]`
    ShowEnv,
    /// `exit`
    Exit,
    /// Anything else - subject to policy validation
    External,
}

/// The static registry of built-in command names.
///
/// Both `help` and `?` map to [`Action::Help`]. The empty name is the
/// blank-line case.
pub const BUILT_INS: &[(&str, Action)] = &[
    ("exit", Action::Exit),
    ("", Action::Empty),
    ("cd", Action::ChangeDirectory),
    ("env", Action::ShowEnv),
    ("help", Action::Help),
    ("?", Action::Help),
];

/// Classify a command name.
pub fn classify(name: &str) -> Action {
    BUILT_INS
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, action)| *action)
        .unwrap_or(Action::External)
}

/// Names offered by completion, in registry order (blank entry excluded).
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILT_INS
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_classified() {
        assert_eq!(classify("exit"), Action::Exit);
        assert_eq!(classify("cd"), Action::ChangeDirectory);
        assert_eq!(classify("env"), Action::ShowEnv);
        assert_eq!(classify("help"), Action::Help);
        assert_eq!(classify("?"), Action::Help);
        assert_eq!(classify(""), Action::Empty);
    }

    #[test]
    fn test_unknown_name_is_external() {
        assert_eq!(classify("ls"), Action::External);
        assert_eq!(classify("rm"), Action::External);
    }

    #[test]
    fn test_matching_is_exact_and_case_sensitive() {
        assert_eq!(classify("CD"), Action::External);
        assert_eq!(classify("exi"), Action::External);
        assert_eq!(classify("exits"), Action::External);
        assert_eq!(classify("cd "), Action::External);
    }

    #[test]
    fn test_classification_is_deterministic() {
        assert_eq!(classify("env"), classify("env"));
        assert_eq!(classify("make"), classify("make"));
    }

    #[test]
    fn test_builtin_names_skip_blank_entry() {
        let names: Vec<_> = builtin_names().collect();
        assert!(!names.contains(&""));
        assert!(names.contains(&"exit"));
        assert!(names.contains(&"?"));
    }
}
