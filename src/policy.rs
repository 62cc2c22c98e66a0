//! Per-user authorization policy.
//!
//! `ShellPolicy` is the security boundary of the shell. `authorize()` is the
//! only way to obtain a [`PreparedCommand`], so nothing reaches the process
//! spawner without passing the allow-list and forbidden-substring checks.

use crate::command::Command;
use crate::error::Violation;
use crate::prepared::PreparedCommand;

/// The allow-list wildcard: no allow-list restriction applies.
pub const WILDCARD: &str = "*";

/// Per-user authorization configuration, loaded once at session start and
/// immutable for the session.
#[derive(Debug, Clone)]
pub struct ShellPolicy {
    /// Allowed command names. The literal `*` allows everything.
    allowed: Vec<String>,

    /// Substrings that veto a command when found in any argument.
    forbidden: Vec<String>,

    /// Tolerated policy violations before lockout; `-1` means unlimited.
    warning_budget: i32,

    /// How much detail goes to the audit sink (0-3+).
    log_level: u8,

    /// Optional welcome message shown at startup and in `help`.
    welcome: Option<String>,

    /// Whether a failed spawn terminates the session.
    fatal_spawn_errors: bool,
}

impl ShellPolicy {
    /// Create a policy. Callers are expected to come through the config
    /// loader, which enforces that `allowed` and `forbidden` were present.
    pub fn new(
        allowed: Vec<String>,
        forbidden: Vec<String>,
        warning_budget: i32,
        log_level: u8,
        welcome: Option<String>,
        fatal_spawn_errors: bool,
    ) -> Self {
        Self {
            allowed,
            forbidden,
            warning_budget,
            log_level,
            welcome,
            fatal_spawn_errors,
        }
    }

    /// Validate a command against this policy.
    ///
    /// Two independent passes: the allow check (wildcard or exact name
    /// match), then the forbidden-substring scan over every argument. Deny
    /// always wins - a forbidden match rejects an otherwise allowed command.
    ///
    /// This is the ONLY way to create a `PreparedCommand`.
    ///
    /// # Errors
    ///
    /// Returns a [`Violation`] naming the failed check.
    pub fn authorize(&self, command: &Command) -> Result<PreparedCommand, Violation> {
        if !self.is_wildcard() && !self.allowed.iter().any(|a| a == &command.name) {
            return Err(Violation::NotAllowed {
                name: command.name.clone(),
            });
        }

        for pattern in &self.forbidden {
            for argument in &command.arguments {
                if argument.contains(pattern.as_str()) {
                    return Err(Violation::ForbiddenPattern {
                        pattern: pattern.clone(),
                        argument: argument.clone(),
                    });
                }
            }
        }

        Ok(PreparedCommand {
            name: command.name.clone(),
            argv: command.arguments.clone(),
            background: command.background,
        })
    }

    /// Whether the allow-list contains the wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.allowed.iter().any(|a| a == WILDCARD)
    }

    /// Allowed command names (used by `help` and completion).
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// Forbidden substrings (used by `help`).
    pub fn forbidden(&self) -> &[String] {
        &self.forbidden
    }

    /// Starting warning budget; `-1` means unlimited.
    pub fn warning_budget(&self) -> i32 {
        self.warning_budget
    }

    /// Audit detail level.
    pub fn log_level(&self) -> u8 {
        self.log_level
    }

    /// Welcome message, if configured.
    pub fn welcome(&self) -> Option<&str> {
        self.welcome.as_deref()
    }

    /// Whether a spawn failure ends the session.
    pub fn fatal_spawn_errors(&self) -> bool {
        self.fatal_spawn_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tokenize;

    fn policy(allowed: &[&str], forbidden: &[&str]) -> ShellPolicy {
        ShellPolicy::new(
            allowed.iter().map(|s| s.to_string()).collect(),
            forbidden.iter().map(|s| s.to_string()).collect(),
            -1,
            0,
            None,
            true,
        )
    }

    #[test]
    fn test_allowed_command_authorized() {
        let policy = policy(&["ls", "cat"], &[";", "|"]);
        assert!(policy.authorize(&tokenize("ls")).is_ok());
        assert!(policy.authorize(&tokenize("cat file.txt")).is_ok());
    }

    #[test]
    fn test_unlisted_command_rejected() {
        let policy = policy(&["ls", "cat"], &[";", "|"]);
        let result = policy.authorize(&tokenize("rm -rf /"));
        assert_eq!(
            result.unwrap_err(),
            Violation::NotAllowed {
                name: "rm".to_string()
            }
        );
    }

    #[test]
    fn test_forbidden_substring_wins_over_allow() {
        let policy = policy(&["ls", "cat"], &[";", "|"]);
        let result = policy.authorize(&tokenize("ls a;b"));
        assert!(matches!(
            result,
            Err(Violation::ForbiddenPattern { pattern, argument })
                if pattern == ";" && argument == "a;b"
        ));
    }

    #[test]
    fn test_forbidden_scans_every_argument() {
        let policy = policy(&["cat"], &["|"]);
        let result = policy.authorize(&tokenize("cat a.txt b.txt evil|thing"));
        assert!(matches!(result, Err(Violation::ForbiddenPattern { .. })));
    }

    #[test]
    fn test_wildcard_allows_any_name() {
        let policy = policy(&["*"], &["&&"]);
        assert!(policy.authorize(&tokenize("anything at all")).is_ok());
        assert!(policy.authorize(&tokenize("rm -rf /")).is_ok());
    }

    #[test]
    fn test_wildcard_still_subject_to_forbidden() {
        let policy = policy(&["*"], &[";"]);
        let result = policy.authorize(&tokenize("echo a;b"));
        assert!(matches!(result, Err(Violation::ForbiddenPattern { .. })));
    }

    #[test]
    fn test_empty_forbidden_list_authorizes_trivially() {
        let policy = policy(&["ls"], &[]);
        assert!(policy.authorize(&tokenize("ls ')|;$(anything'")).is_ok());
    }

    #[test]
    fn test_revalidation_is_deterministic() {
        let policy = policy(&["ls"], &[";"]);
        let cmd = tokenize("ls a;b");
        let first = policy.authorize(&cmd);
        let second = policy.authorize(&cmd);
        assert_eq!(first.is_err(), second.is_err());
        assert_eq!(first.unwrap_err(), second.unwrap_err());
    }

    #[test]
    fn test_overbroad_substring_match_is_intended() {
        // Forbidding "rm" rejects the harmless argument "norman.txt".
        // Deliberately conservative: false positives over bypasses.
        let policy = policy(&["cat"], &["rm"]);
        let result = policy.authorize(&tokenize("cat norman.txt"));
        assert!(matches!(result, Err(Violation::ForbiddenPattern { .. })));
    }

    #[test]
    fn test_background_flag_carried_into_prepared() {
        let policy = policy(&["sleep"], &[]);
        let prepared = policy.authorize(&tokenize("sleep 10 &")).unwrap();
        assert!(prepared.background());
        assert_eq!(prepared.argv(), ["sleep", "10"]);
    }
}
