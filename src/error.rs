//! Error types for agros.
//!
//! Three categories, matching how each is handled:
//! - [`Violation`]: policy rejections from `authorize()` - recoverable, consume warning budget
//! - [`ConfigError`]: configuration problems - fatal at startup, before any prompt
//! - [`ExecError`]: external command execution failures after authorization

use thiserror::Error;

/// Policy violation detected during `authorize()`.
///
/// These errors mean the command was rejected before any execution attempt.
/// Each one consumes a unit of the session's warning budget.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Command name is not in the allow-list
    #[error("command not allowed: {name}")]
    NotAllowed { name: String },

    /// A forbidden substring appeared in an argument
    #[error("forbidden pattern {pattern:?} in argument {argument:?}")]
    ForbiddenPattern { pattern: String, argument: String },
}

/// Configuration error detected at startup.
///
/// All of these are fatal: the shell exits before showing a prompt.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("could not read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// Config file is not valid TOML
    #[error("could not parse config file {path}: {reason}")]
    Parse { path: String, reason: String },

    /// No `allowed` list for this user (and none in the general section)
    #[error("missing allowed list for user {user}")]
    MissingAllowedList { user: String },

    /// No `forbidden` list for this user (and none in the general section)
    #[error("missing forbidden list for user {user}")]
    MissingForbiddenList { user: String },
}

/// Execution error for a command that passed authorization.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Failed to spawn the process (not found, not executable, ...)
    #[error("failed to spawn {name}: {reason}")]
    SpawnFailed { name: String, reason: String },

    /// Failed while waiting for a foreground child
    #[error("failed waiting for {name}: {reason}")]
    WaitFailed { name: String, reason: String },
}

/// Combined error type for the whole shell.
#[derive(Debug, Error)]
pub enum AgrosError {
    #[error(transparent)]
    Violation(#[from] Violation),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}
