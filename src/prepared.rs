//! Authorized command ready for execution.
//!
//! `PreparedCommand` can only be created by `ShellPolicy::authorize()`, so
//! every spawn is preceded by validation.

use crate::error::ExecError;
use std::process::ExitStatus;
use tokio::process::Command;

/// Outcome of executing a prepared command.
#[derive(Debug)]
pub enum ExecOutcome {
    /// Foreground child ran to completion.
    Completed(ExitStatus),

    /// Background child was spawned and left running; its lifetime is now
    /// independent of the shell (no tracking, no reaping beyond the OS).
    Detached { pid: Option<u32> },
}

/// A validated command ready for execution.
///
/// This type cannot be constructed outside of the crate. The only way to
/// create it is via `ShellPolicy::authorize()`.
#[derive(Debug, Clone)]
pub struct PreparedCommand {
    pub(crate) name: String,
    pub(crate) argv: Vec<String>,
    pub(crate) background: bool,
}

impl PreparedCommand {
    /// Execute the command.
    ///
    /// The binary is resolved through `PATH` (execvp semantics) and inherits
    /// the shell's stdio. For a foreground command this blocks until the
    /// child exits - command N+1 is never read before command N finishes.
    /// For a background command it returns as soon as the child is spawned.
    ///
    /// # Errors
    ///
    /// - [`ExecError::SpawnFailed`] if the process couldn't be started
    /// - [`ExecError::WaitFailed`] if waiting on a foreground child failed
    pub async fn spawn(self) -> Result<ExecOutcome, ExecError> {
        let mut cmd = Command::new(&self.name);
        // argv[0] is the name itself; pass the rest
        cmd.args(self.argv.get(1..).unwrap_or(&[]));

        let mut child = cmd.spawn().map_err(|e| ExecError::SpawnFailed {
            name: self.name.clone(),
            reason: e.to_string(),
        })?;

        if self.background {
            return Ok(ExecOutcome::Detached { pid: child.id() });
        }

        let status = child.wait().await.map_err(|e| ExecError::WaitFailed {
            name: self.name.clone(),
            reason: e.to_string(),
        })?;

        Ok(ExecOutcome::Completed(status))
    }

    /// The command name (argv[0]).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full argument vector, name included.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Whether this command runs without the loop waiting on it.
    pub fn background(&self) -> bool {
        self.background
    }
}
