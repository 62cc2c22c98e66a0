//! The dispatch loop.
//!
//! One command is processed end-to-end per iteration: read, tokenize,
//! classify, validate, execute. Built-ins are always authorized and handled
//! in-process; external commands must pass the policy gate, and every
//! rejection is charged against the warning ledger.

use crate::builtin::{classify, Action};
use crate::command::{tokenize, Command};
use crate::error::{ExecError, Violation};
use crate::input::LineReader;
use crate::ledger::{Outcome, WarningLedger};
use crate::policy::ShellPolicy;
use crate::prepared::{ExecOutcome, PreparedCommand};
use std::path::{Path, PathBuf};

/// What the loop should do after a handled line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSignal {
    /// Show the prompt again.
    Continue,

    /// Clean shutdown (`exit` built-in, end of input, or a fatal spawn
    /// failure under `fatal_spawn_errors`).
    Exit,

    /// Warning budget exhausted. The caller must perform the hard lockout;
    /// no further commands may be processed.
    Lockout,
}

/// Mutable per-run state plus the loop itself.
#[derive(Debug)]
pub struct Session {
    user: String,
    home: PathBuf,
    policy: ShellPolicy,
    ledger: WarningLedger,
    working_directory: PathBuf,
}

impl Session {
    pub fn new(user: impl Into<String>, home: impl Into<PathBuf>, policy: ShellPolicy) -> Self {
        let ledger = WarningLedger::new(policy.warning_budget());
        let working_directory =
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));

        Self {
            user: user.into(),
            home: home.into(),
            policy,
            ledger,
            working_directory,
        }
    }

    /// The session prompt: `[AGROS]<user>:<working_directory>$ `.
    pub fn prompt(&self) -> String {
        format!(
            "[AGROS]{}:{}$ ",
            self.user,
            self.working_directory.display()
        )
    }

    /// Drive the loop until the reader is exhausted or a terminal signal.
    ///
    /// Never returns [`LoopSignal::Continue`].
    pub async fn run<R: LineReader>(&mut self, reader: &mut R) -> LoopSignal {
        loop {
            let prompt = self.prompt();
            let Some(line) = reader.read_line(&prompt) else {
                return LoopSignal::Exit;
            };

            match self.handle_line(&line).await {
                LoopSignal::Continue => continue,
                signal => return signal,
            }
        }
    }

    /// Process one input line end-to-end.
    pub async fn handle_line(&mut self, line: &str) -> LoopSignal {
        let command = tokenize(line);

        match classify(&command.name) {
            Action::Empty => LoopSignal::Continue,
            Action::Exit => LoopSignal::Exit,
            Action::ChangeDirectory => {
                self.change_directory(&command);
                LoopSignal::Continue
            }
            Action::ShowEnv => {
                print_env(command.arguments.get(1).map(String::as_str));
                LoopSignal::Continue
            }
            Action::Help => {
                self.print_help();
                LoopSignal::Continue
            }
            Action::External => match self.policy.authorize(&command) {
                Ok(prepared) => self.execute(prepared).await,
                Err(violation) => self.record_violation(&violation),
            },
        }
    }

    /// Charge one violation against the ledger and report it.
    fn record_violation(&mut self, violation: &Violation) -> LoopSignal {
        eprintln!("agros: {violation}. Type '?' for help.");
        tracing::warn!(user = %self.user, %violation, "rejected command");

        match self.ledger.record_violation() {
            Outcome::Continue { remaining: Some(n) } => {
                println!("Warnings remaining: {n}");
                LoopSignal::Continue
            }
            Outcome::Continue { remaining: None } => LoopSignal::Continue,
            Outcome::Terminate => {
                eprintln!("Exiting AGROS. The incident will be reported.");
                tracing::error!(user = %self.user, "warning budget exhausted");
                LoopSignal::Lockout
            }
        }
    }

    /// Run an authorized external command.
    ///
    /// Foreground commands block until the child exits; background commands
    /// return to the prompt immediately. A spawn failure is fatal to the
    /// session unless the policy says otherwise.
    async fn execute(&mut self, prepared: PreparedCommand) -> LoopSignal {
        let name = prepared.name().to_string();

        match prepared.spawn().await {
            Ok(ExecOutcome::Completed(status)) => {
                if !status.success() {
                    tracing::info!(user = %self.user, command = %name, ?status, "command failed");
                }
                LoopSignal::Continue
            }
            Ok(ExecOutcome::Detached { pid }) => {
                tracing::info!(user = %self.user, command = %name, ?pid, "background command started");
                LoopSignal::Continue
            }
            Err(error @ ExecError::SpawnFailed { .. }) => {
                eprintln!("{name}: Could not execute command!\nType '?' for help.");
                tracing::warn!(user = %self.user, %error, "spawn failed");
                if self.policy.fatal_spawn_errors() {
                    LoopSignal::Exit
                } else {
                    LoopSignal::Continue
                }
            }
            Err(error) => {
                eprintln!("{name}: {error}");
                tracing::warn!(user = %self.user, %error, "execution failed");
                LoopSignal::Continue
            }
        }
    }

    /// `cd [path]`: no path means home. Arguments are joined so paths with
    /// spaces survive the whitespace tokenizer.
    fn change_directory(&mut self, command: &Command) {
        let target = if command.arguments.len() > 1 {
            PathBuf::from(command.arguments[1..].join(" "))
        } else {
            self.home.clone()
        };

        match std::env::set_current_dir(&target) {
            Ok(()) => {
                self.working_directory =
                    std::env::current_dir().unwrap_or(target);
                std::env::set_var("PWD", &self.working_directory);
                tracing::info!(
                    user = %self.user,
                    directory = %self.working_directory.display(),
                    "changed directory"
                );
            }
            Err(_) => {
                eprintln!("{}: Could not change to such directory", target.display());
                tracing::warn!(
                    user = %self.user,
                    directory = %target.display(),
                    "could not change directory"
                );
            }
        }
    }

    /// `help` / `?`: allow and deny lists framed by a banner.
    fn print_help(&self) {
        let banner = "*".repeat(70);

        println!("\n\n{banner}");
        match self.policy.welcome() {
            Some(welcome) => println!("{welcome}"),
            None => println!("Welcome to AGROS, the newer limited shell."),
        }
        println!("Note: At any time, you can type 'exit' to close the shell.\n");

        println!("List of allowed actions:\n");
        if self.policy.is_wildcard() {
            println!(" * (all)");
        } else {
            for name in self.policy.allowed() {
                println!(" * {name}");
            }
        }
        println!();

        println!("List of forbidden characters:\n");
        if self.policy.forbidden().is_empty() {
            println!(" * (none)");
        } else {
            for pattern in self.policy.forbidden() {
                println!(" * {pattern}");
            }
        }
        println!("\n{banner}\n");
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn policy(&self) -> &ShellPolicy {
        &self.policy
    }

    pub fn ledger(&self) -> &WarningLedger {
        &self.ledger
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }
}

/// `env [name]`: one variable, or the whole environment.
///
/// The environment is inherited, so values are not guaranteed to be valid
/// Unicode; undecodable bytes are printed lossily rather than crashing the
/// session or misreporting a present variable as absent.
fn print_env(variable: Option<&str>) {
    match variable {
        Some(name) => println!("{}", env_entry(name)),
        None => {
            for (key, value) in std::env::vars_os() {
                println!("{}={}", key.to_string_lossy(), value.to_string_lossy());
            }
        }
    }
}

/// Report line for one environment variable.
fn env_entry(name: &str) -> String {
    match std::env::var_os(name) {
        Some(value) => format!("{name}:\t{}", value.to_string_lossy()),
        None => format!("Environment variable {name} does not exist."),
    }
}
