//! # agros
//!
//! A restricted command interpreter. AGROS presents a shell-like prompt to
//! an authenticated user and permits execution only of commands that satisfy
//! a per-user policy: an allow-list of command names plus a deny-list of
//! forbidden substrings. It is a minimal execution gateway, not a general
//! shell - no pipes, redirection, scripting, or job control beyond a single
//! background-execution flag.
//!
//! ## Flow
//!
//! ```rust
//! use agros::{tokenize, ShellPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = ShellPolicy::new(
//!     vec!["ls".into(), "cat".into()],
//!     vec![";".into(), "|".into()],
//!     3,     // warning budget
//!     1,     // log level
//!     None,  // welcome message
//!     true,  // spawn failures are fatal
//! );
//!
//! let command = tokenize("ls -la /tmp");
//! let prepared = policy.authorize(&command)?;
//! prepared.spawn().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Design principles
//!
//! - **Validation before execution**: a [`PreparedCommand`] can only be
//!   produced by [`ShellPolicy::authorize`], so nothing is spawned without
//!   passing the gate.
//! - **Deny wins**: a forbidden substring anywhere in any argument rejects
//!   a command the allow-list would accept. Substring matching is
//!   deliberately conservative - false positives over bypasses.
//! - **Consumable tolerance**: rejections draw down a warning budget; an
//!   exhausted budget triggers a hard lockout that a supervisor can tell
//!   apart from a clean exit.
//! - **No hidden state**: the policy is loaded once, passed explicitly, and
//!   immutable for the session; completion is a stateless function of
//!   (text, position, policy).

mod builtin;
mod command;
mod complete;
mod config;
mod error;
mod input;
mod ledger;
mod policy;
mod prepared;
mod session;

// Public API
pub use builtin::{classify, builtin_names, Action, BUILT_INS};
pub use command::{tokenize, Command};
pub use complete::completions;
pub use config::{ConfigFile, Section};
pub use error::{AgrosError, ConfigError, ExecError, Violation};
pub use input::{LineReader, ScriptedReader, StdinReader};
pub use ledger::{hard_lockout, Outcome, WarningLedger};
pub use policy::{ShellPolicy, WILDCARD};
pub use prepared::{ExecOutcome, PreparedCommand};
pub use session::{LoopSignal, Session};
