//! Warning ledger.
//!
//! Tracks the per-session budget of tolerated policy violations. Once the
//! budget is exhausted the session is locked out hard - this is a security
//! termination, not a graceful shutdown, and it signals the controlling
//! parent process so a supervisor sees something different from a clean
//! `exit`.

/// Result of recording one policy violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Session continues. `remaining` is `Some(n)` when a finite budget is
    /// in force, `None` when the budget is unlimited.
    Continue { remaining: Option<i32> },

    /// Budget exhausted: no further commands may be processed.
    Terminate,
}

/// Per-session decrementing counter of tolerated policy violations.
#[derive(Debug, Clone)]
pub struct WarningLedger {
    /// `None` means unlimited (configured as `-1` or unset).
    remaining: Option<i32>,
}

impl WarningLedger {
    /// Create a ledger from the configured budget; negative means unlimited.
    pub fn new(budget: i32) -> Self {
        Self {
            remaining: (budget >= 0).then_some(budget),
        }
    }

    /// Record one violation.
    ///
    /// Unlimited budgets always continue and never change state. A finite
    /// budget is decremented; the session survives while the result stays
    /// non-negative and must terminate once it would go below zero.
    pub fn record_violation(&mut self) -> Outcome {
        match self.remaining {
            None => Outcome::Continue { remaining: None },
            Some(left) if left > 0 => {
                let left = left - 1;
                self.remaining = Some(left);
                Outcome::Continue {
                    remaining: Some(left),
                }
            }
            Some(_) => Outcome::Terminate,
        }
    }

    /// Violations still tolerated; `None` when unlimited.
    pub fn remaining(&self) -> Option<i32> {
        self.remaining
    }
}

/// Hard lockout: terminate the session in a way the invoking supervisor can
/// distinguish from a normal exit.
///
/// Sends SIGTERM to the parent process, then exits with a failure status.
/// This never returns and bypasses the clean shutdown path on purpose.
pub fn hard_lockout() -> ! {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::getppid;

    let _ = kill(getppid(), Signal::SIGTERM);
    std::process::exit(1);
}
