//! Line input.
//!
//! The dispatch loop reads through the [`LineReader`] trait so tests can
//! script a session. The real implementation reads stdin a line at a time
//! and keeps an in-session history of non-empty lines.

use std::io::{BufRead, Write};

/// Source of input lines for the dispatch loop.
pub trait LineReader {
    /// Display `prompt` and block for one line of input.
    ///
    /// Returns `None` when input is exhausted (EOF), which ends the session
    /// cleanly. The returned line has its trailing newline stripped.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// Stdin-backed reader with session history.
#[derive(Debug, Default)]
pub struct StdinReader {
    history: Vec<String>,
}

impl StdinReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines entered so far this session, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl LineReader for StdinReader {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "{prompt}");
        let _ = stdout.flush();

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                if !line.is_empty() {
                    self.history.push(line.clone());
                }
                Some(line)
            }
        }
    }
}

/// Canned input for tests: yields each line in order, then EOF.
#[derive(Debug)]
pub struct ScriptedReader {
    lines: std::vec::IntoIter<String>,
}

impl ScriptedReader {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        self.lines.next()
    }
}
