//! Command-name completion.
//!
//! A stateless provider: given the partial text and its start offset in the
//! line, return the full list of candidates in one call. No generator state
//! is retained between invocations, and the policy is passed in explicitly
//! rather than cached in a global.

use crate::builtin::builtin_names;
use crate::policy::{ShellPolicy, WILDCARD};

/// Candidate completions for `text` at offset `start`.
///
/// Built-in names come first, then allow-listed command names, each
/// prefix-matched against `text`. Away from the start of the line the
/// result is empty - mid-line completion defers to filename completion in
/// the input layer. The wildcard entry is not a command name and is never
/// offered.
pub fn completions(text: &str, start: usize, policy: &ShellPolicy) -> Vec<String> {
    if start != 0 {
        return Vec::new();
    }

    let mut matches: Vec<String> = builtin_names()
        .filter(|name| name.starts_with(text))
        .map(str::to_string)
        .collect();

    matches.extend(
        policy
            .allowed()
            .iter()
            .filter(|name| name.as_str() != WILDCARD && name.starts_with(text))
            .cloned(),
    );

    matches
}
