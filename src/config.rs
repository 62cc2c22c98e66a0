//! Configuration loading.
//!
//! The config file is TOML with a `[general]` section and optional
//! per-user `[users.<name>]` overrides:
//!
//! ```toml
//! [general]
//! loglevel = 1
//! welcome = "Welcome to AGROS."
//! allowed = ["ls", "cat", "echo"]
//! forbidden = [";", "|", ">"]
//! warnings = 3
//!
//! [users.alice]
//! allowed = ["*"]
//! warnings = -1
//! ```
//!
//! Every key is resolved per-key: user section if present, else general,
//! else the built-in default. `allowed` and `forbidden` have no default -
//! a user for whom neither resolves is a fatal configuration error, and the
//! shell refuses to start.

use crate::error::ConfigError;
use crate::policy::ShellPolicy;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// One section of the config file. All keys optional; resolution happens
/// in [`ConfigFile::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Section {
    /// Audit detail level, 0-3+.
    pub loglevel: Option<u8>,

    /// Welcome message shown at startup and in `help`.
    pub welcome: Option<String>,

    /// Allowed command names; `"*"` disables the allow restriction.
    pub allowed: Option<Vec<String>>,

    /// Substrings that veto a command when found in any argument.
    pub forbidden: Option<Vec<String>>,

    /// Warning budget; `-1` means unlimited.
    pub warnings: Option<i32>,

    /// Whether a failed spawn ends the session (historical default: yes).
    pub fatal_spawn_errors: Option<bool>,
}

/// The parsed config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub general: Section,

    #[serde(default)]
    pub users: HashMap<String, Section>,
}

impl ConfigFile {
    /// Load and parse a config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Unreadable`] if the file can't be read,
    /// [`ConfigError::Parse`] if it isn't valid TOML. Both are fatal to
    /// startup.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Parse config text directly (used by tests).
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Resolve the effective policy for one user.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingAllowedList`] / [`ConfigError::MissingForbiddenList`]
    /// when the required lists resolve to nothing.
    pub fn resolve(&self, user: &str) -> Result<ShellPolicy, ConfigError> {
        let section = self.users.get(user);

        let allowed = self
            .pick(section, |s| s.allowed.clone())
            .ok_or_else(|| ConfigError::MissingAllowedList {
                user: user.to_string(),
            })?;

        let forbidden = self
            .pick(section, |s| s.forbidden.clone())
            .ok_or_else(|| ConfigError::MissingForbiddenList {
                user: user.to_string(),
            })?;

        let warnings = self.pick(section, |s| s.warnings).unwrap_or(-1);
        let loglevel = self.pick(section, |s| s.loglevel).unwrap_or(0);
        let welcome = self.pick(section, |s| s.welcome.clone());
        let fatal_spawn_errors = self
            .pick(section, |s| s.fatal_spawn_errors)
            .unwrap_or(true);

        Ok(ShellPolicy::new(
            allowed,
            forbidden,
            warnings,
            loglevel,
            welcome,
            fatal_spawn_errors,
        ))
    }

    /// Per-key lookup: user section first, then general.
    fn pick<T>(&self, section: Option<&Section>, get: impl Fn(&Section) -> Option<T>) -> Option<T> {
        section.and_then(&get).or_else(|| get(&self.general))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::io::Write;

    const BASIC: &str = r#"
        [general]
        loglevel = 1
        welcome = "hello"
        allowed = ["ls", "cat"]
        forbidden = [";"]
        warnings = 3

        [users.alice]
        allowed = ["*"]
        loglevel = 3

        [users.bob]
        warnings = 0
    "#;

    #[test]
    fn test_general_section_applies_to_unknown_user() {
        let config = ConfigFile::parse(BASIC).unwrap();
        let policy = config.resolve("charlie").unwrap();

        assert_eq!(policy.allowed(), ["ls", "cat"]);
        assert_eq!(policy.forbidden(), [";"]);
        assert_eq!(policy.warning_budget(), 3);
        assert_eq!(policy.log_level(), 1);
        assert_eq!(policy.welcome(), Some("hello"));
    }

    #[test]
    fn test_user_section_overrides_per_key() {
        let config = ConfigFile::parse(BASIC).unwrap();
        let policy = config.resolve("alice").unwrap();

        // overridden keys
        assert!(policy.is_wildcard());
        assert_eq!(policy.log_level(), 3);
        // fallthrough keys
        assert_eq!(policy.forbidden(), [";"]);
        assert_eq!(policy.warning_budget(), 3);
    }

    #[test]
    fn test_partial_user_section_keeps_general_lists() {
        let config = ConfigFile::parse(BASIC).unwrap();
        let policy = config.resolve("bob").unwrap();

        assert_eq!(policy.warning_budget(), 0);
        assert_eq!(policy.allowed(), ["ls", "cat"]);
    }

    #[test]
    fn test_missing_allowed_list_is_fatal() {
        let config = ConfigFile::parse(
            r#"
            [general]
            forbidden = [";"]
        "#,
        )
        .unwrap();

        let result = config.resolve("anyone");
        assert!(matches!(result, Err(ConfigError::MissingAllowedList { .. })));
    }

    #[test]
    fn test_missing_forbidden_list_is_fatal() {
        let config = ConfigFile::parse(
            r#"
            [general]
            allowed = ["ls"]
        "#,
        )
        .unwrap();

        let result = config.resolve("anyone");
        assert!(matches!(
            result,
            Err(ConfigError::MissingForbiddenList { .. })
        ));
    }

    #[test]
    fn test_defaults_when_keys_absent() {
        let config = ConfigFile::parse(
            r#"
            [general]
            allowed = ["ls"]
            forbidden = []
        "#,
        )
        .unwrap();

        let policy = config.resolve("anyone").unwrap();
        assert_eq!(policy.warning_budget(), -1);
        assert_eq!(policy.log_level(), 0);
        assert_eq!(policy.welcome(), None);
        assert!(policy.fatal_spawn_errors());
    }

    #[test]
    fn test_empty_forbidden_list_is_not_missing() {
        let config = ConfigFile::parse(
            r#"
            [general]
            allowed = ["ls"]
            forbidden = []
        "#,
        )
        .unwrap();

        assert!(config.resolve("anyone").is_ok());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = ConfigFile::parse("allowed = [");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[general]\nallowed = [\"echo\"]\nforbidden = []\n"
        )
        .unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        let policy = config.resolve("anyone").unwrap();
        assert_eq!(policy.allowed(), ["echo"]);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let result = ConfigFile::load(Path::new("/nonexistent/agros.toml"));
        assert!(matches!(result, Err(ConfigError::Unreadable { .. })));
    }
}
