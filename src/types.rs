//! Shared value types: where to look for config files, and the inspection
//! actions the `config` subcommand maps to.
//!
//! # Search path ordering
//!
//! Search paths are listed **highest priority first**. The first directory
//! that holds `<name>.default` provides the baseline; every directory holding
//! `<name>.cfg` contributes overrides, and when two of them set the same key
//! the one listed earlier wins.
//!
//! ```text
//! [ -c ./ops-config,          ← highest: command line
//!   Home(".config"),          ← per-user overrides
//!   ExeDir("config") ]        ← shipped next to the binary (defaults live here)
//! ```

use std::path::PathBuf;

/// Where to search for config files.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory for the app (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".config")`.
    Home(&'static str),
    /// A subdirectory next to the running executable, e.g. `ExeDir("config")`.
    ExeDir(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit path.
    Path(PathBuf),
}

impl SearchPath {
    /// The framework's default search path: `~/.config`, then `config/` next
    /// to the executable.
    pub fn defaults() -> Vec<SearchPath> {
        vec![SearchPath::Home(".config"), SearchPath::ExeDir("config")]
    }
}

/// A config inspection operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
///
/// `name` selects a loaded config; `None` means the application's default one.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Print every `section.key = value` of a config.
    List { name: Option<String> },
    /// Print one value, addressed as `section.key`.
    Get { name: Option<String>, key: String },
    /// Report whether user overrides only touch keys the default defines.
    Check { name: Option<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_home_then_exe_dir() {
        assert_eq!(
            SearchPath::defaults(),
            vec![SearchPath::Home(".config"), SearchPath::ExeDir("config")]
        );
    }
}
