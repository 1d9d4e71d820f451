//! Clap adapter.
//!
//! Compiled only with the `clap` Cargo feature (on by default). Two pieces:
//!
//! - [`FrameworkArgs`]: the flags every appstrap application reserves
//!   (`--dry-run`, `-v`, `-c DIR`). Flatten it into your parser.
//! - [`ConfigArgs`]: a `config list|get|check` subcommand group. Its only
//!   bridge to the core is [`ConfigArgs::into_action()`], which yields a
//!   framework-agnostic [`ConfigAction`](crate::ConfigAction).
//!
//! ```ignore
//! #[derive(Parser, Serialize)]
//! struct Cli {
//!     #[command(flatten)]
//!     framework: FrameworkArgs,
//!     #[command(subcommand)]
//!     #[serde(skip)]
//!     command: Option<Commands>,
//! }
//! ```

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::types::ConfigAction;

/// Flags reserved by the framework.
#[derive(Debug, Clone, Default, Args, Serialize)]
pub struct FrameworkArgs {
    /// Run without side effects: email logging is disabled.
    #[arg(long = "dry-run", alias = "dry_run")]
    pub dry_run: bool,

    /// Log debug output on the console.
    #[arg(short, long)]
    pub verbose: bool,

    /// Extra config directory, searched before the defaults. Repeatable;
    /// earlier entries win.
    #[arg(short = 'c', long = "config", value_name = "DIR", value_parser = existing_dir)]
    pub config: Vec<PathBuf>,
}

fn existing_dir(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("Config options must be valid folders. {s} is not"))
    }
}

/// Clap-derived args for the `config` subcommand group.
///
/// ```ignore
/// #[derive(Subcommand)]
/// enum Commands {
///     Config(ConfigArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config to inspect (defaults to the application's own).
    #[arg(long, global = true)]
    pub name: Option<String>,

    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

/// Available config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show every resolved `section.key = value`.
    List,
    /// Show one resolved value.
    Get {
        /// Dotted key path (e.g. "section1.opt_11").
        key: String,
    },
    /// Check that user overrides only change keys the default defines.
    Check,
}

impl ConfigArgs {
    /// Bare `config` and `config list` both map to `ConfigAction::List`.
    pub fn into_action(self) -> ConfigAction {
        let name = self.name;
        match self.action {
            None | Some(ConfigSubcommand::List) => ConfigAction::List { name },
            Some(ConfigSubcommand::Get { key }) => ConfigAction::Get { name, key },
            Some(ConfigSubcommand::Check) => ConfigAction::Check { name },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        framework: FrameworkArgs,
    }

    #[derive(Debug, Parser)]
    struct TestConfigCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    fn framework(args: &[&str]) -> FrameworkArgs {
        TestCli::try_parse_from(args).unwrap().framework
    }

    fn action(args: &[&str]) -> ConfigAction {
        TestConfigCli::try_parse_from(args)
            .unwrap()
            .config
            .into_action()
    }

    #[test]
    fn flags_default_off() {
        let args = framework(&["test"]);
        assert!(!args.dry_run);
        assert!(!args.verbose);
        assert!(args.config.is_empty());
    }

    #[test]
    fn dry_run_accepts_both_spellings() {
        assert!(framework(&["test", "--dry-run"]).dry_run);
        assert!(framework(&["test", "--dry_run"]).dry_run);
    }

    #[test]
    fn verbose_short_and_long() {
        assert!(framework(&["test", "-v"]).verbose);
        assert!(framework(&["test", "--verbose"]).verbose);
    }

    #[test]
    fn config_dirs_keep_order() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let a_str = a.path().to_str().unwrap();
        let b_str = b.path().to_str().unwrap();
        let args = framework(&["test", "-c", b_str, "--config", a_str]);
        assert_eq!(args.config, vec![b.path().to_path_buf(), a.path().to_path_buf()]);
    }

    #[test]
    fn config_must_be_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(TestCli::try_parse_from(["test", "-c", file.to_str().unwrap()]).is_err());
        assert!(TestCli::try_parse_from(["test", "-c", "/definitely/not/here"]).is_err());
    }

    #[test]
    fn bare_config_is_list() {
        assert_eq!(action(&["test"]), ConfigAction::List { name: None });
    }

    #[test]
    fn parse_list_with_name() {
        assert_eq!(
            action(&["test", "list", "--name", "logging"]),
            ConfigAction::List {
                name: Some("logging".into())
            }
        );
    }

    #[test]
    fn parse_get() {
        assert_eq!(
            action(&["test", "get", "section1.opt_11"]),
            ConfigAction::Get {
                name: None,
                key: "section1.opt_11".into(),
            }
        );
    }

    #[test]
    fn parse_check() {
        assert_eq!(
            action(&["test", "--name", "myconfig", "check"]),
            ConfigAction::Check {
                name: Some("myconfig".into())
            }
        );
    }

    #[test]
    fn invalid_subcommand_errors() {
        assert!(TestConfigCli::try_parse_from(["test", "nope"]).is_err());
    }

    #[test]
    fn get_requires_key() {
        assert!(TestConfigCli::try_parse_from(["test", "get"]).is_err());
    }
}
