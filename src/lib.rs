//! Convention-over-configuration bootstrap for Rust applications: layered
//! INI configuration, logging, and the command-line flags every tool ends up
//! needing.
//!
//! ```ignore
//! let mut ctx = AppContext::builder()
//!     .config_default("myapp")
//!     .options(&ArgOptions::from_args(&cli)?)?
//!     .build()?;
//! let port = ctx.default_config().unwrap().get_int("server", "port")?;
//! ```
//!
//! That call resolves the search path, starts logging from `logging.default`
//! (or compiled defaults), and opens every `*.default` file it finds, each
//! merged with its `*.cfg` overrides.
//!
//! # Default files and overrides
//!
//! A config named `myapp` is one mandatory `myapp.default` plus any number
//! of optional `myapp.cfg` files:
//!
//! ```text
//! search path (first = highest priority)
//!   -c ./ops            myapp.cfg        ← applied last, wins
//!   ~/.config           myapp.cfg
//!   <exe dir>/config    myapp.default    ← baseline (first dir that has one)
//!                       myapp.cfg        ← applied first
//! ```
//!
//! The default file ships with the application and defines every section
//! and key. Override files change values. They may also add sections or keys
//! the default does not know: that is accepted at load time and reported by
//! [`ConfigStore::check_override_all`], which lists each excess item with the
//! file and line that introduced it.
//!
//! The search path is deduplicated keeping the first occurrence, so listing a
//! directory twice never changes its priority.
//!
//! # File format
//!
//! Files use the familiar INI dialect: `[section]` headers, `key = value`
//! or `key: value` options, `#`/`;` comments, indented continuation lines.
//! Keys are case-insensitive. A `[DEFAULT]` section provides values visible
//! in every section, and `%(key)s` expands to another value of the same
//! section (or `DEFAULT`):
//!
//! ```ini
//! [DEFAULT]
//! root = /srv/myapp
//!
//! [storage]
//! data = %(root)s/data
//! ```
//!
//! # Typed access
//!
//! Besides string lookups ([`get`](ConfigStore::get),
//! [`get_int`](ConfigStore::get_int), [`get_bool`](ConfigStore::get_bool)),
//! a store converts into any struct deriving [`confique::Config`] through
//! [`load_typed`](ConfigStore::load_typed). Sections map to
//! `#[config(nested)]` fields and `DEFAULT` keys to top-level fields.
//! `#[config(default)]` fills what the files leave out. In strict mode,
//! keys the struct does not define fail with file and line:
//!
//! ```text
//! Unknown key 'server.typo' in /home/user/.config/myapp.cfg (line 5)
//! ```
//!
//! INI values carry no type, so each one is converted to the type its field
//! declares: `bool` fields accept `1/yes/true/on` and `0/no/false/off`,
//! numeric fields are parsed, string and path fields take the text as is,
//! and `Vec` fields split on commas.
//!
//! # Logging
//!
//! The `logging` config drives a [`LoggingContext`]:
//!
//! - **console**: warnings and errors on stderr, the rest on stdout. The
//!   `APPSTRAP_LOG` environment variable replaces the configured level with
//!   any `EnvFilter` directive.
//! - **file**: a size-rotated file, rolled over at start by default.
//! - **mail**: events at or above a level are mailed through a [`Mailer`]
//!   (SMTP with the `mail` feature). Delivery failures never reach the
//!   application.
//!
//! Nothing is installed when the crate is loaded. The context is scoped:
//! dropping it removes the sinks again.
//!
//! # Command line
//!
//! The framework reserves three flags, available as the clap
//! [`FrameworkArgs`] struct (feature `clap`, on by default):
//!
//! | Flag | Effect |
//! |------|--------|
//! | `--dry-run` | disable email logging |
//! | `-v`, `--verbose` | debug output on the console |
//! | `-c DIR`, `--config DIR` | search `DIR` first (repeatable, must exist) |
//!
//! The builder reads them through the [`OptionSource`] trait, so any parser
//! works: [`ArgOptions`] adapts a `Serialize` argument struct, [`MapOptions`]
//! a plain map. [`ConfigArgs`] adds `config list|get|check` subcommands,
//! answered by [`AppContext::handle`].
//!
//! # Error handling
//!
//! All fallible operations return [`AppstrapError`]. Parse errors carry
//! the file and line; unknown keys list where they were defined. See the
//! [`error`] module for the full set.

pub mod error;
pub mod logging;
pub mod types;

mod app;
#[cfg(feature = "clap")]
mod cli;
mod ini;
mod interpolate;
pub(crate) mod merge;
mod ops;
mod options;
mod search;
mod store;
mod typed;
mod validate;
mod value;

#[cfg(test)]
mod fixtures;

pub use app::{AppContext, AppContextBuilder, Application};
#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigSubcommand, FrameworkArgs};
pub use error::AppstrapError;
pub use ini::{DEFAULT_SECTION, Origin};
pub use logging::{LoggingContext, LoggingSettings, Mailer};
pub use ops::ConfigResult;
pub use options::{ArgOptions, MapOptions, OptionSource};
pub use store::{ConfigStore, DEFAULT_CFG_EXT, DEFAULT_DEFAULT_EXT};
pub use types::{ConfigAction, SearchPath};
pub use validate::Excess;
