//! Logging settings, read from the `logging` config store.
//!
//! ```ini
//! [console]
//! level = info
//!
//! [file]
//! path = /var/log/myapp.log
//! max_bytes = 1048576
//! backup_count = 5
//!
//! [mail]
//! enabled = true
//! host = smtp.example.com
//! from = myapp@example.com
//! to = ops@example.com, me@example.com
//! ```

use std::path::PathBuf;

use confique::Config;
use tracing::level_filters::LevelFilter;

use crate::error::AppstrapError;
use crate::store::ConfigStore;

/// Name of the config store holding logging settings.
pub const LOGGING_CONFIG_NAME: &str = "logging";

#[derive(Config, Debug, Clone)]
pub struct LoggingSettings {
    #[config(nested)]
    pub console: ConsoleSettings,

    #[config(nested)]
    pub file: FileSettings,

    #[config(nested)]
    pub mail: MailSettings,
}

#[derive(Config, Debug, Clone)]
pub struct ConsoleSettings {
    /// Minimum level shown on the console.
    #[config(default = "info")]
    pub level: String,

    /// Colored output.
    #[config(default = true)]
    pub color: bool,
}

#[derive(Config, Debug, Clone)]
pub struct FileSettings {
    /// Log file. No file logging when unset.
    pub path: Option<PathBuf>,

    #[config(default = "debug")]
    pub level: String,

    /// Rotate once the file would grow past this size. `0` never rotates.
    #[config(default = 1048576)]
    pub max_bytes: u64,

    /// Rotated files kept as `<path>.1` .. `<path>.N`.
    #[config(default = 5)]
    pub backup_count: usize,

    /// Start every run with a fresh file.
    #[config(default = true)]
    pub rollover_on_start: bool,
}

#[derive(Config, Debug, Clone)]
pub struct MailSettings {
    #[config(default = false)]
    pub enabled: bool,

    #[config(default = "localhost")]
    pub host: String,

    #[config(default = 25)]
    pub port: u16,

    pub from: Option<String>,

    /// Comma-separated recipients.
    pub to: Option<String>,

    #[config(default = "Application error")]
    pub subject: String,

    pub username: Option<String>,

    pub password: Option<String>,

    /// Events at this level and above are mailed.
    #[config(default = "error")]
    pub level: String,
}

impl LoggingSettings {
    /// Compiled defaults only.
    pub fn defaults() -> Result<Self, AppstrapError> {
        Ok(Self::builder().load()?)
    }

    /// Settings from `store`, compiled defaults for anything it leaves out.
    /// Keys the settings do not know are ignored.
    pub fn from_store(store: &ConfigStore) -> Result<Self, AppstrapError> {
        store.load_typed(false)
    }
}

impl MailSettings {
    /// Recipients from the comma-separated `to` value.
    pub fn recipients(&self) -> Vec<String> {
        self.to
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Parse a level name. Accepts tracing names and the usual aliases
/// (`warning`, `critical`, `fatal`), case-insensitive.
pub fn parse_level(name: &str) -> Result<LevelFilter, AppstrapError> {
    let normalized = match name.trim().to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        other => other.to_string(),
    };
    normalized
        .parse()
        .map_err(|_| AppstrapError::Logging(format!("unknown log level '{name}'")))
}
