use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppstrapError {
    #[error("[{name}] Couldn't find default config file")]
    ConfigNotFound { name: String },

    #[error("Config name must not be empty")]
    InvalidName,

    #[error("Failed to parse {path} (line {line}): {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("[{name}] Couldn't clean section '{section}'")]
    CorruptStore { name: String, section: String },

    #[error("No section '{0}'")]
    NoSection(String),

    #[error("No option '{key}' in section '{section}'")]
    NoOption { section: String, key: String },

    #[error("Bad value substitution for '{key}' in section '{section}': '{reference}' is not defined")]
    InterpolationMissing {
        section: String,
        key: String,
        reference: String,
    },

    #[error("Bad interpolation syntax for '{key}' in section '{section}': {reason}")]
    InterpolationSyntax {
        section: String,
        key: String,
        reason: String,
    },

    #[error("Interpolation too deep for '{key}' in section '{section}'")]
    InterpolationDepth { section: String, key: String },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in config")]
    UnknownKeys(Vec<AppstrapError>),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] confique::Error),

    #[error("Config options must be valid folders. {0} is not")]
    NotADirectory(PathBuf),

    #[error("No default configuration loaded: call .config_default() on the builder or pass --name")]
    NoDefaultConfig,

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Mail delivery failed: {0}")]
    Mail(String),
}
