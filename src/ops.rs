//! Config inspection: listing, key lookup, override check, and the
//! `ConfigResult` enum callers use to display results.

use std::fmt;

use crate::error::AppstrapError;
use crate::ini::DEFAULT_SECTION;
use crate::store::{self, ConfigStore};

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// All resolved `section.key` pairs.
    Listing { entries: Vec<(String, String)> },
    /// One resolved value.
    KeyValue { key: String, value: String },
    /// Outcome of the override check, one line per excess.
    Conformance {
        name: String,
        ok: bool,
        excess: Vec<String>,
    },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
            ConfigResult::KeyValue { key, value } => write!(f, "{key} = {value}"),
            ConfigResult::Conformance { name, ok, excess } => {
                if *ok {
                    return write!(f, "[{name}] overrides match the default file");
                }
                write!(f, "[{name}] overrides add {} unknown item(s):", excess.len())?;
                for line in excess {
                    write!(f, "\n  {line}")?;
                }
                Ok(())
            }
        }
    }
}

/// Every resolved value of `store`, as `section.key` pairs.
pub fn list_values(store: &ConfigStore) -> Result<ConfigResult, AppstrapError> {
    Ok(ConfigResult::Listing {
        entries: store::flatten(store)?,
    })
}

/// Resolve a dotted `section.key`. A key without a dot is looked up in
/// `DEFAULT`. Only the first dot splits, so keys may contain dots.
pub fn get_value(store: &ConfigStore, dotted_key: &str) -> Result<ConfigResult, AppstrapError> {
    let (section, key) = dotted_key
        .split_once('.')
        .unwrap_or((DEFAULT_SECTION, dotted_key));
    let value = store.get(section, key)?;
    Ok(ConfigResult::KeyValue {
        key: dotted_key.to_string(),
        value,
    })
}

/// Compare `store` against its default file.
pub fn check(store: &ConfigStore) -> Result<ConfigResult, AppstrapError> {
    let excess = store.override_report()?;
    Ok(ConfigResult::Conformance {
        name: store.name().to_string(),
        ok: excess.is_empty(),
        excess: excess.iter().map(ToString::to_string).collect(),
    })
}
