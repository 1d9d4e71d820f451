//! Parsed command-line options, seen through one small trait.
//!
//! The application context only needs to ask "is this flag set" and "what
//! directories were passed". [`OptionSource`] answers those questions for
//! any backing store; two adapters cover the usual cases:
//!
//! - [`MapOptions`]: a plain key → string map (tests, hand-rolled parsers).
//! - [`ArgOptions`]: any `Serialize` argument struct, e.g. a clap derive.
//!
//! Keys are dotted paths. A nested `#[command(flatten)]` struct shows up
//! under its field name, so `FrameworkArgs` embedded as `framework` answers
//! `framework.dry_run`. A key with no exact match falls back to the one
//! dotted key ending in it, so plain `dry_run` finds it too. When several
//! flattened structs share the field name, only the full path answers.

use std::collections::BTreeMap;

use serde::Serialize;
use toml::{Table, Value};

use crate::error::AppstrapError;
use crate::value::{display_value, parse_bool, parse_value};

/// Read-only access to parsed options.
pub trait OptionSource {
    /// Raw value of `key`, `None` if absent or unset.
    fn get(&self, key: &str) -> Option<Value>;

    /// `true` if `key` is present and truthy.
    fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Boolean(b)) => b,
            Some(Value::Integer(i)) => i != 0,
            Some(Value::String(s)) => parse_bool(&s).unwrap_or(false),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(_) => true,
            None => false,
        }
    }

    /// `key` rendered as a string.
    fn string(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| display_value(&v))
    }

    /// `key` as a list. A scalar is a one-element list, taken verbatim.
    fn strings(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items.iter().map(display_value).collect(),
            Some(other) => vec![display_value(&other)],
            None => Vec::new(),
        }
    }

    /// `key` as a string, or `default` when absent.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.string(key).unwrap_or_else(|| default.to_string())
    }
}

/// Options held in a string map. A single value is typed with
/// [`parse_value`]'s heuristic; a key given several times (a repeatable flag
/// like `-c`) is a list of strings.
#[derive(Debug, Clone, Default)]
pub struct MapOptions {
    values: BTreeMap<String, Vec<String>>,
}

impl MapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing what was there.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), vec![value.into()]);
        self
    }

    /// Append `value` to `key`.
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.entry(key.into()).or_default().push(value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapOptions {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |opts, (k, v)| opts.add(k, v))
    }
}

impl OptionSource for MapOptions {
    fn get(&self, key: &str) -> Option<Value> {
        match self.values.get(key)?.as_slice() {
            [] => None,
            [single] => Some(parse_value(single)),
            many => Some(Value::Array(
                many.iter().cloned().map(Value::String).collect(),
            )),
        }
    }
}

/// Options taken from a `Serialize` argument struct.
///
/// `None` fields are skipped; nested structs become dotted keys.
#[derive(Debug, Clone, Default)]
pub struct ArgOptions {
    values: BTreeMap<String, Value>,
}

impl ArgOptions {
    pub fn from_args<S: Serialize>(args: &S) -> Result<Self, AppstrapError> {
        let value = Value::try_from(args).map_err(|e| AppstrapError::InvalidValue {
            key: "<args>".into(),
            reason: e.to_string(),
        })?;
        let mut values = BTreeMap::new();
        match value {
            Value::Table(table) => flatten_into("", table, &mut values),
            other => {
                return Err(AppstrapError::InvalidValue {
                    key: "<args>".into(),
                    reason: format!("expected a struct, got {}", other.type_str()),
                });
            }
        }
        Ok(Self { values })
    }

    /// Every dotted key this source holds.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

fn flatten_into(prefix: &str, table: Table, out: &mut BTreeMap<String, Value>) {
    for (key, value) in table {
        let dotted = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Table(sub) => flatten_into(&dotted, sub, out),
            leaf => {
                out.insert(dotted, leaf);
            }
        }
    }
}

impl OptionSource for ArgOptions {
    fn get(&self, key: &str) -> Option<Value> {
        if let Some(v) = self.values.get(key) {
            return Some(v.clone());
        }
        let suffix = format!(".{key}");
        let mut matches = self.values.iter().filter(|(k, _)| k.ends_with(&suffix));
        match (matches.next(), matches.next()) {
            (Some((_, v)), None) => Some(v.clone()),
            (Some((first, _)), Some((second, _))) => {
                tracing::debug!(key, first, second, "ambiguous option key, use the full path");
                None
            }
            (None, _) => None,
        }
    }
}
