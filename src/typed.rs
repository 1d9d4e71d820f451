//! Typed view of a config store.
//!
//! Turns the string sections of a [`ConfigStore`] into a typed struct deriving
//! [`confique::Config`]. No I/O happens here. Steps:
//!
//! 1. Build a [`Node`] tree: each section becomes a nested table, `DEFAULT`
//!    keys land at the top level. Values are interpolated but stay strings.
//! 2. Deserialize the tree into `C::Layer` (all-optional fields), recording
//!    keys the layer does not consume. Each value is converted to the type
//!    the field asks for: `bool` accepts the INI booleans, numbers are parsed,
//!    strings and paths take the text as is, lists split on commas.
//! 3. In strict mode, unknown keys fail with their file and line.
//! 4. Let confique fill `#[config(default)]` values and check required fields.

use std::collections::BTreeMap;

use confique::Config;
use serde::Deserialize;
use serde::de::value::{Error as DeError, MapDeserializer, SeqDeserializer, StringDeserializer};
use serde::de::{self, IntoDeserializer, Unexpected, Visitor};
use serde::forward_to_deserialize_any;
use toml::Value;

use crate::error::AppstrapError;
use crate::ini::{DEFAULT_SECTION, Origin};
use crate::store::ConfigStore;
use crate::value::{parse_bool, parse_value};

/// Interpolated store contents, untyped.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Table(BTreeMap<String, Node>),
    /// `key` is the dotted path, used in error messages.
    Leaf { key: String, value: String },
}

impl Node {
    fn leaf(key: impl Into<String>, value: String) -> Self {
        Node::Leaf {
            key: key.into(),
            value,
        }
    }

    fn into_leaf(self, expected: &dyn de::Expected) -> Result<(String, String), DeError> {
        match self {
            Node::Leaf { key, value } => Ok((key, value)),
            Node::Table(_) => Err(de::Error::invalid_type(Unexpected::Map, expected)),
        }
    }
}

/// Build the [`Node`] tree for `store`.
pub fn to_tree(store: &ConfigStore) -> Result<Node, AppstrapError> {
    let mut root = BTreeMap::new();
    let sections = store.raw_sections();

    for entry in sections.defaults().entries() {
        let value = store.get(DEFAULT_SECTION, &entry.key)?;
        root.insert(entry.key.clone(), Node::leaf(&entry.key, value));
    }

    for section in sections.iter() {
        let mut table = BTreeMap::new();
        for entry in section.entries() {
            let value = store.get(&section.name, &entry.key)?;
            let key = format!("{}.{}", section.name, entry.key);
            table.insert(entry.key.clone(), Node::leaf(key, value));
        }
        root.insert(section.name.clone(), Node::Table(table));
    }

    Ok(Node::Table(root))
}

fn in_key(key: &str) -> impl FnOnce(DeError) -> DeError + '_ {
    move |e| de::Error::custom(format_args!("{e} in {key}"))
}

macro_rules! deserialize_parsed {
    ($($method:ident => $ty:ty, $visit:ident;)*) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
            let (key, value) = self.into_leaf(&visitor)?;
            match value.trim().parse::<$ty>() {
                Ok(n) => visitor.$visit(n),
                Err(_) => Err(de::Error::invalid_value(Unexpected::Str(&value), &visitor)),
            }
            .map_err(in_key(&key))
        }
    )*};
}

impl<'de> de::Deserializer<'de> for Node {
    type Error = DeError;

    /// Untyped targets get the same heuristic as option values.
    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self {
            Node::Table(table) => {
                let mut map: MapDeserializer<'de, _, DeError> =
                    MapDeserializer::new(table.into_iter());
                let out = visitor.visit_map(&mut map)?;
                map.end()?;
                Ok(out)
            }
            Node::Leaf { key, value } => match parse_value(&value) {
                Value::Boolean(b) => visitor.visit_bool(b),
                Value::Integer(i) => visitor.visit_i64(i),
                Value::Float(f) => visitor.visit_f64(f),
                _ => visitor.visit_string(value),
            }
            .map_err(in_key(&key)),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        let (key, value) = self.into_leaf(&visitor)?;
        match parse_bool(value.trim()) {
            Some(b) => visitor.visit_bool(b),
            None => Err(de::Error::invalid_value(Unexpected::Str(&value), &visitor)),
        }
        .map_err(in_key(&key))
    }

    deserialize_parsed! {
        deserialize_i8 => i64, visit_i64;
        deserialize_i16 => i64, visit_i64;
        deserialize_i32 => i64, visit_i64;
        deserialize_i64 => i64, visit_i64;
        deserialize_u8 => u64, visit_u64;
        deserialize_u16 => u64, visit_u64;
        deserialize_u32 => u64, visit_u64;
        deserialize_u64 => u64, visit_u64;
        deserialize_f32 => f64, visit_f64;
        deserialize_f64 => f64, visit_f64;
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        let (key, value) = self.into_leaf(&visitor)?;
        visitor.visit_string(value).map_err(in_key(&key))
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        self.deserialize_string(visitor)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        self.deserialize_string(visitor)
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        self.deserialize_string(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        let (key, value) = self.into_leaf(&visitor)?;
        let items: Vec<Node> = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Node::leaf(key.as_str(), s.to_string()))
            .collect();
        let mut seq: SeqDeserializer<_, DeError> = SeqDeserializer::new(items.into_iter());
        let out = visitor.visit_seq(&mut seq)?;
        seq.end()?;
        Ok(out)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        let (key, value) = self.into_leaf(&visitor)?;
        let variant: StringDeserializer<DeError> = value.into_deserializer();
        visitor.visit_enum(variant).map_err(in_key(&key))
    }

    forward_to_deserialize_any! {
        i128 u128 bytes byte_buf unit unit_struct tuple tuple_struct map struct ignored_any
    }
}

impl<'de> IntoDeserializer<'de, DeError> for Node {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

/// Resolve `store` into the typed config `C`.
///
/// With `strict`, keys that `C` does not define produce
/// [`AppstrapError::UnknownKeys`]; otherwise they are ignored.
pub fn resolve<C: Config>(store: &ConfigStore, strict: bool) -> Result<C, AppstrapError>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let tree = to_tree(store)?;

    let mut unknown_keys: Vec<String> = Vec::new();
    let layer: C::Layer = serde_ignored::deserialize(tree, |ignored_path| {
        unknown_keys.push(ignored_path.to_string());
    })
    .map_err(|e: DeError| AppstrapError::InvalidValue {
        key: format!("<{}>", store.name()),
        reason: e.to_string(),
    })?;

    if !unknown_keys.is_empty() {
        if strict {
            let errors = unknown_keys
                .into_iter()
                .map(|key| {
                    let origin = find_origin(store, &key);
                    AppstrapError::UnknownKey {
                        key,
                        path: origin
                            .as_ref()
                            .map(|o| o.path.clone())
                            .unwrap_or_else(|| store.default_path().to_path_buf()),
                        line: origin.map(|o| o.line).unwrap_or(0),
                    }
                })
                .collect();
            return Err(AppstrapError::UnknownKeys(errors));
        }
        tracing::debug!(config = store.name(), keys = ?unknown_keys, "ignoring unknown keys");
    }

    C::builder()
        .preloaded(layer)
        .load()
        .map_err(AppstrapError::from)
}

/// Locate where a dotted key (`section.key`, `key`, or `section`) was defined.
fn find_origin(store: &ConfigStore, dotted_key: &str) -> Option<Origin> {
    let sections = store.raw_sections();
    match dotted_key.split_once('.') {
        Some((section, key)) => sections
            .section(section)
            .and_then(|s| s.get(key))
            .map(|e| e.origin.clone()),
        None => sections
            .defaults()
            .get(dotted_key)
            .map(|e| e.origin.clone())
            .or_else(|| {
                sections
                    .section(dotted_key)
                    .and_then(|s| s.origin.clone())
            }),
    }
}
