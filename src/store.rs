//! The layered config store.
//!
//! A [`ConfigStore`] owns one logical configuration: a mandatory
//! `<name>.default` file and any number of `<name>.cfg` overrides found along
//! a search path.
//!
//! ```text
//! search path (first = highest priority)
//!   /home/u/.config      name.cfg            ← applied last, wins
//!   /opt/app/config      name.default        ← baseline (first dir that has one)
//!                        name.cfg            ← applied first
//! ```
//!
//! Overrides may change any value. They may also add sections or keys the
//! default does not know; that is accepted at load time and reported by
//! [`ConfigStore::check_override_all`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use confique::Config;
use serde::Deserialize;

use crate::error::AppstrapError;
use crate::ini::{self, DEFAULT_SECTION, Sections};
use crate::interpolate::interpolate;
use crate::merge::merge;
use crate::search;
use crate::typed;
use crate::validate::{self, Excess};
use crate::value::parse_bool;

/// Extension of user override files.
pub const DEFAULT_CFG_EXT: &str = ".cfg";
/// Extension of the mandatory default file.
pub const DEFAULT_DEFAULT_EXT: &str = ".default";

/// Merged view of one default file and its overrides.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    name: String,
    cfg_file_name: String,
    search_path: Vec<PathBuf>,
    default_path: PathBuf,
    sections: Sections,
}

impl ConfigStore {
    /// Open `name` using the standard `.cfg` / `.default` extensions.
    ///
    /// `search_path` is highest priority first. Pass `[dir]` for a single
    /// directory.
    pub fn open<I, P>(name: &str, search_path: I) -> Result<Self, AppstrapError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::open_with(name, search_path, DEFAULT_CFG_EXT, DEFAULT_DEFAULT_EXT)
    }

    /// Open `name` with custom file extensions.
    ///
    /// Fails with [`AppstrapError::ConfigNotFound`] if no search path entry
    /// holds `<name><default_ext>`. Loads everything before returning.
    pub fn open_with<I, P>(
        name: &str,
        search_path: I,
        cfg_ext: &str,
        default_ext: &str,
    ) -> Result<Self, AppstrapError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        if name.is_empty() {
            return Err(AppstrapError::InvalidName);
        }

        let search_path = search::dedup_paths(search_path);
        let default_file_name = format!("{name}{default_ext}");

        tracing::debug!(config = name, "find and load default cfg file");
        let found = search::find_first(&search_path, &default_file_name).ok_or_else(|| {
            AppstrapError::ConfigNotFound {
                name: name.to_string(),
            }
        })?;
        let default_path = std::path::absolute(&found).unwrap_or(found);
        tracing::debug!(config = name, default_path = %default_path.display(), "default file located");

        let mut store = Self {
            name: name.to_string(),
            cfg_file_name: format!("{name}{cfg_ext}"),
            search_path,
            default_path,
            sections: Sections::new(),
        };
        store.reload()?;
        Ok(store)
    }

    /// Re-read the default file and every override, replacing the current
    /// state.
    ///
    /// The new state is built completely before it replaces the old one, so a
    /// parse error leaves the store as it was.
    pub fn reload(&mut self) -> Result<(), AppstrapError> {
        let mut fresh = self.read_default()?;

        tracing::debug!(config = %self.name, "find and load user cfg files");
        for (path, content) in search::load_overrides(&self.search_path, &self.cfg_file_name)? {
            tracing::info!(config = %self.name, file = %path.display(), "load override file");
            fresh = merge(fresh, ini::parse(&content, &path)?);
        }

        self.clear()?;
        self.sections = fresh;
        tracing::debug!(config = %self.name, "done reload");
        Ok(())
    }

    fn read_default(&self) -> Result<Sections, AppstrapError> {
        let content = search::read_file(&self.default_path)?;
        ini::parse(&content, &self.default_path)
    }

    fn clear(&mut self) -> Result<(), AppstrapError> {
        tracing::debug!(config = %self.name, "clean config");
        let names: Vec<String> = self.sections.names().into_iter().map(String::from).collect();
        for section in names {
            if !self.sections.remove_section(&section) {
                return Err(AppstrapError::CorruptStore {
                    name: self.name.clone(),
                    section,
                });
            }
        }
        self.sections.clear_defaults();
        Ok(())
    }

    /// `true` if user overrides only change keys the default file defines.
    ///
    /// Each excess section or key is logged as a warning.
    pub fn check_override_all(&self) -> Result<bool, AppstrapError> {
        let excess = self.override_report()?;
        for e in &excess {
            tracing::warn!(config = %self.name, "{e}");
        }
        Ok(excess.is_empty())
    }

    /// Every section and key present now but absent from the default file.
    pub fn override_report(&self) -> Result<Vec<Excess>, AppstrapError> {
        let reference = self.read_default()?;
        Ok(validate::find_excess(&self.sections, &reference))
    }

    /// `(key, value)` pairs of `section`, values interpolated.
    ///
    /// With `with_default`, everything visible in the section is returned,
    /// including keys inherited from `DEFAULT`. Without it, pairs whose
    /// interpolated value equals the interpolated `DEFAULT` value of the same
    /// key are left out. Order is not part of the contract.
    pub fn items(
        &self,
        section: &str,
        with_default: bool,
    ) -> Result<Vec<(String, String)>, AppstrapError> {
        let visible = self
            .sections
            .visible(section)
            .ok_or_else(|| AppstrapError::NoSection(section.to_string()))?;

        let defaults = self.sections.defaults();
        let mut out = Vec::with_capacity(visible.len());
        for entry in visible {
            let value = self.get(section, &entry.key)?;
            if !with_default && defaults.get(&entry.key).is_some() {
                // compared after interpolation: the section may shadow a
                // key the value refers to
                let inherited = self.get(DEFAULT_SECTION, &entry.key).ok();
                if inherited.as_ref() == Some(&value) {
                    continue;
                }
            }
            out.push((entry.key.clone(), value));
        }
        Ok(out)
    }

    /// Interpolated value of `key` in `section` (or `DEFAULT`).
    pub fn get(&self, section: &str, key: &str) -> Result<String, AppstrapError> {
        let key = key.to_lowercase();
        let raw = self.get_raw(section, &key)?;
        interpolate(section, &key, &raw, |reference| {
            self.sections
                .lookup(section, reference)
                .map(|e| e.value.as_str())
        })
    }

    /// Value of `key` in `section` without interpolation.
    pub fn get_raw(&self, section: &str, key: &str) -> Result<String, AppstrapError> {
        if self.sections.lookup_section(section).is_none() {
            return Err(AppstrapError::NoSection(section.to_string()));
        }
        let key = key.to_lowercase();
        self.sections
            .lookup(section, &key)
            .map(|e| e.value.clone())
            .ok_or_else(|| AppstrapError::NoOption {
                section: section.to_string(),
                key,
            })
    }

    pub fn get_int(&self, section: &str, key: &str) -> Result<i64, AppstrapError> {
        let value = self.get(section, key)?;
        value.parse().map_err(|e: std::num::ParseIntError| AppstrapError::InvalidValue {
            key: format!("{section}.{key}"),
            reason: e.to_string(),
        })
    }

    pub fn get_float(&self, section: &str, key: &str) -> Result<f64, AppstrapError> {
        let value = self.get(section, key)?;
        value.parse().map_err(|e: std::num::ParseFloatError| AppstrapError::InvalidValue {
            key: format!("{section}.{key}"),
            reason: e.to_string(),
        })
    }

    /// Boolean value: `1/yes/true/on` or `0/no/false/off`, case-insensitive.
    pub fn get_bool(&self, section: &str, key: &str) -> Result<bool, AppstrapError> {
        let value = self.get(section, key)?;
        parse_bool(&value).ok_or_else(|| AppstrapError::InvalidValue {
            key: format!("{section}.{key}"),
            reason: format!("not a boolean: {value:?}"),
        })
    }

    /// Section names, excluding `DEFAULT`.
    pub fn sections(&self) -> Vec<&str> {
        self.sections.names()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.has_section(section)
    }

    pub fn has_option(&self, section: &str, key: &str) -> bool {
        self.sections.lookup_section(section).is_some()
            && self.sections.lookup(section, &key.to_lowercase()).is_some()
    }

    /// Keys visible in `section`, inherited `DEFAULT` keys included.
    pub fn options(&self, section: &str) -> Result<Vec<&str>, AppstrapError> {
        self.sections
            .visible(section)
            .map(|entries| entries.into_iter().map(|e| e.key.as_str()).collect())
            .ok_or_else(|| AppstrapError::NoSection(section.to_string()))
    }

    /// The raw `DEFAULT` section as a key → value map.
    pub fn defaults(&self) -> BTreeMap<String, String> {
        self.sections
            .defaults()
            .entries()
            .iter()
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect()
    }

    /// Drop a section from the live state. Files are untouched.
    pub fn remove_section(&mut self, section: &str) -> bool {
        self.sections.remove_section(section)
    }

    /// Drop one key from the live state. Files are untouched.
    pub fn remove_option(&mut self, section: &str, key: &str) -> Result<bool, AppstrapError> {
        let sect = self
            .sections
            .section_mut(section)
            .ok_or_else(|| AppstrapError::NoSection(section.to_string()))?;
        Ok(sect.remove(&key.to_lowercase()))
    }

    /// Resolve this store into a typed [`confique::Config`] struct.
    ///
    /// See [`typed`](crate::typed) for how sections map to fields.
    pub fn load_typed<C: Config>(&self, strict: bool) -> Result<C, AppstrapError>
    where
        C::Layer: for<'de> Deserialize<'de>,
    {
        typed::resolve(self, strict)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    /// The deduplicated search path, highest priority first.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    pub(crate) fn raw_sections(&self) -> &Sections {
        &self.sections
    }
}

impl fmt::Display for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sections)
    }
}

/// `section.key` → value for every own key of every section (and `DEFAULT`),
/// values interpolated. Used for listings.
pub fn flatten(store: &ConfigStore) -> Result<Vec<(String, String)>, AppstrapError> {
    let sections = store.raw_sections();
    let mut out = Vec::new();
    for entry in sections.defaults().entries() {
        out.push((
            format!("{DEFAULT_SECTION}.{}", entry.key),
            store.get(DEFAULT_SECTION, &entry.key)?,
        ));
    }
    for section in sections.iter() {
        for entry in section.entries() {
            out.push((
                format!("{}.{}", section.name, entry.key),
                store.get(&section.name, &entry.key)?,
            ));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{myconfig_layout, write_config};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_default_is_config_not_found() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "other.default", "[s]\n");
        let err = ConfigStore::open("absent", [dir.path()]).unwrap_err();
        match err {
            AppstrapError::ConfigNotFound { name } => assert_eq!(name, "absent"),
            other => panic!("Expected ConfigNotFound, got {other:?}"),
        }
    }

    #[test]
    fn cfg_without_default_is_config_not_found() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "app.cfg", "[s]\nk = v\n");
        assert!(matches!(
            ConfigStore::open("app", [dir.path()]),
            Err(AppstrapError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn empty_name_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            ConfigStore::open("", [dir.path()]),
            Err(AppstrapError::InvalidName)
        ));
    }

    #[test]
    fn override_changes_only_its_key() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "app.default", "[S]\na = 1\nb = 2\n");
        write_config(dir.path(), "app.cfg", "[S]\na = 9\n");
        let store = ConfigStore::open("app", [dir.path()]).unwrap();
        assert_eq!(store.get("S", "a").unwrap(), "9");
        assert_eq!(store.get("S", "b").unwrap(), "2");
    }

    #[test]
    fn highest_priority_override_wins() {
        let d1 = TempDir::new().unwrap();
        let d2 = TempDir::new().unwrap();
        write_config(d2.path(), "app.default", "[S]\nk = default\n");
        write_config(d1.path(), "app.cfg", "[S]\nk = from_d1\n");
        write_config(d2.path(), "app.cfg", "[S]\nk = from_d2\n");

        let store = ConfigStore::open("app", [d1.path(), d2.path()]).unwrap();
        assert_eq!(store.get("S", "k").unwrap(), "from_d1");

        let reversed = ConfigStore::open("app", [d2.path(), d1.path()]).unwrap();
        assert_eq!(reversed.get("S", "k").unwrap(), "from_d2");
    }

    #[test]
    fn first_default_on_path_is_used() {
        let d1 = TempDir::new().unwrap();
        let d2 = TempDir::new().unwrap();
        write_config(d1.path(), "app.default", "[S]\nk = d1\n");
        write_config(d2.path(), "app.default", "[S]\nk = d2\n");
        let store = ConfigStore::open("app", [d2.path(), d1.path()]).unwrap();
        assert_eq!(store.get("S", "k").unwrap(), "d2");
        assert_eq!(store.default_path(), d2.path().join("app.default"));
    }

    #[test]
    fn duplicate_search_entries_keep_first_position() {
        let d1 = TempDir::new().unwrap();
        let d2 = TempDir::new().unwrap();
        write_config(d1.path(), "app.default", "[S]\nk = default\n");
        write_config(d1.path(), "app.cfg", "[S]\nk = d1\n");
        write_config(d2.path(), "app.cfg", "[S]\nk = d2\n");

        let store = ConfigStore::open("app", [d1.path(), d2.path(), d1.path()]).unwrap();
        assert_eq!(store.search_path(), &[d1.path().to_path_buf(), d2.path().to_path_buf()]);
        assert_eq!(store.get("S", "k").unwrap(), "d1");
    }

    #[test]
    fn custom_extensions() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "app.ini.dist", "[s]\nk = base\n");
        write_config(dir.path(), "app.ini", "[s]\nk = user\n");
        let store = ConfigStore::open_with("app", [dir.path()], ".ini", ".ini.dist").unwrap();
        assert_eq!(store.get("s", "k").unwrap(), "user");
    }

    #[test]
    fn myconfig_scenario_values() {
        let layout = myconfig_layout();
        let store = layout.open();
        assert_eq!(store.get("section1", "opt_11").unwrap(), "val_11_user");
        assert_eq!(store.get("section1", "opt_12").unwrap(), "val_12_default");
        assert_eq!(store.get("section2", "opt_21").unwrap(), "val_21_user");
    }

    #[test]
    fn myconfig_scenario_display() {
        let layout = myconfig_layout();
        let store = layout.open();
        let expected = "[section1]
opt_11 = val_11_user
opt_12 = val_12_default
opt_13 = val_13_fail

[section2]
opt_21 = val_21_user
opt_22 = val_22_user

[section3_fail]
opt_3 = val_3

";
        assert_eq!(store.to_string(), expected);
    }

    #[test]
    fn myconfig_scenario_check_override() {
        let layout = myconfig_layout();
        let mut store = layout.open();
        assert!(!store.check_override_all().unwrap());

        assert!(store.remove_section("section3_fail"));
        assert!(!store.check_override_all().unwrap());

        assert!(store.remove_option("section1", "opt_13").unwrap());
        assert!(store.check_override_all().unwrap());
    }

    #[test]
    fn check_override_does_not_mutate() {
        let layout = myconfig_layout();
        let store = layout.open();
        let before = store.to_string();
        let _ = store.check_override_all().unwrap();
        let _ = store.override_report().unwrap();
        assert_eq!(store.to_string(), before);
    }

    #[test]
    fn override_report_lists_every_excess() {
        let layout = myconfig_layout();
        let store = layout.open();
        let report = store.override_report().unwrap();
        assert_eq!(report.len(), 2);
        assert!(report.iter().any(|e| matches!(e, Excess::Section { section, .. } if section == "section3_fail")));
        assert!(report.iter().any(|e| matches!(e, Excess::Key { key, .. } if key == "opt_13")));
    }

    #[test]
    fn reload_is_idempotent() {
        let layout = myconfig_layout();
        let mut store = layout.open();
        store.reload().unwrap();
        let first = store.to_string();
        store.reload().unwrap();
        assert_eq!(store.to_string(), first);
    }

    #[test]
    fn reload_restores_removed_sections() {
        let layout = myconfig_layout();
        let mut store = layout.open();
        store.remove_section("section3_fail");
        store.reload().unwrap();
        assert!(store.has_section("section3_fail"));
    }

    #[test]
    fn reload_picks_up_file_changes() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "app.default", "[s]\nk = 1\n");
        let mut store = ConfigStore::open("app", [dir.path()]).unwrap();
        write_config(dir.path(), "app.cfg", "[s]\nk = 2\n");
        store.reload().unwrap();
        assert_eq!(store.get("s", "k").unwrap(), "2");
    }

    #[test]
    fn broken_default_is_parse_error() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "app.default", "[s]\nnot an option\n");
        match ConfigStore::open("app", [dir.path()]).unwrap_err() {
            AppstrapError::Parse { path, line, .. } => {
                assert!(path.ends_with("app.default"));
                assert_eq!(line, 2);
            }
            other => panic!("Expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn broken_override_is_fatal_and_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "app.default", "[s]\nk = 1\n");
        let mut store = ConfigStore::open("app", [dir.path()]).unwrap();

        write_config(dir.path(), "app.cfg", "[s]\nk = 2\n[s]\n");
        let err = store.reload().unwrap_err();
        assert!(matches!(err, AppstrapError::Parse { .. }));
        assert_eq!(store.get("s", "k").unwrap(), "1");
    }

    #[test]
    fn new_sections_accepted_at_load() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "app.default", "[s]\nk = 1\n");
        write_config(dir.path(), "app.cfg", "[extra]\nx = 1\n");
        let store = ConfigStore::open("app", [dir.path()]).unwrap();
        assert_eq!(store.get("extra", "x").unwrap(), "1");
        assert!(!store.check_override_all().unwrap());
    }

    #[test]
    fn round_trip_through_display() {
        let layout = myconfig_layout();
        let store = layout.open();
        let reparsed = ini::parse(&store.to_string(), Path::new("roundtrip")).unwrap();
        for section in store.sections() {
            let mut a = store.items(section, false).unwrap();
            let mut b: Vec<(String, String)> = reparsed
                .section(section)
                .unwrap()
                .entries()
                .iter()
                .map(|e| (e.key.clone(), e.value.clone()))
                .collect();
            a.sort();
            b.sort();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn items_with_and_without_default() {
        let dir = TempDir::new().unwrap();
        write_config(
            dir.path(),
            "app.default",
            "[DEFAULT]\nshared = g\nsame = g\n[s]\nown = 1\nsame = g\n",
        );
        let store = ConfigStore::open("app", [dir.path()]).unwrap();

        let mut with = store.items("s", true).unwrap();
        with.sort();
        assert_eq!(
            with,
            vec![
                ("own".to_string(), "1".to_string()),
                ("same".to_string(), "g".to_string()),
                ("shared".to_string(), "g".to_string()),
            ]
        );

        let without = store.items("s", false).unwrap();
        assert_eq!(without, vec![("own".to_string(), "1".to_string())]);
    }

    #[test]
    fn items_keeps_shadowed_values() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "app.default", "[DEFAULT]\nk = global\n[s]\nk = local\n");
        let store = ConfigStore::open("app", [dir.path()]).unwrap();
        assert_eq!(
            store.items("s", false).unwrap(),
            vec![("k".to_string(), "local".to_string())]
        );
    }

    #[test]
    fn items_keeps_value_that_expands_differently() {
        let dir = TempDir::new().unwrap();
        write_config(
            dir.path(),
            "app.default",
            "[DEFAULT]\nx = 1\nk = %(x)s\n[s]\nx = 2\nk = %(x)s\n",
        );
        let store = ConfigStore::open("app", [dir.path()]).unwrap();
        let mut without = store.items("s", false).unwrap();
        without.sort();
        assert_eq!(
            without,
            vec![
                ("k".to_string(), "2".to_string()),
                ("x".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn items_unknown_section() {
        let layout = myconfig_layout();
        let store = layout.open();
        assert!(matches!(
            store.items("nope", true),
            Err(AppstrapError::NoSection(_))
        ));
    }

    #[test]
    fn get_interpolates_and_get_raw_does_not() {
        let dir = TempDir::new().unwrap();
        write_config(
            dir.path(),
            "app.default",
            "[DEFAULT]\nroot = /srv\n[paths]\ndata = %(root)s/data\n",
        );
        let store = ConfigStore::open("app", [dir.path()]).unwrap();
        assert_eq!(store.get("paths", "data").unwrap(), "/srv/data");
        assert_eq!(store.get_raw("paths", "data").unwrap(), "%(root)s/data");
    }

    #[test]
    fn override_of_referenced_key_changes_interpolation() {
        let dir = TempDir::new().unwrap();
        write_config(
            dir.path(),
            "app.default",
            "[DEFAULT]\nroot = /srv\n[paths]\ndata = %(root)s/data\n",
        );
        write_config(dir.path(), "app.cfg", "[DEFAULT]\nroot = /home/me\n");
        let store = ConfigStore::open("app", [dir.path()]).unwrap();
        assert_eq!(store.get("paths", "data").unwrap(), "/home/me/data");
    }

    #[test]
    fn typed_getters() {
        let dir = TempDir::new().unwrap();
        write_config(
            dir.path(),
            "app.default",
            "[s]\nport = 8080\nratio = 0.5\nflag = Yes\nbad = x\n",
        );
        let store = ConfigStore::open("app", [dir.path()]).unwrap();
        assert_eq!(store.get_int("s", "port").unwrap(), 8080);
        assert_eq!(store.get_float("s", "ratio").unwrap(), 0.5);
        assert!(store.get_bool("s", "flag").unwrap());
        assert!(matches!(
            store.get_int("s", "bad"),
            Err(AppstrapError::InvalidValue { .. })
        ));
        assert!(matches!(
            store.get_bool("s", "bad"),
            Err(AppstrapError::InvalidValue { .. })
        ));
    }

    #[test]
    fn lookup_errors() {
        let layout = myconfig_layout();
        let store = layout.open();
        assert!(matches!(
            store.get("nope", "k"),
            Err(AppstrapError::NoSection(_))
        ));
        assert!(matches!(
            store.get("section1", "nope"),
            Err(AppstrapError::NoOption { .. })
        ));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let layout = myconfig_layout();
        let store = layout.open();
        assert_eq!(store.get("section1", "OPT_11").unwrap(), "val_11_user");
        assert!(store.has_option("section1", "Opt_12"));
    }

    #[test]
    fn defaults_map_and_options() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "app.default", "[DEFAULT]\ng = 1\n[s]\na = 2\n");
        let store = ConfigStore::open("app", [dir.path()]).unwrap();
        assert_eq!(store.defaults().get("g").map(String::as_str), Some("1"));
        assert_eq!(store.options("s").unwrap(), vec!["a", "g"]);
        assert_eq!(store.get("DEFAULT", "g").unwrap(), "1");
    }

    #[test]
    fn flatten_lists_dotted_keys() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "app.default", "[DEFAULT]\ng = 1\n[s]\na = %(g)s2\n");
        let store = ConfigStore::open("app", [dir.path()]).unwrap();
        assert_eq!(
            flatten(&store).unwrap(),
            vec![
                ("DEFAULT.g".to_string(), "1".to_string()),
                ("s.a".to_string(), "12".to_string()),
            ]
        );
    }

    #[test]
    fn default_path_is_absolute() {
        let layout = myconfig_layout();
        let store = layout.open();
        assert!(store.default_path().is_absolute());
        assert!(fs::metadata(store.default_path()).is_ok());
    }
}
