//! INI document model, parser and writer.
//!
//! A [`Sections`] value is an ordered list of named [`Section`]s plus the
//! reserved `DEFAULT` section, whose keys are visible in every other section
//! unless shadowed. Every [`Entry`] remembers the file and line it was read
//! from, so later checks can point the user at the exact spot that introduced
//! a key.
//!
//! # Syntax
//!
//! ```text
//! # full-line comments start with '#' or ';'
//! [DEFAULT]
//! root = /srv/app
//!
//! [paths]
//! data = %(root)s/data
//! motd: first line
//!     second line
//! ```
//!
//! - Keys are split from values at the first `=` or `:`. Keys are trimmed and
//!   lowercased, values are trimmed.
//! - An indented line directly following an option continues its value; the
//!   pieces are joined with `\n`.
//! - Within a single file a section may appear once, and a key once per
//!   section. Across files, later files overlay earlier ones (see
//!   [`merge`](crate::merge)).
//!
//! # Writing
//!
//! The [`Display`](std::fmt::Display) impl renders exactly what [`parse`]
//! accepts: `[DEFAULT]` first (if it has keys), then each section in insertion
//! order with `key = value` lines and a blank line after every section.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::AppstrapError;

/// Name of the pseudo-section whose keys every other section inherits.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Where an entry or section header was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub path: PathBuf,
    /// 1-indexed line number.
    pub line: usize,
}

/// One `key = value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub origin: Origin,
}

/// An ordered set of entries under one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    /// Header location. `None` for the implicit `DEFAULT` section.
    pub origin: Option<Origin>,
    entries: Vec<Entry>,
}

impl Section {
    pub fn new(name: impl Into<String>, origin: Option<Origin>) -> Self {
        Self {
            name: name.into(),
            origin,
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Insert or overwrite. An overwritten key keeps its position.
    pub fn set(&mut self, entry: Entry) {
        match self.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        self.entries.len() != before
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A whole INI document: `DEFAULT` plus named sections in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections {
    defaults: Section,
    sections: Vec<Section>,
}

impl Default for Sections {
    fn default() -> Self {
        Self::new()
    }
}

impl Sections {
    pub fn new() -> Self {
        Self {
            defaults: Section::new(DEFAULT_SECTION, None),
            sections: Vec::new(),
        }
    }

    pub fn defaults(&self) -> &Section {
        &self.defaults
    }

    /// Named sections, excluding `DEFAULT`.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Section names, excluding `DEFAULT`.
    pub fn names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// A named section. `DEFAULT` is not a named section.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Like [`section`](Self::section) but resolves `DEFAULT` too.
    pub fn lookup_section(&self, name: &str) -> Option<&Section> {
        if name == DEFAULT_SECTION {
            Some(&self.defaults)
        } else {
            self.section(name)
        }
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Get a section for writing, creating it (at the end) if needed.
    pub fn section_mut_or_insert(&mut self, name: &str, origin: Option<Origin>) -> &mut Section {
        if name == DEFAULT_SECTION {
            return &mut self.defaults;
        }
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name, origin));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        if name == DEFAULT_SECTION {
            return Some(&mut self.defaults);
        }
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Remove a named section. Returns `false` if it did not exist.
    pub fn remove_section(&mut self, name: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.name != name);
        self.sections.len() != before
    }

    pub fn clear_defaults(&mut self) {
        self.defaults = Section::new(DEFAULT_SECTION, None);
    }

    /// Find `key` in `section`, falling back to `DEFAULT`.
    ///
    /// Returns `None` if the key is not visible. Callers check section
    /// existence separately.
    pub fn lookup(&self, section: &str, key: &str) -> Option<&Entry> {
        let own = self.lookup_section(section).and_then(|s| s.get(key));
        own.or_else(|| self.defaults.get(key))
    }

    /// All entries visible in `section`: its own first, then inherited
    /// `DEFAULT` entries it does not shadow.
    pub fn visible(&self, section: &str) -> Option<Vec<&Entry>> {
        let sect = self.lookup_section(section)?;
        let mut out: Vec<&Entry> = sect.entries().iter().collect();
        if section != DEFAULT_SECTION {
            out.extend(
                self.defaults
                    .entries()
                    .iter()
                    .filter(|d| sect.get(&d.key).is_none()),
            );
        }
        Some(out)
    }
}

impl fmt::Display for Sections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.defaults.is_empty() {
            write_section(f, &self.defaults)?;
        }
        for section in &self.sections {
            write_section(f, section)?;
        }
        Ok(())
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, section: &Section) -> fmt::Result {
    writeln!(f, "[{}]", section.name)?;
    for entry in section.entries() {
        writeln!(f, "{} = {}", entry.key, entry.value.replace('\n', "\n\t"))?;
    }
    writeln!(f)
}

/// Parse INI text read from `path` into a fresh [`Sections`].
///
/// `path` is only used for error messages and entry origins.
pub fn parse(content: &str, path: &Path) -> Result<Sections, AppstrapError> {
    let mut doc = Sections::new();
    let mut seen_sections: Vec<String> = Vec::new();
    let mut current_section: Option<String> = None;
    // (section, key) of the last option, while continuation lines may follow
    let mut open_option: Option<(String, String)> = None;

    let err = |line: usize, reason: &str| AppstrapError::Parse {
        path: path.to_path_buf(),
        line,
        reason: reason.to_string(),
    };

    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            open_option = None;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            open_option = None;
            continue;
        }

        // Continuation of the previous value
        if raw.starts_with(char::is_whitespace)
            && let Some((section, key)) = &open_option
        {
            let sect = doc
                .section_mut(section)
                .ok_or_else(|| err(line_no, "continuation outside of a section"))?;
            if let Some(entry) = sect.entries.iter_mut().find(|e| &e.key == key) {
                entry.value.push('\n');
                entry.value.push_str(trimmed);
            }
            continue;
        }
        open_option = None;

        if trimmed.starts_with('[') {
            let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) else {
                return Err(err(line_no, "malformed section header"));
            };
            let name = header.trim();
            if name.is_empty() {
                return Err(err(line_no, "empty section header"));
            }
            if seen_sections.iter().any(|s| s == name) {
                return Err(err(line_no, &format!("duplicate section '{name}'")));
            }
            seen_sections.push(name.to_string());
            doc.section_mut_or_insert(
                name,
                Some(Origin {
                    path: path.to_path_buf(),
                    line: line_no,
                }),
            );
            current_section = Some(name.to_string());
            continue;
        }

        let Some(section) = current_section.as_deref() else {
            return Err(err(line_no, "option found before any section header"));
        };

        let Some(split_at) = trimmed.find(['=', ':']) else {
            return Err(err(line_no, "expected 'key = value' or 'key: value'"));
        };
        let key = trimmed[..split_at].trim().to_lowercase();
        let value = trimmed[split_at + 1..].trim().to_string();
        if key.is_empty() {
            return Err(err(line_no, "empty option name"));
        }

        let sect = doc.section_mut_or_insert(section, None);
        if sect.get(&key).is_some() {
            return Err(err(
                line_no,
                &format!("duplicate option '{key}' in section '{section}'"),
            ));
        }
        sect.set(Entry {
            key: key.clone(),
            value,
            origin: Origin {
                path: path.to_path_buf(),
                line: line_no,
            },
        });
        open_option = Some((section.to_string(), key));
    }

    Ok(doc)
}
