//! Override conformance: detect sections and keys that user files add on top
//! of the default definition.
//!
//! The live (merged) sections are compared against a reference parsed from the
//! default file alone. Anything present in the live state but absent from the
//! reference is an [`Excess`], reported with the file and line that introduced
//! it. This is advisory: loading never fails because of it.

use std::fmt;

use crate::ini::{DEFAULT_SECTION, Origin, Sections};

/// Something an override file introduced that the default does not define.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Excess {
    /// A whole section the default lacks.
    Section {
        section: String,
        origin: Option<Origin>,
    },
    /// A key the default lacks in this section (and in `DEFAULT`).
    Key {
        section: String,
        key: String,
        origin: Origin,
    },
}

impl fmt::Display for Excess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Excess::Section { section, origin } => {
                write!(f, "section '{section}' is not in default")?;
                if let Some(o) = origin {
                    write!(f, " ({} line {})", o.path.display(), o.line)?;
                }
                Ok(())
            }
            Excess::Key {
                section,
                key,
                origin,
            } => write!(
                f,
                "option '{key}' is not in default section '{section}' ({} line {})",
                origin.path.display(),
                origin.line
            ),
        }
    }
}

/// Compare `live` against `reference` and list every excess section and key.
///
/// - Live sections missing from the reference are reported once, as a section.
/// - For sections both have, each live key must exist in the reference section
///   or in the reference `DEFAULT` section.
/// - Live `DEFAULT` keys must exist in the reference `DEFAULT` section.
pub fn find_excess(live: &Sections, reference: &Sections) -> Vec<Excess> {
    let mut excess = Vec::new();
    let ref_defaults = reference.defaults();

    for entry in live.defaults().entries() {
        if ref_defaults.get(&entry.key).is_none() {
            excess.push(Excess::Key {
                section: DEFAULT_SECTION.into(),
                key: entry.key.clone(),
                origin: entry.origin.clone(),
            });
        }
    }

    for section in live.iter() {
        let Some(ref_section) = reference.section(&section.name) else {
            excess.push(Excess::Section {
                section: section.name.clone(),
                origin: section.origin.clone(),
            });
            continue;
        };
        for entry in section.entries() {
            if ref_section.get(&entry.key).is_none() && ref_defaults.get(&entry.key).is_none() {
                excess.push(Excess::Key {
                    section: section.name.clone(),
                    key: entry.key.clone(),
                    origin: entry.origin.clone(),
                });
            }
        }
    }

    excess
}
