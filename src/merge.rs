use crate::ini::{DEFAULT_SECTION, Sections};

/// Merge `overlay` on top of `base`.
/// Sections missing from `base` are appended; for shared sections each
/// overlay entry is set, overwriting a base entry with the same key.
pub fn merge(mut base: Sections, overlay: Sections) -> Sections {
    let defaults = base.section_mut_or_insert(DEFAULT_SECTION, None);
    for entry in overlay.defaults().entries() {
        defaults.set(entry.clone());
    }
    for section in overlay.iter() {
        let target = base.section_mut_or_insert(&section.name, section.origin.clone());
        for entry in section.entries() {
            target.set(entry.clone());
        }
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini::parse;
    use std::path::Path;

    fn doc(name: &str, content: &str) -> Sections {
        parse(content, Path::new(name)).unwrap()
    }

    fn value<'a>(s: &'a Sections, section: &str, key: &str) -> &'a str {
        &s.lookup(section, key).unwrap().value
    }

    #[test]
    fn disjoint_keys_merge() {
        let merged = merge(doc("a", "[s]\na = 1\n"), doc("b", "[s]\nb = 2\n"));
        assert_eq!(value(&merged, "s", "a"), "1");
        assert_eq!(value(&merged, "s", "b"), "2");
    }

    #[test]
    fn same_key_overlay_wins() {
        let merged = merge(doc("a", "[s]\nk = base\n"), doc("b", "[s]\nk = overlay\n"));
        assert_eq!(value(&merged, "s", "k"), "overlay");
    }

    #[test]
    fn overwritten_entry_takes_overlay_origin() {
        let merged = merge(doc("base.default", "[s]\nk = 1\n"), doc("user.cfg", "\n[s]\nk = 2\n"));
        let origin = &merged.lookup("s", "k").unwrap().origin;
        assert_eq!(origin.path, Path::new("user.cfg"));
        assert_eq!(origin.line, 3);
    }

    #[test]
    fn new_section_is_appended() {
        let merged = merge(doc("a", "[one]\nk = 1\n"), doc("b", "[two]\nk = 2\n"));
        assert_eq!(merged.names(), vec!["one", "two"]);
    }

    #[test]
    fn existing_section_keeps_base_origin() {
        let merged = merge(doc("base", "[s]\nk = 1\n"), doc("over", "[s]\nk = 2\n"));
        let origin = merged.section("s").unwrap().origin.as_ref().unwrap();
        assert_eq!(origin.path, Path::new("base"));
    }

    #[test]
    fn defaults_merge_too() {
        let merged = merge(
            doc("a", "[DEFAULT]\nd = 1\ne = 1\n"),
            doc("b", "[DEFAULT]\nd = 2\n"),
        );
        assert_eq!(value(&merged, "DEFAULT", "d"), "2");
        assert_eq!(value(&merged, "DEFAULT", "e"), "1");
    }

    #[test]
    fn empty_overlay_returns_base() {
        let base = doc("a", "[s]\nk = 1\n");
        let merged = merge(base.clone(), Sections::new());
        assert_eq!(merged, base);
    }

    #[test]
    fn empty_base_takes_overlay() {
        let overlay = doc("a", "[s]\nk = 1\n");
        let merged = merge(Sections::new(), overlay.clone());
        assert_eq!(merged, overlay);
    }

    #[test]
    fn multiple_sequential_merges() {
        let merged = merge(
            merge(doc("a", "[s]\nk = a\n"), doc("b", "[s]\nother = b\n")),
            doc("c", "[s]\nk = c\n"),
        );
        assert_eq!(value(&merged, "s", "k"), "c");
        assert_eq!(value(&merged, "s", "other"), "b");
    }
}
