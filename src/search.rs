//! Search path resolution and config file discovery.
//!
//! # Resolution
//!
//! Each [`SearchPath`] variant resolves to a single directory, or to nothing
//! when the environment cannot provide one (no home directory, unknown
//! executable path). Unresolvable entries are skipped.
//!
//! The resolved list is **priority-descending**: the first entry has the
//! highest priority. Duplicates are removed keeping the first occurrence, so
//! the caller's ordering survives deduplication.
//!
//! # Discovery
//!
//! - The default file (`<name>.default`) is looked up in list order; the first
//!   directory that has it wins.
//! - Override files (`<name>.cfg`) are collected in **reverse** order, lowest
//!   priority first, so that a plain left-to-right merge lets the
//!   highest-priority directory win.
//!
//! Missing files are silently skipped. Only actual I/O errors on files that
//! exist (permissions, etc.) are propagated. Directory listing is more
//! forgiving: an entry that cannot be listed is skipped with a warning.

use std::path::{Path, PathBuf};

use crate::error::AppstrapError;
use crate::types::SearchPath;

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// `app_name` is used by [`SearchPath::Platform`] to build the platform config
/// directory (e.g. `~/.config/{app_name}/` on Linux).
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::ExeDir(subdir) => {
            let exe = std::env::current_exe().ok()?;
            Some(exe.parent()?.join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Resolve every entry and deduplicate, keeping first occurrences.
pub fn expand_search_paths(search_paths: &[SearchPath], app_name: &str) -> Vec<PathBuf> {
    dedup_paths(
        search_paths
            .iter()
            .filter_map(|sp| resolve_search_path(sp, app_name)),
    )
}

/// Stable deduplication: the first occurrence of each path keeps its place.
pub fn dedup_paths<I, P>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut out: Vec<PathBuf> = Vec::new();
    for p in paths {
        let p = p.into();
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

/// Find the first directory (in priority order) containing `file_name`.
pub fn find_first(dirs: &[PathBuf], file_name: &str) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}

/// Read every `{dir}/{file_name}` that exists, lowest priority first.
///
/// `dirs` is priority-descending, so it is walked in reverse.
pub fn load_overrides(
    dirs: &[PathBuf],
    file_name: &str,
) -> Result<Vec<(PathBuf, String)>, AppstrapError> {
    let mut results = Vec::new();
    for dir in dirs.iter().rev() {
        let file_path = dir.join(file_name);
        if !file_path.is_file() {
            continue;
        }
        results.push((file_path.clone(), read_file(&file_path)?));
    }
    Ok(results)
}

/// Read a whole file, mapping failures to [`AppstrapError::IoError`].
pub fn read_file(path: &Path) -> Result<String, AppstrapError> {
    std::fs::read_to_string(path).map_err(|e| AppstrapError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// List config names that have a `*{default_ext}` file in `dir`.
///
/// Names are returned sorted so discovery does not depend on directory
/// iteration order. A path that cannot be listed (missing, not a directory,
/// unreadable) yields nothing, like a missing file does for
/// [`find_first`]; anything but a missing path is logged.
pub fn default_names_in(dir: &Path, default_ext: &str) -> Result<Vec<String>, AppstrapError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), "search path entry skipped: {e}");
            return Ok(vec![]);
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppstrapError::IoError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|f| f.to_str()) else {
            continue;
        };
        if let Some(name) = file_name.strip_suffix(default_ext)
            && !name.is_empty()
        {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}
