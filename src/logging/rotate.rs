//! Size-based rotating log file.
//!
//! `app.log` is the live file; rotation shifts `app.log.1` → `app.log.2` and
//! so on, dropping anything past `backup_count`, then moves `app.log` to
//! `app.log.1` and starts a fresh file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    file: File,
    written: u64,
}

impl RotatingFile {
    /// Open `path` for appending, creating parent directories.
    ///
    /// With `rollover_on_start`, a non-empty existing file is rotated first.
    pub fn open(
        path: impl Into<PathBuf>,
        max_bytes: u64,
        backup_count: usize,
        rollover_on_start: bool,
    ) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let existing = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        if rollover_on_start && existing > 0 {
            shift_backups(&path, backup_count)?;
        }

        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            backup_count,
            file,
            written,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rotate now.
    pub fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        shift_backups(&self.path, self.backup_count)?;
        self.file = open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }

    fn should_rotate(&self, incoming: usize) -> bool {
        self.max_bytes > 0 && self.written > 0 && self.written + incoming as u64 > self.max_bytes
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.should_rotate(buf.len()) {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

/// Move `path` to `path.1`, shifting older backups up. With no backups
/// kept, the file is truncated instead.
fn shift_backups(path: &Path, backup_count: usize) -> io::Result<()> {
    if backup_count == 0 {
        File::create(path)?;
        return Ok(());
    }
    for i in (1..backup_count).rev() {
        let src = backup_path(path, i);
        if src.exists() {
            let dst = backup_path(path, i + 1);
            if dst.exists() {
                fs::remove_file(&dst)?;
            }
            fs::rename(&src, &dst)?;
        }
    }
    let first = backup_path(path, 1);
    if first.exists() {
        fs::remove_file(&first)?;
    }
    if path.exists() {
        fs::rename(path, &first)?;
    }
    Ok(())
}
