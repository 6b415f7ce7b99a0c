//! Newline-delimited URL list files (pending and per-category lists).
//!
//! Mutation is read-modify-write of the whole file: concurrent writers
//! against the same list are not supported.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::StoreError;

/// Reads a list, trimming lines and dropping blanks. The file must exist.
///
/// # Errors
///
/// Returns [`StoreError::Missing`] if the file does not exist, or
/// [`StoreError::Io`] if it cannot be read.
pub fn read_urls(path: &Path) -> Result<Vec<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::missing(path)),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Overwrites the list with `urls`, one per line.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be written.
pub fn write_urls<S: AsRef<str>>(path: &Path, urls: &[S]) -> Result<(), StoreError> {
    let mut body = String::new();
    for url in urls {
        body.push_str(url.as_ref());
        body.push('\n');
    }
    fs::write(path, body).map_err(|e| StoreError::io(path, e))
}

/// Appends one URL, creating the file if needed.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be opened or written.
pub fn append_url(path: &Path, url: &str) -> Result<(), StoreError> {
    append_line(path, url)
}

/// Appends `line` plus a newline, creating the file if needed.
///
/// A hand-edited file may lack a final newline; one is written first so the
/// new line never joins the previous one.
pub(crate) fn append_line(path: &Path, line: &str) -> Result<(), StoreError> {
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;
    let separator = if ends_without_newline(&mut file).map_err(|e| StoreError::io(path, e))? {
        "\n"
    } else {
        ""
    };
    writeln!(file, "{separator}{line}").map_err(|e| StoreError::io(path, e))
}

fn ends_without_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Removes every line equal to `url` (after trimming), keeping other lines verbatim.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be read or rewritten.
pub fn remove_url(path: &Path, url: &str) -> Result<(), StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::missing(path)),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    let kept: String = raw
        .split_inclusive('\n')
        .filter(|line| line.trim() != url)
        .collect();
    fs::write(path, kept).map_err(|e| StoreError::io(path, e))
}
