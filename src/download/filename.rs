//! Filename extraction, cleaning, and collision-free path resolution.

use std::path::{Path, PathBuf};

use url::Url;

use super::constants::{FALLBACK_FILENAME, MAX_COLLISION_SUFFIX};

/// Characters that are never allowed in a saved or renamed filename.
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Removes every forbidden filesystem character and trims surrounding
/// whitespace.
///
/// Applying it twice yields the same result as applying it once.
#[must_use]
pub fn clean_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Cleans `name` and substitutes [`FALLBACK_FILENAME`] when nothing usable
/// remains. `.` and `..` count as unusable.
#[must_use]
pub(crate) fn usable_filename(name: &str) -> String {
    let cleaned = clean_filename(name);
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        FALLBACK_FILENAME.to_string()
    } else {
        cleaned
    }
}

/// Parses Content-Disposition header to extract filename.
///
/// Handles both:
/// - `attachment; filename="model.safetensors"`
/// - `attachment; filename=model.safetensors`
/// - `attachment; filename*=UTF-8''model%20v2.safetensors` (RFC 5987)
pub(crate) fn parse_content_disposition(header: &str) -> Option<String> {
    if let Some(pos) = header.find("filename*=") {
        let value = header[pos + 10..].trim();
        if let Some(quote_pos) = value.find("''") {
            let encoded = &value[quote_pos + 2..];
            let end = encoded.find(';').unwrap_or(encoded.len());
            if let Ok(decoded) = urlencoding::decode(encoded[..end].trim()) {
                return Some(decoded.into_owned());
            }
        }
    }

    // Skip the `filename=` embedded in `filename*=`.
    let plain = header
        .match_indices("filename=")
        .find(|(pos, _)| !header[..*pos].ends_with('*'))
        .map(|(pos, _)| pos);
    if let Some(pos) = plain {
        let value = header[pos + 9..].trim();
        if let Some(stripped) = value.strip_prefix('"') {
            if let Some(end) = stripped.find('"') {
                return Some(stripped[..end].to_string());
            }
        } else {
            let end = value.find(';').unwrap_or(value.len());
            let filename = value[..end].trim();
            if !filename.is_empty() {
                return Some(filename.to_string());
            }
        }
    }

    None
}

/// Last non-empty URL path segment, percent-decoded.
pub(crate) fn filename_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.rev().find(|s| !s.is_empty())?;
    let decoded = urlencoding::decode(last).map_or_else(|_| last.to_string(), |s| s.into_owned());
    Some(decoded)
}

/// Splits `name` into stem and extension (extension keeps its dot).
///
/// Leading dots belong to the stem, so `.hidden` has no extension.
fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(idx) => name.split_at(leading + idx),
        None => (name, ""),
    }
}

/// Returns the first path under `dir` for `filename` that does not exist.
///
/// Collisions are resolved as `stem(1).ext`, `stem(2).ext`, and so on.
/// Returns `None` once [`MAX_COLLISION_SUFFIX`] candidates are all taken.
#[must_use]
pub fn unique_path(dir: &Path, filename: &str) -> Option<PathBuf> {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return Some(candidate);
    }

    let (stem, ext) = split_extension(filename);
    (1..=MAX_COLLISION_SUFFIX)
        .map(|n| dir.join(format!("{stem}({n}){ext}")))
        .find(|path| !path.exists())
}
