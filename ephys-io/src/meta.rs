//! SpikeGLX writes one `key=value` pair per line next to each binary. Keys prefixed with `~`
//! are read-only in SpikeGLX; the prefix is dropped here.

use crate::EphysError;
use anyhow::{Context, Error};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Parse the text of a `.meta` file.
pub fn parse_meta(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|line| {
            let (key, value) = line.trim().split_once('=')?;
            let key = key.trim();
            let key = key.strip_prefix('~').unwrap_or(key);
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Read a `.meta` file into a key/value map
pub fn read_meta(meta_file: impl AsRef<Path>) -> Result<BTreeMap<String, String>, Error> {
    let path = meta_file.as_ref();
    if !path.is_file() {
        return Err(EphysError::MissingFile(path.to_path_buf()).into());
    }
    let text = fs::read_to_string(path).with_context(|| path.display().to_string())?;
    let meta = parse_meta(&text);
    debug!("read {} keys from {}", meta.len(), path.display());
    Ok(meta)
}

/// Resolve `path` to a metadata file. A file is returned unchanged; in a directory the
/// `*.ap.meta` file is preferred over any other `*.meta` file.
pub fn find_meta_file(path: impl AsRef<Path>) -> Result<PathBuf, Error> {
    let path = path.as_ref();
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        return Err(EphysError::MissingFile(path.to_path_buf()).into());
    }

    let mut candidates = fs::read_dir(path)
        .with_context(|| path.display().to_string())?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "meta"))
        .collect::<Vec<_>>();
    candidates.sort();

    let is_ap = |p: &PathBuf| p.to_string_lossy().ends_with(".ap.meta");
    let chosen = match candidates.iter().position(is_ap) {
        Some(i) => candidates.remove(i),
        None if !candidates.is_empty() => candidates.remove(0),
        None => return Err(EphysError::MissingMeta(path.to_path_buf()).into()),
    };
    if !candidates.is_empty() {
        warn!(
            "{} .meta files in {}, using {}",
            candidates.len() + 1,
            path.display(),
            chosen.display()
        );
    }
    Ok(chosen)
}
