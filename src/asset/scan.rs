//! Build output scanning.

use std::fs;
use std::path::{Path, PathBuf};

use super::RawAsset;
use crate::core::{EmbedError, EmbedResult};
use crate::log;
use crate::utils::mime::AssetType;

/// Scan `dir` for embeddable files.
///
/// Only the top level is scanned; subdirectories are never entered and
/// hidden files (leading `.`) are skipped. The
/// result is grouped by type (html first, then js). Inside a group the
/// order is the directory listing order, or file name order when `sort`
/// is set.
///
/// # Errors
///
/// [`EmbedError::DirectoryNotFound`] if `dir` does not exist, and
/// [`EmbedError::Io`] if it or any matching file cannot be read.
pub fn collect(dir: &Path, sort: bool) -> EmbedResult<Vec<RawAsset>> {
    if !dir.is_dir() {
        return Err(EmbedError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut found: Vec<(AssetType, String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| EmbedError::io(dir, e))? {
        let entry = entry.map_err(|e| EmbedError::io(dir, e))?;
        let path = entry.path();
        let Some(kind) = AssetType::from_path(&path) else {
            continue;
        };
        if !path.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            log!("warning"; "skipping non UTF-8 file name `{}`", path.display());
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        found.push((kind, name, path));
    }

    // Stable sort keeps listing order inside a group when `sort` is off
    if sort {
        found.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
    } else {
        found.sort_by_key(|(kind, _, _)| *kind);
    }

    found
        .into_iter()
        .map(|(kind, name, path)| {
            let bytes = fs::read(&path).map_err(|e| EmbedError::io(&path, e))?;
            Ok(RawAsset {
                name,
                path,
                kind,
                bytes,
            })
        })
        .collect()
}
