//! Copying a UI project into the build tree.

use std::fs;
use std::path::Path;

use crate::core::{EmbedError, EmbedResult};

/// Directories never copied, at any depth.
const SKIP_DIRS_ANYWHERE: &[&str] = &["node_modules"];

/// Directories only skipped directly under the project root.
const SKIP_DIRS_TOP: &[&str] = &["dist", "tests", "coverage", "build"];

/// Files never copied.
const SKIP_FILES: &[&str] = &["CMakeLists.txt"];

/// Copy the UI project at `from` into `to`, leaving out dependencies,
/// previous build output and test data.
///
/// Existing files in `to` are overwritten, extra files are kept.
/// Returns the number of files copied.
pub fn stage(from: &Path, to: &Path) -> EmbedResult<usize> {
    if !from.is_dir() {
        return Err(EmbedError::PackageNotFound(from.to_path_buf()));
    }
    let mut count = 0;
    copy_dir_recursive(from, to, 0, &mut count)?;
    Ok(count)
}

fn copy_dir_recursive(src_dir: &Path, dest_dir: &Path, level: usize, count: &mut usize) -> EmbedResult<()> {
    fs::create_dir_all(dest_dir).map_err(|e| EmbedError::io(dest_dir, e))?;

    let entries = fs::read_dir(src_dir).map_err(|e| EmbedError::io(src_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| EmbedError::io(src_dir, e))?;
        let src_path = entry.path();
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        let dest_path = dest_dir.join(&file_name);

        if src_path.is_dir() {
            if SKIP_DIRS_ANYWHERE.contains(&name.as_ref())
                || (level == 0 && SKIP_DIRS_TOP.contains(&name.as_ref()))
            {
                continue;
            }
            copy_dir_recursive(&src_path, &dest_path, level + 1, count)?;
        } else if src_path.is_file() {
            if SKIP_FILES.contains(&name.as_ref()) {
                continue;
            }
            fs::copy(&src_path, &dest_path).map_err(|e| EmbedError::io(&src_path, e))?;
            *count += 1;
        }
    }

    Ok(())
}
