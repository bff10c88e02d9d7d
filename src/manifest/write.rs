//! Writing derived files to disk.

use std::fs;
use std::path::{Path, PathBuf};

use super::Manifest;
use crate::core::{BuildMode, EmbedError, EmbedResult};
use crate::debug;

/// Write the `.gz` and `.S` files of every asset beside its source.
///
/// Not transactional: a failure leaves earlier assets' files in place.
/// Reruns overwrite them with identical bytes.
pub fn write(manifest: &Manifest) -> EmbedResult<()> {
    for asset in manifest.assets() {
        let gz = asset.gz_path();
        fs::write(&gz, &asset.payload).map_err(|e| EmbedError::io(&gz, e))?;

        let asm = asset.asm_path();
        fs::write(&asm, asset.assembly()).map_err(|e| EmbedError::io(&asm, e))?;

        debug!("embed"; "{} -> {} bytes, sha1 {}", asset.name, asset.size(), asset.digest);
    }
    Ok(())
}

/// Whether the artifact should be (re)written for this run.
///
/// An empty `Full` run keeps the previous artifact. Skipped runs always
/// write one so the firmware still has a header to include.
pub fn artifact_wanted(manifest: &Manifest, mode: BuildMode) -> bool {
    !manifest.is_empty() || mode != BuildMode::Full
}

/// Write the artifact text to `path` via a temporary sibling and a rename.
pub fn write_artifact(path: &Path, text: &str) -> EmbedResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| EmbedError::io(parent, e))?;
    }

    let tmp = temp_sibling(path);
    if let Err(e) = fs::write(&tmp, text) {
        let _ = fs::remove_file(&tmp);
        return Err(EmbedError::io(&tmp, e));
    }
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        EmbedError::io(path, e)
    })
}

/// `dist/ui.hpp` -> `dist/.ui.hpp.tmp`
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}
