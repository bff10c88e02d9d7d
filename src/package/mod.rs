//! UI packages: the shared UI library and the project's own UI.

mod json;
mod stage;

pub use json::strip_resolutions;
pub use stage::stage;

use std::path::{Path, PathBuf};

use crate::core::{EmbedError, EmbedResult};

pub const PACKAGE_JSON: &str = "package.json";

/// A directory holding a `package.json`.
#[derive(Debug, Clone)]
pub struct UiPackage {
    dir: PathBuf,
}

impl UiPackage {
    /// Open `dir`, failing with [`EmbedError::PackageNotFound`] when the
    /// directory or its `package.json` is missing.
    pub fn open(dir: &Path) -> EmbedResult<Self> {
        if !dir.is_dir() {
            return Err(EmbedError::PackageNotFound(dir.to_path_buf()));
        }
        let package_json = dir.join(PACKAGE_JSON);
        if !package_json.is_file() {
            return Err(EmbedError::PackageNotFound(package_json));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn package_json(&self) -> PathBuf {
        self.dir.join(PACKAGE_JSON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_package() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PACKAGE_JSON), "{}").unwrap();

        let package = UiPackage::open(dir.path()).unwrap();
        assert_eq!(package.package_json(), dir.path().join("package.json"));
        assert_eq!(package.dir(), dir.path());
    }

    #[test]
    fn test_open_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("web-ui");
        let err = UiPackage::open(&missing).unwrap_err();
        assert!(matches!(err, EmbedError::PackageNotFound(p) if p == missing));
    }

    #[test]
    fn test_open_missing_package_json() {
        let dir = TempDir::new().unwrap();
        let err = UiPackage::open(dir.path()).unwrap_err();
        assert!(matches!(err, EmbedError::PackageNotFound(p) if p.ends_with(PACKAGE_JSON)));
    }
}
