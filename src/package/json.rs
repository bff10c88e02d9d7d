//! `package.json` rewriting.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::core::{EmbedError, EmbedResult};

/// Remove the top-level `resolutions` key from the package.json at `path`.
///
/// Resolutions in the staged copy would point at paths that only exist in
/// the source tree. Key order is preserved and the file is rewritten with
/// 4-space indentation. Returns whether the key was present; the file is
/// left untouched otherwise.
pub fn strip_resolutions(path: &Path) -> EmbedResult<bool> {
    let content = fs::read(path).map_err(|e| EmbedError::io(path, e))?;
    let mut json: Map<String, Value> = serde_json::from_slice(&content)
        .map_err(|e| EmbedError::InvalidPackageJson(path.to_path_buf(), e))?;

    if json.shift_remove("resolutions").is_none() {
        return Ok(false);
    }

    let mut out = Vec::with_capacity(content.len());
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    json.serialize(&mut ser)
        .map_err(|e| EmbedError::InvalidPackageJson(path.to_path_buf(), e))?;

    fs::write(path, out).map_err(|e| EmbedError::io(path, e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_strip_resolutions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        fs::write(
            &path,
            r#"{"name":"ui","resolutions":{"esp32m":"portal:../../esp32m/web-ui"},"version":"1.0.0","scripts":{"build":"vite build"}}"#,
        )
        .unwrap();

        assert!(strip_resolutions(&path).unwrap());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n    \"name\": \"ui\",\n    \"version\": \"1.0.0\",\n    \"scripts\": {\n        \"build\": \"vite build\"\n    }\n}"
        );
    }

    #[test]
    fn test_no_resolutions_leaves_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        let original = "{\"name\":\"ui\"}";
        fs::write(&path, original).unwrap();

        assert!(!strip_resolutions(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, "{ not json").unwrap();

        let err = strip_resolutions(&path).unwrap_err();
        assert!(matches!(err, EmbedError::InvalidPackageJson(..)));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = strip_resolutions(&dir.path().join("package.json")).unwrap_err();
        assert!(matches!(err, EmbedError::Io(..)));
    }
}
