//! MIME types of embeddable assets.
//!
//! Only two kinds of build output are embedded; every other extension is
//! excluded from the pipeline. The strings are exactly what the firmware
//! sends as `Content-Type`.

use std::path::Path;

/// MIME type constants.
pub mod types {
    pub const HTML: &str = "text/html; charset=UTF-8";
    pub const JAVASCRIPT: &str = "application/javascript";
}

/// An embeddable file type.
///
/// The declaration order is the processing order of type groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetType {
    Html,
    Js,
}

impl AssetType {
    /// All types, in processing order.
    pub const ALL: [Self; 2] = [Self::Html, Self::Js];

    /// File extension (without dot) selecting this type.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Js => "js",
        }
    }

    /// `Content-Type` value for this type.
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Html => types::HTML,
            Self::Js => types::JAVASCRIPT,
        }
    }

    /// Detect from a path's extension. Matching is exact (`index.HTML` is not embedded).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL.into_iter().find(|t| t.extension() == ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_path() {
        assert_eq!(AssetType::from_path(&PathBuf::from("index.html")), Some(AssetType::Html));
        assert_eq!(AssetType::from_path(&PathBuf::from("main.js")), Some(AssetType::Js));
        assert_eq!(AssetType::from_path(&PathBuf::from("main.js.gz")), None);
        assert_eq!(AssetType::from_path(&PathBuf::from("style.css")), None);
        assert_eq!(AssetType::from_path(&PathBuf::from("index.htm")), None);
        assert_eq!(AssetType::from_path(&PathBuf::from("README")), None);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(AssetType::Html.content_type(), "text/html; charset=UTF-8");
        assert_eq!(AssetType::Js.content_type(), "application/javascript");
    }

    #[test]
    fn test_group_order() {
        assert_eq!(AssetType::ALL, [AssetType::Html, AssetType::Js]);
        assert!(AssetType::Html < AssetType::Js);
    }
}
