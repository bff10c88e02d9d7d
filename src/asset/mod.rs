//! Embeddable assets: scanning, compression and per-asset metadata.

mod compress;
mod emit;
mod meta;
mod scan;
mod symbol;

pub use compress::compress;
pub use emit::emit;
pub use meta::{CONTENT_ENCODING, ContentDigest, etag, url_path};
pub use scan::collect;
pub use symbol::{is_valid_symbol, sanitize};

use std::path::PathBuf;

use crate::core::{EmbedError, EmbedResult};
use crate::utils::mime::AssetType;

/// A file found in the build output, before compression.
#[derive(Debug, Clone)]
pub struct RawAsset {
    /// File name, without directory.
    pub name: String,
    /// Full path of the source file.
    pub path: PathBuf,
    pub kind: AssetType,
    pub bytes: Vec<u8>,
}

/// One embedded resource, ready to be emitted and registered.
///
/// Built once per run from a [`RawAsset`] and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Asset {
    pub name: String,
    pub source: PathBuf,
    pub content_type: &'static str,
    pub content_encoding: &'static str,
    /// Linker symbol prefix (`<symbol>_start` / `<symbol>_end`).
    pub symbol: String,
    pub url: String,
    /// Entity tag, unquoted.
    pub etag: String,
    pub digest: ContentDigest,
    /// Compressed payload.
    pub payload: Vec<u8>,
}

impl Asset {
    /// Compress and fingerprint a raw asset.
    pub fn from_raw(raw: RawAsset) -> EmbedResult<Self> {
        let payload = compress(&raw.bytes).map_err(|e| EmbedError::io(&raw.path, e))?;
        let digest = ContentDigest::of(&payload);

        Ok(Self {
            symbol: sanitize(&raw.name),
            url: url_path(&raw.name),
            etag: etag(payload.len(), digest.as_bytes()),
            content_type: raw.kind.content_type(),
            content_encoding: CONTENT_ENCODING,
            digest,
            payload,
            source: raw.path,
            name: raw.name,
        })
    }

    /// Size of the compressed payload in bytes.
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    /// Assembly source for this asset.
    pub fn assembly(&self) -> String {
        emit(&self.payload, &self.symbol)
    }

    /// Path of the compressed payload written beside the source.
    pub fn gz_path(&self) -> PathBuf {
        sibling(&self.source, "gz")
    }

    /// Path of the assembly file written beside the source.
    pub fn asm_path(&self) -> PathBuf {
        sibling(&self.source, "S")
    }
}

/// `dist/main.js` + `gz` -> `dist/main.js.gz`
fn sibling(source: &std::path::Path, ext: &str) -> PathBuf {
    let mut name = source.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
