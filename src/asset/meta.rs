//! Per-asset metadata: digest, entity tag and URL.

use base64::{Engine as _, engine::general_purpose};
use ring::digest;
use std::fmt;

/// Content encoding of every embedded payload.
pub const CONTENT_ENCODING: &str = "gzip";

/// Characters of the base64 digest kept in an entity tag.
///
/// A SHA-1 digest encodes to 28 characters, the last one being padding.
pub const ETAG_DIGEST_CHARS: usize = 27;

/// SHA-1 digest of a compressed payload.
///
/// Only used as a cache validator, never for integrity or authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 20]);

impl ContentDigest {
    /// Digest `bytes`.
    pub fn of(bytes: &[u8]) -> Self {
        let hash = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, bytes);
        let mut out = [0u8; 20];
        out.copy_from_slice(hash.as_ref());
        Self(out)
    }

    /// Get the raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Standard (padded) base64 encoding.
    pub fn to_base64(self) -> String {
        general_purpose::STANDARD.encode(self.0)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

/// Build the entity tag `<size>-<first 27 base64 chars of digest>`.
///
/// Returned unquoted; the generated code adds the surrounding quotes.
pub fn etag(size: usize, digest: &[u8]) -> String {
    let encoded = general_purpose::STANDARD.encode(digest);
    let keep = encoded.len().min(ETAG_DIGEST_CHARS);
    format!("{}-{}", size, &encoded[..keep])
}

/// URL the firmware serves an asset under.
///
/// Anything named `index.htm…` is the site root; everything else is served
/// by name from the root.
pub fn url_path(name: &str) -> String {
    if name.starts_with("index.htm") {
        "/".to_string()
    } else {
        format!("/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_format() {
        let tag = etag(1234, b"ABCEFGHIJKLMNOPQRSTU");
        assert_eq!(tag, "1234-QUJDRUZHSElKS0xNTk9QUVJTVFU");
        let (_, digest_part) = tag.split_once('-').unwrap();
        assert_eq!(digest_part.len(), ETAG_DIGEST_CHARS);
    }

    #[test]
    fn test_etag_drops_padding_of_sha1() {
        // SHA-1("") = 2jmj7l5rSw0yVb/vlWAYkK/YBwk=
        let d = ContentDigest::of(b"");
        assert_eq!(d.to_base64(), "2jmj7l5rSw0yVb/vlWAYkK/YBwk=");
        assert_eq!(etag(20, d.as_bytes()), "20-2jmj7l5rSw0yVb/vlWAYkK/YBwk");
    }

    #[test]
    fn test_digest_known_value() {
        assert_eq!(
            ContentDigest::of(b"abc").to_string(),
            "qZk+NkcGgWq6PiVxeFDCbJzQ2J0="
        );
    }

    #[test]
    fn test_url_path() {
        assert_eq!(url_path("index.html"), "/");
        assert_eq!(url_path("index.htm"), "/");
        assert_eq!(url_path("index.html.js"), "/");
        assert_eq!(url_path("app.js"), "/app.js");
        assert_eq!(url_path("main.js"), "/main.js");
        assert_eq!(url_path("myindex.html"), "/myindex.html");
    }
}
