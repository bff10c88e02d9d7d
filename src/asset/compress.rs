//! Deterministic gzip compression.

use flate2::{Compression, GzBuilder};
use std::io::{self, Write};

/// Gzip `bytes` reproducibly.
///
/// The header carries no file name and a zero modification time, so equal
/// input always yields an equal payload (and therefore an equal digest).
pub fn compress(bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzBuilder::new()
        .mtime(0)
        .write(Vec::with_capacity(bytes.len() / 2 + 64), Compression::best());
    encoder.write_all(bytes)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn decompress(bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_round_trip() {
        let source = b"<!DOCTYPE html><html><body>hello</body></html>".repeat(20);
        let compressed = compress(&source).unwrap();
        assert_eq!(decompress(&compressed), source);
        assert!(compressed.len() < source.len());
    }

    #[test]
    fn test_deterministic() {
        let source = b"console.log(1)";
        assert_eq!(compress(source).unwrap(), compress(source).unwrap());
    }

    #[test]
    fn test_header_has_no_name_or_mtime() {
        let compressed = compress(b"x").unwrap();
        // magic, deflate
        assert_eq!(&compressed[..3], &[0x1f, 0x8b, 0x08]);
        // FLG: no FNAME
        assert_eq!(compressed[3] & 0x08, 0);
        // MTIME
        assert_eq!(&compressed[4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_empty_input() {
        let compressed = compress(b"").unwrap();
        assert!(decompress(&compressed).is_empty());
    }
}
