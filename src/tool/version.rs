//! Versions as printed by `<tool> -v`.

pub use semver::Version;

/// Parse a tool version, padding short forms to three components.
///
/// `8` reads as `8.0.0` and `3.2` as `3.2.0`. A leading `v` is dropped.
/// Pre-release tags are kept, so `4.0.0-rc.1` orders below `4.0.0`.
pub fn parse_version(text: &str) -> Option<Version> {
    let text = text.trim();
    let text = text.strip_prefix('v').unwrap_or(text);
    let split = text.find(['-', '+']).unwrap_or(text.len());
    let (core, suffix) = text.split_at(split);
    if core.is_empty() {
        return None;
    }

    let missing = 3usize.saturating_sub(core.split('.').count());
    let padded = format!("{core}{}{suffix}", ".0".repeat(missing));
    Version::parse(&padded).ok()
}
