//! File name to linker symbol mapping.

/// Map a file name to a symbol usable in assembly and C++.
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`, one per character,
/// so `main.3f2a.js` becomes `main_3f2a_js`. Total and deterministic; it does
/// not make distinct names unique (`a-b.js` and `a.b.js` collide), which the
/// manifest builder checks.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Check the identifier grammar produced by [`sanitize`].
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty() && symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_common_names() {
        assert_eq!(sanitize("index.html"), "index_html");
        assert_eq!(sanitize("main.js"), "main_js");
        assert_eq!(sanitize("vendors~main.8f3a.js"), "vendors_main_8f3a_js");
        assert_eq!(sanitize("already_ok_123"), "already_ok_123");
    }

    #[test]
    fn test_sanitize_non_ascii_is_one_per_char() {
        assert_eq!(sanitize("приложение.js"), format!("{}js", "_".repeat(11)));
        assert_eq!(sanitize("a b"), "a_b");
    }

    #[test]
    fn test_sanitize_output_is_valid() {
        for name in ["index.html", "x-y z.js", "..", "ü.js", "0.js"] {
            assert!(is_valid_symbol(&sanitize(name)), "{name}");
        }
        assert!(!is_valid_symbol(""));
        assert!(!is_valid_symbol("a.b"));
    }

    #[test]
    fn test_distinct_names_can_collide() {
        assert_eq!(sanitize("app-1.js"), sanitize("app.1.js"));
    }
}
