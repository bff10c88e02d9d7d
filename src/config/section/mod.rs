//! Configuration section definitions.

mod output;
mod package;
mod tool;

pub use output::OutputConfig;
pub use package::PackageConfig;
pub use tool::ToolConfig;

/// C++ identifier, optionally `::`-qualified when `qualified` is set.
pub(crate) fn is_cpp_identifier(s: &str, qualified: bool) -> bool {
    let simple = |part: &str| {
        let mut chars = part.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    if qualified {
        s.split("::").all(simple)
    } else {
        simple(s)
    }
}
