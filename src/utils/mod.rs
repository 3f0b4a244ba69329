//! Small helpers shared by the compiler, the emitter and the plugin.

pub mod fs;

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier regex is valid")
});

/// Reserved words that cannot name an `export const` binding.
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Check whether `name` can be written unquoted as a property key.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Check whether `name` can be used as an exported binding.
pub fn is_export_name(name: &str) -> bool {
    is_identifier(name) && !RESERVED_WORDS.contains(&name)
}

/// Render a path with `/` separators regardless of platform.
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("posts"));
        assert!(is_identifier("_draft$"));
        assert!(!is_identifier("2posts"));
        assert!(!is_identifier("my-posts"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_is_export_name_rejects_reserved() {
        assert!(is_export_name("posts"));
        assert!(!is_export_name("default"));
        assert!(!is_export_name("class"));
    }

    #[test]
    fn test_to_slash_path() {
        assert_eq!(to_slash_path(Path::new("content/posts/a.mdx")), "content/posts/a.mdx");
    }
}
