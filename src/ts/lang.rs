//! Language selection via ast-grep-language.
//!
//! We use the built-in `SupportLang` grammars from ast-grep-language rather
//! than depending on each tree-sitter grammar crate directly. Only languages
//! with a documentation dialect are listed here.

use std::path::Path;

pub use ast_grep_language::SupportLang;

/// Languages that have a built-in documentation dialect.
pub const SUPPORTED: &[SupportLang] = &[
    SupportLang::Rust,
    SupportLang::Go,
    SupportLang::Java,
    SupportLang::Kotlin,
    SupportLang::JavaScript,
    SupportLang::TypeScript,
    SupportLang::Tsx,
];

/// Stable lowercase name used in configuration files and CLI output.
pub fn name(lang: SupportLang) -> &'static str {
    match lang {
        SupportLang::Rust => "rust",
        SupportLang::Go => "go",
        SupportLang::Java => "java",
        SupportLang::Kotlin => "kotlin",
        SupportLang::JavaScript => "javascript",
        SupportLang::TypeScript => "typescript",
        SupportLang::Tsx => "tsx",
        _ => "unsupported",
    }
}

/// Inverse of [`name`].
pub fn from_name(name: &str) -> Option<SupportLang> {
    SUPPORTED
        .iter()
        .copied()
        .find(|lang| self::name(*lang) == name.to_ascii_lowercase())
}

/// File extensions recognized for each supported language.
pub fn extensions(lang: SupportLang) -> &'static [&'static str] {
    match lang {
        SupportLang::Rust => &["rs"],
        SupportLang::Go => &["go"],
        SupportLang::Java => &["java"],
        SupportLang::Kotlin => &["kt", "kts"],
        SupportLang::JavaScript => &["js", "mjs", "cjs", "jsx"],
        SupportLang::TypeScript => &["ts", "mts", "cts"],
        SupportLang::Tsx => &["tsx"],
        _ => &[],
    }
}

/// Pick the language for a path from its extension.
pub fn for_path(path: &Path) -> Option<SupportLang> {
    let ext = path.extension()?.to_str()?;
    SUPPORTED
        .iter()
        .copied()
        .find(|lang| extensions(*lang).contains(&ext))
}
