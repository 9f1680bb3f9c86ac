//! Locale-aware classification of chapter titles that should be skipped.

/// Lowercase variants of "table of contents" headings.
pub const TOC_VARIANTS: &[&str] = &[
    "table of contents",
    "toc",
    "contents",
    "sumário",
    "indice",
    "índice",
    "tabla de contenidos",
    "table des matières",
    "sommaire",
    "inhaltsverzeichnis",
    "inhalt",
];

/// Lowercase variants of "license" headings.
pub const LICENSE_VARIANTS: &[&str] = &[
    "license",
    "licence",
    "license agreement",
    "terms of license",
    "licença",
    "licença de uso",
    "licencia",
    "acuerdo de licencia",
    "lizenz",
    "lizenzvereinbarung",
    "contrat de licence",
    "accord de licence",
    "conditions de licence",
];

/// Whether a normalized title matches any variant.
///
/// Matching is substring-based on the lowercased title, deliberately
/// permissive so decorated headings like "Table of Contents — Part I"
/// still classify.
pub fn should_skip(title: &str, variants: &[&str]) -> bool {
    let title = title.to_lowercase();
    variants.iter().any(|variant| title.contains(variant))
}
