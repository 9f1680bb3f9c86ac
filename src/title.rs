use crate::text::{normalize_text, strip_tags};
use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").unwrap());
static H2_WITH_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<h2[^>]*id\s*=\s*["']([^"']+)["'][^>]*>(.*?)</h2>"#).unwrap());
static H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<h2[^>]*>(.*?)</h2>").unwrap());
static CHAP_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^chap(?:ter)?\d*$").unwrap());

/// A chapter title in both of its derived forms.
///
/// `raw` keeps the fragment's internal line breaks (tags stripped, ends
/// trimmed); `normalized` collapses all whitespace to single spaces and is
/// empty iff the fragment held no visible text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleCandidate {
    pub raw: String,
    pub normalized: String,
}

impl TitleCandidate {
    fn from_fragment(fragment: &str) -> Self {
        let raw = strip_tags(fragment).trim().to_string();
        let normalized = normalize_text(&raw);
        Self { raw, normalized }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Extract a best-guess chapter title from a document's markup.
///
/// Candidate patterns are tried in priority order, returning the first whose
/// normalized form is non-empty:
/// 1. the `<title>` element,
/// 2. the first `<h1>`,
/// 3. the first `<h2>` whose `id` fully matches `chap`/`chapter` plus
///    optional digits (all id-carrying `<h2>` tags scanned in document order),
/// 4. the first `<h2>` regardless of id.
///
/// A match with whitespace-only text counts as a non-match and the cascade
/// continues. When nothing matches, both forms are empty.
pub fn extract_chapter_title(html: &str) -> TitleCandidate {
    if let Some(m) = TITLE_RE.captures(html) {
        let candidate = TitleCandidate::from_fragment(&m[1]);
        if !candidate.is_empty() {
            return candidate;
        }
    }

    if let Some(m) = H1_RE.captures(html) {
        let candidate = TitleCandidate::from_fragment(&m[1]);
        if !candidate.is_empty() {
            return candidate;
        }
    }

    for m in H2_WITH_ID_RE.captures_iter(html) {
        if CHAP_ID_RE.is_match(m[1].trim()) {
            let candidate = TitleCandidate::from_fragment(&m[2]);
            if !candidate.is_empty() {
                return candidate;
            }
        }
    }

    if let Some(m) = H2_RE.captures(html) {
        let candidate = TitleCandidate::from_fragment(&m[1]);
        if !candidate.is_empty() {
            return candidate;
        }
    }

    TitleCandidate::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_tag_wins_over_h1() {
        let html = "<html><head><title>X</title></head><body><h1>Y</h1></body></html>";
        assert_eq!(extract_chapter_title(html).normalized, "X");
    }

    #[test]
    fn h1_wins_without_title_tag() {
        let html = "<body><h1>Y</h1><h2>Z</h2></body>";
        assert_eq!(extract_chapter_title(html).normalized, "Y");
    }

    #[test]
    fn chapter_id_h2_beats_earlier_plain_h2() {
        let html = "<h2>Other</h2><h2 id=\"chapter3\">Intro</h2>";
        assert_eq!(extract_chapter_title(html).normalized, "Intro");
    }

    #[test]
    fn non_matching_id_falls_through_to_first_h2() {
        let html = "<h2>Other</h2><h2 id=\"foo\">Intro</h2>";
        assert_eq!(extract_chapter_title(html).normalized, "Other");
    }

    #[test]
    fn chap_id_must_match_fully() {
        // "chapters" is not "chapter" plus digits; if it matched, the later
        // heading would win. It falls through to the first plain <h2> instead.
        let html = "<h2>First</h2><h2 id='chapters'>Second</h2>";
        assert_eq!(extract_chapter_title(html).normalized, "First");
    }

    #[test]
    fn single_quoted_id_accepted() {
        let html = "<h2 id='chap12'>Twelve</h2>";
        assert_eq!(extract_chapter_title(html).normalized, "Twelve");
    }

    #[test]
    fn whitespace_only_candidate_is_a_non_match() {
        let html = "<title> \n </title><h1>Real</h1>";
        assert_eq!(extract_chapter_title(html).normalized, "Real");
    }

    #[test]
    fn raw_keeps_line_breaks_normalized_collapses_them() {
        let html = "<h1>Part\nOne</h1>";
        let candidate = extract_chapter_title(html);
        assert_eq!(candidate.raw, "Part\nOne");
        assert_eq!(candidate.normalized, "Part One");
    }

    #[test]
    fn inner_tags_are_stripped() {
        let html = "<h1><em>Styled</em> Title</h1>";
        assert_eq!(extract_chapter_title(html).normalized, "Styled Title");
    }

    #[test]
    fn nothing_found_yields_empty() {
        let candidate = extract_chapter_title("<p>No headings here.</p>");
        assert!(candidate.is_empty());
        assert_eq!(candidate.raw, "");
    }
}
