use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static P_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</p>").unwrap());
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Remove all HTML tags, leaving the text content untouched.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Convert a markup fragment to plain text.
///
/// Closing paragraph tags become single newlines, line-break tags become
/// spaces, and every remaining tag is deleted. No entity decoding and no
/// whitespace collapsing happens here; already-plain text passes through
/// unchanged.
pub fn html_to_text(html: &str) -> String {
    let text = P_CLOSE_RE.replace_all(html, "\n");
    let text = BR_RE.replace_all(&text, " ");
    TAG_RE.replace_all(&text, "").into_owned()
}

/// Normalize a title fragment: `<br>` tags and literal newlines become
/// spaces, whitespace runs collapse to one space, ends are trimmed.
///
/// Used on title candidates only, never on chapter bodies.
pub fn normalize_text(text: &str) -> String {
    let text = BR_RE.replace_all(text, " ");
    let text = text.replace('\n', " ");
    WS_RE.replace_all(&text, " ").trim().to_string()
}
