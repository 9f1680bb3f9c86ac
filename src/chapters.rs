//! Per-document chapter assembly into a book-level mapping.

use crate::container::Container;
use crate::skip::{should_skip, LICENSE_VARIANTS, TOC_VARIANTS};
use crate::text::html_to_text;
use crate::title::extract_chapter_title;
use log::debug;

/// Key of one assembled chapter.
///
/// A document whose title cascade came up empty gets an explicit positional
/// sentinel instead of an empty or magic string, so real content can never
/// collide with "absent".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterKey {
    Title(String),
    Untitled(usize),
}

impl ChapterKey {
    /// The normalized title, or `None` for the untitled sentinel.
    pub fn title(&self) -> Option<&str> {
        match self {
            ChapterKey::Title(t) => Some(t),
            ChapterKey::Untitled(_) => None,
        }
    }
}

/// Insertion-ordered mapping from chapter key to body text.
///
/// Duplicate `Title` keys overwrite the earlier body in place, keeping the
/// original position: last write wins silently. That mirrors keying chapters
/// by their title text and is a documented quirk, not a merge.
#[derive(Debug, Default)]
pub struct BookChapters {
    entries: Vec<(ChapterKey, Option<String>)>,
}

impl BookChapters {
    pub fn insert(&mut self, key: ChapterKey, body: Option<String>) {
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = body;
        } else {
            self.entries.push((key, body));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChapterKey, Option<&str>)> {
        self.entries.iter().map(|(k, b)| (k, b.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, title: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k.title() == Some(title))
            .map(|(_, b)| b.as_deref())
    }
}

/// Which chapter classes to discard while assembling.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipOptions {
    pub toc: bool,
    pub license: bool,
}

/// Remove `raw_title` from the head of `text` if it appears there verbatim.
///
/// Leading whitespace before the title is ignored; only that one occurrence
/// is removed and the remainder is stripped of leading whitespace.
fn remove_title_from_text(raw_title: &str, text: &str) -> String {
    if raw_title.is_empty() {
        return text.to_string();
    }
    let head = text.trim_start();
    match head.strip_prefix(raw_title) {
        Some(rest) => rest.trim_start().to_string(),
        None => text.to_string(),
    }
}

/// Assemble every document item of the container into a chapter mapping.
///
/// Items are processed in the order the container enumerates them. Skipped
/// items leave no entry; everything else is keyed by its normalized title
/// (or a positional sentinel) with the title stripped from the body head.
pub fn collect_chapters(container: &Container, skip: SkipOptions) -> BookChapters {
    let mut chapters = BookChapters::default();

    for (index, item) in container.documents().enumerate() {
        let html = item.as_text();

        let title = extract_chapter_title(&html);
        if skip.toc && should_skip(&title.normalized, TOC_VARIANTS) {
            debug!("Skipping table-of-contents document {}", item.path);
            continue;
        }
        if skip.license && should_skip(&title.normalized, LICENSE_VARIANTS) {
            debug!("Skipping license document {}", item.path);
            continue;
        }

        let body = remove_title_from_text(&title.raw, &html_to_text(&html));
        let body = {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        let key = if title.is_empty() {
            ChapterKey::Untitled(index)
        } else {
            ChapterKey::Title(title.normalized)
        };
        chapters.insert(key, body);
    }

    chapters
}
