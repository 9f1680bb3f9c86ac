//! Book-level metadata lookups.

use crate::container::Container;
use anyhow::{Context, Result};
use std::fmt;

/// Authors of a book, preserving source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authors {
    None,
    One(String),
    Many(Vec<String>),
}

impl fmt::Display for Authors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authors::None => write!(f, "no author"),
            Authors::One(name) => write!(f, "{name}"),
            Authors::Many(names) => write!(f, "{}", names.join(", ")),
        }
    }
}

/// The book title. Required metadata; its absence is an error.
pub fn book_title(container: &Container) -> Result<String> {
    container
        .metadata
        .title
        .clone()
        .context("EPUB metadata has no title")
}

/// The book's authors.
///
/// Creators carrying the `aut` role are preferred; when none are marked,
/// every creator counts.
pub fn book_authors(container: &Container) -> Authors {
    let creators = &container.metadata.creators;
    let mut names: Vec<String> = creators
        .iter()
        .filter(|c| c.role.as_deref() == Some("aut"))
        .map(|c| c.name.clone())
        .collect();
    if names.is_empty() {
        names = creators.iter().map(|c| c.name.clone()).collect();
    }

    match names.len() {
        0 => Authors::None,
        1 => Authors::One(names.remove(0)),
        _ => Authors::Many(names),
    }
}
