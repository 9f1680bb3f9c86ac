//! Structured plain-text output.

use crate::chapters::BookChapters;
use anyhow::{Context, Result};
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Name of the variable controlling whether the book title block is written.
pub const WRITE_BOOK_TITLE_VAR: &str = "EPUBPARSER_WRITE_BOOK_TITLE";

/// Whether to write the book title block, from the process environment.
///
/// The variable is read once and never mutated: unset or empty means
/// enabled, the integer `1` means enabled, anything else disables it.
pub fn write_title_enabled() -> bool {
    title_policy(env::var(WRITE_BOOK_TITLE_VAR).ok().as_deref())
}

fn title_policy(value: Option<&str>) -> bool {
    match value {
        None | Some("") => true,
        Some(v) => v.trim().parse::<i64>() == Ok(1),
    }
}

/// Write the extracted book as UTF-8 text.
///
/// Layout: optionally the book title followed by two newlines, then each
/// chapter key and body in mapping-iteration order, each followed by two
/// newlines. Sentinel keys and bodies render as empty strings.
pub fn write_book(
    path: &Path,
    title: &str,
    chapters: &BookChapters,
    write_title: bool,
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut out = BufWriter::new(file);

    if write_title {
        write!(out, "{title}\n\n")?;
    }
    for (key, body) in chapters.iter() {
        write!(out, "{}\n\n", key.title().unwrap_or(""))?;
        write!(out, "{}\n\n", body.unwrap_or(""))?;
    }

    out.flush()
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}
