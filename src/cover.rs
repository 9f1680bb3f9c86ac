//! Cover image resolution and persistence.

use crate::container::{resolve_href, Container, Item};
use anyhow::{Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

static SVG_IMAGE_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<image\b[^>]*\bxlink:href="([^"]+)""#).unwrap());

/// Locate the best-candidate cover image, trying each heuristic in order and
/// stopping at the first success:
///
/// 1. an item carrying the `cover-image` structural property,
/// 2. an OPF `<meta>` named `cover` whose referenced item id resolves,
/// 3. an `<image xlink:href=…>` inside an XHTML document, the href resolved
///    against that document's directory,
/// 4. a `cover` meta entry with a `content` attribute naming an item id.
///
/// Every strategy accepts only items whose media type starts with `image/`.
/// No aspect-ratio check is applied.
pub fn find_cover(container: &Container) -> Option<&Item> {
    if let Some(item) = container
        .items
        .iter()
        .find(|item| item.has_property("cover-image") && item.is_image())
    {
        return Some(item);
    }

    for meta in &container.metadata.meta {
        if meta.name.as_deref() != Some("cover") {
            continue;
        }
        let Some(id) = meta.content.as_deref().or(meta.value.as_deref()) else {
            continue;
        };
        match container.item_by_id(id) {
            Some(item) if item.is_image() => return Some(item),
            Some(item) => debug!("cover meta points at non-image item {}", item.id),
            None => warn!("cover meta references unknown item id {id}"),
        }
    }

    for doc in container
        .items
        .iter()
        .filter(|item| item.media_type == "application/xhtml+xml")
    {
        let Some(href) = find_svg_image_href(&doc.as_text()) else {
            continue;
        };
        let doc_dir = doc.path.rsplit_once('/').map_or("", |(dir, _)| dir);
        let resolved = resolve_href(doc_dir, &href);
        if let Some(item) = container.item_by_path(&resolved) {
            if item.is_image() {
                debug!("cover resolved through {}: {}", doc.path, item.path);
                return Some(item);
            }
        }
    }

    for meta in &container.metadata.meta {
        if meta.name.as_deref() == Some("cover") {
            if let Some(id) = meta.content.as_deref() {
                if let Some(item) = container.item_by_id(id) {
                    if item.is_image() {
                        return Some(item);
                    }
                }
            }
        }
    }

    None
}

/// First `xlink:href` of an `<image>` element in the given markup, if any.
fn find_svg_image_href(content: &str) -> Option<String> {
    SVG_IMAGE_HREF_RE
        .captures(content)
        .map(|m| m[1].to_string())
}

/// Destination for a saved cover: `<cwd>/covers/<input-stem><cover-ext>`.
fn cover_output_path(epub_path: &Path, cover: &Item) -> PathBuf {
    let stem = epub_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cover".to_string());
    let name = match Path::new(&cover.path).extension() {
        Some(ext) => format!("{}.{}", stem, ext.to_string_lossy()),
        None => stem,
    };
    PathBuf::from("covers").join(name)
}

fn save_cover(cover: &Item, epub_path: &Path) -> Result<PathBuf> {
    let output = cover_output_path(epub_path, cover);
    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    fs::write(&output, &cover.data)
        .with_context(|| format!("Failed to write cover image: {}", output.display()))?;
    Ok(output)
}

/// Resolve the cover and persist it next to the current directory.
///
/// Finding no cover is reported and non-fatal; a failed write is logged and
/// does not abort the rest of the run.
pub fn extract_and_save_cover(container: &Container, epub_path: &Path) {
    let Some(cover) = find_cover(container) else {
        println!("No cover found.");
        return;
    };
    println!("Cover found: {}", cover.path);

    match save_cover(cover, epub_path) {
        Ok(output) => println!("Cover image saved to {}", output.display()),
        Err(e) => warn!("Error saving cover image: {e:#}"),
    }
}
