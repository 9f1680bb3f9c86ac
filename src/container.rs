//! EPUB container access.
//!
//! Opens the zip package, locates the OPF descriptor through
//! `META-INF/container.xml` and exposes the manifest as an ordered collection
//! of typed items with their bytes, plus the package metadata the rest of the
//! pipeline consumes. Nothing here interprets document content.

use anyhow::{bail, Context, Result};
use log::warn;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::ZipArchive;

/// Broad classification of a manifest item by media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Document,
    Image,
    Style,
    Other,
}

/// One manifest entry together with its content.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: String,
    /// Full path inside the archive, `.`/`..` segments resolved.
    pub path: String,
    pub media_type: String,
    /// Space-separated structural properties from the manifest, if any.
    pub properties: Option<String>,
    pub data: Vec<u8>,
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        if self.media_type == "application/xhtml+xml" || self.media_type == "text/html" {
            ItemKind::Document
        } else if self.media_type.starts_with("image/") {
            ItemKind::Image
        } else if self.media_type == "text/css" {
            ItemKind::Style
        } else {
            ItemKind::Other
        }
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    pub fn has_property(&self, property: &str) -> bool {
        self.properties
            .as_deref()
            .is_some_and(|props| props.split_whitespace().any(|p| p == property))
    }

    /// Best-effort text decode; invalid UTF-8 is replaced, never fatal.
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

/// A `<meta>` entry from the OPF metadata block.
#[derive(Debug, Clone)]
pub struct MetaEntry {
    pub name: Option<String>,
    pub content: Option<String>,
    pub value: Option<String>,
}

/// A `dc:creator` entry with its optional role.
#[derive(Debug, Clone)]
pub struct Creator {
    pub name: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PackageMetadata {
    pub title: Option<String>,
    pub creators: Vec<Creator>,
    pub meta: Vec<MetaEntry>,
}

/// Parsed EPUB container: ordered items plus package metadata.
pub struct Container {
    pub items: Vec<Item>,
    pub metadata: PackageMetadata,
}

impl Container {
    /// Open and parse an EPUB file. Any failure here is fatal to the run.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open EPUB: {}", path.display()))?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .with_context(|| format!("Not a readable zip archive: {}", path.display()))?;

        let opf_path = find_opf_path(&mut archive)?;
        let opf_dir = opf_path
            .rsplit_once('/')
            .map(|(dir, _)| dir.to_string())
            .unwrap_or_default();

        let opf_content = read_file(&mut archive, &opf_path)
            .with_context(|| format!("Failed to read package descriptor: {opf_path}"))?;
        let doc = roxmltree::Document::parse(&opf_content)
            .map_err(|e| anyhow::anyhow!("Invalid package descriptor {opf_path}: {e}"))?;

        let metadata = parse_metadata(&doc);
        let items = load_items(&doc, &opf_dir, &mut archive);

        Ok(Self { items, metadata })
    }

    pub fn item_by_id(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_by_path(&self, path: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.path == path)
    }

    /// Document items in manifest order.
    pub fn documents(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(|item| item.kind() == ItemKind::Document)
    }
}

fn find_opf_path<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>) -> Result<String> {
    let container = read_file(archive, "META-INF/container.xml")
        .context("Failed to read META-INF/container.xml")?;
    let doc = roxmltree::Document::parse(&container)
        .map_err(|e| anyhow::anyhow!("Invalid container.xml: {e}"))?;

    for node in doc.descendants() {
        if node.tag_name().name() == "rootfile" {
            if let Some(path) = node.attribute("full-path") {
                return Ok(path.to_string());
            }
        }
    }

    bail!("No rootfile declared in container.xml")
}

fn read_file<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive.by_name(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

fn parse_metadata(doc: &roxmltree::Document) -> PackageMetadata {
    let mut metadata = PackageMetadata::default();

    for node in doc.descendants() {
        match node.tag_name().name() {
            "title" if metadata.title.is_none() => {
                metadata.title = node.text().map(|t| t.trim().to_string());
            }
            "creator" => {
                if let Some(text) = node.text() {
                    let role = node
                        .attributes()
                        .find(|a| a.name() == "role")
                        .map(|a| a.value().to_string());
                    metadata.creators.push(Creator {
                        name: text.trim().to_string(),
                        role,
                    });
                }
            }
            "meta" => {
                metadata.meta.push(MetaEntry {
                    name: node.attribute("name").map(str::to_string),
                    content: node.attribute("content").map(str::to_string),
                    value: node.text().map(|t| t.trim().to_string()),
                });
            }
            _ => {}
        }
    }

    metadata
}

fn load_items<R: Read + std::io::Seek>(
    doc: &roxmltree::Document,
    opf_dir: &str,
    archive: &mut ZipArchive<R>,
) -> Vec<Item> {
    let mut items = Vec::new();

    for node in doc.descendants() {
        if node.tag_name().name() != "item" {
            continue;
        }
        let (Some(id), Some(href), Some(media_type)) = (
            node.attribute("id"),
            node.attribute("href"),
            node.attribute("media-type"),
        ) else {
            warn!("Manifest item missing id, href or media-type; skipping");
            continue;
        };

        let path = resolve_href(opf_dir, href);
        let mut data = Vec::new();
        match archive.by_name(&path) {
            Ok(mut file) => {
                if let Err(e) = file.read_to_end(&mut data) {
                    warn!("Failed to read {path}: {e}; skipping item {id}");
                    continue;
                }
            }
            Err(e) => {
                warn!("Manifest item {id} points at missing entry {path}: {e}");
                continue;
            }
        }

        items.push(Item {
            id: id.to_string(),
            path,
            media_type: media_type.to_string(),
            properties: node.attribute("properties").map(str::to_string),
            data,
        });
    }

    items
}

/// Join `href` onto `base_dir`, resolving `.` and `..` segments.
pub fn resolve_href(base_dir: &str, href: &str) -> String {
    let mut segments: Vec<&str> = if base_dir.is_empty() {
        Vec::new()
    } else {
        base_dir.split('/').collect()
    };

    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}
