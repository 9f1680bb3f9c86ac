use crate::chapters::{self, BookChapters, SkipOptions};
use crate::cli::Cli;
use crate::container::Container;
use crate::cover;
use crate::metadata;
use crate::output;
use anyhow::Result;

pub fn run(cli: &Cli) -> Result<()> {
    let container = Container::open(&cli.input)?;
    let skip = SkipOptions {
        toc: cli.skip_toc,
        license: cli.skip_license,
    };

    let Some(output_path) = cli.output_path() else {
        // Query-only mode: run each requested action, write nothing.
        if cli.extract_cover {
            cover::extract_and_save_cover(&container, &cli.input);
        }
        if cli.return_dict {
            print_chapters(&chapters::collect_chapters(&container, skip));
        }
        if cli.return_title {
            println!("{}", metadata::book_title(&container)?);
        }
        if cli.return_author {
            println!("{}", metadata::book_authors(&container));
        }
        return Ok(());
    };

    let title = metadata::book_title(&container)?;
    let book = chapters::collect_chapters(&container, skip);
    if cli.extract_cover {
        cover::extract_and_save_cover(&container, &cli.input);
    }

    output::write_book(output_path, &title, &book, output::write_title_enabled())?;
    eprintln!(
        "Extracted {} chapters to {}",
        book.len(),
        output_path.display()
    );

    Ok(())
}

fn print_chapters(chapters: &BookChapters) {
    for (key, body) in chapters.iter() {
        println!("{}", key.title().unwrap_or(""));
        println!("{}", body.unwrap_or(""));
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const OPF: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://www.idpf.org/2007/opf"
         xmlns:dc="http://purl.org/dc/elements/1.1/"
         xmlns:opf="http://www.idpf.org/2007/opf"
         version="2.0" unique-identifier="uid">
  <metadata>
    <dc:title>Test Book</dc:title>
    <dc:creator opf:role="aut">Jane Author</dc:creator>
    <meta name="cover" content="cover-img"/>
  </metadata>
  <manifest>
    <item id="toc" href="toc.xhtml" media-type="application/xhtml+xml"/>
    <item id="ch1" href="text/ch1.xhtml" media-type="application/xhtml+xml"/>
    <item id="ch2" href="text/ch2.xhtml" media-type="application/xhtml+xml"/>
    <item id="cover-img" href="images/cover.jpg" media-type="image/jpeg"/>
    <item id="css" href="style.css" media-type="text/css"/>
  </manifest>
  <spine>
    <itemref idref="toc"/>
    <itemref idref="ch1"/>
    <itemref idref="ch2"/>
  </spine>
</package>
"#;

    const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

    fn write_fixture_epub(dir: &Path) -> PathBuf {
        let path = dir.join("book.epub");
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default();

        let files: &[(&str, &[u8])] = &[
            ("mimetype", b"application/epub+zip"),
            ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
            ("OEBPS/content.opf", OPF.as_bytes()),
            (
                "OEBPS/toc.xhtml",
                b"<html><head><title>Table of Contents</title></head>\
                  <body><p>Preface</p><p>Chapter 1</p></body></html>",
            ),
            (
                "OEBPS/text/ch1.xhtml",
                b"<html><body><h1>Preface</h1><p>Opening words.</p></body></html>",
            ),
            (
                "OEBPS/text/ch2.xhtml",
                b"<html><body><h1>Chapter 1</h1><p>It begins.</p></body></html>",
            ),
            ("OEBPS/images/cover.jpg", &[0xFF, 0xD8, 0xFF, 0xE0]),
            ("OEBPS/style.css", b"body { margin: 0 }"),
        ];
        for (name, data) in files {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
        path
    }

    #[test]
    fn skip_toc_excludes_contents_document() {
        let dir = tempfile::tempdir().unwrap();
        let container = Container::open(&write_fixture_epub(dir.path())).unwrap();

        let book = chapters::collect_chapters(
            &container,
            SkipOptions {
                toc: true,
                license: false,
            },
        );

        assert_eq!(book.len(), 2);
        assert_eq!(book.get("Preface"), Some(Some("Opening words.")));
        assert_eq!(book.get("Chapter 1"), Some(Some("It begins.")));
        assert_eq!(book.get("Table of Contents"), None);
    }

    #[test]
    fn without_skip_the_toc_document_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let container = Container::open(&write_fixture_epub(dir.path())).unwrap();

        let book = chapters::collect_chapters(&container, SkipOptions::default());
        assert_eq!(book.len(), 3);
        assert!(book.get("Table of Contents").is_some());
    }

    #[test]
    fn cover_resolves_through_opf_meta() {
        let dir = tempfile::tempdir().unwrap();
        let container = Container::open(&write_fixture_epub(dir.path())).unwrap();

        let cover = cover::find_cover(&container).unwrap();
        assert_eq!(cover.id, "cover-img");
        assert_eq!(cover.path, "OEBPS/images/cover.jpg");
        assert_eq!(cover.data, vec![0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn metadata_comes_from_the_package() {
        let dir = tempfile::tempdir().unwrap();
        let container = Container::open(&write_fixture_epub(dir.path())).unwrap();

        assert_eq!(metadata::book_title(&container).unwrap(), "Test Book");
        assert_eq!(
            metadata::book_authors(&container),
            metadata::Authors::One("Jane Author".into())
        );
    }

    #[test]
    fn run_writes_the_structured_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_fixture_epub(dir.path());
        let output = dir.path().join("book.txt");

        let cli = Cli {
            input,
            output: output.to_string_lossy().into_owned(),
            return_title: false,
            return_dict: false,
            extract_cover: false,
            return_author: false,
            skip_toc: true,
            skip_license: false,
        };
        run(&cli).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "Test Book\n\nPreface\n\nOpening words.\n\nChapter 1\n\nIt begins.\n\n"
        );
    }

    #[test]
    fn unreadable_container_is_a_fatal_error() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("not-an-epub.epub");
        fs::write(&bogus, b"garbage").unwrap();
        assert!(Container::open(&bogus).is_err());
        assert!(Container::open(&dir.path().join("missing.epub")).is_err());
    }
}
