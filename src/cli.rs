use clap::Parser;
use std::path::{Path, PathBuf};

/// Extract chapter titles and texts from an EPUB file
#[derive(Parser, Debug)]
#[command(name = "epub2txt", version, about)]
pub struct Cli {
    /// Path to the input EPUB file
    pub input: PathBuf,

    /// Path to the output text file, or the literal "None" to only run the
    /// requested query actions
    pub output: String,

    /// Print the book title
    #[arg(long, default_value_t = false)]
    pub return_title: bool,

    /// Print the chapter-to-text mapping
    #[arg(long, default_value_t = false)]
    pub return_dict: bool,

    /// Extract and save the cover image
    #[arg(long, default_value_t = false)]
    pub extract_cover: bool,

    /// Print the book's author
    #[arg(long, default_value_t = false)]
    pub return_author: bool,

    /// Skip chapters whose title matches any table-of-contents variant
    #[arg(long, default_value_t = false)]
    pub skip_toc: bool,

    /// Skip chapters whose title matches any license variant
    #[arg(long, default_value_t = false)]
    pub skip_license: bool,
}

impl Cli {
    /// The output file path, unless the "None" sentinel asked for query-only
    /// mode.
    pub fn output_path(&self) -> Option<&Path> {
        if self.output == "None" {
            None
        } else {
            Some(Path::new(&self.output))
        }
    }
}
