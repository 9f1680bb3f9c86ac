mod chapters;
mod cli;
mod container;
mod cover;
mod extractor;
mod metadata;
mod output;
mod skip;
mod text;
mod title;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::init();
    let cli = cli::Cli::parse();
    extractor::run(&cli)
}
