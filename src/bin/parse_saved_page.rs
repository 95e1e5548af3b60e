use std::path::PathBuf;

use clap::Parser;
use log::info;
use protondb_scraping::parser;
use protondb_scraping_utils::fs_json_util::to_string_pretty;
use scraper::Html;

/// Reads the games out of an explore page saved from a browser.
#[derive(Parser)]
struct Opts {
    input_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let opts = Opts::parse();
    let html = Html::parse_document(&fs_err::read_to_string(opts.input_file)?);
    if !parser::layout_ready(&html) {
        info!("The game listing container is missing");
    }
    let records = parser::parse_page(&html);
    info!("{} games found", records.len());
    println!("{}", to_string_pretty(&records)?);
    Ok(())
}
