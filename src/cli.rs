use std::path::PathBuf;

use clap::Parser;
use url::Url;

use crate::config::{PartialSettings, Sort};

/// Scrape data from ProtonDB webpage and save results to json file.
///
/// Pages of https://www.protondb.com/explore are opened one after another in a
/// browser, scrolled down until every game is rendered, and read out.
#[derive(Debug, Parser)]
#[command(version, about, long_about)]
pub struct Opts {
    /// Read additional settings file in json format, as displayed with --printconfig.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Name of the database file to create.  Defaults to
    /// "protondb-{sort}-{timestamp}.json" in the current working directory.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Path to the Chrome/Chromium executable.  Located automatically by default.
    #[arg(long, value_name = "FILE")]
    pub driver: Option<PathBuf>,
    /// Run the browser headless and do not load images.  Default is a visible browser.
    #[arg(short = 'z', long)]
    pub optimize: bool,
    /// Starting page to scrape.  Page and sort parameters are appended.
    #[arg(short = 'u', long, value_name = "URL")]
    pub source: Option<Url>,
    /// The sorting of games by ProtonDB webpage.  Defaults to wilsonRating.
    #[arg(short, long, value_enum, value_name = "TYPE")]
    pub sort: Option<Sort>,
    /// Include native Linux games.
    #[arg(short, long)]
    pub native: bool,
    /// Number of pages to scrape.  Each page lists 50 games.  Defaults to 20.
    #[arg(short, long, value_name = "NUM", value_parser = clap::value_parser!(u32).range(1..))]
    pub maxpages: Option<u32>,
    /// Starting page number.  Defaults to 0, the first page.
    #[arg(short, long, value_name = "NUM")]
    pub initpage: Option<u32>,
    /// Page-down presses per page, so that every game gets rendered.  Defaults to 10.
    #[arg(short = 'd', long, value_name = "NUM", value_parser = clap::value_parser!(u32).range(1..))]
    pub pagedown: Option<u32>,
    /// Seconds to wait before processing a page and after each page-down.  Defaults to 0.4.
    #[arg(short, long, value_name = "SECONDS")]
    pub wait: Option<f64>,
    /// Attempts for each browser operation before a page counts as failed.  Defaults to 5.
    #[arg(short, long, value_name = "NUM", value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: Option<u32>,
    /// Print the resolved settings as json.
    #[arg(short, long)]
    pub printconfig: bool,
    /// Do not write the games collected so far when a page keeps failing.
    #[arg(long)]
    pub no_partial: bool,
    /// Preset for trying things out: visible browser, 2 pages, wait 1, pagedown 10,
    /// prints the settings and writes no file.
    #[arg(long)]
    pub test: bool,
    /// Preset for speed: headless without images, wait 0.1, skips the layout switch.
    #[arg(long)]
    pub fast: bool,
}

impl Opts {
    /// Flags only ever switch something on, so an absent flag leaves the
    /// config file's value alone.
    pub fn into_partial_settings(self) -> PartialSettings {
        PartialSettings {
            config: self.config,
            output: self.output,
            driver: self.driver,
            optimize: self.optimize.then_some(true),
            source: self.source,
            sort: self.sort,
            native: self.native.then_some(true),
            maxpages: self.maxpages,
            initpage: self.initpage,
            pagedown: self.pagedown,
            wait: self.wait,
            retries: self.retries,
            printconfig: self.printconfig.then_some(true),
            partial: self.no_partial.then_some(false),
            test: self.test.then_some(true),
            fast: self.fast.then_some(true),
        }
    }
}
