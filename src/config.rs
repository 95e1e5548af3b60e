use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use log::{debug, info};
use protondb_scraping_utils::fs_json_util::read_json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_SOURCE: &str = "https://www.protondb.com/explore";

/// Sort orders offered by the explore page.
#[derive(
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Debug,
    strum::Display,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum Sort {
    RecentlyImproved,
    #[default]
    WilsonRating,
    PlayerCount,
    UserScore,
    MostBorked,
    FixWanted,
}

/// Fully resolved settings of a run.
///
/// Printed by `--printconfig`; the printed json is accepted by `--config`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// Browser executable.  Located automatically when absent.
    pub driver: Option<PathBuf>,
    /// Headless browser without images.
    pub optimize: bool,
    pub source: Url,
    pub sort: Sort,
    pub native: bool,
    /// 50 games per page.
    pub maxpages: u32,
    pub initpage: u32,
    pub pagedown: u32,
    /// Seconds.
    pub wait: f64,
    pub retries: u32,
    pub printconfig: bool,
    /// Write what was collected when a page keeps failing.
    pub partial: bool,
    pub test: bool,
    pub fast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config: None,
            output: None,
            driver: None,
            optimize: false,
            source: Url::parse(DEFAULT_SOURCE).expect("DEFAULT_SOURCE is a valid url"),
            sort: Sort::default(),
            native: false,
            maxpages: 20,
            initpage: 0,
            pagedown: 10,
            wait: 0.4,
            retries: 5,
            printconfig: false,
            partial: true,
            test: false,
            fast: false,
        }
    }
}

/// A subset of [`Settings`], as found in a config file or on the command line.
#[derive(Clone, Default, PartialEq, Debug, Deserialize)]
#[serde(default)]
pub struct PartialSettings {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub driver: Option<PathBuf>,
    pub optimize: Option<bool>,
    pub source: Option<Url>,
    pub sort: Option<Sort>,
    pub native: Option<bool>,
    pub maxpages: Option<u32>,
    pub initpage: Option<u32>,
    pub pagedown: Option<u32>,
    pub wait: Option<f64>,
    pub retries: Option<u32>,
    pub printconfig: Option<bool>,
    pub partial: Option<bool>,
    pub test: Option<bool>,
    pub fast: Option<bool>,
}

#[derive(PartialEq, Debug, Error)]
pub enum SettingsError {
    #[error("`{0}` must be a positive integer")]
    NotPositive(&'static str),
    #[error("`wait` must be a positive number of seconds, got {0}")]
    InvalidWait(f64),
    #[error("Page numbers starting at {initpage} for {maxpages} pages do not fit in 32 bits")]
    PageOutOfRange { initpage: u32, maxpages: u32 },
}

impl Settings {
    /// Layers the config file named by `cli` (if any) and then `cli` itself
    /// over the defaults, and finally applies the presets.
    pub fn resolve(cli: PartialSettings) -> anyhow::Result<Self> {
        let mut settings = Self::default();
        if let Some(path) = &cli.config {
            let file: PartialSettings = read_json(path).context("While reading the config file")?;
            info!("Loaded settings from {path:?}");
            settings.apply(file);
        }
        settings.apply(cli);
        settings.apply_presets();
        settings.validate()?;
        debug!("Settings: {settings:?}");
        Ok(settings)
    }

    pub fn apply(&mut self, overrides: PartialSettings) {
        macro_rules! overwrite {
            ($($field: ident),*) => {
                $(
                    if let Some(value) = overrides.$field {
                        self.$field = value;
                    }
                )*
            };
        }
        macro_rules! overwrite_path {
            ($($field: ident),*) => {
                $(
                    if let Some(value) = overrides.$field {
                        self.$field = Some(value);
                    }
                )*
            };
        }
        overwrite_path!(config, output, driver);
        overwrite!(
            optimize,
            source,
            sort,
            native,
            maxpages,
            initpage,
            pagedown,
            wait,
            retries,
            printconfig,
            partial,
            test,
            fast
        );
    }

    /// `test` wins over everything but `fast`.
    pub fn apply_presets(&mut self) {
        if self.test {
            self.optimize = false;
            self.maxpages = 2;
            self.initpage = 0;
            self.pagedown = 10;
            self.wait = 1.;
            self.output = None;
            self.printconfig = true;
        }
        if self.fast {
            self.optimize = true;
            self.wait = 0.1;
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [
            ("maxpages", self.maxpages),
            ("pagedown", self.pagedown),
            ("retries", self.retries),
        ] {
            if value == 0 {
                return Err(SettingsError::NotPositive(name));
            }
        }
        if self.initpage.checked_add(self.maxpages - 1).is_none() {
            return Err(SettingsError::PageOutOfRange {
                initpage: self.initpage,
                maxpages: self.maxpages,
            });
        }
        if !(self.wait > 0. && Duration::try_from_secs_f64(self.wait).is_ok()) {
            return Err(SettingsError::InvalidWait(self.wait));
        }
        Ok(())
    }

    /// Panics unless the settings passed [`Settings::validate`].
    pub fn wait_duration(&self) -> Duration {
        Duration::from_secs_f64(self.wait)
    }

    /// Url of the `offset`-th page of this run, counted from `initpage`.
    pub fn page_url(&self, offset: u32) -> Url {
        let mut url = self.source.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("page", &(self.initpage + offset).to_string())
                .append_pair("sort", &self.sort.to_string());
            if self.native {
                query.append_pair("selectedFilters", "includeNative");
            }
        }
        url
    }

    /// The test preset only looks at the pages.
    pub fn writes_output(&self) -> bool {
        !self.test
    }
}
