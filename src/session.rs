//! Walks the explore pages one after another and collects their games.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use scraper::Html;
use url::Url;

use crate::{
    accumulator::RecordAccumulator,
    config::Settings,
    error::ScrapeError,
    parser,
    renderer::{PageRenderer, RenderError},
    schema::{GameRecord, OutputDocument, RunMetadata},
};

/// Pause after each navigation, before the configured wait.
const INITIAL_WAIT: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub enum Termination {
    MaxPages,
    /// `page` had no games, or only games already collected.
    Exhausted { page: u32 },
    Failed(ScrapeError),
}

#[derive(Debug)]
pub struct SessionOutcome {
    pub records: Vec<GameRecord>,
    /// Pages read completely.
    pub pages_visited: u32,
    pub termination: Termination,
}

impl SessionOutcome {
    /// The document to write, and the error that ended the session early.
    pub fn into_document(
        self,
        settings: &Settings,
        timestamp: DateTime<Utc>,
    ) -> (OutputDocument, Option<ScrapeError>) {
        let (exhausted, failure) = match self.termination {
            Termination::MaxPages => (false, None),
            Termination::Exhausted { .. } => (true, None),
            Termination::Failed(e) => (false, Some(e)),
        };
        let meta = RunMetadata::builder()
            .timestamp(timestamp)
            .source(settings.source.clone())
            .pages_visited(self.pages_visited)
            .games_count(self.records.len())
            .exhausted(exhausted)
            .partial(failure.is_some())
            .settings(settings.clone())
            .build();
        let document = OutputDocument {
            meta,
            games: self.records,
        };
        (document, failure)
    }
}

pub struct ScrapeSession<'s> {
    settings: &'s Settings,
    accumulator: RecordAccumulator,
    pages_visited: u32,
}

impl<'s> ScrapeSession<'s> {
    pub fn new(settings: &'s Settings) -> Self {
        Self {
            settings,
            accumulator: RecordAccumulator::default(),
            pages_visited: 0,
        }
    }

    pub fn run<R: PageRenderer + ?Sized>(mut self, renderer: &mut R) -> SessionOutcome {
        let termination = self.paginate(renderer);
        SessionOutcome {
            records: self.accumulator.into_records(),
            pages_visited: self.pages_visited,
            termination,
        }
    }

    fn paginate<R: PageRenderer + ?Sized>(&mut self, renderer: &mut R) -> Termination {
        for offset in 0..self.settings.maxpages {
            let page = self.settings.initpage + offset;
            let url = self.settings.page_url(offset);
            info!("Scraping page {page}: {url}");

            let records = match self.scrape_page(renderer, &url) {
                Ok(records) => records,
                Err(e) => {
                    error!("{e}");
                    return Termination::Failed(e);
                }
            };
            self.pages_visited += 1;

            if records.is_empty() {
                info!("No games on page {page}.  Reached the end of the listing.");
                return Termination::Exhausted { page };
            }
            let found = records.len();
            let stats = self.accumulator.merge(records);
            info!(
                "Found {found} games on page {page} ({} new, {} updated).  {} games so far.",
                stats.added,
                stats.replaced,
                self.accumulator.len()
            );
            if stats.added == 0 {
                info!("Page {page} only repeats known games.  Reached the end of the listing.");
                return Termination::Exhausted { page };
            }
        }
        Termination::MaxPages
    }

    fn scrape_page<R: PageRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        url: &Url,
    ) -> Result<Vec<GameRecord>, ScrapeError> {
        let settings = self.settings;
        let wait = settings.wait_duration();

        self.retry(renderer, url, "Navigation", |r| r.navigate(url))?;
        renderer.wait(if settings.fast {
            INITIAL_WAIT
        } else {
            INITIAL_WAIT + wait
        });

        self.retry(renderer, url, "Waiting for the game listing", |r| {
            let html = Html::parse_document(&r.content()?);
            if parser::layout_ready(&html) {
                Ok(())
            } else {
                Err(RenderError::LayoutNotReady)
            }
        })?;

        if !settings.fast {
            match renderer.select_cell_layout() {
                Ok(()) => renderer.wait(wait),
                Err(e) => warn!("Could not switch to the cell layout: {e}"),
            }
        }

        for _ in 0..settings.pagedown {
            self.retry(renderer, url, "Page-down", |r| r.scroll())?;
            renderer.wait(wait);
        }

        let content = self.retry(renderer, url, "Reading the page", |r| r.content())?;
        Ok(parser::parse_page(&Html::parse_document(&content)))
    }

    /// Runs `op` until it succeeds, a permanent error occurs, or `retries`
    /// attempts have been made.
    fn retry<R: PageRenderer + ?Sized, T>(
        &self,
        renderer: &mut R,
        url: &Url,
        what: &str,
        mut op: impl FnMut(&mut R) -> Result<T, RenderError>,
    ) -> Result<T, ScrapeError> {
        let attempts = self.settings.retries;
        let mut attempt = 1;
        loop {
            match op(renderer) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < attempts => {
                    warn!("{what} failed (attempt {attempt}/{attempts}): {e}");
                    renderer.wait(self.settings.wait_duration());
                    attempt += 1;
                }
                Err(source) => {
                    return Err(ScrapeError::RenderTimeout {
                        url: url.clone(),
                        attempts: attempt,
                        source,
                    })
                }
            }
        }
    }
}
