use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::{error, info};
use thiserror::Error;

use crate::{
    config::Settings,
    error::ScrapeError,
    output::{self, OutputTarget},
    renderer::{PageRenderer, RendererGuard},
    schema::RunMetadata,
    session::ScrapeSession,
};

#[derive(Debug)]
pub struct RunSummary {
    pub pages_visited: u32,
    pub games: usize,
    pub exhausted: bool,
    /// `None` when the run was not supposed to write anything.
    pub written_to: Option<PathBuf>,
}

/// A run that did not complete, with what it managed to do before.
#[derive(Debug, Error)]
#[error("Stopped after {pages_visited} pages with {games} games: {source}")]
pub struct RunError {
    pub pages_visited: u32,
    pub games: usize,
    pub written_to: Option<PathBuf>,
    #[source]
    pub source: ScrapeError,
}

/// Scrapes with `renderer`, closes it, and writes the output file.
///
/// A page that keeps failing yields `Err` even when the partial output was written.
pub fn run<R: PageRenderer>(
    renderer: R,
    settings: &Settings,
    now: DateTime<Utc>,
) -> Result<RunSummary, RunError> {
    let mut renderer = RendererGuard::new(renderer);
    let outcome = ScrapeSession::new(settings).run(&mut *renderer);
    if let Err(e) = renderer.close() {
        error!("Failed to close the browser: {e}");
    }

    let (document, failure) = outcome.into_document(settings, now);
    let RunMetadata {
        pages_visited,
        games_count: games,
        exhausted,
        ..
    } = document.meta;
    info!("{games} games collected from {pages_visited} pages");

    let written_to = if !settings.writes_output() {
        info!("Test run, nothing is written");
        None
    } else if failure.is_some() && !settings.partial {
        None
    } else {
        match output::write(&document, &OutputTarget::new(settings, now)) {
            Ok(path) => Some(path),
            Err(e) => {
                if let Some(failure) = &failure {
                    error!("{failure}");
                }
                return Err(RunError {
                    pages_visited,
                    games,
                    written_to: None,
                    source: e.into(),
                });
            }
        }
    };

    match failure {
        None => Ok(RunSummary {
            pages_visited,
            games,
            exhausted,
            written_to,
        }),
        Some(source) => Err(RunError {
            pages_visited,
            games,
            written_to,
            source,
        }),
    }
}
