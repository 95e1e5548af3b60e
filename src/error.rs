use thiserror::Error;
use url::Url;

use crate::{output::WriteError, renderer::RenderError};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to start the browser: {0:#}")]
    DriverStartup(anyhow::Error),
    #[error("Gave up on {url} after {attempts} attempts: {source}")]
    RenderTimeout {
        url: Url,
        attempts: u32,
        #[source]
        source: RenderError,
    },
    #[error(transparent)]
    Write(#[from] WriteError),
}
