use std::{
    ops::{Deref, DerefMut},
    thread::sleep,
    time::Duration,
};

use log::{debug, error};
use thiserror::Error;
use url::Url;

/// The browser as seen by the scraper: one tab showing one listing page.
///
/// Implementations block until each command has been carried out.
pub trait PageRenderer {
    fn navigate(&mut self, url: &Url) -> Result<(), RenderError>;

    /// Sends a single page-down key press.
    fn scroll(&mut self) -> Result<(), RenderError>;

    fn wait(&mut self, duration: Duration) {
        sleep(duration);
    }

    /// The html currently rendered in the tab.
    fn content(&mut self) -> Result<String, RenderError>;

    /// Switches the listing from card to cell layout.
    fn select_cell_layout(&mut self) -> Result<(), RenderError>;

    fn close(&mut self) -> Result<(), RenderError>;
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Element {0:?} is not present yet")]
    MissingElement(String),
    #[error("The game listing has not been rendered yet")]
    LayoutNotReady,
    #[error("Browser command failed: {0:#}")]
    Driver(anyhow::Error),
    #[error("The browser has already been closed")]
    Closed,
}
impl RenderError {
    /// Whether trying again after a short wait may succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Owns a renderer and closes it when dropped, whichever way the run ends.
pub struct RendererGuard<R: PageRenderer> {
    renderer: R,
    closed: bool,
}

impl<R: PageRenderer> RendererGuard<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            closed: false,
        }
    }

    pub fn close(mut self) -> Result<(), RenderError> {
        self.close_once()
    }

    fn close_once(&mut self) -> Result<(), RenderError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        debug!("Closing the browser");
        self.renderer.close()
    }
}

impl<R: PageRenderer> Deref for RendererGuard<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.renderer
    }
}
impl<R: PageRenderer> DerefMut for RendererGuard<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

impl<R: PageRenderer> Drop for RendererGuard<R> {
    fn drop(&mut self) {
        if let Err(e) = self.close_once() {
            error!("Failed to close the browser: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::{PageRenderer, RenderError, RendererGuard};
    use crate::test_util::MockRenderer;

    #[test]
    fn guard_closes_on_drop() {
        let closed = Rc::new(Cell::new(0));
        {
            let _guard = RendererGuard::new(MockRenderer::new(vec![]).count_closes(&closed));
        }
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn explicit_close_is_not_repeated_on_drop() {
        let closed = Rc::new(Cell::new(0));
        let guard = RendererGuard::new(MockRenderer::new(vec![]).count_closes(&closed));
        guard.close().unwrap();
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn guard_closes_when_unwinding() {
        let closed = Rc::new(Cell::new(0));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut guard = RendererGuard::new(MockRenderer::new(vec![]).count_closes(&closed));
            let _ = guard.scroll();
            panic!("scraping blew up");
        }));
        assert!(result.is_err());
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn closed_is_the_only_permanent_failure() {
        assert!(!RenderError::Closed.is_transient());
        assert!(RenderError::LayoutNotReady.is_transient());
        assert!(RenderError::MissingElement("a".to_owned()).is_transient());
    }
}
