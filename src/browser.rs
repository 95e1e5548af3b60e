use std::{ffi::OsStr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use log::{debug, info};
use url::Url;

use crate::{
    config::Settings,
    error::ScrapeError,
    renderer::{PageRenderer, RenderError},
};

/// The icon switching the explore page to its cell layout.
pub const CELL_LAYOUT_ICON: &str = r#"div[class*="Explore__EndJustified"] path[d^="M3 "]"#;

const DISABLE_IMAGES: &str = "--blink-settings=imagesEnabled=false";

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BrowserOptions {
    pub headless: bool,
    pub disable_images: bool,
    /// Chrome executable.  Located (or downloaded) automatically when absent.
    pub executable: Option<PathBuf>,
    pub window_size: (u32, u32),
}
impl From<&Settings> for BrowserOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            headless: settings.optimize,
            disable_images: settings.optimize,
            executable: settings.driver.clone(),
            window_size: (1280, 1024),
        }
    }
}

/// A single Chrome tab driven over the DevTools protocol.
pub struct ChromeRenderer {
    session: Option<(Browser, Arc<Tab>)>,
}

impl ChromeRenderer {
    pub fn launch(options: &BrowserOptions) -> Result<Self, ScrapeError> {
        (|| -> anyhow::Result<Self> {
            let mut args = vec![];
            if options.disable_images {
                args.push(OsStr::new(DISABLE_IMAGES));
            }
            let launch_options = LaunchOptionsBuilder::default()
                .headless(options.headless)
                .path(options.executable.clone())
                .window_size(Some(options.window_size))
                .idle_browser_timeout(Duration::from_secs(600))
                .args(args)
                .build()?;
            info!(
                "Starting the browser ({})",
                if options.headless { "headless" } else { "visible" }
            );
            let browser = Browser::new(launch_options)?;
            let tab = browser.new_tab().context("While opening a tab")?;
            Ok(Self {
                session: Some((browser, tab)),
            })
        })()
        .map_err(ScrapeError::DriverStartup)
    }

    fn tab(&self) -> Result<&Arc<Tab>, RenderError> {
        self.session
            .as_ref()
            .map(|(_, tab)| tab)
            .ok_or(RenderError::Closed)
    }
}

impl PageRenderer for ChromeRenderer {
    fn navigate(&mut self, url: &Url) -> Result<(), RenderError> {
        let tab = self.tab()?;
        debug!("Navigating to {url}");
        tab.navigate_to(url.as_str())
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(RenderError::Driver)?;
        Ok(())
    }

    fn scroll(&mut self) -> Result<(), RenderError> {
        self.tab()?
            .press_key("PageDown")
            .map_err(RenderError::Driver)?;
        Ok(())
    }

    fn content(&mut self) -> Result<String, RenderError> {
        self.tab()?.get_content().map_err(RenderError::Driver)
    }

    fn select_cell_layout(&mut self) -> Result<(), RenderError> {
        let tab = self.tab()?;
        let icon = tab
            .find_element(CELL_LAYOUT_ICON)
            .map_err(|e| {
                debug!("{e:#}");
                RenderError::MissingElement(CELL_LAYOUT_ICON.to_owned())
            })?;
        icon.click().map_err(RenderError::Driver)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), RenderError> {
        let Some((browser, tab)) = self.session.take() else {
            return Ok(());
        };
        let result = tab.close(false);
        // The browser process is killed when the last handle goes away.
        drop(browser);
        match result {
            Ok(true) => Ok(()),
            Ok(false) => Err(RenderError::Driver(anyhow!("The tab refused to close"))),
            Err(e) => Err(RenderError::Driver(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::BrowserOptions;
    use crate::config::Settings;

    #[test]
    fn optimize_means_headless_without_images() {
        let options = BrowserOptions::from(&Settings::default());
        assert!(!options.headless);
        assert!(!options.disable_images);
        assert_eq!(options.executable, None);

        let options = BrowserOptions::from(&Settings {
            optimize: true,
            driver: Some(PathBuf::from("/usr/bin/chromium")),
            ..Default::default()
        });
        assert!(options.headless);
        assert!(options.disable_images);
        assert_eq!(options.executable, Some(PathBuf::from("/usr/bin/chromium")));
    }
}
