//! Html fixtures shaped like the explore page, and a scripted renderer.

use std::{cell::Cell, rc::Rc, time::Duration};

use anyhow::anyhow;
use itertools::Itertools;
use url::Url;

use crate::renderer::{PageRenderer, RenderError};

pub const EMPTY_DOCUMENT: &str = "<html><head></head><body></body></html>";

pub fn cell(app_id: &str, title: &str, rating: &str, reports: Option<&str>) -> String {
    let expander = reports
        .map(|reports| {
            format!(r#"<div class="GameSlice__Expander-sc-1h7ta6d-4 hDcvYF"><span>{reports}</span></div>"#)
        })
        .unwrap_or_default();
    format!(
        r#"<div class="GameCell__Container-sc-1vynd2j-0 kGwBqk"><span class="GameSlice__Title-sc-1h7ta6d-1 fXyQCn"><a href="/app/{app_id}">{title}</a></span><span class="Summary__GrowingSpan-sc-18cac2b-1 dKbLFt">{rating}</span>{expander}</div>"#
    )
}

pub fn listing(cells: &[String]) -> String {
    format!(
        r#"<html><head></head><body><div class="Explore__EndJustified-sc-1xcdjh2-3 jVbQnI"><svg><path d="M3 13h2v-2H3v2z"></path></svg></div><div class="GameLayout__Container-sc-1e2gd4w-0 bPJhQg">{}</div></body></html>"#,
        cells.concat()
    )
}

/// A listing with `games` distinct games whose app ids are unique per page.
pub fn numbered_page(page: usize, games: usize) -> String {
    listing(
        &(0..games)
            .map(|i| {
                let id = (page * 1000 + i + 1).to_string();
                cell(
                    &id,
                    &format!("Game {id}"),
                    "Gold",
                    Some(&format!("{} reports", i + 1)),
                )
            })
            .collect_vec(),
    )
}

/// Serves `pages[n]` for `?page=n`, and an empty listing past the end.
pub struct MockRenderer {
    pages: Vec<String>,
    current: Option<String>,
    pub visited: Vec<Url>,
    pub scrolls: usize,
    pub waits: Vec<Duration>,
    pub layout_switches: usize,
    not_ready_polls: u32,
    remaining_not_ready: u32,
    layout_switch_fails: bool,
    broken_from: Option<usize>,
    closes: Rc<Cell<u32>>,
    closed: bool,
}

impl MockRenderer {
    pub fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            current: None,
            visited: vec![],
            scrolls: 0,
            waits: vec![],
            layout_switches: 0,
            not_ready_polls: 0,
            remaining_not_ready: 0,
            layout_switch_fails: false,
            broken_from: None,
            closes: Rc::default(),
            closed: false,
        }
    }

    pub fn count_closes(mut self, counter: &Rc<Cell<u32>>) -> Self {
        self.closes = Rc::clone(counter);
        self
    }

    /// Every navigation is followed by `polls` reads of a blank document.
    pub fn not_ready_for(mut self, polls: u32) -> Self {
        self.not_ready_polls = polls;
        self
    }

    /// Navigation to `page` and every later page fails.
    pub fn broken_from(mut self, page: usize) -> Self {
        self.broken_from = Some(page);
        self
    }

    pub fn without_layout_switch(mut self) -> Self {
        self.layout_switch_fails = true;
        self
    }

    pub fn visited_pages(&self) -> Vec<usize> {
        self.visited.iter().filter_map(page_number).collect()
    }

    fn ensure_open(&self) -> Result<(), RenderError> {
        if self.closed {
            return Err(RenderError::Closed);
        }
        Ok(())
    }
}

fn page_number(url: &Url) -> Option<usize> {
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

impl PageRenderer for MockRenderer {
    fn navigate(&mut self, url: &Url) -> Result<(), RenderError> {
        self.ensure_open()?;
        self.visited.push(url.clone());
        let page = page_number(url).ok_or_else(|| RenderError::Driver(anyhow!("No page in {url}")))?;
        if self.broken_from.is_some_and(|broken| page >= broken) {
            return Err(RenderError::Driver(anyhow!("Navigation to {url} timed out")));
        }
        self.current = Some(
            self.pages
                .get(page)
                .cloned()
                .unwrap_or_else(|| listing(&[])),
        );
        self.remaining_not_ready = self.not_ready_polls;
        Ok(())
    }

    fn scroll(&mut self) -> Result<(), RenderError> {
        self.ensure_open()?;
        self.scrolls += 1;
        Ok(())
    }

    fn wait(&mut self, duration: Duration) {
        self.waits.push(duration);
    }

    fn content(&mut self) -> Result<String, RenderError> {
        self.ensure_open()?;
        let current = self
            .current
            .clone()
            .ok_or_else(|| RenderError::Driver(anyhow!("No page has been loaded")))?;
        if self.remaining_not_ready > 0 {
            self.remaining_not_ready -= 1;
            return Ok(EMPTY_DOCUMENT.to_owned());
        }
        Ok(current)
    }

    fn select_cell_layout(&mut self) -> Result<(), RenderError> {
        self.ensure_open()?;
        if self.layout_switch_fails {
            return Err(RenderError::MissingElement("cell layout icon".to_owned()));
        }
        self.layout_switches += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), RenderError> {
        self.closes.set(self.closes.get() + 1);
        self.closed = true;
        Ok(())
    }
}
