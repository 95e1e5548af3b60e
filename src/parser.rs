//! Reads games out of the rendered explore page.
//!
//! The page is built with styled-components, so class names carry a generated
//! suffix; selectors only rely on the stable prefix.

use std::collections::BTreeMap;

use itertools::Itertools;
use log::{debug, warn};
use protondb_scraping_utils::{regex, selector};
use scraper::{ElementRef, Html};
use thiserror::Error;

use crate::schema::{AppId, GameRecord, ReportCount, Tier};

pub const LAYOUT_CONTAINER: &str = r#"div[class*="GameLayout__Container"]"#;
pub const GAME_CELL: &str = r#"div[class*="GameCell__Container-"]"#;

#[derive(Debug, Error)]
pub enum CellParseError {
    #[error("{0} not found")]
    MissingElement(&'static str),
    #[error("The title link has no `href`")]
    MissingHref,
    #[error("No app id in link {0:?}")]
    InvalidIdentifier(String),
    #[error("The rating label is empty")]
    EmptyRating,
}

/// Whether the listing container has been rendered yet.
pub fn layout_ready(html: &Html) -> bool {
    html.select(selector!(LAYOUT_CONTAINER)).next().is_some()
}

/// All games on the page, in display order.  Cells that cannot be read are
/// skipped.
pub fn parse_page(html: &Html) -> Vec<GameRecord> {
    html.select(selector!(GAME_CELL))
        .enumerate()
        .filter_map(|(i, cell)| match parse_cell(cell) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping game cell #{i}: {e}");
                debug!("  {}", cell.html());
                None
            }
        })
        .collect()
}

pub fn parse_cell(cell: ElementRef) -> Result<GameRecord, CellParseError> {
    let link = cell
        .select(selector!(r#"span[class^="GameSlice__Title"] a"#))
        .next()
        .ok_or(CellParseError::MissingElement("Title link"))?;
    let identifier = parse_app_id(link.value().attr("href").ok_or(CellParseError::MissingHref)?)?;
    let name = collapsed_text(link);

    let rating = collapsed_text(
        cell.select(selector!(r#"span[class^="Summary__GrowingSpan"]"#))
            .next()
            .ok_or(CellParseError::MissingElement("Rating summary"))?,
    );
    if rating.is_empty() {
        return Err(CellParseError::EmptyRating);
    }

    let score = cell
        .select(selector!(r#"div[class*="GameSlice__Expander-"] span"#))
        .next()
        .and_then(|span| parse_report_count(&span.text().collect::<String>()));

    let metadata = BTreeMap::from([
        ("protondb_link".to_owned(), identifier.protondb_link()),
        ("steam_link".to_owned(), identifier.steam_link()),
    ]);

    Ok(GameRecord::builder()
        .name(name.into())
        .identifier(identifier)
        .rating(Tier::from(rating.as_str()))
        .score(score)
        .metadata(metadata)
        .build())
}

/// The last path segment of the game link, e.g. `/app/620` -> `620`.
fn parse_app_id(href: &str) -> Result<AppId, CellParseError> {
    let path = href.split(&['?', '#'][..]).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    AppId::try_from(segment.to_owned()).map_err(|_| CellParseError::InvalidIdentifier(href.to_owned()))
}

/// `"1,234 reports"` -> 1234
fn parse_report_count(text: &str) -> Option<ReportCount> {
    let digits = regex!(r"\d[\d,]*").find(text)?.as_str().replace(',', "");
    digits.parse::<u32>().ok().map(ReportCount::from)
}

fn collapsed_text(element: ElementRef) -> String {
    element.text().flat_map(str::split_whitespace).join(" ")
}
