use crate::error::AppError;
use crate::model::normalize::{coords_from_map_link, date_from_epoch_secs, registration_date};
use crate::model::{TournamentDates, TournamentRecord};
use log::warn;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

const ROW_SELECTOR: &str = "table tbody tr";
const TITLE_COL: usize = 0;
const LOCATION_COL: usize = 1;
const START_COL: usize = 2;
const END_COL: usize = 3;
const REGISTRATION_COL: usize = 4;
/// Cells keep their epoch-second value here for client-side sorting.
const DATE_ATTR: &str = "data-sort";

struct Selectors {
    row: Selector,
    cell: Selector,
    anchor: Selector,
}

impl Selectors {
    fn new() -> Result<Self, AppError> {
        let parse = |css: &str| Selector::parse(css).map_err(|e| AppError::Parse(e.to_string()));
        Ok(Self {
            row: parse(ROW_SELECTOR)?,
            cell: parse("td")?,
            anchor: parse("a")?,
        })
    }
}

/// Parses every row of the listing table, in document order. A row that
/// cannot be read is logged and left out.
///
/// Relative links are resolved against `base`.
///
/// # Errors
///
/// Will return `Err` only if the selectors themselves fail to compile
pub fn parse_official(html: &str, base: &Url) -> Result<Vec<TournamentRecord>, AppError> {
    let selectors = Selectors::new()?;
    let document = Html::parse_document(html);

    let mut tournaments = Vec::new();
    for (index, row) in document.select(&selectors.row).enumerate() {
        match parse_row(row, &selectors, base) {
            Ok(record) => tournaments.push(record),
            Err(e) => warn!("official row {index} skipped: {e}"),
        }
    }
    Ok(tournaments)
}

fn parse_row(
    row: ElementRef<'_>,
    selectors: &Selectors,
    base: &Url,
) -> Result<TournamentRecord, AppError> {
    let cells: Vec<ElementRef<'_>> = row.select(&selectors.cell).collect();

    let title_anchor = cells
        .get(TITLE_COL)
        .and_then(|cell| cell.select(&selectors.anchor).next())
        .ok_or("no title link")?;
    let title = element_text(title_anchor);
    if title.is_empty() {
        return Err("empty title".into());
    }
    let link = title_anchor.value().attr("href").map(|href| resolve(base, href));

    let location_cell = cells.get(LOCATION_COL).ok_or("no location cell")?;
    let location_anchor = location_cell.select(&selectors.anchor).next();
    let location = location_anchor.map_or_else(|| element_text(*location_cell), element_text);
    let coords = coords_from_map_link(location_anchor.and_then(|a| a.value().attr("href")));

    let date_attr = |col: usize| cells.get(col).and_then(|cell| cell.value().attr(DATE_ATTR));
    let start_tournament =
        date_from_epoch_secs(date_attr(START_COL)).ok_or("missing or invalid start date")?;

    Ok(TournamentRecord {
        id: None,
        title,
        link,
        location,
        coords,
        dates: TournamentDates {
            start_tournament,
            end_tournament: date_from_epoch_secs(date_attr(END_COL)),
            start_registration: registration_date(date_attr(REGISTRATION_COL)),
        },
        round: None,
        related_tournaments: None,
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn resolve(base: &Url, href: &str) -> String {
    base.join(href).map_or_else(|_| href.to_string(), String::from)
}
