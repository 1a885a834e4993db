use crate::controller::dedup::merge_related;
use crate::error::AppError;
use crate::model::normalize::{coord_from_value, leading_segment, split_round};
use crate::model::{Coords, EventDate, TournamentDates, TournamentRecord};
use log::{debug, warn};
use serde_json::Value;

/// Competition pages live at `<base><id>`.
pub const METRIX_EVENT_BASE: &str = "https://discgolfmetrix.com/";

// positions within one feed row
const ID: usize = 0;
const TITLE: usize = 1;
const LAT: usize = 2;
const LNG: usize = 3;
const START: usize = 4;
const LOCATION: usize = 7;

/// One feed row, decoded by name.
#[derive(Debug, Clone, PartialEq)]
pub struct MetrixEntry {
    pub id: String,
    pub title: String,
    pub round: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub start: Value,
    pub location: String,
}

impl MetrixEntry {
    /// `None` for rows without a title; those carry no event.
    #[must_use]
    pub fn from_row(row: &[Value]) -> Option<Self> {
        let raw_title = row.get(TITLE).filter(|v| is_truthy(v))?;
        let (title, round) = split_round(&value_text(raw_title));
        Some(Self {
            id: row.get(ID).map(value_text).unwrap_or_default(),
            title,
            round,
            lat: coord_from_value(row.get(LAT)),
            lng: coord_from_value(row.get(LNG)),
            start: row.get(START).cloned().unwrap_or(Value::Null),
            location: row
                .get(LOCATION)
                .map(|v| leading_segment(&value_text(v)))
                .unwrap_or_default(),
        })
    }

    fn into_record(self) -> TournamentRecord {
        TournamentRecord {
            link: Some(format!("{METRIX_EVENT_BASE}{}", self.id)),
            id: Some(self.id),
            title: self.title,
            location: self.location,
            coords: Coords {
                lat: self.lat,
                lng: self.lng,
            },
            dates: TournamentDates {
                start_tournament: EventDate::Verbatim(self.start),
                end_tournament: None,
                start_registration: None,
            },
            round: Some(self.round),
            related_tournaments: None,
        }
    }
}

/// Parses the raw feed body.
///
/// # Errors
///
/// Will return `Err` if the body is not JSON or not an array
pub fn parse_metrix_text(body: &str) -> Result<Vec<TournamentRecord>, AppError> {
    let feed: Value = serde_json::from_str(body)?;
    parse_metrix(&feed)
}

/// Decodes every row and merges rounds of the same event.
///
/// # Errors
///
/// Will return `Err` if the feed is not an array
pub fn parse_metrix(feed: &Value) -> Result<Vec<TournamentRecord>, AppError> {
    let rows = feed
        .as_array()
        .ok_or_else(|| AppError::Parse("metrix feed is not an array".to_string()))?;

    let mut tournaments = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let Some(fields) = row.as_array() else {
            debug!("metrix row {index} is not an array, skipping");
            continue;
        };
        let Some(entry) = MetrixEntry::from_row(fields) else {
            continue;
        };
        if entry.start.is_null() {
            warn!("metrix row {index} ({}) has no start date, skipping", entry.id);
            continue;
        }
        tournaments.push(entry.into_record());
    }

    Ok(merge_related(tournaments))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
