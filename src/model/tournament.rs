use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One listed event, in the shape both sources are normalized into.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentRecord {
    /// Source identifier; only the Metrix feed carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub link: Option<String>,
    pub location: String,
    pub coords: Coords,
    pub dates: TournamentDates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    /// Set on a primary record only, and only when something was merged into it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_tournaments: Option<Vec<RelatedTournament>>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Coords {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Coords {
    pub const UNKNOWN: Self = Self {
        lat: None,
        lng: None,
    };
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDates {
    pub start_tournament: EventDate,
    pub end_tournament: Option<EventDate>,
    pub start_registration: Option<EventDate>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RelatedTournament {
    pub id: String,
    pub round: String,
}

/// A date as a source delivered it.
///
/// The official listing gives epoch seconds which we turn into an instant,
/// serialized as an ISO-8601 string with millisecond precision. The Metrix
/// feed already carries its own representation, which is passed through
/// untouched.
///
/// Deserializing is untagged, so a verbatim string that is itself RFC 3339
/// (`"2024-05-01T00:00:00Z"`) reads back as `Instant` and re-serializes with
/// milliseconds. The pipeline only serializes, so this affects readers of
/// the cached JSON only.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum EventDate {
    #[serde(with = "iso_millis")]
    Instant(DateTime<Utc>),
    Verbatim(Value),
}

impl EventDate {
    /// The string the date serializes to, used when comparing events.
    #[must_use]
    pub fn key_fragment(&self) -> String {
        match self {
            Self::Instant(instant) => iso_millis::format(instant),
            Self::Verbatim(Value::String(s)) => s.clone(),
            Self::Verbatim(other) => other.to_string(),
        }
    }
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(instant: &DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(
        instant: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(instant))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
