//! Pure conversions from raw source fields into [`Coords`] and [`EventDate`].
//! None of these fail: anything unusable comes back as `None`.

use chrono::DateTime;
use serde_json::Value;

use super::{Coords, EventDate};

/// Map links on the official listing end in `.../@<lat>,<lng>,<zoom>`.
pub const COORDS_MARKER: &str = "@";

/// Separates an event title from its round label in the Metrix feed.
pub const ROUND_SEPARATOR: &str = "&rarr;";

/// Raw registration value meaning registration never opens.
pub const NO_REGISTRATION: &str = "0";

#[must_use]
pub fn coords_from_map_link(link: Option<&str>) -> Coords {
    let Some((_, tail)) = link.and_then(|l| l.split_once(COORDS_MARKER)) else {
        return Coords::UNKNOWN;
    };
    let mut parts = tail.split(',');
    match (parts.next(), parts.next()) {
        (Some(lat), Some(lng)) => Coords {
            lat: parse_float(lat),
            lng: parse_float(lng),
        },
        _ => Coords::UNKNOWN,
    }
}

#[must_use]
pub fn date_from_epoch_secs(raw: Option<&str>) -> Option<EventDate> {
    let secs = raw?.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0).map(EventDate::Instant)
}

#[must_use]
pub fn registration_date(raw: Option<&str>) -> Option<EventDate> {
    match raw.map(str::trim) {
        Some(NO_REGISTRATION) => None,
        other => date_from_epoch_secs(other),
    }
}

/// Accepts a JSON number or a numeric string.
#[must_use]
pub fn coord_from_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float(s),
        _ => None,
    }
}

/// Splits `"Title &rarr; Round 2"` into `("Title", "Round 2")`.
/// Without a separator both halves are the whole (trimmed) input.
#[must_use]
pub fn split_round(raw: &str) -> (String, String) {
    let mut segments = raw.split(ROUND_SEPARATOR).map(str::trim);
    let first = segments.next().unwrap_or_default().to_string();
    let last = segments.last().map_or_else(|| first.clone(), str::to_string);
    (first, last)
}

/// First segment of a `&rarr;`-separated field.
#[must_use]
pub fn leading_segment(raw: &str) -> String {
    raw.split(ROUND_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Reads the longest leading decimal number, ignoring whatever follows it,
/// so `"25.4651/data=x"` gives `25.4651`.
fn parse_float(raw: &str) -> Option<f64> {
    let raw = raw.trim_start();
    let bytes = raw.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    raw[..end].parse::<f64>().ok().filter(|f| f.is_finite())
}
