//! Generic extraction machinery: per-row fault isolation, pagination, and
//! bounded-retry enrichment, plus the field converters the page rules share.

pub mod enrich;
pub mod paginate;
pub mod rows;

use std::str::FromStr;
use std::time::Duration;

use ::scraper::{ElementRef, Selector};

use crate::error::ExtractError;
use crate::scraper::absolute_url;

pub use enrich::{EnrichField, EnrichOptions, Enriched, Enricher, FailurePolicy, RetryPolicy, SkippedEnrichment};
pub use paginate::paginate;
pub use rows::{extract, Extracted, RowRule, SkippedRow};

/// Parse `H:MM:SS` or `MM:SS` into a duration.
///
/// ```
/// use std::time::Duration;
/// use hyrox_results::extract::parse_duration;
///
/// assert_eq!(parse_duration("1:02:03").unwrap(), Duration::from_secs(3723));
/// assert_eq!(parse_duration("2:03").unwrap(), Duration::from_secs(123));
/// ```
pub fn parse_duration(text: &str) -> Result<Duration, ExtractError> {
    let invalid = |reason: &str| ExtractError::Field {
        field: "duration",
        value: text.to_string(),
        reason: reason.to_string(),
    };

    let parts = text
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| invalid(&e.to_string()))?;

    let (hours, minutes, seconds) = match parts.as_slice() {
        [minutes, seconds] => (0, *minutes, *seconds),
        [hours, minutes, seconds] => (*hours, *minutes, *seconds),
        _ => return Err(invalid("expected 2 or 3 components")),
    };
    hours
        .checked_mul(3600)
        .and_then(|secs| secs.checked_add(minutes.checked_mul(60)?))
        .and_then(|secs| secs.checked_add(seconds))
        .map(Duration::from_secs)
        .ok_or_else(|| invalid("out of range"))
}

/// A required non-negative integer.
pub(crate) fn parse_int(field: &'static str, text: &str) -> Result<u32, ExtractError> {
    text.trim().parse().map_err(|e: std::num::ParseIntError| ExtractError::Field {
        field,
        value: text.to_string(),
        reason: e.to_string(),
    })
}

/// A finishing position: an integer of at least one.
pub(crate) fn parse_position(field: &'static str, text: &str) -> Result<u32, ExtractError> {
    match parse_int(field, text)? {
        0 => Err(ExtractError::Field {
            field,
            value: text.to_string(),
            reason: "positions start at 1".to_string(),
        }),
        position => Ok(position),
    }
}

/// A value from a closed set, e.g. a division or station label.
pub(crate) fn parse_label<T: FromStr>(field: &'static str, label: &str) -> Result<T, ExtractError> {
    label.parse().map_err(|_| ExtractError::Field {
        field,
        value: label.to_string(),
        reason: "not a known value".to_string(),
    })
}

/// Sub-elements of `row` matching `selector`, which must number exactly `expected`.
pub(crate) fn cells<'a>(
    row: &ElementRef<'a>,
    selector: &Selector,
    expected: usize,
) -> Result<Vec<ElementRef<'a>>, ExtractError> {
    let cells: Vec<ElementRef<'a>> = row.select(selector).collect();
    if cells.len() != expected {
        return Err(ExtractError::Shape {
            context: "cell count",
            expected,
            found: cells.len(),
        });
    }
    Ok(cells)
}

/// The absolute target of the first anchor inside `element`.
pub(crate) fn link(
    base_url: &str,
    element: &ElementRef,
    anchor: &Selector,
    field: &'static str,
) -> Result<String, ExtractError> {
    element
        .select(anchor)
        .next()
        .and_then(|a| a.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
        .map(|href| absolute_url(base_url, href))
        .ok_or(ExtractError::Missing(field))
}
