//! Free-text date parsing.
//!
//! hyresult.com renders event dates in several shapes depending on the page
//! and the age of the event:
//!
//! * `8 years ago (20 Oct 2018)`
//! * `28 Feb 2026, Taiwan, Asia`
//! * `20 Oct 2018`
//! * `27–28 Jan 2024`
//! * `31 Aug–1 Sep 2024`
//!
//! [`parse_date`] tries one strategy per shape, in that order, and returns the
//! first date any of them produces. Ranges resolve to their first day.

use chrono::NaiveDate;
use tracing::trace;

use crate::error::DateFormatError;

type Strategy = fn(&str) -> Option<NaiveDate>;

/// Ordered from most to least specific; a range must never be read as a plain date.
const STRATEGIES: [(&str, Strategy); 5] = [
    ("parenthetical", parenthetical),
    ("comma-delimited", comma_delimited),
    ("plain", plain),
    ("same-month range", same_month_range),
    ("cross-month range", cross_month_range),
];

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a calendar date out of free text.
///
/// ```
/// use chrono::NaiveDate;
/// use hyrox_results::parse_date;
///
/// let date = parse_date("31 Aug–1 Sep 2024").unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2024, 8, 31).unwrap());
/// ```
pub fn parse_date(text: &str) -> Result<NaiveDate, DateFormatError> {
    STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let date = strategy(text)?;
            trace!(strategy = name, text, %date, "parsed date");
            Some(date)
        })
        .ok_or_else(|| DateFormatError {
            text: text.to_string(),
        })
}

/// Plain dates and both range shapes, used on substrings carved out by the
/// parenthetical and comma-delimited strategies.
fn date_or_range(text: &str) -> Option<NaiveDate> {
    plain(text)
        .or_else(|| same_month_range(text))
        .or_else(|| cross_month_range(text))
}

/// `8 years ago (20 Oct 2018)`
pub(crate) fn parenthetical(text: &str) -> Option<NaiveDate> {
    let (_, rest) = text.split_once('(')?;
    let (inner, _) = rest.split_once(')')?;
    date_or_range(inner)
}

/// `28 Feb 2026, Taiwan, Asia`
pub(crate) fn comma_delimited(text: &str) -> Option<NaiveDate> {
    let (date, _) = text.split_once(',')?;
    date_or_range(date)
}

/// `20 Oct 2018`, or ISO `2018-10-20`.
pub(crate) fn plain(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, ISO_DATE_FORMAT) {
        return Some(date);
    }
    match text.split_whitespace().collect::<Vec<_>>().as_slice() {
        [day, month, year] => day_month_year(day, month, year),
        _ => None,
    }
}

/// `27–28 Jan 2024`. Both ends must be real dates.
pub(crate) fn same_month_range(text: &str) -> Option<NaiveDate> {
    match text.split_whitespace().collect::<Vec<_>>().as_slice() {
        [days, month, year] => {
            let (first, last) = split_range(days)?;
            day_month_year(last, month, year)?;
            day_month_year(first, month, year)
        }
        _ => None,
    }
}

/// `31 Aug–1 Sep 2024`. Both ends must be real dates.
pub(crate) fn cross_month_range(text: &str) -> Option<NaiveDate> {
    match text.split_whitespace().collect::<Vec<_>>().as_slice() {
        [day, span, last_month, year] => {
            let (first_month, last_day) = split_range(span)?;
            day_month_year(last_day, last_month, year)?;
            day_month_year(day, first_month, year)
        }
        _ => None,
    }
}

fn split_range(text: &str) -> Option<(&str, &str)> {
    let (first, second) = text.split_once(['–', '—', '-'])?;
    (!first.is_empty() && !second.is_empty()).then_some((first, second))
}

fn day_month_year(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let day = day.parse().ok()?;
    let month = month_number(month)?;
    let year = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Accepts `Sep`, `Sept`, `sept.` and `September` alike: any prefix of at least
/// three letters.
fn month_number(name: &str) -> Option<u32> {
    let name = name.trim_end_matches('.').to_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|month| month.starts_with(&name))
        .and_then(|index| u32::try_from(index + 1).ok())
}
