use std::time::Duration;

use ::scraper::{ElementRef, Html, Selector};

use crate::error::{ExtractError, Result};
use crate::extract::parse_duration;
use crate::model::{Splits, SEGMENTS};
use crate::scraper::element_text;

/// Rows in a fully scored splits table.
const SPLIT_ROWS: usize = 31;

const TRANSITION_MARKER: &str = "roxzone";

/// The splits table on a race analysis page.
///
/// The first row is the entry transition and is always dropped. The rest
/// alternate run / station, with roxzone transitions interleaved and
/// ignored. Until the source has finished scoring a race the table is short
/// or incomplete; that is reported as an error so the caller can retry.
pub(crate) struct SplitsPage {
    rows: Selector,
    td: Selector,
}

impl SplitsPage {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            rows: Selector::parse("tr.border-b")?,
            td: Selector::parse("td")?,
        })
    }

    pub(crate) fn extract(&self, document: &Html) -> std::result::Result<Splits, ExtractError> {
        let rows: Vec<ElementRef> = document.select(&self.rows).collect();
        if rows.len() != SPLIT_ROWS {
            return Err(ExtractError::Shape {
                context: "splits rows",
                expected: SPLIT_ROWS,
                found: rows.len(),
            });
        }

        let mut runs = Vec::with_capacity(SEGMENTS);
        let mut stations = Vec::with_capacity(SEGMENTS);
        let mut is_run = true;
        for row in &rows[1..] {
            let Some(split) = self.parse_row(row)? else {
                continue;
            };
            if is_run {
                runs.push(split);
            } else {
                stations.push(split);
            }
            is_run = !is_run;
        }

        Ok(Splits::new(
            exactly_eight("run segments", runs)?,
            exactly_eight("station segments", stations)?,
        ))
    }

    /// `None` for a transition row.
    fn parse_row(&self, row: &ElementRef) -> std::result::Result<Option<Duration>, ExtractError> {
        let cells: Vec<ElementRef> = row.select(&self.td).collect();
        let (Some(name), Some(time)) = (cells.first(), cells.last()) else {
            return Err(ExtractError::Missing("split cells"));
        };
        if element_text(name).to_lowercase().contains(TRANSITION_MARKER) {
            return Ok(None);
        }
        parse_duration(&element_text(time)).map(Some)
    }
}

fn exactly_eight(
    context: &'static str,
    splits: Vec<Duration>,
) -> std::result::Result<[Duration; SEGMENTS], ExtractError> {
    <[Duration; SEGMENTS]>::try_from(splits).map_err(|splits| ExtractError::Shape {
        context,
        expected: SEGMENTS,
        found: splits.len(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::Station;

    fn row(name: &str, time: &str) -> String {
        format!("<tr class=\"border-b\"><td>{name}</td><td>00:00:00</td><td>{time}</td></tr>")
    }

    /// A complete analysis page: the entry marker, 8 runs, 8 stations and 14
    /// roxzones, i.e. 31 rows. Run `i` takes `4:1i`, station `i` takes `3:2i`.
    pub(crate) fn splits_page() -> String {
        splits_page_with(|rows| rows)
    }

    pub(crate) fn splits_page_with(edit: impl FnOnce(Vec<String>) -> Vec<String>) -> String {
        let mut rows = vec![row("Roxzone In", "0:45")];
        for i in 0..8 {
            rows.push(row(&format!("Running {}", i + 1), &format!("4:1{i}")));
            rows.push(row("Roxzone", "0:30"));
            rows.push(row(&format!("Station {}", i + 1), &format!("3:2{i}")));
            if i < 6 {
                rows.push(row("Roxzone", "0:25"));
            }
        }
        format!(
            "<html><body><table><tr class=\"border-t\"><th>Segment</th></tr>{}</table></body></html>",
            edit(rows).concat()
        )
    }

    fn extract(page: &str) -> std::result::Result<Splits, ExtractError> {
        SplitsPage::new().unwrap().extract(&Html::parse_document(page))
    }

    #[test]
    fn test_extract_complete_splits() {
        let splits = extract(&splits_page()).unwrap();

        assert_eq!(splits.runs()[0], Duration::from_secs(250));
        assert_eq!(splits.runs()[7], Duration::from_secs(257));
        assert_eq!(splits.station(Station::Ski), Duration::from_secs(200));
        assert_eq!(splits.station(Station::Wallballs), Duration::from_secs(207));
        assert_eq!(splits.run_total(), Duration::from_secs(2028));
        assert_eq!(splits.station_total(), Duration::from_secs(1628));
        assert_eq!(splits.total_time(), splits.run_total() + splits.station_total());
    }

    #[test]
    fn test_short_table_is_not_ready() {
        let page = splits_page_with(|mut rows| {
            rows.truncate(20);
            rows
        });
        assert_eq!(
            extract(&page),
            Err(ExtractError::Shape {
                context: "splits rows",
                expected: 31,
                found: 20
            })
        );
    }

    #[test]
    fn test_missing_segments_are_not_ready() {
        // Same row count, but one station has not been scored yet.
        let page = splits_page_with(|mut rows| {
            rows[3] = row("Roxzone", "0:00");
            rows
        });
        assert!(matches!(
            extract(&page),
            Err(ExtractError::Shape { context: "run segments" | "station segments", .. })
        ));
    }

    #[test]
    fn test_unparsable_time_is_not_ready() {
        let page = splits_page_with(|mut rows| {
            rows[1] = row("Running 1", "--");
            rows
        });
        assert!(matches!(
            extract(&page),
            Err(ExtractError::Field { field: "duration", .. })
        ));
    }
}
