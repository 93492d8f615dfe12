use ::scraper::{ElementRef, Selector};
use tracing::instrument;

use crate::error::{ExtractError, Result};
use crate::extract::{cells, link, paginate, parse_duration, parse_position, Extracted, RowRule};
use crate::model::{AgeGroup, Ranking};
use crate::scraper::{element_text, Fetch};

/// A division ranking table, header row first. Columns: (blank), position,
/// age-group position, athlete, age group, finish time, analysis link.
pub(crate) struct RankingRows {
    base_url: String,
    rows: Selector,
    td: Selector,
    anchor: Selector,
}

impl RankingRows {
    pub(crate) fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            rows: Selector::parse("tr.border-t")?,
            td: Selector::parse("td")?,
            anchor: Selector::parse("a[href]")?,
        })
    }
}

impl RowRule for RankingRows {
    type Record = Ranking;
    const KIND: &'static str = "ranking";

    fn rows(&self) -> &Selector {
        &self.rows
    }

    fn header_rows(&self) -> usize {
        1
    }

    fn min_rows(&self) -> usize {
        2
    }

    fn parse(&self, row: &ElementRef) -> std::result::Result<Ranking, ExtractError> {
        let cells = cells(row, &self.td, 7)?;
        let text = |i: usize| element_text(&cells[i]);

        Ok(Ranking {
            position: parse_position("position", &text(1))?,
            position_ag: text(2).parse().ok().filter(|p| *p >= 1),
            name: text(3),
            age_group: parse_age_group(&text(4)),
            time: parse_duration(&text(5))?,
            url: link(&self.base_url, &cells[6], &self.anchor, "analysis link")?,
        })
    }
}

/// `25-29` → [`AgeGroup::From25To29`]. Anything unrecognised is treated as not reported.
fn parse_age_group(text: &str) -> Option<AgeGroup> {
    text.trim().to_lowercase().replace('-', "_").parse().ok()
}

#[instrument(skip(client))]
pub(crate) async fn get_rankings<F: Fetch>(
    client: &F,
    division_url: &str,
    base_url: &str,
) -> Result<Extracted<Ranking>> {
    paginate(client, division_url, &RankingRows::new(base_url)?).await
}
