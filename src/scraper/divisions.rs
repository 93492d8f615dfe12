use ::scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::error::{ExtractError, Result};
use crate::extract::{cells, extract, link, parse_int, parse_label, Extracted, RowRule};
use crate::model::{Division, DivisionName};
use crate::scraper::{element_text, Fetch};

/// Words that end a division label; whatever follows is decoration.
const GENDERS: [&str; 3] = ["MEN", "WOMEN", "MIXED"];

/// The divisions table on an event page: name, finishers, results link.
pub(crate) struct DivisionRows {
    base_url: String,
    rows: Selector,
    td: Selector,
    anchor: Selector,
}

impl DivisionRows {
    pub(crate) fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            rows: Selector::parse("tr.border-b")?,
            td: Selector::parse("td")?,
            anchor: Selector::parse("a[href]")?,
        })
    }
}

impl RowRule for DivisionRows {
    type Record = Division;
    const KIND: &'static str = "division";

    fn rows(&self) -> &Selector {
        &self.rows
    }

    fn header_rows(&self) -> usize {
        1
    }

    fn min_rows(&self) -> usize {
        2
    }

    fn parse(&self, row: &ElementRef) -> std::result::Result<Division, ExtractError> {
        let cells = cells(row, &self.td, 3)?;
        Ok(Division {
            name: parse_division_name(&element_text(&cells[0]))?,
            finishers: parse_int("finishers", &element_text(&cells[1]))?,
            url: link(&self.base_url, &cells[2], &self.anchor, "division link")?,
        })
    }
}

/// `HYROX PRO DOUBLES MEN` → [`DivisionName::ProDoublesMen`]. The leading brand
/// word is dropped and the label ends at the first gender word.
pub(crate) fn parse_division_name(label: &str) -> std::result::Result<DivisionName, ExtractError> {
    let mut name = Vec::new();
    for word in label.split_whitespace().skip(1) {
        name.push(word.to_lowercase());
        if GENDERS.contains(&word.to_uppercase().as_str()) {
            break;
        }
    }
    parse_label("division", &name.join("_"))
}

#[instrument(skip(client))]
pub(crate) async fn get_divisions<F: Fetch>(
    client: &F,
    event_url: &str,
    base_url: &str,
) -> Result<Extracted<Division>> {
    let body = client.fetch(event_url).await?;
    let divisions = extract(&Html::parse_document(&body), &DivisionRows::new(base_url)?);
    debug!(
        count = divisions.len(),
        skipped = divisions.skipped.len(),
        "parsed divisions"
    );
    Ok(divisions)
}
