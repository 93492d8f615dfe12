use ::scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::date::parse_date;
use crate::error::{ExtractError, Result};
use crate::extract::{extract, link, Extracted, RowRule};
use crate::model::Event;
use crate::scraper::{select_text, Fetch};

/// One card per event on the events listing.
pub(crate) struct EventCards {
    base_url: String,
    cards: Selector,
    name: Selector,
    date: Selector,
    anchor: Selector,
}

impl EventCards {
    pub(crate) fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            cards: Selector::parse(
                "div.rt-reset.rt-BaseCard.rt-Card.rt-r-size-1.rt-variant-surface",
            )?,
            name: Selector::parse("h3")?,
            date: Selector::parse("div.text-sm.text-gray-400")?,
            anchor: Selector::parse("a[href]")?,
        })
    }
}

impl RowRule for EventCards {
    type Record = Event;
    const KIND: &'static str = "event";

    fn rows(&self) -> &Selector {
        &self.cards
    }

    fn parse(&self, card: &ElementRef) -> std::result::Result<Event, ExtractError> {
        let name = select_text(card, &self.name)
            .filter(|name| !name.is_empty())
            .ok_or(ExtractError::Missing("event name"))?;
        let date = select_text(card, &self.date).ok_or(ExtractError::Missing("event date"))?;
        let date = parse_date(&date)?;
        let url = link(&self.base_url, card, &self.anchor, "event link")?;

        Ok(Event { name, date, url })
    }
}

#[instrument(skip(client))]
pub(crate) async fn get_events<F: Fetch>(client: &F, base_url: &str) -> Result<Extracted<Event>> {
    let url = format!("{}/events?tab=all", base_url.trim_end_matches('/'));
    let body = client.fetch(&url).await?;
    let events = extract(&Html::parse_document(&body), &EventCards::new(base_url)?);
    debug!(count = events.len(), skipped = events.skipped.len(), "parsed events page");
    Ok(events)
}
