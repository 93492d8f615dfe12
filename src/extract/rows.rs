use ::scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::ExtractError;

/// The shape of one kind of record on a listing page.
///
/// A rule names the repeating element (a table row, a card), how many of those
/// are headers, and how to turn one element into a record. Parsing a row is
/// allowed to fail; [`extract`] keeps going.
pub trait RowRule {
    type Record;

    /// What the rows are, for log messages.
    const KIND: &'static str;

    /// Selector for the repeating element.
    fn rows(&self) -> &Selector;

    /// Leading matches that are headers rather than records.
    fn header_rows(&self) -> usize {
        0
    }

    /// Fewer matches than this means the page has no data at all.
    fn min_rows(&self) -> usize {
        0
    }

    fn parse(&self, row: &ElementRef) -> Result<Self::Record, ExtractError>;
}

/// The outcome of extracting a page (or several): the records that parsed and
/// the rows that didn't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRow>,
}

/// A row that was dropped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Position of the element among all matches on its page, headers included.
    pub index: usize,
    pub reason: ExtractError,
}

impl<T> Extracted<T> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Move everything from `other` into `self`.
    pub fn append(&mut self, mut other: Extracted<T>) {
        self.records.append(&mut other.records);
        self.skipped.append(&mut other.skipped);
    }
}

impl<T> Default for Extracted<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Apply `rule` to every matching element of `document`.
///
/// A document that doesn't reach the rule's minimum (e.g. a table with only a
/// header) yields nothing. A row that fails to parse is logged and recorded
/// in [`Extracted::skipped`]; it never affects its siblings.
pub fn extract<R: RowRule>(document: &Html, rule: &R) -> Extracted<R::Record> {
    let elements: Vec<ElementRef> = document.select(rule.rows()).collect();
    if elements.len() < rule.min_rows() {
        debug!(
            kind = R::KIND,
            found = elements.len(),
            min = rule.min_rows(),
            "too few rows, treating page as empty"
        );
        return Extracted::default();
    }

    let mut extracted = Extracted::default();
    for (index, element) in elements.iter().enumerate().skip(rule.header_rows()) {
        match rule.parse(element) {
            Ok(record) => extracted.records.push(record),
            Err(reason) => {
                warn!(kind = R::KIND, index, error = %reason, "skipping malformed row");
                extracted.skipped.push(SkippedRow { index, reason });
            }
        }
    }

    debug!(
        kind = R::KIND,
        count = extracted.records.len(),
        skipped = extracted.skipped.len(),
        "extracted rows"
    );
    extracted
}
