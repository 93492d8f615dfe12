//! Read HYROX race results from [hyresult.com](https://www.hyresult.com).
//!
//! [`HyroxClient`] walks the site from the event list down to individual
//! results: events, their divisions, the paginated division rankings, and
//! optionally each athlete's splits and profile link. Malformed rows are
//! skipped and reported rather than failing a whole page, and optional fields
//! are retried a bounded number of times before being left empty.
//!
//! Dates on the site come in several shapes; [`parse_date`] understands all
//! of them:
//!
//! ```
//! use chrono::NaiveDate;
//! use hyrox_results::parse_date;
//!
//! let date = parse_date("2 weeks ago (7–9 Nov 2025)").unwrap();
//! assert_eq!(date, NaiveDate::from_ymd_opt(2025, 11, 7).unwrap());
//! ```

pub use client::{ClientConfig, HyroxClient};
pub use date::parse_date;
pub use error::{DateFormatError, ExtractError, HyroxError, Result};
pub use extract::{
    EnrichField, EnrichOptions, Enriched, Extracted, FailurePolicy, RetryPolicy,
    SkippedEnrichment, SkippedRow,
};
pub use loader::{LoadReport, ResultsLoader};
pub use model::*;
pub use crate::scraper::Fetch;
pub use writer::{ResultsWriter, WriteMode};

mod client;
mod date;
pub mod error;
pub mod extract;
mod loader;
mod model;
mod scraper;
#[cfg(test)]
mod testing;
mod writer;
