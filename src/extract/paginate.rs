use ::scraper::Html;
use tracing::{debug, instrument};

use super::rows::{extract, Extracted, RowRule};
use crate::error::Result;
use crate::scraper::{with_query, Fetch};

/// Query parameter selecting a page of a listing.
const PAGE_PARAM: &str = "p";

/// Drain every page of a listing.
///
/// Fetches `base_url?p=1`, `?p=2`, … and stops at the first page that yields
/// no records; the source renders pages past the end as empty tables, so
/// that page is never followed by another fetch. A failed fetch is returned
/// as-is.
#[instrument(skip(fetcher, rule), fields(kind = R::KIND))]
pub async fn paginate<F, R>(fetcher: &F, base_url: &str, rule: &R) -> Result<Extracted<R::Record>>
where
    F: Fetch,
    R: RowRule,
{
    let mut all = Extracted::default();
    let mut page: u32 = 1;

    loop {
        let url = with_query(base_url, PAGE_PARAM, page);
        let body = fetcher.fetch(&url).await?;
        let extracted = extract(&Html::parse_document(&body), rule);

        if extracted.is_empty() {
            all.skipped.extend(extracted.skipped);
            debug!(page, count = all.len(), "reached empty page");
            return Ok(all);
        }

        debug!(page, count = extracted.len(), "parsed page");
        all.append(extracted);
        page += 1;
    }
}
