use std::time::Duration;

use ::scraper::Html;
use tracing::{debug, instrument, warn};

use super::rows::SkippedRow;
use crate::error::{ExtractError, HyroxError, Result};
use crate::model::{RaceResult, Ranking};
use crate::scraper::profile::ProfilePage;
use crate::scraper::splits::SplitsPage;
use crate::scraper::{with_query, Fetch};

/// Query parameter selecting a tab of the race analysis page.
const TAB_PARAM: &str = "tab";

/// How often, and how patiently, to re-fetch a detail page that isn't ready.
///
/// The delay is fixed between attempts; there is no growth and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first included. Zero behaves as one.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// What to do when an optional field can't be fetched within the retry budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Fail the whole call with [`HyroxError::EnrichmentExhausted`].
    Abort,
    /// Log it, record it in [`Enriched::skipped`], and leave the field empty.
    #[default]
    SkipAndWarn,
}

/// An optional field that can be attached to a [`Ranking`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum EnrichField {
    Splits,
    Profile,
}

impl EnrichField {
    fn tab(self) -> &'static str {
        match self {
            EnrichField::Splits => "splits",
            EnrichField::Profile => "overview",
        }
    }
}

/// Which optional fields to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichOptions {
    pub splits: bool,
    pub profile: bool,
}

impl EnrichOptions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            splits: true,
            profile: true,
        }
    }

    #[must_use]
    pub fn with_splits(mut self) -> Self {
        self.splits = true;
        self
    }

    #[must_use]
    pub fn with_profile(mut self) -> Self {
        self.profile = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.splits && !self.profile
    }
}

/// An optional field that was left empty after its retries ran out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEnrichment {
    pub athlete: String,
    pub field: EnrichField,
    pub url: String,
    pub attempts: u32,
    pub reason: ExtractError,
}

/// A value together with everything that had to be left out to produce it:
/// optional fields that were never attached, and listing rows that were
/// dropped before enrichment started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enriched<T> {
    pub value: T,
    pub skipped: Vec<SkippedEnrichment>,
    pub skipped_rows: Vec<SkippedRow>,
}

impl<T> Enriched<T> {
    /// True only when no row was dropped and every requested field was attached.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.skipped_rows.is_empty()
    }

    /// Record listing rows that were dropped on the way to `value`.
    #[must_use]
    pub fn with_skipped_rows(mut self, rows: Vec<SkippedRow>) -> Self {
        self.skipped_rows.extend(rows);
        self
    }
}

/// Attaches splits and profile links to rankings, one detail fetch at a time.
pub struct Enricher<'a, F> {
    fetcher: &'a F,
    retry: RetryPolicy,
    on_failure: FailurePolicy,
    splits: SplitsPage,
    profile: ProfilePage,
}

impl<'a, F: Fetch> Enricher<'a, F> {
    /// `base_url` resolves the relative profile links found on detail pages.
    pub fn new(
        fetcher: &'a F,
        base_url: &str,
        retry: RetryPolicy,
        on_failure: FailurePolicy,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            retry,
            on_failure,
            splits: SplitsPage::new()?,
            profile: ProfilePage::new(base_url)?,
        })
    }

    /// Attach the requested fields to one ranking.
    ///
    /// Each field is fetched independently; a field that runs out of retries
    /// is handled according to the [`FailurePolicy`]. The ranking itself is
    /// always kept. Transport failures are returned as-is.
    #[instrument(skip(self, ranking), fields(athlete = %ranking.name))]
    pub async fn enrich(
        &self,
        ranking: Ranking,
        options: EnrichOptions,
    ) -> Result<Enriched<RaceResult>> {
        let mut skipped = Vec::new();
        let mut result = RaceResult::from(ranking);

        if options.splits {
            let outcome = self
                .fetch_field(&result.ranking.url, EnrichField::Splits, |doc| {
                    self.splits.extract(doc)
                })
                .await;
            result.splits = self.settle(outcome, &result.ranking.name, &mut skipped)?;
        }

        if options.profile {
            let outcome = self
                .fetch_field(&result.ranking.url, EnrichField::Profile, |doc| {
                    self.profile.extract(doc)
                })
                .await;
            result.profile = self.settle(outcome, &result.ranking.name, &mut skipped)?;
        }

        Ok(Enriched {
            value: result,
            skipped,
            skipped_rows: Vec::new(),
        })
    }

    /// Attach the requested fields to every ranking, in order.
    pub async fn enrich_all(
        &self,
        rankings: Vec<Ranking>,
        options: EnrichOptions,
    ) -> Result<Enriched<Vec<RaceResult>>> {
        let mut results = Vec::with_capacity(rankings.len());
        let mut skipped = Vec::new();

        for ranking in rankings {
            let enriched = self.enrich(ranking, options).await?;
            results.push(enriched.value);
            skipped.extend(enriched.skipped);
        }

        if !skipped.is_empty() {
            warn!(
                results = results.len(),
                skipped = skipped.len(),
                "some results are missing optional fields"
            );
        }
        Ok(Enriched {
            value: results,
            skipped,
            skipped_rows: Vec::new(),
        })
    }

    async fn fetch_field<T>(
        &self,
        detail_url: &str,
        field: EnrichField,
        extract: impl Fn(&Html) -> std::result::Result<T, ExtractError>,
    ) -> Result<T> {
        let url = with_query(detail_url, TAB_PARAM, field.tab());
        retry_extract(self.fetcher, &url, field, self.retry, extract).await
    }

    fn settle<T>(
        &self,
        outcome: Result<T>,
        athlete: &str,
        skipped: &mut Vec<SkippedEnrichment>,
    ) -> Result<Option<T>> {
        match (outcome, self.on_failure) {
            (Ok(value), _) => Ok(Some(value)),
            (
                Err(HyroxError::EnrichmentExhausted {
                    field,
                    url,
                    attempts,
                    last,
                }),
                FailurePolicy::SkipAndWarn,
            ) => {
                warn!(athlete, %field, url = %url, attempts, error = %last, "skipping enrichment");
                skipped.push(SkippedEnrichment {
                    athlete: athlete.to_string(),
                    field,
                    url,
                    attempts,
                    reason: last,
                });
                Ok(None)
            }
            (Err(e), _) => Err(e),
        }
    }
}

/// Fetch `url` and run `extract` on it until it succeeds or the policy's
/// attempts are used up, sleeping the fixed delay in between.
///
/// Only extraction failures are retried; a failed fetch is returned at once.
pub async fn retry_extract<F, T>(
    fetcher: &F,
    url: &str,
    field: EnrichField,
    policy: RetryPolicy,
    extract: impl Fn(&Html) -> std::result::Result<T, ExtractError>,
) -> Result<T>
where
    F: Fetch,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        let body = fetcher.fetch(url).await?;
        let outcome = extract(&Html::parse_document(&body));

        match outcome {
            Ok(value) => {
                debug!(%field, url, attempt, "detail page ready");
                return Ok(value);
            }
            Err(reason) if attempt < max_attempts => {
                debug!(%field, url, attempt, error = %reason, "detail page not ready, retrying");
                tokio::time::sleep(policy.delay).await;
            }
            Err(last) => {
                return Err(HyroxError::EnrichmentExhausted {
                    field,
                    url: url.to_string(),
                    attempts: attempt,
                    last,
                });
            }
        }
    }
}
