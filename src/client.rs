use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::error::{HyroxError, Result};
use crate::extract::{EnrichOptions, Enriched, Enricher, Extracted, FailurePolicy, RetryPolicy};
use crate::model::*;
use crate::scraper::{self, Fetch, BASE_URL};

/// Settings shared by every request a [`HyroxClient`] makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Site root; relative links on every page are resolved against it.
    pub base_url: String,
    /// Retry budget for each optional enrichment field.
    pub retry: RetryPolicy,
    /// Whether an exhausted enrichment fails the call or is skipped.
    pub on_enrich_failure: FailurePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            on_enrich_failure: FailurePolicy::default(),
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        base_url.clone_into(&mut self.base_url);
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_enrich_failure(mut self, policy: FailurePolicy) -> Self {
        self.on_enrich_failure = policy;
        self
    }
}

/// The main entry point for reading results from hyresult.com.
///
/// All fetches happen one after another; the client never issues two
/// requests at once.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> hyrox_results::Result<()> {
/// use hyrox_results::{DivisionName, EnrichOptions, HyroxClient};
///
/// let client = HyroxClient::new();
/// let results = client
///     .results("chicago 2025", DivisionName::EliteMen, EnrichOptions::none().with_splits())
///     .await?;
/// println!("{} results, {} without splits", results.value.len(), results.skipped.len());
/// # Ok(())
/// # }
/// ```
pub struct HyroxClient<F = reqwest::Client> {
    fetcher: F,
    config: ClientConfig,
}

impl HyroxClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self::with_fetcher(client, ClientConfig::default())
    }
}

impl Default for HyroxClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fetch> HyroxClient<F> {
    /// Create a client over any [`Fetch`] implementation.
    pub fn with_fetcher(fetcher: F, config: ClientConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Every event listed on the site, plus the cards that could not be read.
    #[instrument(skip(self))]
    pub async fn events(&self) -> Result<Extracted<Event>> {
        scraper::events::get_events(&self.fetcher, &self.config.base_url).await
    }

    /// Events held on or after `after` and before `before`.
    ///
    /// Cards whose date could not be read can't be placed in the window; they
    /// stay in [`Extracted::skipped`].
    #[instrument(skip(self))]
    pub async fn events_between(
        &self,
        after: NaiveDate,
        before: NaiveDate,
    ) -> Result<Extracted<Event>> {
        let mut events = self.events().await?;
        events.records.retain(|e| e.date >= after && e.date < before);
        debug!(count = events.len(), skipped = events.skipped.len(), "events in range");
        Ok(events)
    }

    /// Look an event up by name, e.g. `"HYROX Chicago 2025"` or `"chicago_2025"`.
    #[instrument(skip(self))]
    pub async fn event(&self, name: &str) -> Result<Event> {
        let canonical = Event::canonicalize(name);
        self.events()
            .await?
            .records
            .into_iter()
            .find(|e| e.canonical_name() == canonical)
            .ok_or_else(|| HyroxError::EntityNotFound {
                kind: "event",
                name: name.to_string(),
            })
    }

    /// The divisions contested at an event, plus the rows that could not be read.
    #[instrument(skip(self, event), fields(event = %event.name))]
    pub async fn divisions(&self, event: &Event) -> Result<Extracted<Division>> {
        scraper::divisions::get_divisions(&self.fetcher, &event.url, &self.config.base_url).await
    }

    /// One division of a named event.
    #[instrument(skip(self))]
    pub async fn division(&self, event_name: &str, name: DivisionName) -> Result<Division> {
        let event = self.event(event_name).await?;
        self.divisions(&event)
            .await?
            .records
            .into_iter()
            .find(|d| d.name == name)
            .ok_or_else(|| HyroxError::EntityNotFound {
                kind: "division",
                name: format!("{name} at {event_name}"),
            })
    }

    /// The full ranking of a division across all of its pages, plus the rows
    /// that could not be read.
    #[instrument(skip(self, division), fields(division = %division.name))]
    pub async fn rankings(&self, division: &Division) -> Result<Extracted<Ranking>> {
        let rankings =
            scraper::rankings::get_rankings(&self.fetcher, &division.url, &self.config.base_url)
                .await?;
        debug!(
            count = rankings.len(),
            skipped = rankings.skipped.len(),
            "parsed rankings"
        );
        Ok(rankings)
    }

    /// Attach optional fields to rankings using this client's retry and
    /// failure policies.
    pub async fn enrich(
        &self,
        rankings: Vec<Ranking>,
        options: EnrichOptions,
    ) -> Result<Enriched<Vec<RaceResult>>> {
        self.enricher()?.enrich_all(rankings, options).await
    }

    /// Every result in a division of a named event, with the requested
    /// optional fields. Fields that could not be fetched are listed in
    /// [`Enriched::skipped`], ranking rows that could not be read in
    /// [`Enriched::skipped_rows`].
    #[instrument(skip(self))]
    pub async fn results(
        &self,
        event_name: &str,
        division: DivisionName,
        options: EnrichOptions,
    ) -> Result<Enriched<Vec<RaceResult>>> {
        let division = self.division(event_name, division).await?;
        let rankings = self.rankings(&division).await?;
        let results = self.enrich(rankings.records, options).await?;
        Ok(results.with_skipped_rows(rankings.skipped))
    }

    /// One athlete's result, matched on the exact name shown in the ranking.
    #[instrument(skip(self))]
    pub async fn result(
        &self,
        event_name: &str,
        division: DivisionName,
        athlete: &str,
        options: EnrichOptions,
    ) -> Result<Enriched<RaceResult>> {
        let division = self.division(event_name, division).await?;
        let ranking = self
            .rankings(&division)
            .await?
            .records
            .into_iter()
            .find(|r| r.name == athlete)
            .ok_or_else(|| HyroxError::EntityNotFound {
                kind: "athlete",
                name: athlete.to_string(),
            })?;
        self.enricher()?.enrich(ranking, options).await
    }

    fn enricher(&self) -> Result<Enricher<'_, F>> {
        Enricher::new(
            &self.fetcher,
            &self.config.base_url,
            self.config.retry,
            self.config.on_enrich_failure,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::extract::EnrichField;
    use crate::scraper::divisions::tests::divisions_page;
    use crate::scraper::events::tests::events_page;
    use crate::scraper::rankings::tests::{page, row};
    use crate::scraper::splits::tests::splits_page;
    use crate::testing::FakeSite;

    const ELITE_MEN: &str = "https://www.hyresult.com/ranking/s7-2025-chicago-elite-men";

    fn site() -> FakeSite {
        FakeSite::new()
            .page("https://www.hyresult.com/events?tab=all", events_page())
            .page("https://www.hyresult.com/event/s7-2025-chicago", divisions_page())
            .page(
                &format!("{ELITE_MEN}?p=1"),
                page(&[
                    row("1", "1", "Rich Ryan", "30-34", "58:07", "R1"),
                    row("2", "1", "Tim Wenisch", "25-29", "58:40", "R2"),
                ]),
            )
            .page(&format!("{ELITE_MEN}?p=2"), page(&[]))
            .page("https://www.hyresult.com/result/R1?tab=splits", splits_page())
            .page("https://www.hyresult.com/result/R2?tab=splits", "<table></table>")
    }

    fn client(site: FakeSite) -> HyroxClient<FakeSite> {
        HyroxClient::with_fetcher(
            site,
            ClientConfig::default().with_retry(RetryPolicy::new(2, Duration::ZERO)),
        )
    }

    #[tokio::test]
    async fn test_event_lookup_uses_canonical_name() {
        let client = client(site());

        for name in ["chicago 2025", "HYROX Chicago 2025", "chicago_2025"] {
            let event = client.event(name).await.unwrap();
            assert_eq!(event.url, "https://www.hyresult.com/event/s7-2025-chicago");
        }

        let err = client.event("Hyrox Chicago").await.unwrap_err();
        assert!(matches!(err, HyroxError::EntityNotFound { kind: "event", .. }));
    }

    #[tokio::test]
    async fn test_events_between() {
        let client = client(site());
        let events = client
            .events_between(
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            )
            .await
            .unwrap();

        let names: Vec<_> = events.records.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["HYROX Chicago 2025"]);
        // Taipei's "coming soon" card is still reported.
        assert_eq!(events.skipped.len(), 1);
    }

    #[tokio::test]
    async fn test_division_lookup() {
        let client = client(site());

        let division = client.division("chicago 2025", DivisionName::EliteMen).await.unwrap();
        assert_eq!(division.url, ELITE_MEN);

        let err = client
            .division("chicago 2025", DivisionName::AdaptiveWomen)
            .await
            .unwrap_err();
        assert!(matches!(err, HyroxError::EntityNotFound { kind: "division", .. }));
    }

    #[tokio::test]
    async fn test_results_with_partial_splits() {
        let client = client(site());

        let results = client
            .results("chicago 2025", DivisionName::EliteMen, EnrichOptions::none().with_splits())
            .await
            .unwrap();

        assert_eq!(results.value.len(), 2);
        assert!(results.value[0].splits.is_some());
        assert!(results.value[1].splits.is_none());
        assert_eq!(results.skipped.len(), 1);
        assert_eq!(results.skipped[0].field, EnrichField::Splits);
        assert_eq!(results.skipped[0].athlete, "Tim Wenisch");
        assert!(results.skipped_rows.is_empty());
    }

    #[tokio::test]
    async fn test_results_report_dropped_ranking_rows() {
        let site = FakeSite::new()
            .page("https://www.hyresult.com/events?tab=all", events_page())
            .page("https://www.hyresult.com/event/s7-2025-chicago", divisions_page())
            .page(
                &format!("{ELITE_MEN}?p=1"),
                page(&[
                    row("1", "1", "Rich Ryan", "30-34", "58:07", "R1"),
                    r#"<tr class="border-t"><td>2</td><td>Tim Wenisch</td></tr>"#.to_string(),
                    row("3", "2", "Hunter McIntyre", "35-39", "59:40", "R3"),
                ]),
            )
            .page(&format!("{ELITE_MEN}?p=2"), page(&[]));

        let results = client(site)
            .results("chicago 2025", DivisionName::EliteMen, EnrichOptions::none())
            .await
            .unwrap();

        assert_eq!(results.value.len(), 2);
        assert!(results.skipped.is_empty());
        assert_eq!(results.skipped_rows.len(), 1);
        assert_eq!(results.skipped_rows[0].index, 2);
        assert!(!results.is_complete());
    }

    #[tokio::test]
    async fn test_results_abort_policy() {
        let client = HyroxClient::with_fetcher(
            site(),
            ClientConfig::default()
                .with_retry(RetryPolicy::new(2, Duration::ZERO))
                .with_enrich_failure(FailurePolicy::Abort),
        );

        let err = client
            .results("chicago 2025", DivisionName::EliteMen, EnrichOptions::none().with_splits())
            .await
            .unwrap_err();

        assert!(matches!(err, HyroxError::EnrichmentExhausted { attempts: 2, .. }));
    }

    #[tokio::test]
    async fn test_single_result() {
        let client = client(site());

        let rich = client
            .result("chicago_2025", DivisionName::EliteMen, "Rich Ryan", EnrichOptions::none().with_splits())
            .await
            .unwrap();
        assert!(rich.is_complete());
        assert_eq!(rich.value.ranking.time, Duration::from_secs(3487));
        assert!(rich.value.splits.is_some());

        let err = client
            .result("chicago_2025", DivisionName::EliteMen, "Nobody", EnrichOptions::none())
            .await
            .unwrap_err();
        assert!(matches!(err, HyroxError::EntityNotFound { kind: "athlete", .. }));
    }
}
