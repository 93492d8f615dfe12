pub(crate) mod divisions;
pub(crate) mod events;
pub(crate) mod profile;
pub(crate) mod rankings;
pub(crate) mod splits;

use std::future::Future;

use ::scraper::{ElementRef, Selector};
use tracing::debug;

use crate::error::{HyroxError, Result};

pub(crate) const BASE_URL: &str = "https://www.hyresult.com";

/// The transport seam: fetch a page and hand back its body.
///
/// Implemented for [`reqwest::Client`]. Implementations must report a
/// non-success response as an error; nothing in this crate retries one.
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

impl Fetch for reqwest::Client {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "fetching page");

        let response = self.get(url).send().await.map_err(|e| HyroxError::Http {
            url: url.to_owned(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HyroxError::UnexpectedStatus {
                url: url.to_owned(),
                status,
            });
        }

        response.text().await.map_err(|e| HyroxError::ResponseBody {
            url: url.to_owned(),
            source: e,
        })
    }
}

/// All text inside `element`, whitespace-trimmed.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first element matching `selector` inside `element`,
/// or `None` if nothing matches.
pub(crate) fn select_text(element: &ElementRef, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(|e| element_text(&e))
}

/// Resolve a possibly relative link against the site base URL.
pub(crate) fn absolute_url(base_url: &str, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with("//") {
        format!("https:{href}")
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}

/// Append a query parameter, respecting any query already on the URL.
pub(crate) fn with_query(url: &str, key: &str, value: impl std::fmt::Display) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{key}={value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url(BASE_URL, "/event/s7-2025-chicago"),
            "https://www.hyresult.com/event/s7-2025-chicago"
        );
        assert_eq!(
            absolute_url("https://www.hyresult.com/", "event/x"),
            "https://www.hyresult.com/event/x"
        );
        assert_eq!(absolute_url(BASE_URL, "https://other.example/a"), "https://other.example/a");
        assert_eq!(absolute_url(BASE_URL, "//cdn.example/a.png"), "https://cdn.example/a.png");
    }

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("https://x/ranking", "p", 2), "https://x/ranking?p=2");
        assert_eq!(
            with_query("https://x/result?id=7", "tab", "splits"),
            "https://x/result?id=7&tab=splits"
        );
    }
}
