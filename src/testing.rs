//! In-memory stand-in for hyresult.com.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::error::{HyroxError, Result};
use crate::scraper::Fetch;

/// Serves canned pages by exact URL and records every request.
///
/// A URL given several bodies serves them in order and then keeps serving
/// the last one. Unknown URLs answer 404.
#[derive(Default)]
pub(crate) struct FakeSite {
    pages: Mutex<HashMap<String, VecDeque<String>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeSite {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(self, url: &str, body: impl Into<String>) -> Self {
        self.pages(url, [body.into()])
    }

    pub(crate) fn pages(self, url: &str, bodies: impl IntoIterator<Item = String>) -> Self {
        self.pages
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .extend(bodies);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self, url: &str) -> usize {
        self.requests.lock().unwrap().iter().filter(|r| *r == url).count()
    }
}

impl Fetch for FakeSite {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());

        let mut pages = self.pages.lock().unwrap();
        let queue = pages.get_mut(url).filter(|q| !q.is_empty());
        match queue {
            Some(queue) if queue.len() > 1 => Ok(queue.pop_front().unwrap_or_default()),
            Some(queue) => Ok(queue.front().cloned().unwrap_or_default()),
            None => Err(HyroxError::UnexpectedStatus {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            }),
        }
    }
}

/// Counts `WARN` events seen while it is installed.
struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `f` and return its output with the number of warnings it logged on
/// this thread.
pub(crate) fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&count)));
    let output = tracing::subscriber::with_default(subscriber, f);
    (output, count.load(Ordering::SeqCst))
}
