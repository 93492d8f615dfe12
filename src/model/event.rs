use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;

const BRAND_PREFIX: &str = "hyrox";

/// A single HYROX race weekend, as listed on the events page.
///
/// Two events are the same event when their [canonical names](Event::canonical_name)
/// match; the display name and the other fields play no part in equality.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub name: String,
    pub date: NaiveDate,
    pub url: String,
}

impl Event {
    /// The comparison-stable identifier for this event, e.g. `chicago_2025`.
    pub fn canonical_name(&self) -> String {
        Self::canonicalize(&self.name)
    }

    /// Normalize an event name (or a user-supplied lookup key) so that
    /// `"HYROX Chicago 2025"`, `"chicago 2025"` and `"chicago_2025"` agree.
    pub fn canonicalize(name: &str) -> String {
        let lower = name.trim().to_lowercase();
        lower
            .strip_prefix(BRAND_PREFIX)
            .unwrap_or(&lower)
            .split_whitespace()
            .join("_")
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_name() == other.canonical_name()
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_name().hash(state);
    }
}
