use std::time::Duration;

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumString};

/// Number of runs, and of stations, in a HYROX race.
pub const SEGMENTS: usize = 8;

/// The eight workout stations, in race order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Station {
    Ski,
    SledPush,
    SledPull,
    BurpeeBroadJumps,
    Row,
    FarmersCarry,
    Lunges,
    Wallballs,
}

impl Station {
    fn index(self) -> usize {
        self as usize
    }
}

/// Per-segment times for a complete race: exactly eight runs and exactly one
/// time for each [`Station`].
///
/// Totals are derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Splits {
    runs: [Duration; SEGMENTS],
    stations: [Duration; SEGMENTS],
}

impl Splits {
    /// Station times are given in race order, i.e. the order of [`Station::iter`].
    pub fn new(runs: [Duration; SEGMENTS], stations: [Duration; SEGMENTS]) -> Self {
        Self { runs, stations }
    }

    pub fn runs(&self) -> &[Duration; SEGMENTS] {
        &self.runs
    }

    pub fn station(&self, station: Station) -> Duration {
        self.stations[station.index()]
    }

    /// Every station with its time, in race order.
    pub fn stations(&self) -> impl Iterator<Item = (Station, Duration)> + '_ {
        Station::iter().zip(self.stations.iter().copied())
    }

    pub fn run_total(&self) -> Duration {
        self.runs.iter().sum()
    }

    pub fn station_total(&self) -> Duration {
        self.stations.iter().sum()
    }

    pub fn total_time(&self) -> Duration {
        self.run_total() + self.station_total()
    }

    /// A human-readable JSON summary of the splits.
    pub fn pretty(&self) -> String {
        let stations: serde_json::Map<String, serde_json::Value> = self
            .stations()
            .map(|(station, time)| (station.to_string(), human(time).into()))
            .collect();
        let summary = serde_json::json!({
            "total": human(self.total_time()),
            "run_total": human(self.run_total()),
            "station_total": human(self.station_total()),
            "run_splits": self.runs.iter().copied().map(human).collect::<Vec<_>>(),
            "station_splits": stations,
        });
        serde_json::to_string_pretty(&summary).unwrap_or_else(|_| summary.to_string())
    }
}

fn human(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}
