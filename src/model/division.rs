use serde::Serialize;
use strum_macros::{Display, EnumString};

/// The closed set of HYROX competition categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DivisionName {
    Men,
    Women,
    DoublesMen,
    DoublesWomen,
    DoublesMixed,
    ProMen,
    ProWomen,
    ProDoublesMen,
    ProDoublesWomen,
    ProDoublesMixed,
    TeamRelayMen,
    TeamRelayWomen,
    TeamRelayMixed,
    AdaptiveMen,
    AdaptiveWomen,
    EliteMen,
    EliteWomen,
    ProDoublesEliteMen,
    ProDoublesEliteWomen,
}

/// A division within one event: its category, how many finished, and where
/// its rankings live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Division {
    pub name: DivisionName,
    pub finishers: u32,
    pub url: String,
}
