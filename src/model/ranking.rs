use std::time::Duration;

use serde::Serialize;
use strum_macros::{Display, EnumString};

use super::Splits;

/// HYROX age groups. Rankings don't always report one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
pub enum AgeGroup {
    #[strum(serialize = "under_24")]
    #[serde(rename = "under_24")]
    Under24,
    #[strum(serialize = "25_29")]
    #[serde(rename = "25_29")]
    From25To29,
    #[strum(serialize = "30_34")]
    #[serde(rename = "30_34")]
    From30To34,
    #[strum(serialize = "35_39")]
    #[serde(rename = "35_39")]
    From35To39,
    #[strum(serialize = "40_44")]
    #[serde(rename = "40_44")]
    From40To44,
    #[strum(serialize = "45_49")]
    #[serde(rename = "45_49")]
    From45To49,
    #[strum(serialize = "50_54")]
    #[serde(rename = "50_54")]
    From50To54,
    #[strum(serialize = "55_59")]
    #[serde(rename = "55_59")]
    From55To59,
    #[strum(serialize = "60_64")]
    #[serde(rename = "60_64")]
    From60To64,
    #[strum(serialize = "65_69")]
    #[serde(rename = "65_69")]
    From65To69,
    #[strum(serialize = "70_74")]
    #[serde(rename = "70_74")]
    From70To74,
    #[strum(serialize = "75_79")]
    #[serde(rename = "75_79")]
    From75To79,
    #[strum(serialize = "80_84")]
    #[serde(rename = "80_84")]
    From80To84,
    #[strum(serialize = "85_89")]
    #[serde(rename = "85_89")]
    From85To89,
    #[strum(serialize = "relay_under_40")]
    #[serde(rename = "relay_under_40")]
    RelayUnder40,
    #[strum(serialize = "relay_40_plus")]
    #[serde(rename = "relay_40_plus")]
    Relay40Plus,
}

/// One athlete's (or team's) line in a division ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking {
    pub position: u32,
    pub position_ag: Option<u32>,
    pub name: String,
    pub age_group: Option<AgeGroup>,
    pub time: Duration,
    /// Link to the athlete's race analysis page.
    pub url: String,
}

/// A ranking together with whatever optional detail could be attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceResult {
    pub ranking: Ranking,
    pub splits: Option<Splits>,
    pub profile: Option<String>,
}

impl From<Ranking> for RaceResult {
    fn from(ranking: Ranking) -> Self {
        Self {
            ranking,
            splits: None,
            profile: None,
        }
    }
}
