//! CSV export of race results, one row per athlete.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use strum::IntoEnumIterator;
use tracing::{debug, instrument};

use crate::error::{HyroxError, Result};
use crate::model::{DivisionName, RaceResult, Station, SEGMENTS};

const UNKNOWN: &str = "unknown";

/// What to do when the output file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Refuse to touch an existing file.
    #[default]
    Create,
    /// Add rows to the end of an existing file.
    Append,
    /// Replace an existing file.
    Overwrite,
}

/// Writes results as CSV, tagging every row with the event and division they
/// came from.
#[derive(Debug, Clone, Default)]
pub struct ResultsWriter {
    event: Option<String>,
    division: Option<DivisionName>,
}

impl ResultsWriter {
    pub fn new(event: Option<&str>, division: Option<DivisionName>) -> Self {
        Self {
            event: event.map(str::to_string),
            division,
        }
    }

    /// Column names, in order.
    pub fn header() -> Vec<String> {
        let leading = [
            "event_name",
            "division_name",
            "athlete_name",
            "age_group",
            "position",
            "position_ag",
            "finish_time",
            "analysis_url",
            "has_splits",
        ];
        leading
            .into_iter()
            .map(str::to_string)
            .chain((1..=SEGMENTS).map(|i| format!("run_{i}")))
            .chain(Station::iter().map(|s| s.to_string()))
            .chain(["has_profile", "profile_url"].map(str::to_string))
            .collect()
    }

    /// One CSV row. Durations are whole seconds; splits are zero when absent.
    pub fn row(&self, result: &RaceResult) -> Vec<String> {
        let ranking = &result.ranking;
        let (runs, stations): (Vec<String>, Vec<String>) = match &result.splits {
            Some(splits) => (
                splits.runs().iter().map(|d| d.as_secs().to_string()).collect(),
                splits.stations().map(|(_, d)| d.as_secs().to_string()).collect(),
            ),
            None => (vec!["0".to_string(); SEGMENTS], vec!["0".to_string(); SEGMENTS]),
        };

        let mut row = vec![
            self.event.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            self.division.map_or_else(|| UNKNOWN.to_string(), |d| d.to_string()),
            ranking.name.clone(),
            ranking.age_group.map_or_else(|| UNKNOWN.to_string(), |ag| ag.to_string()),
            ranking.position.to_string(),
            ranking.position_ag.map_or_else(|| UNKNOWN.to_string(), |p| p.to_string()),
            ranking.time.as_secs().to_string(),
            ranking.url.clone(),
            result.splits.is_some().to_string(),
        ];
        row.extend(runs);
        row.extend(stations);
        row.push(result.profile.is_some().to_string());
        row.push(result.profile.clone().unwrap_or_else(|| "n/a".to_string()));
        row
    }

    /// Write results to any writer, optionally preceded by the header row.
    pub fn write_to<W: io::Write>(
        &self,
        results: &[RaceResult],
        out: W,
        with_header: bool,
    ) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);
        if with_header {
            writer.write_record(Self::header())?;
        }
        for result in results {
            writer.write_record(self.row(result))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write results to `path`. A header is written whenever the file starts
    /// out empty.
    #[instrument(skip(self, results), fields(count = results.len()))]
    pub fn write(&self, results: &[RaceResult], path: &Path, mode: WriteMode) -> Result<()> {
        let exists = path.exists();
        let file = match (exists, mode) {
            (true, WriteMode::Create) => {
                return Err(HyroxError::OutputExists(path.display().to_string()));
            }
            (_, WriteMode::Append) => OpenOptions::new().create(true).append(true).open(path)?,
            _ => File::create(path)?,
        };
        let with_header = file.metadata()?.len() == 0;

        self.write_to(results, file, with_header)?;
        debug!(path = %path.display(), with_header, "wrote results");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::model::{AgeGroup, Ranking, Splits};

    fn result(splits: bool) -> RaceResult {
        RaceResult {
            ranking: Ranking {
                position: 3,
                position_ag: None,
                name: "Hunter McIntyre".to_string(),
                age_group: Some(AgeGroup::From35To39),
                time: Duration::from_secs(3540),
                url: "https://www.hyresult.com/result/H3".to_string(),
            },
            splits: splits.then(|| {
                Splits::new(
                    [Duration::from_secs(240); SEGMENTS],
                    [Duration::from_secs(200); SEGMENTS],
                )
            }),
            profile: None,
        }
    }

    #[test]
    fn test_header_layout() {
        let header = ResultsWriter::header();
        assert_eq!(header.len(), 9 + 8 + 8 + 2);
        assert_eq!(header[9], "run_1");
        assert_eq!(header[17], "ski");
        assert_eq!(header[24], "wallballs");
        assert_eq!(header[26], "profile_url");
    }

    #[test]
    fn test_rows_match_header() {
        let writer = ResultsWriter::new(Some("chicago_2025"), Some(DivisionName::EliteMen));
        let row = writer.row(&result(true));

        assert_eq!(row.len(), ResultsWriter::header().len());
        assert_eq!(
            &row[..9],
            [
                "chicago_2025",
                "elite_men",
                "Hunter McIntyre",
                "35_39",
                "3",
                "unknown",
                "3540",
                "https://www.hyresult.com/result/H3",
                "true"
            ]
        );
        assert_eq!(row[9], "240");
        assert_eq!(row[17], "200");
        assert_eq!(&row[25..], ["false", "n/a"]);
    }

    #[test]
    fn test_write_to_csv() {
        let mut out = Vec::new();
        ResultsWriter::default()
            .write_to(&[result(false)], &mut out, true)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("event_name,division_name,athlete_name"));
        assert!(lines[1].starts_with("unknown,unknown,Hunter McIntyre,35_39,3,unknown,3540,"));
        assert!(lines[1].contains(",false,0,0,0,"));
    }

    #[test]
    fn test_write_modes() {
        let path = std::env::temp_dir().join(format!("hyrox-results-{}.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let writer = ResultsWriter::new(Some("chicago_2025"), None);

        writer.write(&[result(false)], &path, WriteMode::Create).unwrap();
        let err = writer.write(&[result(false)], &path, WriteMode::Create).unwrap_err();
        assert!(matches!(err, HyroxError::OutputExists(_)));

        writer.write(&[result(true)], &path, WriteMode::Append).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 3);

        writer.write(&[result(true)], &path, WriteMode::Overwrite).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);

        std::fs::remove_file(&path).unwrap();
    }
}
