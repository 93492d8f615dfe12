use std::path::Path;

use hyrox_results::{DivisionName, EnrichOptions, HyroxClient, ResultsLoader, WriteMode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let client = HyroxClient::new();
    let options = EnrichOptions::none().with_splits();

    let winner = client
        .result("chicago 2025", DivisionName::EliteMen, "Hunter McIntyre", options)
        .await
        .unwrap();
    println!("{} finished in {:?}", winner.value.ranking.name, winner.value.ranking.time);
    if let Some(splits) = &winner.value.splits {
        println!("{}", splits.pretty());
    }

    let report = ResultsLoader::new(&client)
        .load_divisions(
            "chicago 2025",
            &[DivisionName::EliteMen, DivisionName::EliteWomen],
            Path::new("chicago_2025_elite.csv"),
            options,
            WriteMode::Overwrite,
        )
        .await
        .unwrap();
    println!(
        "Wrote {} results ({} without splits, {} divisions missing)",
        report.written,
        report.missing_enrichments,
        report.failed.len()
    );
}
