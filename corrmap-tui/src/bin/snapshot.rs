/// One-shot correlation snapshot
///
/// Runs the pipeline once against the simulated source and prints the
/// resulting series, statistics and matrix as pretty JSON on stdout.
use std::error::Error;

use corrmap::{DashboardConfig, MockPriceSource, PriceSource, run_pipeline};
use corrmap_tui::logging::init_stderr_logging;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_stderr_logging();

    let config = DashboardConfig::from_env();
    let source = MockPriceSource::new()
        .with_sample_interval(config.sample_interval)
        .with_latency(config.mock_latency, config.mock_latency);

    let symbols = if config.symbols.is_empty() {
        source.available_symbols().await?
    } else {
        config.symbols.clone()
    };

    let snapshot = run_pipeline(&source, &symbols, &config.window).await;
    info!(
        symbols = snapshot.matrix.len(),
        window = %snapshot.window,
        "computed correlation snapshot"
    );

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
