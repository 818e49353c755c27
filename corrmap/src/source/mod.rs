//! Price source seam
//!
//! A [`PriceSource`] supplies one series per symbol for a lookback window.
//! [`fetch_all`] fans out over every symbol and turns per-symbol failures into
//! empty series, which the statistics engine maps to zero correlation.

mod mock;

use async_trait::async_trait;
use futures::future::join_all;
use smol_str::SmolStr;
use tracing::{debug, error, warn};

use crate::{
    error::SourceError,
    model::{Series, SeriesBySymbol},
    window::TimeWindow,
};

pub use mock::{Clock, MockPriceSource, PriceProfile, Trend};

/// Supplier of timestamped price samples (live feed or synthetic generator)
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Symbols this source can serve
    async fn available_symbols(&self) -> Result<Vec<SmolStr>, SourceError>;

    /// Samples for `symbol` covering `window`, possibly empty
    async fn fetch_series(&self, symbol: &str, window: &TimeWindow) -> Result<Series, SourceError>;
}

/// Fetch every symbol concurrently, preserving the requested order
pub async fn fetch_all<S>(source: &S, symbols: &[SmolStr], window: &TimeWindow) -> SeriesBySymbol
where
    S: PriceSource + ?Sized,
{
    let results = join_all(
        symbols
            .iter()
            .map(|symbol| source.fetch_series(symbol, window)),
    )
    .await;

    let series_by_symbol: SeriesBySymbol = symbols
        .iter()
        .cloned()
        .zip(results)
        .map(|(symbol, result)| {
            let series = result.unwrap_or_else(|err| {
                if err.is_transient() {
                    warn!(
                        %symbol,
                        error = %err,
                        "price source unavailable, using empty series"
                    );
                } else {
                    error!(
                        %symbol,
                        error = %err,
                        "price series request rejected, using empty series"
                    );
                }
                Vec::new()
            });
            (symbol, series)
        })
        .collect();

    debug!(
        symbols = series_by_symbol.len(),
        window = %window,
        samples = series_by_symbol.values().map(Vec::len).sum::<usize>(),
        "fetched price series"
    );

    series_by_symbol
}
