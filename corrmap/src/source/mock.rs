//! Synthetic random-walk price source
//!
//! Prices jitter around a per-symbol base price. A shared sine trend is added
//! to some symbols and subtracted from others so the heatmap shows both
//! positive and negative correlation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use smol_str::SmolStr;
use tracing::debug;

use super::PriceSource;
use crate::{
    error::SourceError,
    model::{Sample, Series},
    window::TimeWindow,
};

/// Seconds between generated samples
const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(10);

/// Prices never drop below this floor
const MIN_PRICE: f64 = 0.01;

/// How a symbol reacts to the shared trend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Follows,
    Opposes,
    Ignores,
}

/// Generator parameters for one symbol
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceProfile {
    pub base_price: f64,
    /// Relative jitter amplitude (0-1)
    pub volatility: f64,
    pub trend: Trend,
}

impl PriceProfile {
    pub const fn new(base_price: f64, volatility: f64, trend: Trend) -> Self {
        Self {
            base_price,
            volatility,
            trend,
        }
    }
}

/// Used for symbols without a configured profile
const FALLBACK_PROFILE: PriceProfile = PriceProfile::new(100.0, 0.02, Trend::Ignores);

const DEFAULT_PROFILES: [(&str, PriceProfile); 8] = [
    ("AAPL", PriceProfile::new(150.0, 0.02, Trend::Follows)),
    ("MSFT", PriceProfile::new(280.0, 0.015, Trend::Follows)),
    ("GOOGL", PriceProfile::new(120.0, 0.025, Trend::Follows)),
    ("AMZN", PriceProfile::new(130.0, 0.03, Trend::Ignores)),
    ("META", PriceProfile::new(300.0, 0.035, Trend::Follows)),
    ("TSLA", PriceProfile::new(200.0, 0.05, Trend::Opposes)),
    ("NVDA", PriceProfile::new(400.0, 0.04, Trend::Ignores)),
    ("JPM", PriceProfile::new(140.0, 0.01, Trend::Ignores)),
];

/// Source of "now" in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(i64),
}

impl Clock {
    pub fn now_millis(&self) -> i64 {
        match self {
            Clock::System => Utc::now().timestamp_millis(),
            Clock::Fixed(ms) => *ms,
        }
    }
}

/// Random-walk price generator behind the [`PriceSource`] interface
pub struct MockPriceSource {
    profiles: IndexMap<SmolStr, PriceProfile>,
    sample_interval: Duration,
    symbols_latency: Duration,
    series_latency: Duration,
    strict: bool,
    clock: Clock,
    rng: Mutex<StdRng>,
}

impl MockPriceSource {
    /// Eight large-cap symbols, 10 second sampling, no latency
    pub fn new() -> Self {
        Self {
            profiles: DEFAULT_PROFILES
                .iter()
                .map(|(symbol, profile)| (SmolStr::new(symbol), *profile))
                .collect(),
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            symbols_latency: Duration::ZERO,
            series_latency: Duration::ZERO,
            strict: false,
            clock: Clock::System,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic output for a given seed (and clock)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Set sampling interval (clamped to at least 1ms)
    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Artificial delay before answering each request
    pub fn with_latency(mut self, symbols: Duration, series: Duration) -> Self {
        self.symbols_latency = symbols;
        self.series_latency = series;
        self
    }

    /// Add or replace the profile for a symbol
    pub fn with_profile(mut self, symbol: impl Into<SmolStr>, profile: PriceProfile) -> Self {
        self.profiles.insert(symbol.into(), profile);
        self
    }

    /// Reject symbols without a profile instead of using the fallback
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Generate ascending samples for `symbol` over `window_minutes`
    ///
    /// Timestamps sit on a grid anchored at "now" floored to the sampling
    /// interval, so every symbol in one refresh shares the same timestamps.
    fn generate(&self, symbol: &str, window_minutes: u32) -> Result<Series, SourceError> {
        if window_minutes == 0 {
            return Err(SourceError::InvalidWindow(window_minutes));
        }
        let profile = match self.profiles.get(symbol) {
            Some(profile) => *profile,
            None if self.strict => return Err(SourceError::UnknownSymbol(symbol.into())),
            None => FALLBACK_PROFILE,
        };

        let interval_ms = self.sample_interval.as_millis().max(1) as u64;
        let window_ms = u64::from(window_minutes) * 60_000;
        let points = window_ms.div_ceil(interval_ms);
        let interval_ms = interval_ms as i64;

        let now = self.clock.now_millis();
        let anchor = now - now.rem_euclid(interval_ms);

        let PriceProfile {
            base_price,
            volatility,
            trend,
        } = profile;
        let quarter = points as f64 / 4.0;
        let symbol = SmolStr::new(symbol);

        let mut rng = self.rng.lock();
        let mut series: Series = (0..points)
            .map(|i| {
                let jitter = base_price * volatility * (rng.random::<f64>() - 0.5);
                let trend_factor = (i as f64 / quarter).sin() * volatility * base_price * 0.5;
                let price = match trend {
                    Trend::Follows => base_price + jitter + trend_factor,
                    Trend::Opposes => base_price + jitter - trend_factor,
                    Trend::Ignores => base_price + jitter,
                };
                Sample::new(
                    symbol.clone(),
                    price.max(MIN_PRICE),
                    anchor - i as i64 * interval_ms,
                )
            })
            .collect();
        drop(rng);

        // Oldest first
        series.reverse();
        Ok(series)
    }
}

impl Default for MockPriceSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    async fn available_symbols(&self) -> Result<Vec<SmolStr>, SourceError> {
        if !self.symbols_latency.is_zero() {
            tokio::time::sleep(self.symbols_latency).await;
        }
        Ok(self.profiles.keys().cloned().collect())
    }

    async fn fetch_series(&self, symbol: &str, window: &TimeWindow) -> Result<Series, SourceError> {
        if !self.series_latency.is_zero() {
            tokio::time::sleep(self.series_latency).await;
        }
        let series = self.generate(symbol, window.minutes)?;
        debug!(symbol, samples = series.len(), window = %window, "generated mock series");
        Ok(series)
    }
}
