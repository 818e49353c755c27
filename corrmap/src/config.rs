//! Environment driven configuration
//!
//! Unset or unparsable variables fall back to the defaults.

use std::{path::PathBuf, time::Duration};

use smol_str::SmolStr;

use crate::window::TimeWindow;

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Symbols to track, empty = ask the price source
    pub symbols: Vec<SmolStr>,
    /// Initial lookback window
    pub window: TimeWindow,
    /// Periodic refresh interval
    pub refresh_interval: Duration,
    /// Spacing between samples produced by the mock source
    pub sample_interval: Duration,
    /// Artificial mock source latency
    pub mock_latency: Duration,
    /// Log file for the terminal dashboard
    pub log_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            window: TimeWindow::default(),
            refresh_interval: Duration::from_secs(60),
            sample_interval: Duration::from_secs(10),
            mock_latency: Duration::ZERO,
            log_path: PathBuf::from("corrmap.log"),
        }
    }
}

/// Comma separated symbols, trimmed and upper-cased, blanks dropped
pub fn parse_symbols(raw: &str) -> Vec<SmolStr> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .map(SmolStr::from)
        .collect()
}

fn parse_var<T, F>(get: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    get(key).and_then(|v| v.trim().parse().ok())
}

impl DashboardConfig {
    /// Load from `CORRMAP_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from `CORRMAP_*` variables resolved through `get`
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            symbols: get("CORRMAP_SYMBOLS")
                .map(|raw| parse_symbols(&raw))
                .unwrap_or(defaults.symbols),
            window: parse_var::<u32, _>(&get, "CORRMAP_WINDOW_MINUTES")
                .filter(|minutes| *minutes > 0)
                .map(TimeWindow::from_minutes)
                .unwrap_or(defaults.window),
            refresh_interval: parse_var::<u64, _>(&get, "CORRMAP_REFRESH_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.refresh_interval),
            sample_interval: parse_var::<u64, _>(&get, "CORRMAP_SAMPLE_INTERVAL_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.sample_interval),
            mock_latency: parse_var::<u64, _>(&get, "CORRMAP_MOCK_LATENCY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.mock_latency),
            log_path: get("CORRMAP_LOG")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_path),
        }
    }

    /// Set tracked symbols
    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    /// Set initial window
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }

    /// Set refresh interval
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Set mock sampling interval
    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    /// Set mock latency
    pub fn with_mock_latency(mut self, latency: Duration) -> Self {
        self.mock_latency = latency;
        self
    }

    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }
}
