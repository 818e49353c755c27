//! Corrmap - price statistics and correlation matrix engine
//!
//! Converts per-symbol `(timestamp, price)` samples into per-symbol statistics
//! and a symmetric correlation matrix, and provides the pieces a dashboard
//! needs around that engine:
//! - [`statistics`]: average, sample standard deviation, covariance over
//!   timestamp-aligned samples, Pearson correlation and matrix assembly
//! - [`source`]: the price source seam plus a synthetic random-walk source
//! - [`refresh`]: a single task that recomputes on a timer or on request
//! - [`dashboard`]: explicit UI state fed by the refresh task
pub mod config;
pub mod dashboard;
pub mod error;
pub mod heatmap;
pub mod model;
pub mod refresh;
pub mod source;
pub mod statistics;
pub mod window;

// Re-export commonly used types for convenience
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, PairDetail};
pub use error::{RefreshError, SourceError};
pub use heatmap::CorrelationBand;
pub use model::{
    CorrelationMatrix, CorrelationPair, PriceChart, Sample, Series, SeriesBySymbol,
    SymbolStatistics,
};
pub use refresh::{RefreshStatus, Refresher, Snapshot, run_pipeline, spawn_refresher};
pub use source::{MockPriceSource, PriceSource, fetch_all};
pub use statistics::{
    average_price, build_correlation_matrix, correlation, covariance, standard_deviation,
};
pub use window::{DEFAULT_TIME_WINDOWS, TimeWindow};
