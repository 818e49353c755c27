//! Average, standard deviation, covariance and Pearson correlation on price series
//!
//! Every function is total: degenerate input (empty series, a single sample,
//! zero variance, no overlapping timestamps) yields `0.0` instead of an error
//! or a non-finite value.

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::debug;

use crate::model::{CorrelationMatrix, Sample, SeriesBySymbol, SymbolStatistics};

/// Arithmetic mean of all prices, `0.0` for an empty series
pub fn average_price(series: &[Sample]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let sum: f64 = series.iter().map(|s| s.price).sum();
    sum / series.len() as f64
}

/// Sample (Bessel corrected) standard deviation relative to `mean`
/// Returns 0.0 when fewer than 2 samples
pub fn standard_deviation(series: &[Sample], mean: f64) -> f64 {
    if series.len() <= 1 {
        return 0.0;
    }
    let sum_squared_diff: f64 = series.iter().map(|s| (s.price - mean).powi(2)).sum();
    (sum_squared_diff / (series.len() - 1) as f64).sqrt()
}

/// Price pairs at timestamps present in both series (exact match only)
///
/// Later samples at a duplicated timestamp overwrite earlier ones. Output
/// order follows first appearance of each timestamp, A before B.
fn aligned_prices(series_a: &[Sample], series_b: &[Sample]) -> Vec<(f64, f64)> {
    let mut by_timestamp: IndexMap<i64, (Option<f64>, Option<f64>)> =
        IndexMap::with_capacity(series_a.len().max(series_b.len()));

    for sample in series_a {
        by_timestamp.insert(sample.timestamp, (Some(sample.price), None));
    }
    for sample in series_b {
        by_timestamp.entry(sample.timestamp).or_insert((None, None)).1 = Some(sample.price);
    }

    by_timestamp
        .into_values()
        .filter_map(|prices| match prices {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        })
        .collect()
}

/// Sample covariance over the timestamp-aligned subset, using the means of
/// the full series
///
/// Returns 0.0 when either series has fewer than 2 samples or fewer than 2
/// timestamps align.
pub fn covariance(series_a: &[Sample], series_b: &[Sample], mean_a: f64, mean_b: f64) -> f64 {
    if series_a.len() <= 1 || series_b.len() <= 1 {
        return 0.0;
    }

    let aligned = aligned_prices(series_a, series_b);
    if aligned.len() <= 1 {
        return 0.0;
    }

    let cov_sum: f64 = aligned
        .iter()
        .map(|(a, b)| (a - mean_a) * (b - mean_b))
        .sum();
    cov_sum / (aligned.len() - 1) as f64
}

/// True when every sample carries the same price
///
/// A constant series whose price is not exactly representable can yield a
/// rounding-noise standard deviation instead of exactly zero.
fn is_constant(series: &[Sample]) -> bool {
    match series.split_first() {
        Some((first, rest)) => rest.iter().all(|s| s.price == first.price),
        None => true,
    }
}

/// Pearson correlation coefficient between two series
///
/// Not clamped: floating point error may land marginally outside [-1, 1].
pub fn correlation(series_a: &[Sample], series_b: &[Sample]) -> f64 {
    if series_a.len() <= 1 || series_b.len() <= 1 {
        return 0.0;
    }

    let mean_a = average_price(series_a);
    let mean_b = average_price(series_b);

    let std_a = standard_deviation(series_a, mean_a);
    let std_b = standard_deviation(series_b, mean_b);

    // Constant series
    if std_a == 0.0 || std_b == 0.0 || is_constant(series_a) || is_constant(series_b) {
        return 0.0;
    }

    covariance(series_a, series_b, mean_a, mean_b) / (std_a * std_b)
}

/// Statistics for one series
pub fn symbol_statistics(symbol: &str, series: &[Sample]) -> SymbolStatistics {
    let average_price = average_price(series);
    SymbolStatistics {
        symbol: symbol.into(),
        average_price,
        standard_deviation: standard_deviation(series, average_price),
    }
}

/// Build the full correlation matrix across every input symbol
///
/// Each unordered pair is computed once and written to both triangles, so the
/// result is exactly symmetric. The diagonal is 1 regardless of data.
pub fn build_correlation_matrix(series_by_symbol: &SeriesBySymbol) -> CorrelationMatrix {
    let symbols: Vec<_> = series_by_symbol.keys().cloned().collect();
    let n = symbols.len();

    let statistics = series_by_symbol
        .iter()
        .map(|(symbol, series)| (symbol.clone(), symbol_statistics(symbol, series)))
        .collect();

    let mut correlations = vec![vec![0.0; n]; n];
    for (i, row) in correlations.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for (i, j) in (0..n).tuple_combinations() {
        let value = correlation(&series_by_symbol[i], &series_by_symbol[j]);
        correlations[i][j] = value;
        correlations[j][i] = value;
    }

    debug!(
        symbols = n,
        pairs = n * n.saturating_sub(1) / 2,
        "built correlation matrix"
    );

    CorrelationMatrix {
        symbols,
        correlations,
        statistics,
    }
}
