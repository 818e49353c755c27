//! Price samples and the derived statistics consumed by the dashboard
//!
//! Every refresh produces a fresh [`CorrelationMatrix`]; nothing in here is
//! mutated after construction.

use derive_more::Constructor;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::statistics::{average_price, standard_deviation};

/// One observed price for one symbol at one instant
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Constructor)]
pub struct Sample {
    /// Ticker symbol (e.g., "AAPL")
    pub symbol: SmolStr,
    /// Observed price
    pub price: f64,
    /// Caller supplied timestamp, milliseconds since epoch for the bundled source
    pub timestamp: i64,
}

/// Ordered samples for one symbol (conventionally ascending timestamps)
pub type Series = Vec<Sample>;

/// Series keyed by symbol. Key insertion order defines matrix order.
pub type SeriesBySymbol = IndexMap<SmolStr, Series>;

/// Per-symbol summary statistics
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SymbolStatistics {
    pub symbol: SmolStr,
    pub average_price: f64,
    pub standard_deviation: f64,
}

/// Symmetric correlation matrix with unit diagonal plus per-symbol statistics
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CorrelationMatrix {
    /// Symbols in input key order
    pub symbols: Vec<SmolStr>,
    /// Square matrix indexed consistently with `symbols`
    pub correlations: Vec<Vec<f64>>,
    /// Exactly one entry per symbol
    pub statistics: IndexMap<SmolStr, SymbolStatistics>,
}

/// Correlation between two distinct symbols of a matrix
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CorrelationPair {
    pub first: SmolStr,
    pub second: SmolStr,
    pub correlation: f64,
}

impl CorrelationMatrix {
    /// Number of symbols (side length of the matrix)
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Position of `symbol` in the matrix ordering
    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Correlation between two symbols, `None` if either is not in the matrix
    pub fn correlation(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(self.correlations[i][j])
    }

    pub fn statistics_for(&self, symbol: &str) -> Option<&SymbolStatistics> {
        self.statistics.get(symbol)
    }

    /// Every unordered pair `(i, j)` with `i < j`, in matrix order
    pub fn pairs(&self) -> impl Iterator<Item = CorrelationPair> + '_ {
        self.symbols.iter().enumerate().flat_map(move |(i, first)| {
            self.symbols
                .iter()
                .enumerate()
                .skip(i + 1)
                .map(move |(j, second)| CorrelationPair {
                    first: first.clone(),
                    second: second.clone(),
                    correlation: self.correlations[i][j],
                })
        })
    }
}

/// Chart-ready view of one symbol's series
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PriceChart {
    pub symbol: SmolStr,
    /// `(timestamp, price)` in series order
    pub points: Vec<(i64, f64)>,
    pub average_price: f64,
    pub standard_deviation: f64,
}

impl PriceChart {
    pub fn from_series(symbol: impl Into<SmolStr>, series: &[Sample]) -> Self {
        let average_price = average_price(series);
        Self {
            symbol: symbol.into(),
            points: series.iter().map(|s| (s.timestamp, s.price)).collect(),
            average_price,
            standard_deviation: standard_deviation(series, average_price),
        }
    }

    /// Lowest and highest price, `None` for an empty chart
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |bounds, &(_, price)| match bounds {
            None => Some((price, price)),
            Some((low, high)) => Some((low.min(price), high.max(price))),
        })
    }

    /// First and last timestamp, `None` for an empty chart
    pub fn time_bounds(&self) -> Option<(i64, i64)> {
        let first = self.points.iter().map(|&(ts, _)| ts).min()?;
        let last = self.points.iter().map(|&(ts, _)| ts).max()?;
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::build_correlation_matrix;

    fn series(symbol: &str, points: &[(i64, f64)]) -> Series {
        points
            .iter()
            .map(|&(ts, price)| Sample::new(SmolStr::new(symbol), price, ts))
            .collect()
    }

    fn matrix() -> CorrelationMatrix {
        let mut data = SeriesBySymbol::new();
        data.insert("A".into(), series("A", &[(0, 1.0), (1, 2.0), (2, 3.0), (3, 4.0)]));
        data.insert("B".into(), series("B", &[(0, 2.0), (1, 4.0), (2, 6.0), (3, 8.0)]));
        data.insert("C".into(), series("C", &[(0, 8.0), (1, 6.0), (2, 4.0), (3, 2.0)]));
        build_correlation_matrix(&data)
    }

    #[test]
    fn test_matrix_lookup_by_symbol() {
        let matrix = matrix();

        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.index_of("C"), Some(2));
        assert_eq!(matrix.index_of("Z"), None);
        assert!((matrix.correlation("A", "B").unwrap() - 1.0).abs() < 1e-9);
        assert!((matrix.correlation("C", "A").unwrap() + 1.0).abs() < 1e-9);
        assert_eq!(matrix.correlation("A", "Z"), None);
        assert_eq!(matrix.statistics_for("B").unwrap().average_price, 5.0);
    }

    #[test]
    fn test_pairs_are_unordered_and_in_matrix_order() {
        let pairs: Vec<_> = matrix()
            .pairs()
            .map(|p| (p.first.to_string(), p.second.to_string()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("A".to_string(), "B".to_string()),
                ("A".to_string(), "C".to_string()),
                ("B".to_string(), "C".to_string()),
            ]
        );
    }

    #[test]
    fn test_price_chart_from_series() {
        let chart = PriceChart::from_series("A", &series("A", &[(10, 3.0), (20, 1.0), (30, 2.0)]));

        assert_eq!(chart.points, vec![(10, 3.0), (20, 1.0), (30, 2.0)]);
        assert_eq!(chart.average_price, 2.0);
        assert!((chart.standard_deviation - 1.0).abs() < 1e-12);
        assert_eq!(chart.price_bounds(), Some((1.0, 3.0)));
        assert_eq!(chart.time_bounds(), Some((10, 30)));
    }

    #[test]
    fn test_empty_price_chart() {
        let chart = PriceChart::from_series("A", &[]);

        assert_eq!(chart.average_price, 0.0);
        assert_eq!(chart.standard_deviation, 0.0);
        assert_eq!(chart.price_bounds(), None);
        assert_eq!(chart.time_bounds(), None);
    }

    #[test]
    fn test_matrix_serializes_in_symbol_order() {
        let json = serde_json::to_value(matrix()).unwrap();

        assert_eq!(json["symbols"], serde_json::json!(["A", "B", "C"]));
        assert_eq!(json["statistics"]["A"]["average_price"], 2.5);
    }
}
