//! Application state for the dashboard
//!
//! Holds UI selection and the latest [`Snapshot`]. Snapshots are replaced
//! wholesale as the refresh task publishes them; nothing here feeds back into
//! the statistics engine.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::{
    model::{CorrelationPair, PriceChart, SymbolStatistics},
    refresh::{RefreshStatus, Snapshot},
    window::TimeWindow,
};

/// Two symbols' statistics and their correlation (heatmap hover detail)
#[derive(Debug, Clone, PartialEq)]
pub struct PairDetail<'a> {
    pub first: &'a SymbolStatistics,
    pub second: &'a SymbolStatistics,
    pub correlation: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    symbols: Vec<SmolStr>,
    selected: Option<SmolStr>,
    window: TimeWindow,
    snapshot: Option<Arc<Snapshot>>,
    loading: bool,
    error: Option<String>,
    /// Heatmap cursor (row, col)
    cursor: (usize, usize),
}

impl Dashboard {
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            loading: true,
            ..Default::default()
        }
    }

    /// Fold a status published by the refresh task into the state
    pub fn apply(&mut self, status: &RefreshStatus) {
        match status {
            RefreshStatus::Loading => self.loading = true,
            RefreshStatus::Ready(snapshot) => {
                self.symbols = snapshot.matrix.symbols.clone();
                let keep = self
                    .selected
                    .as_ref()
                    .is_some_and(|s| self.symbols.contains(s));
                if !keep {
                    self.selected = self.symbols.first().cloned();
                }
                self.snapshot = Some(Arc::clone(snapshot));
                self.loading = false;
                self.error = None;
                self.clamp_cursor();
            }
            RefreshStatus::Failed(message) => {
                self.error = Some(message.clone());
                self.loading = false;
            }
        }
    }

    pub fn symbols(&self) -> &[SmolStr] {
        &self.symbols
    }

    pub fn selected_symbol(&self) -> Option<&SmolStr> {
        self.selected.as_ref()
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Select a known symbol, returns false if it is not tracked
    pub fn select_symbol(&mut self, symbol: &str) -> bool {
        match self.symbols.iter().find(|s| *s == symbol) {
            Some(found) => {
                self.selected = Some(found.clone());
                true
            }
            None => false,
        }
    }

    pub fn select_next_symbol(&mut self) {
        self.step_selection(1);
    }

    pub fn select_previous_symbol(&mut self) {
        self.step_selection(-1);
    }

    fn step_selection(&mut self, step: isize) {
        if self.symbols.is_empty() {
            return;
        }
        let len = self.symbols.len() as isize;
        let current = self
            .selected
            .as_ref()
            .and_then(|s| self.symbols.iter().position(|x| x == s))
            .map_or(0, |i| i as isize);
        let next = (current + step).rem_euclid(len) as usize;
        self.selected = Some(self.symbols[next].clone());
    }

    /// Record a new window, returns true if it changed
    pub fn set_window(&mut self, window: TimeWindow) -> bool {
        if self.window == window {
            return false;
        }
        self.window = window;
        true
    }

    /// Move the heatmap cursor, clamped to the matrix
    pub fn move_cursor(&mut self, rows: isize, cols: isize) {
        let max = self.symbols.len().saturating_sub(1) as isize;
        let (row, col) = self.cursor;
        self.cursor = (
            (row as isize + rows).clamp(0, max) as usize,
            (col as isize + cols).clamp(0, max) as usize,
        );
    }

    fn clamp_cursor(&mut self) {
        self.move_cursor(0, 0);
    }

    /// Select the symbol of the hovered heatmap row
    pub fn select_hovered_row(&mut self) {
        if let Some(symbol) = self.symbols.get(self.cursor.0).cloned() {
            self.selected = Some(symbol);
        }
    }

    /// Statistics and correlation of the pair under the cursor
    pub fn hovered_pair(&self) -> Option<PairDetail<'_>> {
        let matrix = &self.snapshot.as_ref()?.matrix;
        let (row, col) = self.cursor;
        let first = matrix.statistics_for(matrix.symbols.get(row)?)?;
        let second = matrix.statistics_for(matrix.symbols.get(col)?)?;
        Some(PairDetail {
            first,
            second,
            correlation: matrix.correlations[row][col],
        })
    }

    /// Up to `limit` distinct pairs ordered by correlation magnitude, strongest first
    ///
    /// Ties keep matrix order.
    pub fn strongest_pairs(&self, limit: usize) -> Vec<CorrelationPair> {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return Vec::new();
        };
        let mut pairs: Vec<_> = snapshot.matrix.pairs().collect();
        pairs.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));
        pairs.truncate(limit);
        pairs
    }

    pub fn selected_statistics(&self) -> Option<&SymbolStatistics> {
        let symbol = self.selected.as_ref()?;
        self.snapshot.as_ref()?.matrix.statistics_for(symbol)
    }

    /// Chart data for the selected symbol
    pub fn selected_chart(&self) -> Option<PriceChart> {
        let symbol = self.selected.as_ref()?;
        let series = self.snapshot.as_ref()?.series.get(symbol)?;
        Some(PriceChart::from_series(symbol.clone(), series))
    }
}
