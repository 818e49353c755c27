//! Lookback windows offered by the dashboard

use std::borrow::Cow;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Lookback window in minutes, displayed by its label (e.g., "1h")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize, Display)]
#[display("{label}")]
pub struct TimeWindow {
    pub minutes: u32,
    pub label: Cow<'static, str>,
}

/// Windows selectable from the dashboard; the first is the initial window
pub const DEFAULT_TIME_WINDOWS: [TimeWindow; 6] = [
    TimeWindow::preset(5, "5m"),
    TimeWindow::preset(15, "15m"),
    TimeWindow::preset(30, "30m"),
    TimeWindow::preset(60, "1h"),
    TimeWindow::preset(120, "2h"),
    TimeWindow::preset(240, "4h"),
];

impl TimeWindow {
    const fn preset(minutes: u32, label: &'static str) -> Self {
        Self {
            minutes,
            label: Cow::Borrowed(label),
        }
    }

    /// Matching default window, or a custom one labelled "{minutes}m"
    pub fn from_minutes(minutes: u32) -> Self {
        DEFAULT_TIME_WINDOWS
            .iter()
            .find(|w| w.minutes == minutes)
            .cloned()
            .unwrap_or_else(|| Self {
                minutes,
                label: Cow::Owned(format!("{minutes}m")),
            })
    }

    /// Default window at `index`, used for the 1-6 hotkeys
    pub fn nth_default(index: usize) -> Option<Self> {
        DEFAULT_TIME_WINDOWS.get(index).cloned()
    }

    /// Position of this window among the defaults
    pub fn default_index(&self) -> Option<usize> {
        DEFAULT_TIME_WINDOWS.iter().position(|w| w.minutes == self.minutes)
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        DEFAULT_TIME_WINDOWS[0].clone()
    }
}
