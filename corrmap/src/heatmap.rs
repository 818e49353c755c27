//! Correlation strength bands used to colour heatmap cells

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Strength and direction of a correlation value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Display)]
pub enum CorrelationBand {
    #[display("Strong Negative")]
    StrongNegative,
    #[display("Moderate Negative")]
    ModerateNegative,
    #[display("Weak Negative")]
    WeakNegative,
    #[display("No Correlation")]
    Neutral,
    #[display("Weak Positive")]
    WeakPositive,
    #[display("Moderate Positive")]
    ModeratePositive,
    #[display("Strong Positive")]
    StrongPositive,
}

/// Legend stops, left to right
pub const LEGEND: [(f64, CorrelationBand); 3] = [
    (-1.0, CorrelationBand::StrongNegative),
    (0.0, CorrelationBand::Neutral),
    (1.0, CorrelationBand::StrongPositive),
];

impl CorrelationBand {
    /// Classify a correlation value. NaN is treated as no correlation.
    pub fn classify(value: f64) -> Self {
        if value.is_nan() {
            return Self::Neutral;
        }
        if value <= -0.7 {
            Self::StrongNegative
        } else if value <= -0.3 {
            Self::ModerateNegative
        } else if value < 0.0 {
            Self::WeakNegative
        } else if value == 0.0 {
            Self::Neutral
        } else if value < 0.3 {
            Self::WeakPositive
        } else if value < 0.7 {
            Self::ModeratePositive
        } else {
            Self::StrongPositive
        }
    }

    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            Self::StrongNegative | Self::ModerateNegative | Self::WeakNegative
        )
    }

    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            Self::WeakPositive | Self::ModeratePositive | Self::StrongPositive
        )
    }

    /// 0 for no correlation, 1 weak, 2 moderate, 3 strong
    pub fn intensity(&self) -> u8 {
        match self {
            Self::Neutral => 0,
            Self::WeakNegative | Self::WeakPositive => 1,
            Self::ModerateNegative | Self::ModeratePositive => 2,
            Self::StrongNegative | Self::StrongPositive => 3,
        }
    }
}
