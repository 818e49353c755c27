use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised by a [`PriceSource`](crate::source::PriceSource).
///
/// The statistics engine never sees these: a failed fetch is mapped to an
/// empty series before the matrix is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("unknown symbol: {0}")]
    UnknownSymbol(SmolStr),

    #[error("invalid lookback window: {0} minutes")]
    InvalidWindow(u32),

    #[error("price source unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by a [`Refresher`](crate::refresh::Refresher) handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("refresh task has shut down")]
    Closed,

    #[error("refresh request queue is full")]
    Busy,
}

impl SourceError {
    /// Determine if retrying the same request later could succeed.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Unavailable(_) => true,
            _ => false,
        }
    }
}
