use lastday_core::CoreError;
use thiserror::Error;

/// Failures that abort a whole recommendation request.
///
/// Per-candidate lookup failures never surface here; those candidates are
/// dropped from the result instead.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The spot catalog could not be queried, so there is nothing to score.
    #[error("spot catalog unavailable: {0}")]
    Catalog(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A selected candidate lacks a usable `mapx`, `mapy` or `dist`.
    #[error("catalog item {position} is malformed: {source}")]
    MalformedSpot {
        position: usize,
        #[source]
        source: CoreError,
    },
}
