//! Candidate scoring for LastDay recommendations.
//!
//! Given a catalog of nearby spots and a travel-time estimator, the
//! [`Recommender`] scores a bounded set of candidates concurrently, drops the
//! ones that cannot be reached, and returns the rest ordered by travel time.

pub mod error;
pub mod pipeline;

pub use error::RecommendError;
pub use pipeline::{Recommender, RouteQuery, ScoringOptions, StationQuery};
